//! Codec lookup, construction and caching.

// -----------------------------------------------------------------------------
// Modules

mod cache;

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use log::{debug, trace};
use vc_introspect::ClassIntrospector;
use vc_introspect::class::{ClassKind, ClassProvider};
use vc_introspect::config::IntrospectionConfig;
use vc_introspect::hash::HashMap;
use vc_introspect::types::TypeDescriptor;

use crate::codec::{BeanDeserializer, BeanSerializer, ValueMethodSerializer};
use crate::codec::{DeserializeContext, SerializeContext};
use crate::codec::{KeyDeserializer, ValueDeserializer, ValueSerializer};
use crate::config::CodecConfig;
use crate::standard::{self, EnumCodec, MappingCodec, OptionalCodec, SequenceCodec};
use crate::standard::{StdKeyDeserializer, StdKeySerializer};
use crate::stream::{TokenReader, TokenWriter};
use crate::{CodecError, CodecResolutionError, ResolutionFailure};

use cache::CodecCache;

// -----------------------------------------------------------------------------
// CodecRegistry

/// Resolves and caches the codecs of types.
///
/// A lookup for a type tries, in order:
///
/// 1. a custom codec registered for exactly that type;
/// 2. a custom codec registered for its raw class that reports
///    [`binding_agnostic`](ValueSerializer::binding_agnostic);
/// 3. the standard codec: scalars and dates by raw class, enums, sequences,
///    mappings and optionals by [`ClassKind`];
/// 4. a bean codec built from the type's
///    [`BeanDescription`](vc_introspect::BeanDescription).
///
/// Resolved codecs are cached per [`TypeDescriptor`] for the lifetime of the
/// registry. Failures are not cached.
///
/// Registration happens through `&mut self` while the registry is set up;
/// afterwards it is shared (it is `Send + Sync`) and lookups only need `&self`.
///
/// # Examples
///
/// ```
/// use vc_codec::CodecRegistry;
/// use vc_codec::stream::{Token, TokenBuffer};
/// use vc_introspect::class::ClassTable;
/// use vc_introspect::types::TypeDescriptor;
///
/// let registry = CodecRegistry::new(ClassTable::new());
/// let ty = TypeDescriptor::of::<i32>();
///
/// let mut buffer = TokenBuffer::new();
/// registry.write_value(&ty, &7_i32, &mut buffer).unwrap();
///
/// let value = registry.read_value(&ty, &mut buffer.reader()).unwrap();
/// assert_eq!(value.downcast_ref::<i32>(), Some(&7));
/// ```
pub struct CodecRegistry {
    introspector: ClassIntrospector,
    config: CodecConfig,
    custom_serializers: HashMap<TypeDescriptor, Arc<dyn ValueSerializer>>,
    custom_deserializers: HashMap<TypeDescriptor, Arc<dyn ValueDeserializer>>,
    custom_key_serializers: HashMap<TypeDescriptor, Arc<dyn ValueSerializer>>,
    custom_key_deserializers: HashMap<TypeDescriptor, Arc<dyn KeyDeserializer>>,
    serializers: CodecCache<dyn ValueSerializer>,
    deserializers: CodecCache<dyn ValueDeserializer>,
    key_serializers: CodecCache<dyn ValueSerializer>,
    key_deserializers: CodecCache<dyn KeyDeserializer>,
}

/// Returns the custom codec for `ty`, or for its raw class if that codec
/// serves every parameterization.
fn find_custom<C: ?Sized>(
    custom: &HashMap<TypeDescriptor, Arc<C>>,
    ty: &TypeDescriptor,
    agnostic: impl Fn(&C) -> bool,
) -> Option<Arc<C>> {
    if let Some(codec) = custom.get(ty) {
        return Some(codec.clone());
    }
    if !ty.is_generic() {
        return None;
    }
    custom.get(&ty.erased()).filter(|codec| agnostic(codec)).cloned()
}

fn resolve<C: ?Sized>(
    cache: &CodecCache<C>,
    role: &'static str,
    ty: &TypeDescriptor,
    build: impl FnOnce() -> Result<Arc<C>, ResolutionFailure>,
) -> Result<Arc<C>, CodecResolutionError> {
    if let Some(codec) = cache.get(ty) {
        trace!("{role} cache hit for `{ty}`");
        return Ok(codec);
    }

    let codec = build().map_err(|source| CodecResolutionError {
        ty: ty.clone(),
        source,
    })?;
    debug!("built {role} for `{ty}`");
    Ok(cache.publish(ty, codec))
}

impl CodecRegistry {
    /// Creates a registry with default configurations.
    pub fn new(provider: impl ClassProvider + 'static) -> Self {
        Self::from_introspector(ClassIntrospector::new(provider), CodecConfig::default())
    }

    pub fn with_config(
        provider: impl ClassProvider + 'static,
        config: CodecConfig,
        introspection: IntrospectionConfig,
    ) -> Self {
        Self::from_introspector(ClassIntrospector::with_config(provider, introspection), config)
    }

    /// Creates a registry resolving bean codecs through `introspector`.
    pub fn from_introspector(introspector: ClassIntrospector, config: CodecConfig) -> Self {
        Self {
            introspector,
            config,
            custom_serializers: HashMap::default(),
            custom_deserializers: HashMap::default(),
            custom_key_serializers: HashMap::default(),
            custom_key_deserializers: HashMap::default(),
            serializers: CodecCache::new(),
            deserializers: CodecCache::new(),
            key_serializers: CodecCache::new(),
            key_deserializers: CodecCache::new(),
        }
    }

    #[inline]
    pub fn introspector(&self) -> &ClassIntrospector {
        &self.introspector
    }

    #[inline]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Registration

    /// Registers a custom serializer for `ty`, replacing any cached one.
    pub fn register_serializer(&mut self, ty: TypeDescriptor, codec: Arc<dyn ValueSerializer>) {
        self.serializers.evict(ty.raw());
        self.custom_serializers.insert(ty, codec);
    }

    /// Registers a custom deserializer for `ty`, replacing any cached one.
    pub fn register_deserializer(&mut self, ty: TypeDescriptor, codec: Arc<dyn ValueDeserializer>) {
        self.deserializers.evict(ty.raw());
        self.custom_deserializers.insert(ty, codec);
    }

    /// Registers a codec serving both directions for `ty`.
    pub fn register_custom<C>(&mut self, ty: TypeDescriptor, codec: Arc<C>)
    where
        C: ValueSerializer + ValueDeserializer + 'static,
    {
        self.register_serializer(ty.clone(), codec.clone());
        self.register_deserializer(ty, codec);
    }

    /// Registers the serializer writing map keys of type `ty`.
    pub fn register_key_serializer(&mut self, ty: TypeDescriptor, codec: Arc<dyn ValueSerializer>) {
        self.key_serializers.evict(ty.raw());
        self.custom_key_serializers.insert(ty, codec);
    }

    /// Registers the deserializer parsing map keys of type `ty`.
    pub fn register_key_deserializer(&mut self, ty: TypeDescriptor, codec: Arc<dyn KeyDeserializer>) {
        self.key_deserializers.evict(ty.raw());
        self.custom_key_deserializers.insert(ty, codec);
    }

    // -------------------------------------------------------------------------
    // Lookup

    /// Returns the serializer of `ty`, building it on first request.
    pub fn get_serializer(&self, ty: &TypeDescriptor) -> Result<Arc<dyn ValueSerializer>, CodecResolutionError> {
        resolve(&self.serializers, "serializer", ty, || self.build_serializer(ty))
    }

    /// Returns the deserializer of `ty`, building it on first request.
    pub fn get_deserializer(
        &self,
        ty: &TypeDescriptor,
    ) -> Result<Arc<dyn ValueDeserializer>, CodecResolutionError> {
        resolve(&self.deserializers, "deserializer", ty, || self.build_deserializer(ty))
    }

    /// Returns the serializer writing map keys of type `ty`.
    pub fn get_key_serializer(
        &self,
        ty: &TypeDescriptor,
    ) -> Result<Arc<dyn ValueSerializer>, CodecResolutionError> {
        resolve(&self.key_serializers, "key serializer", ty, || {
            self.build_key_serializer(ty)
        })
    }

    /// Returns the deserializer parsing map keys of type `ty`.
    pub fn get_key_deserializer(
        &self,
        ty: &TypeDescriptor,
    ) -> Result<Arc<dyn KeyDeserializer>, CodecResolutionError> {
        resolve(&self.key_deserializers, "key deserializer", ty, || {
            self.build_key_deserializer(ty)
        })
    }

    /// Returns the number of cached serializers.
    pub fn cached_serializers(&self) -> usize {
        self.serializers.len()
    }

    /// Returns the number of cached deserializers.
    pub fn cached_deserializers(&self) -> usize {
        self.deserializers.len()
    }

    // -------------------------------------------------------------------------
    // Entry points

    /// Writes `value`, an instance of `ty`, to `out`.
    pub fn write_value(
        &self,
        ty: &TypeDescriptor,
        value: &dyn Any,
        out: &mut dyn TokenWriter,
    ) -> Result<(), CodecError> {
        SerializeContext::new(self).write_value(ty, value, out)
    }

    /// Reads one instance of `ty` from `input`.
    pub fn read_value(&self, ty: &TypeDescriptor, input: &mut dyn TokenReader) -> Result<Box<dyn Any>, CodecError> {
        DeserializeContext::new(self).read_value(ty, input)
    }

    // -------------------------------------------------------------------------
    // Construction

    fn build_serializer(&self, ty: &TypeDescriptor) -> Result<Arc<dyn ValueSerializer>, ResolutionFailure> {
        if let Some(codec) = find_custom(&self.custom_serializers, ty, |c| c.binding_agnostic()) {
            return Ok(codec);
        }
        if let Some(codec) = standard::serializer(ty.raw()) {
            return Ok(codec);
        }

        let class = self.introspector.describe_class(ty)?;
        let codec: Arc<dyn ValueSerializer> = match class.kind() {
            ClassKind::Bean => {
                let desc = self.introspector.introspect(ty)?;
                match ValueMethodSerializer::new(&desc)? {
                    Some(codec) => Arc::new(codec),
                    None => Arc::new(BeanSerializer::new(desc)),
                }
            }
            ClassKind::Enum(access) => Arc::new(EnumCodec::new(ty, access)),
            ClassKind::Sequence(access) => Arc::new(SequenceCodec::new(ty, access)?),
            ClassKind::Mapping(access) => Arc::new(MappingCodec::new(ty, access)?),
            ClassKind::Optional(access) => Arc::new(OptionalCodec::new(ty, access)?),
        };
        Ok(codec)
    }

    fn build_deserializer(&self, ty: &TypeDescriptor) -> Result<Arc<dyn ValueDeserializer>, ResolutionFailure> {
        if let Some(codec) = find_custom(&self.custom_deserializers, ty, |c| c.binding_agnostic()) {
            return Ok(codec);
        }
        if let Some(codec) = standard::deserializer(ty.raw()) {
            return Ok(codec);
        }

        let class = self.introspector.describe_class(ty)?;
        let codec: Arc<dyn ValueDeserializer> = match class.kind() {
            ClassKind::Bean => Arc::new(BeanDeserializer::new(self.introspector.introspect(ty)?)?),
            ClassKind::Enum(access) => Arc::new(EnumCodec::new(ty, access)),
            ClassKind::Sequence(access) => Arc::new(SequenceCodec::new(ty, access)?),
            ClassKind::Mapping(access) => Arc::new(MappingCodec::new(ty, access)?),
            ClassKind::Optional(access) => Arc::new(OptionalCodec::new(ty, access)?),
        };
        Ok(codec)
    }

    fn build_key_serializer(&self, ty: &TypeDescriptor) -> Result<Arc<dyn ValueSerializer>, ResolutionFailure> {
        if let Some(codec) = find_custom(&self.custom_key_serializers, ty, |c| c.binding_agnostic()) {
            return Ok(codec);
        }
        if ty.is_well_known() {
            return Ok(Arc::new(StdKeySerializer::new()));
        }

        let class = self.introspector.describe_class(ty)?;
        let codec = StdKeySerializer::for_class(&class).ok_or(ResolutionFailure::Unsupported("map key serializer"))?;
        Ok(Arc::new(codec))
    }

    fn build_key_deserializer(&self, ty: &TypeDescriptor) -> Result<Arc<dyn KeyDeserializer>, ResolutionFailure> {
        if let Some(codec) = find_custom(&self.custom_key_deserializers, ty, |c| c.binding_agnostic()) {
            return Ok(codec);
        }
        if let Some(codec) = standard::key_deserializer(ty.raw()) {
            return Ok(codec);
        }

        let class = self.introspector.describe_class(ty)?;
        match class.kind() {
            ClassKind::Enum(access) => Ok(Arc::new(StdKeyDeserializer::enumeration(ty, access))),
            _ => Err(ResolutionFailure::Unsupported("map key deserializer")),
        }
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("introspector", &self.introspector)
            .field("config", &self.config)
            .field("custom_serializers", &self.custom_serializers.len())
            .field("custom_deserializers", &self.custom_deserializers.len())
            .field("cached_serializers", &self.serializers.len())
            .field("cached_deserializers", &self.deserializers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::format;
    use alloc::string::String;
    use alloc::vec::Vec;

    use chrono::NaiveDate;
    use vc_introspect::types::well_known;
    use vc_introspect::{IntrospectionError, ResolveError};

    use super::*;
    use crate::config::DateKeyFormat;
    use crate::fixtures::{self, Color, Ident, Point};
    use crate::stream::{Token, TokenBuffer};

    /// Writes a point as `"x=<x>"`.
    struct PointAsText;

    impl ValueSerializer for PointAsText {
        fn serialize(
            &self,
            value: &dyn Any,
            out: &mut dyn TokenWriter,
            _ctx: &SerializeContext<'_>,
        ) -> Result<(), CodecError> {
            let point = value
                .downcast_ref::<Point>()
                .ok_or_else(vc_introspect::class::AccessError::mismatch::<Point>)?;
            Ok(out.write_str(&format!("x={}", point.x))?)
        }
    }

    impl ValueDeserializer for PointAsText {
        fn deserialize(
            &self,
            input: &mut dyn TokenReader,
            _ctx: &DeserializeContext<'_>,
        ) -> Result<Box<dyn Any>, CodecError> {
            let text = match input.next_token()? {
                Some(Token::Scalar(crate::stream::Scalar::Str(text))) => text,
                other => return Err(CodecError::unexpected("string", other)),
            };
            let x = text
                .strip_prefix("x=")
                .and_then(|x| x.parse().ok())
                .ok_or_else(|| CodecError::invalid(&fixtures::point(), text.clone()))?;
            Ok(Box::new(Point { x }))
        }
    }

    /// Writes every sequence as its element count.
    struct CountOnly {
        agnostic: bool,
    }

    impl ValueSerializer for CountOnly {
        fn serialize(
            &self,
            _value: &dyn Any,
            out: &mut dyn TokenWriter,
            _ctx: &SerializeContext<'_>,
        ) -> Result<(), CodecError> {
            Ok(out.write_u64(0)?)
        }

        fn binding_agnostic(&self) -> bool {
            self.agnostic
        }
    }

    fn same<C: ?Sized, D: ?Sized>(a: &Arc<C>, b: &Arc<D>) -> bool {
        Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
    }

    #[test]
    fn custom_codec_is_returned_on_every_call() {
        let mut registry = fixtures::registry();
        let ty = fixtures::point();

        // A cached bean codec is replaced by the registration.
        let bean = registry.get_serializer(&ty).unwrap();
        assert_eq!(bean.schema_type(), crate::codec::SchemaType::Object);

        let custom = Arc::new(PointAsText);
        registry.register_custom(ty.clone(), custom.clone());

        for _ in 0..3 {
            assert!(same(&registry.get_serializer(&ty).unwrap(), &custom));
            assert!(same(&registry.get_deserializer(&ty).unwrap(), &custom));
        }

        assert_eq!(fixtures::to_json(&registry, &ty, &Point { x: 4 }), r#""x=4""#);
        let point = fixtures::from_json(&registry, &ty, r#""x=9""#).unwrap();
        assert_eq!(point.downcast_ref::<Point>(), Some(&Point { x: 9 }));
    }

    #[test]
    fn binding_agnostic_custom_codecs_serve_every_parameterization() {
        let list = fixtures::list_of(TypeDescriptor::of::<i32>());
        let raw = TypeDescriptor::simple("List");

        let mut registry = fixtures::registry();
        registry.register_serializer(raw.clone(), Arc::new(CountOnly { agnostic: false }));
        assert_eq!(fixtures::to_json(&registry, &list, &alloc::vec![1, 2]), "[1,2]");

        let agnostic: Arc<dyn ValueSerializer> = Arc::new(CountOnly { agnostic: true });
        registry.register_serializer(raw, agnostic.clone());
        assert!(same(&registry.get_serializer(&list).unwrap(), &agnostic));
        assert_eq!(fixtures::to_json(&registry, &list, &alloc::vec![1, 2]), "0");
    }

    #[test]
    fn concurrent_lookups_share_the_published_codec() {
        let registry = fixtures::registry();
        let ty = fixtures::person();

        let codecs: Vec<Arc<dyn ValueSerializer>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| registry.get_serializer(&ty).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let published = registry.get_serializer(&ty).unwrap();
        assert!(codecs.iter().all(|codec| same(codec, &published)));
        assert_eq!(registry.cached_serializers(), 1);
    }

    #[test]
    fn failures_are_wrapped_and_not_cached() {
        let registry = fixtures::registry();
        let ty = TypeDescriptor::simple("Missing");

        let Err(err) = registry.get_serializer(&ty) else {
            panic!("`{ty}` has no class definition");
        };
        assert_eq!(err.ty, ty);
        assert!(matches!(
            err.source,
            ResolutionFailure::Introspection(ResolveError::Introspection(IntrospectionError::UnknownClass(_)))
        ));
        assert_eq!(registry.cached_serializers(), 0);

        for name in ["Shape", "Money"] {
            let Err(err) = registry.get_deserializer(&TypeDescriptor::simple(name)) else {
                panic!("`{name}` cannot be instantiated");
            };
            assert!(matches!(
                err.source,
                ResolutionFailure::Introspection(ResolveError::Introspection(IntrospectionError::NoCreator(_)))
            ));
        }
        assert_eq!(registry.cached_deserializers(), 0);

        let Err(err) = registry.get_key_deserializer(&TypeDescriptor::simple("Ident")) else {
            panic!("`Ident` keys cannot be parsed");
        };
        assert!(matches!(err.source, ResolutionFailure::Unsupported(_)));
    }

    #[test]
    fn well_known_classes_use_standard_codecs() {
        let registry = fixtures::registry();
        for name in well_known::ALL {
            let ty = TypeDescriptor::simple(name);
            assert!(registry.get_serializer(&ty).is_ok(), "{name}");
            assert!(registry.get_deserializer(&ty).is_ok(), "{name}");
            assert!(registry.get_key_deserializer(&ty).is_ok(), "{name}");
        }
        let ty = TypeDescriptor::of::<String>();
        assert_eq!(
            registry.get_serializer(&ty).unwrap().schema_type(),
            crate::codec::SchemaType::String
        );
    }

    #[test]
    fn date_keys_use_the_date_key_format() {
        let ty = fixtures::map_of(TypeDescriptor::of::<NaiveDate>(), TypeDescriptor::of::<String>());
        let epoch_day = |days: u64| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap() + chrono::Days::new(days);
        let map = BTreeMap::from([(epoch_day(1), String::from("a"))]);

        let registry = fixtures::registry();
        assert_eq!(
            fixtures::to_json(&registry, &ty, &map),
            r#"{"1970-01-02T00:00:00.000+0000":"a"}"#
        );

        let config = CodecConfig::default().with_date_key_format(DateKeyFormat::Timestamp);
        let registry = CodecRegistry::with_config(fixtures::table(), config, IntrospectionConfig::default());
        let json = fixtures::to_json(&registry, &ty, &map);
        assert_eq!(json, r#"{"86400000":"a"}"#);

        let back = fixtures::from_json(&registry, &ty, &json).unwrap();
        assert_eq!(back.downcast_ref::<BTreeMap<NaiveDate, String>>(), Some(&map));
    }

    #[test]
    fn other_keys_use_their_text_form() {
        let registry = fixtures::registry();

        let ty = fixtures::map_of(TypeDescriptor::of::<String>(), TypeDescriptor::of::<i32>());
        let map = BTreeMap::from([(String::from("abc"), 1)]);
        let json = fixtures::to_json(&registry, &ty, &map);
        assert_eq!(json, r#"{"abc":1}"#);
        let back = fixtures::from_json(&registry, &ty, &json).unwrap();
        assert_eq!(back.downcast_ref::<BTreeMap<String, i32>>(), Some(&map));

        let ty = fixtures::map_of(fixtures::color(), TypeDescriptor::of::<i32>());
        let map = BTreeMap::from([(Color::Red, 1), (Color::Green, 2)]);
        let json = fixtures::to_json(&registry, &ty, &map);
        assert_eq!(json, r#"{"RED":1,"GREEN":2}"#);
        let back = fixtures::from_json(&registry, &ty, &json).unwrap();
        assert_eq!(back.downcast_ref::<BTreeMap<Color, i32>>(), Some(&map));

        let ty = fixtures::map_of(TypeDescriptor::simple("Ident"), TypeDescriptor::of::<i32>());
        let map = BTreeMap::from([(Ident(7), 1)]);
        assert_eq!(fixtures::to_json(&registry, &ty, &map), r#"{"id-7":1}"#);

        let keys = registry.get_key_serializer(&TypeDescriptor::of::<String>()).unwrap();
        assert_eq!(keys.schema_type().as_str(), "string");
    }

    #[test]
    fn key_serializers_can_be_overridden() {
        struct Upper;

        impl ValueSerializer for Upper {
            fn serialize(
                &self,
                value: &dyn Any,
                out: &mut dyn TokenWriter,
                _ctx: &SerializeContext<'_>,
            ) -> Result<(), CodecError> {
                let key = value.downcast_ref::<String>().map(|k| k.to_uppercase()).unwrap_or_default();
                Ok(out.write_field_name(&key)?)
            }
        }

        let mut registry = fixtures::registry();
        let ty = fixtures::map_of(TypeDescriptor::of::<String>(), TypeDescriptor::of::<i32>());
        let map = BTreeMap::from([(String::from("abc"), 1)]);
        assert_eq!(fixtures::to_json(&registry, &ty, &map), r#"{"abc":1}"#);

        registry.register_key_serializer(TypeDescriptor::of::<String>(), Arc::new(Upper));
        assert_eq!(fixtures::to_json(&registry, &ty, &map), r#"{"ABC":1}"#);

        let mut buffer = TokenBuffer::new();
        registry.write_value(&ty, &map, &mut buffer).unwrap();
        assert_eq!(buffer.tokens()[1], Token::FieldName(String::from("ABC")));
    }
}
