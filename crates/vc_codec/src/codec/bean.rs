use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use log::warn;
use vc_introspect::types::TypeDescriptor;
use vc_introspect::{BeanDescription, CtorInfo, IntrospectionError, MemberInfo, MethodInfo};

use crate::CodecError;
use crate::codec::{DeserializeContext, SchemaType, SerializeContext, expect_token, take_null};
use crate::codec::{ValueDeserializer, ValueSerializer};
use crate::config::Inclusion;
use crate::stream::{Token, TokenReader, TokenWriter};

// -----------------------------------------------------------------------------
// BeanSerializer

struct PropertyWriter {
    name: Arc<str>,
    accessor: MemberInfo,
}

/// Writes a bean as an object of its properties.
///
/// Every non-ignored property with a visible read accessor is written in
/// property order, followed by the entries of the any-getter. Values are
/// filtered by the configured [`Inclusion`]. The codecs of property types are
/// resolved while writing, so recursive types are fine.
pub struct BeanSerializer {
    desc: Arc<BeanDescription>,
    properties: Vec<PropertyWriter>,
    any_getter: Option<(MethodInfo, TypeDescriptor)>,
}

impl BeanSerializer {
    pub fn new(desc: Arc<BeanDescription>) -> Self {
        let properties = desc
            .find_properties()
            .filter_map(|property| {
                Some(PropertyWriter {
                    name: property.name_arc().clone(),
                    accessor: property.accessor()?.clone(),
                })
            })
            .collect();
        let any_getter = desc
            .find_any_getter()
            .and_then(|getter| Some((getter.clone(), getter.value_type()?.clone())));

        Self {
            desc,
            properties,
            any_getter,
        }
    }

    #[inline]
    pub fn description(&self) -> &Arc<BeanDescription> {
        &self.desc
    }
}

fn excluded(inclusion: Inclusion, serializer: &dyn ValueSerializer, value: &dyn Any) -> bool {
    match inclusion {
        Inclusion::Always => false,
        Inclusion::NonNull => serializer.is_null(value),
        Inclusion::NonEmpty => serializer.is_empty(value),
    }
}

impl ValueSerializer for BeanSerializer {
    fn serialize(
        &self,
        bean: &dyn Any,
        out: &mut dyn TokenWriter,
        ctx: &SerializeContext<'_>,
    ) -> Result<(), CodecError> {
        let inclusion = ctx.config().inclusion;
        out.write_start_object()?;

        for property in &self.properties {
            let value = property.accessor.read(bean)?;
            let serializer = ctx.serializer_for(property.accessor.ty())?;
            if excluded(inclusion, &*serializer, value.as_any()) {
                continue;
            }
            out.write_field_name(&property.name)?;
            serializer.serialize(value.as_any(), out, ctx)?;
        }

        if let Some((getter, value_ty)) = &self.any_getter {
            let serializer = ctx.serializer_for(value_ty)?;
            for (key, value) in getter.entries(bean)? {
                if excluded(inclusion, &*serializer, &*value) {
                    continue;
                }
                out.write_field_name(&key)?;
                serializer.serialize(&*value, out, ctx)?;
            }
        }

        Ok(out.write_end_object()?)
    }

    fn schema_type(&self) -> SchemaType {
        SchemaType::Object
    }
}

impl fmt::Debug for BeanSerializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanSerializer")
            .field("ty", self.desc.ty())
            .field("properties", &self.properties.iter().map(|p| &p.name).collect::<Vec<_>>())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// ValueMethodSerializer

/// Writes a bean as the result of its value method.
pub struct ValueMethodSerializer {
    method: MethodInfo,
    ty: TypeDescriptor,
}

impl ValueMethodSerializer {
    /// Returns `None` if the bean has no value method.
    pub fn new(desc: &BeanDescription) -> Result<Option<Self>, IntrospectionError> {
        let Some(method) = desc.find_value_method() else {
            return Ok(None);
        };
        let ty = method
            .value_type()
            .cloned()
            .ok_or_else(|| IntrospectionError::Inaccessible {
                ty: desc.ty().clone(),
                member: Arc::from(method.name()),
                reason: "value method returns nothing",
            })?;
        Ok(Some(Self {
            method: method.clone(),
            ty,
        }))
    }
}

impl ValueSerializer for ValueMethodSerializer {
    fn serialize(
        &self,
        bean: &dyn Any,
        out: &mut dyn TokenWriter,
        ctx: &SerializeContext<'_>,
    ) -> Result<(), CodecError> {
        let value = self.method.call(bean)?;
        ctx.write_value(&self.ty, &*value, out)
    }
}

// -----------------------------------------------------------------------------
// BeanDeserializer

enum Instantiation {
    /// Property values bound to creator parameters by index.
    Creator(CtorInfo),
    Default(CtorInfo),
}

/// Where a property value goes once read.
enum Target<'a> {
    CreatorParam(usize, &'a TypeDescriptor),
    Member(&'a MemberInfo),
}

/// Reads a bean from an object of its properties.
///
/// With a property-based creator, values of creator properties are gathered
/// first and the creator is invoked at the end of the object; otherwise the
/// default constructor is used. Remaining values are assigned through setters,
/// else fields. Names that match no property go to the ignored-name list,
/// then the any-setter, and are otherwise rejected or skipped depending on
/// [`fail_on_unknown_properties`].
///
/// [`fail_on_unknown_properties`]: crate::config::CodecConfig::fail_on_unknown_properties
pub struct BeanDeserializer {
    desc: Arc<BeanDescription>,
    instantiation: Instantiation,
}

impl BeanDeserializer {
    /// Fails with [`IntrospectionError::NoCreator`] for abstract types and
    /// types without a default constructor or creator.
    pub fn new(desc: Arc<BeanDescription>) -> Result<Self, IntrospectionError> {
        let instantiation = match (desc.find_property_creator(), desc.find_default_constructor()) {
            _ if desc.is_abstract() => None,
            (Some(creator), _) => Some(Instantiation::Creator(creator.clone())),
            (None, Some(ctor)) => Some(Instantiation::Default(ctor.clone())),
            (None, None) => None,
        };
        let instantiation = instantiation.ok_or_else(|| IntrospectionError::NoCreator(desc.ty().clone()))?;
        Ok(Self { desc, instantiation })
    }

    #[inline]
    pub fn description(&self) -> &Arc<BeanDescription> {
        &self.desc
    }

    fn uses_creator(&self) -> bool {
        matches!(self.instantiation, Instantiation::Creator(_))
    }

    fn missing(&self, name: &str) -> CodecError {
        CodecError::MissingProperty {
            ty: self.desc.ty().clone(),
            name: Arc::from(name),
        }
    }

    fn instantiate(
        &self,
        mut args: Vec<Option<Box<dyn Any>>>,
        ctx: &DeserializeContext<'_>,
    ) -> Result<Box<dyn Any>, CodecError> {
        let creator = match &self.instantiation {
            Instantiation::Default(ctor) => return Ok(ctor.construct(Vec::new())?),
            Instantiation::Creator(creator) => creator,
        };

        let mut values = Vec::with_capacity(creator.arity());
        for (param, slot) in creator.params().iter().zip(args.iter_mut()) {
            let value = match slot.take() {
                Some(value) => value,
                None => ctx
                    .deserializer_for(param.ty())?
                    .absent_value()
                    .ok_or_else(|| self.missing(param.name().unwrap_or_default()))?,
            };
            values.push(value);
        }
        Ok(creator.construct(values)?)
    }
}

impl ValueDeserializer for BeanDeserializer {
    fn deserialize(
        &self,
        input: &mut dyn TokenReader,
        ctx: &DeserializeContext<'_>,
    ) -> Result<Box<dyn Any>, CodecError> {
        let desc = &*self.desc;
        let config = ctx.config();

        let arity = match &self.instantiation {
            Instantiation::Creator(creator) => creator.arity(),
            Instantiation::Default(_) => 0,
        };
        let mut args: Vec<Option<Box<dyn Any>>> = (0..arity).map(|_| None).collect();
        let mut assignments: Vec<(&MemberInfo, Box<dyn Any>)> = Vec::new();
        let mut extras: Vec<(String, Box<dyn Any>)> = Vec::new();
        let mut seen: Vec<&str> = Vec::new();

        expect_token(input, Token::StartObject)?;
        loop {
            let name = match input.next_token()? {
                Some(Token::EndObject) => break,
                Some(Token::FieldName(name)) => name,
                other => return Err(CodecError::unexpected("field name", other)),
            };

            let Some(property) = desc.find_property(&name) else {
                if desc.is_ignored_property(&name) {
                    input.skip_value()?;
                } else if let Some(setter) = desc.find_any_setter() {
                    let value_ty = setter.value_type().ok_or_else(|| {
                        CodecError::Custom(format!("any-setter `{}` declares no value type", setter.name()))
                    })?;
                    extras.push((name, ctx.read_value(value_ty, input)?));
                } else if config.fail_on_unknown_properties {
                    return Err(CodecError::UnknownProperty { ty: desc.ty().clone(), name });
                } else {
                    warn!("skipping unknown property `{name}` of `{}`", desc.ty());
                    input.skip_value()?;
                }
                continue;
            };
            seen.push(property.name());

            let target = match (property.creator_index(), property.ctor_param(), property.mutator()) {
                (Some(index), Some(param), _) if self.uses_creator() => Target::CreatorParam(index, param.ty()),
                (_, _, Some(member)) => Target::Member(member),
                _ => {
                    input.skip_value()?;
                    continue;
                }
            };
            let ty = match target {
                Target::CreatorParam(_, ty) => ty,
                Target::Member(member) => member.ty(),
            };
            let deserializer = ctx.deserializer_for(ty)?;

            let value = if take_null(input)? {
                match deserializer.null_value() {
                    Some(value) => value,
                    None if config.fail_on_null_for_primitives => {
                        return Err(CodecError::invalid(ty, format!("null for property `{name}`")));
                    }
                    None => continue,
                }
            } else {
                deserializer.deserialize(input, ctx)?
            };

            match target {
                Target::CreatorParam(index, _) => {
                    if let Some(slot) = args.get_mut(index) {
                        *slot = Some(value);
                    }
                }
                Target::Member(member) => assignments.push((member, value)),
            }
        }

        if let Some(property) = desc
            .find_properties()
            .find(|p| p.is_required() && !seen.contains(&p.name()))
        {
            return Err(self.missing(property.name()));
        }

        let mut bean = self.instantiate(args, ctx)?;
        for (member, value) in assignments {
            member.write(&mut *bean, value)?;
        }
        if let Some(setter) = desc.find_any_setter() {
            for (key, value) in extras {
                setter.put_entry(&mut *bean, key, value)?;
            }
        }
        Ok(bean)
    }
}

impl fmt::Debug for BeanDeserializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanDeserializer")
            .field("ty", self.desc.ty())
            .field("creator", &self.uses_creator())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use vc_introspect::config::IntrospectionConfig;
    use vc_introspect::types::TypeDescriptor;

    use crate::config::{CodecConfig, Inclusion};
    use crate::fixtures::{self, Account, Color, Money, Person, Point, Profile, Tree};
    use crate::{CodecError, CodecRegistry};

    fn configured(config: CodecConfig) -> CodecRegistry {
        CodecRegistry::with_config(fixtures::table(), config, IntrospectionConfig::default())
    }

    fn ann() -> Person {
        Person {
            name: String::from("Ann"),
            age: 30,
            email: String::from("a@x"),
            password: String::from("secret"),
            internal: 1,
            extra: vec![(String::from("nick"), String::from("annie"))],
        }
    }

    #[test]
    fn bean_writes_visible_properties_then_any_getter() {
        let registry = fixtures::registry();
        assert_eq!(
            fixtures::to_json(&registry, &fixtures::person(), &ann()),
            r#"{"name":"Ann","age":30,"email":"a@x","nick":"annie"}"#
        );
        assert_eq!(fixtures::to_json(&registry, &fixtures::point(), &Point { x: 3 }), r#"{"x":3}"#);
    }

    #[test]
    fn creator_setters_and_any_setter_fill_the_bean() {
        let registry = fixtures::registry();
        let json = r#"{"email":"a@x","password":"p","nick":"annie","age":30,"name":"Ann","internal":9}"#;
        let value = fixtures::from_json(&registry, &fixtures::person(), json).unwrap();

        let expected = Person {
            password: String::new(),
            internal: 0,
            ..ann()
        };
        assert_eq!(value.downcast_ref::<Person>(), Some(&expected));
    }

    #[test]
    fn missing_required_creator_property_fails() {
        let registry = fixtures::registry();
        let err = fixtures::from_json(&registry, &fixtures::person(), r#"{"name":"Ann"}"#).unwrap_err();
        assert!(matches!(err, CodecError::MissingProperty { ref name, .. } if &**name == "age"));

        // Optional creator parameters take their absent value.
        let value = fixtures::from_json(&registry, &fixtures::person(), r#"{"age":4}"#).unwrap();
        let person = value.downcast_ref::<Person>().unwrap();
        assert_eq!((person.name.as_str(), person.age), ("", 4));
    }

    #[test]
    fn unknown_properties_fail_or_are_skipped() {
        let json = r#"{"y":[1,{"z":2}],"x":5}"#;

        let err = fixtures::from_json(&fixtures::registry(), &fixtures::point(), json).unwrap_err();
        assert!(matches!(err, CodecError::UnknownProperty { ref name, .. } if name == "y"));

        let lenient = configured(CodecConfig::default().with_fail_on_unknown_properties(false));
        let value = fixtures::from_json(&lenient, &fixtures::point(), json).unwrap();
        assert_eq!(value.downcast_ref::<Point>(), Some(&Point { x: 5 }));
    }

    #[test]
    fn names_of_ignored_accessors_are_skipped() {
        let registry = fixtures::registry();
        let ty = TypeDescriptor::simple("Account");

        let value = fixtures::from_json(&registry, &ty, r#"{"name":"ann","secret":"pw"}"#).unwrap();
        let expected = Account {
            name: String::from("ann"),
            secret: String::new(),
        };
        assert_eq!(value.downcast_ref::<Account>(), Some(&expected));

        let account = Account {
            secret: String::from("pw"),
            ..expected
        };
        assert_eq!(fixtures::to_json(&registry, &ty, &account), r#"{"name":"ann"}"#);
    }

    #[test]
    fn inclusion_filters_property_values() {
        let profile = Profile::default();
        let ty = fixtures::profile();

        let cases = [
            (Inclusion::Always, r#"{"nickname":null,"bio":""}"#),
            (Inclusion::NonNull, r#"{"bio":""}"#),
            (Inclusion::NonEmpty, "{}"),
        ];
        for (inclusion, expected) in cases {
            let registry = configured(CodecConfig::default().with_inclusion(inclusion));
            assert_eq!(fixtures::to_json(&registry, &ty, &profile), expected, "{inclusion:?}");
        }

        let registry = configured(CodecConfig::default().with_inclusion(Inclusion::NonEmpty));
        let profile = Profile {
            nickname: Some(String::from("kit")),
            bio: String::from("hi"),
        };
        assert_eq!(fixtures::to_json(&registry, &ty, &profile), r#"{"nickname":"kit","bio":"hi"}"#);
    }

    #[test]
    fn nulls_use_the_null_value_of_the_property_type() {
        let registry = fixtures::registry();

        let value = fixtures::from_json(&registry, &fixtures::profile(), r#"{"nickname":null,"bio":"b"}"#).unwrap();
        let profile = value.downcast_ref::<Profile>().unwrap();
        assert_eq!(profile.nickname, None);
        assert_eq!(profile.bio, "b");

        // A primitive has no null value, the property is left untouched.
        let value = fixtures::from_json(&registry, &fixtures::point(), r#"{"x":null}"#).unwrap();
        assert_eq!(value.downcast_ref::<Point>(), Some(&Point { x: 0 }));

        let strict = configured(CodecConfig::default().with_fail_on_null_for_primitives(true));
        let err = fixtures::from_json(&strict, &fixtures::point(), r#"{"x":null}"#).unwrap_err();
        assert!(matches!(err, CodecError::InvalidValue { .. }));
    }

    #[test]
    fn value_method_replaces_the_object() {
        let registry = fixtures::registry();
        let money = TypeDescriptor::simple("Money");
        assert_eq!(fixtures::to_json(&registry, &money, &Money { cents: 1250 }), "1250");
    }

    #[test]
    fn recursive_beans_round_trip() {
        let registry = fixtures::registry();
        let tree = Tree {
            name: String::from("root"),
            children: vec![
                Tree {
                    name: String::from("leaf"),
                    children: vec![],
                },
                Tree::default(),
            ],
        };

        let json = fixtures::to_json(&registry, &fixtures::tree(), &tree);
        assert_eq!(
            json,
            r#"{"name":"root","children":[{"name":"leaf","children":[]},{"name":"","children":[]}]}"#
        );
        let back = fixtures::from_json(&registry, &fixtures::tree(), &json).unwrap();
        assert_eq!(back.downcast_ref::<Tree>(), Some(&tree));
    }

    #[test]
    fn enums_use_names_or_indices() {
        let ty = fixtures::color();

        let registry = fixtures::registry();
        assert_eq!(fixtures::to_json(&registry, &ty, &Color::Green), r#""GREEN""#);
        let value = fixtures::from_json(&registry, &ty, r#""RED""#).unwrap();
        assert_eq!(value.downcast_ref::<Color>(), Some(&Color::Red));
        assert!(fixtures::from_json(&registry, &ty, r#""BLUE""#).is_err());

        let registry = configured(CodecConfig::default().with_enums_using_index(true));
        assert_eq!(fixtures::to_json(&registry, &ty, &Color::Green), "1");
        let value = fixtures::from_json(&registry, &ty, "1").unwrap();
        assert_eq!(value.downcast_ref::<Color>(), Some(&Color::Green));
    }
}
