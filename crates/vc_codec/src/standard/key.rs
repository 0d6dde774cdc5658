use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use core::any::Any;
use core::fmt;

use vc_introspect::class::{ClassDef, ClassKind, DisplayFn, EnumAccess};
use vc_introspect::types::TypeDescriptor;

use crate::CodecError;
use crate::codec::{DeserializeContext, KeyDeserializer, SchemaType, SerializeContext, ValueSerializer};
use crate::config::DateKeyFormat;
use crate::standard::date::from_millis;
use crate::standard::scalar::canonical_text;
use crate::standard::{DateRef, DateValue, ScalarValue};
use crate::stream::TokenWriter;

// -----------------------------------------------------------------------------
// StdKeySerializer

#[derive(Clone)]
enum KeyText {
    Enum(EnumAccess),
    Display(DisplayFn),
}

/// Writes map keys as field names.
///
/// Dates and instants are rendered through
/// [`SerializeContext::default_serialize_date_key`]. Every other key is
/// written as its text form: the text of a scalar, the variant name of an
/// enumeration, or the display routine of its class.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use vc_codec::CodecRegistry;
/// use vc_codec::codec::SerializeContext;
/// use vc_codec::codec::ValueSerializer;
/// use vc_codec::standard::StdKeySerializer;
/// use vc_codec::stream::{Token, TokenBuffer, TokenWriter};
/// use vc_introspect::class::ClassTable;
///
/// let registry = CodecRegistry::new(ClassTable::new());
/// let ctx = SerializeContext::new(&registry);
/// let keys = StdKeySerializer::new();
///
/// let mut out = TokenBuffer::new();
/// out.write_start_object().unwrap();
/// keys.serialize(&NaiveDate::from_ymd_opt(1970, 1, 2).unwrap(), &mut out, &ctx).unwrap();
/// out.write_null().unwrap();
/// keys.serialize(&String::from("abc"), &mut out, &ctx).unwrap();
/// out.write_null().unwrap();
///
/// assert_eq!(out.tokens()[1], Token::FieldName("1970-01-02T00:00:00.000+0000".into()));
/// assert_eq!(out.tokens()[3], Token::FieldName("abc".into()));
/// assert_eq!(keys.schema_type().as_str(), "string");
/// ```
#[derive(Clone)]
pub struct StdKeySerializer {
    text: Option<KeyText>,
}

impl StdKeySerializer {
    /// A serializer for scalar and date keys.
    #[inline]
    pub const fn new() -> Self {
        Self { text: None }
    }

    /// A serializer for keys of `class`, or `None` if its instances have no
    /// text form.
    pub fn for_class(class: &ClassDef) -> Option<Self> {
        let text = match class.kind() {
            ClassKind::Enum(access) => KeyText::Enum(access.clone()),
            _ => KeyText::Display(class.display()?.clone()),
        };
        Some(Self { text: Some(text) })
    }
}

impl Default for StdKeySerializer {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ValueSerializer for StdKeySerializer {
    fn serialize(
        &self,
        value: &dyn Any,
        out: &mut dyn TokenWriter,
        ctx: &SerializeContext<'_>,
    ) -> Result<(), CodecError> {
        if let Some(date) = DateRef::from_any(value) {
            return ctx.default_serialize_date_key(date, out);
        }

        let text = match (canonical_text(value), &self.text) {
            (Some(text), _) => text,
            (None, Some(KeyText::Enum(access))) => String::from(&**access.name_of(value)?),
            (None, Some(KeyText::Display(display))) => display(value)?,
            (None, None) => return Err(CodecError::Custom(String::from("map key has no text form"))),
        };
        Ok(out.write_field_name(&text)?)
    }

    fn schema_type(&self) -> SchemaType {
        SchemaType::String
    }
}

impl fmt::Debug for StdKeySerializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match &self.text {
            None => "scalar",
            Some(KeyText::Enum(_)) => "enum",
            Some(KeyText::Display(_)) => "display",
        };
        f.debug_struct("StdKeySerializer").field("text", &text).finish()
    }
}

// -----------------------------------------------------------------------------
// StdKeyDeserializer

type ParseScalar = fn(&str) -> Option<Box<dyn Any>>;
type ParseDate = fn(&str, &DateKeyFormat) -> Option<Box<dyn Any>>;

#[derive(Clone)]
enum KeyParse {
    Scalar(ParseScalar),
    Date(ParseDate),
    Enum(EnumAccess),
}

/// Parses map keys of scalar, date and enumeration types.
#[derive(Clone)]
pub struct StdKeyDeserializer {
    ty: TypeDescriptor,
    parse: KeyParse,
}

fn parse_date_key<T: DateValue>(text: &str, format: &DateKeyFormat) -> Option<Box<dyn Any>> {
    let value: T = match format {
        DateKeyFormat::Timestamp => from_millis(text.parse().ok()?)?,
        DateKeyFormat::Pattern(pattern) => T::parse_text(text, pattern)?,
    };
    Some(Box::new(value))
}

impl StdKeyDeserializer {
    pub fn scalar<T: ScalarValue>() -> Self {
        Self {
            ty: TypeDescriptor::of::<T>(),
            parse: KeyParse::Scalar(|text| T::parse_text(text).map(|v| Box::new(v) as Box<dyn Any>)),
        }
    }

    /// Parses keys written with the configured [`DateKeyFormat`].
    pub fn date<T: DateValue>() -> Self {
        Self {
            ty: TypeDescriptor::of::<T>(),
            parse: KeyParse::Date(parse_date_key::<T>),
        }
    }

    /// Parses variant names of the enumeration `ty`.
    pub fn enumeration(ty: &TypeDescriptor, access: &EnumAccess) -> Self {
        Self {
            ty: ty.clone(),
            parse: KeyParse::Enum(access.clone()),
        }
    }
}

impl KeyDeserializer for StdKeyDeserializer {
    fn deserialize_key(&self, key: &str, ctx: &DeserializeContext<'_>) -> Result<Box<dyn Any>, CodecError> {
        let value = match &self.parse {
            KeyParse::Scalar(parse) => parse(key),
            KeyParse::Date(parse) => parse(key, &ctx.config().date_key_format),
            KeyParse::Enum(access) => access.by_name(key),
        };
        value.ok_or_else(|| CodecError::invalid(&self.ty, format!("cannot parse map key `{key}`")))
    }
}

impl fmt::Debug for StdKeyDeserializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdKeyDeserializer").field("ty", &self.ty).finish_non_exhaustive()
    }
}
