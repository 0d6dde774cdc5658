use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use crate::CodecError;
use crate::codec::{DeserializeContext, SerializeContext};
use crate::stream::{TokenReader, TokenWriter};

/// The schema category a serializer produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    Any,
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl SchemaType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Writes values of one type as tokens.
///
/// `value` is an instance of the type the serializer was resolved for;
/// implementations downcast it and report a mismatch as
/// [`AccessError`](vc_introspect::class::AccessError).
pub trait ValueSerializer: Send + Sync {
    fn serialize(
        &self,
        value: &dyn Any,
        out: &mut dyn TokenWriter,
        ctx: &SerializeContext<'_>,
    ) -> Result<(), CodecError>;

    /// Returns `true` if `value` is written as null.
    fn is_null(&self, _value: &dyn Any) -> bool {
        false
    }

    /// Returns `true` if `value` counts as empty for
    /// [`Inclusion::NonEmpty`](crate::config::Inclusion::NonEmpty).
    fn is_empty(&self, value: &dyn Any) -> bool {
        self.is_null(value)
    }

    /// Returns `true` if a registration for a raw class also serves every
    /// parameterization of it.
    fn binding_agnostic(&self) -> bool {
        false
    }

    fn schema_type(&self) -> SchemaType {
        SchemaType::Any
    }
}

/// Reads values of one type from tokens.
pub trait ValueDeserializer: Send + Sync {
    fn deserialize(
        &self,
        input: &mut dyn TokenReader,
        ctx: &DeserializeContext<'_>,
    ) -> Result<Box<dyn Any>, CodecError>;

    /// The value an explicit null stands for; `None` if null is not allowed.
    fn null_value(&self) -> Option<Box<dyn Any>> {
        None
    }

    /// The value used for a creator parameter missing from the input.
    fn absent_value(&self) -> Option<Box<dyn Any>> {
        self.null_value()
    }

    /// See [`ValueSerializer::binding_agnostic`].
    fn binding_agnostic(&self) -> bool {
        false
    }
}

/// Parses map keys of one type from field names.
pub trait KeyDeserializer: Send + Sync {
    fn deserialize_key(&self, key: &str, ctx: &DeserializeContext<'_>) -> Result<Box<dyn Any>, CodecError>;

    /// See [`ValueSerializer::binding_agnostic`].
    fn binding_agnostic(&self) -> bool {
        false
    }
}
