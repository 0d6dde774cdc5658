use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use vc_introspect::IntrospectionError;
use vc_introspect::class::{MappingAccess, OptionalAccess, SequenceAccess};
use vc_introspect::types::TypeDescriptor;

use crate::codec::{DeserializeContext, SchemaType, SerializeContext, expect_token, take_null};
use crate::codec::{ValueDeserializer, ValueSerializer};
use crate::stream::{Token, TokenReader, TokenWriter};
use crate::{CodecError, StreamError};

// -----------------------------------------------------------------------------
// SequenceCodec

/// Reads and writes sequences as arrays.
pub struct SequenceCodec {
    access: SequenceAccess,
    element: TypeDescriptor,
}

impl SequenceCodec {
    /// Creates the codec of `ty`, resolving the element type against its
    /// bindings.
    pub fn new(ty: &TypeDescriptor, access: &SequenceAccess) -> Result<Self, IntrospectionError> {
        Ok(Self {
            element: access.element.resolve(ty.bindings())?,
            access: access.clone(),
        })
    }

    #[inline]
    pub fn element_type(&self) -> &TypeDescriptor {
        &self.element
    }
}

impl ValueSerializer for SequenceCodec {
    fn serialize(
        &self,
        value: &dyn Any,
        out: &mut dyn TokenWriter,
        ctx: &SerializeContext<'_>,
    ) -> Result<(), CodecError> {
        let elements = (self.access.iter)(value)?;
        let serializer = ctx.serializer_for(&self.element)?;

        out.write_start_array()?;
        for element in elements {
            serializer.serialize(element, out, ctx)?;
        }
        Ok(out.write_end_array()?)
    }

    fn is_empty(&self, value: &dyn Any) -> bool {
        (self.access.iter)(value).is_ok_and(|elements| elements.is_empty())
    }

    fn schema_type(&self) -> SchemaType {
        SchemaType::Array
    }
}

impl ValueDeserializer for SequenceCodec {
    fn deserialize(
        &self,
        input: &mut dyn TokenReader,
        ctx: &DeserializeContext<'_>,
    ) -> Result<Box<dyn Any>, CodecError> {
        expect_token(input, Token::StartArray)?;
        let deserializer = ctx.deserializer_for(&self.element)?;

        let mut items = Vec::new();
        loop {
            match input.peek_token()? {
                Some(Token::EndArray) => {
                    input.next_token()?;
                    break;
                }
                Some(_) => items.push(deserializer.deserialize(input, ctx)?),
                None => return Err(StreamError::UnexpectedEnd.into()),
            }
        }
        Ok((self.access.build)(items)?)
    }
}

// -----------------------------------------------------------------------------
// MappingCodec

/// Reads and writes mappings as objects whose field names are the keys.
pub struct MappingCodec {
    access: MappingAccess,
    key: TypeDescriptor,
    value: TypeDescriptor,
}

impl MappingCodec {
    pub fn new(ty: &TypeDescriptor, access: &MappingAccess) -> Result<Self, IntrospectionError> {
        Ok(Self {
            key: access.key.resolve(ty.bindings())?,
            value: access.value.resolve(ty.bindings())?,
            access: access.clone(),
        })
    }

    #[inline]
    pub fn key_type(&self) -> &TypeDescriptor {
        &self.key
    }

    #[inline]
    pub fn value_type(&self) -> &TypeDescriptor {
        &self.value
    }
}

impl ValueSerializer for MappingCodec {
    fn serialize(
        &self,
        value: &dyn Any,
        out: &mut dyn TokenWriter,
        ctx: &SerializeContext<'_>,
    ) -> Result<(), CodecError> {
        let entries = (self.access.entries)(value)?;
        let keys = ctx.key_serializer_for(&self.key)?;
        let values = ctx.serializer_for(&self.value)?;

        out.write_start_object()?;
        for (key, value) in entries {
            keys.serialize(key, out, ctx)?;
            values.serialize(value, out, ctx)?;
        }
        Ok(out.write_end_object()?)
    }

    fn is_empty(&self, value: &dyn Any) -> bool {
        (self.access.entries)(value).is_ok_and(|entries| entries.is_empty())
    }

    fn schema_type(&self) -> SchemaType {
        SchemaType::Object
    }
}

impl ValueDeserializer for MappingCodec {
    fn deserialize(
        &self,
        input: &mut dyn TokenReader,
        ctx: &DeserializeContext<'_>,
    ) -> Result<Box<dyn Any>, CodecError> {
        expect_token(input, Token::StartObject)?;
        let keys = ctx.key_deserializer_for(&self.key)?;
        let values = ctx.deserializer_for(&self.value)?;

        let mut entries = Vec::new();
        loop {
            match input.next_token()? {
                Some(Token::EndObject) => break,
                Some(Token::FieldName(name)) => {
                    let key = keys.deserialize_key(&name, ctx)?;
                    entries.push((key, values.deserialize(input, ctx)?));
                }
                other => return Err(CodecError::unexpected("field name", other)),
            }
        }
        Ok((self.access.build)(entries)?)
    }
}

// -----------------------------------------------------------------------------
// OptionalCodec

/// Reads and writes optionals: `None` is null, `Some(v)` is `v`.
pub struct OptionalCodec {
    access: OptionalAccess,
    inner: TypeDescriptor,
}

impl OptionalCodec {
    pub fn new(ty: &TypeDescriptor, access: &OptionalAccess) -> Result<Self, IntrospectionError> {
        Ok(Self {
            inner: access.inner.resolve(ty.bindings())?,
            access: access.clone(),
        })
    }
}

impl ValueSerializer for OptionalCodec {
    fn serialize(
        &self,
        value: &dyn Any,
        out: &mut dyn TokenWriter,
        ctx: &SerializeContext<'_>,
    ) -> Result<(), CodecError> {
        match (self.access.get)(value)? {
            Some(inner) => ctx.write_value(&self.inner, inner, out),
            None => Ok(out.write_null()?),
        }
    }

    fn is_null(&self, value: &dyn Any) -> bool {
        (self.access.get)(value).is_ok_and(|inner| inner.is_none())
    }
}

impl ValueDeserializer for OptionalCodec {
    fn deserialize(
        &self,
        input: &mut dyn TokenReader,
        ctx: &DeserializeContext<'_>,
    ) -> Result<Box<dyn Any>, CodecError> {
        if take_null(input)? {
            return Ok((self.access.wrap)(None)?);
        }
        let inner = ctx.read_value(&self.inner, input)?;
        Ok((self.access.wrap)(Some(inner))?)
    }

    fn null_value(&self) -> Option<Box<dyn Any>> {
        (self.access.wrap)(None).ok()
    }
}
