use alloc::boxed::Box;
use alloc::format;
use core::any::Any;

use vc_introspect::class::EnumAccess;
use vc_introspect::types::TypeDescriptor;

use crate::CodecError;
use crate::codec::{DeserializeContext, SchemaType, SerializeContext};
use crate::codec::{ValueDeserializer, ValueSerializer};
use crate::stream::{Scalar, Token, TokenReader, TokenWriter};

/// Reads and writes enumeration values by variant name, or by variant index
/// when [`write_enums_using_index`] is set.
///
/// Both forms are accepted when reading.
///
/// [`write_enums_using_index`]: crate::config::CodecConfig::write_enums_using_index
pub struct EnumCodec {
    ty: TypeDescriptor,
    access: EnumAccess,
}

impl EnumCodec {
    pub fn new(ty: &TypeDescriptor, access: &EnumAccess) -> Self {
        Self {
            ty: ty.clone(),
            access: access.clone(),
        }
    }
}

impl ValueSerializer for EnumCodec {
    fn serialize(
        &self,
        value: &dyn Any,
        out: &mut dyn TokenWriter,
        ctx: &SerializeContext<'_>,
    ) -> Result<(), CodecError> {
        if ctx.config().write_enums_using_index {
            let index = (self.access.index_of)(value)?;
            out.write_u64(index as u64)?;
        } else {
            out.write_str(self.access.name_of(value)?)?;
        }
        Ok(())
    }

    fn schema_type(&self) -> SchemaType {
        SchemaType::String
    }
}

impl ValueDeserializer for EnumCodec {
    fn deserialize(
        &self,
        input: &mut dyn TokenReader,
        _ctx: &DeserializeContext<'_>,
    ) -> Result<Box<dyn Any>, CodecError> {
        let value = match input.next_token()? {
            Some(Token::Scalar(Scalar::Str(name))) => self.access.by_name(&name),
            Some(Token::Scalar(Scalar::U64(index))) => {
                usize::try_from(index).ok().and_then(|i| (self.access.from_index)(i))
            }
            Some(Token::Scalar(Scalar::I64(index))) => {
                usize::try_from(index).ok().and_then(|i| (self.access.from_index)(i))
            }
            other => return Err(CodecError::unexpected("enum variant", other)),
        };
        value.ok_or_else(|| CodecError::invalid(&self.ty, format!("not one of {:?}", self.access.variants)))
    }
}
