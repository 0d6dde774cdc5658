use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::sync::Arc;
use core::any::Any;

use vc_introspect::types::TypeDescriptor;

use crate::codec::{KeyDeserializer, ValueDeserializer, ValueSerializer};
use crate::config::{CodecConfig, DateKeyFormat};
use crate::registry::CodecRegistry;
use crate::standard::DateRef;
use crate::stream::{TokenReader, TokenWriter};
use crate::CodecError;

// -----------------------------------------------------------------------------
// SerializeContext

/// State shared by the serializers of one serialization pass.
#[derive(Debug, Clone, Copy)]
pub struct SerializeContext<'a> {
    registry: &'a CodecRegistry,
}

impl<'a> SerializeContext<'a> {
    #[inline]
    pub const fn new(registry: &'a CodecRegistry) -> Self {
        Self { registry }
    }

    #[inline]
    pub const fn registry(&self) -> &'a CodecRegistry {
        self.registry
    }

    #[inline]
    pub fn config(&self) -> &'a CodecConfig {
        self.registry.config()
    }

    /// Resolves the serializer of `ty`.
    pub fn serializer_for(&self, ty: &TypeDescriptor) -> Result<Arc<dyn ValueSerializer>, CodecError> {
        Ok(self.registry.get_serializer(ty)?)
    }

    /// Resolves the map-key serializer of `ty`.
    pub fn key_serializer_for(&self, ty: &TypeDescriptor) -> Result<Arc<dyn ValueSerializer>, CodecError> {
        Ok(self.registry.get_key_serializer(ty)?)
    }

    /// Writes `value`, an instance of `ty`, with the serializer of `ty`.
    pub fn write_value(
        &self,
        ty: &TypeDescriptor,
        value: &dyn Any,
        out: &mut dyn TokenWriter,
    ) -> Result<(), CodecError> {
        self.serializer_for(ty)?.serialize(value, out, self)
    }

    /// Writes a date value: epoch milliseconds, or text in the configured
    /// date format.
    pub fn default_serialize_date(&self, date: DateRef<'_>, out: &mut dyn TokenWriter) -> Result<(), CodecError> {
        let config = self.config();
        if config.write_dates_as_timestamps {
            out.write_i64(date.timestamp_millis())?;
        } else {
            out.write_str(&date.format(&config.date_format)?)?;
        }
        Ok(())
    }

    /// Writes a date used as a map key as a field name, rendered with the
    /// configured [`DateKeyFormat`].
    pub fn default_serialize_date_key(
        &self,
        date: DateRef<'_>,
        out: &mut dyn TokenWriter,
    ) -> Result<(), CodecError> {
        let name = match &self.config().date_key_format {
            DateKeyFormat::Timestamp => date.timestamp_millis().to_string(),
            DateKeyFormat::Pattern(pattern) => date.format(pattern)?,
        };
        Ok(out.write_field_name(&name)?)
    }
}

// -----------------------------------------------------------------------------
// DeserializeContext

/// State shared by the deserializers of one deserialization pass.
#[derive(Debug, Clone, Copy)]
pub struct DeserializeContext<'a> {
    registry: &'a CodecRegistry,
}

impl<'a> DeserializeContext<'a> {
    #[inline]
    pub const fn new(registry: &'a CodecRegistry) -> Self {
        Self { registry }
    }

    #[inline]
    pub const fn registry(&self) -> &'a CodecRegistry {
        self.registry
    }

    #[inline]
    pub fn config(&self) -> &'a CodecConfig {
        self.registry.config()
    }

    pub fn deserializer_for(&self, ty: &TypeDescriptor) -> Result<Arc<dyn ValueDeserializer>, CodecError> {
        Ok(self.registry.get_deserializer(ty)?)
    }

    pub fn key_deserializer_for(&self, ty: &TypeDescriptor) -> Result<Arc<dyn KeyDeserializer>, CodecError> {
        Ok(self.registry.get_key_deserializer(ty)?)
    }

    /// Reads one instance of `ty` with the deserializer of `ty`.
    pub fn read_value(&self, ty: &TypeDescriptor, input: &mut dyn TokenReader) -> Result<Box<dyn Any>, CodecError> {
        self.deserializer_for(ty)?.deserialize(input, self)
    }
}
