//! Codecs for the well-known scalar and date classes, enumerations,
//! containers and map keys.

// -----------------------------------------------------------------------------
// Modules

mod containers;
mod date;
mod enums;
mod key;
mod scalar;

// -----------------------------------------------------------------------------
// Exports

pub use containers::{MappingCodec, OptionalCodec, SequenceCodec};
pub use date::{DateCodec, DateRef, DateValue};
pub use enums::EnumCodec;
pub use key::{StdKeyDeserializer, StdKeySerializer};
pub use scalar::{ScalarCodec, ScalarValue};

use alloc::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use vc_introspect::types::{RawClass, well_known};

use crate::codec::{KeyDeserializer, ValueDeserializer, ValueSerializer};

// -----------------------------------------------------------------------------
// Lookup by raw class

macro_rules! well_known_codecs {
    ($raw:expr, $role:ty, $scalar:ident, $date:ident) => {
        match $raw.name() {
            well_known::BOOL => Some($scalar(ScalarCodec::<bool>::new())),
            well_known::CHAR => Some($scalar(ScalarCodec::<char>::new())),
            well_known::I8 => Some($scalar(ScalarCodec::<i8>::new())),
            well_known::I16 => Some($scalar(ScalarCodec::<i16>::new())),
            well_known::I32 => Some($scalar(ScalarCodec::<i32>::new())),
            well_known::I64 => Some($scalar(ScalarCodec::<i64>::new())),
            well_known::U8 => Some($scalar(ScalarCodec::<u8>::new())),
            well_known::U16 => Some($scalar(ScalarCodec::<u16>::new())),
            well_known::U32 => Some($scalar(ScalarCodec::<u32>::new())),
            well_known::U64 => Some($scalar(ScalarCodec::<u64>::new())),
            well_known::F32 => Some($scalar(ScalarCodec::<f32>::new())),
            well_known::F64 => Some($scalar(ScalarCodec::<f64>::new())),
            well_known::STRING => Some($scalar(ScalarCodec::<alloc::string::String>::new())),
            well_known::DATE => Some($date(DateCodec::<NaiveDate>::new())),
            well_known::DATE_TIME => Some($date(DateCodec::<DateTime<Utc>>::new())),
            _ => None::<Arc<$role>>,
        }
    };
}

/// The standard serializer of a well-known class.
pub(crate) fn serializer(raw: &RawClass) -> Option<Arc<dyn ValueSerializer>> {
    fn erase<C: ValueSerializer + 'static>(codec: C) -> Arc<dyn ValueSerializer> {
        Arc::new(codec)
    }
    well_known_codecs!(raw, dyn ValueSerializer, erase, erase)
}

/// The standard deserializer of a well-known class.
pub(crate) fn deserializer(raw: &RawClass) -> Option<Arc<dyn ValueDeserializer>> {
    fn erase<C: ValueDeserializer + 'static>(codec: C) -> Arc<dyn ValueDeserializer> {
        Arc::new(codec)
    }
    well_known_codecs!(raw, dyn ValueDeserializer, erase, erase)
}

/// The standard key deserializer of a well-known class.
pub(crate) fn key_deserializer(raw: &RawClass) -> Option<Arc<dyn KeyDeserializer>> {
    fn scalar<T: ScalarValue>(_: ScalarCodec<T>) -> Arc<dyn KeyDeserializer> {
        Arc::new(StdKeyDeserializer::scalar::<T>())
    }
    fn date<T: DateValue>(_: DateCodec<T>) -> Arc<dyn KeyDeserializer> {
        Arc::new(StdKeyDeserializer::date::<T>())
    }
    well_known_codecs!(raw, dyn KeyDeserializer, scalar, date)
}
