use alloc::string::String;
use core::any::Any;

use chrono::{DateTime, NaiveDate, Utc};

use crate::types::well_known;

/// A Rust type backing one of the [well-known] raw classes.
///
/// The standard codecs downcast values of these classes to exactly these
/// Rust types.
///
/// [well-known]: crate::types::well_known
pub trait KnownType: Any {
    /// The raw class name.
    const CLASS: &'static str;
}

macro_rules! impl_known_type {
    ($($ty:ty => $class:expr),* $(,)?) => {
        $(
            impl KnownType for $ty {
                const CLASS: &'static str = $class;
            }
        )*
    };
}

impl_known_type! {
    bool => well_known::BOOL,
    char => well_known::CHAR,
    i8 => well_known::I8,
    i16 => well_known::I16,
    i32 => well_known::I32,
    i64 => well_known::I64,
    u8 => well_known::U8,
    u16 => well_known::U16,
    u32 => well_known::U32,
    u64 => well_known::U64,
    f32 => well_known::F32,
    f64 => well_known::F64,
    String => well_known::STRING,
    NaiveDate => well_known::DATE,
    DateTime<Utc> => well_known::DATE_TIME,
}
