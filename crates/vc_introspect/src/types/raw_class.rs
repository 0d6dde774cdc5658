use alloc::sync::Arc;
use core::fmt;

/// Names of the raw classes with built-in codecs.
pub mod well_known {
    pub const BOOL: &str = "bool";
    pub const CHAR: &str = "char";
    pub const I8: &str = "i8";
    pub const I16: &str = "i16";
    pub const I32: &str = "i32";
    pub const I64: &str = "i64";
    pub const U8: &str = "u8";
    pub const U16: &str = "u16";
    pub const U32: &str = "u32";
    pub const U64: &str = "u64";
    pub const F32: &str = "f32";
    pub const F64: &str = "f64";
    pub const STRING: &str = "String";
    /// A calendar date, `chrono::NaiveDate`.
    pub const DATE: &str = "Date";
    /// An instant in UTC, `chrono::DateTime<Utc>`.
    pub const DATE_TIME: &str = "DateTime";

    /// Every well-known class name.
    pub const ALL: &[&str] = &[
        BOOL, CHAR, I8, I16, I32, I64, U8, U16, U32, U64, F32, F64, STRING, DATE, DATE_TIME,
    ];
}

/// The identity of a class, without generic arguments.
///
/// Two raw classes are equal if their names are equal.
///
/// # Examples
///
/// ```
/// use vc_introspect::types::RawClass;
///
/// let a = RawClass::new("Person");
/// assert_eq!(a, RawClass::new(String::from("Person")));
/// assert!(!a.is_well_known());
/// assert!(RawClass::new("i32").is_well_known());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RawClass(Arc<str>);

impl RawClass {
    /// Creates a raw class with the given name.
    #[inline]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Returns the class name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the class has a built-in standard codec.
    pub fn is_well_known(&self) -> bool {
        well_known::ALL.contains(&self.name())
    }
}

impl From<&str> for RawClass {
    #[inline]
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for RawClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for RawClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}
