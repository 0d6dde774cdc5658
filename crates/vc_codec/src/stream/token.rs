use alloc::string::String;
use core::fmt;

/// A leaf value in a token stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    Str(String),
}

impl Scalar {
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string content of a [`Scalar::Str`].
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => fmt::Display::fmt(v, f),
            Self::I64(v) => fmt::Display::fmt(v, f),
            Self::U64(v) => fmt::Display::fmt(v, f),
            Self::F64(v) => fmt::Display::fmt(v, f),
            Self::Str(v) => fmt::Debug::fmt(v, f),
        }
    }
}

/// One structural event of a token stream.
///
/// A value is either a single [`Token::Scalar`], or a `Start*` token followed
/// by its content and the matching `End*` token. Inside an object every value
/// is preceded by a [`Token::FieldName`].
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    FieldName(String),
    Scalar(Scalar),
}

impl Token {
    /// A short description for diagnostics.
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::StartObject => "start of object",
            Self::EndObject => "end of object",
            Self::StartArray => "start of array",
            Self::EndArray => "end of array",
            Self::FieldName(_) => "field name",
            Self::Scalar(Scalar::Null) => "null",
            Self::Scalar(_) => "scalar",
        }
    }
}

impl From<Scalar> for Token {
    #[inline]
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}
