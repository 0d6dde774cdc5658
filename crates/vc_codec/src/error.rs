use alloc::string::String;
use alloc::sync::Arc;

use thiserror::Error;
use vc_introspect::{IntrospectionError, ResolveError};
use vc_introspect::class::AccessError;
use vc_introspect::types::TypeDescriptor;

use crate::stream::Token;

// -----------------------------------------------------------------------------
// CodecResolutionError

/// Why a codec could not be built.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum ResolutionFailure {
    #[error(transparent)]
    Introspection(#[from] ResolveError),

    #[error("no {0} is available")]
    Unsupported(&'static str),
}

impl From<IntrospectionError> for ResolutionFailure {
    #[inline]
    fn from(value: IntrospectionError) -> Self {
        Self::Introspection(ResolveError::Introspection(value))
    }
}

/// No codec could be found or built for a type.
///
/// Failures are never cached; a later lookup of the same type retries.
#[derive(Debug, Error, Clone)]
#[error("cannot resolve a codec for `{ty}`: {source}")]
pub struct CodecResolutionError {
    pub ty: TypeDescriptor,
    #[source]
    pub source: ResolutionFailure,
}

// -----------------------------------------------------------------------------
// StreamError

/// A token stream was used out of structure or ended early.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum StreamError {
    #[error("unexpected end of token stream")]
    UnexpectedEnd,

    #[error("`{0}` does not close the innermost open container")]
    Unbalanced(&'static str),

    #[error("field name written outside of an object")]
    FieldNameOutsideObject,

    #[error("value written inside an object without a field name")]
    MissingFieldName,

    #[error("a complete value has already been written")]
    TrailingValue,

    #[error("{0}")]
    Custom(Arc<str>),
}

// -----------------------------------------------------------------------------
// CodecError

/// Failure while serializing or deserializing a value.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodecError {
    #[error(transparent)]
    Resolution(#[from] CodecResolutionError),

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("expected {expected}, found {found:?}")]
    UnexpectedToken {
        expected: &'static str,
        found: Option<Token>,
    },

    #[error("missing required property `{name}` of `{ty}`")]
    MissingProperty { ty: TypeDescriptor, name: Arc<str> },

    #[error("unknown property `{name}` of `{ty}`")]
    UnknownProperty { ty: TypeDescriptor, name: String },

    #[error("invalid value for `{ty}`: {message}")]
    InvalidValue { ty: TypeDescriptor, message: String },

    #[error("{0}")]
    Custom(String),
}

impl CodecError {
    /// An unexpected token, or the end of the stream.
    #[inline]
    pub fn unexpected(expected: &'static str, found: Option<Token>) -> Self {
        Self::UnexpectedToken { expected, found }
    }

    pub fn invalid(ty: &TypeDescriptor, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            ty: ty.clone(),
            message: message.into(),
        }
    }
}
