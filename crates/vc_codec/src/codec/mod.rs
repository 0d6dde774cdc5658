//! Codec traits and the bean codecs.
//!
//! A codec is a trait object: [`ValueSerializer`] writes a type-erased value
//! as tokens, [`ValueDeserializer`] reads tokens back into a boxed value. Map
//! keys use a [`ValueSerializer`] that writes a field name, and a
//! [`KeyDeserializer`] that parses one.
//!
//! Codecs resolve the codecs of nested values lazily through the
//! [`SerializeContext`] / [`DeserializeContext`] they are handed, so
//! self-referential types need no special treatment.

// -----------------------------------------------------------------------------
// Modules

mod bean;
mod context;
mod traits;

// -----------------------------------------------------------------------------
// Exports

pub use bean::{BeanDeserializer, BeanSerializer, ValueMethodSerializer};
pub use context::{DeserializeContext, SerializeContext};
pub use traits::{KeyDeserializer, SchemaType, ValueDeserializer, ValueSerializer};

use crate::CodecError;
use crate::stream::{Token, TokenReader};

/// Consumes the next token, which must be `expected`.
pub(crate) fn expect_token(
    input: &mut dyn TokenReader,
    expected: Token,
) -> Result<(), CodecError> {
    match input.next_token()? {
        Some(token) if token == expected => Ok(()),
        other => Err(CodecError::unexpected(expected.describe(), other)),
    }
}

/// Consumes a null token if one is next.
pub(crate) fn take_null(input: &mut dyn TokenReader) -> Result<bool, CodecError> {
    if matches!(input.peek_token()?, Some(Token::Scalar(scalar)) if scalar.is_null()) {
        input.next_token()?;
        return Ok(true);
    }
    Ok(false)
}
