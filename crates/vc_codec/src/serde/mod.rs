//! Bridges codecs to `serde` data formats.
//!
//! Codecs write and read [`Token`](crate::stream::Token) streams. This module
//! connects those streams to any self-describing `serde` format:
//!
//! - [`TokenBuffer`](crate::stream::TokenBuffer) implements [`Serialize`] and
//!   [`Deserialize`]; objects become maps, arrays become sequences.
//! - [`SerializeDriver`]: serializes a type-erased value through the codec
//!   registered for its type.
//! - [`DeserializeDriver`]: a [`DeserializeSeed`] producing a boxed value of
//!   a given type through its codec.
//!
//! Because the data carries no type information, deserialization always
//! needs the target [`TypeDescriptor`](vc_introspect::types::TypeDescriptor).
//!
//! [`Serialize`]: serde_core::Serialize
//! [`Deserialize`]: serde_core::Deserialize
//! [`DeserializeSeed`]: serde_core::de::DeserializeSeed

// -----------------------------------------------------------------------------
// Modules

mod buffer;
mod driver;

// -----------------------------------------------------------------------------
// Exports

pub use driver::{DeserializeDriver, SerializeDriver};
