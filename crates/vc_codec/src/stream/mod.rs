//! Token streams produced and consumed by codecs.
//!
//! Codecs never see a concrete data format. They write through a
//! [`TokenWriter`] and read through a [`TokenReader`]; [`TokenBuffer`] is the
//! in-memory implementation of both, and the [`serde`](crate::serde) bridge
//! moves buffers to and from any serde data format.

// -----------------------------------------------------------------------------
// Modules

mod buffer;
mod reader;
mod token;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use buffer::{BufferReader, TokenBuffer};
pub use reader::TokenReader;
pub use token::{Scalar, Token};
pub use writer::TokenWriter;
