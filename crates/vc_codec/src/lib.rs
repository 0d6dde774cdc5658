#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

// Codec caches are guarded by `std::sync::RwLock`.
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;

pub mod codec;
pub mod config;
pub mod registry;
pub mod serde;
pub mod standard;
pub mod stream;

#[cfg(test)]
pub(crate) mod fixtures;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::{CodecError, CodecResolutionError, ResolutionFailure, StreamError};
pub use registry::CodecRegistry;
