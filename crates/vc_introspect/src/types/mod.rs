//! Resolved and declared type handles.
//!
//! - [`RawClass`]: identity of a class, independent of generic arguments.
//! - [`TypeDescriptor`]: a fully resolved type, a raw class plus its bindings.
//! - [`TypeRef`]: a type as *declared* in class metadata, which may mention
//!   the generic parameters of the declaring class.
//! - [`KnownType`]: maps Rust types onto the well-known raw classes handled by
//!   the standard codecs.

// -----------------------------------------------------------------------------
// Modules

mod descriptor;
mod known;
mod raw_class;
mod type_ref;

// -----------------------------------------------------------------------------
// Exports

pub use descriptor::TypeDescriptor;
pub use known::KnownType;
pub use raw_class::{RawClass, well_known};
pub use type_ref::TypeRef;
