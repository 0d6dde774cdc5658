//! Class metadata consumed by introspection.
//!
//! The crate does not discover members by itself. A [`ClassProvider`]
//! describes each class as a [`ClassDef`]: its kind, supertypes, declared
//! fields, methods and constructors, together with type-erased accessors that
//! operate on `&dyn Any` instances.
//!
//! [`ClassTable`] is a map-based provider, usually filled through the typed
//! [`ClassBuilder`].
//!
//! ## Menu
//!
//! - [`ClassDef`], [`ClassKind`]: the description of one class.
//! - [`FieldDef`], [`MethodDef`], [`CtorDef`], [`ParamDef`], [`SupertypeDef`]: declared members.
//! - [`Annotations`], [`Marker`]: declarative hints attached to classes and members.
//! - [`Visibility`]: declared access level of a member.
//! - [`ClassBuilder`], [`CtorArgs`]: typed construction of a [`ClassDef`].
//! - [`ClassProvider`], [`ClassTable`]: metadata lookup.
//! - [`AccessError`], [`Accessed`]: results of erased accessors.

// -----------------------------------------------------------------------------
// Modules

mod access;
mod annotations;
mod builder;
mod def;
mod provider;

// -----------------------------------------------------------------------------
// Exports

pub use access::{AccessError, Accessed};
pub use access::{AnyGetterFn, AnySetterFn, CtorFn, DisplayFn};
pub use access::{FieldGetFn, FieldSetFn, GetterFn, SetterFn};
pub use access::{UpcastFn, UpcastMutFn};
pub use annotations::{Annotations, Marker};
pub use builder::{ClassBuilder, CtorArgs};
pub use def::{ClassDef, ClassKind, CtorDef, FieldDef, MethodAccess, MethodDef};
pub use def::{EnumAccess, MappingAccess, OptionalAccess, SequenceAccess};
pub use def::{ParamDef, SupertypeDef, Visibility};
pub use provider::{ClassProvider, ClassTable};

pub(crate) use access::compose;
