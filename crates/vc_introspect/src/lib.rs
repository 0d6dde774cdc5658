#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

// Description caches are guarded by `std::sync::RwLock`.
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod bean;
mod collector;
mod error;
mod introspector;
mod member;
mod property;
mod resolver;

pub mod class;
pub mod config;
pub mod hash;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use bean::{BeanDescription, MemberMap};
pub use collector::{CollectedMembers, MemberCollector};
pub use error::{ConflictError, IntrospectionError, ResolveError};
pub use introspector::ClassIntrospector;
pub use member::{CtorInfo, CtorParamInfo, MemberAccess, MemberInfo, MemberKind};
pub use member::{MethodInfo, SpecialKind};
pub use property::PropertyDefinition;
pub use resolver::{PropertyResolver, Resolution};
