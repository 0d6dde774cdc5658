use alloc::sync::Arc;
use alloc::vec::Vec;

use thiserror::Error;

use crate::member::{MemberKind, SpecialKind};
use crate::types::TypeDescriptor;

// -----------------------------------------------------------------------------
// IntrospectionError

/// A type could not be fully enumerated.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum IntrospectionError {
    #[error("no class metadata is available for `{0}`")]
    UnknownClass(TypeDescriptor),

    #[error("type parameter #{index} is not bound, only {bound} binding(s) available")]
    UnboundTypeParameter { index: usize, bound: usize },

    #[error("class hierarchy of `{0}` is cyclic")]
    CyclicHierarchy(TypeDescriptor),

    #[error("`{0}` has no usable constructor: it is abstract or declares neither a default constructor nor a creator")]
    NoCreator(TypeDescriptor),

    #[error("member `{member}` of `{ty}` is unusable: {reason}")]
    Inaccessible {
        ty: TypeDescriptor,
        member: Arc<str>,
        reason: &'static str,
    },
}

// -----------------------------------------------------------------------------
// ConflictError

/// Two members claim the same role.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum ConflictError {
    #[error("multiple {kind} definitions in `{ty}`: {}", .members.join(", "))]
    DuplicateSpecial {
        ty: TypeDescriptor,
        kind: SpecialKind,
        members: Vec<Arc<str>>,
    },

    #[error("conflicting {kind} definitions for property `{property}` of `{ty}`: `{first}` vs `{second}`")]
    DuplicateAccessor {
        ty: TypeDescriptor,
        property: Arc<str>,
        kind: MemberKind,
        first: Arc<str>,
        second: Arc<str>,
    },

    #[error("parameter #{index} of the creator of `{ty}` has no name")]
    UnnamedCreatorParameter { ty: TypeDescriptor, index: usize },
}

// -----------------------------------------------------------------------------
// ResolveError

/// Failure of a complete introspection pass, collection plus resolution.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum ResolveError {
    #[error(transparent)]
    Introspection(#[from] IntrospectionError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),
}
