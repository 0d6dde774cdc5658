use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use thiserror::Error;

// -----------------------------------------------------------------------------
// AccessError

/// Failure of a type-erased accessor.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum AccessError {
    #[error("expected an instance of `{expected}`")]
    TypeMismatch { expected: &'static str },

    #[error("member `{0}` is read-only")]
    ReadOnly(Arc<str>),

    #[error("member `{0}` does not support this access")]
    Unsupported(Arc<str>),

    #[error("expected {expected} argument(s), received {actual}")]
    Arity { expected: usize, actual: usize },

    #[error("{0}")]
    Failed(Arc<str>),
}

impl AccessError {
    /// A mismatch against the Rust type `T`.
    #[inline]
    pub fn mismatch<T: ?Sized>() -> Self {
        Self::TypeMismatch {
            expected: core::any::type_name::<T>(),
        }
    }
}

// -----------------------------------------------------------------------------
// Accessor signatures

/// Borrows a field of an instance.
pub type FieldGetFn =
    Arc<dyn for<'a> Fn(&'a dyn Any) -> Result<&'a dyn Any, AccessError> + Send + Sync>;

/// Replaces a field of an instance.
pub type FieldSetFn = Arc<dyn Fn(&mut dyn Any, Box<dyn Any>) -> Result<(), AccessError> + Send + Sync>;

/// Calls a zero-argument method returning a value.
pub type GetterFn = Arc<dyn Fn(&dyn Any) -> Result<Box<dyn Any>, AccessError> + Send + Sync>;

/// Calls a one-argument method.
pub type SetterFn = FieldSetFn;

/// Calls a method returning additional key/value pairs.
pub type AnyGetterFn =
    Arc<dyn Fn(&dyn Any) -> Result<Vec<(String, Box<dyn Any>)>, AccessError> + Send + Sync>;

/// Calls a method accepting one additional key/value pair.
pub type AnySetterFn =
    Arc<dyn Fn(&mut dyn Any, String, Box<dyn Any>) -> Result<(), AccessError> + Send + Sync>;

/// Invokes a constructor with boxed arguments.
pub type CtorFn = Arc<dyn Fn(Vec<Box<dyn Any>>) -> Result<Box<dyn Any>, AccessError> + Send + Sync>;

/// Views an instance as its supertype part.
pub type UpcastFn =
    Arc<dyn for<'a> Fn(&'a dyn Any) -> Result<&'a dyn Any, AccessError> + Send + Sync>;

/// Views an instance as its mutable supertype part.
pub type UpcastMutFn =
    Arc<dyn for<'a> Fn(&'a mut dyn Any) -> Result<&'a mut dyn Any, AccessError> + Send + Sync>;

/// Renders the canonical text form of an instance.
pub type DisplayFn = Arc<dyn Fn(&dyn Any) -> Result<String, AccessError> + Send + Sync>;

// Closures only pick up the higher-ranked signature when it is spelled out as a bound.
#[inline(always)]
pub(crate) fn ref_fn<F>(f: F) -> FieldGetFn
where
    F: for<'a> Fn(&'a dyn Any) -> Result<&'a dyn Any, AccessError> + Send + Sync + 'static,
{
    Arc::new(f)
}

#[inline(always)]
pub(crate) fn mut_fn<F>(f: F) -> UpcastMutFn
where
    F: for<'a> Fn(&'a mut dyn Any) -> Result<&'a mut dyn Any, AccessError> + Send + Sync + 'static,
{
    Arc::new(f)
}

// -----------------------------------------------------------------------------
// Accessed

/// A value read through an accessor: borrowed from a field, or produced by a
/// method call.
pub enum Accessed<'a> {
    Borrowed(&'a dyn Any),
    Owned(Box<dyn Any>),
}

impl Accessed<'_> {
    /// Returns the value.
    #[inline]
    pub fn as_any(&self) -> &dyn Any {
        match self {
            Self::Borrowed(value) => *value,
            Self::Owned(value) => value.as_ref(),
        }
    }
}

impl fmt::Debug for Accessed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Borrowed(_) => f.write_str("Accessed::Borrowed(..)"),
            Self::Owned(_) => f.write_str("Accessed::Owned(..)"),
        }
    }
}

// -----------------------------------------------------------------------------
// Composition with supertype views

/// Rebases accessors declared on a supertype onto a subtype instance.
pub(crate) mod compose {
    use super::*;

    pub(crate) fn upcast(outer: &UpcastFn, inner: &UpcastFn) -> UpcastFn {
        let (outer, inner) = (outer.clone(), inner.clone());
        ref_fn(move |obj| inner(outer(obj)?))
    }

    pub(crate) fn upcast_mut(outer: &UpcastMutFn, inner: &UpcastMutFn) -> UpcastMutFn {
        let (outer, inner) = (outer.clone(), inner.clone());
        mut_fn(move |obj| inner(outer(obj)?))
    }

    pub(crate) fn field_get(up: &UpcastFn, get: &FieldGetFn) -> FieldGetFn {
        let (up, get) = (up.clone(), get.clone());
        ref_fn(move |obj| get(up(obj)?))
    }

    pub(crate) fn field_set(up: &UpcastMutFn, set: &FieldSetFn) -> FieldSetFn {
        let (up, set) = (up.clone(), set.clone());
        Arc::new(move |obj: &mut dyn Any, value: Box<dyn Any>| set(up(obj)?, value))
    }

    pub(crate) fn getter(up: &UpcastFn, get: &GetterFn) -> GetterFn {
        let (up, get) = (up.clone(), get.clone());
        Arc::new(move |obj: &dyn Any| get(up(obj)?))
    }

    pub(crate) fn any_getter(up: &UpcastFn, get: &AnyGetterFn) -> AnyGetterFn {
        let (up, get) = (up.clone(), get.clone());
        Arc::new(move |obj: &dyn Any| get(up(obj)?))
    }

    pub(crate) fn any_setter(up: &UpcastMutFn, set: &AnySetterFn) -> AnySetterFn {
        let (up, set) = (up.clone(), set.clone());
        Arc::new(move |obj: &mut dyn Any, key: String, value: Box<dyn Any>| {
            set(up(obj)?, key, value)
        })
    }
}
