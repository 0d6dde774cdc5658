use alloc::sync::Arc;

use crate::class::ClassDef;
use crate::hash::HashMap;
use crate::types::{RawClass, TypeDescriptor};
use crate::IntrospectionError;

// -----------------------------------------------------------------------------
// ClassProvider

/// Source of class metadata.
///
/// Implementations must be deterministic: describing the same descriptor
/// twice yields equivalent definitions.
pub trait ClassProvider: Send + Sync {
    /// Returns the definition of `ty`.
    ///
    /// Generic classes are described once per raw class; member types refer
    /// to the generic parameters through [`TypeRef::Param`](crate::types::TypeRef::Param).
    fn describe(&self, ty: &TypeDescriptor) -> Result<Arc<ClassDef>, IntrospectionError>;
}

impl<P: ClassProvider + ?Sized> ClassProvider for Arc<P> {
    #[inline]
    fn describe(&self, ty: &TypeDescriptor) -> Result<Arc<ClassDef>, IntrospectionError> {
        (**self).describe(ty)
    }
}

// -----------------------------------------------------------------------------
// ClassTable

/// A [`ClassProvider`] backed by a table of definitions.
///
/// Lookup tries the exact descriptor first, then its raw class, so a generic
/// class registered under `List` serves `List<String>` and `List<i32>` alike.
///
/// # Examples
///
/// ```
/// use vc_introspect::class::{ClassDef, ClassProvider, ClassTable};
/// use vc_introspect::types::{TypeDescriptor, TypeRef};
///
/// let mut table = ClassTable::new();
/// table.insert(ClassDef::sequence::<Vec<i32>, i32>(
///     TypeDescriptor::simple("List"),
///     TypeRef::param(0),
/// ));
///
/// let ty = TypeDescriptor::generic("List", [TypeDescriptor::of::<i32>()]);
/// assert!(table.describe(&ty).is_ok());
/// assert!(table.describe(&TypeDescriptor::simple("Set")).is_err());
/// ```
#[derive(Default, Debug)]
pub struct ClassTable {
    exact: HashMap<TypeDescriptor, Arc<ClassDef>>,
    raw: HashMap<RawClass, Arc<ClassDef>>,
}

impl ClassTable {
    /// Creates an empty table.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `def` under its own descriptor.
    ///
    /// A definition registered under a descriptor without bindings also
    /// serves every parameterization of its raw class. Replaces and returns
    /// the previous definition, if any.
    pub fn insert(&mut self, def: ClassDef) -> Option<Arc<ClassDef>> {
        let def = Arc::new(def);
        let ty = def.ty().clone();
        if !ty.is_generic() {
            self.raw.insert(ty.raw().clone(), def.clone());
        }
        self.exact.insert(ty, def)
    }

    /// Returns the definition registered for `ty`, falling back to its raw class.
    pub fn get(&self, ty: &TypeDescriptor) -> Option<&Arc<ClassDef>> {
        self.exact.get(ty).or_else(|| self.raw.get(ty.raw()))
    }

    /// Returns `true` if [`get`](Self::get) would succeed.
    #[inline]
    pub fn contains(&self, ty: &TypeDescriptor) -> bool {
        self.get(ty).is_some()
    }

    /// Returns the number of registered definitions.
    #[inline]
    pub fn len(&self) -> usize {
        self.exact.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}

impl ClassProvider for ClassTable {
    fn describe(&self, ty: &TypeDescriptor) -> Result<Arc<ClassDef>, IntrospectionError> {
        self.get(ty)
            .cloned()
            .ok_or_else(|| IntrospectionError::UnknownClass(ty.clone()))
    }
}
