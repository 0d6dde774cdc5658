use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use crate::class::access::{AnyGetterFn, AnySetterFn, CtorFn, DisplayFn};
use crate::class::access::{FieldGetFn, FieldSetFn, GetterFn, SetterFn};
use crate::class::access::{UpcastFn, UpcastMutFn};
use crate::class::{AccessError, Annotations};
use crate::types::{TypeDescriptor, TypeRef};

// -----------------------------------------------------------------------------
// Visibility

/// Declared access level of a member, ordered from most to least restrictive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Visibility {
    Private,
    Package,
    Protected,
    Public,
}

// -----------------------------------------------------------------------------
// Members

/// A declared field.
#[derive(Clone)]
pub struct FieldDef {
    pub name: Arc<str>,
    pub ty: TypeRef,
    pub visibility: Visibility,
    pub annotations: Annotations,
    pub get: FieldGetFn,
    /// `None` for fields that cannot be assigned.
    pub set: Option<FieldSetFn>,
}

/// How a declared method is invoked. The shape decides what role the method
/// can play.
#[derive(Clone)]
pub enum MethodAccess {
    /// `fn(&self) -> R`, a getter or value method candidate.
    Read(GetterFn),
    /// `fn(&mut self, P)`, a setter candidate.
    Write(SetterFn),
    /// `fn(&self) -> [(String, V)]`, an any-getter candidate.
    ReadEntries(AnyGetterFn),
    /// `fn(&mut self, String, V)`, an any-setter candidate.
    WriteEntry(AnySetterFn),
}

/// A declared method.
#[derive(Clone)]
pub struct MethodDef {
    pub name: Arc<str>,
    /// Parameter types, `self` excluded.
    pub params: Vec<TypeRef>,
    /// Return type; for entry readers, the type of the entry values.
    pub returns: Option<TypeRef>,
    pub visibility: Visibility,
    pub annotations: Annotations,
    pub access: MethodAccess,
}

impl MethodDef {
    /// Returns the number of declared parameters.
    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// A declared constructor parameter.
#[derive(Debug, Clone)]
pub struct ParamDef {
    pub name: Option<Arc<str>>,
    pub ty: TypeRef,
    pub annotations: Annotations,
}

impl ParamDef {
    /// A named parameter.
    pub fn named(name: &str, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: Some(Arc::from(name)),
            ty: ty.into(),
            annotations: Annotations::new(),
        }
    }

    /// A parameter whose name was not retained in the metadata.
    pub fn unnamed(ty: impl Into<TypeRef>) -> Self {
        Self {
            name: None,
            ty: ty.into(),
            annotations: Annotations::new(),
        }
    }

    /// Attaches annotations to the parameter.
    pub fn with(mut self, annotations: Annotations) -> Self {
        self.annotations.merge(annotations);
        self
    }
}

/// A declared constructor.
#[derive(Clone)]
pub struct CtorDef {
    pub params: Vec<ParamDef>,
    pub visibility: Visibility,
    pub annotations: Annotations,
    pub invoke: CtorFn,
}

/// A declared supertype, with views of an instance as that supertype.
#[derive(Clone)]
pub struct SupertypeDef {
    pub ty: TypeRef,
    pub upcast: UpcastFn,
    pub upcast_mut: UpcastMutFn,
}

// -----------------------------------------------------------------------------
// Structural kinds

/// Element access of a sequence class (array, list, set).
#[derive(Clone)]
pub struct SequenceAccess {
    /// Element type, usually the first generic parameter.
    pub element: TypeRef,
    pub iter: Arc<dyn for<'a> Fn(&'a dyn Any) -> Result<Vec<&'a dyn Any>, AccessError> + Send + Sync>,
    pub build: Arc<dyn Fn(Vec<Box<dyn Any>>) -> Result<Box<dyn Any>, AccessError> + Send + Sync>,
}

/// Entry access of a mapping class.
#[derive(Clone)]
pub struct MappingAccess {
    pub key: TypeRef,
    pub value: TypeRef,
    pub entries: Arc<
        dyn for<'a> Fn(&'a dyn Any) -> Result<Vec<(&'a dyn Any, &'a dyn Any)>, AccessError>
            + Send
            + Sync,
    >,
    pub build: Arc<
        dyn Fn(Vec<(Box<dyn Any>, Box<dyn Any>)>) -> Result<Box<dyn Any>, AccessError> + Send + Sync,
    >,
}

/// Access to the content of an optional class.
#[derive(Clone)]
pub struct OptionalAccess {
    pub inner: TypeRef,
    pub get: Arc<dyn for<'a> Fn(&'a dyn Any) -> Result<Option<&'a dyn Any>, AccessError> + Send + Sync>,
    pub wrap: Arc<dyn Fn(Option<Box<dyn Any>>) -> Result<Box<dyn Any>, AccessError> + Send + Sync>,
}

/// Variant access of an enumeration class.
#[derive(Clone)]
pub struct EnumAccess {
    /// Variant names in declaration order.
    pub variants: Box<[Arc<str>]>,
    pub index_of: Arc<dyn Fn(&dyn Any) -> Result<usize, AccessError> + Send + Sync>,
    pub from_index: Arc<dyn Fn(usize) -> Option<Box<dyn Any>> + Send + Sync>,
}

impl EnumAccess {
    /// Returns the variant name of `value`.
    pub fn name_of(&self, value: &dyn Any) -> Result<&Arc<str>, AccessError> {
        let index = (self.index_of)(value)?;
        self.variants
            .get(index)
            .ok_or(AccessError::Failed(Arc::from("variant index out of range")))
    }

    /// Returns the instance of the variant called `name`.
    pub fn by_name(&self, name: &str) -> Option<Box<dyn Any>> {
        let index = self.variants.iter().position(|v| &**v == name)?;
        (self.from_index)(index)
    }
}

/// The structural kind of a class.
#[derive(Clone)]
pub enum ClassKind {
    /// A class described by its members.
    Bean,
    Enum(EnumAccess),
    Sequence(SequenceAccess),
    Mapping(MappingAccess),
    Optional(OptionalAccess),
}

impl ClassKind {
    /// A short description for diagnostics.
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Bean => "bean",
            Self::Enum(_) => "enum",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
            Self::Optional(_) => "optional",
        }
    }
}

// -----------------------------------------------------------------------------
// ClassDef

/// Metadata of a class, as supplied by a [`ClassProvider`].
///
/// Member lists keep declaration order; property order is derived from it.
///
/// [`ClassProvider`]: crate::class::ClassProvider
#[derive(Clone)]
pub struct ClassDef {
    pub(crate) ty: TypeDescriptor,
    pub(crate) kind: ClassKind,
    pub(crate) is_abstract: bool,
    pub(crate) supertypes: Vec<SupertypeDef>,
    pub(crate) fields: Vec<FieldDef>,
    pub(crate) methods: Vec<MethodDef>,
    pub(crate) ctors: Vec<CtorDef>,
    pub(crate) annotations: Annotations,
    pub(crate) display: Option<DisplayFn>,
}

impl ClassDef {
    /// The descriptor this definition was registered for.
    #[inline]
    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    #[inline]
    pub fn kind(&self) -> &ClassKind {
        &self.kind
    }

    /// Returns `true` for abstract classes and interfaces.
    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    #[inline]
    pub fn supertypes(&self) -> &[SupertypeDef] {
        &self.supertypes
    }

    #[inline]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    #[inline]
    pub fn methods(&self) -> &[MethodDef] {
        &self.methods
    }

    #[inline]
    pub fn constructors(&self) -> &[CtorDef] {
        &self.ctors
    }

    /// Class-level annotations.
    #[inline]
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// The routine rendering an instance as text, if any.
    #[inline]
    pub fn display(&self) -> Option<&DisplayFn> {
        self.display.as_ref()
    }
}

impl fmt::Debug for ClassDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDef")
            .field("ty", &self.ty)
            .field("kind", &self.kind.describe())
            .field("is_abstract", &self.is_abstract)
            .field("supertypes", &self.supertypes.len())
            .field("fields", &self.fields.iter().map(|v| &v.name).collect::<Vec<_>>())
            .field("methods", &self.methods.iter().map(|v| &v.name).collect::<Vec<_>>())
            .field("constructors", &self.ctors.len())
            .finish()
    }
}
