use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use crate::class::{AccessError, Accessed, Annotations, Marker, MethodAccess, Visibility};
use crate::class::{CtorFn, FieldGetFn, FieldSetFn, GetterFn, SetterFn};
use crate::types::TypeDescriptor;

// -----------------------------------------------------------------------------
// Kinds

/// The role a member plays in a logical property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MemberKind {
    Field,
    Getter,
    Setter,
    CtorParam,
}

impl MemberKind {
    /// Every kind, in the order members of a property are listed.
    pub const ALL: [MemberKind; 4] = [Self::Field, Self::Getter, Self::Setter, Self::CtorParam];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Field => "field",
            Self::Getter => "getter",
            Self::Setter => "setter",
            Self::CtorParam => "creator parameter",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single-instance members of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialKind {
    AnyGetter,
    AnySetter,
    ValueMethod,
    DefaultConstructor,
    PropertyCreator,
}

impl SpecialKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AnyGetter => "any-getter",
            Self::AnySetter => "any-setter",
            Self::ValueMethod => "value method",
            Self::DefaultConstructor => "default constructor",
            Self::PropertyCreator => "property creator",
        }
    }
}

impl fmt::Display for SpecialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -----------------------------------------------------------------------------
// MemberInfo

/// How a collected member reaches into an instance of the introspected type.
///
/// Accessors of inherited members are already rebased onto the introspected
/// type.
#[derive(Clone)]
pub enum MemberAccess {
    Field {
        get: FieldGetFn,
        set: Option<FieldSetFn>,
    },
    Getter(GetterFn),
    Setter(SetterFn),
    /// Parameter `index` of the constructor at `ctor` in the collected
    /// constructor list.
    CtorParam { ctor: usize, index: usize },
}

impl MemberAccess {
    #[inline]
    pub const fn kind(&self) -> MemberKind {
        match self {
            Self::Field { .. } => MemberKind::Field,
            Self::Getter(_) => MemberKind::Getter,
            Self::Setter(_) => MemberKind::Setter,
            Self::CtorParam { .. } => MemberKind::CtorParam,
        }
    }
}

/// A field, accessor method or constructor parameter of a type, as collected
/// from its class and supertypes.
///
/// Annotations are the effective ones reported by the
/// [`AnnotationIntrospector`](crate::config::AnnotationIntrospector).
#[derive(Clone)]
pub struct MemberInfo {
    pub(crate) name: Arc<str>,
    pub(crate) ty: TypeDescriptor,
    pub(crate) visibility: Visibility,
    pub(crate) declaring: TypeDescriptor,
    pub(crate) annotations: Annotations,
    pub(crate) ordinal: usize,
    pub(crate) access: MemberAccess,
}

impl MemberInfo {
    #[inline]
    pub const fn kind(&self) -> MemberKind {
        self.access.kind()
    }

    /// The declared name: field name, method name or parameter name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resolved declared type.
    ///
    /// Fields report their type, getters their return type, setters and
    /// constructor parameters their parameter type.
    #[inline]
    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// The class declaring the member, possibly a supertype.
    #[inline]
    pub fn declaring_type(&self) -> &TypeDescriptor {
        &self.declaring
    }

    #[inline]
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// Position in collection order: fields, methods, then creator parameters.
    #[inline]
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    #[inline]
    pub fn access(&self) -> &MemberAccess {
        &self.access
    }

    /// Returns `true` if the member can produce a value from an instance.
    #[inline]
    pub fn can_read(&self) -> bool {
        matches!(self.access, MemberAccess::Field { .. } | MemberAccess::Getter(_))
    }

    /// Returns `true` if the member can assign a value to an instance.
    #[inline]
    pub fn can_write(&self) -> bool {
        matches!(
            self.access,
            MemberAccess::Field { set: Some(_), .. } | MemberAccess::Setter(_)
        )
    }

    /// Reads the member value of `obj`.
    pub fn read<'a>(&self, obj: &'a dyn Any) -> Result<Accessed<'a>, AccessError> {
        match &self.access {
            MemberAccess::Field { get, .. } => get(obj).map(Accessed::Borrowed),
            MemberAccess::Getter(call) => call(obj).map(Accessed::Owned),
            _ => Err(AccessError::Unsupported(self.name.clone())),
        }
    }

    /// Assigns `value` to the member of `obj`.
    pub fn write(&self, obj: &mut dyn Any, value: Box<dyn Any>) -> Result<(), AccessError> {
        match &self.access {
            MemberAccess::Field { set: Some(set), .. } => set(obj, value),
            MemberAccess::Field { set: None, .. } => Err(AccessError::ReadOnly(self.name.clone())),
            MemberAccess::Setter(call) => call(obj, value),
            MemberAccess::Getter(_) | MemberAccess::CtorParam { .. } => {
                Err(AccessError::Unsupported(self.name.clone()))
            }
        }
    }
}

impl PartialEq for MemberInfo {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind()
            && self.name == other.name
            && self.ty == other.ty
            && self.visibility == other.visibility
            && self.declaring == other.declaring
            && self.annotations == other.annotations
            && self.ordinal == other.ordinal
    }
}

impl fmt::Debug for MemberInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberInfo")
            .field("kind", &self.kind())
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("visibility", &self.visibility)
            .field("declaring", &self.declaring)
            .field("ordinal", &self.ordinal)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// MethodInfo

/// A method collected for a special role: any-getter, any-setter or value
/// method.
#[derive(Clone)]
pub struct MethodInfo {
    pub(crate) name: Arc<str>,
    pub(crate) value_type: Option<TypeDescriptor>,
    pub(crate) visibility: Visibility,
    pub(crate) declaring: TypeDescriptor,
    pub(crate) annotations: Annotations,
    pub(crate) ordinal: usize,
    pub(crate) access: MethodAccess,
}

impl MethodInfo {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The return type of a value method, or the entry value type of an
    /// any-getter or any-setter.
    #[inline]
    pub fn value_type(&self) -> Option<&TypeDescriptor> {
        self.value_type.as_ref()
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub fn declaring_type(&self) -> &TypeDescriptor {
        &self.declaring
    }

    #[inline]
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    #[inline]
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    #[inline]
    pub fn marker(&self) -> Option<Marker> {
        self.annotations.marker()
    }

    /// Calls a value method.
    pub fn call(&self, obj: &dyn Any) -> Result<Box<dyn Any>, AccessError> {
        match &self.access {
            MethodAccess::Read(call) => call(obj),
            _ => Err(AccessError::Unsupported(self.name.clone())),
        }
    }

    /// Calls an any-getter.
    pub fn entries(&self, obj: &dyn Any) -> Result<Vec<(String, Box<dyn Any>)>, AccessError> {
        match &self.access {
            MethodAccess::ReadEntries(call) => call(obj),
            _ => Err(AccessError::Unsupported(self.name.clone())),
        }
    }

    /// Calls an any-setter.
    pub fn put_entry(&self, obj: &mut dyn Any, key: String, value: Box<dyn Any>) -> Result<(), AccessError> {
        match &self.access {
            MethodAccess::WriteEntry(call) => call(obj, key, value),
            _ => Err(AccessError::Unsupported(self.name.clone())),
        }
    }
}

impl fmt::Debug for MethodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInfo")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("declaring", &self.declaring)
            .field("marker", &self.marker())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// CtorInfo

/// A parameter of a collected constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct CtorParamInfo {
    pub(crate) name: Option<Arc<str>>,
    pub(crate) ty: TypeDescriptor,
    pub(crate) annotations: Annotations,
    pub(crate) index: usize,
}

impl CtorParamInfo {
    /// The declared or explicit name, if any.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    #[inline]
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// Position in the parameter list.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }
}

/// A constructor of the introspected type.
#[derive(Clone)]
pub struct CtorInfo {
    pub(crate) declaring: TypeDescriptor,
    pub(crate) visibility: Visibility,
    pub(crate) annotations: Annotations,
    pub(crate) params: Vec<CtorParamInfo>,
    pub(crate) invoke: CtorFn,
}

impl CtorInfo {
    #[inline]
    pub fn declaring_type(&self) -> &TypeDescriptor {
        &self.declaring
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    #[inline]
    pub fn params(&self) -> &[CtorParamInfo] {
        &self.params
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` for the property-based creator.
    #[inline]
    pub fn is_creator(&self) -> bool {
        self.annotations.marker() == Some(Marker::Creator)
    }

    /// Invokes the constructor; `args` must follow parameter order.
    pub fn construct(&self, args: Vec<Box<dyn Any>>) -> Result<Box<dyn Any>, AccessError> {
        (self.invoke)(args)
    }
}

impl fmt::Debug for CtorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CtorInfo")
            .field("declaring", &self.declaring)
            .field("visibility", &self.visibility)
            .field("params", &self.params)
            .field("creator", &self.is_creator())
            .finish()
    }
}
