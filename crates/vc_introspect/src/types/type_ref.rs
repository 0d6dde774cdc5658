use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::IntrospectionError;
use crate::types::{KnownType, RawClass, TypeDescriptor};

/// A type as written in class metadata.
///
/// Members of a generic class may refer to the class's own type parameters.
/// A `TypeRef` is turned into a [`TypeDescriptor`] by [`resolve`](TypeRef::resolve)
/// against the bindings of the concrete type being introspected.
///
/// # Examples
///
/// ```
/// use vc_introspect::types::{TypeDescriptor, TypeRef};
///
/// // `List<T>` inside a class declared as `Wrapper<T>`.
/// let declared = TypeRef::apply("List", [TypeRef::param(0)]);
///
/// let resolved = declared.resolve(&[TypeDescriptor::of::<String>()]).unwrap();
/// assert_eq!(resolved.to_string(), "List<String>");
///
/// assert!(declared.resolve(&[]).is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A type that does not depend on any parameter.
    Concrete(TypeDescriptor),
    /// The generic parameter of the declaring class at this index.
    Param(usize),
    /// A generic class applied to declared arguments.
    Apply { raw: RawClass, args: Box<[TypeRef]> },
}

impl TypeRef {
    /// Refers to the well-known class of `T`.
    #[inline]
    pub fn of<T: KnownType>() -> Self {
        Self::Concrete(TypeDescriptor::of::<T>())
    }

    /// Refers to a non-generic class by name.
    #[inline]
    pub fn simple(name: &str) -> Self {
        Self::Concrete(TypeDescriptor::simple(name))
    }

    /// Refers to the generic parameter at `index`.
    #[inline]
    pub const fn param(index: usize) -> Self {
        Self::Param(index)
    }

    /// Applies the generic class `name` to `args`.
    pub fn apply(name: &str, args: impl IntoIterator<Item = TypeRef>) -> Self {
        Self::Apply {
            raw: RawClass::new(name),
            args: args.into_iter().collect(),
        }
    }

    /// Returns `true` if no generic parameter is mentioned.
    pub fn is_concrete(&self) -> bool {
        match self {
            Self::Concrete(_) => true,
            Self::Param(_) => false,
            Self::Apply { args, .. } => args.iter().all(TypeRef::is_concrete),
        }
    }

    /// Resolves the declared type against the `bindings` of the declaring class.
    ///
    /// # Errors
    ///
    /// [`IntrospectionError::UnboundTypeParameter`] if a parameter index is
    /// not covered by `bindings`.
    pub fn resolve(&self, bindings: &[TypeDescriptor]) -> Result<TypeDescriptor, IntrospectionError> {
        match self {
            Self::Concrete(ty) => Ok(ty.clone()),
            Self::Param(index) => bindings.get(*index).cloned().ok_or(
                IntrospectionError::UnboundTypeParameter {
                    index: *index,
                    bound: bindings.len(),
                },
            ),
            Self::Apply { raw, args } => {
                let args = args
                    .iter()
                    .map(|arg| arg.resolve(bindings))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(TypeDescriptor::new(raw.clone(), args))
            }
        }
    }
}

impl From<TypeDescriptor> for TypeRef {
    #[inline]
    fn from(value: TypeDescriptor) -> Self {
        Self::Concrete(value)
    }
}

impl From<&TypeDescriptor> for TypeRef {
    #[inline]
    fn from(value: &TypeDescriptor) -> Self {
        Self::Concrete(value.clone())
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concrete(ty) => fmt::Display::fmt(ty, f),
            Self::Param(index) => write!(f, "${index}"),
            Self::Apply { raw, args } => {
                write!(f, "{raw}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
        }
    }
}
