use alloc::boxed::Box;
use alloc::sync::Arc;
use core::fmt;

use crate::types::{KnownType, RawClass};

// -----------------------------------------------------------------------------
// TypeDescriptor

/// An immutable, fully resolved type: a [`RawClass`] plus the ordered
/// descriptors bound to its generic parameters.
///
/// Cloning is cheap (a shared pointer). Equality and hashing compare the raw
/// class and every binding, so `List<String>` and `List<i32>` are distinct.
///
/// # Examples
///
/// ```
/// use vc_introspect::types::TypeDescriptor;
///
/// let list = TypeDescriptor::generic("List", [TypeDescriptor::of::<String>()]);
///
/// assert_eq!(list.name(), "List");
/// assert_eq!(list.bindings().len(), 1);
/// assert_eq!(list.to_string(), "List<String>");
///
/// assert_ne!(list, TypeDescriptor::generic("List", [TypeDescriptor::of::<i32>()]));
/// assert_eq!(list.erased(), TypeDescriptor::simple("List"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor(Arc<Inner>);

#[derive(PartialEq, Eq, Hash)]
struct Inner {
    raw: RawClass,
    bindings: Box<[TypeDescriptor]>,
}

impl TypeDescriptor {
    /// Creates a descriptor from a raw class and its bindings.
    pub fn new(raw: RawClass, bindings: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        Self(Arc::new(Inner {
            raw,
            bindings: bindings.into_iter().collect(),
        }))
    }

    /// Creates a descriptor for a class without generic parameters.
    #[inline]
    pub fn simple(name: &str) -> Self {
        Self::new(RawClass::new(name), [])
    }

    /// Creates a descriptor for a generic class applied to `bindings`.
    #[inline]
    pub fn generic(name: &str, bindings: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        Self::new(RawClass::new(name), bindings)
    }

    /// Returns the descriptor of a well-known Rust type.
    #[inline]
    pub fn of<T: KnownType>() -> Self {
        Self::simple(T::CLASS)
    }

    /// Returns the raw class.
    #[inline]
    pub fn raw(&self) -> &RawClass {
        &self.0.raw
    }

    /// Returns the raw class name.
    #[inline]
    pub fn name(&self) -> &str {
        self.0.raw.name()
    }

    /// Returns the generic bindings, in declaration order of the parameters.
    #[inline]
    pub fn bindings(&self) -> &[TypeDescriptor] {
        &self.0.bindings
    }

    /// Returns the binding of the parameter at `index`, if present.
    #[inline]
    pub fn binding(&self, index: usize) -> Option<&TypeDescriptor> {
        self.0.bindings.get(index)
    }

    /// Returns `true` if the descriptor carries generic bindings.
    #[inline]
    pub fn is_generic(&self) -> bool {
        !self.0.bindings.is_empty()
    }

    /// Returns the descriptor of the raw class alone.
    ///
    /// Returns a clone of `self` if there are no bindings.
    pub fn erased(&self) -> Self {
        if self.is_generic() {
            Self::new(self.0.raw.clone(), [])
        } else {
            self.clone()
        }
    }

    /// Returns `true` if the raw class has a built-in standard codec.
    #[inline]
    pub fn is_well_known(&self) -> bool {
        self.0.raw.is_well_known()
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        if let Some((first, rest)) = self.bindings().split_first() {
            write!(f, "<{first}")?;
            for binding in rest {
                write!(f, ", {binding}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDescriptor({self})")
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};

    use super::TypeDescriptor;
    use crate::hash::HashSet;

    #[test]
    fn equality_covers_bindings() {
        let a = TypeDescriptor::generic(
            "Map",
            [TypeDescriptor::of::<String>(), TypeDescriptor::of::<i64>()],
        );
        let b = TypeDescriptor::generic(
            "Map",
            [TypeDescriptor::of::<String>(), TypeDescriptor::of::<i64>()],
        );
        let c = TypeDescriptor::generic(
            "Map",
            [TypeDescriptor::of::<i64>(), TypeDescriptor::of::<String>()],
        );

        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut set = HashSet::default();
        set.insert(a.clone());
        assert!(set.contains(&b));
        assert!(!set.contains(&c));
    }

    #[test]
    fn display_nested() {
        let ty = TypeDescriptor::generic(
            "Map",
            [
                TypeDescriptor::of::<String>(),
                TypeDescriptor::generic("List", [TypeDescriptor::of::<i32>()]),
            ],
        );
        assert_eq!(ty.to_string(), "Map<String, List<i32>>");
        assert!(!ty.is_well_known());
        assert!(TypeDescriptor::of::<f64>().is_well_known());
    }
}
