use crate::class::Visibility;

/// The least restrictive access level a member needs to be auto-detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MinVisibility {
    /// Every member, private ones included.
    Any,
    NonPrivate,
    ProtectedAndPublic,
    PublicOnly,
    /// Nothing is auto-detected; only explicitly annotated members are used.
    None,
}

impl MinVisibility {
    /// Returns `true` if a member declared with `visibility` passes.
    #[inline]
    pub const fn allows(self, visibility: Visibility) -> bool {
        match self {
            Self::Any => true,
            Self::NonPrivate => !matches!(visibility, Visibility::Private),
            Self::ProtectedAndPublic => {
                matches!(visibility, Visibility::Protected | Visibility::Public)
            }
            Self::PublicOnly => matches!(visibility, Visibility::Public),
            Self::None => false,
        }
    }
}

/// Auto-detection thresholds, independently configurable per member kind.
///
/// Members carrying an explicit name or inclusion bypass these thresholds.
///
/// # Examples
///
/// ```
/// use vc_introspect::class::Visibility;
/// use vc_introspect::config::{MinVisibility, VisibilityChecker};
///
/// let checker = VisibilityChecker::DEFAULT;
/// assert!(!checker.is_field_visible(Visibility::Private));
/// assert!(checker.is_setter_visible(Visibility::Private));
///
/// let checker = checker.with_field(MinVisibility::Any);
/// assert!(checker.is_field_visible(Visibility::Private));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisibilityChecker {
    pub field: MinVisibility,
    pub getter: MinVisibility,
    pub is_getter: MinVisibility,
    pub setter: MinVisibility,
    pub creator: MinVisibility,
}

impl VisibilityChecker {
    /// Public fields and getters; setters and creators of any visibility.
    pub const DEFAULT: Self = Self {
        field: MinVisibility::PublicOnly,
        getter: MinVisibility::PublicOnly,
        is_getter: MinVisibility::PublicOnly,
        setter: MinVisibility::Any,
        creator: MinVisibility::Any,
    };

    /// Auto-detects every member.
    pub const ALL: Self = Self::uniform(MinVisibility::Any);

    /// Auto-detects nothing.
    pub const NONE: Self = Self::uniform(MinVisibility::None);

    /// Applies `threshold` to every member kind.
    pub const fn uniform(threshold: MinVisibility) -> Self {
        Self {
            field: threshold,
            getter: threshold,
            is_getter: threshold,
            setter: threshold,
            creator: threshold,
        }
    }

    pub const fn with_field(mut self, threshold: MinVisibility) -> Self {
        self.field = threshold;
        self
    }

    pub const fn with_getter(mut self, threshold: MinVisibility) -> Self {
        self.getter = threshold;
        self
    }

    pub const fn with_is_getter(mut self, threshold: MinVisibility) -> Self {
        self.is_getter = threshold;
        self
    }

    pub const fn with_setter(mut self, threshold: MinVisibility) -> Self {
        self.setter = threshold;
        self
    }

    pub const fn with_creator(mut self, threshold: MinVisibility) -> Self {
        self.creator = threshold;
        self
    }

    #[inline]
    pub const fn is_field_visible(&self, visibility: Visibility) -> bool {
        self.field.allows(visibility)
    }

    #[inline]
    pub const fn is_getter_visible(&self, visibility: Visibility) -> bool {
        self.getter.allows(visibility)
    }

    #[inline]
    pub const fn is_is_getter_visible(&self, visibility: Visibility) -> bool {
        self.is_getter.allows(visibility)
    }

    #[inline]
    pub const fn is_setter_visible(&self, visibility: Visibility) -> bool {
        self.setter.allows(visibility)
    }

    #[inline]
    pub const fn is_creator_visible(&self, visibility: Visibility) -> bool {
        self.creator.allows(visibility)
    }
}

impl Default for VisibilityChecker {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_ordered() {
        use Visibility::*;

        let levels = [Private, Package, Protected, Public];
        let count = |t: MinVisibility| levels.iter().filter(|v| t.allows(**v)).count();

        assert_eq!(count(MinVisibility::Any), 4);
        assert_eq!(count(MinVisibility::NonPrivate), 3);
        assert_eq!(count(MinVisibility::ProtectedAndPublic), 2);
        assert_eq!(count(MinVisibility::PublicOnly), 1);
        assert_eq!(count(MinVisibility::None), 0);
    }

    #[test]
    fn kinds_are_independent() {
        let checker = VisibilityChecker::NONE.with_getter(MinVisibility::Any);
        assert!(checker.is_getter_visible(Visibility::Private));
        assert!(!checker.is_is_getter_visible(Visibility::Public));
        assert!(!checker.is_field_visible(Visibility::Public));
    }
}
