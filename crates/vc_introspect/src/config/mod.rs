//! Introspection settings.
//!
//! [`IntrospectionConfig`] bundles the rules applied when members are merged
//! into properties: visibility thresholds, naming conventions, the declared
//! type precedence, globally ignored property names and the
//! [`AnnotationIntrospector`] consulted for per-member overrides.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

// -----------------------------------------------------------------------------
// Modules

mod annotations;
mod naming;
mod precedence;
mod visibility;

// -----------------------------------------------------------------------------
// Exports

pub use annotations::{AnnotationIntrospector, AnnotationOverrides, DeclaredAnnotations, MemberRef};
pub use naming::{ManglePolicy, NamingRules};
pub use precedence::TypePrecedence;
pub use visibility::{MinVisibility, VisibilityChecker};

// -----------------------------------------------------------------------------
// IntrospectionConfig

/// Rules applied by the [`PropertyResolver`](crate::PropertyResolver).
///
/// # Examples
///
/// ```
/// use vc_introspect::config::{IntrospectionConfig, MinVisibility, VisibilityChecker};
///
/// let config = IntrospectionConfig::default()
///     .with_visibility(VisibilityChecker::DEFAULT.with_field(MinVisibility::Any))
///     .with_ignored_properties(["password"]);
///
/// assert!(config.is_ignored_property("password"));
/// assert!(!config.is_ignored_property("name"));
/// ```
#[derive(Clone)]
pub struct IntrospectionConfig {
    pub visibility: VisibilityChecker,
    pub naming: NamingRules,
    pub type_precedence: TypePrecedence,
    /// Property names ignored in every class.
    pub ignored_properties: Vec<Arc<str>>,
    pub annotations: Arc<dyn AnnotationIntrospector>,
}

impl Default for IntrospectionConfig {
    fn default() -> Self {
        Self {
            visibility: VisibilityChecker::DEFAULT,
            naming: NamingRules::default(),
            type_precedence: TypePrecedence::default(),
            ignored_properties: Vec::new(),
            annotations: Arc::new(DeclaredAnnotations),
        }
    }
}

impl IntrospectionConfig {
    pub fn with_visibility(mut self, visibility: VisibilityChecker) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_naming(mut self, naming: NamingRules) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_type_precedence(mut self, precedence: TypePrecedence) -> Self {
        self.type_precedence = precedence;
        self
    }

    pub fn with_ignored_properties<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.ignored_properties.extend(names.into_iter().map(Arc::from));
        self
    }

    pub fn with_annotations(mut self, annotations: Arc<dyn AnnotationIntrospector>) -> Self {
        self.annotations = annotations;
        self
    }

    /// Returns `true` if `name` is ignored in every class.
    pub fn is_ignored_property(&self, name: &str) -> bool {
        self.ignored_properties.iter().any(|n| &**n == name)
    }
}

impl fmt::Debug for IntrospectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntrospectionConfig")
            .field("visibility", &self.visibility)
            .field("naming", &self.naming)
            .field("type_precedence", &self.type_precedence)
            .field("ignored_properties", &self.ignored_properties)
            .finish_non_exhaustive()
    }
}
