use alloc::sync::Arc;
use alloc::vec::Vec;

/// Distinguishes special single members of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// A method returning the unmapped key/value pairs of an instance.
    AnyGetter,
    /// A method accepting unmapped key/value pairs.
    AnySetter,
    /// A method whose result stands in for the whole instance when serializing.
    ValueMethod,
    /// A constructor whose named parameters are bound from properties.
    Creator,
}

/// Declarative hints attached to a class or member.
///
/// These play the role of source annotations. They are read through an
/// [`AnnotationIntrospector`](crate::config::AnnotationIntrospector), which
/// may add to or override them.
///
/// # Examples
///
/// ```
/// use vc_introspect::class::{Annotations, Marker};
///
/// let ann = Annotations::new().renamed("full_name").required();
/// assert_eq!(ann.rename(), Some("full_name"));
/// assert!(ann.is_required());
/// assert!(ann.is_explicit());
///
/// let ann = Annotations::new().marked(Marker::AnySetter);
/// assert_eq!(ann.marker(), Some(Marker::AnySetter));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    rename: Option<Arc<str>>,
    include: bool,
    ignore: bool,
    required: bool,
    marker: Option<Marker>,
    ignored_properties: Vec<Arc<str>>,
}

impl Annotations {
    /// Empty annotations.
    #[inline]
    pub const fn new() -> Self {
        Self {
            rename: None,
            include: false,
            ignore: false,
            required: false,
            marker: None,
            ignored_properties: Vec::new(),
        }
    }

    /// Gives the member an explicit logical name.
    pub fn renamed(mut self, name: &str) -> Self {
        self.rename = Some(Arc::from(name));
        self
    }

    /// Includes the member regardless of visibility thresholds.
    #[inline]
    pub fn included(mut self) -> Self {
        self.include = true;
        self
    }

    /// Withholds the member from property discovery.
    #[inline]
    pub fn ignored(mut self) -> Self {
        self.ignore = true;
        self
    }

    /// Marks the property as required when deserializing.
    #[inline]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the special member marker.
    #[inline]
    pub fn marked(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    /// Class level: property names that are ignored as a whole.
    pub fn ignore_properties<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.ignored_properties.extend(names.into_iter().map(Arc::from));
        self
    }

    #[inline]
    pub fn rename(&self) -> Option<&str> {
        self.rename.as_deref()
    }

    #[inline]
    pub fn rename_arc(&self) -> Option<&Arc<str>> {
        self.rename.as_ref()
    }

    #[inline]
    pub const fn is_included(&self) -> bool {
        self.include
    }

    #[inline]
    pub const fn is_ignored(&self) -> bool {
        self.ignore
    }

    #[inline]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    #[inline]
    pub const fn marker(&self) -> Option<Marker> {
        self.marker
    }

    #[inline]
    pub fn ignored_properties(&self) -> &[Arc<str>] {
        &self.ignored_properties
    }

    /// Returns `true` if the member was explicitly named or included.
    #[inline]
    pub const fn is_explicit(&self) -> bool {
        self.rename.is_some() || self.include
    }

    /// Returns `true` if nothing has been set.
    pub fn is_empty(&self) -> bool {
        *self == Self::new()
    }

    /// Merges `other` into `self`; values set on `other` win.
    pub fn merge(&mut self, other: Annotations) {
        if other.rename.is_some() {
            self.rename = other.rename;
        }
        self.include |= other.include;
        self.ignore |= other.ignore;
        self.required |= other.required;
        if other.marker.is_some() {
            self.marker = other.marker;
        }
        self.ignored_properties.extend(other.ignored_properties);
    }
}
