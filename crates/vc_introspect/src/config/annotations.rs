use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::class::{Annotations, ClassDef, CtorDef, FieldDef, Marker, MethodDef, ParamDef};
use crate::hash::HashMap;
use crate::types::RawClass;

// -----------------------------------------------------------------------------
// MemberRef

/// A declared element whose annotations are being queried.
#[derive(Clone, Copy)]
pub enum MemberRef<'a> {
    Class(&'a ClassDef),
    Field(&'a ClassDef, &'a FieldDef),
    Method(&'a ClassDef, &'a MethodDef),
    Ctor(&'a ClassDef, &'a CtorDef),
    CtorParam(&'a ClassDef, &'a ParamDef),
}

impl<'a> MemberRef<'a> {
    /// The class declaring the element.
    #[inline]
    pub fn class(&self) -> &'a ClassDef {
        match *self {
            Self::Class(class)
            | Self::Field(class, _)
            | Self::Method(class, _)
            | Self::Ctor(class, _)
            | Self::CtorParam(class, _) => class,
        }
    }

    /// The declared name of the element, if it has one.
    pub fn name(&self) -> Option<&'a str> {
        match *self {
            Self::Class(class) => Some(class.ty().name()),
            Self::Field(_, field) => Some(&*field.name),
            Self::Method(_, method) => Some(&*method.name),
            Self::Ctor(..) => None,
            Self::CtorParam(_, param) => param.name.as_deref(),
        }
    }

    /// The annotations attached in the metadata.
    pub fn declared(&self) -> &'a Annotations {
        match *self {
            Self::Class(class) => class.annotations(),
            Self::Field(_, field) => &field.annotations,
            Self::Method(_, method) => &method.annotations,
            Self::Ctor(_, ctor) => &ctor.annotations,
            Self::CtorParam(_, param) => &param.annotations,
        }
    }
}

impl fmt::Debug for MemberRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Class(_) => "Class",
            Self::Field(..) => "Field",
            Self::Method(..) => "Method",
            Self::Ctor(..) => "Ctor",
            Self::CtorParam(..) => "CtorParam",
        };
        write!(f, "MemberRef::{kind}({}::{:?})", self.class().ty(), self.name())
    }
}

// -----------------------------------------------------------------------------
// AnnotationIntrospector

/// Answers naming, ignore and role questions about declared elements.
///
/// Every query has a default answering from the annotations attached in the
/// metadata, so an implementation only overrides what it changes.
pub trait AnnotationIntrospector: Send + Sync {
    /// Explicit logical name of a member.
    fn override_name(&self, member: MemberRef<'_>) -> Option<Arc<str>> {
        member.declared().rename_arc().cloned()
    }

    /// Returns `true` if the member is included regardless of visibility.
    fn is_included(&self, member: MemberRef<'_>) -> bool {
        member.declared().is_included()
    }

    /// Returns `true` if the member must not contribute to any property.
    fn is_ignored(&self, member: MemberRef<'_>) -> bool {
        member.declared().is_ignored()
    }

    fn is_required(&self, member: MemberRef<'_>) -> bool {
        member.declared().is_required()
    }

    /// The special role of a method or constructor.
    fn marker(&self, member: MemberRef<'_>) -> Option<Marker> {
        member.declared().marker()
    }

    /// Property names the class ignores as a whole.
    fn ignored_properties(&self, class: &ClassDef) -> Vec<Arc<str>> {
        class.annotations().ignored_properties().to_vec()
    }

    /// Folds every answer into one [`Annotations`] value.
    fn effective(&self, member: MemberRef<'_>) -> Annotations {
        let mut out = Annotations::new();
        if let Some(name) = self.override_name(member) {
            out = out.renamed(&name);
        }
        if self.is_included(member) {
            out = out.included();
        }
        if self.is_ignored(member) {
            out = out.ignored();
        }
        if self.is_required(member) {
            out = out.required();
        }
        if let Some(marker) = self.marker(member) {
            out = out.marked(marker);
        }
        if let MemberRef::Class(class) = member {
            let names = self.ignored_properties(class);
            out = out.ignore_properties(names.iter().map(|n| &**n));
        }
        out
    }
}

/// Reads the annotations attached in the class metadata, unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredAnnotations;

impl AnnotationIntrospector for DeclaredAnnotations {}

// -----------------------------------------------------------------------------
// AnnotationOverrides

/// Mix-in annotations layered over another introspector.
///
/// Overrides are keyed by the declaring raw class and the declared member
/// name; the class itself is addressed with its own name. Values set in an
/// override win over the inner answer.
///
/// # Examples
///
/// ```
/// use vc_introspect::class::{Annotations, ClassDef, Visibility};
/// use vc_introspect::config::{AnnotationIntrospector, AnnotationOverrides, MemberRef};
/// use vc_introspect::types::{TypeDescriptor, TypeRef};
///
/// struct Account { pin: u32 }
///
/// let def = ClassDef::bean::<Account>(TypeDescriptor::simple("Account"))
///     .field("pin", TypeRef::of::<u32>(), Visibility::Public, |a| &a.pin)
///     .build();
///
/// let overrides = AnnotationOverrides::default()
///     .with("Account", "pin", Annotations::new().ignored());
///
/// assert!(overrides.is_ignored(MemberRef::Field(&def, &def.fields()[0])));
/// ```
pub struct AnnotationOverrides {
    inner: Arc<dyn AnnotationIntrospector>,
    overrides: HashMap<(RawClass, Arc<str>), Annotations>,
}

impl Default for AnnotationOverrides {
    fn default() -> Self {
        Self::new(Arc::new(DeclaredAnnotations))
    }
}

impl AnnotationOverrides {
    pub fn new(inner: Arc<dyn AnnotationIntrospector>) -> Self {
        Self {
            inner,
            overrides: HashMap::default(),
        }
    }

    /// Adds annotations for `member` of `class`, merging with earlier ones.
    pub fn with(mut self, class: &str, member: &str, annotations: Annotations) -> Self {
        self.overrides
            .entry((RawClass::new(class), Arc::from(member)))
            .or_default()
            .merge(annotations);
        self
    }

    fn lookup(&self, member: &MemberRef<'_>) -> Option<&Annotations> {
        let name = member.name()?;
        let key = (member.class().ty().raw().clone(), Arc::from(name));
        self.overrides.get(&key)
    }
}

impl AnnotationIntrospector for AnnotationOverrides {
    fn override_name(&self, member: MemberRef<'_>) -> Option<Arc<str>> {
        self.lookup(&member)
            .and_then(|ann| ann.rename_arc().cloned())
            .or_else(|| self.inner.override_name(member))
    }

    fn is_included(&self, member: MemberRef<'_>) -> bool {
        self.lookup(&member).is_some_and(Annotations::is_included) || self.inner.is_included(member)
    }

    fn is_ignored(&self, member: MemberRef<'_>) -> bool {
        self.lookup(&member).is_some_and(Annotations::is_ignored) || self.inner.is_ignored(member)
    }

    fn is_required(&self, member: MemberRef<'_>) -> bool {
        self.lookup(&member).is_some_and(Annotations::is_required) || self.inner.is_required(member)
    }

    fn marker(&self, member: MemberRef<'_>) -> Option<Marker> {
        self.lookup(&member)
            .and_then(Annotations::marker)
            .or_else(|| self.inner.marker(member))
    }

    fn ignored_properties(&self, class: &ClassDef) -> Vec<Arc<str>> {
        let mut names = self.inner.ignored_properties(class);
        if let Some(ann) = self.lookup(&MemberRef::Class(class)) {
            names.extend(ann.ignored_properties().iter().cloned());
        }
        names
    }
}

impl fmt::Debug for AnnotationOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationOverrides")
            .field("overrides", &self.overrides.len())
            .finish_non_exhaustive()
    }
}
