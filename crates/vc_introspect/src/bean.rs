use alloc::collections::BTreeSet;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::class::{Annotations, ClassDef};
use crate::config::{NamingRules, VisibilityChecker};
use crate::member::{CtorInfo, MemberInfo, MethodInfo};
use crate::property::PropertyDefinition;
use crate::resolver::{Resolution, is_member_visible};
use crate::types::{RawClass, TypeDescriptor, TypeRef};
use crate::IntrospectionError;

// -----------------------------------------------------------------------------
// MemberMap

/// Members keyed by logical property name, in property order.
///
/// Returned by the legacy views of [`BeanDescription`].
#[derive(Clone, Default, PartialEq)]
pub struct MemberMap<'a> {
    entries: Vec<(&'a str, &'a MemberInfo)>,
}

impl<'a> MemberMap<'a> {
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&'a MemberInfo> {
        self.entries
            .iter()
            .find_map(|(key, member)| (*key == name).then_some(*member))
    }

    #[inline]
    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a MemberInfo)> + '_ {
        self.entries.iter().copied()
    }
}

impl fmt::Debug for MemberMap<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, m)| (k, m.name())))
            .finish()
    }
}

// -----------------------------------------------------------------------------
// BeanDescription

/// The resolved view of a type: its properties and special members.
///
/// Immutable once built; [`ClassIntrospector`](crate::ClassIntrospector)
/// shares descriptions through `Arc`.
pub struct BeanDescription {
    ty: TypeDescriptor,
    class: Arc<ClassDef>,
    class_annotations: Annotations,
    naming: NamingRules,
    resolution: Resolution,
}

impl BeanDescription {
    pub(crate) fn new(
        ty: TypeDescriptor,
        class: Arc<ClassDef>,
        class_annotations: Annotations,
        naming: NamingRules,
        resolution: Resolution,
    ) -> Self {
        Self {
            ty,
            class,
            class_annotations,
            naming,
            resolution,
        }
    }

    /// The described type.
    #[inline]
    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    #[inline]
    pub fn bean_class(&self) -> &RawClass {
        self.ty.raw()
    }

    /// The class metadata the description was built from.
    #[inline]
    pub fn class_def(&self) -> &Arc<ClassDef> {
        &self.class
    }

    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.class.is_abstract()
    }

    /// Returns `true` if the class carries any annotation.
    #[inline]
    pub fn has_known_class_annotations(&self) -> bool {
        !self.class_annotations.is_empty()
    }

    /// Effective class-level annotations.
    #[inline]
    pub fn class_annotations(&self) -> &Annotations {
        &self.class_annotations
    }

    /// Bindings of the generic parameters of the described type.
    #[inline]
    pub fn bindings(&self) -> &[TypeDescriptor] {
        self.ty.bindings()
    }

    /// Resolves a type declared inside the class against its bindings.
    #[inline]
    pub fn resolve_type(&self, declared: &TypeRef) -> Result<TypeDescriptor, IntrospectionError> {
        declared.resolve(self.ty.bindings())
    }

    /// Properties that are not ignored, in stable order.
    pub fn find_properties(&self) -> impl Iterator<Item = &PropertyDefinition> {
        self.resolution.properties.iter().filter(|p| !p.is_ignored())
    }

    /// Returns the non-ignored property called `name`.
    pub fn find_property(&self, name: &str) -> Option<&PropertyDefinition> {
        self.find_properties().find(|p| p.name() == name)
    }

    /// Every property, including the ones the class ignores by name.
    #[inline]
    pub fn all_properties(&self) -> &[PropertyDefinition] {
        &self.resolution.properties
    }

    #[inline]
    pub fn find_any_getter(&self) -> Option<&MethodInfo> {
        self.resolution.any_getter()
    }

    #[inline]
    pub fn find_any_setter(&self) -> Option<&MethodInfo> {
        self.resolution.any_setter()
    }

    #[inline]
    pub fn find_value_method(&self) -> Option<&MethodInfo> {
        self.resolution.value_method()
    }

    #[inline]
    pub fn find_default_constructor(&self) -> Option<&CtorInfo> {
        self.resolution.default_constructor()
    }

    #[inline]
    pub fn find_property_creator(&self) -> Option<&CtorInfo> {
        self.resolution.property_creator()
    }

    /// Constructors declared by the type.
    #[inline]
    pub fn constructors(&self) -> &[CtorInfo] {
        &self.resolution.constructors
    }

    /// Names that are ignored: dropped because every member was explicitly
    /// ignored, or listed in the class or global ignore list.
    #[inline]
    pub fn ignored_property_names(&self) -> &BTreeSet<Arc<str>> {
        &self.resolution.ignored_names
    }

    /// Returns `true` if `name` is an ignored property name.
    #[inline]
    pub fn is_ignored_property(&self, name: &str) -> bool {
        self.resolution.ignored_names.contains(name)
    }

    // -------------------------------------------------------------------------
    // Legacy views

    fn view<'a>(
        &'a self,
        ignored: &[&str],
        pick: impl Fn(&'a PropertyDefinition) -> Option<&'a MemberInfo>,
        checker: &VisibilityChecker,
    ) -> MemberMap<'a> {
        let entries = self
            .find_properties()
            .filter(|p| !ignored.contains(&p.name()))
            .filter_map(|p| pick(p).map(|m| (p.name(), m)))
            .filter(|(_, m)| is_member_visible(checker, &self.naming, m))
            .collect();
        MemberMap { entries }
    }

    /// Getters by property name, filtered by `checker` and `ignored`.
    #[deprecated(note = "use `find_properties` and `PropertyDefinition::getter`")]
    pub fn find_getters(&self, checker: &VisibilityChecker, ignored: &[&str]) -> MemberMap<'_> {
        self.view(ignored, PropertyDefinition::getter, checker)
    }

    /// Setters by property name, filtered by `checker`.
    #[deprecated(note = "use `find_properties` and `PropertyDefinition::setter`")]
    pub fn find_setters(&self, checker: &VisibilityChecker) -> MemberMap<'_> {
        self.view(&[], PropertyDefinition::setter, checker)
    }

    /// Assignable fields by property name, filtered by `checker` and `ignored`.
    #[deprecated(note = "use `find_properties` and `PropertyDefinition::field`")]
    pub fn find_deserializable_fields(&self, checker: &VisibilityChecker, ignored: &[&str]) -> MemberMap<'_> {
        self.view(ignored, |p| p.field().filter(|f| f.can_write()), checker)
    }

    /// Readable fields by property name, filtered by `checker` and `ignored`.
    #[deprecated(note = "use `find_properties` and `PropertyDefinition::field`")]
    pub fn find_serializable_fields(&self, checker: &VisibilityChecker, ignored: &[&str]) -> MemberMap<'_> {
        self.view(ignored, PropertyDefinition::field, checker)
    }
}

impl fmt::Debug for BeanDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanDescription")
            .field("ty", &self.ty)
            .field("properties", &self.resolution.properties)
            .field("ignored", &self.resolution.ignored_names)
            .finish_non_exhaustive()
    }
}
