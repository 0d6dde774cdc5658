use alloc::sync::Arc;
use core::fmt;

use crate::member::{MemberAccess, MemberInfo, MemberKind};
use crate::types::TypeDescriptor;

/// A logical property: a name backed by up to one field, getter, setter and
/// creator parameter.
///
/// Members that did not pass their visibility threshold stay attached, so a
/// property made visible by its getter can still be written through a
/// private field.
#[derive(Clone, PartialEq)]
pub struct PropertyDefinition {
    pub(crate) name: Arc<str>,
    pub(crate) field: Option<MemberInfo>,
    pub(crate) getter: Option<MemberInfo>,
    pub(crate) setter: Option<MemberInfo>,
    pub(crate) ctor_param: Option<MemberInfo>,
    pub(crate) declared_type: TypeDescriptor,
    pub(crate) is_ignored: bool,
    pub(crate) is_required: bool,
    pub(crate) index: usize,
    pub(crate) visible: u8,
}

#[inline]
const fn bit(kind: MemberKind) -> u8 {
    1 << kind as u8
}

impl PropertyDefinition {
    /// The logical name, unique within a description.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    #[inline]
    pub fn field(&self) -> Option<&MemberInfo> {
        self.field.as_ref()
    }

    #[inline]
    pub fn getter(&self) -> Option<&MemberInfo> {
        self.getter.as_ref()
    }

    #[inline]
    pub fn setter(&self) -> Option<&MemberInfo> {
        self.setter.as_ref()
    }

    #[inline]
    pub fn ctor_param(&self) -> Option<&MemberInfo> {
        self.ctor_param.as_ref()
    }

    /// Returns the member of the given kind.
    pub fn member(&self, kind: MemberKind) -> Option<&MemberInfo> {
        match kind {
            MemberKind::Field => self.field.as_ref(),
            MemberKind::Getter => self.getter.as_ref(),
            MemberKind::Setter => self.setter.as_ref(),
            MemberKind::CtorParam => self.ctor_param.as_ref(),
        }
    }

    /// Iterates the present members: field, getter, setter, creator parameter.
    pub fn members(&self) -> impl Iterator<Item = &MemberInfo> {
        MemberKind::ALL.into_iter().filter_map(|kind| self.member(kind))
    }

    /// The declared type, chosen by the configured
    /// [`TypePrecedence`](crate::config::TypePrecedence).
    #[inline]
    pub fn declared_type(&self) -> &TypeDescriptor {
        &self.declared_type
    }

    /// Returns `true` if the class ignores this property by name.
    #[inline]
    pub fn is_ignored(&self) -> bool {
        self.is_ignored
    }

    #[inline]
    pub fn is_required(&self) -> bool {
        self.is_required
    }

    /// Ordinal of the first member, in collection order.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns `true` if the member of `kind` is present and passed its
    /// visibility threshold, or was explicitly annotated.
    #[inline]
    pub fn is_visible(&self, kind: MemberKind) -> bool {
        self.visible & bit(kind) != 0
    }

    pub(crate) fn mark_visible(&mut self, kind: MemberKind) {
        self.visible |= bit(kind);
    }

    /// The member used to read the property: a visible getter, else a
    /// visible field.
    pub fn accessor(&self) -> Option<&MemberInfo> {
        [MemberKind::Getter, MemberKind::Field]
            .into_iter()
            .filter(|kind| self.is_visible(*kind))
            .find_map(|kind| self.member(kind))
    }

    /// The member used to assign the property after construction: a visible
    /// setter, else any assignable field.
    pub fn mutator(&self) -> Option<&MemberInfo> {
        self.setter
            .as_ref()
            .filter(|_| self.is_visible(MemberKind::Setter))
            .or_else(|| self.field.as_ref().filter(|f| f.can_write()))
    }

    /// The creator parameter index, if the property is bound by the creator.
    pub fn creator_index(&self) -> Option<usize> {
        match self.ctor_param.as_ref()?.access() {
            MemberAccess::CtorParam { index, .. } => Some(*index),
            _ => None,
        }
    }

    #[inline]
    pub fn has_getter(&self) -> bool {
        self.getter.is_some()
    }

    #[inline]
    pub fn has_setter(&self) -> bool {
        self.setter.is_some()
    }

    #[inline]
    pub fn has_field(&self) -> bool {
        self.field.is_some()
    }

    #[inline]
    pub fn has_ctor_param(&self) -> bool {
        self.ctor_param.is_some()
    }
}

impl fmt::Debug for PropertyDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("PropertyDefinition");
        dbg.field("name", &self.name);
        for member in self.members() {
            dbg.field(member.kind().as_str(), &member.name());
        }
        dbg.field("declared_type", &self.declared_type)
            .field("is_ignored", &self.is_ignored)
            .field("is_required", &self.is_required)
            .finish()
    }
}
