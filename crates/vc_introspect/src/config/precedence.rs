use alloc::vec::Vec;

use crate::member::MemberKind;

/// Which member supplies the declared type of a property whose members
/// disagree.
///
/// Kinds are tried in order; the first one present in the property wins.
/// Kinds left out of the list are tried last, in [`MemberKind::ALL`] order.
///
/// # Examples
///
/// ```
/// use vc_introspect::MemberKind;
/// use vc_introspect::config::TypePrecedence;
///
/// let default = TypePrecedence::default();
/// assert_eq!(default.order()[0], MemberKind::Field);
///
/// let getter_first = TypePrecedence::new([MemberKind::Getter]);
/// assert_eq!(getter_first.order()[0], MemberKind::Getter);
/// assert_eq!(getter_first.order().len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypePrecedence {
    order: Vec<MemberKind>,
}

impl TypePrecedence {
    /// Field, then setter parameter, then getter return, then creator parameter.
    pub const DEFAULT_ORDER: [MemberKind; 4] = [
        MemberKind::Field,
        MemberKind::Setter,
        MemberKind::Getter,
        MemberKind::CtorParam,
    ];

    /// Builds a precedence from a preferred order; duplicates are dropped.
    pub fn new(preferred: impl IntoIterator<Item = MemberKind>) -> Self {
        let mut order: Vec<MemberKind> = Vec::with_capacity(4);
        for kind in preferred.into_iter().chain(MemberKind::ALL) {
            if !order.contains(&kind) {
                order.push(kind);
            }
        }
        Self { order }
    }

    /// The complete order.
    #[inline]
    pub fn order(&self) -> &[MemberKind] {
        &self.order
    }
}

impl Default for TypePrecedence {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ORDER)
    }
}
