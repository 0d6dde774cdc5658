use alloc::sync::Arc;
use alloc::vec::Vec;

use log::trace;

use crate::class::{Annotations, ClassDef, ClassProvider, Marker, MethodAccess, MethodDef};
use crate::class::{UpcastFn, UpcastMutFn, compose};
use crate::config::{AnnotationIntrospector, MemberRef};
use crate::member::{CtorInfo, CtorParamInfo, MemberAccess, MemberInfo, MethodInfo};
use crate::types::{RawClass, TypeDescriptor};
use crate::IntrospectionError;

// -----------------------------------------------------------------------------
// CollectedMembers

/// Every member of a type that may contribute to its properties, in
/// collection order.
///
/// Explicitly ignored members are kept, flagged through their annotations, so
/// the resolver can tell an ignored property from an absent one.
#[derive(Debug, Clone)]
pub struct CollectedMembers {
    pub(crate) ty: TypeDescriptor,
    pub(crate) class: Arc<ClassDef>,
    pub(crate) class_annotations: Annotations,
    pub(crate) members: Vec<MemberInfo>,
    pub(crate) any_getters: Vec<MethodInfo>,
    pub(crate) any_setters: Vec<MethodInfo>,
    pub(crate) value_methods: Vec<MethodInfo>,
    pub(crate) ctors: Vec<CtorInfo>,
}

impl CollectedMembers {
    #[inline]
    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    #[inline]
    pub fn class_def(&self) -> &Arc<ClassDef> {
        &self.class
    }

    /// Effective class-level annotations.
    #[inline]
    pub fn class_annotations(&self) -> &Annotations {
        &self.class_annotations
    }

    /// Fields, accessor methods and creator parameters, ignored ones included.
    #[inline]
    pub fn members(&self) -> &[MemberInfo] {
        &self.members
    }

    /// Members withheld by an explicit ignore.
    pub fn explicitly_ignored(&self) -> impl Iterator<Item = &MemberInfo> {
        self.members.iter().filter(|m| m.annotations.is_ignored())
    }

    #[inline]
    pub fn any_getters(&self) -> &[MethodInfo] {
        &self.any_getters
    }

    #[inline]
    pub fn any_setters(&self) -> &[MethodInfo] {
        &self.any_setters
    }

    #[inline]
    pub fn value_methods(&self) -> &[MethodInfo] {
        &self.value_methods
    }

    /// Constructors declared by the type itself.
    #[inline]
    pub fn constructors(&self) -> &[CtorInfo] {
        &self.ctors
    }
}

// -----------------------------------------------------------------------------
// Walk state

#[derive(Clone)]
struct Upcast {
    get: UpcastFn,
    get_mut: UpcastMutFn,
}

enum MethodEntry {
    Accessor(MemberInfo),
    Special(Marker, MethodInfo),
    Other,
}

struct MethodSlot {
    name: Arc<str>,
    arity: usize,
    entry: MethodEntry,
}

#[derive(Default)]
struct Walk {
    stack: Vec<RawClass>,
    fields: Vec<MemberInfo>,
    methods: Vec<MethodSlot>,
}

// -----------------------------------------------------------------------------
// MemberCollector

/// Gathers the fields, methods and constructors of a type and its supertypes.
///
/// Supertypes are walked depth-first, root-most first, so inherited members
/// precede the members declared by the type itself. A field hides an
/// inherited field of the same name; a method overrides an inherited method
/// of the same name and arity.
pub struct MemberCollector<'a> {
    provider: &'a dyn ClassProvider,
    annotations: &'a dyn AnnotationIntrospector,
}

impl<'a> MemberCollector<'a> {
    pub fn new(provider: &'a dyn ClassProvider, annotations: &'a dyn AnnotationIntrospector) -> Self {
        Self {
            provider,
            annotations,
        }
    }

    /// Collects the members of `ty`.
    ///
    /// # Errors
    ///
    /// - [`IntrospectionError::UnknownClass`] if a class in the hierarchy has no metadata.
    /// - [`IntrospectionError::CyclicHierarchy`] if a class is its own supertype.
    /// - [`IntrospectionError::UnboundTypeParameter`] if a declared type cannot be resolved.
    /// - [`IntrospectionError::Inaccessible`] if a method marker does not match its signature.
    pub fn collect(&self, ty: &TypeDescriptor) -> Result<CollectedMembers, IntrospectionError> {
        let mut walk = Walk::default();
        let class = self.walk(ty, None, &mut walk)?;

        let mut ordinal = 0usize;
        let mut next = || {
            ordinal += 1;
            ordinal - 1
        };

        let mut members = Vec::with_capacity(walk.fields.len() + walk.methods.len());
        let mut any_getters = Vec::new();
        let mut any_setters = Vec::new();
        let mut value_methods = Vec::new();

        for mut field in walk.fields {
            field.ordinal = next();
            members.push(field);
        }
        for slot in walk.methods {
            match slot.entry {
                MethodEntry::Accessor(mut member) => {
                    member.ordinal = next();
                    members.push(member);
                }
                MethodEntry::Special(marker, mut method) => {
                    method.ordinal = next();
                    match marker {
                        Marker::AnyGetter => any_getters.push(method),
                        Marker::AnySetter => any_setters.push(method),
                        Marker::ValueMethod => value_methods.push(method),
                        Marker::Creator => {}
                    }
                }
                MethodEntry::Other => {}
            }
        }

        let ctors = self.constructors(ty, &class)?;
        for (ctor_index, ctor) in ctors.iter().enumerate() {
            if !ctor.is_creator() {
                continue;
            }
            for param in &ctor.params {
                let Some(name) = &param.name else {
                    continue;
                };
                members.push(MemberInfo {
                    name: name.clone(),
                    ty: param.ty.clone(),
                    visibility: ctor.visibility,
                    declaring: ty.clone(),
                    annotations: param.annotations.clone(),
                    ordinal: next(),
                    access: MemberAccess::CtorParam {
                        ctor: ctor_index,
                        index: param.index,
                    },
                });
            }
        }

        trace!(
            "collected {} member(s) and {} constructor(s) of `{ty}`",
            members.len(),
            ctors.len()
        );

        Ok(CollectedMembers {
            ty: ty.clone(),
            class_annotations: self.annotations.effective(MemberRef::Class(&class)),
            class,
            members,
            any_getters,
            any_setters,
            value_methods,
            ctors,
        })
    }

    fn walk(
        &self,
        ty: &TypeDescriptor,
        up: Option<&Upcast>,
        walk: &mut Walk,
    ) -> Result<Arc<ClassDef>, IntrospectionError> {
        if walk.stack.contains(ty.raw()) {
            return Err(IntrospectionError::CyclicHierarchy(ty.clone()));
        }
        let class = self.provider.describe(ty)?;

        walk.stack.push(ty.raw().clone());
        for supertype in class.supertypes() {
            let super_ty = supertype.ty.resolve(ty.bindings())?;
            let super_up = match up {
                None => Upcast {
                    get: supertype.upcast.clone(),
                    get_mut: supertype.upcast_mut.clone(),
                },
                Some(outer) => Upcast {
                    get: compose::upcast(&outer.get, &supertype.upcast),
                    get_mut: compose::upcast_mut(&outer.get_mut, &supertype.upcast_mut),
                },
            };
            self.walk(&super_ty, Some(&super_up), walk)?;
        }
        walk.stack.pop();

        for field in class.fields() {
            let (get, set) = match up {
                None => (field.get.clone(), field.set.clone()),
                Some(up) => (
                    compose::field_get(&up.get, &field.get),
                    field.set.as_ref().map(|set| compose::field_set(&up.get_mut, set)),
                ),
            };
            let member = MemberInfo {
                name: field.name.clone(),
                ty: field.ty.resolve(ty.bindings())?,
                visibility: field.visibility,
                declaring: ty.clone(),
                annotations: self.annotations.effective(MemberRef::Field(&class, field)),
                ordinal: 0,
                access: MemberAccess::Field { get, set },
            };
            // A hiding field keeps the position of the hidden one.
            match walk.fields.iter_mut().find(|f| f.name == field.name) {
                Some(hidden) => *hidden = member,
                None => walk.fields.push(member),
            }
        }

        for method in class.methods() {
            let entry = self.method_entry(ty, &class, method, up)?;
            let slot = MethodSlot {
                name: method.name.clone(),
                arity: method.arity(),
                entry,
            };
            match walk
                .methods
                .iter_mut()
                .find(|m| m.name == method.name && m.arity == method.arity())
            {
                Some(overridden) => *overridden = slot,
                None => walk.methods.push(slot),
            }
        }

        Ok(class)
    }

    fn method_entry(
        &self,
        ty: &TypeDescriptor,
        class: &ClassDef,
        method: &MethodDef,
        up: Option<&Upcast>,
    ) -> Result<MethodEntry, IntrospectionError> {
        let inaccessible = |reason| IntrospectionError::Inaccessible {
            ty: ty.clone(),
            member: method.name.clone(),
            reason,
        };

        let annotations = self.annotations.effective(MemberRef::Method(class, method));
        let returns = method
            .returns
            .as_ref()
            .map(|r| r.resolve(ty.bindings()))
            .transpose()?;
        let access = match up {
            None => method.access.clone(),
            Some(up) => match &method.access {
                MethodAccess::Read(call) => MethodAccess::Read(compose::getter(&up.get, call)),
                MethodAccess::Write(call) => MethodAccess::Write(compose::field_set(&up.get_mut, call)),
                MethodAccess::ReadEntries(call) => {
                    MethodAccess::ReadEntries(compose::any_getter(&up.get, call))
                }
                MethodAccess::WriteEntry(call) => {
                    MethodAccess::WriteEntry(compose::any_setter(&up.get_mut, call))
                }
            },
        };

        let member = |member_ty: TypeDescriptor, access: MemberAccess, annotations: Annotations| MemberInfo {
            name: method.name.clone(),
            ty: member_ty,
            visibility: method.visibility,
            declaring: ty.clone(),
            annotations,
            ordinal: 0,
            access,
        };
        let special = |value_type: Option<TypeDescriptor>, access: MethodAccess, annotations| MethodInfo {
            name: method.name.clone(),
            value_type,
            visibility: method.visibility,
            declaring: ty.clone(),
            annotations,
            ordinal: 0,
            access,
        };

        let entry = match (annotations.marker(), access) {
            (None, MethodAccess::Read(call)) => {
                let returns = returns.ok_or_else(|| inaccessible("getter declares no return type"))?;
                MethodEntry::Accessor(member(returns, MemberAccess::Getter(call), annotations))
            }
            (None, MethodAccess::Write(call)) => {
                let [param] = method.params.as_slice() else {
                    return Err(inaccessible("setter must take exactly one parameter"));
                };
                let param = param.resolve(ty.bindings())?;
                MethodEntry::Accessor(member(param, MemberAccess::Setter(call), annotations))
            }
            (None, MethodAccess::ReadEntries(_) | MethodAccess::WriteEntry(_)) => MethodEntry::Other,
            (Some(Marker::ValueMethod), access @ MethodAccess::Read(_)) => {
                MethodEntry::Special(Marker::ValueMethod, special(returns, access, annotations))
            }
            (Some(Marker::AnyGetter), access @ MethodAccess::ReadEntries(_)) => {
                MethodEntry::Special(Marker::AnyGetter, special(returns, access, annotations))
            }
            (Some(Marker::AnySetter), access @ MethodAccess::WriteEntry(_)) => {
                let value_type = method
                    .params
                    .get(1)
                    .map(|p| p.resolve(ty.bindings()))
                    .transpose()?;
                MethodEntry::Special(Marker::AnySetter, special(value_type, access, annotations))
            }
            (Some(_), _) => return Err(inaccessible("marker does not match the method signature")),
        };
        Ok(entry)
    }

    fn constructors(&self, ty: &TypeDescriptor, class: &ClassDef) -> Result<Vec<CtorInfo>, IntrospectionError> {
        class
            .constructors()
            .iter()
            .map(|ctor| {
                let params = ctor
                    .params
                    .iter()
                    .enumerate()
                    .map(|(index, param)| {
                        let param_ref = MemberRef::CtorParam(class, param);
                        Ok(CtorParamInfo {
                            name: self
                                .annotations
                                .override_name(param_ref)
                                .or_else(|| param.name.clone()),
                            ty: param.ty.resolve(ty.bindings())?,
                            annotations: self.annotations.effective(param_ref),
                            index,
                        })
                    })
                    .collect::<Result<Vec<_>, IntrospectionError>>()?;
                Ok(CtorInfo {
                    declaring: ty.clone(),
                    visibility: ctor.visibility,
                    annotations: self.annotations.effective(MemberRef::Ctor(class, ctor)),
                    params,
                    invoke: ctor.invoke.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;

    use super::*;
    use crate::config::DeclaredAnnotations;
    use crate::fixtures;
    use crate::member::MemberKind;
    use crate::types::TypeDescriptor;

    fn collect(ty: &TypeDescriptor) -> Result<CollectedMembers, IntrospectionError> {
        let table = fixtures::table();
        MemberCollector::new(&table, &DeclaredAnnotations).collect(ty)
    }

    #[test]
    fn fields_then_methods_then_creator_params() {
        let members = collect(&fixtures::person()).unwrap();
        let kinds: Vec<_> = members.members().iter().map(|m| m.kind()).collect();

        let first_method = kinds.iter().position(|k| *k != MemberKind::Field).unwrap();
        let first_param = kinds.iter().position(|k| *k == MemberKind::CtorParam).unwrap();
        assert!(kinds[..first_method].iter().all(|k| *k == MemberKind::Field));
        assert!(kinds[first_param..].iter().all(|k| *k == MemberKind::CtorParam));

        let ordinals: Vec<_> = members.members().iter().map(|m| m.ordinal()).collect();
        assert!(ordinals.windows(2).all(|w| w[0] < w[1]));

        assert_eq!(members.any_getters().len(), 1);
        assert_eq!(members.any_setters().len(), 1);
        assert_eq!(members.constructors().len(), 1);
        assert!(members.constructors()[0].is_creator());
    }

    #[test]
    fn inherited_members_come_first_and_resolve_bindings() {
        let members = collect(&fixtures::child()).unwrap();
        let fields: Vec<_> = members
            .members()
            .iter()
            .filter(|m| m.kind() == MemberKind::Field)
            .map(|m| (m.name(), m.ty().to_string(), m.declaring_type().name()))
            .collect();

        assert_eq!(
            fields,
            [
                ("id", String::from("u64"), "Base"),
                ("value", String::from("String"), "Base"),
                ("tag", String::from("String"), "Child"),
                ("name", String::from("String"), "Child"),
            ]
        );
    }

    #[test]
    fn inherited_accessors_accept_the_subtype() {
        let members = collect(&fixtures::child()).unwrap();
        let mut child = fixtures::Child::sample();

        let value = members.members().iter().find(|m| m.name() == "value").unwrap();
        let read = value.read(&child).unwrap();
        assert_eq!(read.as_any().downcast_ref::<String>().unwrap(), "inner");

        let id = members.members().iter().find(|m| m.name() == "id").unwrap();
        id.write(&mut child, Box::new(7u64)).unwrap();
        assert_eq!(child.base.id, 7);
    }

    #[test]
    fn cyclic_hierarchy_is_reported() {
        let err = collect(&TypeDescriptor::simple("LoopA")).unwrap_err();
        assert!(matches!(err, IntrospectionError::CyclicHierarchy(_)));
    }

    #[test]
    fn unknown_class_is_reported() {
        let err = collect(&TypeDescriptor::simple("Missing")).unwrap_err();
        assert!(matches!(err, IntrospectionError::UnknownClass(ty) if ty.name() == "Missing"));
    }

    #[test]
    fn ignored_members_are_flagged() {
        let members = collect(&fixtures::person()).unwrap();
        let ignored: Vec<_> = members.explicitly_ignored().map(|m| m.name()).collect();
        assert_eq!(ignored, ["password"]);
    }
}
