use alloc::collections::BTreeSet;
use alloc::sync::Arc;
use alloc::vec::Vec;

use log::trace;

use crate::collector::CollectedMembers;
use crate::config::{IntrospectionConfig, NamingRules, VisibilityChecker};
use crate::hash::HashMap;
use crate::member::{CtorInfo, MemberInfo, MemberKind, MethodInfo, SpecialKind};
use crate::property::PropertyDefinition;
use crate::types::TypeDescriptor;
use crate::ConflictError;

// -----------------------------------------------------------------------------
// Resolution

/// The outcome of merging the members of a type into properties.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub(crate) properties: Vec<PropertyDefinition>,
    pub(crate) ignored_names: BTreeSet<Arc<str>>,
    pub(crate) any_getter: Option<MethodInfo>,
    pub(crate) any_setter: Option<MethodInfo>,
    pub(crate) value_method: Option<MethodInfo>,
    pub(crate) constructors: Vec<CtorInfo>,
    pub(crate) default_ctor: Option<usize>,
    pub(crate) property_creator: Option<usize>,
}

impl Resolution {
    /// Every property in collection order, class-ignored ones included.
    #[inline]
    pub fn properties(&self) -> &[PropertyDefinition] {
        &self.properties
    }

    #[inline]
    pub fn ignored_names(&self) -> &BTreeSet<Arc<str>> {
        &self.ignored_names
    }

    #[inline]
    pub fn any_getter(&self) -> Option<&MethodInfo> {
        self.any_getter.as_ref()
    }

    #[inline]
    pub fn any_setter(&self) -> Option<&MethodInfo> {
        self.any_setter.as_ref()
    }

    #[inline]
    pub fn value_method(&self) -> Option<&MethodInfo> {
        self.value_method.as_ref()
    }

    #[inline]
    pub fn default_constructor(&self) -> Option<&CtorInfo> {
        self.default_ctor.map(|i| &self.constructors[i])
    }

    #[inline]
    pub fn property_creator(&self) -> Option<&CtorInfo> {
        self.property_creator.map(|i| &self.constructors[i])
    }
}

// -----------------------------------------------------------------------------
// Grouping

struct Group {
    name: Arc<str>,
    members: [Option<MemberInfo>; 4],
    explicitly_ignored: bool,
}

impl Group {
    fn new(name: Arc<str>) -> Self {
        Self {
            name,
            members: [None, None, None, None],
            explicitly_ignored: false,
        }
    }

    fn first_ordinal(&self) -> Option<usize> {
        self.members.iter().flatten().map(MemberInfo::ordinal).min()
    }
}

// -----------------------------------------------------------------------------
// PropertyResolver

/// Merges collected members into logical properties.
///
/// - Names come from an explicit override, or from the declared name with
///   accessor prefixes stripped and the remainder decapitalized.
/// - Members are grouped by name, one per kind; a second member of the same
///   kind is a conflict.
/// - A property is kept if one of its members passes its visibility
///   threshold or is explicitly annotated.
/// - Explicitly ignored members are removed one by one. A property whose
///   members were all ignored, or whose remaining members are all below
///   their threshold, is dropped and its name reported as ignored.
/// - Properties named in the class's ignore list are kept but flagged.
///
/// The order of properties is the collection order of their first member.
pub struct PropertyResolver<'a> {
    config: &'a IntrospectionConfig,
}

impl<'a> PropertyResolver<'a> {
    #[inline]
    pub fn new(config: &'a IntrospectionConfig) -> Self {
        Self { config }
    }

    /// Resolves the properties and special members of `members`.
    ///
    /// # Errors
    ///
    /// - [`ConflictError::DuplicateSpecial`] if a type has several any-getters,
    ///   any-setters, value methods, default constructors or creators.
    /// - [`ConflictError::DuplicateAccessor`] if two members of one kind share
    ///   a logical name.
    /// - [`ConflictError::UnnamedCreatorParameter`] if a creator parameter has
    ///   no name.
    pub fn resolve(&self, members: CollectedMembers) -> Result<Resolution, ConflictError> {
        let CollectedMembers {
            ty,
            class: _,
            class_annotations,
            members,
            any_getters,
            any_setters,
            value_methods,
            ctors,
        } = members;

        let any_getter = single(&ty, SpecialKind::AnyGetter, any_getters, |m| m.name.clone())?;
        let any_setter = single(&ty, SpecialKind::AnySetter, any_setters, |m| m.name.clone())?;
        let value_method = single(&ty, SpecialKind::ValueMethod, value_methods, |m| m.name.clone())?;

        let ctor_name = |(i, _): &(usize, &CtorInfo)| -> Arc<str> { alloc::format!("{ty}#{i}").into() };
        let default_ctor = single(
            &ty,
            SpecialKind::DefaultConstructor,
            ctors.iter().enumerate().filter(|(_, c)| c.arity() == 0).collect(),
            ctor_name,
        )?
        .map(|(i, _)| i);
        let property_creator = single(
            &ty,
            SpecialKind::PropertyCreator,
            ctors.iter().enumerate().filter(|(_, c)| c.is_creator()).collect(),
            ctor_name,
        )?
        .map(|(i, _)| i);

        if let Some(creator) = property_creator {
            if let Some(param) = ctors[creator].params.iter().find(|p| p.name.is_none()) {
                return Err(ConflictError::UnnamedCreatorParameter {
                    ty: ty.clone(),
                    index: param.index,
                });
            }
        }

        let groups = self.group(&ty, members)?;

        let mut ignored_names: BTreeSet<Arc<str>> = BTreeSet::new();
        let class_ignored: Vec<&Arc<str>> = class_annotations
            .ignored_properties()
            .iter()
            .chain(self.config.ignored_properties.iter())
            .collect();
        ignored_names.extend(class_ignored.iter().map(|n| (*n).clone()));

        let mut properties = Vec::with_capacity(groups.len());
        for group in groups {
            let Some(index) = group.first_ordinal() else {
                if group.explicitly_ignored {
                    ignored_names.insert(group.name);
                }
                continue;
            };
            let (name, explicitly_ignored) = (group.name.clone(), group.explicitly_ignored);
            match self.build_property(group, index) {
                Some(property) => properties.push(property),
                // The ignored member was the only visible one.
                None if explicitly_ignored => {
                    ignored_names.insert(name);
                }
                None => {}
            }
        }

        for property in &mut properties {
            if class_ignored.iter().any(|n| **n == property.name) {
                property.is_ignored = true;
            }
        }
        properties.sort_by_key(PropertyDefinition::index);

        trace!(
            "resolved {} propert(ies) of `{ty}`, ignored: {:?}",
            properties.len(),
            ignored_names
        );

        Ok(Resolution {
            properties,
            ignored_names,
            any_getter,
            any_setter,
            value_method,
            constructors: ctors,
            default_ctor,
            property_creator,
        })
    }

    fn logical_name(&self, member: &MemberInfo) -> Option<Arc<str>> {
        if let Some(name) = member.annotations.rename_arc() {
            return Some(name.clone());
        }
        let naming = &self.config.naming;
        match member.kind() {
            MemberKind::Field | MemberKind::CtorParam => Some(member.name.clone()),
            MemberKind::Getter => naming
                .getter_name(&member.name, is_bool(&member.ty))
                .map(Arc::from),
            MemberKind::Setter => naming.setter_name(&member.name).map(Arc::from),
        }
    }

    fn group(&self, ty: &TypeDescriptor, members: Vec<MemberInfo>) -> Result<Vec<Group>, ConflictError> {
        let mut index: HashMap<Arc<str>, usize> = HashMap::default();
        let mut groups: Vec<Group> = Vec::new();

        for member in members {
            let Some(name) = self.logical_name(&member) else {
                continue;
            };
            let slot = *index.entry(name.clone()).or_insert_with(|| {
                groups.push(Group::new(name.clone()));
                groups.len() - 1
            });
            let group = &mut groups[slot];

            if member.annotations.is_ignored() {
                group.explicitly_ignored = true;
                continue;
            }

            let kind = member.kind();
            match &group.members[kind as usize] {
                Some(first) => {
                    return Err(ConflictError::DuplicateAccessor {
                        ty: ty.clone(),
                        property: name,
                        kind,
                        first: first.name.clone(),
                        second: member.name,
                    });
                }
                None => group.members[kind as usize] = Some(member),
            }
        }
        Ok(groups)
    }

    #[inline]
    fn is_visible(&self, member: &MemberInfo) -> bool {
        is_member_visible(&self.config.visibility, &self.config.naming, member)
    }

    fn build_property(&self, group: Group, index: usize) -> Option<PropertyDefinition> {
        let [field, getter, setter, ctor_param] = group.members;

        let declared_type = {
            let by_kind = |kind: MemberKind| match kind {
                MemberKind::Field => field.as_ref(),
                MemberKind::Getter => getter.as_ref(),
                MemberKind::Setter => setter.as_ref(),
                MemberKind::CtorParam => ctor_param.as_ref(),
            };
            self.config
                .type_precedence
                .order()
                .iter()
                .find_map(|kind| by_kind(*kind))
                .map(|m| m.ty.clone())?
        };

        let mut property = PropertyDefinition {
            name: group.name,
            field,
            getter,
            setter,
            ctor_param,
            declared_type,
            is_ignored: false,
            is_required: false,
            index,
            visible: 0,
        };

        let visible: Vec<MemberKind> = property
            .members()
            .filter(|m| self.is_visible(m))
            .map(MemberInfo::kind)
            .collect();
        if visible.is_empty() {
            return None;
        }
        let is_required = property.members().any(|m| m.annotations.is_required());
        property.is_required = is_required;
        for kind in visible {
            property.mark_visible(kind);
        }
        Some(property)
    }
}

/// Returns `true` if `member` is explicitly annotated or passes the threshold
/// of its kind.
pub(crate) fn is_member_visible(checker: &VisibilityChecker, naming: &NamingRules, member: &MemberInfo) -> bool {
    if member.annotations.is_explicit() {
        return true;
    }
    let visibility = member.visibility;
    match member.kind() {
        MemberKind::Field => checker.is_field_visible(visibility),
        MemberKind::Getter if naming.is_is_getter(&member.name, is_bool(&member.ty)) => {
            checker.is_is_getter_visible(visibility)
        }
        MemberKind::Getter => checker.is_getter_visible(visibility),
        MemberKind::Setter => checker.is_setter_visible(visibility),
        MemberKind::CtorParam => checker.is_creator_visible(visibility),
    }
}

#[inline]
fn is_bool(ty: &TypeDescriptor) -> bool {
    ty.name() == crate::types::well_known::BOOL
}

/// Returns the only candidate, or a conflict naming all of them.
fn single<T>(
    ty: &TypeDescriptor,
    kind: SpecialKind,
    mut candidates: Vec<T>,
    name: impl Fn(&T) -> Arc<str>,
) -> Result<Option<T>, ConflictError> {
    if candidates.len() > 1 {
        return Err(ConflictError::DuplicateSpecial {
            ty: ty.clone(),
            kind,
            members: candidates.iter().map(name).collect(),
        });
    }
    Ok(candidates.pop())
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::*;
    use crate::class::{Annotations, ClassDef, ClassTable, Visibility};
    use crate::collector::MemberCollector;
    use crate::config::{AnnotationOverrides, ManglePolicy, MinVisibility, TypePrecedence};
    use crate::fixtures;
    use crate::types::TypeRef;

    fn resolve_with(
        table: &ClassTable,
        config: &IntrospectionConfig,
        ty: &TypeDescriptor,
    ) -> Result<Resolution, ConflictError> {
        let members = MemberCollector::new(table, &*config.annotations)
            .collect(ty)
            .unwrap();
        PropertyResolver::new(config).resolve(members)
    }

    fn resolve(ty: &TypeDescriptor) -> Result<Resolution, ConflictError> {
        resolve_with(&fixtures::table(), &IntrospectionConfig::default(), ty)
    }

    fn names(resolution: &Resolution) -> Vec<&str> {
        resolution.properties().iter().map(|p| p.name()).collect()
    }

    #[test]
    fn field_getter_and_setter_merge() {
        let resolution = resolve(&fixtures::point()).unwrap();
        assert_eq!(names(&resolution), ["x"]);

        let x = &resolution.properties()[0];
        assert_eq!(x.field().unwrap().name(), "x");
        assert_eq!(x.getter().unwrap().name(), "getX");
        assert_eq!(x.setter().unwrap().name(), "setX");
        assert_eq!(x.members().count(), 3);

        assert!(!x.is_visible(MemberKind::Field));
        assert!(x.is_visible(MemberKind::Getter));
        assert_eq!(x.accessor().unwrap().kind(), MemberKind::Getter);
        assert_eq!(x.mutator().unwrap().kind(), MemberKind::Setter);
    }

    #[test]
    fn private_field_alone_is_dropped() {
        let resolution = resolve(&TypeDescriptor::simple("Hidden")).unwrap();
        assert!(resolution.properties().is_empty());
        assert!(resolution.ignored_names().is_empty());
    }

    #[test]
    fn relaxed_field_visibility_exposes_private_fields() {
        let config = IntrospectionConfig::default()
            .with_visibility(VisibilityChecker::DEFAULT.with_field(MinVisibility::Any));
        let resolution = resolve_with(&fixtures::table(), &config, &TypeDescriptor::simple("Hidden")).unwrap();
        assert_eq!(names(&resolution), ["secret"]);
    }

    #[test]
    fn resolution_is_deterministic() {
        let first = resolve(&fixtures::person()).unwrap();
        let second = resolve(&fixtures::person()).unwrap();
        assert_eq!(first.properties(), second.properties());
        assert_eq!(first.ignored_names(), second.ignored_names());
    }

    #[test]
    fn creator_params_join_properties() {
        let resolution = resolve(&fixtures::person()).unwrap();
        assert_eq!(names(&resolution), ["name", "age", "email", "internal"]);

        let age = &resolution.properties()[1];
        assert!(age.is_required());
        assert_eq!(age.creator_index(), Some(1));
        assert_eq!(age.declared_type(), &TypeDescriptor::of::<u32>());

        let creator = resolution.property_creator().unwrap();
        assert_eq!(creator.arity(), 2);
        assert!(resolution.default_constructor().is_none());
        assert_eq!(resolution.any_getter().unwrap().name(), "other");
        assert_eq!(resolution.any_setter().unwrap().name(), "setOther");
    }

    #[test]
    fn overriding_method_wins_and_keeps_the_inherited_position() {
        let resolution = resolve(&TypeDescriptor::simple("Meter")).unwrap();
        assert_eq!(names(&resolution), ["a", "b"]);

        let [a, b] = resolution.properties() else {
            panic!("expected two properties");
        };
        assert_eq!(a.getter().unwrap().declaring_type().name(), "Meter");
        assert_eq!(b.getter().unwrap().declaring_type().name(), "Gauge");

        let meter = fixtures::Meter {
            gauge: fixtures::Gauge { a: 1, b: 2 },
        };
        let read = |p: &PropertyDefinition| {
            let value = p.accessor().unwrap().read(&meter).unwrap();
            *value.as_any().downcast_ref::<i32>().unwrap()
        };
        assert_eq!((read(a), read(b)), (100, 2));
    }

    #[test]
    fn ignored_accessor_over_hidden_field_reports_the_name() {
        let resolution = resolve(&TypeDescriptor::simple("Account")).unwrap();

        assert_eq!(names(&resolution), ["name"]);
        let ignored: Vec<&str> = resolution.ignored_names().iter().map(|n| &**n).collect();
        assert_eq!(ignored, ["secret"]);
    }

    #[test]
    fn ignore_semantics() {
        let resolution = resolve(&fixtures::person()).unwrap();

        let ignored: Vec<&str> = resolution.ignored_names().iter().map(|n| &**n).collect();
        assert_eq!(ignored, ["internal", "password"]);

        let internal = resolution.properties().iter().find(|p| p.name() == "internal").unwrap();
        assert!(internal.is_ignored());
        assert!(resolution.properties().iter().all(|p| p.name() != "password"));
    }

    #[test]
    fn ignoring_one_member_keeps_the_property() {
        let config = IntrospectionConfig::default().with_annotations(Arc::new(
            AnnotationOverrides::default().with("Point", "getX", Annotations::new().ignored()),
        ));
        let resolution = resolve_with(&fixtures::table(), &config, &fixtures::point()).unwrap();

        let x = &resolution.properties()[0];
        assert!(x.getter().is_none());
        assert!(x.setter().is_some());
        assert!(resolution.ignored_names().is_empty());
    }

    #[test]
    fn two_any_setters_conflict() {
        let err = resolve(&TypeDescriptor::simple("Bag")).unwrap_err();
        match err {
            ConflictError::DuplicateSpecial { kind, members, .. } => {
                assert_eq!(kind, SpecialKind::AnySetter);
                assert_eq!(members.len(), 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn get_and_is_getter_conflict() {
        let err = resolve(&TypeDescriptor::simple("Clash")).unwrap_err();
        assert!(matches!(
            err,
            ConflictError::DuplicateAccessor { kind: MemberKind::Getter, ref property, .. } if &**property == "flag"
        ));
    }

    #[test]
    fn inherited_properties_keep_supertype_order() {
        let resolution = resolve(&fixtures::child()).unwrap();
        assert_eq!(names(&resolution), ["id", "value", "tag", "name"]);

        let tag = &resolution.properties()[2];
        assert_eq!(tag.field().unwrap().declaring_type().name(), "Child");
        assert_eq!(resolution.properties()[1].declared_type(), &TypeDescriptor::of::<String>());
    }

    struct Item {
        total: u32,
    }

    fn item_table() -> ClassTable {
        let mut table = ClassTable::new();
        table.insert(
            ClassDef::bean::<Item>(TypeDescriptor::simple("Item"))
                .getter("getTotal", TypeRef::of::<u32>(), Visibility::Public, |i| i.total)
                .setter("setTotal", TypeRef::of::<u64>(), Visibility::Public, |i, v: u64| i.total = v as u32)
                .getter("getURLName", TypeRef::of::<String>(), Visibility::Public, |_| String::new())
                .getter("size", TypeRef::of::<u32>(), Visibility::Public, |i| i.total)
                .getter("computed", TypeRef::of::<u32>(), Visibility::Public, |i| i.total)
                .annotated(Annotations::new().renamed("count"))
                .build(),
        );
        table
    }

    #[test]
    fn naming_conventions_and_overrides() {
        let table = item_table();
        let ty = TypeDescriptor::simple("Item");

        let resolution = resolve_with(&table, &IntrospectionConfig::default(), &ty).unwrap();
        assert_eq!(names(&resolution), ["total", "urlname", "count"]);

        let config = IntrospectionConfig::default()
            .with_naming(NamingRules::default().with_mangle(ManglePolicy::StdBean));
        let resolution = resolve_with(&table, &config, &ty).unwrap();
        assert_eq!(names(&resolution), ["total", "URLName", "count"]);
    }

    #[test]
    fn type_precedence_is_configurable() {
        let table = item_table();
        let ty = TypeDescriptor::simple("Item");

        let resolution = resolve_with(&table, &IntrospectionConfig::default(), &ty).unwrap();
        assert_eq!(resolution.properties()[0].declared_type(), &TypeDescriptor::of::<u64>());

        let config = IntrospectionConfig::default()
            .with_type_precedence(TypePrecedence::new([MemberKind::Getter]));
        let resolution = resolve_with(&table, &config, &ty).unwrap();
        assert_eq!(resolution.properties()[0].declared_type(), &TypeDescriptor::of::<u32>());
    }

    #[test]
    fn unnamed_creator_parameter_is_rejected() {
        struct Pair(i32);

        let mut table = ClassTable::new();
        table.insert(
            ClassDef::bean::<Pair>(TypeDescriptor::simple("Pair"))
                .creator(
                    Visibility::Public,
                    [crate::class::ParamDef::unnamed(TypeRef::of::<i32>())],
                    |args| Ok(Pair(args.take()?)),
                )
                .build(),
        );

        let err = resolve_with(&table, &IntrospectionConfig::default(), &TypeDescriptor::simple("Pair"))
            .unwrap_err();
        assert!(matches!(err, ConflictError::UnnamedCreatorParameter { index: 0, .. }));
    }
}
