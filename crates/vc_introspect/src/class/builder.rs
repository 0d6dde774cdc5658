use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::{self, Vec};
use core::any::Any;
use core::fmt;
use core::marker::PhantomData;

use crate::class::access::{AnyGetterFn, AnySetterFn, CtorFn, FieldGetFn, FieldSetFn};
use crate::class::access::{GetterFn, SetterFn, mut_fn, ref_fn};
use crate::class::def::{EnumAccess, MappingAccess, OptionalAccess, SequenceAccess};
use crate::class::{AccessError, Annotations, Marker};
use crate::class::{ClassDef, ClassKind, CtorDef, FieldDef, MethodAccess, MethodDef};
use crate::class::{ParamDef, SupertypeDef, Visibility};
use crate::types::{TypeDescriptor, TypeRef};

#[inline]
fn this<T: Any>(obj: &dyn Any) -> Result<&T, AccessError> {
    obj.downcast_ref::<T>().ok_or_else(AccessError::mismatch::<T>)
}

#[inline]
fn this_mut<T: Any>(obj: &mut dyn Any) -> Result<&mut T, AccessError> {
    obj.downcast_mut::<T>().ok_or_else(AccessError::mismatch::<T>)
}

#[inline]
fn unbox<T: Any>(value: Box<dyn Any>) -> Result<T, AccessError> {
    value
        .downcast::<T>()
        .map(|v| *v)
        .map_err(|_| AccessError::mismatch::<T>())
}

// -----------------------------------------------------------------------------
// CtorArgs

/// Arguments handed to a typed constructor, in parameter order.
pub struct CtorArgs {
    values: vec::IntoIter<Box<dyn Any>>,
}

impl CtorArgs {
    fn new(values: Vec<Box<dyn Any>>) -> Self {
        Self {
            values: values.into_iter(),
        }
    }

    /// Returns the number of arguments not taken yet.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    /// Takes the next argument as a `P`.
    pub fn take<P: Any>(&mut self) -> Result<P, AccessError> {
        let value = self.values.next().ok_or(AccessError::Arity {
            expected: 1,
            actual: 0,
        })?;
        unbox::<P>(value)
    }
}

impl fmt::Debug for CtorArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CtorArgs")
            .field("remaining", &self.values.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Structural classes

impl ClassDef {
    /// Starts the definition of a bean class backed by the Rust type `T`.
    #[inline]
    pub fn bean<T: Any>(ty: TypeDescriptor) -> ClassBuilder<T> {
        ClassBuilder::new(ty)
    }

    fn structural(ty: TypeDescriptor, kind: ClassKind) -> Self {
        Self {
            ty,
            kind,
            is_abstract: false,
            supertypes: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            ctors: Vec::new(),
            annotations: Annotations::new(),
            display: None,
        }
    }

    /// Defines an enumeration class over the given `(name, value)` variants.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_introspect::class::{ClassDef, ClassKind};
    /// use vc_introspect::types::TypeDescriptor;
    ///
    /// #[derive(Clone, PartialEq)]
    /// enum Color { Red, Green }
    ///
    /// let def = ClassDef::enumeration(
    ///     TypeDescriptor::simple("Color"),
    ///     [("RED", Color::Red), ("GREEN", Color::Green)],
    /// );
    /// let ClassKind::Enum(access) = def.kind() else { unreachable!() };
    /// assert_eq!(&**access.name_of(&Color::Green).unwrap(), "GREEN");
    /// assert!(access.by_name("BLUE").is_none());
    /// ```
    pub fn enumeration<'a, E>(ty: TypeDescriptor, variants: impl IntoIterator<Item = (&'a str, E)>) -> Self
    where
        E: Any + Clone + PartialEq + Send + Sync,
    {
        let (names, values): (Vec<Arc<str>>, Vec<E>) = variants
            .into_iter()
            .map(|(name, value)| (Arc::from(name), value))
            .unzip();
        let values = Arc::new(values);
        let lookup = values.clone();

        let access = EnumAccess {
            variants: names.into_boxed_slice(),
            index_of: Arc::new(move |obj: &dyn Any| {
                let value = this::<E>(obj)?;
                lookup
                    .iter()
                    .position(|v| v == value)
                    .ok_or(AccessError::Failed(Arc::from("value is not a declared variant")))
            }),
            from_index: Arc::new(move |index: usize| {
                values
                    .get(index)
                    .map(|v| Box::new(v.clone()) as Box<dyn Any>)
            }),
        };

        Self::structural(ty, ClassKind::Enum(access))
    }

    /// Defines a sequence class `C` whose elements are `E`.
    pub fn sequence<C, E>(ty: TypeDescriptor, element: impl Into<TypeRef>) -> Self
    where
        C: Any + FromIterator<E>,
        for<'a> &'a C: IntoIterator<Item = &'a E>,
        E: Any,
    {
        let access = SequenceAccess {
            element: element.into(),
            iter: seq_iter(|obj| {
                let seq = this::<C>(obj)?;
                Ok(seq.into_iter().map(|e| e as &dyn Any).collect())
            }),
            build: Arc::new(|items: Vec<Box<dyn Any>>| {
                items
                    .into_iter()
                    .map(unbox::<E>)
                    .collect::<Result<C, AccessError>>()
                    .map(|seq| Box::new(seq) as Box<dyn Any>)
            }),
        };
        Self::structural(ty, ClassKind::Sequence(access))
    }

    /// Defines a mapping class `M` from `K` to `V`.
    pub fn mapping<M, K, V>(ty: TypeDescriptor, key: impl Into<TypeRef>, value: impl Into<TypeRef>) -> Self
    where
        M: Any + FromIterator<(K, V)>,
        for<'a> &'a M: IntoIterator<Item = (&'a K, &'a V)>,
        K: Any,
        V: Any,
    {
        let access = MappingAccess {
            key: key.into(),
            value: value.into(),
            entries: map_entries(|obj| {
                let map = this::<M>(obj)?;
                Ok(map
                    .into_iter()
                    .map(|(k, v)| (k as &dyn Any, v as &dyn Any))
                    .collect())
            }),
            build: Arc::new(|entries: Vec<(Box<dyn Any>, Box<dyn Any>)>| {
                entries
                    .into_iter()
                    .map(|(k, v)| Ok((unbox::<K>(k)?, unbox::<V>(v)?)))
                    .collect::<Result<M, AccessError>>()
                    .map(|map| Box::new(map) as Box<dyn Any>)
            }),
        };
        Self::structural(ty, ClassKind::Mapping(access))
    }

    /// Defines an optional class backed by `Option<E>`.
    pub fn optional<E: Any>(ty: TypeDescriptor, inner: impl Into<TypeRef>) -> Self {
        let access = OptionalAccess {
            inner: inner.into(),
            get: opt_get(|obj| Ok(this::<Option<E>>(obj)?.as_ref().map(|v| v as &dyn Any))),
            wrap: Arc::new(|value: Option<Box<dyn Any>>| {
                value
                    .map(unbox::<E>)
                    .transpose()
                    .map(|value| Box::new(value) as Box<dyn Any>)
            }),
        };
        Self::structural(ty, ClassKind::Optional(access))
    }
}

type SeqIterFn = Arc<dyn for<'a> Fn(&'a dyn Any) -> Result<Vec<&'a dyn Any>, AccessError> + Send + Sync>;
type MapEntriesFn =
    Arc<dyn for<'a> Fn(&'a dyn Any) -> Result<Vec<(&'a dyn Any, &'a dyn Any)>, AccessError> + Send + Sync>;
type OptGetFn = Arc<dyn for<'a> Fn(&'a dyn Any) -> Result<Option<&'a dyn Any>, AccessError> + Send + Sync>;

fn seq_iter<F>(f: F) -> SeqIterFn
where
    F: for<'a> Fn(&'a dyn Any) -> Result<Vec<&'a dyn Any>, AccessError> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn map_entries<F>(f: F) -> MapEntriesFn
where
    F: for<'a> Fn(&'a dyn Any) -> Result<Vec<(&'a dyn Any, &'a dyn Any)>, AccessError>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

fn opt_get<F>(f: F) -> OptGetFn
where
    F: for<'a> Fn(&'a dyn Any) -> Result<Option<&'a dyn Any>, AccessError> + Send + Sync + 'static,
{
    Arc::new(f)
}

// -----------------------------------------------------------------------------
// ClassBuilder

enum Slot {
    Field(usize),
    Method(usize),
    Ctor(usize),
}

/// Builds the [`ClassDef`] of a bean class backed by the Rust type `T`.
///
/// Accessors are plain functions over `T`; the builder wraps them into
/// type-erased accessors that downcast the instance first.
///
/// [`annotated`](Self::annotated) attaches annotations to the member added
/// last, or to the class when no member was added yet.
///
/// # Examples
///
/// ```
/// use vc_introspect::class::{Annotations, ClassDef, Visibility};
/// use vc_introspect::types::{TypeDescriptor, TypeRef};
///
/// #[derive(Default)]
/// struct User { id: u64, secret: String }
///
/// let def = ClassDef::bean::<User>(TypeDescriptor::simple("User"))
///     .default_constructor(Visibility::Public, User::default)
///     .field_mut("id", TypeRef::of::<u64>(), Visibility::Public, |u| &u.id, |u, v| u.id = v)
///     .field("secret", TypeRef::of::<String>(), Visibility::Public, |u| &u.secret)
///     .annotated(Annotations::new().ignored())
///     .build();
///
/// assert_eq!(def.fields().len(), 2);
/// assert!(def.fields()[1].annotations.is_ignored());
/// assert!(def.fields()[1].set.is_none());
/// ```
pub struct ClassBuilder<T: Any> {
    def: ClassDef,
    last: Option<Slot>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any> ClassBuilder<T> {
    fn new(ty: TypeDescriptor) -> Self {
        Self {
            def: ClassDef::structural(ty, ClassKind::Bean),
            last: None,
            _marker: PhantomData,
        }
    }

    /// Declares the class abstract; it can be described but not instantiated.
    pub fn abstract_class(mut self) -> Self {
        self.def.is_abstract = true;
        self
    }

    /// Declares a supertype. `up` and `up_mut` view a `T` as its `B` part.
    pub fn extends<B: Any>(
        mut self,
        ty: impl Into<TypeRef>,
        up: fn(&T) -> &B,
        up_mut: fn(&mut T) -> &mut B,
    ) -> Self {
        self.def.supertypes.push(SupertypeDef {
            ty: ty.into(),
            upcast: ref_fn(move |obj| Ok(up(this::<T>(obj)?) as &dyn Any)),
            upcast_mut: mut_fn(move |obj| Ok(up_mut(this_mut::<T>(obj)?) as &mut dyn Any)),
        });
        self
    }

    fn push_field(
        mut self,
        name: &str,
        ty: TypeRef,
        visibility: Visibility,
        get: FieldGetFn,
        set: Option<FieldSetFn>,
    ) -> Self {
        self.def.fields.push(FieldDef {
            name: Arc::from(name),
            ty,
            visibility,
            annotations: Annotations::new(),
            get,
            set,
        });
        self.last = Some(Slot::Field(self.def.fields.len() - 1));
        self
    }

    fn push_method(
        mut self,
        name: &str,
        params: Vec<TypeRef>,
        returns: Option<TypeRef>,
        visibility: Visibility,
        access: MethodAccess,
    ) -> Self {
        self.def.methods.push(MethodDef {
            name: Arc::from(name),
            params,
            returns,
            visibility,
            annotations: Annotations::new(),
            access,
        });
        self.last = Some(Slot::Method(self.def.methods.len() - 1));
        self
    }

    /// Declares a field that cannot be assigned.
    pub fn field<F: Any>(
        self,
        name: &str,
        ty: impl Into<TypeRef>,
        visibility: Visibility,
        get: fn(&T) -> &F,
    ) -> Self {
        let get = ref_fn(move |obj| Ok(get(this::<T>(obj)?) as &dyn Any));
        self.push_field(name, ty.into(), visibility, get, None)
    }

    /// Declares an assignable field.
    pub fn field_mut<F: Any>(
        self,
        name: &str,
        ty: impl Into<TypeRef>,
        visibility: Visibility,
        get: fn(&T) -> &F,
        set: fn(&mut T, F),
    ) -> Self {
        let getter = ref_fn(move |obj| Ok(get(this::<T>(obj)?) as &dyn Any));
        let setter: FieldSetFn = Arc::new(move |obj: &mut dyn Any, value: Box<dyn Any>| {
            let value = unbox::<F>(value)?;
            set(this_mut::<T>(obj)?, value);
            Ok(())
        });
        self.push_field(name, ty.into(), visibility, getter, Some(setter))
    }

    /// Declares a zero-argument method returning an `R`.
    pub fn getter<R: Any>(
        self,
        name: &str,
        ty: impl Into<TypeRef>,
        visibility: Visibility,
        get: fn(&T) -> R,
    ) -> Self {
        let call: GetterFn =
            Arc::new(move |obj: &dyn Any| this::<T>(obj).map(|this| Box::new(get(this)) as Box<dyn Any>));
        self.push_method(name, Vec::new(), Some(ty.into()), visibility, MethodAccess::Read(call))
    }

    /// Declares a one-argument method taking a `P`.
    pub fn setter<P: Any>(
        self,
        name: &str,
        ty: impl Into<TypeRef>,
        visibility: Visibility,
        set: fn(&mut T, P),
    ) -> Self {
        let call: SetterFn = Arc::new(move |obj: &mut dyn Any, value: Box<dyn Any>| {
            let value = unbox::<P>(value)?;
            set(this_mut::<T>(obj)?, value);
            Ok(())
        });
        self.push_method(name, alloc::vec![ty.into()], None, visibility, MethodAccess::Write(call))
    }

    /// Declares the any-getter, returning unmapped entries with `V` values.
    pub fn any_getter<V: Any>(
        self,
        name: &str,
        value_ty: impl Into<TypeRef>,
        visibility: Visibility,
        get: fn(&T) -> Vec<(String, V)>,
    ) -> Self {
        let call: AnyGetterFn = Arc::new(move |obj: &dyn Any| {
            let entries = get(this::<T>(obj)?)
                .into_iter()
                .map(|(k, v)| (k, Box::new(v) as Box<dyn Any>))
                .collect();
            Ok(entries)
        });
        self.push_method(
            name,
            Vec::new(),
            Some(value_ty.into()),
            visibility,
            MethodAccess::ReadEntries(call),
        )
        .annotated(Annotations::new().marked(Marker::AnyGetter))
    }

    /// Declares the any-setter, accepting unmapped entries with `V` values.
    pub fn any_setter<V: Any>(
        self,
        name: &str,
        value_ty: impl Into<TypeRef>,
        visibility: Visibility,
        set: fn(&mut T, String, V),
    ) -> Self {
        let call: AnySetterFn = Arc::new(move |obj: &mut dyn Any, key: String, value: Box<dyn Any>| {
            let value = unbox::<V>(value)?;
            set(this_mut::<T>(obj)?, key, value);
            Ok(())
        });
        self.push_method(
            name,
            alloc::vec![TypeRef::of::<String>(), value_ty.into()],
            None,
            visibility,
            MethodAccess::WriteEntry(call),
        )
        .annotated(Annotations::new().marked(Marker::AnySetter))
    }

    /// Declares the value method, whose result replaces the instance when serializing.
    pub fn value_method<R: Any>(
        self,
        name: &str,
        ty: impl Into<TypeRef>,
        visibility: Visibility,
        get: fn(&T) -> R,
    ) -> Self {
        self.getter(name, ty, visibility, get)
            .annotated(Annotations::new().marked(Marker::ValueMethod))
    }

    /// Declares a constructor without parameters.
    pub fn default_constructor(self, visibility: Visibility, make: fn() -> T) -> Self {
        self.constructor(visibility, [], move |_| Ok(make()))
    }

    /// Declares a constructor with the given parameters.
    pub fn constructor<F>(
        mut self,
        visibility: Visibility,
        params: impl IntoIterator<Item = ParamDef>,
        make: F,
    ) -> Self
    where
        F: Fn(&mut CtorArgs) -> Result<T, AccessError> + Send + Sync + 'static,
    {
        let params: Vec<ParamDef> = params.into_iter().collect();
        let arity = params.len();
        let invoke: CtorFn = Arc::new(move |args: Vec<Box<dyn Any>>| {
            if args.len() != arity {
                return Err(AccessError::Arity {
                    expected: arity,
                    actual: args.len(),
                });
            }
            let value = make(&mut CtorArgs::new(args))?;
            Ok(Box::new(value) as Box<dyn Any>)
        });
        self.def.ctors.push(CtorDef {
            params,
            visibility,
            annotations: Annotations::new(),
            invoke,
        });
        self.last = Some(Slot::Ctor(self.def.ctors.len() - 1));
        self
    }

    /// Declares the property-based creator.
    pub fn creator<F>(self, visibility: Visibility, params: impl IntoIterator<Item = ParamDef>, make: F) -> Self
    where
        F: Fn(&mut CtorArgs) -> Result<T, AccessError> + Send + Sync + 'static,
    {
        self.constructor(visibility, params, make)
            .annotated(Annotations::new().marked(Marker::Creator))
    }

    /// Attaches annotations to the member added last, or to the class.
    pub fn annotated(mut self, annotations: Annotations) -> Self {
        let target = match self.last {
            Some(Slot::Field(i)) => &mut self.def.fields[i].annotations,
            Some(Slot::Method(i)) => &mut self.def.methods[i].annotations,
            Some(Slot::Ctor(i)) => &mut self.def.ctors[i].annotations,
            None => &mut self.def.annotations,
        };
        target.merge(annotations);
        self
    }

    /// Attaches class-level annotations.
    pub fn class_annotations(mut self, annotations: Annotations) -> Self {
        self.def.annotations.merge(annotations);
        self
    }

    /// Renders instances through their [`Display`](fmt::Display) implementation,
    /// e.g. when they are used as map keys.
    pub fn displayed(mut self) -> Self
    where
        T: fmt::Display,
    {
        self.def.display = Some(Arc::new(|obj: &dyn Any| this::<T>(obj).map(T::to_string)));
        self
    }

    /// Finishes the definition.
    #[inline]
    pub fn build(self) -> ClassDef {
        self.def
    }
}

impl<T: Any> fmt::Debug for ClassBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClassBuilder").field(&self.def).finish()
    }
}
