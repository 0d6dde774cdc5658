//! Class definitions shared by the unit tests.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use chrono::NaiveDate;
use vc_introspect::class::{Annotations, ClassDef, ClassTable, ParamDef, Visibility};
use vc_introspect::types::{TypeDescriptor, TypeRef};

use crate::serde::SerializeDriver;
use crate::stream::TokenBuffer;
use crate::{CodecError, CodecRegistry};

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Point {
    pub x: i32,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Person {
    pub name: String,
    pub age: u32,
    pub email: String,
    pub password: String,
    pub internal: u8,
    pub extra: Vec<(String, String)>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Profile {
    pub nickname: Option<String>,
    pub bio: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Color {
    Red,
    Green,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Tree {
    pub name: String,
    pub children: Vec<Tree>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Account {
    pub name: String,
    pub secret: String,
}

pub(crate) struct Money {
    pub cents: i64,
}

pub(crate) struct Shape;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Ident(pub u32);

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id-{}", self.0)
    }
}

pub(crate) fn point() -> TypeDescriptor {
    TypeDescriptor::simple("Point")
}

pub(crate) fn person() -> TypeDescriptor {
    TypeDescriptor::simple("Person")
}

pub(crate) fn profile() -> TypeDescriptor {
    TypeDescriptor::simple("Profile")
}

pub(crate) fn color() -> TypeDescriptor {
    TypeDescriptor::simple("Color")
}

pub(crate) fn tree() -> TypeDescriptor {
    TypeDescriptor::simple("Tree")
}

pub(crate) fn list_of(element: TypeDescriptor) -> TypeDescriptor {
    TypeDescriptor::generic("List", [element])
}

pub(crate) fn map_of(key: TypeDescriptor, value: TypeDescriptor) -> TypeDescriptor {
    TypeDescriptor::generic("Map", [key, value])
}

pub(crate) fn option_of(inner: TypeDescriptor) -> TypeDescriptor {
    TypeDescriptor::generic("Option", [inner])
}

pub(crate) fn table() -> ClassTable {
    let string = || TypeRef::of::<String>();
    let mut table = ClassTable::new();

    table.insert(
        ClassDef::bean::<Point>(point())
            .default_constructor(Visibility::Public, Point::default)
            .field_mut("x", TypeRef::of::<i32>(), Visibility::Private, |p| &p.x, |p, v| p.x = v)
            .getter("getX", TypeRef::of::<i32>(), Visibility::Public, |p| p.x)
            .setter("setX", TypeRef::of::<i32>(), Visibility::Public, |p, v| p.x = v)
            .build(),
    );

    table.insert(
        ClassDef::bean::<Person>(person())
            .class_annotations(Annotations::new().ignore_properties(["internal"]))
            .field("name", string(), Visibility::Private, |p| &p.name)
            .field("age", TypeRef::of::<u32>(), Visibility::Private, |p| &p.age)
            .field_mut("email", string(), Visibility::Private, |p| &p.email, |p, v| p.email = v)
            .field_mut("password", string(), Visibility::Public, |p| &p.password, |p, v| p.password = v)
            .annotated(Annotations::new().ignored())
            .field("internal", TypeRef::of::<u8>(), Visibility::Public, |p| &p.internal)
            .getter("getName", string(), Visibility::Public, |p| p.name.clone())
            .getter("getAge", TypeRef::of::<u32>(), Visibility::Public, |p| p.age)
            .getter("getEmail", string(), Visibility::Public, |p| p.email.clone())
            .setter("setEmail", string(), Visibility::Public, |p, v| p.email = v)
            .any_getter("other", string(), Visibility::Public, |p| p.extra.clone())
            .any_setter("setOther", string(), Visibility::Public, |p, k, v| p.extra.push((k, v)))
            .creator(
                Visibility::Public,
                [
                    ParamDef::named("name", string()),
                    ParamDef::named("age", TypeRef::of::<u32>()).with(Annotations::new().required()),
                ],
                |args| {
                    Ok(Person {
                        name: args.take()?,
                        age: args.take()?,
                        ..Person::default()
                    })
                },
            )
            .build(),
    );

    table.insert(
        ClassDef::bean::<Profile>(profile())
            .default_constructor(Visibility::Public, Profile::default)
            .field_mut(
                "nickname",
                TypeRef::apply("Option", [string()]),
                Visibility::Public,
                |p| &p.nickname,
                |p, v| p.nickname = v,
            )
            .field_mut("bio", string(), Visibility::Public, |p| &p.bio, |p, v| p.bio = v)
            .build(),
    );

    table.insert(ClassDef::enumeration(color(), [("RED", Color::Red), ("GREEN", Color::Green)]));

    table.insert(
        ClassDef::bean::<Tree>(tree())
            .default_constructor(Visibility::Public, Tree::default)
            .field_mut("name", string(), Visibility::Public, |t| &t.name, |t, v| t.name = v)
            .field_mut(
                "children",
                TypeRef::apply("List", [TypeRef::simple("Tree")]),
                Visibility::Public,
                |t| &t.children,
                |t, v| t.children = v,
            )
            .build(),
    );

    // The only visible accessor of `secret` is ignored.
    table.insert(
        ClassDef::bean::<Account>(TypeDescriptor::simple("Account"))
            .default_constructor(Visibility::Public, Account::default)
            .field_mut("name", string(), Visibility::Public, |a| &a.name, |a, v| a.name = v)
            .field_mut("secret", string(), Visibility::Private, |a| &a.secret, |a, v| a.secret = v)
            .getter("getSecret", string(), Visibility::Public, |a| a.secret.clone())
            .annotated(Annotations::new().ignored())
            .build(),
    );

    table.insert(
        ClassDef::bean::<Money>(TypeDescriptor::simple("Money"))
            .value_method("toCents", TypeRef::of::<i64>(), Visibility::Public, |m| m.cents)
            .build(),
    );

    table.insert(
        ClassDef::bean::<Shape>(TypeDescriptor::simple("Shape"))
            .abstract_class()
            .build(),
    );

    table.insert(ClassDef::bean::<Ident>(TypeDescriptor::simple("Ident")).displayed().build());

    // Collections are registered per parameterization: each one is backed by
    // a different Rust type.
    table.insert(ClassDef::sequence::<Vec<i32>, i32>(
        list_of(TypeDescriptor::of::<i32>()),
        TypeRef::param(0),
    ));
    table.insert(ClassDef::sequence::<Vec<Tree>, Tree>(list_of(tree()), TypeRef::param(0)));
    table.insert(ClassDef::optional::<String>(
        option_of(TypeDescriptor::of::<String>()),
        TypeRef::param(0),
    ));
    table.insert(ClassDef::mapping::<BTreeMap<NaiveDate, String>, NaiveDate, String>(
        map_of(TypeDescriptor::of::<NaiveDate>(), TypeDescriptor::of::<String>()),
        TypeRef::param(0),
        TypeRef::param(1),
    ));
    table.insert(ClassDef::mapping::<BTreeMap<String, i32>, String, i32>(
        map_of(TypeDescriptor::of::<String>(), TypeDescriptor::of::<i32>()),
        TypeRef::param(0),
        TypeRef::param(1),
    ));
    table.insert(ClassDef::mapping::<BTreeMap<Ident, i32>, Ident, i32>(
        map_of(TypeDescriptor::simple("Ident"), TypeDescriptor::of::<i32>()),
        TypeRef::param(0),
        TypeRef::param(1),
    ));
    table.insert(ClassDef::mapping::<BTreeMap<Color, i32>, Color, i32>(
        map_of(color(), TypeDescriptor::of::<i32>()),
        TypeRef::param(0),
        TypeRef::param(1),
    ));

    table
}

pub(crate) fn registry() -> CodecRegistry {
    CodecRegistry::new(table())
}

/// Serializes `value` to JSON text.
pub(crate) fn to_json(registry: &CodecRegistry, ty: &TypeDescriptor, value: &dyn Any) -> String {
    serde_json::to_string(&SerializeDriver::new(value, ty, registry)).unwrap()
}

/// Deserializes JSON text, keeping the codec error.
pub(crate) fn from_json(registry: &CodecRegistry, ty: &TypeDescriptor, json: &str) -> Result<Box<dyn Any>, CodecError> {
    let buffer: TokenBuffer = serde_json::from_str(json).unwrap();
    registry.read_value(ty, &mut buffer.reader())
}
