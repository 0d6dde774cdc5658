//! Class definitions shared by the unit tests.

use alloc::string::String;
use alloc::vec::Vec;

use crate::class::{Annotations, ClassDef, ClassTable, ParamDef, Visibility};
use crate::types::{TypeDescriptor, TypeRef};

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Point {
    pub x: i32,
}

#[derive(Default)]
pub(crate) struct Hidden {
    pub secret: String,
}

pub(crate) struct Base<T> {
    pub id: u64,
    pub value: T,
    pub tag: String,
}

pub(crate) struct Child {
    pub base: Base<String>,
    pub tag: String,
    pub name: String,
}

impl Child {
    pub fn sample() -> Self {
        Self {
            base: Base {
                id: 1,
                value: String::from("inner"),
                tag: String::from("base"),
            },
            tag: String::from("child"),
            name: String::from("child"),
        }
    }
}

pub(crate) struct Loop;

#[derive(Default)]
pub(crate) struct Gauge {
    pub a: i32,
    pub b: i32,
}

pub(crate) struct Meter {
    pub gauge: Gauge,
}

#[derive(Default)]
pub(crate) struct Account {
    pub name: String,
    pub secret: String,
}

#[derive(Default)]
pub(crate) struct Bag {
    pub extra: Vec<(String, String)>,
}

#[derive(Default)]
pub(crate) struct Clash {
    pub flag: bool,
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

pub(crate) fn point() -> TypeDescriptor {
    TypeDescriptor::simple("Point")
}

pub(crate) fn person() -> TypeDescriptor {
    TypeDescriptor::simple("Person")
}

pub(crate) fn child() -> TypeDescriptor {
    TypeDescriptor::simple("Child")
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
        ClassDef::bean::<Hidden>(TypeDescriptor::simple("Hidden"))
            .default_constructor(Visibility::Public, Hidden::default)
            .field_mut("secret", string(), Visibility::Private, |h| &h.secret, |h, v| h.secret = v)
            .build(),
    );

    // `Base<T>` is registered once and serves every parameterization.
    table.insert(
        ClassDef::bean::<Base<String>>(TypeDescriptor::simple("Base"))
            .abstract_class()
            .field_mut("id", TypeRef::of::<u64>(), Visibility::Public, |b| &b.id, |b, v| b.id = v)
            .field("value", TypeRef::param(0), Visibility::Public, |b| &b.value)
            .field("tag", string(), Visibility::Public, |b| &b.tag)
            .build(),
    );

    table.insert(
        ClassDef::bean::<Child>(child())
            .extends(
                TypeRef::apply("Base", [TypeRef::of::<String>()]),
                |c| &c.base,
                |c| &mut c.base,
            )
            .field("tag", string(), Visibility::Public, |c| &c.tag)
            .field("name", string(), Visibility::Public, |c| &c.name)
            .build(),
    );

    table.insert(
        ClassDef::bean::<Gauge>(TypeDescriptor::simple("Gauge"))
            .default_constructor(Visibility::Public, Gauge::default)
            .getter("getA", TypeRef::of::<i32>(), Visibility::Public, |g| g.a)
            .getter("getB", TypeRef::of::<i32>(), Visibility::Public, |g| g.b)
            .build(),
    );

    // `getA` is overridden, `getB` inherited.
    table.insert(
        ClassDef::bean::<Meter>(TypeDescriptor::simple("Meter"))
            .extends(TypeRef::simple("Gauge"), |m| &m.gauge, |m| &mut m.gauge)
            .getter("getA", TypeRef::of::<i32>(), Visibility::Public, |m| m.gauge.a * 100)
            .build(),
    );

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
        ClassDef::bean::<Loop>(TypeDescriptor::simple("LoopA"))
            .extends(TypeRef::simple("LoopB"), |l| l, |l| l)
            .build(),
    );
    table.insert(
        ClassDef::bean::<Loop>(TypeDescriptor::simple("LoopB"))
            .extends(TypeRef::simple("LoopA"), |l| l, |l| l)
            .build(),
    );

    table.insert(
        ClassDef::bean::<Bag>(TypeDescriptor::simple("Bag"))
            .default_constructor(Visibility::Public, Bag::default)
            .any_setter("put", string(), Visibility::Public, |b, k, v| b.extra.push((k, v)))
            .any_setter("add", string(), Visibility::Public, |b, k, v| b.extra.push((k, v)))
            .build(),
    );

    table.insert(
        ClassDef::bean::<Clash>(TypeDescriptor::simple("Clash"))
            .default_constructor(Visibility::Public, Clash::default)
            .getter("getFlag", TypeRef::of::<bool>(), Visibility::Public, |c| c.flag)
            .getter("isFlag", TypeRef::of::<bool>(), Visibility::Public, |c| c.flag)
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

    table
}
