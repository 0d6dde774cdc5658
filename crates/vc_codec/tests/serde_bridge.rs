use chrono::NaiveDate;
use serde_core::de::DeserializeSeed;
use vc_codec::CodecRegistry;
use vc_codec::config::CodecConfig;
use vc_codec::serde::{DeserializeDriver, SerializeDriver};
use vc_introspect::class::{ClassDef, ClassTable, Visibility};
use vc_introspect::config::IntrospectionConfig;
use vc_introspect::types::{TypeDescriptor, TypeRef};

#[derive(Debug, Default, PartialEq)]
struct Event {
    title: String,
    day: NaiveDate,
    tags: Vec<String>,
}

fn event_type() -> TypeDescriptor {
    TypeDescriptor::simple("Event")
}

fn table() -> ClassTable {
    let mut table = ClassTable::new();
    table.insert(
        ClassDef::bean::<Event>(event_type())
            .default_constructor(Visibility::Public, Event::default)
            .field_mut("title", TypeRef::of::<String>(), Visibility::Public, |e| &e.title, |e, v| e.title = v)
            .field_mut("day", TypeRef::of::<NaiveDate>(), Visibility::Public, |e| &e.day, |e, v| e.day = v)
            .field_mut(
                "tags",
                TypeRef::apply("List", [TypeRef::of::<String>()]),
                Visibility::Public,
                |e| &e.tags,
                |e, v| e.tags = v,
            )
            .build(),
    );
    table.insert(ClassDef::sequence::<Vec<String>, String>(
        TypeDescriptor::simple("List"),
        TypeRef::param(0),
    ));
    table
}

fn launch() -> Event {
    Event {
        title: String::from("launch"),
        day: NaiveDate::from_ymd_opt(1970, 1, 2).unwrap(),
        tags: vec![String::from("a"), String::from("b")],
    }
}

fn read_json(registry: &CodecRegistry, json: &str) -> Event {
    let mut de = serde_json::Deserializer::from_str(json);
    let value = DeserializeDriver::new(&event_type(), registry).deserialize(&mut de).unwrap();
    *value.downcast::<Event>().unwrap()
}

#[test]
fn json_round_trip_with_timestamps() {
    let registry = CodecRegistry::new(table());
    let ty = event_type();

    let json = serde_json::to_string(&SerializeDriver::new(&launch(), &ty, &registry)).unwrap();
    assert_eq!(json, r#"{"title":"launch","day":86400000,"tags":["a","b"]}"#);
    assert_eq!(read_json(&registry, &json), launch());
}

#[test]
fn json_round_trip_with_formatted_dates() {
    let config = CodecConfig::default().with_dates_as_timestamps(false);
    let registry = CodecRegistry::with_config(table(), config, IntrospectionConfig::default());
    let ty = event_type();

    let json = serde_json::to_string(&SerializeDriver::new(&launch(), &ty, &registry)).unwrap();
    assert_eq!(
        json,
        r#"{"title":"launch","day":"1970-01-02T00:00:00.000+0000","tags":["a","b"]}"#
    );
    assert_eq!(read_json(&registry, &json), launch());
}

#[test]
fn ron_round_trip() {
    let registry = CodecRegistry::new(table());
    let ty = event_type();

    let text = ron::to_string(&SerializeDriver::new(&launch(), &ty, &registry)).unwrap();
    let mut de = ron::Deserializer::from_str(&text).unwrap();
    let value = DeserializeDriver::new(&ty, &registry).deserialize(&mut de).unwrap();
    assert_eq!(value.downcast_ref::<Event>(), Some(&launch()));
}

#[test]
fn codec_errors_surface_as_format_errors() {
    let registry = CodecRegistry::new(table());
    let mut de = serde_json::Deserializer::from_str(r#"{"title":"x","venue":"moon"}"#);
    let err = DeserializeDriver::new(&event_type(), &registry)
        .deserialize(&mut de)
        .unwrap_err();
    assert!(err.to_string().contains("venue"), "{err}");
}
