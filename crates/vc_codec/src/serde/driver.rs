use alloc::boxed::Box;
use core::any::Any;

use serde_core::de::{self, DeserializeSeed};
use serde_core::ser;
use serde_core::{Deserialize, Deserializer, Serialize, Serializer};
use vc_introspect::types::TypeDescriptor;

use crate::CodecRegistry;
use crate::stream::TokenBuffer;

// -----------------------------------------------------------------------------
// SerializeDriver

/// Serializes a type-erased value through the codec registered for its type.
///
/// The value is first written into a [`TokenBuffer`] by the serializer that
/// [`CodecRegistry::get_serializer`] resolves for `ty`; the buffer is then
/// handed to the `serde` serializer. Objects become maps, arrays become
/// sequences.
///
/// The output carries no type information, so reading it back requires the
/// same [`TypeDescriptor`], see [`DeserializeDriver`].
///
/// # Examples
///
/// ```
/// use vc_codec::CodecRegistry;
/// use vc_codec::serde::SerializeDriver;
/// use vc_introspect::class::{ClassDef, ClassTable, Visibility};
/// use vc_introspect::types::{TypeDescriptor, TypeRef};
///
/// #[derive(Default)]
/// struct Point { x: i32, y: i32 }
///
/// let ty = TypeDescriptor::simple("Point");
/// let mut table = ClassTable::new();
/// table.insert(
///     ClassDef::bean::<Point>(ty.clone())
///         .default_constructor(Visibility::Public, Point::default)
///         .field_mut("x", TypeRef::of::<i32>(), Visibility::Public, |p| &p.x, |p, v| p.x = v)
///         .field_mut("y", TypeRef::of::<i32>(), Visibility::Public, |p| &p.y, |p, v| p.y = v)
///         .build(),
/// );
/// let registry = CodecRegistry::new(table);
///
/// let input = Point { x: 1, y: -2 };
/// let driver = SerializeDriver::new(&input, &ty, &registry);
///
/// assert_eq!(serde_json::to_string(&driver).unwrap(), r#"{"x":1,"y":-2}"#);
/// ```
pub struct SerializeDriver<'a> {
    value: &'a dyn Any,
    ty: &'a TypeDescriptor,
    registry: &'a CodecRegistry,
}

impl<'a> SerializeDriver<'a> {
    /// Creates a driver for `value`, an instance of `ty`.
    #[inline]
    pub const fn new(value: &'a dyn Any, ty: &'a TypeDescriptor, registry: &'a CodecRegistry) -> Self {
        Self { value, ty, registry }
    }
}

impl Serialize for SerializeDriver<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut buffer = TokenBuffer::new();
        self.registry
            .write_value(self.ty, self.value, &mut buffer)
            .map_err(<S::Error as ser::Error>::custom)?;
        buffer.serialize(serializer)
    }
}

// -----------------------------------------------------------------------------
// DeserializeDriver

/// Deserializes a value of a given type through its codec.
///
/// The input is collected into a [`TokenBuffer`] first, so the data format
/// must be self-describing. The result is a `Box<dyn Any>` holding the Rust
/// type that backs `ty`.
///
/// # Examples
///
/// ```
/// use serde_core::de::DeserializeSeed;
/// use vc_codec::CodecRegistry;
/// use vc_codec::serde::DeserializeDriver;
/// use vc_introspect::class::{ClassDef, ClassTable};
/// use vc_introspect::types::{TypeDescriptor, TypeRef};
///
/// let ty = TypeDescriptor::generic("Vec", [TypeDescriptor::of::<u8>()]);
/// let mut table = ClassTable::new();
/// table.insert(ClassDef::sequence::<Vec<u8>, u8>(TypeDescriptor::simple("Vec"), TypeRef::param(0)));
/// let registry = CodecRegistry::new(table);
///
/// let mut json = serde_json::Deserializer::from_str("[1, 2, 3]");
/// let value = DeserializeDriver::new(&ty, &registry).deserialize(&mut json).unwrap();
///
/// assert_eq!(value.downcast_ref::<Vec<u8>>(), Some(&vec![1, 2, 3]));
/// ```
pub struct DeserializeDriver<'a> {
    ty: &'a TypeDescriptor,
    registry: &'a CodecRegistry,
}

impl<'a> DeserializeDriver<'a> {
    #[inline]
    pub const fn new(ty: &'a TypeDescriptor, registry: &'a CodecRegistry) -> Self {
        Self { ty, registry }
    }
}

impl<'de> DeserializeSeed<'de> for DeserializeDriver<'_> {
    type Value = Box<dyn Any>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        let buffer = TokenBuffer::deserialize(deserializer)?;
        self.registry
            .read_value(self.ty, &mut buffer.reader())
            .map_err(<D::Error as de::Error>::custom)
    }
}
