use alloc::boxed::Box;
use alloc::format;
use alloc::string::{String, ToString};
use core::any::Any;
use core::marker::PhantomData;

use vc_introspect::class::AccessError;
use vc_introspect::types::{KnownType, TypeDescriptor};

use crate::CodecError;
use crate::codec::{DeserializeContext, SchemaType, SerializeContext};
use crate::codec::{ValueDeserializer, ValueSerializer};
use crate::stream::{Scalar, Token, TokenReader, TokenWriter};

// -----------------------------------------------------------------------------
// ScalarValue

/// A Rust scalar type with a well-known class.
pub trait ScalarValue: KnownType + Clone + Default + Send + Sync {
    const SCHEMA: SchemaType;

    fn to_scalar(&self) -> Scalar;

    /// Converts a scalar token, failing when the value is out of range.
    ///
    /// Floats accept rounding of fractions but reject overflow and integers
    /// they cannot represent exactly.
    fn from_scalar(scalar: &Scalar) -> Option<Self>;

    /// The canonical text form, as used for map keys.
    fn to_text(&self) -> String;

    fn parse_text(text: &str) -> Option<Self>;

    fn is_empty_value(&self) -> bool {
        false
    }
}

macro_rules! impl_integer {
    ($wide:ident, $variant:ident: $($ty:ty),*) => {
        $(
            impl ScalarValue for $ty {
                const SCHEMA: SchemaType = SchemaType::Integer;

                #[inline]
                fn to_scalar(&self) -> Scalar {
                    Scalar::$variant($wide::from(*self))
                }

                fn from_scalar(scalar: &Scalar) -> Option<Self> {
                    match scalar {
                        Scalar::I64(v) => Self::try_from(*v).ok(),
                        Scalar::U64(v) => Self::try_from(*v).ok(),
                        _ => None,
                    }
                }

                fn to_text(&self) -> String {
                    self.to_string()
                }

                fn parse_text(text: &str) -> Option<Self> {
                    text.parse().ok()
                }
            }
        )*
    };
}

impl_integer!(i64, I64: i8, i16, i32, i64);
impl_integer!(u64, U64: u8, u16, u32, u64);

macro_rules! impl_float {
    ($($ty:ty),*) => {
        $(
            impl ScalarValue for $ty {
                const SCHEMA: SchemaType = SchemaType::Number;

                #[inline]
                fn to_scalar(&self) -> Scalar {
                    Scalar::F64(f64::from(*self))
                }

                fn from_scalar(scalar: &Scalar) -> Option<Self> {
                    match scalar {
                        Scalar::F64(v) => {
                            let out = *v as Self;
                            (out.is_finite() || !v.is_finite()).then_some(out)
                        }
                        // Integers must be exactly representable.
                        Scalar::I64(v) => {
                            let out = *v as Self;
                            (out as i128 == i128::from(*v)).then_some(out)
                        }
                        Scalar::U64(v) => {
                            let out = *v as Self;
                            (out as u128 == u128::from(*v)).then_some(out)
                        }
                        _ => None,
                    }
                }

                fn to_text(&self) -> String {
                    self.to_string()
                }

                fn parse_text(text: &str) -> Option<Self> {
                    text.parse().ok()
                }
            }
        )*
    };
}

impl_float!(f32, f64);

impl ScalarValue for bool {
    const SCHEMA: SchemaType = SchemaType::Boolean;

    #[inline]
    fn to_scalar(&self) -> Scalar {
        Scalar::Bool(*self)
    }

    fn from_scalar(scalar: &Scalar) -> Option<Self> {
        match scalar {
            Scalar::Bool(v) => Some(*v),
            _ => None,
        }
    }

    fn to_text(&self) -> String {
        self.to_string()
    }

    fn parse_text(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

impl ScalarValue for char {
    const SCHEMA: SchemaType = SchemaType::String;

    fn to_scalar(&self) -> Scalar {
        Scalar::Str(self.to_string())
    }

    fn from_scalar(scalar: &Scalar) -> Option<Self> {
        Self::parse_text(scalar.as_str()?)
    }

    fn to_text(&self) -> String {
        self.to_string()
    }

    fn parse_text(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

impl ScalarValue for String {
    const SCHEMA: SchemaType = SchemaType::String;

    fn to_scalar(&self) -> Scalar {
        Scalar::Str(self.clone())
    }

    fn from_scalar(scalar: &Scalar) -> Option<Self> {
        scalar.as_str().map(String::from)
    }

    fn to_text(&self) -> String {
        self.clone()
    }

    fn parse_text(text: &str) -> Option<Self> {
        Some(String::from(text))
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

/// Returns the text form of a value of any scalar type.
pub(crate) fn canonical_text(value: &dyn Any) -> Option<String> {
    macro_rules! try_types {
        ($($ty:ty),*) => {
            $(
                if let Some(v) = value.downcast_ref::<$ty>() {
                    return Some(v.to_text());
                }
            )*
        };
    }
    try_types!(String, bool, char, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);
    value.downcast_ref::<&'static str>().map(|v| String::from(*v))
}

// -----------------------------------------------------------------------------
// ScalarCodec

/// Reads and writes a [`ScalarValue`] as one scalar token.
///
/// Absent creator parameters of scalar types default to `T::default()`;
/// an explicit null is rejected.
pub struct ScalarCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: ScalarValue> ScalarCodec<T> {
    #[inline]
    pub const fn new() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<T: ScalarValue> Default for ScalarCodec<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ScalarValue> ValueSerializer for ScalarCodec<T> {
    fn serialize(
        &self,
        value: &dyn Any,
        out: &mut dyn TokenWriter,
        _ctx: &SerializeContext<'_>,
    ) -> Result<(), CodecError> {
        let value = value.downcast_ref::<T>().ok_or_else(AccessError::mismatch::<T>)?;
        Ok(out.write_scalar(value.to_scalar())?)
    }

    fn is_empty(&self, value: &dyn Any) -> bool {
        value.downcast_ref::<T>().is_some_and(T::is_empty_value)
    }

    fn schema_type(&self) -> SchemaType {
        T::SCHEMA
    }
}

impl<T: ScalarValue> ValueDeserializer for ScalarCodec<T> {
    fn deserialize(
        &self,
        input: &mut dyn TokenReader,
        _ctx: &DeserializeContext<'_>,
    ) -> Result<Box<dyn Any>, CodecError> {
        match input.next_token()? {
            Some(Token::Scalar(scalar)) => match T::from_scalar(&scalar) {
                Some(value) => Ok(Box::new(value)),
                None => Err(CodecError::invalid(
                    &TypeDescriptor::of::<T>(),
                    format!("cannot convert {scalar}"),
                )),
            },
            other => Err(CodecError::unexpected("scalar", other)),
        }
    }

    fn absent_value(&self) -> Option<Box<dyn Any>> {
        Some(Box::new(T::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_range_checked() {
        assert_eq!(u8::from_scalar(&Scalar::U64(255)), Some(255));
        assert_eq!(u8::from_scalar(&Scalar::U64(256)), None);
        assert_eq!(u32::from_scalar(&Scalar::I64(-1)), None);
        assert_eq!(i64::from_scalar(&Scalar::U64(u64::MAX)), None);
        assert_eq!(i16::from_scalar(&Scalar::I64(-300)), Some(-300));
        assert_eq!(i32::from_scalar(&Scalar::F64(1.0)), None);
        assert_eq!(f64::from_scalar(&Scalar::I64(3)), Some(3.0));
    }

    #[test]
    fn floats_reject_overflow_and_inexact_integers() {
        assert_eq!(f32::from_scalar(&Scalar::F64(1e300)), None);
        assert_eq!(f32::from_scalar(&Scalar::F64(0.5)), Some(0.5));
        assert!(f32::from_scalar(&Scalar::F64(f64::INFINITY)).is_some_and(f32::is_infinite));
        assert_eq!(f64::from_scalar(&Scalar::I64(i64::MAX)), None);
        assert_eq!(f64::from_scalar(&Scalar::U64(u64::MAX)), None);
        assert_eq!(f64::from_scalar(&Scalar::U64(1 << 53)), Some(9_007_199_254_740_992.0));
        assert_eq!(f32::from_scalar(&Scalar::I64(16_777_217)), None);
        assert_eq!(f32::from_scalar(&Scalar::I64(-16_777_216)), Some(-16_777_216.0));
    }

    #[test]
    fn text_forms() {
        assert_eq!(canonical_text(&42_u16).as_deref(), Some("42"));
        assert_eq!(canonical_text(&String::from("abc")).as_deref(), Some("abc"));
        assert_eq!(canonical_text(&'x').as_deref(), Some("x"));
        assert_eq!(canonical_text(&()), None);
        assert_eq!(char::parse_text("xy"), None);
        assert_eq!(bool::parse_text("true"), Some(true));
    }
}
