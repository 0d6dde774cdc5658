use alloc::string::String;

use crate::StreamError;
use crate::stream::Scalar;

/// Sink of tokens written by serializers.
///
/// Implementations may validate the structure and report misuse as
/// [`StreamError`]s.
pub trait TokenWriter {
    fn write_start_object(&mut self) -> Result<(), StreamError>;

    fn write_end_object(&mut self) -> Result<(), StreamError>;

    fn write_start_array(&mut self) -> Result<(), StreamError>;

    fn write_end_array(&mut self) -> Result<(), StreamError>;

    /// Writes the name of the next object entry.
    fn write_field_name(&mut self, name: &str) -> Result<(), StreamError>;

    fn write_scalar(&mut self, value: Scalar) -> Result<(), StreamError>;

    #[inline]
    fn write_null(&mut self) -> Result<(), StreamError> {
        self.write_scalar(Scalar::Null)
    }

    #[inline]
    fn write_bool(&mut self, value: bool) -> Result<(), StreamError> {
        self.write_scalar(Scalar::Bool(value))
    }

    #[inline]
    fn write_i64(&mut self, value: i64) -> Result<(), StreamError> {
        self.write_scalar(Scalar::I64(value))
    }

    #[inline]
    fn write_u64(&mut self, value: u64) -> Result<(), StreamError> {
        self.write_scalar(Scalar::U64(value))
    }

    #[inline]
    fn write_f64(&mut self, value: f64) -> Result<(), StreamError> {
        self.write_scalar(Scalar::F64(value))
    }

    #[inline]
    fn write_str(&mut self, value: &str) -> Result<(), StreamError> {
        self.write_scalar(Scalar::Str(String::from(value)))
    }
}
