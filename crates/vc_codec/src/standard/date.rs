use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use core::any::Any;
use core::fmt::Write;
use core::marker::PhantomData;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use vc_introspect::class::AccessError;
use vc_introspect::types::{KnownType, TypeDescriptor};

use crate::CodecError;
use crate::codec::{DeserializeContext, SerializeContext, ValueDeserializer, ValueSerializer};
use crate::stream::{Scalar, Token, TokenReader, TokenWriter};

// -----------------------------------------------------------------------------
// DateRef

/// A borrowed date or instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRef<'a> {
    /// A calendar date, taken as midnight UTC.
    Date(&'a NaiveDate),
    DateTime(&'a DateTime<Utc>),
}

impl<'a> DateRef<'a> {
    /// Views `value` as a date, if it is one.
    pub fn from_any(value: &'a dyn Any) -> Option<Self> {
        if let Some(date) = value.downcast_ref::<NaiveDate>() {
            return Some(Self::Date(date));
        }
        value.downcast_ref::<DateTime<Utc>>().map(Self::DateTime)
    }

    pub fn to_utc(self) -> DateTime<Utc> {
        match self {
            Self::Date(date) => date.and_time(NaiveTime::MIN).and_utc(),
            Self::DateTime(instant) => *instant,
        }
    }

    #[inline]
    pub fn timestamp_millis(self) -> i64 {
        self.to_utc().timestamp_millis()
    }

    /// Formats the UTC instant with a `chrono` pattern.
    pub fn format(self, pattern: &str) -> Result<String, CodecError> {
        let mut text = String::new();
        write!(text, "{}", self.to_utc().format(pattern))
            .map_err(|_| CodecError::Custom(format!("invalid date pattern `{pattern}`")))?;
        Ok(text)
    }
}

/// Parses an instant with `pattern`, falling back to RFC 3339.
fn parse_instant(text: &str, pattern: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(text, pattern)
        .or_else(|_| DateTime::parse_from_rfc3339(text))
        .ok()
        .map(|instant| instant.with_timezone(&Utc))
}

// -----------------------------------------------------------------------------
// DateValue

/// A Rust date type with a well-known class.
pub trait DateValue: KnownType + Clone + Send + Sync {
    fn as_date_ref(&self) -> DateRef<'_>;

    fn from_utc(instant: DateTime<Utc>) -> Self;

    /// Parses text written with `pattern`.
    fn parse_text(text: &str, pattern: &str) -> Option<Self>;
}

impl DateValue for NaiveDate {
    #[inline]
    fn as_date_ref(&self) -> DateRef<'_> {
        DateRef::Date(self)
    }

    #[inline]
    fn from_utc(instant: DateTime<Utc>) -> Self {
        instant.date_naive()
    }

    fn parse_text(text: &str, pattern: &str) -> Option<Self> {
        parse_instant(text, pattern)
            .map(Self::from_utc)
            .or_else(|| NaiveDate::parse_from_str(text, "%Y-%m-%d").ok())
    }
}

impl DateValue for DateTime<Utc> {
    #[inline]
    fn as_date_ref(&self) -> DateRef<'_> {
        DateRef::DateTime(self)
    }

    #[inline]
    fn from_utc(instant: DateTime<Utc>) -> Self {
        instant
    }

    fn parse_text(text: &str, pattern: &str) -> Option<Self> {
        parse_instant(text, pattern)
    }
}

/// Converts epoch milliseconds.
pub(crate) fn from_millis<T: DateValue>(millis: i64) -> Option<T> {
    DateTime::from_timestamp_millis(millis).map(T::from_utc)
}

// -----------------------------------------------------------------------------
// DateCodec

/// Reads and writes a [`DateValue`].
///
/// Written as epoch milliseconds or formatted text depending on
/// [`CodecConfig::write_dates_as_timestamps`]; read from either.
///
/// [`CodecConfig::write_dates_as_timestamps`]: crate::config::CodecConfig::write_dates_as_timestamps
pub struct DateCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: DateValue> DateCodec<T> {
    #[inline]
    pub const fn new() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<T: DateValue> Default for DateCodec<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DateValue> ValueSerializer for DateCodec<T> {
    fn serialize(
        &self,
        value: &dyn Any,
        out: &mut dyn TokenWriter,
        ctx: &SerializeContext<'_>,
    ) -> Result<(), CodecError> {
        let value = value.downcast_ref::<T>().ok_or_else(AccessError::mismatch::<T>)?;
        ctx.default_serialize_date(value.as_date_ref(), out)
    }
}

impl<T: DateValue> ValueDeserializer for DateCodec<T> {
    fn deserialize(
        &self,
        input: &mut dyn TokenReader,
        ctx: &DeserializeContext<'_>,
    ) -> Result<Box<dyn Any>, CodecError> {
        let parsed = match input.next_token()? {
            Some(Token::Scalar(Scalar::I64(millis))) => from_millis::<T>(millis),
            Some(Token::Scalar(Scalar::U64(millis))) => {
                i64::try_from(millis).ok().and_then(from_millis::<T>)
            }
            Some(Token::Scalar(Scalar::Str(text))) => T::parse_text(&text, &ctx.config().date_format),
            other => return Err(CodecError::unexpected("date", other)),
        };
        match parsed {
            Some(value) => Ok(Box::new(value)),
            None => Err(CodecError::invalid(&TypeDescriptor::of::<T>(), "unrepresentable date")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ISO_DATE_FORMAT;

    #[test]
    fn dates_are_taken_at_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
        let view = DateRef::from_any(&date).unwrap();
        assert_eq!(view.timestamp_millis(), 86_400_000);
        assert_eq!(view.format(ISO_DATE_FORMAT).unwrap(), "1970-01-02T00:00:00.000+0000");
        assert!(DateRef::from_any(&1_i64).is_none());
    }

    #[test]
    fn text_parses_back() {
        let text = "2024-03-05T10:20:30.000+0000";
        let instant = DateTime::<Utc>::parse_text(text, ISO_DATE_FORMAT).unwrap();
        assert_eq!(DateRef::DateTime(&instant).format(ISO_DATE_FORMAT).unwrap(), text);

        let date = NaiveDate::parse_text("2024-03-05", ISO_DATE_FORMAT).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert!(NaiveDate::parse_text("yesterday", ISO_DATE_FORMAT).is_none());
    }

    #[test]
    fn invalid_patterns_are_errors() {
        let date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        assert!(DateRef::Date(&date).format("%Q").is_err());
    }
}
