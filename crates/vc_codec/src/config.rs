//! Codec settings.

use alloc::sync::Arc;

/// The default date pattern: ISO-8601 with milliseconds and UTC offset.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Which property values the bean serializer writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Inclusion {
    #[default]
    Always,
    /// Skips values whose serializer reports them as null.
    NonNull,
    /// Skips null values and empty strings, sequences and mappings.
    NonEmpty,
}

/// How date and time values are rendered when used as map keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DateKeyFormat {
    /// Epoch milliseconds, as decimal text.
    Timestamp,
    /// A `chrono` format pattern applied to the UTC instant.
    Pattern(Arc<str>),
}

impl Default for DateKeyFormat {
    fn default() -> Self {
        Self::Pattern(Arc::from(ISO_DATE_FORMAT))
    }
}

/// Settings of a [`CodecRegistry`](crate::CodecRegistry).
///
/// # Examples
///
/// ```
/// use vc_codec::config::{CodecConfig, DateKeyFormat, Inclusion};
///
/// let config = CodecConfig::default()
///     .with_inclusion(Inclusion::NonNull)
///     .with_date_key_format(DateKeyFormat::Timestamp);
///
/// assert!(config.write_dates_as_timestamps);
/// assert!(config.fail_on_unknown_properties);
/// assert_eq!(config.inclusion, Inclusion::NonNull);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Writes dates as epoch-millisecond numbers instead of formatted text.
    pub write_dates_as_timestamps: bool,
    /// `chrono` pattern used when dates are written as text.
    pub date_format: Arc<str>,
    pub date_key_format: DateKeyFormat,
    pub inclusion: Inclusion,
    pub fail_on_unknown_properties: bool,
    /// Fails on null for properties whose deserializer has no null value.
    pub fail_on_null_for_primitives: bool,
    /// Writes enum values as variant indices instead of names.
    pub write_enums_using_index: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            write_dates_as_timestamps: true,
            date_format: Arc::from(ISO_DATE_FORMAT),
            date_key_format: DateKeyFormat::default(),
            inclusion: Inclusion::Always,
            fail_on_unknown_properties: true,
            fail_on_null_for_primitives: false,
            write_enums_using_index: false,
        }
    }
}

impl CodecConfig {
    pub fn with_dates_as_timestamps(mut self, enabled: bool) -> Self {
        self.write_dates_as_timestamps = enabled;
        self
    }

    pub fn with_date_format(mut self, pattern: &str) -> Self {
        self.date_format = Arc::from(pattern);
        self
    }

    pub fn with_date_key_format(mut self, format: DateKeyFormat) -> Self {
        self.date_key_format = format;
        self
    }

    pub fn with_inclusion(mut self, inclusion: Inclusion) -> Self {
        self.inclusion = inclusion;
        self
    }

    pub fn with_fail_on_unknown_properties(mut self, enabled: bool) -> Self {
        self.fail_on_unknown_properties = enabled;
        self
    }

    pub fn with_fail_on_null_for_primitives(mut self, enabled: bool) -> Self {
        self.fail_on_null_for_primitives = enabled;
        self
    }

    pub fn with_enums_using_index(mut self, enabled: bool) -> Self {
        self.write_enums_using_index = enabled;
        self
    }
}
