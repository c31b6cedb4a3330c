//! Logical temporal kinds and their fixed-width storage units.

use arrow_schema::{DataType, TimeUnit};

/// Milliseconds in one civil day.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Conceptual temporal column type; decides storage width and unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TemporalKind {
    /// `i32` days since the UNIX epoch.
    Date,
    /// `i32` seconds or milliseconds since midnight.
    Time32,
    /// `i64` microseconds or nanoseconds since midnight.
    Time64,
    /// `i64` microseconds since the UNIX epoch, no zone metadata.
    Timestamp,
    /// `i64` microseconds since the UNIX epoch with a zone in the schema.
    TimestampTz,
}

impl TemporalKind {
    /// Classify an Arrow type, `None` for non-temporal types.
    ///
    /// `Date64` is reported as [`TemporalKind::Date`]; its storage is still 8 bytes wide,
    /// see [`TemporalKind::storage_width_of`].
    pub fn of(data_type: &DataType) -> Option<Self> {
        match data_type {
            DataType::Date32 | DataType::Date64 => Some(Self::Date),
            DataType::Time32(_) => Some(Self::Time32),
            DataType::Time64(_) => Some(Self::Time64),
            DataType::Timestamp(_, None) => Some(Self::Timestamp),
            DataType::Timestamp(_, Some(_)) => Some(Self::TimestampTz),
            _ => None,
        }
    }

    /// Width in bytes of one stored value.
    pub const fn storage_width(self) -> usize {
        match self {
            Self::Date | Self::Time32 => 4,
            Self::Time64 | Self::Timestamp | Self::TimestampTz => 8,
        }
    }

    /// Width in bytes of one stored value for a concrete Arrow type.
    pub fn storage_width_of(data_type: &DataType) -> Option<usize> {
        match data_type {
            DataType::Date64 => Some(8),
            other => Self::of(other).map(Self::storage_width),
        }
    }
}

/// Factor converting a stored time-of-day unit to milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MillisScale {
    /// Multiply the stored value (seconds → ×1000, milliseconds → ×1).
    Multiply(i32),
    /// Divide the stored value (microseconds → ÷1000, nanoseconds → ÷1_000_000).
    Divide(i64),
}

impl MillisScale {
    /// Scale for a `Time32`/`Time64` unit.
    pub const fn for_unit(unit: TimeUnit) -> Self {
        match unit {
            TimeUnit::Second => Self::Multiply(1_000),
            TimeUnit::Millisecond => Self::Multiply(1),
            TimeUnit::Microsecond => Self::Divide(1_000),
            TimeUnit::Nanosecond => Self::Divide(1_000_000),
        }
    }

    /// Milliseconds for a stored value, `None` when the result leaves the `i32` range.
    ///
    /// Division floors, so a negative value never collapses onto midnight.
    pub fn to_millis(self, stored: i64) -> Option<i32> {
        match self {
            Self::Multiply(factor) => i32::try_from(stored).ok()?.checked_mul(factor),
            Self::Divide(divisor) => i32::try_from(stored.div_euclid(divisor)).ok(),
        }
    }
}
