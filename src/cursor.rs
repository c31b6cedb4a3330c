//! Interfaces of the data-source collaborators: row cursors and statement cursors.
//!
//! Result columns are addressed 0-based; statement parameters 1-based, following the
//! driver convention.

use arrow_schema::DataType;
use jiff::{
    Timestamp,
    civil::{Date, DateTime, Time},
    tz::TimeZone,
};

use crate::{error::SourceError, sql_type::SourceField};

/// Instant returned by calendar-qualified timestamp extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LegacyTimestamp {
    /// Milliseconds since the UNIX epoch, including the millisecond part of `nanos`.
    pub millis: i64,
    /// Nanosecond fraction of the containing second, `0..1_000_000_000`.
    pub nanos: u32,
}

/// One row of a data-source result, positioned by the caller.
///
/// Structured extraction (`get_date`, `get_time`, `get_datetime`) may fail for drivers
/// without civil date/time support; calendar-qualified extraction (`get_legacy_*`) is the
/// fallback every driver supports. After either call, [`RowCursor::was_null`] reports whether
/// the extracted value was SQL `NULL`.
pub trait RowCursor {
    /// Structured date extraction.
    fn get_date(&mut self, column: usize) -> Result<Option<Date>, SourceError>;

    /// Structured time-of-day extraction.
    fn get_time(&mut self, column: usize) -> Result<Option<Time>, SourceError>;

    /// Structured date-time extraction.
    fn get_datetime(&mut self, column: usize) -> Result<Option<DateTime>, SourceError>;

    /// Epoch milliseconds of the date's midnight in `tz`.
    fn get_legacy_date(&mut self, column: usize, tz: &TimeZone)
    -> Result<Option<i64>, SourceError>;

    /// Milliseconds of the time-of-day in `tz`, anchored on the epoch date.
    fn get_legacy_time(&mut self, column: usize, tz: &TimeZone)
    -> Result<Option<i64>, SourceError>;

    /// The timestamp interpreted in `tz`.
    fn get_legacy_timestamp(
        &mut self,
        column: usize,
        tz: &TimeZone,
    ) -> Result<Option<LegacyTimestamp>, SourceError>;

    /// Whether the last extracted value was `NULL`.
    fn was_null(&self) -> bool;
}

/// A row cursor that can describe and advance its result set.
pub trait ResultSource: RowCursor {
    /// Columns of the result, in order.
    fn fields(&self) -> &[SourceField];

    /// Move to the next row; `false` once the result is exhausted.
    fn next_row(&mut self) -> Result<bool, SourceError>;
}

/// Parameter-binding side of a prepared statement.
pub trait StatementCursor {
    /// Bind a date; `zone` is the calendar the driver should render it in.
    fn set_date(
        &mut self,
        parameter: usize,
        value: Date,
        zone: Option<&TimeZone>,
    ) -> Result<(), SourceError>;

    /// Bind a time of day.
    fn set_time(
        &mut self,
        parameter: usize,
        value: Time,
        zone: Option<&TimeZone>,
    ) -> Result<(), SourceError>;

    /// Bind an instant.
    fn set_timestamp(
        &mut self,
        parameter: usize,
        value: Timestamp,
        zone: Option<&TimeZone>,
    ) -> Result<(), SourceError>;

    /// Bind SQL `NULL` for a parameter whose column has `data_type`.
    fn set_null(&mut self, parameter: usize, data_type: &DataType) -> Result<(), SourceError>;

    /// Queue the currently bound parameters as one batch entry.
    fn add_batch(&mut self) -> Result<(), SourceError>;
}
