//! Temporal extraction from row cursors, normalized to integral units.
//!
//! Each `parse_*` function first tries the cursor's structured extraction. The first time
//! that fails with a source error, the session's [`FallbackLatch`] trips, one warning is
//! logged, and from then on the calendar-qualified (legacy) extraction is used. A `NULL`
//! value is not a failure on either path.
//!
//! All functions return `0` for `NULL`; callers check [`RowCursor::was_null`] because `0` is
//! also a valid epoch value.

use std::cell::Cell;

use jiff::{
    Timestamp,
    civil::{Date, DateTime, Time},
    tz::TimeZone,
};
use log::warn;

use crate::{
    cursor::RowCursor,
    error::{ConversionError, Result, SourceError},
    zone::ZoneContext,
};

/// One-way switch from structured to legacy extraction, scoped to one read session.
///
/// Backed by a `Cell`, so a latch cannot be shared between threads; every concurrent read
/// needs its own.
#[derive(Debug, Default)]
pub struct FallbackLatch {
    legacy: Cell<bool>,
}

impl FallbackLatch {
    /// A latch in the structured-extraction state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the session has switched to legacy extraction.
    pub fn is_legacy(&self) -> bool {
        self.legacy.get()
    }

    /// Switch to legacy extraction; returns `true` only for the call that flipped it.
    pub fn trip(&self) -> bool {
        !self.legacy.replace(true)
    }
}

fn fall_back(latch: &FallbackLatch, what: &str, err: &SourceError) {
    if latch.trip() {
        warn!(
            "cannot extract {what} as a structured value ({err}); \
             falling back to calendar-based extraction for this session"
        );
    }
}

/// Seconds from the epoch to the UTC midnight starting `date`.
fn epoch_seconds(date: Date) -> Result<i64> {
    Ok(date.to_zoned(TimeZone::UTC)?.timestamp().as_second())
}

fn seconds_of_day(time: Time) -> i32 {
    i32::from(time.hour()) * 3_600 + i32::from(time.minute()) * 60 + i32::from(time.second())
}

/// Extract a date as epoch milliseconds of its UTC midnight.
///
/// The legacy extraction reports the date's midnight in `zone`; that instant is mapped back
/// to its civil date in the same zone, so both paths yield the same value for the same date.
///
/// # Errors
/// Returns a source error when the legacy extraction fails as well, or a calendar error when
/// the legacy instant is outside the supported range.
pub fn parse_date<C: RowCursor + ?Sized>(
    cursor: &mut C,
    column: usize,
    zone: Option<&ZoneContext>,
    latch: &FallbackLatch,
) -> Result<i64> {
    if !latch.is_legacy() {
        match cursor.get_date(column) {
            // civil dates span ±9999 years, so the product stays far inside i64
            Ok(Some(date)) => return Ok(epoch_seconds(date)? * 1_000),
            Ok(None) => return Ok(0),
            Err(err) => fall_back(latch, "date", &err),
        }
    }
    let tz = ZoneContext::or_utc(zone).time_zone();
    match cursor.get_legacy_date(column, tz)? {
        Some(millis) => {
            let date = Timestamp::from_millisecond(millis)?.to_zoned(tz.clone()).date();
            Ok(epoch_seconds(date)? * 1_000)
        }
        None => Ok(0),
    }
}

/// Extract a time of day as milliseconds since midnight.
///
/// Structured values contribute whole seconds only; legacy values keep their milliseconds.
///
/// # Errors
/// Returns a source error when the legacy extraction fails as well, or an overflow error
/// when the legacy millisecond value exceeds `i32`.
pub fn parse_time<C: RowCursor + ?Sized>(
    cursor: &mut C,
    column: usize,
    zone: Option<&ZoneContext>,
    latch: &FallbackLatch,
) -> Result<i32> {
    if !latch.is_legacy() {
        match cursor.get_time(column) {
            Ok(Some(time)) => return Ok(seconds_of_day(time) * 1_000),
            Ok(None) => return Ok(0),
            Err(err) => fall_back(latch, "time", &err),
        }
    }
    let tz = ZoneContext::or_utc(zone).time_zone();
    match cursor.get_legacy_time(column, tz)? {
        Some(millis) => i32::try_from(millis)
            .map_err(|_| ConversionError::overflow(millis, "milliseconds", "i32")),
        None => Ok(0),
    }
}

/// Extract a timestamp as microseconds since the epoch.
///
/// Structured values are read as UTC wall-clock time; sub-microsecond digits are truncated.
///
/// # Errors
/// Returns a source error when the legacy extraction fails as well, or an overflow error
/// when the legacy instant does not fit `i64` microseconds.
pub fn parse_timestamp<C: RowCursor + ?Sized>(
    cursor: &mut C,
    column: usize,
    zone: Option<&ZoneContext>,
    latch: &FallbackLatch,
) -> Result<i64> {
    if !latch.is_legacy() {
        match cursor.get_datetime(column) {
            Ok(Some(datetime)) => return datetime_micros(datetime),
            Ok(None) => return Ok(0),
            Err(err) => fall_back(latch, "timestamp", &err),
        }
    }
    let tz = ZoneContext::or_utc(zone).time_zone();
    match cursor.get_legacy_timestamp(column, tz)? {
        Some(ts) => ts
            .millis
            .checked_mul(1_000)
            .and_then(|micros| micros.checked_add(i64::from(ts.nanos / 1_000 % 1_000)))
            .ok_or_else(|| ConversionError::overflow(ts.millis, "milliseconds", "i64 microseconds")),
        None => Ok(0),
    }
}

fn datetime_micros(datetime: DateTime) -> Result<i64> {
    let seconds = epoch_seconds(datetime.date())? + i64::from(seconds_of_day(datetime.time()));
    Ok(seconds * 1_000_000 + i64::from(datetime.subsec_nanosecond() / 1_000))
}
