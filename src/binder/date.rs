use arrow_array::{
    PrimitiveArray,
    types::{Date32Type, Date64Type},
};
use jiff::{
    Span, Timestamp,
    civil::{Date, date},
};

use super::{FixedColumn, zone_of};
use crate::{
    cursor::StatementCursor,
    error::{ConversionError, Result},
    zone::ZoneContext,
};

const UNIX_EPOCH_DAY: Date = date(1970, 1, 1);

/// Civil date `days` after 1970-01-01.
///
/// # Errors
/// Returns `ConversionError::OutOfRange` beyond the supported calendar.
pub(crate) fn date_from_days(days: i32) -> Result<Date> {
    Span::new()
        .try_days(days)
        .and_then(|span| UNIX_EPOCH_DAY.checked_add(span))
        .map_err(|_| ConversionError::out_of_range("date", i64::from(days)))
}

/// Binds `Date32` day counts as civil dates.
///
/// The day count is zone-agnostic; the zone only tells the statement which calendar to
/// render the date in.
#[derive(Clone, Debug)]
pub struct DateDayBinder {
    column: FixedColumn,
    zone: Option<ZoneContext>,
}

impl DateDayBinder {
    /// Binder over `array`.
    pub fn new(array: &PrimitiveArray<Date32Type>, zone: Option<ZoneContext>) -> Self {
        Self {
            column: FixedColumn::of(array),
            zone,
        }
    }

    /// Bind the date at `row` to `parameter`. `row` must not be null.
    ///
    /// # Errors
    /// `RowOutOfBounds`, `OutOfRange` for day counts outside the calendar, or the
    /// statement's error.
    pub fn bind<S: StatementCursor + ?Sized>(
        &self,
        statement: &mut S,
        parameter: usize,
        row: usize,
    ) -> Result<()> {
        let days = self.column.read_i32(row)?;
        statement.set_date(parameter, date_from_days(days)?, zone_of(self.zone.as_ref()))?;
        Ok(())
    }
}

/// Binds `Date64` epoch milliseconds as civil dates.
///
/// The instant is resolved to a date in the binder's zone, or UTC without one.
#[derive(Clone, Debug)]
pub struct DateMilliBinder {
    column: FixedColumn,
    zone: Option<ZoneContext>,
}

impl DateMilliBinder {
    /// Binder over `array`.
    pub fn new(array: &PrimitiveArray<Date64Type>, zone: Option<ZoneContext>) -> Self {
        Self {
            column: FixedColumn::of(array),
            zone,
        }
    }

    /// Bind the date at `row` to `parameter`. `row` must not be null.
    ///
    /// # Errors
    /// Same as [`DateDayBinder::bind`].
    pub fn bind<S: StatementCursor + ?Sized>(
        &self,
        statement: &mut S,
        parameter: usize,
        row: usize,
    ) -> Result<()> {
        let millis = self.column.read_i64(row)?;
        let instant = Timestamp::from_millisecond(millis)
            .map_err(|_| ConversionError::out_of_range("date", millis))?;
        let tz = ZoneContext::or_utc(self.zone.as_ref()).time_zone().clone();
        let value = instant.to_zoned(tz).date();
        statement.set_date(parameter, value, zone_of(self.zone.as_ref()))?;
        Ok(())
    }
}
