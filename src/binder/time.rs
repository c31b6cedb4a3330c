use arrow_array::{
    PrimitiveArray,
    types::{
        Time32MillisecondType, Time32SecondType, Time64MicrosecondType, Time64NanosecondType,
    },
};
use arrow_schema::TimeUnit;
use jiff::civil::Time;

use super::{FixedColumn, zone_of};
use crate::{
    cursor::StatementCursor,
    error::{ConversionError, Result},
    kind::{MILLIS_PER_DAY, MillisScale},
    zone::ZoneContext,
};

/// Civil time for a millisecond offset from midnight.
///
/// # Errors
/// Returns `ConversionError::OutOfRange` outside `0..86_400_000`.
pub fn time_of_day(millis: i32) -> Result<Time> {
    if !(0..MILLIS_PER_DAY).contains(&i64::from(millis)) {
        return Err(ConversionError::out_of_range("time of day", i64::from(millis)));
    }
    let hour = millis / 3_600_000;
    let minute = millis / 60_000 % 60;
    let second = millis / 1_000 % 60;
    let subsec_nanos = millis % 1_000 * 1_000_000;
    Ok(Time::new(hour as i8, minute as i8, second as i8, subsec_nanos)?)
}

fn unit_name(unit: TimeUnit) -> &'static str {
    match unit {
        TimeUnit::Second => "seconds",
        TimeUnit::Millisecond => "milliseconds",
        TimeUnit::Microsecond => "microseconds",
        TimeUnit::Nanosecond => "nanoseconds",
    }
}

// Shared by both widths: scale to i32 millis, then bind a civil time.
fn bind_scaled<S: StatementCursor + ?Sized>(
    statement: &mut S,
    parameter: usize,
    stored: i64,
    unit: TimeUnit,
    zone: Option<&ZoneContext>,
) -> Result<()> {
    let millis = MillisScale::for_unit(unit)
        .to_millis(stored)
        .ok_or_else(|| ConversionError::overflow(stored, unit_name(unit), "i32 milliseconds"))?;
    statement.set_time(parameter, time_of_day(millis)?, zone_of(zone))?;
    Ok(())
}

/// Binds `Time32` values (4-byte storage) as civil times.
#[derive(Clone, Debug)]
pub struct Time32Binder {
    column: FixedColumn,
    unit: TimeUnit,
    zone: Option<ZoneContext>,
}

impl Time32Binder {
    /// Binder for `Time32(Second)`; values are multiplied by 1000.
    pub fn seconds(array: &PrimitiveArray<Time32SecondType>, zone: Option<ZoneContext>) -> Self {
        Self {
            column: FixedColumn::of(array),
            unit: TimeUnit::Second,
            zone,
        }
    }

    /// Binder for `Time32(Millisecond)`; values are bound unchanged.
    pub fn milliseconds(
        array: &PrimitiveArray<Time32MillisecondType>,
        zone: Option<ZoneContext>,
    ) -> Self {
        Self {
            column: FixedColumn::of(array),
            unit: TimeUnit::Millisecond,
            zone,
        }
    }

    /// Unit of the stored values.
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Bind the time at `row` to `parameter`. `row` must not be null.
    ///
    /// # Errors
    /// `RowOutOfBounds`, `Overflow` when the scaled value leaves `i32`, `OutOfRange` when it
    /// is not a time of day, or the statement's error.
    pub fn bind<S: StatementCursor + ?Sized>(
        &self,
        statement: &mut S,
        parameter: usize,
        row: usize,
    ) -> Result<()> {
        let stored = self.column.read_i32(row)?;
        bind_scaled(
            statement,
            parameter,
            i64::from(stored),
            self.unit,
            self.zone.as_ref(),
        )
    }
}

/// Binds `Time64` values (8-byte storage) as civil times, truncated to milliseconds.
#[derive(Clone, Debug)]
pub struct Time64Binder {
    column: FixedColumn,
    unit: TimeUnit,
    zone: Option<ZoneContext>,
}

impl Time64Binder {
    /// Binder for `Time64(Microsecond)`; values are divided by 1000.
    pub fn microseconds(
        array: &PrimitiveArray<Time64MicrosecondType>,
        zone: Option<ZoneContext>,
    ) -> Self {
        Self {
            column: FixedColumn::of(array),
            unit: TimeUnit::Microsecond,
            zone,
        }
    }

    /// Binder for `Time64(Nanosecond)`; values are divided by 1_000_000.
    pub fn nanoseconds(
        array: &PrimitiveArray<Time64NanosecondType>,
        zone: Option<ZoneContext>,
    ) -> Self {
        Self {
            column: FixedColumn::of(array),
            unit: TimeUnit::Nanosecond,
            zone,
        }
    }

    /// Unit of the stored values.
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Bind the time at `row` to `parameter`. `row` must not be null.
    ///
    /// # Errors
    /// Same as [`Time32Binder::bind`].
    pub fn bind<S: StatementCursor + ?Sized>(
        &self,
        statement: &mut S,
        parameter: usize,
        row: usize,
    ) -> Result<()> {
        let stored = self.column.read_i64(row)?;
        bind_scaled(statement, parameter, stored, self.unit, self.zone.as_ref())
    }
}
