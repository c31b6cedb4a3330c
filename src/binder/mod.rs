//! Write-path binders: decode a stored unit at a row and bind it as a statement parameter.
//!
//! Binders read the fixed-width values buffer of an Arrow array directly, at byte offset
//! `row * width`, through the bounds-checked [`read_fixed`] accessor. They never look at the
//! validity bitmap: absent rows must be filtered (or bound as `NULL`) by the caller, which
//! [`ParameterBinder`] does. Debug builds assert the precondition.

use arrow_array::{
    Array, PrimitiveArray,
    cast::AsArray,
    types::{
        ArrowPrimitiveType, Date32Type, Date64Type, Time32MillisecondType, Time32SecondType,
        Time64MicrosecondType, Time64NanosecondType, TimestampMicrosecondType,
        TimestampMillisecondType, TimestampNanosecondType, TimestampSecondType,
    },
};
use arrow_buffer::{Buffer, NullBuffer};
use arrow_schema::{DataType, TimeUnit};
use jiff::tz::TimeZone;

use crate::{
    buffer::read_fixed, cursor::StatementCursor, error::Result, kind::TemporalKind,
    zone::ZoneContext,
};

mod date;
mod driver;
mod time;
mod timestamp;

pub use date::{DateDayBinder, DateMilliBinder};
pub use driver::{ColumnBinder, ParameterBinder, bind_batches};
pub use time::{Time32Binder, Time64Binder, time_of_day};
pub use timestamp::TimestampBinder;

/// Raw values and validity of one primitive array.
#[derive(Clone, Debug)]
pub(crate) struct FixedColumn {
    values: Buffer,
    nulls: Option<NullBuffer>,
}

impl FixedColumn {
    pub(crate) fn of<T: ArrowPrimitiveType>(array: &PrimitiveArray<T>) -> Self {
        Self {
            values: array.values().inner().clone(),
            nulls: array.nulls().cloned(),
        }
    }

    /// Bytes of the value at `row`.
    pub(crate) fn read<const W: usize>(&self, row: usize) -> Result<[u8; W]> {
        debug_assert!(
            self.nulls
                .as_ref()
                .is_none_or(|n| row >= n.len() || n.is_valid(row)),
            "binder invoked for NULL row {row}"
        );
        read_fixed::<W>(&self.values, row)
    }

    pub(crate) fn read_i32(&self, row: usize) -> Result<i32> {
        self.read::<4>(row).map(i32::from_ne_bytes)
    }

    pub(crate) fn read_i64(&self, row: usize) -> Result<i64> {
        self.read::<8>(row).map(i64::from_ne_bytes)
    }
}

fn zone_of(zone: Option<&ZoneContext>) -> Option<&TimeZone> {
    zone.map(ZoneContext::time_zone)
}

/// Closed set of temporal binders.
#[derive(Clone, Debug)]
pub enum TemporalBinder {
    /// `Date32` column.
    DateDay(DateDayBinder),
    /// `Date64` column.
    DateMilli(DateMilliBinder),
    /// `Time32` column.
    Time32(Time32Binder),
    /// `Time64` column.
    Time64(Time64Binder),
    /// `Timestamp` column of any unit.
    Timestamp(TimestampBinder),
}

impl TemporalBinder {
    /// Binder for `array`, `None` when its type is not temporal.
    ///
    /// `zone` is handed to the statement on every bind; without one the driver's own
    /// default applies.
    pub fn for_array(array: &dyn Array, zone: Option<&ZoneContext>) -> Option<Self> {
        let zone = zone.cloned();
        let binder = match array.data_type() {
            DataType::Date32 => {
                Self::DateDay(DateDayBinder::new(array.as_primitive::<Date32Type>(), zone))
            }
            DataType::Date64 => {
                Self::DateMilli(DateMilliBinder::new(array.as_primitive::<Date64Type>(), zone))
            }
            DataType::Time32(TimeUnit::Second) => Self::Time32(Time32Binder::seconds(
                array.as_primitive::<Time32SecondType>(),
                zone,
            )),
            DataType::Time32(_) => Self::Time32(Time32Binder::milliseconds(
                array.as_primitive::<Time32MillisecondType>(),
                zone,
            )),
            DataType::Time64(TimeUnit::Nanosecond) => Self::Time64(Time64Binder::nanoseconds(
                array.as_primitive::<Time64NanosecondType>(),
                zone,
            )),
            DataType::Time64(_) => Self::Time64(Time64Binder::microseconds(
                array.as_primitive::<Time64MicrosecondType>(),
                zone,
            )),
            DataType::Timestamp(TimeUnit::Second, _) => Self::Timestamp(TimestampBinder::new(
                array.as_primitive::<TimestampSecondType>(),
                zone,
            )),
            DataType::Timestamp(TimeUnit::Millisecond, _) => Self::Timestamp(
                TimestampBinder::new(array.as_primitive::<TimestampMillisecondType>(), zone),
            ),
            DataType::Timestamp(TimeUnit::Microsecond, _) => Self::Timestamp(
                TimestampBinder::new(array.as_primitive::<TimestampMicrosecondType>(), zone),
            ),
            DataType::Timestamp(TimeUnit::Nanosecond, _) => Self::Timestamp(
                TimestampBinder::new(array.as_primitive::<TimestampNanosecondType>(), zone),
            ),
            _ => return None,
        };
        Some(binder)
    }

    /// Bind the value at `row` to the 1-based `parameter`.
    ///
    /// # Errors
    /// Returns `RowOutOfBounds` past the array, `Overflow` or `OutOfRange` for values
    /// without a native representation, and propagates statement errors.
    pub fn bind<S: StatementCursor + ?Sized>(
        &self,
        statement: &mut S,
        parameter: usize,
        row: usize,
    ) -> Result<()> {
        match self {
            Self::DateDay(b) => b.bind(statement, parameter, row),
            Self::DateMilli(b) => b.bind(statement, parameter, row),
            Self::Time32(b) => b.bind(statement, parameter, row),
            Self::Time64(b) => b.bind(statement, parameter, row),
            Self::Timestamp(b) => b.bind(statement, parameter, row),
        }
    }

    /// Temporal kind of the bound column.
    pub fn kind(&self) -> TemporalKind {
        match self {
            Self::DateDay(_) | Self::DateMilli(_) => TemporalKind::Date,
            Self::Time32(_) => TemporalKind::Time32,
            Self::Time64(_) => TemporalKind::Time64,
            Self::Timestamp(b) if b.metadata_zone().is_some() => TemporalKind::TimestampTz,
            Self::Timestamp(_) => TemporalKind::Timestamp,
        }
    }
}
