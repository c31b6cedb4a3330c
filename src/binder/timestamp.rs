use std::sync::Arc;

use arrow_array::{PrimitiveArray, types::ArrowTimestampType};
use arrow_schema::TimeUnit;
use jiff::Timestamp;

use super::{FixedColumn, zone_of};
use crate::{
    cursor::StatementCursor,
    error::{ConversionError, Result},
    zone::ZoneContext,
};

/// Binds epoch timestamps of any unit as instants.
///
/// The zone metadata of the array does not affect the instant; it is only reported through
/// [`TimestampBinder::metadata_zone`]. The binder's own zone is what the statement receives.
#[derive(Clone, Debug)]
pub struct TimestampBinder {
    column: FixedColumn,
    unit: TimeUnit,
    metadata_zone: Option<Arc<str>>,
    zone: Option<ZoneContext>,
}

impl TimestampBinder {
    /// Binder over `array`.
    pub fn new<T: ArrowTimestampType>(
        array: &PrimitiveArray<T>,
        zone: Option<ZoneContext>,
    ) -> Self {
        Self {
            column: FixedColumn::of(array),
            unit: T::UNIT,
            metadata_zone: array.timezone().map(Arc::from),
            zone,
        }
    }

    /// Unit of the stored values.
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Zone named in the array's `DataType`, if any.
    pub fn metadata_zone(&self) -> Option<&str> {
        self.metadata_zone.as_deref()
    }

    /// Bind the instant at `row` to `parameter`. `row` must not be null.
    ///
    /// # Errors
    /// `RowOutOfBounds`, `OutOfRange` for values outside the supported instant range, or the
    /// statement's error.
    pub fn bind<S: StatementCursor + ?Sized>(
        &self,
        statement: &mut S,
        parameter: usize,
        row: usize,
    ) -> Result<()> {
        let stored = self.column.read_i64(row)?;
        let instant = match self.unit {
            TimeUnit::Second => Timestamp::from_second(stored),
            TimeUnit::Millisecond => Timestamp::from_millisecond(stored),
            TimeUnit::Microsecond => Timestamp::from_microsecond(stored),
            TimeUnit::Nanosecond => Timestamp::from_nanosecond(i128::from(stored)),
        }
        .map_err(|_| ConversionError::out_of_range("timestamp", stored))?;
        statement.set_timestamp(parameter, instant, zone_of(self.zone.as_ref()))?;
        Ok(())
    }
}
