//! Date consumer: epoch milliseconds → `Date32` day counts.

use std::marker::PhantomData;

use arrow_array::types::Date32Type;

use super::{ColumnSlot, NullMode, impl_slot_accessors};
use crate::{
    buffer::ColumnBuffer,
    cursor::RowCursor,
    error::{ConversionError, Result},
    kind::MILLIS_PER_DAY,
    parse::{FallbackLatch, parse_date},
    zone::ZoneContext,
};

/// Truncate epoch milliseconds to whole days.
///
/// # Errors
/// Returns `ConversionError::Overflow` when the day count does not fit `i32`.
pub fn millis_to_days(millis: i64) -> Result<i32> {
    i32::try_from(millis / MILLIS_PER_DAY)
        .map_err(|_| ConversionError::overflow(millis, "milliseconds", "i32 days"))
}

/// Consumer for date columns.
#[derive(Debug)]
pub struct DateConsumer<N: NullMode> {
    pub(super) slot: ColumnSlot<Date32Type>,
    zone: Option<ZoneContext>,
    _mode: PhantomData<N>,
}

impl<N: NullMode> DateConsumer<N> {
    /// Bind a consumer to `buffer`, reading source column `column`.
    pub fn new(buffer: ColumnBuffer<Date32Type>, column: usize, zone: Option<ZoneContext>) -> Self {
        Self {
            slot: ColumnSlot::new(buffer, column),
            zone,
            _mode: PhantomData,
        }
    }

    /// Consume the cursor's current row.
    ///
    /// # Errors
    /// Propagates extraction errors and day-count overflow.
    pub fn consume<C: RowCursor + ?Sized>(
        &mut self,
        cursor: &mut C,
        latch: &FallbackLatch,
    ) -> Result<()> {
        let millis = parse_date(cursor, self.slot.column(), self.zone.as_ref(), latch)?;
        self.slot.store::<N, _>(cursor, || millis_to_days(millis))
    }
}

impl_slot_accessors!(DateConsumer, Date32Type);
