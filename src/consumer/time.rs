//! Time consumer: milliseconds since midnight → `Time32(Millisecond)`.

use std::marker::PhantomData;

use arrow_array::types::Time32MillisecondType;

use super::{ColumnSlot, NullMode, impl_slot_accessors};
use crate::{
    buffer::ColumnBuffer,
    cursor::RowCursor,
    error::Result,
    parse::{FallbackLatch, parse_time},
};

/// Consumer for time-of-day columns; storage is milliseconds regardless of source precision.
#[derive(Debug)]
pub struct TimeConsumer<N: NullMode> {
    pub(super) slot: ColumnSlot<Time32MillisecondType>,
    _mode: PhantomData<N>,
}

impl<N: NullMode> TimeConsumer<N> {
    /// Bind a consumer to `buffer`, reading source column `column`.
    pub fn new(buffer: ColumnBuffer<Time32MillisecondType>, column: usize) -> Self {
        Self {
            slot: ColumnSlot::new(buffer, column),
            _mode: PhantomData,
        }
    }

    /// Consume the cursor's current row.
    ///
    /// # Errors
    /// Propagates extraction errors.
    pub fn consume<C: RowCursor + ?Sized>(
        &mut self,
        cursor: &mut C,
        latch: &FallbackLatch,
    ) -> Result<()> {
        let millis = parse_time(cursor, self.slot.column(), None, latch)?;
        self.slot.store::<N, _>(cursor, || Ok(millis))
    }
}

impl_slot_accessors!(TimeConsumer, Time32MillisecondType);
