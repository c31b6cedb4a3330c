//! Timestamp consumers: epoch microseconds, with or without zone metadata.

use std::marker::PhantomData;

use arrow_array::types::TimestampMicrosecondType;
use arrow_schema::{DataType, TimeUnit};

use super::{ColumnSlot, NullMode, impl_slot_accessors};
use crate::{
    buffer::ColumnBuffer,
    cursor::RowCursor,
    error::Result,
    parse::{FallbackLatch, parse_timestamp},
    zone::ZoneContext,
};

/// Consumer for zone-naive timestamp columns.
#[derive(Debug)]
pub struct TimestampConsumer<N: NullMode> {
    pub(super) slot: ColumnSlot<TimestampMicrosecondType>,
    _mode: PhantomData<N>,
}

impl<N: NullMode> TimestampConsumer<N> {
    /// Bind a consumer to `buffer`, reading source column `column`.
    pub fn new(buffer: ColumnBuffer<TimestampMicrosecondType>, column: usize) -> Self {
        Self {
            slot: ColumnSlot::new(buffer, column),
            _mode: PhantomData,
        }
    }

    /// Consume the cursor's current row.
    ///
    /// # Errors
    /// Propagates extraction errors and microsecond overflow.
    pub fn consume<C: RowCursor + ?Sized>(
        &mut self,
        cursor: &mut C,
        latch: &FallbackLatch,
    ) -> Result<()> {
        let micros = parse_timestamp(cursor, self.slot.column(), None, latch)?;
        self.slot.store::<N, _>(cursor, || Ok(micros))
    }
}

impl_slot_accessors!(TimestampConsumer, TimestampMicrosecondType);

/// Consumer for timestamp columns whose schema carries a zone.
///
/// The zone also qualifies legacy extraction.
#[derive(Debug)]
pub struct TimestampTzConsumer<N: NullMode> {
    pub(super) slot: ColumnSlot<TimestampMicrosecondType>,
    zone: ZoneContext,
    _mode: PhantomData<N>,
}

impl<N: NullMode> TimestampTzConsumer<N> {
    /// Bind a consumer to `buffer`, retyped as `Timestamp(Microsecond, zone)`.
    ///
    /// # Errors
    /// Propagates buffer retyping failures.
    pub fn new(
        buffer: ColumnBuffer<TimestampMicrosecondType>,
        column: usize,
        zone: ZoneContext,
    ) -> Result<Self> {
        let buffer = buffer.with_data_type(DataType::Timestamp(
            TimeUnit::Microsecond,
            Some(zone.arrow_name()),
        ))?;
        Ok(Self {
            slot: ColumnSlot::new(buffer, column),
            zone,
            _mode: PhantomData,
        })
    }

    /// The zone written into the column's type.
    pub fn zone(&self) -> &ZoneContext {
        &self.zone
    }

    /// Consume the cursor's current row.
    ///
    /// # Errors
    /// Propagates extraction errors and microsecond overflow.
    pub fn consume<C: RowCursor + ?Sized>(
        &mut self,
        cursor: &mut C,
        latch: &FallbackLatch,
    ) -> Result<()> {
        let micros = parse_timestamp(cursor, self.slot.column(), Some(&self.zone), latch)?;
        self.slot.store::<N, _>(cursor, || Ok(micros))
    }
}

impl_slot_accessors!(TimestampTzConsumer, TimestampMicrosecondType);
