//! Read-path consumers: one per temporal kind and nullability, each filling one column.
//!
//! A consumer is bound to a pre-sized [`ColumnBuffer`], the source column index and a row
//! position. [`TemporalConsumer::consume`] extracts the current row's value through the
//! parsing functions, writes the storage unit at the row position and advances the position
//! by exactly one, also for `NULL` rows, so source rows and buffer rows stay aligned.
//!
//! - [`DateConsumer`] → `Date32` (days since epoch).
//! - [`TimeConsumer`] → `Time32(Millisecond)`, whatever the source precision.
//! - [`TimestampConsumer`] → `Timestamp(Microsecond, None)`.
//! - [`TimestampTzConsumer`] → `Timestamp(Microsecond, Some(zone))`.

use std::sync::Arc;

use arrow_array::{ArrayRef, types::ArrowPrimitiveType};
use arrow_schema::DataType;

use crate::{
    buffer::ColumnBuffer, cursor::RowCursor, error::Result, kind::TemporalKind,
    parse::FallbackLatch, zone::ZoneContext,
};

mod date;
mod time;
mod timestamp;

pub use date::{DateConsumer, millis_to_days};
pub use time::TimeConsumer;
pub use timestamp::{TimestampConsumer, TimestampTzConsumer};

/// Marker describing whether a consumer checks the cursor's null indicator.
pub trait NullMode {
    /// `true` for columns that may contain `NULL`.
    const NULLABLE: bool;
}

/// Column may contain nulls; null rows leave their slot untouched.
#[derive(Debug)]
pub enum Nullable {}
impl NullMode for Nullable {
    const NULLABLE: bool = true;
}

/// Column statically known to hold no nulls; the null indicator is never consulted.
///
/// Feeding a `NULL` row is a caller bug (checked by a debug assertion only).
#[derive(Debug)]
pub enum NonNullable {}
impl NullMode for NonNullable {
    const NULLABLE: bool = false;
}

/// Destination buffer, source column and row position of one consumer.
#[derive(Debug)]
pub(crate) struct ColumnSlot<T: ArrowPrimitiveType> {
    buffer: ColumnBuffer<T>,
    column: usize,
    row: usize,
}

impl<T: ArrowPrimitiveType> ColumnSlot<T> {
    pub(crate) fn new(buffer: ColumnBuffer<T>, column: usize) -> Self {
        Self {
            buffer,
            column,
            row: 0,
        }
    }

    pub(crate) fn column(&self) -> usize {
        self.column
    }

    /// Write the converted value for the current row unless it is a tolerated null.
    ///
    /// `convert` runs only for non-null rows.
    pub(crate) fn store<N: NullMode, C: RowCursor + ?Sized>(
        &mut self,
        cursor: &C,
        convert: impl FnOnce() -> Result<T::Native>,
    ) -> Result<()> {
        if N::NULLABLE {
            if !cursor.was_null() {
                self.buffer.set(self.row, convert()?)?;
            }
        } else {
            debug_assert!(
                !cursor.was_null(),
                "NULL in non-nullable column {} at row {}",
                self.column,
                self.row
            );
            self.buffer.set(self.row, convert()?)?;
        }
        self.row += 1;
        Ok(())
    }

    fn replace(&mut self, next: ColumnBuffer<T>) -> ColumnBuffer<T> {
        self.row = 0;
        std::mem::replace(&mut self.buffer, next)
    }

    fn finish_batch(&mut self, next_capacity: usize) -> Result<ArrayRef> {
        let next = ColumnBuffer::with_capacity(next_capacity)
            .with_data_type(self.buffer.data_type().clone())?;
        let rows = self.row;
        let done = self.replace(next);
        Ok(Arc::new(done.finish(rows)?))
    }
}

// Accessors shared by all typed consumers.
macro_rules! impl_slot_accessors {
    ($consumer:ident, $atype:ty) => {
        impl<N: $crate::consumer::NullMode> $consumer<N> {
            /// Zero-based source column this consumer reads.
            pub fn column(&self) -> usize {
                self.slot.column()
            }

            /// Row position the next `consume` call writes to.
            pub fn position(&self) -> usize {
                self.slot.row
            }

            /// The destination buffer.
            pub fn buffer(&self) -> &$crate::buffer::ColumnBuffer<$atype> {
                &self.slot.buffer
            }

            /// Swap in the buffer for the next batch and restart at row 0; returns the old one.
            pub fn replace_buffer(
                &mut self,
                next: $crate::buffer::ColumnBuffer<$atype>,
            ) -> $crate::buffer::ColumnBuffer<$atype> {
                self.slot.replace(next)
            }
        }
    };
}
pub(crate) use impl_slot_accessors;

/// Closed set of temporal consumers: temporal kind × nullability.
#[derive(Debug)]
pub enum TemporalConsumer {
    /// Nullable date column.
    Date(DateConsumer<Nullable>),
    /// Non-nullable date column.
    DateNonNull(DateConsumer<NonNullable>),
    /// Nullable time column.
    Time(TimeConsumer<Nullable>),
    /// Non-nullable time column.
    TimeNonNull(TimeConsumer<NonNullable>),
    /// Nullable zone-naive timestamp column.
    Timestamp(TimestampConsumer<Nullable>),
    /// Non-nullable zone-naive timestamp column.
    TimestampNonNull(TimestampConsumer<NonNullable>),
    /// Nullable zone-aware timestamp column.
    TimestampTz(TimestampTzConsumer<Nullable>),
    /// Non-nullable zone-aware timestamp column.
    TimestampTzNonNull(TimestampTzConsumer<NonNullable>),
}

macro_rules! each_consumer {
    ($self:expr, $c:ident => $body:expr) => {
        match $self {
            TemporalConsumer::Date($c) => $body,
            TemporalConsumer::DateNonNull($c) => $body,
            TemporalConsumer::Time($c) => $body,
            TemporalConsumer::TimeNonNull($c) => $body,
            TemporalConsumer::Timestamp($c) => $body,
            TemporalConsumer::TimestampNonNull($c) => $body,
            TemporalConsumer::TimestampTz($c) => $body,
            TemporalConsumer::TimestampTzNonNull($c) => $body,
        }
    };
}

impl TemporalConsumer {
    /// Date consumer writing `Date32` days; `zone` qualifies legacy extraction.
    pub fn date(
        buffer: ColumnBuffer<arrow_array::types::Date32Type>,
        column: usize,
        nullable: bool,
        zone: Option<ZoneContext>,
    ) -> Self {
        if nullable {
            Self::Date(DateConsumer::new(buffer, column, zone))
        } else {
            Self::DateNonNull(DateConsumer::new(buffer, column, zone))
        }
    }

    /// Time consumer writing `Time32(Millisecond)`.
    pub fn time(
        buffer: ColumnBuffer<arrow_array::types::Time32MillisecondType>,
        column: usize,
        nullable: bool,
    ) -> Self {
        if nullable {
            Self::Time(TimeConsumer::new(buffer, column))
        } else {
            Self::TimeNonNull(TimeConsumer::new(buffer, column))
        }
    }

    /// Zone-naive timestamp consumer writing microseconds.
    pub fn timestamp(
        buffer: ColumnBuffer<arrow_array::types::TimestampMicrosecondType>,
        column: usize,
        nullable: bool,
    ) -> Self {
        if nullable {
            Self::Timestamp(TimestampConsumer::new(buffer, column))
        } else {
            Self::TimestampNonNull(TimestampConsumer::new(buffer, column))
        }
    }

    /// Zone-aware timestamp consumer; the buffer is retyped to carry `zone`.
    ///
    /// # Errors
    /// Propagates buffer retyping failures.
    pub fn timestamp_tz(
        buffer: ColumnBuffer<arrow_array::types::TimestampMicrosecondType>,
        column: usize,
        nullable: bool,
        zone: ZoneContext,
    ) -> Result<Self> {
        Ok(if nullable {
            Self::TimestampTz(TimestampTzConsumer::new(buffer, column, zone)?)
        } else {
            Self::TimestampTzNonNull(TimestampTzConsumer::new(buffer, column, zone)?)
        })
    }

    /// Consume the cursor's current row.
    ///
    /// # Errors
    /// Propagates extraction, overflow and buffer bounds errors.
    pub fn consume<C: RowCursor + ?Sized>(
        &mut self,
        cursor: &mut C,
        latch: &FallbackLatch,
    ) -> Result<()> {
        each_consumer!(self, c => c.consume(cursor, latch))
    }

    /// Temporal kind of the column being produced.
    pub fn kind(&self) -> TemporalKind {
        match self {
            Self::Date(_) | Self::DateNonNull(_) => TemporalKind::Date,
            Self::Time(_) | Self::TimeNonNull(_) => TemporalKind::Time32,
            Self::Timestamp(_) | Self::TimestampNonNull(_) => TemporalKind::Timestamp,
            Self::TimestampTz(_) | Self::TimestampTzNonNull(_) => TemporalKind::TimestampTz,
        }
    }

    /// Whether this consumer honours the null indicator.
    pub fn is_nullable(&self) -> bool {
        matches!(
            self,
            Self::Date(_) | Self::Time(_) | Self::Timestamp(_) | Self::TimestampTz(_)
        )
    }

    /// Arrow type of the produced column.
    pub fn data_type(&self) -> DataType {
        each_consumer!(self, c => c.buffer().data_type().clone())
    }

    /// Zero-based source column.
    pub fn column(&self) -> usize {
        each_consumer!(self, c => c.column())
    }

    /// Rows consumed into the current buffer.
    pub fn position(&self) -> usize {
        each_consumer!(self, c => c.position())
    }

    /// Finish the current buffer into an array of the consumed rows and continue with a
    /// fresh buffer of `next_capacity` rows.
    ///
    /// # Errors
    /// Propagates Arrow assembly errors.
    pub fn finish_batch(&mut self, next_capacity: usize) -> Result<ArrayRef> {
        each_consumer!(self, c => c.slot.finish_batch(next_capacity))
    }
}
