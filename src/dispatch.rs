//! Consumer dispatch: materialized Arrow type → concrete consumer.

use arrow_array::ArrayRef;
use arrow_schema::DataType;

use crate::{
    buffer::ColumnBuffer,
    consumer::TemporalConsumer,
    cursor::RowCursor,
    defaults::{DefaultConsumer, ReadDefaults},
    error::Result,
    parse::FallbackLatch,
    zone::ZoneContext,
};

/// Consumer for one result column: a temporal consumer or the generic default.
pub enum ColumnConsumer<C: ?Sized> {
    /// Date, time or timestamp column.
    Temporal(TemporalConsumer),
    /// Column handled by the default conversions.
    Default(Box<dyn DefaultConsumer<C>>),
}

impl<C: RowCursor + ?Sized> ColumnConsumer<C> {
    /// Consume the cursor's current row.
    ///
    /// # Errors
    /// Propagates the consumer's errors.
    pub fn consume(&mut self, cursor: &mut C, latch: &FallbackLatch) -> Result<()> {
        match self {
            ColumnConsumer::Temporal(c) => c.consume(cursor, latch),
            ColumnConsumer::Default(c) => c.consume(cursor),
        }
    }

    /// Arrow type of the produced column.
    pub fn data_type(&self) -> DataType {
        match self {
            ColumnConsumer::Temporal(c) => c.data_type(),
            ColumnConsumer::Default(c) => c.data_type(),
        }
    }

    /// Finish the consumed rows and continue with a buffer of `next_capacity` rows.
    ///
    /// # Errors
    /// Propagates Arrow assembly errors.
    pub fn finish_batch(&mut self, next_capacity: usize) -> Result<ArrayRef> {
        match self {
            ColumnConsumer::Temporal(c) => c.finish_batch(next_capacity),
            ColumnConsumer::Default(c) => c.finish_batch(next_capacity),
        }
    }

    /// The temporal consumer, if this column is temporal.
    pub fn as_temporal(&self) -> Option<&TemporalConsumer> {
        match self {
            ColumnConsumer::Temporal(c) => Some(c),
            ColumnConsumer::Default(_) => None,
        }
    }
}

/// Select the consumer for a column materialized as `data_type`.
///
/// - `Date32` → date consumer, qualified by the session `zone`.
/// - `Time32`/`Time64` of any unit → time consumer with millisecond storage.
/// - `Timestamp` without zone → zone-naive timestamp consumer.
/// - `Timestamp` with zone → zone-aware consumer in that zone.
/// - anything else → `defaults`.
///
/// The destination buffer is allocated with `capacity` rows.
///
/// # Errors
/// Returns `ConversionError::InvalidTimeZone` for an unknown timestamp zone, and propagates
/// errors of the default consumer factory.
pub fn resolve_consumer<C: RowCursor + ?Sized>(
    data_type: &DataType,
    column: usize,
    nullable: bool,
    capacity: usize,
    zone: Option<&ZoneContext>,
    defaults: &dyn ReadDefaults<C>,
) -> Result<ColumnConsumer<C>> {
    let consumer = match data_type {
        DataType::Date32 => TemporalConsumer::date(
            ColumnBuffer::with_capacity(capacity),
            column,
            nullable,
            zone.cloned(),
        ),
        DataType::Time32(_) | DataType::Time64(_) => {
            TemporalConsumer::time(ColumnBuffer::with_capacity(capacity), column, nullable)
        }
        DataType::Timestamp(_, None) => {
            TemporalConsumer::timestamp(ColumnBuffer::with_capacity(capacity), column, nullable)
        }
        DataType::Timestamp(_, Some(name)) => {
            let column_zone = match zone {
                Some(z) if z.name() == name.as_ref() => z.clone(),
                _ => ZoneContext::named(name)?,
            };
            TemporalConsumer::timestamp_tz(
                ColumnBuffer::with_capacity(capacity),
                column,
                nullable,
                column_zone,
            )?
        }
        other => {
            return defaults
                .consumer(other, column, nullable, capacity)
                .map(ColumnConsumer::Default);
        }
    };
    Ok(ColumnConsumer::Temporal(consumer))
}
