//! Fixed-width column buffers written by consumers and read by binders.

use arrow_array::{PrimitiveArray, types::ArrowPrimitiveType};
use arrow_buffer::{BooleanBufferBuilder, Buffer, NullBuffer, ScalarBuffer};
use arrow_schema::{ArrowError, DataType};

use crate::error::{ConversionError, Result};

/// Pre-sized storage for one column of a batch.
///
/// Every slot starts out null. Writes go to explicit row offsets and never grow the buffer;
/// callers size it to the batch row count up front.
#[derive(Debug)]
pub struct ColumnBuffer<T: ArrowPrimitiveType> {
    values: Vec<T::Native>,
    validity: BooleanBufferBuilder,
    data_type: DataType,
}

impl<T: ArrowPrimitiveType> ColumnBuffer<T> {
    /// Allocate `capacity` null slots typed as `T::DATA_TYPE`.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut validity = BooleanBufferBuilder::new(capacity);
        validity.append_n(capacity, false);
        Self {
            values: vec![T::Native::default(); capacity],
            validity,
            data_type: T::DATA_TYPE,
        }
    }

    /// Replace the logical type, e.g. to attach timestamp zone metadata.
    ///
    /// # Errors
    /// Returns an Arrow error when `data_type` has a different physical layout than `T`.
    pub fn with_data_type(mut self, data_type: DataType) -> Result<Self> {
        if !PrimitiveArray::<T>::is_compatible(&data_type) {
            return Err(ArrowError::InvalidArgumentError(format!(
                "{data_type} is not compatible with {}",
                T::DATA_TYPE
            ))
            .into());
        }
        self.data_type = data_type;
        Ok(self)
    }

    /// Number of rows this buffer can hold.
    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    /// Logical type of the finished array.
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// Store `value` at `row` and mark the slot valid.
    ///
    /// # Errors
    /// Returns `ConversionError::RowOutOfBounds` past the capacity.
    pub fn set(&mut self, row: usize, value: T::Native) -> Result<()> {
        let capacity = self.values.len();
        let slot = self
            .values
            .get_mut(row)
            .ok_or(ConversionError::RowOutOfBounds { row, capacity })?;
        *slot = value;
        self.validity.set_bit(row, true);
        Ok(())
    }

    /// Whether `row` holds a written value.
    pub fn is_valid(&self, row: usize) -> bool {
        row < self.values.len() && self.validity.get_bit(row)
    }

    /// The value at `row`, `None` when the slot is null or out of range.
    pub fn value(&self, row: usize) -> Option<T::Native> {
        self.is_valid(row).then(|| self.values[row])
    }

    /// Produce an array of the first `len` rows.
    ///
    /// # Errors
    /// Returns `ConversionError::RowOutOfBounds` when `len` exceeds the capacity.
    pub fn finish(self, len: usize) -> Result<PrimitiveArray<T>> {
        let capacity = self.values.len();
        if len > capacity {
            return Err(ConversionError::RowOutOfBounds { row: len, capacity });
        }
        let Self {
            mut values,
            mut validity,
            data_type,
        } = self;
        values.truncate(len);
        validity.truncate(len);
        let nulls = NullBuffer::new(validity.finish());
        let array = PrimitiveArray::<T>::try_new(ScalarBuffer::from(values), Some(nulls))?;
        Ok(array.with_data_type(data_type))
    }
}

/// Read the `W`-byte value of `row` from a fixed-width values buffer.
///
/// The offset is `row * W`, as for an unchecked read, but the access is bounds checked.
///
/// # Errors
/// Returns `ConversionError::RowOutOfBounds` when the slot lies past the buffer end.
pub fn read_fixed<const W: usize>(values: &Buffer, row: usize) -> Result<[u8; W]> {
    let capacity = values.len() / W;
    let out_of_bounds = || ConversionError::RowOutOfBounds { row, capacity };
    let start = row.checked_mul(W).ok_or_else(out_of_bounds)?;
    let end = start.checked_add(W).ok_or_else(out_of_bounds)?;
    let bytes = values.as_slice().get(start..end).ok_or_else(out_of_bounds)?;
    <[u8; W]>::try_from(bytes).map_err(|_| out_of_bounds())
}
