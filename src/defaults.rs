//! Generic default conversions for non-temporal columns.
//!
//! Integers, strings, decimals and other non-temporal types are converted by an external
//! collaborator. This module only defines the seams it plugs into; [`NoDefaults`] rejects
//! every non-temporal type.

use arrow_array::ArrayRef;
use arrow_schema::DataType;

use crate::{
    error::{ConversionError, Result},
    sql_type::SourceField,
};

/// Read-path fallback: type mapping and consumers for non-temporal columns.
pub trait ReadDefaults<C: ?Sized> {
    /// Arrow type for a non-temporal source column.
    ///
    /// # Errors
    /// Returns `ConversionError::UnsupportedSqlType` when no mapping exists.
    fn arrow_type(&self, column: usize, field: &SourceField) -> Result<DataType>;

    /// Consumer writing `data_type` for source column `column`.
    ///
    /// # Errors
    /// Returns `ConversionError::UnsupportedArrowType` when no consumer exists.
    fn consumer(
        &self,
        data_type: &DataType,
        column: usize,
        nullable: bool,
        capacity: usize,
    ) -> Result<Box<dyn DefaultConsumer<C>>>;
}

/// A consumer supplied by [`ReadDefaults`].
pub trait DefaultConsumer<C: ?Sized> {
    /// Consume the cursor's current row.
    ///
    /// # Errors
    /// Implementation-defined conversion or source errors.
    fn consume(&mut self, cursor: &mut C) -> Result<()>;

    /// Arrow type of the produced column.
    fn data_type(&self) -> DataType;

    /// Finish the consumed rows into an array and continue with `next_capacity` rows.
    ///
    /// # Errors
    /// Implementation-defined assembly errors.
    fn finish_batch(&mut self, next_capacity: usize) -> Result<ArrayRef>;
}

/// Write-path fallback: binders for non-temporal columns.
pub trait WriteDefaults<S: ?Sized> {
    /// Binder reading `array` for 1-based statement parameter `parameter`.
    ///
    /// # Errors
    /// Returns `ConversionError::UnsupportedArrowType` when no binder exists.
    fn binder(&self, array: &ArrayRef, parameter: usize) -> Result<Box<dyn DefaultBinder<S>>>;
}

/// A binder supplied by [`WriteDefaults`]. Never called for null rows.
pub trait DefaultBinder<S: ?Sized> {
    /// Bind the value at `row` to `parameter`.
    ///
    /// # Errors
    /// Implementation-defined conversion or source errors.
    fn bind(&self, statement: &mut S, parameter: usize, row: usize) -> Result<()>;
}

/// Defaults that support no non-temporal type.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDefaults;

impl<C: ?Sized> ReadDefaults<C> for NoDefaults {
    fn arrow_type(&self, column: usize, field: &SourceField) -> Result<DataType> {
        Err(ConversionError::UnsupportedSqlType {
            column,
            sql_type: field.sql_type.clone(),
        })
    }

    fn consumer(
        &self,
        data_type: &DataType,
        column: usize,
        _nullable: bool,
        _capacity: usize,
    ) -> Result<Box<dyn DefaultConsumer<C>>> {
        Err(ConversionError::UnsupportedArrowType {
            column,
            data_type: data_type.clone(),
        })
    }
}

impl<S: ?Sized> WriteDefaults<S> for NoDefaults {
    fn binder(&self, array: &ArrayRef, parameter: usize) -> Result<Box<dyn DefaultBinder<S>>> {
        Err(ConversionError::UnsupportedArrowType {
            column: parameter.saturating_sub(1),
            data_type: array.data_type().clone(),
        })
    }
}
