use arrow_array::{Array, ArrayRef, RecordBatch};
use log::{debug, info};

use super::TemporalBinder;
use crate::{
    config::{BindConfig, BindMode},
    cursor::StatementCursor,
    defaults::{DefaultBinder, WriteDefaults},
    error::{ConversionError, Result},
    zone::ZoneContext,
};

/// Binder for one statement parameter: temporal or the generic default.
pub enum ColumnBinder<S: ?Sized> {
    /// Date, time or timestamp column.
    Temporal(TemporalBinder),
    /// Column handled by the default conversions.
    Default(Box<dyn DefaultBinder<S>>),
}

impl<S: StatementCursor + ?Sized> ColumnBinder<S> {
    fn bind(&self, statement: &mut S, parameter: usize, row: usize) -> Result<()> {
        match self {
            ColumnBinder::Temporal(b) => b.bind(statement, parameter, row),
            ColumnBinder::Default(b) => b.bind(statement, parameter, row),
        }
    }

    /// The temporal binder, if this parameter is temporal.
    pub fn as_temporal(&self) -> Option<&TemporalBinder> {
        match self {
            ColumnBinder::Temporal(b) => Some(b),
            ColumnBinder::Default(_) => None,
        }
    }
}

struct BoundColumn<S: ?Sized> {
    array: ArrayRef,
    nullable: bool,
    binder: ColumnBinder<S>,
}

/// Binds the rows of one record batch, column `i` to parameter `i + 1`.
///
/// Null handling lives here rather than in the binders: a null in a nullable field is bound
/// with `set_null`, a null in a field declared non-nullable is `UnexpectedNull`.
pub struct ParameterBinder<S: ?Sized> {
    columns: Vec<BoundColumn<S>>,
    rows: usize,
}

impl<S: StatementCursor + ?Sized> ParameterBinder<S> {
    /// Pick a binder for every column of `batch`.
    ///
    /// # Errors
    /// Propagates `UnsupportedArrowType` from `defaults` for non-temporal columns.
    pub fn try_new(
        batch: &RecordBatch,
        zone: Option<&ZoneContext>,
        defaults: &dyn WriteDefaults<S>,
    ) -> Result<Self> {
        info!("binding {} statement parameters", batch.num_columns());
        let schema = batch.schema();
        let mut columns = Vec::with_capacity(batch.num_columns());
        for (index, (field, array)) in schema.fields().iter().zip(batch.columns()).enumerate() {
            let parameter = index + 1;
            let binder = match TemporalBinder::for_array(array.as_ref(), zone) {
                Some(binder) => {
                    debug!(
                        "parameter {parameter} ({}): {:?} binder for {}",
                        field.name(),
                        binder.kind(),
                        array.data_type()
                    );
                    ColumnBinder::Temporal(binder)
                }
                None => ColumnBinder::Default(defaults.binder(array, parameter)?),
            };
            columns.push(BoundColumn {
                array: array.clone(),
                nullable: field.is_nullable(),
                binder,
            });
        }
        Ok(Self {
            columns,
            rows: batch.num_rows(),
        })
    }

    /// Rows available for binding.
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// Binder of the 1-based `parameter`.
    pub fn binder(&self, parameter: usize) -> Option<&ColumnBinder<S>> {
        self.columns.get(parameter.checked_sub(1)?).map(|c| &c.binder)
    }

    /// Bind every parameter from `row`.
    ///
    /// # Errors
    /// `RowOutOfBounds` past the batch, `UnexpectedNull` for a null in a non-nullable field,
    /// and any binder or statement error.
    pub fn bind_row(&self, statement: &mut S, row: usize) -> Result<()> {
        if row >= self.rows {
            return Err(ConversionError::RowOutOfBounds {
                row,
                capacity: self.rows,
            });
        }
        for (index, column) in self.columns.iter().enumerate() {
            let parameter = index + 1;
            if column.array.is_null(row) {
                if !column.nullable {
                    return Err(ConversionError::UnexpectedNull { column: index, row });
                }
                statement.set_null(parameter, column.array.data_type())?;
                continue;
            }
            column.binder.bind(statement, parameter, row)?;
        }
        Ok(())
    }
}

/// Bind the rows of `batches` to `statement` and return how many were bound.
///
/// In [`BindMode::Batch`] every row is followed by `add_batch`. In [`BindMode::Single`] the
/// first row is bound and left for a single execution.
///
/// # Errors
/// `InvalidTimeZone` for the configured zone, then any error of [`ParameterBinder`].
pub fn bind_batches<S, I>(
    statement: &mut S,
    batches: I,
    config: &BindConfig,
    defaults: &dyn WriteDefaults<S>,
) -> Result<usize>
where
    S: StatementCursor + ?Sized,
    I: IntoIterator<Item = RecordBatch>,
{
    let zone = config.zone()?;
    let mut bound = 0;
    for batch in batches {
        let binder = ParameterBinder::try_new(&batch, zone.as_ref(), defaults)?;
        for row in 0..binder.num_rows() {
            binder.bind_row(statement, row)?;
            bound += 1;
            match config.mode {
                BindMode::Batch => statement.add_batch()?,
                BindMode::Single => return Ok(bound),
            }
        }
    }
    Ok(bound)
}
