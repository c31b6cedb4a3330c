//! Type-mapping policy: declared source type → Arrow storage type.

use std::collections::BTreeMap;

use arrow_schema::{DataType, TimeUnit};

use crate::{
    defaults::ReadDefaults,
    error::Result,
    sql_type::{SourceField, SqlType},
    zone::ZoneContext,
};

/// Forced source types by zero-based column index.
///
/// Consulted once per result shape, before any row is read; columns without an entry keep
/// the type the source declares.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExplicitTypes {
    by_column: BTreeMap<usize, SqlType>,
}

impl ExplicitTypes {
    /// No overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Force `column` to `sql_type`, returning the previous override.
    pub fn insert(&mut self, column: usize, sql_type: SqlType) -> Option<SqlType> {
        self.by_column.insert(column, sql_type)
    }

    /// Builder-style [`ExplicitTypes::insert`].
    #[must_use]
    pub fn with(mut self, column: usize, sql_type: SqlType) -> Self {
        self.insert(column, sql_type);
        self
    }

    /// Override for `column`, if any.
    pub fn get(&self, column: usize) -> Option<&SqlType> {
        self.by_column.get(&column)
    }

    /// Whether no override is set.
    pub fn is_empty(&self) -> bool {
        self.by_column.is_empty()
    }

    /// The field as it should be converted: `field` with its type replaced by the override.
    pub fn apply(&self, column: usize, field: &SourceField) -> SourceField {
        match self.get(column) {
            Some(sql_type) => SourceField {
                sql_type: sql_type.clone(),
                ..field.clone()
            },
            None => field.clone(),
        }
    }
}

impl From<BTreeMap<usize, SqlType>> for ExplicitTypes {
    fn from(by_column: BTreeMap<usize, SqlType>) -> Self {
        Self { by_column }
    }
}

/// Arrow type to materialize for a source column.
///
/// - `TIMESTAMP WITH TIME ZONE` → `Timestamp(Microsecond, zone)`, where the zone is the
///   session zone or `UTC`.
/// - `TIMESTAMP` → `Timestamp(Microsecond, None)`.
/// - `DATE` → `Date32`; `TIME` → `Time32(Millisecond)`.
/// - anything else → `defaults`.
///
/// # Errors
/// Propagates errors of the default mapping.
pub fn resolve_storage_type<C: ?Sized>(
    column: usize,
    field: &SourceField,
    zone: Option<&ZoneContext>,
    defaults: &dyn ReadDefaults<C>,
) -> Result<DataType> {
    match field.sql_type {
        SqlType::TimestampWithTimezone => Ok(DataType::Timestamp(
            TimeUnit::Microsecond,
            Some(ZoneContext::or_utc(zone).arrow_name()),
        )),
        SqlType::Timestamp => Ok(DataType::Timestamp(TimeUnit::Microsecond, None)),
        SqlType::Date => Ok(DataType::Date32),
        SqlType::Time => Ok(DataType::Time32(TimeUnit::Millisecond)),
        _ => defaults.arrow_type(column, field),
    }
}
