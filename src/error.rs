//! Error types for typed-arrow-sql.

use arrow_schema::{ArrowError, DataType};
use thiserror::Error;

use crate::sql_type::SqlType;

/// Boxed error used to carry driver-specific causes.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure reported by a row cursor or statement cursor.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SourceError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl SourceError {
    /// Create a source error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create a source error wrapping a driver error.
    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// The message reported by the cursor.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Error type for temporal conversions in either direction.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Extraction from or binding into the data source failed.
    #[error("source access failed: {0}")]
    Source(#[from] SourceError),
    /// A converted value does not fit the target integer width.
    #[error("{value} {unit} overflows {target}")]
    Overflow {
        /// The value (or operand) that overflowed.
        value: i64,
        /// Unit of `value`.
        unit: &'static str,
        /// Integer type or storage unit that could not hold the result.
        target: &'static str,
    },
    /// A decoded value is not a valid civil date or time.
    #[error("{what} out of range: {value}")]
    OutOfRange {
        /// What was being constructed.
        what: &'static str,
        /// The offending stored value.
        value: i64,
    },
    /// No consumer or binder exists for an Arrow type.
    #[error("unsupported arrow type {data_type} at column {column}")]
    UnsupportedArrowType {
        /// Zero-based column index.
        column: usize,
        /// The Arrow type without a conversion.
        data_type: DataType,
    },
    /// No Arrow type mapping exists for a declared SQL type.
    #[error("unsupported SQL type {sql_type} at column {column}")]
    UnsupportedSqlType {
        /// Zero-based column index.
        column: usize,
        /// The declared SQL type.
        sql_type: SqlType,
    },
    /// A null was found where the caller guaranteed none.
    #[error("unexpected null at column {column} row {row}")]
    UnexpectedNull {
        /// Zero-based column index.
        column: usize,
        /// Row index within the batch.
        row: usize,
    },
    /// A row index past the end of a fixed-width buffer.
    #[error("row {row} out of bounds (capacity {capacity})")]
    RowOutOfBounds {
        /// The requested row.
        row: usize,
        /// Number of rows the buffer holds.
        capacity: usize,
    },
    /// A time zone name could not be resolved.
    #[error("invalid time zone '{name}': {message}")]
    InvalidTimeZone {
        /// The name as configured.
        name: String,
        /// Resolver message.
        message: String,
    },
    /// Civil calendar arithmetic failed.
    #[error(transparent)]
    Calendar(#[from] jiff::Error),
    /// Arrow rejected an assembled array or batch.
    #[error(transparent)]
    Arrow(#[from] ArrowError),
}

impl ConversionError {
    /// Create an overflow error.
    pub fn overflow(value: i64, unit: &'static str, target: &'static str) -> Self {
        Self::Overflow {
            value,
            unit,
            target,
        }
    }

    /// Create an out-of-range error.
    pub fn out_of_range(what: &'static str, value: i64) -> Self {
        Self::OutOfRange { what, value }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = ConversionError> = std::result::Result<T, E>;
