#![deny(missing_docs)]
//! typed-arrow-sql: temporal conversions between SQL row cursors and Arrow columns.
//!
//! The read path resolves every result column to an Arrow storage type once
//! ([`resolve_storage_type`], [`resolve_consumer`]) and then fills pre-sized
//! [`ColumnBuffer`]s row by row through temporal consumers. The write path walks Arrow
//! arrays row by row and binds each stored unit as a statement parameter.
//!
//! Storage units:
//! - dates: `Date32` days since the epoch
//! - times: `Time32(Millisecond)` on read; any `Time32`/`Time64` unit on write
//! - timestamps: `Timestamp(Microsecond, tz)`, `tz` set for `TIMESTAMP WITH TIME ZONE`
//!
//! Data sources are reached through the [`RowCursor`], [`ResultSource`] and
//! [`StatementCursor`] traits. Non-temporal columns go to the [`ReadDefaults`] and
//! [`WriteDefaults`] collaborators.

pub mod binder;
pub mod buffer;
pub mod config;
pub mod consumer;
pub mod cursor;
pub mod defaults;
pub mod dispatch;
pub mod error;
pub mod kind;
pub mod parse;
pub mod policy;
pub mod reader;
pub mod session;
pub mod sql_type;
pub mod zone;

/// Prelude exporting the most common types and traits.
pub mod prelude {
    pub use crate::{
        binder::{ParameterBinder, bind_batches},
        config::{BindConfig, BindMode, ReadConfig},
        cursor::{LegacyTimestamp, ResultSource, RowCursor, StatementCursor},
        defaults::{NoDefaults, ReadDefaults, WriteDefaults},
        error::{ConversionError, Result, SourceError},
        reader::BatchReader,
        sql_type::{SourceField, SqlType},
        zone::ZoneContext,
    };
}

// Re-export the Arrow and calendar crates used in the public API.
pub use arrow_array;
pub use arrow_buffer;
pub use arrow_schema;
pub use jiff;

pub use crate::{
    binder::{
        ColumnBinder, DateDayBinder, DateMilliBinder, ParameterBinder, TemporalBinder,
        Time32Binder, Time64Binder, TimestampBinder, bind_batches,
    },
    buffer::{ColumnBuffer, read_fixed},
    config::{BindConfig, BindMode, DEFAULT_BATCH_SIZE, ReadConfig},
    consumer::{
        DateConsumer, NonNullable, NullMode, Nullable, TemporalConsumer, TimeConsumer,
        TimestampConsumer, TimestampTzConsumer,
    },
    cursor::{LegacyTimestamp, ResultSource, RowCursor, StatementCursor},
    defaults::{DefaultBinder, DefaultConsumer, NoDefaults, ReadDefaults, WriteDefaults},
    dispatch::{ColumnConsumer, resolve_consumer},
    error::{ConversionError, Result, SourceError},
    kind::{MILLIS_PER_DAY, MillisScale, TemporalKind},
    parse::{FallbackLatch, parse_date, parse_time, parse_timestamp},
    policy::{ExplicitTypes, resolve_storage_type},
    reader::{BatchReader, SQL_TYPE_METADATA_KEY},
    session::ReadSession,
    sql_type::{SourceField, SqlType},
    zone::ZoneContext,
};
