//! Batch reader: drives consumers over a result source and yields record batches.

use std::{collections::HashMap, sync::Arc};

use arrow_array::{RecordBatch, RecordBatchOptions};
use arrow_schema::{Field, Schema, SchemaRef};
use log::debug;

use crate::{
    config::ReadConfig,
    cursor::ResultSource,
    defaults::ReadDefaults,
    dispatch::{ColumnConsumer, resolve_consumer},
    error::Result,
    policy::resolve_storage_type,
    session::ReadSession,
};

/// Field metadata key holding the declared SQL type.
pub const SQL_TYPE_METADATA_KEY: &str = "sql_type";

/// Reads a [`ResultSource`] into record batches of at most `batch_size` rows.
///
/// Column types and consumers are decided once, when the reader is created. All columns
/// share the reader's [`ReadSession`], so a fallback triggered by one column applies to the
/// others for the rest of the read.
pub struct BatchReader<R: ResultSource> {
    source: R,
    session: ReadSession,
    schema: SchemaRef,
    consumers: Vec<ColumnConsumer<R>>,
    batch_size: usize,
    done: bool,
}

impl<R: ResultSource> BatchReader<R> {
    /// Resolve every column of `source`.
    ///
    /// # Errors
    /// `InvalidTimeZone` for the configured zone, or an unsupported-type error for a column
    /// neither the temporal conversions nor `defaults` handle.
    pub fn try_new(source: R, config: &ReadConfig, defaults: &dyn ReadDefaults<R>) -> Result<Self> {
        let session = ReadSession::new(config)?;
        let overrides = config.explicit_types();
        let batch_size = config.batch_size.max(1);

        let mut fields = Vec::with_capacity(source.fields().len());
        let mut consumers = Vec::with_capacity(source.fields().len());
        for (column, declared) in source.fields().iter().enumerate() {
            let field = overrides.apply(column, declared);
            let data_type = resolve_storage_type(column, &field, session.zone(), defaults)?;
            let consumer = resolve_consumer(
                &data_type,
                column,
                field.nullable,
                batch_size,
                session.zone(),
                defaults,
            )?;
            debug!(
                "column {column} ({}): {} read as {} by the {} conversion",
                field.name,
                field.sql_type,
                consumer.data_type(),
                if field.sql_type.is_temporal() { "temporal" } else { "default" }
            );
            let mut arrow_field = Field::new(&field.name, consumer.data_type(), field.nullable);
            if config.include_metadata {
                arrow_field = arrow_field.with_metadata(HashMap::from([(
                    SQL_TYPE_METADATA_KEY.to_string(),
                    field.sql_type.to_string(),
                )]));
            }
            fields.push(arrow_field);
            consumers.push(consumer);
        }

        Ok(Self {
            source,
            session,
            schema: Arc::new(Schema::new(fields)),
            consumers,
            batch_size,
            done: false,
        })
    }

    /// Schema of the produced batches.
    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    /// The read session.
    pub fn session(&self) -> &ReadSession {
        &self.session
    }

    /// Column consumers, in column order.
    pub fn consumers(&self) -> &[ColumnConsumer<R>] {
        &self.consumers
    }

    /// Read up to `batch_size` rows; `None` once the source is exhausted.
    ///
    /// # Errors
    /// Any source, conversion or Arrow assembly error. The reader stops after an error.
    pub fn next_batch(&mut self) -> Result<Option<RecordBatch>> {
        if self.done {
            return Ok(None);
        }
        let result = self.read_batch();
        if result.is_err() {
            self.done = true;
        }
        result
    }

    fn read_batch(&mut self) -> Result<Option<RecordBatch>> {
        let mut rows = 0;
        while rows < self.batch_size {
            if !self.source.next_row()? {
                self.done = true;
                break;
            }
            for consumer in &mut self.consumers {
                consumer.consume(&mut self.source, self.session.latch())?;
            }
            rows += 1;
        }
        if rows == 0 {
            return Ok(None);
        }
        let columns = self
            .consumers
            .iter_mut()
            .map(|c| c.finish_batch(self.batch_size))
            .collect::<Result<Vec<_>>>()?;
        let options = RecordBatchOptions::new().with_row_count(Some(rows));
        let batch = RecordBatch::try_new_with_options(self.schema.clone(), columns, &options)?;
        debug!("read batch of {rows} rows");
        Ok(Some(batch))
    }

    /// Give back the source.
    pub fn into_inner(self) -> R {
        self.source
    }
}

impl<R: ResultSource> Iterator for BatchReader<R> {
    type Item = Result<RecordBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_batch().transpose()
    }
}
