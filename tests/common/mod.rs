#![allow(dead_code)]

use std::{collections::BTreeMap, sync::Arc};

use arrow_array::{ArrayRef, Int32Array, cast::AsArray, types::Int32Type};
use arrow_schema::DataType;
use jiff::{
    Timestamp,
    civil::{Date, DateTime, Time, date},
    tz::TimeZone,
};
use typed_arrow_sql::{
    ColumnBuffer, ConversionError, DefaultBinder, DefaultConsumer, LegacyTimestamp, ReadDefaults,
    Result, ResultSource, RowCursor, SourceError, SourceField, SqlType, StatementCursor,
    WriteDefaults,
};

/// A cell of the in-memory result.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Int(i32),
    Date(Date),
    Time(Time),
    DateTime(DateTime),
}

/// In-memory result set; structured extraction can be switched off to force the fallback.
#[derive(Debug)]
pub struct MockSource {
    fields: Vec<SourceField>,
    rows: Vec<Vec<Value>>,
    position: Option<usize>,
    last_null: bool,
    pub structured: bool,
    pub structured_calls: usize,
    pub legacy_calls: usize,
    pub legacy_zones: Vec<String>,
}

impl MockSource {
    pub fn new(fields: Vec<SourceField>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            fields,
            rows,
            position: None,
            last_null: false,
            structured: true,
            structured_calls: 0,
            legacy_calls: 0,
            legacy_zones: Vec::new(),
        }
    }

    /// A single-column source positioned on its first row.
    pub fn single(sql_type: SqlType, value: Value) -> Self {
        let mut source = Self::new(vec![SourceField::new("c0", sql_type, true)], vec![vec![value]]);
        source.position = Some(0);
        source
    }

    pub fn without_structured(mut self) -> Self {
        self.structured = false;
        self
    }

    pub fn seek(&mut self, row: usize) {
        self.position = Some(row);
    }

    fn cell(&mut self, column: usize) -> std::result::Result<Value, SourceError> {
        let row = self
            .position
            .ok_or_else(|| SourceError::new("cursor not positioned"))?;
        let value = self
            .rows
            .get(row)
            .and_then(|r| r.get(column))
            .cloned()
            .ok_or_else(|| SourceError::new(format!("no cell at row {row} column {column}")))?;
        self.last_null = value == Value::Null;
        Ok(value)
    }

    fn structured_cell(&mut self, column: usize) -> std::result::Result<Value, SourceError> {
        self.structured_calls += 1;
        if !self.structured {
            return Err(SourceError::new("structured temporal access not supported"));
        }
        self.cell(column)
    }

    fn legacy_cell(
        &mut self,
        column: usize,
        tz: &TimeZone,
    ) -> std::result::Result<Value, SourceError> {
        self.legacy_calls += 1;
        self.legacy_zones
            .push(tz.iana_name().unwrap_or("<fixed>").to_string());
        self.cell(column)
    }

    pub fn get_i32(&mut self, column: usize) -> std::result::Result<Option<i32>, SourceError> {
        match self.cell(column)? {
            Value::Null => Ok(None),
            Value::Int(v) => Ok(Some(v)),
            other => Err(mismatch("integer", &other)),
        }
    }
}

fn mismatch(expected: &str, found: &Value) -> SourceError {
    SourceError::new(format!("expected {expected}, found {found:?}"))
}

fn calendar(err: jiff::Error) -> SourceError {
    SourceError::with_source("calendar conversion failed", err)
}

impl RowCursor for MockSource {
    fn get_date(&mut self, column: usize) -> std::result::Result<Option<Date>, SourceError> {
        match self.structured_cell(column)? {
            Value::Null => Ok(None),
            Value::Date(d) => Ok(Some(d)),
            other => Err(mismatch("date", &other)),
        }
    }

    fn get_time(&mut self, column: usize) -> std::result::Result<Option<Time>, SourceError> {
        match self.structured_cell(column)? {
            Value::Null => Ok(None),
            Value::Time(t) => Ok(Some(t)),
            other => Err(mismatch("time", &other)),
        }
    }

    fn get_datetime(
        &mut self,
        column: usize,
    ) -> std::result::Result<Option<DateTime>, SourceError> {
        match self.structured_cell(column)? {
            Value::Null => Ok(None),
            Value::DateTime(dt) => Ok(Some(dt)),
            other => Err(mismatch("timestamp", &other)),
        }
    }

    fn get_legacy_date(
        &mut self,
        column: usize,
        tz: &TimeZone,
    ) -> std::result::Result<Option<i64>, SourceError> {
        match self.legacy_cell(column, tz)? {
            Value::Null => Ok(None),
            Value::Date(d) => {
                let zoned = d.to_zoned(tz.clone()).map_err(calendar)?;
                Ok(Some(zoned.timestamp().as_millisecond()))
            }
            other => Err(mismatch("date", &other)),
        }
    }

    fn get_legacy_time(
        &mut self,
        column: usize,
        tz: &TimeZone,
    ) -> std::result::Result<Option<i64>, SourceError> {
        match self.legacy_cell(column, tz)? {
            Value::Null => Ok(None),
            Value::Time(t) => {
                let zoned = date(1970, 1, 1)
                    .to_datetime(t)
                    .to_zoned(tz.clone())
                    .map_err(calendar)?;
                Ok(Some(zoned.timestamp().as_millisecond()))
            }
            other => Err(mismatch("time", &other)),
        }
    }

    fn get_legacy_timestamp(
        &mut self,
        column: usize,
        tz: &TimeZone,
    ) -> std::result::Result<Option<LegacyTimestamp>, SourceError> {
        match self.legacy_cell(column, tz)? {
            Value::Null => Ok(None),
            Value::DateTime(dt) => {
                let instant = dt.to_zoned(tz.clone()).map_err(calendar)?.timestamp();
                Ok(Some(LegacyTimestamp {
                    millis: instant.as_millisecond(),
                    nanos: dt.subsec_nanosecond() as u32,
                }))
            }
            other => Err(mismatch("timestamp", &other)),
        }
    }

    fn was_null(&self) -> bool {
        self.last_null
    }
}

impl ResultSource for MockSource {
    fn fields(&self) -> &[SourceField] {
        &self.fields
    }

    fn next_row(&mut self) -> std::result::Result<bool, SourceError> {
        let next = self.position.map_or(0, |p| p + 1);
        self.position = Some(next);
        Ok(next < self.rows.len())
    }
}

/// A parameter value recorded by [`MockStatement`].
#[derive(Clone, Debug, PartialEq)]
pub enum Bound {
    Int(i32),
    Date(Date, Option<String>),
    Time(Time, Option<String>),
    Timestamp(Timestamp, Option<String>),
    Null(DataType),
}

fn zone_name(zone: Option<&TimeZone>) -> Option<String> {
    zone.map(|tz| tz.iana_name().unwrap_or("<fixed>").to_string())
}

/// Records bound parameters; `batches` holds one entry per `add_batch`.
#[derive(Debug, Default)]
pub struct MockStatement {
    pub current: BTreeMap<usize, Bound>,
    pub batches: Vec<BTreeMap<usize, Bound>>,
}

impl MockStatement {
    pub fn set_i32(&mut self, parameter: usize, value: i32) {
        self.current.insert(parameter, Bound::Int(value));
    }
}

impl StatementCursor for MockStatement {
    fn set_date(
        &mut self,
        parameter: usize,
        value: Date,
        zone: Option<&TimeZone>,
    ) -> std::result::Result<(), SourceError> {
        self.current
            .insert(parameter, Bound::Date(value, zone_name(zone)));
        Ok(())
    }

    fn set_time(
        &mut self,
        parameter: usize,
        value: Time,
        zone: Option<&TimeZone>,
    ) -> std::result::Result<(), SourceError> {
        self.current
            .insert(parameter, Bound::Time(value, zone_name(zone)));
        Ok(())
    }

    fn set_timestamp(
        &mut self,
        parameter: usize,
        value: Timestamp,
        zone: Option<&TimeZone>,
    ) -> std::result::Result<(), SourceError> {
        self.current
            .insert(parameter, Bound::Timestamp(value, zone_name(zone)));
        Ok(())
    }

    fn set_null(
        &mut self,
        parameter: usize,
        data_type: &DataType,
    ) -> std::result::Result<(), SourceError> {
        self.current
            .insert(parameter, Bound::Null(data_type.clone()));
        Ok(())
    }

    fn add_batch(&mut self) -> std::result::Result<(), SourceError> {
        self.batches.push(std::mem::take(&mut self.current));
        Ok(())
    }
}

/// Defaults handling `INTEGER` columns, to exercise the non-temporal seams.
#[derive(Debug, Default)]
pub struct IntDefaults;

struct IntConsumer {
    buffer: ColumnBuffer<Int32Type>,
    column: usize,
    row: usize,
}

impl DefaultConsumer<MockSource> for IntConsumer {
    fn consume(&mut self, cursor: &mut MockSource) -> Result<()> {
        if let Some(v) = cursor.get_i32(self.column)? {
            self.buffer.set(self.row, v)?;
        }
        self.row += 1;
        Ok(())
    }

    fn data_type(&self) -> DataType {
        DataType::Int32
    }

    fn finish_batch(&mut self, next_capacity: usize) -> Result<ArrayRef> {
        let done = std::mem::replace(&mut self.buffer, ColumnBuffer::with_capacity(next_capacity));
        let rows = std::mem::take(&mut self.row);
        Ok(Arc::new(done.finish(rows)?))
    }
}

impl ReadDefaults<MockSource> for IntDefaults {
    fn arrow_type(&self, column: usize, field: &SourceField) -> Result<DataType> {
        match field.sql_type {
            SqlType::Integer => Ok(DataType::Int32),
            ref other => Err(ConversionError::UnsupportedSqlType {
                column,
                sql_type: other.clone(),
            }),
        }
    }

    fn consumer(
        &self,
        data_type: &DataType,
        column: usize,
        _nullable: bool,
        capacity: usize,
    ) -> Result<Box<dyn DefaultConsumer<MockSource>>> {
        match data_type {
            DataType::Int32 => Ok(Box::new(IntConsumer {
                buffer: ColumnBuffer::with_capacity(capacity),
                column,
                row: 0,
            })),
            other => Err(ConversionError::UnsupportedArrowType {
                column,
                data_type: other.clone(),
            }),
        }
    }
}

struct IntBinder {
    array: Int32Array,
}

impl DefaultBinder<MockStatement> for IntBinder {
    fn bind(&self, statement: &mut MockStatement, parameter: usize, row: usize) -> Result<()> {
        statement.set_i32(parameter, self.array.value(row));
        Ok(())
    }
}

impl WriteDefaults<MockStatement> for IntDefaults {
    fn binder(
        &self,
        array: &ArrayRef,
        parameter: usize,
    ) -> Result<Box<dyn DefaultBinder<MockStatement>>> {
        match array.data_type() {
            DataType::Int32 => Ok(Box::new(IntBinder {
                array: array.as_primitive::<Int32Type>().clone(),
            })),
            other => Err(ConversionError::UnsupportedArrowType {
                column: parameter - 1,
                data_type: other.clone(),
            }),
        }
    }
}

/// Epoch microseconds of a UTC wall-clock date-time.
pub fn utc_micros(dt: DateTime) -> i64 {
    dt.to_zoned(TimeZone::UTC).unwrap().timestamp().as_microsecond()
}
