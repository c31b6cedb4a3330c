mod common;

use std::sync::Arc;

use arrow_array::{
    Array,
    cast::AsArray,
    types::{Date32Type, Int32Type, Time32MillisecondType, TimestampMicrosecondType},
};
use arrow_schema::{DataType, TimeUnit};
use common::{IntDefaults, MockSource, Value};
use jiff::civil::{date, datetime, time};
use typed_arrow_sql::{
    BatchReader, ConversionError, NoDefaults, ReadConfig, SQL_TYPE_METADATA_KEY, SourceField,
    SqlType,
};

fn source(rows: usize) -> MockSource {
    let fields = vec![
        SourceField::new("id", SqlType::Integer, false),
        SourceField::new("day", SqlType::Date, true),
        SourceField::new("at", SqlType::Time, true),
        SourceField::new("created", SqlType::Timestamp, true),
    ];
    let rows = (0..rows)
        .map(|i| {
            let day = date(2024, 3, 1);
            vec![
                Value::Int(i as i32),
                if i % 2 == 0 {
                    Value::Date(day)
                } else {
                    Value::Null
                },
                Value::Time(time(0, 0, i as i8, 0)),
                Value::DateTime(day.at(10, 15, 30, 0)),
            ]
        })
        .collect();
    MockSource::new(fields, rows)
}

#[test]
fn reads_rows_in_batches() {
    let config = ReadConfig::new().with_batch_size(2);
    let reader = BatchReader::try_new(source(5), &config, &IntDefaults).unwrap();
    let batches = reader.collect::<Result<Vec<_>, _>>().unwrap();
    assert_eq!(
        batches.iter().map(|b| b.num_rows()).collect::<Vec<_>>(),
        vec![2, 2, 1]
    );

    let last = &batches[2];
    assert_eq!(last.column(0).as_primitive::<Int32Type>().value(0), 4);
    assert_eq!(last.column(1).as_primitive::<Date32Type>().value(0), 19_783);
    assert_eq!(
        last.column(2).as_primitive::<Time32MillisecondType>().value(0),
        4_000
    );
    assert_eq!(
        last.column(3)
            .as_primitive::<TimestampMicrosecondType>()
            .value(0),
        1_709_288_130_000_000
    );

    let first = &batches[0];
    assert!(first.column(1).is_valid(0));
    assert!(first.column(1).is_null(1));
}

#[test]
fn schema_carries_types_nullability_and_metadata() {
    let reader = BatchReader::try_new(source(0), &ReadConfig::default(), &IntDefaults).unwrap();
    let schema = reader.schema();
    assert_eq!(schema.field(0).data_type(), &DataType::Int32);
    assert!(!schema.field(0).is_nullable());
    assert_eq!(schema.field(1).data_type(), &DataType::Date32);
    assert_eq!(
        schema.field(2).data_type(),
        &DataType::Time32(TimeUnit::Millisecond)
    );
    assert_eq!(
        schema.field(3).metadata().get(SQL_TYPE_METADATA_KEY),
        Some(&"TIMESTAMP".to_string())
    );

    let bare = BatchReader::try_new(
        source(0),
        &ReadConfig::default().with_metadata(false),
        &IntDefaults,
    )
    .unwrap();
    assert!(bare.schema().field(3).metadata().is_empty());
}

#[test]
fn empty_result_yields_no_batches() {
    let mut reader =
        BatchReader::try_new(source(0), &ReadConfig::default(), &IntDefaults).unwrap();
    assert!(reader.next_batch().unwrap().is_none());
    assert!(reader.next().is_none());
}

#[test]
fn explicit_types_and_session_zone() {
    let fields = vec![SourceField::new("ts", SqlType::Timestamp, true)];
    let rows = vec![vec![Value::DateTime(datetime(2024, 3, 1, 10, 15, 30, 123_456_000))]];
    let config = ReadConfig::new()
        .with_time_zone("Asia/Tokyo")
        .with_explicit_type(0, SqlType::TimestampWithTimezone);
    let mut reader =
        BatchReader::try_new(MockSource::new(fields, rows).without_structured(), &config, &NoDefaults)
            .unwrap();
    assert_eq!(
        reader.schema().field(0).data_type(),
        &DataType::Timestamp(TimeUnit::Microsecond, Some(Arc::from("Asia/Tokyo")))
    );
    let batch = reader.next_batch().unwrap().unwrap();
    assert_eq!(
        batch
            .column(0)
            .as_primitive::<TimestampMicrosecondType>()
            .value(0),
        1_709_255_730_123_456
    );
    assert!(reader.session().latch().is_legacy());
    assert_eq!(reader.into_inner().legacy_zones, vec!["Asia/Tokyo".to_string()]);
}

#[test]
fn dates_are_zone_agnostic_after_fallback() {
    let fields = vec![SourceField::new("day", SqlType::Date, true)];
    let rows = vec![
        vec![Value::Date(date(1970, 1, 2))],
        vec![Value::Date(date(2024, 3, 1))],
        vec![Value::Date(date(1969, 12, 31))],
    ];
    let config = ReadConfig::new().with_time_zone("Asia/Tokyo");
    let mut reader =
        BatchReader::try_new(MockSource::new(fields, rows).without_structured(), &config, &NoDefaults)
            .unwrap();
    let batch = reader.next_batch().unwrap().unwrap();
    let days = batch.column(0).as_primitive::<Date32Type>();
    assert_eq!(days.values().to_vec(), vec![1, 19_783, -1]);
    assert!(reader.session().latch().is_legacy());
    assert_eq!(reader.into_inner().legacy_zones.len(), 3);
}

#[test]
fn fallback_applies_to_every_column_of_the_read() {
    let config = ReadConfig::new().with_batch_size(16);
    let mut reader =
        BatchReader::try_new(source(3).without_structured(), &config, &IntDefaults).unwrap();
    let batch = reader.next_batch().unwrap().unwrap();
    assert_eq!(batch.num_rows(), 3);
    assert!(reader.session().latch().is_legacy());
    assert_eq!(batch.column(1).as_primitive::<Date32Type>().value(0), 19_783);
    let src = reader.into_inner();
    assert_eq!(src.structured_calls, 1);
    // Three temporal columns per row, all via the fallback.
    assert_eq!(src.legacy_calls, 9);
}

#[test]
fn unsupported_column_fails_construction() {
    let fields = vec![SourceField::new("name", SqlType::Varchar, true)];
    let err = BatchReader::try_new(MockSource::new(fields, vec![]), &ReadConfig::default(), &IntDefaults)
        .err()
        .unwrap();
    assert!(matches!(err, ConversionError::UnsupportedSqlType { column: 0, .. }));
}

#[test]
fn invalid_zone_fails_construction() {
    let config = ReadConfig::new().with_time_zone("Not/AZone");
    let err = BatchReader::try_new(source(1), &config, &IntDefaults)
        .err()
        .unwrap();
    assert!(matches!(err, ConversionError::InvalidTimeZone { .. }));
}
