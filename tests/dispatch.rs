mod common;

use std::sync::Arc;

use arrow_schema::{DataType, TimeUnit};
use common::{IntDefaults, MockSource};
use typed_arrow_sql::{
    ColumnConsumer, ConversionError, ExplicitTypes, NoDefaults, SourceField, SqlType,
    TemporalKind, ZoneContext, resolve_consumer, resolve_storage_type,
};

fn field(sql_type: SqlType) -> SourceField {
    SourceField::new("c", sql_type, true)
}

#[test]
fn temporal_storage_types() {
    let defaults = NoDefaults;
    let resolve = |sql_type| {
        resolve_storage_type::<MockSource>(0, &field(sql_type), None, &defaults).unwrap()
    };
    assert_eq!(resolve(SqlType::Date), DataType::Date32);
    assert_eq!(resolve(SqlType::Time), DataType::Time32(TimeUnit::Millisecond));
    assert_eq!(
        resolve(SqlType::Timestamp),
        DataType::Timestamp(TimeUnit::Microsecond, None)
    );
    assert_eq!(
        resolve(SqlType::TimestampWithTimezone),
        DataType::Timestamp(TimeUnit::Microsecond, Some(Arc::from("UTC")))
    );
}

#[test]
fn zone_aware_storage_uses_session_zone() {
    let berlin = ZoneContext::named("Europe/Berlin").unwrap();
    let dt = resolve_storage_type::<MockSource>(
        0,
        &field(SqlType::TimestampWithTimezone),
        Some(&berlin),
        &NoDefaults,
    )
    .unwrap();
    assert_eq!(
        dt,
        DataType::Timestamp(TimeUnit::Microsecond, Some(Arc::from("Europe/Berlin")))
    );
}

#[test]
fn non_temporal_types_go_to_defaults() {
    let err = resolve_storage_type::<MockSource>(3, &field(SqlType::Varchar), None, &NoDefaults)
        .unwrap_err();
    assert!(matches!(
        err,
        ConversionError::UnsupportedSqlType {
            column: 3,
            sql_type: SqlType::Varchar
        }
    ));
    let dt = resolve_storage_type::<MockSource>(0, &field(SqlType::Integer), None, &IntDefaults).unwrap();
    assert_eq!(dt, DataType::Int32);
}

#[test]
fn explicit_override_changes_the_resolved_type() {
    let overrides = ExplicitTypes::new().with(1, SqlType::TimestampWithTimezone);
    let declared = field(SqlType::Timestamp);
    let forced = overrides.apply(1, &declared);
    let untouched = overrides.apply(0, &declared);
    assert_eq!(forced.sql_type, SqlType::TimestampWithTimezone);
    assert_eq!(forced.name, declared.name);
    assert_eq!(untouched, declared);
}

#[test]
fn consumer_per_materialized_type() {
    let kind = |dt: DataType| {
        match resolve_consumer::<MockSource>(&dt, 0, true, 8, None, &NoDefaults).unwrap() {
            ColumnConsumer::Temporal(c) => c.kind(),
            ColumnConsumer::Default(_) => panic!("expected a temporal consumer for {dt}"),
        }
    };
    assert_eq!(kind(DataType::Date32), TemporalKind::Date);
    assert_eq!(kind(DataType::Time32(TimeUnit::Second)), TemporalKind::Time32);
    assert_eq!(kind(DataType::Time64(TimeUnit::Nanosecond)), TemporalKind::Time32);
    assert_eq!(
        kind(DataType::Timestamp(TimeUnit::Microsecond, None)),
        TemporalKind::Timestamp
    );
    assert_eq!(
        kind(DataType::Timestamp(
            TimeUnit::Microsecond,
            Some(Arc::from("Asia/Tokyo"))
        )),
        TemporalKind::TimestampTz
    );
}

#[test]
fn nullability_selects_the_variant() {
    let c = resolve_consumer::<MockSource>(&DataType::Date32, 0, false, 8, None, &NoDefaults)
        .unwrap();
    let temporal = c.as_temporal().unwrap();
    assert!(!temporal.is_nullable());
}

#[test]
fn tz_consumer_takes_its_zone_from_the_type() {
    let session = ZoneContext::named("Europe/Berlin").unwrap();
    let dt = DataType::Timestamp(TimeUnit::Microsecond, Some(Arc::from("Asia/Tokyo")));
    let c = resolve_consumer::<MockSource>(&dt, 0, true, 8, Some(&session), &NoDefaults).unwrap();
    assert_eq!(c.data_type(), dt);
}

#[test]
fn unsupported_materialized_type() {
    let err = resolve_consumer::<MockSource>(&DataType::Utf8, 2, true, 8, None, &NoDefaults)
        .err()
        .unwrap();
    assert!(matches!(
        err,
        ConversionError::UnsupportedArrowType { column: 2, .. }
    ));
    let c = resolve_consumer::<MockSource>(&DataType::Int32, 2, true, 8, None, &IntDefaults).unwrap();
    assert!(c.as_temporal().is_none());
    assert_eq!(c.data_type(), DataType::Int32);
}

#[test]
fn unknown_zone_in_type_is_rejected() {
    let dt = DataType::Timestamp(TimeUnit::Microsecond, Some(Arc::from("Nowhere/Atlantis")));
    let err = resolve_consumer::<MockSource>(&dt, 0, true, 8, None, &NoDefaults)
        .err()
        .unwrap();
    assert!(matches!(err, ConversionError::InvalidTimeZone { .. }));
}
