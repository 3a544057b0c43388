use rust_decimal::Decimal;
use std::str::FromStr;
use tabula::{
    ColumnDef, DriverValue, Encoding, Pair, RawRow, SqlWriter, StorageType, Value,
};
use time::macros::{date, datetime, time};
use uuid::Uuid;

fn column(value: Value, storage: StorageType) -> ColumnDef {
    ColumnDef {
        field: "field",
        name: "COLUMN",
        storage,
        value: value.to_prototype(),
        nullable: true,
        ..Default::default()
    }
}

fn round_trip<W: SqlWriter>(writer: &W, value: Value, column: &ColumnDef) -> Value {
    let bound = writer
        .bind(&Pair::with_column(value.clone(), column))
        .unwrap_or_else(|e| panic!("Could not bind {value:?}: {e:#}"));
    writer
        .decode(bound, column)
        .unwrap_or_else(|e| panic!("Could not decode {value:?}: {e:#}"))
}

pub fn marshal<W: SqlWriter>(writer: &W) {
    // Every primitive kind
    let values = vec![
        Value::Boolean(Some(true)),
        Value::Int8(Some(-8)),
        Value::Int16(Some(1_600)),
        Value::Int32(Some(-320_000)),
        Value::Int64(Some(6_400_000_000)),
        Value::UInt8(Some(8)),
        Value::UInt16(Some(16_000)),
        Value::UInt32(Some(3_200_000_000)),
        Value::UInt64(Some(64_000_000_000)),
        Value::Float32(Some(0.5)),
        Value::Float64(Some(-1.25)),
        Value::Decimal(Some(Decimal::new(12345, 2)), 10, 2),
        Value::Char(Some('t')),
        Value::Varchar(Some("tabula".into())),
        Value::Blob(Some(vec![0, 1, 254, 255].into_boxed_slice())),
        Value::Date(Some(date!(2024 - 03 - 15))),
        Value::Time(Some(time!(10:30:15.5))),
        Value::Timestamp(Some(datetime!(2024-03-15 10:30:15.125))),
        Value::TimestampWithTimezone(Some(datetime!(2024-03-15 10:30 UTC))),
        Value::Uuid(Some(
            Uuid::from_str("67e55044-10b1-426f-9247-bb680e5fe0c8").expect("Valid uuid"),
        )),
        Value::List(
            Some(vec![Value::Int32(Some(1)), Value::Int32(Some(2))]),
            Box::new(Value::Int32(None)),
        ),
        Value::Float64(Some(f64::INFINITY)),
    ];
    for value in values {
        let column = column(value.clone(), StorageType::Plain);
        assert_eq!(round_trip(writer, value.clone(), &column), value);
        let null = value.to_prototype();
        assert_eq!(round_trip(writer, null.clone(), &column), null);
    }

    // Declared storage
    for (value, storage) in [
        (Value::Date(Some(date!(2024 - 03 - 15))), StorageType::LongDate),
        (
            Value::Timestamp(Some(datetime!(2024-03-15 10:30:15.125))),
            StorageType::LongDate,
        ),
        (Value::Time(Some(time!(1:00:00.5))), StorageType::LongDate),
        (
            Value::TimestampWithTimezone(Some(datetime!(2024-03-15 12:30 +02:00))),
            StorageType::DateTime,
        ),
        (
            Value::Timestamp(Some(datetime!(2024-03-15 10:30))),
            StorageType::Timestamp,
        ),
        (
            Value::Varchar(Some("Große Straße".into())),
            StorageType::LargeCharacter,
        ),
        (
            Value::Varchar(Some("binary text".into())),
            StorageType::LargeObjectBinary,
        ),
        (
            Value::Blob(Some(vec![7; 4096].into_boxed_slice())),
            StorageType::LargeBinary,
        ),
    ] {
        let column = column(value.clone(), storage);
        assert_eq!(round_trip(writer, value.clone(), &column), value);
    }
    let lob = ColumnDef {
        encoding: Encoding::Utf16Be,
        ..column(Value::Varchar(None), StorageType::LargeCharacter)
    };
    let text = Value::Varchar(Some("ünïcödé".into()));
    let bound = writer
        .bind(&Pair::with_column(text.clone(), &lob))
        .expect("Could not bind the character stream");
    assert!(matches!(&bound, DriverValue::CharacterStream(v) if v.len() == 14));
    assert_eq!(writer.decode(bound, &lob).expect("Could not decode"), text);

    // Floats without a declared scale are kept as they are
    let double = column(Value::Float64(None), StorageType::Plain);
    for value in [0.1 + 0.2, 1e-30, 1e30, 123456789.123456789] {
        let value = Value::Float64(Some(value));
        assert_eq!(round_trip(writer, value.clone(), &double), value);
    }

    // Scale
    let scaled = ColumnDef {
        scale: Some(2),
        ..column(Value::Float64(None), StorageType::Plain)
    };
    assert_eq!(
        round_trip(writer, Value::Float64(Some(2.345678)), &scaled),
        Value::Float64(Some(2.35))
    );

    // Loose rows
    let row = writer
        .hydrate_map(RawRow::from_values(
            ["FIRST_NAME", "rn_"],
            [Value::Unknown(Some("Ada".into())), Value::Int64(Some(1))],
        ))
        .expect("Could not hydrate the map");
    for key in ["FIRST_NAME", "firstName", "first_name"] {
        assert_eq!(
            row.get(key),
            Some(&Value::Unknown(Some("Ada".into()))),
            "{key}"
        );
    }
    assert!(!row.contains_key("rn_"));
    let scalar = writer
        .hydrate_scalar(RawRow::from_values(["COUNT(*)"], [Value::Int64(Some(42))]))
        .expect("Could not hydrate the scalar");
    assert_eq!(scalar, Value::Int64(Some(42)));
}
