use crate::{
    AsValue, DriverValue, Error, LargeObject, Pair, Result, SqlWriter, StorageType, Value,
};
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use time::{OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

/// Default binding of a parameter.
///
/// Dispatches on the kind of the value first, then on the storage type of the
/// column: temporal values follow the storage (epoch milliseconds, calendar
/// date time or UTC instant), large object storages get a stream, floating
/// and decimal values are rounded to the declared scale. Absent values become
/// a null typed after the storage.
pub fn bind_pair(writer: &dyn SqlWriter, pair: &Pair) -> Result<DriverValue> {
    let Pair {
        value,
        storage,
        kind,
        scale,
        encoding,
    } = pair;
    if value.is_null() {
        return Ok(DriverValue::Null(null_kind(*storage, kind, value)));
    }
    let temporal_text = value.is_textual() && kind.is_temporal();
    if value.is_temporal() || temporal_text {
        return bind_temporal(value, *storage, kind);
    }
    if storage.is_large_object() {
        let bytes = match value {
            Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => encoding.encode(v)?,
            Value::Char(Some(v)) => encoding.encode(v.encode_utf8(&mut [0; 4]))?,
            Value::Blob(Some(v)) => v.to_vec(),
            _ => return Err(Error::conversion_to(value, format!("{storage:?}"))),
        };
        let stream = LargeObject::from_bytes(bytes);
        return Ok(match storage {
            StorageType::LargeCharacter => DriverValue::CharacterStream(stream),
            _ => DriverValue::BinaryStream(stream),
        });
    }
    match value {
        Value::Float32(..) | Value::Float64(..) => writer.bind_float(value, *scale),
        Value::Decimal(Some(v), precision, declared) => {
            let scale = scale.unwrap_or(*declared);
            Ok(DriverValue::Scalar(Value::Decimal(
                Some(round_decimal(*v, scale)),
                *precision,
                scale,
            )))
        }
        _ => Ok(DriverValue::Scalar(value.clone())),
    }
}

fn null_kind(storage: StorageType, kind: &Value, value: &Value) -> Value {
    match storage {
        StorageType::LongDate => Value::Int64(None),
        StorageType::DateTime => Value::Timestamp(None),
        StorageType::Timestamp => Value::TimestampWithTimezone(None),
        StorageType::LargeCharacter => Value::Varchar(None),
        StorageType::LargeBinary | StorageType::LargeObjectBinary => Value::Blob(None),
        StorageType::Plain => match kind {
            Value::Null => value.to_prototype(),
            kind => kind.to_prototype(),
        },
    }
}

fn bind_temporal(value: &Value, storage: StorageType, kind: &Value) -> Result<DriverValue> {
    // Text is parsed into the kind of the column first
    let value = if value.is_textual() {
        let text = match value {
            Value::Char(Some(v)) => v.to_string(),
            v => v.as_str().unwrap_or_default().to_string(),
        };
        let error = || Error::conversion_to(&text, format!("{kind:?}"));
        match kind {
            Value::Date(..) => {
                <time::Date as AsValue>::parse(text.trim()).map_err(|_| error())?.as_value()
            }
            Value::Time(..) => <Time as AsValue>::parse(text.trim())
                .map_err(|_| error())?
                .as_value(),
            Value::Timestamp(..) => <PrimitiveDateTime as AsValue>::parse(text.trim())
                .map_err(|_| error())?
                .as_value(),
            _ => <OffsetDateTime as AsValue>::parse(text.trim())
                .map_err(|_| error())?
                .as_value(),
        }
    } else {
        value.clone()
    };
    if let Value::Time(Some(time)) = value {
        return match storage {
            StorageType::Plain => Ok(DriverValue::Scalar(value)),
            StorageType::LongDate => {
                let (h, m, s, ms) = time.as_hms_milli();
                Ok(DriverValue::Scalar(Value::Int64(Some(
                    ((i64::from(h) * 60 + i64::from(m)) * 60 + i64::from(s)) * 1000
                        + i64::from(ms),
                ))))
            }
            _ => Err(Error::conversion_to(&value, format!("{storage:?}"))),
        };
    }
    let instant = match &value {
        Value::Date(Some(v)) => v.midnight().assume_utc(),
        Value::Timestamp(Some(v)) => v.assume_utc(),
        Value::TimestampWithTimezone(Some(v)) => v.to_offset(UtcOffset::UTC),
        _ => return Err(Error::conversion_to(&value, format!("{storage:?}"))),
    };
    Ok(DriverValue::Scalar(match storage {
        StorageType::LongDate => {
            let millis = instant.unix_timestamp_nanos() / 1_000_000;
            Value::Int64(Some(
                i64::try_from(millis).map_err(|_| Error::conversion::<i64>(&millis))?,
            ))
        }
        StorageType::DateTime => {
            Value::Timestamp(Some(PrimitiveDateTime::new(instant.date(), instant.time())))
        }
        StorageType::Timestamp => Value::TimestampWithTimezone(Some(instant)),
        _ => value,
    }))
}

pub fn round_decimal(value: Decimal, scale: u8) -> Decimal {
    value.round_dp(u32::from(scale))
}

/// Float rounded to `scale` decimal digits, unchanged when not representable.
pub fn round_float(value: f64, scale: u8) -> f64 {
    Decimal::from_f64(value)
        .map(|v| round_decimal(v, scale))
        .and_then(|v| v.to_f64())
        .unwrap_or(value)
}

/// Decimal of a floating value, rounded to `scale` when present.
pub fn float_to_decimal(value: &Value, scale: Option<u8>) -> Result<Decimal> {
    let decimal = match value {
        Value::Float32(Some(v)) => Decimal::from_f32(*v),
        Value::Float64(Some(v)) => Decimal::from_f64(*v),
        _ => None,
    }
    .ok_or_else(|| Error::conversion::<Decimal>(value))?;
    Ok(match scale {
        Some(scale) => round_decimal(decimal, scale),
        None => decimal,
    })
}
