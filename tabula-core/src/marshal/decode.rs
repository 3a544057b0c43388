use crate::{
    AsValue, ColumnDef, DriverValue, Encoding, Error, LargeObject, Result, StorageType, Value,
};
use anyhow::Context;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};
use uuid::Uuid;

/// Default decoding of a driver value into the kind declared by `column`.
pub fn decode_value(raw: DriverValue, column: &ColumnDef) -> Result<Value> {
    let value = match raw {
        DriverValue::Null(..) => Value::Null,
        DriverValue::Scalar(v) => v,
        DriverValue::CharacterStream(stream) => {
            Value::Varchar(Some(drain_text(stream, column.encoding, column.name)?))
        }
        DriverValue::BinaryStream(stream) => {
            if column.value.is_textual() {
                Value::Varchar(Some(drain_text(stream, column.encoding, column.name)?))
            } else {
                Value::Blob(Some(drain(stream, column.name)?.into_boxed_slice()))
            }
        }
    };
    if let Some(converter) = column.converter {
        if let Some(result) = converter(&value, column)? {
            return Ok(result);
        }
    }
    if value.is_null() {
        return Ok(column.value.to_prototype());
    }
    if column.storage == StorageType::LongDate {
        return decode_long_date(value, &column.value);
    }
    coerce(value, &column.value)
}

/// Decoding without a descriptor: streams become text or bytes, nulls keep their kind.
pub fn decode_untyped(raw: DriverValue, label: &str) -> Result<Value> {
    Ok(match raw {
        DriverValue::Null(v) => v.to_prototype(),
        DriverValue::Scalar(v) => v,
        DriverValue::CharacterStream(stream) => {
            Value::Varchar(Some(drain_text(stream, Encoding::Utf8, label)?))
        }
        DriverValue::BinaryStream(stream) => {
            Value::Blob(Some(drain(stream, label)?.into_boxed_slice()))
        }
    })
}

fn drain(stream: LargeObject, column: &str) -> Result<Vec<u8>> {
    stream.drain().map_err(|source| Error::Decode {
        column: column.to_string(),
        source,
    })
}

fn drain_text(stream: LargeObject, encoding: Encoding, column: &str) -> Result<String> {
    stream
        .drain()
        .and_then(|v| encoding.decode(&v))
        .with_context(|| format!("While reading a {} character stream", encoding.label()))
        .map_err(|source| Error::Decode {
            column: column.to_string(),
            source,
        })
}

/// Converts `value` to the kind of `prototype`.
pub fn coerce(value: Value, prototype: &Value) -> Result<Value> {
    if value.is_null() {
        return Ok(prototype.to_prototype());
    }
    Ok(match prototype {
        Value::Null | Value::Unknown(..) => value,
        Value::Boolean(..) => bool::try_from_value(value)?.as_value(),
        Value::Int8(..) => i8::try_from_value(value)?.as_value(),
        Value::Int16(..) => i16::try_from_value(value)?.as_value(),
        Value::Int32(..) => i32::try_from_value(value)?.as_value(),
        Value::Int64(..) => i64::try_from_value(value)?.as_value(),
        Value::UInt8(..) => u8::try_from_value(value)?.as_value(),
        Value::UInt16(..) => u16::try_from_value(value)?.as_value(),
        Value::UInt32(..) => u32::try_from_value(value)?.as_value(),
        Value::UInt64(..) => u64::try_from_value(value)?.as_value(),
        Value::Float32(..) => f32::try_from_value(value)?.as_value(),
        Value::Float64(..) => f64::try_from_value(value)?.as_value(),
        Value::Decimal(.., precision, scale) => {
            let decimal = Decimal::try_from_value(value)?;
            if (*precision, *scale) == (0, 0) {
                decimal.as_value()
            } else {
                Value::Decimal(
                    Some(decimal.round_dp(u32::from(*scale))),
                    *precision,
                    *scale,
                )
            }
        }
        Value::Char(..) => char::try_from_value(value)?.as_value(),
        Value::Varchar(..) => String::try_from_value(value)?.as_value(),
        Value::Blob(..) => Box::<[u8]>::try_from_value(value)?.as_value(),
        Value::Date(..) => Date::try_from_value(value)?.as_value(),
        Value::Time(..) => Time::try_from_value(value)?.as_value(),
        Value::Timestamp(..) => PrimitiveDateTime::try_from_value(value)?.as_value(),
        Value::TimestampWithTimezone(..) => OffsetDateTime::try_from_value(value)?.as_value(),
        Value::Uuid(..) => Uuid::try_from_value(value)?.as_value(),
        Value::List(.., element) => match value {
            Value::List(Some(values), ..) => Value::List(
                Some(
                    values
                        .into_iter()
                        .map(|v| coerce(v, element))
                        .collect::<Result<_>>()?,
                ),
                element.clone(),
            ),
            value => return Err(Error::conversion_to(&value, format!("{prototype:?}"))),
        },
    })
}

/// Rebuilds a temporal value stored as milliseconds since the Unix epoch.
fn decode_long_date(value: Value, prototype: &Value) -> Result<Value> {
    let millis = match &value {
        Value::Int8(..)
        | Value::Int16(..)
        | Value::Int32(..)
        | Value::Int64(..)
        | Value::UInt8(..)
        | Value::UInt16(..)
        | Value::UInt32(..)
        | Value::UInt64(..) => i64::try_from_value(value.clone())?,
        Value::Decimal(Some(v), ..) => v
            .trunc()
            .to_i64()
            .ok_or_else(|| Error::conversion::<i64>(&value))?,
        Value::Float32(Some(v)) => *v as i64,
        Value::Float64(Some(v)) => *v as i64,
        Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => {
            match <i64 as AsValue>::parse(v.trim()) {
                Ok(v) => v,
                Err(..) => return coerce(value, prototype),
            }
        }
        _ => return coerce(value, prototype),
    };
    if let Value::Time(..) = prototype {
        let millis = millis.rem_euclid(86_400_000);
        let time = Time::from_hms_milli(
            (millis / 3_600_000) as u8,
            (millis / 60_000 % 60) as u8,
            (millis / 1000 % 60) as u8,
            (millis % 1000) as u16,
        )
        .map_err(|_| Error::conversion::<Time>(&value))?;
        return Ok(Value::Time(Some(time)));
    }
    let instant = OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .map_err(|_| Error::conversion::<OffsetDateTime>(&value))?
        .to_offset(UtcOffset::UTC);
    match prototype {
        Value::Int64(..) | Value::Null => Ok(Value::Int64(Some(millis))),
        _ => coerce(Value::TimestampWithTimezone(Some(instant)), prototype),
    }
}
