use crate::{Error, Result, Value, consume_while, truncate_long};
use atoi::FromRadix10SignedChecked;
use fast_float::parse_partial;
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use std::str::FromStr;
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset,
    format_description::well_known::Rfc3339, macros::format_description,
};
use uuid::Uuid;

/// Conversion between native Rust types and the dynamically typed [`Value`].
///
/// It is used in both directions by the marshaller: `as_value` when binding
/// field values as parameters, `try_from_value` when decoding a column into the
/// primitive kind declared by its descriptor.
///
/// # Parsing contract
/// - `parse` delegates to `extract` then verifies the slice is exhausted.
/// - `extract` must update the input slice only on success.
/// - Driver text without a declared type (`Value::Unknown`) is parsed.
///
/// # Examples
/// ```rust
/// use tabula_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert!(matches!(v, Value::Int32(Some(42))));
/// let n: i64 = AsValue::try_from_value(v).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    /// Null variant of the type, also used as a prototype.
    fn as_empty_value() -> Value;
    /// Owned [`Value`] representation.
    fn as_value(self) -> Value;
    /// Attempt to convert a dynamic [`Value`] into `Self`, widening numeric
    /// kinds with range checks where needed.
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
    /// Parse a full string into `Self`, fails when some input is left.
    fn parse(input: impl AsRef<str>) -> Result<Self>
    where
        Self: Sized,
    {
        let mut value = input.as_ref();
        let result = Self::extract(&mut value)?;
        if !value.is_empty() {
            log::debug!(
                "`{}` was not entirely consumed (remaining: `{}`)",
                truncate_long!(input.as_ref()),
                truncate_long!(value),
            );
            return Err(Error::conversion::<Self>(&input.as_ref()));
        }
        Ok(result)
    }
    /// Parse a prefix of the slice, advancing it on success.
    fn extract(value: &mut &str) -> Result<Self>
    where
        Self: Sized,
    {
        Err(Error::conversion::<Self>(&*value))
    }
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}

macro_rules! impl_as_value {
    ($source:ty, $destination:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                let error = || Error::conversion::<Self>(&value);
                match &value {
                    $destination(Some(v)) => Ok(*v),
                    #[allow(unreachable_patterns)]
                    Value::Int8(Some(v)) => <$source>::try_from(*v).map_err(|_| error()),
                    #[allow(unreachable_patterns)]
                    Value::Int16(Some(v)) => <$source>::try_from(*v).map_err(|_| error()),
                    #[allow(unreachable_patterns)]
                    Value::Int32(Some(v)) => <$source>::try_from(*v).map_err(|_| error()),
                    #[allow(unreachable_patterns)]
                    Value::Int64(Some(v)) => <$source>::try_from(*v).map_err(|_| error()),
                    #[allow(unreachable_patterns)]
                    Value::UInt8(Some(v)) => <$source>::try_from(*v).map_err(|_| error()),
                    #[allow(unreachable_patterns)]
                    Value::UInt16(Some(v)) => <$source>::try_from(*v).map_err(|_| error()),
                    #[allow(unreachable_patterns)]
                    Value::UInt32(Some(v)) => <$source>::try_from(*v).map_err(|_| error()),
                    #[allow(unreachable_patterns)]
                    Value::UInt64(Some(v)) => <$source>::try_from(*v).map_err(|_| error()),
                    Value::Decimal(Some(v), ..) if v.is_integer() => v
                        .to_i128()
                        .and_then(|v| <$source>::try_from(v).ok())
                        .ok_or_else(error),
                    Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => {
                        <Self as AsValue>::parse(v.trim())
                    }
                    _ => Err(error()),
                }
            }
            fn extract(input: &mut &str) -> Result<Self> {
                let (number, len) = <$source>::from_radix_10_signed_checked(input.as_bytes());
                match number {
                    Some(number) if len > 0 => {
                        *input = &input[len..];
                        Ok(number)
                    }
                    _ => Err(Error::conversion::<Self>(&*input)),
                }
            }
        }
    };
}
impl_as_value!(i8, Value::Int8);
impl_as_value!(i16, Value::Int16);
impl_as_value!(i32, Value::Int32);
impl_as_value!(i64, Value::Int64);
impl_as_value!(u8, Value::UInt8);
impl_as_value!(u16, Value::UInt16);
impl_as_value!(u32, Value::UInt32);
impl_as_value!(u64, Value::UInt64);

macro_rules! impl_as_value {
    ($source:ty, $destination:path, $to_primitive:ident) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                let error = || Error::conversion::<Self>(&value);
                match &value {
                    $destination(Some(v)) => Ok(*v),
                    #[allow(unreachable_patterns)]
                    Value::Float32(Some(v)) => Ok(*v as _),
                    #[allow(unreachable_patterns)]
                    Value::Float64(Some(v)) => Ok(*v as _),
                    Value::Int8(Some(v)) => Ok(*v as _),
                    Value::Int16(Some(v)) => Ok(*v as _),
                    Value::Int32(Some(v)) => Ok(*v as _),
                    Value::Int64(Some(v)) => Ok(*v as _),
                    Value::UInt8(Some(v)) => Ok(*v as _),
                    Value::UInt16(Some(v)) => Ok(*v as _),
                    Value::UInt32(Some(v)) => Ok(*v as _),
                    Value::UInt64(Some(v)) => Ok(*v as _),
                    Value::Decimal(Some(v), ..) => v.$to_primitive().ok_or_else(error),
                    Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => {
                        <Self as AsValue>::parse(v.trim())
                    }
                    _ => Err(error()),
                }
            }
            fn extract(input: &mut &str) -> Result<Self> {
                let (number, len) = parse_partial::<$source, _>(input.as_bytes())
                    .map_err(|_| Error::conversion::<Self>(&*input))?;
                *input = &input[len..];
                Ok(number)
            }
        }
    };
}
impl_as_value!(f32, Value::Float32, to_f32);
impl_as_value!(f64, Value::Float64, to_f64);

impl AsValue for bool {
    fn as_empty_value() -> Value {
        Value::Boolean(None)
    }
    fn as_value(self) -> Value {
        Value::Boolean(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Boolean(Some(v)) => Ok(*v),
            Value::Int8(Some(v)) => Ok(*v != 0),
            Value::Int16(Some(v)) => Ok(*v != 0),
            Value::Int32(Some(v)) => Ok(*v != 0),
            Value::Int64(Some(v)) => Ok(*v != 0),
            Value::UInt8(Some(v)) => Ok(*v != 0),
            Value::UInt16(Some(v)) => Ok(*v != 0),
            Value::UInt32(Some(v)) => Ok(*v != 0),
            Value::UInt64(Some(v)) => Ok(*v != 0),
            Value::Decimal(Some(v), ..) => Ok(!v.is_zero()),
            Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => <Self as AsValue>::parse(v.trim()),
            _ => Err(Error::conversion::<Self>(&value)),
        }
    }
    fn extract(input: &mut &str) -> Result<Self> {
        let mut value = *input;
        let result = match consume_while(&mut value, |v| v.is_alphanumeric() || *v == '_') {
            x if x.eq_ignore_ascii_case("true") || x.eq_ignore_ascii_case("t") || x == "1" => true,
            x if x.eq_ignore_ascii_case("false") || x.eq_ignore_ascii_case("f") || x == "0" => {
                false
            }
            _ => return Err(Error::conversion::<Self>(&*input)),
        };
        *input = value;
        Ok(result)
    }
}

impl AsValue for char {
    fn as_empty_value() -> Value {
        Value::Char(None)
    }
    fn as_value(self) -> Value {
        Value::Char(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Char(Some(v)) => Ok(*v),
            Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => <Self as AsValue>::parse(v),
            _ => Err(Error::conversion::<Self>(&value)),
        }
    }
    fn extract(input: &mut &str) -> Result<Self> {
        let mut chars = input.chars();
        let Some(c) = chars.next() else {
            return Err(Error::conversion::<Self>(&*input));
        };
        *input = chars.as_str();
        Ok(c)
    }
}

impl AsValue for String {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => Ok(v),
            Value::Char(Some(v)) => Ok(v.into()),
            Value::Uuid(Some(v)) => Ok(v.to_string()),
            Value::Blob(Some(ref v)) => String::from_utf8(v.to_vec())
                .map_err(|_| Error::conversion::<Self>(&value)),
            _ => Err(Error::conversion::<Self>(&value)),
        }
    }
    fn extract(input: &mut &str) -> Result<Self> {
        let result = (*input).to_owned();
        *input = "";
        Ok(result)
    }
}

impl AsValue for Box<[u8]> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(Some(v)) => Ok(v),
            Value::Varchar(Some(v)) => Ok(v.into_bytes().into_boxed_slice()),
            Value::Unknown(Some(ref v)) => <Self as AsValue>::parse(v),
            _ => Err(Error::conversion::<Self>(&value)),
        }
    }
    fn extract(input: &mut &str) -> Result<Self> {
        let mut value = *input;
        if value.len() >= 2 && value[..2].eq_ignore_ascii_case("\\x") {
            value = &value[2..];
        }
        let digits = consume_while(&mut value, char::is_ascii_hexdigit);
        let result = hex::decode(digits)
            .map(Vec::into_boxed_slice)
            .map_err(|_| Error::conversion::<Self>(&*input))?;
        *input = value;
        Ok(result)
    }
}

impl AsValue for Decimal {
    fn as_empty_value() -> Value {
        Value::Decimal(None, 0, 0)
    }
    fn as_value(self) -> Value {
        Value::Decimal(Some(self), 0, self.scale() as _)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let error = || Error::conversion::<Self>(&value);
        match &value {
            Value::Decimal(Some(v), ..) => Ok(*v),
            Value::Int8(Some(v)) => Ok(Decimal::from(*v)),
            Value::Int16(Some(v)) => Ok(Decimal::from(*v)),
            Value::Int32(Some(v)) => Ok(Decimal::from(*v)),
            Value::Int64(Some(v)) => Ok(Decimal::from(*v)),
            Value::UInt8(Some(v)) => Ok(Decimal::from(*v)),
            Value::UInt16(Some(v)) => Ok(Decimal::from(*v)),
            Value::UInt32(Some(v)) => Ok(Decimal::from(*v)),
            Value::UInt64(Some(v)) => Ok(Decimal::from(*v)),
            Value::Float32(Some(v)) => Decimal::from_f32(*v).ok_or_else(error),
            Value::Float64(Some(v)) => Decimal::from_f64(*v).ok_or_else(error),
            Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => <Self as AsValue>::parse(v.trim()),
            _ => Err(error()),
        }
    }
    fn extract(input: &mut &str) -> Result<Self> {
        let mut value = *input;
        let mut sign = true;
        let digits = consume_while(&mut value, |c| {
            let accept = c.is_ascii_digit() || *c == '.' || (sign && (*c == '-' || *c == '+'));
            sign = false;
            accept
        });
        let result =
            Decimal::from_str(digits).map_err(|_| Error::conversion::<Self>(&*input))?;
        *input = value;
        Ok(result)
    }
}

impl AsValue for Date {
    fn as_empty_value() -> Value {
        Value::Date(None)
    }
    fn as_value(self) -> Value {
        Value::Date(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Date(Some(v)) => Ok(*v),
            Value::Timestamp(Some(v)) => Ok(v.date()),
            Value::TimestampWithTimezone(Some(v)) => Ok(v.to_offset(UtcOffset::UTC).date()),
            Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => <Self as AsValue>::parse(v.trim()),
            _ => Err(Error::conversion::<Self>(&value)),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let input = input.as_ref();
        Date::parse(input, format_description!("[year]-[month]-[day]"))
            .or_else(|_| PrimitiveDateTime::parse_text(input).map(|v| v.date()))
            .map_err(|_| Error::conversion::<Self>(&input))
    }
}

impl AsValue for Time {
    fn as_empty_value() -> Value {
        Value::Time(None)
    }
    fn as_value(self) -> Value {
        Value::Time(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Time(Some(v)) => Ok(*v),
            Value::Timestamp(Some(v)) => Ok(v.time()),
            Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => <Self as AsValue>::parse(v.trim()),
            _ => Err(Error::conversion::<Self>(&value)),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let input = input.as_ref();
        Time::parse(
            input,
            format_description!("[hour]:[minute]:[second].[subsecond]"),
        )
        .or_else(|_| Time::parse(input, format_description!("[hour]:[minute]:[second]")))
        .or_else(|_| Time::parse(input, format_description!("[hour]:[minute]")))
        .map_err(|_| Error::conversion::<Self>(&input))
    }
}

trait ParseText: Sized {
    fn parse_text(input: &str) -> std::result::Result<Self, time::error::Parse>;
}

impl ParseText for PrimitiveDateTime {
    fn parse_text(input: &str) -> std::result::Result<Self, time::error::Parse> {
        PrimitiveDateTime::parse(
            input,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
        )
        .or_else(|_| {
            PrimitiveDateTime::parse(
                input,
                format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
            )
        })
        .or_else(|_| {
            PrimitiveDateTime::parse(
                input,
                format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
            )
        })
        .or_else(|_| {
            PrimitiveDateTime::parse(
                input,
                format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
            )
        })
        .or_else(|_| {
            PrimitiveDateTime::parse(
                input,
                format_description!("[year]-[month]-[day] [hour]:[minute]"),
            )
        })
    }
}

impl AsValue for PrimitiveDateTime {
    fn as_empty_value() -> Value {
        Value::Timestamp(None)
    }
    fn as_value(self) -> Value {
        Value::Timestamp(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Timestamp(Some(v)) => Ok(*v),
            Value::Date(Some(v)) => Ok(v.midnight()),
            Value::TimestampWithTimezone(Some(v)) => {
                let v = v.to_offset(UtcOffset::UTC);
                Ok(PrimitiveDateTime::new(v.date(), v.time()))
            }
            Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => <Self as AsValue>::parse(v.trim()),
            _ => Err(Error::conversion::<Self>(&value)),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let input = input.as_ref();
        PrimitiveDateTime::parse_text(input)
            .or_else(|_| {
                Date::parse(input, format_description!("[year]-[month]-[day]"))
                    .map(Date::midnight)
            })
            .map_err(|_| Error::conversion::<Self>(&input))
    }
}

impl AsValue for OffsetDateTime {
    fn as_empty_value() -> Value {
        Value::TimestampWithTimezone(None)
    }
    fn as_value(self) -> Value {
        Value::TimestampWithTimezone(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match &value {
            Value::TimestampWithTimezone(Some(v)) => Ok(*v),
            Value::Timestamp(Some(v)) => Ok(v.assume_utc()),
            Value::Date(Some(v)) => Ok(v.midnight().assume_utc()),
            Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => <Self as AsValue>::parse(v.trim()),
            _ => Err(Error::conversion::<Self>(&value)),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let input = input.as_ref();
        OffsetDateTime::parse(input, &Rfc3339)
            .or_else(|_| {
                OffsetDateTime::parse(
                    input,
                    format_description!(
                        "[year]-[month]-[day] [hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
                    ),
                )
            })
            .map_err(|_| Error::conversion::<Self>(&input))
            .or_else(|_| {
                <PrimitiveDateTime as AsValue>::parse(input).map(PrimitiveDateTime::assume_utc)
            })
    }
}

impl AsValue for Uuid {
    fn as_empty_value() -> Value {
        Value::Uuid(None)
    }
    fn as_value(self) -> Value {
        Value::Uuid(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Uuid(Some(v)) => Ok(*v),
            Value::Blob(Some(v)) => {
                Uuid::from_slice(v).map_err(|_| Error::conversion::<Self>(&value))
            }
            Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => <Self as AsValue>::parse(v.trim()),
            _ => Err(Error::conversion::<Self>(&value)),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let input = input.as_ref();
        Uuid::parse_str(input).map_err(|_| Error::conversion::<Self>(&input))
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Ok(if value.is_null() {
            None
        } else {
            Some(T::try_from_value(value)?)
        })
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let input = input.as_ref();
        if input.eq_ignore_ascii_case("null") {
            return Ok(None);
        }
        T::parse(input).map(Some)
    }
}

impl<T: AsValue> AsValue for Box<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        (*self).as_value()
    }
    fn try_from_value(value: Value) -> Result<Self> {
        T::try_from_value(value).map(Box::new)
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        T::parse(input).map(Box::new)
    }
}

impl<T: AsValue> AsValue for Vec<T> {
    fn as_empty_value() -> Value {
        Value::List(None, Box::new(T::as_empty_value()))
    }
    fn as_value(self) -> Value {
        Value::List(
            Some(self.into_iter().map(AsValue::as_value).collect()),
            Box::new(T::as_empty_value()),
        )
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::List(Some(v), ..) => v.into_iter().map(T::try_from_value).collect(),
            Value::List(None, ..) => Ok(Vec::new()),
            _ => Err(Error::conversion::<Self>(&value)),
        }
    }
}
