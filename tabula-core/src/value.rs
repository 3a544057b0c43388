use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use rust_decimal::Decimal;
use std::mem::discriminant;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Dynamically typed value.
///
/// Every variant wraps an `Option`: `None` is a typed null. A value holding
/// `None` is also used as a prototype describing the primitive kind of a
/// column (see [`ColumnDef::value`](crate::ColumnDef)).
#[derive(Default, Debug, Clone)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int8(Option<i8>),
    Int16(Option<i16>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    UInt8(Option<u8>),
    UInt16(Option<u16>),
    UInt32(Option<u32>),
    UInt64(Option<u64>),
    Float32(Option<f32>),
    Float64(Option<f64>),
    Decimal(Option<Decimal>, /* prec: */ u8, /* scale: */ u8),
    Char(Option<char>),
    Varchar(Option<String>),
    Blob(Option<Box<[u8]>>),
    Date(Option<Date>),
    Time(Option<Time>),
    Timestamp(Option<PrimitiveDateTime>),
    TimestampWithTimezone(Option<OffsetDateTime>),
    Uuid(Option<Uuid>),
    List(Option<Vec<Value>>, /* type: */ Box<Value>),
    /// Text returned by a driver that did not report a type.
    Unknown(Option<String>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Boolean(l), Self::Boolean(r)) => l == r,
            (Self::Int8(l), Self::Int8(r)) => l == r,
            (Self::Int16(l), Self::Int16(r)) => l == r,
            (Self::Int32(l), Self::Int32(r)) => l == r,
            (Self::Int64(l), Self::Int64(r)) => l == r,
            (Self::UInt8(l), Self::UInt8(r)) => l == r,
            (Self::UInt16(l), Self::UInt16(r)) => l == r,
            (Self::UInt32(l), Self::UInt32(r)) => l == r,
            (Self::UInt64(l), Self::UInt64(r)) => l == r,
            (Self::Float32(l), Self::Float32(r)) => l == r,
            (Self::Float64(l), Self::Float64(r)) => l == r,
            (Self::Decimal(l, l_prec, l_scale), Self::Decimal(r, r_prec, r_scale)) => {
                l == r && l_prec == r_prec && l_scale == r_scale
            }
            (Self::Char(l), Self::Char(r)) => l == r,
            (Self::Varchar(l), Self::Varchar(r)) => l == r,
            (Self::Blob(l), Self::Blob(r)) => l == r,
            (Self::Date(l), Self::Date(r)) => l == r,
            (Self::Time(l), Self::Time(r)) => l == r,
            (Self::Timestamp(l), Self::Timestamp(r)) => l == r,
            (Self::TimestampWithTimezone(l), Self::TimestampWithTimezone(r)) => l == r,
            (Self::Uuid(l), Self::Uuid(r)) => l == r,
            (Self::List(l, ..), Self::List(r, ..)) => l == r && self.same_type(other),
            (Self::Unknown(l), Self::Unknown(r)) => l == r,
            _ => discriminant(self) == discriminant(other),
        }
    }
}

impl Value {
    pub fn same_type(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Decimal(.., l_prec, l_scale), Self::Decimal(.., r_prec, r_scale)) => {
                l_prec == r_prec && l_scale == r_scale
            }
            (Self::List(.., l), Self::List(.., r)) => l.same_type(r),
            _ => discriminant(self) == discriminant(other),
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Boolean(v) => v.is_none(),
            Value::Int8(v) => v.is_none(),
            Value::Int16(v) => v.is_none(),
            Value::Int32(v) => v.is_none(),
            Value::Int64(v) => v.is_none(),
            Value::UInt8(v) => v.is_none(),
            Value::UInt16(v) => v.is_none(),
            Value::UInt32(v) => v.is_none(),
            Value::UInt64(v) => v.is_none(),
            Value::Float32(v) => v.is_none(),
            Value::Float64(v) => v.is_none(),
            Value::Decimal(v, ..) => v.is_none(),
            Value::Char(v) => v.is_none(),
            Value::Varchar(v) => v.is_none(),
            Value::Blob(v) => v.is_none(),
            Value::Date(v) => v.is_none(),
            Value::Time(v) => v.is_none(),
            Value::Timestamp(v) => v.is_none(),
            Value::TimestampWithTimezone(v) => v.is_none(),
            Value::Uuid(v) => v.is_none(),
            Value::List(v, ..) => v.is_none(),
            Value::Unknown(v) => v.is_none(),
        }
    }

    /// The same variant without its content.
    pub fn to_prototype(&self) -> Value {
        match self {
            Value::Null => Value::Null,
            Value::Boolean(..) => Value::Boolean(None),
            Value::Int8(..) => Value::Int8(None),
            Value::Int16(..) => Value::Int16(None),
            Value::Int32(..) => Value::Int32(None),
            Value::Int64(..) => Value::Int64(None),
            Value::UInt8(..) => Value::UInt8(None),
            Value::UInt16(..) => Value::UInt16(None),
            Value::UInt32(..) => Value::UInt32(None),
            Value::UInt64(..) => Value::UInt64(None),
            Value::Float32(..) => Value::Float32(None),
            Value::Float64(..) => Value::Float64(None),
            Value::Decimal(.., precision, scale) => Value::Decimal(None, *precision, *scale),
            Value::Char(..) => Value::Char(None),
            Value::Varchar(..) => Value::Varchar(None),
            Value::Blob(..) => Value::Blob(None),
            Value::Date(..) => Value::Date(None),
            Value::Time(..) => Value::Time(None),
            Value::Timestamp(..) => Value::Timestamp(None),
            Value::TimestampWithTimezone(..) => Value::TimestampWithTimezone(None),
            Value::Uuid(..) => Value::Uuid(None),
            Value::List(.., inner) => Value::List(None, inner.clone()),
            Value::Unknown(..) => Value::Unknown(None),
        }
    }

    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            Value::Date(..)
                | Value::Time(..)
                | Value::Timestamp(..)
                | Value::TimestampWithTimezone(..)
        )
    }

    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            Value::Char(..) | Value::Varchar(..) | Value::Unknown(..)
        )
    }

    /// Borrow the text of a `Varchar` or `Unknown` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => Some(v),
            _ => None,
        }
    }
}

impl ToTokens for Value {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let ts = match self {
            Value::Null => quote! { ::tabula::Value::Null },
            Value::Boolean(..) => quote! { ::tabula::Value::Boolean(None) },
            Value::Int8(..) => quote! { ::tabula::Value::Int8(None) },
            Value::Int16(..) => quote! { ::tabula::Value::Int16(None) },
            Value::Int32(..) => quote! { ::tabula::Value::Int32(None) },
            Value::Int64(..) => quote! { ::tabula::Value::Int64(None) },
            Value::UInt8(..) => quote! { ::tabula::Value::UInt8(None) },
            Value::UInt16(..) => quote! { ::tabula::Value::UInt16(None) },
            Value::UInt32(..) => quote! { ::tabula::Value::UInt32(None) },
            Value::UInt64(..) => quote! { ::tabula::Value::UInt64(None) },
            Value::Float32(..) => quote! { ::tabula::Value::Float32(None) },
            Value::Float64(..) => quote! { ::tabula::Value::Float64(None) },
            Value::Decimal(.., precision, scale) => {
                quote! { ::tabula::Value::Decimal(None, #precision, #scale) }
            }
            Value::Char(..) => quote! { ::tabula::Value::Char(None) },
            Value::Varchar(..) => quote! { ::tabula::Value::Varchar(None) },
            Value::Blob(..) => quote! { ::tabula::Value::Blob(None) },
            Value::Date(..) => quote! { ::tabula::Value::Date(None) },
            Value::Time(..) => quote! { ::tabula::Value::Time(None) },
            Value::Timestamp(..) => quote! { ::tabula::Value::Timestamp(None) },
            Value::TimestampWithTimezone(..) => {
                quote! { ::tabula::Value::TimestampWithTimezone(None) }
            }
            Value::Uuid(..) => quote! { ::tabula::Value::Uuid(None) },
            Value::List(.., inner) => {
                let inner = inner.as_ref().to_token_stream();
                quote! { ::tabula::Value::List(None, Box::new(#inner)) }
            }
            Value::Unknown(..) => quote! { ::tabula::Value::Unknown(None) },
        };
        tokens.extend(ts);
    }
}
