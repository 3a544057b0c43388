use crate::{Value, matches_path};
use quote::ToTokens;
use syn::{Error, GenericArgument, PathArguments, Type, TypePath, TypeSlice};

/// Primitive kind of a field type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecoded {
    pub value: Value,
    pub nullable: bool,
}

/// Maps a Rust field type to the prototype of its primitive kind.
pub fn decode_type(ty: &Type) -> syn::Result<TypeDecoded> {
    let mut nullable = false;
    let value = 'value: {
        match ty {
            Type::Path(TypePath { path, .. }) => {
                if let Some(ident) = path.get_ident() {
                    let value = match ident.to_string().as_str() {
                        "bool" => Some(Value::Boolean(None)),
                        "i8" => Some(Value::Int8(None)),
                        "i16" => Some(Value::Int16(None)),
                        "i32" => Some(Value::Int32(None)),
                        "i64" => Some(Value::Int64(None)),
                        "u8" => Some(Value::UInt8(None)),
                        "u16" => Some(Value::UInt16(None)),
                        "u32" => Some(Value::UInt32(None)),
                        "u64" => Some(Value::UInt64(None)),
                        "f32" => Some(Value::Float32(None)),
                        "f64" => Some(Value::Float64(None)),
                        "char" => Some(Value::Char(None)),
                        _ => None,
                    };
                    if let Some(value) = value {
                        break 'value value;
                    }
                }
                if matches_path(path, &["std", "string", "String"]) {
                    break 'value Value::Varchar(None);
                } else if matches_path(path, &["rust_decimal", "Decimal"]) {
                    break 'value Value::Decimal(None, 0, 0);
                } else if matches_path(path, &["time", "Date"]) {
                    break 'value Value::Date(None);
                } else if matches_path(path, &["time", "Time"]) {
                    break 'value Value::Time(None);
                } else if matches_path(path, &["time", "PrimitiveDateTime"]) {
                    break 'value Value::Timestamp(None);
                } else if matches_path(path, &["time", "OffsetDateTime"]) {
                    break 'value Value::TimestampWithTimezone(None);
                } else if matches_path(path, &["uuid", "Uuid"]) {
                    break 'value Value::Uuid(None);
                }
                let is_option = matches_path(path, &["std", "option", "Option"]);
                let is_box = matches_path(path, &["std", "boxed", "Box"]);
                let is_list = matches_path(path, &["std", "vec", "Vec"]);
                if !(is_option || is_box || is_list) {
                    return Err(Error::new_spanned(
                        ty,
                        format!("Unsupported field type `{}`", ty.to_token_stream()),
                    ));
                }
                let inner = path.segments.last().and_then(|v| match &v.arguments {
                    PathArguments::AngleBracketed(bracketed) => {
                        bracketed.args.iter().find_map(|v| match v {
                            GenericArgument::Type(ty) => Some(ty),
                            _ => None,
                        })
                    }
                    _ => None,
                });
                let Some(inner) = inner else {
                    return Err(Error::new_spanned(
                        ty,
                        format!("`{}` must have a generic type argument", ty.to_token_stream()),
                    ));
                };
                let inner = decode_type(inner)?;
                if is_list {
                    break 'value Value::List(None, inner.value.into());
                }
                nullable = is_option || inner.nullable;
                inner.value
            }
            Type::Slice(TypeSlice { elem, .. }) => {
                let element = decode_type(elem)?;
                if let TypeDecoded {
                    value: Value::UInt8(..),
                    nullable: false,
                } = element
                {
                    break 'value Value::Blob(None);
                }
                Value::List(None, element.value.into())
            }
            _ => {
                return Err(Error::new_spanned(
                    ty,
                    format!("Unexpected type `{}`", ty.to_token_stream()),
                ));
            }
        }
    };
    Ok(TypeDecoded { value, nullable })
}
