use convert_case::{Case, Casing};
use quote::ToTokens;
use syn::{Field, Ident, LitInt, LitStr, Path, Type, parse::ParseBuffer};
use tabula_core::{Encoding, PrimaryKeyType, StorageType, TypeDecoded, Value, decode_type};

/// Role of a struct field in the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldRole {
    Column,
    /// Embedded base entity, its columns come before the ones of the struct.
    Inherit,
    /// Not persisted, initialized with `Default::default()`.
    Skip,
}

pub(crate) struct ColumnMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    pub(crate) role: FieldRole,
    pub(crate) name: String,
    pub(crate) value: Value,
    pub(crate) nullable: bool,
    pub(crate) storage: StorageType,
    pub(crate) encoding: Encoding,
    pub(crate) scale: Option<u8>,
    pub(crate) precision: Option<u8>,
    pub(crate) converter: Option<Path>,
    pub(crate) primary_key: PrimaryKeyType,
}

pub fn decode_column(field: &Field) -> syn::Result<ColumnMetadata> {
    let Some(ident) = field.ident.clone() else {
        return Err(syn::Error::new_spanned(
            field,
            "Entity can be derived only on structs with named fields",
        ));
    };
    let mut name = ident.to_string();
    if name.starts_with('_') {
        name.remove(0);
    }
    let mut metadata = ColumnMetadata {
        ident,
        ty: field.ty.clone(),
        role: FieldRole::Column,
        name: name.to_case(Case::UpperSnake),
        value: Value::Null,
        nullable: false,
        storage: StorageType::Plain,
        encoding: Encoding::Utf8,
        scale: None,
        precision: None,
        converter: None,
        primary_key: PrimaryKeyType::None,
    };
    for attr in &field.attrs {
        let meta = &attr.meta;
        if !meta.path().is_ident("tabula") {
            continue;
        }
        let Ok(list) = meta.require_list() else {
            panic!("Error while parsing `tabula`, use it like: `#[tabula(attribute = value, ...)]`");
        };
        let _ = list.parse_nested_meta(|arg| {
            if arg.path.is_ident("name") {
                let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                    panic!("Error while parsing `name`, use it like: `#[tabula(name = \"MY_COLUMN\")]`");
                };
                metadata.name = v.value();
            } else if arg.path.is_ident("primary_key") {
                let Err(..) = arg.value() else {
                    // value() is Err for Meta::Path
                    panic!("Error while parsing `primary_key`, use it like: `#[tabula(primary_key)]`");
                };
                metadata.primary_key = PrimaryKeyType::PrimaryKey;
            } else if arg.path.is_ident("storage") {
                let Some(storage) = arg
                    .value()
                    .and_then(ParseBuffer::parse::<LitStr>)
                    .ok()
                    .and_then(|v| StorageType::from_name(&v.value()))
                else {
                    panic!("Error while parsing `storage`, use it like: `#[tabula(storage = \"long_date\")]`, accepted values are plain, long_date, datetime, timestamp, large_binary, large_character, large_object_binary");
                };
                metadata.storage = storage;
            } else if arg.path.is_ident("encoding") {
                let Some(encoding) = arg
                    .value()
                    .and_then(ParseBuffer::parse::<LitStr>)
                    .ok()
                    .and_then(|v| Encoding::from_label(&v.value()))
                else {
                    panic!("Error while parsing `encoding`, use it like: `#[tabula(encoding = \"UTF-16LE\")]`");
                };
                metadata.encoding = encoding;
            } else if arg.path.is_ident("scale") {
                let Ok(v) = arg
                    .value()
                    .and_then(ParseBuffer::parse::<LitInt>)
                    .and_then(|v| v.base10_parse::<u8>())
                else {
                    panic!("Error while parsing `scale`, use it like: `#[tabula(scale = 2)]`");
                };
                metadata.scale = Some(v);
            } else if arg.path.is_ident("precision") {
                let Ok(v) = arg
                    .value()
                    .and_then(ParseBuffer::parse::<LitInt>)
                    .and_then(|v| v.base10_parse::<u8>())
                else {
                    panic!("Error while parsing `precision`, use it like: `#[tabula(precision = 10)]`");
                };
                metadata.precision = Some(v);
            } else if arg.path.is_ident("converter") {
                let Ok(v) = arg.value().and_then(ParseBuffer::parse::<Path>) else {
                    panic!("Error while parsing `converter`, use it like: `#[tabula(converter = path::to::function)]`");
                };
                metadata.converter = Some(v);
            } else if arg.path.is_ident("inherit") {
                let Err(..) = arg.value() else {
                    panic!("Error while parsing `inherit`, use it like: `#[tabula(inherit)]`");
                };
                metadata.role = FieldRole::Inherit;
            } else if arg.path.is_ident("skip") {
                let Err(..) = arg.value() else {
                    panic!("Error while parsing `skip`, use it like: `#[tabula(skip)]`");
                };
                metadata.role = FieldRole::Skip;
            } else {
                panic!(
                    "Unknown attribute `{}` inside tabula macro",
                    arg.path.to_token_stream().to_string()
                );
            }
            Ok(())
        });
    }
    if metadata.role != FieldRole::Column {
        return Ok(metadata);
    }
    let TypeDecoded { value, nullable } = decode_type(&field.ty)?;
    metadata.value = match (value, metadata.precision) {
        (Value::Decimal(..), Some(precision)) => {
            Value::Decimal(None, precision, metadata.scale.unwrap_or(0))
        }
        (_, Some(..)) => {
            return Err(syn::Error::new_spanned(
                &field.ty,
                "`precision` can only be declared on decimal fields",
            ));
        }
        (value, None) => value,
    };
    metadata.nullable = nullable && metadata.primary_key == PrimaryKeyType::None;
    Ok(metadata)
}
