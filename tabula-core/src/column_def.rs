use crate::{Encoding, Result, Value};
use proc_macro2::TokenStream;
use quote::{ToTokens, TokenStreamExt, quote};

/// Table identity of an entity.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableRef {
    /// Table name.
    pub name: &'static str,
    /// Schema name (may be empty).
    pub schema: &'static str,
}

/// Indicates how (or if) a column participates in the primary key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryKeyType {
    /// Single-column primary key.
    PrimaryKey,
    /// Member of a composite primary key.
    PartOfPrimaryKey,
    /// Not part of the primary key.
    #[default]
    None,
}

impl ToTokens for PrimaryKeyType {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        use PrimaryKeyType::*;
        tokens.append_all(match self {
            PrimaryKey => quote!(::tabula::PrimaryKeyType::PrimaryKey),
            PartOfPrimaryKey => quote!(::tabula::PrimaryKeyType::PartOfPrimaryKey),
            None => quote!(::tabula::PrimaryKeyType::None),
        });
    }
}

/// Declared wire representation of a column, independent of the field type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageType {
    /// Bound and read as the primitive kind of the field.
    #[default]
    Plain,
    /// Date stored as milliseconds since the Unix epoch.
    LongDate,
    /// Calendar date and time without offset.
    DateTime,
    /// Instant, bound in UTC.
    Timestamp,
    /// Binary large object.
    LargeBinary,
    /// Character large object.
    LargeCharacter,
    /// Binary large object holding text or bytes, bound through a stream.
    LargeObjectBinary,
}

impl StorageType {
    pub fn is_large_object(&self) -> bool {
        matches!(
            self,
            StorageType::LargeBinary | StorageType::LargeCharacter | StorageType::LargeObjectBinary
        )
    }

    /// Accepts the names used by the `storage` attribute of the derive.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "plain" => StorageType::Plain,
            "long_date" => StorageType::LongDate,
            "datetime" | "date_time" => StorageType::DateTime,
            "timestamp" => StorageType::Timestamp,
            "large_binary" | "blob" => StorageType::LargeBinary,
            "large_character" | "clob" => StorageType::LargeCharacter,
            "large_object_binary" | "lob" => StorageType::LargeObjectBinary,
            _ => return None,
        })
    }
}

impl ToTokens for StorageType {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        use StorageType::*;
        tokens.append_all(match self {
            Plain => quote!(::tabula::StorageType::Plain),
            LongDate => quote!(::tabula::StorageType::LongDate),
            DateTime => quote!(::tabula::StorageType::DateTime),
            Timestamp => quote!(::tabula::StorageType::Timestamp),
            LargeBinary => quote!(::tabula::StorageType::LargeBinary),
            LargeCharacter => quote!(::tabula::StorageType::LargeCharacter),
            LargeObjectBinary => quote!(::tabula::StorageType::LargeObjectBinary),
        });
    }
}

/// Per field conversion running before the default decoding. Returning
/// `Some` short-circuits it.
pub type Converter = fn(&Value, &ColumnDef) -> Result<Option<Value>>;

/// Column descriptor, registered by `#[derive(Entity)]`.
#[derive(Default, Debug, Clone)]
pub struct ColumnDef {
    /// Rust field name.
    pub field: &'static str,
    /// Column name.
    pub name: &'static str,
    /// Wire representation.
    pub storage: StorageType,
    /// Prototype describing the primitive kind (decimal carries precision and scale).
    pub value: Value,
    /// Nullability flag.
    pub nullable: bool,
    /// Primary key participation.
    pub primary_key: PrimaryKeyType,
    /// Declaration order, inherited columns first.
    pub position: usize,
    /// Text encoding of large objects.
    pub encoding: Encoding,
    /// Rounding scale applied to floating and decimal values.
    pub scale: Option<u8>,
    pub converter: Option<Converter>,
}

impl ColumnDef {
    pub fn is_primary_key(&self) -> bool {
        self.primary_key != PrimaryKeyType::None
    }

    /// Scale declared on the field, or the one of a decimal prototype.
    pub fn effective_scale(&self) -> Option<u8> {
        match (self.scale, &self.value) {
            (Some(scale), _) => Some(scale),
            (None, Value::Decimal(.., precision, scale)) if (*precision, *scale) != (0, 0) => {
                Some(*scale)
            }
            _ => None,
        }
    }
}
