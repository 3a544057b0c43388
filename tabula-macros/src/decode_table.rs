use crate::decode_column::{ColumnMetadata, FieldRole, decode_column};
use convert_case::{Case, Casing};
use proc_macro2::Span;
use quote::ToTokens;
use std::convert::identity;
use syn::{
    Error, Expr, ExprLit, ExprPath, Fields, ItemStruct, Lit, LitStr, Result, parse::ParseBuffer,
    spanned::Spanned,
};
use tabula_core::{PrimaryKeyType, matches_path};

pub(crate) struct TableMetadata {
    pub(crate) fields: Vec<ColumnMetadata>,
    pub(crate) name: String,
    pub(crate) schema: String,
    pub(crate) item: ItemStruct,
}

impl TableMetadata {
    pub(crate) fn columns(&self) -> impl Iterator<Item = &ColumnMetadata> + Clone {
        self.fields.iter().filter(|v| v.role == FieldRole::Column)
    }

    pub(crate) fn with_role(&self, role: FieldRole) -> impl Iterator<Item = &ColumnMetadata> {
        self.fields.iter().filter(move |v| v.role == role)
    }
}

/// Resolves the columns named by `primary_key = ..` into indexes of `fields`.
fn decode_set_columns(item: &ItemStruct, col: Expr, fields: &[ColumnMetadata]) -> Result<Vec<usize>> {
    let columns = || {
        fields
            .iter()
            .enumerate()
            .filter(|(_, c)| c.role == FieldRole::Column)
    };
    Ok(match col {
        Expr::Lit(ExprLit {
            lit: Lit::Str(v), ..
        }) => {
            let value = v.value();
            let Some((i, _)) = columns().find(|(_, c)| c.name.eq_ignore_ascii_case(&value)) else {
                return Err(Error::new(
                    v.span(),
                    format!("Column `{}` does not exist in the table", value),
                ));
            };
            vec![i]
        }
        Expr::Path(ExprPath { path, .. }) => {
            let Some((i, _)) = columns().find(|(_, c)| {
                let c = c.ident.to_string();
                matches_path(&path, &["Self", &c])
                    || matches_path(&path, &[&item.ident.to_string(), &c])
            }) else {
                return Err(Error::new(
                    path.span(),
                    format!(
                        "Field `{}` does not exist in the entity",
                        path.to_token_stream().to_string()
                    ),
                ));
            };
            vec![i]
        }
        Expr::Tuple(tuple) => {
            let elems: Vec<_> = tuple
                .elems
                .iter()
                .map(|v| decode_set_columns(item, v.clone(), fields))
                .collect::<Result<_>>()?;
            if elems.iter().any(|v| v.len() != 1) {
                return Err(Error::new(
                    tuple.span(),
                    "Fields list inside tuple must either be a string literal column name or a column reference path",
                ));
            }
            elems.into_iter().flat_map(identity).collect()
        }
        _ => {
            return Err(Error::new(
                Span::call_site(),
                "Expected a column name, a field path or a tuple of them",
            ));
        }
    })
}

pub fn decode_table(item: ItemStruct) -> Result<TableMetadata> {
    if !matches!(item.fields, Fields::Named(..)) {
        return Err(Error::new_spanned(
            &item.ident,
            "Entity can be derived only on structs with named fields",
        ));
    }
    if !item.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &item.generics,
            "Entity cannot be derived on generic structs",
        ));
    }
    let mut fields = item
        .fields
        .iter()
        .map(decode_column)
        .collect::<Result<Vec<_>>>()?;
    let mut name = item.ident.to_string().to_case(Case::UpperSnake);
    let mut schema = String::new();
    let mut primary_key = Vec::<usize>::new();
    if name.starts_with('_') {
        name.remove(0);
    }
    for attr in &item.attrs {
        let meta = &attr.meta;
        if !meta.path().is_ident("tabula") {
            continue;
        }
        let Ok(list) = meta.require_list() else {
            panic!("Error while parsing `tabula`, use it like: `#[tabula(attribute = value, ..)]`");
        };
        let _ = list.parse_nested_meta(|arg| {
            if arg.path.is_ident("name") {
                let Ok(value) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                    panic!("Error while parsing `name`, use it like: `#[tabula(name = \"MY_TABLE\")]`");
                };
                name = value.value();
            } else if arg.path.is_ident("schema") {
                let Ok(value) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                    panic!("Error while parsing `schema`, use it like: `#[tabula(schema = \"my_schema\")]`");
                };
                schema = value.value();
            } else if arg.path.is_ident("primary_key") {
                let value = match arg
                    .value()
                    .and_then(ParseBuffer::parse::<Expr>)
                    .and_then(|v| decode_set_columns(&item, v, &fields))
                {
                    Ok(value) => value,
                    Err(e) => panic!(
                        "Error while parsing `primary_key`, use it like: `#[tabula(primary_key = (\"K1\", Self::k2, ..))]`: {e}"
                    ),
                };
                if !primary_key.is_empty() {
                    panic!("Primary key attribute can appear just once on a table");
                }
                primary_key = value;
            } else {
                panic!(
                    "Unknown attribute `{}` inside tabula macro",
                    arg.path.to_token_stream().to_string()
                );
            }
            Ok(())
        });
    }
    if !primary_key.is_empty() {
        if let Some(column) = fields
            .iter()
            .find(|c| c.primary_key != PrimaryKeyType::None)
        {
            panic!(
                "Column `{}` cannot be declared as a primary key while the table also specifies one",
                column.name
            );
        }
        let kind = if primary_key.len() == 1 {
            PrimaryKeyType::PrimaryKey
        } else {
            PrimaryKeyType::PartOfPrimaryKey
        };
        for i in primary_key {
            fields[i].primary_key = kind;
            fields[i].nullable = false;
        }
    } else {
        let declared = fields
            .iter()
            .filter(|c| c.primary_key != PrimaryKeyType::None)
            .count();
        if declared > 1 {
            for column in fields.iter_mut() {
                if column.primary_key != PrimaryKeyType::None {
                    column.primary_key = PrimaryKeyType::PartOfPrimaryKey;
                }
            }
        }
    }
    Ok(TableMetadata {
        fields,
        name,
        schema,
        item,
    })
}
