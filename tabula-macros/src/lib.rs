mod decode_column;
mod decode_table;
mod encode_column_def;
mod from_row_trait;

use decode_column::FieldRole;
use decode_table::{TableMetadata, decode_table};
use encode_column_def::encode_column_def;
use from_row_trait::from_row_trait;
use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemStruct, parse_macro_input};

#[proc_macro_derive(Entity, attributes(tabula))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    let table = match decode_table(item) {
        Ok(v) => v,
        Err(e) => return e.to_compile_error().into(),
    };
    let name = &table.item.ident;
    let type_name = name.to_string();
    let table_name = &table.name;
    let schema_name = &table.schema;
    let columns_defs = table
        .columns()
        .enumerate()
        .map(|(i, c)| encode_column_def(c, i));
    let inherited_types = table
        .with_role(FieldRole::Inherit)
        .map(|c| &c.ty)
        .collect::<Vec<_>>();
    let inherited_bases = inherited_types.clone();
    let inherited_rows = table.with_role(FieldRole::Inherit).map(|c| {
        let ident = &c.ident;
        quote! {
            let row = ::tabula::Entity::row_full(&self.#ident);
            labels.extend(row.labels.iter().cloned());
            values.extend(row.values.into_vec());
        }
    });
    let column_labels = table.columns().map(|c| &c.name);
    let column_values = table.columns().map(|c| {
        let ident = &c.ident;
        quote!(::tabula::AsValue::as_value(self.#ident.clone()))
    });
    let from_row = from_row_trait(&table);
    quote! {
        impl ::tabula::Entity for #name {
            fn type_name() -> &'static str {
                #type_name
            }

            fn table() -> &'static ::tabula::TableRef {
                static TABLE_REF: ::tabula::TableRef = ::tabula::TableRef {
                    name: #table_name,
                    schema: #schema_name,
                };
                &TABLE_REF
            }

            fn columns() -> &'static [::tabula::ColumnDef] {
                static RESULT: ::std::sync::LazyLock<Box<[::tabula::ColumnDef]>> =
                    ::std::sync::LazyLock::new(|| vec![#(#columns_defs),*].into_boxed_slice());
                &RESULT
            }

            fn inherited_columns() -> Vec<&'static ::tabula::ColumnDef> {
                #[allow(unused_mut)]
                let mut result = Vec::new();
                #(
                    result.extend(<#inherited_types as ::tabula::Entity>::inherited_columns());
                    result.extend(<#inherited_bases as ::tabula::Entity>::columns().iter());
                )*
                result
            }

            fn row_full(&self) -> ::tabula::RowLabeled {
                let mut labels = Vec::<String>::new();
                let mut values = Vec::<::tabula::Value>::new();
                #(#inherited_rows)*
                #(
                    labels.push(#column_labels.to_string());
                    values.push(#column_values);
                )*
                ::tabula::RowLabeled::new(labels.into(), values.into_boxed_slice())
            }

            #from_row
        }
    }
    .into()
}
