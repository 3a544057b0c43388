use crate::{TableMetadata, decode_column::FieldRole};
use proc_macro2::TokenStream;
use quote::quote;

/// Body of `Entity::from_row`: labels are matched case insensitively, a
/// missing nullable column leaves the field empty.
pub(crate) fn from_row_trait(table: &TableMetadata) -> TokenStream {
    let struct_name = &table.item.ident;
    let type_name = struct_name.to_string();
    let holders = table.columns().map(|c| {
        let ident = &c.ident;
        let ty = &c.ty;
        quote! {
            let mut #ident: Option<#ty> = None;
        }
    });
    let assignments = table.columns().map(|c| {
        let ident = &c.ident;
        let ty = &c.ty;
        let name = &c.name;
        quote! {
            if #ident.is_none() && __n__.eq_ignore_ascii_case(#name) {
                #ident = Some(<#ty as ::tabula::AsValue>::try_from_value(__v__.clone())?);
                continue;
            }
        }
    });
    let create_columns = table.columns().map(|c| {
        let ident = &c.ident;
        let ty = &c.ty;
        let name = &c.name;
        if c.nullable {
            quote! {
                #ident: match #ident {
                    Some(v) => v,
                    None => <#ty as ::tabula::AsValue>::try_from_value(
                        <#ty as ::tabula::AsValue>::as_empty_value(),
                    )?,
                }
            }
        } else {
            quote! {
                #ident: #ident.ok_or_else(|| __make_error__(#name))?
            }
        }
    });
    let inherited = table.with_role(FieldRole::Inherit).map(|c| {
        let ident = &c.ident;
        let ty = &c.ty;
        quote! {
            #ident: <#ty as ::tabula::Entity>::from_row(row.clone())?
        }
    });
    let skipped = table.with_role(FieldRole::Skip).map(|c| {
        let ident = &c.ident;
        quote!(#ident: Default::default())
    });
    quote! {
        fn from_row(row: ::tabula::RowLabeled) -> ::tabula::Result<Self> {
            #(#holders)*
            for (__n__, __v__) in row.labels.iter().zip(row.values.iter()) {
                #(#assignments)*
            }
            #[allow(unused)]
            let __make_error__ = |name: &str| {
                ::tabula::Error::model(format!(
                    "Column `{}` of `{}` does not exist in the row provided",
                    name, #type_name,
                ))
            };
            Ok(#struct_name {
                #(#create_columns,)*
                #(#inherited,)*
                #(#skipped,)*
            })
        }
    }
}
