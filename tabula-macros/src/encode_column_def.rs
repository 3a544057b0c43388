use crate::decode_column::ColumnMetadata;
use proc_macro2::TokenStream;
use quote::quote;
use tabula_core::quote_option;

pub fn encode_column_def(metadata: &ColumnMetadata, position: usize) -> TokenStream {
    let field = metadata.ident.to_string();
    let name = &metadata.name;
    let storage = &metadata.storage;
    let value = &metadata.value;
    let nullable = &metadata.nullable;
    let primary_key = &metadata.primary_key;
    let encoding = &metadata.encoding;
    let scale = quote_option(&metadata.scale);
    let converter = metadata
        .converter
        .as_ref()
        .map_or(quote!(None), |v| quote!(Some(#v as ::tabula::Converter)));
    quote! {
        ::tabula::ColumnDef {
            field: #field,
            name: #name,
            storage: #storage,
            value: #value,
            nullable: #nullable,
            primary_key: #primary_key,
            position: #position,
            encoding: #encoding,
            scale: #scale,
            converter: #converter,
        }
    }
}
