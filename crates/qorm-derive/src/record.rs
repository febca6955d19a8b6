//! Record derive macro implementation

use crate::attrs;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let type_name = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let attr = attrs::struct_attr(&input)?;
    let fields = attrs::fields(&input, "Record")?;

    // Missing table/database is reported by Metadata::build, not here.
    let table = attr.table.map(|t| quote! { .table(#t) });
    let database = attr.database.map(|d| quote! { .database(#d) });

    let ids: Vec<&str> = fields
        .iter()
        .filter(|f| f.is_id)
        .map(|f| f.column.as_str())
        .collect();
    let primary_key = match ids.as_slice() {
        [] => quote! { ::qorm::PrimaryKeyDecl::None },
        [single] => quote! {
            ::qorm::PrimaryKeyDecl::Single(::std::string::String::from(#single))
        },
        many => quote! {
            ::qorm::PrimaryKeyDecl::Composite(::std::vec![
                #(::std::string::String::from(#many)),*
            ])
        },
    };

    let columns = fields.iter().map(|f| f.column.as_str());
    let values = fields.iter().map(|f| {
        let ident = f.ident;
        quote! {
            ::qorm::Value::from(::core::clone::Clone::clone(&self.#ident))
        }
    });

    Ok(quote! {
        impl #impl_generics ::qorm::Record for #name #ty_generics #where_clause {
            fn descriptor() -> ::qorm::RecordDescriptor {
                ::qorm::RecordDescriptor::new(#type_name)
                    #table
                    #database
                    .primary_key(#primary_key)
                    .fields::<_, &'static str>([#(#columns),*])
            }

            fn to_values(&self) -> ::std::vec::Vec<::qorm::Value> {
                ::std::vec![#(#values),*]
            }
        }
    })
}
