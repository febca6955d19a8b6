//! `#[orm(...)]` attribute parsing shared by both derives.

use syn::parse::{Parse, ParseStream};
use syn::{Data, DeriveInput, Fields, Ident, LitStr, Result, Token};

/// Struct-level `#[orm(table = "...", database = "...")]`.
#[derive(Default)]
pub(crate) struct StructAttr {
    pub table: Option<String>,
    pub database: Option<String>,
}

impl Parse for StructAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = StructAttr::default();
        while !input.is_empty() {
            let key: Ident = input.parse()?;
            let _: Token![=] = input.parse()?;
            let value: LitStr = input.parse()?;
            if key == "table" {
                attr.table = Some(value.value());
            } else if key == "database" {
                attr.database = Some(value.value());
            } else {
                return Err(syn::Error::new_spanned(
                    key,
                    "expected `table = \"...\"` or `database = \"...\"`",
                ));
            }

            if input.is_empty() {
                break;
            }
            let _: Token![,] = input.parse()?;
        }
        Ok(attr)
    }
}

/// Field-level `#[orm(id)]` / `#[orm(column = "...")]`.
#[derive(Default)]
pub(crate) struct FieldAttr {
    pub is_id: bool,
    pub column: Option<String>,
}

impl Parse for FieldAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();
        while !input.is_empty() {
            let key: Ident = input.parse()?;
            if key == "id" {
                attr.is_id = true;
            } else if key == "column" {
                let _: Token![=] = input.parse()?;
                let value: LitStr = input.parse()?;
                attr.column = Some(value.value());
            } else {
                return Err(syn::Error::new_spanned(
                    key,
                    "expected `id` or `column = \"...\"`",
                ));
            }

            if input.is_empty() {
                break;
            }
            let _: Token![,] = input.parse()?;
        }
        Ok(attr)
    }
}

/// A named field with its resolved column name.
pub(crate) struct FieldSpec<'a> {
    pub ident: &'a Ident,
    pub column: String,
    pub is_id: bool,
}

/// Merge every struct-level `#[orm(...)]`.
pub(crate) fn struct_attr(input: &DeriveInput) -> Result<StructAttr> {
    let mut merged = StructAttr::default();
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("orm")) {
        let parsed: StructAttr = attr.parse_args()?;
        merged.table = parsed.table.or(merged.table);
        merged.database = parsed.database.or(merged.database);
    }
    Ok(merged)
}

/// Named fields in declaration order, with `#[orm(...)]` applied.
pub(crate) fn fields<'a>(input: &'a DeriveInput, derive: &str) -> Result<Vec<FieldSpec<'a>>> {
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    format!("{derive} can only be derived for structs with named fields"),
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                format!("{derive} can only be derived for structs"),
            ));
        }
    };

    named
        .iter()
        .map(|field| {
            let ident = field
                .ident
                .as_ref()
                .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;

            let mut attr = FieldAttr::default();
            for a in field.attrs.iter().filter(|a| a.path().is_ident("orm")) {
                let parsed: FieldAttr = a.parse_args()?;
                attr.is_id |= parsed.is_id;
                attr.column = parsed.column.or(attr.column);
            }

            Ok(FieldSpec {
                ident,
                column: attr.column.unwrap_or_else(|| ident.to_string()),
                is_id: attr.is_id,
            })
        })
        .collect()
}
