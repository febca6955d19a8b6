//! Derive macros for qorm
//!
//! Provides `#[derive(FromRow)]` and `#[derive(Record)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod from_row;
mod record;

/// Derive `FromRow` for a struct, decoding each field from the column of the
/// same name.
///
/// # Example
///
/// ```ignore
/// use qorm::FromRow;
///
/// #[derive(FromRow)]
/// struct User {
///     id: i64,
///     username: String,
///     #[orm(column = "email_address")]
///     email: Option<String>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[orm(column = "name")]` - Map field to a different column name
#[proc_macro_derive(FromRow, attributes(orm))]
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    from_row::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `Record`: the table mapping used by `Orm`, `Model`, and `QuerySet`.
///
/// The struct must also implement `FromRow` (usually derived alongside), and
/// every field type must convert into `qorm::Value`.
///
/// # Example
///
/// ```ignore
/// use qorm::{FromRow, Record};
///
/// #[derive(Clone, FromRow, Record)]
/// #[orm(table = "memberships", database = "main")]
/// struct Membership {
///     #[orm(id)]
///     user_id: i64,
///     #[orm(id)]
///     group_id: i64,
///     role: String,
/// }
/// ```
///
/// # Attributes
///
/// - `#[orm(table = "name", database = "name")]` - Table and logical database
/// - `#[orm(id)]` - Part of the primary key (in field order); none means read-only
/// - `#[orm(column = "name")]` - Map field to a different column name
#[proc_macro_derive(Record, attributes(orm))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
