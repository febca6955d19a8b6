//! Table metadata derived from record declarations.
//!
//! [`Metadata::build`] validates a [`RecordDescriptor`] and produces the
//! table, column, and primary-key facts the statement builders need.
//! [`MetadataCache`] memoizes the result per record type.

mod cache;
mod descriptor;

pub use cache::MetadataCache;
pub use descriptor::{PrimaryKeyDecl, RecordDescriptor};

use crate::error::{OrmError, OrmResult};
use std::collections::HashSet;

/// Validated table metadata for one record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    type_name: String,
    table: String,
    database: String,
    columns: Vec<String>,
    primary_key: Vec<String>,
    non_primary_key: Vec<String>,
}

impl Metadata {
    /// Build and validate metadata from a descriptor.
    ///
    /// Fails with [`OrmError::ModelDefinition`] when the table or database is
    /// missing, there are no columns, a column is listed twice, or a primary
    /// key column is not among the columns.
    pub fn build(desc: &RecordDescriptor) -> OrmResult<Self> {
        let name = if desc.type_name.is_empty() {
            "<anonymous>"
        } else {
            desc.type_name.as_str()
        };

        let table = required(name, "table", desc.table.as_deref())?;
        let database = required(name, "database", desc.database.as_deref())?;

        if desc.fields.is_empty() {
            return Err(OrmError::model_definition(format!(
                "'{name}' declares no columns"
            )));
        }
        let mut seen = HashSet::new();
        for field in &desc.fields {
            if field.trim().is_empty() {
                return Err(OrmError::model_definition(format!(
                    "'{name}' has an empty column name"
                )));
            }
            if !seen.insert(field.as_str()) {
                return Err(OrmError::model_definition(format!(
                    "'{name}' declares column '{field}' more than once"
                )));
            }
        }

        let primary_key = desc.primary_key.columns();
        let mut seen_pk = HashSet::new();
        for pk in &primary_key {
            if !seen.contains(pk.as_str()) {
                return Err(OrmError::model_definition(format!(
                    "'{name}' primary key '{pk}' is not a column"
                )));
            }
            if !seen_pk.insert(pk.as_str()) {
                return Err(OrmError::model_definition(format!(
                    "'{name}' lists primary key '{pk}' more than once"
                )));
            }
        }

        let non_primary_key = desc
            .fields
            .iter()
            .filter(|c| !seen_pk.contains(c.as_str()))
            .cloned()
            .collect();

        Ok(Self {
            type_name: name.to_string(),
            table,
            database,
            columns: desc.fields.clone(),
            primary_key,
            non_primary_key,
        })
    }

    /// Name of the record type this metadata describes.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Logical database name (a key into [`OrmConfig`](crate::OrmConfig)).
    pub fn database(&self) -> &str {
        &self.database
    }

    /// All columns, in declaration order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Primary-key columns, in key order.
    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    /// Columns not in the primary key, in declaration order.
    pub fn non_primary_key(&self) -> &[String] {
        &self.non_primary_key
    }

    /// A model without a primary key cannot be written by key.
    pub fn is_read_only(&self) -> bool {
        self.primary_key.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Fail with [`OrmError::UnknownColumn`] unless `column` exists.
    pub fn check_column(&self, column: &str) -> OrmResult<()> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(OrmError::unknown_column(&self.type_name, column))
        }
    }

    /// Fail with [`OrmError::ReadOnlyModel`] when there is no primary key.
    pub fn require_primary_key(&self) -> OrmResult<&[String]> {
        if self.is_read_only() {
            Err(OrmError::ReadOnlyModel(self.type_name.clone()))
        } else {
            Ok(&self.primary_key)
        }
    }
}

fn required(name: &str, what: &str, value: Option<&str>) -> OrmResult<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(OrmError::model_definition(format!(
            "'{name}' does not declare a {what}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user() -> RecordDescriptor {
        RecordDescriptor::new("User")
            .table("users")
            .database("main")
            .primary_key("id")
            .fields(["id", "name", "email"])
    }

    #[test]
    fn derives_non_primary_key_columns() {
        let meta = Metadata::build(&user()).unwrap();
        assert_eq!(meta.columns(), &["id", "name", "email"]);
        assert_eq!(meta.primary_key(), &["id"]);
        assert_eq!(meta.non_primary_key(), &["name", "email"]);
        assert!(!meta.is_read_only());
    }

    #[test]
    fn composite_key_keeps_key_order() {
        let meta = Metadata::build(
            &RecordDescriptor::new("Membership")
                .table("memberships")
                .database("main")
                .primary_key(vec!["user_id", "group_id"])
                .fields(["group_id", "user_id", "role"]),
        )
        .unwrap();
        assert_eq!(meta.primary_key(), &["user_id", "group_id"]);
        assert_eq!(meta.non_primary_key(), &["role"]);
    }

    #[test]
    fn no_primary_key_is_read_only() {
        let meta = Metadata::build(&user().primary_key(PrimaryKeyDecl::None)).unwrap();
        assert!(meta.is_read_only());
        assert_eq!(meta.non_primary_key(), meta.columns());
        assert!(matches!(
            meta.require_primary_key(),
            Err(OrmError::ReadOnlyModel(_))
        ));
    }

    #[test]
    fn rebuilding_is_idempotent() {
        assert_eq!(Metadata::build(&user()).unwrap(), Metadata::build(&user()).unwrap());
    }

    #[test]
    fn missing_table_or_database_fails() {
        let mut d = user();
        d.table = None;
        assert!(Metadata::build(&d).unwrap_err().is_model_definition());

        let mut d = user();
        d.database = Some("  ".into());
        assert!(Metadata::build(&d).unwrap_err().is_model_definition());
    }

    #[test]
    fn no_columns_fails() {
        let d = user().primary_key(PrimaryKeyDecl::None).fields(Vec::<String>::new());
        assert!(Metadata::build(&d).unwrap_err().is_model_definition());
    }

    #[test]
    fn unknown_primary_key_fails() {
        let err = Metadata::build(&user().primary_key("uuid")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Model definition error: 'User' primary key 'uuid' is not a column"
        );
    }

    #[test]
    fn duplicate_column_fails() {
        let d = user().fields(["id", "name", "id"]);
        assert!(Metadata::build(&d).unwrap_err().is_model_definition());
    }

    #[test]
    fn check_column_reports_unknown() {
        let meta = Metadata::build(&user()).unwrap();
        assert!(meta.check_column("email").is_ok());
        assert!(meta.check_column("nickname").unwrap_err().is_unknown_column());
        assert_eq!(meta.column_index("email"), Some(2));
    }

    #[test]
    fn descriptor_from_json() {
        let d = RecordDescriptor::from_json(
            "User",
            &json!({
                "table": "users",
                "database": "main",
                "primary_key": ["id"],
                "fields": ["id", "name", "email"],
            }),
        )
        .unwrap();
        let meta = Metadata::build(&d).unwrap();
        assert_eq!(meta.primary_key(), &["id"]);
        assert_eq!(meta.table(), "users");
    }

    #[test]
    fn descriptor_rejects_bad_primary_key_shape() {
        for pk in [json!(5), json!({"a": 1}), json!(["id", 2])] {
            let err = RecordDescriptor::from_json(
                "User",
                &json!({"table": "t", "database": "d", "primary_key": pk, "fields": ["id"]}),
            )
            .unwrap_err();
            assert!(err.is_model_definition());
        }
    }

    #[test]
    fn descriptor_without_model_keys_fails_to_build() {
        let d = RecordDescriptor::from_json("Plain", &json!({"fields": ["a"]})).unwrap();
        assert!(Metadata::build(&d).unwrap_err().is_model_definition());
    }
}
