//! INSERT statement builder.

use crate::dialect::Dialect;
use crate::error::{OrmError, OrmResult};
use crate::qb::quoted_list;
use crate::qb::traits::SqlQb;
use crate::segment::QuerySegment;
use crate::value::Value;

/// Single-row INSERT builder.
#[derive(Clone, Debug)]
pub struct InsertQb {
    table: String,
    columns: Vec<String>,
    values: Vec<Value>,
    returning: Option<String>,
}

impl InsertQb {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: Vec::new(),
            values: Vec::new(),
            returning: None,
        }
    }

    /// Add one `column = value` pair.
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.columns.push(column.to_string());
        self.values.push(value.into());
        self
    }

    /// Replace the column list.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.columns = columns.into_iter().map(|c| c.as_ref().to_string()).collect();
        self
    }

    /// Replace the value list (parallel to the columns).
    pub fn values(mut self, values: Vec<Value>) -> Self {
        self.values = values;
        self
    }

    /// Request `RETURNING column`; ignored where unsupported.
    pub fn returning(mut self, column: &str) -> Self {
        self.returning = Some(column.to_string());
        self
    }
}

impl SqlQb for InsertQb {
    fn build(&self, dialect: &dyn Dialect) -> OrmResult<QuerySegment> {
        if self.columns.is_empty() {
            return Err(OrmError::invalid_query(format!(
                "INSERT into '{}' requires at least one column",
                self.table
            )));
        }
        if self.columns.len() != self.values.len() {
            return Err(OrmError::invalid_query(format!(
                "INSERT into '{}' has {} column(s) but {} value(s)",
                self.table,
                self.columns.len(),
                self.values.len()
            )));
        }

        let placeholders = vec!["?"; self.values.len()].join(", ");
        let mut seg = QuerySegment::new(
            format!(
                "INSERT INTO {} ({}) VALUES ({placeholders})",
                dialect.quote_identifier(&self.table)?,
                quoted_list(dialect, &self.columns)?
            ),
            self.values.clone(),
        );

        if let Some(col) = &self.returning {
            if dialect.supports_returning() {
                seg.push(QuerySegment::raw(format!(
                    "RETURNING {}",
                    dialect.quote_identifier(col)?
                )));
            }
        }
        Ok(seg)
    }
}
