//! UPDATE statement builder.

use crate::dialect::Dialect;
use crate::error::{OrmError, OrmResult};
use crate::filter::Filter;
use crate::qb::traits::SqlQb;
use crate::qb::where_clause;
use crate::segment::QuerySegment;
use crate::value::Value;

/// UPDATE builder.
///
/// Without a filter every row is updated; the record and query-set helpers
/// always supply one.
#[derive(Clone, Debug)]
pub struct UpdateQb {
    table: String,
    columns: Vec<String>,
    values: Vec<Value>,
    filter: Option<Filter>,
}

impl UpdateQb {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: Vec::new(),
            values: Vec::new(),
            filter: None,
        }
    }

    /// Add one `SET column = ?`.
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.columns.push(column.to_string());
        self.values.push(value.into());
        self
    }

    /// Replace the SET list with parallel columns and values.
    pub fn set_all<I, S>(mut self, columns: I, values: Vec<Value>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.columns = columns.into_iter().map(|c| c.as_ref().to_string()).collect();
        self.values = values;
        self
    }

    /// AND `filter` onto the current WHERE.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and_with(filter),
            None => filter,
        });
        self
    }
}

impl SqlQb for UpdateQb {
    fn build(&self, dialect: &dyn Dialect) -> OrmResult<QuerySegment> {
        if self.columns.is_empty() {
            return Err(OrmError::invalid_query(format!(
                "UPDATE of '{}' requires at least one column",
                self.table
            )));
        }
        if self.columns.len() != self.values.len() {
            return Err(OrmError::invalid_query(format!(
                "UPDATE of '{}' has {} column(s) but {} value(s)",
                self.table,
                self.columns.len(),
                self.values.len()
            )));
        }

        let assignments = self
            .columns
            .iter()
            .map(|c| dialect.quote_identifier(c).map(|q| format!("{q} = ?")))
            .collect::<OrmResult<Vec<_>>>()?;

        let mut seg = QuerySegment::new(
            format!(
                "UPDATE {} SET {}",
                dialect.quote_identifier(&self.table)?,
                assignments.join(", ")
            ),
            self.values.clone(),
        );
        seg.push(where_clause(dialect, self.filter.as_ref())?);
        Ok(seg)
    }
}
