//! Statement builders.
//!
//! One builder per statement kind, each rendering to a [`QuerySegment`] against
//! a [`Dialect`]. [`QueryBuilder`] binds a dialect and offers the one-call
//! `build_*` forms used by [`QuerySet`](crate::QuerySet) and the record helpers.
//!
//! # Usage
//!
//! ```ignore
//! use qorm::clause::{asc, LimitOffset, OrderBy};
//! use qorm::filter::eq;
//! use qorm::qb::{self, QueryBuilder};
//!
//! let builder = QueryBuilder::for_driver("pgsql");
//!
//! // SELECT
//! let seg = builder.build_select(
//!     "users",
//!     ["id", "name"],
//!     Some(&eq("status", "active")),
//!     Some(&LimitOffset::limit(20)?),
//!     Some(&OrderBy::single(asc("name"))),
//!     false,
//! )?;
//!
//! // INSERT ... RETURNING (on dialects that support it)
//! let seg = builder.build_insert("users", ["name"], vec!["alice".into()], Some("id"))?;
//!
//! // Builder form
//! let seg = qb::delete("users").filter(eq("id", 7)).build(builder.dialect())?;
//! # Ok::<(), qorm::OrmError>(())
//! ```

mod delete;
mod insert;
mod select;
mod traits;
mod update;


pub use delete::DeleteQb;
pub use insert::InsertQb;
pub use select::SelectQb;
pub use traits::SqlQb;
pub use update::UpdateQb;

use crate::clause::{Aggregate, LimitOffset, OrderBy};
use crate::dialect::{self, CommonDialect, Dialect};
use crate::error::OrmResult;
use crate::filter::Filter;
use crate::render;
use crate::segment::QuerySegment;
use crate::value::Value;
use std::sync::Arc;

/// Create a SELECT builder for `table`.
pub fn select(table: &str) -> SelectQb {
    SelectQb::new(table)
}

/// Create an INSERT builder for `table`.
pub fn insert(table: &str) -> InsertQb {
    InsertQb::new(table)
}

/// Create an UPDATE builder for `table`.
pub fn update(table: &str) -> UpdateQb {
    UpdateQb::new(table)
}

/// Create a DELETE builder for `table`.
pub fn delete(table: &str) -> DeleteQb {
    DeleteQb::new(table)
}

/// Statement builder bound to one dialect.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    dialect: Arc<dyn Dialect>,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(Arc::new(CommonDialect))
    }
}

impl QueryBuilder {
    pub fn new(dialect: Arc<dyn Dialect>) -> Self {
        Self { dialect }
    }

    /// Builder for the dialect registered under `driver` (common if unknown).
    pub fn for_driver(driver: &str) -> Self {
        Self::new(dialect::dialect_for(driver))
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    /// `SELECT [DISTINCT] cols FROM table [WHERE] [ORDER BY] [LIMIT/OFFSET]`
    pub fn build_select<I, S>(
        &self,
        table: &str,
        columns: I,
        filter: Option<&Filter>,
        limit_offset: Option<&LimitOffset>,
        order_by: Option<&OrderBy>,
        distinct: bool,
    ) -> OrmResult<QuerySegment>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut qb = SelectQb::new(table).columns(columns).distinct(distinct);
        if let Some(f) = filter {
            qb = qb.filter(f.clone());
        }
        if let Some(lo) = limit_offset {
            qb = qb.limit_offset(*lo);
        }
        if let Some(o) = order_by {
            qb = qb.order_by(o.clone());
        }
        qb.build(self.dialect())
    }

    /// `SELECT fn(col) AS aggregate FROM table [WHERE]`
    pub fn build_select_aggregate(
        &self,
        table: &str,
        aggregate: &Aggregate,
        filter: Option<&Filter>,
    ) -> OrmResult<QuerySegment> {
        let mut qb = SelectQb::new(table).aggregate(aggregate.clone());
        if let Some(f) = filter {
            qb = qb.filter(f.clone());
        }
        qb.build(self.dialect())
    }

    /// `INSERT INTO table (cols) VALUES (?, ...) [RETURNING col]`
    ///
    /// `returning` is dropped silently when the dialect has no RETURNING.
    pub fn build_insert<I, S>(
        &self,
        table: &str,
        columns: I,
        values: Vec<Value>,
        returning: Option<&str>,
    ) -> OrmResult<QuerySegment>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut qb = InsertQb::new(table).columns(columns).values(values);
        if let Some(col) = returning {
            qb = qb.returning(col);
        }
        qb.build(self.dialect())
    }

    /// `UPDATE table SET col = ?, ... [WHERE]`
    pub fn build_update<I, S>(
        &self,
        table: &str,
        columns: I,
        values: Vec<Value>,
        filter: Option<&Filter>,
    ) -> OrmResult<QuerySegment>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut qb = UpdateQb::new(table).set_all(columns, values);
        if let Some(f) = filter {
            qb = qb.filter(f.clone());
        }
        qb.build(self.dialect())
    }

    /// `DELETE FROM table [WHERE]`
    pub fn build_delete(&self, table: &str, filter: Option<&Filter>) -> OrmResult<QuerySegment> {
        let mut qb = DeleteQb::new(table);
        if let Some(f) = filter {
            qb = qb.filter(f.clone());
        }
        qb.build(self.dialect())
    }
}

/// `"a", "b", "c"` with every name quoted.
pub(crate) fn quoted_list(dialect: &dyn Dialect, columns: &[String]) -> OrmResult<String> {
    let quoted = columns
        .iter()
        .map(|c| dialect.quote_identifier(c))
        .collect::<OrmResult<Vec<_>>>()?;
    Ok(quoted.join(", "))
}

/// `WHERE <filter>`, or nothing.
pub(crate) fn where_clause(
    dialect: &dyn Dialect,
    filter: Option<&Filter>,
) -> OrmResult<QuerySegment> {
    match filter {
        Some(f) => Ok(QuerySegment::raw("WHERE").append(render::render(f, dialect)?)),
        None => Ok(QuerySegment::empty()),
    }
}
