//! DELETE statement builder.

use crate::dialect::Dialect;
use crate::error::OrmResult;
use crate::filter::Filter;
use crate::qb::traits::SqlQb;
use crate::qb::where_clause;
use crate::segment::QuerySegment;

/// DELETE builder. Without a filter the whole table is cleared.
#[derive(Clone, Debug)]
pub struct DeleteQb {
    table: String,
    filter: Option<Filter>,
}

impl DeleteQb {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            filter: None,
        }
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

impl SqlQb for DeleteQb {
    fn build(&self, dialect: &dyn Dialect) -> OrmResult<QuerySegment> {
        let mut seg = QuerySegment::raw(format!(
            "DELETE FROM {}",
            dialect.quote_identifier(&self.table)?
        ));
        seg.push(where_clause(dialect, self.filter.as_ref())?);
        Ok(seg)
    }
}
