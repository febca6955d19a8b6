//! SELECT statement builder.

use crate::clause::{Aggregate, LimitOffset, OrderBy, OrderTerm};
use crate::dialect::Dialect;
use crate::error::OrmResult;
use crate::filter::Filter;
use crate::qb::traits::SqlQb;
use crate::qb::{quoted_list, where_clause};
use crate::segment::QuerySegment;

/// SELECT builder.
///
/// With an [`Aggregate`] set, the column list is replaced by
/// `fn(col) AS aggregate` and ORDER BY / LIMIT are not emitted.
#[derive(Clone, Debug)]
pub struct SelectQb {
    table: String,
    columns: Vec<String>,
    distinct: bool,
    aggregate: Option<Aggregate>,
    filter: Option<Filter>,
    order_by: Option<OrderBy>,
    limit_offset: Option<LimitOffset>,
}

impl SelectQb {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: Vec::new(),
            distinct: false,
            aggregate: None,
            filter: None,
            order_by: None,
            limit_offset: None,
        }
    }

    /// Replace the column list. An empty list selects `*`.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.columns = columns.into_iter().map(|c| c.as_ref().to_string()).collect();
        self
    }

    pub fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    pub fn aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregate = Some(aggregate);
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

    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    /// Append one ORDER BY term.
    pub fn then_order_by(mut self, term: OrderTerm) -> Self {
        self.order_by = Some(match self.order_by.take() {
            Some(existing) => existing.then(term),
            None => OrderBy::single(term),
        });
        self
    }

    pub fn limit_offset(mut self, limit_offset: LimitOffset) -> Self {
        self.limit_offset = Some(limit_offset);
        self
    }

    fn select_list(&self, dialect: &dyn Dialect) -> OrmResult<String> {
        if let Some(agg) = &self.aggregate {
            let target = if agg.is_star() {
                "*".to_string()
            } else {
                dialect.quote_identifier(agg.column())?
            };
            let distinct = if agg.is_distinct() { "DISTINCT " } else { "" };
            return Ok(format!("{}({distinct}{target}) AS aggregate", agg.func()));
        }
        if self.columns.is_empty() {
            return Ok("*".to_string());
        }
        quoted_list(dialect, &self.columns)
    }

    fn order_by_clause(&self, dialect: &dyn Dialect) -> OrmResult<QuerySegment> {
        let Some(order_by) = &self.order_by else {
            return Ok(QuerySegment::empty());
        };
        let terms = order_by
            .terms()
            .iter()
            .map(|t| {
                dialect
                    .quote_identifier(&t.column)
                    .map(|c| format!("{c} {}", t.direction.as_str()))
            })
            .collect::<OrmResult<Vec<_>>>()?;
        Ok(QuerySegment::raw(format!("ORDER BY {}", terms.join(", "))))
    }
}

impl SqlQb for SelectQb {
    fn build(&self, dialect: &dyn Dialect) -> OrmResult<QuerySegment> {
        let head = if self.distinct && self.aggregate.is_none() {
            "SELECT DISTINCT"
        } else {
            "SELECT"
        };

        let mut seg = QuerySegment::raw(head);
        seg.push(QuerySegment::raw(self.select_list(dialect)?));
        seg.push(QuerySegment::raw("FROM"));
        seg.push(QuerySegment::raw(dialect.quote_identifier(&self.table)?));
        seg.push(where_clause(dialect, self.filter.as_ref())?);

        if self.aggregate.is_none() {
            seg.push(self.order_by_clause(dialect)?);
            if let Some(lo) = &self.limit_offset {
                seg.push(dialect.limit_offset(lo)?);
            }
        }
        Ok(seg)
    }
}
