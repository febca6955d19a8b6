//! Immutable, chainable queries over one model.
//!
//! Every chaining call returns a new [`QuerySet`]; the filter tree is shared
//! between the old and new value. Column references are checked against the
//! model's [`Metadata`] as they are added.
//!
//! ```ignore
//! use qorm::clause::Direction;
//!
//! let adults = orm
//!     .query::<User>()?
//!     .filter(("age", ">=", 18))?
//!     .filter(qorm::filter::is_not_null("email"))?
//!     .order_by("name", Direction::Asc)?
//!     .limit(20, Some(40))?;
//!
//! let page: Vec<User> = adults.fetch(&client).await?;
//! let total = adults.count(&client, None).await?;
//! ```

use crate::clause::{Aggregate, AggregateFunc, Direction, LimitOffset, OrderBy, OrderTerm};
use crate::error::{OrmError, OrmResult};
use crate::executor::Executor;
use crate::filter::{Filter, IntoFilter};
use crate::metadata::Metadata;
use crate::model::primary_key_filter;
use crate::qb::QueryBuilder;
use crate::row::{FromRow, FromValue, Row};
use crate::segment::QuerySegment;
use crate::value::Value;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A query over the table of `T`, not yet executed.
pub struct QuerySet<T> {
    meta: Arc<Metadata>,
    builder: QueryBuilder,
    filter: Option<Filter>,
    order_by: Option<OrderBy>,
    limit: Option<LimitOffset>,
    distinct: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for QuerySet<T> {
    fn clone(&self) -> Self {
        Self {
            meta: self.meta.clone(),
            builder: self.builder.clone(),
            filter: self.filter.clone(),
            order_by: self.order_by.clone(),
            limit: self.limit,
            distinct: self.distinct,
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for QuerySet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerySet")
            .field("table", &self.meta.table())
            .field("filter", &self.filter)
            .field("order_by", &self.order_by)
            .field("limit", &self.limit)
            .field("distinct", &self.distinct)
            .finish()
    }
}

impl<T> QuerySet<T> {
    pub fn new(meta: Arc<Metadata>, builder: QueryBuilder) -> Self {
        Self {
            meta,
            builder,
            filter: None,
            order_by: None,
            limit: None,
            distinct: false,
            _marker: PhantomData,
        }
    }

    pub fn metadata(&self) -> &Metadata {
        &self.meta
    }

    /// The accumulated filter, if any.
    pub fn current_filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    pub fn current_order_by(&self) -> Option<&OrderBy> {
        self.order_by.as_ref()
    }

    pub fn current_limit(&self) -> Option<LimitOffset> {
        self.limit
    }

    /// AND another condition onto the WHERE clause.
    ///
    /// Fails with [`OrmError::UnknownColumn`] if a column filter names a
    /// column the model does not have. Raw filters are not checked.
    pub fn filter(&self, filter: impl IntoFilter) -> OrmResult<Self> {
        let filter = filter.into_filter()?;
        for column in filter.columns() {
            self.meta.check_column(column)?;
        }
        let mut next = self.clone();
        next.filter = Some(match &self.filter {
            Some(existing) => existing.and_with(filter),
            None => filter,
        });
        Ok(next)
    }

    /// Restrict to the row whose primary key equals `values` (in key order).
    pub fn filter_pk<V: Into<Value>>(
        &self,
        values: impl IntoIterator<Item = V>,
    ) -> OrmResult<Self> {
        let values = values.into_iter().map(Into::into).collect();
        self.filter(primary_key_filter(&self.meta, values)?)
    }

    /// Append one ORDER BY term.
    pub fn order_by(&self, column: &str, direction: Direction) -> OrmResult<Self> {
        self.meta.check_column(column)?;
        let term = OrderTerm::new(column, direction);
        let mut next = self.clone();
        next.order_by = Some(match &self.order_by {
            Some(existing) => existing.then(term),
            None => OrderBy::single(term),
        });
        Ok(next)
    }

    pub fn order_by_asc(&self, column: &str) -> OrmResult<Self> {
        self.order_by(column, Direction::Asc)
    }

    pub fn order_by_desc(&self, column: &str) -> OrmResult<Self> {
        self.order_by(column, Direction::Desc)
    }

    /// Replace LIMIT / OFFSET.
    pub fn limit(&self, limit: i64, offset: Option<i64>) -> OrmResult<Self> {
        let mut next = self.clone();
        next.limit = Some(LimitOffset::new(limit, offset)?);
        Ok(next)
    }

    /// Select distinct rows.
    pub fn distinct(&self) -> Self {
        let mut next = self.clone();
        next.distinct = true;
        next
    }

    fn check_columns<S: AsRef<str>>(&self, columns: &[S]) -> OrmResult<()> {
        columns
            .iter()
            .try_for_each(|c| self.meta.check_column(c.as_ref()))
    }

    /// The SELECT for [`fetch`](Self::fetch): every model column.
    pub fn select_segment(&self) -> OrmResult<QuerySegment> {
        self.select_columns_segment(self.meta.columns(), self.limit)
    }

    fn select_columns_segment<S: AsRef<str>>(
        &self,
        columns: &[S],
        limit: Option<LimitOffset>,
    ) -> OrmResult<QuerySegment> {
        let columns: Vec<&str> = columns.iter().map(AsRef::<str>::as_ref).collect();
        self.builder.build_select(
            self.meta.table(),
            columns,
            self.filter.as_ref(),
            limit.as_ref(),
            self.order_by.as_ref(),
            self.distinct,
        )
    }

    /// The SELECT for an aggregate over the current filter.
    pub fn aggregate_segment(&self, aggregate: &Aggregate) -> OrmResult<QuerySegment> {
        if !aggregate.is_star() {
            self.meta.check_column(aggregate.column())?;
        }
        self.builder
            .build_select_aggregate(self.meta.table(), aggregate, self.filter.as_ref())
    }

    /// The UPDATE for [`update`](Self::update).
    pub fn update_segment<I, C, V>(&self, values: I) -> OrmResult<QuerySegment>
    where
        I: IntoIterator<Item = (C, V)>,
        C: AsRef<str>,
        V: Into<Value>,
    {
        let (columns, values): (Vec<String>, Vec<Value>) = values
            .into_iter()
            .map(|(c, v)| (c.as_ref().to_string(), v.into()))
            .unzip();
        if columns.is_empty() {
            return Err(OrmError::invalid_query("update requires at least one column"));
        }
        self.check_columns(&columns)?;
        self.builder
            .build_update(self.meta.table(), &columns, values, self.filter.as_ref())
    }

    /// The DELETE for [`delete`](Self::delete).
    pub fn delete_segment(&self) -> OrmResult<QuerySegment> {
        self.builder
            .build_delete(self.meta.table(), self.filter.as_ref())
    }

    /// All matching rows, untyped.
    pub async fn fetch_rows(&self, ex: &impl Executor) -> OrmResult<Vec<Row>> {
        let seg = self.select_segment()?;
        ex.query(seg.sql(), seg.args()).await
    }

    /// Matching rows restricted to `columns`, keyed by column name. An empty
    /// list selects every model column.
    pub async fn values<S: AsRef<str>>(
        &self,
        ex: &impl Executor,
        columns: &[S],
    ) -> OrmResult<Vec<Row>> {
        self.check_columns(columns)?;
        let seg = if columns.is_empty() {
            self.select_segment()?
        } else {
            self.select_columns_segment(columns, self.limit)?
        };
        ex.query(seg.sql(), seg.args()).await
    }

    /// Like [`values`](Self::values), as positional tuples.
    pub async fn values_list<S: AsRef<str>>(
        &self,
        ex: &impl Executor,
        columns: &[S],
    ) -> OrmResult<Vec<Vec<Value>>> {
        let rows = self.values(ex, columns).await?;
        Ok(rows.into_iter().map(Row::into_values).collect())
    }

    async fn aggregate(&self, ex: &impl Executor, aggregate: Aggregate) -> OrmResult<Value> {
        let seg = self.aggregate_segment(&aggregate)?;
        let rows = ex.query(seg.sql(), seg.args()).await?;
        Ok(rows
            .first()
            .and_then(|row| row.get("aggregate").or_else(|| row.get_index(0)))
            .cloned()
            .unwrap_or(Value::Null))
    }

    /// `COUNT(*)`, or `COUNT(column)` (`COUNT(DISTINCT column)` on a distinct
    /// query set).
    pub async fn count(&self, ex: &impl Executor, column: Option<&str>) -> OrmResult<i64> {
        let aggregate = match column {
            None | Some("*") => Aggregate::count_all(),
            Some(c) if self.distinct => Aggregate::count_distinct(c)?,
            Some(c) => Aggregate::new(AggregateFunc::Count, c)?,
        };
        let value = self.aggregate(ex, aggregate).await?;
        if value.is_null() {
            return Ok(0);
        }
        i64::from_value(&value)
            .map_err(|message| OrmError::decode("aggregate", message))
    }

    pub async fn avg(&self, ex: &impl Executor, column: &str) -> OrmResult<Value> {
        self.aggregate(ex, Aggregate::new(AggregateFunc::Avg, column)?)
            .await
    }

    pub async fn min(&self, ex: &impl Executor, column: &str) -> OrmResult<Value> {
        self.aggregate(ex, Aggregate::new(AggregateFunc::Min, column)?)
            .await
    }

    pub async fn max(&self, ex: &impl Executor, column: &str) -> OrmResult<Value> {
        self.aggregate(ex, Aggregate::new(AggregateFunc::Max, column)?)
            .await
    }

    pub async fn sum(&self, ex: &impl Executor, column: &str) -> OrmResult<Value> {
        self.aggregate(ex, Aggregate::new(AggregateFunc::Sum, column)?)
            .await
    }

    /// Whether any row matches.
    pub async fn exists(&self, ex: &impl Executor) -> OrmResult<bool> {
        let probe: Vec<&str> = self
            .meta
            .primary_key()
            .first()
            .or_else(|| self.meta.columns().first())
            .map(String::as_str)
            .into_iter()
            .collect();
        let seg = self.select_columns_segment(&probe, Some(self.limit_keeping_offset(1)?))?;
        Ok(!ex.query(seg.sql(), seg.args()).await?.is_empty())
    }

    /// `n` rows at the current offset.
    fn limit_keeping_offset(&self, n: i64) -> OrmResult<LimitOffset> {
        LimitOffset::new(n, self.limit.and_then(|lo| lo.get_offset()))
    }

    /// `UPDATE ... SET` on every match, returning the affected row count.
    /// Ordering and limit are ignored.
    pub async fn update<I, C, V>(&self, ex: &impl Executor, values: I) -> OrmResult<u64>
    where
        I: IntoIterator<Item = (C, V)>,
        C: AsRef<str>,
        V: Into<Value>,
    {
        let seg = self.update_segment(values)?;
        ex.execute(seg.sql(), seg.args()).await
    }

    /// Delete every match. Ordering and limit are ignored.
    pub async fn delete(&self, ex: &impl Executor) -> OrmResult<u64> {
        let seg = self.delete_segment()?;
        ex.execute(seg.sql(), seg.args()).await
    }
}

impl<T: FromRow> QuerySet<T> {
    /// All matching rows.
    pub async fn fetch(&self, ex: &impl Executor) -> OrmResult<Vec<T>> {
        self.fetch_rows(ex)
            .await?
            .iter()
            .map(T::from_row)
            .collect()
    }

    /// The first matching row, if any.
    pub async fn first(&self, ex: &impl Executor) -> OrmResult<Option<T>> {
        let limit = self.limit_keeping_offset(1)?;
        let seg = self.select_columns_segment(self.meta.columns(), Some(limit))?;
        let rows = ex.query(seg.sql(), seg.args()).await?;
        rows.first().map(T::from_row).transpose()
    }

    /// Exactly one matching row.
    ///
    /// Fails with [`OrmError::TooManyRows`] when more than one row matches, and
    /// with [`OrmError::NoRows`] when none does unless `allow_empty` is set.
    pub async fn single(&self, ex: &impl Executor, allow_empty: bool) -> OrmResult<Option<T>> {
        let limit = self.limit_keeping_offset(2)?;
        let seg = self.select_columns_segment(self.meta.columns(), Some(limit))?;
        let rows = ex.query(seg.sql(), seg.args()).await?;
        match rows.as_slice() {
            [] if allow_empty => Ok(None),
            [] => Err(OrmError::no_rows(format!(
                "no '{}' row matched",
                self.meta.type_name()
            ))),
            [row] => T::from_row(row).map(Some),
            more => Err(OrmError::too_many_rows(1, more.len())),
        }
    }
}
