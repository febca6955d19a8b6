//! Composable WHERE-clause filters.
//!
//! A [`Filter`] is one of three node kinds:
//!
//! - [`ColumnFilter`]: `column <op> value`, shape-checked at construction
//! - [`CompositeFilter`]: children joined by `AND` / `OR`, nestable
//! - [`RawFilter`]: verbatim SQL with positional arguments
//!
//! Nodes are immutable and reference counted, so cloning a filter (or extending
//! it with [`Filter::and_with`]) shares the existing tree.
//!
//! # Example
//! ```ignore
//! use qorm::filter::{and, between, col, or, raw};
//!
//! let f = and([
//!     col("status", "=", "active")?,
//!     or([between("age", 18, 65), raw("score > ?", vec![10.into()])]),
//! ]);
//! # Ok::<(), qorm::OrmError>(())
//! ```
//!
//! Tuples coerce into column filters through the [`and!`](crate::and) and
//! [`or!`](crate::or) macros:
//! ```ignore
//! let f = qorm::and!(("status", "=", "active"), ("deleted_at", "is null"))?;
//! ```

mod args;
mod column;
mod composite;
mod operand;
mod operator;
mod raw;

#[cfg(test)]
mod tests;

pub use args::{FilterArg, from_args};
pub use column::ColumnFilter;
pub use composite::{CompositeFilter, Junction};
pub use operand::{IntoOperand, Operand};
pub use operator::{Arity, IntoOperator, Operator};
pub use raw::RawFilter;

use crate::dialect::Dialect;
use crate::error::OrmResult;
use crate::segment::QuerySegment;
use crate::value::Value;
use std::sync::Arc;

/// A node in a filter expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Column(Arc<ColumnFilter>),
    Composite(Arc<CompositeFilter>),
    Raw(Arc<RawFilter>),
}

impl Filter {
    /// Conjunction of `self` and `other`.
    ///
    /// A non-empty `AND` composite is extended (sharing its children); anything
    /// else is wrapped in a new two-child `AND`, so an empty composite stays in
    /// the tree and still fails to render.
    pub fn and_with(&self, other: Filter) -> Filter {
        match self {
            Filter::Composite(c) if c.junction() == Junction::And && !c.is_empty() => {
                Filter::Composite(Arc::new(c.with(other)))
            }
            _ => and([self.clone(), other]),
        }
    }

    /// Column names referenced by column filters anywhere in the tree, in
    /// depth-first order. Raw filters contribute nothing.
    pub fn columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Filter::Column(c) => out.push(c.column()),
            Filter::Composite(c) => {
                for child in c.children() {
                    child.collect_columns(out);
                }
            }
            Filter::Raw(_) => {}
        }
    }

    /// Render against `dialect`. See [`crate::render::render`].
    pub fn render(&self, dialect: &dyn Dialect) -> OrmResult<QuerySegment> {
        crate::render::render(self, dialect)
    }
}

impl From<ColumnFilter> for Filter {
    fn from(f: ColumnFilter) -> Self {
        Filter::Column(Arc::new(f))
    }
}

impl From<CompositeFilter> for Filter {
    fn from(f: CompositeFilter) -> Self {
        Filter::Composite(Arc::new(f))
    }
}

impl From<RawFilter> for Filter {
    fn from(f: RawFilter) -> Self {
        Filter::Raw(Arc::new(f))
    }
}

/// `column <op> value`, shape-checked.
pub fn col(
    column: impl Into<String>,
    op: impl IntoOperator,
    value: impl IntoOperand,
) -> OrmResult<Filter> {
    ColumnFilter::new(column, op, value).map(Filter::from)
}

/// A value-less column filter such as `"not null"`.
pub fn unary(column: impl Into<String>, op: impl IntoOperator) -> OrmResult<Filter> {
    ColumnFilter::unary(column, op).map(Filter::from)
}

/// `column = value` (`column IS NULL` when the value is NULL).
pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Filter {
    ColumnFilter::from_parts(column.into(), Operator::Eq, Operand::Scalar(value.into())).into()
}

pub fn is_null(column: impl Into<String>) -> Filter {
    ColumnFilter::from_parts(column.into(), Operator::IsNull, Operand::None).into()
}

pub fn is_not_null(column: impl Into<String>) -> Filter {
    ColumnFilter::from_parts(column.into(), Operator::IsNotNull, Operand::None).into()
}

/// `column IN (...)`; fails on an empty list.
pub fn in_list<V: Into<Value>>(
    column: impl Into<String>,
    values: impl IntoIterator<Item = V>,
) -> OrmResult<Filter> {
    let values: Vec<Value> = values.into_iter().map(Into::into).collect();
    col(column, Operator::In, Operand::List(values))
}

/// `column BETWEEN from AND to`.
pub fn between(
    column: impl Into<String>,
    from: impl Into<Value>,
    to: impl Into<Value>,
) -> Filter {
    ColumnFilter::from_parts(
        column.into(),
        Operator::Between,
        Operand::List(vec![from.into(), to.into()]),
    )
    .into()
}

/// Verbatim SQL condition with positional arguments.
pub fn raw(sql: impl Into<String>, args: Vec<Value>) -> Filter {
    RawFilter::new(sql, args).into()
}

/// Verbatim SQL condition without arguments.
pub fn raw_sql(sql: impl Into<String>) -> Filter {
    RawFilter::new(sql, Vec::new()).into()
}

/// `AND` of `filters`.
pub fn and(filters: impl IntoIterator<Item = Filter>) -> Filter {
    CompositeFilter::and(filters).into()
}

/// `OR` of `filters`.
pub fn or(filters: impl IntoIterator<Item = Filter>) -> Filter {
    CompositeFilter::or(filters).into()
}

/// Anything that can become a [`Filter`]: filter nodes, `(column, op)` and
/// `(column, op, value)` tuples, or the result of a fallible factory.
pub trait IntoFilter {
    fn into_filter(self) -> OrmResult<Filter>;
}

impl IntoFilter for Filter {
    fn into_filter(self) -> OrmResult<Filter> {
        Ok(self)
    }
}

impl IntoFilter for OrmResult<Filter> {
    fn into_filter(self) -> OrmResult<Filter> {
        self
    }
}

impl IntoFilter for ColumnFilter {
    fn into_filter(self) -> OrmResult<Filter> {
        Ok(self.into())
    }
}

impl IntoFilter for CompositeFilter {
    fn into_filter(self) -> OrmResult<Filter> {
        Ok(self.into())
    }
}

impl IntoFilter for RawFilter {
    fn into_filter(self) -> OrmResult<Filter> {
        Ok(self.into())
    }
}

impl<C: Into<String>, O: IntoOperator> IntoFilter for (C, O) {
    fn into_filter(self) -> OrmResult<Filter> {
        unary(self.0, self.1)
    }
}

impl<C: Into<String>, O: IntoOperator, V: IntoOperand> IntoFilter for (C, O, V) {
    fn into_filter(self) -> OrmResult<Filter> {
        col(self.0, self.1, self.2)
    }
}

/// Build a composite from fallible children, failing on the first error.
/// Backs the [`and!`](crate::and) and [`or!`](crate::or) macros.
pub fn try_composite(junction: Junction, children: Vec<OrmResult<Filter>>) -> OrmResult<Filter> {
    let children = children.into_iter().collect::<OrmResult<Vec<_>>>()?;
    Ok(CompositeFilter::new(junction, children).into())
}

/// `AND` of filters and filter tuples.
///
/// ```ignore
/// let f = qorm::and!(("age", ">=", 18), qorm::filter::is_not_null("email"))?;
/// ```
#[macro_export]
macro_rules! and {
    ($($f:expr),* $(,)?) => {
        $crate::filter::try_composite(
            $crate::filter::Junction::And,
            ::std::vec![$($crate::filter::IntoFilter::into_filter($f)),*],
        )
    };
}

/// `OR` of filters and filter tuples.
#[macro_export]
macro_rules! or {
    ($($f:expr),* $(,)?) => {
        $crate::filter::try_composite(
            $crate::filter::Junction::Or,
            ::std::vec![$($crate::filter::IntoFilter::into_filter($f)),*],
        )
    };
}

/// Infer a filter from one to three loosely-typed arguments.
///
/// | arguments                | result                          |
/// |--------------------------|---------------------------------|
/// | `filter`                 | passed through                  |
/// | `[column, op, value?]`   | column filter                   |
/// | `"sql"`                  | raw filter, no arguments        |
/// | `"column", "op"`         | value-less column filter        |
/// | `"sql", [args]`          | raw filter with arguments       |
/// | `column, op, value`      | column filter                   |
///
/// ```ignore
/// let f = qorm::filter!("age", ">", 18)?;
/// let g = qorm::filter!("score > ?", vec![10])?;
/// ```
#[macro_export]
macro_rules! filter {
    ($($arg:expr),+ $(,)?) => {
        $crate::filter::from_args(::std::vec![$($crate::filter::FilterArg::from($arg)),+])
    };
}
