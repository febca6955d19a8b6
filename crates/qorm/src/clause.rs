//! ORDER BY, LIMIT/OFFSET, and aggregate clauses.

use crate::error::{OrmError, OrmResult};
use std::fmt;
use std::str::FromStr;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl FromStr for Direction {
    type Err = OrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(Direction::Asc),
            "DESC" => Ok(Direction::Desc),
            _ => Err(OrmError::invalid_query(format!(
                "unknown sort direction '{s}'"
            ))),
        }
    }
}

/// One `(column, direction)` entry of an ORDER BY clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTerm {
    pub column: String,
    pub direction: Direction,
}

impl OrderTerm {
    pub fn new(column: impl Into<String>, direction: Direction) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

/// Ascending order term.
pub fn asc(column: impl Into<String>) -> OrderTerm {
    OrderTerm::new(column, Direction::Asc)
}

/// Descending order term.
pub fn desc(column: impl Into<String>) -> OrderTerm {
    OrderTerm::new(column, Direction::Desc)
}

/// A non-empty ORDER BY clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    terms: Vec<OrderTerm>,
}

impl OrderBy {
    /// Build from at least one term.
    pub fn new(terms: impl IntoIterator<Item = OrderTerm>) -> OrmResult<Self> {
        let terms: Vec<OrderTerm> = terms.into_iter().collect();
        if terms.is_empty() {
            return Err(OrmError::invalid_query(
                "ORDER BY requires at least one column",
            ));
        }
        Ok(Self { terms })
    }

    /// A one-term clause.
    pub fn single(term: OrderTerm) -> Self {
        Self { terms: vec![term] }
    }

    /// A new clause with `term` appended.
    pub fn then(&self, term: OrderTerm) -> Self {
        let mut terms = self.terms.clone();
        terms.push(term);
        Self { terms }
    }

    pub fn terms(&self) -> &[OrderTerm] {
        &self.terms
    }
}

/// LIMIT with an optional OFFSET. Both are non-negative.
///
/// An offset without a limit is not representable; use
/// [`LimitOffset::from_parts`] when both sides are optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitOffset {
    limit: i64,
    offset: Option<i64>,
}

impl LimitOffset {
    pub fn new(limit: i64, offset: Option<i64>) -> OrmResult<Self> {
        if limit < 0 {
            return Err(OrmError::invalid_query(format!(
                "LIMIT must be non-negative, got {limit}"
            )));
        }
        if let Some(offset) = offset {
            if offset < 0 {
                return Err(OrmError::invalid_query(format!(
                    "OFFSET must be non-negative, got {offset}"
                )));
            }
        }
        Ok(Self { limit, offset })
    }

    /// `LIMIT n` alone.
    pub fn limit(limit: i64) -> OrmResult<Self> {
        Self::new(limit, None)
    }

    /// Build from two optional parts. `(None, None)` yields `None`; an offset
    /// without a limit fails.
    pub fn from_parts(limit: Option<i64>, offset: Option<i64>) -> OrmResult<Option<Self>> {
        match (limit, offset) {
            (None, None) => Ok(None),
            (None, Some(_)) => Err(OrmError::invalid_query(
                "OFFSET requires a LIMIT",
            )),
            (Some(limit), offset) => Self::new(limit, offset).map(Some),
        }
    }

    pub fn get_limit(&self) -> i64 {
        self.limit
    }

    pub fn get_offset(&self) -> Option<i64> {
        self.offset
    }
}

/// Aggregate function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFunc {
    Avg,
    Max,
    Min,
    Sum,
    Count,
}

impl AggregateFunc {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateFunc::Avg => "AVG",
            AggregateFunc::Max => "MAX",
            AggregateFunc::Min => "MIN",
            AggregateFunc::Sum => "SUM",
            AggregateFunc::Count => "COUNT",
        }
    }
}

impl FromStr for AggregateFunc {
    type Err = OrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "avg" => Ok(AggregateFunc::Avg),
            "max" => Ok(AggregateFunc::Max),
            "min" => Ok(AggregateFunc::Min),
            "sum" => Ok(AggregateFunc::Sum),
            "count" => Ok(AggregateFunc::Count),
            _ => Err(OrmError::invalid_query(format!(
                "unknown aggregate function '{s}'"
            ))),
        }
    }
}

impl fmt::Display for AggregateFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An aggregate over one column (`*` only for COUNT).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    func: AggregateFunc,
    column: String,
    distinct: bool,
}

impl Aggregate {
    pub fn new(func: AggregateFunc, column: impl Into<String>) -> OrmResult<Self> {
        let column = column.into();
        if column == "*" && func != AggregateFunc::Count {
            return Err(OrmError::invalid_query(format!(
                "{func}(*) is not allowed, only COUNT(*)"
            )));
        }
        Ok(Self {
            func,
            column,
            distinct: false,
        })
    }

    /// `COUNT(*)`.
    pub fn count_all() -> Self {
        Self {
            func: AggregateFunc::Count,
            column: "*".to_string(),
            distinct: false,
        }
    }

    /// `COUNT(DISTINCT column)`.
    pub fn count_distinct(column: impl Into<String>) -> OrmResult<Self> {
        let mut agg = Self::new(AggregateFunc::Count, column)?;
        if agg.is_star() {
            return Err(OrmError::invalid_query("COUNT(DISTINCT *) is not allowed"));
        }
        agg.distinct = true;
        Ok(agg)
    }

    pub fn func(&self) -> AggregateFunc {
        self.func
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn is_star(&self) -> bool {
        self.column == "*"
    }
}
