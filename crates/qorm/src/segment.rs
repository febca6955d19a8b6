//! Composable SQL fragments with positional arguments.
//!
//! A [`QuerySegment`] pairs SQL text containing `?` placeholders with the values
//! bound to them, in order. Segments combine by concatenating text with a single
//! space and concatenating arguments, so placeholder order and argument order
//! stay in lockstep no matter how a statement is assembled.
//!
//! # Example
//! ```ignore
//! use qorm::{QuerySegment, Value};
//!
//! let cond = QuerySegment::new("\"age\" > ?", vec![Value::Int(18)]);
//! let stmt = QuerySegment::raw("SELECT * FROM \"users\" WHERE").append(cond);
//! assert_eq!(stmt.sql(), "SELECT * FROM \"users\" WHERE \"age\" > ?");
//! ```

use crate::value::Value;
use std::fmt;
use std::ops::Add;

/// SQL text plus its positional arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySegment {
    sql: String,
    args: Vec<Value>,
}

impl QuerySegment {
    /// The identity segment: empty text, no arguments.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a segment from text and arguments.
    pub fn new(sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }

    /// Create a segment with no arguments.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::new(sql, Vec::new())
    }

    /// A single `?` placeholder bound to `value`.
    pub fn bind(value: impl Into<Value>) -> Self {
        Self::new("?", vec![value.into()])
    }

    /// The SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The positional arguments, parallel to the `?` placeholders.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Split into `(sql, args)`.
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.args)
    }

    /// Whether this is the identity segment.
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty() && self.args.is_empty()
    }

    /// Combine in place: `self + " " + other`.
    pub fn push(&mut self, other: QuerySegment) -> &mut Self {
        if !other.sql.is_empty() {
            if !self.sql.is_empty() {
                self.sql.push(' ');
            }
            self.sql.push_str(&other.sql);
        }
        self.args.extend(other.args);
        self
    }

    /// Combine, consuming both: `self + " " + other`.
    pub fn append(mut self, other: QuerySegment) -> Self {
        self.push(other);
        self
    }

    /// Append raw text (no arguments) with a separating space.
    pub fn append_raw(self, sql: &str) -> Self {
        self.append(QuerySegment::raw(sql))
    }

    /// Fold a sequence of segments left to right.
    pub fn reduce(segments: impl IntoIterator<Item = QuerySegment>) -> Self {
        segments
            .into_iter()
            .fold(QuerySegment::empty(), QuerySegment::append)
    }

    /// Combine segments with `separator` between each adjacent pair.
    pub fn implode(
        separator: &QuerySegment,
        segments: impl IntoIterator<Item = QuerySegment>,
    ) -> Self {
        let mut out = QuerySegment::empty();
        for (i, segment) in segments.into_iter().enumerate() {
            if i > 0 {
                out.push(separator.clone());
            }
            out.push(segment);
        }
        out
    }

    /// Join segments with `", "` (no leading space before the comma).
    pub fn comma_list(segments: impl IntoIterator<Item = QuerySegment>) -> Self {
        let mut out = QuerySegment::empty();
        for (i, segment) in segments.into_iter().enumerate() {
            if i > 0 {
                out.sql.push_str(", ");
            }
            out.sql.push_str(&segment.sql);
            out.args.extend(segment.args);
        }
        out
    }

    /// Wrap the text in parentheses, leaving the arguments untouched.
    pub fn embrace(self) -> Self {
        Self {
            sql: format!("({})", self.sql),
            args: self.args,
        }
    }
}

impl Add for QuerySegment {
    type Output = QuerySegment;

    fn add(self, rhs: QuerySegment) -> QuerySegment {
        self.append(rhs)
    }
}

impl FromIterator<QuerySegment> for QuerySegment {
    fn from_iter<I: IntoIterator<Item = QuerySegment>>(iter: I) -> Self {
        QuerySegment::reduce(iter)
    }
}

impl fmt::Display for QuerySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(sql: &str, args: &[i64]) -> QuerySegment {
        QuerySegment::new(sql, args.iter().copied().map(Value::Int).collect())
    }

    #[test]
    fn empty_is_identity() {
        let a = seg("a = ?", &[1]);
        assert_eq!(QuerySegment::empty().append(a.clone()), a);
        assert_eq!(a.clone().append(QuerySegment::empty()), a);
    }

    #[test]
    fn append_joins_with_single_space() {
        let s = seg("a = ?", &[1]) + seg("AND b = ?", &[2]);
        assert_eq!(s.sql(), "a = ? AND b = ?");
        assert_eq!(s.args(), &[Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn reduce_folds_left_to_right() {
        let s: QuerySegment = vec![seg("x", &[1]), seg("y", &[2]), seg("z", &[3])]
            .into_iter()
            .collect();
        assert_eq!(s.sql(), "x y z");
        assert_eq!(s.args(), &[Value::Int(1), Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn implode_places_separator_between_pairs() {
        let sep = QuerySegment::raw("OR");
        let s = QuerySegment::implode(&sep, vec![seg("a = ?", &[1]), seg("b = ?", &[2])]);
        assert_eq!(s.sql(), "a = ? OR b = ?");
        assert_eq!(s.args().len(), 2);

        let single = QuerySegment::implode(&sep, vec![seg("a = ?", &[1])]);
        assert_eq!(single.sql(), "a = ?");
    }

    #[test]
    fn implode_of_nothing_is_empty() {
        let s = QuerySegment::implode(&QuerySegment::raw("AND"), Vec::new());
        assert!(s.is_empty());
    }

    #[test]
    fn comma_list_keeps_args_in_order() {
        let s = QuerySegment::comma_list(vec![seg("?", &[4]), seg("?", &[5])]);
        assert_eq!(s.sql(), "?, ?");
        assert_eq!(s.args(), &[Value::Int(4), Value::Int(5)]);
    }

    #[test]
    fn embrace_wraps_text_only() {
        let s = seg("a = ? OR b = ?", &[1, 2]).embrace();
        assert_eq!(s.sql(), "(a = ? OR b = ?)");
        assert_eq!(s.args().len(), 2);
    }
}
