//! Column comparison operators.

use crate::error::{OrmError, OrmResult};
use std::fmt;
use std::str::FromStr;

/// The fixed catalogue of column operations.
///
/// Tokens are matched case-insensitively with runs of whitespace collapsed, so
/// `"not  like"` and `"NOT LIKE"` parse to the same operator.
///
/// # Example
/// ```ignore
/// use qorm::Operator;
///
/// assert_eq!(Operator::parse("not null")?, Operator::IsNotNull);
/// assert_eq!(Operator::parse("!=")?.as_str(), "<>");
/// # Ok::<(), qorm::OrmError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Equal: column = value
    Eq,
    /// Not equal: column <> value (also accepts `!=`)
    Ne,
    /// Greater than: column > value
    Gt,
    /// Greater than or equal: column >= value
    Gte,
    /// Less than: column < value
    Lt,
    /// Less than or equal: column <= value
    Lte,
    /// LIKE pattern match
    Like,
    /// NOT LIKE pattern match
    NotLike,
    /// Case-insensitive LIKE, rendered by the active dialect
    ILike,
    /// IN (list)
    In,
    /// NOT IN (list)
    NotIn,
    /// IS NULL
    IsNull,
    /// IS NOT NULL
    IsNotNull,
    /// BETWEEN a AND b
    Between,
}

/// The value shape an operator requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// No value; any supplied value is ignored.
    Unary,
    /// A single scalar.
    Scalar,
    /// A non-empty list.
    List,
    /// A list of exactly two values.
    Pair,
}

impl Operator {
    /// Parse an operation token.
    pub fn parse(token: &str) -> OrmResult<Self> {
        let normalized = token
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();

        let op = match normalized.as_str() {
            "=" | "==" => Operator::Eq,
            "<>" | "!=" => Operator::Ne,
            ">" => Operator::Gt,
            ">=" => Operator::Gte,
            "<" => Operator::Lt,
            "<=" => Operator::Lte,
            "LIKE" => Operator::Like,
            "NOT LIKE" => Operator::NotLike,
            "ILIKE" => Operator::ILike,
            "IN" => Operator::In,
            "NOT IN" => Operator::NotIn,
            "IS NULL" | "NULL" => Operator::IsNull,
            "IS NOT NULL" | "NOT NULL" => Operator::IsNotNull,
            "BETWEEN" => Operator::Between,
            _ => {
                return Err(OrmError::invalid_filter(format!(
                    "unknown operation '{token}'"
                )));
            }
        };
        Ok(op)
    }

    /// Canonical SQL token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::ILike => "ILIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
            Operator::Between => "BETWEEN",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Operator::IsNull | Operator::IsNotNull => Arity::Unary,
            Operator::In | Operator::NotIn => Arity::List,
            Operator::Between => Arity::Pair,
            _ => Arity::Scalar,
        }
    }

    /// Whether comparing against NULL is meaningful (only `=` and `<>`, which
    /// are rewritten to the NULL checks).
    pub fn accepts_null(&self) -> bool {
        matches!(self, Operator::Eq | Operator::Ne)
    }
}

impl FromStr for Operator {
    type Err = OrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::parse(s)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversion into an [`Operator`]: either an already-typed operator or a token.
pub trait IntoOperator {
    fn into_operator(self) -> OrmResult<Operator>;
}

impl IntoOperator for Operator {
    fn into_operator(self) -> OrmResult<Operator> {
        Ok(self)
    }
}

impl IntoOperator for &str {
    fn into_operator(self) -> OrmResult<Operator> {
        Operator::parse(self)
    }
}

impl IntoOperator for String {
    fn into_operator(self) -> OrmResult<Operator> {
        Operator::parse(&self)
    }
}

impl IntoOperator for &String {
    fn into_operator(self) -> OrmResult<Operator> {
        Operator::parse(self)
    }
}
