use super::operand::{IntoOperand, Operand};
use super::operator::{Arity, IntoOperator, Operator};
use crate::error::{OrmError, OrmResult};
use crate::value::Value;

/// A comparison between one column and an operation-dependent value.
///
/// The value shape is checked against the operator when the filter is built,
/// so a `ColumnFilter` that exists is always renderable (up to identifier
/// quoting of the column name).
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFilter {
    column: String,
    op: Operator,
    operand: Operand,
}

impl ColumnFilter {
    /// Build a column filter, validating the value shape for `op`.
    pub fn new(
        column: impl Into<String>,
        op: impl IntoOperator,
        value: impl IntoOperand,
    ) -> OrmResult<Self> {
        let column = column.into();
        let op = op.into_operator()?;
        let operand = check_shape(&column, op, value.into_operand())?;
        Ok(Self {
            column,
            op,
            operand,
        })
    }

    /// Build a value-less filter (`IS NULL`, `IS NOT NULL`).
    pub fn unary(column: impl Into<String>, op: impl IntoOperator) -> OrmResult<Self> {
        Self::new(column, op, ())
    }

    /// The (unquoted) column name.
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn op(&self) -> Operator {
        self.op
    }

    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    pub(crate) fn from_parts(column: String, op: Operator, operand: Operand) -> Self {
        Self {
            column,
            op,
            operand,
        }
    }
}

fn check_shape(column: &str, op: Operator, operand: Operand) -> OrmResult<Operand> {
    let expected = match (op.arity(), &operand) {
        (Arity::Unary, _) => return Ok(Operand::None),
        (Arity::Scalar, Operand::Scalar(Value::Null)) if !op.accepts_null() => {
            "a non-NULL scalar"
        }
        (Arity::Scalar, Operand::Scalar(_)) => return Ok(operand),
        (Arity::Scalar, _) => "a scalar",
        (Arity::List, Operand::List(vs)) if !vs.is_empty() => return Ok(operand),
        (Arity::List, _) => "a non-empty list",
        (Arity::Pair, Operand::List(vs)) if vs.len() == 2 => return Ok(operand),
        (Arity::Pair, _) => "a list of exactly 2 values",
    };

    Err(OrmError::invalid_filter(format!(
        "'{column}' {op} expects {expected}, got {}",
        operand.describe()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_ops_reject_lists_and_missing_values() {
        assert!(ColumnFilter::new("a", ">", vec![1, 2]).unwrap_err().is_invalid_filter());
        assert!(ColumnFilter::new("a", "=", ()).unwrap_err().is_invalid_filter());
    }

    #[test]
    fn null_only_allowed_for_equality() {
        assert!(ColumnFilter::new("a", "=", None::<i32>).is_ok());
        assert!(ColumnFilter::new("a", "!=", None::<i32>).is_ok());
        assert!(ColumnFilter::new("a", ">", None::<i32>).is_err());
        assert!(ColumnFilter::new("a", "like", None::<&str>).is_err());
    }

    #[test]
    fn in_requires_non_empty_list() {
        assert!(ColumnFilter::new("a", "in", Vec::<i32>::new()).is_err());
        assert!(ColumnFilter::new("a", "in", 5).is_err());
        assert!(ColumnFilter::new("a", "not in", vec![1]).is_ok());
    }

    #[test]
    fn between_requires_exactly_two() {
        assert!(ColumnFilter::new("a", "between", [1]).is_err());
        assert!(ColumnFilter::new("a", "between", [1, 2, 3]).is_err());
        let f = ColumnFilter::new("a", "between", [1, 2]).unwrap();
        assert_eq!(f.operand().values(), &[Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn null_checks_ignore_values() {
        let f = ColumnFilter::new("a", "is null", 42).unwrap();
        assert_eq!(f.op(), Operator::IsNull);
        assert_eq!(f.operand(), &Operand::None);
    }

    #[test]
    fn error_message_names_column_and_operation() {
        let err = ColumnFilter::new("age", "between", [1]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid filter: 'age' BETWEEN expects a list of exactly 2 values, got a list of 1 value(s)"
        );
    }
}
