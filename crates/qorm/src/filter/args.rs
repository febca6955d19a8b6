use super::{ColumnFilter, Filter, Operand, RawFilter};
use crate::error::{OrmError, OrmResult};
use crate::value::Value;
use chrono::{DateTime, Utc};

/// One loosely-typed argument to the [`filter!`](crate::filter) dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterArg {
    Filter(Filter),
    Text(String),
    List(Vec<Value>),
    Value(Value),
}

impl FilterArg {
    fn kind(&self) -> &'static str {
        match self {
            FilterArg::Filter(_) => "filter",
            FilterArg::Text(_) => "string",
            FilterArg::List(_) => "list",
            FilterArg::Value(_) => "value",
        }
    }
}

impl From<Filter> for FilterArg {
    fn from(f: Filter) -> Self {
        FilterArg::Filter(f)
    }
}

impl From<&str> for FilterArg {
    fn from(s: &str) -> Self {
        FilterArg::Text(s.to_string())
    }
}

impl From<String> for FilterArg {
    fn from(s: String) -> Self {
        FilterArg::Text(s)
    }
}

impl From<Value> for FilterArg {
    fn from(v: Value) -> Self {
        FilterArg::Value(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for FilterArg {
    fn from(vs: Vec<T>) -> Self {
        FilterArg::List(vs.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for FilterArg {
    fn from(vs: [T; N]) -> Self {
        FilterArg::List(vs.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for FilterArg {
    fn from(v: Option<T>) -> Self {
        FilterArg::Value(Value::from(v))
    }
}

macro_rules! impl_value_arg {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for FilterArg {
                fn from(v: $t) -> Self {
                    FilterArg::Value(Value::from(v))
                }
            }
        )*
    };
}

impl_value_arg!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    serde_json::Value,
    uuid::Uuid,
    DateTime<Utc>,
);

/// Infer a [`Filter`] from one to three arguments.
pub fn from_args(args: Vec<FilterArg>) -> OrmResult<Filter> {
    let mut args = args.into_iter();
    match (args.next(), args.next(), args.next(), args.next()) {
        (Some(FilterArg::Filter(f)), None, None, None) => Ok(f),
        (Some(FilterArg::List(parts)), None, None, None) => from_list(parts),
        (Some(FilterArg::Text(sql)), None, None, None) => Ok(RawFilter::new(sql, Vec::new()).into()),
        (Some(FilterArg::Text(column)), Some(FilterArg::Text(op)), None, None) => {
            Ok(ColumnFilter::unary(column, op)?.into())
        }
        (Some(FilterArg::Text(sql)), Some(FilterArg::List(params)), None, None) => {
            Ok(RawFilter::new(sql, params).into())
        }
        (Some(FilterArg::Text(column)), Some(FilterArg::Text(op)), Some(value), None) => {
            let operand = match value {
                FilterArg::Value(v) => Operand::Scalar(v),
                FilterArg::Text(s) => Operand::Scalar(Value::Text(s)),
                FilterArg::List(vs) => Operand::List(vs),
                FilterArg::Filter(_) => {
                    return Err(OrmError::invalid_filter(
                        "a filter cannot be used as a column value",
                    ));
                }
            };
            Ok(ColumnFilter::new(column, op, operand)?.into())
        }
        (a, b, c, d) => {
            let shape: Vec<&str> = [&a, &b, &c, &d]
                .into_iter()
                .flatten()
                .map(FilterArg::kind)
                .collect();
            let count = shape.len() + args.len();
            Err(OrmError::invalid_filter(format!(
                "cannot build a filter from {count} argument(s) ({})",
                shape.join(", ")
            )))
        }
    }
}

/// `[column, op]` or `[column, op, value]` as a column filter.
fn from_list(parts: Vec<Value>) -> OrmResult<Filter> {
    let mut parts = parts.into_iter();
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(Value::Text(column)), Some(Value::Text(op)), None, None) => {
            Ok(ColumnFilter::unary(column, op)?.into())
        }
        (Some(Value::Text(column)), Some(Value::Text(op)), Some(value), None) => {
            Ok(ColumnFilter::new(column, op, value)?.into())
        }
        _ => Err(OrmError::invalid_filter(
            "a list filter must be [column, operation] or [column, operation, value]",
        )),
    }
}
