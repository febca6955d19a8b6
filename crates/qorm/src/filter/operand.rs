//! The value side of a column filter.

use crate::value::Value;
use chrono::{DateTime, Utc};

/// Operation-dependent value carried by a [`ColumnFilter`](super::ColumnFilter).
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// No value (null checks).
    None,
    /// A single value.
    Scalar(Value),
    /// A list of values (`IN`, `NOT IN`, `BETWEEN`).
    List(Vec<Value>),
}

impl Operand {
    /// The bound values in order.
    pub fn values(&self) -> &[Value] {
        match self {
            Operand::None => &[],
            Operand::Scalar(v) => std::slice::from_ref(v),
            Operand::List(vs) => vs,
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Operand::None => "no value".to_string(),
            Operand::Scalar(Value::Null) => "NULL".to_string(),
            Operand::Scalar(v) => format!("a scalar {}", v.type_name()),
            Operand::List(vs) => format!("a list of {} value(s)", vs.len()),
        }
    }
}

/// Conversion into an [`Operand`].
///
/// Scalars become [`Operand::Scalar`], vectors and arrays become
/// [`Operand::List`], and `()` means "no value".
pub trait IntoOperand {
    fn into_operand(self) -> Operand;
}

macro_rules! impl_scalar_operand {
    ($($t:ty),* $(,)?) => {
        $(
            impl IntoOperand for $t {
                fn into_operand(self) -> Operand {
                    Operand::Scalar(Value::from(self))
                }
            }
        )*
    };
}

impl_scalar_operand!(
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
    &str,
    String,
    &String,
    serde_json::Value,
    uuid::Uuid,
    DateTime<Utc>,
);

impl IntoOperand for Value {
    fn into_operand(self) -> Operand {
        Operand::Scalar(self)
    }
}

impl IntoOperand for Operand {
    fn into_operand(self) -> Operand {
        self
    }
}

impl IntoOperand for () {
    fn into_operand(self) -> Operand {
        Operand::None
    }
}

impl<T: Into<Value>> IntoOperand for Option<T> {
    fn into_operand(self) -> Operand {
        Operand::Scalar(Value::from(self))
    }
}

impl<T: Into<Value>> IntoOperand for Vec<T> {
    fn into_operand(self) -> Operand {
        Operand::List(self.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> IntoOperand for [T; N] {
    fn into_operand(self) -> Operand {
        Operand::List(self.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<Value>> IntoOperand for &[T] {
    fn into_operand(self) -> Operand {
        Operand::List(self.iter().cloned().map(Into::into).collect())
    }
}
