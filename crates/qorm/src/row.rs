//! Result rows and row mapping traits.

use crate::error::{OrmError, OrmResult};
use crate::value::Value;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::sync::Arc;

/// One result row: a column-name list shared by every row of a result, plus
/// the values in column order.
///
/// Values can be read by name (ordered-map shape) or by position (tuple shape).
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    /// Build a row. Missing trailing values read as absent, extra values are
    /// only reachable by index.
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// Build a row from `(column, value)` pairs.
    pub fn from_pairs<I, C, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, V)>,
        C: Into<String>,
        V: Into<Value>,
    {
        let (columns, values): (Vec<String>, Vec<Value>) = pairs
            .into_iter()
            .map(|(c, v)| (c.into(), v.into()))
            .unzip();
        Self::new(columns.into(), values)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of the first column named `column`.
    pub fn get(&self, column: &str) -> Option<&Value> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.values.get(idx)
    }

    /// Value at position `idx`.
    pub fn get_index(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    /// Decode the named column into `T`.
    pub fn try_get<T: FromValue>(&self, column: &str) -> OrmResult<T> {
        let value = self
            .get(column)
            .ok_or_else(|| OrmError::decode(column, "column not present in row"))?;
        T::from_value(value).map_err(|message| OrmError::decode(column, message))
    }

    /// Decode the value at `idx` into `T`.
    pub fn try_get_index<T: FromValue>(&self, idx: usize) -> OrmResult<T> {
        let name = self
            .columns
            .get(idx)
            .cloned()
            .unwrap_or_else(|| format!("#{idx}"));
        let value = self
            .get_index(idx)
            .ok_or_else(|| OrmError::decode(&name, "column index out of range"))?;
        T::from_value(value).map_err(|message| OrmError::decode(name, message))
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// The row as a JSON object keyed by column name.
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .columns
            .iter()
            .zip(&self.values)
            .map(|(c, v)| (c.clone(), v.to_json()))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}

/// Conversion from a [`Value`] into a Rust type.
///
/// The error is a plain message; [`Row::try_get`] wraps it in
/// [`OrmError::Decode`] with the column name.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, String>;
}

fn mismatch(expected: &str, got: &Value) -> String {
    format!("expected {expected}, got {}", got.type_name())
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, String> {
        Ok(value.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(mismatch("bool", other)),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Int(i) => Ok(*i),
            other => Err(mismatch("int", other)),
        }
    }
}

macro_rules! impl_from_value_narrow_int {
    ($($t:ty),*) => {
        $(
            impl FromValue for $t {
                fn from_value(value: &Value) -> Result<Self, String> {
                    let wide = i64::from_value(value)?;
                    <$t>::try_from(wide).map_err(|_| {
                        format!("{wide} out of range for {}", stringify!($t))
                    })
                }
            }
        )*
    };
}

impl_from_value_narrow_int!(i8, i16, i32, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Float(f) => Ok(*f),
            Value::Int(i) => Ok(*i as f64),
            Value::Decimal(d) => d
                .to_f64()
                .ok_or_else(|| format!("{d} out of range for f64")),
            other => Err(mismatch("float", other)),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Result<Self, String> {
        f64::from_value(value).map(|f| f as f32)
    }
}

impl FromValue for Decimal {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Decimal(d) => Ok(*d),
            Value::Int(i) => Ok(Decimal::from(*i)),
            Value::Float(f) => Decimal::try_from(*f).map_err(|e| e.to_string()),
            Value::Text(s) => s.parse().map_err(|e: rust_decimal::Error| e.to_string()),
            other => Err(mismatch("decimal", other)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            other => Err(mismatch("text", other)),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Bytes(b) => Ok(b.clone()),
            other => Err(mismatch("bytes", other)),
        }
    }
}

impl FromValue for serde_json::Value {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Json(j) => Ok(j.clone()),
            other => Ok(other.to_json()),
        }
    }
}

impl FromValue for uuid::Uuid {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Uuid(u) => Ok(*u),
            Value::Text(s) => uuid::Uuid::parse_str(s).map_err(|e| e.to_string()),
            other => Err(mismatch("uuid", other)),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Timestamp(t) => Ok(*t),
            other => Err(mismatch("timestamp", other)),
        }
    }
}

impl FromValue for NaiveDate {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Date(d) => Ok(*d),
            other => Err(mismatch("date", other)),
        }
    }
}

impl FromValue for NaiveTime {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Time(t) => Ok(*t),
            other => Err(mismatch("time", other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Trait for types that can be built from a [`Row`].
///
/// `#[derive(FromRow)]` implements it by column name; tuples implement it
/// by position.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> OrmResult<Self>;
}

impl FromRow for Row {
    fn from_row(row: &Row) -> OrmResult<Self> {
        Ok(row.clone())
    }
}

impl FromRow for serde_json::Value {
    fn from_row(row: &Row) -> OrmResult<Self> {
        Ok(row.to_json())
    }
}

macro_rules! impl_from_row_tuple {
    ($($idx:tt => $t:ident),+) => {
        impl<$($t: FromValue),+> FromRow for ($($t,)+) {
            fn from_row(row: &Row) -> OrmResult<Self> {
                Ok(($(row.try_get_index::<$t>($idx)?,)+))
            }
        }
    };
}

impl_from_row_tuple!(0 => A);
impl_from_row_tuple!(0 => A, 1 => B);
impl_from_row_tuple!(0 => A, 1 => B, 2 => C);
impl_from_row_tuple!(0 => A, 1 => B, 2 => C, 3 => D);
impl_from_row_tuple!(0 => A, 1 => B, 2 => C, 3 => D, 4 => E);
impl_from_row_tuple!(0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F);

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Row {
        Row::from_pairs([
            ("id", Value::Int(7)),
            ("name", Value::from("ada")),
            ("email", Value::Null),
        ])
    }

    #[test]
    fn lookup_by_name_and_index() {
        let r = row();
        assert_eq!(r.get("name"), Some(&Value::from("ada")));
        assert_eq!(r.get_index(0), Some(&Value::Int(7)));
        assert_eq!(r.get("missing"), None);
    }

    #[test]
    fn typed_access() {
        let r = row();
        assert_eq!(r.try_get::<i64>("id").unwrap(), 7);
        assert_eq!(r.try_get::<i32>("id").unwrap(), 7);
        assert_eq!(r.try_get::<Option<String>>("email").unwrap(), None);
    }

    #[test]
    fn decode_errors_name_the_column() {
        let err = row().try_get::<String>("id").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Decode error on column 'id': expected text, got int"
        );
        let err = row().try_get_index::<i64>(9).unwrap_err();
        assert!(matches!(err, OrmError::Decode { column, .. } if column == "#9"));
    }

    #[test]
    fn narrow_int_out_of_range() {
        let r = Row::from_pairs([("n", 300)]);
        assert!(r.try_get::<u8>("n").is_err());
    }

    #[test]
    fn decimal_reads_as_float_or_decimal() {
        let r = Row::from_pairs([("total", Decimal::new(12345, 2))]);
        assert!((r.try_get::<f64>("total").unwrap() - 123.45).abs() < 1e-9);
        assert_eq!(r.try_get::<Decimal>("total").unwrap(), Decimal::new(12345, 2));

        let r = Row::from_pairs([("n", 3)]);
        assert_eq!(r.try_get::<Decimal>("n").unwrap(), Decimal::from(3));
    }

    #[test]
    fn dates_do_not_read_as_text() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let r = Row::from_pairs([("day", day)]);
        assert_eq!(r.try_get::<NaiveDate>("day").unwrap(), day);
        assert!(r.try_get::<String>("day").is_err());
    }

    #[test]
    fn tuples_map_by_position() {
        let (id, name): (i64, String) = FromRow::from_row(&row()).unwrap();
        assert_eq!((id, name.as_str()), (7, "ada"));
    }

    #[test]
    fn to_json_object() {
        assert_eq!(
            row().to_json(),
            serde_json::json!({"id": 7, "name": "ada", "email": null})
        );
    }
}
