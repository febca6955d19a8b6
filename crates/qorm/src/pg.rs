//! PostgreSQL adapter.
//!
//! Implements [`Executor`] for `tokio_postgres::Client` and
//! `tokio_postgres::Transaction`. Statements arrive with `?` placeholders and
//! are rewritten to `$1, $2, ...` before being sent; [`Value`] is bound via
//! `ToSql` and result columns decode back into [`Value`] via `FromSql`.

use crate::error::{OrmError, OrmResult};
use crate::executor::Executor;
use crate::row::Row;
use crate::value::Value;
use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use std::error::Error;
use std::sync::Arc;
use tokio_postgres::types::{FromSql, IsNull, Kind, ToSql, Type, to_sql_checked};

type BoxError = Box<dyn Error + Sync + Send>;

/// Rewrite `?` placeholders to PostgreSQL's `$n`.
///
/// A `?` inside a string literal (including `E'...'` escape strings), a quoted
/// identifier, a dollar-quoted body, or a `--` / `/* */` comment is kept.
///
/// ```ignore
/// assert_eq!(numbered_placeholders("a = ? AND b = '?'"), "a = $1 AND b = '?'");
/// ```
pub fn numbered_placeholders(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut n = 0usize;
    let mut rest = sql;

    while let Some(ch) = rest.chars().next() {
        let after_word = out.ends_with(is_word_char);
        let verbatim = match ch {
            '\'' => quoted_len(rest, '\'', false),
            '"' => quoted_len(rest, '"', false),
            'E' | 'e' if !after_word && rest[1..].starts_with('\'') => {
                1 + quoted_len(&rest[1..], '\'', true)
            }
            '-' if rest.starts_with("--") => rest.find('\n').map_or(rest.len(), |i| i + 1),
            '/' if rest.starts_with("/*") => block_comment_len(rest),
            '$' if !after_word => dollar_quoted_len(rest).unwrap_or(0),
            _ => 0,
        };

        if verbatim > 0 {
            out.push_str(&rest[..verbatim]);
            rest = &rest[verbatim..];
            continue;
        }

        if ch == '?' {
            n += 1;
            out.push('$');
            out.push_str(&n.to_string());
        } else {
            out.push(ch);
        }
        rest = &rest[ch.len_utf8()..];
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Byte length of the quoted run at the start of `s`, closing quote included.
/// A doubled quote is an escaped quote; unterminated runs extend to the end.
fn quoted_len(s: &str, quote: char, backslash_escapes: bool) -> usize {
    let mut chars = s.char_indices().skip(1);
    while let Some((i, c)) = chars.next() {
        if backslash_escapes && c == '\\' {
            chars.next();
        } else if c == quote {
            if s[i + 1..].starts_with(quote) {
                chars.next();
            } else {
                return i + 1;
            }
        }
    }
    s.len()
}

/// Block comments nest in PostgreSQL.
fn block_comment_len(s: &str) -> usize {
    let mut depth = 0usize;
    let mut i = 0;
    while i < s.len() {
        let tail = &s[i..];
        if tail.starts_with("/*") {
            depth += 1;
            i += 2;
        } else if tail.starts_with("*/") {
            depth -= 1;
            i += 2;
            if depth == 0 {
                return i;
            }
        } else {
            i += tail.chars().next().map_or(1, char::len_utf8);
        }
    }
    s.len()
}

/// Byte length of a `$tag$ ... $tag$` body at the start of `s`, or `None`
/// when `s` does not open one (`$1` is a positional parameter, not a tag).
fn dollar_quoted_len(s: &str) -> Option<usize> {
    let close = s[1..].find('$')? + 1;
    let tag = &s[1..close];
    let valid_tag = tag.chars().next().is_none_or(|c| c.is_alphabetic() || c == '_')
        && tag.chars().all(is_word_char);
    if !valid_tag {
        return None;
    }
    let delimiter = &s[..=close];
    let body = &s[delimiter.len()..];
    Some(
        body.find(delimiter)
            .map_or(s.len(), |end| delimiter.len() + end + delimiter.len()),
    )
}

fn params(args: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    args.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
}

/// Convert driver rows, sharing one column-name list across all of them.
fn convert_rows(rows: &[tokio_postgres::Row]) -> OrmResult<Vec<Row>> {
    let Some(first) = rows.first() else {
        return Ok(Vec::new());
    };
    let columns: Arc<[String]> = first
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();

    rows.iter()
        .map(|row| {
            let values = (0..row.len())
                .map(|i| {
                    row.try_get::<_, Value>(i)
                        .map_err(|e| OrmError::decode(&columns[i], e.to_string()))
                })
                .collect::<OrmResult<Vec<_>>>()?;
            Ok(Row::new(columns.clone(), values))
        })
        .collect()
}

impl Executor for tokio_postgres::Client {
    async fn query(&self, sql: &str, args: &[Value]) -> OrmResult<Vec<Row>> {
        let sql = numbered_placeholders(sql);
        let rows = tokio_postgres::Client::query(self, sql.as_str(), &params(args)).await?;
        convert_rows(&rows)
    }

    async fn execute(&self, sql: &str, args: &[Value]) -> OrmResult<u64> {
        let sql = numbered_placeholders(sql);
        Ok(tokio_postgres::Client::execute(self, sql.as_str(), &params(args)).await?)
    }
}

impl Executor for tokio_postgres::Transaction<'_> {
    async fn query(&self, sql: &str, args: &[Value]) -> OrmResult<Vec<Row>> {
        let sql = numbered_placeholders(sql);
        let rows = tokio_postgres::Transaction::query(self, sql.as_str(), &params(args)).await?;
        convert_rows(&rows)
    }

    async fn execute(&self, sql: &str, args: &[Value]) -> OrmResult<u64> {
        let sql = numbered_placeholders(sql);
        Ok(tokio_postgres::Transaction::execute(self, sql.as_str(), &params(args)).await?)
    }
}

/// Column types that map onto a [`Value`] variant other than text.
fn is_scalar_type(ty: &Type) -> bool {
    matches!(
        *ty,
        Type::BOOL
            | Type::INT2
            | Type::INT4
            | Type::INT8
            | Type::OID
            | Type::FLOAT4
            | Type::FLOAT8
            | Type::NUMERIC
            | Type::BYTEA
            | Type::JSON
            | Type::JSONB
            | Type::UUID
            | Type::TIMESTAMP
            | Type::TIMESTAMPTZ
            | Type::DATE
            | Type::TIME
    )
}

/// text, varchar, bpchar, name, citext, ltree, and enum labels.
fn is_text_type(ty: &Type) -> bool {
    <&str as FromSql>::accepts(ty) || matches!(ty.kind(), Kind::Enum(_))
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(b) => b.to_sql_checked(ty, out),
            Value::Int(i) => match *ty {
                Type::INT2 => i16::try_from(*i)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*i)?.to_sql(ty, out),
                Type::OID => u32::try_from(*i)?.to_sql(ty, out),
                Type::FLOAT4 => (*i as f32).to_sql(ty, out),
                Type::FLOAT8 => (*i as f64).to_sql(ty, out),
                Type::NUMERIC => Decimal::from(*i).to_sql(ty, out),
                _ => i.to_sql_checked(ty, out),
            },
            Value::Float(f) => match *ty {
                Type::FLOAT4 => (*f as f32).to_sql(ty, out),
                Type::NUMERIC => Decimal::try_from(*f)?.to_sql(ty, out),
                _ => f.to_sql_checked(ty, out),
            },
            Value::Decimal(d) => d.to_sql_checked(ty, out),
            Value::Text(s) => match *ty {
                Type::NUMERIC => s.parse::<Decimal>()?.to_sql(ty, out),
                Type::UUID => uuid::Uuid::parse_str(s)?.to_sql(ty, out),
                _ if matches!(ty.kind(), Kind::Enum(_)) => s.as_str().to_sql(&Type::TEXT, out),
                _ => s.to_sql_checked(ty, out),
            },
            Value::Bytes(b) => b.to_sql_checked(ty, out),
            Value::Json(j) => j.to_sql_checked(ty, out),
            Value::Uuid(u) => u.to_sql_checked(ty, out),
            Value::Timestamp(t) => match *ty {
                Type::TIMESTAMP => t.naive_utc().to_sql(ty, out),
                _ => t.to_sql_checked(ty, out),
            },
            Value::Date(d) => d.to_sql_checked(ty, out),
            Value::Time(t) => t.to_sql_checked(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        is_scalar_type(ty) || is_text_type(ty)
    }

    to_sql_checked!();
}

impl<'a> FromSql<'a> for Value {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        let value = match *ty {
            Type::BOOL => Value::Bool(bool::from_sql(ty, raw)?),
            Type::INT2 => Value::Int(i16::from_sql(ty, raw)?.into()),
            Type::INT4 => Value::Int(i32::from_sql(ty, raw)?.into()),
            Type::INT8 => Value::Int(i64::from_sql(ty, raw)?),
            Type::OID => Value::Int(u32::from_sql(ty, raw)?.into()),
            Type::FLOAT4 => Value::Float(f32::from_sql(ty, raw)?.into()),
            Type::FLOAT8 => Value::Float(f64::from_sql(ty, raw)?),
            Type::NUMERIC => Value::Decimal(Decimal::from_sql(ty, raw)?),
            Type::BYTEA => Value::Bytes(Vec::<u8>::from_sql(ty, raw)?),
            Type::JSON | Type::JSONB => Value::Json(serde_json::Value::from_sql(ty, raw)?),
            Type::UUID => Value::Uuid(uuid::Uuid::from_sql(ty, raw)?),
            Type::TIMESTAMPTZ => Value::Timestamp(DateTime::<Utc>::from_sql(ty, raw)?),
            Type::TIMESTAMP => Value::Timestamp(NaiveDateTime::from_sql(ty, raw)?.and_utc()),
            Type::DATE => Value::Date(NaiveDate::from_sql(ty, raw)?),
            Type::TIME => Value::Time(NaiveTime::from_sql(ty, raw)?),
            _ if matches!(ty.kind(), Kind::Enum(_)) => {
                Value::Text(std::str::from_utf8(raw)?.to_string())
            }
            _ if is_text_type(ty) => {
                Value::Text(<&str as FromSql>::from_sql(ty, raw)?.to_string())
            }
            _ => return Err(format!("unsupported column type '{ty}'").into()),
        };
        Ok(value)
    }

    fn from_sql_null(_ty: &Type) -> Result<Self, BoxError> {
        Ok(Value::Null)
    }

    fn accepts(ty: &Type) -> bool {
        is_scalar_type(ty) || is_text_type(ty)
    }
}
