//! SQL identifier parsing and quoting.
//!
//! Every table and column name that reaches rendered SQL goes through [`Ident`]:
//! the name is split on `.` into parts and each part is wrapped in the dialect's
//! quote character, with embedded quote characters doubled.
//!
//! - Bare parts accept any characters except `.` and NUL
//! - Parts already wrapped in `"` are unwrapped first (`""` unescapes to `"`), so a
//!   name containing a dot can still be expressed
//! - A bare `*` part is kept verbatim and never quoted
//!
//! # Example
//! ```ignore
//! use qorm::Ident;
//!
//! let t = Ident::parse("public.users")?;
//! assert_eq!(t.quoted('"'), r#""public"."users""#);
//! assert_eq!(t.quoted('`'), "`public`.`users`");
//! # Ok::<(), qorm::OrmError>(())
//! ```

use crate::error::{OrmError, OrmResult};

/// A part of a SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentPart {
    /// A name, stored unescaped.
    Name(String),
    /// The `*` wildcard.
    Star,
}

/// A SQL identifier (column, table, or schema-qualified name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    parts: Vec<IdentPart>,
}

impl Ident {
    /// Parse an identifier string.
    ///
    /// - Dotted: `schema.table.column`
    /// - Pre-quoted: `"odd.name"."Table"`
    /// - Wildcard: `*`, `users.*`
    pub fn parse(s: &str) -> OrmResult<Self> {
        if s.is_empty() {
            return Err(OrmError::invalid_query("Identifier cannot be empty"));
        }
        if s.contains('\0') {
            return Err(OrmError::invalid_query(
                "Identifier cannot contain NUL character",
            ));
        }

        let mut parts = Vec::new();
        let mut chars = s.chars().peekable();

        while chars.peek().is_some() {
            if !parts.is_empty() {
                match chars.next() {
                    Some('.') => {
                        if chars.peek().is_none() {
                            return Err(OrmError::invalid_query(format!(
                                "Trailing '.' in identifier '{s}'"
                            )));
                        }
                    }
                    Some(c) => {
                        return Err(OrmError::invalid_query(format!(
                            "Expected '.' between identifier parts in '{s}', got '{c}'"
                        )));
                    }
                    None => break,
                }
            }

            if chars.peek() == Some(&'"') {
                chars.next();
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('"') => {
                            if chars.peek() == Some(&'"') {
                                chars.next();
                                name.push('"');
                            } else {
                                break;
                            }
                        }
                        Some(c) => name.push(c),
                        None => {
                            return Err(OrmError::invalid_query(format!(
                                "Unclosed quoted identifier '{s}'"
                            )));
                        }
                    }
                }
                if name.is_empty() {
                    return Err(OrmError::invalid_query("Empty quoted identifier"));
                }
                parts.push(IdentPart::Name(name));
                continue;
            }

            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if c == '.' {
                    break;
                }
                name.push(c);
                chars.next();
            }
            if name.is_empty() {
                return Err(OrmError::invalid_query(format!(
                    "Empty identifier segment in '{s}'"
                )));
            }
            if name == "*" {
                parts.push(IdentPart::Star);
            } else {
                parts.push(IdentPart::Name(name));
            }
        }

        if let Some(pos) = parts.iter().position(|p| *p == IdentPart::Star) {
            if pos + 1 != parts.len() {
                return Err(OrmError::invalid_query(format!(
                    "'*' must be the last identifier part in '{s}'"
                )));
            }
        }

        Ok(Self { parts })
    }

    /// The identifier parts.
    pub fn parts(&self) -> &[IdentPart] {
        &self.parts
    }

    /// Render with `quote` around every named part.
    pub fn quoted(&self, quote: char) -> String {
        let mut out = String::new();
        self.write_quoted(quote, &mut out);
        out
    }

    pub(crate) fn write_quoted(&self, quote: char, out: &mut String) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            match part {
                IdentPart::Star => out.push('*'),
                IdentPart::Name(s) => {
                    out.push(quote);
                    for ch in s.chars() {
                        if ch == quote {
                            out.push(quote);
                        }
                        out.push(ch);
                    }
                    out.push(quote);
                }
            }
        }
    }
}

/// Parse `name` and quote it with `quote`.
pub fn quote_with(name: &str, quote: char) -> OrmResult<String> {
    Ok(Ident::parse(name)?.quoted(quote))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ident_simple() {
        assert_eq!(quote_with("users", '"').unwrap(), r#""users""#);
    }

    #[test]
    fn ident_dotted() {
        assert_eq!(quote_with("public.users", '"').unwrap(), r#""public"."users""#);
    }

    #[test]
    fn ident_backtick() {
        assert_eq!(quote_with("shop.orders", '`').unwrap(), "`shop`.`orders`");
    }

    #[test]
    fn ident_embedded_quote_is_doubled() {
        assert_eq!(quote_with("we`ird", '`').unwrap(), "`we``ird`");
        assert_eq!(quote_with(r#""has""quote""#, '"').unwrap(), r#""has""quote""#);
    }

    #[test]
    fn ident_prequoted_part_keeps_dot() {
        assert_eq!(quote_with(r#""odd.name""#, '`').unwrap(), "`odd.name`");
    }

    #[test]
    fn ident_injection_attempt_stays_inside_quotes() {
        let quoted = quote_with(r#"x" ; DROP TABLE users; --"#, '"').unwrap();
        assert_eq!(quoted, r#""x"" ; DROP TABLE users; --""#);
    }

    #[test]
    fn ident_star_is_not_quoted() {
        assert_eq!(quote_with("*", '"').unwrap(), "*");
        assert_eq!(quote_with("users.*", '"').unwrap(), r#""users".*"#);
    }

    #[test]
    fn ident_rejects_star_in_middle() {
        assert!(Ident::parse("*.users").is_err());
    }

    #[test]
    fn ident_rejects_empty() {
        assert!(Ident::parse("").is_err());
    }

    #[test]
    fn ident_rejects_double_dot() {
        assert!(Ident::parse("schema..table").is_err());
    }

    #[test]
    fn ident_rejects_trailing_dot() {
        assert!(Ident::parse("schema.").is_err());
    }

    #[test]
    fn ident_rejects_unclosed_quote() {
        assert!(Ident::parse(r#""unclosed"#).is_err());
    }
}
