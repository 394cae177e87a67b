// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Template query binder.
//!
//! Turns a raw-SQL template with `{name}` placeholders into a parameterized
//! statement. Every placeholder becomes a driver-level bind marker; argument
//! values never reach the SQL text.
//!
//! # Syntax
//!
//! | Template | Meaning |
//! |----------|---------|
//! | `{email}` | bind marker for parameter `email` |
//! | `'{email}'`, `"{email}"` | same bind marker, the quotes are dropped |
//! | `'%{email}%'` | rejected: a marker inside a string literal is never bound |
//! | `{{`, `}}` | literal `{`, `}` |
//! | `-- {email}`, `/* {email} */` | comment, left untouched |
//!
//! # Example
//!
//! ```text
//! UPDATE users SET status = {status} WHERE id = {id} RETURNING *
//! -- Postgres:   UPDATE users SET status = $1 WHERE id = $2 RETURNING *
//! -- Positional: UPDATE users SET status = ? WHERE id = ? RETURNING *
//! ```
//!
//! # Type Checks
//!
//! When the column a placeholder is compared with (`col = {p}`, `col LIKE
//! {p}`, ...) or inserted into (`INSERT INTO t (col) VALUES ({p})`) is a field
//! of the entity, the parameter type must be compatible with the field type.

use std::{collections::HashMap, ops::Range};

use crate::{dialect::Dialect, entity::EntityDescriptor, signature::Param, value::ValueType};

/// Keywords that start a row-producing statement.
const ROW_KEYWORDS: &[&str] = &["SELECT", "WITH", "VALUES", "SHOW", "EXPLAIN", "TABLE"];

/// Comparison operators recognized in front of a placeholder, longest first.
const OPERATORS: &[&str] = &["<>", "!=", "<=", ">=", "=", "<", ">"];

/// Why a template cannot be bound.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// `{` without a closing `}`.
    #[error("unterminated placeholder at byte {offset}")]
    Unterminated {
        /// Byte offset of the opening brace.
        offset: usize
    },

    /// Placeholder name is not an identifier.
    #[error("invalid placeholder `{{{name}}}`")]
    InvalidName {
        /// Text between the braces.
        name: String
    },

    /// Placeholder embedded in a longer string literal.
    #[error("placeholder `{{{name}}}` is embedded in a string literal")]
    InsideLiteral {
        /// Placeholder name.
        name: String
    },

    /// Placeholder without a declared parameter.
    #[error("placeholder `{{{name}}}` has no matching parameter")]
    UnknownPlaceholder {
        /// Placeholder name.
        name: String
    },

    /// Parameter type incompatible with the target column.
    #[error("parameter `{param}` of type {param_ty} cannot be bound to column `{column}` of type {column_ty}")]
    TypeMismatch {
        /// Parameter name.
        param:     String,
        /// Target column.
        column:    String,
        /// Declared parameter type.
        param_ty:  ValueType,
        /// Column type.
        column_ty: ValueType
    }
}

/// A template after placeholder substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundTemplate {
    /// SQL with bind markers.
    pub sql:          String,
    /// Parameter index bound to each marker slot, in slot order.
    pub binds:        Vec<usize>,
    /// Whether the statement produces rows (`SELECT`, `RETURNING`, ...).
    pub returns_rows: bool,
    /// Declared parameters never referenced by the template.
    pub unused:       Vec<&'static str>
}

/// One `{name}` occurrence.
#[derive(Debug)]
struct Occurrence {
    name: String,
    /// Bytes replaced by the marker, including wrapping quotes.
    span: Range<usize>
}

/// Result of the lexical pass.
struct Scan {
    occurrences: Vec<Occurrence>,
    /// Offsets of `{{` / `}}` pairs.
    escapes:     Vec<usize>,
    /// Template bytes with comments, string-literal content and placeholders
    /// blanked.
    masked:      Vec<u8>
}

/// Bind `template` against the declared `params`.
///
/// # Errors
///
/// Returns a [`TemplateError`] for malformed or unknown placeholders and for
/// parameters whose type does not fit the target column of `entity`.
pub fn bind(
    template: &str,
    params: &[Param],
    entity: &EntityDescriptor,
    dialect: Dialect
) -> Result<BoundTemplate, TemplateError> {
    let scan = scan(template)?;

    let mut slots: Vec<(Range<usize>, String)> = Vec::with_capacity(scan.occurrences.len());
    let mut binds = Vec::new();
    let mut numbers: HashMap<usize, usize> = HashMap::new();
    let mut used = vec![false; params.len()];

    for occ in &scan.occurrences {
        let idx = params
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(&occ.name))
            .ok_or_else(|| TemplateError::UnknownPlaceholder {
                name: occ.name.clone()
            })?;
        used[idx] = true;

        let slot = match numbers.get(&idx) {
            Some(slot) if dialect.reuses_markers() => *slot,
            _ => {
                binds.push(idx);
                numbers.insert(idx, binds.len());
                binds.len()
            }
        };
        slots.push((occ.span.clone(), dialect.marker(slot)));
    }

    check_columns(&scan, params, entity)?;

    for &offset in &scan.escapes {
        slots.push((offset..offset + 2, template[offset..offset + 1].to_string()));
    }
    slots.sort_by_key(|(span, _)| span.start);

    let mut sql = String::with_capacity(template.len());
    let mut cursor = 0;
    for (span, replacement) in slots {
        sql.push_str(&template[cursor..span.start]);
        sql.push_str(&replacement);
        cursor = span.end;
    }
    sql.push_str(&template[cursor..]);

    let unused = params
        .iter()
        .zip(&used)
        .filter(|(_, used)| !**used)
        .map(|(p, _)| p.name)
        .collect();

    Ok(BoundTemplate {
        sql,
        binds,
        returns_rows: returns_rows(&scan.masked),
        unused
    })
}

fn scan(template: &str) -> Result<Scan, TemplateError> {
    let bytes = template.as_bytes();
    let mut masked = bytes.to_vec();
    let mut occurrences = Vec::new();
    let mut escapes = Vec::new();
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'-' if quote.is_none() && bytes.get(i + 1) == Some(&b'-') => {
                let end = template[i..].find('\n').map_or(bytes.len(), |n| i + n);
                masked[i..end].fill(b' ');
                i = end;
            }
            b'/' if quote.is_none() && bytes.get(i + 1) == Some(&b'*') => {
                let end = template[i + 2..]
                    .find("*/")
                    .map_or(bytes.len(), |n| i + 2 + n + 2);
                masked[i..end].fill(b' ');
                i = end;
            }
            q @ (b'\'' | b'"') if quote.is_none_or(|open| open == q) => {
                quote = if quote.is_some() { None } else { Some(q) };
                i += 1;
            }
            b'{' | b'}' if bytes.get(i + 1) == Some(&bytes[i]) => {
                escapes.push(i);
                masked[i] = b' ';
                masked[i + 1] = b' ';
                i += 2;
            }
            b'{' => {
                let close = template[i + 1..]
                    .find('}')
                    .map(|end| i + 1 + end)
                    .ok_or(TemplateError::Unterminated {
                        offset: i
                    })?;
                let name = &template[i + 1..close];
                if !is_identifier(name) {
                    return Err(TemplateError::InvalidName {
                        name: name.to_string()
                    });
                }

                let mut span = i..close + 1;
                if let Some(q) = quote {
                    let wrapped = i > 0 && bytes[i - 1] == q && bytes.get(close + 1) == Some(&q);
                    if !wrapped {
                        return Err(TemplateError::InsideLiteral {
                            name: name.to_string()
                        });
                    }
                    span = i - 1..close + 2;
                    quote = None;
                }

                masked[span.clone()].fill(b' ');
                occurrences.push(Occurrence {
                    name: name.to_string(),
                    span: span.clone()
                });
                i = span.end;
            }
            _ => {
                if quote == Some(b'\'') {
                    masked[i] = b' ';
                }
                i += 1;
            }
        }
    }

    Ok(Scan {
        occurrences,
        escapes,
        masked
    })
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

const fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn words(masked: &[u8]) -> impl Iterator<Item = &[u8]> {
    masked
        .split(|b| !is_word_byte(*b))
        .filter(|w| !w.is_empty())
}

fn returns_rows(masked: &[u8]) -> bool {
    let mut words = words(masked);
    let starts_with_rows = words
        .next()
        .is_some_and(|w| ROW_KEYWORDS.iter().any(|k| w.eq_ignore_ascii_case(k.as_bytes())));
    starts_with_rows || words.any(|w| w.eq_ignore_ascii_case(b"RETURNING"))
}

/// Verify parameter types against the columns they target.
fn check_columns(scan: &Scan, params: &[Param], entity: &EntityDescriptor) -> Result<(), TemplateError> {
    let inserted = insert_targets(scan);

    for (pos, occ) in scan.occurrences.iter().enumerate() {
        let column = inserted
            .iter()
            .find(|(idx, _)| *idx == pos)
            .map(|(_, column)| column.clone())
            .or_else(|| compared_column(&scan.masked, occ.span.start));
        let Some(column) = column else {
            continue;
        };
        let Some(field) = entity.field(&column) else {
            continue;
        };
        let Some(param) = params.iter().find(|p| p.name.eq_ignore_ascii_case(&occ.name)) else {
            continue;
        };
        if !param.ty.is_compatible_with(field.ty) {
            return Err(TemplateError::TypeMismatch {
                param:     param.name.to_string(),
                column:    field.name.to_string(),
                param_ty:  param.ty,
                column_ty: field.ty
            });
        }
    }

    Ok(())
}

/// Column on the left of a comparison ending right before `end`.
fn compared_column(masked: &[u8], end: usize) -> Option<String> {
    let before = trim_end(&masked[..end]);

    let rest = if let Some(op) = OPERATORS.iter().find(|op| before.ends_with(op.as_bytes())) {
        &before[..before.len() - op.len()]
    } else {
        let start = before
            .iter()
            .rposition(|b| !is_word_byte(*b))
            .map_or(0, |p| p + 1);
        let word = &before[start..];
        if !(word.eq_ignore_ascii_case(b"LIKE") || word.eq_ignore_ascii_case(b"ILIKE")) {
            return None;
        }
        &before[..start]
    };

    identifier_at_end(trim_end(rest))
}

fn trim_end(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |p| p + 1);
    &bytes[..end]
}

fn trim(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    trim_end(&bytes[start..])
}

/// Trailing (possibly qualified or double-quoted) identifier, unqualified.
fn identifier_at_end(bytes: &[u8]) -> Option<String> {
    let start = bytes
        .iter()
        .rposition(|b| !(is_word_byte(*b) || *b == b'.' || *b == b'"'))
        .map_or(0, |p| p + 1);
    let ident = &bytes[start..];
    let last = ident.rsplit(|b| *b == b'.').next()?;
    let name: Vec<u8> = last.iter().copied().filter(|b| *b != b'"').collect();
    if name.is_empty() || !name.iter().copied().all(is_word_byte) {
        return None;
    }
    String::from_utf8(name).ok()
}

/// Map placeholders in `INSERT INTO t (cols) VALUES (...)` to their columns.
///
/// Returns `(occurrence index, column)` pairs.
fn insert_targets(scan: &Scan) -> Vec<(usize, String)> {
    let masked = &scan.masked;
    let mut found = Vec::new();

    let Some(insert) = find_word(masked, b"INSERT", 0) else {
        return found;
    };
    let Some((cols_open, cols_close)) = parenthesized(masked, insert) else {
        return found;
    };
    let Some(values) = find_word(masked, b"VALUES", cols_close) else {
        return found;
    };
    let Some((vals_open, vals_close)) = parenthesized(masked, values) else {
        return found;
    };

    let columns: Vec<Option<String>> = split_top_level(masked, cols_open + 1, cols_close)
        .into_iter()
        .map(|r| identifier_at_end(trim(&masked[r])))
        .collect();

    for (k, value) in split_top_level(masked, vals_open + 1, vals_close)
        .into_iter()
        .enumerate()
    {
        let Some(Some(column)) = columns.get(k) else {
            continue;
        };
        let placeholder = scan
            .occurrences
            .iter()
            .position(|occ| occ.span.start >= value.start && occ.span.end <= value.end);
        let Some(pos) = placeholder else {
            continue;
        };
        let occ = &scan.occurrences[pos];
        let outside = [&masked[value.start..occ.span.start], &masked[occ.span.end..value.end]];
        if outside.iter().all(|part| trim(part).is_empty()) {
            found.push((pos, column.clone()));
        }
    }

    found
}

/// Byte offset of the first whole-word, case-insensitive `word` at or after
/// `from`.
fn find_word(masked: &[u8], word: &[u8], from: usize) -> Option<usize> {
    (from..masked.len().saturating_sub(word.len() - 1)).find(|&i| {
        masked[i..i + word.len()].eq_ignore_ascii_case(word)
            && (i == 0 || !is_word_byte(masked[i - 1]))
            && masked.get(i + word.len()).is_none_or(|b| !is_word_byte(*b))
    })
}

/// First balanced `( ... )` at or after `from`: (open, close) offsets.
fn parenthesized(masked: &[u8], from: usize) -> Option<(usize, usize)> {
    let open = from + masked[from..].iter().position(|b| *b == b'(')?;
    let mut depth = 0usize;
    for (i, b) in masked.iter().enumerate().skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some((open, i));
                }
            }
            _ => {}
        }
    }
    None
}

/// Split `masked[start..end]` on commas outside nested parentheses.
fn split_top_level(masked: &[u8], start: usize, end: usize) -> Vec<Range<usize>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut part_start = start;
    for i in start..end {
        match masked[i] {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push(part_start..i);
                part_start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(part_start..end);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::FieldDescriptor;

    static FIELDS: &[FieldDescriptor] = &[
        FieldDescriptor::new("id", ValueType::Int, false),
        FieldDescriptor::new("email", ValueType::Text, false),
        FieldDescriptor::new("age", ValueType::Int, false),
        FieldDescriptor::new("score", ValueType::Float, true)
    ];

    static USERS: EntityDescriptor = EntityDescriptor::new("User", "users", None, FIELDS);

    fn p(name: &'static str, ty: ValueType) -> Param {
        Param {
            name,
            ty,
            nullable: false
        }
    }

    fn pg(template: &str, params: &[Param]) -> Result<BoundTemplate, TemplateError> {
        bind(template, params, &USERS, Dialect::Postgres)
    }

    #[test]
    fn placeholders_become_numbered_markers() {
        let bound = pg(
            "SELECT * FROM users WHERE email = {email} AND age > {age}",
            &[p("email", ValueType::Text), p("age", ValueType::Int)]
        )
        .unwrap();
        assert_eq!(bound.sql, "SELECT * FROM users WHERE email = $1 AND age > $2");
        assert_eq!(bound.binds, [0, 1]);
        assert!(bound.returns_rows);
        assert!(bound.unused.is_empty());
    }

    #[test]
    fn markers_follow_template_order_not_parameter_order() {
        let bound = pg(
            "UPDATE users SET email = {email} WHERE id = {id}",
            &[p("id", ValueType::Int), p("email", ValueType::Text)]
        )
        .unwrap();
        assert_eq!(bound.sql, "UPDATE users SET email = $1 WHERE id = $2");
        assert_eq!(bound.binds, [1, 0]);
        assert!(!bound.returns_rows);
    }

    #[test]
    fn repeated_placeholder_reuses_number() {
        let bound = pg(
            "SELECT * FROM users WHERE email = {q} OR email = lower({q})",
            &[p("q", ValueType::Text)]
        )
        .unwrap();
        assert_eq!(bound.sql, "SELECT * FROM users WHERE email = $1 OR email = lower($1)");
        assert_eq!(bound.binds, [0]);
    }

    #[test]
    fn repeated_placeholder_positional() {
        let bound = bind(
            "SELECT * FROM users WHERE email = {q} OR email = lower({q})",
            &[p("q", ValueType::Text)],
            &USERS,
            Dialect::Positional
        )
        .unwrap();
        assert_eq!(bound.sql, "SELECT * FROM users WHERE email = ? OR email = lower(?)");
        assert_eq!(bound.binds, [0, 0]);
    }

    #[test]
    fn quoted_placeholder_is_still_bound() {
        let bound = pg(
            "SELECT * FROM users WHERE email = '{email}'",
            &[p("email", ValueType::Text)]
        )
        .unwrap();
        assert_eq!(bound.sql, "SELECT * FROM users WHERE email = $1");
    }

    #[test]
    fn placeholder_inside_literal_rejected() {
        let err = pg(
            "SELECT * FROM users WHERE email LIKE '%{email}%'",
            &[p("email", ValueType::Text)]
        )
        .unwrap_err();
        assert_eq!(
            err,
            TemplateError::InsideLiteral {
                name: "email".into()
            }
        );
    }

    #[test]
    fn injection_attempt_stays_out_of_sql() {
        let bound = pg(
            "DELETE FROM users WHERE email = {email}",
            &[p("email", ValueType::Text)]
        )
        .unwrap();
        assert!(!bound.sql.contains('{'));
        assert_eq!(bound.sql, "DELETE FROM users WHERE email = $1");
    }

    #[test]
    fn escaped_braces() {
        let bound = pg(
            "SELECT '{{}}'::jsonb, id FROM users WHERE id = {id}",
            &[p("id", ValueType::Int)]
        )
        .unwrap();
        assert_eq!(bound.sql, "SELECT '{}'::jsonb, id FROM users WHERE id = $1");
    }

    #[test]
    fn unknown_placeholder() {
        let err = pg("SELECT * FROM users WHERE id = {uid}", &[p("id", ValueType::Int)]).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnknownPlaceholder {
                name: "uid".into()
            }
        );
    }

    #[test]
    fn unused_parameter_reported() {
        let bound = pg(
            "SELECT * FROM users WHERE id = {id}",
            &[p("id", ValueType::Int), p("email", ValueType::Text)]
        )
        .unwrap();
        assert_eq!(bound.unused, ["email"]);
    }

    #[test]
    fn malformed_placeholders() {
        assert_eq!(
            pg("SELECT {id", &[p("id", ValueType::Int)]).unwrap_err(),
            TemplateError::Unterminated {
                offset: 7
            }
        );
        assert!(matches!(
            pg("SELECT {1x}", &[]).unwrap_err(),
            TemplateError::InvalidName { .. }
        ));
    }

    #[test]
    fn comparison_type_mismatch() {
        let err = pg(
            "SELECT * FROM users u WHERE u.age >= {age}",
            &[p("age", ValueType::Text)]
        )
        .unwrap_err();
        assert_eq!(
            err,
            TemplateError::TypeMismatch {
                param:     "age".into(),
                column:    "age".into(),
                param_ty:  ValueType::Text,
                column_ty: ValueType::Int
            }
        );
    }

    #[test]
    fn like_type_mismatch() {
        let err = pg(
            "SELECT * FROM users WHERE email ILIKE {pattern}",
            &[p("pattern", ValueType::Int)]
        )
        .unwrap_err();
        assert!(matches!(err, TemplateError::TypeMismatch { .. }));
    }

    #[test]
    fn int_accepted_for_float_column() {
        assert!(
            pg(
                "UPDATE users SET score = {score} WHERE id = {id}",
                &[p("score", ValueType::Int), p("id", ValueType::Int)]
            )
            .is_ok()
        );
    }

    #[test]
    fn unknown_columns_are_not_checked() {
        assert!(
            pg(
                "SELECT * FROM users WHERE nickname = {n}",
                &[p("n", ValueType::Bool)]
            )
            .is_ok()
        );
    }

    #[test]
    fn insert_columns_checked_positionally() {
        let ok = pg(
            "INSERT INTO users (email, age) VALUES ({email}, {age}) RETURNING *",
            &[p("email", ValueType::Text), p("age", ValueType::Int)]
        )
        .unwrap();
        assert_eq!(
            ok.sql,
            "INSERT INTO users (email, age) VALUES ($1, $2) RETURNING *"
        );
        assert!(ok.returns_rows);

        let err = pg(
            "INSERT INTO users (email, age) VALUES ({email}, {age})",
            &[p("email", ValueType::Text), p("age", ValueType::Bool)]
        )
        .unwrap_err();
        assert!(matches!(err, TemplateError::TypeMismatch { column, .. } if column == "age"));
    }

    #[test]
    fn returning_inside_literal_does_not_count() {
        let bound = pg(
            "UPDATE users SET email = 'returning' WHERE id = {id}",
            &[p("id", ValueType::Int)]
        )
        .unwrap();
        assert!(!bound.returns_rows);
    }

    #[test]
    fn with_and_values_return_rows() {
        assert!(pg("WITH x AS (SELECT 1) SELECT * FROM x", &[]).unwrap().returns_rows);
        assert!(pg("  select count(*) from users", &[]).unwrap().returns_rows);
    }

    #[test]
    fn line_comment_is_not_scanned() {
        let bound = pg(
            "SELECT * FROM users -- don't touch {this}\nWHERE id = {id}",
            &[p("id", ValueType::Int)]
        )
        .unwrap();
        assert_eq!(bound.sql, "SELECT * FROM users -- don't touch {this}\nWHERE id = $1");
        assert_eq!(bound.binds, [0]);
    }

    #[test]
    fn block_comment_is_not_scanned() {
        let bound = pg(
            "SELECT * FROM users /* it's {not} a marker */ WHERE id = {id}",
            &[p("id", ValueType::Int)]
        )
        .unwrap();
        assert_eq!(bound.sql, "SELECT * FROM users /* it's {not} a marker */ WHERE id = $1");
    }

    #[test]
    fn comment_markers_inside_literals_are_text() {
        let bound = pg(
            "SELECT * FROM users WHERE email <> '--' AND id = {id}",
            &[p("id", ValueType::Int)]
        )
        .unwrap();
        assert_eq!(bound.sql, "SELECT * FROM users WHERE email <> '--' AND id = $1");
    }

    #[test]
    fn double_quoted_identifiers() {
        let bound = pg(
            "SELECT \"owner's\".id FROM users AS \"owner's\" WHERE \"email\" = {email}",
            &[p("email", ValueType::Text)]
        )
        .unwrap();
        assert_eq!(
            bound.sql,
            "SELECT \"owner's\".id FROM users AS \"owner's\" WHERE \"email\" = $1"
        );

        let err = pg(
            "SELECT * FROM users WHERE \"age\" = {age}",
            &[p("age", ValueType::Text)]
        )
        .unwrap_err();
        assert!(matches!(err, TemplateError::TypeMismatch { column, .. } if column == "age"));
    }

    #[test]
    fn double_quoted_placeholder_is_still_bound() {
        let bound = pg(
            "SELECT * FROM users WHERE email = \"{email}\"",
            &[p("email", ValueType::Text)]
        )
        .unwrap();
        assert_eq!(bound.sql, "SELECT * FROM users WHERE email = $1");

        let err = pg(
            "SELECT * FROM users WHERE email = \"x{email}\"",
            &[p("email", ValueType::Text)]
        )
        .unwrap_err();
        assert!(matches!(err, TemplateError::InsideLiteral { .. }));
    }

    #[test]
    fn leading_comments_do_not_hide_the_statement() {
        let id = [p("id", ValueType::Int)];
        assert!(
            pg("-- active users\nSELECT * FROM users WHERE id = {id}", &id)
                .unwrap()
                .returns_rows
        );
        assert!(
            pg("/* report */ select * from users where id = {id}", &id)
                .unwrap()
                .returns_rows
        );
        assert!(
            !pg("-- SELECT\nDELETE FROM users WHERE id = {id}", &id)
                .unwrap()
                .returns_rows
        );
    }
}
