// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Naming-convention parser.
//!
//! Splits a method name into a result-cardinality prefix, the ordered field
//! tokens, and the ordered connectors between them.
//!
//! # Grammar
//!
//! ```text
//! ^((find|get)(_all)?|count)_by_<field>((_and_|_or_)<field>)*$
//! ```
//!
//! | Prefix | Cardinality |
//! |--------|-------------|
//! | `find_by`, `get_by` | single |
//! | `find_all_by`, `get_all_by` | multiple |
//! | `count_by` | count |
//!
//! ```rust
//! use query_derive_core::naming::{self, Connector};
//!
//! let parsed = naming::parse("find_by_email_and_age_or_status").unwrap().unwrap();
//! assert_eq!(parsed.fields, ["email", "age", "status"]);
//! assert_eq!(parsed.connectors, [Connector::And, Connector::Or]);
//! ```
//!
//! The parser is shared by `#[repository]`, which runs it at compile time,
//! and by the registry, which runs it again at startup.

use std::fmt;

use crate::signature::{Param, ResultShape};

/// Recognized method prefixes, longest first.
const PREFIXES: &[(&str, Prefix)] = &[
    ("find_all_by_", Prefix::FindAllBy),
    ("get_all_by_", Prefix::GetAllBy),
    ("find_by_", Prefix::FindBy),
    ("get_by_", Prefix::GetBy),
    ("count_by_", Prefix::CountBy)
];

/// Method name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prefix {
    /// `find_by_`
    FindBy,
    /// `get_by_`
    GetBy,
    /// `find_all_by_`
    FindAllBy,
    /// `get_all_by_`
    GetAllBy,
    /// `count_by_`
    CountBy
}

impl Prefix {
    /// Result shape the prefix demands.
    pub const fn shape(self) -> ResultShape {
        match self {
            Self::FindBy | Self::GetBy => ResultShape::OptionalSingle,
            Self::FindAllBy | Self::GetAllBy => ResultShape::List,
            Self::CountBy => ResultShape::Scalar
        }
    }
}

/// Boolean connector between two field tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connector {
    /// `_and_`
    And,
    /// `_or_`
    Or
}

impl Connector {
    /// SQL keyword.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR"
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Tokenized method name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    /// Cardinality prefix.
    pub prefix:     Prefix,
    /// Field tokens in declaration order (lowercase).
    pub fields:     Vec<String>,
    /// Connectors, `fields.len() - 1` of them.
    pub connectors: Vec<Connector>
}

/// Why a method name does not line up with its signature.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NamingError {
    /// A field token is empty (`find_by_`, `find_by_a_and_`).
    #[error("empty field token at position {position}")]
    EmptyField {
        /// Zero-based token position.
        position: usize
    },

    /// Number of field tokens differs from the parameter count.
    #[error("name has {fields} field token(s) but the method declares {params} parameter(s)")]
    Arity {
        /// Field tokens in the name.
        fields: usize,
        /// Declared parameters.
        params: usize
    },

    /// Token and parameter at the same position have different names.
    #[error("field token `{field}` does not match parameter `{param}` at position {position}")]
    Name {
        /// Zero-based position.
        position: usize,
        /// Token from the method name.
        field:    String,
        /// Declared parameter name.
        param:    String
    },

    /// Prefix cardinality disagrees with the declared result shape.
    #[error("prefix requires a {expected} result but the method returns {found}")]
    Shape {
        /// Shape demanded by the prefix.
        expected: ResultShape,
        /// Declared shape.
        found:    ResultShape
    }
}

/// Check if `name` starts with a recognized query prefix.
pub fn has_query_prefix(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    PREFIXES.iter().any(|(p, _)| name.starts_with(p))
}

/// Tokenize a method name.
///
/// Returns `Ok(None)` when the name has no recognized prefix, so the caller
/// can route the method elsewhere.
///
/// # Errors
///
/// Returns [`NamingError::EmptyField`] when a prefix is present but a field
/// token is empty.
pub fn parse(name: &str) -> Result<Option<ParsedName>, NamingError> {
    let name = name.to_ascii_lowercase();
    let Some((rest, prefix)) = PREFIXES
        .iter()
        .find_map(|(p, kind)| name.strip_prefix(p).map(|rest| (rest, *kind)))
    else {
        return Ok(None);
    };

    let mut fields = Vec::new();
    let mut connectors = Vec::new();
    let mut remaining = rest;

    loop {
        match next_connector(remaining) {
            Some((idx, connector, width)) => {
                fields.push(remaining[..idx].to_string());
                connectors.push(connector);
                remaining = &remaining[idx + width..];
            }
            None => {
                fields.push(remaining.to_string());
                break;
            }
        }
    }

    if let Some(position) = fields.iter().position(String::is_empty) {
        return Err(NamingError::EmptyField {
            position
        });
    }

    Ok(Some(ParsedName {
        prefix,
        fields,
        connectors
    }))
}

/// Earliest `_and_` or `_or_` in `s`: (byte index, connector, length).
fn next_connector(s: &str) -> Option<(usize, Connector, usize)> {
    let and = s.find("_and_").map(|i| (i, Connector::And, 5));
    let or = s.find("_or_").map(|i| (i, Connector::Or, 4));
    match (and, or) {
        (Some(a), Some(o)) => Some(if a.0 <= o.0 { a } else { o }),
        (a, o) => a.or(o)
    }
}

impl ParsedName {
    /// Check the tokens against the declared parameters and result shape.
    ///
    /// Tokens must equal the parameter names in order (case-normalized),
    /// and the declared shape must be the one the prefix demands.
    ///
    /// # Errors
    ///
    /// Returns the first [`NamingError`] found.
    pub fn align(&self, params: &[Param], shape: ResultShape) -> Result<(), NamingError> {
        let names: Vec<&str> = params.iter().map(|p| p.name).collect();
        self.align_names(&names, shape)
    }

    /// Same as [`ParsedName::align`] for bare parameter names.
    ///
    /// Used by `#[repository]`, which knows names before types are resolved.
    ///
    /// # Errors
    ///
    /// Returns the first [`NamingError`] found.
    pub fn align_names(&self, params: &[&str], shape: ResultShape) -> Result<(), NamingError> {
        if self.fields.len() != params.len() {
            return Err(NamingError::Arity {
                fields: self.fields.len(),
                params: params.len()
            });
        }

        for (position, (field, param)) in self.fields.iter().zip(params).enumerate() {
            if !field.eq_ignore_ascii_case(param) {
                return Err(NamingError::Name {
                    position,
                    field: field.clone(),
                    param: param.to_string()
                });
            }
        }

        let expected = self.prefix.shape();
        if expected != shape {
            return Err(NamingError::Shape {
                expected,
                found: shape
            });
        }

        Ok(())
    }
}
