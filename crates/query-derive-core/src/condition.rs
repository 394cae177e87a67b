// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Condition tree builder.
//!
//! Reduces field tokens and connectors into one boolean predicate over
//! equality comparisons (`field = parameter`).
//!
//! # Grouping
//!
//! The reduction is a strict left fold, not precedence-aware:
//!
//! ```text
//! fields     [f0, f1, f2, f3]
//! connectors [c0, c1, c2]
//! result     ((f0 c0 f1) c1 f2) c2 f3
//! ```
//!
//! `email AND age OR status` therefore becomes `(email AND age) OR status`,
//! which coincides with standard precedence, but `name OR email AND age`
//! becomes `(name OR email) AND age`, where standard precedence would give
//! `name OR (email AND age)`. Existing method names depend on the fold, so it
//! must not be changed to precedence grouping.
//!
//! # NULL Arguments
//!
//! `field = NULL` holds for no row, so a comparison whose argument is `NULL`
//! is rendered as `field IS NULL` and binds nothing. [`Condition::matches`]
//! follows the same rule.

use std::fmt::Write;

use crate::{dialect::Dialect, naming::Connector, value::Value};

/// Boolean predicate over entity fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// `field = <parameter at index>`.
    Eq {
        /// Column name.
        field: String,
        /// Zero-based index of the bound parameter.
        param: usize
    },
    /// Conjunction.
    And(Box<Condition>, Box<Condition>),
    /// Disjunction.
    Or(Box<Condition>, Box<Condition>)
}

impl Condition {
    /// Build the tree from field tokens and connectors.
    ///
    /// Field `i` is compared against parameter `i`. Returns `None` unless
    /// there is exactly one more field than connectors.
    ///
    /// The stack holds the comparisons with the first field on top. Each
    /// connector pops the accumulated node (left) and the next comparison
    /// (right) and pushes their combination, so exactly one node remains
    /// once every connector is consumed.
    pub fn build(fields: &[String], connectors: &[Connector]) -> Option<Self> {
        if fields.is_empty() || fields.len() != connectors.len() + 1 {
            return None;
        }

        let mut stack: Vec<Self> = fields
            .iter()
            .enumerate()
            .rev()
            .map(|(param, field)| Self::Eq {
                field: field.clone(),
                param
            })
            .collect();

        for connector in connectors {
            let left = stack.pop()?;
            let right = stack.pop()?;
            stack.push(match connector {
                Connector::And => Self::And(Box::new(left), Box::new(right)),
                Connector::Or => Self::Or(Box::new(left), Box::new(right))
            });
        }

        match (stack.pop(), stack.is_empty()) {
            (Some(root), true) => Some(root),
            _ => None
        }
    }

    /// Number of equality comparisons in the tree.
    pub fn comparisons(&self) -> usize {
        match self {
            Self::Eq {
                ..
            } => 1,
            Self::And(l, r) | Self::Or(l, r) => l.comparisons() + r.comparisons()
        }
    }

    /// Render as a SQL boolean expression.
    ///
    /// Compound operands are always parenthesized. Returns the SQL and the
    /// parameter index for every bind marker in order of appearance.
    pub fn to_sql(&self, dialect: Dialect) -> (String, Vec<usize>) {
        self.to_sql_with(dialect, &[])
    }

    /// Render for concrete arguments.
    ///
    /// Same as [`Condition::to_sql`], except that comparisons whose argument
    /// is `NULL` become `field IS NULL` and take no marker.
    pub fn to_sql_with(&self, dialect: Dialect, args: &[Value]) -> (String, Vec<usize>) {
        let mut sql = String::new();
        let mut binds = Vec::new();
        self.render(dialect, args, &mut sql, &mut binds, false);
        (sql, binds)
    }

    fn render(
        &self,
        dialect: Dialect,
        args: &[Value],
        out: &mut String,
        binds: &mut Vec<usize>,
        nested: bool
    ) {
        match self {
            Self::Eq {
                field,
                param
            } => {
                if args.get(*param).is_some_and(Value::is_null) {
                    let _ = write!(out, "{field} IS NULL");
                    return;
                }
                binds.push(*param);
                let marker = dialect.marker(binds.len());
                let _ = write!(out, "{field} = {marker}");
            }
            Self::And(left, right) | Self::Or(left, right) => {
                let keyword = if matches!(self, Self::And(..)) {
                    Connector::And
                } else {
                    Connector::Or
                };
                if nested {
                    out.push('(');
                }
                left.render(dialect, args, out, binds, true);
                let _ = write!(out, " {keyword} ");
                right.render(dialect, args, out, binds, true);
                if nested {
                    out.push(')');
                }
            }
        }
    }

    /// Evaluate against a column lookup and argument values.
    ///
    /// A `NULL` argument matches a missing or `NULL` column; any other
    /// argument matches an equal, non-`NULL` column.
    pub fn matches<F>(&self, column: &F, args: &[Value]) -> bool
    where
        F: Fn(&str) -> Option<Value>
    {
        match self {
            Self::Eq {
                field,
                param
            } => match args.get(*param) {
                Some(Value::Null) => column(field).is_none_or(|actual| actual.is_null()),
                Some(expected) => column(field).is_some_and(|actual| actual == *expected),
                None => false
            },
            Self::And(l, r) => l.matches(column, args) && r.matches(column, args),
            Self::Or(l, r) => l.matches(column, args) || r.matches(column, args)
        }
    }
}
