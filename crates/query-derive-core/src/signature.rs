// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Method descriptors.
//!
//! A [`MethodDescriptor`] captures everything the registry needs to know about
//! one repository method: its name, ordered parameters, declared result
//! shape, and optionally a raw-SQL template, the modification flag and the
//! opt-out marker.
//!
//! Descriptors are normally emitted by `#[repository]`, which reads them off
//! the trait signature at compile time. They can also be built by hand:
//!
//! ```rust
//! use query_derive_core::{MethodDescriptor, ResultShape, ValueType};
//!
//! let find = MethodDescriptor::new("find_by_email")
//!     .param("email", ValueType::Text)
//!     .returns(ResultShape::OptionalSingle);
//!
//! let rename = MethodDescriptor::new("rename")
//!     .param("id", ValueType::Int)
//!     .param("name", ValueType::Text)
//!     .query("UPDATE users SET name = {name} WHERE id = {id}")
//!     .modifying(true)
//!     .returns(ResultShape::Scalar);
//! ```

use std::fmt;

use crate::{
    naming,
    value::{SqlType, ValueType}
};

/// Cardinality contract of a method's return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResultShape {
    /// First matching row, or nothing.
    #[default]
    OptionalSingle,
    /// Every matching row, possibly none.
    List,
    /// A single value: aggregate, first column, or affected-row count.
    Scalar
}

impl fmt::Display for ResultShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OptionalSingle => f.write_str("optional"),
            Self::List => f.write_str("list"),
            Self::Scalar => f.write_str("scalar")
        }
    }
}

/// Declared method parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Param {
    /// Parameter name.
    pub name:     &'static str,
    /// Parameter type.
    pub ty:       ValueType,
    /// Whether `NULL` may be passed (`Option<T>`).
    pub nullable: bool
}

/// Raw-SQL template attached to a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryTemplate {
    /// SQL text with `{name}` placeholders.
    pub sql:       &'static str,
    /// Commit the session after a successful run.
    pub modifying: bool
}

/// How the registry resolves a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// Opted out; has a hand-written body.
    Skipped,
    /// Carries a raw-SQL template.
    Template,
    /// Name starts with a recognized query prefix.
    Derived,
    /// Neither of the above.
    Unresolvable
}

/// Everything known about one repository method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    name:      &'static str,
    params:    Vec<Param>,
    returns:   ResultShape,
    query:     Option<&'static str>,
    modifying: bool,
    skip:      bool
}

impl MethodDescriptor {
    /// Start a descriptor for the method `name`.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            params: Vec::new(),
            returns: ResultShape::OptionalSingle,
            query: None,
            modifying: false,
            skip: false
        }
    }

    /// Append a parameter that never takes `NULL`.
    #[must_use]
    pub fn param(self, name: &'static str, ty: ValueType) -> Self {
        self.push_param(name, ty, false)
    }

    /// Append a parameter that accepts `NULL`.
    #[must_use]
    pub fn nullable_param(self, name: &'static str, ty: ValueType) -> Self {
        self.push_param(name, ty, true)
    }

    /// Append a parameter typed after the Rust type `T`.
    ///
    /// `Option<T>` parameters accept `NULL`.
    #[must_use]
    pub fn param_of<T: SqlType>(self, name: &'static str) -> Self {
        self.push_param(name, T::TYPE, T::NULLABLE)
    }

    fn push_param(mut self, name: &'static str, ty: ValueType, nullable: bool) -> Self {
        self.params.push(Param {
            name,
            ty,
            nullable
        });
        self
    }

    /// Set the declared result shape.
    #[must_use]
    pub fn returns(mut self, shape: ResultShape) -> Self {
        self.returns = shape;
        self
    }

    /// Attach a raw-SQL template.
    #[must_use]
    pub fn query(mut self, sql: &'static str) -> Self {
        self.query = Some(sql);
        self
    }

    /// Mark the template as modifying (commits on success).
    #[must_use]
    pub fn modifying(mut self, modifying: bool) -> Self {
        self.modifying = modifying;
        self
    }

    /// Opt the method out of generation.
    #[must_use]
    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Method name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Declared parameters in order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Declared result shape.
    pub const fn shape(&self) -> ResultShape {
        self.returns
    }

    /// Attached template, if any.
    pub const fn template(&self) -> Option<QueryTemplate> {
        match self.query {
            Some(sql) => Some(QueryTemplate {
                sql,
                modifying: self.modifying
            }),
            None => None
        }
    }

    /// Check if the modification flag is set.
    pub const fn is_modifying(&self) -> bool {
        self.modifying
    }

    /// Check if the method opted out of generation.
    pub const fn is_skipped(&self) -> bool {
        self.skip
    }

    /// Classify the method.
    ///
    /// The opt-out marker wins over everything else, a template wins over
    /// the method name.
    pub fn kind(&self) -> MethodKind {
        if self.skip {
            MethodKind::Skipped
        } else if self.query.is_some() {
            MethodKind::Template
        } else if naming::has_query_prefix(self.name) {
            MethodKind::Derived
        } else {
            MethodKind::Unresolvable
        }
    }

    /// Check if `other` describes the same method.
    ///
    /// Two descriptors are compatible when they agree on every field; a
    /// re-registration is only accepted in that case.
    pub fn is_compatible_with(&self, other: &Self) -> bool {
        self == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let method = MethodDescriptor::new("find_by_email").param("email", ValueType::Text);
        assert_eq!(method.name(), "find_by_email");
        assert_eq!(method.params().len(), 1);
        assert_eq!(method.shape(), ResultShape::OptionalSingle);
        assert!(method.template().is_none());
        assert!(!method.is_modifying());
        assert!(!method.is_skipped());
    }

    #[test]
    fn nullability_follows_rust_type() {
        let method = MethodDescriptor::new("find_by_nickname_and_age")
            .param_of::<Option<String>>("nickname")
            .param_of::<i32>("age");
        assert_eq!(
            method.params(),
            [
                Param {
                    name:     "nickname",
                    ty:       ValueType::Text,
                    nullable: true
                },
                Param {
                    name:     "age",
                    ty:       ValueType::Int,
                    nullable: false
                }
            ]
        );
        assert!(
            MethodDescriptor::new("x")
                .nullable_param("n", ValueType::Text)
                .params()[0]
                .nullable
        );
    }

    #[test]
    fn classification() {
        assert_eq!(MethodDescriptor::new("find_by_email").kind(), MethodKind::Derived);
        assert_eq!(
            MethodDescriptor::new("find_all_by_status").kind(),
            MethodKind::Derived
        );
        assert_eq!(MethodDescriptor::new("lookup").kind(), MethodKind::Unresolvable);
        assert_eq!(
            MethodDescriptor::new("lookup").query("SELECT 1").kind(),
            MethodKind::Template
        );
        assert_eq!(
            MethodDescriptor::new("find_by_email")
                .query("SELECT 1")
                .kind(),
            MethodKind::Template
        );
        assert_eq!(
            MethodDescriptor::new("find_by_email")
                .query("SELECT 1")
                .skip()
                .kind(),
            MethodKind::Skipped
        );
    }

    #[test]
    fn template_carries_flag() {
        let method = MethodDescriptor::new("touch")
            .query("UPDATE users SET seen = true")
            .modifying(true);
        assert_eq!(
            method.template(),
            Some(QueryTemplate {
                sql:       "UPDATE users SET seen = true",
                modifying: true
            })
        );
    }

    #[test]
    fn compatibility() {
        let a = MethodDescriptor::new("find_by_email").param("email", ValueType::Text);
        let b = MethodDescriptor::new("find_by_email").param("email", ValueType::Text);
        let c = MethodDescriptor::new("find_by_email").param("email", ValueType::Int);
        let d = a.clone().returns(ResultShape::List);

        assert!(a.is_compatible_with(&b));
        assert!(!a.is_compatible_with(&c));
        assert!(!a.is_compatible_with(&d));
    }
}
