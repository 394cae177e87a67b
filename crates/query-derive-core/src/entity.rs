// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity descriptors and row mapping.
//!
//! An [`EntityDescriptor`] is the read-only view of a modeled record type:
//! its table and the name and type of every column. Descriptors are built in
//! `static` context by `#[derive(Entity)]` and never change afterwards.
//!
//! ```rust,ignore
//! #[derive(Entity)]
//! #[entity(table = "users", schema = "public")]
//! pub struct User {
//!     pub id: Uuid,
//!     pub email: String,
//!     pub age: i64
//! }
//!
//! assert_eq!(User::descriptor().qualified_table(None), "public.users");
//! ```

use crate::{
    error::{Error, Result},
    value::{FromValue, Value, ValueType}
};

/// Single column of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Column name (equal to the struct field name).
    pub name:     &'static str,
    /// Column type.
    pub ty:       ValueType,
    /// Whether the column accepts `NULL`.
    pub nullable: bool
}

impl FieldDescriptor {
    /// Create a field descriptor.
    pub const fn new(name: &'static str, ty: ValueType, nullable: bool) -> Self {
        Self {
            name,
            ty,
            nullable
        }
    }
}

/// Table mapping of an entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDescriptor {
    /// Rust type name (e.g., `User`).
    pub name:   &'static str,
    /// Table name (e.g., `users`).
    pub table:  &'static str,
    /// Explicit schema, if any.
    pub schema: Option<&'static str>,
    /// Columns in declaration order.
    pub fields: &'static [FieldDescriptor]
}

impl EntityDescriptor {
    /// Create an entity descriptor.
    pub const fn new(
        name: &'static str,
        table: &'static str,
        schema: Option<&'static str>,
        fields: &'static [FieldDescriptor]
    ) -> Self {
        Self {
            name,
            table,
            schema,
            fields
        }
    }

    /// Look up a column by case-insensitive name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Table name qualified with the entity schema, or `default_schema`
    /// when the entity declares none.
    pub fn qualified_table(&self, default_schema: Option<&str>) -> String {
        match self.schema.or(default_schema) {
            Some(schema) => format!("{schema}.{}", self.table),
            None => self.table.to_string()
        }
    }

    /// Comma-separated column list for SELECT.
    pub fn columns(&self) -> String {
        self.fields
            .iter()
            .map(|f| f.name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A record type that maps to a table.
///
/// Implemented by `#[derive(Entity)]`.
pub trait Entity: Sized + Send + Sync + 'static {
    /// Static table mapping.
    fn descriptor() -> &'static EntityDescriptor;

    /// Build the entity from a result row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if a column is missing or has the wrong
    /// type.
    fn from_row(row: &Row) -> Result<Self>;
}

/// A result row with named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values:  Vec<Value>
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: Value) -> Self {
        self.push(column, value);
        self
    }

    /// Append a column in place.
    pub fn push(&mut self, column: impl Into<String>, value: Value) {
        self.columns.push(column.into());
        self.values.push(value);
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw value of a column, matched case-insensitively.
    pub fn value(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(column))
            .map(|idx| &self.values[idx])
    }

    /// Decode a column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the column is missing or cannot be
    /// converted into `T`.
    pub fn get<T: FromValue>(&self, column: &str) -> Result<T> {
        let value = self
            .value(column)
            .cloned()
            .ok_or_else(|| Error::decode(column, "column not present in result"))?;
        T::from_value(value, column)
    }

    /// Decode the first column, used for scalar results.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the row is empty or the value cannot be
    /// converted into `T`.
    pub fn first<T: FromValue>(&self) -> Result<T> {
        let value = self
            .values
            .first()
            .cloned()
            .ok_or_else(|| Error::decode("#0", "row has no columns"))?;
        let column = self.columns.first().map_or("#0", String::as_str);
        T::from_value(value, column)
    }

    /// Consume the row, yielding the first column value.
    pub fn into_first(self) -> Value {
        self.values.into_iter().next().unwrap_or(Value::Null)
    }
}
