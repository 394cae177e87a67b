// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Dynamically typed values exchanged with the database.
//!
//! Parameters are converted into [`Value`] with [`ToValue`] before binding,
//! columns come back as [`Value`] and are decoded with [`FromValue`].
//! [`SqlType`] exposes the column type of a Rust type at compile time so that
//! generated descriptors can be built in `static` context.
//!
//! # Type Mapping
//!
//! | Rust | [`ValueType`] |
//! |------|---------------|
//! | `bool` | `Bool` |
//! | `i16`, `i32`, `i64` | `Int` |
//! | `f32`, `f64` | `Float` |
//! | `String`, `&str` | `Text` |
//! | `uuid::Uuid` | `Uuid` |
//! | `chrono::DateTime<Utc>` | `Timestamp` |
//! | `Option<T>` | same as `T`, nullable |

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Column or parameter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Boolean.
    Bool,
    /// Signed integer of any width.
    Int,
    /// Floating point number.
    Float,
    /// Text.
    Text,
    /// UUID.
    Uuid,
    /// Timestamp with time zone (UTC).
    Timestamp
}

impl ValueType {
    /// Check if a value of type `self` may be bound where `target` is
    /// expected.
    ///
    /// Identical types are compatible and integers widen into floats.
    pub const fn is_compatible_with(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Bool, Self::Bool)
                | (Self::Int, Self::Int)
                | (Self::Int, Self::Float)
                | (Self::Float, Self::Float)
                | (Self::Text, Self::Text)
                | (Self::Uuid, Self::Uuid)
                | (Self::Timestamp, Self::Timestamp)
        )
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Text => "text",
            Self::Uuid => "uuid",
            Self::Timestamp => "timestamp"
        };
        f.write_str(name)
    }
}

/// A single database value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL `NULL`.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Text.
    Text(String),
    /// UUID.
    Uuid(Uuid),
    /// UTC timestamp.
    Timestamp(DateTime<Utc>)
}

impl Value {
    /// Type of this value, `None` for `NULL`.
    pub const fn value_type(&self) -> Option<ValueType> {
        match self {
            Self::Null => None,
            Self::Bool(_) => Some(ValueType::Bool),
            Self::Int(_) => Some(ValueType::Int),
            Self::Float(_) => Some(ValueType::Float),
            Self::Text(_) => Some(ValueType::Text),
            Self::Uuid(_) => Some(ValueType::Uuid),
            Self::Timestamp(_) => Some(ValueType::Timestamp)
        }
    }

    /// Check if this value is `NULL`.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Convert into a value bindable where `target` is expected.
    ///
    /// `NULL` fits every type, whether a slot accepts it is decided by
    /// [`Param::nullable`](crate::signature::Param::nullable). Integers widen
    /// into floats. Returns the value unchanged when it already has the target
    /// type, `None` when the types are incompatible.
    pub fn coerce(self, target: ValueType) -> Option<Self> {
        match (self, target) {
            (Self::Int(v), ValueType::Float) => Some(Self::Float(v as f64)),
            (value, target) => match value.value_type() {
                None => Some(value),
                Some(ty) if ty == target => Some(value),
                Some(_) => None
            }
        }
    }
}

/// Compile-time column type of a Rust type.
pub trait SqlType {
    /// Column type.
    const TYPE: ValueType;

    /// Whether `NULL` is representable.
    const NULLABLE: bool = false;
}

/// Conversion of a parameter into a [`Value`].
pub trait ToValue {
    /// Convert into a bindable value.
    fn to_value(&self) -> Value;
}

/// Conversion of a [`Value`] into a Rust type.
pub trait FromValue: Sized {
    /// Decode `value` read from `column`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] on type mismatch, overflow or unexpected
    /// `NULL`.
    fn from_value(value: Value, column: &str) -> Result<Self>;
}

fn mismatch(column: &str, expected: ValueType, found: &Value) -> Error {
    match found {
        Value::Null => Error::decode(column, format!("expected {expected}, found NULL")),
        other => Error::decode(
            column,
            format!("expected {expected}, found {:?}", other.value_type())
        )
    }
}

macro_rules! int_value {
    ($($ty:ty),*) => {$(
        impl SqlType for $ty {
            const TYPE: ValueType = ValueType::Int;
        }

        impl ToValue for $ty {
            fn to_value(&self) -> Value {
                Value::Int(i64::from(*self))
            }
        }

        impl FromValue for $ty {
            fn from_value(value: Value, column: &str) -> Result<Self> {
                match value {
                    Value::Int(v) => <$ty>::try_from(v).map_err(|_| {
                        Error::decode(column, format!("{v} out of range for {}", stringify!($ty)))
                    }),
                    other => Err(mismatch(column, ValueType::Int, &other))
                }
            }
        }
    )*};
}

int_value!(i16, i32, i64);

/// Affected-row counts.
impl FromValue for u64 {
    fn from_value(value: Value, column: &str) -> Result<Self> {
        match value {
            Value::Int(v) => {
                u64::try_from(v).map_err(|_| Error::decode(column, format!("{v} out of range for u64")))
            }
            other => Err(mismatch(column, ValueType::Int, &other))
        }
    }
}

/// Discards the value, for statements run only for their effect.
impl FromValue for () {
    fn from_value(_: Value, _: &str) -> Result<Self> {
        Ok(())
    }
}

impl SqlType for bool {
    const TYPE: ValueType = ValueType::Bool;
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FromValue for bool {
    fn from_value(value: Value, column: &str) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(mismatch(column, ValueType::Bool, &other))
        }
    }
}

impl SqlType for f64 {
    const TYPE: ValueType = ValueType::Float;
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl FromValue for f64 {
    fn from_value(value: Value, column: &str) -> Result<Self> {
        match value {
            Value::Float(v) => Ok(v),
            #[allow(clippy::cast_precision_loss)]
            Value::Int(v) => Ok(v as f64),
            other => Err(mismatch(column, ValueType::Float, &other))
        }
    }
}

impl SqlType for f32 {
    const TYPE: ValueType = ValueType::Float;
}

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl FromValue for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: Value, column: &str) -> Result<Self> {
        f64::from_value(value, column).map(|v| v as f32)
    }
}

impl SqlType for String {
    const TYPE: ValueType = ValueType::Text;
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl FromValue for String {
    fn from_value(value: Value, column: &str) -> Result<Self> {
        match value {
            Value::Text(v) => Ok(v),
            other => Err(mismatch(column, ValueType::Text, &other))
        }
    }
}

impl SqlType for &str {
    const TYPE: ValueType = ValueType::Text;
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::Text(self.to_owned())
    }
}

impl SqlType for Uuid {
    const TYPE: ValueType = ValueType::Uuid;
}

impl ToValue for Uuid {
    fn to_value(&self) -> Value {
        Value::Uuid(*self)
    }
}

impl FromValue for Uuid {
    fn from_value(value: Value, column: &str) -> Result<Self> {
        match value {
            Value::Uuid(v) => Ok(v),
            Value::Text(s) => Uuid::parse_str(&s).map_err(|e| Error::decode(column, e.to_string())),
            other => Err(mismatch(column, ValueType::Uuid, &other))
        }
    }
}

impl SqlType for DateTime<Utc> {
    const TYPE: ValueType = ValueType::Timestamp;
}

impl ToValue for DateTime<Utc> {
    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: Value, column: &str) -> Result<Self> {
        match value {
            Value::Timestamp(v) => Ok(v),
            other => Err(mismatch(column, ValueType::Timestamp, &other))
        }
    }
}

impl<T: SqlType> SqlType for Option<T> {
    const TYPE: ValueType = T::TYPE;
    const NULLABLE: bool = true;
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, ToValue::to_value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value, column: &str) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other, column).map(Some)
        }
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}
