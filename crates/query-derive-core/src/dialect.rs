// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Bind marker dialects.
//!
//! Controls the driver-level bind markers that replace placeholders and
//! condition parameters in generated SQL.

use serde::Deserialize;

/// Bind marker style of the target database.
///
/// | Dialect | Marker | Repeated parameter |
/// |---------|--------|--------------------|
/// | `Postgres` | `$1, $2, ...` | reuses its number |
/// | `Positional` | `?` | bound once per occurrence |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Numbered markers (PostgreSQL).
    #[default]
    Postgres,

    /// Anonymous `?` markers (SQLite, MySQL).
    Positional
}

impl Dialect {
    /// Marker for the bind slot at `index` (1-based).
    #[must_use]
    pub fn marker(self, index: usize) -> String {
        match self {
            Self::Postgres => format!("${index}"),
            Self::Positional => "?".to_string()
        }
    }

    /// Check if a repeated parameter can reuse an earlier marker.
    #[must_use]
    pub const fn reuses_markers(self) -> bool {
        matches!(self, Self::Postgres)
    }
}
