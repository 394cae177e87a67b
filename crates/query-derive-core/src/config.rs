// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Registry configuration.
//!
//! [`RegistryConfig`] is plain data with serde support so a host
//! application can load it through its own configuration layer:
//!
//! ```rust
//! use query_derive_core::{Dialect, RegistryConfig, UnusedParameterPolicy};
//!
//! let config = RegistryConfig::default()
//!     .dialect(Dialect::Positional)
//!     .unused_parameters(UnusedParameterPolicy::Warn)
//!     .default_schema("app");
//! ```

use serde::Deserialize;

use crate::dialect::Dialect;

/// What to do when a template never references a declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnusedParameterPolicy {
    /// Fail registration with a template binding error.
    #[default]
    Deny,

    /// Log a warning and register anyway.
    Warn
}

/// Settings applied while building a registry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Bind marker style.
    pub dialect:           Dialect,
    /// Handling of unused template parameters.
    pub unused_parameters: UnusedParameterPolicy,
    /// Schema for entities that declare none.
    pub default_schema:    Option<String>
}

impl RegistryConfig {
    /// Set the bind marker style.
    #[must_use]
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the unused parameter policy.
    #[must_use]
    pub fn unused_parameters(mut self, policy: UnusedParameterPolicy) -> Self {
        self.unused_parameters = policy;
        self
    }

    /// Set the default schema.
    #[must_use]
    pub fn default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = Some(schema.into());
        self
    }
}
