// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Error taxonomy for query derivation and execution.
//!
//! Errors fall into two groups:
//!
//! | Group | Variants | When |
//! |-------|----------|------|
//! | Startup | `UnresolvableMethod`, `SignatureMismatch`, `DuplicateRegistration` | Registry construction, always fatal |
//! | Startup or call | `TemplateBinding` | Placeholder/parameter mismatch, type mismatch |
//! | Call | `QueryExecution`, `Decode`, `UnknownMethod` | Invocation, returned to the caller |
//!
//! Execution errors are returned only after the scoped session has been
//! released.

use std::error::Error as StdError;

/// Boxed driver error carried by [`Error::QueryExecution`].
pub type DriverError = Box<dyn StdError + Send + Sync + 'static>;

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while registering or invoking repository methods.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Method name matches neither the naming grammar nor carries a template.
    #[error("method `{repository}::{method}` is neither a naming-convention method nor a template method")]
    UnresolvableMethod {
        /// Repository the method belongs to.
        repository: String,
        /// Offending method name.
        method:     String
    },

    /// Naming-convention tokens do not line up with the declared signature.
    #[error("signature of `{repository}::{method}` does not match its name: {reason}")]
    SignatureMismatch {
        /// Repository the method belongs to.
        repository: String,
        /// Offending method name.
        method:     String,
        /// What did not line up.
        reason:     String
    },

    /// Template placeholders, parameters or argument types disagree.
    #[error("cannot bind template of `{repository}::{method}`: {reason}")]
    TemplateBinding {
        /// Repository the method belongs to.
        repository: String,
        /// Offending method name.
        method:     String,
        /// What could not be bound.
        reason:     String
    },

    /// A method was registered twice with incompatible descriptors.
    #[error("method `{repository}::{method}` is already registered with a different signature")]
    DuplicateRegistration {
        /// Repository the method belongs to.
        repository: String,
        /// Offending method name.
        method:     String
    },

    /// The driver failed while opening, running or releasing a session.
    #[error("query `{repository}::{method}` failed: {source}")]
    QueryExecution {
        /// Repository the method belongs to.
        repository: String,
        /// Invoked method name.
        method:     String,
        /// Underlying driver error.
        #[source]
        source:     DriverError
    },

    /// A row or scalar could not be converted into the declared type.
    #[error("cannot decode column `{column}`: {reason}")]
    Decode {
        /// Column (or `#0` for positional scalars) that failed.
        column: String,
        /// Why decoding failed.
        reason: String
    },

    /// The method is not registered, or was opted out of generation.
    #[error("no generated implementation for `{repository}::{method}`")]
    UnknownMethod {
        /// Requested repository.
        repository: String,
        /// Requested method name.
        method:     String
    }
}

impl Error {
    /// Check if this error can only occur while building a registry.
    pub const fn is_startup(&self) -> bool {
        matches!(
            self,
            Self::UnresolvableMethod { .. }
                | Self::SignatureMismatch { .. }
                | Self::DuplicateRegistration { .. }
        )
    }

    /// Check if this error came from the database driver.
    pub const fn is_execution(&self) -> bool {
        matches!(self, Self::QueryExecution { .. })
    }

    pub(crate) fn decode(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            reason: reason.into()
        }
    }
}
