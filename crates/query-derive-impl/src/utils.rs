// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Shared utilities for code generation.
//!
//! # Submodules
//!
//! - [`types`] - Inspection of `Option<T>`, `Vec<T>` and `Result<T, E>`

pub mod types;
