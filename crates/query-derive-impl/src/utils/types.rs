// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Type inspection helpers.
//!
//! Matching is syntactic: the last path segment decides, so `Option<T>`,
//! `std::option::Option<T>` and `core::option::Option<T>` are all optional.

use syn::{GenericArgument, PathArguments, Type};

/// Generic arguments of `ty` if its last path segment is `name`.
fn generic_args<'a>(ty: &'a Type, name: &str) -> Option<Vec<&'a Type>> {
    if let Type::Path(type_path) = ty
        && type_path.qself.is_none()
        && let Some(segment) = type_path.path.segments.last()
        && segment.ident == name
        && let PathArguments::AngleBracketed(args) = &segment.arguments
    {
        return Some(
            args.args
                .iter()
                .filter_map(|arg| match arg {
                    GenericArgument::Type(inner) => Some(inner),
                    _ => None
                })
                .collect()
        );
    }
    None
}

/// Extract the inner type from `Option<T>`.
pub fn option_inner(ty: &Type) -> Option<&Type> {
    generic_args(ty, "Option").and_then(|args| args.first().copied())
}

/// Extract the inner type from `Vec<T>`.
pub fn vec_inner(ty: &Type) -> Option<&Type> {
    generic_args(ty, "Vec").and_then(|args| args.first().copied())
}

/// Extract the success type from `Result<T, E>`.
pub fn result_ok(ty: &Type) -> Option<&Type> {
    generic_args(ty, "Result").and_then(|args| args.first().copied())
}

/// Check if `ty` is a plain path ending in the same identifier as `path`.
///
/// `User`, `crate::User` and `models::User` all name `models::User`.
pub fn names_path(ty: &Type, path: &syn::Path) -> bool {
    if let Type::Path(type_path) = ty
        && type_path.qself.is_none()
        && let Some(segment) = type_path.path.segments.last()
        && segment.arguments.is_none()
        && let Some(target) = path.segments.last()
    {
        return segment.ident == target.ident;
    }
    false
}
