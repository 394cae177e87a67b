// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Trait implementation for `RepositoryHandle`.
//!
//! Every generated method converts its arguments to values in declaration
//! order, routes the call through the registry, then decodes the output by
//! the declared return type. Skipped methods are left to their default body.
//!
//! | Return | Decoding |
//! |--------|----------|
//! | `Option<Entity>` / `Vec<Entity>` | `Entity::from_row` |
//! | `Option<T>` / `Vec<T>` | first column of each row |
//! | `T` | `QueryOutput::into_scalar` |

use proc_macro2::TokenStream;
use quote::quote;
use syn::Ident;

use super::parse::{MethodDef, RepositoryDef, Returns};
use crate::utils::types::names_path;

/// Generates `impl Trait for RepositoryHandle<Descriptor, F>`.
pub fn generate(def: &RepositoryDef, descriptor: &Ident) -> TokenStream {
    let trait_ident = def.ident();
    let methods = def
        .methods
        .iter()
        .filter(|method| !method.skip)
        .map(|method| generate_method(def, method));

    quote! {
        #[::query_derive::async_trait]
        impl<__F: ::query_derive::SessionFactory> #trait_ident
            for ::query_derive::RepositoryHandle<#descriptor, __F>
        {
            #(#methods)*
        }
    }
}

fn generate_method(def: &RepositoryDef, method: &MethodDef) -> TokenStream {
    let ident = &method.ident;
    let name = method.name();
    let output = &method.output;
    let idents: Vec<_> = method.params.iter().map(|p| &p.ident).collect();
    let types = method.params.iter().map(|p| &p.ty);
    let decode = decode(def, &method.returns);

    quote! {
        async fn #ident(&self, #(#idents: #types),*) -> #output {
            let output = ::query_derive::RepositoryHandle::call(
                self,
                #name,
                ::std::vec![#(::query_derive::ToValue::to_value(&#idents)),*]
            )
            .await?;
            ::core::result::Result::Ok(#decode?)
        }
    }
}

fn decode(def: &RepositoryDef, returns: &Returns) -> TokenStream {
    match returns {
        Returns::Optional(inner) if names_path(inner, &def.entity) => {
            quote! { output.into_entity::<#inner>() }
        }
        Returns::Optional(inner) => {
            quote! { output.into_optional(|row: &::query_derive::Row| row.first::<#inner>()) }
        }
        Returns::List(inner) if names_path(inner, &def.entity) => {
            quote! { output.into_entities::<#inner>() }
        }
        Returns::List(inner) => {
            quote! { output.into_list(|row: &::query_derive::Row| row.first::<#inner>()) }
        }
        Returns::Scalar(ty) => quote! { output.into_scalar::<#ty>() }
    }
}
