// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Repository descriptor generation.
//!
//! # Generated Code
//!
//! ```rust,ignore
//! #[derive(Debug, Clone, Copy, Default)]
//! pub struct UserRepositoryDescriptor;
//!
//! impl ::query_derive::Repository for UserRepositoryDescriptor {
//!     const NAME: &'static str = concat!(module_path!(), "::", "UserRepository");
//!     type Entity = User;
//!
//!     fn methods() -> Vec<::query_derive::MethodDescriptor> {
//!         vec![
//!             ::query_derive::MethodDescriptor::new("find_by_email")
//!                 .param_of::<String>("email")
//!                 .returns(::query_derive::ResultShape::OptionalSingle),
//!         ]
//!     }
//! }
//! ```

use proc_macro2::TokenStream;
use query_derive_core::ResultShape;
use quote::quote;
use syn::Ident;

use super::parse::{MethodDef, RepositoryDef};

/// Generates the descriptor type and its `Repository` implementation.
pub fn generate(def: &RepositoryDef, descriptor: &Ident) -> TokenStream {
    let vis = &def.item.vis;
    let trait_name = def.ident().to_string();
    let entity = &def.entity;
    let doc = format!("Registration descriptor of [`{trait_name}`].");
    let methods = def.methods.iter().map(method_descriptor);

    quote! {
        #[doc = #doc]
        #[derive(Debug, Clone, Copy, Default)]
        #vis struct #descriptor;

        impl ::query_derive::Repository for #descriptor {
            const NAME: &'static str = ::core::concat!(::core::module_path!(), "::", #trait_name);

            type Entity = #entity;

            fn methods() -> ::std::vec::Vec<::query_derive::MethodDescriptor> {
                ::std::vec![#(#methods),*]
            }
        }
    }
}

fn method_descriptor(method: &MethodDef) -> TokenStream {
    let name = method.name();
    let shape = shape_tokens(method.returns.shape());

    if method.skip {
        return quote! {
            ::query_derive::MethodDescriptor::new(#name).returns(#shape).skip()
        };
    }

    let params = method.params.iter().map(|param| {
        let param_name = &param.name;
        let ty = &param.ty;
        quote! { .param_of::<#ty>(#param_name) }
    });

    let query = method.query.as_ref().map(|query| {
        let sql = &query.sql;
        let modifying = query.modifying;
        quote! { .query(#sql).modifying(#modifying) }
    });

    quote! {
        ::query_derive::MethodDescriptor::new(#name)
            #(#params)*
            .returns(#shape)
            #query
    }
}

fn shape_tokens(shape: ResultShape) -> TokenStream {
    match shape {
        ResultShape::OptionalSingle => quote! { ::query_derive::ResultShape::OptionalSingle },
        ResultShape::List => quote! { ::query_derive::ResultShape::List },
        ResultShape::Scalar => quote! { ::query_derive::ResultShape::Scalar }
    }
}
