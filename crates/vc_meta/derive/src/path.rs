//! Paths into `vc_meta` used by the generated code.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the correct access path to the `vc_meta` crate.
///
/// 1. For crates that depend on `vc_meta`, `::vc_meta` is returned.
/// 2. For crates that depend on `vc_meta_core`, `::vc_meta_core::meta` is returned.
/// 3. For other situations, `::vc_meta` is returned, but this may be incorrect.
///
/// This reads the caller's `Cargo.toml`, so call it once per macro invocation.
pub(crate) fn vc_meta() -> syn::Path {
    vc_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("vc_meta"))
}

// -----------------------------------------------------------------------------
// Items

#[inline(always)]
pub(crate) fn meta_(vc_meta_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_meta_path::registry::Meta
    }
}

#[inline(always)]
pub(crate) fn members_(vc_meta_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_meta_path::registry::Members
    }
}

#[inline(always)]
pub(crate) fn registry_(vc_meta_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_meta_path::registry::MetaRegistry
    }
}

#[inline(always)]
pub(crate) fn constructor_arg_(vc_meta_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_meta_path::registry::ConstructorArg
    }
}

#[inline(always)]
pub(crate) fn member_(vc_meta_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_meta_path::member::Member
    }
}

#[inline(always)]
pub(crate) fn enum_member_(vc_meta_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_meta_path::enums::EnumMember
    }
}

#[inline(always)]
pub(crate) fn meta_enum_(vc_meta_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_meta_path::enums::MetaEnum
    }
}
