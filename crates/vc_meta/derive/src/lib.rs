//! See following macros:
//!
//! - [`Meta`]
//! - [`MetaEnum`]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static META_ATTRIBUTE_NAME: &str = "meta";

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Member Registration
///
/// `#[derive(Meta)]` implements `Meta` for a struct, registering one member
/// per field in declaration order.
///
/// ```rust, ignore
/// #[derive(Meta)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
/// ```
///
/// By default every field is accessed through direct storage. Tuple struct
/// fields are named after their index (`"0"`, `"1"`, ...), unit structs have
/// no members.
///
/// ## Type Name
///
/// The name reported in errors defaults to `core::any::type_name`. Override it
/// with `#[meta(name = "...")]` at the type level:
///
/// ```rust, ignore
/// #[derive(Meta)]
/// #[meta(name = "Point")]
/// struct Point { /* ... */ }
/// ```
///
/// ## Constructor
///
/// `#[meta(ctor(T1, T2, ...))]` at the type level registers the argument
/// types of a non-default constructor, reported by `Meta::constructor_args`:
///
/// ```rust, ignore
/// #[derive(Meta)]
/// #[meta(ctor(String, u32))]
/// struct Person { /* ... */ }
/// ```
///
/// ## Field Attributes
///
/// - `#[meta(skip)]`: The field is not registered.
/// - `#[meta(rename = "...")]`: Registers the field under another name.
/// - `#[meta(get = path, set = path)]`: Value accessors, `fn(&Self) -> T` and
///   `fn(&mut Self, T)`. Omitting `set` makes the member read-only.
/// - `#[meta(get_ref = path, set_ref = path, get_mut = path)]`: Reference
///   accessors, `fn(&Self) -> &T`, `fn(&mut Self, &T)` and
///   `fn(&mut Self) -> &mut T`. `set_ref` and `get_mut` are optional.
/// - `#[meta(symbol("NAME", Enum::Value))]`: Registers the field as an enum
///   member and adds a symbol. Repeatable.
/// - `#[meta(as_enum)]`: Registers the field as an enum member without adding
///   symbols, e.g. when another field of the same type lists them.
///
/// Enum members take their symbol table from the registry passed to
/// `register_members`.
///
/// Value accessors and reference accessors cannot be mixed on one field.
///
/// ```rust, ignore
/// #[derive(Meta)]
/// struct Shape {
///     #[meta(symbol("RED", Color::Red), symbol("GREEN", Color::Green))]
///     color: Color,
///     #[meta(get = Shape::sides, set = Shape::set_sides)]
///     sides: u8,
///     #[meta(skip)]
///     cache: Vec<f32>,
/// }
/// ```
///
/// ## Generics
///
/// Generic types are supported; every type parameter gets a `'static` bound.
/// Lifetime parameters are rejected.
#[proc_macro_derive(Meta, attributes(meta))]
pub fn derive_meta(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match impls::impl_meta(&ast) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// # Enum Capability
///
/// `#[derive(MetaEnum)]` implements the `MetaEnum` marker trait, which
/// requires `Copy`, `Eq`, `Hash` and `Debug`.
///
/// ```rust, ignore
/// #[derive(MetaEnum, Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum Color {
///     Red,
///     Green,
/// }
/// ```
///
/// Only `enum` items are accepted.
#[proc_macro_derive(MetaEnum, attributes(meta))]
pub fn derive_meta_enum(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match impls::impl_meta_enum(&ast) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}
