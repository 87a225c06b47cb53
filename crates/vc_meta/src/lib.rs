//! Static member reflection.
//!
//! A type registers its members once, and generic code reads, writes and
//! enumerates them by name afterwards, without knowing whether a member is
//! stored directly in the object or reached through accessor functions.
//!
//! ## Menu
//!
//! - [`Access`](access::Access): How a single member is read and written.
//! - [`Member`](member::Member): A named, typed member descriptor.
//! - [`EnumMember`](enums::EnumMember): A member descriptor for enum values,
//!   with a shared symbol table mapping names to values.
//! - [`Meta`](registry::Meta): The registration trait, implemented by type authors.
//! - [`Members`](registry::Members): The ordered member set of one type.
//! - [`MetaRegistry`](registry::MetaRegistry): Storage for member sets and symbol tables.
//! - [`ops`]: Name-based accessors for generic code.
//!
//! # Examples
//!
//! ```
//! use vc_meta::{ops, member::Member, registry::{Meta, MetaRegistry, Members}};
//!
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! impl Meta for Point {
//!     fn register_members(_: &MetaRegistry) -> Members<Self> {
//!         Members::new()
//!             .with(Member::field("x", |p: &Point| &p.x, |p| &mut p.x))
//!             .with(Member::field("y", |p: &Point| &p.y, |p| &mut p.y))
//!     }
//! }
//!
//! let mut p = Point { x: 1, y: 2 };
//!
//! assert_eq!(ops::get_member_value::<i32, _>(&p, "x").unwrap(), 1);
//! ops::set_member_value::<i32, _>(&mut p, "y", 5).unwrap();
//! assert_eq!(p.y, 5);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Compilation config

/// Some macros used for compilation control.
pub(crate) mod cfg {
    /// Expands the inner block only when per-member tracing is enabled.
    macro_rules! debug {
        ($($tt:tt)*) => {
            #[cfg(all(debug_assertions, feature = "debug"))]
            { $($tt)* }
        };
    }

    pub(crate) use debug;
}

// -----------------------------------------------------------------------------
// Extern Self

// The derive macros emit `::vc_meta` paths, this alias lets the crate's
// own tests use them.
extern crate self as vc_meta;

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod hash;

pub mod access;
pub mod enums;
pub mod member;
pub mod ops;
pub mod registry;

#[cfg(all(test, feature = "derive"))]
mod tests;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::MetaError;

#[cfg(feature = "derive")]
pub use vc_meta_derive as derive;
