use alloc::string::String;

use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

/// Recoverable failures of name-based member access.
///
/// Misusing a typed descriptor (for example asking a value-accessor member
/// for a reference) is a programming error and panics instead, see the
/// capability predicates on [`Member`](crate::member::Member).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MetaError {
    #[error("type `{owner}` has no member named `{member}`")]
    MemberNotFound { owner: &'static str, member: String },

    #[error("member `{owner}::{member}` has type `{actual}`, but `{expected}` was requested")]
    TypeMismatch {
        owner: &'static str,
        member: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("member `{owner}::{member}` is not an enum member")]
    NotEnum {
        owner: &'static str,
        member: &'static str,
    },

    #[error("member `{owner}::{member}` has no writer")]
    ReadOnly {
        owner: &'static str,
        member: &'static str,
    },

    #[error("value `{value}` has no symbol registered for enum `{enum_type}`")]
    SymbolNotFound {
        enum_type: &'static str,
        value: String,
    },

    #[error("`{name}` is not a registered symbol of enum `{enum_type}`")]
    NameNotFound {
        enum_type: &'static str,
        name: String,
    },
}

impl MetaError {
    /// Returns `true` if the error is a failed lookup of a member name.
    #[inline]
    pub fn is_member_not_found(&self) -> bool {
        matches!(self, Self::MemberNotFound { .. })
    }

    /// Returns `true` if the error is a failed enum symbol lookup, in either direction.
    #[inline]
    pub fn is_symbol_not_found(&self) -> bool {
        matches!(self, Self::SymbolNotFound { .. } | Self::NameNotFound { .. })
    }
}
