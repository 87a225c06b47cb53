//! Provide name-based operations over registered types.
//!
//! These functions are the surface used by generic code (serializers,
//! inspectors, editors) that only knows a member by its name. Every lookup
//! failure is reported as a [`MetaError`]; a type without registration
//! behaves as if it had no members.
//!
//! ## Menu
//!
//! - Queries: [`is_registered`], [`get_members`], [`has_member`].
//! - Constructors: [`ctor_registered`], [`get_constructor_args`].
//! - Visiting: [`for_each_member`], [`with_member`].
//! - Typed values: [`get_member_value`], [`set_member_value`].
//! - Enum symbols: [`get_enum_member_value_string`], [`set_enum_member_value_string`],
//!   and the untyped [`get_member_symbol`], [`set_member_symbol`].

use core::any::type_name;

use crate::MetaError;
use crate::enums::{DynamicEnumMember, EnumMember, MetaEnum};
use crate::member::{DynamicMember, Member};
use crate::registry::{ConstructorArg, Meta, Members};

// -----------------------------------------------------------------------------
// Queries

/// Returns `true` if `C` has at least one registered member.
#[inline]
pub fn is_registered<C: Meta>() -> bool {
    !C::members().is_empty()
}

/// Returns the ordered member set of `C`.
#[inline]
pub fn get_members<C: Meta>() -> &'static Members<C> {
    C::members()
}

/// Returns `true` if `C` has a member called `name`.
#[inline]
pub fn has_member<C: Meta>(name: &str) -> bool {
    C::members().contains(name)
}

// -----------------------------------------------------------------------------
// Constructors

/// Returns `true` if `C` registered a non-default constructor.
#[inline]
pub fn ctor_registered<C: Meta>() -> bool {
    !C::constructor_args().is_empty()
}

/// Returns the argument types of the constructor registered by `C`.
#[inline]
pub fn get_constructor_args<C: Meta>() -> &'static [ConstructorArg] {
    C::constructor_args()
}

// -----------------------------------------------------------------------------
// Visiting

/// Calls `f` for every member of `C`, in registration order.
pub fn for_each_member<C: Meta>(mut f: impl FnMut(&'static dyn DynamicMember<C>)) {
    for member in C::members() {
        f(member);
    }
}

fn find<C: Meta>(name: &str) -> Result<&'static dyn DynamicMember<C>, MetaError> {
    C::members().get(name).ok_or_else(|| MetaError::MemberNotFound {
        owner: C::type_name(),
        member: name.into(),
    })
}

fn find_typed<C: Meta, T: 'static>(name: &str) -> Result<&'static Member<C, T>, MetaError> {
    let member = find::<C>(name)?;
    member.downcast::<T>().ok_or_else(|| MetaError::TypeMismatch {
        owner: C::type_name(),
        member: member.name(),
        expected: type_name::<T>(),
        actual: member.value_type_name(),
    })
}

fn find_enum<C: Meta>(name: &str) -> Result<&'static dyn DynamicEnumMember<C>, MetaError> {
    let member = find::<C>(name)?;
    member.as_enum().ok_or_else(|| MetaError::NotEnum {
        owner: C::type_name(),
        member: member.name(),
    })
}

fn find_typed_enum<C: Meta, E: MetaEnum>(
    name: &str,
) -> Result<&'static EnumMember<C, E>, MetaError> {
    let member = find_enum::<C>(name)?;
    member.downcast::<E>().ok_or_else(|| MetaError::TypeMismatch {
        owner: C::type_name(),
        member: member.name(),
        expected: type_name::<E>(),
        actual: member.value_type_name(),
    })
}

/// Calls `f` with the member `name` of `C`, typed as `Member<C, T>`.
///
/// # Errors
///
/// - [`MetaError::MemberNotFound`] if there is no such member.
/// - [`MetaError::TypeMismatch`] if its value type is not `T`.
///
/// # Examples
///
/// ```
/// use vc_meta::member::Member;
/// use vc_meta::ops;
/// use vc_meta::registry::{Meta, MetaRegistry, Members};
///
/// struct Tag { id: u16 }
///
/// impl Meta for Tag {
///     fn register_members(_: &MetaRegistry) -> Members<Self> {
///         Members::new().with(Member::field("id", |t: &Tag| &t.id, |t| &mut t.id))
///     }
/// }
///
/// let writable = ops::with_member::<Tag, u16, _>("id", |m| m.has_writer()).unwrap();
/// assert!(writable);
/// assert!(ops::with_member::<Tag, u32, _>("id", |_| ()).is_err());
/// ```
pub fn with_member<C: Meta, T: 'static, R>(
    name: &str,
    f: impl FnOnce(&'static Member<C, T>) -> R,
) -> Result<R, MetaError> {
    find_typed::<C, T>(name).map(f)
}

// -----------------------------------------------------------------------------
// Typed values

/// Reads a copy of the member `name`.
///
/// # Errors
///
/// See [`with_member`].
#[inline]
pub fn get_member_value<T: Clone + 'static, C: Meta>(obj: &C, name: &str) -> Result<T, MetaError> {
    with_member::<C, T, _>(name, |member| member.get(obj))
}

/// Writes `value` into the member `name`.
///
/// The value may be anything convertible into the member type.
///
/// # Errors
///
/// Those of [`with_member`], and [`MetaError::ReadOnly`] if the member has
/// no writer. The object is not modified on error.
pub fn set_member_value<T: 'static, C: Meta>(
    obj: &mut C,
    name: &str,
    value: impl Into<T>,
) -> Result<(), MetaError> {
    let member = find_typed::<C, T>(name)?;
    member
        .try_set(obj, value)
        .map_err(|_| MetaError::ReadOnly {
            owner: C::type_name(),
            member: member.name(),
        })
}

// -----------------------------------------------------------------------------
// Enum symbols

/// Reads the enum member `name` and returns the symbol of its value.
///
/// # Errors
///
/// - [`MetaError::MemberNotFound`] if there is no such member.
/// - [`MetaError::NotEnum`] if it is not an enum member.
/// - [`MetaError::TypeMismatch`] if its enum type is not `E`.
/// - [`MetaError::SymbolNotFound`] if the current value has no symbol.
#[inline]
pub fn get_enum_member_value_string<E: MetaEnum, C: Meta>(
    obj: &C,
    name: &str,
) -> Result<&'static str, MetaError> {
    find_typed_enum::<C, E>(name)?.get_symbol(obj)
}

/// Writes the value bound to `symbol` into the enum member `name`.
///
/// # Errors
///
/// Those of [`get_enum_member_value_string`], except that an unknown
/// `symbol` is [`MetaError::NameNotFound`], and [`MetaError::ReadOnly`] if
/// the member has no writer. The object is not modified on error.
pub fn set_enum_member_value_string<E: MetaEnum, C: Meta>(
    obj: &mut C,
    name: &str,
    symbol: &str,
) -> Result<(), MetaError> {
    let member = find_typed_enum::<C, E>(name)?;
    let value = member.from_symbol(symbol)?;
    member
        .member()
        .try_set(obj, value)
        .map_err(|_| MetaError::ReadOnly {
            owner: C::type_name(),
            member: member.name(),
        })
}

/// Like [`get_enum_member_value_string`], without naming the enum type.
///
/// # Errors
///
/// As [`get_enum_member_value_string`], minus the type mismatch.
#[inline]
pub fn get_member_symbol<C: Meta>(obj: &C, name: &str) -> Result<&'static str, MetaError> {
    find_enum::<C>(name)?.get_symbol(obj)
}

/// Like [`set_enum_member_value_string`], without naming the enum type.
///
/// # Errors
///
/// As [`set_enum_member_value_string`], minus the type mismatch.
pub fn set_member_symbol<C: Meta>(obj: &mut C, name: &str, symbol: &str) -> Result<(), MetaError> {
    find_enum::<C>(name)?.set_symbol(obj, symbol)
}
