//! Provide enum member descriptors and their symbol tables.
//!
//! ## Menu
//!
//! - [`MetaEnum`]: The capability trait for enum value types.
//! - [`SymbolTable`]: A bidirectional `name <-> value` mapping, shared by every
//!   enum member of the same `(owner, enum)` pair.
//! - [`EnumMember`]: A [`Member`] whose value is a [`MetaEnum`], plus its symbol table.
//! - [`DynamicEnumMember`]: The type-erased view, reached through
//!   [`DynamicMember::as_enum`].
//!
//! ## Symbol table lifetime
//!
//! Symbols are registered while the owner's member set is being built.
//! When the registration finishes, or at the first lookup, the table is
//! sealed: the pending maps move into a [`OnceLock`] and every later read is
//! lock-free. Registering a new symbol into a sealed table panics.

use alloc::format;
use alloc::vec::Vec;
use core::any::{Any, TypeId, type_name};
use core::fmt::{self, Debug};
use core::hash::Hash;
use core::mem;

use std::sync::{Mutex, OnceLock, PoisonError};

use crate::MetaError;
use crate::access::AccessKind;
use crate::hash::{FixedHashState, HashMap};
use crate::member::{DynamicMember, Member};
use crate::registry::MetaRegistry;

// -----------------------------------------------------------------------------
// MetaEnum

/// Marks a type as an enum that can be mapped to and from symbols.
///
/// Usually derived with [`#[derive(MetaEnum)]`](crate::derive::MetaEnum).
///
/// # Examples
///
/// ```
/// use vc_meta::enums::MetaEnum;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum Color {
///     Red,
///     Green,
/// }
///
/// impl MetaEnum for Color {}
/// ```
pub trait MetaEnum: Copy + Eq + Hash + Debug + Send + Sync + 'static {}

// -----------------------------------------------------------------------------
// SymbolTable

struct SymbolMaps<E> {
    // Registration order.
    ordered: Vec<(&'static str, E)>,
    by_value: HashMap<E, &'static str>,
    by_name: HashMap<&'static str, E>,
}

impl<E> SymbolMaps<E> {
    const fn new() -> Self {
        Self {
            ordered: Vec::new(),
            by_value: HashMap::with_hasher(FixedHashState),
            by_name: HashMap::with_hasher(FixedHashState),
        }
    }
}

impl<E> Default for SymbolMaps<E> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// A bidirectional mapping between symbol names and values of enum `E`.
///
/// Every registered value has exactly one name and every name exactly one
/// value. Failed lookups are reported as errors and never modify the table.
///
/// Tables are created and owned by the [`MetaRegistry`], one per
/// `(owner, enum)` pair, see [`MetaRegistry::symbol_table`].
pub struct SymbolTable<E: MetaEnum> {
    pending: Mutex<SymbolMaps<E>>,
    sealed: OnceLock<SymbolMaps<E>>,
}

impl<E: MetaEnum> Default for SymbolTable<E> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<E: MetaEnum> Debug for SymbolTable<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolTable")
            .field("enum", &type_name::<E>())
            .field("sealed", &self.is_sealed())
            .finish()
    }
}

impl<E: MetaEnum> SymbolTable<E> {
    /// Creates an empty, unsealed table.
    #[inline]
    pub const fn new() -> Self {
        Self {
            pending: Mutex::new(SymbolMaps::new()),
            sealed: OnceLock::new(),
        }
    }

    /// Binds `name` to `value`.
    ///
    /// Registering an identical pair twice is a no-op, so several members of
    /// the same owner may list the same symbols.
    ///
    /// # Panics
    ///
    /// - If `name` or `value` is already bound to a different counterpart.
    /// - If the table is sealed and the pair is new.
    pub fn register(&self, name: &'static str, value: E) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(sealed) = self.sealed.get() {
            if sealed.by_name.get(name) == Some(&value) {
                return;
            }
            panic!(
                "symbol table of `{}` is sealed, cannot register `{name}` => {value:?}",
                type_name::<E>(),
            );
        }

        match pending.by_name.get(name) {
            Some(bound) if *bound == value => return,
            Some(bound) => panic!(
                "symbol `{name}` of `{}` is already bound to {bound:?}",
                type_name::<E>(),
            ),
            None => {}
        }

        if let Some(bound) = pending.by_value.get(&value) {
            panic!(
                "value {value:?} of `{}` already has symbol `{bound}`",
                type_name::<E>(),
            );
        }

        crate::cfg::debug! {
            log::trace!("register symbol `{name}` => {value:?} for `{}`", type_name::<E>());
        }

        pending.ordered.push((name, value));
        pending.by_value.insert(value, name);
        pending.by_name.insert(name, value);
    }

    /// Seals the table, see the [module documentation](self).
    #[inline]
    pub fn seal(&self) {
        self.maps();
    }

    /// Returns `true` if the table is sealed.
    #[inline]
    pub fn is_sealed(&self) -> bool {
        self.sealed.get().is_some()
    }

    #[inline]
    fn maps(&self) -> &SymbolMaps<E> {
        if let Some(maps) = self.sealed.get() {
            return maps;
        }

        // Sealing holds the `pending` lock, as `register` does, so no pair
        // can land in `pending` after it was moved out.
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        self.sealed.get_or_init(|| {
            let maps = mem::take(&mut *pending);
            log::trace!(
                "sealed symbol table of `{}` with {} symbols",
                type_name::<E>(),
                maps.ordered.len(),
            );
            maps
        })
    }

    /// Returns the symbol of `value`.
    pub fn to_symbol(&self, value: E) -> Result<&'static str, MetaError> {
        match self.maps().by_value.get(&value) {
            Some(name) => Ok(*name),
            None => Err(MetaError::SymbolNotFound {
                enum_type: type_name::<E>(),
                value: format!("{value:?}"),
            }),
        }
    }

    /// Returns the value bound to `name`.
    pub fn from_symbol(&self, name: &str) -> Result<E, MetaError> {
        match self.maps().by_name.get(name) {
            Some(value) => Ok(*value),
            None => Err(MetaError::NameNotFound {
                enum_type: type_name::<E>(),
                name: name.into(),
            }),
        }
    }

    /// Returns `true` if `name` is a registered symbol.
    #[inline]
    pub fn contains_name(&self, name: &str) -> bool {
        self.maps().by_name.contains_key(name)
    }

    /// Returns `true` if `value` has a registered symbol.
    #[inline]
    pub fn contains_value(&self, value: E) -> bool {
        self.maps().by_value.contains_key(&value)
    }

    /// Returns an iterator over `(name, value)` pairs in registration order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&'static str, E)> + '_ {
        self.maps().ordered.iter().copied()
    }

    /// Returns the number of symbols.
    #[inline]
    pub fn len(&self) -> usize {
        self.maps().ordered.len()
    }
}

// -----------------------------------------------------------------------------
// EnumMember

/// A member whose value is an enum, with symbolic names for its values.
///
/// The symbol table is shared by every `EnumMember<C, E>` created from the
/// same [`MetaRegistry`], so symbols registered by one member are visible to
/// all members of the same owner and enum type.
///
/// # Examples
///
/// ```
/// use vc_meta::enums::{EnumMember, MetaEnum};
/// use vc_meta::registry::MetaRegistry;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum Align { Left, Right }
/// impl MetaEnum for Align {}
///
/// struct Text { align: Align }
///
/// let registry = MetaRegistry::new();
/// let align = EnumMember::field(&registry, "align", |t: &Text| &t.align, |t| &mut t.align)
///     .symbol("left", Align::Left)
///     .symbol("right", Align::Right);
///
/// let mut text = Text { align: Align::Left };
///
/// align.set_symbol(&mut text, "right").unwrap();
/// assert_eq!(text.align, Align::Right);
/// assert_eq!(align.get_symbol(&text).unwrap(), "right");
/// assert!(align.from_symbol("center").is_err());
/// ```
pub struct EnumMember<C, E: MetaEnum> {
    member: Member<C, E>,
    symbols: &'static SymbolTable<E>,
}

impl<C, E: MetaEnum> Clone for EnumMember<C, E> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, E: MetaEnum> Copy for EnumMember<C, E> {}

impl<C, E: MetaEnum> Debug for EnumMember<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumMember")
            .field("member", &self.member)
            .field("symbols", &self.symbols)
            .finish()
    }
}

impl<C: 'static, E: MetaEnum> EnumMember<C, E> {
    /// Creates an enum member stored directly in the owner, using the
    /// `(C, E)` symbol table of `registry`.
    #[inline]
    pub fn field(
        registry: &MetaRegistry,
        name: &'static str,
        get: fn(&C) -> &E,
        get_mut: fn(&mut C) -> &mut E,
    ) -> Self {
        Member::field(name, get, get_mut).into_enum(registry)
    }

    /// Creates an enum member reached through value accessors.
    #[inline]
    pub fn value(
        registry: &MetaRegistry,
        name: &'static str,
        get: fn(&C) -> E,
        set: fn(&mut C, E),
    ) -> Self {
        Member::value(name, get, set).into_enum(registry)
    }

    /// Creates an enum member reached through reference accessors.
    #[inline]
    pub fn reference(
        registry: &MetaRegistry,
        name: &'static str,
        get: fn(&C) -> &E,
        set: fn(&mut C, &E),
    ) -> Self {
        Member::reference(name, get, set).into_enum(registry)
    }
}

impl<C, E: MetaEnum> EnumMember<C, E> {
    /// Wraps a member, attaching the given symbol table.
    ///
    /// Usually the table is `registry.symbol_table::<C, E>()` of the
    /// registry building the owner's member set.
    #[inline]
    pub const fn new(member: Member<C, E>, symbols: &'static SymbolTable<E>) -> Self {
        Self { member, symbols }
    }

    /// Registers the symbol `name` for `value`.
    ///
    /// See [`SymbolTable::register`] for panics.
    #[inline]
    pub fn symbol(self, name: &'static str, value: E) -> Self {
        self.symbols.register(name, value);
        self
    }

    /// Returns the underlying typed member.
    #[inline]
    pub const fn member(&self) -> &Member<C, E> {
        &self.member
    }

    /// Returns the member name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.member.name()
    }

    /// Returns the shared symbol table.
    #[inline]
    pub const fn symbol_table(&self) -> &'static SymbolTable<E> {
        self.symbols
    }

    /// Returns the symbol of `value`.
    #[inline]
    pub fn to_symbol(&self, value: E) -> Result<&'static str, MetaError> {
        self.symbols.to_symbol(value)
    }

    /// Returns the value bound to `name`.
    #[inline]
    pub fn from_symbol(&self, name: &str) -> Result<E, MetaError> {
        self.symbols.from_symbol(name)
    }

    /// Reads the member and returns its symbol.
    #[inline]
    pub fn get_symbol(&self, obj: &C) -> Result<&'static str, MetaError> {
        self.symbols.to_symbol(self.member.get(obj))
    }

    /// Writes the value bound to `name`.
    ///
    /// The member is left unchanged if `name` is unknown.
    ///
    /// # Panics
    ///
    /// Panics if the member has no writer.
    pub fn set_symbol(&self, obj: &mut C, name: &str) -> Result<(), MetaError> {
        let value = self.symbols.from_symbol(name)?;
        self.member.set(obj, value);
        Ok(())
    }

    /// Returns an iterator over the registered `(name, value)` pairs.
    #[inline]
    pub fn symbols(&self) -> impl ExactSizeIterator<Item = (&'static str, E)> + '_ {
        self.symbols.iter()
    }
}

impl<C: 'static, E: MetaEnum> Member<C, E> {
    /// Turns the member into an [`EnumMember`] using the `(C, E)` symbol
    /// table of `registry`.
    #[inline]
    pub fn into_enum(self, registry: &MetaRegistry) -> EnumMember<C, E> {
        EnumMember::new(self, registry.symbol_table::<C, E>())
    }
}

// -----------------------------------------------------------------------------
// DynamicEnumMember

/// The type-erased view of an [`EnumMember`].
///
/// Obtained from [`DynamicMember::as_enum`], which returns `None` for plain
/// members, so enum operations are never reachable on them.
pub trait DynamicEnumMember<C>: DynamicMember<C> {
    /// Reads the member and returns its symbol.
    fn get_symbol(&self, obj: &C) -> Result<&'static str, MetaError>;

    /// Writes the value bound to `name`.
    ///
    /// Returns [`MetaError::ReadOnly`] if the member has no writer.
    fn set_symbol(&self, obj: &mut C, name: &str) -> Result<(), MetaError>;

    /// Returns the registered symbol names in registration order.
    fn symbol_names(&self) -> Vec<&'static str>;

    /// Seals the shared symbol table.
    fn seal_symbols(&self);

    /// Returns the typed [`EnumMember<C, E>`] as `&dyn Any`.
    fn as_enum_any(&self) -> &dyn Any;
}

impl<C: 'static> dyn DynamicEnumMember<C> {
    /// Returns the typed enum member, or `None` if the enum type is not `E`.
    #[inline]
    pub fn downcast<E: MetaEnum>(&self) -> Option<&EnumMember<C, E>> {
        self.as_enum_any().downcast_ref()
    }
}

impl<C: 'static, E: MetaEnum> DynamicMember<C> for EnumMember<C, E> {
    #[inline]
    fn name(&self) -> &'static str {
        self.member.name()
    }

    #[inline]
    fn value_type_id(&self) -> TypeId {
        TypeId::of::<E>()
    }

    #[inline]
    fn value_type_name(&self) -> &'static str {
        type_name::<E>()
    }

    #[inline]
    fn access_kind(&self) -> AccessKind {
        self.member.access_kind()
    }

    #[inline]
    fn has_direct_storage(&self) -> bool {
        self.member.has_direct_storage()
    }

    #[inline]
    fn has_reader(&self) -> bool {
        self.member.has_reader()
    }

    #[inline]
    fn has_writer(&self) -> bool {
        self.member.has_writer()
    }

    #[inline]
    fn can_get_ref(&self) -> bool {
        self.member.can_get_ref()
    }

    #[inline]
    fn can_get_mut(&self) -> bool {
        self.member.can_get_mut()
    }

    fn get_ref_any<'a>(&self, obj: &'a C) -> Option<&'a dyn Any> {
        DynamicMember::get_ref_any(&self.member, obj)
    }

    fn get_mut_any<'a>(&self, obj: &'a mut C) -> Option<&'a mut dyn Any> {
        DynamicMember::get_mut_any(&self.member, obj)
    }

    #[inline]
    fn as_member_any(&self) -> &dyn Any {
        &self.member
    }

    #[inline]
    fn as_enum(&self) -> Option<&dyn DynamicEnumMember<C>> {
        Some(self)
    }
}

impl<C: 'static, E: MetaEnum> DynamicEnumMember<C> for EnumMember<C, E> {
    #[inline]
    fn get_symbol(&self, obj: &C) -> Result<&'static str, MetaError> {
        EnumMember::get_symbol(self, obj)
    }

    fn set_symbol(&self, obj: &mut C, name: &str) -> Result<(), MetaError> {
        let value = self.symbols.from_symbol(name)?;
        match self.member.access().try_set(obj, value) {
            Ok(()) => Ok(()),
            Err(_) => Err(MetaError::ReadOnly {
                owner: type_name::<C>(),
                member: self.member.name(),
            }),
        }
    }

    fn symbol_names(&self) -> Vec<&'static str> {
        self.symbols.iter().map(|(name, _)| name).collect()
    }

    #[inline]
    fn seal_symbols(&self) {
        self.symbols.seal();
    }

    #[inline]
    fn as_enum_any(&self) -> &dyn Any {
        self
    }
}
