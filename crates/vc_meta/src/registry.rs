//! Provide the per-type member registry.
//!
//! ## Menu
//!
//! - [`Meta`]: Implemented by every type that can be queried by member name.
//! - [`Members`]: The ordered, name-indexed member set of one type.
//! - [`ConstructorArg`]: One argument type of a registered constructor.
//! - [`MetaRegistry`]: The storage of member sets and symbol tables.
//!
//! ## Registration
//!
//! A type opts in by implementing [`Meta::register_members`], either by hand
//! or with [`#[derive(Meta)]`](crate::derive::Meta). The set is built on the
//! first call to [`Meta::members`] and never changes afterwards. Types that
//! keep the default implementation have an empty set and are reported as
//! unregistered by [`ops::is_registered`](crate::ops::is_registered).
//!
//! The registry building the set is passed to `register_members`; enum
//! members take their symbol tables from it, see
//! [`EnumMember::field`](crate::enums::EnumMember::field).
//!
//! ```
//! use vc_meta::member::Member;
//! use vc_meta::registry::{Meta, MetaRegistry, Members};
//!
//! struct Size {
//!     w: u32,
//!     h: u32,
//! }
//!
//! impl Meta for Size {
//!     fn register_members(_: &MetaRegistry) -> Members<Self> {
//!         Members::new()
//!             .with(Member::field("w", |s: &Size| &s.w, |s| &mut s.w))
//!             .with(Member::field("h", |s: &Size| &s.h, |s| &mut s.h))
//!     }
//! }
//!
//! let names: Vec<_> = Size::members().names().collect();
//! assert_eq!(names, ["w", "h"]);
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;

use std::sync::{OnceLock, PoisonError, RwLock};

use crate::enums::{MetaEnum, SymbolTable};
use crate::hash::{FixedHashState, HashMap};
use crate::member::DynamicMember;

// -----------------------------------------------------------------------------
// Meta

/// A type whose members can be enumerated and accessed by name.
///
/// # Examples
///
/// Types without members only need an empty impl:
///
/// ```
/// use vc_meta::registry::Meta;
///
/// struct Opaque;
/// impl Meta for Opaque {}
///
/// assert!(Opaque::members().is_empty());
/// assert!(Opaque::type_name().ends_with("Opaque"));
/// ```
pub trait Meta: Sized + 'static {
    /// Builds the member set of this type.
    ///
    /// Called at most once per registry, by `registry` itself. Enum members
    /// must take their symbol tables from `registry`. Calling
    /// [`members`](Meta::members) of the same type from here deadlocks.
    #[inline]
    fn register_members(_registry: &MetaRegistry) -> Members<Self> {
        Members::new()
    }

    /// Returns the display name of this type, used in error messages.
    #[inline]
    fn type_name() -> &'static str {
        core::any::type_name::<Self>()
    }

    /// Returns the member set of this type, building it on first use.
    #[inline]
    fn members() -> &'static Members<Self> {
        MetaRegistry::global().members::<Self>()
    }

    /// Returns the argument types of the registered non-default
    /// constructor, empty if there is none.
    #[inline]
    fn constructor_args() -> &'static [ConstructorArg] {
        Self::members().constructor_args()
    }
}

// -----------------------------------------------------------------------------
// ConstructorArg

/// One argument type of a registered constructor.
///
/// Serializers that cannot default-construct a type read the argument
/// types from [`Meta::constructor_args`], then build the value themselves.
///
/// # Examples
///
/// ```
/// use vc_meta::registry::{ConstructorArg, Meta, MetaRegistry, Members};
///
/// struct Id(u64);
///
/// impl Meta for Id {
///     fn register_members(_: &MetaRegistry) -> Members<Self> {
///         Members::new().with_constructor([ConstructorArg::of::<u64>()])
///     }
/// }
///
/// assert!(Id::constructor_args()[0].is::<u64>());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConstructorArg {
    type_id: TypeId,
    type_name: &'static str,
}

impl ConstructorArg {
    /// Describes an argument of type `T`.
    #[inline]
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: core::any::type_name::<T>(),
        }
    }

    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if the argument type is `T`.
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

// -----------------------------------------------------------------------------
// Members

/// The ordered member set of owner `C`.
///
/// Iteration follows registration order. Member names are unique.
pub struct Members<C> {
    members: Vec<Box<dyn DynamicMember<C>>>,
    indices: HashMap<&'static str, usize>,
    constructor: Vec<ConstructorArg>,
}

impl<C: 'static> Default for Members<C> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<C: 'static> fmt::Debug for Members<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<C: 'static> Members<C> {
    /// Creates an empty set.
    #[inline]
    pub const fn new() -> Self {
        Self {
            members: Vec::new(),
            indices: HashMap::with_hasher(FixedHashState),
            constructor: Vec::new(),
        }
    }

    /// Creates an empty set with room for `capacity` members.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            members: Vec::with_capacity(capacity),
            indices: HashMap::with_capacity_and_hasher(capacity, FixedHashState),
            constructor: Vec::new(),
        }
    }

    /// Appends a member and returns the set, for chained registration.
    ///
    /// Accepts [`Member`](crate::member::Member) and
    /// [`EnumMember`](crate::enums::EnumMember) alike.
    ///
    /// # Panics
    ///
    /// Panics if a member with the same name already exists.
    #[inline]
    pub fn with(mut self, member: impl DynamicMember<C>) -> Self {
        self.push(member);
        self
    }

    /// Appends a member.
    ///
    /// # Panics
    ///
    /// Panics if a member with the same name already exists.
    #[inline]
    pub fn push(&mut self, member: impl DynamicMember<C>) {
        self.push_boxed(Box::new(member));
    }

    /// Appends a boxed member.
    ///
    /// # Panics
    ///
    /// Panics if a member with the same name already exists.
    pub fn push_boxed(&mut self, member: Box<dyn DynamicMember<C>>) {
        let name = member.name();
        let index = self.members.len();
        if self.indices.insert(name, index).is_some() {
            panic!(
                "type `{}` already has a member named `{name}`",
                core::any::type_name::<C>(),
            );
        }
        self.members.push(member);
    }

    /// Registers the argument types of the non-default constructor,
    /// replacing any previous registration.
    #[inline]
    pub fn with_constructor(mut self, args: impl IntoIterator<Item = ConstructorArg>) -> Self {
        self.constructor = args.into_iter().collect();
        self
    }

    /// Returns the argument types of the registered constructor.
    #[inline]
    pub fn constructor_args(&self) -> &[ConstructorArg] {
        &self.constructor
    }

    /// Returns the number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if there are no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns the member called `name`.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&dyn DynamicMember<C>> {
        self.index_of(name).map(|index| &*self.members[index])
    }

    /// Returns the member at `index`, in registration order.
    #[inline]
    pub fn get_at(&self, index: usize) -> Option<&dyn DynamicMember<C>> {
        self.members.get(index).map(|member| &**member)
    }

    /// Returns the registration index of `name`.
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    /// Returns `true` if a member called `name` exists.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.indices.contains_key(name)
    }

    /// Returns an iterator over the member names.
    #[inline]
    pub fn names(&self) -> impl ExactSizeIterator<Item = &'static str> + '_ {
        self.members.iter().map(|member| member.name())
    }

    /// Returns an iterator over the members.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &dyn DynamicMember<C>> + '_ {
        self.members.iter().map(|member| &**member)
    }

    fn seal_symbols(&self) {
        self.members
            .iter()
            .filter_map(|member| member.as_enum())
            .for_each(|member| member.seal_symbols());
    }
}

impl<'a, C: 'static> IntoIterator for &'a Members<C> {
    type Item = &'a dyn DynamicMember<C>;
    type IntoIter = core::iter::Map<
        core::slice::Iter<'a, Box<dyn DynamicMember<C>>>,
        fn(&'a Box<dyn DynamicMember<C>>) -> &'a dyn DynamicMember<C>,
    >;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        let deref: fn(&'a Box<dyn DynamicMember<C>>) -> &'a dyn DynamicMember<C> = |member| &**member;
        self.members.iter().map(deref)
    }
}

// -----------------------------------------------------------------------------
// MetaRegistry

type MembersCell = OnceLock<Box<dyn Any + Send + Sync>>;

/// Storage of member sets and enum symbol tables.
///
/// [`Meta::members`] goes through [`MetaRegistry::global`]. A registry
/// created with [`MetaRegistry::new`] builds its own member sets, and the
/// enum members in them use its own symbol tables.
///
/// Entries are leaked on creation and live for the rest of the program, so
/// every lookup hands out `'static` references. The maps are guarded by
/// read-write locks; building a member set happens outside of them, inside
/// a per-type [`OnceLock`] that guarantees a single build even when many
/// threads race on first use.
pub struct MetaRegistry {
    members: RwLock<HashMap<TypeId, &'static MembersCell>>,
    symbols: RwLock<HashMap<(TypeId, TypeId), &'static (dyn Any + Send + Sync)>>,
}

impl Default for MetaRegistry {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MetaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetaRegistry")
            .field("registered_types", &self.registered_type_count())
            .finish_non_exhaustive()
    }
}

impl MetaRegistry {
    /// Creates an empty registry.
    #[inline]
    pub const fn new() -> Self {
        Self {
            members: RwLock::new(HashMap::with_hasher(FixedHashState)),
            symbols: RwLock::new(HashMap::with_hasher(FixedHashState)),
        }
    }

    /// Returns the global registry.
    #[inline]
    pub fn global() -> &'static Self {
        static GLOBAL: MetaRegistry = MetaRegistry::new();
        &GLOBAL
    }

    /// Returns the member set of `C`, building it on first use.
    pub fn members<C: Meta>(&self) -> &'static Members<C> {
        let cell = self.members_cell(TypeId::of::<C>());

        let members = cell.get_or_init(|| {
            let members = C::register_members(self);
            members.seal_symbols();
            log::debug!("registered {} members for `{}`", members.len(), C::type_name());
            Box::new(members) as Box<dyn Any + Send + Sync>
        });

        match (**members).downcast_ref::<Members<C>>() {
            Some(members) => members,
            None => unreachable!("member cell of `{}` holds a foreign type", C::type_name()),
        }
    }

    fn members_cell(&self, type_id: TypeId) -> &'static MembersCell {
        let cell = self
            .members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied();

        if let Some(cell) = cell {
            return cell;
        }

        *self
            .members
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(type_id)
            .or_insert_with(|| -> &'static MembersCell { Box::leak(Box::new(OnceLock::new())) })
    }

    /// Returns the symbol table shared by every enum member of owner `C`
    /// with enum type `E`, creating it on first use.
    pub fn symbol_table<C: 'static, E: MetaEnum>(&self) -> &'static SymbolTable<E> {
        let key = (TypeId::of::<C>(), TypeId::of::<E>());

        let table = self
            .symbols
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .copied();

        let table = match table {
            Some(table) => table,
            None => *self
                .symbols
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(key)
                .or_insert_with(|| -> &'static (dyn Any + Send + Sync) {
                    Box::leak(Box::new(SymbolTable::<E>::new()))
                }),
        };

        match table.downcast_ref::<SymbolTable<E>>() {
            Some(table) => table,
            None => unreachable!(
                "symbol table of `{}` holds a foreign type",
                core::any::type_name::<E>()
            ),
        }
    }

    /// Returns the number of types whose member set has been built.
    pub fn registered_type_count(&self) -> usize {
        self.members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|cell| cell.get().is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    use core::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use super::{ConstructorArg, Meta, MetaRegistry, Members};
    use crate::enums::{EnumMember, MetaEnum};
    use crate::member::Member;

    struct Pair {
        a: i32,
        b: i32,
    }

    impl Meta for Pair {
        fn register_members(_: &MetaRegistry) -> Members<Self> {
            Members::new()
                .with(Member::field("a", |p: &Pair| &p.a, |p| &mut p.a))
                .with(Member::field("b", |p: &Pair| &p.b, |p| &mut p.b))
        }
    }

    #[test]
    fn registration_order_and_index() {
        let members = Pair::members();
        assert_eq!(members.len(), 2);
        assert_eq!(members.names().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(members.index_of("b"), Some(1));
        assert_eq!(members.get_at(0).unwrap().name(), "a");
        assert!(members.get("c").is_none());
        assert!(core::ptr::eq(members, Pair::members()));

        let pair = Pair { a: 1, b: 2 };
        let sum: i32 = members
            .into_iter()
            .map(|m| m.downcast::<i32>().unwrap().get(&pair))
            .sum();
        assert_eq!(sum, 3);
    }

    #[test]
    #[should_panic(expected = "already has a member named `a`")]
    fn duplicate_names_panic() {
        let _ = Members::<Pair>::new()
            .with(Member::field("a", |p: &Pair| &p.a, |p| &mut p.a))
            .with(Member::field("a", |p: &Pair| &p.b, |p| &mut p.b));
    }

    static BUILDS: AtomicUsize = AtomicUsize::new(0);

    struct Counted {
        value: u64,
    }

    impl Meta for Counted {
        fn register_members(_: &MetaRegistry) -> Members<Self> {
            BUILDS.fetch_add(1, Ordering::SeqCst);
            Members::new().with(Member::field("value", |c: &Counted| &c.value, |c| &mut c.value))
        }
    }

    #[test]
    fn concurrent_first_use_builds_once() {
        let sets: Vec<usize> = thread::scope(|s| {
            let handles: Vec<_> = (0..16)
                .map(|_| s.spawn(|| Counted::members() as *const Members<Counted> as usize))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
        assert!(sets.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(Counted::members().len(), 1);
    }

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum Side {
        Left,
        Right,
    }

    impl MetaEnum for Side {}

    struct Gate {
        input: Side,
        output: Side,
    }

    impl Meta for Gate {
        fn register_members(registry: &MetaRegistry) -> Members<Self> {
            Members::new()
                .with(
                    EnumMember::field(registry, "input", |g: &Gate| &g.input, |g| &mut g.input)
                        .symbol("L", Side::Left),
                )
                .with(
                    EnumMember::field(registry, "output", |g: &Gate| &g.output, |g| &mut g.output)
                        .symbol("R", Side::Right),
                )
        }
    }

    #[test]
    fn symbol_tables_are_shared_and_sealed() {
        let members = Gate::members();
        let table = MetaRegistry::global().symbol_table::<Gate, Side>();
        assert!(table.is_sealed());
        assert_eq!(table.len(), 2);

        let output = members.get("output").unwrap().as_enum().unwrap();
        let gate = Gate {
            input: Side::Right,
            output: Side::Left,
        };
        assert_eq!(output.get_symbol(&gate).unwrap(), "L");

        // A different owner gets a table of its own.
        let other = MetaRegistry::global().symbol_table::<Pair, Side>();
        assert!(!core::ptr::eq(table, other));
    }

    #[test]
    fn local_registry_is_independent() {
        let registry = MetaRegistry::new();
        assert_eq!(registry.registered_type_count(), 0);
        assert_eq!(registry.members::<Pair>().len(), 2);
        assert_eq!(registry.registered_type_count(), 1);
        assert!(!core::ptr::eq(registry.members::<Pair>(), Pair::members()));
    }

    // Only ever registered in a local registry.
    struct Knob {
        dir: Side,
    }

    impl Meta for Knob {
        fn register_members(registry: &MetaRegistry) -> Members<Self> {
            Members::new().with(
                EnumMember::field(registry, "dir", |k: &Knob| &k.dir, |k| &mut k.dir)
                    .symbol("CW", Side::Right),
            )
        }
    }

    #[test]
    fn local_registry_owns_its_symbol_tables() {
        let registry = MetaRegistry::new();
        let members = registry.members::<Knob>();

        let table = registry.symbol_table::<Knob, Side>();
        assert!(table.is_sealed());
        assert_eq!(table.len(), 1);
        assert_eq!(table.from_symbol("CW"), Ok(Side::Right));

        let dir = members.get("dir").unwrap().as_enum().unwrap();
        let mut knob = Knob { dir: Side::Left };
        dir.set_symbol(&mut knob, "CW").unwrap();
        assert_eq!(knob.dir, Side::Right);

        // The global registry is left untouched.
        assert!(!MetaRegistry::global().symbol_table::<Knob, Side>().is_sealed());
    }

    struct Span {
        start: u32,
        len: u32,
    }

    impl Meta for Span {
        fn register_members(_: &MetaRegistry) -> Members<Self> {
            Members::new()
                .with(Member::field("start", |s: &Span| &s.start, |s| &mut s.start))
                .with(Member::field("len", |s: &Span| &s.len, |s| &mut s.len))
                .with_constructor([ConstructorArg::of::<u32>(), ConstructorArg::of::<u32>()])
        }
    }

    #[test]
    fn constructor_args_are_registered_with_members() {
        assert!(Pair::constructor_args().is_empty());

        let args = Span::constructor_args();
        assert_eq!(args.len(), 2);
        assert!(args.iter().all(ConstructorArg::is::<u32>));
        assert_eq!(args[0].type_name(), "u32");
        assert_eq!(Span::members().len(), 2);
    }
}
