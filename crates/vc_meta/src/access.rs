//! Provide the access strategies of a member.
//!
//! A member of type `T` inside an owner `C` is reached in one of three ways:
//!
//! - [`Access::Field`]: direct storage, a pair of projections into the owner.
//! - [`Access::Value`]: a getter returning `T` by value and an optional setter taking `T`.
//! - [`Access::Ref`]: a getter returning `&T`, an optional setter taking `&T`
//!   and an optional getter returning `&mut T`.
//!
//! The strategy is chosen once, when the member is registered. If a type
//! exposes both a field and a setter, the type author decides which one the
//! descriptor uses; a descriptor never carries two paths.

use core::fmt;

// -----------------------------------------------------------------------------
// AccessKind

/// The variant of an [`Access`], without its functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessKind {
    /// Direct storage.
    Field,
    /// Value-returning accessor pair.
    Value,
    /// Reference-returning accessor pair.
    Ref,
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field => f.write_str("field"),
            Self::Value => f.write_str("value accessors"),
            Self::Ref => f.write_str("reference accessors"),
        }
    }
}

// -----------------------------------------------------------------------------
// Access

/// How a member of type `T` is read from and written to an owner `C`.
///
/// All operations here are fallible (`try_*`); the panicking forms live on
/// [`Member`](crate::member::Member), which knows the member name.
///
/// # Examples
///
/// ```
/// use vc_meta::access::Access;
///
/// struct Foo {
///     bar: u32,
/// }
///
/// impl Foo {
///     fn bar(&self) -> u32 { self.bar }
///     fn set_bar(&mut self, bar: u32) { self.bar = bar.min(10) }
/// }
///
/// let access = Access::value(Foo::bar, Foo::set_bar);
/// let mut foo = Foo { bar: 1 };
///
/// assert!(access.try_get_ref(&foo).is_none());
/// assert_eq!(access.get(&foo), 1);
///
/// access.try_set(&mut foo, 99).unwrap();
/// assert_eq!(foo.bar, 10);
/// ```
pub enum Access<C, T> {
    /// Direct storage, reached through a pair of projections.
    Field {
        get: fn(&C) -> &T,
        get_mut: fn(&mut C) -> &mut T,
    },
    /// Accessors returning and accepting `T` by value.
    ///
    /// `set == None` describes a read-only (usually computed) member.
    Value {
        get: fn(&C) -> T,
        set: Option<fn(&mut C, T)>,
    },
    /// Accessors returning and accepting `T` by reference.
    Ref {
        get: fn(&C) -> &T,
        set: Option<fn(&mut C, &T)>,
        get_mut: Option<fn(&mut C) -> &mut T>,
    },
}

impl<C, T> Clone for Access<C, T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, T> Copy for Access<C, T> {}

impl<C, T> fmt::Debug for Access<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Access")
            .field("kind", &self.kind())
            .field("writer", &self.has_writer())
            .field("mut", &self.can_get_mut())
            .finish()
    }
}

impl<C, T> Access<C, T> {
    /// Creates a direct storage strategy.
    #[inline]
    pub const fn field(get: fn(&C) -> &T, get_mut: fn(&mut C) -> &mut T) -> Self {
        Self::Field { get, get_mut }
    }

    /// Creates a value accessor strategy.
    #[inline]
    pub const fn value(get: fn(&C) -> T, set: fn(&mut C, T)) -> Self {
        Self::Value { get, set: Some(set) }
    }

    /// Creates a read-only value accessor strategy.
    #[inline]
    pub const fn value_read_only(get: fn(&C) -> T) -> Self {
        Self::Value { get, set: None }
    }

    /// Creates a reference accessor strategy.
    #[inline]
    pub const fn reference(get: fn(&C) -> &T, set: fn(&mut C, &T)) -> Self {
        Self::Ref {
            get,
            set: Some(set),
            get_mut: None,
        }
    }

    /// Creates a read-only reference accessor strategy.
    #[inline]
    pub const fn reference_read_only(get: fn(&C) -> &T) -> Self {
        Self::Ref {
            get,
            set: None,
            get_mut: None,
        }
    }

    /// Attaches a mutable-reference getter to a reference accessor strategy.
    ///
    /// Returns `None` for the other strategies: direct storage already
    /// exposes `&mut T`, and value accessors have no storage to borrow.
    #[inline]
    pub fn with_mut_getter(self, get_mut: fn(&mut C) -> &mut T) -> Option<Self> {
        match self {
            Self::Ref { get, set, .. } => Some(Self::Ref {
                get,
                set,
                get_mut: Some(get_mut),
            }),
            _ => None,
        }
    }

    /// Returns the variant of this strategy.
    #[inline]
    pub const fn kind(&self) -> AccessKind {
        match self {
            Self::Field { .. } => AccessKind::Field,
            Self::Value { .. } => AccessKind::Value,
            Self::Ref { .. } => AccessKind::Ref,
        }
    }

    /// Returns `true` if the member is stored directly in the owner.
    #[inline]
    pub const fn has_direct_storage(&self) -> bool {
        matches!(self, Self::Field { .. })
    }

    /// Returns `true` if the member can be read.
    ///
    /// Every strategy carries a reader, so this is always `true`.
    #[inline]
    pub const fn has_reader(&self) -> bool {
        true
    }

    /// Returns `true` if the member can be written.
    #[inline]
    pub const fn has_writer(&self) -> bool {
        match self {
            Self::Field { .. } => true,
            Self::Value { set, .. } => set.is_some(),
            Self::Ref { set, .. } => set.is_some(),
        }
    }

    /// Returns `true` if [`try_get_ref`](Self::try_get_ref) succeeds.
    #[inline]
    pub const fn can_get_ref(&self) -> bool {
        !matches!(self, Self::Value { .. })
    }

    /// Returns `true` if [`try_get_mut`](Self::try_get_mut) succeeds.
    #[inline]
    pub const fn can_get_mut(&self) -> bool {
        match self {
            Self::Field { .. } => true,
            Self::Value { .. } => false,
            Self::Ref { get_mut, .. } => get_mut.is_some(),
        }
    }

    /// Borrows the member from the owner.
    ///
    /// Returns `None` for value accessors, which have no addressable storage.
    #[inline]
    pub fn try_get_ref<'a>(&self, obj: &'a C) -> Option<&'a T> {
        match self {
            Self::Field { get, .. } | Self::Ref { get, .. } => Some(get(obj)),
            Self::Value { .. } => None,
        }
    }

    /// Mutably borrows the member from the owner.
    ///
    /// Returns `None` if the strategy cannot expose `&mut T`.
    #[inline]
    pub fn try_get_mut<'a>(&self, obj: &'a mut C) -> Option<&'a mut T> {
        match self {
            Self::Field { get_mut, .. } => Some(get_mut(obj)),
            Self::Ref {
                get_mut: Some(get_mut),
                ..
            } => Some(get_mut(obj)),
            _ => None,
        }
    }

    /// Reads a copy of the member, valid for every strategy.
    #[inline]
    pub fn get(&self, obj: &C) -> T
    where
        T: Clone,
    {
        match self {
            Self::Field { get, .. } | Self::Ref { get, .. } => get(obj).clone(),
            Self::Value { get, .. } => get(obj),
        }
    }

    /// Writes the member.
    ///
    /// If the strategy has no writer the value is handed back unchanged.
    pub fn try_set(&self, obj: &mut C, value: T) -> Result<(), T> {
        match self {
            Self::Field { get_mut, .. } => {
                *get_mut(obj) = value;
                Ok(())
            }
            Self::Value { set: Some(set), .. } => {
                set(obj, value);
                Ok(())
            }
            Self::Ref { set: Some(set), .. } => {
                set(obj, &value);
                Ok(())
            }
            _ => Err(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};

    use super::{Access, AccessKind};

    #[derive(Default)]
    struct Label {
        text: String,
        width: u32,
        cached: String,
    }

    impl Label {
        fn text(&self) -> &String {
            &self.text
        }
        fn set_text(&mut self, text: &String) {
            self.text = text.clone();
            self.cached.clear();
        }
        fn text_mut(&mut self) -> &mut String {
            &mut self.text
        }
        fn width(&self) -> u32 {
            self.width
        }
        fn set_width(&mut self, width: u32) {
            self.width = width;
        }
        fn area(&self) -> u32 {
            self.width * 2
        }
    }

    #[test]
    fn field_capabilities() {
        let access: Access<Label, u32> = Access::field(|l| &l.width, |l| &mut l.width);
        assert_eq!(access.kind(), AccessKind::Field);
        assert!(access.has_direct_storage());
        assert!(access.has_reader());
        assert!(access.has_writer());
        assert!(access.can_get_ref());
        assert!(access.can_get_mut());
    }

    #[test]
    fn value_capabilities() {
        let access = Access::value(Label::width, Label::set_width);
        assert!(!access.has_direct_storage());
        assert!(access.has_writer());
        assert!(!access.can_get_ref());
        assert!(!access.can_get_mut());

        let read_only = Access::value_read_only(Label::area);
        assert!(read_only.has_reader());
        assert!(!read_only.has_writer());
    }

    #[test]
    fn reference_capabilities() {
        let access = Access::reference(Label::text, Label::set_text);
        assert!(access.can_get_ref());
        assert!(!access.can_get_mut());

        let access = access.with_mut_getter(Label::text_mut).unwrap();
        assert!(access.can_get_mut());
        assert_eq!(access.kind(), AccessKind::Ref);
    }

    #[test]
    fn mut_getter_only_attaches_to_references() {
        let access = Access::value(Label::width, Label::set_width);
        assert!(access.with_mut_getter(|l| &mut l.width).is_none());
    }

    #[test]
    fn read_and_write_through_every_strategy() {
        let mut label = Label::default();

        let field: Access<Label, u32> = Access::field(|l| &l.width, |l| &mut l.width);
        field.try_set(&mut label, 3).unwrap();
        assert_eq!(field.get(&label), 3);
        assert_eq!(field.try_get_ref(&label), Some(&3));

        let value = Access::value(Label::width, Label::set_width);
        value.try_set(&mut label, 7).unwrap();
        assert_eq!(value.get(&label), 7);

        let reference = Access::reference(Label::text, Label::set_text);
        label.cached.push_str("stale");
        reference.try_set(&mut label, "hello".to_string()).unwrap();
        assert_eq!(reference.get(&label), "hello");
        assert!(label.cached.is_empty());
    }

    #[test]
    fn write_without_writer_returns_value() {
        let mut label = Label::default();
        let access = Access::value_read_only(Label::area);
        assert_eq!(access.try_set(&mut label, 5), Err(5));
    }

    #[test]
    fn mutable_borrow() {
        let mut label = Label::default();
        let access = Access::reference(Label::text, Label::set_text)
            .with_mut_getter(Label::text_mut)
            .unwrap();
        access.try_get_mut(&mut label).unwrap().push_str("abc");
        assert_eq!(label.text, "abc");

        let value = Access::value(Label::width, Label::set_width);
        assert!(value.try_get_mut(&mut label).is_none());
    }
}
