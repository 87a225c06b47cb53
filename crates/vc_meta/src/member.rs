//! Provide member descriptors.
//!
//! - [`Member`]: A named member of type `T` inside owner `C`, statically typed.
//! - [`DynamicMember`]: The type-erased view stored in [`Members`](crate::registry::Members),
//!   used to enumerate heterogeneous members and to narrow back to [`Member`].

use core::any::{Any, TypeId, type_name};
use core::fmt;

use crate::access::{Access, AccessKind};
use crate::enums::DynamicEnumMember;

// -----------------------------------------------------------------------------
// Member

/// A registered member of type `T` inside an owner `C`.
///
/// The descriptor is immutable once registration finishes. Typed operations
/// cannot be called with a wrong value type: `Member<C, T>` only reads and
/// writes `T`, and [`set`](Self::set) accepts anything convertible into `T`.
///
/// Operations a strategy does not support panic. Check the capability
/// predicates first, or use the `try_*` forms.
///
/// # Examples
///
/// ```
/// use vc_meta::member::Member;
///
/// struct Player {
///     name: String,
///     health: f32,
/// }
///
/// impl Player {
///     fn health(&self) -> f32 { self.health }
///     fn set_health(&mut self, health: f32) { self.health = health.clamp(0.0, 100.0) }
/// }
///
/// let name = Member::field("name", |p: &Player| &p.name, |p| &mut p.name);
/// let health = Member::value("health", Player::health, Player::set_health);
///
/// let mut player = Player { name: "Ada".into(), health: 50.0 };
///
/// assert!(name.can_get_ref());
/// assert!(!health.can_get_ref());
///
/// name.set(&mut player, "Grace");
/// health.set(&mut player, 250.0_f32);
///
/// assert_eq!(name.get_ref(&player), "Grace");
/// assert_eq!(health.get(&player), 100.0);
/// ```
pub struct Member<C, T> {
    name: &'static str,
    access: Access<C, T>,
}

impl<C, T> Clone for Member<C, T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, T> Copy for Member<C, T> {}

impl<C, T> fmt::Debug for Member<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("owner", &type_name::<C>())
            .field("value", &type_name::<T>())
            .field("access", &self.access)
            .finish()
    }
}

impl<C, T> Member<C, T> {
    /// Creates a member with the given access strategy.
    #[inline]
    pub const fn new(name: &'static str, access: Access<C, T>) -> Self {
        Self { name, access }
    }

    /// Creates a member stored directly in the owner.
    #[inline]
    pub const fn field(
        name: &'static str,
        get: fn(&C) -> &T,
        get_mut: fn(&mut C) -> &mut T,
    ) -> Self {
        Self::new(name, Access::field(get, get_mut))
    }

    /// Creates a member reached through value accessors.
    #[inline]
    pub const fn value(name: &'static str, get: fn(&C) -> T, set: fn(&mut C, T)) -> Self {
        Self::new(name, Access::value(get, set))
    }

    /// Creates a read-only member reached through a value getter.
    #[inline]
    pub const fn value_read_only(name: &'static str, get: fn(&C) -> T) -> Self {
        Self::new(name, Access::value_read_only(get))
    }

    /// Creates a member reached through reference accessors.
    #[inline]
    pub const fn reference(
        name: &'static str,
        get: fn(&C) -> &T,
        set: fn(&mut C, &T),
    ) -> Self {
        Self::new(name, Access::reference(get, set))
    }

    /// Creates a read-only member reached through a reference getter.
    #[inline]
    pub const fn reference_read_only(name: &'static str, get: fn(&C) -> &T) -> Self {
        Self::new(name, Access::reference_read_only(get))
    }

    /// Attaches a mutable-reference getter to a reference-accessor member.
    ///
    /// # Panics
    ///
    /// Panics if the member does not use reference accessors.
    pub fn with_mut_getter(self, get_mut: fn(&mut C) -> &mut T) -> Self {
        match self.access.with_mut_getter(get_mut) {
            Some(access) => Self::new(self.name, access),
            None => panic!(
                "member `{}` uses {}, a mutable getter can only be attached to reference accessors",
                self.name,
                self.access.kind(),
            ),
        }
    }

    /// Returns the member name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the access strategy.
    #[inline]
    pub const fn access(&self) -> &Access<C, T> {
        &self.access
    }

    /// Returns the variant of the access strategy.
    #[inline]
    pub const fn access_kind(&self) -> AccessKind {
        self.access.kind()
    }

    /// Returns `true` if the member is stored directly in the owner.
    #[inline]
    pub const fn has_direct_storage(&self) -> bool {
        self.access.has_direct_storage()
    }

    /// Returns `true` if the member can be read, always the case.
    #[inline]
    pub const fn has_reader(&self) -> bool {
        self.access.has_reader()
    }

    /// Returns `true` if the member can be written.
    #[inline]
    pub const fn has_writer(&self) -> bool {
        self.access.has_writer()
    }

    /// Returns `true` if [`get_ref`](Self::get_ref) can be called.
    #[inline]
    pub const fn can_get_ref(&self) -> bool {
        self.access.can_get_ref()
    }

    /// Returns `true` if [`get_mut`](Self::get_mut) can be called.
    #[inline]
    pub const fn can_get_mut(&self) -> bool {
        self.access.can_get_mut()
    }

    /// Borrows the member, or returns `None` if the strategy cannot lend `&T`.
    #[inline]
    pub fn try_get_ref<'a>(&self, obj: &'a C) -> Option<&'a T> {
        self.access.try_get_ref(obj)
    }

    /// Borrows the member.
    ///
    /// # Panics
    ///
    /// Panics if [`can_get_ref`](Self::can_get_ref) is `false`.
    pub fn get_ref<'a>(&self, obj: &'a C) -> &'a T {
        match self.access.try_get_ref(obj) {
            Some(val) => val,
            None => panic!(
                "member `{}` uses {}, which cannot lend a shared reference",
                self.name,
                self.access.kind(),
            ),
        }
    }

    /// Mutably borrows the member, or returns `None` if the strategy cannot lend `&mut T`.
    #[inline]
    pub fn try_get_mut<'a>(&self, obj: &'a mut C) -> Option<&'a mut T> {
        self.access.try_get_mut(obj)
    }

    /// Mutably borrows the member.
    ///
    /// # Panics
    ///
    /// Panics if [`can_get_mut`](Self::can_get_mut) is `false`.
    pub fn get_mut<'a>(&self, obj: &'a mut C) -> &'a mut T {
        match self.access.try_get_mut(obj) {
            Some(val) => val,
            None => panic!(
                "member `{}` uses {}, which cannot lend a mutable reference",
                self.name,
                self.access.kind(),
            ),
        }
    }

    /// Reads a copy of the member.
    #[inline]
    pub fn get(&self, obj: &C) -> T
    where
        T: Clone,
    {
        self.access.get(obj)
    }

    /// Writes the member, handing the converted value back if there is no writer.
    #[inline]
    pub fn try_set<V: Into<T>>(&self, obj: &mut C, value: V) -> Result<(), T> {
        self.access.try_set(obj, value.into())
    }

    /// Writes the member.
    ///
    /// # Panics
    ///
    /// Panics if [`has_writer`](Self::has_writer) is `false`.
    pub fn set<V: Into<T>>(&self, obj: &mut C, value: V) {
        if self.access.try_set(obj, value.into()).is_err() {
            panic!("member `{}` has no writer", self.name);
        }
    }
}

impl<C: 'static, T: 'static> Member<C, T> {
    /// Returns the [`TypeId`] of the owner.
    #[inline]
    pub fn owner_type_id(&self) -> TypeId {
        TypeId::of::<C>()
    }

    /// Returns the [`TypeId`] of the value.
    #[inline]
    pub fn value_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    /// Returns the type name of the owner.
    #[inline]
    pub fn owner_type_name(&self) -> &'static str {
        type_name::<C>()
    }

    /// Returns the type name of the value.
    #[inline]
    pub fn value_type_name(&self) -> &'static str {
        type_name::<T>()
    }

    /// Check if the given type matches the value type.
    #[inline]
    pub fn value_type_is<U: Any>(&self) -> bool {
        TypeId::of::<T>() == TypeId::of::<U>()
    }
}

// -----------------------------------------------------------------------------
// DynamicMember

/// A type-erased member of owner `C`.
///
/// [`Members`](crate::registry::Members) stores its descriptors as
/// `Box<dyn DynamicMember<C>>`, so members of different value types can
/// live in one ordered set. Use `downcast` to recover the typed [`Member`]
/// and [`as_enum`](Self::as_enum) to reach enum operations.
///
/// # Examples
///
/// ```
/// use vc_meta::member::{DynamicMember, Member};
///
/// struct Foo { a: u8, b: bool }
///
/// let members: Vec<Box<dyn DynamicMember<Foo>>> = vec![
///     Box::new(Member::field("a", |f: &Foo| &f.a, |f| &mut f.a)),
///     Box::new(Member::field("b", |f: &Foo| &f.b, |f| &mut f.b)),
/// ];
///
/// let foo = Foo { a: 3, b: true };
///
/// assert_eq!(members[1].value_type_name(), "bool");
/// assert!(members[0].downcast::<bool>().is_none());
/// assert_eq!(members[0].downcast::<u8>().unwrap().get(&foo), 3);
/// ```
pub trait DynamicMember<C>: Send + Sync + 'static {
    /// Returns the member name.
    fn name(&self) -> &'static str;

    /// Returns the [`TypeId`] of the value.
    fn value_type_id(&self) -> TypeId;

    /// Returns the type name of the value.
    fn value_type_name(&self) -> &'static str;

    /// Returns the variant of the access strategy.
    fn access_kind(&self) -> AccessKind;

    /// See [`Member::has_direct_storage`].
    fn has_direct_storage(&self) -> bool;

    /// See [`Member::has_reader`].
    fn has_reader(&self) -> bool;

    /// See [`Member::has_writer`].
    fn has_writer(&self) -> bool;

    /// See [`Member::can_get_ref`].
    fn can_get_ref(&self) -> bool;

    /// See [`Member::can_get_mut`].
    fn can_get_mut(&self) -> bool;

    /// Borrows the member as `&dyn Any`, if the strategy can lend a reference.
    fn get_ref_any<'a>(&self, obj: &'a C) -> Option<&'a dyn Any>;

    /// Mutably borrows the member as `&mut dyn Any`, if the strategy can lend one.
    fn get_mut_any<'a>(&self, obj: &'a mut C) -> Option<&'a mut dyn Any>;

    /// Returns the typed [`Member<C, T>`] as `&dyn Any`.
    ///
    /// Enum members return their inner [`Member<C, E>`], so plain typed
    /// access works for them as well.
    fn as_member_any(&self) -> &dyn Any;

    /// Narrows to the enum view.
    ///
    /// Returns `None` for members that were not registered as enum members.
    #[inline]
    fn as_enum(&self) -> Option<&dyn DynamicEnumMember<C>> {
        None
    }

    /// Returns `true` if the member was registered as an enum member.
    #[inline]
    fn is_enum(&self) -> bool {
        self.as_enum().is_some()
    }
}

impl<C: 'static> dyn DynamicMember<C> {
    /// Check if the given type matches the value type.
    #[inline]
    pub fn value_type_is<T: Any>(&self) -> bool {
        self.value_type_id() == TypeId::of::<T>()
    }

    /// Returns the typed member, or `None` if the value type is not `T`.
    #[inline]
    pub fn downcast<T: 'static>(&self) -> Option<&Member<C, T>> {
        self.as_member_any().downcast_ref()
    }
}

impl<C: 'static> fmt::Debug for dyn DynamicMember<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicMember")
            .field("name", &self.name())
            .field("value", &self.value_type_name())
            .field("access", &self.access_kind())
            .field("enum", &self.is_enum())
            .finish()
    }
}

impl<C: 'static, T: 'static> DynamicMember<C> for Member<C, T> {
    #[inline]
    fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    fn value_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    #[inline]
    fn value_type_name(&self) -> &'static str {
        type_name::<T>()
    }

    #[inline]
    fn access_kind(&self) -> AccessKind {
        self.access.kind()
    }

    #[inline]
    fn has_direct_storage(&self) -> bool {
        self.access.has_direct_storage()
    }

    #[inline]
    fn has_reader(&self) -> bool {
        self.access.has_reader()
    }

    #[inline]
    fn has_writer(&self) -> bool {
        self.access.has_writer()
    }

    #[inline]
    fn can_get_ref(&self) -> bool {
        self.access.can_get_ref()
    }

    #[inline]
    fn can_get_mut(&self) -> bool {
        self.access.can_get_mut()
    }

    fn get_ref_any<'a>(&self, obj: &'a C) -> Option<&'a dyn Any> {
        self.access.try_get_ref(obj).map(|val| val as &dyn Any)
    }

    fn get_mut_any<'a>(&self, obj: &'a mut C) -> Option<&'a mut dyn Any> {
        self.access.try_get_mut(obj).map(|val| val as &mut dyn Any)
    }

    #[inline]
    fn as_member_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use core::any::TypeId;

    use super::{DynamicMember, Member};
    use crate::access::AccessKind;

    #[derive(Default)]
    struct Window {
        title: String,
        width: u32,
        visible: bool,
    }

    impl Window {
        fn title(&self) -> &String {
            &self.title
        }
        fn set_title(&mut self, title: &String) {
            self.title.clone_from(title);
        }
        fn title_mut(&mut self) -> &mut String {
            &mut self.title
        }
        fn width(&self) -> u32 {
            self.width
        }
        fn set_width(&mut self, width: u32) {
            self.width = width.max(1);
        }
        fn pixels(&self) -> u64 {
            u64::from(self.width) * 2
        }
    }

    #[test]
    fn types_and_name() {
        let member = Member::field("visible", |w: &Window| &w.visible, |w| &mut w.visible);
        assert_eq!(member.name(), "visible");
        assert_eq!(member.owner_type_id(), TypeId::of::<Window>());
        assert_eq!(member.value_type_id(), TypeId::of::<bool>());
        assert_eq!(member.value_type_name(), "bool");
        assert!(member.value_type_is::<bool>());
        assert!(!member.value_type_is::<u8>());
    }

    #[test]
    fn set_converts_into_value_type() {
        let mut window = Window::default();
        let title = Member::reference("title", Window::title, Window::set_title);
        title.set(&mut window, "main");
        assert_eq!(title.get(&window), "main");

        let width = Member::value("width", Window::width, Window::set_width);
        width.set(&mut window, 0u8);
        assert_eq!(width.get(&window), 1);
    }

    #[test]
    fn try_set_without_writer() {
        let mut window = Window::default();
        let pixels = Member::value_read_only("pixels", Window::pixels);
        assert!(!pixels.has_writer());
        assert_eq!(pixels.try_set(&mut window, 10u32), Err(10u64));
    }

    #[test]
    #[should_panic(expected = "member `width` uses value accessors")]
    fn get_ref_on_value_accessors_panics() {
        let window = Window::default();
        let width = Member::value("width", Window::width, Window::set_width);
        width.get_ref(&window);
    }

    #[test]
    #[should_panic(expected = "member `title` uses reference accessors")]
    fn get_mut_without_mut_getter_panics() {
        let mut window = Window::default();
        let title = Member::reference("title", Window::title, Window::set_title);
        title.get_mut(&mut window);
    }

    #[test]
    #[should_panic(expected = "member `pixels` has no writer")]
    fn set_without_writer_panics() {
        let mut window = Window::default();
        Member::value_read_only("pixels", Window::pixels).set(&mut window, 3u64);
    }

    #[test]
    #[should_panic(expected = "a mutable getter can only be attached to reference accessors")]
    fn mut_getter_on_field_panics() {
        Member::field("width", |w: &Window| &w.width, |w| &mut w.width)
            .with_mut_getter(|w| &mut w.width);
    }

    #[test]
    fn mut_getter_on_reference() {
        let mut window = Window::default();
        let title = Member::reference("title", Window::title, Window::set_title)
            .with_mut_getter(Window::title_mut);
        assert!(title.can_get_mut());
        title.get_mut(&mut window).push('x');
        assert_eq!(window.title, "x");
    }

    #[test]
    fn dynamic_view() {
        let mut window = Window::default();
        let members: [Box<dyn DynamicMember<Window>>; 3] = [
            Box::new(Member::reference("title", Window::title, Window::set_title)),
            Box::new(Member::value("width", Window::width, Window::set_width)),
            Box::new(Member::field("visible", |w: &Window| &w.visible, |w| &mut w.visible)),
        ];

        assert_eq!(members[0].access_kind(), AccessKind::Ref);
        assert_eq!(members[1].access_kind(), AccessKind::Value);
        assert!(members[2].has_direct_storage());
        assert!(members.iter().all(|m| !m.is_enum()));

        assert!(members[1].get_ref_any(&window).is_none());
        *members[2]
            .get_mut_any(&mut window)
            .unwrap()
            .downcast_mut::<bool>()
            .unwrap() = true;
        assert!(window.visible);

        assert!(members[1].value_type_is::<u32>());
        assert!(members[1].downcast::<u64>().is_none());
        members[1].downcast::<u32>().unwrap().set(&mut window, 40u32);
        assert_eq!(window.width, 40);
    }
}
