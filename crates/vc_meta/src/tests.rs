//! Registration through `#[derive(Meta)]` and `#[derive(MetaEnum)]`.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::MetaError;
use crate::access::AccessKind;
use crate::derive::{Meta, MetaEnum};
use crate::ops;
use crate::registry::{ConstructorArg, Meta, MetaRegistry};

#[derive(Meta, Debug, Default, PartialEq)]
#[meta(name = "Point")]
struct Point {
    x: i32,
    y: i32,
}

#[test]
fn derived_point() {
    let mut p = Point { x: 3, y: 4 };

    assert_eq!(Point::type_name(), "Point");
    assert_eq!(ops::get_member_value::<i32, _>(&p, "x"), Ok(3));

    ops::set_member_value::<i32, _>(&mut p, "y", 5).unwrap();
    assert_eq!(ops::get_member_value::<i32, _>(&p, "y"), Ok(5));

    assert!(matches!(
        ops::get_member_value::<String, _>(&p, "x"),
        Err(MetaError::TypeMismatch { owner: "Point", .. })
    ));
}

#[derive(MetaEnum, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum Color {
    Red,
    Green,
    Blue,
}

#[derive(Meta)]
struct Shape {
    #[meta(symbol("RED", Color::Red), symbol("GREEN", Color::Green))]
    color: Color,
    #[meta(as_enum)]
    outline: Color,
    #[meta(get = Shape::sides, set = Shape::set_sides)]
    sides: u8,
    #[meta(get = Shape::area)]
    area: f32,
    #[meta(get_ref = Shape::label, set_ref = Shape::set_label, get_mut = Shape::label_mut)]
    label: String,
    #[meta(rename = "type")]
    kind: u32,
    #[meta(skip)]
    dirty: bool,
}

impl Shape {
    fn new() -> Self {
        Self {
            color: Color::Red,
            outline: Color::Green,
            sides: 3,
            area: 0.0,
            label: String::new(),
            kind: 0,
            dirty: false,
        }
    }

    fn sides(&self) -> u8 {
        self.sides
    }

    fn set_sides(&mut self, sides: u8) {
        self.sides = sides.max(3);
        self.dirty = true;
    }

    fn area(&self) -> f32 {
        self.area
    }

    fn label(&self) -> &String {
        &self.label
    }

    fn set_label(&mut self, label: &String) {
        self.label = label.trim().to_string();
    }

    fn label_mut(&mut self) -> &mut String {
        &mut self.label
    }
}

#[test]
fn derived_members_follow_field_order() {
    let names: Vec<_> = Shape::members().names().collect();
    assert_eq!(names, ["color", "outline", "sides", "area", "label", "type"]);
    assert!(!ops::has_member::<Shape>("dirty"));
    assert!(!ops::has_member::<Shape>("kind"));
}

#[test]
fn derived_access_strategies() {
    let members = Shape::members();

    let sides = members.get("sides").unwrap();
    assert_eq!(sides.access_kind(), AccessKind::Value);
    assert!(sides.has_writer());

    let area = members.get("area").unwrap();
    assert!(!area.has_writer());

    let label = members.get("label").unwrap();
    assert_eq!(label.access_kind(), AccessKind::Ref);
    assert!(label.can_get_mut());

    let kind = members.get("type").unwrap();
    assert!(kind.has_direct_storage());
}

#[test]
fn derived_accessors_apply_their_policy() {
    let mut shape = Shape::new();

    ops::set_member_value::<u8, _>(&mut shape, "sides", 1_u8).unwrap();
    assert_eq!(shape.sides, 3);
    assert!(shape.dirty);

    ops::set_member_value::<String, _>(&mut shape, "label", "  tri  ").unwrap();
    assert_eq!(shape.label, "tri");

    assert!(matches!(
        ops::set_member_value::<f32, _>(&mut shape, "area", 2.0_f32),
        Err(MetaError::ReadOnly { member: "area", .. })
    ));

    ops::with_member::<Shape, String, _>("label", |m| m.get_mut(&mut shape).push('!')).unwrap();
    assert_eq!(shape.label, "tri!");
}

#[test]
fn derived_enum_members_share_symbols() {
    let mut shape = Shape::new();

    ops::set_enum_member_value_string::<Color, _>(&mut shape, "color", "GREEN").unwrap();
    assert_eq!(
        ops::get_enum_member_value_string::<Color, _>(&shape, "color"),
        Ok("GREEN")
    );

    // `outline` lists no symbols of its own.
    assert_eq!(ops::get_member_symbol(&shape, "outline"), Ok("GREEN"));
    ops::set_member_symbol(&mut shape, "outline", "RED").unwrap();
    assert_eq!(shape.outline, Color::Red);

    shape.color = Color::Blue;
    assert!(
        ops::get_member_symbol(&shape, "color")
            .unwrap_err()
            .is_symbol_not_found()
    );
    assert!(matches!(
        ops::get_member_symbol(&shape, "sides"),
        Err(MetaError::NotEnum { .. })
    ));
}

#[test]
fn derived_members_in_a_local_registry() {
    let registry = MetaRegistry::new();
    let members = registry.members::<Shape>();
    assert!(!core::ptr::eq(members, Shape::members()));

    let table = registry.symbol_table::<Shape, Color>();
    assert!(table.is_sealed());
    assert_eq!(table.iter().map(|(name, _)| name).collect::<Vec<_>>(), ["RED", "GREEN"]);
    assert!(!core::ptr::eq(
        table,
        MetaRegistry::global().symbol_table::<Shape, Color>()
    ));

    let outline = members.get("outline").unwrap().as_enum().unwrap();
    let mut shape = Shape::new();
    outline.set_symbol(&mut shape, "RED").unwrap();
    assert_eq!(shape.outline, Color::Red);
}

#[derive(Meta)]
#[meta(ctor(u8, u16))]
struct Pair(u8, #[meta(rename = "second")] u16);

#[test]
fn derived_tuple_struct() {
    let pair = Pair(1, 2);
    assert_eq!(ops::get_member_value::<u8, _>(&pair, "0"), Ok(1));
    assert_eq!(ops::get_member_value::<u16, _>(&pair, "second"), Ok(2));
}

#[test]
fn derived_constructor_args() {
    assert!(ops::ctor_registered::<Pair>());
    assert_eq!(
        Pair::constructor_args(),
        [ConstructorArg::of::<u8>(), ConstructorArg::of::<u16>()]
    );

    assert!(!ops::ctor_registered::<Point>());
    assert!(!ops::ctor_registered::<Marker>());
}

#[derive(Meta)]
struct Marker;

#[test]
fn derived_unit_struct_is_unregistered() {
    assert!(!ops::is_registered::<Marker>());
    assert!(
        ops::get_member_value::<i32, _>(&Marker, "x")
            .unwrap_err()
            .is_member_not_found()
    );
}

#[derive(Meta)]
struct Wrapper<T> {
    inner: T,
}

#[test]
fn derived_generic_struct() {
    let a = Wrapper { inner: 7_u8 };
    let b = Wrapper {
        inner: "seven".to_string(),
    };

    assert_eq!(ops::get_member_value::<u8, _>(&a, "inner"), Ok(7));
    assert_eq!(
        ops::get_member_value::<String, _>(&b, "inner").as_deref(),
        Ok("seven")
    );
    assert_eq!(
        Wrapper::<u8>::members().get("inner").unwrap().value_type_name(),
        "u8"
    );
}
