//! `[body for x in source if filter]` end to end.

use crate::{
    BinaryOp, ComprehensionEnvironment, ComprehensionFor, ComprehensionIf, EmptyEnvironment,
    Environment, ErrorCategory, MapEnvironment, Name, Node, Type, Value,
};
use pretty_assertions::assert_eq;

fn ints(items: &[i64]) -> Value {
    Value::array(items.iter().copied().map(Value::int).collect())
}

fn int_array(items: &[i64]) -> Node {
    Node::literal(ints(items), Type::array(Type::Int)).unwrap()
}

fn x() -> Node {
    Node::variable("x", Type::Int)
}

fn doubled(source: Node, filter: Option<Node>) -> Node {
    Node::comprehension(
        Node::binary(BinaryOp::Mul, x(), Node::int(2)),
        "x",
        source,
        filter,
    )
}

fn is_even() -> Node {
    Node::binary(
        BinaryOp::Eq,
        Node::binary(BinaryOp::Mod, x(), Node::int(2)),
        Node::int(0),
    )
}

#[test]
fn maps_every_element() {
    let node = doubled(int_array(&[1, 2, 3]), None);
    assert_eq!(node.return_type().unwrap(), Type::array(Type::Int));
    assert_eq!(node.evaluate(&EmptyEnvironment).unwrap(), ints(&[2, 4, 6]));
}

#[test]
fn filter_drops_elements() {
    let node = Node::comprehension(x(), "x", int_array(&[1, 2, 3, 4]), Some(is_even()));
    assert_eq!(node.evaluate(&EmptyEnvironment).unwrap(), ints(&[2, 4]));
}

#[test]
fn built_from_both_halves() {
    let opening = ComprehensionFor::new(x(), "x", int_array(&[1, 2, 3, 4]));
    let mut filter = ComprehensionIf::new(is_even());
    filter.assign_opening(&opening);
    let node = filter.link(opening).unwrap();
    assert_eq!(node.evaluate(&EmptyEnvironment).unwrap(), ints(&[2, 4]));
}

#[test]
fn tuple_source_yields_an_array() {
    let source = Node::variable("pair", Type::tuple(Type::Int, 2));
    let env = MapEnvironment::new().with(
        "pair",
        Type::tuple(Type::Int, 2),
        Value::tuple(vec![Value::int(5), Value::int(6)]),
    );
    let node = doubled(source, None);
    assert_eq!(node.return_type().unwrap(), Type::array(Type::Int));
    assert_eq!(node.evaluate(&env).unwrap(), ints(&[10, 12]));
}

#[test]
fn body_reads_outer_bindings() {
    let env = MapEnvironment::new().with("bonus", Type::Int, Value::int(10));
    let node = Node::comprehension(
        Node::binary(BinaryOp::Add, x(), Node::variable("bonus", Type::Int)),
        "x",
        int_array(&[1, 2]),
        None,
    );
    assert_eq!(node.evaluate(&env).unwrap(), ints(&[11, 12]));
}

#[test]
fn loop_variable_shadows_and_does_not_leak() {
    let env = MapEnvironment::new().with("x", Type::Int, Value::int(99));
    let node = Node::comprehension(x(), "x", int_array(&[1, 2]), None);
    assert_eq!(node.evaluate(&env).unwrap(), ints(&[1, 2]));
    assert_eq!(x().evaluate(&env).unwrap(), Value::int(99));
}

#[test]
fn nested_comprehension_over_the_same_name() {
    let range_x = Node::call_named("range", vec![x()]).unwrap();
    let inner = Node::comprehension(x(), "x", range_x, None);
    let outer = Node::comprehension(inner, "x", int_array(&[1, 2]), None);
    assert_eq!(
        outer.return_type().unwrap(),
        Type::array(Type::array(Type::Int))
    );
    assert_eq!(
        outer.evaluate(&EmptyEnvironment).unwrap(),
        Value::array(vec![ints(&[0]), ints(&[0, 1])])
    );
}

#[test]
fn fresh_scope_per_evaluation() {
    let node = doubled(int_array(&[1, 2, 3]), Some(is_even()));
    let first = node.evaluate(&EmptyEnvironment).unwrap();
    let second = node.evaluate(&EmptyEnvironment).unwrap();
    assert_eq!(first, ints(&[4]));
    assert_eq!(first, second);
}

#[test]
fn empty_source() {
    let node = doubled(int_array(&[]), None);
    assert_eq!(node.evaluate(&EmptyEnvironment).unwrap(), ints(&[]));
}

#[test]
fn element_errors_propagate() {
    let node = Node::comprehension(
        Node::binary(BinaryOp::Div, Node::int(1), x()),
        "x",
        int_array(&[1, 0]),
        None,
    );
    let err = node.evaluate(&EmptyEnvironment).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Calculation);
}

#[test]
fn null_source_is_a_calculation_error() {
    let env = MapEnvironment::new().with("xs", Type::array(Type::Int), Value::Null);
    let node = doubled(Node::variable("xs", Type::array(Type::Int)), None);
    let err = node.evaluate(&env).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Calculation);
}

mod scope {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_the_loop_variable_then_delegates() {
        let parent = MapEnvironment::new().with("hp", Type::Int, Value::int(4));
        let mut scope = ComprehensionEnvironment::new(&parent, Name::new("x"));
        scope.set_loop_variable(Value::int(1));
        assert_eq!(scope.lookup("x").unwrap(), Value::int(1));
        assert_eq!(scope.lookup("hp").unwrap(), Value::int(4));
        scope.set_loop_variable(Value::int(2));
        assert_eq!(scope.lookup("x").unwrap(), Value::int(2));
    }

    #[test]
    fn unbound_loop_variable_is_a_processing_error() {
        let scope = ComprehensionEnvironment::new(&EmptyEnvironment, Name::new("x"));
        let err = scope.lookup("x").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Processing);
    }
}
