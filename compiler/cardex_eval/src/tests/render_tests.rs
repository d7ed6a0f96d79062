//! Rendering trees back to source text.

use crate::{
    BinaryOp, Color, EnumType, EnumValue, Name, Node, Signature, Type, UnaryOp, Value,
};
use pretty_assertions::assert_eq;

fn v(name: &str) -> Node {
    Node::variable(name, Type::Int)
}

fn bin(op: BinaryOp, left: Node, right: Node) -> Node {
    Node::binary(op, left, right)
}

mod parentheses {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lower_precedence_child() {
        let node = bin(BinaryOp::Mul, bin(BinaryOp::Add, v("a"), v("b")), v("c"));
        assert_eq!(node.to_string(), "(a + b) * c");
        let node = bin(BinaryOp::Add, v("a"), bin(BinaryOp::Mul, v("b"), v("c")));
        assert_eq!(node.to_string(), "a + b * c");
    }

    #[test]
    fn left_associative_chain() {
        let left = bin(BinaryOp::Sub, bin(BinaryOp::Sub, v("a"), v("b")), v("c"));
        assert_eq!(left.to_string(), "a - b - c");
        let right = bin(BinaryOp::Sub, v("a"), bin(BinaryOp::Sub, v("b"), v("c")));
        assert_eq!(right.to_string(), "a - (b - c)");
    }

    #[test]
    fn right_associative_coalesce() {
        let right = bin(BinaryOp::Coalesce, v("a"), bin(BinaryOp::Coalesce, v("b"), v("c")));
        assert_eq!(right.to_string(), "a ?? b ?? c");
        let left = bin(BinaryOp::Coalesce, bin(BinaryOp::Coalesce, v("a"), v("b")), v("c"));
        assert_eq!(left.to_string(), "(a ?? b) ?? c");
    }

    #[test]
    fn mixed_logic() {
        let b = |name: &str| Node::variable(name, Type::Bool);
        let node = bin(BinaryOp::And, bin(BinaryOp::Or, b("p"), b("q")), b("r"));
        assert_eq!(node.to_string(), "(p || q) && r");
        let node = bin(BinaryOp::Or, b("p"), bin(BinaryOp::And, b("q"), b("r")));
        assert_eq!(node.to_string(), "p || q && r");
    }

    #[test]
    fn prefix_operators() {
        let node = Node::unary(UnaryOp::Neg, bin(BinaryOp::Add, v("a"), v("b")));
        assert_eq!(node.to_string(), "-(a + b)");
        let node = Node::unary(UnaryOp::Neg, Node::unary(UnaryOp::Neg, v("a")));
        assert_eq!(node.to_string(), "-(-a)");
        let node = Node::unary(UnaryOp::Neg, Node::int(-1));
        assert_eq!(node.to_string(), "-(-1)");
        let node = Node::unary(UnaryOp::Not, Node::variable("p", Type::Bool));
        assert_eq!(node.to_string(), "!p");
    }

    #[test]
    fn negative_literal_operands() {
        assert_eq!(bin(BinaryOp::Sub, v("a"), Node::int(-1)).to_string(), "a - -1");
        let node = Node::index(Node::int(-1), Node::int(0));
        assert_eq!(node.to_string(), "(-1)[0]");
    }

    #[test]
    fn postfix_subjects() {
        let node = Node::index(bin(BinaryOp::Add, v("a"), v("b")), bin(BinaryOp::Add, v("i"), Node::int(1)));
        assert_eq!(node.to_string(), "(a + b)[i + 1]");
        let xs = Node::variable("xs", Type::array(Type::Int));
        let node = Node::index(Node::index(xs.clone(), Node::int(0)), Node::int(1));
        assert_eq!(node.to_string(), "xs[0][1]");
        assert_eq!(Node::slice(xs.clone(), Some(Node::int(1)), None).to_string(), "xs[1:]");
        assert_eq!(Node::slice(xs, None, Some(Node::int(-1))).to_string(), "xs[:-1]");
    }

    #[test]
    fn conditionals() {
        let p = |name: &str| Node::variable(name, Type::Bool);
        let chained = Node::conditional(p("c"), v("a"), Node::conditional(p("d"), v("b"), v("e")));
        assert_eq!(chained.to_string(), "c ? a : d ? b : e");
        let nested_then = Node::conditional(p("c"), Node::conditional(p("d"), v("a"), v("b")), v("e"));
        assert_eq!(nested_then.to_string(), "c ? (d ? a : b) : e");
        let nested_condition =
            Node::conditional(Node::conditional(p("c"), p("d"), p("e")), v("a"), v("b"));
        assert_eq!(nested_condition.to_string(), "(c ? d : e) ? a : b");
        let operand = bin(BinaryOp::Add, Node::conditional(p("c"), v("a"), v("b")), v("d"));
        assert_eq!(operand.to_string(), "(c ? a : b) + d");
    }
}

mod literals {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scalars() {
        assert_eq!(Node::float(1.0).to_string(), "1.0");
        assert_eq!(Node::float(0.25).to_string(), "0.25");
        assert_eq!(Node::boolean(false).to_string(), "false");
        assert_eq!(Node::string("say \"hi\"").to_string(), r#""say \"hi\"""#);
        assert_eq!(Node::null(Type::Int).to_string(), "null");
        assert_eq!(Node::color(Color::rgb(255, 0, 0)).to_string(), "color(\"#FF0000\")");
    }

    #[test]
    fn strings_use_template_escapes_only() {
        assert_eq!(Node::string("a\\b").to_string(), r#""a\\b""#);
        assert_eq!(Node::string("line\nnext\tcol").to_string(), r#""line\nnext\tcol""#);
        assert_eq!(Node::string("bell\u{7}").to_string(), "\"bell\u{7}\"");
        assert_eq!(Node::string("café ♠").to_string(), "\"café ♠\"");
    }

    #[test]
    fn exponent_floats_keep_a_decimal_point() {
        assert_eq!(Node::float(1e308).to_string(), "1.0e308");
        assert_eq!(Node::float(-2.5e-8).to_string(), "-2.5e-8");
    }

    #[test]
    fn enum_member() {
        let suit = EnumType::new("Suit", ["HEARTS", "SPADES"].map(Name::new));
        let node = Node::enum_member(EnumValue::new(suit, 1).unwrap());
        assert_eq!(node.to_string(), "Suit.SPADES");
    }

    #[test]
    fn sequences() {
        let array = Node::literal(
            Value::array(vec![Value::int(1), Value::int(2)]),
            Type::array(Type::Int),
        )
        .unwrap();
        assert_eq!(array.to_string(), "[1, 2]");
        let tuple = Node::literal(
            Value::tuple(vec![Value::string("a"), Value::string("b")]),
            Type::tuple(Type::Str, 2),
        )
        .unwrap();
        assert_eq!(tuple.to_string(), r#"tuple("a", "b")"#);
    }
}

#[test]
fn calls() {
    let node = Node::call_named("max", vec![v("a"), Node::float(2.5)]).unwrap();
    assert_eq!(node.to_string(), "max(a, 2.5)");
    let sig = Signature::new("bonus", vec![Type::Int], Type::Int);
    let node = Node::invoke(sig, vec![bin(BinaryOp::Add, v("a"), Node::int(1))]).unwrap();
    assert_eq!(node.to_string(), "bonus(a + 1)");
}

#[test]
fn comprehension() {
    let x = || Node::variable("x", Type::Int);
    let node = Node::comprehension(
        bin(BinaryOp::Mul, x(), Node::int(2)),
        "x",
        Node::variable("xs", Type::array(Type::Int)),
        Some(bin(BinaryOp::Gt, x(), Node::int(1))),
    );
    assert_eq!(node.to_string(), "[x * 2 for x in xs if x > 1]");
}
