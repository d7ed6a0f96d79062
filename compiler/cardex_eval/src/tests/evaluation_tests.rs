//! End-to-end evaluation of operator and call trees.

use crate::{
    BinaryOp, EmptyEnvironment, EnumType, EnumValue, ErrorCategory, EvalErrorKind,
    MapEnvironment, Name, Node, Type, UnaryOp, Value,
};
use pretty_assertions::assert_eq;

fn int_array(items: &[i64]) -> Node {
    Node::literal(
        Value::array(items.iter().copied().map(Value::int).collect()),
        Type::array(Type::Int),
    )
    .unwrap()
}

fn var(name: &str, ty: Type) -> Node {
    Node::variable(name, ty)
}

fn eval(node: &Node) -> Value {
    node.evaluate(&EmptyEnvironment).unwrap()
}

fn call(name: &str, args: Vec<Node>) -> Node {
    Node::call_named(name, args).unwrap()
}

mod arithmetic {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn int_stays_int() {
        let node = Node::binary(BinaryOp::Div, Node::int(7), Node::int(2));
        assert_eq!(node.return_type().unwrap(), Type::Int);
        assert_eq!(eval(&node), Value::int(3));
    }

    #[test]
    fn float_operand_promotes() {
        let node = Node::binary(BinaryOp::Add, Node::int(1), Node::float(2.5));
        assert_eq!(node.return_type().unwrap(), Type::Float);
        assert_eq!(eval(&node), Value::float(3.5));
    }

    #[test]
    fn string_concatenation() {
        let node = Node::binary(BinaryOp::Add, Node::string("fire"), Node::string("ball"));
        assert_eq!(eval(&node), Value::string("fireball"));
    }

    #[test]
    fn overflow_and_zero_divisors_are_calculation_errors() {
        let cases = [
            Node::binary(BinaryOp::Add, Node::int(i64::MAX), Node::int(1)),
            Node::binary(BinaryOp::Div, Node::int(1), Node::int(0)),
            Node::binary(BinaryOp::Mod, Node::int(1), Node::int(0)),
            Node::binary(BinaryOp::Div, Node::float(1.0), Node::float(0.0)),
            Node::binary(BinaryOp::Mul, Node::float(1e308), Node::float(10.0)),
            Node::unary(UnaryOp::Neg, Node::int(i64::MIN)),
        ];
        for node in cases {
            let err = node.evaluate(&EmptyEnvironment).unwrap_err();
            assert_eq!(err.category(), ErrorCategory::Calculation, "{node}");
        }
    }

    #[test]
    fn null_operand_is_a_calculation_error() {
        let env = MapEnvironment::new().with("hp", Type::Int, Value::Null);
        let node = Node::binary(BinaryOp::Add, var("hp", Type::Int), Node::int(1));
        let err = node.evaluate(&env).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Calculation);
    }
}

mod equality {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn enum_member_equals_its_name() {
        let colors = EnumType::new("Color", ["RED", "GREEN"].map(Name::new));
        let red = Node::enum_member(EnumValue::named(colors, "RED").unwrap());
        let node = Node::binary(BinaryOp::Eq, red, Node::string("red"));
        assert_eq!(eval(&node), Value::Bool(true));
    }

    #[test]
    fn int_equals_float() {
        let node = Node::binary(BinaryOp::Eq, Node::int(1), Node::float(1.0));
        assert_eq!(eval(&node), Value::Bool(true));
    }

    #[test]
    fn null_equals_null() {
        let node = Node::binary(BinaryOp::Eq, Node::null(Type::Str), Node::null(Type::Str));
        assert_eq!(eval(&node), Value::Bool(true));
        let node = Node::binary(BinaryOp::NotEq, Node::null(Type::Str), Node::string(""));
        assert_eq!(eval(&node), Value::Bool(true));
    }

    #[test]
    fn nan_orders_false() {
        let nan = || Node::float(f64::NAN);
        assert_eq!(eval(&Node::binary(BinaryOp::Lt, nan(), Node::int(1))), Value::Bool(false));
        assert_eq!(eval(&Node::binary(BinaryOp::GtEq, nan(), nan())), Value::Bool(false));
    }
}

mod laziness {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn logical_operators_short_circuit() {
        let missing = || var("missing", Type::Bool);
        let and = Node::binary(BinaryOp::And, Node::boolean(false), missing());
        assert_eq!(eval(&and), Value::Bool(false));
        let or = Node::binary(BinaryOp::Or, Node::boolean(true), missing());
        assert_eq!(eval(&or), Value::Bool(true));
        let and = Node::binary(BinaryOp::And, Node::boolean(true), missing());
        assert!(and.evaluate(&EmptyEnvironment).unwrap_err().is_undefined_variable());
    }

    #[test]
    fn conditional_evaluates_one_branch() {
        let node = Node::conditional(
            Node::boolean(true),
            Node::int(1),
            Node::binary(BinaryOp::Div, Node::int(1), Node::int(0)),
        );
        assert_eq!(eval(&node), Value::int(1));
    }
}

mod fallbacks {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn coalesce_covers_null_and_failures() {
        let env = MapEnvironment::new().with("title", Type::Str, Value::Null);
        let null = Node::binary(BinaryOp::Coalesce, var("title", Type::Str), Node::string("-"));
        assert_eq!(null.evaluate(&env).unwrap(), Value::string("-"));

        let undefined = Node::binary(BinaryOp::Coalesce, var("flavor", Type::Str), Node::string("-"));
        assert_eq!(undefined.evaluate(&env).unwrap(), Value::string("-"));

        let failing = Node::binary(
            BinaryOp::Coalesce,
            Node::binary(BinaryOp::Div, Node::int(1), Node::int(0)),
            Node::int(5),
        );
        assert_eq!(failing.evaluate(&env).unwrap(), Value::int(5));
    }

    #[test]
    fn coalesce_keeps_present_values() {
        let env = MapEnvironment::new().with("title", Type::Str, Value::string("Imp"));
        let node = Node::binary(BinaryOp::Coalesce, var("title", Type::Str), Node::string("-"));
        assert_eq!(node.evaluate(&env).unwrap(), Value::string("Imp"));
    }

    #[test]
    fn exists() {
        let env = MapEnvironment::new()
            .with("cost", Type::Int, Value::int(2))
            .with("power", Type::Int, Value::Null);
        let exists = |name: &str| call("exists", vec![var(name, Type::Int)]).evaluate(&env).unwrap();
        assert_eq!(exists("cost"), Value::Bool(true));
        assert_eq!(exists("power"), Value::Bool(false));
        assert_eq!(exists("toughness"), Value::Bool(false));
    }

    #[test]
    fn exists_propagates_other_errors() {
        let node = call(
            "exists",
            vec![Node::binary(BinaryOp::Div, Node::int(1), Node::int(0))],
        );
        assert!(node.evaluate(&EmptyEnvironment).is_err());
    }

    #[test]
    fn try_falls_back_on_failure_only() {
        let node = call("try", vec![call("int", vec![Node::string("x")]), Node::int(0)]);
        assert_eq!(eval(&node), Value::int(0));

        let env = MapEnvironment::new().with("power", Type::Int, Value::Null);
        let node = call("try", vec![var("power", Type::Int), Node::int(0)]);
        assert_eq!(node.evaluate(&env).unwrap(), Value::Null);
    }
}

mod variables {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn undefined_variable() {
        let err = var("hp", Type::Int).evaluate(&EmptyEnvironment).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::UndefinedVariable);
        assert_eq!(err.message, "undefined variable: hp");
    }

    #[test]
    fn reads_current_binding() {
        let mut env = MapEnvironment::new().with("hp", Type::Int, Value::int(3));
        let node = Node::binary(BinaryOp::Mul, var("hp", Type::Int), Node::int(2));
        assert_eq!(node.evaluate(&env).unwrap(), Value::int(6));
        env.define("hp", Type::Int, Value::int(5));
        assert_eq!(node.evaluate(&env).unwrap(), Value::int(10));
    }

    #[test]
    fn evaluation_leaves_the_tree_untouched() {
        let node = Node::binary(BinaryOp::Add, int_array(&[1]), int_array(&[2]));
        let before = node.clone();
        let _ = node.evaluate(&EmptyEnvironment);
        assert_eq!(node, before);
    }

    #[test]
    fn one_tree_many_threads() {
        let node = Node::binary(BinaryOp::Mul, var("n", Type::Int), Node::int(10));
        let results: Vec<Value> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|n| {
                    let node = &node;
                    scope.spawn(move || {
                        let env = MapEnvironment::new().with("n", Type::Int, Value::int(n));
                        node.evaluate(&env).unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(
            results,
            [0, 10, 20, 30].map(Value::int).to_vec()
        );
    }
}

mod indexing {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn negative_index_counts_from_the_end() {
        let node = Node::index(int_array(&[1, 2, 3]), Node::int(-1));
        assert_eq!(node.return_type().unwrap(), Type::Int);
        assert_eq!(eval(&node), Value::int(3));
    }

    #[test]
    fn single_index_is_strict() {
        for i in [3, -4] {
            let err = Node::index(int_array(&[1, 2, 3]), Node::int(i))
                .evaluate(&EmptyEnvironment)
                .unwrap_err();
            assert_eq!(err.kind, EvalErrorKind::IndexOutOfBounds { index: i, len: 3 });
        }
    }

    #[test]
    fn strings_index_by_character() {
        let node = Node::index(Node::string("añb"), Node::int(1));
        assert_eq!(node.return_type().unwrap(), Type::Str);
        assert_eq!(eval(&node), Value::string("ñ"));
    }

    #[test]
    fn slices_clamp() {
        let xs = || int_array(&[1, 2, 3, 4]);
        let slice = |start: Option<i64>, end: Option<i64>| {
            eval(&Node::slice(xs(), start.map(Node::int), end.map(Node::int)))
        };
        assert_eq!(slice(Some(1), Some(3)), eval(&int_array(&[2, 3])));
        assert_eq!(slice(Some(-10), Some(2)), eval(&int_array(&[1, 2])));
        assert_eq!(slice(Some(3), Some(1)), eval(&int_array(&[])));
        assert_eq!(slice(Some(-1), None), eval(&int_array(&[4])));
        assert_eq!(slice(None, Some(100)), eval(&xs()));
    }

    #[test]
    fn string_slice() {
        let node = Node::slice(Node::string("goblin"), Some(Node::int(-3)), None);
        assert_eq!(eval(&node), Value::string("lin"));
    }
}

mod calls {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nested_builtins() {
        let node = call(
            "round",
            vec![call("max", vec![Node::float(1.4), call("sqrt", vec![Node::int(4)])])],
        );
        assert_eq!(node.return_type().unwrap(), Type::Int);
        assert_eq!(eval(&node), Value::int(2));
    }

    #[test]
    fn format_renders_cards() {
        let node = call(
            "format",
            vec![Node::string("[0] deals [1:F1] damage"), Node::string("Imp"), Node::float(2.26)],
        );
        assert_eq!(node.return_type().unwrap(), Type::Str);
        assert_eq!(eval(&node), Value::string("Imp deals 2.3 damage"));
    }

    #[test]
    fn random_is_deterministic_per_seed() {
        let node = call("random", vec![Node::int(42)]);
        assert_eq!(eval(&node), eval(&node.clone()));
    }
}
