use super::*;
use pretty_assertions::assert_eq;

fn color_enum() -> EnumType {
    EnumType::new("Color", ["RED", "GREEN", "BLUE"].map(Name::new))
}

fn member(name: &str) -> Value {
    Value::Enum(EnumValue::named(color_enum(), name).unwrap())
}

mod equality {
    use super::*;

    #[test]
    fn null_equals_only_null() {
        assert!(values_equal(&Value::Null, &Value::Null));
        assert!(!values_equal(&Value::Null, &Value::int(0)));
        assert!(!values_equal(&Value::string(""), &Value::Null));
    }

    #[test]
    fn int_equals_float_of_same_value() {
        assert!(values_equal(&Value::int(1), &Value::float(1.0)));
        assert!(values_equal(&Value::float(2.0), &Value::int(2)));
        assert!(!values_equal(&Value::int(1), &Value::float(1.5)));
    }

    #[test]
    fn enum_equals_its_name_in_any_case() {
        assert!(values_equal(&member("RED"), &Value::string("red")));
        assert!(values_equal(&Value::string("Red"), &member("RED")));
        assert!(!values_equal(&member("RED"), &Value::string("blue")));
    }

    #[test]
    fn sequences_compare_element_wise() {
        let a = Value::array(vec![Value::int(1), Value::float(2.0)]);
        let b = Value::array(vec![Value::float(1.0), Value::int(2)]);
        assert!(values_equal(&a, &b));
        assert!(!values_equal(&a, &Value::array(vec![Value::int(1)])));
        assert!(!values_equal(&a, &Value::tuple(vec![Value::int(1), Value::int(2)])));
    }

    #[test]
    fn mismatched_kinds_are_unequal() {
        assert!(!values_equal(&Value::Bool(true), &Value::int(1)));
        assert!(!values_equal(&Value::string("1"), &Value::int(1)));
    }
}

mod ordering {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn numbers_order_across_kinds() {
        assert_eq!(
            compare_values(&Value::int(1), &Value::float(1.5)),
            Some(Ordering::Less)
        );
        assert_eq!(
            compare_values(&Value::int(3), &Value::int(2)),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn enums_order_by_declaration() {
        assert_eq!(
            compare_values(&member("BLUE"), &member("RED")),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn unordered_pairs() {
        assert_eq!(compare_values(&Value::float(f64::NAN), &Value::int(1)), None);
        assert_eq!(
            compare_values(&Value::Color(Color::BLACK), &Value::Color(Color::WHITE)),
            None
        );
        assert_eq!(compare_values(&Value::string("a"), &Value::int(1)), None);
    }
}

mod coercion {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ints_widen_into_float_arrays() {
        let array = Value::typed_array(&Type::Float, vec![Value::int(1), Value::float(2.5)]);
        assert_eq!(
            array,
            Some(Value::array(vec![Value::float(1.0), Value::float(2.5)]))
        );
    }

    #[test]
    fn mismatched_items_are_rejected() {
        assert_eq!(
            Value::typed_array(&Type::Int, vec![Value::int(1), Value::string("x")]),
            None
        );
    }

    #[test]
    fn tuple_arity_must_match() {
        let t = Value::tuple(vec![Value::int(1), Value::int(2)]);
        assert!(t.clone().coerce_to(&Type::tuple(Type::Int, 2)).is_some());
        assert!(t.coerce_to(&Type::tuple(Type::Int, 3)).is_none());
    }

    #[test]
    fn null_conforms_to_anything() {
        assert_eq!(Value::Null.coerce_to(&Type::Color), Some(Value::Null));
    }
}

#[test]
fn enum_value_bounds() {
    assert!(EnumValue::new(color_enum(), 2).is_some());
    assert!(EnumValue::new(color_enum(), 3).is_none());
    assert!(EnumValue::named(color_enum(), "PURPLE").is_none());
}

#[test]
fn display() {
    assert_eq!(Value::int(-4).to_string(), "-4");
    assert_eq!(Value::float(0.5).to_string(), "0.5");
    assert_eq!(Value::Bool(true).to_string(), "true");
    assert_eq!(Value::Null.to_string(), "null");
    assert_eq!(member("GREEN").to_string(), "GREEN");
    assert_eq!(
        Value::array(vec![Value::int(1), Value::string("a")]).to_string(),
        "[1, a]"
    );
    assert_eq!(
        Value::tuple(vec![Value::int(1), Value::int(2)]).to_string(),
        "(1, 2)"
    );
}

#[test]
fn kinds() {
    assert_eq!(Value::Null.kind(), ValueKind::Null);
    assert_eq!(Value::array(vec![]).type_name(), "array");
    assert_eq!(member("RED").type_name(), "enum");
}
