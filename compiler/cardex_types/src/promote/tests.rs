use super::*;
use crate::EnumType;
use cardex_ir::Name;
use pretty_assertions::assert_eq;

fn rarity() -> Type {
    Type::Enum(EnumType::new("Rarity", ["COMMON", "RARE"].map(Name::new)))
}

#[test]
fn integral_operands_stay_int() {
    assert_eq!(numeric_result("+", &Type::Int, &Type::Int), Ok(Type::Int));
}

#[test]
fn any_float_operand_promotes() {
    assert_eq!(numeric_result("*", &Type::Int, &Type::Float), Ok(Type::Float));
    assert_eq!(numeric_result("*", &Type::Float, &Type::Int), Ok(Type::Float));
    assert_eq!(numeric_result("*", &Type::Float, &Type::Float), Ok(Type::Float));
}

#[test]
fn non_numeric_operands_are_rejected() {
    let err = numeric_result("-", &Type::Str, &Type::Int).unwrap_err();
    assert_eq!(
        err,
        TypeError::BinaryOperands {
            op: "-",
            left: Type::Str,
            right: Type::Int,
        }
    );
    assert!(numeric_result("+", &Type::array(Type::Int), &Type::Int).is_err());
    assert!(numeric_result("+", &rarity(), &Type::Int).is_err());
}

#[test]
fn common_numeric_type() {
    assert_eq!(find_common_numeric_type(&[Type::Int, Type::Int]), Ok(Type::Int));
    assert_eq!(
        find_common_numeric_type(&[Type::Int, Type::Float, Type::Int]),
        Ok(Type::Float)
    );
    assert!(find_common_numeric_type(&[Type::Int, Type::Bool]).is_err());
    assert!(find_common_numeric_type(&[]).is_err());
}

#[test]
fn unify_identical_and_numeric() {
    assert_eq!(unify_elements("array", &[Type::Str, Type::Str]), Ok(Type::Str));
    assert_eq!(
        unify_elements("array", &[Type::Int, Type::Float]),
        Ok(Type::Float)
    );
    assert_eq!(
        unify_elements("array", &[Type::Str, Type::Int]),
        Err(TypeError::NoCommonType {
            types: vec![Type::Str, Type::Int],
        })
    );
    assert_eq!(
        unify_elements("array", &[]),
        Err(TypeError::CannotInferElement { context: "array" })
    );
}

#[test]
fn equality_rules() {
    assert!(comparable_for_equality(&Type::Int, &Type::Float));
    assert!(comparable_for_equality(&rarity(), &Type::Str));
    assert!(comparable_for_equality(&Type::Str, &rarity()));
    assert!(comparable_for_equality(&Type::Color, &Type::Color));
    assert!(!comparable_for_equality(&Type::Bool, &Type::Int));
    assert!(!comparable_for_equality(
        &Type::array(Type::Int),
        &Type::tuple(Type::Int, 2)
    ));
}

#[test]
fn ordering_rules() {
    assert!(orderable(&Type::Int, &Type::Float));
    assert!(orderable(&Type::Str, &Type::Str));
    assert!(orderable(&rarity(), &rarity()));
    assert!(!orderable(&Type::Color, &Type::Color));
    assert!(!orderable(&rarity(), &Type::Str));
}

#[test]
fn branches_must_match_exactly() {
    assert_eq!(conditional_result(&Type::Int, &Type::Int), Ok(Type::Int));
    assert!(conditional_result(&Type::Int, &Type::Float).is_err());
}
