use super::*;
use cardex_types::Type;
use pretty_assertions::assert_eq;

#[test]
fn factories_set_kind_and_message() {
    let err = index_out_of_bounds(5, 3);
    assert_eq!(err.kind, EvalErrorKind::IndexOutOfBounds { index: 5, len: 3 });
    assert_eq!(err.message, "index 5 out of bounds for length 3");
    assert_eq!(err.to_string(), err.message);
}

#[test]
fn every_category_is_reachable() {
    assert_eq!(arity_mismatch("color", "1, 3 or 4 arguments", 2).category(), ErrorCategory::Syntax);
    assert_eq!(
        EvalError::from(TypeError::NotIndexable { found: Type::Bool }).category(),
        ErrorCategory::Type
    );
    assert_eq!(division_by_zero().category(), ErrorCategory::Calculation);
    assert_eq!(undefined_variable("x").category(), ErrorCategory::UndefinedVariable);
    assert_eq!(unlinked_comprehension().category(), ErrorCategory::Processing);
    assert_eq!(processing_error("empty slot").category(), ErrorCategory::Processing);
}

#[test]
fn only_runtime_failures_are_recoverable() {
    assert!(cannot_parse("abc", "int").is_recoverable());
    assert!(non_finite_result("multiplication").is_recoverable());
    assert!(undefined_variable("hp").is_recoverable());
    assert!(!EvalError::from(TypeError::NotIndexable { found: Type::Int }).is_recoverable());
    assert!(!unlinked_comprehension().is_recoverable());
    assert!(!arity_mismatch("f", "1 argument", 0).is_recoverable());
}

#[test]
fn undefined_variable_is_distinguishable() {
    assert!(undefined_variable("hp").is_undefined_variable());
    assert!(!undefined_function("hp").is_undefined_variable());
}

#[test]
fn type_error_is_the_source() {
    use std::error::Error;
    let err = EvalError::from(TypeError::NonIntegerIndex { found: Type::Float });
    assert!(err.source().is_some());
    assert_eq!(err.to_string(), "index must be `int`, found `float`");
}

#[test]
fn arity_message() {
    assert_eq!(
        arity_mismatch("color", "1, 3 or 4 arguments", 2).to_string(),
        "color expects 1, 3 or 4 arguments, got 2 arguments"
    );
}

#[test]
fn non_finite_message() {
    let err = non_finite_result("multiplication");
    assert_eq!(err.category(), ErrorCategory::Calculation);
    assert_eq!(err.to_string(), "multiplication does not produce a finite number");
}
