//! Runtime values and the evaluation error taxonomy.
//!
//! - [`Value`]: tagged runtime value, with [`Value::Null`] distinguishable
//!   from every other value
//! - [`values_equal`] / [`compare_values`]: the equality and ordering every
//!   operator and function agrees on
//! - [`EvalError`]: one error type for all five failure categories, with
//!   factory functions for each specific condition

mod color;
mod errors;
mod value;

pub use color::Color;
pub use errors::{
    arity_mismatch, cannot_parse, division_by_zero, empty_reduction, index_out_of_bounds,
    integer_overflow, invalid_argument, invalid_format, invalid_operand, invalid_operands,
    invalid_value, length_mismatch, modulo_by_zero, non_finite_result, not_comparable, processing_error,
    stack_overflow, undefined_function, undefined_variable, unknown_function,
    unlinked_comprehension, ErrorCategory, EvalError, EvalErrorKind, EvalResult,
};
pub use value::{compare_values, values_equal, EnumValue, Value, ValueKind};
