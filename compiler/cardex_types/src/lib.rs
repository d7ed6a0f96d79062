//! Static type model for cardex expressions.
//!
//! - [`Type`]: what an expression is known to produce without running it
//! - [`EnumType`]: a named set of symbolic members
//! - [`TypeError`]: why an expression is statically ill-typed
//! - promotion: the shared rules operators and functions use to combine
//!   operand types (`int op int -> int`, `int op float -> float`, ...)

mod error;
mod promote;
mod ty;

pub use error::TypeError;
pub use promote::{
    comparable_for_equality, conditional_result, find_common_numeric_type, numeric_result,
    orderable, unify_elements,
};
pub use ty::{EnumType, Type};
