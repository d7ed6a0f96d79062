//! Promotion and unification rules shared by operators and functions.
//!
//! - Both operands integral: `int`.
//! - Both real, at least one `float`: `float`.
//! - Anything involving arrays, tuples, enums, colors: a type error, except the
//!   few combinations each operator explicitly allows (`string + string`,
//!   enum compared with string).

use crate::{Type, TypeError};

/// Result type of an arithmetic operator applied to two real operands.
pub fn numeric_result(op: &'static str, left: &Type, right: &Type) -> Result<Type, TypeError> {
    match (left, right) {
        (Type::Int, Type::Int) => Ok(Type::Int),
        (l, r) if l.is_real() && r.is_real() => Ok(Type::Float),
        _ => Err(TypeError::BinaryOperands {
            op,
            left: left.clone(),
            right: right.clone(),
        }),
    }
}

/// Common numeric type of a list of operands (`min`, `max`, `sum`, `clamp`).
///
/// `int` when every operand is integral, `float` when every operand is real.
pub fn find_common_numeric_type(types: &[Type]) -> Result<Type, TypeError> {
    if types.is_empty() || !types.iter().all(Type::is_real) {
        return Err(TypeError::NoCommonNumericType {
            types: types.to_vec(),
        });
    }
    if types.iter().all(Type::is_integral) {
        Ok(Type::Int)
    } else {
        Ok(Type::Float)
    }
}

/// Element type of an array built from values of the given types.
///
/// Identical types unify to themselves; mixed `int`/`float` unify to `float`.
pub fn unify_elements(context: &'static str, types: &[Type]) -> Result<Type, TypeError> {
    let Some(first) = types.first() else {
        return Err(TypeError::CannotInferElement { context });
    };
    if types.iter().all(|t| t == first) {
        return Ok(first.clone());
    }
    find_common_numeric_type(types).map_err(|_| TypeError::NoCommonType {
        types: types.to_vec(),
    })
}

/// Whether `==` / `!=` accept this pair of operand types.
pub fn comparable_for_equality(left: &Type, right: &Type) -> bool {
    left == right
        || (left.is_real() && right.is_real())
        || matches!(
            (left, right),
            (Type::Enum(_), Type::Str) | (Type::Str, Type::Enum(_))
        )
}

/// Whether `<`, `<=`, `>`, `>=` accept this pair of operand types.
pub fn orderable(left: &Type, right: &Type) -> bool {
    (left.is_real() && right.is_real()) || (left == right && left.is_ordered())
}

/// Shared type of the two branches of `c ? t : f` or `a ?? b`.
pub fn conditional_result(first: &Type, second: &Type) -> Result<Type, TypeError> {
    if first == second {
        Ok(first.clone())
    } else {
        Err(TypeError::BranchMismatch {
            first: first.clone(),
            second: second.clone(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
