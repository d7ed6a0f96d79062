//! Value-level operator semantics.
//!
//! # Arithmetic
//!
//! - `int op int` stays `int`, checked: overflow, division by zero and
//!   modulo by zero are calculation errors
//! - any `float` operand promotes both sides to `float`; dividing by zero is
//!   still an error rather than an infinity, and so is any result that
//!   overflows to an infinity or NaN
//! - `string + string` concatenates
//!
//! # Comparison
//!
//! `==`/`!=` use [`values_equal`]. Ordering between two numbers follows IEEE
//! rules (NaN compares false); other ordered pairs use [`compare_values`].
//!
//! `null` is rejected by every operator except `==`, `!=` and `??`.

use cardex_ir::{BinaryOp, UnaryOp};
use cardex_values::{
    compare_values, division_by_zero, integer_overflow, invalid_operand, invalid_operands,
    modulo_by_zero, non_finite_result, not_comparable, values_equal, EvalResult, Value,
};

use crate::index::index_value;

pub fn evaluate_unary(op: UnaryOp, operand: Value) -> EvalResult {
    match (op, operand) {
        (UnaryOp::Neg, Value::Int(n)) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("negation")),
        (UnaryOp::Neg, Value::Float(x)) => Ok(Value::Float(-x)),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (op, operand) => Err(invalid_operand(op.as_symbol(), &operand)),
    }
}

/// Apply a binary operator to two evaluated operands.
///
/// `&&`, `||` and `??` are evaluated lazily by the evaluator; here they see
/// both operands already computed.
pub fn evaluate_binary(op: BinaryOp, left: Value, right: Value) -> EvalResult {
    match op {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
            arithmetic(op, left, right)
        }
        BinaryOp::Eq => Ok(Value::Bool(values_equal(&left, &right))),
        BinaryOp::NotEq => Ok(Value::Bool(!values_equal(&left, &right))),
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
            compare(op, &left, &right)
        }
        BinaryOp::And | BinaryOp::Or => match (&left, &right) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(if op == BinaryOp::And {
                *a && *b
            } else {
                *a || *b
            })),
            _ => Err(invalid_operands(op.as_symbol(), &left, &right)),
        },
        BinaryOp::Coalesce => Ok(if left.is_null() { right } else { left }),
        BinaryOp::Index => index_value(left, right),
    }
}

fn arithmetic(op: BinaryOp, left: Value, right: Value) -> EvalResult {
    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => int_arithmetic(op, *a, *b),
        (Value::Str(a), Value::Str(b)) if op == BinaryOp::Add => Ok(Value::Str(format!("{a}{b}"))),
        _ => match (left.as_real(), right.as_real()) {
            (Some(a), Some(b)) => float_arithmetic(op, a, b),
            _ => Err(invalid_operands(op.as_symbol(), &left, &right)),
        },
    }
}

fn int_arithmetic(op: BinaryOp, a: i64, b: i64) -> EvalResult {
    let result = match op {
        BinaryOp::Add => a.checked_add(b).ok_or_else(|| integer_overflow("addition")),
        BinaryOp::Sub => a.checked_sub(b).ok_or_else(|| integer_overflow("subtraction")),
        BinaryOp::Mul => a
            .checked_mul(b)
            .ok_or_else(|| integer_overflow("multiplication")),
        BinaryOp::Div if b == 0 => Err(division_by_zero()),
        BinaryOp::Div => a.checked_div(b).ok_or_else(|| integer_overflow("division")),
        BinaryOp::Mod if b == 0 => Err(modulo_by_zero()),
        BinaryOp::Mod => a.checked_rem(b).ok_or_else(|| integer_overflow("modulo")),
        _ => Err(invalid_operands(op.as_symbol(), &Value::Int(a), &Value::Int(b))),
    };
    result.map(Value::Int)
}

fn float_arithmetic(op: BinaryOp, a: f64, b: f64) -> EvalResult {
    let (operation, result) = match op {
        BinaryOp::Add => ("addition", a + b),
        BinaryOp::Sub => ("subtraction", a - b),
        BinaryOp::Mul => ("multiplication", a * b),
        BinaryOp::Div if b == 0.0 => return Err(division_by_zero()),
        BinaryOp::Div => ("division", a / b),
        BinaryOp::Mod if b == 0.0 => return Err(modulo_by_zero()),
        BinaryOp::Mod => ("modulo", a % b),
        _ => {
            return Err(invalid_operands(
                op.as_symbol(),
                &Value::Float(a),
                &Value::Float(b),
            ))
        }
    };
    finite(operation, result)
}

/// Wrap a computed float, rejecting infinities and NaN.
pub(crate) fn finite(operation: &'static str, x: f64) -> EvalResult {
    if x.is_finite() {
        Ok(Value::Float(x))
    } else {
        Err(non_finite_result(operation))
    }
}

fn compare(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    if left.is_null() || right.is_null() {
        return Err(invalid_operands(op.as_symbol(), left, right));
    }
    let result = match (left, right) {
        (Value::Int(a), Value::Int(b)) => ordered(op, a, b),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            match (left.as_real(), right.as_real()) {
                (Some(a), Some(b)) => ordered(op, &a, &b),
                _ => false,
            }
        }
        _ => {
            let ordering = compare_values(left, right)
                .ok_or_else(|| not_comparable(op.as_symbol(), left, right))?;
            match op {
                BinaryOp::Lt => ordering.is_lt(),
                BinaryOp::LtEq => ordering.is_le(),
                BinaryOp::Gt => ordering.is_gt(),
                _ => ordering.is_ge(),
            }
        }
    };
    Ok(Value::Bool(result))
}

fn ordered<T: PartialOrd>(op: BinaryOp, a: &T, b: &T) -> bool {
    match op {
        BinaryOp::Lt => a < b,
        BinaryOp::LtEq => a <= b,
        BinaryOp::Gt => a > b,
        _ => a >= b,
    }
}
