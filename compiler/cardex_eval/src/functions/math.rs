//! Numeric functions.
//!
//! Integer inputs stay integers where the result type is `int` (`min`, `max`,
//! `sum`, `abs`, `clamp` over all-int operands), with overflow reported as a
//! calculation error. Everything else computes in `f64`.

use std::cmp::Ordering;

use cardex_values::{
    empty_reduction, integer_overflow, invalid_argument, invalid_value, processing_error,
    EvalError, EvalResult, Value,
};

use super::{float_to_int, Function};
use crate::operators::finite;

/// A single array/tuple argument spreads into the operand list.
fn operands(function: &'static str, args: Vec<Value>) -> Result<Vec<Value>, EvalError> {
    let operands = match <[Value; 1]>::try_from(args) {
        Ok([Value::Array(items) | Value::Tuple(items)]) => items,
        Ok([single]) => vec![single],
        Err(args) => args,
    };
    if operands.is_empty() {
        return Err(empty_reduction(function));
    }
    for (i, operand) in operands.iter().enumerate() {
        if operand.as_real().is_none() {
            return Err(invalid_argument(function, i + 1, operand));
        }
    }
    Ok(operands)
}

fn all_ints(operands: &[Value]) -> Option<Vec<i64>> {
    operands
        .iter()
        .map(|v| match v {
            Value::Int(n) => Some(*n),
            _ => None,
        })
        .collect()
}

fn reals(operands: &[Value]) -> Vec<f64> {
    operands.iter().filter_map(Value::as_real).collect()
}

fn extreme(function: &'static str, args: Vec<Value>, keep: Ordering) -> EvalResult {
    let operands = operands(function, args)?;
    if let Some(ints) = all_ints(&operands) {
        let best = ints
            .into_iter()
            .reduce(|best, n| if n.cmp(&best) == keep { n } else { best });
        return best.map(Value::Int).ok_or_else(|| empty_reduction(function));
    }
    reals(&operands)
        .into_iter()
        .reduce(|best, x| match x.partial_cmp(&best) {
            Some(ordering) if ordering == keep => x,
            // NaN propagates.
            None if x.is_nan() => x,
            _ => best,
        })
        .map(Value::Float)
        .ok_or_else(|| empty_reduction(function))
}

pub(super) fn min(args: Vec<Value>) -> EvalResult {
    extreme("min", args, Ordering::Less)
}

pub(super) fn max(args: Vec<Value>) -> EvalResult {
    extreme("max", args, Ordering::Greater)
}

pub(super) fn sum(args: Vec<Value>) -> EvalResult {
    let operands = operands("sum", args)?;
    if let Some(ints) = all_ints(&operands) {
        return ints
            .into_iter()
            .try_fold(0i64, i64::checked_add)
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("sum"));
    }
    finite("sum", reals(&operands).into_iter().sum())
}

pub(super) fn abs(value: &Value) -> EvalResult {
    match value {
        Value::Int(n) => n
            .checked_abs()
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("abs")),
        Value::Float(f) => Ok(Value::Float(f.abs())),
        other => Err(invalid_argument("abs", 1, other)),
    }
}

/// `round`, `floor`, `ceil`: float in, int out. Halves round away from zero.
pub(super) fn to_integral(function: Function, value: &Value) -> EvalResult {
    let name = function.name();
    match value {
        Value::Int(n) => Ok(Value::Int(*n)),
        Value::Float(f) => {
            let rounded = match function {
                Function::Floor => f.floor(),
                Function::Ceil => f.ceil(),
                _ => f.round(),
            };
            float_to_int(name, rounded).map(Value::Int)
        }
        other => Err(invalid_argument(name, 1, other)),
    }
}

fn real(function: &'static str, position: usize, value: &Value) -> Result<f64, EvalError> {
    value
        .as_real()
        .ok_or_else(|| invalid_argument(function, position, value))
}

/// One-argument float functions. Domain errors and overflow (`exp(1000)`)
/// are calculation errors rather than NaN or infinite results.
pub(super) fn unary(function: Function, value: &Value) -> EvalResult {
    let name = function.name();
    let x = real(name, 1, value)?;
    let result = match function {
        Function::Sqrt if x < 0.0 => {
            return Err(invalid_value(name, format!("square root of negative number {x}")))
        }
        Function::Log if x <= 0.0 => {
            return Err(invalid_value(name, format!("logarithm of non-positive number {x}")))
        }
        Function::Asin | Function::Acos if !(-1.0..=1.0).contains(&x) => {
            return Err(invalid_value(name, format!("{x} is outside [-1, 1]")))
        }
        Function::Sqrt => x.sqrt(),
        Function::Exp => x.exp(),
        Function::Log => x.ln(),
        Function::Sin => x.sin(),
        Function::Cos => x.cos(),
        Function::Tan => x.tan(),
        Function::Asin => x.asin(),
        Function::Acos => x.acos(),
        Function::Atan => x.atan(),
        Function::Sinh => x.sinh(),
        Function::Cosh => x.cosh(),
        Function::Tanh => x.tanh(),
        other => {
            return Err(processing_error(format!(
                "`{other}` is not a one-argument float function"
            )))
        }
    };
    finite(name, result)
}

pub(super) fn pow(base: &Value, exponent: &Value) -> EvalResult {
    let base = real("pow", 1, base)?;
    let exponent = real("pow", 2, exponent)?;
    finite("pow", base.powf(exponent))
}

pub(super) fn atan2(y: &Value, x: &Value) -> EvalResult {
    let y = real("atan2", 1, y)?;
    let x = real("atan2", 2, x)?;
    Ok(Value::Float(y.atan2(x)))
}

/// `from + (to - from) * t`; `t` is not clamped.
pub(super) fn lerp(from: &Value, to: &Value, t: &Value) -> EvalResult {
    let from = real("lerp", 1, from)?;
    let to = real("lerp", 2, to)?;
    let t = real("lerp", 3, t)?;
    finite("lerp", from + (to - from) * t)
}

pub(super) fn clamp(value: &Value, lo: &Value, hi: &Value) -> EvalResult {
    if let (Value::Int(x), Value::Int(lo), Value::Int(hi)) = (value, lo, hi) {
        if lo > hi {
            return Err(invalid_value("clamp", format!("lower bound {lo} exceeds upper bound {hi}")));
        }
        return Ok(Value::Int(*x.max(lo).min(hi)));
    }
    let x = real("clamp", 1, value)?;
    let lo = real("clamp", 2, lo)?;
    let hi = real("clamp", 3, hi)?;
    if lo.is_nan() || hi.is_nan() || lo > hi {
        return Err(invalid_value("clamp", format!("invalid bounds [{lo}, {hi}]")));
    }
    Ok(Value::Float(x.max(lo).min(hi)))
}
