//! `int`, `float`, `bool`, `str`, `color`.

use cardex_values::{
    arity_mismatch, cannot_parse, division_by_zero, invalid_argument, invalid_value, Color,
    EvalError, EvalResult, Value,
};

use super::{float_to_int, Function};

pub(super) fn to_int(value: Value) -> EvalResult {
    match value {
        Value::Int(n) => Ok(Value::Int(n)),
        Value::Float(f) => float_to_int("int", f.trunc()).map(Value::Int),
        Value::Bool(b) => Ok(Value::Int(i64::from(b))),
        Value::Str(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| cannot_parse(&s, "int")),
        other => Err(invalid_argument("int", 1, &other)),
    }
}

pub(super) fn to_float(value: Value) -> EvalResult {
    match value {
        Value::Float(f) => Ok(Value::Float(f)),
        Value::Int(_) => Ok(Value::Float(value.as_real().unwrap_or_default())),
        Value::Bool(b) => Ok(Value::Float(if b { 1.0 } else { 0.0 })),
        Value::Str(s) => parse_float(&s).map(Value::Float),
        other => Err(invalid_argument("float", 1, &other)),
    }
}

/// Decimal text, or a fraction `n/d`. Text that names or overflows to an
/// infinity or NaN (`inf`, `1e400`) does not parse.
fn parse_float(text: &str) -> Result<f64, EvalError> {
    let trimmed = text.trim();
    let parse = |part: &str| match part.trim().parse::<f64>() {
        Ok(x) if x.is_finite() => Ok(x),
        _ => Err(cannot_parse(text, "float")),
    };
    match trimmed.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator = parse(numerator)?;
            let denominator = parse(denominator)?;
            if denominator == 0.0 {
                return Err(division_by_zero());
            }
            let quotient = numerator / denominator;
            if quotient.is_finite() {
                Ok(quotient)
            } else {
                Err(cannot_parse(text, "float"))
            }
        }
        None => parse(trimmed),
    }
}

pub(super) fn to_bool(value: Value) -> EvalResult {
    match value {
        Value::Bool(b) => Ok(Value::Bool(b)),
        Value::Int(n) => Ok(Value::Bool(n != 0)),
        Value::Float(f) => Ok(Value::Bool(f != 0.0)),
        Value::Str(s) => {
            let text = s.trim();
            if text.eq_ignore_ascii_case("true") {
                Ok(Value::Bool(true))
            } else if text.eq_ignore_ascii_case("false") {
                Ok(Value::Bool(false))
            } else {
                Err(cannot_parse(&s, "bool"))
            }
        }
        other => Err(invalid_argument("bool", 1, &other)),
    }
}

/// Enum members are upper-cased; everything else uses its display form.
pub(super) fn to_str(value: Value) -> EvalResult {
    match value {
        Value::Null => Err(invalid_argument("str", 1, &value)),
        Value::Str(s) => Ok(Value::Str(s)),
        Value::Enum(e) => Ok(Value::Str(e.member().to_uppercase())),
        other => Ok(Value::Str(other.to_string())),
    }
}

/// `color(hex)`, `color(r, g, b)` or `color(r, g, b, a)`.
///
/// Integer channels are taken as `0..=255`, float channels as `0.0..=1.0`.
pub(super) fn to_color(args: Vec<Value>) -> EvalResult {
    match args.as_slice() {
        [Value::Str(text)] => Color::parse_hex(text)
            .map(Value::Color)
            .ok_or_else(|| cannot_parse(text, "color")),
        [Value::Color(c)] => Ok(Value::Color(*c)),
        [other] => Err(invalid_argument("color", 1, other)),
        [r, g, b] => Ok(Value::Color(Color::rgb(
            channel(1, r)?,
            channel(2, g)?,
            channel(3, b)?,
        ))),
        [r, g, b, a] => Ok(Value::Color(Color::rgba(
            channel(1, r)?,
            channel(2, g)?,
            channel(3, b)?,
            channel(4, a)?,
        ))),
        _ => Err(arity_mismatch(
            "color",
            Function::Color.arity().describe(),
            args.len(),
        )),
    }
}

fn channel(position: usize, value: &Value) -> Result<u8, EvalError> {
    let out_of_range = || {
        invalid_value(
            "color",
            format!("channel {position} out of range: {value}"),
        )
    };
    match value {
        Value::Int(n) => u8::try_from(*n).map_err(|_| out_of_range()),
        Value::Float(f) if (0.0..=1.0).contains(f) => {
            let scaled = float_to_int("color", (f * 255.0).round())?;
            u8::try_from(scaled).map_err(|_| out_of_range())
        }
        Value::Float(_) => Err(out_of_range()),
        other => Err(invalid_argument("color", position, other)),
    }
}
