//! String functions other than `format`.

use cardex_values::{invalid_argument, EvalError, EvalResult, Value};

use super::Function;

fn text<'v>(
    function: &'static str,
    position: usize,
    value: &'v Value,
) -> Result<&'v str, EvalError> {
    match value {
        Value::Str(s) => Ok(s),
        other => Err(invalid_argument(function, position, other)),
    }
}

/// Display form of every element, separated by `separator`.
pub(super) fn join(separator: &Value, items: &Value) -> EvalResult {
    let separator = text("join", 1, separator)?;
    let items = items
        .as_sequence()
        .ok_or_else(|| invalid_argument("join", 2, items))?;
    let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
    Ok(Value::Str(parts.join(separator)))
}

/// An empty delimiter splits into single characters.
pub(super) fn split(value: &Value, delimiter: &Value) -> EvalResult {
    let value = text("split", 1, value)?;
    let delimiter = text("split", 2, delimiter)?;
    let parts = if delimiter.is_empty() {
        value.chars().map(|c| Value::Str(c.to_string())).collect()
    } else {
        value
            .split(delimiter)
            .map(|part| Value::Str(part.to_string()))
            .collect()
    };
    Ok(Value::Array(parts))
}

/// `upper`, `lower`, `trim`.
pub(super) fn transform(function: Function, value: &Value) -> EvalResult {
    let s = text(function.name(), 1, value)?;
    let result = match function {
        Function::Upper => s.to_uppercase(),
        Function::Lower => s.to_lowercase(),
        _ => s.trim().to_string(),
    };
    Ok(Value::Str(result))
}

/// Replace every occurrence; an empty pattern leaves the text unchanged.
pub(super) fn replace(value: &Value, from: &Value, to: &Value) -> EvalResult {
    let value = text("replace", 1, value)?;
    let from = text("replace", 2, from)?;
    let to = text("replace", 3, to)?;
    if from.is_empty() {
        return Ok(Value::Str(value.to_string()));
    }
    Ok(Value::Str(value.replace(from, to)))
}
