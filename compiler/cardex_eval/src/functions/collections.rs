//! Array and tuple functions.

use std::cmp::Ordering;

use cardex_values::{
    compare_values, integer_overflow, invalid_argument, length_mismatch, not_comparable,
    values_equal, EvalError, EvalResult, Value,
};

/// `array(...)` / `tuple(...)`. Mixed `int` and `float` items widen to
/// `float`, matching the unified element type.
pub(super) fn make_sequence(items: Vec<Value>, tuple: bool) -> Value {
    let mixed_numeric = items.iter().any(|v| matches!(v, Value::Float(_)))
        && items.iter().any(|v| matches!(v, Value::Int(_)));
    let items = if mixed_numeric {
        items
            .into_iter()
            .map(|item| {
                let widened = matches!(item, Value::Int(_))
                    .then(|| item.as_real())
                    .flatten();
                widened.map_or(item, Value::Float)
            })
            .collect()
    } else {
        items
    };
    if tuple {
        Value::Tuple(items)
    } else {
        Value::Array(items)
    }
}

pub(super) fn len(value: &Value) -> EvalResult {
    let count = match value {
        Value::Str(s) => s.chars().count(),
        Value::Array(items) | Value::Tuple(items) => items.len(),
        other => return Err(invalid_argument("len", 1, other)),
    };
    i64::try_from(count)
        .map(Value::Int)
        .map_err(|_| integer_overflow("len"))
}

pub(super) fn contains(haystack: &Value, needle: &Value) -> EvalResult {
    match (haystack, needle) {
        (Value::Str(text), Value::Str(part)) => Ok(Value::Bool(text.contains(part.as_str()))),
        (Value::Str(_), other) => Err(invalid_argument("contains", 2, other)),
        (Value::Array(items) | Value::Tuple(items), _) => Ok(Value::Bool(
            items.iter().any(|item| values_equal(item, needle)),
        )),
        (other, _) => Err(invalid_argument("contains", 1, other)),
    }
}

pub(super) fn all(values: &Value) -> EvalResult {
    for item in sequence("all", 1, values)? {
        match item {
            Value::Bool(true) => {}
            Value::Bool(false) => return Ok(Value::Bool(false)),
            other => return Err(invalid_argument("all", 1, other)),
        }
    }
    Ok(Value::Bool(true))
}

pub(super) fn any(values: &Value) -> EvalResult {
    for item in sequence("any", 1, values)? {
        match item {
            Value::Bool(true) => return Ok(Value::Bool(true)),
            Value::Bool(false) => {}
            other => return Err(invalid_argument("any", 1, other)),
        }
    }
    Ok(Value::Bool(false))
}

/// Stable sort of `values`, by `keys` when given.
///
/// Every key must be ordered against every other key; a NaN or a pair of
/// unrelated kinds fails before anything moves. Arrays stay arrays and
/// tuples stay tuples.
pub(super) fn sort(values: Value, keys: Option<Value>) -> EvalResult {
    let is_tuple = matches!(values, Value::Tuple(_));
    let items = match values {
        Value::Array(items) | Value::Tuple(items) => items,
        other => return Err(invalid_argument("sort", 1, &other)),
    };
    let keys = match keys {
        Some(Value::Array(keys) | Value::Tuple(keys)) => Some(keys),
        Some(other) => return Err(invalid_argument("sort", 2, &other)),
        None => None,
    };
    if let Some(keys) = &keys {
        if keys.len() != items.len() {
            return Err(length_mismatch("sort", items.len(), keys.len()));
        }
    }

    let sort_keys = keys.as_deref().unwrap_or(&items[..]);
    if let Some(first) = sort_keys.first() {
        if let Some(bad) = sort_keys
            .iter()
            .find(|key| compare_values(first, key).is_none())
        {
            return Err(not_comparable("sort", first, bad));
        }
    }

    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        compare_values(&sort_keys[a], &sort_keys[b]).unwrap_or(Ordering::Equal)
    });

    let mut slots: Vec<Option<Value>> = items.into_iter().map(Some).collect();
    let sorted: Vec<Value> = order
        .into_iter()
        .filter_map(|i| slots.get_mut(i).and_then(Option::take))
        .collect();
    Ok(if is_tuple {
        Value::Tuple(sorted)
    } else {
        Value::Array(sorted)
    })
}

pub(super) fn reverse(value: Value) -> EvalResult {
    match value {
        Value::Str(s) => Ok(Value::Str(s.chars().rev().collect())),
        Value::Array(mut items) => {
            items.reverse();
            Ok(Value::Array(items))
        }
        Value::Tuple(mut items) => {
            items.reverse();
            Ok(Value::Tuple(items))
        }
        other => Err(invalid_argument("reverse", 1, &other)),
    }
}

/// `[start, end)`; empty when `start >= end`.
pub(super) fn range(start: &Value, end: &Value) -> EvalResult {
    match (start, end) {
        (Value::Int(start), Value::Int(end)) => {
            Ok(Value::Array((*start..*end).map(Value::Int).collect()))
        }
        (Value::Int(_), other) => Err(invalid_argument("range", 2, other)),
        (other, _) => Err(invalid_argument("range", 1, other)),
    }
}

fn sequence<'v>(
    function: &'static str,
    position: usize,
    value: &'v Value,
) -> Result<&'v [Value], EvalError> {
    value
        .as_sequence()
        .ok_or_else(|| invalid_argument(function, position, value))
}
