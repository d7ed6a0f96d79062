//! `a[i]` and `a[i:j]` on strings, arrays and tuples.
//!
//! Negative positions count from the end (`i + len`). A single index is
//! strict: anything outside `[-len, len)` is an error. Slices are best
//! effort: bounds are clamped into `[0, len]` and a start past the end
//! yields an empty result. Strings index by character, and slicing a tuple
//! yields an array.

use cardex_values::{index_out_of_bounds, invalid_operands, EvalError, EvalResult, Value};

pub fn index_value(subject: Value, index: Value) -> EvalResult {
    let Value::Int(i) = index else {
        return Err(invalid_operands("[", &subject, &index));
    };
    match subject {
        Value::Str(s) => {
            let len = s.chars().count();
            let at = resolve_index(i, len)?;
            s.chars()
                .nth(at)
                .map(|c| Value::Str(c.to_string()))
                .ok_or_else(|| index_out_of_bounds(i, len))
        }
        Value::Array(mut items) | Value::Tuple(mut items) => {
            let at = resolve_index(i, items.len())?;
            Ok(items.swap_remove(at))
        }
        other => Err(invalid_operands("[", &other, &Value::Int(i))),
    }
}

fn resolve_index(index: i64, len: usize) -> Result<usize, EvalError> {
    let signed_len = i64::try_from(len).map_err(|_| index_out_of_bounds(index, len))?;
    let wrapped = if index < 0 { index + signed_len } else { index };
    if (0..signed_len).contains(&wrapped) {
        usize::try_from(wrapped).map_err(|_| index_out_of_bounds(index, len))
    } else {
        Err(index_out_of_bounds(index, len))
    }
}

pub fn slice_value(subject: Value, start: Option<Value>, end: Option<Value>) -> EvalResult {
    let start = bound(&subject, start)?;
    let end = bound(&subject, end)?;
    match subject {
        Value::Str(s) => {
            let len = s.chars().count();
            let (from, to) = clamp_range(start, end, len);
            Ok(Value::Str(s.chars().skip(from).take(to - from).collect()))
        }
        Value::Array(items) | Value::Tuple(items) => {
            let (from, to) = clamp_range(start, end, items.len());
            Ok(Value::Array(items[from..to].to_vec()))
        }
        other => Err(invalid_operands("[:]", &other, &Value::Null)),
    }
}

fn bound(subject: &Value, bound: Option<Value>) -> Result<Option<i64>, EvalError> {
    match bound {
        None => Ok(None),
        Some(Value::Int(n)) => Ok(Some(n)),
        Some(other) => Err(invalid_operands("[:]", subject, &other)),
    }
}

/// Wrap negative bounds, clamp both into `[0, len]`, and keep `from <= to`.
fn clamp_range(start: Option<i64>, end: Option<i64>, len: usize) -> (usize, usize) {
    let signed_len = i64::try_from(len).unwrap_or(i64::MAX);
    let clamp = |bound: i64| {
        let wrapped = if bound < 0 {
            bound.saturating_add(signed_len)
        } else {
            bound
        };
        usize::try_from(wrapped.clamp(0, signed_len)).unwrap_or(len)
    };
    let from = start.map_or(0, clamp);
    let to = end.map_or(len, clamp);
    (from, to.max(from))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use cardex_values::EvalErrorKind;
    use pretty_assertions::assert_eq;

    fn ints(items: &[i64]) -> Value {
        Value::array(items.iter().copied().map(Value::int).collect())
    }

    #[test]
    fn negative_index_wraps() {
        assert_eq!(index_value(ints(&[1, 2, 3]), Value::int(-1)).unwrap(), Value::int(3));
        assert_eq!(
            index_value(Value::string("héllo"), Value::int(-4)).unwrap(),
            Value::string("é")
        );
    }

    #[test]
    fn single_index_is_strict() {
        let err = index_value(ints(&[1, 2, 3]), Value::int(3)).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::IndexOutOfBounds { index: 3, len: 3 });
        assert!(index_value(ints(&[1, 2, 3]), Value::int(-4)).is_err());
        assert!(index_value(Value::string(""), Value::int(0)).is_err());
    }

    #[test]
    fn tuple_index() {
        let t = Value::tuple(vec![Value::int(4), Value::int(5)]);
        assert_eq!(index_value(t, Value::int(1)).unwrap(), Value::int(5));
    }

    #[test]
    fn slices_clamp() {
        let a = ints(&[1, 2, 3, 4]);
        assert_eq!(
            slice_value(a.clone(), Some(Value::int(1)), Some(Value::int(3))).unwrap(),
            ints(&[2, 3])
        );
        assert_eq!(
            slice_value(a.clone(), Some(Value::int(-2)), None).unwrap(),
            ints(&[3, 4])
        );
        assert_eq!(
            slice_value(a.clone(), Some(Value::int(-100)), Some(Value::int(100))).unwrap(),
            ints(&[1, 2, 3, 4])
        );
        assert_eq!(
            slice_value(a, Some(Value::int(3)), Some(Value::int(1))).unwrap(),
            ints(&[])
        );
    }

    #[test]
    fn string_slice() {
        assert_eq!(
            slice_value(Value::string("cardex"), None, Some(Value::int(4))).unwrap(),
            Value::string("card")
        );
    }

    #[test]
    fn tuple_slice_is_an_array() {
        let t = Value::tuple(vec![Value::int(1), Value::int(2), Value::int(3)]);
        assert_eq!(slice_value(t, Some(Value::int(1)), None).unwrap(), ints(&[2, 3]));
    }
}
