//! Runtime values.
//!
//! Values are plain data: cloning a value deep-copies its arrays. Nodes
//! never hold on to values between evaluations, so there is no sharing to
//! protect.

use std::cmp::Ordering;
use std::fmt;

use cardex_ir::Name;
use cardex_types::{EnumType, Type};

use crate::Color;

/// A member of an enum type.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct EnumValue {
    ty: EnumType,
    index: usize,
}

impl EnumValue {
    /// Member at `index` of `ty`, or `None` if out of range.
    pub fn new(ty: EnumType, index: usize) -> Option<Self> {
        (index < ty.members().len()).then_some(EnumValue { ty, index })
    }

    /// Member of `ty` with the given name, matched exactly.
    pub fn named(ty: EnumType, member: &str) -> Option<Self> {
        let index = ty.index_of(member)?;
        Some(EnumValue { ty, index })
    }

    #[inline]
    pub fn enum_type(&self) -> &EnumType {
        &self.ty
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Symbolic member name as declared.
    pub fn member(&self) -> &Name {
        // `new`/`named` only construct in-range indices.
        &self.ty.members()[self.index]
    }
}

/// Tag of a [`Value`], without its payload.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ValueKind {
    Null,
    Int,
    Float,
    Bool,
    Str,
    Color,
    Array,
    Tuple,
    Enum,
}

impl ValueKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Str => "string",
            Self::Color => "color",
            Self::Array => "array",
            Self::Tuple => "tuple",
            Self::Enum => "enum",
        }
    }
}

/// Runtime value.
///
/// `PartialEq` is structural (`Int(1) != Float(1.0)`); it exists for tests
/// and for comparing folded trees. Expression-level equality is
/// [`values_equal`].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Absent value. Only environments produce it.
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Color(Color),
    Array(Vec<Value>),
    Tuple(Vec<Value>),
    Enum(EnumValue),
}

impl Value {
    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    #[inline]
    pub fn float(f: f64) -> Self {
        Value::Float(f)
    }

    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    #[inline]
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(items)
    }

    #[inline]
    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(items)
    }

    /// Build an array whose elements all conform to `element`.
    ///
    /// Integers are widened to floats when `element` is `float`, which is how
    /// a unified `[1, 2.5]` becomes `[1.0, 2.5]`. Returns `None` if any item
    /// does not fit.
    pub fn typed_array(element: &Type, items: Vec<Value>) -> Option<Self> {
        items
            .into_iter()
            .map(|item| item.coerce_to(element))
            .collect::<Option<Vec<_>>>()
            .map(Value::Array)
    }

    /// Convert to `target` if this value already conforms, widening `int`
    /// to `float` (also inside arrays and tuples). `null` conforms to any
    /// type.
    pub fn coerce_to(self, target: &Type) -> Option<Value> {
        match (self, target) {
            (Value::Null, _) => Some(Value::Null),
            (Value::Int(n), Type::Float) => Some(Value::Float(int_to_float(n))),
            (v @ Value::Int(_), Type::Int)
            | (v @ Value::Float(_), Type::Float)
            | (v @ Value::Bool(_), Type::Bool)
            | (v @ Value::Str(_), Type::Str)
            | (v @ Value::Color(_), Type::Color) => Some(v),
            (Value::Enum(e), Type::Enum(ty)) if e.enum_type() == ty => Some(Value::Enum(e)),
            (Value::Array(items), Type::Array(element)) => Value::typed_array(element, items),
            (Value::Tuple(items), Type::Tuple(element, len)) if items.len() == *len => items
                .into_iter()
                .map(|item| item.coerce_to(element))
                .collect::<Option<Vec<_>>>()
                .map(Value::Tuple),
            _ => None,
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Bool(_) => ValueKind::Bool,
            Value::Str(_) => ValueKind::Str,
            Value::Color(_) => ValueKind::Color,
            Value::Array(_) => ValueKind::Array,
            Value::Tuple(_) => ValueKind::Tuple,
            Value::Enum(_) => ValueKind::Enum,
        }
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric payload as `f64`, for `int` and `float` only.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(int_to_float(*n)),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Elements of an array or tuple.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Consume an array or tuple into its elements.
    pub fn into_sequence(self) -> Option<Vec<Value>> {
        match self {
            Value::Array(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }
}

#[allow(
    clippy::cast_precision_loss,
    reason = "int/float arithmetic promotes through f64 by definition"
)]
#[inline]
fn int_to_float(n: i64) -> f64 {
    n as f64
}

/// Expression-level equality (`==`).
///
/// - `null == null`, and `null` equals nothing else
/// - numbers compare by value across `int`/`float`
/// - an enum member equals a string naming it, ignoring case
/// - arrays and tuples compare element-wise
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            left.as_real() == right.as_real()
        }
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Color(a), Value::Color(b)) => a == b,
        (Value::Enum(a), Value::Enum(b)) => a == b,
        (Value::Enum(e), Value::Str(s)) | (Value::Str(s), Value::Enum(e)) => {
            e.member().eq_ignore_ascii_case(s)
        }
        (Value::Array(a), Value::Array(b)) | (Value::Tuple(a), Value::Tuple(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        _ => false,
    }
}

/// Expression-level ordering (`<`, `sort`, `min`, `max`).
///
/// `None` when the pair has no ordering: mismatched kinds, members of
/// different enums, NaN.
pub fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            left.as_real()?.partial_cmp(&right.as_real()?)
        }
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Enum(a), Value::Enum(b)) if a.enum_type() == b.enum_type() => {
            Some(a.index().cmp(&b.index()))
        }
        _ => None,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => f.write_str(s),
            Value::Color(c) => write!(f, "{c}"),
            Value::Array(items) => {
                f.write_str("[")?;
                write_items(f, items)?;
                f.write_str("]")
            }
            Value::Tuple(items) => {
                f.write_str("(")?;
                write_items(f, items)?;
                f.write_str(")")
            }
            Value::Enum(e) => write!(f, "{}", e.member()),
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
