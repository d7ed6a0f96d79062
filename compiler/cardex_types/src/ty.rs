//! The `Type` enum.

use std::fmt;
use std::sync::Arc;

use cardex_ir::Name;

/// An enumeration declared by the template: a type name plus its members in
/// declaration order.
///
/// Two enum types are the same type when both the name and the member list
/// agree.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct EnumType {
    name: Name,
    members: Arc<[Name]>,
}

impl EnumType {
    pub fn new(name: impl Into<Name>, members: impl IntoIterator<Item = Name>) -> Self {
        EnumType {
            name: name.into(),
            members: members.into_iter().collect(),
        }
    }

    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    #[inline]
    pub fn members(&self) -> &[Name] {
        &self.members
    }

    /// Declaration index of `member`, matched exactly.
    pub fn index_of(&self, member: &str) -> Option<usize> {
        self.members.iter().position(|m| m.as_str() == member)
    }

    /// Declaration index of `member`, ignoring ASCII case.
    pub fn index_of_ignore_case(&self, member: &str) -> Option<usize> {
        self.members
            .iter()
            .position(|m| m.eq_ignore_ascii_case(member))
    }
}

/// Static type of an expression.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Type {
    Int,
    Float,
    Bool,
    Str,
    Color,
    /// Variable-length sequence.
    Array(Box<Type>),
    /// Fixed-length sequence with a single element type.
    Tuple(Box<Type>, usize),
    Enum(EnumType),
}

impl Type {
    /// Array of `element`.
    #[inline]
    pub fn array(element: Type) -> Type {
        Type::Array(Box::new(element))
    }

    /// Tuple of `len` elements of type `element`.
    #[inline]
    pub fn tuple(element: Type, len: usize) -> Type {
        Type::Tuple(Box::new(element), len)
    }

    /// `int` or `float`.
    #[inline]
    pub fn is_real(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    #[inline]
    pub fn is_integral(&self) -> bool {
        matches!(self, Type::Int)
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(_))
    }

    #[inline]
    pub fn is_tuple(&self) -> bool {
        matches!(self, Type::Tuple(..))
    }

    /// Array or tuple.
    #[inline]
    pub fn is_sequence(&self) -> bool {
        self.is_array() || self.is_tuple()
    }

    #[inline]
    pub fn is_enum(&self) -> bool {
        matches!(self, Type::Enum(_))
    }

    /// Element type of an array or tuple; `None` for anything else.
    pub fn element_type(&self) -> Option<&Type> {
        match self {
            Type::Array(element) | Type::Tuple(element, _) => Some(element),
            _ => None,
        }
    }

    /// An array whose elements are of this type.
    #[must_use]
    pub fn make_array(&self) -> Type {
        Type::array(self.clone())
    }

    /// Whether values of this type can be put in order (`<`, `sort`, `min`).
    pub fn is_ordered(&self) -> bool {
        matches!(
            self,
            Type::Int | Type::Float | Type::Bool | Type::Str | Type::Enum(_)
        )
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => f.write_str("int"),
            Type::Float => f.write_str("float"),
            Type::Bool => f.write_str("bool"),
            Type::Str => f.write_str("string"),
            Type::Color => f.write_str("color"),
            Type::Array(element) => write!(f, "array<{element}>"),
            Type::Tuple(element, len) => write!(f, "tuple<{element}, {len}>"),
            Type::Enum(e) => write!(f, "{}", e.name()),
        }
    }
}
