//! Static type errors.

use std::fmt;

use crate::Type;

/// Why an expression is statically ill-typed.
///
/// Produced only while computing a node's return type. An expression whose
/// return type computes successfully never produces one of these while it is
/// being evaluated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeError {
    /// A specific type was required.
    Mismatch { expected: Type, found: Type },
    /// Operator not defined for this pair of operand types.
    BinaryOperands {
        op: &'static str,
        left: Type,
        right: Type,
    },
    /// Operator not defined for this operand type.
    UnaryOperand { op: &'static str, operand: Type },
    /// Conditional branches or `??` operands disagree.
    BranchMismatch { first: Type, second: Type },
    /// Subject of `a[i]` / `a[i:j]` is not a string, array or tuple.
    NotIndexable { found: Type },
    /// Index or slice bound is not an integer.
    NonIntegerIndex { found: Type },
    /// An array or tuple was required.
    NotSequence { context: &'static str, found: Type },
    /// Elements of an array literal cannot be unified.
    NoCommonType { types: Vec<Type> },
    /// Operands of `min`/`max`/`sum` (or similar) have no common numeric type.
    NoCommonNumericType { types: Vec<Type> },
    /// Element type cannot be put in order.
    Unordered { context: &'static str, element: Type },
    /// No element from which to infer a type.
    CannotInferElement { context: &'static str },
    /// A function was type-checked with an argument count it never accepts.
    ArgumentCount { function: String, count: usize },
    /// A function argument has an unsupported type.
    InvalidArgument {
        function: String,
        position: usize,
        expected: &'static str,
        found: Type,
    },
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mismatch { expected, found } => {
                write!(f, "type mismatch: expected `{expected}`, found `{found}`")
            }
            Self::BinaryOperands { op, left, right } => {
                write!(f, "operator `{op}` cannot be applied to `{left}` and `{right}`")
            }
            Self::UnaryOperand { op, operand } => {
                write!(f, "operator `{op}` cannot be applied to `{operand}`")
            }
            Self::BranchMismatch { first, second } => {
                write!(f, "branches have different types: `{first}` and `{second}`")
            }
            Self::NotIndexable { found } => write!(f, "cannot index into `{found}`"),
            Self::NonIntegerIndex { found } => {
                write!(f, "index must be `int`, found `{found}`")
            }
            Self::NotSequence { context, found } => {
                write!(f, "{context} requires an array or tuple, found `{found}`")
            }
            Self::NoCommonType { types } => {
                write!(f, "elements have no common type: {}", join_types(types))
            }
            Self::NoCommonNumericType { types } => {
                write!(f, "no common numeric type for {}", join_types(types))
            }
            Self::Unordered { context, element } => {
                write!(f, "{context}: values of type `{element}` have no ordering")
            }
            Self::CannotInferElement { context } => {
                write!(f, "{context}: cannot infer element type from zero elements")
            }
            Self::ArgumentCount { function, count } => {
                write!(f, "`{function}` cannot take {count} arguments")
            }
            Self::InvalidArgument {
                function,
                position,
                expected,
                found,
            } => write!(
                f,
                "{function}: argument {position} must be {expected}, found `{found}`"
            ),
        }
    }
}

impl std::error::Error for TypeError {}

fn join_types(types: &[Type]) -> String {
    types
        .iter()
        .map(|t| format!("`{t}`"))
        .collect::<Vec<_>>()
        .join(", ")
}
