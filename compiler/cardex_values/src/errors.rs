//! Evaluation errors.
//!
//! # Categories
//!
//! Every [`EvalErrorKind`] belongs to exactly one [`ErrorCategory`], which
//! tells the caller *when* the problem was detected and how to treat it:
//!
//! | category | detected | caller should |
//! |---|---|---|
//! | `Syntax` | building a node | refuse to use the node |
//! | `Type` | computing a return type | report to the template author |
//! | `Calculation` | evaluating | report to the template author |
//! | `UndefinedVariable` | evaluating | report; `exists`/`try` absorb it |
//! | `Processing` | building or evaluating | treat as a bug in the tree producer |
//!
//! The core never knows source locations; callers attach them when they
//! surface an error.
//!
//! Factory functions (e.g. [`index_out_of_bounds`]) are the public way to
//! construct errors. They fill in both `kind` and `message`.

use std::fmt;

use cardex_types::TypeError;

use crate::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// When an error was detected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Syntax,
    Type,
    Calculation,
    UndefinedVariable,
    Processing,
}

/// Structured error condition.
#[derive(Clone, Debug, PartialEq)]
pub enum EvalErrorKind {
    // Syntax
    ArityMismatch {
        function: String,
        expected: String,
        got: usize,
    },
    UnknownFunction {
        name: String,
    },

    // Type
    Type(TypeError),

    // Calculation
    IndexOutOfBounds {
        index: i64,
        len: usize,
    },
    CannotParse {
        text: String,
        target: &'static str,
    },
    DivisionByZero,
    ModuloByZero,
    IntegerOverflow {
        operation: &'static str,
    },
    NonFiniteResult {
        operation: &'static str,
    },
    EmptyReduction {
        function: &'static str,
    },
    LengthMismatch {
        function: &'static str,
        left: usize,
        right: usize,
    },
    NotComparable {
        function: &'static str,
        left: String,
        right: String,
    },
    InvalidFormat {
        message: String,
    },
    InvalidValue {
        function: &'static str,
        message: String,
    },
    InvalidOperand {
        op: &'static str,
        operand: &'static str,
    },
    InvalidOperands {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },
    InvalidArgument {
        function: &'static str,
        position: usize,
        found: &'static str,
    },
    UndefinedFunction {
        name: String,
    },
    StackOverflow {
        depth: usize,
    },

    // Undefined variable
    UndefinedVariable {
        name: String,
    },

    // Processing
    UnlinkedComprehension,
    Processing {
        message: String,
    },
}

impl EvalErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ArityMismatch { .. } | Self::UnknownFunction { .. } => ErrorCategory::Syntax,
            Self::Type(_) => ErrorCategory::Type,
            Self::IndexOutOfBounds { .. }
            | Self::CannotParse { .. }
            | Self::DivisionByZero
            | Self::ModuloByZero
            | Self::IntegerOverflow { .. }
            | Self::NonFiniteResult { .. }
            | Self::EmptyReduction { .. }
            | Self::LengthMismatch { .. }
            | Self::NotComparable { .. }
            | Self::InvalidFormat { .. }
            | Self::InvalidValue { .. }
            | Self::InvalidOperand { .. }
            | Self::InvalidOperands { .. }
            | Self::InvalidArgument { .. }
            | Self::UndefinedFunction { .. }
            | Self::StackOverflow { .. } => ErrorCategory::Calculation,
            Self::UndefinedVariable { .. } => ErrorCategory::UndefinedVariable,
            Self::UnlinkedComprehension | Self::Processing { .. } => ErrorCategory::Processing,
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArityMismatch {
                function,
                expected,
                got,
            } => {
                let arg_word = if *got == 1 { "argument" } else { "arguments" };
                write!(f, "{function} expects {expected}, got {got} {arg_word}")
            }
            Self::UnknownFunction { name } => write!(f, "unknown function: {name}"),

            Self::Type(err) => write!(f, "{err}"),

            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
            Self::CannotParse { text, target } => {
                write!(f, "cannot parse '{text}' as {target}")
            }
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::ModuloByZero => write!(f, "modulo by zero"),
            Self::IntegerOverflow { operation } => {
                write!(f, "integer overflow in {operation}")
            }
            Self::NonFiniteResult { operation } => {
                write!(f, "{operation} does not produce a finite number")
            }
            Self::EmptyReduction { function } => {
                write!(f, "{function} of zero elements")
            }
            Self::LengthMismatch {
                function,
                left,
                right,
            } => write!(f, "{function}: lengths differ ({left} and {right})"),
            Self::NotComparable {
                function,
                left,
                right,
            } => write!(f, "{function}: cannot order {left} and {right}"),
            Self::InvalidFormat { message } => write!(f, "invalid format: {message}"),
            Self::InvalidValue { function, message } => write!(f, "{function}: {message}"),
            Self::InvalidOperand { op, operand } => {
                write!(f, "operator `{op}` cannot be applied to {operand}")
            }
            Self::InvalidOperands { op, left, right } => {
                write!(f, "operator `{op}` cannot be applied to {left} and {right}")
            }
            Self::InvalidArgument {
                function,
                position,
                found,
            } => write!(f, "{function}: unexpected {found} as argument {position}"),
            Self::UndefinedFunction { name } => write!(f, "undefined function: {name}"),
            Self::StackOverflow { depth } => {
                write!(f, "maximum nesting depth exceeded (limit: {depth})")
            }

            Self::UndefinedVariable { name } => write!(f, "undefined variable: {name}"),

            Self::UnlinkedComprehension => {
                write!(f, "comprehension filter is not linked to its opening")
            }
            Self::Processing { message } => write!(f, "internal error: {message}"),
        }
    }
}

/// Evaluation error.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    /// Structured error condition.
    pub kind: EvalErrorKind,
    /// Human-readable message, equal to `kind.to_string()`.
    pub message: String,
}

impl EvalError {
    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        EvalError { kind, message }
    }

    #[inline]
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    #[inline]
    pub fn is_undefined_variable(&self) -> bool {
        matches!(self.kind, EvalErrorKind::UndefinedVariable { .. })
    }

    /// Errors an evaluation-level fallback (`??`, `try`) may absorb.
    ///
    /// Syntax, type and processing errors describe the tree itself and are
    /// never absorbed.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Calculation | ErrorCategory::UndefinedVariable
        )
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            EvalErrorKind::Type(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TypeError> for EvalError {
    #[cold]
    fn from(err: TypeError) -> Self {
        EvalError::from_kind(EvalErrorKind::Type(err))
    }
}

// Syntax Errors

/// Function called with an unsupported number of arguments.
#[cold]
pub fn arity_mismatch(function: &str, expected: impl Into<String>, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch {
        function: function.to_string(),
        expected: expected.into(),
        got,
    })
}

/// Name that is neither a built-in nor provided by the environment.
#[cold]
pub fn unknown_function(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownFunction {
        name: name.to_string(),
    })
}

// Calculation Errors

/// Operator applied to a runtime value it does not support (usually `null`).
#[cold]
pub fn invalid_operand(op: &'static str, operand: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidOperand {
        op,
        operand: operand.type_name(),
    })
}

#[cold]
pub fn invalid_operands(op: &'static str, left: &Value, right: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidOperands {
        op,
        left: left.type_name(),
        right: right.type_name(),
    })
}

/// Function received a runtime value it does not support (usually `null`).
#[cold]
pub fn invalid_argument(function: &'static str, position: usize, found: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidArgument {
        function,
        position,
        found: found.type_name(),
    })
}

/// Single-element index outside `[-len, len)`.
#[cold]
pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfBounds { index, len })
}

/// Text that does not parse as the requested type.
#[cold]
pub fn cannot_parse(text: &str, target: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::CannotParse {
        text: text.to_string(),
        target,
    })
}

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

#[cold]
pub fn modulo_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ModuloByZero)
}

#[cold]
pub fn integer_overflow(operation: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow { operation })
}

/// Float result that is infinite or NaN, which no literal can express.
#[cold]
pub fn non_finite_result(operation: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NonFiniteResult { operation })
}

/// `min`, `max`, `sum` (and friends) over nothing.
#[cold]
pub fn empty_reduction(function: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::EmptyReduction { function })
}

#[cold]
pub fn length_mismatch(function: &'static str, left: usize, right: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::LengthMismatch {
        function,
        left,
        right,
    })
}

/// Two runtime values with no ordering between them (e.g. NaN).
#[cold]
pub fn not_comparable(function: &'static str, left: &Value, right: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotComparable {
        function,
        left: left.to_string(),
        right: right.to_string(),
    })
}

#[cold]
pub fn invalid_format(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidFormat {
        message: message.into(),
    })
}

/// A well-typed argument whose runtime value is unusable.
#[cold]
pub fn invalid_value(function: &'static str, message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidValue {
        function,
        message: message.into(),
    })
}

#[cold]
pub fn undefined_function(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedFunction {
        name: name.to_string(),
    })
}

#[cold]
pub fn stack_overflow(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackOverflow { depth })
}

// Undefined Variable Errors

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

// Processing Errors

#[cold]
pub fn unlinked_comprehension() -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnlinkedComprehension)
}

#[cold]
pub fn processing_error(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Processing {
        message: message.into(),
    })
}

#[cfg(test)]
mod tests;
