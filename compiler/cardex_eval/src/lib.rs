//! Cardex Eval - typed expression trees for card and sheet templates.
//!
//! A template expression arrives here as a fully built [`Node`] tree (the
//! parser lives elsewhere). This crate answers four questions about it:
//!
//! - what type does it produce? ([`Node::return_type`])
//! - what value does it produce in a given [`Environment`]? ([`Node::evaluate`])
//! - which variables does it depend on? ([`Node::variables`])
//! - what is an equivalent, smaller tree? ([`Node::simplify`])
//!
//! and renders any tree back to parseable text through `Display`.
//!
//! # Architecture
//!
//! - `environment`: the read-only binding contract plus the comprehension scope
//! - `node`: the closed set of node variants and their constructors
//! - `typeck`: static return types
//! - `eval`: the recursive evaluator with an explicit depth guard
//! - `operators` / `index`: value-level operator semantics
//! - `functions`: the built-in function library
//! - `simplify`: constant folding
//! - `render`: precedence-aware text rendering
//! - `builders`: clone, type-check and fold in one step (`make_add(a, b)`)
//!
//! Trees are immutable and hold no evaluation state, so one tree can be
//! evaluated from several threads against independent environments.

mod builders;
mod config;
mod environment;
mod eval;
mod functions;
mod index;
mod logging;
mod node;
mod operators;
mod render;
mod simplify;
mod typeck;

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;

pub use builders::{
    make_add, make_and, make_binary, make_conditional, make_div, make_eq, make_index, make_mod,
    make_mul, make_neg, make_not, make_or, make_sub, make_unary,
};
pub use config::EvalConfig;
pub use environment::{
    ComprehensionEnvironment, EmptyEnvironment, Environment, FunctionDefinition, MapEnvironment,
    NativeFunction, Signature,
};
pub use functions::{format::translate_format, Arity, Function};
pub use index::{index_value, slice_value};
pub use logging::init_tracing;
pub use node::{Comprehension, ComprehensionFor, ComprehensionIf, FunctionCall, Invocation, Node};
pub use operators::{evaluate_binary, evaluate_unary};

pub use cardex_ir::{prec, Associativity, BinaryOp, Name, TernaryOp, UnaryOp};
pub use cardex_types::{EnumType, Type, TypeError};
pub use cardex_values::{
    Color, EnumValue, ErrorCategory, EvalError, EvalErrorKind, EvalResult, Value, ValueKind,
};
