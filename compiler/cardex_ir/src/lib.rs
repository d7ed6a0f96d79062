//! Cardex IR - shared vocabulary of the expression engine.
//!
//! - [`Name`]: cheaply clonable identifier for variables, functions and enum members
//! - [`UnaryOp`], [`BinaryOp`], [`TernaryOp`]: operator kinds with their source
//!   symbols, binding strength and associativity
//!
//! Everything here is plain data with `Clone, Eq, Hash, Debug`. Nothing in
//! this crate knows about values or types.

mod name;
mod operators;

pub use name::Name;
pub use operators::{prec, Associativity, BinaryOp, TernaryOp, UnaryOp};
