//! Tree builders for host code.
//!
//! Each builder clones its operands, builds the new node, type-checks it and
//! returns the simplified result. The operands are left untouched and never
//! shared with the new tree.

use cardex_ir::{BinaryOp, UnaryOp};
use cardex_types::TypeError;

use crate::node::Node;

fn finish(node: Node) -> Result<Node, TypeError> {
    node.return_type()?;
    Ok(node.simplify())
}

pub fn make_binary(op: BinaryOp, left: &Node, right: &Node) -> Result<Node, TypeError> {
    finish(Node::binary(op, left.clone(), right.clone()))
}

pub fn make_unary(op: UnaryOp, operand: &Node) -> Result<Node, TypeError> {
    finish(Node::unary(op, operand.clone()))
}

pub fn make_add(left: &Node, right: &Node) -> Result<Node, TypeError> {
    make_binary(BinaryOp::Add, left, right)
}

pub fn make_sub(left: &Node, right: &Node) -> Result<Node, TypeError> {
    make_binary(BinaryOp::Sub, left, right)
}

pub fn make_mul(left: &Node, right: &Node) -> Result<Node, TypeError> {
    make_binary(BinaryOp::Mul, left, right)
}

pub fn make_div(left: &Node, right: &Node) -> Result<Node, TypeError> {
    make_binary(BinaryOp::Div, left, right)
}

pub fn make_mod(left: &Node, right: &Node) -> Result<Node, TypeError> {
    make_binary(BinaryOp::Mod, left, right)
}

pub fn make_and(left: &Node, right: &Node) -> Result<Node, TypeError> {
    make_binary(BinaryOp::And, left, right)
}

pub fn make_or(left: &Node, right: &Node) -> Result<Node, TypeError> {
    make_binary(BinaryOp::Or, left, right)
}

pub fn make_eq(left: &Node, right: &Node) -> Result<Node, TypeError> {
    make_binary(BinaryOp::Eq, left, right)
}

/// `subject[index]`
pub fn make_index(subject: &Node, index: &Node) -> Result<Node, TypeError> {
    make_binary(BinaryOp::Index, subject, index)
}

pub fn make_neg(operand: &Node) -> Result<Node, TypeError> {
    make_unary(UnaryOp::Neg, operand)
}

pub fn make_not(operand: &Node) -> Result<Node, TypeError> {
    make_unary(UnaryOp::Not, operand)
}

pub fn make_conditional(
    condition: &Node,
    then_branch: &Node,
    else_branch: &Node,
) -> Result<Node, TypeError> {
    finish(Node::conditional(
        condition.clone(),
        then_branch.clone(),
        else_branch.clone(),
    ))
}
