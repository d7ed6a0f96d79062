//! Static return types.
//!
//! A node's type is a pure function of its children's types. Nothing here
//! looks at an environment: variables carry the type they were resolved
//! with, and environment calls carry their signature.

use cardex_ir::{BinaryOp, Name, UnaryOp};
use cardex_stack::ensure_sufficient_stack;
use cardex_types::{comparable_for_equality, conditional_result, numeric_result, orderable, Type, TypeError};

use crate::node::{Comprehension, Node};

impl Node {
    /// Static type of the value this node evaluates to.
    ///
    /// A node whose return type computes successfully never fails
    /// evaluation with a type error.
    pub fn return_type(&self) -> Result<Type, TypeError> {
        ensure_sufficient_stack(|| self.compute_type())
    }

    fn compute_type(&self) -> Result<Type, TypeError> {
        match self {
            Node::Constant { ty, .. } | Node::Variable { ty, .. } => Ok(ty.clone()),
            Node::Unary { op, operand } => unary_type(*op, &operand.return_type()?),
            Node::Binary { op, left, right } => {
                binary_type(*op, &left.return_type()?, &right.return_type()?)
            }
            Node::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition = condition.return_type()?;
                if condition != Type::Bool {
                    return Err(TypeError::Mismatch {
                        expected: Type::Bool,
                        found: condition,
                    });
                }
                conditional_result(&then_branch.return_type()?, &else_branch.return_type()?)
            }
            Node::Slice {
                subject,
                start,
                end,
            } => {
                for bound in [start, end].into_iter().flatten() {
                    let bound = bound.return_type()?;
                    if bound != Type::Int {
                        return Err(TypeError::NonIntegerIndex { found: bound });
                    }
                }
                match subject.return_type()? {
                    Type::Str => Ok(Type::Str),
                    Type::Array(element) | Type::Tuple(element, _) => Ok(Type::Array(element)),
                    found => Err(TypeError::NotIndexable { found }),
                }
            }
            Node::Comprehension(c) => comprehension_type(c),
            Node::Call(call) => {
                let args = call
                    .args()
                    .iter()
                    .map(Node::return_type)
                    .collect::<Result<Vec<_>, _>>()?;
                call.function().return_type(&args)
            }
            Node::Invoke(invocation) => {
                let signature = invocation.signature();
                for (arg, param) in invocation.args().iter().zip(&signature.params) {
                    let found = arg.return_type()?;
                    let widens = found == Type::Int && *param == Type::Float;
                    if found != *param && !widens {
                        return Err(TypeError::Mismatch {
                            expected: param.clone(),
                            found,
                        });
                    }
                }
                Ok(signature.returns.clone())
            }
        }
    }
}

fn unary_type(op: UnaryOp, operand: &Type) -> Result<Type, TypeError> {
    let ok = match op {
        UnaryOp::Neg => operand.is_real(),
        UnaryOp::Not => *operand == Type::Bool,
    };
    if ok {
        Ok(operand.clone())
    } else {
        Err(TypeError::UnaryOperand {
            op: op.as_symbol(),
            operand: operand.clone(),
        })
    }
}

fn binary_type(op: BinaryOp, left: &Type, right: &Type) -> Result<Type, TypeError> {
    let mismatch = || TypeError::BinaryOperands {
        op: op.as_symbol(),
        left: left.clone(),
        right: right.clone(),
    };
    match op {
        BinaryOp::Add if *left == Type::Str && *right == Type::Str => Ok(Type::Str),
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
            numeric_result(op.as_symbol(), left, right)
        }
        BinaryOp::Eq | BinaryOp::NotEq => {
            if comparable_for_equality(left, right) {
                Ok(Type::Bool)
            } else {
                Err(mismatch())
            }
        }
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
            if orderable(left, right) {
                Ok(Type::Bool)
            } else {
                Err(mismatch())
            }
        }
        BinaryOp::And | BinaryOp::Or => {
            if *left == Type::Bool && *right == Type::Bool {
                Ok(Type::Bool)
            } else {
                Err(mismatch())
            }
        }
        BinaryOp::Coalesce => conditional_result(left, right),
        BinaryOp::Index => {
            if *right != Type::Int {
                return Err(TypeError::NonIntegerIndex {
                    found: right.clone(),
                });
            }
            match left {
                Type::Str => Ok(Type::Str),
                Type::Array(element) | Type::Tuple(element, _) => Ok((**element).clone()),
                found => Err(TypeError::NotIndexable {
                    found: found.clone(),
                }),
            }
        }
    }
}

/// `[body for x in source if filter]` is an array of the body's type. The
/// source must be a sequence, the filter a bool, and every use of `x` in
/// body and filter must carry the source's element type.
fn comprehension_type(c: &Comprehension) -> Result<Type, TypeError> {
    let source = c.source().return_type()?;
    let element = source
        .element_type()
        .ok_or_else(|| TypeError::NotSequence {
            context: "comprehension",
            found: source.clone(),
        })?;
    check_loop_variable(c.body(), c.variable(), element)?;
    if let Some(filter) = c.filter() {
        check_loop_variable(filter, c.variable(), element)?;
        let condition = filter.return_type()?;
        if condition != Type::Bool {
            return Err(TypeError::Mismatch {
                expected: Type::Bool,
                found: condition,
            });
        }
    }
    Ok(Type::array(c.body().return_type()?))
}

fn check_loop_variable(node: &Node, variable: &Name, element: &Type) -> Result<(), TypeError> {
    ensure_sufficient_stack(|| match node {
        Node::Variable { name, ty } if name == variable && ty != element => {
            Err(TypeError::Mismatch {
                expected: element.clone(),
                found: ty.clone(),
            })
        }
        // An inner comprehension over the same name shadows it everywhere
        // except in its own source.
        Node::Comprehension(inner) if inner.variable() == variable => {
            check_loop_variable(inner.source(), variable, element)
        }
        other => other
            .children()
            .into_iter()
            .try_for_each(|child| check_loop_variable(child, variable, element)),
    })
}
