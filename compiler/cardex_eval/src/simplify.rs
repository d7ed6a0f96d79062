//! Constant folding.

use cardex_stack::ensure_sufficient_stack;

use crate::environment::EmptyEnvironment;
use crate::node::{Comprehension, FunctionCall, Invocation, Node};

impl Node {
    /// An equivalent tree with constant subtrees replaced by literals.
    ///
    /// A constant subtree is folded only if it type-checks and evaluates
    /// successfully against an empty environment; a subtree that would fail
    /// (`1 / 0`) is kept so the failure still happens at evaluation time.
    /// Simplifying twice gives the same tree as simplifying once.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn simplify(&self) -> Node {
        self.simplify_node()
    }

    fn simplify_node(&self) -> Node {
        ensure_sufficient_stack(|| {
            if let Node::Constant { .. } = self {
                return self.clone();
            }
            if self.is_constant() {
                if let Some(folded) = self.fold() {
                    return folded;
                }
            }
            self.map_children(Node::simplify_node)
        })
    }

    fn fold(&self) -> Option<Node> {
        let ty = self.return_type().ok()?;
        match self.evaluate(&EmptyEnvironment) {
            Ok(value) => {
                let value = value.coerce_to(&ty)?;
                tracing::debug!(node = %self, folded = %value, "folded constant");
                Some(Node::Constant { value, ty })
            }
            Err(err) => {
                tracing::debug!(node = %self, error = %err, "constant left unfolded");
                None
            }
        }
    }

    /// Same node with every direct child replaced by `f(child)`.
    pub(crate) fn map_children(&self, mut f: impl FnMut(&Node) -> Node) -> Node {
        match self {
            Node::Constant { .. } | Node::Variable { .. } => self.clone(),
            Node::Unary { op, operand } => Node::Unary {
                op: *op,
                operand: Box::new(f(operand)),
            },
            Node::Binary { op, left, right } => Node::Binary {
                op: *op,
                left: Box::new(f(left)),
                right: Box::new(f(right)),
            },
            Node::Conditional {
                condition,
                then_branch,
                else_branch,
            } => Node::Conditional {
                condition: Box::new(f(condition)),
                then_branch: Box::new(f(then_branch)),
                else_branch: Box::new(f(else_branch)),
            },
            Node::Slice {
                subject,
                start,
                end,
            } => Node::Slice {
                subject: Box::new(f(subject)),
                start: start.as_deref().map(|node| Box::new(f(node))),
                end: end.as_deref().map(|node| Box::new(f(node))),
            },
            Node::Comprehension(c) => Node::Comprehension(Box::new(Comprehension {
                body: f(&c.body),
                variable: c.variable.clone(),
                source: f(&c.source),
                filter: c.filter.as_ref().map(&mut f),
            })),
            Node::Call(call) => Node::Call(FunctionCall {
                function: call.function,
                args: call.args.iter().map(&mut f).collect(),
            }),
            Node::Invoke(invocation) => Node::Invoke(Invocation {
                signature: invocation.signature.clone(),
                args: invocation.args.iter().map(&mut f).collect(),
            }),
        }
    }
}
