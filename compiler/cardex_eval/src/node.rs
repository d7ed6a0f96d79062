//! Expression tree nodes.
//!
//! A [`Node`] is an immutable value: evaluating, type-checking, simplifying
//! or rendering it never changes it, and cloning it yields an independent
//! tree. Builders (`make_add`, ...) rely on that to graft clones of existing
//! trees into new ones.
//!
//! Nodes are built bottom-up by the parser. Construction-time checks (argument
//! counts, comprehension linking) fail with syntax or processing errors;
//! everything about types is deferred to [`Node::return_type`].

use std::fmt;
use std::mem;

use rustc_hash::FxHashSet;

use cardex_ir::{prec, BinaryOp, Name, TernaryOp, UnaryOp};
use cardex_stack::ensure_sufficient_stack;
use cardex_types::Type;
use cardex_values::{
    arity_mismatch, processing_error, unknown_function, unlinked_comprehension, Color, EnumValue,
    EvalError, EvalResult, Value,
};

use crate::config::EvalConfig;
use crate::environment::{Environment, Signature};
use crate::eval::Evaluator;
use crate::functions::Function;

/// Expression tree node.
///
/// `Clone`, `PartialEq` and `Debug` recurse through the stack guard, and
/// `Drop` unlinks children iteratively, so a tree of any depth can be
/// copied, compared and dropped.
pub enum Node {
    /// Literal value of a known type.
    Constant { value: Value, ty: Type },
    /// Reference to an environment binding (or a comprehension loop variable).
    Variable { name: Name, ty: Type },
    Unary {
        op: UnaryOp,
        operand: Box<Node>,
    },
    /// Two-operand operator, including `a[i]` (`BinaryOp::Index`).
    Binary {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// `condition ? then_branch : else_branch`
    Conditional {
        condition: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Box<Node>,
    },
    /// `subject[start:end]`, either bound optional.
    Slice {
        subject: Box<Node>,
        start: Option<Box<Node>>,
        end: Option<Box<Node>>,
    },
    /// `[body for variable in source if filter]`
    Comprehension(Box<Comprehension>),
    /// Call of a built-in function.
    Call(FunctionCall),
    /// Call of an environment-provided function.
    Invoke(Invocation),
}

// Structural traits

impl Node {
    /// Childless stand-in left behind when a child is moved out for dropping.
    fn placeholder() -> Node {
        Node::Constant {
            value: Value::Null,
            ty: Type::Bool,
        }
    }

    fn is_leaf(&self) -> bool {
        matches!(self, Node::Constant { .. } | Node::Variable { .. })
    }

    /// Move every direct child into `out`, leaving placeholders behind.
    fn take_children(&mut self, out: &mut Vec<Node>) {
        fn detach(child: &mut Node) -> Node {
            mem::replace(child, Node::placeholder())
        }
        match self {
            Node::Constant { .. } | Node::Variable { .. } => {}
            Node::Unary { operand, .. } => out.push(detach(operand)),
            Node::Binary { left, right, .. } => {
                out.push(detach(left));
                out.push(detach(right));
            }
            Node::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                out.push(detach(condition));
                out.push(detach(then_branch));
                out.push(detach(else_branch));
            }
            Node::Slice {
                subject,
                start,
                end,
            } => {
                out.push(detach(subject));
                out.extend(start.take().map(|bound| *bound));
                out.extend(end.take().map(|bound| *bound));
            }
            Node::Comprehension(c) => {
                out.push(detach(&mut c.body));
                out.push(detach(&mut c.source));
                out.extend(c.filter.take());
            }
            Node::Call(call) => out.append(&mut call.args),
            Node::Invoke(invocation) => out.append(&mut invocation.args),
        }
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        if self.is_leaf() {
            return;
        }
        let mut pending = Vec::new();
        self.take_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.take_children(&mut pending);
        }
    }
}

impl Clone for Node {
    fn clone(&self) -> Self {
        ensure_sufficient_stack(|| match self {
            Node::Constant { value, ty } => Node::Constant {
                value: value.clone(),
                ty: ty.clone(),
            },
            Node::Variable { name, ty } => Node::Variable {
                name: name.clone(),
                ty: ty.clone(),
            },
            Node::Unary { op, operand } => Node::Unary {
                op: *op,
                operand: operand.clone(),
            },
            Node::Binary { op, left, right } => Node::Binary {
                op: *op,
                left: left.clone(),
                right: right.clone(),
            },
            Node::Conditional {
                condition,
                then_branch,
                else_branch,
            } => Node::Conditional {
                condition: condition.clone(),
                then_branch: then_branch.clone(),
                else_branch: else_branch.clone(),
            },
            Node::Slice {
                subject,
                start,
                end,
            } => Node::Slice {
                subject: subject.clone(),
                start: start.clone(),
                end: end.clone(),
            },
            Node::Comprehension(c) => Node::Comprehension(c.clone()),
            Node::Call(call) => Node::Call(call.clone()),
            Node::Invoke(invocation) => Node::Invoke(invocation.clone()),
        })
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        ensure_sufficient_stack(|| match (self, other) {
            (
                Node::Constant { value, ty },
                Node::Constant {
                    value: other_value,
                    ty: other_ty,
                },
            ) => value == other_value && ty == other_ty,
            (
                Node::Variable { name, ty },
                Node::Variable {
                    name: other_name,
                    ty: other_ty,
                },
            ) => name == other_name && ty == other_ty,
            (
                Node::Unary { op, operand },
                Node::Unary {
                    op: other_op,
                    operand: other_operand,
                },
            ) => op == other_op && operand == other_operand,
            (
                Node::Binary { op, left, right },
                Node::Binary {
                    op: other_op,
                    left: other_left,
                    right: other_right,
                },
            ) => op == other_op && left == other_left && right == other_right,
            (
                Node::Conditional {
                    condition,
                    then_branch,
                    else_branch,
                },
                Node::Conditional {
                    condition: other_condition,
                    then_branch: other_then,
                    else_branch: other_else,
                },
            ) => {
                condition == other_condition
                    && then_branch == other_then
                    && else_branch == other_else
            }
            (
                Node::Slice {
                    subject,
                    start,
                    end,
                },
                Node::Slice {
                    subject: other_subject,
                    start: other_start,
                    end: other_end,
                },
            ) => subject == other_subject && start == other_start && end == other_end,
            (Node::Comprehension(a), Node::Comprehension(b)) => a == b,
            (Node::Call(a), Node::Call(b)) => a == b,
            (Node::Invoke(a), Node::Invoke(b)) => a == b,
            _ => false,
        })
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| match self {
            Node::Constant { value, ty } => f
                .debug_struct("Constant")
                .field("value", value)
                .field("ty", ty)
                .finish(),
            Node::Variable { name, ty } => f
                .debug_struct("Variable")
                .field("name", name)
                .field("ty", ty)
                .finish(),
            Node::Unary { op, operand } => f
                .debug_struct("Unary")
                .field("op", op)
                .field("operand", operand)
                .finish(),
            Node::Binary { op, left, right } => f
                .debug_struct("Binary")
                .field("op", op)
                .field("left", left)
                .field("right", right)
                .finish(),
            Node::Conditional {
                condition,
                then_branch,
                else_branch,
            } => f
                .debug_struct("Conditional")
                .field("condition", condition)
                .field("then_branch", then_branch)
                .field("else_branch", else_branch)
                .finish(),
            Node::Slice {
                subject,
                start,
                end,
            } => f
                .debug_struct("Slice")
                .field("subject", subject)
                .field("start", start)
                .field("end", end)
                .finish(),
            Node::Comprehension(c) => f.debug_tuple("Comprehension").field(c).finish(),
            Node::Call(call) => f.debug_tuple("Call").field(call).finish(),
            Node::Invoke(invocation) => f.debug_tuple("Invoke").field(invocation).finish(),
        })
    }
}

/// `[body for variable in source if filter]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Comprehension {
    pub(crate) body: Node,
    pub(crate) variable: Name,
    pub(crate) source: Node,
    pub(crate) filter: Option<Node>,
}

impl Comprehension {
    #[inline]
    pub fn body(&self) -> &Node {
        &self.body
    }

    #[inline]
    pub fn variable(&self) -> &Name {
        &self.variable
    }

    #[inline]
    pub fn source(&self) -> &Node {
        &self.source
    }

    #[inline]
    pub fn filter(&self) -> Option<&Node> {
        self.filter.as_ref()
    }
}

/// Built-in call whose argument count was accepted at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionCall {
    pub(crate) function: Function,
    pub(crate) args: Vec<Node>,
}

impl FunctionCall {
    #[inline]
    pub fn function(&self) -> Function {
        self.function
    }

    #[inline]
    pub fn args(&self) -> &[Node] {
        &self.args
    }
}

/// Call of an environment function, with the signature seen at construction.
///
/// The definition itself is looked up again at evaluation time, so one tree
/// can run against different hosts that agree on the signature.
#[derive(Clone, Debug, PartialEq)]
pub struct Invocation {
    pub(crate) signature: Signature,
    pub(crate) args: Vec<Node>,
}

impl Invocation {
    #[inline]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    #[inline]
    pub fn args(&self) -> &[Node] {
        &self.args
    }
}

// Construction

impl Node {
    pub fn int(n: i64) -> Node {
        Node::Constant {
            value: Value::Int(n),
            ty: Type::Int,
        }
    }

    pub fn float(x: f64) -> Node {
        Node::Constant {
            value: Value::Float(x),
            ty: Type::Float,
        }
    }

    pub fn boolean(b: bool) -> Node {
        Node::Constant {
            value: Value::Bool(b),
            ty: Type::Bool,
        }
    }

    pub fn string(s: impl Into<String>) -> Node {
        Node::Constant {
            value: Value::Str(s.into()),
            ty: Type::Str,
        }
    }

    pub fn color(c: Color) -> Node {
        Node::Constant {
            value: Value::Color(c),
            ty: Type::Color,
        }
    }

    pub fn enum_member(member: EnumValue) -> Node {
        let ty = Type::Enum(member.enum_type().clone());
        Node::Constant {
            value: Value::Enum(member),
            ty,
        }
    }

    /// `null` of static type `ty`.
    pub fn null(ty: Type) -> Node {
        Node::Constant {
            value: Value::Null,
            ty,
        }
    }

    /// Literal `value` of static type `ty`. Integers widen into `float`
    /// positions; anything else that does not conform is a processing error.
    pub fn literal(value: Value, ty: Type) -> Result<Node, EvalError> {
        match value.clone().coerce_to(&ty) {
            Some(value) => Ok(Node::Constant { value, ty }),
            None => Err(processing_error(format!(
                "literal {value} does not conform to `{ty}`"
            ))),
        }
    }

    pub fn variable(name: impl Into<Name>, ty: Type) -> Node {
        Node::Variable {
            name: name.into(),
            ty,
        }
    }

    /// Variable typed by `env`. Unbound names fail with `UndefinedVariable`.
    pub fn resolve_variable(env: &dyn Environment, name: &str) -> Result<Node, EvalError> {
        let ty = env.lookup_type(name)?;
        Ok(Node::variable(name, ty))
    }

    pub fn unary(op: UnaryOp, operand: Node) -> Node {
        Node::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinaryOp, left: Node, right: Node) -> Node {
        Node::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `subject[index]`
    pub fn index(subject: Node, index: Node) -> Node {
        Node::binary(BinaryOp::Index, subject, index)
    }

    pub fn conditional(condition: Node, then_branch: Node, else_branch: Node) -> Node {
        Node::Conditional {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }
    }

    pub fn slice(subject: Node, start: Option<Node>, end: Option<Node>) -> Node {
        Node::Slice {
            subject: Box::new(subject),
            start: start.map(Box::new),
            end: end.map(Box::new),
        }
    }

    /// Built-in call. Fails with a syntax error when `function` does not
    /// accept `args.len()` arguments (e.g. `color` with two).
    pub fn call(function: Function, args: Vec<Node>) -> Result<Node, EvalError> {
        function.check_arity(args.len())?;
        Ok(Node::Call(FunctionCall { function, args }))
    }

    /// Built-in call by name.
    pub fn call_named(name: &str, args: Vec<Node>) -> Result<Node, EvalError> {
        let function = Function::from_name(name).ok_or_else(|| unknown_function(name))?;
        Node::call(function, args)
    }

    /// Environment function call. The argument count must match the
    /// signature exactly.
    pub fn invoke(signature: Signature, args: Vec<Node>) -> Result<Node, EvalError> {
        let expected = signature.params.len();
        if args.len() != expected {
            let noun = if expected == 1 { "argument" } else { "arguments" };
            return Err(arity_mismatch(
                &signature.name,
                format!("{expected} {noun}"),
                args.len(),
            ));
        }
        Ok(Node::Invoke(Invocation { signature, args }))
    }

    /// Built-ins win over environment functions of the same name.
    pub fn resolve_call(
        env: &dyn Environment,
        name: &str,
        args: Vec<Node>,
    ) -> Result<Node, EvalError> {
        if let Some(function) = Function::from_name(name) {
            return Node::call(function, args);
        }
        match env.function(name) {
            Some(definition) => Node::invoke(definition.signature().clone(), args),
            None => Err(unknown_function(name)),
        }
    }

    pub fn comprehension(
        body: Node,
        variable: impl Into<Name>,
        source: Node,
        filter: Option<Node>,
    ) -> Node {
        Node::Comprehension(Box::new(Comprehension {
            body,
            variable: variable.into(),
            source,
            filter,
        }))
    }
}

/// Opening half of a comprehension as the parser first sees it:
/// `body for variable in source`.
#[derive(Clone, Debug, PartialEq)]
pub struct ComprehensionFor {
    body: Node,
    variable: Name,
    source: Node,
}

impl ComprehensionFor {
    pub fn new(body: Node, variable: impl Into<Name>, source: Node) -> Self {
        ComprehensionFor {
            body,
            variable: variable.into(),
            source,
        }
    }

    #[inline]
    pub fn variable(&self) -> &Name {
        &self.variable
    }

    /// Finish a comprehension that has no filter.
    pub fn build(self) -> Node {
        Node::comprehension(self.body, self.variable, self.source, None)
    }
}

/// Filter half of a comprehension, `if condition`.
///
/// The parser creates it before it knows the loop variable and links it to
/// its opening with [`assign_opening`](Self::assign_opening).
#[derive(Clone, Debug, PartialEq)]
pub struct ComprehensionIf {
    condition: Node,
    variable: Option<Name>,
}

impl ComprehensionIf {
    pub fn new(condition: Node) -> Self {
        ComprehensionIf {
            condition,
            variable: None,
        }
    }

    /// Copy the loop variable from `opening`.
    pub fn assign_opening(&mut self, opening: &ComprehensionFor) {
        self.variable = Some(opening.variable.clone());
    }

    #[inline]
    pub fn is_linked(&self) -> bool {
        self.variable.is_some()
    }

    /// Combine both halves.
    ///
    /// Fails with a processing error if the filter was never linked or was
    /// linked to a different opening.
    pub fn link(self, opening: ComprehensionFor) -> Result<Node, EvalError> {
        let Some(variable) = self.variable else {
            return Err(unlinked_comprehension());
        };
        if variable != opening.variable {
            return Err(processing_error(format!(
                "comprehension filter bound to `{variable}` but its opening binds `{}`",
                opening.variable
            )));
        }
        Ok(Node::comprehension(
            opening.body,
            variable,
            opening.source,
            Some(self.condition),
        ))
    }
}

// Queries

impl Node {
    /// Evaluate against `env` with default limits.
    pub fn evaluate(&self, env: &dyn Environment) -> EvalResult {
        self.evaluate_with(env, &EvalConfig::default())
    }

    #[tracing::instrument(level = "trace", skip_all)]
    pub fn evaluate_with(&self, env: &dyn Environment, config: &EvalConfig) -> EvalResult {
        Evaluator::new(env, config).eval(self)
    }

    /// Direct children, left to right.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Constant { .. } | Node::Variable { .. } => Vec::new(),
            Node::Unary { operand, .. } => vec![&**operand],
            Node::Binary { left, right, .. } => vec![&**left, &**right],
            Node::Conditional {
                condition,
                then_branch,
                else_branch,
            } => vec![&**condition, &**then_branch, &**else_branch],
            Node::Slice {
                subject,
                start,
                end,
            } => std::iter::once(&**subject)
                .chain(start.as_deref())
                .chain(end.as_deref())
                .collect(),
            Node::Comprehension(c) => std::iter::once(&c.body)
                .chain(std::iter::once(&c.source))
                .chain(c.filter.as_ref())
                .collect(),
            Node::Call(call) => call.args.iter().collect(),
            Node::Invoke(invocation) => invocation.args.iter().collect(),
        }
    }

    /// Free variables. A comprehension's loop variable is bound inside its
    /// body and filter and does not appear unless it is also used freely
    /// elsewhere.
    pub fn variables(&self) -> FxHashSet<Name> {
        let mut free = FxHashSet::default();
        self.collect_variables(&mut Vec::new(), &mut free);
        free
    }

    fn collect_variables(&self, bound: &mut Vec<Name>, free: &mut FxHashSet<Name>) {
        ensure_sufficient_stack(|| match self {
            Node::Variable { name, .. } => {
                if !bound.contains(name) {
                    free.insert(name.clone());
                }
            }
            Node::Comprehension(c) => {
                c.source.collect_variables(bound, free);
                bound.push(c.variable.clone());
                c.body.collect_variables(bound, free);
                if let Some(filter) = &c.filter {
                    filter.collect_variables(bound, free);
                }
                bound.pop();
            }
            other => {
                for child in other.children() {
                    child.collect_variables(bound, free);
                }
            }
        });
    }

    /// Whether the node can be folded: it reads no free variable and calls
    /// no environment function.
    pub fn is_constant(&self) -> bool {
        self.is_closed(&mut Vec::new())
    }

    fn is_closed(&self, bound: &mut Vec<Name>) -> bool {
        ensure_sufficient_stack(|| match self {
            Node::Constant { .. } => true,
            Node::Variable { name, .. } => bound.contains(name),
            Node::Invoke(_) => false,
            Node::Comprehension(c) => {
                if !c.source.is_closed(bound) {
                    return false;
                }
                bound.push(c.variable.clone());
                let closed = c.body.is_closed(bound)
                    && c.filter.as_ref().map_or(true, |filter| filter.is_closed(bound));
                bound.pop();
                closed
            }
            other => other.children().into_iter().all(|child| child.is_closed(bound)),
        })
    }

    /// Binding strength when rendered. Negative numeric literals render with
    /// a leading `-` and bind like a prefix operator.
    pub fn precedence(&self) -> u8 {
        match self {
            Node::Constant {
                value: Value::Int(n),
                ..
            } if *n < 0 => prec::PREFIX,
            Node::Constant {
                value: Value::Float(x),
                ..
            } if x.is_sign_negative() => prec::PREFIX,
            Node::Unary { op, .. } => op.precedence(),
            Node::Binary { op, .. } => op.precedence(),
            Node::Conditional { .. } => TernaryOp::Conditional.precedence(),
            Node::Slice { .. } => TernaryOp::Slice.precedence(),
            Node::Constant { .. }
            | Node::Variable { .. }
            | Node::Comprehension(_)
            | Node::Call(_)
            | Node::Invoke(_) => prec::ATOM,
        }
    }

    /// Advisory operand visitation order for binary and ternary nodes, as a
    /// permutation of child indices. Evaluation does not consult it.
    pub fn calculation_order(&self) -> Option<Vec<usize>> {
        match self {
            Node::Binary { op, .. } => Some(op.calculation_order().to_vec()),
            Node::Conditional { .. } => Some(TernaryOp::Conditional.calculation_order().to_vec()),
            Node::Slice { .. } => Some(TernaryOp::Slice.calculation_order().to_vec()),
            _ => None,
        }
    }
}
