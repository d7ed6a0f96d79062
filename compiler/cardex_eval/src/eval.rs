//! Recursive tree evaluation.
//!
//! [`Evaluator`] walks a tree depth-first against one environment. It keeps
//! an explicit depth counter bounded by [`EvalConfig::max_depth`], and every
//! step also runs under `ensure_sufficient_stack`, so pathological nesting
//! fails with a `StackOverflow` calculation error instead of aborting.

use cardex_ir::BinaryOp;
use cardex_stack::ensure_sufficient_stack;
use cardex_types::Type;
use cardex_values::{
    invalid_operand, stack_overflow, undefined_function, EvalError, EvalResult, Value,
};

use crate::config::EvalConfig;
use crate::environment::{ComprehensionEnvironment, Environment};
use crate::functions::Function;
use crate::index::slice_value;
use crate::node::{Comprehension, FunctionCall, Invocation, Node};
use crate::operators::{evaluate_binary, evaluate_unary};

pub(crate) struct Evaluator<'a> {
    env: &'a dyn Environment,
    config: &'a EvalConfig,
    depth: usize,
}

impl<'a> Evaluator<'a> {
    pub(crate) fn new(env: &'a dyn Environment, config: &'a EvalConfig) -> Self {
        Evaluator {
            env,
            config,
            depth: 0,
        }
    }

    pub(crate) fn eval(&mut self, node: &Node) -> EvalResult {
        if self.depth >= self.config.max_depth {
            return Err(stack_overflow(self.config.max_depth));
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| self.eval_node(node));
        self.depth -= 1;
        result
    }

    fn eval_node(&mut self, node: &Node) -> EvalResult {
        match node {
            Node::Constant { value, .. } => Ok(value.clone()),
            Node::Variable { name, .. } => self.env.lookup(name),
            Node::Unary { op, operand } => {
                let operand = self.eval(operand)?;
                evaluate_unary(*op, operand)
            }
            Node::Binary { op, left, right } => self.eval_binary(*op, left, right),
            Node::Conditional {
                condition,
                then_branch,
                else_branch,
            } => match self.eval(condition)? {
                Value::Bool(true) => self.eval(then_branch),
                Value::Bool(false) => self.eval(else_branch),
                other => Err(invalid_operand("?:", &other)),
            },
            Node::Slice {
                subject,
                start,
                end,
            } => {
                let subject = self.eval(subject)?;
                let start = start.as_deref().map(|n| self.eval(n)).transpose()?;
                let end = end.as_deref().map(|n| self.eval(n)).transpose()?;
                slice_value(subject, start, end)
            }
            Node::Comprehension(c) => self.eval_comprehension(c),
            Node::Call(call) => self.eval_call(call),
            Node::Invoke(invocation) => self.eval_invoke(invocation),
        }
    }

    fn eval_binary(&mut self, op: BinaryOp, left: &Node, right: &Node) -> EvalResult {
        match op {
            BinaryOp::And | BinaryOp::Or => {
                let short_circuit = op == BinaryOp::Or;
                match self.eval(left)? {
                    Value::Bool(b) if b == short_circuit => Ok(Value::Bool(b)),
                    Value::Bool(_) => match self.eval(right)? {
                        Value::Bool(b) => Ok(Value::Bool(b)),
                        other => Err(invalid_operand(op.as_symbol(), &other)),
                    },
                    other => Err(invalid_operand(op.as_symbol(), &other)),
                }
            }
            BinaryOp::Coalesce => match self.eval(left) {
                Ok(value) if !value.is_null() => Ok(value),
                Ok(_) => {
                    tracing::debug!("`??` left operand is null, using fallback");
                    self.eval(right)
                }
                Err(err) if err.is_recoverable() => {
                    tracing::debug!(error = %err, "`??` left operand failed, using fallback");
                    self.eval(right)
                }
                Err(err) => Err(err),
            },
            _ => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                evaluate_binary(op, left, right)
            }
        }
    }

    /// One [`ComprehensionEnvironment`] per evaluation, rebound before each
    /// element; it never outlives this call.
    #[tracing::instrument(level = "trace", skip_all, fields(variable = %c.variable()))]
    fn eval_comprehension(&mut self, c: &Comprehension) -> EvalResult {
        let items = match self.eval(c.source())? {
            Value::Array(items) | Value::Tuple(items) => items,
            other => return Err(invalid_operand("for", &other)),
        };
        let mut scope = ComprehensionEnvironment::new(self.env, c.variable().clone());
        let mut results = Vec::with_capacity(items.len());
        for item in items {
            scope.set_loop_variable(item);
            let mut inner = Evaluator {
                env: &scope,
                config: self.config,
                depth: self.depth,
            };
            if let Some(filter) = c.filter() {
                match inner.eval(filter)? {
                    Value::Bool(true) => {}
                    Value::Bool(false) => {
                        tracing::trace!("element filtered out");
                        continue;
                    }
                    other => return Err(invalid_operand("if", &other)),
                }
            }
            results.push(inner.eval(c.body())?);
        }
        Ok(Value::Array(results))
    }

    fn eval_call(&mut self, call: &FunctionCall) -> EvalResult {
        match (call.function(), call.args()) {
            (Function::Exists, [operand]) => match self.eval(operand) {
                Ok(value) => Function::Exists.call(vec![value]),
                Err(err) if err.is_undefined_variable() => Ok(Value::Bool(false)),
                Err(err) => Err(err),
            },
            (Function::Try, [operand, fallback]) => match self.eval(operand) {
                Ok(value) => Ok(value),
                Err(err) if err.is_recoverable() => {
                    tracing::debug!(error = %err, "`try` operand failed, using fallback");
                    self.eval(fallback)
                }
                Err(err) => Err(err),
            },
            (function, args) => {
                let values = self.eval_args(args)?;
                function.call(values)
            }
        }
    }

    /// Arguments are widened to the signature's `float` parameters before the
    /// host function sees them.
    fn eval_invoke(&mut self, invocation: &Invocation) -> EvalResult {
        let signature = invocation.signature();
        let definition = self
            .env
            .function(&signature.name)
            .ok_or_else(|| undefined_function(&signature.name))?;
        let values = self.eval_args(invocation.args())?;
        let values: Vec<Value> = values
            .into_iter()
            .zip(&signature.params)
            .map(|(value, param)| {
                if *param == Type::Float && matches!(value, Value::Int(_)) {
                    value.as_real().map_or(value, Value::Float)
                } else {
                    value
                }
            })
            .collect();
        definition.call(&values)
    }

    fn eval_args(&mut self, args: &[Node]) -> Result<Vec<Value>, EvalError> {
        args.iter().map(|arg| self.eval(arg)).collect()
    }
}
