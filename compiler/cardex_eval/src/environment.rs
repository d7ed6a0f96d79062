//! Binding contexts expressions are evaluated against.
//!
//! An [`Environment`] is a read-only view: variables resolve to a value and a
//! static type, function names resolve to a [`FunctionDefinition`]. Template
//! hosts supply their own implementations; [`MapEnvironment`] is the simple
//! hash-map backed one.
//!
//! [`ComprehensionEnvironment`] layers exactly one loop variable over a
//! parent. It is created fresh by each comprehension evaluation and is the
//! only environment that changes while an expression runs.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use cardex_ir::Name;
use cardex_types::Type;
use cardex_values::{processing_error, undefined_variable, EvalError, EvalResult, Value};

/// Read contract between the evaluator and the host.
pub trait Environment {
    /// Current value of `name`.
    ///
    /// Unbound names must fail with an `UndefinedVariable` error so that
    /// `exists` and `try` can tell absence apart from other failures.
    fn lookup(&self, name: &str) -> EvalResult;

    /// Static type of `name`, used when building and type-checking trees.
    fn lookup_type(&self, name: &str) -> Result<Type, EvalError>;

    /// Host-defined function called `name`, if any.
    fn function(&self, name: &str) -> Option<Arc<dyn FunctionDefinition>>;

    /// Every bound variable name.
    fn names(&self) -> Vec<Name>;
}

/// Parameter and return types of a host-defined function.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    pub name: Name,
    pub params: Vec<Type>,
    pub returns: Type,
}

impl Signature {
    pub fn new(name: impl Into<Name>, params: Vec<Type>, returns: Type) -> Self {
        Signature {
            name: name.into(),
            params,
            returns,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        write!(f, ") -> {}", self.returns)
    }
}

/// A function provided by the environment rather than the built-in library.
///
/// Arguments arrive already evaluated and, when the tree type-checked,
/// conforming to [`Signature::params`] (`int` arguments for `float`
/// parameters are widened before the call).
pub trait FunctionDefinition: fmt::Debug + Send + Sync {
    fn signature(&self) -> &Signature;

    fn call(&self, args: &[Value]) -> EvalResult;
}

/// [`FunctionDefinition`] backed by a plain function pointer.
#[derive(Clone, Debug)]
pub struct NativeFunction {
    signature: Signature,
    func: fn(&[Value]) -> EvalResult,
}

impl NativeFunction {
    pub fn new(signature: Signature, func: fn(&[Value]) -> EvalResult) -> Self {
        NativeFunction { signature, func }
    }
}

impl FunctionDefinition for NativeFunction {
    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn call(&self, args: &[Value]) -> EvalResult {
        (self.func)(args)
    }
}

/// Environment with nothing bound. Constant folding evaluates against it.
#[derive(Copy, Clone, Debug, Default)]
pub struct EmptyEnvironment;

impl Environment for EmptyEnvironment {
    fn lookup(&self, name: &str) -> EvalResult {
        Err(undefined_variable(name))
    }

    fn lookup_type(&self, name: &str) -> Result<Type, EvalError> {
        Err(undefined_variable(name))
    }

    fn function(&self, _name: &str) -> Option<Arc<dyn FunctionDefinition>> {
        None
    }

    fn names(&self) -> Vec<Name> {
        Vec::new()
    }
}

/// Hash-map backed environment.
#[derive(Clone, Debug, Default)]
pub struct MapEnvironment {
    variables: FxHashMap<Name, (Type, Value)>,
    functions: FxHashMap<Name, Arc<dyn FunctionDefinition>>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value` of static type `ty`, replacing any previous
    /// binding.
    pub fn define(&mut self, name: impl Into<Name>, ty: Type, value: Value) {
        self.variables.insert(name.into(), (ty, value));
    }

    /// Builder form of [`define`](Self::define).
    #[must_use]
    pub fn with(mut self, name: impl Into<Name>, ty: Type, value: Value) -> Self {
        self.define(name, ty, value);
        self
    }

    /// Register a host function under its signature's name.
    pub fn define_function(&mut self, function: Arc<dyn FunctionDefinition>) {
        self.functions
            .insert(function.signature().name.clone(), function);
    }

    #[must_use]
    pub fn with_function(mut self, function: Arc<dyn FunctionDefinition>) -> Self {
        self.define_function(function);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.variables.remove(name).map(|(_, value)| value)
    }
}

impl Environment for MapEnvironment {
    fn lookup(&self, name: &str) -> EvalResult {
        self.variables
            .get(name)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| undefined_variable(name))
    }

    fn lookup_type(&self, name: &str) -> Result<Type, EvalError> {
        self.variables
            .get(name)
            .map(|(ty, _)| ty.clone())
            .ok_or_else(|| undefined_variable(name))
    }

    fn function(&self, name: &str) -> Option<Arc<dyn FunctionDefinition>> {
        self.functions.get(name).cloned()
    }

    fn names(&self) -> Vec<Name> {
        let mut names: Vec<Name> = self.variables.keys().cloned().collect();
        names.sort_unstable();
        names
    }
}

/// Scope of one comprehension evaluation: the loop variable over a parent.
///
/// Lookups of any other name go to the parent unchanged. The loop variable
/// shadows a parent binding of the same name.
pub struct ComprehensionEnvironment<'a> {
    parent: &'a dyn Environment,
    variable: Name,
    value: Option<Value>,
    loop_type: Option<Type>,
}

impl<'a> ComprehensionEnvironment<'a> {
    /// Scope with an untyped loop variable, bound later by
    /// [`set_loop_variable`](Self::set_loop_variable).
    pub fn new(parent: &'a dyn Environment, variable: Name) -> Self {
        ComprehensionEnvironment {
            parent,
            variable,
            value: None,
            loop_type: None,
        }
    }

    /// Scope whose loop variable has static type `loop_type`.
    pub fn typed(parent: &'a dyn Environment, variable: Name, loop_type: Type) -> Self {
        ComprehensionEnvironment {
            loop_type: Some(loop_type),
            ..Self::new(parent, variable)
        }
    }

    #[inline]
    pub fn variable(&self) -> &Name {
        &self.variable
    }

    /// Rebind the loop variable for the next iteration.
    pub fn set_loop_variable(&mut self, value: Value) {
        self.value = Some(value);
    }
}

impl Environment for ComprehensionEnvironment<'_> {
    fn lookup(&self, name: &str) -> EvalResult {
        if name != self.variable.as_str() {
            return self.parent.lookup(name);
        }
        self.value.clone().ok_or_else(|| {
            processing_error(format!("loop variable `{name}` read before it was bound"))
        })
    }

    fn lookup_type(&self, name: &str) -> Result<Type, EvalError> {
        if name != self.variable.as_str() {
            return self.parent.lookup_type(name);
        }
        self.loop_type
            .clone()
            .ok_or_else(|| processing_error(format!("loop variable `{name}` has no type")))
    }

    fn function(&self, name: &str) -> Option<Arc<dyn FunctionDefinition>> {
        self.parent.function(name)
    }

    fn names(&self) -> Vec<Name> {
        let mut names = self.parent.names();
        if !names.contains(&self.variable) {
            names.push(self.variable.clone());
        }
        names
    }
}

impl fmt::Debug for ComprehensionEnvironment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComprehensionEnvironment")
            .field("variable", &self.variable)
            .field("value", &self.value)
            .field("loop_type", &self.loop_type)
            .finish_non_exhaustive()
    }
}
