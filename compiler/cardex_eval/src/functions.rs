//! Built-in function library.
//!
//! Every built-in is a [`Function`] variant. A variant knows its source
//! name, which argument counts it accepts, how to type-check its arguments
//! and how to compute its result from evaluated arguments.
//!
//! `exists` and `try` are the two built-ins whose arguments are evaluated
//! lazily; the evaluator handles the error matching for them and only falls
//! back to [`Function::call`] for the value-level part.

mod casts;
mod collections;
pub(crate) mod format;
mod math;
mod random;
mod strings;

use std::fmt;

use cardex_types::{
    comparable_for_equality, conditional_result, find_common_numeric_type, unify_elements, Type,
    TypeError,
};
use cardex_values::{arity_mismatch, invalid_value, EvalError, EvalResult, Value};

/// Argument counts a function accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Arity {
    Fixed(usize),
    /// `min..=max`, unbounded when `max` is `None`.
    Range { min: usize, max: Option<usize> },
    /// Exactly one of the listed counts.
    OneOf(&'static [usize]),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Fixed(n) => count == n,
            Arity::Range { min, max } => match max {
                Some(max) => (min..=max).contains(&count),
                None => count >= min,
            },
            Arity::OneOf(counts) => counts.contains(&count),
        }
    }

    /// Human-readable form used in arity errors, e.g. `1, 3 or 4 arguments`.
    pub fn describe(self) -> String {
        fn plural(n: usize) -> &'static str {
            if n == 1 {
                "argument"
            } else {
                "arguments"
            }
        }
        match self {
            Arity::Fixed(n) => format!("{n} {}", plural(n)),
            Arity::Range { min, max: None } => format!("at least {min} {}", plural(min)),
            Arity::Range {
                min,
                max: Some(max),
            } => format!("{min} to {max} arguments"),
            Arity::OneOf(counts) => match counts {
                [] => "no arguments".to_string(),
                [only] => format!("{only} {}", plural(*only)),
                [init @ .., last] => {
                    let init: Vec<String> = init.iter().map(ToString::to_string).collect();
                    format!("{} or {last} arguments", init.join(", "))
                }
            },
        }
    }
}

/// A built-in function.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Function {
    // Casts
    Int,
    Float,
    Bool,
    Str,
    Color,

    // Arrays and tuples
    Array,
    Tuple,
    Len,
    Contains,
    All,
    Any,
    Sort,
    Reverse,
    Range,

    // Math
    Min,
    Max,
    Sum,
    Abs,
    Round,
    Floor,
    Ceil,
    Sqrt,
    Pow,
    Exp,
    Log,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Sinh,
    Cosh,
    Tanh,
    Lerp,
    Clamp,

    // Strings
    Join,
    Split,
    Format,
    Upper,
    Lower,
    Trim,
    Replace,

    // Other
    Random,
    Exists,
    Try,
}

impl Function {
    pub const ALL: &'static [Function] = &[
        Function::Int,
        Function::Float,
        Function::Bool,
        Function::Str,
        Function::Color,
        Function::Array,
        Function::Tuple,
        Function::Len,
        Function::Contains,
        Function::All,
        Function::Any,
        Function::Sort,
        Function::Reverse,
        Function::Range,
        Function::Min,
        Function::Max,
        Function::Sum,
        Function::Abs,
        Function::Round,
        Function::Floor,
        Function::Ceil,
        Function::Sqrt,
        Function::Pow,
        Function::Exp,
        Function::Log,
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Asin,
        Function::Acos,
        Function::Atan,
        Function::Atan2,
        Function::Sinh,
        Function::Cosh,
        Function::Tanh,
        Function::Lerp,
        Function::Clamp,
        Function::Join,
        Function::Split,
        Function::Format,
        Function::Upper,
        Function::Lower,
        Function::Trim,
        Function::Replace,
        Function::Random,
        Function::Exists,
        Function::Try,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Function::Int => "int",
            Function::Float => "float",
            Function::Bool => "bool",
            Function::Str => "str",
            Function::Color => "color",
            Function::Array => "array",
            Function::Tuple => "tuple",
            Function::Len => "len",
            Function::Contains => "contains",
            Function::All => "all",
            Function::Any => "any",
            Function::Sort => "sort",
            Function::Reverse => "reverse",
            Function::Range => "range",
            Function::Min => "min",
            Function::Max => "max",
            Function::Sum => "sum",
            Function::Abs => "abs",
            Function::Round => "round",
            Function::Floor => "floor",
            Function::Ceil => "ceil",
            Function::Sqrt => "sqrt",
            Function::Pow => "pow",
            Function::Exp => "exp",
            Function::Log => "log",
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Atan2 => "atan2",
            Function::Sinh => "sinh",
            Function::Cosh => "cosh",
            Function::Tanh => "tanh",
            Function::Lerp => "lerp",
            Function::Clamp => "clamp",
            Function::Join => "join",
            Function::Split => "split",
            Function::Format => "format",
            Function::Upper => "upper",
            Function::Lower => "lower",
            Function::Trim => "trim",
            Function::Replace => "replace",
            Function::Random => "random",
            Function::Exists => "exists",
            Function::Try => "try",
        }
    }

    /// Built-in called `name`, matched exactly.
    pub fn from_name(name: &str) -> Option<Function> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }

    pub const fn arity(self) -> Arity {
        match self {
            Function::Color => Arity::OneOf(&[1, 3, 4]),
            Function::Array | Function::Tuple => Arity::Range { min: 0, max: None },
            Function::Min | Function::Max | Function::Sum | Function::Format => {
                Arity::Range { min: 1, max: None }
            }
            Function::Sort | Function::Range => Arity::Range {
                min: 1,
                max: Some(2),
            },
            Function::Contains
            | Function::Pow
            | Function::Atan2
            | Function::Join
            | Function::Split
            | Function::Try => Arity::Fixed(2),
            Function::Lerp | Function::Clamp | Function::Replace => Arity::Fixed(3),
            Function::Int
            | Function::Float
            | Function::Bool
            | Function::Str
            | Function::Len
            | Function::All
            | Function::Any
            | Function::Reverse
            | Function::Abs
            | Function::Round
            | Function::Floor
            | Function::Ceil
            | Function::Sqrt
            | Function::Exp
            | Function::Log
            | Function::Sin
            | Function::Cos
            | Function::Tan
            | Function::Asin
            | Function::Acos
            | Function::Atan
            | Function::Sinh
            | Function::Cosh
            | Function::Tanh
            | Function::Upper
            | Function::Lower
            | Function::Trim
            | Function::Random
            | Function::Exists => Arity::Fixed(1),
        }
    }

    /// Fail with a syntax error unless `count` arguments are accepted.
    pub fn check_arity(self, count: usize) -> Result<(), EvalError> {
        if self.arity().accepts(count) {
            Ok(())
        } else {
            Err(arity_mismatch(self.name(), self.arity().describe(), count))
        }
    }

    /// Static result type for arguments of the given types.
    pub fn return_type(self, args: &[Type]) -> Result<Type, TypeError> {
        let check = ArgCheck { function: self };
        match (self, args) {
            (Function::Int, [arg]) => {
                check.scalar(1, arg, false)?;
                Ok(Type::Int)
            }
            (Function::Float, [arg]) => {
                check.scalar(1, arg, false)?;
                Ok(Type::Float)
            }
            (Function::Bool, [arg]) => {
                check.scalar(1, arg, false)?;
                Ok(Type::Bool)
            }
            (Function::Str, [arg]) => {
                check.scalar(1, arg, true)?;
                Ok(Type::Str)
            }
            (Function::Color, [arg]) => {
                if !matches!(arg, Type::Str | Type::Color) {
                    return Err(check.invalid(1, "a hex string or color", arg));
                }
                Ok(Type::Color)
            }
            (Function::Color, channels) => {
                for (i, channel) in channels.iter().enumerate() {
                    check.real(i + 1, channel)?;
                }
                Ok(Type::Color)
            }
            (Function::Array, items) => Ok(Type::array(unify_elements("array", items)?)),
            (Function::Tuple, items) => {
                Ok(Type::tuple(unify_elements("tuple", items)?, items.len()))
            }
            (Function::Len, [arg]) => {
                if !(matches!(arg, Type::Str) || arg.is_sequence()) {
                    return Err(check.invalid(1, "a string, array or tuple", arg));
                }
                Ok(Type::Int)
            }
            (Function::Contains, [haystack, needle]) => {
                match haystack {
                    Type::Str => ArgCheck::exact(&Type::Str, needle)?,
                    Type::Array(element) | Type::Tuple(element, _) => {
                        if !comparable_for_equality(element, needle) {
                            return Err(TypeError::Mismatch {
                                expected: (**element).clone(),
                                found: needle.clone(),
                            });
                        }
                    }
                    _ => return Err(check.invalid(1, "a string, array or tuple", haystack)),
                }
                Ok(Type::Bool)
            }
            (Function::All | Function::Any, [arg]) => {
                if arg.element_type() != Some(&Type::Bool) {
                    return Err(check.invalid(1, "an array of bool", arg));
                }
                Ok(Type::Bool)
            }
            (Function::Sort, [values, rest @ ..]) => {
                let element = check.sequence(values)?;
                let key = match rest {
                    [keys] => check.sequence(keys)?,
                    _ => element,
                };
                if !key.is_ordered() {
                    return Err(TypeError::Unordered {
                        context: "sort",
                        element: key.clone(),
                    });
                }
                Ok(values.clone())
            }
            (Function::Reverse, [arg]) => {
                if !(matches!(arg, Type::Str) || arg.is_sequence()) {
                    return Err(check.invalid(1, "a string, array or tuple", arg));
                }
                Ok(arg.clone())
            }
            (Function::Range, bounds) => {
                for bound in bounds {
                    ArgCheck::exact(&Type::Int, bound)?;
                }
                Ok(Type::array(Type::Int))
            }
            (Function::Min | Function::Max | Function::Sum, [single]) if single.is_sequence() => {
                let element = check.sequence(single)?;
                find_common_numeric_type(std::slice::from_ref(element))
            }
            (Function::Min | Function::Max | Function::Sum | Function::Clamp, operands) => {
                find_common_numeric_type(operands)
            }
            (Function::Abs, [arg]) => {
                check.real(1, arg)?;
                Ok(arg.clone())
            }
            (Function::Round | Function::Floor | Function::Ceil, [arg]) => {
                check.real(1, arg)?;
                Ok(Type::Int)
            }
            (
                Function::Sqrt
                | Function::Exp
                | Function::Log
                | Function::Sin
                | Function::Cos
                | Function::Tan
                | Function::Asin
                | Function::Acos
                | Function::Atan
                | Function::Sinh
                | Function::Cosh
                | Function::Tanh
                | Function::Pow
                | Function::Atan2
                | Function::Lerp
                | Function::Random,
                operands,
            ) => {
                for (i, operand) in operands.iter().enumerate() {
                    check.real(i + 1, operand)?;
                }
                Ok(Type::Float)
            }
            (Function::Join, [separator, items]) => {
                ArgCheck::exact(&Type::Str, separator)?;
                check.sequence(items)?;
                Ok(Type::Str)
            }
            (Function::Split, [text, delimiter]) => {
                ArgCheck::exact(&Type::Str, text)?;
                ArgCheck::exact(&Type::Str, delimiter)?;
                Ok(Type::array(Type::Str))
            }
            (Function::Format, [pattern, ..]) => {
                ArgCheck::exact(&Type::Str, pattern)?;
                Ok(Type::Str)
            }
            (Function::Upper | Function::Lower | Function::Trim | Function::Replace, texts) => {
                for text in texts {
                    ArgCheck::exact(&Type::Str, text)?;
                }
                Ok(Type::Str)
            }
            (Function::Exists, [_]) => Ok(Type::Bool),
            (Function::Try, [value, fallback]) => conditional_result(value, fallback),
            (function, args) => Err(TypeError::ArgumentCount {
                function: function.name().to_string(),
                count: args.len(),
            }),
        }
    }

    /// Apply the function to evaluated arguments.
    ///
    /// For `exists` and `try` this is the value-level part only: `exists` is
    /// `false` for `null`, `try` returns its first argument.
    pub fn call(self, args: Vec<Value>) -> EvalResult {
        tracing::trace!(function = self.name(), argc = args.len(), "call");
        match self {
            Function::Int => {
                let [value] = self.unpack(args)?;
                casts::to_int(value)
            }
            Function::Float => {
                let [value] = self.unpack(args)?;
                casts::to_float(value)
            }
            Function::Bool => {
                let [value] = self.unpack(args)?;
                casts::to_bool(value)
            }
            Function::Str => {
                let [value] = self.unpack(args)?;
                casts::to_str(value)
            }
            Function::Color => casts::to_color(args),
            Function::Array => Ok(collections::make_sequence(args, false)),
            Function::Tuple => Ok(collections::make_sequence(args, true)),
            Function::Len => {
                let [value] = self.unpack(args)?;
                collections::len(&value)
            }
            Function::Contains => {
                let [haystack, needle] = self.unpack(args)?;
                collections::contains(&haystack, &needle)
            }
            Function::All => {
                let [values] = self.unpack(args)?;
                collections::all(&values)
            }
            Function::Any => {
                let [values] = self.unpack(args)?;
                collections::any(&values)
            }
            Function::Sort => {
                self.check_arity(args.len())?;
                let mut args = args.into_iter();
                match args.next() {
                    Some(values) => collections::sort(values, args.next()),
                    None => Err(arity_mismatch(self.name(), self.arity().describe(), 0)),
                }
            }
            Function::Reverse => {
                let [value] = self.unpack(args)?;
                collections::reverse(value)
            }
            Function::Range => match args.as_slice() {
                [end] => collections::range(&Value::Int(0), end),
                [start, end] => collections::range(start, end),
                _ => Err(arity_mismatch(self.name(), self.arity().describe(), args.len())),
            },
            Function::Min => math::min(args),
            Function::Max => math::max(args),
            Function::Sum => math::sum(args),
            Function::Abs => {
                let [value] = self.unpack(args)?;
                math::abs(&value)
            }
            Function::Round | Function::Floor | Function::Ceil => {
                let [value] = self.unpack(args)?;
                math::to_integral(self, &value)
            }
            Function::Sqrt
            | Function::Exp
            | Function::Log
            | Function::Sin
            | Function::Cos
            | Function::Tan
            | Function::Asin
            | Function::Acos
            | Function::Atan
            | Function::Sinh
            | Function::Cosh
            | Function::Tanh => {
                let [value] = self.unpack(args)?;
                math::unary(self, &value)
            }
            Function::Pow => {
                let [base, exponent] = self.unpack(args)?;
                math::pow(&base, &exponent)
            }
            Function::Atan2 => {
                let [y, x] = self.unpack(args)?;
                math::atan2(&y, &x)
            }
            Function::Lerp => {
                let [from, to, t] = self.unpack(args)?;
                math::lerp(&from, &to, &t)
            }
            Function::Clamp => {
                let [value, lo, hi] = self.unpack(args)?;
                math::clamp(&value, &lo, &hi)
            }
            Function::Join => {
                let [separator, items] = self.unpack(args)?;
                strings::join(&separator, &items)
            }
            Function::Split => {
                let [text, delimiter] = self.unpack(args)?;
                strings::split(&text, &delimiter)
            }
            Function::Format => match args.split_first() {
                Some((pattern, rest)) => format::format(pattern, rest),
                None => Err(arity_mismatch(self.name(), self.arity().describe(), 0)),
            },
            Function::Upper | Function::Lower | Function::Trim => {
                let [text] = self.unpack(args)?;
                strings::transform(self, &text)
            }
            Function::Replace => {
                let [text, from, to] = self.unpack(args)?;
                strings::replace(&text, &from, &to)
            }
            Function::Random => {
                let [seed] = self.unpack(args)?;
                random::random(&seed)
            }
            Function::Exists => {
                let [value] = self.unpack(args)?;
                Ok(Value::Bool(!value.is_null()))
            }
            Function::Try => {
                let [value, _fallback] = self.unpack(args)?;
                Ok(value)
            }
        }
    }

    fn unpack<const N: usize>(self, args: Vec<Value>) -> Result<[Value; N], EvalError> {
        <[Value; N]>::try_from(args)
            .map_err(|args| arity_mismatch(self.name(), self.arity().describe(), args.len()))
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Argument type checks that report the function and position on failure.
struct ArgCheck {
    function: Function,
}

impl ArgCheck {
    fn invalid(&self, position: usize, expected: &'static str, found: &Type) -> TypeError {
        TypeError::InvalidArgument {
            function: self.function.name().to_string(),
            position,
            expected,
            found: found.clone(),
        }
    }

    fn real(&self, position: usize, ty: &Type) -> Result<(), TypeError> {
        if ty.is_real() {
            Ok(())
        } else {
            Err(self.invalid(position, "a number", ty))
        }
    }

    fn exact(expected: &Type, ty: &Type) -> Result<(), TypeError> {
        if ty == expected {
            Ok(())
        } else {
            Err(TypeError::Mismatch {
                expected: expected.clone(),
                found: ty.clone(),
            })
        }
    }

    /// Number, bool or string (and enum when `allow_enum`).
    fn scalar(&self, position: usize, ty: &Type, allow_enum: bool) -> Result<(), TypeError> {
        let ok = matches!(ty, Type::Int | Type::Float | Type::Bool | Type::Str)
            || (allow_enum && ty.is_enum());
        if ok {
            Ok(())
        } else if allow_enum {
            Err(self.invalid(position, "a number, bool, string or enum", ty))
        } else {
            Err(self.invalid(position, "a number, bool or string", ty))
        }
    }

    fn sequence<'t>(&self, ty: &'t Type) -> Result<&'t Type, TypeError> {
        ty.element_type().ok_or_else(|| TypeError::NotSequence {
            context: self.function.name(),
            found: ty.clone(),
        })
    }
}

/// Float to int, rejecting NaN, infinities and values outside `i64`.
pub(crate) fn float_to_int(function: &'static str, value: f64) -> Result<i64, EvalError> {
    // -2^63 and 2^63 are exact in f64.
    const LOWER: f64 = -9_223_372_036_854_775_808.0;
    const UPPER: f64 = 9_223_372_036_854_775_808.0;
    if !value.is_finite() || value < LOWER || value >= UPPER {
        return Err(invalid_value(
            function,
            format!("{value} does not fit in an int"),
        ));
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "range checked above, callers pass integral values"
    )]
    Ok(value as i64)
}
