//! Text rendering.
//!
//! `Display` for [`Node`] produces parseable source text. A child is wrapped
//! in parentheses only when printing it bare would parse differently:
//!
//! - its precedence is lower than its parent's (`(a + b) * c`)
//! - it sits on the non-associative side of an operator of equal precedence
//!   (`a - (b - c)`, `(a ?? b) ?? c`)
//! - a negation would otherwise print as `--`
//!
//! Literals render as expressions that evaluate back to them: floats always
//! carry a decimal point, strings are quoted and escaped, colors and tuples
//! render as calls, enum members as `Type.MEMBER`.

use std::fmt::{self, Write};

use cardex_ir::{prec, Associativity, BinaryOp, TernaryOp, UnaryOp};
use cardex_stack::ensure_sufficient_stack;
use cardex_values::Value;

use crate::node::Node;

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| self.render(f))
    }
}

impl Node {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Constant { value, .. } => write_literal(f, value),
            Node::Variable { name, .. } => f.write_str(name),
            Node::Unary { op, operand } => {
                f.write_str(op.as_symbol())?;
                let inner = operand.to_string();
                let doubled = *op == UnaryOp::Neg && inner.starts_with('-');
                if operand.precedence() < op.precedence() || doubled {
                    write!(f, "({inner})")
                } else {
                    f.write_str(&inner)
                }
            }
            Node::Binary {
                op: BinaryOp::Index,
                left,
                right,
            } => {
                write_child(f, left, left.precedence() < prec::POSTFIX)?;
                write!(f, "[{right}]")
            }
            Node::Binary { op, left, right } => {
                let (parent, assoc) = (op.precedence(), op.associativity());
                let (lp, rp) = (left.precedence(), right.precedence());
                write_child(
                    f,
                    left,
                    lp < parent || (lp == parent && assoc == Associativity::Right),
                )?;
                write!(f, " {} ", op.as_symbol())?;
                write_child(
                    f,
                    right,
                    rp < parent || (rp == parent && assoc == Associativity::Left),
                )
            }
            Node::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                let level = TernaryOp::Conditional.precedence();
                write_child(f, condition, condition.precedence() <= level)?;
                f.write_str(" ? ")?;
                write_child(f, then_branch, then_branch.precedence() <= level)?;
                f.write_str(" : ")?;
                write_child(f, else_branch, else_branch.precedence() < level)
            }
            Node::Slice {
                subject,
                start,
                end,
            } => {
                write_child(f, subject, subject.precedence() < prec::POSTFIX)?;
                f.write_char('[')?;
                if let Some(start) = start {
                    write!(f, "{start}")?;
                }
                f.write_char(':')?;
                if let Some(end) = end {
                    write!(f, "{end}")?;
                }
                f.write_char(']')
            }
            Node::Comprehension(c) => {
                let loose = |node: &Node| node.precedence() <= prec::CONDITIONAL;
                f.write_char('[')?;
                write_child(f, c.body(), loose(c.body()))?;
                write!(f, " for {} in ", c.variable())?;
                write_child(f, c.source(), loose(c.source()))?;
                if let Some(filter) = c.filter() {
                    f.write_str(" if ")?;
                    write_child(f, filter, loose(filter))?;
                }
                f.write_char(']')
            }
            Node::Call(call) => write_call(f, call.function().name(), call.args()),
            Node::Invoke(invocation) => {
                write_call(f, &invocation.signature().name, invocation.args())
            }
        }
    }
}

fn write_child(f: &mut fmt::Formatter<'_>, child: &Node, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({child})")
    } else {
        write!(f, "{child}")
    }
}

fn write_call(f: &mut fmt::Formatter<'_>, name: &str, args: &[Node]) -> fmt::Result {
    write!(f, "{name}(")?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{arg}")?;
    }
    f.write_char(')')
}

fn write_literal(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Null => f.write_str("null"),
        Value::Int(n) => write!(f, "{n}"),
        Value::Float(x) => write_float(f, *x),
        Value::Bool(b) => write!(f, "{b}"),
        Value::Str(s) => write_string(f, s),
        Value::Color(c) => write!(f, "color(\"{c}\")"),
        Value::Enum(e) => write!(f, "{}.{}", e.enum_type().name(), e.member()),
        Value::Array(items) => {
            f.write_char('[')?;
            write_literals(f, items)?;
            f.write_char(']')
        }
        Value::Tuple(items) => {
            f.write_str("tuple(")?;
            write_literals(f, items)?;
            f.write_char(')')
        }
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    // `{:?}` keeps the decimal point (`1.0`, not `1`) except in exponent
    // form, where it prints `1e308`.
    let text = format!("{x:?}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !mantissa.contains('.') => {
            write!(f, "{mantissa}.0e{exponent}")
        }
        _ => f.write_str(&text),
    }
}

/// Double-quoted, escaping only `"`, `\`, newline and tab.
fn write_string(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\""),
            '\\' => f.write_str("\\\\"),
            '\n' => f.write_str("\\n"),
            '\t' => f.write_str("\\t"),
            c => f.write_char(c),
        }?;
    }
    f.write_char('"')
}

fn write_literals(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_literal(f, item)?;
    }
    Ok(())
}
