//! `format(pattern, args...)`.
//!
//! Templates write substitutions in brackets so that braces can appear as
//! plain text: `"[0] of [1]"`, `"{[0:0.0?]}"`. [`translate_format`] turns a
//! template pattern into composite form (`"{0} of {1}"`) and [`format`]
//! applies it.
//!
//! # Composite placeholders
//!
//! `{index[,alignment][:spec]}`
//!
//! - `alignment`: minimum width; positive pads on the left, negative on the
//!   right
//! - `spec`: one of the standard numeric specs below, or a custom pattern
//!   built from `0 # . , %` with optional literal text around it
//!
//! | spec | meaning | default precision |
//! |---|---|---|
//! | `F`n | fixed-point | 2 |
//! | `N`n | fixed-point with thousands separators | 2 |
//! | `D`n | integer, zero-padded to n digits | 0 |
//! | `P`n | percent (value × 100) | 2 |
//! | `X`n / `x`n | hexadecimal, zero-padded to n digits | 0 |
//! | `E`n / `e`n | scientific | 6 |
//!
//! Specs apply to numbers only; other values use their display form.

use cardex_values::{invalid_argument, invalid_format, EvalError, EvalResult, Value};

/// Rewrite the bracket dialect into composite format syntax.
///
/// - `[` opens a substitution and becomes `{`; `]` closes it and becomes `}`
/// - inside a substitution `?` becomes the digit placeholder `#`
/// - literal `{` and `}` are doubled
/// - `]` outside a substitution is literal text
///
/// A nested `[` or a substitution left open is an invalid format.
pub fn translate_format(pattern: &str) -> Result<String, EvalError> {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut in_substitution = false;
    for c in pattern.chars() {
        match c {
            '[' if in_substitution => {
                return Err(invalid_format(format!(
                    "nested `[` inside a substitution in \"{pattern}\""
                )))
            }
            '[' => {
                in_substitution = true;
                out.push('{');
            }
            ']' if in_substitution => {
                in_substitution = false;
                out.push('}');
            }
            '{' => out.push_str("{{"),
            '}' => out.push_str("}}"),
            '?' if in_substitution => out.push('#'),
            c => out.push(c),
        }
    }
    if in_substitution {
        return Err(invalid_format(format!("unterminated `[` in \"{pattern}\"")));
    }
    Ok(out)
}

pub(super) fn format(pattern: &Value, args: &[Value]) -> EvalResult {
    let Value::Str(pattern) = pattern else {
        return Err(invalid_argument("format", 1, pattern));
    };
    let composite = translate_format(pattern)?;
    apply_composite(&composite, args).map(Value::Str)
}

/// Expand `{index[,alignment][:spec]}` placeholders against `args`.
pub(crate) fn apply_composite(composite: &str, args: &[Value]) -> Result<String, EvalError> {
    let mut out = String::with_capacity(composite.len());
    let mut chars = composite.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut body = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => body.push(c),
                        None => return Err(invalid_format("unterminated placeholder")),
                    }
                }
                let placeholder = Placeholder::parse(&body)?;
                let arg = args.get(placeholder.index).ok_or_else(|| {
                    invalid_format(format!(
                        "placeholder {} but only {} argument(s)",
                        placeholder.index,
                        args.len()
                    ))
                })?;
                let text = match placeholder.spec {
                    Some(spec) => format_with_spec(arg, spec)?,
                    None => arg.to_string(),
                };
                out.push_str(&align(&text, placeholder.alignment));
            }
            '}' => return Err(invalid_format("unmatched `}`")),
            c => out.push(c),
        }
    }
    Ok(out)
}

struct Placeholder<'a> {
    index: usize,
    alignment: i64,
    spec: Option<&'a str>,
}

impl<'a> Placeholder<'a> {
    fn parse(body: &'a str) -> Result<Self, EvalError> {
        let (head, spec) = match body.split_once(':') {
            Some((head, spec)) => (head, Some(spec)),
            None => (body, None),
        };
        let (index, alignment) = match head.split_once(',') {
            Some((index, alignment)) => (index, Some(alignment)),
            None => (head, None),
        };
        let index = index
            .trim()
            .parse::<usize>()
            .map_err(|_| invalid_format(format!("bad placeholder index `{index}`")))?;
        let alignment = match alignment {
            Some(alignment) => alignment
                .trim()
                .parse::<i64>()
                .map_err(|_| invalid_format(format!("bad alignment `{alignment}`")))?,
            None => 0,
        };
        Ok(Placeholder {
            index,
            alignment,
            spec,
        })
    }
}

fn align(text: &str, alignment: i64) -> String {
    let width = usize::try_from(alignment.unsigned_abs()).unwrap_or(usize::MAX);
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let padding = " ".repeat(width - len);
    if alignment > 0 {
        format!("{padding}{text}")
    } else {
        format!("{text}{padding}")
    }
}

fn format_with_spec(value: &Value, spec: &str) -> Result<String, EvalError> {
    let number = match value {
        Value::Int(_) | Value::Float(_) => value,
        other => return Ok(other.to_string()),
    };
    let mut chars = spec.chars();
    let letter = chars.next();
    let digits = chars.as_str();
    let precision = if digits.is_empty() {
        None
    } else {
        digits.parse::<usize>().ok()
    };
    let standard = digits.is_empty() || precision.is_some();
    match letter {
        Some(letter) if standard && "FfNnDdPpXxEe".contains(letter) => {
            standard_spec(number, letter, precision)
        }
        _ => custom_pattern(number.as_real().unwrap_or_default(), spec),
    }
}

fn standard_spec(value: &Value, letter: char, precision: Option<usize>) -> Result<String, EvalError> {
    let x = value.as_real().unwrap_or_default();
    match letter.to_ascii_uppercase() {
        'F' => Ok(format!("{x:.prec$}", prec = precision.unwrap_or(2))),
        'N' => Ok(group_thousands(&format!(
            "{x:.prec$}",
            prec = precision.unwrap_or(2)
        ))),
        'P' => Ok(format!("{:.prec$}%", x * 100.0, prec = precision.unwrap_or(2))),
        'E' => {
            let text = format!("{x:.prec$e}", prec = precision.unwrap_or(6));
            Ok(if letter == 'E' { text.to_uppercase() } else { text })
        }
        'D' => match value {
            Value::Int(n) => {
                let width = precision.unwrap_or(0);
                let digits = format!("{:0width$}", n.unsigned_abs());
                Ok(if *n < 0 { format!("-{digits}") } else { digits })
            }
            _ => Err(invalid_format("`D` requires an int")),
        },
        'X' => match value {
            Value::Int(n) => {
                let width = precision.unwrap_or(0);
                let bits = u64::from_ne_bytes(n.to_ne_bytes());
                Ok(if letter == 'X' {
                    format!("{bits:0width$X}")
                } else {
                    format!("{bits:0width$x}")
                })
            }
            _ => Err(invalid_format("`X` requires an int")),
        },
        other => Err(invalid_format(format!("unknown format specifier `{other}`"))),
    }
}

/// Insert `,` every three digits of the integer part of a plain decimal.
fn group_thousands(number: &str) -> String {
    let (sign, rest) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (rest, None),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

fn is_pattern_char(c: char) -> bool {
    matches!(c, '0' | '#' | '.' | ',')
}

/// Custom numeric pattern such as `#,##0.00`, `0.#`, `0%` or `$0.00 each`.
///
/// - `0`: a digit that is always shown
/// - `#`: a digit shown only when significant
/// - `.`: decimal point; `,` anywhere in the integer part: group thousands
/// - `%`: multiply by 100 and show the sign
///
/// Text before the first and after the last placeholder is copied as is.
fn custom_pattern(x: f64, pattern: &str) -> Result<String, EvalError> {
    let Some(start) = pattern.find(is_pattern_char) else {
        return Err(invalid_format(format!("no digit placeholder in `{pattern}`")));
    };
    let end = pattern
        .rfind(is_pattern_char)
        .map_or(pattern.len(), |i| i + 1);
    let (prefix, core, suffix) = (&pattern[..start], &pattern[start..end], &pattern[end..]);

    let x = if pattern.contains('%') { x * 100.0 } else { x };
    let (int_spec, frac_spec) = core.split_once('.').unwrap_or((core, ""));
    let grouping = int_spec.contains(',');
    let min_int = int_spec.chars().filter(|&c| c == '0').count();
    let min_frac = frac_spec.chars().filter(|&c| c == '0').count();
    let max_frac = frac_spec.chars().filter(|&c| c == '0' || c == '#').count();

    let rounded = format!("{:.max_frac$}", x.abs());
    let (int_digits, frac_digits) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));

    let mut frac = frac_digits.to_string();
    while frac.len() > min_frac && frac.ends_with('0') {
        frac.pop();
    }
    let mut int = int_digits.trim_start_matches('0').to_string();
    if int.len() < min_int {
        int = format!("{}{int}", "0".repeat(min_int - int.len()));
    }
    if grouping {
        int = group_thousands(&int);
    }

    let has_digit = int.chars().chain(frac.chars()).any(|c| c.is_ascii_digit() && c != '0');
    let sign = if x < 0.0 && has_digit { "-" } else { "" };
    let mut out = format!("{sign}{prefix}{int}");
    if !frac.is_empty() {
        out.push('.');
        out.push_str(&frac);
    }
    out.push_str(suffix);
    Ok(out)
}
