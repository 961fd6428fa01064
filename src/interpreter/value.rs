// File: src/interpreter/value.rs
//
// Runtime value types for the Scribo language.
// Values are a closed union: numbers (f64), booleans, text and nil.
// There are no reference or aggregate types.

use std::fmt;

/// Literal spellings that evaluate to booleans
pub const TRUE_LITERAL: &str = "true";
pub const FALSE_LITERAL: &str = "false";

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Boolean(bool),
    Text(String),
    Nil,
}

impl Value {
    /// Truthiness used by `if`, `while` and the logical operators
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::Text(s) => !s.is_empty(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Boolean(_) => "boolean",
            Value::Text(_) => "text",
            Value::Nil => "nil",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Types a raw literal lexeme.
    ///
    /// Tried in order: floating-point number, boolean spelling, quoted text
    /// (quotes stripped), otherwise the raw text itself.
    pub fn from_literal(raw: &str) -> Value {
        if let Some(n) = parse_number(raw) {
            return Value::Number(n);
        }
        if raw == TRUE_LITERAL {
            return Value::Boolean(true);
        }
        if raw == FALSE_LITERAL {
            return Value::Boolean(false);
        }
        if let Some(text) = unquote(raw) {
            return Value::Text(text);
        }
        Value::Text(raw.to_string())
    }

    /// Coerces one line of user input: number, then yes/no, then raw text.
    /// Surrounding whitespace is ignored for the first two checks.
    pub fn from_input(line: &str) -> Value {
        let trimmed = line.trim();
        if let Some(n) = parse_number(trimmed) {
            return Value::Number(n);
        }
        if trimmed.eq_ignore_ascii_case("yes") {
            return Value::Boolean(true);
        }
        if trimmed.eq_ignore_ascii_case("no") {
            return Value::Boolean(false);
        }
        Value::Text(line.to_string())
    }
}

/// Parses decimal or exponent notation only; spellings such as `nan` or
/// `inf` stay text
fn parse_number(text: &str) -> Option<f64> {
    let digit_form = text.chars().any(|c| c.is_ascii_digit())
        && text.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'));
    if !digit_form {
        return None;
    }
    text.parse::<f64>().ok()
}

/// Strips `"..."` quotes, or decodes a `'c'` character literal
fn unquote(raw: &str) -> Option<String> {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return Some(raw[1..raw.len() - 1].to_string());
    }
    if raw.len() >= 3 && raw.starts_with('\'') && raw.ends_with('\'') {
        let inner = &raw[1..raw.len() - 1];
        let mut chars = inner.chars();
        return match (chars.next(), chars.next()) {
            (Some('\\'), Some(esc)) => crate::lexer::unescape(esc).map(String::from),
            _ => Some(inner.to_string()),
        };
    }
    None
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Number(n) => {
                // Integral values print without a fraction
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Text(s) => write!(f, "{}", s),
            Value::Nil => write!(f, "nil"),
        }
    }
}
