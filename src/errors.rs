// File: src/errors.rs
//
// Runtime and host-side error type for Scribo.
// Lexical and syntax problems are collected in the diagnostics sink instead;
// this type covers failures that abort a run (undefined variable, division by
// zero, operand type mismatches, exhausted input) plus configuration errors.

use colored::Colorize;
use std::fmt;

/// Types of errors that abort a Scribo run
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    RuntimeError,
    TypeError,
    UndefinedVariable,
    DivisionByZero,
    InputError,
    ConfigError,
    IoError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::RuntimeError => write!(f, "Runtime Error"),
            ErrorKind::TypeError => write!(f, "Type Error"),
            ErrorKind::UndefinedVariable => write!(f, "Undefined Variable"),
            ErrorKind::DivisionByZero => write!(f, "Division By Zero"),
            ErrorKind::InputError => write!(f, "Input Error"),
            ErrorKind::ConfigError => write!(f, "Config Error"),
            ErrorKind::IoError => write!(f, "IO Error"),
        }
    }
}

/// A structured error with an optional source line and hint
#[derive(Debug, Clone, PartialEq)]
pub struct ScriboError {
    pub kind: ErrorKind,
    pub message: String,
    pub line: Option<usize>,
    pub help: Option<String>,
}

impl ScriboError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), line: None, help: None }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn runtime_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RuntimeError, message)
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeError, message)
    }

    pub fn division_by_zero() -> Self {
        Self::new(ErrorKind::DivisionByZero, "Division by zero.")
    }

    /// Create an undefined variable error, suggesting the closest known name
    pub fn undefined_variable(name: &str, known: &[String]) -> Self {
        let err = Self::new(ErrorKind::UndefinedVariable, format!("Undefined variable '{}'.", name));
        match find_closest_match(name, known) {
            Some(candidate) => err.with_help(format!("Did you mean '{}'?", candidate)),
            None => err,
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigError, message)
    }

    /// The single line written to the output sink when a run aborts
    pub fn execution_line(&self) -> String {
        match &self.help {
            Some(help) => format!("Execution error: {} {}", self.message, help),
            None => format!("Execution error: {}", self.message),
        }
    }

    /// Multi-line colored rendering for terminals
    pub fn to_colored_string(&self) -> String {
        let mut out = format!("{}: {}", self.kind.to_string().red().bold(), self.message.bold());
        if let Some(line) = self.line {
            out.push_str(&format!("\n  {} line {}", "-->".bright_blue(), line));
        }
        if let Some(ref help) = self.help {
            out.push_str(&format!("\n   {} {}", "=".bright_yellow(), format!("help: {}", help).bright_yellow()));
        }
        out
    }
}

impl fmt::Display for ScriboError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(line) = self.line {
            write!(f, " (line {})", line)?;
        }
        if let Some(ref help) = self.help {
            write!(f, " {}", help)?;
        }
        Ok(())
    }
}

impl std::error::Error for ScriboError {}

/// Computes the Levenshtein distance between two strings
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Single rolling row instead of the full matrix
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Closest candidate within an edit distance of 2, if any
pub fn find_closest_match<'a>(target: &str, candidates: &'a [String]) -> Option<&'a str> {
    let mut best: Option<(&str, usize)> = None;

    for candidate in candidates {
        let distance = levenshtein_distance(target, candidate);
        if distance == 0 || distance > 2 {
            continue;
        }
        match best {
            Some((_, d)) if d <= distance => {}
            _ => best = Some((candidate.as_str(), distance)),
        }
    }

    best.map(|(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("count", "count"), 0);
        assert_eq!(levenshtein_distance("count", "cont"), 1);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_undefined_variable_suggests_close_name() {
        let known = vec!["total".to_string(), "count".to_string()];
        let err = ScriboError::undefined_variable("cont", &known);
        assert_eq!(err.kind, ErrorKind::UndefinedVariable);
        assert_eq!(err.help.as_deref(), Some("Did you mean 'count'?"));
        assert_eq!(err.execution_line(), "Execution error: Undefined variable 'cont'. Did you mean 'count'?");
    }

    #[test]
    fn test_undefined_variable_without_candidates() {
        let err = ScriboError::undefined_variable("x", &[]);
        assert!(err.help.is_none());
        assert_eq!(err.execution_line(), "Execution error: Undefined variable 'x'.");
    }
}
