// File: src/diagnostics.rs
//
// Diagnostics sink shared by the tokenizer and the parser of one run.
// Records are appended in order and a sticky "has failed" flag is raised on
// the first report. The caller owns the sink and resets it between runs.

use colored::Colorize;
use std::fmt;

/// Pipeline stage that produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lexical,
    Syntax,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Phase::Lexical => write!(f, "Lexical Error"),
            Phase::Syntax => write!(f, "Syntax Error"),
        }
    }
}

/// A single `(line, location, message)` record
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub phase: Phase,
    pub line: usize,
    pub location: Option<String>,
    pub message: String,
}

impl Diagnostic {
    /// Renders the diagnostic for a terminal, with the same text as `Display`
    pub fn to_colored_string(&self) -> String {
        let header = format!("[line {}]", self.line).bright_blue();
        let kind = self.phase.to_string().red().bold();
        match &self.location {
            Some(loc) => format!(
                "{} {} at '{}': {}",
                header,
                kind,
                loc.bright_yellow(),
                self.message.bold()
            ),
            None => format!("{} {}: {}", header, kind, self.message.bold()),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "[line {}] Error at '{}': {}", self.line, loc, self.message),
            None => write!(f, "[line {}] Error: {}", self.line, self.message),
        }
    }
}

/// Append-only diagnostics log with a sticky failure flag
#[derive(Debug, Default)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
    failed: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record and marks the run as failed
    pub fn report(&mut self, phase: Phase, line: usize, location: Option<&str>, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            phase,
            line,
            location: location.map(str::to_string),
            message: message.into(),
        };
        tracing::debug!(%diagnostic, "diagnostic reported");
        self.failed = true;
        self.records.push(diagnostic);
    }

    pub fn has_failed(&self) -> bool {
        self.failed
    }

    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Takes every record out of the sink. The failure flag stays raised
    /// until `reset` is called.
    pub fn drain(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.records)
    }

    pub fn reset(&mut self) {
        self.records.clear();
        self.failed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_sets_failure_flag() {
        let mut diags = Diagnostics::new();
        assert!(!diags.has_failed());

        diags.report(Phase::Syntax, 3, Some(";"), "Expected expression.");
        assert!(diags.has_failed());
        assert_eq!(diags.len(), 1);
        assert_eq!(diags.records()[0].to_string(), "[line 3] Error at ';': Expected expression.");
    }

    #[test]
    fn test_drain_keeps_flag_until_reset() {
        let mut diags = Diagnostics::new();
        diags.report(Phase::Lexical, 1, None, "Unterminated string.");
        diags.report(Phase::Lexical, 2, None, "Unterminated block comment.");

        let drained = diags.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].line, 1);
        assert!(diags.is_empty());
        assert!(diags.has_failed());

        diags.reset();
        assert!(!diags.has_failed());
    }

    #[test]
    fn test_display_without_location() {
        let mut diags = Diagnostics::new();
        diags.report(Phase::Lexical, 7, None, "Unterminated string.");
        assert_eq!(diags.records()[0].to_string(), "[line 7] Error: Unterminated string.");
    }
}
