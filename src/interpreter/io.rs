// File: src/interpreter/io.rs
//
// Output sink and line-based input source injected into the interpreter.
// The embedding shell decides where `show` lines go and where `read` lines
// come from; the interpreter itself never touches stdio directly.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};

/// Receives one complete output line at a time
pub trait OutputSink {
    fn write_line(&mut self, line: &str);
}

/// Supplies one line per `read` statement; `None` means input is exhausted
pub trait InputSource {
    fn read_line(&mut self) -> Option<String>;
}

/// Prints each line to stdout
#[derive(Debug, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_line(&mut self, line: &str) {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        let _ = writeln!(handle, "{}", line);
        let _ = handle.flush();
    }
}

/// Collects lines into a shared buffer (used for testing and snapshots)
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(pub Arc<Mutex<Vec<String>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the lines written so far
    pub fn lines(&self) -> Vec<String> {
        match self.0.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl OutputSink for SharedBuffer {
    fn write_line(&mut self, line: &str) {
        let mut lines = match self.0.lock() {
            Ok(lines) => lines,
            Err(poisoned) => poisoned.into_inner(),
        };
        lines.push(line.to_string());
    }
}

/// Any `FnMut(&str)` works as a sink, e.g. a closure appending to a UI console
impl<F: FnMut(&str)> OutputSink for F {
    fn write_line(&mut self, line: &str) {
        self(line)
    }
}

/// Blocks on stdin for each line
#[derive(Debug, Default)]
pub struct StdinSource;

impl InputSource for StdinSource {
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\n', '\r']).to_string()),
        }
    }
}

/// Pre-recorded input lines, consumed in order
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedInput { lines: lines.into_iter().map(Into::into).collect() }
    }

    /// Splits a text blob on line breaks
    pub fn from_text(text: &str) -> Self {
        Self::new(text.lines())
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl InputSource for ScriptedInput {
    fn read_line(&mut self) -> Option<String> {
        self.lines.pop_front()
    }
}
