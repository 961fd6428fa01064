// File: src/pipeline.rs
//
// One full run of a Scribo program: reset diagnostics, tokenize, parse,
// interpret. A lexical failure stops the run before parsing. Syntax errors
// are reported but the statements that did parse are still executed.

use crate::ast::Stmt;
use crate::config::Config;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::errors::ScriboError;
use crate::interpreter::{InputSource, Interpreter, OutputSink, ScriptedInput, SharedBuffer};
use crate::lexer;
use crate::parser;

/// What happened during one run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub diagnostics: Vec<Diagnostic>,
    pub runtime_error: Option<ScriboError>,
    /// False when tokenization failed and nothing was parsed or executed
    pub tokenized: bool,
    pub statements: usize,
}

impl RunSummary {
    /// True when no diagnostic was reported and the run did not abort
    pub fn succeeded(&self) -> bool {
        self.diagnostics.is_empty() && self.runtime_error.is_none()
    }
}

/// Resets `diagnostics`, then tokenizes and parses `source` into it.
/// Returns `None` when tokenization failed.
pub fn compile(source: &str, config: &Config, diagnostics: &mut Diagnostics) -> Option<Vec<Stmt>> {
    diagnostics.reset();
    let (tokens, ok) = lexer::tokenize_with(source, config.lexer_options(), diagnostics);
    if !ok {
        tracing::info!("tokenization failed, skipping parse and execution");
        return None;
    }
    Some(parser::parse(tokens, diagnostics))
}

/// Runs `source` on an existing interpreter, keeping its environment.
pub fn run_on(interpreter: &mut Interpreter, source: &str, config: &Config) -> RunSummary {
    let mut diagnostics = Diagnostics::new();
    let mut summary = RunSummary::default();

    let Some(stmts) = compile(source, config, &mut diagnostics) else {
        summary.diagnostics = diagnostics.drain();
        return summary;
    };

    summary.tokenized = true;
    summary.statements = stmts.len();
    summary.runtime_error = interpreter.run(&stmts).err();
    summary.diagnostics = diagnostics.drain();
    summary
}

/// Runs `source` on a fresh interpreter wired to the given sink and source.
pub fn execute(
    source: &str,
    config: &Config,
    output: Box<dyn OutputSink>,
    input: Box<dyn InputSource>,
) -> RunSummary {
    let mut interpreter = Interpreter::with_io(output, input);
    interpreter.set_options(config.interpreter_options());
    run_on(&mut interpreter, source, config)
}

/// Runs `source` and collects its output lines in memory
pub fn run_captured(source: &str, config: &Config, input: &[&str]) -> (Vec<String>, RunSummary) {
    let buffer = SharedBuffer::new();
    let summary = execute(
        source,
        config,
        Box::new(buffer.clone()),
        Box::new(ScriptedInput::new(input.iter().copied())),
    );
    (buffer.lines(), summary)
}
