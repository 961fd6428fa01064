// File: src/lib.rs
//
// Library interface for the Scribo interpreter.
// Exposes the pipeline stages for the binary, integration tests and
// embedding shells.

pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod pipeline;
pub mod repl;
pub mod test_runner;
