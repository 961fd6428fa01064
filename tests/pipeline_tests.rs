// Integration tests for full pipeline runs
//
// A run resets diagnostics, tokenizes, parses and interprets. These tests
// check how the stages hand off to each other and what a caller sees.

use scribo::config::Config;
use scribo::diagnostics::{Diagnostics, Phase};
use scribo::errors::ErrorKind;
use scribo::interpreter::{Interpreter, ScriptedInput, SharedBuffer};
use scribo::pipeline::{compile, run_captured, run_on, RunSummary};

fn run(code: &str) -> (Vec<String>, RunSummary) {
    run_captured(code, &Config::default(), &[])
}

#[test]
fn test_clean_program_succeeds() {
    let (output, summary) = run("number total := 0\nfor (i := 1, 5) total := total + i\nshow total");
    assert_eq!(output, vec!["10"]);
    assert!(summary.succeeded());
    assert!(summary.tokenized);
    assert_eq!(summary.statements, 3);
}

#[test]
fn test_lexical_error_skips_execution() {
    let (output, summary) = run("show 1\nshow 2 @");
    assert!(output.is_empty());
    assert!(!summary.tokenized);
    assert_eq!(summary.diagnostics.len(), 1);
    assert_eq!(summary.diagnostics[0].phase, Phase::Lexical);
    assert_eq!(summary.diagnostics[0].to_string(), "[line 2] Error at '@': Unexpected character '@'.");
}

#[test]
fn test_syntax_error_still_runs_valid_statements() {
    let (output, summary) = run("show (1 + ;\nshow 2");
    assert_eq!(output, vec!["2"]);
    assert_eq!(summary.diagnostics.len(), 1);
    assert_eq!(summary.diagnostics[0].phase, Phase::Syntax);
    assert!(!summary.succeeded());
}

#[test]
fn test_runtime_error_is_reported_once() {
    let (output, summary) = run("show 1\nshow 10 / 0\nshow 3");
    assert_eq!(output, vec!["1", "Execution error: Division by zero."]);
    let err = summary.runtime_error.expect("runtime error");
    assert_eq!(err.kind, ErrorKind::DivisionByZero);
    assert!(summary.diagnostics.is_empty());
}

#[test]
fn test_runs_are_repeatable() {
    let code = "x := 1\nwhile (x < 100) x := x * 3\nshow x\nshow \"x\" + x";
    let (first, _) = run(code);
    let (second, _) = run(code);
    assert_eq!(first, vec!["243", "x243"]);
    assert_eq!(first, second);
}

#[test]
fn test_diagnostics_do_not_leak_between_runs() {
    let (_, bad) = run("show )");
    assert_eq!(bad.diagnostics.len(), 1);
    let (_, good) = run("show 1");
    assert!(good.diagnostics.is_empty());
}

#[test]
fn test_input_lines_reach_read() {
    let (output, summary) = run_captured("read a\nread b\nshow a * b", &Config::default(), &["6", "7"]);
    assert_eq!(output, vec!["42"]);
    assert!(summary.succeeded());
}

#[test]
fn test_run_on_keeps_environment() {
    let buffer = SharedBuffer::new();
    let mut interp = Interpreter::with_io(Box::new(buffer.clone()), Box::new(ScriptedInput::default()));
    let config = Config::default();

    assert!(run_on(&mut interp, "name := \"Ada\"", &config).succeeded());
    assert!(run_on(&mut interp, "show \"hello \" + name", &config).succeeded());
    assert_eq!(buffer.lines(), vec!["hello Ada"]);
}

#[test]
fn test_strict_terminators_from_config() {
    let config = Config::from_toml("[lexer]\nstrict_terminators = true\n").unwrap();
    let (output, summary) = run_captured("x := 1\nshow x", &config, &[]);
    assert!(output.is_empty());
    assert!(!summary.tokenized);

    let (output, _) = run_captured("x := 1;\nshow x", &config, &[]);
    assert_eq!(output, vec!["1"]);
}

#[test]
fn test_compile_returns_none_on_lexical_failure() {
    let mut diags = Diagnostics::new();
    assert!(compile("show \"open", &Config::default(), &mut diags).is_none());
    assert!(diags.has_failed());

    let mut diags = Diagnostics::new();
    let stmts = compile("show 1; show 2", &Config::default(), &mut diags).unwrap();
    assert_eq!(stmts.len(), 2);
}

#[test]
fn test_script_snapshots_match() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/scripts");
    let report = scribo::test_runner::run_all_tests(&dir, false, &Config::default()).unwrap();
    assert_eq!(report.total, 4);
    let failures: Vec<_> = report.results.iter().filter(|r| !r.passed).collect();
    assert!(failures.is_empty(), "snapshot mismatches: {:#?}", failures);
}

#[test]
fn test_statement_after_incomplete_line_still_runs() {
    for code in ["x := \nshow 5", "show (1 +\nshow 5", "if (x > 1\nshow 5"] {
        let (output, summary) = run(code);
        assert_eq!(output, vec!["5"], "program: {:?}", code);
        assert_eq!(summary.diagnostics.len(), 1);
        assert_eq!(summary.diagnostics[0].phase, Phase::Syntax);
    }
}
