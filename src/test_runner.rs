// File: src/test_runner.rs
//
// Snapshot runner for Scribo programs.
//
// Every `*.scr` file in a directory is run through the full pipeline. Lines
// from a sibling `*.in` file feed its `read` statements. The program output,
// followed by any diagnostics, is compared with the sibling `*.out` file.
// A missing `.out` file (or `--update`) records the current output instead.

use crate::config::Config;
use crate::errors::{ErrorKind, ScriboError};
use crate::pipeline;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub const SOURCE_EXTENSION: &str = "scr";

/// Result from one snapshot comparison
#[derive(Clone, Debug)]
pub struct TestResult {
    pub path: PathBuf,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
    pub duration_ms: u128,
}

/// Summary report of a directory run
#[derive(Debug, Default)]
pub struct TestReport {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u128,
    pub results: Vec<TestResult>,
}

/// Renders the text a program's snapshot is compared against
pub fn render_snapshot(source: &str, input: &str, config: &Config) -> String {
    let lines: Vec<&str> = input.lines().collect();
    let (mut output, summary) = pipeline::run_captured(source, config, &lines);
    output.extend(summary.diagnostics.iter().map(|d| d.to_string()));
    output.join("\n")
}

/// Runs every `.scr` file in `dir`, sorted by name
pub fn run_all_tests(dir: &Path, update_snapshots: bool, config: &Config) -> Result<TestReport, ScriboError> {
    let entries = fs::read_dir(dir).map_err(|e| {
        ScriboError::new(ErrorKind::IoError, format!("Failed to read test directory {}: {}", dir.display(), e))
    })?;

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|e| e == SOURCE_EXTENSION).unwrap_or(false))
        .collect();
    paths.sort();

    let start = Instant::now();
    let mut report = TestReport::default();

    for path in paths {
        let result = run_single(&path, update_snapshots, config)?;
        report.total += 1;
        if result.passed {
            report.passed += 1;
        } else {
            report.failed += 1;
        }
        report.results.push(result);
    }

    report.duration_ms = start.elapsed().as_millis();
    tracing::info!(total = report.total, failed = report.failed, "snapshot run finished");
    Ok(report)
}

fn run_single(path: &Path, update_snapshots: bool, config: &Config) -> Result<TestResult, ScriboError> {
    let start = Instant::now();
    let source = read(path)?;
    let input_path = path.with_extension("in");
    let input = if input_path.exists() { read(&input_path)? } else { String::new() };

    let actual = render_snapshot(&source, &input, config).trim().to_string();

    let expected_path = path.with_extension("out");
    let expected = if expected_path.exists() && !update_snapshots {
        read(&expected_path)?.trim().to_string()
    } else {
        fs::write(&expected_path, &actual).map_err(|e| {
            ScriboError::new(ErrorKind::IoError, format!("Failed to write {}: {}", expected_path.display(), e))
        })?;
        tracing::debug!(path = %expected_path.display(), "snapshot recorded");
        actual.clone()
    };

    Ok(TestResult {
        path: path.to_path_buf(),
        passed: actual == expected,
        expected,
        actual,
        duration_ms: start.elapsed().as_millis(),
    })
}

fn read(path: &Path) -> Result<String, ScriboError> {
    fs::read_to_string(path)
        .map_err(|e| ScriboError::new(ErrorKind::IoError, format!("Failed to read {}: {}", path.display(), e)))
}

impl TestReport {
    /// Print the report to stdout with colored output
    pub fn print(&self) {
        for result in &self.results {
            if result.passed {
                println!("{} {} ({}ms)", "[✓]".green().bold(), result.path.display(), result.duration_ms);
            } else {
                println!("{} {}", "[✗]".red().bold(), result.path.display().to_string().red());
                println!("{}\n{}", "Expected:".bold(), result.expected);
                println!("{}\n{}\n", "Got:".bold(), result.actual);
            }
        }

        println!(
            "\n[✓] Passed {}/{} tests ({}ms)",
            self.passed.to_string().green().bold(),
            self.total,
            self.duration_ms
        );
    }

    /// 0 when every snapshot matched, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.failed == 0 {
            0
        } else {
            1
        }
    }
}
