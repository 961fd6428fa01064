// File: src/main.rs
//
// Main entry point for the Scribo interpreter.
// Handles command-line argument parsing and dispatches to the appropriate
// subcommand (run, tokens, ast, repl or test).

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use scribo::config::Config;
use scribo::diagnostics::{Diagnostic, Diagnostics};
use scribo::interpreter::{InputSource, ScriptedInput, StdinSource, StdoutSink};
use scribo::repl::Repl;
use scribo::{lexer, pipeline, test_runner};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(
    name = "scribo",
    about = "Scribo: a small teaching scripting language",
    version = env!("CARGO_PKG_VERSION"),
    long_about = None
)]
struct Cli {
    /// Path to a scribo.toml (defaults to ./scribo.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `scribo::parser=trace`
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[command(arg_required_else_help = true)]
enum Commands {
    /// Run a Scribo program
    Run {
        /// Path to the .scr file
        file: PathBuf,

        /// Read input lines from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Print the token stream of a program
    Tokens {
        file: PathBuf,

        /// Emit JSON instead of one token per line
        #[arg(long)]
        json: bool,
    },

    /// Print the parsed statements of a program
    Ast { file: PathBuf },

    /// Launch the interactive Scribo REPL
    Repl,

    /// Run every .scr program in a directory against its .out snapshot
    Test {
        #[arg(default_value = "tests/scripts")]
        dir: PathBuf,

        /// Regenerate all .out files based on actual output
        #[arg(long)]
        update: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    init_tracing(cli.log_level.as_deref(), &config);

    match cli.command {
        Commands::Run { file, input } => {
            let source = read_source(&file)?;
            let input: Box<dyn InputSource> = match input {
                Some(path) => Box::new(ScriptedInput::from_text(&read_source(&path)?)),
                None => Box::new(StdinSource),
            };

            let summary = pipeline::execute(&source, &config, Box::new(StdoutSink), input);
            print_diagnostics(&summary.diagnostics, &config);
            if !summary.succeeded() {
                process::exit(1);
            }
        }

        Commands::Tokens { file, json } => {
            let source = read_source(&file)?;
            let mut diagnostics = Diagnostics::new();
            let (tokens, _) = lexer::tokenize_with(&source, config.lexer_options(), &mut diagnostics);
            if json {
                println!("{}", serde_json::to_string_pretty(&tokens)?);
            } else {
                for token in &tokens {
                    println!("{}", token);
                }
            }
            exit_on_diagnostics(&mut diagnostics, &config);
        }

        Commands::Ast { file } => {
            let source = read_source(&file)?;
            let mut diagnostics = Diagnostics::new();
            if let Some(stmts) = pipeline::compile(&source, &config, &mut diagnostics) {
                for stmt in &stmts {
                    println!("{:#?}", stmt);
                }
            }
            exit_on_diagnostics(&mut diagnostics, &config);
        }

        Commands::Repl => {
            let mut repl = Repl::new(config).context("failed to start the line editor")?;
            repl.run()?;
        }

        Commands::Test { dir, update } => {
            let report = test_runner::run_all_tests(&dir, update, &config)?;
            report.print();
            process::exit(report.exit_code());
        }
    }

    Ok(())
}

/// `--log-level` wins, then `RUST_LOG`, then the config file
fn init_tracing(cli_level: Option<&str>, config: &Config) {
    let filter = match cli_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn print_diagnostics(diagnostics: &[Diagnostic], config: &Config) {
    for diagnostic in diagnostics {
        if config.output.color {
            eprintln!("{}", diagnostic.to_colored_string());
        } else {
            eprintln!("{}", diagnostic);
        }
    }
}

fn exit_on_diagnostics(diagnostics: &mut Diagnostics, config: &Config) {
    let failed = diagnostics.has_failed();
    print_diagnostics(&diagnostics.drain(), config);
    if failed {
        process::exit(1);
    }
}
