// File: src/repl.rs
//
// Interactive REPL (Read-Eval-Print Loop) for the Scribo language.
// Provides an interactive shell with:
// - Multi-line input while parentheses, braces or brackets are open
// - Command history with up/down arrow navigation
// - Special commands (:help, :clear, :quit, :vars, :reset)
// - One environment that persists across inputs

use crate::config::Config;
use crate::interpreter::{Interpreter, StdinSource, StdoutSink, Value};
use crate::pipeline;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// REPL session that maintains interpreter state and handles user interaction
pub struct Repl {
    interpreter: Interpreter,
    editor: DefaultEditor,
    config: Config,
}

impl Repl {
    pub fn new(config: Config) -> Result<Self, ReadlineError> {
        let editor = DefaultEditor::new()?;
        Ok(Repl { interpreter: Self::fresh_interpreter(&config), editor, config })
    }

    fn fresh_interpreter(config: &Config) -> Interpreter {
        let mut interpreter = Interpreter::with_io(Box::new(StdoutSink), Box::new(StdinSource));
        interpreter.set_options(config.interpreter_options());
        interpreter
    }

    fn show_banner(&self) {
        println!("{}", "╔══════════════════════════════════════════════════════╗".bright_cyan());
        println!(
            "{}",
            format!("║        Scribo REPL v{:<8} - Interactive Shell      ║", env!("CARGO_PKG_VERSION"))
                .bright_cyan()
        );
        println!("{}", "╚══════════════════════════════════════════════════════╝".bright_cyan());
        println!();
        println!(
            "  {} Use {}{} for commands or {}",
            "Welcome!".bright_green(),
            ":".bright_blue(),
            "help".bright_yellow(),
            ":quit".bright_yellow()
        );
        println!("  {} Leave a brace open to continue on the next line", "Tip:".bright_magenta());
        println!();
    }

    /// Starts the REPL loop
    pub fn run(&mut self) -> Result<(), ReadlineError> {
        self.show_banner();

        let mut buffer = String::new();

        loop {
            let prompt = if buffer.is_empty() {
                "scribo> ".bright_green().to_string()
            } else {
                "......> ".bright_blue().to_string()
            };

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let _ = self.editor.add_history_entry(line.as_str());

                    // Commands are only recognized outside multi-line input
                    if buffer.is_empty() && line.trim().starts_with(':') {
                        if self.handle_command(line.trim()) {
                            continue;
                        }
                        break;
                    }

                    buffer.push_str(&line);
                    buffer.push('\n');

                    if is_input_complete(&buffer) {
                        self.eval_input(&buffer);
                        buffer.clear();
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "^C (Ctrl+D or :quit to exit)".bright_yellow());
                    buffer.clear();
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", "\nGoodbye!".bright_cyan());
                    break;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "readline failed");
                    return Err(err);
                }
            }
        }

        Ok(())
    }

    /// Returns true to keep the REPL running, false to quit
    fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            ":help" | ":h" => {
                self.show_help();
                true
            }
            ":quit" | ":q" | ":exit" => {
                println!("{}", "Goodbye!".bright_cyan());
                false
            }
            ":clear" | ":c" => {
                print!("\x1B[2J\x1B[1;1H");
                self.show_banner();
                true
            }
            ":vars" | ":v" => {
                self.show_variables();
                true
            }
            ":reset" | ":r" => {
                self.interpreter.reset();
                println!("{}", "✓ Environment reset".bright_green());
                true
            }
            _ => {
                println!(
                    "{} Unknown command: {}. Type {}{} for available commands.",
                    "Error:".bright_red(),
                    cmd.bright_yellow(),
                    ":".bright_blue(),
                    "help".bright_yellow()
                );
                true
            }
        }
    }

    fn show_help(&self) {
        println!();
        println!("{}", "REPL Commands:".bright_cyan().bold());
        println!();
        println!("  {}{}  Display this help message", ":help".bright_yellow(), " or :h     ".dimmed());
        println!("  {}{}  Exit the REPL", ":quit".bright_yellow(), " or :q     ".dimmed());
        println!("  {}{}  Clear the screen", ":clear".bright_yellow(), " or :c    ".dimmed());
        println!("  {}{}  Show declared variables", ":vars".bright_yellow(), " or :v    ".dimmed());
        println!("  {}{}  Forget all variables", ":reset".bright_yellow(), " or :r   ".dimmed());
        println!();
        println!("{}", "Examples:".bright_cyan().bold());
        println!();
        println!("  {}", "scribo> number total := 0".dimmed());
        println!("  {}", "scribo> for (i := 1, 4) {".dimmed());
        println!("  {}", "......>     total := total + i".dimmed());
        println!("  {}", "......> }".dimmed());
        println!("  {}", "scribo> show \"total = \" + total".dimmed());
        println!();
    }

    fn show_variables(&self) {
        println!();
        println!("{}", "Declared Variables:".bright_cyan().bold());
        println!();

        let entries = self.interpreter.env.entries();
        if entries.is_empty() {
            println!("  {}", "(none)".dimmed());
        }
        for (name, value) in entries {
            println!("  {} = {}", name.bright_yellow(), format_value(&value));
        }
        println!();
    }

    fn eval_input(&mut self, input: &str) {
        if input.trim().is_empty() {
            return;
        }

        // Runtime errors are already written to stdout by the interpreter
        let summary = pipeline::run_on(&mut self.interpreter, input, &self.config);
        for diagnostic in &summary.diagnostics {
            if self.config.output.color {
                eprintln!("{}", diagnostic.to_colored_string());
            } else {
                eprintln!("{}", diagnostic);
            }
        }
    }
}

/// Formats a value for `:vars`, quoting text so empty strings stay visible
fn format_value(value: &Value) -> String {
    match value {
        Value::Text(s) => format!("\"{}\"", s).bright_green().to_string(),
        Value::Boolean(b) => b.to_string().bright_magenta().to_string(),
        Value::Nil => "nil".dimmed().to_string(),
        Value::Number(_) => value.to_string().bright_white().to_string(),
    }
}

/// True when every `(`, `{` and `[` outside strings and comments is closed
pub fn is_input_complete(input: &str) -> bool {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return true;
    }

    let mut depth: i32 = 0;
    let mut chars = trimmed.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                // Strings have no escapes; an unterminated one needs more input
                if !chars.by_ref().any(|c| c == '"') {
                    return false;
                }
            }
            '\'' => {
                if chars.next() == Some('\\') {
                    chars.next();
                }
                chars.next();
            }
            '#' if chars.peek() == Some(&'[') => {
                chars.next();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    if c == ']' && chars.peek() == Some(&'#') {
                        chars.next();
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return false;
                }
            }
            '#' => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '(' | '{' | '[' => depth += 1,
            ')' | '}' | ']' => depth -= 1,
            _ => {}
        }
    }

    // Over-closed input is complete; the parser reports it
    depth <= 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced_input_is_complete() {
        assert!(is_input_complete("show 1 + 2"));
        assert!(is_input_complete("if (x) { show x }"));
        assert!(is_input_complete(""));
    }

    #[test]
    fn test_open_brace_needs_more() {
        assert!(!is_input_complete("while (x > 0) {\n  x := x - 1\n"));
        assert!(!is_input_complete("show (1 +"));
    }

    #[test]
    fn test_delimiters_in_strings_and_comments_ignored() {
        assert!(is_input_complete("show \"{\""));
        assert!(is_input_complete("show '('"));
        assert!(is_input_complete("show 1 # {"));
        assert!(!is_input_complete("#[ still open"));
        assert!(!is_input_complete("show \"unterminated"));
    }
}
