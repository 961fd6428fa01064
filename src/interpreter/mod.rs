// File: src/interpreter/mod.rs
//
// Tree-walking interpreter for the Scribo language.
// Executes parsed statements by pattern-matching on the AST.
//
// The interpreter owns one flat environment, an output sink and an input
// source. It supports:
// - Variable declaration (explicit, or implicit through `for` and `read`)
// - Blocks that share the enclosing environment
// - if/else, while and numeric for-range loops
// - Arithmetic, text concatenation, comparison, equality and logic
//
// The first runtime failure aborts the rest of the run. Its message is
// written once to the output sink as an "Execution error" line.

mod environment;
mod io;
mod value;

pub use environment::Environment;
pub use io::{InputSource, OutputSink, ScriptedInput, SharedBuffer, StdinSource, StdoutSink};
pub use value::Value;

use crate::ast::{Expr, Stmt};
use crate::errors::{ErrorKind, ScriboError};
use crate::lexer::{Token, TokenKind};

type EvalResult<T> = Result<T, ScriboError>;

/// Behavior switches, usually filled from `scribo.toml`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterpreterOptions {
    /// Write `Input (name): ` to the output sink before each `read`
    pub echo_read_prompt: bool,
}

pub struct Interpreter {
    pub env: Environment,
    output: Box<dyn OutputSink>,
    input: Box<dyn InputSource>,
    options: InterpreterOptions,
}

impl Interpreter {
    /// Creates an interpreter wired to stdout and stdin
    pub fn new() -> Self {
        Self::with_io(Box::new(StdoutSink), Box::new(StdinSource))
    }

    pub fn with_io(output: Box<dyn OutputSink>, input: Box<dyn InputSource>) -> Self {
        Interpreter {
            env: Environment::new(),
            output,
            input,
            options: InterpreterOptions::default(),
        }
    }

    /// Sets the output sink for show statements and error lines
    pub fn set_output(&mut self, output: Box<dyn OutputSink>) {
        self.output = output;
    }

    pub fn set_input(&mut self, input: Box<dyn InputSource>) {
        self.input = input;
    }

    pub fn set_options(&mut self, options: InterpreterOptions) {
        self.options = options;
    }

    /// Forgets every declared variable
    pub fn reset(&mut self) {
        self.env.clear();
    }

    /// Executes statements in order. The first runtime failure stops the
    /// run and is written to the output sink; it is also returned so callers
    /// can inspect it.
    pub fn run(&mut self, stmts: &[Stmt]) -> Result<(), ScriboError> {
        match self.execute_all(stmts) {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::debug!(error = %err, "run aborted");
                let line = err.execution_line();
                self.write_output(&line);
                Err(err)
            }
        }
    }

    fn execute_all(&mut self, stmts: &[Stmt]) -> EvalResult<()> {
        for stmt in stmts {
            self.execute(stmt)?;
        }
        Ok(())
    }

    /// Executes a single statement
    pub fn execute(&mut self, stmt: &Stmt) -> EvalResult<()> {
        tracing::trace!(?stmt, "execute");
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
            }
            Stmt::Show(expr) => {
                let value = self.evaluate(expr)?;
                self.write_output(&value.to_string());
            }
            Stmt::VarDecl { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                self.env.define(name.lexeme.clone(), value);
            }
            Stmt::Block(stmts) => {
                // No new scope: declarations leak to the enclosing program
                self.execute_all(stmts)?;
            }
            Stmt::If { condition, then_branch, else_branch } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)?;
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)?;
                }
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    self.execute(body)?;
                }
            }
            Stmt::ForRange { variable, start, end, step, body } => {
                self.execute_for(variable, start, end, step.as_ref(), body)?;
            }
            Stmt::ReadInput { target } => {
                self.execute_read(target)?;
            }
        }
        Ok(())
    }

    fn execute_for(
        &mut self,
        variable: &Token,
        start: &Expr,
        end: &Expr,
        step: Option<&Expr>,
        body: &Stmt,
    ) -> EvalResult<()> {
        let name = variable.lexeme.as_str();
        let initial = self.evaluate(start)?;
        self.env.define(name, initial);

        // A non-numeric step is ignored
        let step = match step {
            Some(expr) => self.evaluate(expr)?.as_number().unwrap_or(1.0),
            None => 1.0,
        };

        loop {
            let current = self.lookup(name)?;
            let bound = self.evaluate(end)?;
            let (Some(current), Some(bound)) = (current.as_number(), bound.as_number()) else {
                break;
            };
            if step > 0.0 && current >= bound {
                break;
            }
            if step < 0.0 && current <= bound {
                break;
            }

            self.execute(body)?;

            let Some(latest) = self.lookup(name)?.as_number() else {
                return Err(ScriboError::type_error(format!(
                    "Loop variable '{}' must remain a number.",
                    name
                ))
                .at_line(variable.line));
            };
            self.env.define(name, Value::Number(latest + step));
        }
        Ok(())
    }

    fn execute_read(&mut self, target: &Token) -> EvalResult<()> {
        if self.options.echo_read_prompt {
            let prompt = format!("Input ({}): ", target.lexeme);
            self.write_output(&prompt);
        }

        let Some(line) = self.input.read_line() else {
            return Err(ScriboError::new(
                ErrorKind::InputError,
                format!("No input available for '{}'.", target.lexeme),
            )
            .at_line(target.line));
        };

        self.env.define(target.lexeme.clone(), Value::from_input(&line));
        Ok(())
    }

    /// Evaluates an expression to a value
    pub fn evaluate(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal(raw) => Ok(Value::from_literal(raw)),
            Expr::Variable(name) => self.lookup(name),
            Expr::Unary { operator, operand } => {
                let value = self.evaluate(operand)?;
                match operator.kind {
                    TokenKind::Minus => match value {
                        Value::Number(n) => Ok(Value::Number(-n)),
                        other => Err(ScriboError::type_error(format!(
                            "Operand of '-' must be a number, found {}.",
                            other.type_name()
                        ))
                        .at_line(operator.line)),
                    },
                    TokenKind::Not => Ok(Value::Boolean(!value.is_truthy())),
                    _ => Err(unsupported_operator(operator)),
                }
            }
            Expr::Binary { left, operator, right } => {
                // Both sides are evaluated, including for `and`/`or`
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                binary_op(&left, operator, &right)
            }
        }
    }

    fn lookup(&self, name: &str) -> EvalResult<Value> {
        self.env
            .get(name)
            .ok_or_else(|| ScriboError::undefined_variable(name, &self.env.names()))
    }

    /// Helper to write one line to the injected output sink
    fn write_output(&mut self, line: &str) {
        self.output.write_line(line);
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn binary_op(left: &Value, operator: &Token, right: &Value) -> EvalResult<Value> {
    match operator.kind {
        TokenKind::Plus => match (left, right) {
            (Value::Text(_), _) | (_, Value::Text(_)) => {
                Ok(Value::Text(format!("{}{}", left, right)))
            }
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            _ => Err(operand_error(operator, left, right)),
        },
        TokenKind::Minus => {
            let (a, b) = numeric_operands(operator, left, right)?;
            Ok(Value::Number(a - b))
        }
        TokenKind::Star => {
            let (a, b) = numeric_operands(operator, left, right)?;
            Ok(Value::Number(a * b))
        }
        TokenKind::Slash => {
            // The divisor is checked before the dividend's type
            if right.as_number() == Some(0.0) {
                return Err(ScriboError::division_by_zero().at_line(operator.line));
            }
            let (a, b) = numeric_operands(operator, left, right)?;
            Ok(Value::Number(a / b))
        }
        TokenKind::Greater => compare(operator, left, right, |a, b| a > b),
        TokenKind::GreaterEqual => compare(operator, left, right, |a, b| a >= b),
        TokenKind::Less => compare(operator, left, right, |a, b| a < b),
        TokenKind::LessEqual => compare(operator, left, right, |a, b| a <= b),
        TokenKind::EqualEqual => Ok(Value::Boolean(left == right)),
        TokenKind::BangEqual => Ok(Value::Boolean(left != right)),
        TokenKind::And => Ok(Value::Boolean(left.is_truthy() && right.is_truthy())),
        TokenKind::Or => Ok(Value::Boolean(left.is_truthy() || right.is_truthy())),
        _ => Err(unsupported_operator(operator)),
    }
}

fn compare(
    operator: &Token,
    left: &Value,
    right: &Value,
    cmp: impl Fn(f64, f64) -> bool,
) -> EvalResult<Value> {
    let (a, b) = numeric_operands(operator, left, right)?;
    Ok(Value::Boolean(cmp(a, b)))
}

fn numeric_operands(operator: &Token, left: &Value, right: &Value) -> EvalResult<(f64, f64)> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        _ => Err(operand_error(operator, left, right)),
    }
}

fn operand_error(operator: &Token, left: &Value, right: &Value) -> ScriboError {
    ScriboError::type_error(format!(
        "Operands of '{}' must be numbers, found {} and {}.",
        operator.lexeme,
        left.type_name(),
        right.type_name()
    ))
    .at_line(operator.line)
}

fn unsupported_operator(operator: &Token) -> ScriboError {
    ScriboError::runtime_error(format!("Unsupported operator '{}'.", operator.lexeme))
        .at_line(operator.line)
}
