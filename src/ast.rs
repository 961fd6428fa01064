// File: src/ast.rs
//
// Abstract Syntax Tree (AST) definitions for the Scribo language.
// Defines the structure of parsed Scribo programs.
//
// Expressions (Expr) represent values and computations, while statements
// (Stmt) represent actions and control flow. Literals keep their raw lexeme;
// the interpreter decides their runtime type when they are evaluated.

use crate::lexer::Token;

/// Represents an expression in Scribo - something that evaluates to a value
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Raw literal lexeme such as `10`, `3.5`, `"hi"`, `'a'` or `true`
    Literal(String),
    Variable(String),
    /// Prefix `-` or `not`
    Unary {
        operator: Token,
        operand: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn literal(raw: impl Into<String>) -> Self {
        Expr::Literal(raw.into())
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expr::Variable(name.into())
    }
}

/// Represents a statement in Scribo
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expression(Expr),
    Show(Expr),
    /// `[type] name := initializer`; a `list` span leaves the initializer empty
    VarDecl {
        name: Token,
        initializer: Option<Expr>,
    },
    /// Runs in the same flat environment as its parent
    Block(Vec<Stmt>),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    ForRange {
        variable: Token,
        start: Expr,
        end: Expr,
        step: Option<Expr>,
        body: Box<Stmt>,
    },
    ReadInput {
        target: Token,
    },
}
