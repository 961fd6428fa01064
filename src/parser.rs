// File: src/parser.rs
//
// Recursive descent parser for the Scribo language.
// Transforms a sequence of tokens into a list of statements.
//
// Expression precedence, lowest to highest:
//   logical (and, or) -> equality (== !=) -> comparison (> >= < <=)
//   -> term (+ -) -> factor (* /) -> unary (- not) -> primary
//
// A failed `consume` records a syntax diagnostic and unwinds to the
// top-level statement loop, which skips ahead to the next statement boundary
// and keeps going. One malformed statement costs one diagnostic.

use crate::ast::{Expr, Stmt};
use crate::diagnostics::{Diagnostics, Phase};
use crate::lexer::{Token, TokenKind};

/// Marker for an already-reported syntax error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError;

type ParseResult<T> = Result<T, ParseError>;

/// Parses a complete token stream, reporting syntax errors into `diagnostics`
pub fn parse(tokens: Vec<Token>, diagnostics: &mut Diagnostics) -> Vec<Stmt> {
    Parser::new(tokens, diagnostics).parse()
}

/// Parser maintains position in the token stream and the shared diagnostics sink
pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> Parser<'a> {
    /// Creates a new parser. A stream without a trailing end-of-input token
    /// gets one, so lookahead never runs off the end.
    pub fn new(mut tokens: Vec<Token>, diagnostics: &'a mut Diagnostics) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let line = tokens.last().map(|t| t.line).unwrap_or(1);
            tokens.push(Token::new(TokenKind::Eof, "", line));
        }
        Parser { tokens, pos: 0, diagnostics }
    }

    /// Parse the entire token stream into a vector of statements
    pub fn parse(&mut self) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        while !self.is_at_end() {
            // Skip semicolons between statements
            if self.match_kind(TokenKind::Semicolon) {
                continue;
            }

            let stmt_start = self.pos;
            match self.parse_declaration() {
                Ok(stmt) => stmts.push(stmt),
                Err(ParseError) => self.synchronize(stmt_start),
            }
        }
        tracing::debug!(statements = stmts.len(), "parsed program");
        stmts
    }

    /// Discards tokens until just past a `;` or up to a statement keyword.
    /// A keyword that already belongs to the next statement is kept, so an
    /// error reported at it does not swallow that statement.
    fn synchronize(&mut self, stmt_start: usize) {
        // Guarantees progress when the failing statement's first token is the culprit
        if self.pos == stmt_start {
            self.advance();
        }

        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                break;
            }
            if starts_statement(self.peek().kind) {
                break;
            }
            self.advance();
        }
        tracing::trace!(pos = self.pos, "parser resynchronized");
    }

    fn parse_declaration(&mut self) -> ParseResult<Stmt> {
        if self.peek().kind.is_type_keyword() {
            self.advance(); // type name is advisory
            return self.parse_var_decl();
        }
        if self.check(TokenKind::Identifier) {
            return self.parse_var_decl();
        }
        self.parse_stmt()
    }

    fn parse_var_decl(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(TokenKind::Identifier, "Expected variable name.")?;
        self.consume(TokenKind::Assign, "Expected ':=' after variable name.")?;

        // An opaque list span declares the name without a value
        let initializer = if self.match_kind(TokenKind::LeftBracket) {
            self.consume(TokenKind::RightBracket, "Expected ']' to close list literal.")?;
            None
        } else {
            Some(self.parse_expr()?)
        };

        self.match_kind(TokenKind::Semicolon);
        Ok(Stmt::VarDecl { name, initializer })
    }

    fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        if self.match_kind(TokenKind::If) {
            return self.parse_if();
        }
        if self.match_kind(TokenKind::While) {
            return self.parse_while();
        }
        if self.match_kind(TokenKind::For) {
            return self.parse_for();
        }
        if self.match_kind(TokenKind::Show) {
            let value = self.parse_expr()?;
            self.match_kind(TokenKind::Semicolon);
            return Ok(Stmt::Show(value));
        }
        if self.match_kind(TokenKind::Read) {
            let target =
                self.consume(TokenKind::Identifier, "Expected variable name after 'read'.")?;
            self.match_kind(TokenKind::Semicolon);
            return Ok(Stmt::ReadInput { target });
        }
        if self.match_kind(TokenKind::LeftBrace) {
            return Ok(Stmt::Block(self.parse_block()?));
        }

        let expr = self.parse_expr()?;
        self.match_kind(TokenKind::Semicolon);
        Ok(Stmt::Expression(expr))
    }

    fn parse_block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            if self.match_kind(TokenKind::Semicolon) {
                continue;
            }
            stmts.push(self.parse_declaration()?);
        }
        self.consume(TokenKind::RightBrace, "Expected '}' after block.")?;
        Ok(stmts)
    }

    fn parse_if(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expected '(' after 'if'.")?;
        let condition = self.parse_expr()?;
        self.consume(TokenKind::RightParen, "Expected ')' after condition.")?;

        let then_branch = Box::new(self.parse_declaration()?);
        let else_branch = if self.match_kind(TokenKind::Else) {
            Some(Box::new(self.parse_declaration()?))
        } else {
            None
        };

        Ok(Stmt::If { condition, then_branch, else_branch })
    }

    fn parse_while(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expected '(' after 'while'.")?;
        let condition = self.parse_expr()?;
        self.consume(TokenKind::RightParen, "Expected ')' after condition.")?;
        let body = Box::new(self.parse_declaration()?);
        Ok(Stmt::While { condition, body })
    }

    fn parse_for(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expected '(' after 'for'.")?;
        let variable = self.consume(TokenKind::Identifier, "Expected loop variable name.")?;
        self.consume(TokenKind::Assign, "Expected ':=' after loop variable.")?;
        let start = self.parse_expr()?;
        self.consume(TokenKind::Comma, "Expected ',' after loop start.")?;
        let end = self.parse_expr()?;
        let step = if self.match_kind(TokenKind::Comma) { Some(self.parse_expr()?) } else { None };
        self.consume(TokenKind::RightParen, "Expected ')' after for clauses.")?;

        let body = Box::new(self.parse_declaration()?);
        Ok(Stmt::ForRange { variable, start, end, step, body })
    }

    fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_logical()
    }

    fn parse_logical(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_equality()?;
        while let Some(operator) = self.match_any(&[TokenKind::And, TokenKind::Or]) {
            let right = self.parse_equality()?;
            left = Expr::Binary { left: Box::new(left), operator, right: Box::new(right) };
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_comparison()?;
        while let Some(operator) = self.match_any(&[TokenKind::EqualEqual, TokenKind::BangEqual]) {
            let right = self.parse_comparison()?;
            left = Expr::Binary { left: Box::new(left), operator, right: Box::new(right) };
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_additive()?;
        while let Some(operator) = self.match_any(&[
            TokenKind::Greater,
            TokenKind::GreaterEqual,
            TokenKind::Less,
            TokenKind::LessEqual,
        ]) {
            let right = self.parse_additive()?;
            left = Expr::Binary { left: Box::new(left), operator, right: Box::new(right) };
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        while let Some(operator) = self.match_any(&[TokenKind::Plus, TokenKind::Minus]) {
            let right = self.parse_multiplicative()?;
            left = Expr::Binary { left: Box::new(left), operator, right: Box::new(right) };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;
        while let Some(operator) = self.match_any(&[TokenKind::Star, TokenKind::Slash]) {
            let right = self.parse_unary()?;
            left = Expr::Binary { left: Box::new(left), operator, right: Box::new(right) };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        if let Some(operator) = self.match_any(&[TokenKind::Minus, TokenKind::Not]) {
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary { operator, operand: Box::new(operand) });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        if let Some(token) = self.match_any(&[
            TokenKind::NumberLiteral,
            TokenKind::TextLiteral,
            TokenKind::BooleanLiteral,
        ]) {
            return Ok(Expr::Literal(token.lexeme));
        }

        if let Some(token) = self.match_any(&[TokenKind::Identifier]) {
            return Ok(Expr::Variable(token.lexeme));
        }

        if self.match_kind(TokenKind::LeftParen) {
            let expr = self.parse_expr()?;
            self.consume(TokenKind::RightParen, "Expected ')' after expression.")?;
            return Ok(expr);
        }

        Err(self.error_at_current("Expected expression."))
    }

    // --- token helpers ---

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Consume the current token and return it; stays put at end of input
    fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        self.previous().clone()
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_any(&mut self, kinds: &[TokenKind]) -> Option<Token> {
        if kinds.iter().any(|&k| self.check(k)) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> ParseResult<Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        Err(self.error_at_current(message))
    }

    fn error_at_current(&mut self, message: &str) -> ParseError {
        let token = self.peek();
        let line = token.line;
        let location = if token.kind == TokenKind::Eof { "end".to_string() } else { token.lexeme.clone() };
        self.diagnostics.report(Phase::Syntax, line, Some(location.as_str()), message);
        ParseError
    }
}

/// Keywords the parser resynchronizes on
fn starts_statement(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::If | TokenKind::For | TokenKind::While | TokenKind::Show | TokenKind::Read
    )
}
