// File: src/lexer.rs
//
// Lexical analyzer (tokenizer) for the Scribo scripting language.
// Converts source text into a stream of tokens for parsing.
//
// Supports:
// - Keywords: show, format, read, if, else, while, for, function, return
// - Advisory type keywords: number/int/float, text/string/char, boolean/bool,
//   list, long, short, unsigned, double, void
// - Number, string ("..."), character ('x') and boolean (true/false) literals
// - Operators: + - * / % ++ -- += -= *= /= %= > >= < <= == != := and or not
// - Punctuation: ( ) { } [ ] , ;
// - Line comments starting with # and block comments #[ ... ]#
// - Opaque list literal spans: after `list`, the bracketed initializer is
//   balanced and collapsed into a `[` `]` token pair
//
// Identifiers are validated against the preceding token so that stray words
// are reported here rather than surfacing later as parse errors. The first
// lexical error is fatal: no further tokens are produced and no end-of-input
// token is appended.

use crate::diagnostics::{Diagnostics, Phase};
use ahash::{AHashMap, AHashSet};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // Grouping and separators
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Semicolon,

    // Arithmetic and compound assignment
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    PercentEqual,

    // Comparison and equality
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    EqualEqual,
    BangEqual,

    // Logical
    And,
    Or,
    Not,

    Assign,

    // Literals
    NumberLiteral,
    TextLiteral,
    BooleanLiteral,
    Identifier,

    // Type names (advisory only)
    NumberType,
    TextType,
    BooleanType,
    ListType,
    LongType,
    ShortType,
    UnsignedType,
    DoubleType,
    VoidType,

    // Statement keywords
    Show,
    Format,
    Read,
    If,
    Else,
    While,
    For,
    Function,
    Return,

    Error,
    Eof,
}

impl TokenKind {
    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::NumberType
                | TokenKind::TextType
                | TokenKind::BooleanType
                | TokenKind::ListType
                | TokenKind::LongType
                | TokenKind::ShortType
                | TokenKind::UnsignedType
                | TokenKind::DoubleType
                | TokenKind::VoidType
        )
    }

    /// Arithmetic, increment/decrement and compound assignment operators
    pub fn is_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
                | TokenKind::PlusEqual
                | TokenKind::MinusEqual
                | TokenKind::StarEqual
                | TokenKind::SlashEqual
                | TokenKind::PercentEqual
        )
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            TokenKind::Greater
                | TokenKind::GreaterEqual
                | TokenKind::Less
                | TokenKind::LessEqual
                | TokenKind::EqualEqual
                | TokenKind::BangEqual
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, TokenKind::And | TokenKind::Or | TokenKind::Not)
    }

    pub fn is_statement_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Show
                | TokenKind::Format
                | TokenKind::Read
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Function
                | TokenKind::Return
        )
    }
}

/// Typed value attached to literal tokens
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum LiteralValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literal: Option<LiteralValue>,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize) -> Self {
        Token { kind, lexeme: lexeme.into(), literal: None, line, column: 0 }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?} '{}' (line {})", self.kind, self.lexeme, self.line)
    }
}

/// Knobs for the tokenizer, usually filled from `scribo.toml`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LexerOptions {
    /// Require `;` after an assignment before the line (or the input) ends
    pub strict_terminators: bool,
}

static KEYWORDS: Lazy<AHashMap<&'static str, TokenKind>> = Lazy::new(|| {
    let mut m = AHashMap::new();
    m.insert("show", TokenKind::Show);
    m.insert("format", TokenKind::Format);
    m.insert("read", TokenKind::Read);
    m.insert("if", TokenKind::If);
    m.insert("else", TokenKind::Else);
    m.insert("while", TokenKind::While);
    m.insert("for", TokenKind::For);
    m.insert("function", TokenKind::Function);
    m.insert("return", TokenKind::Return);

    m.insert("number", TokenKind::NumberType);
    m.insert("int", TokenKind::NumberType);
    m.insert("float", TokenKind::NumberType);
    m.insert("text", TokenKind::TextType);
    m.insert("string", TokenKind::TextType);
    m.insert("char", TokenKind::TextType);
    m.insert("boolean", TokenKind::BooleanType);
    m.insert("bool", TokenKind::BooleanType);
    m.insert("list", TokenKind::ListType);
    m.insert("long", TokenKind::LongType);
    m.insert("short", TokenKind::ShortType);
    m.insert("unsigned", TokenKind::UnsignedType);
    m.insert("double", TokenKind::DoubleType);
    m.insert("void", TokenKind::VoidType);

    m.insert("true", TokenKind::BooleanLiteral);
    m.insert("false", TokenKind::BooleanLiteral);

    m.insert("and", TokenKind::And);
    m.insert("or", TokenKind::Or);
    m.insert("not", TokenKind::Not);
    m
});

/// Tokenizes Scribo source with default options.
///
/// Returns the tokens and whether tokenization succeeded. On failure the
/// token vector is a truncated prefix without an end-of-input token and must
/// not be handed to the parser.
pub fn tokenize(source: &str, diagnostics: &mut Diagnostics) -> (Vec<Token>, bool) {
    tokenize_with(source, LexerOptions::default(), diagnostics)
}

pub fn tokenize_with(
    source: &str,
    options: LexerOptions,
    diagnostics: &mut Diagnostics,
) -> (Vec<Token>, bool) {
    Lexer::new(source, options, diagnostics).scan()
}

struct Lexer<'a> {
    chars: Vec<char>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: usize,
    column: usize,
    start_line: usize,
    start_column: usize,
    failed: bool,
    in_statement: bool,
    expecting_terminator: bool,
    current_type: Option<TokenKind>,
    declared: AHashSet<String>,
    options: LexerOptions,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> Lexer<'a> {
    fn new(source: &str, options: LexerOptions, diagnostics: &'a mut Diagnostics) -> Self {
        Lexer {
            chars: source.chars().collect(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            start_line: 1,
            start_column: 1,
            failed: false,
            in_statement: false,
            expecting_terminator: false,
            current_type: None,
            declared: AHashSet::new(),
            options,
            diagnostics,
        }
    }

    fn scan(mut self) -> (Vec<Token>, bool) {
        while !self.is_at_end() && !self.failed {
            self.start = self.current;
            self.start_line = self.line;
            self.start_column = self.column;
            self.scan_token();
        }

        if !self.failed && self.options.strict_terminators && self.expecting_terminator {
            self.start_line = self.line;
            self.error("Unterminated statement: expected ';'.", None);
        }

        if !self.failed {
            self.tokens.push(Token {
                kind: TokenKind::Eof,
                lexeme: String::new(),
                literal: None,
                line: self.line,
                column: self.column,
            });
        }

        tracing::debug!(tokens = self.tokens.len(), success = !self.failed, "tokenized source");
        (self.tokens, !self.failed)
    }

    fn scan_token(&mut self) {
        let c = self.advance();
        match c {
            '(' => {
                self.add_token(TokenKind::LeftParen);
                self.in_statement = true;
            }
            ')' => self.add_token(TokenKind::RightParen),
            '{' => {
                self.add_token(TokenKind::LeftBrace);
                self.in_statement = true;
            }
            '}' => {
                self.add_token(TokenKind::RightBrace);
                self.in_statement = false;
            }
            ',' => self.add_token(TokenKind::Comma),
            ';' => {
                self.add_token(TokenKind::Semicolon);
                self.in_statement = false;
                self.expecting_terminator = false;
                self.current_type = None;
            }
            '+' => {
                let kind = if self.match_char('+') {
                    TokenKind::PlusPlus
                } else if self.match_char('=') {
                    TokenKind::PlusEqual
                } else {
                    TokenKind::Plus
                };
                self.add_operator(kind);
            }
            '-' => {
                let kind = if self.match_char('-') {
                    TokenKind::MinusMinus
                } else if self.match_char('=') {
                    TokenKind::MinusEqual
                } else {
                    TokenKind::Minus
                };
                self.add_operator(kind);
            }
            '*' => {
                let kind = if self.match_char('=') { TokenKind::StarEqual } else { TokenKind::Star };
                self.add_operator(kind);
            }
            '/' => {
                let kind = if self.match_char('=') { TokenKind::SlashEqual } else { TokenKind::Slash };
                self.add_operator(kind);
            }
            '%' => {
                let kind =
                    if self.match_char('=') { TokenKind::PercentEqual } else { TokenKind::Percent };
                self.add_operator(kind);
            }
            '=' => {
                if self.match_char('=') {
                    self.add_token(TokenKind::EqualEqual);
                } else {
                    self.error("Operator '=' is not valid. Use ':=' for assignment.", Some("="));
                }
            }
            '!' => {
                if self.match_char('=') {
                    self.add_token(TokenKind::BangEqual);
                } else {
                    self.error("Unexpected character '!'. Use 'not' for negation.", Some("!"));
                }
            }
            '>' => {
                let kind =
                    if self.match_char('=') { TokenKind::GreaterEqual } else { TokenKind::Greater };
                self.add_token(kind);
            }
            '<' => {
                let kind = if self.match_char('=') { TokenKind::LessEqual } else { TokenKind::Less };
                self.add_token(kind);
            }
            ':' => {
                if self.match_char('=') {
                    if let Some(prev) = self.tokens.last() {
                        if prev.kind == TokenKind::Identifier {
                            self.declared.insert(prev.lexeme.clone());
                        }
                    }
                    self.add_token(TokenKind::Assign);
                    if self.options.strict_terminators {
                        self.expecting_terminator = true;
                    }
                } else {
                    self.error("Expected ':=' for assignment.", Some(":"));
                }
            }
            ' ' | '\r' | '\t' => {}
            '\n' => {
                if self.in_statement && self.expecting_terminator {
                    self.error("Expected ';' at end of line.", None);
                }
            }
            '"' => self.string(),
            '\'' => self.character(),
            '#' => self.comment(),
            '[' => self.list_span(),
            ']' => {
                if self.in_statement {
                    self.add_token(TokenKind::RightBracket);
                } else {
                    self.error("Incorrect use of brackets.", Some("]"));
                }
            }
            c if c.is_ascii_digit() => self.number(),
            c if is_alpha(c) => self.identifier(),
            other => {
                let lexeme = other.to_string();
                self.error(&format!("Unexpected character '{}'.", other), Some(lexeme.as_str()));
            }
        }
    }

    fn comment(&mut self) {
        if self.match_char('[') {
            if !self.skip_block_comment() {
                self.error("Unterminated block comment.", None);
            }
        } else {
            while self.peek() != '\n' && !self.is_at_end() {
                self.advance();
            }
        }
    }

    /// Skips to just past the closing `]#`; false when input ends first
    fn skip_block_comment(&mut self) -> bool {
        while !(self.peek() == ']' && self.peek_next() == '#') && !self.is_at_end() {
            self.advance();
        }
        if self.is_at_end() {
            return false;
        }
        self.advance();
        self.advance();
        true
    }

    fn list_span(&mut self) {
        if self.current_type != Some(TokenKind::ListType) {
            self.error("Incorrect use of brackets.", Some("["));
            return;
        }

        self.add_token(TokenKind::LeftBracket);
        self.in_statement = true;
        self.current_type = None;

        let mut depth = 1;
        while !self.is_at_end() && depth > 0 {
            match self.peek() {
                '[' => {
                    depth += 1;
                    self.advance();
                }
                ']' => {
                    depth -= 1;
                    self.advance();
                }
                '#' if self.peek_next() == '[' => {
                    self.advance();
                    self.advance();
                    if !self.skip_block_comment() {
                        self.error("Unterminated block comment inside list.", None);
                        return;
                    }
                }
                _ => {
                    self.advance();
                }
            }
        }

        if depth > 0 {
            self.error("Unclosed list literal.", None);
            return;
        }

        // The span's closing bracket becomes its own token
        self.start = self.current - 1;
        self.start_line = self.line;
        self.start_column = self.column - 1;
        self.add_token(TokenKind::RightBracket);
    }

    fn number(&mut self) {
        let mut is_float = false;
        while self.peek().is_ascii_digit() {
            self.advance();
        }
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            is_float = true;
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let text = self.lexeme();
        let literal = if is_float {
            text.parse::<f64>().ok().map(LiteralValue::Float)
        } else {
            text.parse::<i64>().ok().map(LiteralValue::Integer)
        };

        match literal {
            Some(value) => self.add_literal(TokenKind::NumberLiteral, value),
            None => self.error(&format!("Invalid number '{}'.", text), Some(text.as_str())),
        }
    }

    fn string(&mut self) {
        while self.peek() != '"' && !self.is_at_end() {
            self.advance();
        }

        if self.is_at_end() {
            self.error("Unterminated string.", None);
            return;
        }

        self.advance();
        let value: String = self.chars[self.start + 1..self.current - 1].iter().collect();
        self.add_literal(TokenKind::TextLiteral, LiteralValue::Text(value));
    }

    fn character(&mut self) {
        if self.is_at_end() {
            self.error("Unterminated character literal.", None);
            return;
        }

        let mut value = self.advance();
        if value == '\\' {
            if self.is_at_end() {
                self.error("Incomplete escape sequence.", None);
                return;
            }
            let escaped = self.advance();
            value = match unescape(escaped) {
                Some(ch) => ch,
                None => {
                    self.error(&format!("Invalid escape sequence '\\{}'.", escaped), None);
                    return;
                }
            };
        }

        if self.is_at_end() {
            self.error("Unterminated character literal.", None);
            return;
        }

        if self.peek() != '\'' {
            self.error("Character literal must contain exactly one character.", None);
            return;
        }

        self.advance();
        self.add_literal(TokenKind::TextLiteral, LiteralValue::Text(value.to_string()));
    }

    fn identifier(&mut self) {
        while is_alphanumeric(self.peek()) {
            self.advance();
        }

        let text = self.lexeme();
        match KEYWORDS.get(text.as_str()).copied() {
            Some(TokenKind::BooleanLiteral) => {
                self.add_literal(TokenKind::BooleanLiteral, LiteralValue::Boolean(text == "true"));
            }
            Some(kind) => {
                if kind.is_type_keyword() {
                    self.in_statement = true;
                    self.current_type = Some(kind);
                }
                self.add_token(kind);
            }
            None => {
                if !self.identifier_permitted() {
                    self.error(&format!("Stray word '{}'.", text), Some(text.as_str()));
                    return;
                }
                self.add_token(TokenKind::Identifier);
            }
        }
    }

    /// Whether an identifier may follow the previously emitted token
    fn identifier_permitted(&self) -> bool {
        let Some(prev) = self.tokens.last() else {
            return true;
        };

        // A fresh line starts a fresh statement
        if prev.line < self.start_line {
            return true;
        }

        match prev.kind {
            k if k.is_operator()
                || k.is_comparison()
                || k.is_logical()
                || k.is_type_keyword()
                || k.is_statement_keyword() =>
            {
                true
            }
            TokenKind::Assign
            | TokenKind::Semicolon
            | TokenKind::LeftParen
            | TokenKind::RightParen
            | TokenKind::LeftBrace
            | TokenKind::RightBrace
            | TokenKind::Comma => true,
            TokenKind::Identifier => self.declared.contains(&prev.lexeme),
            _ => false,
        }
    }

    fn error(&mut self, message: &str, location: Option<&str>) {
        self.failed = true;
        tracing::debug!(line = self.start_line, column = self.start_column, message, "lexical error");
        self.diagnostics.report(Phase::Lexical, self.start_line, location, message);
    }

    fn add_operator(&mut self, kind: TokenKind) {
        self.add_token(kind);
        self.in_statement = true;
    }

    fn add_token(&mut self, kind: TokenKind) {
        self.push(kind, None);
    }

    fn add_literal(&mut self, kind: TokenKind, literal: LiteralValue) {
        self.push(kind, Some(literal));
    }

    fn push(&mut self, kind: TokenKind, literal: Option<LiteralValue>) {
        let lexeme = self.lexeme();
        self.tokens.push(Token {
            kind,
            lexeme,
            literal,
            line: self.start_line,
            column: self.start_column,
        });
    }

    fn lexeme(&self) -> String {
        self.chars[self.start..self.current].iter().collect()
    }

    fn advance(&mut self) -> char {
        let c = self.chars[self.current];
        self.current += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.chars[self.current] != expected {
            return false;
        }
        self.advance();
        true
    }

    fn peek(&self) -> char {
        self.chars.get(self.current).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.chars.get(self.current + 1).copied().unwrap_or('\0')
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_alphanumeric(c: char) -> bool {
    is_alpha(c) || c.is_ascii_digit()
}

/// Decodes the character after a backslash in a character literal
pub fn unescape(c: char) -> Option<char> {
    match c {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        '\\' => Some('\\'),
        '\'' => Some('\''),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut diags = Diagnostics::new();
        let (tokens, ok) = tokenize(source, &mut diags);
        assert!(ok, "unexpected diagnostics: {:?}", diags.records());
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_compound_operators() {
        assert_eq!(
            kinds("1 ++ -- += -= *= /= %= %"),
            vec![
                TokenKind::NumberLiteral,
                TokenKind::PlusPlus,
                TokenKind::MinusMinus,
                TokenKind::PlusEqual,
                TokenKind::MinusEqual,
                TokenKind::StarEqual,
                TokenKind::SlashEqual,
                TokenKind::PercentEqual,
                TokenKind::Percent,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_columns_are_one_based() {
        let mut diags = Diagnostics::new();
        let (tokens, _) = tokenize("show  42", &mut diags);
        assert_eq!(tokens[0].column, 1);
        assert_eq!(tokens[1].column, 7);
    }

    #[test]
    fn test_declared_names_tracked_before_assign() {
        let mut diags = Diagnostics::new();
        let (_, ok) = tokenize("x := 1; x y", &mut diags);
        // `x` was declared, so `y` after it is not a stray word
        assert!(ok);
    }

    #[test]
    fn test_unescape_table() {
        assert_eq!(unescape('n'), Some('\n'));
        assert_eq!(unescape('\''), Some('\''));
        assert_eq!(unescape('q'), None);
    }
}
