// Integration tests for the Scribo tokenizer
//
// Covers token kinds and lexemes for complete programs, identifier context
// rules, literals, comments, list spans and the fatal error behavior.

use scribo::diagnostics::{Diagnostics, Phase};
use scribo::lexer::{tokenize, tokenize_with, LexerOptions, LiteralValue, Token, TokenKind};

fn lex(source: &str) -> (Vec<Token>, Diagnostics, bool) {
    let mut diags = Diagnostics::new();
    let (tokens, ok) = tokenize(source, &mut diags);
    (tokens, diags, ok)
}

fn kinds(source: &str) -> Vec<TokenKind> {
    let (tokens, diags, ok) = lex(source);
    assert!(ok, "unexpected diagnostics: {:?}", diags.records());
    tokens.iter().map(|t| t.kind).collect()
}

#[test]
fn test_show_addition_tokens() {
    let (tokens, diags, ok) = lex("show 1 + 2");
    assert!(ok);
    assert!(diags.is_empty());
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Show,
            TokenKind::NumberLiteral,
            TokenKind::Plus,
            TokenKind::NumberLiteral,
            TokenKind::Eof
        ]
    );
    let lexemes: Vec<&str> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
    assert_eq!(lexemes, vec!["show", "1", "+", "2", ""]);
}

#[test]
fn test_declaration_with_type_keyword() {
    assert_eq!(
        kinds("number x := 10;"),
        vec![
            TokenKind::NumberType,
            TokenKind::Identifier,
            TokenKind::Assign,
            TokenKind::NumberLiteral,
            TokenKind::Semicolon,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_type_keyword_aliases() {
    assert_eq!(kinds("int a := 1")[0], TokenKind::NumberType);
    assert_eq!(kinds("float a := 1")[0], TokenKind::NumberType);
    assert_eq!(kinds("string a := 1")[0], TokenKind::TextType);
    assert_eq!(kinds("char a := 1")[0], TokenKind::TextType);
    assert_eq!(kinds("bool a := true")[0], TokenKind::BooleanType);
    assert_eq!(kinds("double a := 1")[0], TokenKind::DoubleType);
}

#[test]
fn test_comparison_and_logic() {
    assert_eq!(
        kinds("show a >= 1 and b != 2 or not c == d"),
        vec![
            TokenKind::Show,
            TokenKind::Identifier,
            TokenKind::GreaterEqual,
            TokenKind::NumberLiteral,
            TokenKind::And,
            TokenKind::Identifier,
            TokenKind::BangEqual,
            TokenKind::NumberLiteral,
            TokenKind::Or,
            TokenKind::Not,
            TokenKind::Identifier,
            TokenKind::EqualEqual,
            TokenKind::Identifier,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_literal_values() {
    let (tokens, _, ok) = lex("show 42 + 2.5 + \"hi\" + 'x' + true");
    assert!(ok);
    let literals: Vec<Option<LiteralValue>> = tokens
        .iter()
        .filter(|t| t.literal.is_some())
        .map(|t| t.literal.clone())
        .collect();
    assert_eq!(
        literals,
        vec![
            Some(LiteralValue::Integer(42)),
            Some(LiteralValue::Float(2.5)),
            Some(LiteralValue::Text("hi".to_string())),
            Some(LiteralValue::Text("x".to_string())),
            Some(LiteralValue::Boolean(true)),
        ]
    );
    // String lexemes keep their quotes
    assert_eq!(tokens[5].lexeme, "\"hi\"");
    assert_eq!(tokens[7].lexeme, "'x'");
}

#[test]
fn test_char_escape() {
    let (tokens, _, ok) = lex("show '\\n'");
    assert!(ok);
    assert_eq!(tokens[1].literal, Some(LiteralValue::Text("\n".to_string())));
}

#[test]
fn test_comments_are_skipped() {
    assert_eq!(
        kinds("# a comment\nshow 1 #[ block\n comment ]# + 2"),
        vec![
            TokenKind::Show,
            TokenKind::NumberLiteral,
            TokenKind::Plus,
            TokenKind::NumberLiteral,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_lines_advance_on_newlines() {
    let (tokens, _, _) = lex("show 1\n\nshow 2");
    assert_eq!(tokens[0].line, 1);
    assert_eq!(tokens[2].line, 3);
    assert_eq!(tokens[3].line, 3);
}

#[test]
fn test_list_span_collapses_to_brackets() {
    assert_eq!(
        kinds("list xs := [1, [2, 3], 4]"),
        vec![
            TokenKind::ListType,
            TokenKind::Identifier,
            TokenKind::Assign,
            TokenKind::LeftBracket,
            TokenKind::RightBracket,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_bracket_outside_list_is_fatal() {
    let (tokens, diags, ok) = lex("show [1]");
    assert!(!ok);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags.records()[0].phase, Phase::Lexical);
    assert!(tokens.iter().all(|t| t.kind != TokenKind::Eof));
}

#[test]
fn test_stray_word_after_literal() {
    let (_, diags, ok) = lex("show 1 oops");
    assert!(!ok);
    assert_eq!(diags.records()[0].location.as_deref(), Some("oops"));
}

#[test]
fn test_identifier_on_new_line_is_allowed() {
    assert!(lex("show 1\ncount := 2").2);
}

#[test]
fn test_single_equals_is_fatal() {
    let (_, diags, ok) = lex("x = 1");
    assert!(!ok);
    assert_eq!(diags.records()[0].line, 1);
    assert_eq!(diags.records()[0].location.as_deref(), Some("="));
}

#[test]
fn test_first_error_stops_tokenizing() {
    let (tokens, diags, ok) = lex("show 1\nshow @\nshow $");
    assert!(!ok);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags.records()[0].line, 2);
    assert_eq!(tokens.len(), 3);
}

#[test]
fn test_unterminated_string() {
    let (_, diags, ok) = lex("show \"open");
    assert!(!ok);
    assert_eq!(diags.records()[0].message, "Unterminated string.");
}

#[test]
fn test_unterminated_block_comment() {
    let (_, _, ok) = lex("show 1 #[ never closed");
    assert!(!ok);
}

#[test]
fn test_integer_overflow_is_invalid_number() {
    let (_, diags, ok) = lex("show 99999999999999999999");
    assert!(!ok);
    assert!(diags.records()[0].message.starts_with("Invalid number"));
}

#[test]
fn test_strict_terminators() {
    let strict = LexerOptions { strict_terminators: true };

    let mut diags = Diagnostics::new();
    let (_, ok) = tokenize_with("number x := 1;\nshow x", strict, &mut diags);
    assert!(ok, "{:?}", diags.records());

    let mut diags = Diagnostics::new();
    let (_, ok) = tokenize_with("number x := 1\nshow x", strict, &mut diags);
    assert!(!ok);
    assert_eq!(diags.records()[0].message, "Expected ';' at end of line.");

    let mut diags = Diagnostics::new();
    let (_, ok) = tokenize_with("x := 1", strict, &mut diags);
    assert!(!ok);

    // The default options never require terminators
    let mut diags = Diagnostics::new();
    let (_, ok) = tokenize("number x := 1\nshow x", &mut diags);
    assert!(ok);
}

#[test]
fn test_tokens_serialize_to_json() {
    let (tokens, _, _) = lex("show 7");
    let json = serde_json::to_value(&tokens).unwrap();
    assert_eq!(json[0]["kind"], "Show");
    assert_eq!(json[1]["literal"]["type"], "Integer");
    assert_eq!(json[1]["literal"]["value"], 7);
}

fn first_error(source: &str) -> String {
    let (tokens, diags, ok) = lex(source);
    assert!(!ok, "expected a lexical error for {:?}", source);
    assert_eq!(diags.len(), 1);
    assert!(tokens.iter().all(|t| t.kind != TokenKind::Eof));
    diags.records()[0].message.clone()
}

#[test]
fn test_char_literal_errors() {
    assert_eq!(first_error("show 'ab'"), "Character literal must contain exactly one character.");
    assert_eq!(first_error("show '\\q'"), "Invalid escape sequence '\\q'.");
    assert_eq!(first_error("show '"), "Unterminated character literal.");
    assert_eq!(first_error("show '\\"), "Incomplete escape sequence.");
}

#[test]
fn test_char_literal_cut_off_after_one_char() {
    assert_eq!(first_error("show 'a"), "Unterminated character literal.");
    assert_eq!(first_error("show '\\n"), "Unterminated character literal.");
}

#[test]
fn test_unbalanced_list_span() {
    assert_eq!(first_error("list x := [1"), "Unclosed list literal.");
    assert_eq!(first_error("list x := [1, [2]"), "Unclosed list literal.");
}

#[test]
fn test_block_comment_inside_list_span() {
    assert_eq!(
        kinds("list x := [1, #[ ] ]# 2]"),
        vec![
            TokenKind::ListType,
            TokenKind::Identifier,
            TokenKind::Assign,
            TokenKind::LeftBracket,
            TokenKind::RightBracket,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_stray_word_after_undeclared_identifier() {
    let (_, diags, ok) = lex("foo bar");
    assert!(!ok);
    assert_eq!(diags.records()[0].location.as_deref(), Some("bar"));
    assert_eq!(diags.records()[0].message, "Stray word 'bar'.");
}
