//! Integration tests for the markup tokenizer.

use std::io::{self, BufReader, Read};

use quire_markup::{MarkupError, Token, TokenKind, Tokenizer, TokenizerState};

/// Helper to tokenize a string and return the raw token texts
fn raw_tokens(input: &str) -> Vec<String> {
    let mut tokenizer = Tokenizer::new(input.as_bytes());
    let mut tokens = Vec::new();
    loop {
        let token = tokenizer.next_token().unwrap();
        if token.is_empty() {
            return tokens;
        }
        tokens.push(token);
    }
}

/// Helper to tokenize a string into classified tokens
fn tokenize(input: &str) -> Vec<Token> {
    Tokenizer::new(input.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("disk on fire"))
    }
}

#[test]
fn test_mixed_content_tokens() {
    assert_eq!(
        raw_tokens("  <p>Hello <b>World</b>!</p>"),
        ["<p>", "Hello ", "<b>", "World", "</b>", "!", "</p>"]
    );
}

#[test]
fn test_layout_whitespace_is_dropped() {
    let input = "<a>\n    text\n    <b/>\n</a>\n";
    assert_eq!(raw_tokens(input), ["<a>", "text", "<b/>", "</a>"]);
}

#[test]
fn test_empty_input() {
    assert!(raw_tokens("").is_empty());
    assert!(raw_tokens(" \n\t ").is_empty());
}

#[test]
fn test_quoted_gt_does_not_end_tag() {
    assert_eq!(
        raw_tokens(r#"<img alt=">" src="x.png">"#),
        [r#"<img alt=">" src="x.png">"#]
    );
}

#[test]
fn test_tag_spanning_lines_keeps_inner_whitespace() {
    let tokens = tokenize("<img\n  src=\"x\"\n/>");
    assert_eq!(tokens, [Token::SelfClosingTag("<img\n  src=\"x\"\n/>".to_string())]);
}

#[test]
fn test_tag_trailing_whitespace_trimmed() {
    // A tag cut off by the end of input keeps what it has, minus the
    // trailing whitespace.
    assert_eq!(raw_tokens("<a>text</a  \n"), ["<a>", "text", "</a"]);
}

#[test]
fn test_classification() {
    let tokens = tokenize(
        r#"<?xml version="1.0"?><!DOCTYPE html><a><br/></a><>text<b"#,
    );
    let kinds: Vec<TokenKind> = tokens.iter().map(Token::kind).collect();
    assert_eq!(
        kinds,
        [
            TokenKind::Header,
            TokenKind::Header,
            TokenKind::StartTag,
            TokenKind::SelfClosingTag,
            TokenKind::EndTag,
            TokenKind::Malformed,
            TokenKind::Text,
            TokenKind::Malformed,
        ]
    );
}

#[test]
fn test_token_kind_display() {
    assert_eq!(TokenKind::SelfClosingTag.to_string(), "self-closing tag");
    assert_eq!(TokenKind::EndTag.to_string(), "end tag");
}

#[test]
fn test_end_tag_name() {
    assert_eq!(Token::classify("</ a >".to_string()).end_tag_name(), Some("a"));
    assert_eq!(Token::classify("</>".to_string()).end_tag_name(), Some(""));
    assert_eq!(Token::classify("<a>".to_string()).end_tag_name(), None);
}

#[test]
fn test_raw_text_is_preserved() {
    let token = Token::classify("<a href=\"x\">".to_string());
    assert_eq!(token.raw(), "<a href=\"x\">");
}

#[test]
fn test_multibyte_text() {
    assert_eq!(raw_tokens("<p>héllo wörld <b>ü</b></p>")[1], "héllo wörld ");
}

#[test]
fn test_long_token_spans_buffer_chunks() {
    let long = "x".repeat(5000);
    let tokens = raw_tokens(&format!("<p>{long}</p>"));
    assert_eq!(tokens[1], long);
}

#[test]
fn test_invalid_utf8_is_reported() {
    let input: &[u8] = b"<a>\xff\xfe</a>";
    let mut tokenizer = Tokenizer::new(input);
    assert!(matches!(tokenizer.next(), Some(Ok(Token::StartTag(_)))));
    assert!(matches!(tokenizer.next(), Some(Err(MarkupError::InvalidUtf8(_)))));
    assert!(tokenizer.next().is_none());
}

#[test]
fn test_read_error_is_reported() {
    let mut tokenizer = Tokenizer::new(BufReader::new(FailingReader));
    let err = tokenizer.next_token().unwrap_err();
    assert!(matches!(err, MarkupError::Read(_)));
}

#[test]
fn test_iterator_is_fused_after_end() {
    let mut tokenizer = Tokenizer::new(&b"<a/>"[..]);
    assert!(tokenizer.next().is_some());
    assert!(tokenizer.next().is_none());
    assert!(tokenizer.next().is_none());
}

#[test]
fn test_initial_state() {
    let tokenizer = Tokenizer::new(&b""[..]);
    assert_eq!(tokenizer.state(), TokenizerState::BeforeToken);
    assert_eq!(TokenizerState::TagQuoted.to_string(), "TagQuoted");
}
