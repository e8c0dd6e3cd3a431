//! Open-tag analysis.
//!
//! Splits a raw open tag such as `<img  src="x.png"
//! width = "32" />` into an element name and an ordered attribute list.
//!
//! The scan tracks a single "inside double quotes" flag. Outside quotes, a
//! space separates words, `=` joins a key to its value and `>` ends the tag.
//! Inside quotes all three are ordinary characters.

use quire_dom::{Attribute, Node};

/// The analyzed form of an open tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTag {
    /// Text between `<` and the first unquoted delimiter.
    pub name: String,
    /// Attributes in the order they were written.
    pub attributes: Vec<Attribute>,
    /// The tag ended in `/>`: the element has no text and no children.
    pub self_closing: bool,
}

impl OpenTag {
    /// Build a childless node carrying this tag's name and attributes.
    #[must_use]
    pub fn into_node(self) -> Node {
        let mut node = Node::new(self.name);
        for attribute in self.attributes {
            node.add_attribute(attribute.key, attribute.value);
        }
        node.set_self_closing(self.self_closing);
        node
    }
}

/// One lexical piece of the attribute list.
#[derive(Debug, PartialEq, Eq)]
enum Piece {
    Word(String),
    Equals,
}

/// Analyze one raw open-tag token.
///
/// 1. Every run of whitespace becomes a single space, so attribute lists
///    may span lines.
/// 2. The name runs from just after `<` to the first unquoted space, `=`,
///    or `>`.
/// 3. Each later `key=value` (spaces around `=` allowed) becomes one
///    attribute. A value wrapped in double quotes is unwrapped; a key with
///    no `=` gets an empty value; a stray `=` is ignored.
/// 4. Scanning stops at the first unquoted `>`. An unquoted `/` right
///    before it marks the tag self-closing.
///
/// An unterminated quote is not detected: the rest of the token becomes
/// part of the pending word, and its value keeps its opening quote.
#[must_use]
pub fn analyze_open_tag(raw: &str) -> OpenTag {
    let normalized = normalize_whitespace(raw);
    let body = normalized.strip_prefix('<').unwrap_or(&normalized);

    let mut name: Option<String> = None;
    let mut pieces = Vec::new();
    let mut word = String::new();
    let mut in_quotes = false;
    let mut ends_with_slash = false;
    let mut self_closing = false;

    for c in body.chars() {
        if in_quotes {
            word.push(c);
            in_quotes = c != '"';
            continue;
        }
        match c {
            '"' => {
                word.push(c);
                in_quotes = true;
            }
            ' ' => finish_word(&mut name, &mut pieces, &mut word),
            '=' => {
                finish_word(&mut name, &mut pieces, &mut word);
                pieces.push(Piece::Equals);
            }
            '>' => {
                if ends_with_slash {
                    let _ = word.pop();
                    self_closing = true;
                }
                break;
            }
            _ => word.push(c),
        }
        ends_with_slash = c == '/';
    }
    // Whatever was pending when the scan stopped is committed.
    finish_word(&mut name, &mut pieces, &mut word);

    OpenTag {
        name: name.unwrap_or_default(),
        attributes: fold_attributes(pieces),
        self_closing,
    }
}

/// Collapse each maximal run of whitespace into a single space.
fn normalize_whitespace(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut in_space = false;
    for c in raw.chars() {
        if c.is_ascii_whitespace() {
            if !in_space {
                result.push(' ');
            }
            in_space = true;
        } else {
            result.push(c);
            in_space = false;
        }
    }
    result
}

/// The first finished word is the name (even if empty); later empty words
/// are dropped.
fn finish_word(name: &mut Option<String>, pieces: &mut Vec<Piece>, word: &mut String) {
    let finished = std::mem::take(word);
    if name.is_none() {
        *name = Some(finished);
    } else if !finished.is_empty() {
        pieces.push(Piece::Word(finished));
    }
}

fn fold_attributes(pieces: Vec<Piece>) -> Vec<Attribute> {
    let mut attributes = Vec::new();
    let mut pieces = pieces.into_iter().peekable();

    while let Some(piece) = pieces.next() {
        let Piece::Word(key) = piece else {
            continue;
        };
        if pieces.next_if_eq(&Piece::Equals).is_none() {
            attributes.push(Attribute::new(key, ""));
            continue;
        }
        match pieces.next_if(|p| matches!(p, Piece::Word(_))) {
            Some(Piece::Word(value)) => attributes.push(Attribute::new(key, unquote(&value))),
            _ => attributes.push(Attribute::new(key, "")),
        }
    }
    attributes
}

/// Strip one pair of surrounding double quotes, if both are present.
fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
