//! Property tests: serializing and re-parsing reaches a fixed point after one
//! normalization pass.

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

use quire_markup::{Node, parse_str, to_markup};

const NAMES: &[&str] = &["a", "b", "item", "row", "td"];
const KEYS: &[&str] = &["id", "class", "href", "k"];
const WORDS: &[&str] = &["alpha", "beta", "x=y", "a/b", "q>r", "\"q\"", "é", "!"];
const SEPARATORS: &[&str] = &[" ", "  ", "\n", "\n    ", "\t"];
const VALUES: &[&str] = &["", "1", "x y", "a=b", ">", "/", "/path/to/x.png", "  "];

/// A randomly generated document, kept as its serialized text.
#[derive(Debug, Clone)]
struct Document(String);

fn pick(g: &mut Gen, choices: &'static [&'static str]) -> &'static str {
    g.choose(choices).copied().unwrap_or_default()
}

fn arbitrary_text(g: &mut Gen) -> String {
    let words = 1 + usize::arbitrary(g) % 4;
    let mut text = String::new();
    for i in 0..words {
        if i > 0 {
            text.push_str(pick(g, SEPARATORS));
        }
        text.push_str(pick(g, WORDS));
    }
    if bool::arbitrary(g) {
        text.push_str(pick(g, SEPARATORS));
    }
    text
}

fn arbitrary_node(g: &mut Gen, depth: usize) -> Node {
    let mut node = Node::new(pick(g, NAMES));
    for _ in 0..usize::arbitrary(g) % 3 {
        node.add_attribute(pick(g, KEYS), pick(g, VALUES));
    }
    if bool::arbitrary(g) {
        node.set_text(arbitrary_text(g));
    }
    if depth > 0 {
        for _ in 0..usize::arbitrary(g) % 4 {
            let mut child = arbitrary_node(g, depth - 1);
            if bool::arbitrary(g) {
                child.set_post_text(arbitrary_text(g));
            }
            node.add_child(child);
        }
    }
    if node.text().is_none() && node.children().is_empty() && bool::arbitrary(g) {
        node.set_self_closing(true);
    }
    node
}

impl Arbitrary for Document {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut root = arbitrary_node(g, 4);
        if bool::arbitrary(g) {
            root.set_header(pick(g, &["<!DOCTYPE html>", "<?xml version=\"1.0\"?>"]));
        }
        Self(to_markup(&root).unwrap_or_default())
    }
}

fn reformat(source: &str) -> String {
    to_markup(&parse_str(source).unwrap()).unwrap()
}

#[quickcheck]
fn prop_reserialization_reaches_fixed_point(document: Document) -> bool {
    let once = reformat(&document.0);
    let twice = reformat(&once);
    let thrice = reformat(&twice);
    parse_str(&once).unwrap() == parse_str(&twice).unwrap() && twice == thrice
}

#[quickcheck]
fn prop_generated_documents_keep_structure(document: Document) -> bool {
    let parsed = parse_str(&document.0).unwrap();
    let reparsed = parse_str(&reformat(&document.0)).unwrap();
    parsed.node_count() == reparsed.node_count() && parsed.depth() == reparsed.depth()
}
