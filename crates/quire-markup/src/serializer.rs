//! Markup serializer.
//!
//! Writes a [`Node`] tree back out as markup, one element per line:
//!
//! ```text
//! <!DOCTYPE html>
//! <p class="intro">
//!     Hello
//!     <b>World</b>
//!     !
//! </p>
//! ```
//!
//! An element with children opens and closes on lines of its own, with its
//! text on the first indented line inside it. A childless element keeps its
//! text inline. A node's post text follows its close tag on its own line at
//! the node's depth. Self-closing nodes with neither text nor children are
//! written as `<name .../>`.
//!
//! The walk uses an explicit work-list, so documents of any depth can be
//! written without growing the call stack.

use std::io::Write;

use quire_dom::Node;

use crate::error::{MarkupError, Result};

/// Layout options for [`Serializer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializerConfig {
    /// One level of indentation. Defaults to four spaces.
    pub indent: String,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
        }
    }
}

impl SerializerConfig {
    /// Indent with `width` spaces per level.
    #[must_use]
    pub fn with_indent_width(width: usize) -> Self {
        Self {
            indent: " ".repeat(width),
        }
    }
}

enum Step<'a> {
    Open(&'a Node, usize),
    Close(&'a Node, usize),
}

/// Writes trees as markup text.
#[derive(Debug, Clone, Default)]
pub struct Serializer {
    config: SerializerConfig,
}

impl Serializer {
    /// A serializer with the default four-space indent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A serializer with custom layout options.
    #[must_use]
    pub const fn with_config(config: SerializerConfig) -> Self {
        Self { config }
    }

    /// Write `root` and everything below it to `out`.
    ///
    /// The first failed write aborts the walk; nothing is retried.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError::Write`] if the destination rejects a write or
    /// the final flush.
    pub fn write<W: Write>(&self, root: &Node, out: &mut W) -> Result<()> {
        let mut pending = vec![Step::Open(root, 0)];

        while let Some(step) = pending.pop() {
            match step {
                Step::Open(node, depth) => {
                    if let Some(header) = node.header() {
                        emit(out, format_args!("{header}\n"))?;
                    }
                    self.write_indent(out, depth)?;
                    emit(out, format_args!("<{}", node.name()))?;
                    for attribute in node.attributes() {
                        emit(out, format_args!(" {}=\"{}\"", attribute.key, attribute.value))?;
                    }

                    if is_short_form(node) {
                        emit(out, format_args!("/>\n"))?;
                        self.write_post_text(out, node, depth)?;
                        continue;
                    }

                    emit(out, format_args!(">"))?;
                    if node.children().is_empty() {
                        if let Some(text) = node.text() {
                            emit(out, format_args!("{text}"))?;
                        }
                    } else {
                        emit(out, format_args!("\n"))?;
                        if let Some(text) = node.text() {
                            self.write_indent(out, depth + 1)?;
                            emit(out, format_args!("{text}\n"))?;
                        }
                    }

                    pending.push(Step::Close(node, depth));
                    pending.extend(
                        node.children()
                            .iter()
                            .rev()
                            .map(|child| Step::Open(child, depth + 1)),
                    );
                }

                Step::Close(node, depth) => {
                    if !node.children().is_empty() {
                        self.write_indent(out, depth)?;
                    }
                    emit(out, format_args!("</{}>\n", node.name()))?;
                    self.write_post_text(out, node, depth)?;
                }
            }
        }

        out.flush().map_err(MarkupError::Write)
    }

    /// Serialize `root` into a string.
    ///
    /// # Errors
    ///
    /// Fails only if a node holds text that is not valid UTF-8, which
    /// safe construction cannot produce.
    pub fn to_markup(&self, root: &Node) -> Result<String> {
        let mut buffer = Vec::new();
        self.write(root, &mut buffer)?;
        String::from_utf8(buffer).map_err(|err| MarkupError::InvalidUtf8(err.utf8_error()))
    }

    fn write_indent<W: Write>(&self, out: &mut W, depth: usize) -> Result<()> {
        for _ in 0..depth {
            emit(out, format_args!("{}", self.config.indent))?;
        }
        Ok(())
    }

    fn write_post_text<W: Write>(&self, out: &mut W, node: &Node, depth: usize) -> Result<()> {
        if let Some(post_text) = node.post_text() {
            self.write_indent(out, depth)?;
            emit(out, format_args!("{post_text}\n"))?;
        }
        Ok(())
    }
}

/// A self-closing node with nothing inside is written as `<name/>`.
fn is_short_form(node: &Node) -> bool {
    node.is_self_closing() && node.text().is_none() && node.children().is_empty()
}

fn emit<W: Write>(out: &mut W, args: std::fmt::Arguments<'_>) -> Result<()> {
    out.write_fmt(args).map_err(MarkupError::Write)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_width() {
        assert_eq!(SerializerConfig::with_indent_width(2).indent, "  ");
        assert_eq!(SerializerConfig::default().indent, "    ");
    }

    #[test]
    fn test_short_form_requires_empty_node() {
        let mut img = Node::new("img");
        img.set_self_closing(true);
        assert!(is_short_form(&img));
        img.set_text("alt");
        assert!(!is_short_form(&img));
    }
}
