//! Document tree for the Quire markup tools.
//!
//! # Design
//!
//! A document is a strict tree of owned [`Node`]s. Every node is held by
//! exactly one owner: its parent's child list, or the variable holding the
//! root. There are no sibling or parent pointers; siblings are simply the
//! neighbours in the parent's `children` vector.
//!
//! Mixed content such as `<p>Hello <b>World</b>!</p>` is kept in order by
//! two text slots:
//! - `text` is the run between a node's open tag and its first child
//! - `post_text` is the run after a node's close tag and before the next
//!   sibling (or the parent's close tag)
//!
//! Dropping, cloning, comparing and debug-printing a node all walk the
//! subtree with an explicit work-list, so arbitrarily deep documents never
//! exhaust the stack. `Serialize` is the exception: serde drives it one
//! call per level, so callers dumping untrusted documents should bound
//! [`Node::depth`] first.

use std::fmt;

use serde::Serialize;

/// A `key="value"` pair from an open tag.
///
/// Attributes keep document order. Duplicate keys are stored as separate
/// entries; lookups by key resolve to the first one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Attribute name, exactly as written.
    pub key: String,
    /// Attribute value with its surrounding double quotes removed.
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given key and value.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One element of a document tree.
///
/// The root of a parsed document may additionally carry a `header`: the
/// prologue token (`<?xml ...?>` or `<!DOCTYPE ...>`) that preceded it.
#[derive(Serialize)]
pub struct Node {
    #[serde(skip_serializing_if = "Option::is_none")]
    header: Option<String>,
    name: String,
    attributes: Vec<Attribute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    children: Vec<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    post_text: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    self_closing: bool,
}

impl Node {
    /// Create an element with the given name and nothing else.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            header: None,
            name: name.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
            post_text: None,
            self_closing: false,
        }
    }

    // ========== builder-style constructors ==========

    /// Append an attribute and return the node (for chaining).
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_attribute(key, value);
        self
    }

    /// Set the leading text and return the node (for chaining).
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Append a child and return the node (for chaining).
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.add_child(child);
        self
    }

    /// Set the document header and return the node (for chaining).
    #[must_use]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.set_header(header);
        self
    }

    // ========== name / header / flags ==========

    /// The element name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The prologue line, present only on a document root.
    #[must_use]
    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    /// Set the prologue line written before the root element.
    pub fn set_header(&mut self, header: impl Into<String>) {
        self.header = Some(header.into());
    }

    /// Whether the node came from (or is written as) a `<name/>` tag.
    #[must_use]
    pub const fn is_self_closing(&self) -> bool {
        self.self_closing
    }

    /// Mark the node as self-closing.
    ///
    /// The flag only affects serialization of nodes without text or
    /// children; such nodes are written as `<name .../>`.
    pub const fn set_self_closing(&mut self, self_closing: bool) {
        self.self_closing = self_closing;
    }

    // ========== attributes ==========

    /// All attributes in document order, duplicates included.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Append an attribute, keeping any existing entry with the same key.
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.push(Attribute::new(key, value));
    }

    /// Replace the value of the first attribute named `key`, or append a new
    /// attribute if there is none.
    pub fn set_attribute(&mut self, key: &str, value: impl Into<String>) {
        match self.attributes.iter_mut().find(|a| a.key == key) {
            Some(existing) => existing.value = value.into(),
            None => self.add_attribute(key, value),
        }
    }

    /// Value of the first attribute named `key`.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }

    /// Values of every attribute named `key`, in document order.
    pub fn attributes_named<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.attributes
            .iter()
            .filter(move |a| a.key == key)
            .map(|a| a.value.as_str())
    }

    /// Whether at least one attribute is named `key`.
    #[must_use]
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.iter().any(|a| a.key == key)
    }

    // ========== text slots ==========

    /// Text between the open tag and the first child.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Replace the leading text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Text between this node's close tag and whatever follows it.
    #[must_use]
    pub fn post_text(&self) -> Option<&str> {
        self.post_text.as_deref()
    }

    /// Replace the trailing text.
    pub fn set_post_text(&mut self, text: impl Into<String>) {
        self.post_text = Some(text.into());
    }

    /// Place a run of content the way a document reader encounters it.
    ///
    /// Before the first child the run becomes this node's `text`; once a
    /// child exists it becomes the `post_text` of the last child. A run that
    /// lands on an occupied slot is joined to it with a single space.
    pub fn append_content(&mut self, content: impl Into<String>) {
        let slot = match self.children.last_mut() {
            Some(last) => &mut last.post_text,
            None => &mut self.text,
        };
        match slot {
            Some(existing) => {
                existing.push(' ');
                existing.push_str(&content.into());
            }
            None => *slot = Some(content.into()),
        }
    }

    // ========== children ==========

    /// Child elements in document order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Mutable access to the child list.
    pub fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.children
    }

    /// Append `child` as the last child.
    pub fn add_child(&mut self, child: Self) {
        self.children.push(child);
    }

    /// The last child, if any.
    #[must_use]
    pub fn last_child(&self) -> Option<&Self> {
        self.children.last()
    }

    /// Mutable reference to the last child, if any.
    pub fn last_child_mut(&mut self) -> Option<&mut Self> {
        self.children.last_mut()
    }

    /// Mutable reference to the child at `index`.
    pub fn child_mut(&mut self, index: usize) -> Option<&mut Self> {
        self.children.get_mut(index)
    }

    /// The first direct child named `name`.
    #[must_use]
    pub fn child_named(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Every direct child named `name`, in order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    // ========== traversal ==========

    /// Pre-order, depth-first iterator over this node and all descendants.
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Number of nodes in this subtree, the node itself included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.descendants().count()
    }

    /// Number of levels in this subtree; a lone node has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1)];
        while let Some((node, level)) = pending.pop() {
            deepest = deepest.max(level);
            pending.extend(node.children.iter().map(|c| (c, level + 1)));
        }
        deepest
    }

    // ========== lifecycle ==========

    /// Release the whole tree.
    ///
    /// Consuming `self` makes a second call, or any later use of the tree,
    /// a compile error. Early returns drop the tree the same way.
    pub fn destroy(self) {
        drop(self);
    }
}

impl Node {
    /// Copy of this node with an empty child list sized for its children.
    fn shallow_clone(&self) -> Self {
        Self {
            header: self.header.clone(),
            name: self.name.clone(),
            attributes: self.attributes.clone(),
            text: self.text.clone(),
            children: Vec::with_capacity(self.children.len()),
            post_text: self.post_text.clone(),
            self_closing: self.self_closing,
        }
    }

    /// Everything but the children themselves is equal.
    fn shallow_eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.header == other.header
            && self.attributes == other.attributes
            && self.text == other.text
            && self.post_text == other.post_text
            && self.self_closing == other.self_closing
            && self.children.len() == other.children.len()
    }
}

impl Clone for Node {
    fn clone(&self) -> Self {
        // `current` is the copy being filled; `ancestors` holds the copies
        // of its ancestors, each paired with its source node.
        let mut ancestors: Vec<(&Self, Self)> = Vec::new();
        let mut source: &Self = self;
        let mut copy = self.shallow_clone();
        loop {
            if let Some(child) = source.children.get(copy.children.len()) {
                ancestors.push((source, copy));
                source = child;
                copy = child.shallow_clone();
                continue;
            }
            match ancestors.pop() {
                Some((parent_source, mut parent)) => {
                    parent.children.push(copy);
                    source = parent_source;
                    copy = parent;
                }
                None => return copy,
            }
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if !a.shallow_eq(b) {
                return false;
            }
            pending.extend(a.children.iter().zip(&b.children));
        }
        true
    }
}

impl Eq for Node {}

enum DebugStep<'a> {
    Open(&'a Node),
    Close(&'a Node),
    Separator,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pending = vec![DebugStep::Open(self)];
        while let Some(step) = pending.pop() {
            match step {
                DebugStep::Open(node) => {
                    f.write_str("Node { ")?;
                    if let Some(header) = &node.header {
                        write!(f, "header: {header:?}, ")?;
                    }
                    write!(
                        f,
                        "name: {:?}, attributes: {:?}, text: {:?}, children: [",
                        node.name, node.attributes, node.text
                    )?;
                    pending.push(DebugStep::Close(node));
                    for (i, child) in node.children.iter().enumerate().rev() {
                        pending.push(DebugStep::Open(child));
                        if i > 0 {
                            pending.push(DebugStep::Separator);
                        }
                    }
                }
                DebugStep::Close(node) => write!(
                    f,
                    "], post_text: {:?}, self_closing: {} }}",
                    node.post_text, node.self_closing
                )?,
                DebugStep::Separator => f.write_str(", ")?,
            }
        }
        Ok(())
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        // Flatten the subtree into a work-list so every node is dropped with
        // an empty child list.
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Iterator returned by [`Node::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
