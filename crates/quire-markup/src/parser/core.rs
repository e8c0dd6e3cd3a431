use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use strum_macros::Display;

use quire_dom::Node;

use crate::error::{MarkupError, Result};
use crate::tag::analyze_open_tag;
use crate::tokenizer::{Token, Tokenizer};

/// The kinds of malformed input the builder recovers from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum IssueKind {
    /// A close tag whose name differs from the element it closed.
    MismatchedCloseTag,
    /// An element still open when the input ended.
    UnclosedElement,
    /// A `<...` token that is not a tag (`<>`, or a tag cut off by the end
    /// of input). It is ignored.
    MalformedTag,
    /// A `<?...>` or `<!...>` token inside the root element. It is ignored.
    StrayDeclaration,
    /// A second prologue token before the root; the later one is kept.
    ReplacedHeader,
    /// Content or a close tag before the root element. It is ignored.
    OutsideRoot,
}

/// A recoverable problem met while building a tree.
///
/// Displays as `token {token_index}: {message}`.
///
/// In the default permissive mode issues are collected and building goes
/// on; in strict mode the first issue aborts the parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// What went wrong.
    pub kind: IssueKind,
    /// Human-readable description naming the tokens involved.
    pub message: String,
    /// 1-based position of the offending token in the token stream.
    pub token_index: usize,
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token {}: {}", self.token_index, self.message)
    }
}

/// Builds a [`Node`] tree from a character stream.
///
/// The builder is a recursive descent over elements, run on an explicit
/// stack so that nesting depth is bounded by memory rather than by the call
/// stack: `current` is the element whose body is being read and
/// `stack_of_open_elements` holds its ancestors, outermost first.
///
/// # Malformed markup
///
/// The default contract is permissive:
/// - a close tag ends the innermost open element whatever its name;
/// - the end of input closes every element still open;
/// - malformed tags and declarations inside the root are skipped;
/// - content before the root is discarded.
///
/// Each of these is recorded as a [`ParseIssue`] owned by the builder and
/// handed back by [`TreeBuilder::run_with_issues`]; nothing is printed or
/// kept once the builder is gone. [`TreeBuilder::with_strict_mode`] turns
/// the first issue into [`MarkupError::Malformed`] instead.
pub struct TreeBuilder<R> {
    /// Token source.
    tokenizer: Tokenizer<R>,

    /// Ancestors of the element currently being read.
    stack_of_open_elements: Vec<Node>,

    /// Prologue token seen before the root.
    header: Option<String>,

    /// Number of tokens consumed so far.
    token_index: usize,

    /// Issues encountered during parsing.
    issues: Vec<ParseIssue>,

    /// If true, the first issue aborts the parse.
    strict_mode: bool,
}

impl<R: BufRead> TreeBuilder<R> {
    /// Create a builder reading from `reader`.
    #[must_use]
    pub const fn new(reader: R) -> Self {
        Self {
            tokenizer: Tokenizer::new(reader),
            stack_of_open_elements: Vec::new(),
            header: None,
            token_index: 0,
            issues: Vec::new(),
            strict_mode: false,
        }
    }

    /// Reject malformed markup instead of recovering from it.
    #[must_use]
    pub const fn with_strict_mode(mut self) -> Self {
        self.strict_mode = true;
        self
    }

    /// Build the document and return its root.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError::NoRootElement`] if the input holds no open
    /// tag, any tokenizer error, and in strict mode
    /// [`MarkupError::Malformed`].
    pub fn run(self) -> Result<Node> {
        self.run_with_issues().map(|(root, _)| root)
    }

    /// Build the document and return its root together with every issue
    /// the builder recovered from.
    ///
    /// # Errors
    ///
    /// Same as [`TreeBuilder::run`].
    pub fn run_with_issues(mut self) -> Result<(Node, Vec<ParseIssue>)> {
        let (open_tag, self_closing) = self.read_prologue()?;
        let mut root = self.read_element(&open_tag, self_closing)?;
        if let Some(header) = self.header.take() {
            root.set_header(header);
        }
        Ok((root, std::mem::take(&mut self.issues)))
    }

    /// Read the next classified token, `None` at end of input.
    fn next_token(&mut self) -> Result<Option<Token>> {
        let raw = self.tokenizer.next_token()?;
        if raw.is_empty() {
            return Ok(None);
        }
        self.token_index += 1;
        Ok(Some(Token::classify(raw)))
    }

    /// Skip to the root's open tag, remembering the prologue on the way.
    ///
    /// Returns the raw open tag and whether it was self-closing.
    fn read_prologue(&mut self) -> Result<(String, bool)> {
        loop {
            match self.next_token()? {
                None => return Err(MarkupError::NoRootElement),
                Some(Token::StartTag(raw)) => return Ok((raw, false)),
                Some(Token::SelfClosingTag(raw)) => return Ok((raw, true)),
                Some(Token::Header(raw)) => {
                    if let Some(previous) = self.header.replace(raw) {
                        self.parse_issue(
                            IssueKind::ReplacedHeader,
                            format!("prologue {previous} replaced by a later one"),
                        )?;
                    }
                }
                Some(token @ (Token::Text(_) | Token::EndTag(_))) => {
                    self.parse_issue(
                        IssueKind::OutsideRoot,
                        format!("{} before the root element ignored", token.kind()),
                    )?;
                }
                Some(Token::Malformed(raw)) => {
                    self.parse_issue(IssueKind::MalformedTag, format!("malformed tag {raw} ignored"))?;
                }
            }
        }
    }

    /// Build the element whose open tag has just been consumed.
    ///
    /// - Text before the first child becomes the element's text; later text
    ///   becomes the last child's post text.
    /// - An open tag starts a nested element, appended once it is closed.
    /// - A close tag ends the current element.
    /// - The end of input ends every open element.
    fn read_element(&mut self, open_tag: &str, self_closing: bool) -> Result<Node> {
        let mut current = Self::create_element(open_tag, self_closing);
        if self_closing {
            return Ok(current);
        }

        loop {
            match self.next_token()? {
                Some(Token::Text(content)) => current.append_content(content),

                Some(Token::StartTag(raw)) => {
                    let child = Self::create_element(&raw, false);
                    self.stack_of_open_elements
                        .push(std::mem::replace(&mut current, child));
                }

                Some(Token::SelfClosingTag(raw)) => {
                    current.add_child(Self::create_element(&raw, true));
                }

                Some(token @ Token::EndTag(_)) => {
                    let name = token.end_tag_name().unwrap_or_default();
                    if name != current.name() {
                        self.parse_issue(
                            IssueKind::MismatchedCloseTag,
                            format!("</{name}> closes <{}>", current.name()),
                        )?;
                    }
                    let Some(mut parent) = self.stack_of_open_elements.pop() else {
                        return Ok(current);
                    };
                    parent.add_child(current);
                    current = parent;
                }

                Some(Token::Header(raw)) => {
                    self.parse_issue(
                        IssueKind::StrayDeclaration,
                        format!("declaration {raw} inside <{}> ignored", current.name()),
                    )?;
                }

                Some(Token::Malformed(raw)) => {
                    self.parse_issue(IssueKind::MalformedTag, format!("malformed tag {raw} ignored"))?;
                }

                None => return self.close_at_end_of_input(current),
            }
        }
    }

    /// Close `current` and every ancestor, innermost first.
    fn close_at_end_of_input(&mut self, mut current: Node) -> Result<Node> {
        loop {
            self.parse_issue(
                IssueKind::UnclosedElement,
                format!("<{}> closed by end of input", current.name()),
            )?;
            let Some(mut parent) = self.stack_of_open_elements.pop() else {
                return Ok(current);
            };
            parent.add_child(current);
            current = parent;
        }
    }

    fn create_element(open_tag: &str, self_closing: bool) -> Node {
        let mut node = analyze_open_tag(open_tag).into_node();
        node.set_self_closing(self_closing);
        node
    }

    /// Record a parse issue, or fail with it in strict mode.
    fn parse_issue(&mut self, kind: IssueKind, message: String) -> Result<()> {
        let issue = ParseIssue {
            kind,
            message,
            token_index: self.token_index,
        };
        if self.strict_mode {
            return Err(MarkupError::Malformed(issue));
        }
        self.issues.push(issue);
        Ok(())
    }
}

impl TreeBuilder<BufReader<File>> {
    /// A builder reading from the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MarkupError::Open`] if the file cannot be opened.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| MarkupError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}
