use strum_macros::Display;

/// The lexical units handed to the tree builder.
///
/// The tokenizer only ever produces two shapes of raw text: a complete
/// `<...>` tag or a run of content. [`Token::classify`] sorts the tag shape
/// into the forms the builder reacts to. Each variant keeps the raw token
/// text, trimmed as described on [`Tokenizer::next_token`].
///
/// [`Tokenizer::next_token`]: super::Tokenizer::next_token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A prologue declaration: `<?xml ...?>`, `<!DOCTYPE ...>`, and any
    /// other `<?`/`<!` construct (comments included).
    Header(String),

    /// An open tag with a body to follow: `<name attr="v">`.
    StartTag(String),

    /// An open tag that has no body: `<name attr="v"/>`.
    SelfClosingTag(String),

    /// A close tag: `</name>`.
    EndTag(String),

    /// Content between tags.
    Text(String),

    /// Starts with `<` but is none of the tag forms, e.g. `<>` or a tag
    /// cut off by the end of input.
    Malformed(String),
}

/// The variant of a [`Token`] without its text, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenKind {
    /// See [`Token::Header`].
    #[strum(serialize = "header")]
    Header,
    /// See [`Token::StartTag`].
    #[strum(serialize = "start tag")]
    StartTag,
    /// See [`Token::SelfClosingTag`].
    #[strum(serialize = "self-closing tag")]
    SelfClosingTag,
    /// See [`Token::EndTag`].
    #[strum(serialize = "end tag")]
    EndTag,
    /// See [`Token::Text`].
    #[strum(serialize = "text")]
    Text,
    /// See [`Token::Malformed`].
    #[strum(serialize = "malformed tag")]
    Malformed,
}

impl Token {
    /// Sort a raw, non-empty token into its form.
    ///
    /// A tag needs at least three characters, a leading `<` and a trailing
    /// `>`. The second character decides between prologue (`?`, `!`) and
    /// close tag (`/`); otherwise a trailing `/>` marks a self-closing tag.
    #[must_use]
    pub fn classify(raw: String) -> Self {
        let bytes = raw.as_bytes();
        if bytes.first() != Some(&b'<') {
            return Self::Text(raw);
        }
        if bytes.len() < 3 || bytes.last() != Some(&b'>') {
            return Self::Malformed(raw);
        }
        match bytes[1] {
            b'?' | b'!' => Self::Header(raw),
            b'/' => Self::EndTag(raw),
            _ if bytes[bytes.len() - 2] == b'/' => Self::SelfClosingTag(raw),
            _ => Self::StartTag(raw),
        }
    }

    /// The token's text exactly as the tokenizer produced it.
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            Self::Header(raw)
            | Self::StartTag(raw)
            | Self::SelfClosingTag(raw)
            | Self::EndTag(raw)
            | Self::Text(raw)
            | Self::Malformed(raw) => raw,
        }
    }

    /// Which form this token has.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        match self {
            Self::Header(_) => TokenKind::Header,
            Self::StartTag(_) => TokenKind::StartTag,
            Self::SelfClosingTag(_) => TokenKind::SelfClosingTag,
            Self::EndTag(_) => TokenKind::EndTag,
            Self::Text(_) => TokenKind::Text,
            Self::Malformed(_) => TokenKind::Malformed,
        }
    }

    /// The element name of a close tag: `</ name >` gives `name`.
    ///
    /// Returns `None` for every other form.
    #[must_use]
    pub fn end_tag_name(&self) -> Option<&str> {
        match self {
            Self::EndTag(raw) => Some(raw[2..raw.len() - 1].trim()),
            _ => None,
        }
    }
}
