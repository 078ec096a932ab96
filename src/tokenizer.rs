//! Tag Tokenizer
//!
//! Splits a document into the raw text found between tag boundaries. There is
//! no tree here: the formatter only needs the ordered sequence of fragments and
//! a way to classify each one.
//!
//! Normalization removes whitespace that sits strictly between a `>` and the
//! following `<`, then trims the document. The normalized text is split on the
//! `><` boundaries, so the first token keeps its leading `<` and the last token
//! keeps its trailing `>`. The formatter relies on that shape when it rebuilds
//! lines.

use regex::Regex;
use std::sync::OnceLock;

/// Whitespace between two tags, e.g. the `\n  ` in `<a>\n  <b>`
static INTER_TAG_WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();

/// Token boundary after normalization
static TAG_BOUNDARY_REGEX: OnceLock<Regex> = OnceLock::new();

/// `</name...`
static CLOSING_TAG_REGEX: OnceLock<Regex> = OnceLock::new();

/// Starts with an optional `<` then a word character, and does not end in `/`
static OPENING_TAG_REGEX: OnceLock<Regex> = OnceLock::new();

pub(crate) fn inter_tag_whitespace_regex() -> &'static Regex {
    INTER_TAG_WHITESPACE_REGEX.get_or_init(|| {
        Regex::new(r">\s+<").expect("Failed to compile inter-tag whitespace regex")
    })
}

fn tag_boundary_regex() -> &'static Regex {
    TAG_BOUNDARY_REGEX
        .get_or_init(|| Regex::new(r">\s*<").expect("Failed to compile tag boundary regex"))
}

fn closing_tag_regex() -> &'static Regex {
    CLOSING_TAG_REGEX
        .get_or_init(|| Regex::new(r"^/(?-u:\w)").expect("Failed to compile closing tag regex"))
}

fn opening_tag_regex() -> &'static Regex {
    OPENING_TAG_REGEX.get_or_init(|| {
        Regex::new(r"^<?(?-u:\w)(?:[^>]*[^/])?$").expect("Failed to compile opening tag regex")
    })
}

/// Collapse inter-tag whitespace and trim the whole document.
pub fn normalize(xml: &str) -> String {
    inter_tag_whitespace_regex()
        .replace_all(xml, "><")
        .trim()
        .to_string()
}

/// Split a document into tag tokens.
///
/// Empty input, or input without any tag boundary, yields a single token.
pub fn tokenize(xml: &str) -> Vec<TagToken> {
    let normalized = normalize(xml);
    tag_boundary_regex()
        .split(&normalized)
        .map(TagToken::new)
        .collect()
}

/// Derived classification of a [`TagToken`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `</name>`; the formatter dedents before emitting it
    Closing,
    /// `<name ...>`; the formatter indents after emitting it
    Opening,
    /// `<name/>`; a leaf
    SelfClosing,
    /// `<?xml ...?>` and other processing instructions
    Declaration,
    /// `<!-- -->`, `<!DOCTYPE>` and `<![CDATA[ ]]>`
    Comment,
    /// A complete inline element such as `b>1</b`, or an empty token
    Other,
}

/// The raw text of one tag occurrence, without its `<`/`>` delimiters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagToken {
    raw: String,
}

impl TagToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Classify the token from its raw text.
    ///
    /// Opening detection is pattern based, so a lone `<root/>` document (which
    /// keeps both delimiters) reports [`TagKind::Opening`]. Nothing follows it,
    /// so the extra depth is never observed.
    pub fn kind(&self) -> TagKind {
        let raw = self.raw.as_str();
        if closing_tag_regex().is_match(raw) {
            return TagKind::Closing;
        }

        let body = raw.strip_prefix('<').unwrap_or(raw);
        if body.starts_with('?') {
            TagKind::Declaration
        } else if body.starts_with('!') {
            TagKind::Comment
        } else if opening_tag_regex().is_match(raw) {
            TagKind::Opening
        } else if raw.trim_end_matches('>').ends_with('/') {
            TagKind::SelfClosing
        } else {
            TagKind::Other
        }
    }
}

impl AsRef<str> for TagToken {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}
