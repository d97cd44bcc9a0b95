//! The node model produced by the tokenizer.
//!
//! A `WikiNode` is never edited in place: repair passes swap whole nodes for
//! replacements, so every variant owns its markup and renders back to it.

use std::fmt;

use crate::definitions::PostLink;

/// Markers counted towards a post's indentation level.
pub const INDENT_MARKERS: [char; 3] = [':', ';', '*'];

/// Markers that may open a new post (indentation plus numbered lists).
pub const POST_MARKERS: [char; 4] = ['*', ';', ':', '#'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WikiNode {
    Text(String),
    Template(String),
    ExternalLink {
        url: String,
        title: Option<String>,
        /// Written as `[url title]` rather than a bare url.
        bracketed: bool,
    },
    Wikilink {
        title: String,
        text: Option<String>,
    },
    Tag {
        raw: String,
        /// Name of the closing tag, e.g. `dd` for a `:` list item.
        closing: Option<String>,
    },
    Heading {
        raw: String,
        level: usize,
    },
    /// Comments, template arguments and entities, kept as raw markup.
    Other(String),
}

impl WikiNode {
    pub fn text<S: Into<String>>(s: S) -> Self {
        WikiNode::Text(s.into())
    }

    /// Reconstruct the node as wikitext.
    pub fn to_wikitext(&self) -> String {
        match self {
            WikiNode::Text(raw)
            | WikiNode::Template(raw)
            | WikiNode::Tag { raw, .. }
            | WikiNode::Heading { raw, .. }
            | WikiNode::Other(raw) => raw.clone(),
            WikiNode::ExternalLink {
                url,
                title,
                bracketed,
            } => match (bracketed, title) {
                (false, _) => url.clone(),
                (true, Some(title)) => format!("[{} {}]", url, title),
                (true, None) => format!("[{}]", url),
            },
            WikiNode::Wikilink { title, text } => match text {
                Some(text) => format!("[[{}|{}]]", title, text),
                None => format!("[[{}]]", title),
            },
        }
    }

    /// Markup with surrounding whitespace removed. Used for structural checks.
    pub fn trimmed(&self) -> String {
        self.to_wikitext().trim().to_string()
    }

    /// Display form: trimmed, with leading list markers dropped.
    pub fn display(&self) -> String {
        self.trimmed()
            .trim_start_matches(INDENT_MARKERS)
            .trim()
            .to_string()
    }

    pub fn is_blank(&self) -> bool {
        self.to_wikitext().trim().is_empty()
    }

    /// Number of leading `:`/`;`/`*` characters on the trimmed markup.
    pub fn marker_level(&self) -> usize {
        self.trimmed()
            .chars()
            .take_while(|c| INDENT_MARKERS.contains(c))
            .count()
    }

    /// True when the node is nothing but list/indent markup, e.g. `"::*"`.
    pub fn is_post_marker(&self) -> bool {
        let trimmed = self.trimmed();
        !trimmed.is_empty() && trimmed.chars().all(|c| POST_MARKERS.contains(&c))
    }

    /// For a wikilink, the `@name` mention it reads as and the link it records.
    pub fn as_mention(&self) -> Option<(String, PostLink)> {
        match self {
            WikiNode::Wikilink { title, text } => {
                let shown = text
                    .as_deref()
                    .filter(|t| !t.is_empty())
                    .unwrap_or(title.as_str());
                Some((
                    format!("@{}", shown),
                    PostLink {
                        link: text.clone().unwrap_or_default(),
                        text: title.clone(),
                    },
                ))
            }
            _ => None,
        }
    }
}

impl fmt::Display for WikiNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wikitext())
    }
}

/// Forward cursor over a node sequence with a one-node pushback slot.
///
/// Greedy lookahead (paren and template merging) consumes nodes through the
/// cursor and hands any leftover markup back with `push_back`.
pub struct NodeCursor<I: Iterator<Item = WikiNode>> {
    inner: I,
    pushed: Option<WikiNode>,
}

impl<I: Iterator<Item = WikiNode>> NodeCursor<I> {
    pub fn new<T: IntoIterator<IntoIter = I>>(nodes: T) -> Self {
        Self {
            inner: nodes.into_iter(),
            pushed: None,
        }
    }

    /// Re-inject a node so it is the next one returned.
    pub fn push_back(&mut self, node: WikiNode) {
        debug_assert!(self.pushed.is_none(), "pushback slot already taken");
        self.pushed = Some(node);
    }
}

impl<I: Iterator<Item = WikiNode>> Iterator for NodeCursor<I> {
    type Item = WikiNode;

    fn next(&mut self) -> Option<WikiNode> {
        self.pushed.take().or_else(|| self.inner.next())
    }
}
