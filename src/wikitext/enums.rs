//! Enums used by the wikitext module.
//!
//! `ListType` names the list kinds a line-start marker opens in MediaWiki
//! wikitext, together with the HTML element the marker renders to.

/// The kind of list line in wikitext.
///
/// Common tokens:
/// - `*` unordered
/// - `#` ordered (numbered)
/// - `;` definition term
/// - `:` indented / definition description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    /// Unordered list (bulleted) (`*`)
    Unordered,
    /// Ordered (numbered) list (`#`)
    Ordered,
    /// Definition term (`;`)
    Term,
    /// Definition description, the usual reply indent (`:`)
    Description,
}

impl ListType {
    /// Marker character for a list type, if `c` is one.
    pub fn from_marker(c: char) -> Option<Self> {
        match c {
            '*' => Some(ListType::Unordered),
            '#' => Some(ListType::Ordered),
            ';' => Some(ListType::Term),
            ':' => Some(ListType::Description),
            _ => None,
        }
    }

    pub fn marker(&self) -> char {
        match self {
            ListType::Unordered => '*',
            ListType::Ordered => '#',
            ListType::Term => ';',
            ListType::Description => ':',
        }
    }

    /// The HTML element a wiki list marker renders to.
    pub fn html_tag(&self) -> &'static str {
        match self {
            ListType::Unordered | ListType::Ordered => "li",
            ListType::Term => "dt",
            ListType::Description => "dd",
        }
    }

    /// Whether `name` is the closing tag of a rendered list item.
    pub fn is_item_tag(name: &str) -> bool {
        matches!(name.to_ascii_lowercase().as_str(), "li" | "dt" | "dd")
    }
}
