//! Scanners for the three link shapes found in signatures and replies:
//! `[[target|text]]`, `[url title]` and bare urls.
//!
//! Each scanner takes the whole input plus a byte offset and, on a match,
//! returns the bytes consumed with the node built from them.

use crate::wikitext::node::WikiNode;

/// Characters that end a bare url.
const URL_STOP: [char; 6] = ['[', ']', '<', '>', '"', '|'];

/// Punctuation MediaWiki does not treat as part of a trailing free link.
const URL_TRAILING: [char; 8] = ['.', ',', ';', ':', '!', '?', ')', '\''];

/// Whether `input[pos..]` starts an http(s) url (case-insensitive) or a
/// protocol-relative `//` url.
pub fn starts_with_url(input: &str, pos: usize) -> bool {
    let rest = &input.as_bytes()[pos.min(input.len())..];
    let lower = |n: usize| rest.get(..n).map(|s| s.to_ascii_lowercase());
    lower(7).as_deref() == Some(&b"http://"[..])
        || lower(8).as_deref() == Some(&b"https://"[..])
        || rest.starts_with(b"//")
}

/// Parse an internal link `[[...]]` starting at `start` in `input`.
///
/// Returns Some((consumed_bytes, WikiNode::Wikilink)) on success, or None if
/// the link is never closed or empty.
///
/// This supports nested internal links (file captions) by counting nested
/// `[[` / `]]` pairs.
pub fn parse_internal_link_at(input: &str, start: usize) -> Option<(usize, WikiNode)> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    if start + 1 >= len || bytes[start] != b'[' || bytes[start + 1] != b'[' {
        return None;
    }

    let mut idx = start + 2;
    let mut depth: usize = 1;
    let mut content = String::new();

    while idx < len {
        if idx + 1 < len && bytes[idx] == b'[' && bytes[idx + 1] == b'[' {
            depth += 1;
            content.push_str("[[");
            idx += 2;
            continue;
        }
        if idx + 1 < len && bytes[idx] == b']' && bytes[idx + 1] == b']' {
            depth -= 1;
            idx += 2;
            if depth == 0 {
                break;
            }
            content.push_str("]]");
            continue;
        }
        let ch = input[idx..].chars().next()?;
        content.push(ch);
        idx += ch.len_utf8();
    }

    if depth != 0 || content.trim().is_empty() {
        return None;
    }

    // the first '|' separates target from display text
    let mut splits = content.splitn(2, '|');
    let title = splits.next().unwrap_or_default().trim().to_string();
    let text = splits.next().map(|s| s.trim().to_string());

    Some((idx - start, WikiNode::Wikilink { title, text }))
}

/// Parse an external link `[http... label]` starting at `start` in `input`.
///
/// Returns Some((consumed_bytes, WikiNode::ExternalLink)) on success. The
/// closing `]` must appear on the same line.
///
/// This treats the first whitespace as the separator between url and label;
/// label may be omitted.
pub fn parse_external_link_at(input: &str, start: usize) -> Option<(usize, WikiNode)> {
    if !input[start..].starts_with('[') || !starts_with_url(input, start + 1) {
        return None;
    }

    let body_start = start + 1;
    let end = input[body_start..].find([']', '\n'])? + body_start;
    if !input[end..].starts_with(']') {
        return None;
    }

    let content = &input[body_start..end];
    let mut parts = content.splitn(2, char::is_whitespace);
    let url = parts.next().unwrap_or_default().trim().to_string();
    if url.is_empty() {
        return None;
    }
    let title = parts
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    Some((
        end + 1 - start,
        WikiNode::ExternalLink {
            url,
            title,
            bracketed: true,
        },
    ))
}

/// Parse a bare url starting at `start`. Trailing punctuation is left for
/// the surrounding text.
pub fn parse_free_link_at(input: &str, start: usize) -> Option<(usize, WikiNode)> {
    if !starts_with_url(input, start) || input[start..].starts_with("//") {
        return None;
    }

    let rest = &input[start..];
    let end = rest
        .find(|c: char| c.is_whitespace() || URL_STOP.contains(&c))
        .unwrap_or(rest.len());
    let url = rest[..end].trim_end_matches(URL_TRAILING);
    // a scheme with nothing after it is just text
    if url.ends_with("://") {
        return None;
    }

    Some((
        url.len(),
        WikiNode::ExternalLink {
            url: url.to_string(),
            title: None,
            bracketed: false,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_simple() {
        let s = "[[User:Alice|Alice]]";
        let (consumed, node) = parse_internal_link_at(s, 0).expect("should parse");
        assert_eq!(consumed, s.len());
        assert_eq!(
            node,
            WikiNode::Wikilink {
                title: "User:Alice".into(),
                text: Some("Alice".into())
            }
        );
    }

    #[test]
    fn internal_no_label() {
        let (_, node) = parse_internal_link_at("[[Page Name]] tail", 0).expect("should parse");
        assert_eq!(
            node,
            WikiNode::Wikilink {
                title: "Page Name".into(),
                text: None
            }
        );
    }

    #[test]
    fn internal_nested() {
        let s = "[[File:A.png|thumb|A [[B]] C]]";
        let (consumed, node) = parse_internal_link_at(s, 0).expect("should parse nested");
        assert_eq!(consumed, s.len());
        match node {
            WikiNode::Wikilink { title, text } => {
                assert_eq!(title, "File:A.png");
                assert_eq!(text.as_deref(), Some("thumb|A [[B]] C"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn internal_unclosed_is_none() {
        assert!(parse_internal_link_at("[[User:Alice", 0).is_none());
        assert!(parse_internal_link_at("[[]]", 0).is_none());
    }

    #[test]
    fn external_with_and_without_label() {
        let s = "[http://example.com Label here]";
        let (consumed, node) = parse_external_link_at(s, 0).expect("should parse external");
        assert_eq!(consumed, s.len());
        assert_eq!(
            node,
            WikiNode::ExternalLink {
                url: "http://example.com".into(),
                title: Some("Label here".into()),
                bracketed: true
            }
        );

        let (_, node) = parse_external_link_at("[https://example.com]", 0).unwrap();
        assert_eq!(node.to_wikitext(), "[https://example.com]");
    }

    #[test]
    fn external_needs_closing_on_same_line() {
        assert!(parse_external_link_at("[http://example.com\nnext]", 0).is_none());
        assert!(parse_external_link_at("[not a link]", 0).is_none());
    }

    #[test]
    fn free_link_drops_trailing_punctuation() {
        let s = "https://example.com/a_(b). Next";
        let (consumed, node) = parse_free_link_at(s, 0).unwrap();
        assert_eq!(&s[..consumed], "https://example.com/a_(b");
        assert_eq!(node.to_wikitext(), "https://example.com/a_(b");
        assert!(parse_free_link_at("http:// nothing", 0).is_none());
    }
}
