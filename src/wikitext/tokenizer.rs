//! Wikitext tokenizer producing the flat `WikiNode` stream.
//!
//! The tokenizer mirrors the node granularity of common MediaWiki parsers,
//! including their quirks: every list marker at the start of a line becomes
//! its own `Tag` node, and unbalanced template braces are left as bare
//! openers/closers for later passes to stitch together.

use crate::wikitext::enums::ListType;
use crate::wikitext::node::WikiNode;
use crate::wikitext::types::links::{
    parse_external_link_at, parse_free_link_at, parse_internal_link_at, starts_with_url,
};

/// Tags that never take a closing tag.
const VOID_TAGS: [&str; 5] = ["br", "hr", "wbr", "img", "meta"];

/// Turns a markup string into an ordered node sequence.
pub trait Tokenize: Send + Sync {
    fn tokenize(&self, input: &str) -> Vec<WikiNode>;
}

/// Default tokenizer for MediaWiki talk pages.
#[derive(Debug, Clone, Copy)]
pub struct WikitextTokenizer {
    free_links: bool,
}

impl Default for WikitextTokenizer {
    fn default() -> Self {
        Self { free_links: true }
    }
}

impl WikitextTokenizer {
    /// `free_links` controls whether bare `http(s)://` urls in running text
    /// become `ExternalLink` nodes.
    pub fn new(free_links: bool) -> Self {
        Self { free_links }
    }
}

fn flush(current_text: &mut String, nodes: &mut Vec<WikiNode>) {
    if !current_text.is_empty() {
        nodes.push(WikiNode::Text(std::mem::take(current_text)));
    }
}

impl Tokenize for WikitextTokenizer {
    /// Split a wikitext fragment into nodes.
    ///
    /// The tokenizer extracts:
    /// - headings (`== Title ==` lines)
    /// - list markers at line start, one `Tag` per character
    /// - templates ({{...}}) with nesting support, and template arguments ({{{...}}})
    /// - internal links ([[...]]), external links ([http... label]) and bare urls
    /// - html-style tags, comments and entities
    ///
    /// All other content is returned as `Text` nodes. Tokenizing never fails.
    fn tokenize(&self, input: &str) -> Vec<WikiNode> {
        let mut nodes = Vec::new();
        let bytes = input.as_bytes();
        let len = bytes.len();
        let mut idx = 0usize;

        // accumulate contiguous plain text
        let mut current_text = String::new();

        while idx < len {
            let at_line_start = idx == 0 || bytes[idx - 1] == b'\n';
            if at_line_start {
                if let Some((consumed, heading)) = parse_heading_at(input, idx) {
                    flush(&mut current_text, &mut nodes);
                    nodes.push(heading);
                    idx += consumed;
                    continue;
                }
                if ListType::from_marker(bytes[idx] as char).is_some() {
                    flush(&mut current_text, &mut nodes);
                    while idx < len {
                        let Some(list) = ListType::from_marker(bytes[idx] as char) else {
                            break;
                        };
                        nodes.push(WikiNode::Tag {
                            raw: list.marker().to_string(),
                            closing: Some(list.html_tag().to_string()),
                        });
                        idx += 1;
                    }
                    continue;
                }
            }

            let rest = &input[idx..];

            if rest.starts_with("<!--") {
                let end = rest.find("-->").map(|e| e + 3).unwrap_or(rest.len());
                flush(&mut current_text, &mut nodes);
                nodes.push(WikiNode::Other(rest[..end].to_string()));
                idx += end;
                continue;
            }

            // template argument "{{{...}}}"
            if rest.starts_with("{{{")
                && let Some(end) = rest.find("}}}")
            {
                flush(&mut current_text, &mut nodes);
                nodes.push(WikiNode::Other(rest[..end + 3].to_string()));
                idx += end + 3;
                continue;
            }

            if rest.starts_with("{{") {
                flush(&mut current_text, &mut nodes);
                match template_end(input, idx) {
                    Some(end) => {
                        nodes.push(WikiNode::Template(input[idx..end].to_string()));
                        idx = end;
                    }
                    None => {
                        // unbalanced: keep a bare opener
                        nodes.push(WikiNode::Template("{{".to_string()));
                        idx += 2;
                    }
                }
                continue;
            }

            if rest.starts_with("}}") {
                // stray closer starts a fresh text node
                flush(&mut current_text, &mut nodes);
                current_text.push_str("}}");
                idx += 2;
                continue;
            }

            if rest.starts_with("[[")
                && let Some((consumed, link)) = parse_internal_link_at(input, idx)
            {
                flush(&mut current_text, &mut nodes);
                nodes.push(link);
                idx += consumed;
                continue;
            }

            if rest.starts_with('[')
                && let Some((consumed, link)) = parse_external_link_at(input, idx)
            {
                flush(&mut current_text, &mut nodes);
                nodes.push(link);
                idx += consumed;
                continue;
            }

            if self.free_links
                && starts_with_url(input, idx)
                && !input[..idx]
                    .chars()
                    .next_back()
                    .is_some_and(|c| c.is_alphanumeric())
                && let Some((consumed, link)) = parse_free_link_at(input, idx)
            {
                flush(&mut current_text, &mut nodes);
                nodes.push(link);
                idx += consumed;
                continue;
            }

            if rest.starts_with('<')
                && let Some((consumed, tag)) = parse_tag_at(input, idx)
            {
                flush(&mut current_text, &mut nodes);
                nodes.push(tag);
                idx += consumed;
                continue;
            }

            if rest.starts_with('&')
                && let Some(entity) = lazy_regex::regex_find!(
                    r"^&(?:#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z][a-zA-Z0-9]*);",
                    rest
                )
            {
                flush(&mut current_text, &mut nodes);
                nodes.push(WikiNode::Other(entity.to_string()));
                idx += entity.len();
                continue;
            }

            // default: append next UTF-8 char to current_text
            let Some(ch) = rest.chars().next() else {
                break;
            };
            current_text.push(ch);
            idx += ch.len_utf8();
        }

        flush(&mut current_text, &mut nodes);
        nodes
    }
}

/// Parse a heading line (`== Title ==`) starting at `start`.
///
/// The heading level is the smaller of the leading and trailing `=` runs.
/// Whitespace after the closing `=` is left in the stream.
fn parse_heading_at(input: &str, start: usize) -> Option<(usize, WikiNode)> {
    let line = input[start..].split('\n').next()?.trim_end();
    if !line.starts_with('=') || !line.ends_with('=') {
        return None;
    }
    let lead = line.chars().take_while(|c| *c == '=').count();
    let trail = line.chars().rev().take_while(|c| *c == '=').count();
    let level = lead.min(trail).min(6);
    if line.len() <= level * 2 {
        return None;
    }
    Some((
        line.len(),
        WikiNode::Heading {
            raw: line.to_string(),
            level,
        },
    ))
}

/// Find the byte offset just past the `}}` closing the template at `start`.
fn template_end(input: &str, start: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut idx = start + 2;
    let mut depth = 1usize;

    while idx < len {
        if idx + 1 < len && bytes[idx] == b'{' && bytes[idx + 1] == b'{' {
            depth += 1;
            idx += 2;
            continue;
        }
        if idx + 1 < len && bytes[idx] == b'}' && bytes[idx + 1] == b'}' {
            depth -= 1;
            idx += 2;
            if depth == 0 {
                return Some(idx);
            }
            continue;
        }
        idx += 1;
    }
    None
}

/// Find `needle` (e.g. `<ref` or `</ref`) in `hay` from `from`, requiring a
/// non-name character after it so `<b` does not match `<br`.
fn find_tag(hay: &str, needle: &str, from: usize) -> Option<usize> {
    let mut pos = from;
    while let Some(found) = hay[pos..].find(needle) {
        let at = pos + found;
        let after = at + needle.len();
        match hay[after..].chars().next() {
            Some(c) if c.is_ascii_alphanumeric() => pos = after,
            _ => return Some(at),
        }
    }
    None
}

/// Parse an html-style element starting at `start`.
///
/// Paired tags consume everything up to their matching close tag (same-name
/// nesting is tracked); void and self-closing tags are returned alone. An
/// unclosed paired tag is not a tag.
fn parse_tag_at(input: &str, start: usize) -> Option<(usize, WikiNode)> {
    let rest = &input[start..];
    let (open, name, slash) =
        lazy_regex::regex_captures!(r"^<([a-zA-Z][a-zA-Z0-9]*)(?:\s[^<>]*?)?(/?)>", rest)?;
    let name = name.to_ascii_lowercase();

    if !slash.is_empty() || VOID_TAGS.contains(&name.as_str()) {
        return Some((
            open.len(),
            WikiNode::Tag {
                raw: open.to_string(),
                closing: None,
            },
        ));
    }

    // ascii lowercasing keeps byte offsets intact
    let lower = rest.to_ascii_lowercase();
    let opener = format!("<{}", name);
    let closer = format!("</{}", name);
    let mut depth = 1usize;
    let mut pos = open.len();

    loop {
        let next_close = find_tag(&lower, &closer, pos)?;
        match find_tag(&lower, &opener, pos) {
            Some(nested) if nested < next_close => {
                let tag_end = lower[nested..].find('>')? + nested;
                if !lower[..tag_end].ends_with('/') {
                    depth += 1;
                }
                pos = tag_end + 1;
            }
            _ => {
                let end = lower[next_close..].find('>')? + next_close + 1;
                depth -= 1;
                if depth == 0 {
                    return Some((
                        end,
                        WikiNode::Tag {
                            raw: rest[..end].to_string(),
                            closing: Some(name),
                        },
                    ));
                }
                pos = end;
            }
        }
    }
}
