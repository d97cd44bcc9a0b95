//! Rewrite passes that undo known tokenizer defects.
//!
//! Each pass is a pure `Vec<WikiNode> -> Vec<WikiNode>` transform. Passes only
//! merge or split adjacent nodes; document order is never changed.

use crate::talk::patterns::Classifier;
use crate::wikitext::enums::ListType;
use crate::wikitext::node::{INDENT_MARKERS, NodeCursor, WikiNode};

/// Run all three passes in order.
pub fn repair(nodes: Vec<WikiNode>, classifier: &dyn Classifier) -> Vec<WikiNode> {
    let nodes = merge_parentheses(nodes);
    let nodes = merge_list_markers(nodes);
    split_timestamps(nodes, classifier)
}

pub(crate) fn opens_parenthesis(text: &str) -> bool {
    text.trim().ends_with('(')
}

/// Append the raw markup of following nodes to `text` until a node starting
/// with `closer` is found. The closer is appended and whatever followed it in
/// that node is handed back to the cursor as a `Text` node. Running out of
/// nodes leaves the text unterminated.
pub(crate) fn absorb_until<I>(mut text: String, cursor: &mut NodeCursor<I>, closer: &str) -> String
where
    I: Iterator<Item = WikiNode>,
{
    while let Some(next) = cursor.next() {
        let raw = next.to_wikitext();
        let body = raw.trim_start();
        if let Some(residual) = body.strip_prefix(closer) {
            text.push_str(closer);
            if !residual.is_empty() {
                cursor.push_back(WikiNode::text(residual));
            }
            return text;
        }
        text.push_str(&raw);
    }
    log::trace!("unterminated group waiting for {:?}", closer);
    text
}

/// Merge a parenthetical the tokenizer split around inline markup back into
/// one `Text` node.
pub fn merge_parentheses(nodes: Vec<WikiNode>) -> Vec<WikiNode> {
    let mut out = Vec::with_capacity(nodes.len());
    let mut cursor = NodeCursor::new(nodes);
    while let Some(node) = cursor.next() {
        match node {
            WikiNode::Text(raw) if opens_parenthesis(&raw) => {
                out.push(WikiNode::Text(absorb_until(raw, &mut cursor, ")")));
            }
            other => out.push(other),
        }
    }
    out
}

/// Fold stray indent markers following a list-item tag into that item, so a
/// `::*` indent arrives as one node.
pub fn merge_list_markers(nodes: Vec<WikiNode>) -> Vec<WikiNode> {
    let mut out = Vec::with_capacity(nodes.len());
    let mut cursor = NodeCursor::new(nodes);
    while let Some(node) = cursor.next() {
        match node {
            WikiNode::Tag {
                raw,
                closing: Some(name),
            } if ListType::is_item_tag(&name) => {
                let mut text = raw.trim().to_string();
                while let Some(next) = cursor.next() {
                    let trimmed = next.trimmed();
                    if !trimmed.chars().all(|c| INDENT_MARKERS.contains(&c)) {
                        cursor.push_back(next);
                        break;
                    }
                    text.push_str(&trimmed);
                }
                if !text.is_empty() {
                    out.push(WikiNode::Text(text));
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Isolate signature timestamps embedded in text so they can close a post.
///
/// A text node containing the classifier's hint is split into lines; a
/// timestamp inside a line is emitted as its own node followed by a synthetic
/// line break, and a plain `@Name` mention right before it is split off too.
/// A node that already is one timestamp, give or take punctuation, is left alone.
pub fn split_timestamps(nodes: Vec<WikiNode>, classifier: &dyn Classifier) -> Vec<WikiNode> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            WikiNode::Text(raw)
                if !raw.trim().is_empty()
                    && raw.contains(classifier.timestamp_hint())
                    && classifier.signature_timestamp(raw.trim()).is_none() =>
            {
                for line in raw.split_inclusive('\n') {
                    split_line(line, classifier, &mut out);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Whether `text` is only punctuation and whitespace left around a signature.
fn is_residue(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_whitespace() || c.is_ascii_punctuation())
}

fn split_line(line: &str, classifier: &dyn Classifier, out: &mut Vec<WikiNode>) {
    let Some(range) = classifier.find_timestamp(line) else {
        out.push(WikiNode::text(line));
        return;
    };

    // punctuation hugging the timestamp stays on its node
    let before = &line[..range.start];
    let start = if is_residue(before) {
        before.len() - before.trim_start().len()
    } else {
        match classifier.trailing_mention(before) {
            Some(at) if at > 0 => {
                out.push(WikiNode::text(&before[..at]));
                out.push(WikiNode::text(&before[at..]));
            }
            _ => out.push(WikiNode::text(before)),
        }
        range.start
    };

    let after = &line[range.end..];
    let end = if is_residue(after) {
        range.end + after.trim_end().len()
    } else {
        let rest = after.trim_start_matches(|c: char| c.is_ascii_punctuation());
        range.end + (after.len() - rest.len())
    };

    log::trace!("isolated timestamp {:?}", &line[start..end]);
    out.push(WikiNode::text(&line[start..end]));
    out.push(WikiNode::text("\n"));

    let after = &line[end..];
    if !after.trim().is_empty() {
        split_line(after, classifier, out);
    }
}
