//! Turn one candidate post into a `Post` record.
//!
//! Nodes are linearised into text fragments, then the tail is walked back to
//! peel off the signature: first the timestamp, then the author mention
//! (optionally followed by a parenthetical such as a talk link).

use crate::definitions::{Post, PostLink};
use crate::talk::clean::clean_text;
use crate::talk::patterns::Classifier;
use crate::talk::repair::{absorb_until, opens_parenthesis};
use crate::talk::splitter::PostGroup;
use crate::wikitext::node::{NodeCursor, WikiNode};

fn opens_template(text: &str) -> bool {
    text.starts_with("{{") && !text.ends_with("}}")
}

fn is_parenthetical(text: &str) -> bool {
    text.starts_with('(') && text.ends_with(')')
}

/// Content fragments of a post plus the links met on the way.
fn linearize(nodes: Vec<WikiNode>) -> (Vec<String>, Option<Vec<PostLink>>) {
    let mut fragments = Vec::new();
    let mut links: Option<Vec<PostLink>> = None;
    let mut cursor = NodeCursor::new(nodes);

    while let Some(node) = cursor.next() {
        let shown = node.display();
        if shown.is_empty() {
            continue;
        }
        let fragment = match &node {
            WikiNode::Template(_) if opens_template(&shown) => {
                absorb_until(shown, &mut cursor, "}}")
            }
            WikiNode::Text(_) if opens_parenthesis(&shown) => absorb_until(shown, &mut cursor, ")"),
            WikiNode::Text(_) => shown,
            WikiNode::ExternalLink {
                url, title: None, ..
            } => url.clone(),
            WikiNode::ExternalLink {
                url,
                title: Some(title),
                ..
            } => format!("[{}]({})", title, url),
            WikiNode::Wikilink { .. } => match node.as_mention() {
                Some((mention, link)) => {
                    links.get_or_insert_with(Vec::new).push(link);
                    mention
                }
                None => shown,
            },
            WikiNode::Template(_)
            | WikiNode::Tag { .. }
            | WikiNode::Heading { .. }
            | WikiNode::Other(_) => node.trimmed(),
        };
        let fragment = fragment.trim();
        if !fragment.is_empty() {
            fragments.push(fragment.to_string());
        }
    }

    (fragments, links)
}

/// Extract a post. The result may have empty text; callers drop those.
pub fn extract_post(group: PostGroup, classifier: &dyn Classifier) -> Post {
    let level = match group.nodes.first() {
        Some(first) => {
            let derived = first.marker_level();
            if derived != group.level {
                log::debug!(
                    "post level {} re-derived as {} from {:?}",
                    group.level,
                    derived,
                    first.trimmed()
                );
            }
            derived
        }
        None => group.level,
    };

    let (mut fragments, links) = linearize(group.nodes);

    let date = fragments
        .last()
        .and_then(|last| classifier.signature_timestamp(last))
        .map(str::to_string);
    if date.is_some() {
        fragments.pop();
    }

    let mut author = None;
    if let Some(last) = fragments.last() {
        if let Some(name) = classifier.mention(last) {
            author = Some(name.to_string());
            fragments.pop();
        } else if is_parenthetical(last)
            && let Some(name) = fragments
                .len()
                .checked_sub(2)
                .and_then(|i| classifier.mention(&fragments[i]))
        {
            author = Some(name.to_string());
            fragments.truncate(fragments.len() - 2);
        }
    }

    Post {
        text: clean_text(&fragments.join("\n")),
        links,
        date,
        level,
        author,
        parent_username: None,
    }
}
