//! Talk pages as returned by the REST `page/talk` endpoint.
//!
//! The endpoint already splits a page into topics and replies, but leaves the
//! signature inside the reply html. `mark_signatures` lifts it out and
//! `topic_to_section` turns a topic into the same `Section` shape the wikitext
//! parser produces.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::definitions::{Post, Section};
use crate::talk::clean::clean_text;
use crate::talk::patterns::Classifier;

static SELECTOR_ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("static selector"));

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Reply {
    pub html: String,
    #[serde(default)]
    pub depth: usize,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Topic {
    #[serde(default)]
    pub id: u64,
    /// The topic heading. Read from the `html` field of the response.
    #[serde(rename(deserialize = "html"), default)]
    pub title: String,
    #[serde(default)]
    pub depth: usize,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

/// User name at the end of a user page link, e.g. `./User:Alice` -> `Alice`.
fn username_from_href(href: &str) -> Option<String> {
    href.rsplit_once(':').map(|(_, name)| name.to_string())
}

/// Text after a signature link, minus the closing paren of `(talk)`.
fn signature_tail(text: &str) -> String {
    text.trim_start_matches(|c: char| c.is_whitespace() || c == ')')
        .trim_end()
        .to_string()
}

/// Fill `timestamp` and `username` from the last link in the reply.
///
/// Signatures end with a user (or user talk) link followed by the date, so the
/// text right after the last anchor is checked against the classifier.
pub fn mark_signatures(reply: &mut Reply, classifier: &dyn Classifier) {
    if !reply.html.contains("<a") {
        return;
    }
    let fragment = Html::parse_fragment(&reply.html);
    let Some(anchor) = fragment.select(&SELECTOR_ANCHOR).last() else {
        return;
    };

    reply.timestamp = anchor
        .next_sibling()
        .and_then(|sibling| sibling.value().as_text().map(|text| signature_tail(text)))
        .filter(|text| classifier.is_timestamp(text));
    reply.username = anchor.value().attr("href").and_then(username_from_href);
}

/// Convert a REST topic into a `Section`.
///
/// Each reply's `parent_username` is the author of the closest earlier reply
/// with a smaller depth.
pub fn topic_to_section(topic: Topic) -> Section {
    // (depth, username) of the replies that can still be a parent
    let mut ancestors: Vec<(usize, Option<String>)> = Vec::new();
    let mut posts = Vec::with_capacity(topic.replies.len());

    for reply in topic.replies {
        while ancestors.last().is_some_and(|(depth, _)| *depth >= reply.depth) {
            ancestors.pop();
        }
        let parent_username = ancestors.last().and_then(|(_, name)| name.clone());
        ancestors.push((reply.depth, reply.username.clone()));

        let text = clean_text(&reply.html);
        if text.is_empty() {
            log::trace!("dropping empty reply at depth {}", reply.depth);
            continue;
        }
        posts.push(Post {
            text,
            links: None,
            date: reply.timestamp,
            level: reply.depth,
            author: reply.username,
            parent_username,
        });
    }

    Section {
        title: clean_text(&topic.title),
        posts,
    }
}
