//! Split a section's nodes into candidate posts.
//!
//! A post starts at a bare indent marker (`:`, `::*`, `#` …) and ends at a
//! node holding only a signature timestamp, give or take stray punctuation.
//! Level sequences are taken as they come; replies may jump or repeat levels
//! freely.

use crate::talk::patterns::Classifier;
use crate::wikitext::node::WikiNode;

/// Nodes of one candidate post and the indent level it was opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostGroup {
    pub level: usize,
    pub nodes: Vec<WikiNode>,
}

pub fn split_posts(nodes: Vec<WikiNode>, classifier: &dyn Classifier) -> Vec<PostGroup> {
    let mut posts = Vec::new();
    let mut level = 0usize;
    let mut group: Vec<WikiNode> = Vec::new();

    for node in nodes {
        if node.is_post_marker() {
            // a marker with nothing after it is replaced, not emitted
            if group.iter().any(|n| !n.is_post_marker()) {
                posts.push(PostGroup {
                    level,
                    nodes: std::mem::take(&mut group),
                });
            } else {
                group.clear();
            }
            level = node.marker_level();
            group.push(node);
        } else if classifier.signature_timestamp(&node.trimmed()).is_some() {
            group.push(node);
            posts.push(PostGroup {
                level,
                nodes: std::mem::take(&mut group),
            });
            level = 0;
        } else if !node.is_blank() {
            group.push(node);
        }
    }

    if !group.is_empty() {
        posts.push(PostGroup {
            level,
            nodes: group,
        });
    }
    posts
}
