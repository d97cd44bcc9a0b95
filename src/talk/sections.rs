//! Group a repaired node stream under its headings.

use crate::wikitext::node::WikiNode;

/// Heading title without its `=` markup.
pub fn heading_title(raw: &str) -> String {
    raw.trim().trim_matches('=').trim().to_string()
}

/// Lazily yields `(heading title, nodes)` pairs, one per heading that has
/// content under it. Nodes before the first heading are dropped.
pub struct SectionGroups<I: Iterator<Item = WikiNode>> {
    nodes: I,
    heading: Option<String>,
    group: Vec<WikiNode>,
    dropped: usize,
}

impl<I: Iterator<Item = WikiNode>> SectionGroups<I> {
    pub fn new<T: IntoIterator<IntoIter = I>>(nodes: T) -> Self {
        Self {
            nodes: nodes.into_iter(),
            heading: None,
            group: Vec::new(),
            dropped: 0,
        }
    }
}

impl<I: Iterator<Item = WikiNode>> Iterator for SectionGroups<I> {
    type Item = (String, Vec<WikiNode>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.nodes.next() {
                Some(WikiNode::Heading { raw, .. }) => {
                    if self.heading.is_none() && self.dropped > 0 {
                        log::debug!("dropped {} nodes before the first heading", self.dropped);
                    }
                    let previous = self.heading.replace(heading_title(&raw));
                    let group = std::mem::take(&mut self.group);
                    if let Some(title) = previous
                        && !group.is_empty()
                    {
                        return Some((title, group));
                    }
                }
                Some(node) => {
                    if self.heading.is_some() {
                        self.group.push(node);
                    } else {
                        self.dropped += 1;
                    }
                }
                None => {
                    let title = self.heading.take()?;
                    let group = std::mem::take(&mut self.group);
                    return (!group.is_empty()).then_some((title, group));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(raw: &str) -> WikiNode {
        WikiNode::Heading {
            raw: raw.into(),
            level: 2,
        }
    }

    #[test]
    fn titles_lose_equals_signs() {
        assert_eq!(heading_title("== Discussion =="), "Discussion");
        assert_eq!(heading_title("=== Sub ==="), "Sub");
    }

    #[test]
    fn groups_follow_headings() {
        let nodes = vec![
            WikiNode::text("preamble"),
            heading("== A =="),
            WikiNode::text("a1"),
            WikiNode::text("a2"),
            heading("== B =="),
            WikiNode::text("b1"),
        ];
        let groups: Vec<_> = SectionGroups::new(nodes).collect();
        assert_eq!(
            groups,
            vec![
                (
                    "A".to_string(),
                    vec![WikiNode::text("a1"), WikiNode::text("a2")]
                ),
                ("B".to_string(), vec![WikiNode::text("b1")]),
            ]
        );
    }

    #[test]
    fn empty_headings_and_headless_pages_yield_nothing() {
        let nodes = vec![heading("== A =="), heading("== B =="), WikiNode::text("b")];
        let groups: Vec<_> = SectionGroups::new(nodes).collect();
        assert_eq!(groups, vec![("B".to_string(), vec![WikiNode::text("b")])]);

        let headless: Vec<_> = SectionGroups::new(vec![WikiNode::text("only text")]).collect();
        assert!(headless.is_empty());
    }

    #[test]
    fn duplicate_titles_are_independent() {
        let nodes = vec![
            heading("== Same =="),
            WikiNode::text("1"),
            heading("== Same =="),
            WikiNode::text("2"),
        ];
        let titles: Vec<_> = SectionGroups::new(nodes).map(|(t, _)| t).collect();
        assert_eq!(titles, vec!["Same", "Same"]);
    }
}
