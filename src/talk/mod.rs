//! Talk page segmentation.
//!
//! `TalkParser::parse` tokenizes and repairs the whole page up front. Posts
//! are split and extracted one heading at a time as the returned iterator is
//! advanced, so a caller that stops early skips that work for the rest.

pub mod clean;
pub mod extract;
pub mod patterns;
pub mod repair;
pub mod sections;
pub mod splitter;

use std::sync::{Arc, LazyLock};

use derive_builder::Builder;

use crate::definitions::Section;
use crate::talk::extract::extract_post;
use crate::talk::patterns::{Classifier, SignaturePatterns};
use crate::talk::repair::repair;
use crate::talk::sections::SectionGroups;
use crate::talk::splitter::split_posts;
use crate::wikitext::node::WikiNode;
use crate::wikitext::tokenizer::{Tokenize, WikitextTokenizer};

/// Parser configuration: which tokenizer feeds the engine and which
/// classifier recognises signatures.
///
/// ```rust,ignore
/// let parser = TalkParserBuilder::default()
///     .classifier(Arc::new(SignaturePatterns::new(pattern, "IDT")?))
///     .build()?;
/// ```
#[derive(Clone, Builder)]
#[builder(pattern = "owned")]
pub struct TalkParser {
    #[builder(default = "Arc::new(WikitextTokenizer::default())")]
    tokenizer: Arc<dyn Tokenize>,
    #[builder(default = "Arc::new(SignaturePatterns::default())")]
    classifier: Arc<dyn Classifier>,
}

impl Default for TalkParser {
    fn default() -> Self {
        Self {
            tokenizer: Arc::new(WikitextTokenizer::default()),
            classifier: Arc::new(SignaturePatterns::default()),
        }
    }
}

impl TalkParser {
    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    /// Tokenize and repair `wikitext` without segmenting it.
    pub fn nodes(&self, wikitext: &str) -> Vec<WikiNode> {
        let nodes = self.tokenizer.tokenize(wikitext.trim());
        repair(nodes, self.classifier.as_ref())
    }

    /// Parse a talk page into its sections.
    ///
    /// The node stream is built and repaired before this returns; each
    /// `Section` is assembled when the iterator reaches it.
    pub fn parse(&self, wikitext: &str) -> Sections<'_> {
        Sections {
            groups: SectionGroups::new(self.nodes(wikitext)),
            classifier: self.classifier.as_ref(),
        }
    }
}

/// Forward-only iterator over the sections of one page.
pub struct Sections<'a> {
    groups: SectionGroups<std::vec::IntoIter<WikiNode>>,
    classifier: &'a dyn Classifier,
}

impl Iterator for Sections<'_> {
    type Item = Section;

    fn next(&mut self) -> Option<Section> {
        let (title, group) = self.groups.next()?;
        let posts = split_posts(group, self.classifier)
            .into_iter()
            .map(|candidate| extract_post(candidate, self.classifier))
            .filter(|post| !post.text.is_empty())
            .collect::<Vec<_>>();
        log::debug!("section {:?}: {} posts", title, posts.len());
        Some(Section { title, posts })
    }
}

static DEFAULT_PARSER: LazyLock<TalkParser> = LazyLock::new(TalkParser::default);

/// Parse a talk page with the English UTC signature format.
pub fn parse_wikitalk(wikitext: &str) -> Sections<'static> {
    DEFAULT_PARSER.parse(wikitext)
}
