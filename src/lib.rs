//! Parse wiki talk pages into headed threads of posts.
//!
//! ```rust,ignore
//! for section in wikitalk_parser::parse_wikitalk(&wikitext) {
//!     println!("{}: {} posts", section.title, section.posts.len());
//! }
//! ```

pub mod definitions;
pub mod errors;
pub mod mediawiki_api;
pub mod reqwest_client;
pub mod talk;
pub mod topics;
pub mod wikitext;

pub use definitions::{Post, PostLink, Section};
pub use talk::patterns::{Classifier, SignaturePatterns};
pub use talk::{Sections, TalkParser, TalkParserBuilder, parse_wikitalk};
