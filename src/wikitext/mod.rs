//! Wikitext module root
//!
//! Declares the node model, the list-marker enum, the link scanners and the
//! tokenizer that turns raw talk-page markup into a `WikiNode` stream.

pub mod enums;
pub mod node;
pub mod tokenizer;
pub mod types;

pub use node::WikiNode;
pub use tokenizer::{Tokenize, WikitextTokenizer};
