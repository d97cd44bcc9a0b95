//! Signature classification: timestamps and `@user` mentions.
//!
//! Segmentation only talks to the `Classifier` trait, so the English UTC
//! signature can be swapped for another wiki's format without touching the
//! splitting logic.

use std::ops::Range;

use regex::{Regex, RegexBuilder};

pub trait Classifier: Send + Sync {
    /// Cheap substring every timestamp contains, checked before running the
    /// full pattern over a text node.
    fn timestamp_hint(&self) -> &str;

    /// Byte range of the first timestamp in `text`.
    fn find_timestamp(&self, text: &str) -> Option<Range<usize>>;

    /// Whether the whole of `text` is one timestamp.
    fn is_timestamp(&self, text: &str) -> bool {
        self.find_timestamp(text)
            .is_some_and(|r| r.start == 0 && r.end == text.len())
    }

    /// The timestamp in `text` when nothing but punctuation and whitespace
    /// surrounds it, e.g. `13:00, 4 May 2021 (UTC).`
    fn signature_timestamp<'a>(&self, text: &'a str) -> Option<&'a str> {
        let range = self.find_timestamp(text)?;
        let residue = |s: &str| {
            s.chars()
                .all(|c| c.is_whitespace() || c.is_ascii_punctuation())
        };
        (residue(&text[..range.start]) && residue(&text[range.end..])).then(|| &text[range])
    }

    /// The user name of a mention fragment (`@Name`, `@[Name]`).
    fn mention<'a>(&self, fragment: &'a str) -> Option<&'a str> {
        lazy_regex::regex_captures!(r"(?s)^@\[?(.+?)\]?$", fragment).map(|(_, name)| name)
    }

    /// Byte offset where a plain-text `@Name` mention closing `text` begins.
    fn trailing_mention(&self, text: &str) -> Option<usize> {
        lazy_regex::regex!(r"(?:^|\s)(@\[?[^\s@\[\]]+\]?)\s*$")
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.start())
    }
}

/// Regex-backed classifier.
#[derive(Debug, Clone)]
pub struct SignaturePatterns {
    timestamp: Regex,
    hint: String,
}

impl SignaturePatterns {
    /// Build a classifier from a timestamp `pattern` (case-insensitive) and
    /// the substring `hint` every match contains.
    pub fn new<S: Into<String>>(pattern: &str, hint: S) -> Result<Self, regex::Error> {
        let timestamp = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self {
            timestamp,
            hint: hint.into(),
        })
    }
}

/// English Wikipedia signatures, e.g. `13:00, 4 May 2021 (UTC)`.
impl Default for SignaturePatterns {
    fn default() -> Self {
        Self {
            timestamp: Regex::clone(lazy_regex::regex!(
                r"[0-9]{2}:[0-9]{2}, [0-9]{1,2} [^\W\d]+ [0-9]{4} \(UTC\)"i
            )),
            hint: "UTC".to_string(),
        }
    }
}

impl Classifier for SignaturePatterns {
    fn timestamp_hint(&self) -> &str {
        &self.hint
    }

    fn find_timestamp(&self, text: &str) -> Option<Range<usize>> {
        self.timestamp.find(text).map(|m| m.range())
    }
}
