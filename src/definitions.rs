use serde::{Deserialize, Serialize};

/// A link found inside a post.
///
/// `link` holds the display text of the wikilink (empty when it had none) and
/// `text` the link target, e.g. `{link: "Alice", text: "User:Alice"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PostLink {
    pub link: String,
    pub text: String,
}

/// One reply within a thread.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Post {
    pub text: String,
    pub links: Option<Vec<PostLink>>,
    pub date: Option<String>,
    /// Count of leading `:`/`;`/`*` markers. 0 is a top-level post.
    pub level: usize,
    pub author: Option<String>,
    pub parent_username: Option<String>,
}

/// A headed discussion thread.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Section {
    pub title: String,
    pub posts: Vec<Post>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_fields_serialize_as_null() {
        let post = Post {
            text: "hi".into(),
            level: 2,
            ..Default::default()
        };
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["text"], "hi");
        assert_eq!(json["level"], 2);
        assert!(json["links"].is_null());
        assert!(json["parent_username"].is_null());
    }

    #[test]
    fn section_roundtrips_through_json() {
        let section = Section {
            title: "Discussion".into(),
            posts: vec![Post {
                text: "Agree".into(),
                links: Some(vec![PostLink {
                    link: "Alice".into(),
                    text: "User:Alice".into(),
                }]),
                author: Some("Alice".into()),
                ..Default::default()
            }],
        };
        let raw = serde_json::to_string(&section).unwrap();
        let back: Section = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, section);
    }
}
