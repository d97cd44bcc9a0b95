use proptest::prelude::*;

use wikitalk_parser::talk::repair::repair;
use wikitalk_parser::wikitext::{Tokenize, WikiNode, WikitextTokenizer};
use wikitalk_parser::{Post, PostLink, Section, SignaturePatterns, TalkParser, parse_wikitalk};

const MERGE_DISCUSSION: &str = "\
Archive box and other preamble before the first heading.
== Merge proposal ==
I propose merging. [[User:Alice|Alice]] ([[User talk:Alice|talk]]) 10:00, 2 March 2022 (UTC)
:Support. [[User:Bob|Bob]] 11:00, 2 March 2022 (UTC)
::Oppose, see [https://example.org the guideline]. [[User:Carol|Carol]] 12:00, 2 March 2022 (UTC)
== Empty ==
== Typo ==
Fixed the typo. @Dave 13:00, 2 March 2022 (UTC)
";

fn squash(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn concat(nodes: &[WikiNode]) -> String {
    nodes.iter().map(WikiNode::to_wikitext).collect()
}

#[test]
fn single_signed_reply() {
    let sections: Vec<Section> =
        parse_wikitalk("== Discussion ==\n* Hello there @Alice 13:00, 1 Jan 2020 (UTC)").collect();
    assert_eq!(
        sections,
        vec![Section {
            title: "Discussion".into(),
            posts: vec![Post {
                text: "Hello there".into(),
                links: None,
                date: Some("13:00, 1 Jan 2020 (UTC)".into()),
                level: 1,
                author: Some("Alice".into()),
                parent_username: None,
            }],
        }]
    );
}

#[test]
fn threaded_discussion() {
    let sections: Vec<Section> = parse_wikitalk(MERGE_DISCUSSION).collect();
    let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Merge proposal", "Empty", "Typo"]);

    let merge = &sections[0].posts;
    assert_eq!(merge.len(), 3);

    assert_eq!(merge[0].text, "I propose merging.");
    assert_eq!(merge[0].level, 0);
    assert_eq!(merge[0].author.as_deref(), Some("Alice"));
    assert_eq!(merge[0].date.as_deref(), Some("10:00, 2 March 2022 (UTC)"));
    assert_eq!(
        merge[0].links,
        Some(vec![PostLink {
            link: "Alice".into(),
            text: "User:Alice".into()
        }])
    );

    assert_eq!(merge[1].text, "Support.");
    assert_eq!(merge[1].level, 1);
    assert_eq!(merge[1].author.as_deref(), Some("Bob"));

    assert_eq!(merge[2].level, 2);
    assert_eq!(merge[2].author.as_deref(), Some("Carol"));
    assert!(
        merge[2]
            .text
            .starts_with("Oppose, see [the guideline](https://example.org)")
    );

    assert!(sections[1].posts.is_empty());

    let typo = &sections[2].posts;
    assert_eq!(typo.len(), 1);
    assert_eq!(typo[0].text, "Fixed the typo.");
    assert_eq!(typo[0].author.as_deref(), Some("Dave"));
    assert_eq!(typo[0].date.as_deref(), Some("13:00, 2 March 2022 (UTC)"));

    assert!(
        sections
            .iter()
            .flat_map(|s| &s.posts)
            .all(|p| p.parent_username.is_none())
    );
}

#[test]
fn period_after_signature_is_not_a_post() {
    let sections: Vec<Section> = parse_wikitalk(
        "== T ==\nI agree. [[User:Bob|Bob]] 13:00, 4 May 2021 (UTC).\n:Thanks. [[User:Ann|Ann]] 14:00, 4 May 2021 (UTC)",
    )
    .collect();
    let posts = &sections[0].posts;
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].text, "I agree.");
    assert_eq!(posts[0].author.as_deref(), Some("Bob"));
    assert_eq!(posts[0].date.as_deref(), Some("13:00, 4 May 2021 (UTC)"));
    assert_eq!(posts[1].level, 1);
    assert_eq!(posts[1].text, "Thanks.");
    assert_eq!(posts[1].author.as_deref(), Some("Ann"));
}

#[test]
fn page_without_headings_has_no_sections() {
    assert_eq!(
        parse_wikitalk("Just a note 10:00, 1 May 2020 (UTC)").count(),
        0
    );
}

#[test]
fn mention_with_trailing_parenthetical() {
    let sections: Vec<Section> =
        parse_wikitalk("== T ==\nDone. [[User:Carol|Carol]] (fixed typo)").collect();
    let post = &sections[0].posts[0];
    assert_eq!(post.text, "Done.");
    assert_eq!(post.author.as_deref(), Some("Carol"));
    assert_eq!(post.date, None);
}

#[test]
fn lone_marker_is_not_a_post() {
    let sections: Vec<Section> =
        parse_wikitalk("== T ==\nreal post 10:00, 1 May 2020 (UTC)\n:").collect();
    assert_eq!(sections[0].posts.len(), 1);
    assert_eq!(sections[0].posts[0].text, "real post");
}

#[test]
fn unsigned_replies_are_kept() {
    let sections: Vec<Section> =
        parse_wikitalk("== Q ==\nIs this sourced?\n:No idea.\n::Maybe.").collect();
    let posts = &sections[0].posts;
    let summary: Vec<(usize, &str)> = posts.iter().map(|p| (p.level, p.text.as_str())).collect();
    assert_eq!(summary, vec![(0, "Is this sourced?"), (1, "No idea."), (2, "Maybe.")]);
    assert!(posts.iter().all(|p| p.date.is_none() && p.author.is_none()));
}

#[test]
fn html_and_entities_are_flattened() {
    let sections: Vec<Section> = parse_wikitalk(
        "== Style ==\n<b>Bold</b> &amp; plain<br>second line 10:00, 1 May 2020 (UTC)",
    )
    .collect();
    let post = &sections[0].posts[0];
    assert!(post.text.starts_with("Bold"));
    assert!(post.text.contains('&'));
    assert!(!post.text.contains("<b>"));
    assert_eq!(post.date.as_deref(), Some("10:00, 1 May 2020 (UTC)"));
}

#[test]
fn sections_serialise_with_nulls() {
    let sections: Vec<Section> = parse_wikitalk("== A ==\nhello").collect();
    let json = serde_json::to_value(&sections).unwrap();
    assert_eq!(json[0]["title"], "A");
    assert_eq!(json[0]["posts"][0]["text"], "hello");
    assert!(json[0]["posts"][0]["date"].is_null());
    assert!(json[0]["posts"][0]["parent_username"].is_null());
}

fn fragment() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "Hello",
        "there",
        "I agree",
        "[[User:Bob|Bob]]",
        "[[User talk:Bob|talk]]",
        "(see [[WP:MERGE|policy]])",
        "{{tq|quoted text}}",
        "@Alice",
        "https://example.org",
        "[https://example.org source]",
        "<b>bold</b>",
        "&amp;",
        "13:00, 1 Jan 2020 (UTC)",
        "UTC offsets",
        ".",
    ])
}

fn line() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["", ":", "::", "*", ":*", "#", "== Heading =="]),
        prop::collection::vec(fragment(), 0..6),
    )
        .prop_map(|(prefix, words)| {
            if prefix.starts_with('=') {
                prefix.to_string()
            } else {
                format!("{}{}", prefix, words.join(" "))
            }
        })
}

fn page() -> impl Strategy<Value = String> {
    prop::collection::vec(line(), 1..10).prop_map(|lines| lines.join("\n"))
}

proptest! {
    #[test]
    fn repair_is_idempotent(page in page()) {
        let parser = TalkParser::default();
        let once = parser.nodes(&page);
        let twice = repair(once.clone(), parser.classifier());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn repair_preserves_content(page in page()) {
        let c = SignaturePatterns::default();
        let tokens = WikitextTokenizer::default().tokenize(&page);
        let repaired = repair(tokens.clone(), &c);
        prop_assert_eq!(squash(&concat(&tokens)), squash(&concat(&repaired)));
    }

    #[test]
    fn posts_are_never_empty(page in page()) {
        for section in parse_wikitalk(&page) {
            prop_assert!(section.posts.iter().all(|p| !p.text.is_empty()));
        }
    }
}
