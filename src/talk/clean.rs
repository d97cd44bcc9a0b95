//! Final text cleanup for extracted posts.

use scraper::Html;

/// Strip byte-order marks, zero-width and directional characters, and fold
/// newlines and exotic spaces into plain spaces.
pub fn unicode_normalize(text: &str) -> String {
    text.trim()
        .replace('\u{feff}', "")
        .replace(['\n', '\u{a0}', '\u{200a}'], " ")
        .replace(['\u{200b}', '\u{200c}', '\u{200d}', '\u{200e}', '\u{200f}'], "")
        .trim()
        .to_string()
}

/// Text content of an html fragment, with entities decoded.
pub fn html_to_text(fragment: &str) -> String {
    if !fragment.contains(['<', '&']) {
        return fragment.to_string();
    }
    Html::parse_fragment(fragment)
        .root_element()
        .text()
        .collect::<String>()
}

/// Normalise a joined post body into plain text.
///
/// Leftover quote markup (`<blockquote>`, `{{`, `}}`) becomes `'`, `<br>`
/// becomes a line break, one trailing run of hyphens is dropped and any
/// remaining html is reduced to its text.
pub fn clean_text(text: &str) -> String {
    let text = unicode_normalize(text)
        .replace("<blockquote>", "'")
        .replace("</blockquote>", "'")
        .replace("{{", "'")
        .replace("}}", "'")
        .replace("<br>", "\n")
        .replace("<br />", "\n")
        .replace("<br/>", "\n");
    let text = text.trim_end_matches('-').replace("reply to|", "@");
    html_to_text(&text).trim().to_string()
}
