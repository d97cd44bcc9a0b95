use std::borrow::Cow;

use serde::Deserialize;
use url::{ParseError, Url};

use crate::{
    errors::{FetchError, Result},
    reqwest_client::WikiClient,
    talk::patterns::Classifier,
    topics::{Topic, mark_signatures},
};

// https://en.wikipedia.org/w/api.php?action=query&prop=revisions&titles=Talk:Rust&rvprop=content&rvslots=main
// https://en.wikipedia.org/api/rest_v1/page/talk/Talk%3ARust?redirect=true

/// Whether `title` was given as a full page url rather than a title.
pub fn is_link(title: &str) -> bool {
    lazy_regex::regex_is_match!(r"^https?://\S+", title)
}

/// The page title `title` refers to. For links this is the last path segment.
pub fn page_title(title: &str) -> Cow<'_, str> {
    if !is_link(title) {
        return Cow::Borrowed(title);
    }
    let segment = title.rsplit('/').next().unwrap_or(title);
    // form decoding treats these as separators, wiki urls keep them literal
    let escaped = segment
        .replace('+', "%2B")
        .replace('&', "%26")
        .replace('=', "%3D");
    let decoded = url::form_urlencoded::parse(escaped.as_bytes())
        .next()
        .map(|(key, _)| key.into_owned())
        .unwrap_or_default();
    Cow::Owned(decoded)
}

/// Local name of the talk namespace.
pub fn talk_namespace(language: &str) -> &'static str {
    match language {
        "he" => "שיחה",
        _ => "Talk",
    }
}

/// Full title of the talk page belonging to `title`.
pub fn talk_title(title: &str, language: &str) -> String {
    format!("{}:{}", talk_namespace(language), page_title(title))
}

/// Build the basic wiki api url of everything we need.
fn build_wiki_url(language: &str) -> std::result::Result<Url, ParseError> {
    let mut url = Url::parse(&format!("https://{}.wikipedia.org/w/api.php", language))?;
    url.query_pairs_mut()
        .append_pair("action", "query")
        .append_pair("format", "json")
        .append_pair("formatversion", "2")
        .finish();
    Ok(url)
}

fn build_revisions_url(title: &str, language: &str) -> std::result::Result<Url, ParseError> {
    let mut url = build_wiki_url(language)?;
    url.query_pairs_mut()
        .append_pair("prop", "revisions")
        .append_pair("titles", &talk_title(title, language))
        .append_pair("rvprop", "content")
        .append_pair("rvslots", "main")
        .append_pair("redirects", "1")
        .finish();
    Ok(url)
}

fn build_topics_url(title: &str, language: &str) -> std::result::Result<Url, ParseError> {
    let mut url = Url::parse(&format!(
        "https://{}.wikipedia.org/api/rest_v1/page/talk/",
        language
    ))?;
    // rest paths use underscores, the segment itself is percent encoded by `push`
    url.path_segments_mut()
        .map_err(|_| ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .push(&talk_title(title, language).replace(' ', "_"));
    url.query_pairs_mut().append_pair("redirect", "true").finish();
    Ok(url)
}

#[derive(Debug, Deserialize)]
struct RevisionsResponse {
    #[serde(default)]
    query: Option<RevisionsQuery>,
}

#[derive(Debug, Deserialize)]
struct RevisionsQuery {
    #[serde(default)]
    pages: Vec<RevisionsPage>,
}

#[derive(Debug, Deserialize)]
struct RevisionsPage {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    #[serde(default)]
    revisions: Vec<Revision>,
}

#[derive(Debug, Deserialize)]
struct Revision {
    slots: RevisionSlots,
}

#[derive(Debug, Deserialize)]
struct RevisionSlots {
    main: MainSlot,
}

#[derive(Debug, Deserialize)]
struct MainSlot {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TopicsResponse {
    #[serde(default)]
    topics: Vec<Topic>,
}

/// Pull the wikitext of the first page out of a `prop=revisions` response.
fn revision_content(response: RevisionsResponse, requested: &str) -> Result<String> {
    let page = response
        .query
        .and_then(|query| query.pages.into_iter().next())
        .ok_or_else(|| FetchError::EmptyResponse(requested.to_string()))?;
    if page.missing || page.invalid {
        return Err(FetchError::MissingPage(page.title));
    }
    page.revisions
        .into_iter()
        .next()
        .and_then(|revision| revision.slots.main.content)
        .ok_or(FetchError::EmptyResponse(page.title))
}

/// Fetch the wikitext of the talk page of `title`.
///
/// `title` may also be a page url, in which case its last path segment is used.
pub async fn get_wikitalk(client: &WikiClient, title: &str, language: &str) -> Result<String> {
    let url = build_revisions_url(title, language)?;
    let response = client.get_json::<RevisionsResponse>(url).await?;
    revision_content(response, &talk_title(title, language))
}

/// Fetch several talk pages concurrently. Results keep the order of `titles`.
pub async fn get_wikitalks<S: AsRef<str>>(
    client: &WikiClient,
    titles: &[S],
    language: &str,
) -> Vec<Result<String>> {
    futures::future::join_all(
        titles
            .iter()
            .map(|title| get_wikitalk(client, title.as_ref(), language)),
    )
    .await
}

/// Fetch the talk page of `title` through the REST api as pre-split topics.
///
/// Replies get their `timestamp` and `username` filled from their signature,
/// and topics without a title are dropped.
pub async fn get_wikitalk_api(
    client: &WikiClient,
    title: &str,
    language: &str,
    classifier: &dyn Classifier,
) -> Result<Vec<Topic>> {
    let url = build_topics_url(title, language)?;
    let response = client.get_json::<TopicsResponse>(url).await?;
    Ok(response
        .topics
        .into_iter()
        .filter(|topic| !topic.title.is_empty())
        .map(|mut topic| {
            topic
                .replies
                .iter_mut()
                .for_each(|reply| mark_signatures(reply, classifier));
            topic
        })
        .collect())
}
