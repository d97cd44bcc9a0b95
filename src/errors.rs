//! Errors raised while fetching talk pages or configuring the parser.
//!
//! Parsing itself never fails.

use thiserror::Error;

/// The canonical result type of the fetch layer.
pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request middleware failed: {0}")]
    MiddleWare(#[from] reqwest_middleware::Error),
    #[error("request failed: {0}")]
    Underly(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("page '{0}' does not exist")]
    MissingPage(String),
    #[error("no content returned for '{0}'")]
    EmptyResponse(String),
}

/// Errors building a parser from user supplied settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid timestamp pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error(transparent)]
    Builder(#[from] crate::talk::TalkParserBuilderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_page() {
        let e = FetchError::MissingPage("Talk:Nowhere".into());
        assert_eq!(format!("{}", e), "page 'Talk:Nowhere' does not exist");
    }

    #[test]
    fn url_errors_convert() {
        let parse = url::Url::parse("not a url").unwrap_err();
        let e: FetchError = parse.into();
        assert!(matches!(e, FetchError::Url(_)));
        assert!(e.to_string().starts_with("invalid url"));
    }

    #[test]
    fn bad_patterns_are_config_errors() {
        let e: ConfigError = regex::Regex::new("(unclosed").unwrap_err().into();
        assert!(e.to_string().starts_with("invalid timestamp pattern"));
    }
}
