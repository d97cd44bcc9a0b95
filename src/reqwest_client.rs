use http_cache_reqwest::{CACacheManager, Cache, CacheMode, HttpCache, HttpCacheOptions};
use reqwest_middleware::ClientWithMiddleware;
use serde::de::DeserializeOwned;
use url::Url;

use crate::errors::Result;

pub const DEFAULT_CACHE_PATH: &str = "./.cache";
pub const DEFAULT_USER_AGENT: &str =
    "wikitalk_parser/0.1 (https://github.com/imvladikon/wikitalk_parser)";

/// Wrapper around a cached client so the wiki isn't hit for every rerun.
#[derive(Debug, Clone)]
pub struct WikiClient(pub ClientWithMiddleware);

impl WikiClient {
    /// Create a new client with middleware which auto caches based on HTTP headers
    ///
    /// # Arguments
    /// - cache_path -> The path to store the cache. Defaults to `./.cache`
    /// - user_agent -> User agent sent to the wiki. Wikimedia rejects anonymous agents.
    ///
    /// # Returns
    /// - a new client object to use, or the error building the inner client.
    pub fn new(cache_path: Option<&str>, user_agent: Option<&str>) -> Result<Self> {
        let inner = reqwest::ClientBuilder::new()
            .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
            .build()?;
        let client = reqwest_middleware::ClientBuilder::new(inner)
            .with(Cache(HttpCache {
                mode: CacheMode::Default,
                manager: CACacheManager::new(
                    cache_path.unwrap_or(DEFAULT_CACHE_PATH).into(),
                    true,
                ),
                options: HttpCacheOptions::default(),
            }))
            .build();
        Ok(Self(client))
    }

    /// GET `url` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        log::debug!("GET {}", url);
        let response = self.0.get(url).send().await?.error_for_status()?;
        Ok(response.json::<T>().await?)
    }
}
