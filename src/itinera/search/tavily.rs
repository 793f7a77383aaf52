//! Tavily search API client.
//!
//! ```rust,no_run
//! use itinera::search::{SearchClient, SearchDepth};
//! use itinera::search::tavily::TavilyClient;
//!
//! # async {
//! let client = TavilyClient::new("tvly-...");
//! let response = client.search("berlin events this week", SearchDepth::Advanced, false).await?;
//! for hit in &response.results {
//!     println!("{:?}", hit.title);
//! }
//! # Ok::<(), itinera::error::SearchError>(())
//! # };
//! ```

use async_trait::async_trait;
use serde::Serialize;

use crate::itinera::clients::common::get_shared_http_client;
use crate::itinera::config::DEFAULT_TAVILY_BASE_URL;
use crate::itinera::error::SearchError;
use crate::itinera::search::{SearchClient, SearchDepth, SearchResponse};

#[derive(Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: SearchDepth,
    include_images: bool,
}

pub struct TavilyClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TavilyClient {
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(api_key, DEFAULT_TAVILY_BASE_URL)
    }

    /// Point the client at another deployment (or a mock server).
    pub fn with_base_url(api_key: &str, base_url: &str) -> Self {
        TavilyClient {
            http: get_shared_http_client().clone(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SearchClient for TavilyClient {
    async fn search(
        &self,
        query: &str,
        depth: SearchDepth,
        include_images: bool,
    ) -> Result<SearchResponse, SearchError> {
        let url = format!("{}/search", self.base_url);
        log::debug!("TavilyClient::search(...): {:?} ({:?})", query, depth);

        let response = self
            .http
            .post(&url)
            .json(&SearchRequest {
                api_key: &self.api_key,
                query,
                search_depth: depth,
                include_images,
            })
            .send()
            .await
            .map_err(|err| {
                log::error!("TavilyClient::search(...): request failed: {}", err);
                SearchError::Network(err)
            })?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            log::error!(
                "TavilyClient::search(...): status {} for {:?}",
                status.as_u16(),
                query
            );
            return Err(SearchError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let mut parsed: SearchResponse = serde_json::from_str(&body)?;
        if parsed.query.is_empty() {
            parsed.query = query.to_string();
        }
        Ok(parsed)
    }
}
