//! Web search collaborators.
//!
//! The responder talks to search providers through the [`SearchClient`] trait. The bundled
//! implementation is [`tavily::TavilyClient`].

pub mod tavily;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::itinera::error::SearchError;

/// How much effort the provider should spend on a query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    Basic,
    Advanced,
}

/// One search hit. Any field may be missing from the provider's payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

/// Result set returned by a [`SearchClient`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

impl SearchResponse {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(
        &self,
        query: &str,
        depth: SearchDepth,
        include_images: bool,
    ) -> Result<SearchResponse, SearchError>;
}
