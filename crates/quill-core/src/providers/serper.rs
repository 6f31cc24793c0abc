//! Serper web-search client (google.serper.dev).

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{SearchDoc, SearchProvider};
use crate::error::ProviderError;

const DEFAULT_BASE_URL: &str = "https://google.serper.dev/search";

/// Search provider backed by the Serper API.
#[derive(Debug, Clone)]
pub struct SerperClient {
    api_key: String,
    base_url: String,
    http: reqwest::Client,
}

impl SerperClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Override the endpoint (testing against a local mock).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

#[async_trait]
impl SearchProvider for SerperClient {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchDoc>, ProviderError> {
        let response = self
            .http
            .post(&self.base_url)
            .header("X-API-KEY", &self.api_key)
            .json(&json!({ "q": query, "num": max_results }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::SearchUnavailable {
                query: query.to_string(),
                reason: format!("serper returned {status}: {body}"),
            });
        }

        let parsed: SerperResponse = response.json().await?;

        Ok(parsed
            .organic
            .into_iter()
            .take(max_results)
            .map(|r| SearchDoc {
                title: r.title,
                snippet: r.snippet,
                url: r.link,
            })
            .collect())
    }
}
