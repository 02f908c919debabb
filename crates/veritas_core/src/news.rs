//! News-search collaborator client (GNews-format provider).
//!
//! One GET per search strategy. Success bodies carry an `articles` array of
//! provider records with every field optional; error bodies carry an
//! `errors` array whose first entry is the human-readable reason.

use crate::config::NewsConfig;
use crate::error::PipelineError;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// One search call against the news provider.
#[allow(async_fn_in_trait)]
pub trait NewsSearch {
    async fn search(&self, query: &str) -> Result<Vec<RawArticle>, PipelineError>;
}

/// Provider article record as it arrives on the wire
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArticle {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub source: Option<ArticleSource>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleSource {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    articles: Vec<RawArticle>,
}

/// Production news-search client
pub struct NewsClient {
    http: reqwest::Client,
    config: NewsConfig,
}

impl NewsClient {
    pub fn new(config: NewsConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            config,
        }
    }
}

impl NewsSearch for NewsClient {
    async fn search(&self, query: &str) -> Result<Vec<RawArticle>, PipelineError> {
        debug!("News search: \"{}\"", query);

        let max = self.config.page_size.to_string();
        let response = self
            .http
            .get(format!("{}/search", self.config.base_url))
            .query(&[
                ("q", query),
                ("lang", self.config.language.as_str()),
                ("sortby", self.config.sort_by.as_str()),
                ("max", max.as_str()),
                ("apikey", self.config.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| PipelineError::Collaborator(format!("News request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            // Error bodies carry {"errors": ["..."]}
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| {
                    v.get("errors")
                        .and_then(|e| e.get(0))
                        .and_then(|m| m.as_str())
                        .map(String::from)
                })
                .unwrap_or_else(|| status.to_string());
            return Err(PipelineError::Collaborator(format!(
                "News search failed: {message}"
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::Collaborator(format!("Malformed news response: {e}")))?;

        Ok(body.articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_shape() {
        let raw = r#"{
            "totalArticles": 2,
            "articles": [
                {
                    "title": "Tesla announces new model",
                    "description": "The company revealed...",
                    "source": {"name": "Reuters", "url": "https://reuters.com"},
                    "publishedAt": "2025-02-10T12:00:00Z",
                    "url": "https://reuters.com/article"
                },
                {"title": "Headline only"}
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.articles.len(), 2);
        assert_eq!(
            parsed.articles[0].source.as_ref().unwrap().name.as_deref(),
            Some("Reuters")
        );
        assert!(parsed.articles[1].description.is_none());
    }

    #[test]
    fn test_search_response_missing_articles_key() {
        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.articles.is_empty());
    }
}
