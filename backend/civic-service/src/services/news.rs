/// News: a passthrough to a remote headlines API plus locally contributed articles
use crate::config::NewsConfig;
use crate::domain::{CreateNewsRequest, NewsArticle, NewsSource};
use crate::error::{AppError, Result};
use crate::repository::LockedStore;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

const LOCAL_PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x200?text=News";
const FALLBACK_IMAGE: &str = "https://via.placeholder.com/300x200?text=Community+News";

#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("news API key not configured")]
    MissingApiKey,

    #[error("news API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("news API returned {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Debug, Deserialize)]
struct HeadlinesResponse {
    #[serde(default)]
    articles: Vec<Value>,
}

#[derive(Clone)]
pub struct NewsService {
    local: LockedStore<NewsArticle>,
    client: reqwest::Client,
    config: NewsConfig,
}

impl NewsService {
    pub fn new(local: LockedStore<NewsArticle>, config: NewsConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            local,
            client,
            config,
        })
    }

    /// Remote headlines, or a single placeholder article when the API is
    /// unreachable or unconfigured. Never fails.
    pub async fn headlines(&self) -> Vec<Value> {
        match self.fetch_remote().await {
            Ok(articles) => {
                debug!(count = articles.len(), "Fetched remote headlines");
                articles
            }
            Err(e) => {
                warn!(error = %e, "Serving fallback news article");
                vec![fallback_article()]
            }
        }
    }

    async fn fetch_remote(&self) -> std::result::Result<Vec<Value>, NewsError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(NewsError::MissingApiKey)?;

        let response = self
            .client
            .get(&self.config.api_url)
            .query(&[("country", "us"), ("apiKey", api_key)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NewsError::Status(response.status()));
        }

        let body: HeadlinesResponse = response.json().await?;
        Ok(body.articles)
    }

    /// Locally contributed articles, newest first
    pub async fn local(&self) -> Result<Vec<NewsArticle>> {
        Ok(self.local.read().await?)
    }

    pub async fn add_local(&self, req: CreateNewsRequest) -> Result<NewsArticle> {
        let now = Utc::now();
        let article = NewsArticle {
            id: now.timestamp_millis(),
            title: req.title,
            description: req.description,
            url: req
                .url
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| "#".to_string()),
            url_to_image: req
                .image_url
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| LOCAL_PLACEHOLDER_IMAGE.to_string()),
            published_at: now,
            source: NewsSource {
                name: "Local Contributor".to_string(),
            },
        };

        self.local.prepend::<AppError>(article.clone()).await?;
        info!(article_id = article.id, "Local news added");
        Ok(article)
    }
}

fn fallback_article() -> Value {
    let now = Utc::now();
    serde_json::json!({
        "id": now.timestamp_millis(),
        "title": "Local Community Updates",
        "description": "Stay informed with the latest community news and updates.",
        "url": "#",
        "urlToImage": FALLBACK_IMAGE,
        "publishedAt": now.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        "source": { "name": "Civic Sense" },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_shape() {
        let article = fallback_article();
        assert_eq!(article["title"], "Local Community Updates");
        assert_eq!(article["source"]["name"], "Civic Sense");
        assert_eq!(article["url"], "#");
        assert!(article["publishedAt"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn missing_articles_field_is_empty() {
        let body: HeadlinesResponse =
            serde_json::from_value(serde_json::json!({ "status": "ok" })).unwrap();
        assert!(body.articles.is_empty());
    }
}
