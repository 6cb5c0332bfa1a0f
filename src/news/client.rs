use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::Article;

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    articles: Vec<ArticleRecord>,
}

/// Body NewsAPI sends alongside a non-success status.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// One article as it comes off the wire, before it becomes an [`Article`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub title: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub url_to_image: Option<String>,
    pub published_at: Option<String>,
}

impl ArticleRecord {
    pub fn into_article(self) -> Article {
        let mut article = Article::new(self.title);
        article.description = self.description;
        article.author = self.author;
        article.published_at = self.published_at.as_deref().and_then(parse_published_at);
        article.url = self.url;
        article.image_url = self.url_to_image;
        article
    }
}

/// ISO-8601 timestamps as NewsAPI sends them; anything else is treated as unset.
pub fn parse_published_at(s: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(s.trim()) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            tracing::debug!("Ignoring unparsable publishedAt {:?}: {}", s, e);
            None
        }
    }
}

pub struct NewsApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl NewsApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("unbiased-news/1.0")
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &Config) -> Self {
        if config.uses_default_api_key() {
            tracing::warn!("No API key configured, using the built-in default");
        }
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.resolved_api_key().to_string(),
        }
    }

    pub fn top_headlines_url(&self, country: Option<&str>, category: &str) -> Result<Url> {
        let category = category.trim();
        if category.is_empty() {
            return Err(AppError::InvalidRequest("category must not be empty".to_string()));
        }

        let mut query = Vec::with_capacity(3);
        if let Some(country) = country {
            let country = country.trim();
            if country.is_empty() {
                return Err(AppError::InvalidRequest("country must not be empty".to_string()));
            }
            query.push(("country", country));
        }
        query.push(("category", category));
        query.push(("apiKey", self.api_key.as_str()));

        Ok(Url::parse_with_params(&format!("{}/top-headlines", self.base_url), &query)?)
    }

    pub fn everything_url(&self, keyword: &str) -> Result<Url> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(AppError::InvalidRequest("search keyword must not be empty".to_string()));
        }

        Ok(Url::parse_with_params(
            &format!("{}/everything", self.base_url),
            &[("q", keyword), ("apiKey", self.api_key.as_str())],
        )?)
    }

    pub async fn top_headlines(
        &self,
        country: Option<&str>,
        category: &str,
    ) -> Result<Vec<ArticleRecord>> {
        let url = self.top_headlines_url(country, category)?;
        self.get_articles(url).await
    }

    pub async fn everything(&self, keyword: &str) -> Result<Vec<ArticleRecord>> {
        let url = self.everything_url(keyword)?;
        self.get_articles(url).await
    }

    async fn get_articles(&self, url: Url) -> Result<Vec<ArticleRecord>> {
        tracing::debug!("GET {}{}", url.origin().ascii_serialization(), url.path());

        let response = self.client.get(url).send().await?;
        let status = response.status();

        // NewsAPI only answers 200 with a payload; any other status is a failure.
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(ApiErrorBody { code, message: Some(message) }) => match code {
                    Some(code) => format!("{code}: {message}"),
                    None => message,
                },
                _ => status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            };
            return Err(AppError::RemoteFetch {
                status: Some(status.as_u16()),
                message,
            });
        }

        let bytes = response.bytes().await?;
        let decoded: NewsApiResponse = serde_json::from_slice(&bytes)?;
        Ok(decoded.articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::stub::{articles_body, test_client, StubServer};

    fn client_for(base_url: &str) -> NewsApiClient {
        let config = Config {
            base_url: base_url.to_string(),
            api_key: Some("k3y".to_string()),
            ..Config::default()
        };
        test_client(&config)
    }

    #[test]
    fn headline_url_carries_country_category_and_key() {
        let client = client_for("https://newsapi.org/v2/");
        let url = client.top_headlines_url(Some("us"), "general").unwrap();
        assert_eq!(
            url.as_str(),
            "https://newsapi.org/v2/top-headlines?country=us&category=general&apiKey=k3y"
        );

        let url = client.top_headlines_url(None, "sports").unwrap();
        assert_eq!(url.query(), Some("category=sports&apiKey=k3y"));
    }

    #[test]
    fn search_keyword_is_percent_encoded() {
        let client = client_for("https://newsapi.org/v2");
        let url = client.everything_url("rust & C++").unwrap();
        assert_eq!(url.query(), Some("q=rust+%26+C%2B%2B&apiKey=k3y"));
    }

    #[test]
    fn malformed_requests_are_rejected_before_sending() {
        let client = client_for("https://newsapi.org/v2");
        assert!(matches!(client.everything_url("  "), Err(AppError::InvalidRequest(_))));
        assert!(matches!(client.top_headlines_url(None, ""), Err(AppError::InvalidRequest(_))));

        let client = client_for("not a url");
        assert!(matches!(
            client.top_headlines_url(None, "general"),
            Err(AppError::InvalidRequest(_))
        ));
    }

    #[test]
    fn record_conversion_tolerates_bad_dates() {
        let record: ArticleRecord = serde_json::from_str(
            r#"{"title":"T","url":"https://e.com/1","urlToImage":"https://e.com/1.png","publishedAt":"not-a-date","source":{"name":"x"}}"#,
        )
        .unwrap();
        let article = record.into_article();

        assert_eq!(article.title, "T");
        assert_eq!(article.image_url.as_deref(), Some("https://e.com/1.png"));
        assert!(article.published_at.is_none());
        assert!(article.id.is_none());
    }

    #[test]
    fn published_at_accepts_fractional_seconds() {
        let dt = parse_published_at("2024-05-02T10:15:30.123Z").unwrap();
        assert_eq!(dt.timestamp(), 1_714_644_930);
        assert!(parse_published_at("").is_none());
    }

    #[tokio::test]
    async fn api_error_body_is_carried_in_the_error() {
        let server = StubServer::start(|_| {
            Some((
                401,
                r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid."}"#
                    .to_string(),
            ))
        })
        .await;

        let err = client_for(&server.base_url)
            .top_headlines(None, "general")
            .await
            .unwrap_err();

        match err {
            AppError::RemoteFetch { status, message } => {
                assert_eq!(status, Some(401));
                assert_eq!(message, "apiKeyInvalid: Your API key is invalid.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn any_status_other_than_200_is_a_fetch_error() {
        let server =
            StubServer::start(|_| Some((203, articles_body(&[("T", Some("https://e.com/1"))])))).await;

        let err = client_for(&server.base_url)
            .top_headlines(None, "general")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::RemoteFetch { status: Some(203), .. }));
    }

    #[tokio::test]
    async fn wrong_shape_is_a_decode_error() {
        let server = StubServer::start(|_| Some((200, r#"{"status":"ok"}"#.to_string()))).await;

        let err = client_for(&server.base_url).everything("rust").await.unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }
}
