//! Catalog site client
//!
//! Three endpoint shapes, each a single GET with no retry:
//! - `/tunes/popular`
//! - `/tunes/search?type=&mode=&q=<query>`
//! - `/tunes/<tune id>`
//!
//! A non-2xx status fails with [`TunesError::RemoteFetch`] before any of the
//! body is handed to the extractor.

use crate::error::{Result, TunesError};
use reqwest::Url;
use std::time::Duration;
use tunes_common::config::CatalogConfig;

/// HTTP client for the catalog site
pub struct CatalogClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| TunesError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(TunesError::InvalidUrl(format!(
                "{}: not a base URL",
                config.base_url
            )));
        }

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder
            .build()
            .map_err(|e| TunesError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Raw markup of the popular-tunes page
    pub async fn fetch_popular(&self) -> Result<String> {
        self.get(self.popular_url()).await
    }

    /// Raw markup of the search results for `query`
    pub async fn fetch_search(&self, query: &str) -> Result<String> {
        self.get(self.search_url(query)).await
    }

    /// Raw markup of one tune's detail page
    pub async fn fetch_tune_detail(&self, tune_id: &str) -> Result<String> {
        self.get(self.tune_url(tune_id)).await
    }

    pub fn popular_url(&self) -> Url {
        self.endpoint(&["tunes", "popular"])
    }

    pub fn search_url(&self, query: &str) -> Url {
        let mut url = self.endpoint(&["tunes", "search"]);
        url.query_pairs_mut()
            .append_pair("type", "")
            .append_pair("mode", "")
            .append_pair("q", query);
        url
    }

    pub fn tune_url(&self, tune_id: &str) -> Url {
        self.endpoint(&["tunes", tune_id])
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in new(), so segments are always available
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get(&self, url: Url) -> Result<String> {
        tracing::debug!(url = %url, "Fetching catalog page");

        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| TunesError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TunesError::RemoteFetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TunesError::Network(e.to_string()))?;

        tracing::debug!(url = %url, bytes = body.len(), "Fetched catalog page");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> CatalogClient {
        let config = CatalogConfig {
            base_url: base.to_string(),
            ..CatalogConfig::default()
        };
        CatalogClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_urls() {
        let client = client("https://thesession.org");
        assert_eq!(
            client.popular_url().as_str(),
            "https://thesession.org/tunes/popular"
        );
        assert_eq!(
            client.tune_url("23").as_str(),
            "https://thesession.org/tunes/23"
        );
        assert_eq!(
            client.search_url("drowsy maggie").as_str(),
            "https://thesession.org/tunes/search?type=&mode=&q=drowsy+maggie"
        );
    }

    #[test]
    fn test_base_url_with_trailing_slash_and_prefix() {
        let client = client("http://localhost:8080/mirror/");
        assert_eq!(
            client.tune_url("50").as_str(),
            "http://localhost:8080/mirror/tunes/50"
        );
    }

    #[test]
    fn test_tokens_are_escaped() {
        let client = client("https://thesession.org");
        assert_eq!(
            client.tune_url("a/b").as_str(),
            "https://thesession.org/tunes/a%2Fb"
        );
        assert_eq!(
            client.search_url("kid & co").as_str(),
            "https://thesession.org/tunes/search?type=&mode=&q=kid+%26+co"
        );
    }

    #[test]
    fn test_empty_query_is_kept() {
        let client = client("https://thesession.org");
        assert!(client.search_url("").as_str().ends_with("&q="));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let config = CatalogConfig {
            base_url: "not a url".to_string(),
            ..CatalogConfig::default()
        };
        assert!(matches!(
            CatalogClient::new(&config),
            Err(TunesError::InvalidUrl(_))
        ));

        let config = CatalogConfig {
            base_url: "mailto:someone@example.com".to_string(),
            ..CatalogConfig::default()
        };
        assert!(matches!(
            CatalogClient::new(&config),
            Err(TunesError::InvalidUrl(_))
        ));
    }
}
