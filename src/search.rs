//! Web context fetcher.
//!
//! One bounded outbound call per invocation against a Tavily-style search
//! API. Failures are reported as `Error::UpstreamUnavailable`; the pipeline
//! recovers by generating without context. No retries.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{Error, Result};

const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_SNIPPETS: usize = 5;

/// Ordered snippets extracted from organic search results. Produced per
/// request and folded into the generation input; never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebContext {
    snippets: Vec<String>,
}

impl WebContext {
    pub fn new(snippets: Vec<String>) -> Self {
        Self { snippets }
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    pub fn snippets(&self) -> &[String] {
        &self.snippets
    }

    /// Renders the snippets as a bulleted block for the context message.
    pub fn as_context_block(&self) -> String {
        self.snippets
            .iter()
            .map(|s| format!("- {s}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub struct WebContextFetcher {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'a str,
    max_results: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    content: Option<String>,
}

impl WebContextFetcher {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .build()
            .map_err(|e| Error::Configuration(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Fetches up to [`MAX_SNIPPETS`] snippets for the query. Results without
    /// extractable text are skipped.
    pub async fn fetch(&self, query: &str) -> Result<WebContext> {
        let body = SearchRequest {
            api_key: &self.api_key,
            query,
            search_depth: "basic",
            max_results: MAX_SNIPPETS,
        };

        let resp = self
            .client
            .post(format!("{}/search", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::UpstreamUnavailable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(Error::UpstreamUnavailable(format!(
                "search provider returned {}",
                resp.status()
            )));
        }

        let parsed: SearchResponse = resp
            .json()
            .await
            .map_err(|e| Error::UpstreamUnavailable(e.to_string()))?;

        let snippets = parsed
            .results
            .into_iter()
            .filter_map(|r| {
                let text = r.content?.trim().to_string();
                if text.is_empty() { None } else { Some(text) }
            })
            .take(MAX_SNIPPETS)
            .collect();

        Ok(WebContext { snippets })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(snippets: &[&str]) -> WebContext {
        WebContext {
            snippets: snippets.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_context_block_is_bulleted() {
        let ctx = context(&["primer dato", "segundo dato"]);
        assert_eq!(ctx.as_context_block(), "- primer dato\n- segundo dato");
    }

    #[test]
    fn test_empty_context() {
        assert!(WebContext::default().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_extracts_snippets_and_skips_empty() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/search")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"results": [
                    {"content": "El plazo del modelo 130 termina el 20 de abril."},
                    {"content": "   "},
                    {"content": null},
                    {"content": "Calendario del contribuyente 2025."}
                ]}"#,
            )
            .create_async()
            .await;

        let fetcher = WebContextFetcher::new(server.url(), "test-key").unwrap();
        let ctx = fetcher.fetch("plazo modelo 130").await.unwrap();
        mock.assert_async().await;
        assert_eq!(ctx.snippets().len(), 2);
        assert!(ctx.snippets()[0].contains("modelo 130"));
    }

    #[tokio::test]
    async fn test_fetch_non_success_is_upstream_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/search")
            .with_status(503)
            .create_async()
            .await;

        let fetcher = WebContextFetcher::new(server.url(), "test-key").unwrap();
        let err = fetcher.fetch("plazo modelo 130").await.unwrap_err();
        assert!(matches!(err, Error::UpstreamUnavailable(_)));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_fetch_caps_snippet_count() {
        let results: Vec<String> = (0..8)
            .map(|i| format!(r#"{{"content": "resultado {i}"}}"#))
            .collect();
        let body = format!(r#"{{"results": [{}]}}"#, results.join(","));

        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/search")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(&body)
            .create_async()
            .await;

        let fetcher = WebContextFetcher::new(server.url(), "test-key").unwrap();
        let ctx = fetcher.fetch("novedades iva 2025").await.unwrap();
        assert_eq!(ctx.snippets().len(), MAX_SNIPPETS);
    }
}
