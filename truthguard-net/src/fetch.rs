//! Page fetching
//!
//! Downloads a URL and reduces the HTML to its visible body text.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{create_client, HttpConfig, NetError};

static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").unwrap());

/// Errors fetching page content
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch URL content: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to fetch URL content: {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error(transparent)]
    Net(#[from] NetError),
}

/// Source of page text for URL analysis
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch a URL and return its body text
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetcher backed by a reqwest client
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: create_client(config)?,
        })
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!("Fetching: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Fetch of {} returned status: {}", url, status);
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response.text().await?;
        let text = extract_text(&html);
        debug!("Fetched {} chars from {}", text.len(), url);
        Ok(text)
    }
}

/// Body text of an HTML document, with script/style/noscript removed and
/// whitespace collapsed
pub fn extract_text(html: &str) -> String {
    use scraper::node::Node;

    let document = Html::parse_document(html);

    match document.select(&BODY_SELECTOR).next() {
        Some(body) => {
            let mut parts = Vec::new();
            for node_ref in body.descendants() {
                if let Node::Text(text_node) = node_ref.value() {
                    let excluded = node_ref.ancestors().any(|ancestor| {
                        ancestor
                            .value()
                            .as_element()
                            .map(|el| matches!(el.name(), "script" | "style" | "noscript"))
                            .unwrap_or(false)
                    });
                    if !excluded {
                        parts.push(&**text_node);
                    }
                }
            }
            // Adjacent text nodes are concatenated, so collapse afterwards.
            normalize_whitespace(&parts.concat())
        }
        None => String::new(),
    }
}

/// Collapse runs of whitespace to single spaces and trim
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
