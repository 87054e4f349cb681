//! HTTP source used by the crawler
//!
//! Pages are fetched as decoded text, resources as raw bytes. Both go
//! through the [`HttpSource`] trait so the traversal and download stages can
//! be driven by something other than the network.

use crate::config::{FetcherConfig, UserAgentConfig};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors produced by a single GET
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server answered HTTP {status}")]
    Status { status: u16 },

    #[error("resource does not exist")]
    Missing,
}

/// Issues GET requests for pages and resources
///
/// Implementations must tolerate concurrent calls from several download
/// tasks.
#[async_trait]
pub trait HttpSource: Send + Sync {
    /// Fetches a page and decodes its body as text
    async fn get_text(&self, url: &Url) -> Result<String, FetchError>;

    /// Fetches a resource's body without any transformation
    async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}

/// [`HttpSource`] backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct ReqwestSource {
    client: Client,
}

impl ReqwestSource {
    /// Wraps an already configured client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client from configuration
    pub fn from_config(
        user_agent: &UserAgentConfig,
        fetcher: &FetcherConfig,
    ) -> Result<Self, reqwest::Error> {
        build_http_client(user_agent, fetcher).map(Self::new)
    }

    async fn get(&self, url: &Url) -> Result<reqwest::Response, FetchError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl HttpSource for ReqwestSource {
    async fn get_text(&self, url: &Url) -> Result<String, FetchError> {
        let response = self.get(url).await?;
        Ok(response.text().await?)
    }

    async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = self.get(url).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `fetcher` - Timeouts for every request
///
/// # Example
///
/// ```no_run
/// use site_harvest::config::{FetcherConfig, UserAgentConfig};
/// use site_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    fetcher: &FetcherConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(fetcher.request_timeout))
        .connect_timeout(Duration::from_secs(fetcher.connect_timeout))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}
