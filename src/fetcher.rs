/*!
 * Page retrieval.
 *
 * `PageFetcher` is the seam between the orchestration and the network: the
 * controller only ever asks for the text of a URL. `HttpFetcher` is the
 * production implementation on top of reqwest; it also serves `file://` URLs
 * from disk so a saved copy of the wiki can be parsed offline.
 */

use async_trait::async_trait;
use log::{debug, trace};
use reqwest::Client;
use std::fmt::Debug;
use std::time::Duration;
use url::Url;

use crate::app_config::FetchConfig;
use crate::errors::FetchError;

/// Anything that can turn a URL into page text
#[async_trait]
pub trait PageFetcher: Send + Sync + Debug {
    /// Retrieve the full text of the page at `url`
    ///
    /// # Arguments
    /// * `url` - Absolute page URL
    ///
    /// # Returns
    /// * `Result<String, FetchError>` - The page body, or why it could not be retrieved
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// reqwest-backed fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    /// HTTP client for making requests
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher from the fetch settings
    pub fn new(config: &FetchConfig) -> Self {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self { client }
    }

    async fn fetch_remote(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status_code: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        trace!("Received {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(&FetchConfig::default())
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        debug!("Fetching {}", url);

        if url.scheme() == "file" {
            return fetch_file(url).await;
        }

        self.fetch_remote(url).await
    }
}

async fn fetch_file(url: &Url) -> Result<String, FetchError> {
    let path = url.to_file_path().map_err(|_| FetchError::File {
        path: url.to_string(),
        message: "not a local file path".to_string(),
    })?;

    tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| FetchError::File {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}
