// src/fetch/http.rs
// =============================================================================
// The real page fetcher, built on reqwest.
//
// Key functionality:
// - One shared HTTP client (connection pooling) for the whole run
// - A timeout on every request: nothing can block the analysis forever
// - Browser-like headers: some public websites refuse unknown user agents
// - Non-2xx answers and network failures become a FetchError, which the
//   analysis records instead of aborting
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, REFERER, USER_AGENT};
use reqwest::Client;
use url::Url;

use super::{FetchedPage, Fetcher};
use crate::error::FetchError;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                                  (KHTML, like Gecko) Chrome/74.0.3729.169 Safari/537.36";
const DEFAULT_REFERER: &str = "https://www.google.com/";

/// HTTP settings of the fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Timeout of one request, connection included
    pub timeout: Duration,
    pub user_agent: String,
    pub referer: String,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            max_redirects: 5,
        }
    }
}

/// Fetcher doing real HTTP GET requests.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    // Client is cheap to clone (it's a reference counter internally)
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&config.user_agent) {
            headers.insert(USER_AGENT, value);
        }
        if let Ok(value) = HeaderValue::from_str(&config.referer) {
            headers.insert(REFERER, value);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        tracing::debug!(url = %url, "fetching page");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        // Keep the URL after redirects: relative links are relative to it
        let final_url = response.url().clone();
        let body = response.text().await.map_err(categorize_error)?;

        Ok(FetchedPage {
            url: final_url,
            body,
        })
    }
}

// Sorts reqwest errors into the cases a report reader cares about
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_redirect() {
        FetchError::TooManyRedirects
    } else if error.is_connect() {
        FetchError::Connect(error.to_string())
    } else if error.is_builder() {
        FetchError::InvalidUrl(error.url().map_or_else(String::new, Url::to_string))
    } else {
        FetchError::Other(error.to_string())
    }
}
