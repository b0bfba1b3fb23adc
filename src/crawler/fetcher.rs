//! HTTP page fetcher
//!
//! This module handles page retrieval for the crawler, including:
//! - Building the shared HTTP client from `[http]` configuration
//! - GET requests to fetch page content
//! - Content-Type screening so only HTML gets parsed
//! - Error classification for logging

use crate::config::HttpConfig;
use crate::{ConfigError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Upper bound for establishing a connection, independent of the request timeout
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Result of a fetch operation
///
/// Any HTTP status counts as a response; only transport failures are errors.
#[derive(Debug)]
pub enum FetchResult {
    /// Received an HTML (or untyped) response
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Received a response that is not HTML
    ContentMismatch {
        /// HTTP status code
        status_code: u16,
        /// The actual Content-Type received
        content_type: String,
    },

    /// Network error (connection refused, timeout, DNS, TLS, redirect limit)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Retrieves page bodies
///
/// Implemented over HTTP by [`HttpFetcher`]; tests substitute in-memory sites.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> FetchResult;
}

/// Builds an HTTP client with proper configuration
///
/// The same client is shared by page fetches and link probes so connections
/// are pooled across both.
///
/// # Arguments
///
/// * `config` - The `[http]` configuration section
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(CrawlError)` - Invalid header value or client construction failure
///
/// # Example
///
/// ```no_run
/// use dead_link_checker::config::HttpConfig;
/// use dead_link_checker::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client> {
    let accept = HeaderValue::from_str(&config.accept)
        .map_err(|e| ConfigError::Validation(format!("invalid accept header: {}", e)))?;

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, accept);

    let timeout = Duration::from_secs(config.timeout_secs);
    let connect_timeout = Duration::from_secs(CONNECT_TIMEOUT_SECS.min(config.timeout_secs));

    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(connect_timeout)
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Page fetcher backed by a `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> FetchResult {
        fetch_url(&self.client, url).await
    }
}

/// Fetches a URL and classifies the response
///
/// Error pages (4xx/5xx) are still returned as `Success` when they carry
/// HTML, since their links are as real as any other page's.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            return FetchResult::NetworkError {
                error: describe_error(&e),
            }
        }
    };

    let status_code = response.status().as_u16();
    let final_url = response.url().to_string();

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_html_content_type(&content_type) {
        return FetchResult::ContentMismatch {
            status_code,
            content_type,
        };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code,
            body,
        },
        Err(e) => FetchResult::NetworkError {
            error: describe_error(&e),
        },
    }
}

/// Returns true if a Content-Type value may carry parseable HTML
///
/// A missing header is treated as HTML.
pub fn is_html_content_type(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.is_empty()
        || content_type.contains("text/html")
        || content_type.contains("application/xhtml+xml")
}

/// Turns a transport error into a short description
pub(crate) fn describe_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_redirect() {
        "Too many redirects".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else {
        error.to_string()
    }
}
