//! HTTP fetcher implementation
//!
//! This module handles the HTTP side of the crawl:
//! - Building the HTTP client with the configured user agent
//! - GET requests for listing pages
//! - Classifying failures so the coordinator can log and move on

use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Result of a listing-page fetch
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value
        content_type: String,
        /// Page body content
        body: String,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success { .. })
    }
}

/// Builds an HTTP client with proper configuration
///
/// The same client is shared by page and image requests.
///
/// # Arguments
///
/// * `user_agent` - The User-Agent header sent with every request
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use doc_harvest::config::CrawlerConfig;
/// use doc_harvest::crawler::build_http_client;
///
/// let config = CrawlerConfig::default();
/// let client = build_http_client(&config.user_agent).unwrap();
/// ```
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one listing page
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with text/html | Success |
/// | 2xx with other Content-Type | ContentMismatch |
/// | Non-2xx status | HttpError |
/// | Timeout, connect or body error | NetworkError |
///
/// No retries are attempted.
pub async fn fetch_page(client: &Client, url: &Url) -> FetchResult {
    let response = match client.get(url.as_str()).send().await {
        Ok(response) => response,
        Err(e) => return classify_network_error(&e),
    };

    let status = response.status();
    let final_url = response.url().clone();

    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.contains("text/html") {
        return FetchResult::ContentMismatch { content_type };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            content_type,
            body,
        },
        Err(e) => classify_network_error(&e),
    }
}

fn classify_network_error(e: &reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else if e.is_redirect() {
        format!("Redirect error: {}", e)
    } else {
        e.to_string()
    };

    FetchResult::NetworkError { error }
}
