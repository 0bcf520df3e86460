//! Page fetching
//!
//! All network access goes through the [`Fetcher`] trait so validation and
//! scanning can run against any source of pages.

use crate::error::{Error, Result};
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, HeaderMap, HeaderValue};
use std::future::Future;
use std::time::Duration;
use url::Url;

/// User agent for requests (standard Chrome on Windows)
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

const ACCEPT_VALUE: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.9,es;q=0.8";

/// Request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Pause after every request, in milliseconds
pub const DEFAULT_DELAY_MS: u64 = 1000;

/// A fetched page. Any HTTP status counts as a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Requested URL
    pub url: Url,
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: String,
}

impl Page {
    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body of a 2xx response, or [`Error::HttpStatus`] otherwise
    pub fn into_success_body(self) -> Result<String> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(Error::HttpStatus(self.status))
        }
    }
}

/// Source of pages.
///
/// `Err` means no response was obtained at all (DNS, TLS, timeout...).
/// Error status codes come back as `Ok` pages.
pub trait Fetcher {
    /// Fetch a single URL
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<Page>> + Send;
}

/// Fetcher backed by `reqwest` with browser-like headers and a fixed delay
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    delay: Duration,
}

/// Builder for configuring an HttpFetcher with options
#[derive(Debug, Clone)]
pub struct HttpFetcherBuilder {
    user_agent: String,
    timeout: Duration,
    delay: Duration,
}

impl Default for HttpFetcherBuilder {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
        }
    }
}

impl HttpFetcherBuilder {
    /// Create a builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Politeness delay applied after every request
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Build the HttpFetcher with the configured options
    pub fn build(self) -> Result<HttpFetcher> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let client = Client::builder()
            .user_agent(self.user_agent)
            .default_headers(headers)
            .timeout(self.timeout)
            .danger_accept_invalid_certs(false)
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;

        Ok(HttpFetcher {
            client,
            delay: self.delay,
        })
    }
}

impl HttpFetcher {
    /// Create a fetcher with default settings.
    ///
    /// For more options, use [`HttpFetcher::builder()`].
    pub fn new() -> Result<Self> {
        HttpFetcherBuilder::new().build()
    }

    /// Create a builder for configuring fetcher options
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use wp_info_scan::HttpFetcher;
    ///
    /// let fetcher = HttpFetcher::builder()
    ///     .delay(Duration::from_millis(500))
    ///     .build()?;
    /// # Ok::<(), wp_info_scan::Error>(())
    /// ```
    pub fn builder() -> HttpFetcherBuilder {
        HttpFetcherBuilder::new()
    }

    async fn request(&self, url: &Url) -> Result<Page> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| Error::HttpRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::HttpRequest(e.to_string()))?;

        Ok(Page {
            url: url.clone(),
            status,
            body,
        })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Page> {
        log::debug!("GET {}", url);
        let result = self.request(url).await;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        result
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, headers, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> HttpFetcher {
        HttpFetcher::builder()
            .delay(Duration::ZERO)
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn fetch_returns_body_and_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>hello</html>"))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/", server.uri())).unwrap();
        let page = fetcher().fetch(&url).await.unwrap();

        assert_eq!(page.status, 200);
        assert!(page.is_success());
        assert_eq!(page.body, "<html>hello</html>");
    }

    #[tokio::test]
    async fn error_status_is_still_a_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing/"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/missing/", server.uri())).unwrap();
        let page = fetcher().fetch(&url).await.unwrap();

        assert_eq!(page.status, 404);
        assert!(!page.is_success());
        assert_eq!(page.body, "not here");
        assert!(matches!(page.into_success_body(), Err(Error::HttpStatus(404))));
    }

    // wiremock compares comma separated header values item by item
    fn split_values(value: &str) -> Vec<&str> {
        value.split(',').map(str::trim).collect()
    }

    #[tokio::test]
    async fn sends_browser_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(headers("user-agent", split_values(USER_AGENT)))
            .and(headers("accept-language", split_values(ACCEPT_LANGUAGE_VALUE)))
            .and(header("cache-control", "no-cache"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/", server.uri())).unwrap();
        let page = fetcher().fetch(&url).await.unwrap();

        assert_eq!(page.status, 200);
    }

    #[tokio::test]
    async fn custom_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "wp-info-scan-test"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::builder()
            .user_agent("wp-info-scan-test")
            .delay(Duration::ZERO)
            .build()
            .unwrap();
        let url = Url::parse(&format!("{}/", server.uri())).unwrap();

        assert_eq!(fetcher.fetch(&url).await.unwrap().status, 200);
    }

    #[tokio::test]
    async fn transport_failure_is_an_error() {
        // Nothing listens on port 9 locally
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        let result = fetcher().fetch(&url).await;

        assert!(matches!(result, Err(Error::HttpRequest(_))));
    }

    #[test]
    fn success_range() {
        let url = Url::parse("https://example.com/").unwrap();
        let page = |status| Page {
            url: url.clone(),
            status,
            body: String::new(),
        };

        assert!(page(200).is_success());
        assert!(page(204).is_success());
        assert!(!page(301).is_success());
        assert!(!page(500).is_success());
    }
}
