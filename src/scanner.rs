//! WordPress site scanner
//!
//! Fetches every planned URL of a host and collects the plugins and themes
//! referenced in the returned markup.

use crate::extract::{Fingerprints, extract};
use crate::fetch::{Fetcher, Page};
use crate::host::Host;
use serde::{Deserialize, Serialize};

/// Plugins and themes found on one host. Also the record stored in snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Scanned domain
    pub domain: String,
    /// Distinct plugin identifiers in first-seen order
    pub plugins: Vec<String>,
    /// Distinct theme identifiers in first-seen order
    pub themes: Vec<String>,
}

impl ScanResult {
    /// Build a result from extracted fingerprints
    pub fn new(domain: impl Into<String>, fingerprints: Fingerprints) -> Self {
        let (plugins, themes) = fingerprints.into_parts();
        Self {
            domain: domain.into(),
            plugins,
            themes,
        }
    }

    /// Whether `plugin` was found on this host
    pub fn has_plugin(&self, plugin: &str) -> bool {
        self.plugins.iter().any(|p| p == plugin)
    }

    /// Whether `theme` was found on this host
    pub fn has_theme(&self, theme: &str) -> bool {
        self.themes.iter().any(|t| t == theme)
    }
}

/// WordPress scanner
#[derive(Debug)]
pub struct Scanner<'a, F> {
    fetcher: &'a F,
}

impl<'a, F: Fetcher> Scanner<'a, F> {
    /// Create a scanner fetching through `fetcher`
    pub fn new(fetcher: &'a F) -> Self {
        Self { fetcher }
    }

    /// Scan every URL of `host` in order.
    ///
    /// Failed requests and non-2xx responses are logged and skipped; the
    /// result only holds what the successful pages revealed.
    pub async fn scan(&self, host: &Host) -> ScanResult {
        log::info!("Analyzing domain: {}", host.domain());

        let mut fingerprints = Fingerprints::default();
        for url in host.urls() {
            let body = self
                .fetcher
                .fetch(url)
                .await
                .and_then(Page::into_success_body);

            match body {
                Ok(body) => {
                    log::info!("Request parsed: {}", url);
                    fingerprints.merge(extract(&body));
                }
                Err(e) => log::warn!("Request error: {} ({})", url, e),
            }
        }

        let result = ScanResult::new(host.domain(), fingerprints);
        log::info!(
            "{}: {} plugins, {} themes",
            result.domain,
            result.plugins.len(),
            result.themes.len()
        );
        result
    }
}
