//! Host validation
//!
//! A host is valid when its name is a well-formed domain, its root page
//! answers, and that page references the `wp-content` directory.

use crate::fetch::Fetcher;
use crate::host::root_url;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;
use url::Url;

/// Labels of 1-63 alphanumerics/hyphens not starting or ending with a hyphen,
/// at least one dot, alphabetic top-level label of 2-6 characters
static DOMAIN_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,6}$").unwrap()
});

/// `wp-content/` or the JSON-escaped `wp-content\/`
static WP_SIGNATURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"wp-content(?:\\/|/)").unwrap());

/// Reason a host failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationIssue {
    /// Domain name is not well formed
    InvalidName,
    /// No response from `https://<domain>/`
    Offline,
    /// Root page does not look like a WordPress site
    NotWordpress,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidName => write!(f, "invalid"),
            Self::Offline => write!(f, "offline"),
            Self::NotWordpress => write!(f, "not WordPress"),
        }
    }
}

/// Validation result for one domain. Valid iff `issues` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    /// Domain that was checked
    pub domain: String,
    /// Problems found
    pub issues: BTreeSet<ValidationIssue>,
}

impl ValidationOutcome {
    fn new(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            issues: BTreeSet::new(),
        }
    }

    fn with_issue(mut self, issue: ValidationIssue) -> Self {
        self.issues.insert(issue);
        self
    }

    /// Whether every check passed
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues joined for display, e.g. `invalid, offline`
    pub fn reasons(&self) -> String {
        self.issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Check a domain against the conventional hostname grammar
pub fn is_valid_domain_name(domain: &str) -> bool {
    DOMAIN_NAME_RE.is_match(domain)
}

/// Check whether markup references the WordPress content directory
pub fn has_wordpress_signature(markup: &str) -> bool {
    WP_SIGNATURE_RE.is_match(markup)
}

/// Runs the name, reachability and WordPress checks for domains
#[derive(Debug)]
pub struct Validator<'a, F> {
    fetcher: &'a F,
}

impl<'a, F: Fetcher> Validator<'a, F> {
    /// Create a validator fetching through `fetcher`
    pub fn new(fetcher: &'a F) -> Self {
        Self { fetcher }
    }

    /// Run every check and collect all problems (used for batches).
    ///
    /// The signature check needs the root page, so an offline host cannot
    /// also be reported as not WordPress.
    pub async fn validate_all(&self, domain: &str) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::new(domain);

        if !is_valid_domain_name(domain) {
            outcome.issues.insert(ValidationIssue::InvalidName);
        }

        // Unparsable names were never requested, so they are not offline
        let Some(url) = root_url_or_log(domain) else {
            return outcome;
        };

        match self.homepage(&url).await {
            Some(body) if !has_wordpress_signature(&body) => {
                outcome.issues.insert(ValidationIssue::NotWordpress);
            }
            Some(_) => {}
            None => {
                outcome.issues.insert(ValidationIssue::Offline);
            }
        }

        outcome
    }

    /// Stop at the first failing check (used for a single ad-hoc domain)
    pub async fn validate_first(&self, domain: &str) -> ValidationOutcome {
        let outcome = ValidationOutcome::new(domain);

        if !is_valid_domain_name(domain) {
            return outcome.with_issue(ValidationIssue::InvalidName);
        }

        let Some(url) = root_url_or_log(domain) else {
            return outcome.with_issue(ValidationIssue::InvalidName);
        };

        match self.homepage(&url).await {
            None => outcome.with_issue(ValidationIssue::Offline),
            Some(body) if !has_wordpress_signature(&body) => {
                outcome.with_issue(ValidationIssue::NotWordpress)
            }
            Some(_) => outcome,
        }
    }

    /// Body of the root page whatever its status, `None` if unreachable
    async fn homepage(&self, url: &Url) -> Option<String> {
        match self.fetcher.fetch(url).await {
            Ok(page) => Some(page.body),
            Err(e) => {
                log::debug!("{} unreachable: {}", url, e);
                None
            }
        }
    }
}

fn root_url_or_log(domain: &str) -> Option<Url> {
    match root_url(domain) {
        Ok(url) => Some(url),
        Err(e) => {
            log::warn!("{}: cannot build root URL ({}), reachability not checked", domain, e);
            None
        }
    }
}
