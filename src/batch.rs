//! Scanning a list of hosts under an error policy

use crate::config::HostEntry;
use crate::error::{Error, Result};
use crate::fetch::Fetcher;
use crate::host::Host;
use crate::scanner::{ScanResult, Scanner};
use crate::validate::{ValidationOutcome, Validator};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// What to do when some hosts fail validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Scan nothing
    #[default]
    Stop,
    /// Skip the invalid hosts and scan the rest
    Force,
}

impl FromStr for ErrorPolicy {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stop" => Ok(Self::Stop),
            "force" => Ok(Self::Force),
            _ => Err(Error::InvalidErrorPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stop => write!(f, "stop"),
            Self::Force => write!(f, "force"),
        }
    }
}

/// Outcome of a batch run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// One result per scanned host, in input order
    pub results: Vec<ScanResult>,
    /// Hosts that failed validation
    pub invalid: Vec<ValidationOutcome>,
    /// True when the `stop` policy prevented any scanning
    pub aborted: bool,
}

impl BatchReport {
    /// Whether every host passed validation
    pub fn all_valid(&self) -> bool {
        self.invalid.is_empty()
    }
}

/// Validates and scans a list of hosts one at a time
#[derive(Debug)]
pub struct BatchRunner<'a, F> {
    fetcher: &'a F,
}

impl<'a, F: Fetcher> BatchRunner<'a, F> {
    /// Create a runner fetching through `fetcher`
    pub fn new(fetcher: &'a F) -> Self {
        Self { fetcher }
    }

    /// Validate every host, then scan according to `policy`.
    ///
    /// The policy only matters when at least one host is invalid.
    pub async fn run(&self, entries: &[HostEntry], policy: ErrorPolicy) -> Result<BatchReport> {
        log::info!("Validating {} hosts...", entries.len());

        let validator = Validator::new(self.fetcher);
        let mut outcomes = Vec::with_capacity(entries.len());
        for entry in entries {
            let outcome = validator.validate_all(&entry.domain).await;
            if !outcome.is_valid() {
                log::warn!("{} contains errors: {}", outcome.domain, outcome.reasons());
            }
            outcomes.push(outcome);
        }

        let invalid: Vec<ValidationOutcome> =
            outcomes.iter().filter(|o| !o.is_valid()).cloned().collect();

        if !invalid.is_empty() && policy == ErrorPolicy::Stop {
            log::warn!(
                "Scanning stopped: {} of {} hosts are invalid",
                invalid.len(),
                entries.len()
            );
            return Ok(BatchReport {
                results: Vec::new(),
                invalid,
                aborted: true,
            });
        }

        let scanner = Scanner::new(self.fetcher);
        let mut results = Vec::new();
        for (entry, outcome) in entries.iter().zip(&outcomes) {
            if !outcome.is_valid() {
                log::info!("Skipping {}", entry.domain);
                continue;
            }
            let host = Host::new(entry.domain.as_str(), &entry.paths)?;
            results.push(scanner.scan(&host).await);
        }

        Ok(BatchReport {
            results,
            invalid,
            aborted: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::mock::MockFetcher;

    fn entry(domain: &str, paths: &[&str]) -> HostEntry {
        HostEntry {
            domain: domain.to_string(),
            paths: paths.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn fetcher() -> MockFetcher {
        MockFetcher::new()
            .page("https://one.com/", "/wp-content/plugins/akismet/ /wp-content/themes/astra/")
            .page("https://one.com/blog/", "/wp-content/plugins/jetpack/")
            .page("https://two.com/", "/wp-content/plugins/akismet/")
    }

    fn mixed_entries() -> Vec<HostEntry> {
        vec![
            entry("one.com", &["blog"]),
            entry("-broken.com", &[]),
            entry("two.com", &[]),
        ]
    }

    #[test]
    fn parse_policy() {
        assert_eq!("stop".parse::<ErrorPolicy>().unwrap(), ErrorPolicy::Stop);
        assert_eq!("FORCE".parse::<ErrorPolicy>().unwrap(), ErrorPolicy::Force);
        assert!("ignore".parse::<ErrorPolicy>().is_err());
        assert_eq!(ErrorPolicy::Force.to_string(), "force");
    }

    #[tokio::test]
    async fn stop_policy_scans_nothing() {
        let fetcher = fetcher();
        let report = BatchRunner::new(&fetcher)
            .run(&mixed_entries(), ErrorPolicy::Stop)
            .await
            .unwrap();

        assert!(report.aborted);
        assert!(report.results.is_empty());
        assert_eq!(report.invalid.len(), 1);
        assert_eq!(report.invalid[0].domain, "-broken.com");
        // only the validation requests went out
        assert!(!fetcher.requests().contains(&"https://one.com/blog/".to_string()));
    }

    #[tokio::test]
    async fn force_policy_scans_valid_hosts() {
        let fetcher = fetcher();
        let report = BatchRunner::new(&fetcher)
            .run(&mixed_entries(), ErrorPolicy::Force)
            .await
            .unwrap();

        assert!(!report.aborted);
        assert_eq!(report.invalid.len(), 1);
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.results[0].domain, "one.com");
        assert_eq!(report.results[0].plugins, vec!["akismet", "jetpack"]);
        assert_eq!(report.results[1].domain, "two.com");
    }

    #[tokio::test]
    async fn clean_batch_ignores_policy() {
        let entries = vec![entry("one.com", &["blog"]), entry("two.com", &[])];

        for policy in [ErrorPolicy::Stop, ErrorPolicy::Force] {
            let fetcher = fetcher();
            let report = BatchRunner::new(&fetcher).run(&entries, policy).await.unwrap();

            assert!(report.all_valid());
            assert!(!report.aborted);
            assert_eq!(report.results.len(), 2);
        }
    }

    #[tokio::test]
    async fn non_wordpress_host_is_invalid() {
        let fetcher = fetcher().page("https://static.com/", "<html>hello</html>");
        let entries = vec![entry("static.com", &[]), entry("two.com", &[])];
        let report = BatchRunner::new(&fetcher)
            .run(&entries, ErrorPolicy::Force)
            .await
            .unwrap();

        assert_eq!(report.invalid[0].reasons(), "not WordPress");
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].domain, "two.com");
    }

    #[tokio::test]
    async fn empty_batch() {
        let fetcher = MockFetcher::new();
        let report = BatchRunner::new(&fetcher).run(&[], ErrorPolicy::Stop).await.unwrap();

        assert!(report.results.is_empty());
        assert!(!report.aborted);
    }
}
