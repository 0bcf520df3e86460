//! WP Info Scan - WordPress plugin and theme fingerprinting
//!
//! Fetches public pages of WordPress sites, extracts the plugins and themes
//! referenced under `wp-content`, and ranks them across many sites.
//!
//! # Example
//!
//! ```no_run
//! use wp_info_scan::{BatchRunner, ErrorPolicy, HttpFetcher, compute_stats, load_config};
//!
//! #[tokio::main]
//! async fn main() -> wp_info_scan::Result<()> {
//!     let config = load_config(std::path::Path::new("conf.json"))?;
//!     let fetcher = HttpFetcher::new()?;
//!     let report = BatchRunner::new(&fetcher)
//!         .run(&config.hosts, ErrorPolicy::Force)
//!         .await?;
//!     let stats = compute_stats(&report.results);
//!     for row in &stats.plugins.rows {
//!         println!("{} {} {:.2}%", row.name, row.count, row.percentage);
//!     }
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod host;
pub mod output;
pub mod scanner;
pub mod snapshot;
pub mod stats;
pub mod validate;

pub use batch::{BatchReport, BatchRunner, ErrorPolicy};
pub use config::{HostEntry, HostsConfig, load_config};
pub use error::{Error, Result};
pub use extract::{Fingerprints, extract};
pub use fetch::{Fetcher, HttpFetcher, HttpFetcherBuilder, Page};
pub use host::{Host, plan_urls};
pub use output::{OutputFormat, Summary, output_summary};
pub use scanner::{ScanResult, Scanner};
pub use snapshot::{load_snapshot, save_snapshot};
pub use stats::{ComponentKind, FrequencyRow, FrequencyTable, Statistics, compute_stats};
pub use validate::{ValidationIssue, ValidationOutcome, Validator, is_valid_domain_name};
