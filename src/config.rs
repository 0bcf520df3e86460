//! Host list configuration file
//!
//! ```json
//! { "hosts": [ { "domain": "example.com", "paths": ["blog", "shop"] } ] }
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Parsed host list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostsConfig {
    /// Hosts to scan, in order
    pub hosts: Vec<HostEntry>,
}

/// One host of the configuration file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostEntry {
    /// Domain name to scan
    pub domain: String,
    /// Relative paths to probe besides the root
    pub paths: Vec<String>,
}

impl HostsConfig {
    /// Parse a configuration from JSON text
    pub fn from_json(path: &Path, json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Read a file that must exist, mapping failures to configuration errors
pub(crate) fn read_input_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::ConfigNotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the host list at `path`
pub fn load_config(path: &Path) -> Result<HostsConfig> {
    log::info!("Loading config: {}", path.display());
    let json = read_input_file(path)?;
    let config = HostsConfig::from_json(path, &json)?;
    log::info!("Loaded {} hosts from {}", config.hosts.len(), path.display());
    Ok(config)
}
