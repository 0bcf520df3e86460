//! Batch snapshots: scan results persisted as a flat JSON array

use crate::config::read_input_file;
use crate::error::{Error, Result};
use crate::scanner::ScanResult;
use std::fs;
use std::path::Path;

/// Default snapshot file name
pub const DEFAULT_SNAPSHOT_FILE: &str = "data.json";

/// Write `results` to `path`
pub fn save_snapshot(path: &Path, results: &[ScanResult]) -> Result<()> {
    let json = serde_json::to_string(results)?;
    fs::write(path, json).map_err(|source| Error::SnapshotWrite {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Saved {} results to {}", results.len(), path.display());
    Ok(())
}

/// Read a snapshot previously written by [`save_snapshot`]
pub fn load_snapshot(path: &Path) -> Result<Vec<ScanResult>> {
    let json = read_input_file(path)?;
    serde_json::from_str(&json).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::compute_stats;
    use tempfile::TempDir;

    fn results() -> Vec<ScanResult> {
        vec![
            ScanResult {
                domain: "one.com".to_string(),
                plugins: vec!["akismet".to_string(), "jetpack".to_string()],
                themes: vec!["astra".to_string()],
            },
            ScanResult {
                domain: "two.com".to_string(),
                plugins: vec!["akismet".to_string()],
                themes: vec![],
            },
        ]
    }

    #[test]
    fn reloaded_snapshot_gives_same_stats() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_SNAPSHOT_FILE);

        save_snapshot(&path, &results()).unwrap();
        let loaded = load_snapshot(&path).unwrap();

        assert_eq!(loaded, results());
        assert_eq!(compute_stats(&loaded), compute_stats(&results()));
    }

    #[test]
    fn extra_fields_are_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("old.json");
        fs::write(
            &path,
            r#"[{"domain":"one.com","url_names":["/"],"urls":["https://one.com/"],
                 "plugins":["akismet"],"themes":["astra"]}]"#,
        )
        .unwrap();

        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(loaded[0].plugins, vec!["akismet"]);
    }

    #[test]
    fn empty_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.json");

        save_snapshot(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
        assert!(load_snapshot(&path).unwrap().is_empty());
    }

    #[test]
    fn missing_snapshot() {
        let err = load_snapshot(Path::new("/nonexistent/data.json")).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn malformed_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"[{"domain":"one.com"}]"#).unwrap();

        assert!(matches!(load_snapshot(&path), Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn unwritable_path() {
        let err = save_snapshot(Path::new("/nonexistent/dir/data.json"), &results()).unwrap_err();
        assert!(matches!(err, Error::SnapshotWrite { .. }));
    }
}
