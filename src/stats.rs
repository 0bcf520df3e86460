//! Frequency statistics over a batch of scan results

use crate::scanner::ScanResult;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Component category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// Plugin
    Plugin,
    /// Theme
    Theme,
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plugin => write!(f, "Plugin"),
            Self::Theme => write!(f, "Theme"),
        }
    }
}

/// How many hosts use one component
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyRow {
    /// Component identifier
    pub name: String,
    /// Hosts containing it
    pub count: usize,
    /// `count * 100 / host_count`, rounded to 2 decimals
    pub percentage: f64,
}

/// Ranked component usage for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyTable {
    /// Category counted
    pub kind: ComponentKind,
    /// Number of hosts the percentages refer to
    pub host_count: usize,
    /// Rows by percentage, highest first. Ties keep first-seen order.
    pub rows: Vec<FrequencyRow>,
}

impl FrequencyTable {
    /// Count how many results contain each identifier of `kind`
    pub fn compute(kind: ComponentKind, results: &[ScanResult]) -> Self {
        let host_count = results.len();
        let mut order: Vec<&str> = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();

        for result in results {
            let names = match kind {
                ComponentKind::Plugin => &result.plugins,
                ComponentKind::Theme => &result.themes,
            };
            // a host counts once even if a hand-edited snapshot repeats a name
            let mut unique: HashSet<&str> = names.iter().map(String::as_str).collect();
            for name in names.iter().map(String::as_str) {
                if !unique.remove(name) {
                    continue;
                }
                let count = counts.entry(name).or_insert_with(|| {
                    order.push(name);
                    0
                });
                *count += 1;
            }
        }

        let mut rows: Vec<FrequencyRow> = order
            .into_iter()
            .map(|name| {
                let count = counts[name];
                FrequencyRow {
                    name: name.to_string(),
                    count,
                    percentage: percentage(count, host_count),
                }
            })
            .collect();

        // stable: equal percentages stay in first-seen order
        rows.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));

        Self {
            kind,
            host_count,
            rows,
        }
    }

    /// Header row for rendering: category, total, percent
    pub fn header(&self) -> [String; 3] {
        [self.kind.to_string(), "Total".to_string(), "%".to_string()]
    }

    /// No component of this kind was found
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for a given identifier
    pub fn get(&self, name: &str) -> Option<&FrequencyRow> {
        self.rows.iter().find(|r| r.name == name)
    }
}

/// Plugin and theme tables for a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    /// Number of hosts in the batch
    pub host_count: usize,
    /// Plugin usage
    pub plugins: FrequencyTable,
    /// Theme usage
    pub themes: FrequencyTable,
}

/// Compute plugin and theme statistics from scan results.
///
/// Works the same on fresh results and on a reloaded snapshot.
pub fn compute_stats(results: &[ScanResult]) -> Statistics {
    Statistics {
        host_count: results.len(),
        plugins: FrequencyTable::compute(ComponentKind::Plugin, results),
        themes: FrequencyTable::compute(ComponentKind::Theme, results),
    }
}

fn percentage(count: usize, host_count: usize) -> f64 {
    if host_count == 0 {
        return 0.0;
    }
    let raw = count as f64 * 100.0 / host_count as f64;
    (raw * 100.0).round_ties_even() / 100.0
}
