//! Output formatting for scan results and statistics

use crate::error::{Error, Result};
use crate::scanner::ScanResult;
use crate::stats::{FrequencyTable, Statistics};
use crate::validate::ValidationOutcome;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, presets::UTF8_FULL,
};
use serde::Serialize;
use std::io::Write;
use std::str::FromStr;

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable table output
    #[default]
    Human,
    /// JSON output
    Json,
    /// No output (silent mode)
    None,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "none" => Ok(Self::None),
            _ => Err(Error::InvalidOutputFormat(s.to_string())),
        }
    }
}

/// Everything a run produced, ready for rendering
#[derive(Debug, Clone, Serialize)]
pub struct Summary<'a> {
    /// Hosts that failed validation
    pub invalid: &'a [ValidationOutcome],
    /// True when invalid hosts stopped the run before scanning
    pub aborted: bool,
    /// Per-host findings
    pub results: &'a [ScanResult],
    /// Batch statistics, if computed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<&'a Statistics>,
}

/// Output the summary of a run
pub fn output_summary<W: Write>(
    summary: &Summary<'_>,
    format: OutputFormat,
    writer: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Human => output_human(summary, writer),
        OutputFormat::Json => output_json(summary, writer),
        OutputFormat::None => Ok(()),
    }
}

/// Output JSON format
fn output_json<W: Write>(summary: &Summary<'_>, writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer).map_err(Error::OutputFailed)?;
    Ok(())
}

/// Output human-readable table format
fn output_human<W: Write>(summary: &Summary<'_>, writer: &mut W) -> Result<()> {
    if !summary.invalid.is_empty() {
        write_invalid_hosts(summary.invalid, writer)?;
        if summary.aborted {
            writeln!(
                writer,
                "Scanning stopped due to errors. Use the [-e force] option to bypass errors or fix your configuration file."
            )
            .map_err(Error::OutputFailed)?;
        }
    }

    for result in summary.results {
        write_scan_result(result, writer)?;
    }

    if let Some(stats) = summary.statistics {
        write_frequency_table(&stats.plugins, "Plugins", writer)?;
        write_frequency_table(&stats.themes, "Themes", writer)?;
    }

    Ok(())
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Invalid domains and why
fn write_invalid_hosts<W: Write>(invalid: &[ValidationOutcome], writer: &mut W) -> Result<()> {
    writeln!(writer, "Invalid or inaccessible domain names:")
        .map_err(Error::OutputFailed)?;

    let mut table = new_table();
    table.set_header(vec![header_cell("Domain"), header_cell("Errors")]);
    for outcome in invalid {
        table.add_row(vec![
            Cell::new(&outcome.domain).fg(Color::Yellow),
            Cell::new(outcome.reasons()).fg(Color::Red),
        ]);
    }

    writeln!(writer, "{}", table).map_err(Error::OutputFailed)
}

/// Plugins and themes of a single host
fn write_scan_result<W: Write>(result: &ScanResult, writer: &mut W) -> Result<()> {
    writeln!(
        writer,
        "{} ({} plugins, {} themes)",
        result.domain,
        result.plugins.len(),
        result.themes.len()
    )
    .map_err(Error::OutputFailed)?;

    let mut table = new_table();
    table.set_header(vec![header_cell("Type"), header_cell("Name")]);
    add_component_rows(&mut table, "Plugin", &result.plugins, "no plugins found");
    add_component_rows(&mut table, "Theme", &result.themes, "no themes found");

    writeln!(writer, "{}", table).map_err(Error::OutputFailed)
}

fn add_component_rows(table: &mut Table, kind: &str, names: &[String], empty: &str) {
    if names.is_empty() {
        table.add_row(vec![Cell::new(kind), Cell::new(empty).fg(Color::DarkGrey)]);
        return;
    }
    for name in names {
        table.add_row(vec![Cell::new(kind), Cell::new(name)]);
    }
}

/// Ranked usage table with its header row
fn write_frequency_table<W: Write>(
    table_data: &FrequencyTable,
    label: &str,
    writer: &mut W,
) -> Result<()> {
    writeln!(
        writer,
        "{} stats for: ({} domains)",
        label, table_data.host_count
    )
    .map_err(Error::OutputFailed)?;

    let mut table = new_table();
    table.set_header(table_data.header().iter().map(|h| header_cell(h)).collect::<Vec<_>>());
    for row in &table_data.rows {
        table.add_row(vec![
            Cell::new(&row.name),
            Cell::new(row.count).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", row.percentage))
                .fg(Color::Green)
                .set_alignment(CellAlignment::Right),
        ]);
    }

    writeln!(writer, "{}", table).map_err(Error::OutputFailed)
}
