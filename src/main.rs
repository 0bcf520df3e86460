//! WP Info Scan CLI - fingerprint WordPress plugins and themes across sites

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use wp_info_scan::{
    BatchRunner, ErrorPolicy, Host, HttpFetcher, ScanResult, Scanner, Validator, compute_stats,
    fetch::{DEFAULT_DELAY_MS, DEFAULT_TIMEOUT_SECS},
    load_config, load_snapshot,
    output::{OutputFormat, Summary, output_summary},
    save_snapshot,
    snapshot::DEFAULT_SNAPSHOT_FILE,
};

/// Scan any WordPress powered website and try to identify installed plugins and themes
#[derive(Parser, Debug)]
#[command(name = "wp-info-scan")]
#[command(version, about, long_about = None)]
struct Args {
    /// default: scan one domain; custom: scan a host list file; stats: show stats of a saved scan
    #[arg(short = 'c', long = "config", value_enum)]
    mode: ModeArg,

    /// Domain name to scan (default mode)
    #[arg(short = 'd', long = "domain", required_if_eq("mode", "default"))]
    domain: Option<String>,

    /// Comma separated list of paths to scan besides the root (default mode)
    #[arg(
        short = 'u',
        long = "urls",
        value_delimiter = ',',
        required_if_eq("mode", "default")
    )]
    urls: Vec<String>,

    /// Host list (custom mode) or saved scan (stats mode)
    #[arg(
        short = 'f',
        long = "file",
        required_if_eq_any([("mode", "custom"), ("mode", "stats")])
    )]
    file: Option<PathBuf>,

    /// What to do if some hosts are invalid
    #[arg(short = 'e', long = "errors", default_value = "stop", value_enum)]
    errors: ErrorPolicyArg,

    /// Save scan results
    #[arg(short = 'o', long = "output", value_enum)]
    output: Option<SaveArg>,

    /// Where to save scan results
    #[arg(long = "snapshot", default_value = DEFAULT_SNAPSHOT_FILE)]
    snapshot: PathBuf,

    /// Report format on stdout
    #[arg(long = "format", default_value = "human", value_enum)]
    format: OutputFormatArg,

    /// Pause after every request, in milliseconds
    #[arg(long = "delay-ms", default_value_t = DEFAULT_DELAY_MS)]
    delay_ms: u64,

    /// Request timeout in seconds
    #[arg(long = "timeout", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Show debug logs
    #[arg(short = 'v', long = "verbose", conflicts_with = "quiet")]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

/// Run mode argument
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Default,
    Custom,
    Stats,
}

/// Error policy argument
#[derive(Clone, Copy, Debug, ValueEnum)]
enum ErrorPolicyArg {
    /// Scan nothing if any host is invalid
    Stop,
    /// Skip invalid hosts
    Force,
}

impl From<ErrorPolicyArg> for ErrorPolicy {
    fn from(arg: ErrorPolicyArg) -> Self {
        match arg {
            ErrorPolicyArg::Stop => ErrorPolicy::Stop,
            ErrorPolicyArg::Force => ErrorPolicy::Force,
        }
    }
}

/// Save target argument
#[derive(Clone, Copy, Debug, ValueEnum)]
enum SaveArg {
    Json,
}

/// Output format argument
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormatArg {
    Human,
    Json,
    None,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::None => OutputFormat::None,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(&args);

    // Print banner for human output
    if matches!(args.format, OutputFormatArg::Human) {
        print_banner();
    }

    let result = match args.mode {
        ModeArg::Default => run_default(&args).await,
        ModeArg::Custom => run_custom(&args).await,
        ModeArg::Stats => run_stats(&args),
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logger(args: &Args) {
    let mut builder = env_logger::Builder::from_default_env();

    // RUST_LOG applies unless -v/-q asks for a level
    let rust_log_set = std::env::var_os("RUST_LOG").is_some();
    if let Some(level) = log_level(args.verbose, args.quiet, rust_log_set) {
        builder.filter_level(level);
    }
    builder
        .filter_module("reqwest", LevelFilter::Info)
        .filter_module("hyper", LevelFilter::Info)
        .format_timestamp(None)
        .format_target(false);
    // Ignore a logger installed earlier
    let _ = builder.try_init();
}

/// Level forced on top of `RUST_LOG`, if any
fn log_level(verbose: bool, quiet: bool, rust_log_set: bool) -> Option<LevelFilter> {
    if verbose {
        Some(LevelFilter::Debug)
    } else if quiet {
        Some(LevelFilter::Warn)
    } else if rust_log_set {
        None
    } else {
        Some(LevelFilter::Info)
    }
}

fn fetcher(args: &Args) -> wp_info_scan::Result<HttpFetcher> {
    HttpFetcher::builder()
        .delay(Duration::from_millis(args.delay_ms))
        .timeout(Duration::from_secs(args.timeout))
        .build()
}

/// Scan a single domain given on the command line
async fn run_default(args: &Args) -> wp_info_scan::Result<()> {
    let domain = args.domain.as_deref().unwrap_or_default();
    log::info!("Starting a 'default' scan of {}", domain);

    let fetcher = fetcher(args)?;
    let outcome = Validator::new(&fetcher).validate_first(domain).await;
    if !outcome.is_valid() {
        let invalid = [outcome];
        return report(args, &invalid, false, &[]);
    }

    let host = Host::new(domain, &args.urls)?;
    let result = Scanner::new(&fetcher).scan(&host).await;
    report(args, &[], false, &[result])
}

/// Scan every host of a configuration file
async fn run_custom(args: &Args) -> wp_info_scan::Result<()> {
    log::info!("Starting a 'custom' scan");
    let config = load_config(input_file(args))?;

    let fetcher = fetcher(args)?;
    let batch = BatchRunner::new(&fetcher)
        .run(&config.hosts, args.errors.into())
        .await?;

    report(args, &batch.invalid, batch.aborted, &batch.results)
}

/// Show statistics of a saved scan
fn run_stats(args: &Args) -> wp_info_scan::Result<()> {
    log::info!("Showing stats from a previous scan");
    let results = load_snapshot(input_file(args))?;
    let stats = compute_stats(&results);

    let summary = Summary {
        invalid: &[],
        aborted: false,
        results: &[],
        statistics: Some(&stats),
    };
    write_summary(&summary, args.format.into())
}

/// Render the outcome of a scan and save it when requested
fn report(
    args: &Args,
    invalid: &[wp_info_scan::ValidationOutcome],
    aborted: bool,
    results: &[ScanResult],
) -> wp_info_scan::Result<()> {
    let stats = (!results.is_empty()).then(|| compute_stats(results));
    let summary = Summary {
        invalid,
        aborted,
        results,
        statistics: stats.as_ref(),
    };
    write_summary(&summary, args.format.into())?;

    if let Some(SaveArg::Json) = args.output {
        save_snapshot(&args.snapshot, results)?;
    }
    Ok(())
}

fn write_summary(summary: &Summary<'_>, format: OutputFormat) -> wp_info_scan::Result<()> {
    let stdout = std::io::stdout();
    let mut writer = stdout.lock();
    output_summary(summary, format, &mut writer)
}

fn input_file(args: &Args) -> &Path {
    args.file.as_deref().unwrap_or(Path::new(DEFAULT_SNAPSHOT_FILE))
}

fn print_banner() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    println!("WP-INFO-SCAN v{}", VERSION);
    println!();
}
