//! dug - grouped disk usage.
//!
//! Usage:
//!   dug PATH                     Top 15 top-level entries by size
//!   dug -g extension PATH        Group by file extension
//!   dug -g path -s files PATH    Directories with the most files
//!   dug -f json PATH             Emit the report as JSON
//!   dug --help                   Show help

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use dugroup_core::{GroupingMode, validate_args};
use dugroup_report::{DEFAULT_COUNT, EntryFilter, Report, ReportConfig, ReportProcessor};
use dugroup_scan::{Aggregates, ScanConfig, ScanObserver, ScanProgress, ScanWarning, Scanner};

/// Width of the group column, and of the path shown by the spinner.
const GROUP_WIDTH: usize = 60;

#[derive(Parser)]
#[command(
    name = "dug",
    version,
    about = "Disk usage grouped by top-level directory, extension, path or date",
    long_about = "dug walks a directory tree and totals file sizes, file counts and \
                  directory counts per group.\n\n\
                  Groups: tld, extension, path (alias directory), modified, created.\n\
                  Sort fields: size, files, directories."
)]
struct Cli {
    /// System path to start scanning
    path: Option<PathBuf>,

    /// Which field the results are grouped by
    #[arg(short, long, default_value = "tld")]
    group: String,

    /// Which field the results are sorted by
    #[arg(short, long, default_value = "size")]
    sort: String,

    /// Number of results to display
    #[arg(short, long, default_value_t = DEFAULT_COUNT)]
    count: usize,

    /// Show the smallest of the selected results first
    #[arg(short, long)]
    reverse: bool,

    /// Only show groups that stand for directories
    #[arg(long, conflicts_with = "files")]
    dirs: bool,

    /// Only show groups that stand for files
    #[arg(long)]
    files: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Walk in parallel with this many threads (0 walks sequentially)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Hide the spinner, warnings and summary
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(path) = cli.path.as_deref() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let (grouping, sort) = match validate_args(&cli.group, &cli.sort) {
        Ok(fields) => fields,
        Err(err) => Cli::command().error(ErrorKind::InvalidValue, err).exit(),
    };

    let filter = entry_filter(cli.dirs, cli.files, grouping);

    let config = ScanConfig::builder()
        .root(path)
        .grouping(grouping)
        .threads(cli.threads)
        .build()
        .context("Invalid scan configuration")?;

    let report_config = ReportConfig::builder()
        .sort(sort)
        .count(cli.count)
        .reverse(cli.reverse)
        .filter(filter)
        .build()
        .context("Invalid report configuration")?;

    debug!(?config, ?report_config, "resolved configuration");

    let spinner = !cli.quiet && matches!(cli.format, OutputFormat::Text);
    let mut observer = CliObserver::new(spinner, !cli.quiet);

    let start = Instant::now();
    let result = Scanner::new().scan(&config, &mut observer);
    let warnings = observer.finish();
    let aggregates = result.with_context(|| format!("Failed to scan {}", path.display()))?;
    let summary = ScanProgress::from_snapshot(path, &aggregates, warnings, start.elapsed());

    let report = ReportProcessor::with_config(report_config).report(&aggregates, grouping);

    match cli.format {
        OutputFormat::Text => {
            print_table(&report);
            if !cli.quiet {
                print_summary(&summary);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

/// Map `--dirs`/`--files` to a filter.
///
/// Only tld and path groups stand for directories; elsewhere `--dirs` shows
/// nothing and `--files` shows everything.
fn entry_filter(dirs: bool, files: bool, grouping: GroupingMode) -> EntryFilter {
    let filter = if dirs {
        EntryFilter::Directories
    } else if files {
        EntryFilter::Files
    } else {
        EntryFilter::All
    };

    if filter != EntryFilter::All && !grouping.is_folder_grouping() {
        warn!(%grouping, %filter, "grouping never produces directory groups");
    }
    filter
}

/// Install the stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Spinner and inline warnings while a scan runs.
struct CliObserver {
    bar: Option<ProgressBar>,
    echo_warnings: bool,
    warnings: u64,
}

impl CliObserver {
    fn new(spinner: bool, echo_warnings: bool) -> Self {
        let bar = spinner.then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_chars("|/-\\ "),
            );
            pb.set_message("starting..");
            pb.enable_steady_tick(Duration::from_millis(80));
            pb
        });

        Self {
            bar,
            echo_warnings,
            warnings: 0,
        }
    }

    /// Clear the spinner and return the number of warnings seen.
    fn finish(self) -> u64 {
        if let Some(pb) = self.bar {
            pb.finish_and_clear();
        }
        self.warnings
    }
}

impl ScanObserver for CliObserver {
    fn on_progress(&mut self, path: &Path, _snapshot: &Aggregates) {
        if let Some(pb) = &self.bar {
            let path = path.display().to_string();
            pb.set_message(format!("scanning: {}", truncate_start(&path, GROUP_WIDTH)));
        }
    }

    fn on_error(&mut self, warning: &ScanWarning) {
        self.warnings += 1;
        if !self.echo_warnings {
            return;
        }
        match &self.bar {
            Some(pb) => pb.println(format!("warning: {warning}")),
            None => eprintln!("warning: {warning}"),
        }
    }
}

/// Print the report rows and the grand totals.
fn print_table(report: &Report) {
    let rule = "─".repeat(GROUP_WIDTH + 4 * 11 + 1);

    println!(
        "{:<width$} {:>10} {:>10} {:>10} {:>7}",
        "Group",
        "Files",
        "Dirs",
        "Size",
        "%",
        width = GROUP_WIDTH
    );
    println!("{rule}");

    for stat in &report.rows {
        println!(
            "{:<width$} {:>10} {:>10} {:>10} {:>6.1}%",
            truncate_start(stat.group.as_str(), GROUP_WIDTH),
            stat.files,
            stat.directories,
            format_size(stat.size),
            report.size_share(stat),
            width = GROUP_WIDTH
        );
    }

    let hidden = report.hidden_groups();
    if hidden > 0 {
        println!("  ... and {hidden} more");
    }

    println!("{rule}");
    println!(
        "{:<width$} {:>10} {:>10} {:>10}",
        "Total",
        report.totals.files,
        report.totals.directories,
        format_size(report.totals.size),
        width = GROUP_WIDTH
    );
}

fn print_summary(summary: &ScanProgress) {
    eprintln!();
    if summary.errors_count > 0 {
        eprintln!("{} warning(s) during scan", summary.errors_count);
    }
    eprintln!(
        "Scanned {} entries in {:.2}s ({:.0} files/s)",
        summary.total_items(),
        summary.elapsed.as_secs_f64(),
        summary.files_per_second()
    );
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Keep the tail of a string, marking the cut with a leading `...`.
fn truncate_start(s: &str, max_len: usize) -> String {
    let len = s.chars().count();
    if len <= max_len {
        return s.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let tail: String = s.chars().skip(len - keep).collect();
    format!("...{tail}")
}
