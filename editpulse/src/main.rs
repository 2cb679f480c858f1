//! editpulse - summarize an edit log into work sessions
//!
//! Reads a CSV edit log, groups each user's edits into sessions and writes
//! one row per (date, user, edit type) with occurrences and time spent.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use editpulse_core::format::format_duration;
use editpulse_core::sink::{CsvSink, JsonSink};
use editpulse_core::{
    source, summarize, Config, DedupScope, Summary, SummaryReport, SummarySink, TimeThreshold,
};

#[derive(Parser, Debug)]
#[command(name = "editpulse")]
#[command(about = "Summarize an edit log into work sessions")]
#[command(version)]
struct Args {
    /// Edit log CSV (User Email, User Name, Time, Edit Type, Is Undo)
    input: PathBuf,

    /// Output file (default: output.csv for csv, stdout for json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Largest gap in minutes between edits of one session
    #[arg(short, long, allow_negative_numbers = true)]
    threshold: Option<f64>,

    /// Where duplicate timestamps are detected
    #[arg(long, value_enum)]
    dedup: Option<DedupArg>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Config file (default: ~/.config/editpulse/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum DedupArg {
    Global,
    PerUser,
}

impl From<DedupArg> for DedupScope {
    fn from(arg: DedupArg) -> Self {
        match arg {
            DedupArg::Global => DedupScope::Global,
            DedupArg::PerUser => DedupScope::PerUser,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Csv,
    Json,
    Table,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;

    let _log_guard = editpulse_core::logging::init(&config.logging).ok();

    // CLI flags win over the config file
    let mut options = config
        .summary
        .options()
        .context("invalid summary settings")?;
    if let Some(minutes) = args.threshold {
        options.threshold = TimeThreshold::from_minutes(minutes).context("invalid --threshold")?;
    }
    if let Some(dedup) = args.dedup {
        options.dedup_scope = dedup.into();
    }

    tracing::info!(
        input = %args.input.display(),
        threshold = %options.threshold,
        dedup_scope = %options.dedup_scope,
        "Starting summary"
    );

    let events = source::read_events_from_path(&args.input)
        .with_context(|| format!("failed to read edit log {}", args.input.display()))?;

    let report = summarize(events, &options);

    match args.format {
        OutputFormat::Csv => {
            let path = args
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from("output.csv"));
            let mut sink = CsvSink::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            store(&mut sink, &report)?;
            eprintln!("Summary written to {}", path.display());
        }
        OutputFormat::Json => match &args.output {
            Some(path) => {
                let file = std::fs::File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                store(&mut JsonSink::new(io::BufWriter::new(file)), &report)?;
                eprintln!("Summary written to {}", path.display());
            }
            None => store(&mut JsonSink::new(io::stdout().lock()), &report)?,
        },
        OutputFormat::Table => print_table(&report.summary),
    }

    eprintln!(
        "Processed {} logs into {} sessions, {} summary rows",
        report.total_logs,
        report.session_count,
        report.summarized_logs()
    );

    Ok(())
}

fn store(sink: &mut dyn SummarySink, report: &SummaryReport) -> Result<()> {
    sink.store(&report.summary)
        .context("failed to write summary")?;
    Ok(())
}

fn print_table(summary: &Summary) {
    if summary.is_empty() {
        println!("No edit sessions found.");
        return;
    }

    let email_width = summary
        .rows
        .iter()
        .map(|r| r.user_email.len())
        .max()
        .unwrap_or(0)
        .max("USER EMAIL".len());
    let type_width = summary
        .rows
        .iter()
        .map(|r| r.edit_type.len())
        .max()
        .unwrap_or(0)
        .max("EDIT TYPE".len());

    println!(
        "{:<10}  {:<ew$}  {:<tw$}  {:>11}  {:>10}",
        "DATE",
        "USER EMAIL",
        "EDIT TYPE",
        "OCCURRENCES",
        "TIME SPENT",
        ew = email_width,
        tw = type_width
    );
    for row in &summary.rows {
        println!(
            "{:<10}  {:<ew$}  {:<tw$}  {:>11}  {:>10}",
            row.date.to_string(),
            row.user_email,
            row.edit_type,
            row.occurrences,
            format_duration(row.time_spent_seconds),
            ew = email_width,
            tw = type_width
        );
    }
    println!();
    println!(
        "Total: {} occurrences, {}",
        summary.total_occurrences(),
        format_duration(summary.total_time_spent_seconds())
    );
}
