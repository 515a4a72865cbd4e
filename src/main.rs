use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use fernbus::scrapers::HeadlessChromeLauncher;
use fernbus::table::{self, SortKey};
use fernbus::{ConnectionFinder, InspectAction, ParseFault, PipelineConfig};
use tracing::{info, warn};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Command line interface to the busliniensuche.de bus trip search
#[derive(Debug, Parser)]
#[command(name = "fernbus", version, about)]
struct Cli {
    /// Ask what to do with results that can't be parsed, and log verbosely
    #[arg(short, long)]
    debug: bool,

    /// Wait at most this many seconds for results
    #[arg(short, long, default_value_t = 60)]
    timeout: u64,

    /// Load images (makes the failure screenshot readable)
    #[arg(long)]
    load_images: bool,

    /// Order the table by this column instead of page order
    #[arg(long, value_enum)]
    sort_by: Option<SortKey>,

    /// Also save the connections as JSON
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Departure stop
    origin: String,

    /// Arrival stop
    destination: String,

    /// Travel date (YYYY-MM-DD)
    date: String,
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let default_level = if cli.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (writer, ansi) = match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(io::stderr), true),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .init();
    Ok(())
}

fn show_fault(fault: &ParseFault<'_>) -> io::Result<()> {
    let mut stderr = io::stderr().lock();
    writeln!(stderr, "\nResult #{} can't be parsed: {}", fault.index, fault.error)?;
    writeln!(stderr, "{}", fault.fragment_html)?;
    write!(stderr, "Skip it and continue? [y/N] ")?;
    stderr.flush()
}

/// Shows a malformed result on the terminal and lets the user decide
fn prompt_inspector(fault: &ParseFault<'_>) -> InspectAction {
    if let Err(err) = show_fault(fault) {
        warn!("Could not show result #{}: {}", fault.index, err);
        return InspectAction::Abort;
    }

    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) if answer.trim().eq_ignore_ascii_case("y") => InspectAction::Skip,
        _ => InspectAction::Abort,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    info!("🚌 fernbus - {} → {} on {}", cli.origin, cli.destination, cli.date);

    let config = PipelineConfig {
        load_images: cli.load_images,
        debug: cli.debug,
        ..PipelineConfig::default()
    };
    let finder =
        ConnectionFinder::new(HeadlessChromeLauncher, config).with_inspector(prompt_inspector);

    // The browser is driven synchronously; keep it off the async workers.
    let (origin, destination, date) = (cli.origin.clone(), cli.destination.clone(), cli.date.clone());
    let timeout = Duration::from_secs(cli.timeout);
    let mut connections = tokio::task::spawn_blocking(move || {
        finder.find_connections(&origin, &destination, &date, timeout)
    })
    .await
    .context("Search task panicked")?
    .context("Failed to find bus connections")?;

    info!("✅ Found {} connections", connections.len());

    if let Some(key) = cli.sort_by {
        table::sort_connections(&mut connections, key);
    }
    table::render(&connections).printstd();

    if let Some(path) = &cli.json {
        let json = serde_json::to_string_pretty(&connections)?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("💾 Saved connections to {}", path.display());
    }

    Ok(())
}
