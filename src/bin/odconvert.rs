//! CLI binary for odconvert.
//!
//! A thin shim over the library crate that maps CLI flags to an engine
//! endpoint and a single conversion, and prints the result.

use anyhow::{Context, Result};
use clap::Parser;
use odconvert::{Converter, Endpoint, Outcome, RemoteConnector};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Text document to PDF (engine on localhost:2002)
  odconvert report.odt report.pdf

  # Spreadsheet to PDF on A3 landscape
  odconvert -s A3 -o LANDSCAPE figures.ods figures.pdf

  # Slides to one PNG per slide: out-0.png, out-1.png, …
  odconvert slides.odp out.png

  # Engine on another host
  odconvert --host render-box -p 8100 letter.docx letter.pdf

SUPPORTED CONVERSIONS (by document family):
  Family        →  pdf  html  odt  doc  docx  rtf  txt  ods  xls  csv  odp  ppt  pptx  swf
  Text             ✓    ✓     ✓    ✓    ✓     ✓    ✓
  Web              ✓          ✓
  Spreadsheet      ✓    ✓                               ✓    ✓    ✓
  Presentation     ✓    ✓                                              ✓    ✓    ✓     ✓
  Drawing          ✓                                                                   ✓

  Any family can also export to png, jpg, gif, bmp, or tiff — one image
  per page, named <base>-<index>.<ext>.

SETUP:
  The engine must already be running with its bridge socket enabled,
  e.g. listening on port 2002. odconvert only connects to it; it never
  starts or stops the engine process.
"#;

/// Convert office documents between formats via a running office engine.
#[derive(Parser, Debug)]
#[command(
    name = "odconvert",
    version,
    about = "Convert office documents between formats via a running office engine",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input document path.
    input: PathBuf,

    /// Output path; its extension selects the output format.
    output: PathBuf,

    /// Paper size: A3, A4, or A5.
    #[arg(short = 's', long, env = "ODCONVERT_PAPER_SIZE", default_value = "A4")]
    paper_size: String,

    /// Paper orientation: PORTRAIT or LANDSCAPE.
    #[arg(
        short = 'o',
        long,
        env = "ODCONVERT_PAPER_ORIENTATION",
        default_value = "PORTRAIT"
    )]
    paper_orientation: String,

    /// Engine host.
    #[arg(long, env = "ODCONVERT_HOST", default_value = "localhost")]
    host: String,

    /// Engine bridge port.
    #[arg(short, long, env = "ODCONVERT_PORT", default_value_t = odconvert::DEFAULT_PORT)]
    port: u16,

    /// Seconds to wait for the engine connection.
    #[arg(long, env = "ODCONVERT_CONNECT_TIMEOUT", default_value_t = 10)]
    connect_timeout: u64,

    /// Seconds to wait for each engine operation.
    #[arg(long, env = "ODCONVERT_IO_TIMEOUT", default_value_t = 120)]
    io_timeout: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "ODCONVERT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "ODCONVERT_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // The original check, kept before any engine traffic: a typo'd input
    // path should not cost a connection round-trip.
    if !cli.input.is_file() {
        anyhow::bail!("no such input file: {}", cli.input.display());
    }

    let endpoint = Endpoint::new(cli.host.clone(), cli.port)
        .with_connect_timeout(Duration::from_secs(cli.connect_timeout))
        .with_io_timeout(Duration::from_secs(cli.io_timeout));
    let connector = RemoteConnector::new(endpoint);

    let mut converter =
        Converter::connect(&connector).context("could not reach the document engine")?;
    let done = converter
        .convert(
            &cli.input,
            &cli.output,
            &cli.paper_size,
            &cli.paper_orientation,
        )
        .context("conversion failed")?;

    if !cli.quiet {
        let what = match done.outcome {
            Outcome::Stored { filter } => {
                format!("{} {}", bold(&cli.output.display().to_string()), dim(filter))
            }
            Outcome::PagesExported { pages } => format!(
                "{} {}",
                bold(&format!("{pages} page images")),
                dim(&format!("{}", cli.output.display()))
            ),
        };
        eprintln!(
            "{} {} ({}) → {}",
            green("✔"),
            cli.input.display(),
            done.family,
            what
        );
    }

    Ok(())
}
