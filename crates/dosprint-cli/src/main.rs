//! dosprint CLI - Convert DOS print-capture files into merged PDFs.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dosprint_core::{AppConfig, BlankCheck, PrintManager, RunOptions};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, ValueEnum)]
enum BlankCheckOption {
    Histogram,
    PdfContent,
}

impl From<BlankCheckOption> for BlankCheck {
    fn from(opt: BlankCheckOption) -> Self {
        match opt {
            BlankCheckOption::Histogram => Self::Histogram,
            BlankCheckOption::PdfContent => Self::PdfContent,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "dosprint")]
#[command(author, version, about = "Print DOS capture files (EPSON FX / PostScript) to merged PDFs", long_about = None)]
struct Args {
    /// Input file to print (supports dirs in batch mode)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Show data about file and processing
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Select landscape mode
    #[arg(short, long)]
    landscape: bool,

    /// Preserve the scratch workspace data
    #[arg(short, long)]
    preserve: bool,

    /// Run using Ghostscript to generate the PDF (PostScript printing)
    #[arg(short, long)]
    gs: bool,

    /// Page geometry mode (A4, folio, fp, Letter, pmmain, generic, auto)
    #[arg(short, long, default_value = "auto")]
    mode: String,

    /// Blank-page detection strategy
    #[arg(long, value_enum, default_value = "histogram")]
    blank_check: BlankCheckOption,

    /// Dot-matrix rasterizer binary
    #[arg(long, env = "DOSPRINT_RASTERIZER")]
    rasterizer: Option<PathBuf>,

    /// Ghostscript binary
    #[arg(long, env = "DOSPRINT_GS")]
    gs_path: Option<PathBuf>,

    /// Printer font resource handed to the rasterizer
    #[arg(long, env = "DOSPRINT_FONT")]
    font: Option<PathBuf>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup logging
    let log_level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    // Load or create config
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        AppConfig::load()
    };

    // Override config with CLI arguments
    config.blank_check = args.blank_check.into();
    if let Some(rasterizer) = args.rasterizer {
        config.tools.rasterizer = rasterizer;
    }
    if let Some(gs_path) = args.gs_path {
        config.tools.ghostscript = gs_path;
    }
    if let Some(font) = args.font {
        config.tools.font = font;
    }

    let options = RunOptions {
        mode: args.mode,
        landscape: args.landscape,
        preserve: args.preserve,
        postscript: args.gs,
    };

    let manager = PrintManager::new(config, &options)
        .context("Failed to initialize print manager")?;

    info!("Processing {} input path(s)", args.input.len());

    // Setup progress bar
    #[allow(clippy::cast_possible_truncation)]
    let pb = ProgressBar::new(args.input.len() as u64);
    // Template is hardcoded and valid, unwrap is safe
    #[allow(clippy::unwrap_used)]
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("#>-"),
    );

    // Process inputs strictly in order; the first missing path aborts the batch
    let mut processed = 0;
    for input in &args.input {
        pb.set_message(input.display().to_string());
        processed += manager
            .run(std::slice::from_ref(input))
            .context(format!("Failed to process {}", input.display()))?;
        pb.inc(1);
    }

    pb.finish_with_message("Done");

    // CLI output is intentional
    #[allow(clippy::print_stdout)]
    {
        println!("Done! ({processed} files processed)");
    }

    Ok(())
}
