//! Main application entry point.

use clap::Parser;
use snipcanvas_app::{script, App, AppConfig, AppError, AppResult};
use snipcanvas_core::export::DEFAULT_EXPORT_FILENAME;
use snipcanvas_core::CanvasConfig;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "snipcanvas", about = "Replay a SnipCanvas event script and export the board")]
struct Cli {
    /// JSON file with canvas constants to override.
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON array of host events.
    #[arg(long)]
    script: PathBuf,

    /// Export destination; prints to stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write the export to ./akiec-export.json.
    #[arg(long, conflicts_with = "output")]
    download: bool,

    /// Seed for pin jitter.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Skip the simulated document and assistant latency.
    #[arg(long)]
    no_latency: bool,

    /// How long to wait for background requests at the end, in milliseconds.
    #[arg(long, default_value_t = 10_000)]
    settle_ms: u64,
}

fn read(path: &Path) -> AppResult<String> {
    std::fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn run(cli: Cli) -> AppResult<()> {
    let mut canvas = match &cli.config {
        Some(path) => CanvasConfig::load(path)?,
        None => CanvasConfig::default(),
    };
    if cli.no_latency {
        canvas = canvas.without_latency();
    }

    let events = script::parse(&read(&cli.script)?)?;
    log::info!("Replaying {} event(s) from {}", events.len(), cli.script.display());

    let mut app = App::new(AppConfig {
        width: cli.width,
        height: cli.height,
        canvas,
        seed: cli.seed,
    });
    app.run(&events)?;

    let export = app.finish(Duration::from_millis(cli.settle_ms));
    log::info!("{}", export.summary());

    let output = cli
        .output
        .or_else(|| cli.download.then(|| PathBuf::from(DEFAULT_EXPORT_FILENAME)));
    match output {
        Some(path) => export.write_to(&path)?,
        None => println!("{}", export.to_json()?),
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting SnipCanvas");

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
