use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use pupilometer::{run_frames, FrameSource, RunConfig, RunReport};

#[cfg(not(feature = "tracing"))]
use log::info;
#[cfg(feature = "tracing")]
use tracing::info;

/// Measure pupil center and radius frame by frame.
#[derive(Debug, Parser)]
#[command(name = "pupilometer", version, about)]
struct Cli {
    /// Image file or directory of frame images.
    input: PathBuf,

    /// JSON run configuration (locator parameters and output options).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base directory for saved outputs (overrides the config directories).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Save annotated stage mosaics as `<out>/identified/frame_NNN.png`.
    #[arg(long)]
    save_output: bool,

    /// Save winning masks as `<out>/threshold/threshold_NNN.png`.
    #[arg(long)]
    save_threshold: bool,

    /// Sleep between frames, in milliseconds.
    #[arg(long)]
    pause_ms: Option<u64>,

    /// Write the JSON report here instead of stdout.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug, trace.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Font file for printing the radius on saved frames.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Emit JSON logs (with the `tracing` feature).
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli)?;
    run(cli)
}

#[cfg(not(feature = "tracing"))]
fn init_logging(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    pupilometer::core::init_with_level(pupilometer::core::parse_level(&cli.log_level))?;
    Ok(())
}

#[cfg(feature = "tracing")]
fn init_logging(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    tracing_log::LogTracer::init()?;
    pupilometer::core::init_tracing(pupilometer::core::parse_level(&cli.log_level), cli.json_logs);
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut cfg = match &cli.config {
        Some(path) => RunConfig::from_json_file(path)?,
        None => RunConfig::default(),
    };
    if let Some(out) = &cli.out {
        cfg.output_dir = out.join("identified");
        cfg.threshold_dir = out.join("threshold");
    }
    cfg.save_output |= cli.save_output;
    cfg.save_threshold_output |= cli.save_threshold;
    if let Some(font) = cli.font {
        cfg.radius_font = Some(font);
    }
    if let Some(ms) = cli.pause_ms {
        cfg.pause_ms = ms;
    }

    let source = FrameSource::open(&cli.input)?;
    info!("processing {} frames from {}", source.len(), cli.input.display());
    let report = run_frames(source, &cfg)?;
    info!(
        "done: {} frames, pupil found in {}, {} failed",
        report.frames.len(),
        report.found,
        report.failed
    );

    write_report(cli.report.as_deref(), &report)
}

fn write_report(path: Option<&Path>, report: &RunReport) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(report)?;
    match path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, json)?;
        }
        None => println!("{json}"),
    }
    Ok(())
}
