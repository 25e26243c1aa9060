//! Animated propagation map
//!
//! Simulates how a concert in the city centre spreads across districts,
//! prints the propagation KPIs and writes a time-animated heatmap with an
//! event timeline and per-zone summary markers.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use pulso_urbano::core::config::PulsoConfig;
use pulso_urbano::core::error::Result;
use pulso_urbano::pipeline::run_timeline;
use pulso_urbano::render::HtmlFileSink;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Pulso Urbano timeline map - event propagation across city zones
#[derive(Parser, Debug)]
#[command(name = "timeline_map")]
#[command(about = "Simulate event propagation and render an animated heatmap with KPIs")]
struct Args {
    /// TOML config file (defaults reproduce the reference scenario)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output HTML file
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Random seed for the simulation
    #[arg(long)]
    seed: Option<u64>,

    /// Observation window in hours
    #[arg(long)]
    hours: Option<u32>,

    /// KPI output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(if args.verbose { "pulso_urbano=debug" } else { "pulso_urbano=info" })
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => PulsoConfig::load(path)?,
        None => PulsoConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    if let Some(hours) = args.hours {
        config.simulation.hours = hours;
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.render.timeline_file));

    let report = run_timeline(&config, HtmlFileSink::new(&output))?;

    match args.format {
        OutputFormat::Text => println!("{}", report.kpis.summary()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    println!("Animated map generated: {}", output.display());

    Ok(())
}
