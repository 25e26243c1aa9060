//! Static sentiment map of the seed posts

use std::path::PathBuf;

use clap::Parser;
use pulso_urbano::core::config::PulsoConfig;
use pulso_urbano::core::error::Result;
use pulso_urbano::pipeline::run_snapshot;
use pulso_urbano::render::HtmlFileSink;

/// Pulso Urbano snapshot map - sentiment heatmap with topic markers
#[derive(Parser, Debug)]
#[command(name = "snapshot_map")]
#[command(about = "Score the seed posts and render a static sentiment heatmap")]
struct Args {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output HTML file
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

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

    let config = match &args.config {
        Some(path) => PulsoConfig::load(path)?,
        None => PulsoConfig::default(),
    };
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.render.snapshot_file));

    let report = run_snapshot(&config, HtmlFileSink::new(&output))?;
    for scored in &report.posts {
        tracing::debug!(
            zone = %scored.post.zone,
            sentiment = scored.sentiment,
            topic = %scored.topic.label,
            "Scored seed post"
        );
    }

    println!("Map generated: {}", output.display());
    Ok(())
}
