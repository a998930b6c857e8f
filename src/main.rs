//! BCG Quadrant - CSV in, classified CSV and bubble chart out.

use anyhow::{Context, Result};
use bcg_quadrant::{pipeline, Args};
use clap::Parser;

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let options = args
        .pipeline_options()
        .context("Failed to load render configuration")?;

    let output = pipeline::run(&options)
        .with_context(|| format!("Failed to process {}", options.input.display()))?;

    println!(
        "Generated:\n- {}\n- {}",
        output.csv_path.display(),
        output.chart_path.display()
    );

    Ok(())
}
