//! Command-line interface definitions and argument parsing

use crate::config::{ConfigError, RenderConfig};
use crate::data::Locale;
use crate::pipeline::PipelineOptions;
use clap::Parser;
use std::path::PathBuf;

/// Classify products into a four-quadrant matrix and render a bubble chart
#[derive(Parser, Debug)]
#[command(name = "bcg-quadrant")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input CSV file (id, name, monthly volume, average price, gross margin)
    #[arg(short, long = "in", value_name = "PATH")]
    pub input: PathBuf,

    /// Output directory, created if absent
    #[arg(short, long = "out", value_name = "DIR", default_value = "out")]
    pub output_dir: PathBuf,

    /// Language of column names, category labels and chart text
    #[arg(short, long, value_enum, default_value = "zh")]
    pub locale: Locale,

    /// Optional JSON file overriding render settings
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Render settings from `--config`, or the defaults.
    pub fn render_config(&self) -> Result<RenderConfig, ConfigError> {
        match &self.config {
            Some(path) => RenderConfig::from_file(path),
            None => Ok(RenderConfig::default()),
        }
    }

    pub fn pipeline_options(&self) -> Result<PipelineOptions, ConfigError> {
        Ok(PipelineOptions::new(&self.input, &self.output_dir)
            .with_locale(self.locale)
            .with_render_config(self.render_config()?))
    }
}
