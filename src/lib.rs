//! BCG Quadrant - four-quadrant product classification & bubble chart export
//!
//! Products are placed on X = 1 - minmax(unit profit) and Y = minmax(monthly
//! volume), split at the batch medians into four categories, then written out
//! as an annotated CSV and a static bubble chart.

pub mod charts;
pub mod cli;
pub mod config;
pub mod data;
pub mod pipeline;
pub mod stats;

pub use cli::Args;
pub use config::{ConfigError, RenderConfig};
pub use data::{ClassifiedProduct, ClassifiedTable, DataLoader, DataProcessor, Locale, Product};
pub use pipeline::{run, PipelineError, PipelineOptions, PipelineOutput};
pub use stats::{Quadrant, StatsCalculator};
