//! The single linear pass: load, classify, render, export.
//!
//! Nothing touches the output directory until the input has been loaded,
//! classified and the chart rendered in memory. If either write fails, the
//! CSV is removed again.

use crate::charts::{save_png, BubbleFigure, RenderError};
use crate::config::RenderConfig;
use crate::data::{
    ClassifiedTable, CsvExporter, DataLoader, DataProcessor, ExportError, Locale, LoaderError,
    ProcessorError,
};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Classify(#[from] ProcessorError),
    #[error("Cannot create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Everything one invocation needs.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub locale: Locale,
    pub render: RenderConfig,
}

impl PipelineOptions {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            locale: Locale::default(),
            render: RenderConfig::default(),
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_render_config(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }

    pub fn csv_path(&self) -> PathBuf {
        self.output_dir.join(&self.render.csv_file_name)
    }

    pub fn chart_path(&self) -> PathBuf {
        self.output_dir.join(&self.render.chart_file_name)
    }
}

/// Paths of the two artifacts plus the table they were built from.
#[derive(Debug)]
pub struct PipelineOutput {
    pub csv_path: PathBuf,
    pub chart_path: PathBuf,
    pub table: ClassifiedTable,
}

/// Load and classify the input without writing anything.
pub fn classify_file(input: &Path, locale: Locale) -> Result<ClassifiedTable, PipelineError> {
    let mut loader = DataLoader::new(locale);
    let products = loader.load_products(input)?;
    log::info!("Loaded {} products from {}", products.len(), input.display());

    let table = DataProcessor::classify(products)?;
    for (quadrant, count) in table.quadrant_counts() {
        log::debug!("{:<30} {}", quadrant.label(locale), count);
    }
    Ok(table)
}

/// Run the whole pipeline. Either both artifacts are written or an error is returned.
pub fn run(options: &PipelineOptions) -> Result<PipelineOutput, PipelineError> {
    let table = classify_file(&options.input, options.locale)?;
    log::info!(
        "Classified {} products (X median {:.3}, Y median {:.3})",
        table.len(),
        table.x_median,
        table.y_median
    );

    let image = BubbleFigure::render(&table, &options.render, options.locale)?;
    log::info!("Rendered {}x{} chart", image.width(), image.height());

    std::fs::create_dir_all(&options.output_dir).map_err(|source| PipelineError::OutputDir {
        path: options.output_dir.clone(),
        source,
    })?;

    let csv_path = options.csv_path();
    let chart_path = options.chart_path();

    if let Err(err) = CsvExporter::write_csv(&table, options.locale, &csv_path) {
        discard_partial(&csv_path);
        return Err(err.into());
    }

    if let Err(err) = save_png(&image, &chart_path) {
        discard_partial(&csv_path);
        discard_partial(&chart_path);
        return Err(err.into());
    }

    log::info!("Wrote {} and {}", csv_path.display(), chart_path.display());

    Ok(PipelineOutput {
        csv_path,
        chart_path,
        table,
    })
}

/// Remove an artifact left behind by a failed run.
fn discard_partial(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => log::warn!("Removed partial output {}", path.display()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => log::warn!("Could not remove {}: {}", path.display(), err),
    }
}
