//! Data module - CSV loading, classification and export

mod exporter;
mod loader;
mod processor;
mod schema;

pub use exporter::{CsvExporter, ExportError};
pub use loader::{DataLoader, LoaderError};
pub use processor::{ClassifiedProduct, ClassifiedTable, DataProcessor, ProcessorError};
pub use schema::{ColumnSchema, Locale, Product};
