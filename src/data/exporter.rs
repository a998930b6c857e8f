//! CSV Exporter Module
//! Writes the classified table as a ten-column, BOM-prefixed UTF-8 CSV.

use super::processor::ClassifiedTable;
use super::schema::Locale;
use polars::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// UTF-8 byte-order mark so spreadsheet tools pick the right encoding.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to build export table: {0}")]
    Table(#[from] PolarsError),
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Materializes a [`ClassifiedTable`] as a DataFrame and writes it to disk.
pub struct CsvExporter;

impl CsvExporter {
    /// Build the export DataFrame in fixed column order with rounded derived values.
    pub fn to_dataframe(table: &ClassifiedTable, locale: Locale) -> Result<DataFrame, ExportError> {
        let columns = locale.columns();
        let n = table.len();

        let mut ids = Vec::with_capacity(n);
        let mut names = Vec::with_capacity(n);
        let mut volumes = Vec::with_capacity(n);
        let mut prices = Vec::with_capacity(n);
        let mut margins = Vec::with_capacity(n);
        let mut unit_profits = Vec::with_capacity(n);
        let mut revenues = Vec::with_capacity(n);
        let mut xs = Vec::with_capacity(n);
        let mut ys = Vec::with_capacity(n);
        let mut categories = Vec::with_capacity(n);

        for row in &table.rows {
            let (unit_profit, revenue, x, y) = row.rounded();
            ids.push(row.product.id.clone());
            names.push(row.product.name.clone());
            volumes.push(row.product.volume);
            prices.push(row.product.price);
            margins.push(row.product.margin);
            unit_profits.push(unit_profit);
            revenues.push(revenue);
            xs.push(x);
            ys.push(y);
            categories.push(row.quadrant.label(locale));
        }

        // Sales volumes are counts; keep them integral in the sheet when they are.
        let volume_column = if volumes.iter().all(|v| v.fract() == 0.0) {
            let counts: Vec<i64> = volumes.iter().map(|v| *v as i64).collect();
            Column::new(columns.volume.into(), counts)
        } else {
            Column::new(columns.volume.into(), volumes)
        };

        let df = DataFrame::new(vec![
            Column::new(columns.id.into(), ids),
            Column::new(columns.name.into(), names),
            volume_column,
            Column::new(columns.price.into(), prices),
            Column::new(columns.margin.into(), margins),
            Column::new(columns.unit_profit.into(), unit_profits),
            Column::new(columns.revenue.into(), revenues),
            Column::new(columns.x.into(), xs),
            Column::new(columns.y.into(), ys),
            Column::new(columns.category.into(), categories),
        ])?;

        Ok(df)
    }

    /// Write the table to `path`, header row first, BOM-prefixed.
    pub fn write_csv(table: &ClassifiedTable, locale: Locale, path: &Path) -> Result<(), ExportError> {
        let mut df = Self::to_dataframe(table, locale)?;

        let write_err = |source: std::io::Error| ExportError::Write {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(write_err)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(UTF8_BOM).map_err(write_err)?;

        CsvWriter::new(&mut writer)
            .include_header(true)
            .finish(&mut df)
            .map_err(|err| write_err(std::io::Error::other(err)))?;

        writer.flush().map_err(write_err)?;

        log::debug!("Wrote {} rows to {}", df.height(), path.display());
        Ok(())
    }
}
