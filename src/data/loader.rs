//! CSV Data Loader Module
//! Handles CSV file loading and typed record extraction using Polars.

use super::schema::{ColumnSchema, Locale, Product};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Input file not found or unreadable: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Required column '{column}' is missing from the input header")]
    MissingField { column: String },
    #[error("Input contains no data rows")]
    EmptyInput,
    #[error("Invalid or empty value in column '{column}' at data row {row}")]
    InvalidValue { column: String, row: usize },
}

/// Handles CSV file loading with Polars and validates the product schema once.
pub struct DataLoader {
    locale: Locale,
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}

impl DataLoader {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            df: None,
            file_path: None,
        }
    }

    /// Load a CSV file using Polars and check that every required column is present.
    pub fn load_csv(&mut self, file_path: &Path) -> Result<&DataFrame, LoaderError> {
        let meta = std::fs::metadata(file_path)
            .map_err(|_| LoaderError::InputNotFound(file_path.to_path_buf()))?;
        if !meta.is_file() {
            return Err(LoaderError::InputNotFound(file_path.to_path_buf()));
        }
        // Polars refuses a zero-byte file outright; there is no header to validate.
        if meta.len() == 0 {
            return Err(LoaderError::EmptyInput);
        }

        self.file_path = Some(file_path.to_path_buf());
        let columns = self.locale.columns();

        // Header only: every column read as text, no data is parsed yet.
        let header = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect_schema()?;
        for column in columns.required() {
            if !header.contains(column) {
                return Err(LoaderError::MissingField {
                    column: column.to_string(),
                });
            }
        }

        // Unparseable numeric cells become null and are reported by `products`.
        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_dtype_overwrite(Some(Arc::new(input_schema(columns))))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        if df.height() == 0 {
            return Err(LoaderError::EmptyInput);
        }

        log::debug!(
            "Loaded {} rows x {} columns from {}",
            df.height(),
            df.width(),
            file_path.display()
        );

        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::EmptyInput)
    }

    /// Extract typed product records from the loaded DataFrame.
    pub fn products(&self) -> Result<Vec<Product>, LoaderError> {
        let Some(df) = &self.df else {
            return Err(LoaderError::EmptyInput);
        };
        let columns = self.locale.columns();

        let ids = text_column(df, columns.id)?;
        let names = text_column(df, columns.name)?;
        let volumes = numeric_column(df, columns.volume)?;
        let prices = numeric_column(df, columns.price)?;
        let margins = numeric_column(df, columns.margin)?;

        let products = ids
            .into_iter()
            .zip(names)
            .zip(volumes)
            .zip(prices)
            .zip(margins)
            .map(|((((id, name), volume), price), margin)| Product {
                id,
                name,
                volume,
                price,
                margin,
            })
            .collect();

        Ok(products)
    }

    /// Load a file and return its products in input order.
    pub fn load_products(&mut self, file_path: &Path) -> Result<Vec<Product>, LoaderError> {
        self.load_csv(file_path)?;
        self.products()
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }
}

/// Declared types of the required input columns; other columns keep inferred types.
fn input_schema(columns: &ColumnSchema) -> Schema {
    Schema::from_iter([
        (PlSmallStr::from(columns.id), DataType::String),
        (PlSmallStr::from(columns.name), DataType::String),
        (PlSmallStr::from(columns.volume), DataType::Float64),
        (PlSmallStr::from(columns.price), DataType::Float64),
        (PlSmallStr::from(columns.margin), DataType::Float64),
    ])
}

fn text_column(df: &DataFrame, column: &str) -> Result<Vec<String>, LoaderError> {
    let series = df
        .column(column)
        .map_err(|_| LoaderError::MissingField {
            column: column.to_string(),
        })?
        .cast(&DataType::String)?;

    series
        .str()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value
                .map(|s| s.to_string())
                .ok_or_else(|| LoaderError::InvalidValue {
                    column: column.to_string(),
                    row: row + 1,
                })
        })
        .collect()
}

/// Numeric cells must parse to a finite float; the range is not checked.
fn numeric_column(df: &DataFrame, column: &str) -> Result<Vec<f64>, LoaderError> {
    let series = df
        .column(column)
        .map_err(|_| LoaderError::MissingField {
            column: column.to_string(),
        })?
        .cast(&DataType::Float64)?;

    series
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| match value {
            Some(v) if v.is_finite() => Ok(v),
            _ => Err(LoaderError::InvalidValue {
                column: column.to_string(),
                row: row + 1,
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_products_en() {
        let file = csv_file("id,name,volume,price,margin\nA1,Tea,120,25.0,0.4\nA2,Coffee,80,40.0,0.25\n");
        let mut loader = DataLoader::new(Locale::En);
        let products = loader.load_products(file.path()).unwrap();

        assert_eq!(loader.get_row_count(), 2);
        assert_eq!(products[0], Product::new("A1", "Tea", 120.0, 25.0, 0.4));
        assert_eq!(products[1].name, "Coffee");
        assert_eq!(loader.get_file_path().map(|p| p.as_path()), Some(file.path()));
    }

    #[test]
    fn test_load_products_zh_ignores_extra_columns() {
        let file = csv_file("商品ID,商品名,月销量,平均价格,毛利率,备注\n1001,绿茶,300,12.5,0.3,x\n");
        let mut loader = DataLoader::default();
        let products = loader.load_products(file.path()).unwrap();

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "1001");
        assert_eq!(products[0].name, "绿茶");
        assert!((products[0].price - 12.5).abs() < 1e-12);
    }

    #[test]
    fn test_missing_margin_column() {
        let file = csv_file("id,name,volume,price\nA1,Tea,120,25.0\n");
        let err = DataLoader::new(Locale::En).load_products(file.path()).unwrap_err();
        match err {
            LoaderError::MissingField { column } => assert_eq!(column, "margin"),
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn test_header_only_is_empty_input() {
        let file = csv_file("id,name,volume,price,margin\n");
        let err = DataLoader::new(Locale::En).load_products(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::EmptyInput));
    }

    #[test]
    fn test_zero_byte_file_is_empty_input() {
        let file = csv_file("");
        let err = DataLoader::new(Locale::En).load_products(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::EmptyInput));
    }

    #[test]
    fn test_missing_file() {
        let err = DataLoader::new(Locale::En)
            .load_products(Path::new("/definitely/not/here.csv"))
            .unwrap_err();
        assert!(matches!(err, LoaderError::InputNotFound(_)));
    }

    #[test]
    fn test_blank_numeric_cell_is_rejected() {
        let file = csv_file("id,name,volume,price,margin\nA1,Tea,120,25.0,0.4\nA2,Coffee,,40.0,0.25\n");
        let err = DataLoader::new(Locale::En).load_products(file.path()).unwrap_err();
        match err {
            LoaderError::InvalidValue { column, row } => {
                assert_eq!(column, "volume");
                assert_eq!(row, 2);
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_late_fractional_volume_is_parsed() {
        let mut contents = String::from("id,name,volume,price,margin\n");
        for i in 0..10_000 {
            contents.push_str(&format!("P{i},item,{i},10,0.3\n"));
        }
        contents.push_str("PX,late,12.5,10,0.3\n");
        let file = csv_file(&contents);

        let products = DataLoader::new(Locale::En).load_products(file.path()).unwrap();
        assert_eq!(products.len(), 10_001);
        assert_eq!(products[10_000].volume, 12.5);
        assert_eq!(products[9_999].volume, 9_999.0);
    }

    #[test]
    fn test_ids_keep_leading_zeros() {
        let file = csv_file("商品ID,商品名,月销量,平均价格,毛利率\n007,绿茶,300,12,0.3\n010,红茶,200,15,0.4\n");
        let products = DataLoader::default().load_products(file.path()).unwrap();
        assert_eq!(products[0].id, "007");
        assert_eq!(products[1].id, "010");
    }

    #[test]
    fn test_non_numeric_cell_is_rejected() {
        let file = csv_file("id,name,volume,price,margin\nA1,Tea,120,25.0,0.4\nA2,Coffee,80,abc,0.25\n");
        let err = DataLoader::new(Locale::En).load_products(file.path()).unwrap_err();
        match err {
            LoaderError::InvalidValue { column, row } => {
                assert_eq!(column, "price");
                assert_eq!(row, 2);
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_values_are_accepted() {
        let file = csv_file("id,name,volume,price,margin\nA1,Tea,-5,25.0,1.7\n");
        let products = DataLoader::new(Locale::En).load_products(file.path()).unwrap();
        assert_eq!(products[0].volume, -5.0);
        assert_eq!(products[0].margin, 1.7);
    }
}
