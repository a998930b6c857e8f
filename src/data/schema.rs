//! Record Schema Module
//! Typed product record and the locale-specific column names it is read from.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Language of column headers, category labels and chart text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Simplified Chinese (source locale of the input sheets)
    #[default]
    Zh,
    /// English
    En,
}

impl Locale {
    /// Column names used for input and export in this locale.
    pub fn columns(self) -> &'static ColumnSchema {
        match self {
            Locale::Zh => &ColumnSchema::ZH,
            Locale::En => &ColumnSchema::EN,
        }
    }
}

/// Header names for the five input columns and the five derived export columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    pub id: &'static str,
    pub name: &'static str,
    pub volume: &'static str,
    pub price: &'static str,
    pub margin: &'static str,
    pub unit_profit: &'static str,
    pub revenue: &'static str,
    pub x: &'static str,
    pub y: &'static str,
    pub category: &'static str,
}

impl ColumnSchema {
    pub const ZH: ColumnSchema = ColumnSchema {
        id: "商品ID",
        name: "商品名",
        volume: "月销量",
        price: "平均价格",
        margin: "毛利率",
        unit_profit: "单位利润",
        revenue: "销售额(元)",
        x: "X",
        y: "Y",
        category: "象限",
    };

    pub const EN: ColumnSchema = ColumnSchema {
        id: "id",
        name: "name",
        volume: "volume",
        price: "price",
        margin: "margin",
        unit_profit: "unit_profit",
        revenue: "revenue",
        x: "X",
        y: "Y",
        category: "category",
    };

    /// Columns that must be present in the input, in validation order.
    pub fn required(&self) -> [&'static str; 5] {
        [self.id, self.name, self.volume, self.price, self.margin]
    }

    /// Full export header in fixed order.
    pub fn export_header(&self) -> [&'static str; 10] {
        [
            self.id,
            self.name,
            self.volume,
            self.price,
            self.margin,
            self.unit_profit,
            self.revenue,
            self.x,
            self.y,
            self.category,
        ]
    }
}

/// One product row as read from the input sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Monthly sales volume
    pub volume: f64,
    /// Average price
    pub price: f64,
    /// Gross margin rate as a fraction
    pub margin: f64,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, volume: f64, price: f64, margin: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            volume,
            price,
            margin,
        }
    }

    /// Profit earned per unit sold.
    pub fn unit_profit(&self) -> f64 {
        self.price * self.margin
    }

    /// Sales amount, used only for bubble sizing.
    pub fn revenue(&self) -> f64 {
        self.volume * self.price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_header_order() {
        let header = ColumnSchema::EN.export_header();
        assert_eq!(
            header,
            ["id", "name", "volume", "price", "margin", "unit_profit", "revenue", "X", "Y", "category"]
        );
        assert_eq!(&header[..5], &ColumnSchema::EN.required()[..]);
    }

    #[test]
    fn test_zh_is_default_locale() {
        assert_eq!(Locale::default(), Locale::Zh);
        assert_eq!(Locale::default().columns().margin, "毛利率");
    }

    #[test]
    fn test_derived_fields() {
        let p = Product::new("A1", "Tea", 120.0, 25.0, 0.4);
        assert!((p.unit_profit() - 10.0).abs() < 1e-12);
        assert!((p.revenue() - 3000.0).abs() < 1e-12);
    }
}
