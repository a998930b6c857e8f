//! Data Processor Module
//! Derives unit profit, revenue and the normalized X/Y indices, then assigns quadrants.

use super::schema::Product;
use crate::stats::{Quadrant, StatsCalculator};
use thiserror::Error;

/// Decimal places kept for derived values in the export.
pub const OUTPUT_DECIMALS: i32 = 3;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Cannot classify an empty batch: min-max and median are undefined")]
    EmptyInput,
}

/// A product augmented with its derived fields. Values are unrounded.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedProduct {
    pub product: Product,
    pub unit_profit: f64,
    pub revenue: f64,
    /// 1 - minmax(unit profit); high profit sits on the left
    pub x: f64,
    /// minmax(volume)
    pub y: f64,
    pub quadrant: Quadrant,
}

impl ClassifiedProduct {
    /// Derived values rounded for presentation: (unit_profit, revenue, x, y).
    pub fn rounded(&self) -> (f64, f64, f64, f64) {
        (
            StatsCalculator::round_to(self.unit_profit, OUTPUT_DECIMALS),
            StatsCalculator::round_to(self.revenue, OUTPUT_DECIMALS),
            StatsCalculator::round_to(self.x, OUTPUT_DECIMALS),
            StatsCalculator::round_to(self.y, OUTPUT_DECIMALS),
        )
    }
}

/// The classified batch plus the median thresholds that split it.
#[derive(Debug, Clone)]
pub struct ClassifiedTable {
    pub rows: Vec<ClassifiedProduct>,
    pub x_median: f64,
    pub y_median: f64,
}

impl ClassifiedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows belonging to one quadrant, in input order.
    pub fn rows_in(&self, quadrant: Quadrant) -> impl Iterator<Item = &ClassifiedProduct> {
        self.rows.iter().filter(move |row| row.quadrant == quadrant)
    }

    /// Number of rows per quadrant, in [`Quadrant::ALL`] order.
    pub fn quadrant_counts(&self) -> [(Quadrant, usize); 4] {
        Quadrant::ALL.map(|q| (q, self.rows_in(q).count()))
    }

    /// Largest revenue in the batch.
    pub fn max_revenue(&self) -> f64 {
        self.rows
            .iter()
            .map(|row| row.revenue)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn xs(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.y).collect()
    }
}

/// Handles the batch-relative transformation from products to quadrants.
pub struct DataProcessor;

impl DataProcessor {
    /// Classify a batch. Normalization and medians are computed over the whole batch,
    /// so a product's quadrant depends on the rest of the batch.
    pub fn classify(products: Vec<Product>) -> Result<ClassifiedTable, ProcessorError> {
        if products.is_empty() {
            return Err(ProcessorError::EmptyInput);
        }

        let unit_profits: Vec<f64> = products.iter().map(Product::unit_profit).collect();
        let volumes: Vec<f64> = products.iter().map(|p| p.volume).collect();

        let xs: Vec<f64> = StatsCalculator::minmax(&unit_profits)
            .into_iter()
            .map(|v| 1.0 - v)
            .collect();
        let ys = StatsCalculator::minmax(&volumes);

        let x_median = StatsCalculator::median(&xs);
        let y_median = StatsCalculator::median(&ys);
        log::debug!("Quadrant split at X median {:.4}, Y median {:.4}", x_median, y_median);

        let rows = products
            .into_iter()
            .zip(unit_profits)
            .zip(xs.into_iter().zip(ys))
            .map(|((product, unit_profit), (x, y))| ClassifiedProduct {
                revenue: product.revenue(),
                unit_profit,
                x,
                y,
                quadrant: Quadrant::classify(x, y, x_median, y_median),
                product,
            })
            .collect();

        Ok(ClassifiedTable {
            rows,
            x_median,
            y_median,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn product(id: &str, volume: f64, price: f64, margin: f64) -> Product {
        Product::new(id, format!("item-{id}"), volume, price, margin)
    }

    #[test]
    fn test_empty_batch_fails() {
        assert!(matches!(
            DataProcessor::classify(Vec::new()),
            Err(ProcessorError::EmptyInput)
        ));
    }

    #[test]
    fn test_single_record_is_star() {
        let table = DataProcessor::classify(vec![product("a", 10.0, 5.0, 0.2)]).unwrap();
        let row = &table.rows[0];
        assert_eq!(row.x, 0.5);
        assert_eq!(row.y, 0.5);
        assert_eq!(table.x_median, 0.5);
        assert_eq!(table.y_median, 0.5);
        assert_eq!(row.quadrant, Quadrant::Star);
    }

    #[test]
    fn test_constant_volume_shares_y_side() {
        // unit profits 10, 20, 30, 40 with identical volumes
        let products = vec![
            product("a", 100.0, 100.0, 0.1),
            product("b", 100.0, 100.0, 0.2),
            product("c", 100.0, 100.0, 0.3),
            product("d", 100.0, 100.0, 0.4),
        ];
        let table = DataProcessor::classify(products).unwrap();

        assert!(table.rows.iter().all(|r| r.y == 0.5));
        assert!(table.rows.iter().all(|r| r.quadrant.is_high_volume()));

        let xs: Vec<f64> = table.rows.iter().map(|r| StatsCalculator::round_to(r.x, 6)).collect();
        assert_eq!(xs, vec![1.0, 0.666667, 0.333333, 0.0]);

        let quadrants: Vec<Quadrant> = table.rows.iter().map(|r| r.quadrant).collect();
        assert_eq!(
            quadrants,
            vec![Quadrant::CashCow, Quadrant::CashCow, Quadrant::Star, Quadrant::Star]
        );
    }

    #[test]
    fn test_median_is_not_fixed_half() {
        let products = vec![
            product("a", 0.0, 10.0, 0.1),
            product("b", 1.0, 10.0, 0.2),
            product("c", 2.0, 10.0, 0.3),
            product("d", 10.0, 10.0, 1.0),
        ];
        let table = DataProcessor::classify(products).unwrap();
        assert!((table.y_median - 0.15).abs() < 1e-12);
        assert!((table.x_median - (1.0 - 1.5 / 9.0)).abs() < 1e-12);
    }

    #[test]
    fn test_derived_fields_and_rounding() {
        let products = vec![product("a", 3.0, 9.99, 0.333), product("b", 7.0, 1.0, 0.5)];
        let table = DataProcessor::classify(products).unwrap();
        let (unit_profit, revenue, x, y) = table.rows[0].rounded();
        assert_eq!(unit_profit, 3.327);
        assert_eq!(revenue, 29.97);
        assert_eq!(x, 0.0);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn test_classification_uses_unrounded_values() {
        // X = 1 - margin here; d sits at 0.50004, just right of the 0.5 median
        let products = vec![
            product("a", 1.0, 1.0, 1.0),
            product("b", 2.0, 1.0, 0.8),
            product("c", 3.0, 1.0, 0.5),
            product("d", 4.0, 1.0, 0.49996),
            product("e", 5.0, 1.0, 0.0),
        ];
        let table = DataProcessor::classify(products).unwrap();
        assert_eq!(table.x_median, 0.5);

        let d = &table.rows[3];
        assert_eq!(d.rounded().2, 0.5);
        assert!(!d.quadrant.is_high_profit());
        assert!(table.rows[2].quadrant.is_high_profit());
    }

    #[test]
    fn test_quadrant_counts() {
        let products = vec![
            product("a", 10.0, 10.0, 0.9),
            product("b", 10.0, 10.0, 0.1),
            product("c", 1.0, 10.0, 0.9),
            product("d", 1.0, 10.0, 0.1),
        ];
        let table = DataProcessor::classify(products).unwrap();
        assert_eq!(
            table.quadrant_counts(),
            [
                (Quadrant::Star, 1),
                (Quadrant::CashCow, 1),
                (Quadrant::Niche, 1),
                (Quadrant::Dog, 1),
            ]
        );
        assert_eq!(table.max_revenue(), 100.0);
    }

    proptest! {
        #[test]
        fn prop_every_record_gets_one_quadrant(
            rows in prop::collection::vec((0.0f64..1e4, 0.0f64..500.0, 0.0f64..1.0), 1..40)
        ) {
            let products: Vec<Product> = rows
                .iter()
                .enumerate()
                .map(|(i, (v, p, m))| product(&i.to_string(), *v, *p, *m))
                .collect();
            let n = products.len();
            let table = DataProcessor::classify(products).unwrap();

            prop_assert_eq!(table.len(), n);
            let total: usize = table.quadrant_counts().iter().map(|(_, c)| c).sum();
            prop_assert_eq!(total, n);

            for row in &table.rows {
                prop_assert!((0.0..=1.0).contains(&row.x));
                prop_assert!((0.0..=1.0).contains(&row.y));
                prop_assert_eq!(row.quadrant.is_high_profit(), row.x <= table.x_median);
                prop_assert_eq!(row.quadrant.is_high_volume(), row.y >= table.y_median);
            }
        }
    }
}
