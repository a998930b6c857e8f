//! Statistics Calculator Module
//! Handles min-max normalization, medians and presentation rounding.

use statrs::statistics::Statistics;

/// Value assigned to every element of a column whose values are all equal.
pub const DEGENERATE_VALUE: f64 = 0.5;

/// Relative tolerance used to decide that a column is degenerate.
const REL_TOLERANCE: f64 = 1e-9;

/// Handles the column statistics the classifier depends on.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Observed (min, max) of a column, or `None` when it is empty.
    pub fn bounds(values: &[f64]) -> Option<(f64, f64)> {
        if values.is_empty() {
            return None;
        }
        Some((Statistics::min(values), Statistics::max(values)))
    }

    /// Linearly rescale a column to [0, 1] using its own min and max.
    ///
    /// A column whose min and max are (relatively) equal maps every value to
    /// [`DEGENERATE_VALUE`].
    pub fn minmax(values: &[f64]) -> Vec<f64> {
        let Some((min, max)) = Self::bounds(values) else {
            return Vec::new();
        };

        if Self::is_close(min, max) {
            return vec![DEGENERATE_VALUE; values.len()];
        }

        let range = max - min;
        values.iter().map(|v| (v - min) / range).collect()
    }

    /// Standard median: mean of the two middle values for even counts.
    pub fn median(values: &[f64]) -> f64 {
        let n = values.len();
        if n == 0 {
            return f64::NAN;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        }
    }

    /// Round to `decimals` places, ties to even on the scaled value.
    pub fn round_to(value: f64, decimals: i32) -> f64 {
        let factor = 10f64.powi(decimals);
        (value * factor).round_ties_even() / factor
    }

    fn is_close(a: f64, b: f64) -> bool {
        (a - b).abs() <= REL_TOLERANCE * a.abs().max(b.abs())
    }
}
