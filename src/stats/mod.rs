//! Stats module - normalization, medians and quadrant assignment

mod calculator;
mod quadrant;

pub use calculator::{StatsCalculator, DEGENERATE_VALUE};
pub use quadrant::Quadrant;
