//! Render configuration: figure geometry, marker scaling and output names.

use crate::data::Locale;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Font family used for zh text when none is configured.
pub const CJK_FONT_FAMILY: &str = "Noto Sans CJK SC";
/// Font family used for en text when none is configured.
pub const LATIN_FONT_FAMILY: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Chart and export settings. Every field has a default, so a JSON file only
/// needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Plot area width in inches
    pub width_in: f64,
    /// Plot area height in inches
    pub height_in: f64,
    /// Extra width in inches reserved to the right for the legend
    pub legend_width_in: f64,
    pub dpi: u32,
    /// Padding added beyond the observed X/Y range, in data units
    pub axis_padding: f64,
    /// Marker area (pt²) of the highest-revenue product
    pub max_marker_area: f64,
    /// Lower bound on marker area (pt²)
    pub min_marker_area: f64,
    pub background_alpha: f64,
    pub marker_alpha: f64,
    /// Offset of point labels up and to the right, in points
    pub label_offset_pt: f64,
    /// Font for every chart text; unset picks a family that covers the locale's script
    pub font_family: Option<String>,
    pub csv_file_name: String,
    pub chart_file_name: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width_in: 8.0,
            height_in: 6.0,
            legend_width_in: 3.0,
            dpi: 160,
            axis_padding: 0.05,
            max_marker_area: 800.0,
            min_marker_area: 50.0,
            background_alpha: 0.06,
            marker_alpha: 0.75,
            label_offset_pt: 4.0,
            font_family: None,
            csv_file_name: "bcg_with_indices.csv".to_string(),
            chart_file_name: "bcg_plot.png".to_string(),
        }
    }
}

impl RenderConfig {
    /// Load overrides from a JSON file and validate the result.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RenderConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        log::debug!("Loaded render config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        for (field, value) in [
            ("width_in", self.width_in),
            ("height_in", self.height_in),
            ("max_marker_area", self.max_marker_area),
            ("min_marker_area", self.min_marker_area),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, format!("must be positive, got {value}")));
            }
        }
        if !(self.legend_width_in.is_finite() && self.legend_width_in >= 0.0) {
            return Err(invalid("legend_width_in", "must be zero or positive"));
        }
        if self.dpi == 0 {
            return Err(invalid("dpi", "must be positive"));
        }
        // a single-record batch has zero X/Y range; the padding alone spans the axes
        if !(self.axis_padding.is_finite() && self.axis_padding > 0.0) {
            return Err(invalid("axis_padding", "must be positive"));
        }
        if self.min_marker_area > self.max_marker_area {
            return Err(invalid(
                "min_marker_area",
                format!(
                    "{} exceeds max_marker_area {}",
                    self.min_marker_area, self.max_marker_area
                ),
            ));
        }
        for (field, value) in [
            ("background_alpha", self.background_alpha),
            ("marker_alpha", self.marker_alpha),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, format!("must be within [0, 1], got {value}")));
            }
        }
        if self.font_family.as_deref().is_some_and(|f| f.trim().is_empty()) {
            return Err(invalid("font_family", "must not be empty when set"));
        }
        if self.csv_file_name.trim().is_empty() {
            return Err(invalid("csv_file_name", "must not be empty"));
        }
        if self.chart_file_name.trim().is_empty() {
            return Err(invalid("chart_file_name", "must not be empty"));
        }
        Ok(())
    }

    /// Font family for chart text in `locale`. Plotters falls back to the system
    /// sans-serif when the family is not installed.
    pub fn font_family_for(&self, locale: Locale) -> &str {
        match (&self.font_family, locale) {
            (Some(family), _) => family,
            (None, Locale::Zh) => CJK_FONT_FAMILY,
            (None, Locale::En) => LATIN_FONT_FAMILY,
        }
    }

    /// Convert a length in points to pixels at the configured dpi.
    pub fn pt_to_px(&self, points: f64) -> f64 {
        points * self.dpi as f64 / 72.0
    }

    /// Convert a length in inches to whole pixels at the configured dpi.
    pub fn in_to_px(&self, inches: f64) -> u32 {
        (inches * self.dpi as f64).round() as u32
    }
}
