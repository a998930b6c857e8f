//! Static Chart Renderer
//! Draws the four-quadrant bubble chart into an in-memory figure and writes it as PNG.
//!
//! Layering (back to front):
//! 1. Translucent quadrant backgrounds, padded bounds to the median split lines
//! 2. Dashed median lines
//! 3. Quadrant captions in the quadrant color
//! 4. Bubbles grouped by quadrant, area proportional to revenue
//! 5. Product name beside each bubble
//! 6. Axis descriptions, title, and a hand-built legend to the right of the plot

use crate::config::RenderConfig;
use crate::data::{ClassifiedTable, Locale};
use crate::stats::{Quadrant, StatsCalculator};
use image::{imageops, ImageFormat, Rgb, RgbImage};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::element::DashedPathElement;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::{Path, PathBuf};
use thiserror::Error;

// Colors
const SPLIT_LINE: RGBColor = RGBColor(0x7f, 0x7f, 0x7f);
const POINT_LABEL: RGBColor = RGBColor(0x33, 0x33, 0x33);
const BACKGROUND_PX: Rgb<u8> = Rgb([255, 255, 255]);

/// Whitespace kept around the content when trimming, in inches.
const TRIM_PAD_IN: f64 = 0.1;

/// Dash and gap length of the median lines, in points.
const SPLIT_DASH_PT: f64 = 3.7;
const SPLIT_GAP_PT: f64 = 1.6;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Chart drawing failed: {0}")]
    Draw(String),
    #[error("Chart buffer does not match the figure size")]
    Buffer,
    #[error("Failed to save chart to {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Draw(err.to_string())
    }
}

/// Locale-specific chart text.
struct ChartText {
    title: &'static str,
    x_desc: &'static str,
    y_desc: &'static str,
    legend_title: &'static str,
}

impl ChartText {
    fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::Zh => ChartText {
                title: "四象限气泡图",
                x_desc: "价格&利润（左高右低，X = 1 - minmax(单位利润)）",
                y_desc: "需求&销量（Y = minmax(月销量)）",
                legend_title: "象限含义",
            },
            Locale::En => ChartText {
                title: "Four-Quadrant Bubble Chart",
                x_desc: "Price & profit (high on the left, X = 1 - minmax(unit profit))",
                y_desc: "Demand & volume (Y = minmax(monthly volume))",
                legend_title: "Quadrants",
            },
        }
    }
}

/// Axis ranges and median split of the plot, in data units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotBounds {
    pub x_lo: f64,
    pub x_hi: f64,
    pub y_lo: f64,
    pub y_hi: f64,
    pub x_mid: f64,
    pub y_mid: f64,
}

impl PlotBounds {
    /// Observed X/Y range widened by `padding` on every side.
    pub fn from_table(table: &ClassifiedTable, padding: f64) -> Self {
        let (x_min, x_max) = StatsCalculator::bounds(&table.xs()).unwrap_or((0.0, 1.0));
        let (y_min, y_max) = StatsCalculator::bounds(&table.ys()).unwrap_or((0.0, 1.0));
        Self {
            x_lo: x_min - padding,
            x_hi: x_max + padding,
            y_lo: y_min - padding,
            y_hi: y_max + padding,
            x_mid: table.x_median,
            y_mid: table.y_median,
        }
    }

    /// Opposite corners of a quadrant's background rectangle.
    pub fn quadrant_rect(&self, quadrant: Quadrant) -> [(f64, f64); 2] {
        let (x0, x1) = if quadrant.is_high_profit() {
            (self.x_lo, self.x_mid)
        } else {
            (self.x_mid, self.x_hi)
        };
        let (y0, y1) = if quadrant.is_high_volume() {
            (self.y_mid, self.y_hi)
        } else {
            (self.y_lo, self.y_mid)
        };
        [(x0, y0), (x1, y1)]
    }

    pub fn quadrant_center(&self, quadrant: Quadrant) -> (f64, f64) {
        let [(x0, y0), (x1, y1)] = self.quadrant_rect(quadrant);
        ((x0 + x1) / 2.0, (y0 + y1) / 2.0)
    }
}

/// Marker radius in pixels. Area (pt²) scales linearly with revenue, floored at the minimum.
pub fn marker_radius(revenue: f64, max_revenue: f64, config: &RenderConfig) -> u32 {
    let area = if max_revenue > 0.0 {
        (revenue / max_revenue * config.max_marker_area).max(config.min_marker_area)
    } else {
        config.min_marker_area
    };
    // area is the squared marker diameter in points
    let radius_px = config.pt_to_px(area.sqrt() / 2.0);
    radius_px.round().max(1.0) as u32
}

fn quadrant_color(quadrant: Quadrant) -> RGBColor {
    let (r, g, b) = quadrant.rgb();
    RGBColor(r, g, b)
}

fn font(config: &RenderConfig, locale: Locale, size_pt: f64) -> FontDesc<'_> {
    FontDesc::new(
        FontFamily::from(config.font_family_for(locale)),
        config.pt_to_px(size_pt),
        FontStyle::Normal,
    )
}

/// An explicit figure: owns its pixel buffer for the duration of one render.
///
/// The plot area is `width_in` x `height_in` inches at `dpi`; the legend column
/// is appended on the right. Consuming the figure via [`BubbleFigure::into_image`]
/// or [`BubbleFigure::save`] releases the buffer.
pub struct BubbleFigure {
    config: RenderConfig,
    locale: Locale,
    width: u32,
    height: u32,
    plot_width: u32,
    buffer: Vec<u8>,
}

impl BubbleFigure {
    pub fn new(config: &RenderConfig, locale: Locale) -> Self {
        let plot_width = config.in_to_px(config.width_in);
        let width = plot_width + config.in_to_px(config.legend_width_in);
        let height = config.in_to_px(config.height_in);
        Self {
            config: config.clone(),
            locale,
            width,
            height,
            plot_width,
            buffer: vec![255; width as usize * height as usize * 3],
        }
    }

    /// Untrimmed canvas size in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Render a table into a trimmed image without touching the filesystem.
    pub fn render(table: &ClassifiedTable, config: &RenderConfig, locale: Locale) -> Result<RgbImage, RenderError> {
        let mut figure = Self::new(config, locale);
        figure.draw(table)?;
        figure.into_image()
    }

    /// Draw every layer of the chart into the buffer.
    pub fn draw(&mut self, table: &ClassifiedTable) -> Result<(), RenderError> {
        let config = &self.config;
        let text = ChartText::for_locale(self.locale);

        let root =
            BitMapBackend::with_buffer(&mut self.buffer, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let (plot_area, legend_area) = root.split_horizontally(self.plot_width);
        Self::draw_plot(&plot_area, table, config, self.locale, &text)?;
        Self::draw_legend(&legend_area, config, self.locale, &text)?;

        root.present()?;
        Ok(())
    }

    fn draw_plot(
        area: &DrawingArea<BitMapBackend<'_>, Shift>,
        table: &ClassifiedTable,
        config: &RenderConfig,
        locale: Locale,
        text: &ChartText,
    ) -> Result<(), RenderError> {
        let bounds = PlotBounds::from_table(table, config.axis_padding);
        log::debug!("Plot bounds {:?}", bounds);

        let mut chart = ChartBuilder::on(area)
            .caption(text.title, font(config, locale, 12.0))
            .margin(config.pt_to_px(6.0).round() as u32)
            .x_label_area_size(config.pt_to_px(32.0).round() as u32)
            .y_label_area_size(config.pt_to_px(40.0).round() as u32)
            .build_cartesian_2d(bounds.x_lo..bounds.x_hi, bounds.y_lo..bounds.y_hi)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(6)
            .y_labels(6)
            .x_label_formatter(&|v| format!("{:.2}", v))
            .y_label_formatter(&|v| format!("{:.2}", v))
            .label_style(font(config, locale, 8.0))
            .x_desc(text.x_desc)
            .y_desc(text.y_desc)
            .axis_desc_style(font(config, locale, 10.0))
            .draw()?;

        // 1. quadrant backgrounds
        chart.draw_series(Quadrant::ALL.iter().map(|&q| {
            Rectangle::new(
                bounds.quadrant_rect(q),
                quadrant_color(q).mix(config.background_alpha).filled(),
            )
        }))?;

        // 2. median split lines
        let split_style = SPLIT_LINE.stroke_width(1);
        let dash = config.pt_to_px(SPLIT_DASH_PT).round().max(1.0) as u32;
        let gap = config.pt_to_px(SPLIT_GAP_PT).round().max(1.0) as u32;
        let split_lines = [
            vec![(bounds.x_mid, bounds.y_lo), (bounds.x_mid, bounds.y_hi)],
            vec![(bounds.x_lo, bounds.y_mid), (bounds.x_hi, bounds.y_mid)],
        ];
        chart.draw_series(
            split_lines
                .into_iter()
                .map(|points| DashedPathElement::new(points, dash, gap, split_style)),
        )?;

        // 3. quadrant captions
        let line_gap = config.pt_to_px(7.0).round() as i32;
        for q in Quadrant::ALL {
            let (name, description) = q.caption(locale);
            let style = font(config, locale, 10.0)
                .color(&quadrant_color(q).mix(0.85))
                .pos(Pos::new(HPos::Center, VPos::Center));
            chart.draw_series(std::iter::once(
                EmptyElement::at(bounds.quadrant_center(q))
                    + Text::new(name, (0, -line_gap), style.clone())
                    + Text::new(description, (0, line_gap), style),
            ))?;
        }

        // 4. bubbles, one series per quadrant
        let max_revenue = table.max_revenue();
        let edge = WHITE.stroke_width(1);
        for q in Quadrant::ALL {
            let fill = quadrant_color(q).mix(config.marker_alpha).filled();
            chart.draw_series(table.rows_in(q).map(|row| {
                let radius = marker_radius(row.revenue, max_revenue, config);
                EmptyElement::at((row.x, row.y))
                    + Circle::new((0, 0), radius, fill)
                    + Circle::new((0, 0), radius, edge)
            }))?;
        }

        // 5. product names, nudged up and right of the marker center
        let offset = config.pt_to_px(config.label_offset_pt).round() as i32;
        let label_style = font(config, locale, 8.0)
            .color(&POINT_LABEL)
            .pos(Pos::new(HPos::Left, VPos::Bottom));
        chart.draw_series(table.rows.iter().map(|row| {
            EmptyElement::at((row.x, row.y))
                + Text::new(row.product.name.clone(), (offset, -offset), label_style.clone())
        }))?;

        Ok(())
    }

    fn draw_legend(
        area: &DrawingArea<BitMapBackend<'_>, Shift>,
        config: &RenderConfig,
        locale: Locale,
        text: &ChartText,
    ) -> Result<(), RenderError> {
        let left = config.pt_to_px(8.0).round() as i32;
        let row_height = config.pt_to_px(18.0).round() as i32;
        let dot = config.pt_to_px(5.0).round().max(1.0) as u32;
        let anchor = Pos::new(HPos::Left, VPos::Center);
        // line up with the top of the axes, below the caption
        let mut y = config.pt_to_px(34.0).round() as i32;

        area.draw(&Text::new(
            text.legend_title,
            (left, y),
            font(config, locale, 10.0).color(&BLACK).pos(anchor),
        ))?;
        y += row_height;

        for q in Quadrant::ALL {
            let dot_x = left + dot as i32;
            area.draw(&Circle::new((dot_x, y), dot, quadrant_color(q).filled()))?;
            area.draw(&Text::new(
                q.legend_label(locale),
                (dot_x + dot as i32 + left / 2, y),
                font(config, locale, 9.0).color(&BLACK).pos(anchor),
            ))?;
            y += row_height;
        }

        Ok(())
    }

    /// Finish the figure: trim surrounding whitespace and hand back the image.
    pub fn into_image(self) -> Result<RgbImage, RenderError> {
        let pad = self.config.in_to_px(TRIM_PAD_IN);
        let image =
            RgbImage::from_raw(self.width, self.height, self.buffer).ok_or(RenderError::Buffer)?;
        Ok(trim_to_content(&image, pad))
    }

    /// Finish the figure and write it as PNG.
    pub fn save(self, path: &Path) -> Result<(), RenderError> {
        let image = self.into_image()?;
        save_png(&image, path)
    }
}

/// Crop an image to the bounding box of its non-background pixels plus `pad`.
pub fn trim_to_content(image: &RgbImage, pad: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    let mut min = (u32::MAX, u32::MAX);
    let mut max = (0u32, 0u32);
    let mut found = false;

    for (x, y, pixel) in image.enumerate_pixels() {
        if *pixel != BACKGROUND_PX {
            found = true;
            min = (min.0.min(x), min.1.min(y));
            max = (max.0.max(x), max.1.max(y));
        }
    }

    if !found {
        return image.clone();
    }

    let x0 = min.0.saturating_sub(pad);
    let y0 = min.1.saturating_sub(pad);
    let x1 = max.0.saturating_add(pad + 1).min(width);
    let y1 = max.1.saturating_add(pad + 1).min(height);
    imageops::crop_imm(image, x0, y0, x1 - x0, y1 - y0).to_image()
}

/// Write an image as lossless PNG.
pub fn save_png(image: &RgbImage, path: &Path) -> Result<(), RenderError> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| RenderError::Save {
            path: path.to_path_buf(),
            source,
        })?;
    log::debug!(
        "Wrote {}x{} chart to {}",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(())
}
