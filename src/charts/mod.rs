//! Charts module - Static bubble chart rendering

mod renderer;

pub use renderer::{marker_radius, save_png, trim_to_content, BubbleFigure, PlotBounds, RenderError};
