//! Bar-chart rendering for the monthly count series.
//!
//! Charts are rendered with plotters into a PNG that the UI uploads as an
//! egui texture, mirroring how the forecast images are displayed.

mod chart;
mod styles;

pub use chart::generate_chart;
pub use styles::{ChartStyle, ChartTheme};
