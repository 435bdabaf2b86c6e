use plotters::style::RGBAColor;

/// Chart theme configuration
pub struct ChartTheme {
    pub background_color: RGBAColor,
    pub text_color: RGBAColor,
    pub grid_color: RGBAColor,
    pub axis_color: RGBAColor,
    /// Fill for single-series bars.
    pub bar_color: RGBAColor,
    /// Fill for the created-issues series.
    pub created_color: RGBAColor,
    /// Fill for the closed-issues series.
    pub closed_color: RGBAColor,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background_color: RGBAColor(0, 0, 0, 0.94),
            text_color: RGBAColor(255, 255, 255, 0.8),
            grid_color: RGBAColor(255, 255, 255, 0.15),
            axis_color: RGBAColor(255, 255, 255, 0.8),
            bar_color: RGBAColor(100, 149, 237, 0.85),
            created_color: RGBAColor(52, 168, 83, 0.85),
            closed_color: RGBAColor(255, 165, 0, 0.85),
        }
    }
}

/// Chart style configuration
pub struct ChartStyle {
    pub font_size: u32,
    pub margin: u32,
    pub label_area_size: u32,
    /// Horizontal gap on each side of a bar, in slot units.
    pub bar_gap: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            font_size: 15,
            margin: 10,
            label_area_size: 50,
            bar_gap: 0.06,
        }
    }
}
