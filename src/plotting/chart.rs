use lru::LruCache;
use once_cell::sync::Lazy;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::styles::{ChartStyle, ChartTheme};
use crate::app::App;
use crate::types::{Category, CountSeries};

type PlotError = Box<dyn std::error::Error + Send + Sync>;

// Rendered chart cache with a 5-minute expiration. This caches pixels only;
// every selection change still issues its own backend fetch.
static CHART_CACHE: Lazy<Mutex<LruCache<ChartCacheKey, (Vec<u8>, Instant)>>> =
    Lazy::new(|| Mutex::new(LruCache::new(NonZeroUsize::new(10).unwrap())));

const CHART_CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Hash, Eq, PartialEq)]
struct ChartCacheKey {
    repository: String,
    category: Category,
    data_hash: u64,
}

impl ChartCacheKey {
    fn new(app: &App) -> Self {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        for (_, data, _) in category_series(app) {
            data.hash(&mut hasher);
        }

        Self {
            repository: app.selection.repository.clone(),
            category: app.selection.category,
            data_hash: hasher.finish(),
        }
    }
}

/// Monthly series to draw for the current category, with legend names and
/// colors. Issues carry two series, everything else one.
fn category_series(app: &App) -> Vec<(&'static str, &CountSeries, RGBAColor)> {
    let theme = ChartTheme::default();
    match app.selection.category {
        Category::Issues => vec![
            ("Created", &app.stats.created, theme.created_color),
            ("Closed", &app.stats.closed, theme.closed_color),
        ],
        category => vec![(category.label(), app.stats.series(category), theme.bar_color)],
    }
}

/// Render the bar chart for the app's current category to `app.chart_path`.
pub fn generate_chart(app: &App) -> Result<(), PlotError> {
    let key = ChartCacheKey::new(app);
    if let Ok(mut cache) = CHART_CACHE.lock() {
        if let Some((bytes, stamp)) = cache.get(&key) {
            if stamp.elapsed() < CHART_CACHE_TTL {
                std::fs::write(&app.chart_path, bytes)?;
                return Ok(());
            }
        }
    }

    {
        let root = BitMapBackend::new(&app.chart_path, (900, 420)).into_drawing_area();
        draw_chart_internal(app, &root)?;
        root.present()?;
    }

    let bytes = std::fs::read(&app.chart_path)?;
    if let Ok(mut cache) = CHART_CACHE.lock() {
        cache.put(key, (bytes, Instant::now()));
    }
    Ok(())
}

/// Internal function that draws onto an already-open drawing area.
pub fn draw_chart_internal(
    app: &App,
    root: &DrawingArea<BitMapBackend, Shift>,
) -> Result<(), PlotError> {
    let theme = ChartTheme::default();
    let style = ChartStyle::default();
    root.fill(&theme.background_color)?;

    let series = category_series(app);
    let slots = series.iter().map(|(_, data, _)| data.len()).max().unwrap_or(0);
    let peak = series
        .iter()
        .map(|(_, data, _)| crate::utils::max_count(data))
        .max()
        .unwrap_or(0);

    // Month labels come from the longest series; shorter series simply leave
    // their trailing slots empty.
    let labels: Vec<String> = series
        .iter()
        .max_by_key(|(_, data, _)| data.len())
        .map(|(_, data, _)| data.iter().map(|(month, _)| month.clone()).collect())
        .unwrap_or_default();

    let mut chart = ChartBuilder::on(root)
        .caption(
            format!(
                "Monthly {} for {} in last 1 year",
                app.selection.category.label(),
                app.repository_name()
            ),
            ("sans-serif", style.font_size + 10)
                .into_font()
                .color(&theme.text_color),
        )
        .margin(style.margin)
        .set_all_label_area_size(style.label_area_size)
        .build_cartesian_2d(
            0f64..slots.max(1) as f64,
            0f64..(peak.max(1) as f64 * 1.1),
        )?;

    let labels_clone = labels.clone();
    chart
        .configure_mesh()
        .light_line_style(TRANSPARENT)
        .bold_line_style(theme.grid_color)
        .axis_style(theme.axis_color)
        .label_style(
            ("sans-serif", style.font_size)
                .into_font()
                .color(&theme.text_color),
        )
        .x_labels(slots.clamp(1, 12))
        .x_label_formatter(&move |x: &f64| {
            let idx = *x as usize;
            labels_clone.get(idx).cloned().unwrap_or_default()
        })
        .x_label_style(
            ("sans-serif", style.font_size)
                .into_font()
                .color(&theme.text_color)
                .transform(FontTransform::Rotate90)
                .pos(Pos::new(HPos::Right, VPos::Center)),
        )
        .y_label_formatter(&|y| {
            if y.abs() >= 1_000_000.0 {
                format!("{:.1}M", y / 1_000_000.0)
            } else if y.abs() >= 1_000.0 {
                format!("{:.1}K", y / 1_000.0)
            } else {
                format!("{:.0}", y)
            }
        })
        .draw()?;

    // Grouped bars: each month slot is split evenly between the series.
    let group = series.len() as f64;
    for (idx, (name, data, color)) in series.iter().enumerate() {
        let color = *color;
        let offset = idx as f64 / group;
        let width = 1.0 / group;
        chart
            .draw_series(data.iter().enumerate().map(|(i, (_, count))| {
                let x0 = i as f64 + offset + style.bar_gap;
                let x1 = i as f64 + offset + width - style.bar_gap;
                Rectangle::new([(x0, 0.0), (x1, *count as f64)], color.filled())
            }))?
            .label(*name)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    if series.len() > 1 {
        chart
            .configure_series_labels()
            .border_style(theme.axis_color)
            .label_font(
                ("sans-serif", style.font_size)
                    .into_font()
                    .color(&theme.text_color),
            )
            .draw()?;
    }

    Ok(())
}
