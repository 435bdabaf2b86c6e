mod series;

pub use series::{max_count, series_total};
