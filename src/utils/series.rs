/// Sum of the counts in a monthly (label, count) series.
///
/// The dashboard shows this next to each chart to make backend pagination
/// problems visible: a totalled series that is obviously short of the real
/// repository activity points at a truncated fetch on the service side.
pub fn series_total(series: &[(String, u64)]) -> u64 {
    series.iter().map(|(_, count)| *count).sum()
}

/// Largest count in a series, or zero when it is empty.
pub fn max_count(series: &[(String, u64)]) -> u64 {
    series.iter().map(|(_, count)| *count).max().unwrap_or(0)
}
