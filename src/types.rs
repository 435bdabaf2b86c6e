//! # Common Types
//!
//! This module contains the common types used throughout the application:
//! the user's active selection, the fetch lifecycle state, and the response
//! model of the analytics service.

use serde::{Deserialize, Serialize};

/// A data facet the analytics service can aggregate and forecast.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Issues,
    Pulls,
    Commits,
    Branches,
    Contributors,
    Releases,
}

impl Category {
    /// Every category, in tab order.
    pub const ALL: [Category; 6] = [
        Category::Issues,
        Category::Pulls,
        Category::Commits,
        Category::Branches,
        Category::Contributors,
        Category::Releases,
    ];

    /// Wire name sent to the analytics service.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Issues => "issues",
            Category::Pulls => "pulls",
            Category::Commits => "commits",
            Category::Branches => "branches",
            Category::Contributors => "contributors",
            Category::Releases => "releases",
        }
    }

    /// Human-readable tab label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Issues => "Issues",
            Category::Pulls => "Pull Requests",
            Category::Commits => "Commits",
            Category::Branches => "Branches",
            Category::Contributors => "Contributors",
            Category::Releases => "Releases",
        }
    }
}

/// The forecasting algorithm identifier sent to the analytics service.
///
/// The client does not interpret it beyond display labeling; the service
/// decides what each name means.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastModel {
    Lstm,
    Statsmodel,
    Prophet,
}

impl ForecastModel {
    /// Every model, in display order.
    pub const ALL: [ForecastModel; 3] = [
        ForecastModel::Lstm,
        ForecastModel::Statsmodel,
        ForecastModel::Prophet,
    ];

    /// Wire name sent to the analytics service.
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastModel::Lstm => "lstm",
            ForecastModel::Statsmodel => "statsmodel",
            ForecastModel::Prophet => "prophet",
        }
    }

    /// Label shown next to the radio button.
    pub fn label(&self) -> &'static str {
        match self {
            ForecastModel::Lstm => "LSTM (Deep Learning)",
            ForecastModel::Statsmodel => "Statsmodel (ARIMA)",
            ForecastModel::Prophet => "Prophet (Facebook)",
        }
    }

    /// Name of the underlying engine, used in forecast section headings.
    pub fn engine_name(&self) -> &'static str {
        match self {
            ForecastModel::Lstm => "Tensorflow and Keras LSTM",
            ForecastModel::Statsmodel => "Statsmodels ARIMA",
            ForecastModel::Prophet => "Prophet (Facebook)",
        }
    }

    /// Heading for the first forecast image: LSTM publishes a loss curve,
    /// the statistical models publish diagnostics plots.
    pub fn diagnostics_label(&self) -> &'static str {
        match self {
            ForecastModel::Lstm => "Loss",
            ForecastModel::Statsmodel | ForecastModel::Prophet => "Diagnostics",
        }
    }
}

/// The full set of choices driving one analytics request.
///
/// Invariant: exactly one value of each dimension is active at a time.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Selection {
    /// Opaque repository key, e.g. `ollama/ollama`.
    pub repository: String,
    pub category: Category,
    pub model: ForecastModel,
}

/// Lifecycle of the current analytics request.
///
/// Any selection change moves to `Loading`; completion moves to `Ready` on
/// success or `Failed` on transport/status error. A failed fetch keeps the
/// UI interactive, so picking a different selection retries implicitly.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// One monthly series of (month label, count) pairs, oldest first.
pub type CountSeries = Vec<(String, u64)>;

/// Forecast image references for one series.
///
/// The service omits a key when the corresponding render failed or was never
/// produced, so every field is optional and absent fields must fall back to
/// a placeholder rather than an error.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ImageUrls {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_loss_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lstm_generated_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_issues_data_image: Option<String>,
}

impl ImageUrls {
    /// Iterate over the URLs that are actually present.
    pub fn present(&self) -> impl Iterator<Item = &str> {
        self.model_loss_image_url
            .as_deref()
            .into_iter()
            .chain(self.lstm_generated_image_url.as_deref())
            .chain(self.all_issues_data_image.as_deref())
    }
}

/// Aggregated counts and forecast image references for one repository.
///
/// This is the response body of the analytics service. Every field defaults
/// to empty so a partial or empty payload deserializes cleanly; issues
/// contribute two series (`created` and `closed`), all other categories one.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoStats {
    pub created: CountSeries,
    pub closed: CountSeries,
    pub pulls: CountSeries,
    pub commits: CountSeries,
    pub branches: CountSeries,
    pub contributors: CountSeries,
    pub releases: CountSeries,
    #[serde(rename = "createdAtImageUrls")]
    pub created_image_urls: ImageUrls,
    #[serde(rename = "closedAtImageUrls")]
    pub closed_image_urls: ImageUrls,
    #[serde(rename = "pullsImageUrls")]
    pub pulls_image_urls: ImageUrls,
    #[serde(rename = "commitsImageUrls")]
    pub commits_image_urls: ImageUrls,
    #[serde(rename = "branchesImageUrls")]
    pub branches_image_urls: ImageUrls,
    #[serde(rename = "contributorsImageUrls")]
    pub contributors_image_urls: ImageUrls,
    #[serde(rename = "releasesImageUrls")]
    pub releases_image_urls: ImageUrls,
}

impl RepoStats {
    /// Primary monthly series for a category. Issues use the created series;
    /// the companion closed series is a separate field.
    pub fn series(&self, category: Category) -> &CountSeries {
        match category {
            Category::Issues => &self.created,
            Category::Pulls => &self.pulls,
            Category::Commits => &self.commits,
            Category::Branches => &self.branches,
            Category::Contributors => &self.contributors,
            Category::Releases => &self.releases,
        }
    }

    /// Forecast sections rendered for a category: a display subject plus its
    /// image record. Issues get two sections, everything else one.
    pub fn forecast_sections(&self, category: Category) -> Vec<(String, &ImageUrls)> {
        match category {
            Category::Issues => vec![
                ("Created Issues".to_string(), &self.created_image_urls),
                ("Closed Issues".to_string(), &self.closed_image_urls),
            ],
            Category::Pulls => vec![("Pull Requests".to_string(), &self.pulls_image_urls)],
            Category::Commits => vec![("Commits".to_string(), &self.commits_image_urls)],
            Category::Branches => {
                vec![("Branch Creation".to_string(), &self.branches_image_urls)]
            }
            Category::Contributors => {
                vec![("New Contributors".to_string(), &self.contributors_image_urls)]
            }
            Category::Releases => vec![("Releases".to_string(), &self.releases_image_urls)],
        }
    }

    /// True when no series carries any data points.
    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
            && self.closed.is_empty()
            && self.pulls.is_empty()
            && self.commits.is_empty()
            && self.branches.is_empty()
            && self.contributors.is_empty()
            && self.releases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_contract_payload() {
        let body = r#"{
            "created": [["2024-01", 5]],
            "closed": [],
            "createdAtImageUrls": { "model_loss_image_url": "https://x/img.png" }
        }"#;

        let stats: RepoStats = serde_json::from_str(body).unwrap();
        assert_eq!(stats.created, vec![("2024-01".to_string(), 5)]);
        assert!(stats.closed.is_empty());
        assert_eq!(
            stats.created_image_urls.model_loss_image_url.as_deref(),
            Some("https://x/img.png")
        );
        assert_eq!(stats.created_image_urls.lstm_generated_image_url, None);
        assert_eq!(stats.created_image_urls.all_issues_data_image, None);
        assert_eq!(stats.closed_image_urls, ImageUrls::default());
    }

    #[test]
    fn empty_payload_deserializes_to_empty_stats() {
        let stats: RepoStats = serde_json::from_str("{}").unwrap();
        assert!(stats.is_empty());
        for category in Category::ALL {
            assert!(stats.series(category).is_empty());
        }
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let stats: RepoStats =
            serde_json::from_str(r#"{"pulls": [["2024-02", 3]], "totalStars": 99}"#).unwrap();
        assert_eq!(stats.pulls, vec![("2024-02".to_string(), 3)]);
    }

    #[test]
    fn series_maps_each_category_to_its_field() {
        let stats = RepoStats {
            created: vec![("2024-01".to_string(), 1)],
            releases: vec![("2024-02".to_string(), 2)],
            ..RepoStats::default()
        };

        assert_eq!(stats.series(Category::Issues), &stats.created);
        assert_eq!(stats.series(Category::Releases), &stats.releases);
        assert!(stats.series(Category::Commits).is_empty());
    }

    #[test]
    fn issues_get_two_forecast_sections() {
        let stats = RepoStats::default();
        assert_eq!(stats.forecast_sections(Category::Issues).len(), 2);
        assert_eq!(stats.forecast_sections(Category::Pulls).len(), 1);
    }

    #[test]
    fn wire_names_are_lowercase() {
        assert_eq!(
            serde_json::to_string(&Category::Contributors).unwrap(),
            "\"contributors\""
        );
        assert_eq!(
            serde_json::to_string(&ForecastModel::Lstm).unwrap(),
            "\"lstm\""
        );
        assert_eq!(Category::Pulls.as_str(), "pulls");
        assert_eq!(ForecastModel::Statsmodel.as_str(), "statsmodel");
    }

    #[test]
    fn present_urls_skip_absent_fields() {
        let urls = ImageUrls {
            model_loss_image_url: Some("a".to_string()),
            lstm_generated_image_url: None,
            all_issues_data_image: Some("b".to_string()),
        };
        assert_eq!(urls.present().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(ImageUrls::default().present().count(), 0);
    }
}
