use eframe::App as EApp;
use egui::TextureHandle;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use crate::client::AnalyticsClient;
use crate::types::{Category, FetchState, ForecastModel, RepoStats, Selection};

/// A repository offered in the sidebar: backend key and display name.
pub struct RepoEntry {
    pub key: &'static str,
    pub name: &'static str,
}

/// Repositories the dashboard reports on.
pub const REPOSITORIES: [RepoEntry; 8] = [
    RepoEntry { key: "meta-llama/llama3", name: "Llama 3" },
    RepoEntry { key: "ollama/ollama", name: "Ollama" },
    RepoEntry { key: "langchain-ai/langchain", name: "LangChain" },
    RepoEntry { key: "langchain-ai/langgraph", name: "LangGraph" },
    RepoEntry { key: "microsoft/autogen", name: "Microsoft AutoGen" },
    RepoEntry { key: "openai/openai-cookbook", name: "OpenAI Cookbook" },
    RepoEntry { key: "elastic/elasticsearch", name: "Elasticsearch" },
    RepoEntry { key: "milvus-io/pymilvus", name: "PyMilvus" },
];

/// Main application state: the active selection, the latest fetch outcome,
/// and the textures derived from it.
///
/// The selection mutators and fetch bookkeeping are UI-agnostic; only the
/// texture fields tie this struct to egui.
pub struct App {
    pub selection: Selection,
    pub fetch_state: FetchState,
    pub stats: RepoStats,
    /// Generation token of the most recently issued fetch. Responses carrying
    /// an older token are dropped, so the last issued request always wins.
    request_seq: u64,
    /// Where the rendered bar chart PNG is written before texture upload.
    pub chart_path: String,
    pub chart_texture: Option<TextureHandle>,
    pub chart_needs_update: bool,
    /// Downloaded forecast image bytes keyed by URL. An empty entry marks a
    /// download or decode failure so the UI shows a placeholder instead of
    /// retrying forever.
    pub image_bytes: HashMap<String, Vec<u8>>,
    pub image_textures: HashMap<String, TextureHandle>,
    /// URLs already handed to a download task in this generation.
    pub requested_images: HashSet<String>,
}

impl App {
    /// Replace the active repository. Returns true if the value changed.
    pub fn select_repository(&mut self, key: &str) -> bool {
        if self.selection.repository == key {
            return false;
        }
        self.selection.repository = key.to_string();
        true
    }

    /// Replace the active category. Returns true if the value changed.
    pub fn select_category(&mut self, category: Category) -> bool {
        if self.selection.category == category {
            return false;
        }
        self.selection.category = category;
        true
    }

    /// Replace the active forecast model. Returns true if the value changed.
    pub fn select_model(&mut self, model: ForecastModel) -> bool {
        if self.selection.model == model {
            return false;
        }
        self.selection.model = model;
        true
    }

    /// Mark a new fetch as the latest issued and return its generation token.
    pub fn begin_fetch(&mut self) -> u64 {
        self.request_seq += 1;
        self.fetch_state = FetchState::Loading;
        self.request_seq
    }

    /// Apply a fetch outcome.
    ///
    /// Outcomes from superseded requests are dropped: if the selection
    /// changed twice in quick succession, a slow response to the first
    /// request can never overwrite the result of the second.
    pub fn complete_fetch(&mut self, seq: u64, outcome: Result<RepoStats, crate::client::ClientError>) {
        if seq != self.request_seq {
            debug!(seq, latest = self.request_seq, "dropping stale fetch response");
            return;
        }

        match outcome {
            Ok(stats) => {
                self.stats = stats;
                self.fetch_state = FetchState::Ready;
            }
            Err(err) => {
                warn!(error = %err, repository = %self.selection.repository, "stats fetch failed");
                self.stats = RepoStats::default();
                self.fetch_state = FetchState::Failed(err.to_string());
            }
        }

        // The previous result's textures no longer match the data.
        self.chart_texture = None;
        self.chart_needs_update = true;
        self.image_bytes.clear();
        self.image_textures.clear();
        self.requested_images.clear();
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.fetch_state, FetchState::Loading)
    }

    /// Display name of the selected repository.
    pub fn repository_name(&self) -> &str {
        REPOSITORIES
            .iter()
            .find(|repo| repo.key == self.selection.repository)
            .map(|repo| repo.name)
            .unwrap_or(&self.selection.repository)
    }
}

impl Default for App {
    fn default() -> Self {
        Self {
            selection: Selection {
                repository: REPOSITORIES[0].key.to_string(),
                category: Category::Issues,
                model: ForecastModel::Lstm,
            },
            fetch_state: FetchState::Idle,
            stats: RepoStats::default(),
            request_seq: 0,
            chart_path: "activity_chart.png".to_string(),
            chart_texture: None,
            chart_needs_update: false,
            image_bytes: HashMap::new(),
            image_textures: HashMap::new(),
            requested_images: HashSet::new(),
        }
    }
}

/// Issue a fetch for the app's current selection.
///
/// The response is applied through [`App::complete_fetch`], which enforces
/// last-request-wins ordering.
pub fn spawn_fetch(app: &mut App, app_arc: Arc<Mutex<App>>, client: Arc<AnalyticsClient>) {
    let seq = app.begin_fetch();
    let selection = app.selection.clone();

    tokio::spawn(async move {
        let outcome = client.fetch_stats(&selection).await;
        if let Ok(mut app) = app_arc.lock() {
            app.complete_fetch(seq, outcome);
        } else {
            warn!("app state lock poisoned; dropping fetch result");
        }
    });
}

/// Start downloads for any forecast images of the current category that have
/// not been requested yet. Failed downloads leave an empty byte entry so the
/// UI falls back to a placeholder.
pub fn spawn_image_fetches(app: &mut App, app_arc: &Arc<Mutex<App>>, client: &Arc<AnalyticsClient>) {
    let urls: Vec<String> = app
        .stats
        .forecast_sections(app.selection.category)
        .iter()
        .flat_map(|(_, images)| images.present())
        .map(str::to_string)
        .collect();

    for url in urls {
        if !app.requested_images.insert(url.clone()) {
            continue;
        }
        let app_arc = Arc::clone(app_arc);
        let client = Arc::clone(client);
        tokio::spawn(async move {
            let bytes = match client.fetch_image(&url).await {
                Ok(bytes) => bytes,
                Err(err) => {
                    warn!(error = %err, url = %url, "forecast image fetch failed");
                    Vec::new()
                }
            };
            if let Ok(mut app) = app_arc.lock() {
                app.image_bytes.insert(url, bytes);
            }
        });
    }
}

/// Thread-safe wrapper around App for use with eframe
pub struct AppWrapper {
    pub app: Arc<Mutex<App>>,
    pub client: Arc<AnalyticsClient>,
}

impl EApp for AppWrapper {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Ok(mut app) = self.app.lock() {
            super::ui::draw_ui(
                &mut app,
                ctx,
                Arc::clone(&self.app),
                Arc::clone(&self.client),
            );
        } else {
            tracing::error!("failed to acquire app lock in update");
        }
    }
}
