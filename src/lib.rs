//! # Repository Forecast Dashboard Library
//!
//! `gitcast` is a desktop dashboard for exploring GitHub repository activity
//! and the time-series forecasts produced by a companion analytics service.
//! The service aggregates monthly counts (issues, pull requests, commits,
//! branches, contributors, releases) and renders forecast images; this crate
//! is the client side: it owns the active selection, performs the
//! request/response orchestration, and draws the results with egui.
//!
//! ## Features
//!
//! - Repository, category, and forecast-model selection, one fetch per change
//! - Last-request-wins fencing for responses that complete out of order
//! - Monthly bar charts rendered with plotters
//! - Forecast images streamed from the service and shown as textures
//! - Failed fetches surface an error banner and keep the UI interactive
//!
//! ## Example
//!
//! ```no_run
//! use gitcast::app::{App, AppWrapper};
//! use gitcast::client::AnalyticsClient;
//! use gitcast::config::Config;
//! use std::sync::{Arc, Mutex};
//! use eframe::NativeOptions;
//!
//! let client = Arc::new(AnalyticsClient::new(&Config::from_env()));
//! let app = Arc::new(Mutex::new(App::default()));
//! let wrapper = AppWrapper { app, client };
//!
//! eframe::run_native(
//!     "Repository Forecasts",
//!     NativeOptions::default(),
//!     Box::new(move |_cc| Ok(Box::new(wrapper))),
//! ).unwrap();
//! ```

pub mod app;
pub mod client;
pub mod config;
pub mod plotting;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use app::App as GitcastApp;
pub use client::{AnalyticsClient, ClientError};
pub use types::{Category, FetchState, ForecastModel, RepoStats, Selection};
