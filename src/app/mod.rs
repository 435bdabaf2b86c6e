//! Application state and the egui presentation layer.

pub mod state;
pub mod ui;

pub use state::{spawn_fetch, spawn_image_fetches, App, AppWrapper, RepoEntry, REPOSITORIES};
