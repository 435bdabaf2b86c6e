//! Repository Forecast Dashboard
//!
//! A GUI application for exploring GitHub repository activity and the
//! forecasts generated by the companion analytics service.

use anyhow::Result;
use eframe::egui;
use std::sync::{Arc, Mutex};
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use gitcast::app::{spawn_fetch, App, AppWrapper};
use gitcast::client::AnalyticsClient;
use gitcast::config::Config;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();
    tracing::info!(api_url = %config.api_url, image_url = %config.image_url, "starting dashboard");

    // Initialize the Tokio runtime; fetches are spawned onto it from the UI
    let rt = Runtime::new()?;
    rt.block_on(async {
        let client = Arc::new(AnalyticsClient::new(&config));
        let app: Arc<Mutex<App>> = Arc::new(Mutex::new(App::default()));

        // Load the initial selection before the first frame.
        if let Ok(mut state) = app.lock() {
            spawn_fetch(&mut state, Arc::clone(&app), Arc::clone(&client));
        }

        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1200.0, 800.0])
                .with_min_inner_size([800.0, 600.0])
                .with_title("Repository Forecasts"),
            ..Default::default()
        };

        if let Err(e) = eframe::run_native(
            "Repository Forecasts",
            options,
            Box::new(move |cc| {
                let fonts = egui::FontDefinitions::default();
                cc.egui_ctx.set_fonts(fonts);

                Ok(Box::new(AppWrapper { app, client }) as Box<dyn eframe::App>)
            }),
        ) {
            tracing::error!("error running application: {e}");
        }
    });

    Ok(())
}
