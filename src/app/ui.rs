use egui::{Color32, Context, RichText};
use image::ImageReader;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::state::{spawn_fetch, spawn_image_fetches, App, REPOSITORIES};
use crate::client::AnalyticsClient;
use crate::types::{Category, FetchState, ForecastModel, ImageUrls};
use crate::utils::series_total;

/// Draw the main application UI
pub fn draw_ui(app: &mut App, ctx: &Context, app_arc: Arc<Mutex<App>>, client: Arc<AnalyticsClient>) {
    egui::SidePanel::left("repository_panel").show(ctx, |ui| {
        ui.heading("Repositories");
        ui.separator();

        for repo in &REPOSITORIES {
            let selected = app.selection.repository == repo.key;
            // Other repositories are disabled while a fetch is in flight.
            let enabled = selected || !app.is_loading();
            let clicked = ui
                .add_enabled(enabled, egui::SelectableLabel::new(selected, repo.name))
                .clicked();
            if clicked && app.select_repository(repo.key) {
                spawn_fetch(app, Arc::clone(&app_arc), Arc::clone(&client));
            }
        }
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Timeseries Forecasting");
        ui.separator();

        // Category tabs
        ui.horizontal_wrapped(|ui| {
            for category in Category::ALL {
                let selected = app.selection.category == category;
                if ui.selectable_label(selected, category.label()).clicked()
                    && app.select_category(category)
                {
                    spawn_fetch(app, Arc::clone(&app_arc), Arc::clone(&client));
                }
            }
        });

        // Forecast model radio group
        ui.label("Forecast Model");
        ui.horizontal(|ui| {
            for model in ForecastModel::ALL {
                if ui.radio(app.selection.model == model, model.label()).clicked()
                    && app.select_model(model)
                {
                    spawn_fetch(app, Arc::clone(&app_arc), Arc::clone(&client));
                }
            }
        });
        ui.separator();

        match app.fetch_state.clone() {
            FetchState::Loading => {
                ui.spinner();
                ui.label("Fetching repository data...");
                ctx.request_repaint_after(Duration::from_millis(100));
            }
            FetchState::Failed(message) => {
                ui.colored_label(Color32::LIGHT_RED, format!("Fetch failed: {message}"));
                ui.label("Pick another repository, category, or model to retry.");
            }
            FetchState::Idle | FetchState::Ready => {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    draw_category(app, ui);
                });
            }
        }
    });

    if app.chart_needs_update {
        if let Err(e) = crate::plotting::generate_chart(app) {
            tracing::error!(error = %e, "chart rendering failed");
        } else {
            load_chart_texture(app, ctx);
        }
        spawn_image_fetches(app, &app_arc, &client);
        app.chart_needs_update = false;
    }
    load_image_textures(app, ctx);
}

/// Charts, totals, and forecast sections for the selected category.
fn draw_category(app: &App, ui: &mut egui::Ui) {
    let category = app.selection.category;
    let series = app.stats.series(category);

    if category == Category::Releases && series.is_empty() {
        draw_no_releases(app, ui);
        return;
    }

    if let Some(texture) = &app.chart_texture {
        ui.image(texture);
    }

    match category {
        Category::Issues => {
            ui.label(format!(
                "Total created issues: {}",
                series_total(&app.stats.created)
            ));
            ui.label(format!(
                "Total closed issues: {}",
                series_total(&app.stats.closed)
            ));
        }
        _ => {
            ui.label(format!(
                "Total {}: {}",
                category.label().to_lowercase(),
                series_total(series)
            ));
        }
    }
    ui.separator();

    let sections = app.stats.forecast_sections(category);
    let model = app.selection.model;
    let mut slots: Vec<(String, Option<String>)> = Vec::new();
    for (subject, images) in sections {
        slots.extend(forecast_slots(&subject, model, images));
    }
    for (heading, url) in slots {
        ui.label(RichText::new(heading).strong());
        match url {
            Some(url) => draw_forecast_image(app, ui, &url),
            None => draw_image_placeholder(ui),
        }
        ui.add_space(8.0);
    }
}

/// The three labelled image slots of one forecast section.
fn forecast_slots(
    subject: &str,
    model: ForecastModel,
    images: &ImageUrls,
) -> Vec<(String, Option<String>)> {
    vec![
        (
            format!("Model {} for {subject}", model.diagnostics_label()),
            images.model_loss_image_url.clone(),
        ),
        (
            format!(
                "{} Generated Data for {subject}",
                model.engine_name()
            ),
            images.lstm_generated_image_url.clone(),
        ),
        (
            format!("All Data for {subject}"),
            images.all_issues_data_image.clone(),
        ),
    ]
}

fn draw_forecast_image(app: &App, ui: &mut egui::Ui, url: &str) {
    if let Some(texture) = app.image_textures.get(url) {
        ui.image(texture);
    } else {
        match app.image_bytes.get(url) {
            // Empty bytes mark a failed download or decode.
            Some(bytes) if bytes.is_empty() => draw_image_placeholder(ui),
            _ => {
                ui.spinner();
                ui.ctx().request_repaint_after(Duration::from_millis(200));
            }
        }
    }
}

fn draw_image_placeholder(ui: &mut egui::Ui) {
    ui.label(
        RichText::new(
            "Image not available. There may have been an error in the forecast generation.",
        )
        .italics()
        .color(Color32::GRAY),
    );
}

fn draw_no_releases(app: &App, ui: &mut egui::Ui) {
    ui.add_space(24.0);
    ui.vertical_centered(|ui| {
        ui.heading("No Releases Found");
        ui.label(format!(
            "This repository ({}) doesn't have any releases published. \
             Releases are used by developers to package and provide software to users.",
            app.repository_name()
        ));
        ui.label("Try selecting a different repository or a different data type.");
    });
}

fn load_chart_texture(app: &mut App, ctx: &Context) {
    if let Ok(image) = ImageReader::open(&app.chart_path).and_then(|reader| {
        reader
            .decode()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }) {
        let size = [image.width() as usize, image.height() as usize];
        let pixels = image.to_rgba8();
        let pixels = pixels.as_flat_samples();
        let texture = ctx.load_texture(
            "chart_texture",
            egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice()),
            egui::TextureOptions::LINEAR,
        );
        app.chart_texture = Some(texture);
        let _ = std::fs::remove_file(&app.chart_path);
    } else {
        tracing::error!(path = %app.chart_path, "failed to load chart image");
    }
}

/// Decode any downloaded forecast images into textures. A decode failure
/// replaces the entry with an empty marker so the placeholder shows instead.
fn load_image_textures(app: &mut App, ctx: &Context) {
    let pending: Vec<(String, Vec<u8>)> = app
        .image_bytes
        .iter()
        .filter(|(url, bytes)| !bytes.is_empty() && !app.image_textures.contains_key(*url))
        .map(|(url, bytes)| (url.clone(), bytes.clone()))
        .collect();

    for (url, bytes) in pending {
        let decoded = ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .ok()
            .and_then(|reader| reader.decode().ok());
        match decoded {
            Some(image) => {
                let size = [image.width() as usize, image.height() as usize];
                let pixels = image.to_rgba8();
                let pixels = pixels.as_flat_samples();
                let texture = ctx.load_texture(
                    &url,
                    egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice()),
                    egui::TextureOptions::LINEAR,
                );
                app.image_textures.insert(url, texture);
            }
            None => {
                tracing::warn!(url = %url, "forecast image failed to decode");
                app.image_bytes.insert(url, Vec::new());
            }
        }
    }
}
