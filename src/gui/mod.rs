pub mod app;
pub mod colors;
pub mod dialogs;
pub mod scroll_top;
pub mod search_view;

use crate::api::UnsplashClient;
use crate::config::AppConfig;
use crate::error::SnapgridError;
use std::sync::Arc;

/// Entry point: launch the native GUI window
pub fn run(config: AppConfig) -> crate::Result<()> {
    let client = Arc::new(UnsplashClient::new(&config)?);

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("SnapGrid - Photo Search")
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };

    log::info!("opening window (api: {})", client.base_url());
    eframe::run_native(
        "SnapGrid",
        native_options,
        Box::new(move |cc| Ok(Box::new(app::SnapgridApp::new(cc, config, client)))),
    )
    .map_err(|e| SnapgridError::Gui(e.to_string()))
}
