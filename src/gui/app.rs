//! Main SnapGrid Application

use crate::api::{PhotoSource, UnsplashClient};
use crate::config::AppConfig;
use crate::fetcher::FetchWorker;
use crate::gui::colors;
use crate::gui::dialogs::show_about_dialog;
use crate::gui::scroll_top::show_scroll_top_button;
use crate::gui::search_view::{SearchView, TileAction};
use crate::photo::Photo;
use crate::scroll::{ScrollFeed, ScrollMetrics, ScrollTopControl};
use crossbeam_channel::{unbounded, Receiver, Sender};
use eframe::egui;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Message types for background operations other than searches
pub enum BackgroundMessage {
    SaveComplete { path: PathBuf, bytes: u64 },
    SaveError(String),
}

/// Main application state
pub struct SnapgridApp {
    /// Search input, results and pagination
    view: SearchView,
    /// Back-to-top button
    scroll_top: ScrollTopControl,
    /// Scroll metrics published by the grid every frame
    scroll_feed: ScrollFeed,
    /// Runs searches off the UI thread
    worker: FetchWorker,
    /// Used for image downloads
    client: Arc<UnsplashClient>,
    /// Channel for background messages
    bg_receiver: Receiver<BackgroundMessage>,
    bg_sender: Sender<BackgroundMessage>,
    /// Show about dialog
    show_about: bool,
    /// Status bar message for non-search actions
    status_message: Option<(String, bool)>,
    /// API host shown in the about dialog
    api_host: String,
}

impl SnapgridApp {
    /// Create a new SnapgridApp
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, client: Arc<UnsplashClient>) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let scroll_feed = ScrollFeed::new();
        let view = SearchView::new(&config, scroll_feed.subscribe());
        let scroll_top = ScrollTopControl::new(config.scroll_top_threshold, scroll_feed.subscribe());

        let ctx = cc.egui_ctx.clone();
        let source: Arc<dyn PhotoSource> = client.clone();
        let worker = FetchWorker::new(source).with_notify(move || ctx.request_repaint());

        let (bg_sender, bg_receiver) = unbounded();

        if config.access_key().is_none() {
            log::warn!("starting without an access key; searches will fail until one is configured");
        }

        Self {
            view,
            scroll_top,
            scroll_feed,
            worker,
            api_host: client.base_url().to_string(),
            client,
            bg_receiver,
            bg_sender,
            show_about: false,
            status_message: None,
        }
    }

    /// Apply finished searches and other background results
    fn process_messages(&mut self) {
        for response in self.worker.drain() {
            self.view.session_mut().complete(&response.request, response.result);
        }

        while let Ok(msg) = self.bg_receiver.try_recv() {
            match msg {
                BackgroundMessage::SaveComplete { path, bytes } => {
                    log::info!("saved {} bytes to {}", bytes, path.display());
                    self.set_status(
                        format!("Saved {} to {}", crate::format_size(bytes), path.display()),
                        false,
                    );
                }
                BackgroundMessage::SaveError(msg) => {
                    self.set_status(msg, true);
                }
            }
        }
    }

    fn set_status(&mut self, message: String, is_error: bool) {
        self.status_message = Some((message, is_error));
    }

    /// Render menu bar
    fn render_menu(&mut self, ctx: &egui::Context, now: Instant) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Clear search").clicked() {
                        self.view.clear(now);
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    let has_query = !self.view.session().query().is_empty();
                    if ui.add_enabled(has_query, egui::Button::new("Copy query")).clicked() {
                        let query = self.view.session().query().to_string();
                        self.copy_to_clipboard(&query);
                        ui.close();
                    }
                });

                ui.menu_button("Help", |ui| {
                    if ui.button("About SnapGrid").clicked() {
                        self.show_about = true;
                        ui.close();
                    }
                });
            });
        });
    }

    /// Render status bar
    fn render_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                self.view.render_status(ui);
                if let Some((message, is_error)) = &self.status_message {
                    ui.separator();
                    let color = if *is_error { colors::ERROR } else { colors::OK };
                    ui.label(egui::RichText::new(message).color(color));
                }
            });
        });
    }

    /// Render the scrollable grid and publish this frame's scroll metrics
    fn render_grid(&mut self, ctx: &egui::Context, now: Instant) -> Option<TileAction> {
        let forced_offset = self.scroll_top.animated_offset(now);

        egui::CentralPanel::default()
            .show(ctx, |ui| {
                let mut area = egui::ScrollArea::vertical()
                    .id_salt("photo_grid")
                    .auto_shrink([false, false]);
                if let Some(offset) = forced_offset {
                    area = area.vertical_scroll_offset(offset);
                }

                let output = area.show(ui, |ui| self.view.render_grid(ui));

                self.scroll_feed.publish(ScrollMetrics::new(
                    output.state.offset.y,
                    output.inner_rect.height(),
                    output.content_size.y,
                ));
                output.inner
            })
            .inner
    }

    fn handle_tile_action(&mut self, action: TileAction) {
        match action {
            TileAction::Open(url) => {
                if let Err(e) = open::that(&url) {
                    log::error!("failed to open {}: {}", url, e);
                    self.set_status(format!("Could not open browser: {}", e), true);
                }
            }
            TileAction::CopyUrl(url) => self.copy_to_clipboard(&url),
            TileAction::Save(photo) => self.start_save(photo),
        }
    }

    fn copy_to_clipboard(&mut self, text: &str) {
        let result = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.to_string()));
        match result {
            Ok(()) => self.set_status("Copied to clipboard".to_string(), false),
            Err(e) => {
                let err = crate::SnapgridError::Clipboard(e.to_string());
                log::error!("{}", err);
                self.set_status(err.to_string(), true);
            }
        }
    }

    /// Ask for a destination, then download the raw image in the background
    fn start_save(&mut self, photo: Photo) {
        let Some(path) = rfd::FileDialog::new()
            .set_title("Save image")
            .set_file_name(photo.file_name())
            .add_filter("JPEG image", &["jpg", "jpeg"])
            .save_file()
        else {
            return;
        };

        self.set_status(format!("Saving {}...", path.display()), false);
        let client = Arc::clone(&self.client);
        let tx = self.bg_sender.clone();
        let url = photo.urls.raw.clone();

        thread::spawn(move || {
            let msg = match client
                .download(&url)
                .and_then(|bytes| std::fs::write(&path, &bytes).map(|_| bytes.len()).map_err(Into::into))
            {
                Ok(len) => BackgroundMessage::SaveComplete {
                    path,
                    bytes: len as u64,
                },
                Err(e) => {
                    log::error!("saving {} failed: {}", url, e);
                    BackgroundMessage::SaveError(format!("Save failed: {}", e))
                }
            };
            let _ = tx.send(msg);
        });
    }

    /// Wake up again when the debounce deadline passes or an animation is running
    /// Evict loader caches for tiles that left the grid
    fn release_images(&mut self, ctx: &egui::Context) {
        let uris = self.view.session_mut().take_discarded_tiles();
        if uris.is_empty() {
            return;
        }
        log::debug!("releasing {} cached images", uris.len());
        for uri in &uris {
            ctx.forget_image(uri);
        }
    }

    fn schedule_repaint(&self, ctx: &egui::Context, now: Instant) {
        if self.scroll_top.is_animating() {
            ctx.request_repaint();
        } else if let Some(deadline) = self.view.session().next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }
    }
}

impl eframe::App for SnapgridApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.process_messages();
        if let Some(request) = self.view.session_mut().poll(now) {
            self.worker.dispatch(request);
        }
        self.release_images(ctx);

        self.render_menu(ctx, now);
        egui::TopBottomPanel::top("search_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            self.view.render_search_bar(ui, now);
            ui.add_space(4.0);
        });
        self.render_status_bar(ctx);
        show_about_dialog(ctx, &mut self.show_about, &self.api_host);

        let action = self.render_grid(ctx, now);
        if let Some(action) = action {
            self.handle_tile_action(action);
        }

        // both components read the same scroll event
        self.view.handle_scroll(now);
        self.scroll_top.update();
        let offset = self.scroll_feed.latest().offset;
        show_scroll_top_button(ctx, &mut self.scroll_top, offset, now);

        self.schedule_repaint(ctx, now);
    }
}
