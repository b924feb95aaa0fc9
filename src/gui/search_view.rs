//! Search input, result grid and status line

use crate::config::AppConfig;
use crate::gui::colors;
use crate::photo::Photo;
use crate::scroll::ScrollSubscription;
use crate::search::SearchSession;
use eframe::egui;
use std::time::Instant;

/// Gap between grid tiles
const TILE_GAP: f32 = 8.0;

/// Something the user asked to do with a tile
#[derive(Debug, Clone, PartialEq)]
pub enum TileAction {
    /// Open a URL in the system browser
    Open(String),
    CopyUrl(String),
    Save(Photo),
}

/// The search view: input box, grid of results, loading/error line
pub struct SearchView {
    session: SearchSession,
    /// Text box contents
    input: String,
    /// First frame flag (for auto-focus)
    first_frame: bool,
    scroll_events: ScrollSubscription,
    tile_size: f32,
}

impl SearchView {
    pub fn new(config: &AppConfig, scroll_events: ScrollSubscription) -> Self {
        Self {
            session: SearchSession::from_config(config),
            input: String::new(),
            first_frame: true,
            scroll_events,
            tile_size: config.tile_size,
        }
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SearchSession {
        &mut self.session
    }

    /// Empty the text box and the results
    pub fn clear(&mut self, now: Instant) {
        self.input.clear();
        self.session.set_query("", now);
    }

    /// Feed the latest scroll event (if any) into the pagination rule
    pub fn handle_scroll(&mut self, now: Instant) {
        if let Some(metrics) = self.scroll_events.next_event() {
            if self.session.on_scroll(&metrics, now) {
                log::debug!(
                    "bottom reached at offset {:.0}, loading page {}",
                    metrics.offset,
                    self.session.page()
                );
            }
        }
    }

    /// Text input with the search icon
    pub fn render_search_bar(&mut self, ui: &mut egui::Ui, now: Instant) {
        ui.horizontal(|ui| {
            let icon_width = 32.0;
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.input)
                    .desired_width(ui.available_width() - icon_width - 10.0)
                    .hint_text("Search photos..."),
            );

            if self.first_frame {
                response.request_focus();
                self.first_frame = false;
            }

            if response.changed() {
                self.session.set_query(&self.input, now);
            }

            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let icon = ui
                .add(egui::Button::new("\u{1F50D}").min_size(egui::vec2(icon_width, 0.0)))
                .on_hover_text("Search again");
            if icon.clicked() || submitted {
                self.session.resubmit(now);
            }
        });
    }

    /// Result grid; returns the tile action chosen this frame, if any
    pub fn render_grid(&self, ui: &mut egui::Ui) -> Option<TileAction> {
        let results = self.session.results();
        if results.is_empty() {
            if self.session.query().is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.label(egui::RichText::new("Type something to search").color(colors::MUTED));
                });
            }
            return None;
        }

        let mut action = None;
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing = egui::vec2(TILE_GAP, TILE_GAP);
            for photo in results {
                if let Some(chosen) = self.render_tile(ui, photo) {
                    action = Some(chosen);
                }
            }
        });
        ui.add_space(TILE_GAP);
        action
    }

    fn render_tile(&self, ui: &mut egui::Ui, photo: &Photo) -> Option<TileAction> {
        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(self.tile_size, self.tile_size),
            egui::Sense::click(),
        );
        // only tiles on screen start loading their image
        if ui.is_rect_visible(rect) {
            egui::Image::from_uri(photo.tile_url().to_owned())
                .corner_radius(4.0)
                .paint_at(ui, rect);
        }
        let response = response.on_hover_text(hover_text(photo));

        let mut action = None;
        if response.clicked() {
            action = Some(TileAction::Open(photo.urls.raw.clone()));
        }
        response.context_menu(|ui| {
            if ui.button("Open in browser").clicked() {
                action = Some(TileAction::Open(photo.urls.raw.clone()));
                ui.close();
            }
            if ui.button("Copy image URL").clicked() {
                action = Some(TileAction::CopyUrl(photo.urls.raw.clone()));
                ui.close();
            }
            if ui.button("Save image as...").clicked() {
                action = Some(TileAction::Save(photo.clone()));
                ui.close();
            }
        });
        action
    }

    /// Loading spinner, error text and counters
    pub fn render_status(&self, ui: &mut egui::Ui) {
        if self.session.is_loading() {
            ui.spinner();
        }
        if !self.session.error().is_empty() {
            ui.label(egui::RichText::new(self.session.error()).color(colors::ERROR));
            ui.separator();
        }
        ui.label(egui::RichText::new(status_text(&self.session)).color(colors::MUTED));
    }
}

/// Tooltip for a tile: caption, author, date and dimensions
pub fn hover_text(photo: &Photo) -> String {
    let mut lines = vec![photo.caption().to_string()];
    if let Some(author) = photo.author_name() {
        lines.push(format!("by {}", author));
    }
    let mut details = Vec::new();
    if let (Some(w), Some(h)) = (photo.width, photo.height) {
        details.push(format!("{} x {}", w, h));
    }
    if let Some(created) = photo.created_at {
        details.push(created.format("%Y-%m-%d").to_string());
    }
    if !details.is_empty() {
        lines.push(details.join(", "));
    }
    lines.join("\n")
}

/// "12 photos - page 2 of 7"
pub fn status_text(session: &SearchSession) -> String {
    let count = session.results().len();
    let noun = if count == 1 { "photo" } else { "photos" };
    match session.total_pages() {
        Some(total) => format!("{} {} - page {} of {}", count, noun, session.page(), total),
        None if session.query().is_empty() => "Ready".to_string(),
        None => format!("{} {} - page {}", count, noun, session.page()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photo::{Author, SearchPage};
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    #[test]
    fn hover_text_includes_available_details() {
        let mut photo = Photo::new("a", "https://img/a");
        assert_eq!(hover_text(&photo), "https://img/a");

        photo.alt_description = Some("a lighthouse at dusk".into());
        photo.user = Some(Author { name: "Ana".into() });
        photo.width = Some(4000);
        photo.height = Some(3000);
        photo.created_at = Some(Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap());
        assert_eq!(
            hover_text(&photo),
            "a lighthouse at dusk\nby Ana\n4000 x 3000, 2021-06-01"
        );
    }

    #[test]
    fn status_text_reflects_session_state() {
        let t0 = Instant::now();
        let mut session = SearchSession::new(Duration::from_millis(300), 1.0);
        assert_eq!(status_text(&session), "Ready");

        session.set_query("cats", t0);
        assert_eq!(status_text(&session), "0 photos - page 1");

        let req = session.poll(t0 + Duration::from_millis(300)).unwrap();
        session.complete(
            &req,
            Ok(SearchPage {
                results: vec![Photo::new("a", "https://img/a")],
                total_pages: 4,
                total: Some(31),
            }),
        );
        assert_eq!(status_text(&session), "1 photo - page 1 of 4");
    }
}
