use crate::gui::colors;
use crate::scroll::ScrollTopControl;
use eframe::egui;
use std::time::Instant;

/// Floating back-to-top button in the bottom-right corner of the grid.
///
/// Draws nothing while the control is hidden. `current_offset` is where the
/// grid is scrolled to right now; a click starts the animation from there.
pub fn show_scroll_top_button(
    ctx: &egui::Context,
    control: &mut ScrollTopControl,
    current_offset: f32,
    now: Instant,
) {
    if !control.is_visible() {
        return;
    }

    egui::Area::new(egui::Id::new("scroll_to_top"))
        .anchor(egui::Align2::RIGHT_BOTTOM, [-24.0, -48.0])
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            let button = egui::Button::new(
                egui::RichText::new("\u{2191}").size(20.0).color(egui::Color32::WHITE),
            )
            .fill(colors::ACCENT)
            .corner_radius(20.0)
            .min_size(egui::vec2(40.0, 40.0));

            if ui.add(button).on_hover_text("Back to top").clicked() {
                control.click(current_offset, now);
                ctx.request_repaint();
            }
        });
}
