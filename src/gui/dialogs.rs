use eframe::egui;

/// About window. Clears `open` when dismissed.
pub fn show_about_dialog(ctx: &egui::Context, open: &mut bool, api_host: &str) {
    if !*open {
        return;
    }

    egui::Window::new("About SnapGrid")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("SnapGrid");
                ui.label(format!("Version {}", crate::VERSION));
                ui.add_space(10.0);
                ui.label("Photo search with an infinite-scrolling grid");
                ui.label(format!("Results from {}", api_host));
                ui.add_space(10.0);
                if ui.button("OK").clicked() {
                    *open = false;
                }
            });
        });
}
