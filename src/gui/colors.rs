use eframe::egui::Color32;

/// Error line below the grid
pub const ERROR: Color32 = Color32::from_rgb(230, 90, 90);

/// Secondary text (counters, hints)
pub const MUTED: Color32 = Color32::from_rgb(150, 150, 150);

/// Success messages on the status line
pub const OK: Color32 = Color32::from_rgb(110, 200, 120);

/// Fill of the floating back-to-top button
pub const ACCENT: Color32 = Color32::from_rgb(60, 120, 220);
