use egui::{Color32, FontFamily, FontId, TextStyle, Visuals};

/// Konfigurera applikationens utseende.
/// Större knappar och typsnitt än vanligt; appen används på surfplatta.
pub fn configure_style(ctx: &egui::Context, dark_mode: bool) {
    let mut style = (*ctx.style()).clone();

    style.text_styles = [
        (TextStyle::Heading, FontId::new(24.0, FontFamily::Proportional)),
        (TextStyle::Name("heading2".into()), FontId::new(19.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(16.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(14.0, FontFamily::Monospace)),
        (TextStyle::Button, FontId::new(16.0, FontFamily::Proportional)),
        (TextStyle::Small, FontId::new(13.0, FontFamily::Proportional)),
    ]
    .into();

    // Pekvänliga ytor
    style.spacing.item_spacing = egui::vec2(10.0, 8.0);
    style.spacing.button_padding = egui::vec2(14.0, 8.0);
    style.spacing.interact_size.y = 32.0;
    style.spacing.window_margin = egui::Margin::same(14.0);

    style.visuals = if dark_mode { dark_visuals() } else { light_visuals() };

    ctx.set_style(style);
}

fn dark_visuals() -> Visuals {
    let mut visuals = Visuals::dark();

    visuals.panel_fill = Color32::from_rgb(28, 31, 36);
    visuals.window_fill = Color32::from_rgb(38, 42, 48);
    visuals.extreme_bg_color = Color32::from_rgb(20, 22, 26);

    visuals.widgets.inactive.bg_fill = Color32::from_rgb(48, 53, 60);
    visuals.widgets.hovered.bg_fill = Color32::from_rgb(58, 64, 74);
    visuals.widgets.active.bg_fill = Color32::from_rgb(68, 76, 88);

    visuals.selection.bg_fill = Color32::from_rgb(14, 116, 144);
    visuals.hyperlink_color = Color32::from_rgb(103, 204, 230);

    visuals
}

fn light_visuals() -> Visuals {
    let mut visuals = Visuals::light();

    visuals.panel_fill = Color32::from_rgb(247, 248, 250);
    visuals.window_fill = Color32::WHITE;
    visuals.extreme_bg_color = Color32::from_rgb(238, 240, 243);

    visuals.widgets.inactive.bg_fill = Color32::from_rgb(228, 231, 236);
    visuals.widgets.hovered.bg_fill = Color32::from_rgb(215, 220, 228);
    visuals.widgets.active.bg_fill = Color32::from_rgb(198, 206, 218);

    visuals.selection.bg_fill = Color32::from_rgb(165, 220, 235);
    visuals.hyperlink_color = Color32::from_rgb(8, 100, 130);

    visuals
}

/// Färgpalett för applikationen
pub struct Colors;

impl Colors {
    pub const PRIMARY: Color32 = Color32::from_rgb(14, 116, 144);
    pub const SUCCESS: Color32 = Color32::from_rgb(34, 197, 94);
    pub const WARNING: Color32 = Color32::from_rgb(234, 179, 8);
    pub const ERROR: Color32 = Color32::from_rgb(239, 68, 68);
    pub const INFO: Color32 = Color32::from_rgb(59, 130, 246);

    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(107, 114, 128);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(156, 163, 175);
}

/// Ikoner (Unicode)
pub struct Icons;

impl Icons {
    pub const VISIT: &'static str = "📝";
    pub const LIST: &'static str = "📋";
    pub const PEOPLE: &'static str = "👥";
    pub const SEARCH: &'static str = "🔍";
    pub const SETTINGS: &'static str = "⚙";
    pub const ADD: &'static str = "➕";
    pub const EDIT: &'static str = "✏";
    pub const DELETE: &'static str = "🗑";
    pub const SAVE: &'static str = "💾";
    pub const CHECK: &'static str = "✓";
    pub const CALENDAR: &'static str = "📅";
    pub const PHONE: &'static str = "📞";
    pub const MAIL: &'static str = "✉";
    pub const EXPORT: &'static str = "📤";
    pub const INSTALL: &'static str = "⬇";
    pub const MAP: &'static str = "🗺";
    pub const LOCATION: &'static str = "📍";
    pub const ROUTE: &'static str = "🧭";
}
