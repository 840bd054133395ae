use egui::{self, RichText};
use std::path::PathBuf;

use crate::models::config::{AppSettings, LocationSourceKind, ShortcutAction};
use crate::models::Coordinates;
use crate::ui::{
    shortcuts::{capture_shortcut, find_conflict},
    state::AppState,
    theme::{Colors, Icons},
};
use crate::utils::path::{default_export_dir, display_path, get_config_path};

/// "Ayarlar": utseende, position, data och kortkommandon
pub struct SettingsView {
    draft: AppSettings,
    fixed_lat: String,
    fixed_lng: String,
    export_dir: String,
    /// Åtgärd vars genväg spelas in
    capturing: Option<ShortcutAction>,
    needs_refresh: bool,
    status_message: Option<(String, bool)>,
}

impl SettingsView {
    pub fn new() -> Self {
        Self {
            draft: AppSettings::default(),
            fixed_lat: String::new(),
            fixed_lng: String::new(),
            export_dir: String::new(),
            capturing: None,
            needs_refresh: true,
            status_message: None,
        }
    }

    pub fn mark_needs_refresh(&mut self) {
        self.needs_refresh = true;
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState, app_settings: &AppSettings) {
        if self.needs_refresh {
            self.load_from(app_settings);
            self.needs_refresh = false;
        }

        self.capture_pending_shortcut(ui.ctx());
        state.capturing_shortcut = self.capturing.is_some();

        let available_width = ui.available_width();
        let section_width = (available_width * 0.85).min(720.0);
        let margin = (available_width - section_width) / 2.0;

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.heading(format!("{} Ayarlar", Icons::SETTINGS));
            ui.add_space(16.0);

            ui.horizontal(|ui| {
                ui.add_space(margin);
                ui.vertical(|ui| {
                    ui.set_width(section_width);

                    section(ui, "Görünüm", |ui| {
                        ui.checkbox(&mut state.dark_mode, "Koyu tema");
                    });

                    ui.add_space(16.0);
                    section(ui, "Konum", |ui| self.location_section(ui));

                    ui.add_space(16.0);
                    section(ui, "Veriler", |ui| self.data_section(ui));

                    ui.add_space(16.0);
                    section(ui, "Kısayollar", |ui| self.shortcut_section(ui));

                    ui.add_space(16.0);
                    ui.horizontal(|ui| {
                        if ui.button(format!("{} Kaydet", Icons::SAVE)).clicked() {
                            self.save(state);
                        }
                        if ui.button("Varsayılanlara dön").clicked() {
                            let dark_mode = state.dark_mode;
                            self.load_from(&AppSettings::default());
                            state.dark_mode = dark_mode;
                        }
                    });

                    if let Some((ref msg, ok)) = self.status_message {
                        ui.add_space(8.0);
                        let color = if ok { Colors::SUCCESS } else { Colors::ERROR };
                        ui.label(RichText::new(msg).color(color));
                    }

                    ui.add_space(16.0);
                    section(ui, "Hakkında", |ui| {
                        ui.label(format!("Müşteri Ziyaret Programı v{}", env!("CARGO_PKG_VERSION")));
                        ui.label(
                            RichText::new(format!("Ayar dosyası: {}", display_path(&get_config_path())))
                                .small()
                                .color(Colors::TEXT_MUTED),
                        );
                    });
                });
            });
        });
    }

    fn location_section(&mut self, ui: &mut egui::Ui) {
        let location = &mut self.draft.location;

        egui::Grid::new("location_settings_grid")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label("Kaynak:");
                egui::ComboBox::from_id_salt("location_source")
                    .selected_text(location.source.label())
                    .show_ui(ui, |ui| {
                        for kind in LocationSourceKind::all() {
                            ui.selectable_value(&mut location.source, *kind, kind.label());
                        }
                    });
                ui.end_row();

                match location.source {
                    LocationSourceKind::Gpsd => {
                        ui.label("gpsd adresi:");
                        ui.text_edit_singleline(&mut location.gpsd_address);
                        ui.end_row();
                    }
                    LocationSourceKind::Fixed => {
                        ui.label("Enlem:");
                        ui.text_edit_singleline(&mut self.fixed_lat);
                        ui.end_row();
                        ui.label("Boylam:");
                        ui.text_edit_singleline(&mut self.fixed_lng);
                        ui.end_row();
                    }
                    LocationSourceKind::Disabled => {}
                }
            });
    }

    fn data_section(&mut self, ui: &mut egui::Ui) {
        ui.checkbox(&mut self.draft.seed_demo_customers, "Örnek müşterileri ekle");
        ui.label(
            RichText::new("Yalnızca ilk açılışta ve müşteri listesi boşken uygulanır.")
                .small()
                .color(Colors::TEXT_MUTED),
        );

        ui.add_space(8.0);
        ui.label("Dışa aktarma klasörü:");
        ui.horizontal(|ui| {
            let w = ui.available_width() - 70.0;
            ui.add(
                egui::TextEdit::singleline(&mut self.export_dir)
                    .desired_width(w)
                    .hint_text(display_path(&default_export_dir())),
            );
            if ui.button("Seç...").clicked() {
                if let Some(path) = rfd::FileDialog::new().pick_folder() {
                    self.export_dir = path.display().to_string();
                }
            }
        });
    }

    fn shortcut_section(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("shortcut_grid")
            .num_columns(3)
            .spacing([12.0, 6.0])
            .striped(true)
            .show(ui, |ui| {
                for action in ShortcutAction::ALL {
                    ui.label(action.label());

                    let current = self
                        .draft
                        .shortcuts
                        .get(action)
                        .map(|s| s.display())
                        .unwrap_or_else(|| "-".to_string());

                    if self.capturing == Some(*action) {
                        ui.label(RichText::new("Bir tuşa basın…").italics().color(Colors::INFO));
                        if ui.small_button("İptal").clicked() {
                            self.capturing = None;
                        }
                    } else {
                        ui.monospace(current);
                        if ui.small_button("Değiştir").clicked() {
                            self.capturing = Some(*action);
                        }
                    }
                    ui.end_row();
                }
            });
    }

    fn capture_pending_shortcut(&mut self, ctx: &egui::Context) {
        let Some(action) = self.capturing else {
            return;
        };
        let Some(shortcut) = capture_shortcut(ctx) else {
            return;
        };

        if let Some(other) = find_conflict(&self.draft.shortcuts, action, &shortcut) {
            self.status_message = Some((
                format!("{} zaten \"{}\" için kullanılıyor", shortcut.display(), other.label()),
                false,
            ));
        } else {
            self.draft.shortcuts.insert(action, shortcut);
            self.status_message = None;
        }
        self.capturing = None;
    }

    fn load_from(&mut self, settings: &AppSettings) {
        self.draft = settings.clone();
        self.fixed_lat = settings.location.fixed_lat.map(|v| v.to_string()).unwrap_or_default();
        self.fixed_lng = settings.location.fixed_lng.map(|v| v.to_string()).unwrap_or_default();
        self.export_dir = settings
            .export_directory
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        self.capturing = None;
    }

    fn save(&mut self, state: &mut AppState) {
        let mut settings = self.draft.clone();
        settings.dark_mode = state.dark_mode;

        if settings.location.source == LocationSourceKind::Fixed {
            match (parse_coord(&self.fixed_lat), parse_coord(&self.fixed_lng)) {
                (Some(lat), Some(lng)) if Coordinates::new(lat, lng).is_valid() => {
                    settings.location.fixed_lat = Some(lat);
                    settings.location.fixed_lng = Some(lng);
                }
                _ => {
                    self.status_message = Some(("Geçersiz sabit konum".to_string(), false));
                    return;
                }
            }
        }

        let export_dir = self.export_dir.trim();
        settings.export_directory = (!export_dir.is_empty()).then(|| PathBuf::from(export_dir));

        match settings.save() {
            Ok(()) => {
                self.status_message = Some(("Ayarlar kaydedildi".to_string(), true));
                self.draft = settings.clone();
                state.settings_to_apply = Some(settings);
            }
            Err(e) => {
                tracing::error!("Kunde inte spara inställningar: {:#}", e);
                self.status_message = Some((format!("Ayarlar kaydedilemedi: {}", e), false));
            }
        }
    }
}

/// Ram runt en inställningsgrupp
fn section(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::none()
        .fill(ui.visuals().extreme_bg_color)
        .rounding(8.0)
        .inner_margin(16.0)
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new(title).strong());
            ui.add_space(8.0);
            add_contents(ui);
        });
}

/// Decimaltal med punkt eller komma
fn parse_coord(s: &str) -> Option<f64> {
    s.trim().replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite())
}
