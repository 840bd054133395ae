//! Huvudapplikation för Ziyaret

use eframe::egui;
use std::path::Path;
use tracing::{error, info, warn};

use crate::db::Database;
use crate::models::config::{AppSettings, ShortcutAction};
use crate::services::{
    CustomerService, DesktopEntryInstaller, ExportService, InstallPrompt, PromptOutcome, VisitService,
};
use crate::ui::{
    modals::{ConfirmDialog, CustomerFormModal},
    shortcuts::ShortcutManager,
    state::{AppState, ConfirmAction},
    theme::{configure_style, Colors, Icons},
    views::{CustomerListView, NewVisitView, SettingsView, VisitListView},
    StatusType, View,
};
use crate::utils::date::today;
use crate::utils::path::{default_export_dir, display_path, get_database_path};
use crate::utils::{AppError, AppResult};

/// Huvudapplikation
pub struct ZiyaretApp {
    db: Database,
    state: AppState,
    app_settings: AppSettings,
    shortcut_manager: ShortcutManager,

    installer: Option<DesktopEntryInstaller>,
    install_prompt: InstallPrompt,

    // Vyer
    new_visit: NewVisitView,
    visit_list: VisitListView,
    customer_list: CustomerListView,
    settings: SettingsView,

    // Modals
    customer_form_modal: CustomerFormModal,

    /// Tema som senast applicerades
    applied_dark_mode: Option<bool>,
}

impl ZiyaretApp {
    /// Skapa ny applikation
    pub fn new(_cc: &eframe::CreationContext<'_>) -> AppResult<Self> {
        let app_settings = AppSettings::load();
        let shortcut_manager = ShortcutManager::new(app_settings.shortcuts.clone());

        let db = open_database(&get_database_path())?;

        let mut state = AppState::new();
        state.dark_mode = app_settings.dark_mode;

        if app_settings.seed_demo_customers {
            if let Err(e) = db.seed_demo_customers() {
                warn!("Exempelkunder kunde inte läggas in: {}", e);
                state.show_error(&e.to_string());
            }
        }

        let installer = DesktopEntryInstaller::for_current_user();
        let install_prompt = installer
            .as_ref()
            .map(|i| InstallPrompt::detect(i))
            .unwrap_or_default();

        Ok(Self {
            db,
            state,
            app_settings,
            shortcut_manager,
            installer,
            install_prompt,
            new_visit: NewVisitView::new(),
            visit_list: VisitListView::new(),
            customer_list: CustomerListView::new(),
            settings: SettingsView::new(),
            customer_form_modal: CustomerFormModal::new(),
            applied_dark_mode: None,
        })
    }

    /// Läs om kund- och besökslistorna
    fn refresh_data(&mut self) {
        self.state.needs_refresh = false;

        let customers = CustomerService::new(&self.db).list();
        let visits = VisitService::new(&self.db).list();

        match (customers, visits) {
            (Ok(customers), Ok(visits)) => {
                self.state.customers = customers;
                self.state.visits = visits;
            }
            (Err(e), _) | (_, Err(e)) => {
                error!("Kunde inte läsa data: {}", e);
                self.state.show_error(&e.to_string());
            }
        }
    }

    /// Navigera och uppdatera relevanta vyer
    fn navigate_to(&mut self, view: View) {
        if view == View::Settings && self.state.current_view != View::Settings {
            self.settings.mark_needs_refresh();
        }
        self.state.navigate(view);
    }

    /// Kolla om någon modal är öppen
    fn any_modal_open(&self) -> bool {
        self.state.show_customer_form || self.state.show_confirm_dialog
    }

    /// Stäng översta modalen
    fn close_topmost_modal(&mut self) {
        if self.state.show_confirm_dialog {
            if self.state.confirm_dialog_action == Some(ConfirmAction::Install) {
                self.resolve_install(PromptOutcome::Dismissed);
            }
            self.state.close_confirm();
        } else if self.state.show_customer_form {
            self.customer_form_modal.reset();
            self.state.close_customer_form();
        }
    }

    /// Hantera en genvägsåtgärd
    fn handle_shortcut_action(&mut self, action: ShortcutAction) {
        // Om modal är öppen: tillåt bara CloseModal
        if self.any_modal_open() {
            if action == ShortcutAction::CloseModal {
                self.close_topmost_modal();
            }
            return;
        }

        match action {
            ShortcutAction::NavigateNewVisit => self.navigate_to(View::NewVisit),
            ShortcutAction::NavigateVisits => self.navigate_to(View::Visits),
            ShortcutAction::NavigateCustomers => self.navigate_to(View::Customers),
            ShortcutAction::NavigateSettings => self.navigate_to(View::Settings),
            ShortcutAction::NewCustomer => {
                if self.state.current_view == View::NewVisit {
                    self.state.open_new_customer_for_visit();
                } else {
                    self.state.open_new_customer_form();
                }
            }
            ShortcutAction::FocusSearch => {
                self.navigate_to(View::Customers);
                self.state.focus_search = true;
            }
            ShortcutAction::ExportCsv => self.state.export_requested = true,
            ShortcutAction::CloseModal => {}
            ShortcutAction::ToggleDarkMode => self.state.dark_mode = !self.state.dark_mode,
        }
    }

    /// Spara besökslistan som CSV via en spara-dialog
    fn export_csv(&mut self) {
        let filename = ExportService::generate_filename(today());
        let directory = self
            .app_settings
            .export_directory
            .clone()
            .unwrap_or_else(default_export_dir);

        let file_dialog = rfd::FileDialog::new()
            .set_title("CSV Dışa Aktar")
            .set_directory(&directory)
            .set_file_name(&filename)
            .add_filter("CSV", &["csv"]);

        let Some(path) = file_dialog.save_file() else {
            return;
        };

        match ExportService::new(&self.state.visits, &self.state.customers).export_to_file(&path) {
            Ok(result) => self.state.show_success(&result.summary()),
            Err(e) => {
                error!("CSV-export misslyckades: {:#}", e);
                self.state.show_error(&format!("Dışa aktarma başarısız: {}", e));
            }
        }
    }

    fn resolve_install(&mut self, outcome: PromptOutcome) {
        let Some(installer) = self.installer.as_ref() else {
            return;
        };

        match self.install_prompt.resolve(outcome, installer) {
            Ok(()) if self.install_prompt.is_installed() => self.state.show_success("Yüklendi"),
            Ok(()) => {}
            Err(e) => {
                error!("Installation misslyckades: {:#}", e);
                self.state.show_error(&format!("Yükleme başarısız: {}", e));
            }
        }
    }

    /// Applicera inställningar som sparats i inställningsvyn
    fn apply_settings(&mut self, settings: AppSettings) {
        info!("Inställningar applicerade (positionskälla: {})", settings.location.source);
        self.shortcut_manager.update_shortcuts(settings.shortcuts.clone());
        self.state.dark_mode = settings.dark_mode;
        self.app_settings = settings;
    }

    /// Spara temaval direkt när det växlas utanför inställningsvyn
    fn persist_dark_mode(&mut self) {
        if self.app_settings.dark_mode == self.state.dark_mode {
            return;
        }
        self.app_settings.dark_mode = self.state.dark_mode;
        if let Err(e) = self.app_settings.save() {
            warn!("Kunde inte spara tema: {:#}", e);
        }
    }

    fn top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Ziyaret");
                ui.separator();

                let nav_items = [
                    (View::NewVisit, Icons::VISIT, ShortcutAction::NavigateNewVisit),
                    (View::Visits, Icons::LIST, ShortcutAction::NavigateVisits),
                    (View::Customers, Icons::PEOPLE, ShortcutAction::NavigateCustomers),
                ];

                for (view, icon, shortcut_action) in nav_items {
                    let label = format!("{} {}", icon, view.label());
                    let response = ui.selectable_label(self.state.current_view == view, label);
                    let response = match self.shortcut_manager.shortcut_hint(shortcut_action) {
                        Some(hint) => response.on_hover_text(hint),
                        None => response,
                    };
                    if response.clicked() {
                        self.navigate_to(view);
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let mode_icon = if self.state.dark_mode { "🌙" } else { "☀" };
                    if ui
                        .button(mode_icon)
                        .on_hover_text(
                            self.shortcut_manager
                                .shortcut_hint(ShortcutAction::ToggleDarkMode)
                                .unwrap_or_default(),
                        )
                        .clicked()
                    {
                        self.state.dark_mode = !self.state.dark_mode;
                    }

                    if ui
                        .selectable_label(self.state.current_view == View::Settings, Icons::SETTINGS)
                        .on_hover_text(View::Settings.label())
                        .clicked()
                    {
                        self.navigate_to(View::Settings);
                    }

                    ui.separator();

                    if let Some(text) = self.install_prompt.status_text() {
                        ui.label(
                            egui::RichText::new(format!("{} {}", Icons::CHECK, text))
                                .color(Colors::SUCCESS),
                        );
                    } else if self.install_prompt.can_prompt()
                        && ui.button(format!("{} Ana Ekrana Ekle", Icons::INSTALL)).clicked()
                    {
                        self.state.show_confirm(
                            "Uygulama başlat menüsüne eklensin mi?",
                            ConfirmAction::Install,
                        );
                    }
                });
            });
        });
    }

    fn status_bar(&self, ctx: &egui::Context) {
        let Some(ref status) = self.state.status_message else {
            return;
        };

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let color = match status.status_type {
                StatusType::Success => Colors::SUCCESS,
                StatusType::Error => Colors::ERROR,
            };
            ui.colored_label(color, &status.text);
        });
    }
}

impl eframe::App for ZiyaretApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.applied_dark_mode != Some(self.state.dark_mode) {
            configure_style(ctx, self.state.dark_mode);
            if self.applied_dark_mode.is_some() && self.state.current_view != View::Settings {
                self.persist_dark_mode();
            }
            self.applied_dark_mode = Some(self.state.dark_mode);
        }

        // Rensa gamla statusmeddelanden
        self.state.clear_old_status();
        if self.state.status_message.is_some() {
            ctx.request_repaint_after(std::time::Duration::from_secs(1));
        }

        if self.state.needs_refresh {
            self.refresh_data();
        }

        self.new_visit.poll_location(ctx, &mut self.state);

        if self.state.current_view != View::Settings {
            self.state.capturing_shortcut = false;
        }

        // Kortkommandon
        if let Some(action) = self.shortcut_manager.check(ctx, self.state.capturing_shortcut) {
            self.handle_shortcut_action(action);
        }

        if let Some(settings) = self.state.settings_to_apply.take() {
            self.apply_settings(settings);
        }

        if std::mem::take(&mut self.state.export_requested) {
            self.export_csv();
        }

        self.top_bar(ctx);
        self.status_bar(ctx);

        // Huvudinnehåll
        egui::CentralPanel::default().show(ctx, |ui| match self.state.current_view {
            View::NewVisit => {
                self.new_visit
                    .show(ui, &mut self.state, &self.db, &self.app_settings.location);
            }
            View::Visits => {
                let hint = self.shortcut_manager.shortcut_hint(ShortcutAction::ExportCsv);
                self.visit_list.show(ui, &mut self.state, hint);
            }
            View::Customers => {
                self.customer_list.show(ui, &mut self.state);
            }
            View::Settings => {
                self.settings.show(ui, &mut self.state, &self.app_settings);
            }
        });

        // Modals
        if self.state.show_customer_form
            && self.customer_form_modal.show(ctx, &mut self.state, &self.db)
        {
            self.state.close_customer_form();
        }

        if let Some((confirmed, ConfirmAction::Install)) =
            ConfirmDialog::show(ctx, &mut self.state, &self.db)
        {
            let outcome = if confirmed {
                PromptOutcome::Accepted
            } else {
                PromptOutcome::Dismissed
            };
            self.resolve_install(outcome);
        }
    }
}

/// Öppna och migrera databasen på disk. Fel returneras; ingen reservdatabas.
fn open_database(db_path: &Path) -> AppResult<Database> {
    info!("Öppnar databas: {:?}", db_path);

    let db = Database::open(db_path).and_then(|db| {
        db.migrate()?;
        Ok(db)
    });

    if let Err(ref e) = db {
        error!("Kunde inte öppna databas: {}", e);
    }
    db
}

/// Visas i stället för huvudfönstret när databasen inte kan öppnas.
/// Det finns ingen databas bakom, så inget kan registreras.
pub struct StorageErrorApp {
    message: String,
    database_path: String,
    style_applied: bool,
}

impl StorageErrorApp {
    pub fn new(error: &AppError) -> Self {
        Self {
            message: error.to_string(),
            database_path: display_path(&get_database_path()),
            style_applied: false,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl eframe::App for StorageErrorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.style_applied {
            configure_style(ctx, false);
            self.style_applied = true;
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(48.0);
                ui.heading(egui::RichText::new("Depolama kullanılamıyor").color(Colors::ERROR));
                ui.add_space(12.0);
                ui.label(&self.message);
                ui.label(
                    egui::RichText::new(format!("Veritabanı: {}", self.database_path))
                        .small()
                        .color(Colors::TEXT_MUTED),
                );
                ui.add_space(16.0);
                if ui.button("Kapat").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_database_migrates_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_database(&dir.path().join("ziyaret.db")).unwrap();
        assert_eq!(db.customers().count().unwrap(), 0);
        assert_eq!(db.visits().count().unwrap(), 0);
    }

    #[test]
    fn test_open_database_failure_is_not_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("data");
        std::fs::write(&blocker, "").unwrap();

        let err = open_database(&blocker.join("ziyaret.db")).err().unwrap();
        assert!(matches!(err, AppError::Storage(_)));

        let screen = StorageErrorApp::new(&err);
        assert_eq!(screen.message(), err.to_string());
        assert!(screen.message().starts_with("Depolama kullanılamıyor: "));
    }
}
