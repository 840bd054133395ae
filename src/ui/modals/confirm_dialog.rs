use egui::{self, RichText};

use crate::db::Database;
use crate::services::{CustomerService, VisitService};
use crate::ui::{
    state::{AppState, ConfirmAction},
    theme::{Colors, Icons},
};

pub struct ConfirmDialog;

impl ConfirmDialog {
    /// Visar bekräftelsedialog. Some(true) = bekräftad, Some(false) = avbruten.
    /// Installationen utförs av huvudappen som äger installeraren.
    pub fn show(ctx: &egui::Context, state: &mut AppState, db: &Database) -> Option<(bool, ConfirmAction)> {
        if !state.show_confirm_dialog {
            return None;
        }
        let action = state.confirm_dialog_action.clone()?;

        let (icon, confirm_label, confirm_color) = match action {
            ConfirmAction::Install => (Icons::INSTALL, "Ekle", Colors::PRIMARY),
            _ => (Icons::DELETE, "Sil", Colors::ERROR),
        };

        let mut result = None;

        egui::Window::new("Onay")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_min_width(300.0);

                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(icon).size(32.0).color(Colors::WARNING));
                    ui.add_space(8.0);
                    ui.label(&state.confirm_dialog_message);
                });

                ui.add_space(16.0);

                ui.horizontal(|ui| {
                    if ui.button("İptal").clicked() {
                        result = Some(false);
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button(RichText::new(confirm_label).color(confirm_color)).clicked() {
                            result = Some(true);
                        }
                    });
                });
            });

        let confirmed = result?;
        if confirmed {
            Self::execute_action(&action, state, db);
        }
        state.close_confirm();
        Some((confirmed, action))
    }

    fn execute_action(action: &ConfirmAction, state: &mut AppState, db: &Database) {
        match action {
            ConfirmAction::DeleteVisit(id) => match VisitService::new(db).delete(*id) {
                Ok(()) => {
                    state.show_success("Ziyaret silindi");
                    state.mark_needs_refresh();
                }
                Err(e) => state.show_error(&e.to_string()),
            },
            ConfirmAction::DeleteCustomer(id) => match CustomerService::new(db).delete(*id) {
                Ok(()) => {
                    if state.visit_draft.customer_id == Some(*id) {
                        state.visit_draft.customer_id = None;
                    }
                    state.show_success("Müşteri silindi");
                    state.mark_needs_refresh();
                }
                Err(e) => state.show_error(&e.to_string()),
            },
            ConfirmAction::Install => {}
        }
    }
}
