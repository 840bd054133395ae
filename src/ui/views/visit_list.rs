use egui::{self, RichText};

use crate::models::Visit;
use crate::ui::{
    state::{AppState, ConfirmAction},
    theme::{Colors, Icons},
};
use crate::utils::{date::format_date, maps};

/// "Ziyaretler": senaste besöken först
pub struct VisitListView;

impl VisitListView {
    pub fn new() -> Self {
        Self
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState, export_hint: Option<String>) {
        ui.horizontal(|ui| {
            ui.heading(format!("{} Ziyaretler", Icons::LIST));
            ui.label(RichText::new(format!("({})", state.visits.len())).color(Colors::TEXT_SECONDARY));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let response = ui.button(format!("{} CSV Dışa Aktar", Icons::EXPORT));
                let response = match export_hint {
                    Some(hint) => response.on_hover_text(hint),
                    None => response,
                };
                if response.clicked() {
                    state.export_requested = true;
                }
            });
        });

        ui.add_space(8.0);

        if state.visits.is_empty() {
            ui.add_space(24.0);
            ui.vertical_centered(|ui| {
                ui.label(RichText::new("Henüz kayıt yok").color(Colors::TEXT_MUTED));
            });
            return;
        }

        let mut pending: Option<ConfirmAction> = None;

        egui::ScrollArea::vertical().show(ui, |ui| {
            for visit in &state.visits {
                let name = state.customer_display_name(visit);
                if Self::visit_card(ui, visit, &name) {
                    if let Some(id) = visit.id {
                        pending = Some(ConfirmAction::DeleteVisit(id));
                    }
                }
                ui.add_space(6.0);
            }
        });

        if let Some(action) = pending {
            state.show_confirm("Bu ziyaret silinsin mi?", action);
        }
    }

    /// Returnerar true när "Sil" klickades
    fn visit_card(ui: &mut egui::Ui, visit: &Visit, customer_name: &str) -> bool {
        let mut delete_clicked = false;

        egui::Frame::none()
            .fill(ui.visuals().extreme_bg_color)
            .rounding(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());

                ui.horizontal(|ui| {
                    ui.label(RichText::new(customer_name).strong());
                    ui.label(
                        RichText::new(format!("{} {}", Icons::CALENDAR, format_date(visit.date)))
                            .color(Colors::TEXT_SECONDARY),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .small_button(RichText::new(format!("{} Sil", Icons::DELETE)).color(Colors::ERROR))
                            .clicked()
                        {
                            delete_clicked = true;
                        }
                    });
                });

                if !visit.notes.is_empty() {
                    ui.label(format!("Not: {}", visit.notes));
                }
                if !visit.outcome.is_empty() {
                    ui.label(format!("Sonuç: {}", visit.outcome));
                }

                if let Some(coords) = visit.location {
                    ui.horizontal(|ui| {
                        ui.hyperlink_to(
                            format!("{} Haritada Aç", Icons::MAP),
                            maps::map_view_url(&coords),
                        );
                        ui.hyperlink_to(
                            format!("{} Navigasyon", Icons::ROUTE),
                            maps::navigation_url(&coords.as_query()),
                        );
                    });
                }
            });

        delete_clicked
    }
}
