use egui::{self, RichText};
use std::time::Duration;

use crate::db::Database;
use crate::models::LocationSettings;
use crate::services::location::{source_from_settings, LOCATION_TIMEOUT};
use crate::services::{LocationCapture, LocationState, VisitService};
use crate::ui::{
    state::AppState,
    theme::{Colors, Icons},
    View,
};
use crate::utils::date::{format_date, parse_date};
use crate::utils::maps;

/// Formuläret "Yeni Ziyaret"
pub struct NewVisitView {
    capture: LocationCapture,
    date_text: String,
    date_error: bool,
}

impl NewVisitView {
    pub fn new() -> Self {
        Self {
            capture: LocationCapture::new(),
            date_text: String::new(),
            date_error: false,
        }
    }

    /// Pollas varje frame, även när en annan vy visas
    pub fn poll_location(&mut self, ctx: &egui::Context, state: &mut AppState) {
        if self.capture.poll() {
            state.visit_draft.location = self.capture.coordinates();
        }
        if self.capture.is_requesting() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        state: &mut AppState,
        db: &Database,
        location: &LocationSettings,
    ) {
        if state.take_new_visit_activation() && self.capture.is_idle() {
            self.request_location(location);
        }

        if self.date_text.is_empty() && !self.date_error {
            self.date_text = format_date(state.visit_draft.date);
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.heading(format!("{} Yeni Ziyaret", Icons::VISIT));
            ui.add_space(12.0);

            egui::Grid::new("new_visit_grid")
                .num_columns(2)
                .spacing([12.0, 10.0])
                .show(ui, |ui| {
                    ui.label(format!("{} Tarih:", Icons::CALENDAR));
                    ui.horizontal(|ui| {
                        let response = ui.add(
                            egui::TextEdit::singleline(&mut self.date_text).desired_width(120.0),
                        );
                        if response.changed() {
                            match parse_date(&self.date_text) {
                                Some(date) => {
                                    state.visit_draft.date = date;
                                    self.date_error = false;
                                }
                                None => self.date_error = true,
                            }
                        }
                        if self.date_error {
                            ui.label(RichText::new("Geçersiz tarih").small().color(Colors::ERROR));
                        } else {
                            ui.label(RichText::new("YYYY-AA-GG").small().color(Colors::TEXT_MUTED));
                        }
                    });
                    ui.end_row();

                    ui.label("Müşteri:");
                    ui.horizontal(|ui| {
                        Self::customer_picker(ui, state);
                        if ui
                            .button(format!("{} Yeni", Icons::ADD))
                            .on_hover_text("Yeni müşteri ekle")
                            .clicked()
                        {
                            state.open_new_customer_for_visit();
                        }
                    });
                    ui.end_row();

                    ui.label("Notlar:");
                    ui.add(
                        egui::TextEdit::singleline(&mut state.visit_draft.notes)
                            .desired_width(360.0)
                            .hint_text("Kısa not"),
                    );
                    ui.end_row();

                    ui.label("Sonuç:");
                    ui.add(
                        egui::TextEdit::multiline(&mut state.visit_draft.outcome)
                            .desired_width(360.0)
                            .desired_rows(3),
                    );
                    ui.end_row();
                });

            ui.add_space(12.0);
            self.location_panel(ui, state, location);

            if let Some(ref error) = state.visit_form_error {
                ui.add_space(8.0);
                ui.label(RichText::new(error).color(Colors::ERROR));
            }

            ui.add_space(16.0);
            if ui
                .add(egui::Button::new(
                    RichText::new(format!("{} Kaydet", Icons::SAVE)).size(18.0),
                ))
                .clicked()
            {
                self.save(state, db);
            }
        });
    }

    fn customer_picker(ui: &mut egui::Ui, state: &mut AppState) {
        let selected_text = state
            .visit_draft
            .customer_id
            .and_then(|id| state.find_customer(id))
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "Müşteri seçiniz".to_string());

        let mut selected = state.visit_draft.customer_id;
        egui::ComboBox::from_id_salt("visit_customer")
            .selected_text(selected_text)
            .width(280.0)
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut selected, None, "Müşteri seçiniz");
                for customer in &state.customers {
                    ui.selectable_value(&mut selected, customer.id, customer.name.as_str());
                }
            });

        if selected != state.visit_draft.customer_id {
            state.visit_draft.customer_id = selected;
            state.visit_form_error = None;
        }
    }

    fn location_panel(&mut self, ui: &mut egui::Ui, state: &AppState, location: &LocationSettings) {
        egui::Frame::none()
            .fill(ui.visuals().extreme_bg_color)
            .rounding(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());

                ui.horizontal(|ui| {
                    let requesting = self.capture.is_requesting();
                    if ui
                        .add_enabled(!requesting, egui::Button::new(format!("{} Konumu Al", Icons::LOCATION)))
                        .clicked()
                    {
                        self.request_location(location);
                    }
                    if requesting {
                        ui.spinner();
                    }
                    if let Some(text) = self.capture.status_text() {
                        let color = match self.capture.state() {
                            LocationState::Resolved(_) => Colors::SUCCESS,
                            LocationState::Failed(_) => Colors::ERROR,
                            LocationState::Unsupported => Colors::WARNING,
                            _ => Colors::TEXT_SECONDARY,
                        };
                        ui.label(RichText::new(text).color(color));
                    }
                });

                if let Some(coords) = self.capture.coordinates() {
                    ui.hyperlink_to(
                        format!("{} Haritada Aç ({})", Icons::MAP, coords.display_short()),
                        maps::map_view_url(&coords),
                    );
                }

                let customer = state
                    .visit_draft
                    .customer_id
                    .and_then(|id| state.find_customer(id));
                let coords = self.capture.coordinates();
                if let Some(dest) = maps::destination_param(coords.as_ref(), customer) {
                    ui.hyperlink_to(
                        format!("{} Navigasyona Başla", Icons::ROUTE),
                        maps::navigation_url(&dest),
                    );
                }
            });
    }

    fn request_location(&mut self, location: &LocationSettings) {
        self.capture.request(source_from_settings(location), LOCATION_TIMEOUT);
    }

    fn save(&mut self, state: &mut AppState, db: &Database) {
        if self.date_error {
            state.visit_form_error = Some("Geçersiz tarih".to_string());
            return;
        }

        state.visit_draft.location = self.capture.coordinates();

        match VisitService::new(db).save(&state.visit_draft) {
            Ok(_) => {
                state.visit_draft.clear();
                state.visit_form_error = None;
                self.capture.reset();
                self.date_text = format_date(state.visit_draft.date);
                state.show_success("Ziyaret kaydedildi");
                state.mark_needs_refresh();
                state.navigate(View::Visits);
            }
            Err(e) => {
                if !e.is_validation() {
                    tracing::error!("Kunde inte spara besök: {}", e);
                }
                state.visit_form_error = Some(e.to_string());
                state.show_error(&e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, Customer};
    use crate::services::{location::FixedSource, CustomerService};
    use crate::utils::date::today;
    use std::sync::Arc;
    use std::time::Instant;

    fn resolve_location(view: &mut NewVisitView, coords: Coordinates) {
        view.capture
            .request(Arc::new(FixedSource::new(Some(coords))), LOCATION_TIMEOUT);
        let start = Instant::now();
        while view.capture.is_requesting() && start.elapsed() < Duration::from_secs(5) {
            view.capture.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_save_clears_form_and_switches_to_visit_list() {
        let db = Database::open_in_memory().unwrap();
        let customer = CustomerService::new(&db)
            .create(Customer::new("Yıldız Matbaa"))
            .unwrap();

        let mut state = AppState::new();
        state.needs_refresh = false;
        let mut view = NewVisitView::new();
        resolve_location(&mut view, Coordinates::new(38.9186, 27.8397));
        assert!(view.capture.coordinates().is_some());

        state.visit_draft.customer_id = customer.id;
        state.visit_draft.notes = "Katalog bırakıldı".into();
        state.visit_draft.outcome = "Teklif istendi".into();
        view.save(&mut state, &db);

        assert_eq!(state.current_view, View::Visits);
        assert_eq!(state.visit_draft.customer_id, None);
        assert!(state.visit_draft.notes.is_empty());
        assert!(state.visit_draft.outcome.is_empty());
        assert_eq!(state.visit_draft.date, today());
        assert_eq!(state.visit_form_error, None);
        assert!(view.capture.is_idle());
        assert!(state.needs_refresh);

        let visits = db.visits().find_all().unwrap();
        assert_eq!(visits.len(), 1);
        assert_eq!(visits[0].customer_id, customer.id.unwrap());
        assert_eq!(visits[0].notes, "Katalog bırakıldı");
        assert_eq!(visits[0].location, Some(Coordinates::new(38.9186, 27.8397)));
    }

    #[test]
    fn test_save_without_customer_stays_on_form() {
        let db = Database::open_in_memory().unwrap();
        let mut state = AppState::new();
        let mut view = NewVisitView::new();

        state.visit_draft.notes = "Kapı kapalıydı".into();
        view.save(&mut state, &db);

        assert_eq!(state.current_view, View::NewVisit);
        assert_eq!(state.visit_form_error.as_deref(), Some("Lütfen müşteri seçiniz"));
        assert_eq!(state.visit_draft.notes, "Kapı kapalıydı");
        assert_eq!(db.visits().count().unwrap(), 0);
    }
}
