use egui::{self, RichText};

use crate::db::Database;
use crate::services::CustomerService;
use crate::ui::{
    state::{AppState, CustomerFormData},
    theme::{Colors, Icons},
};
use crate::utils::AppResult;

pub struct CustomerFormModal {
    form_data: CustomerFormData,
    error_message: Option<String>,
    /// Kund vars data ligger i formuläret
    loaded_id: Option<i64>,
}

impl CustomerFormModal {
    pub fn new() -> Self {
        Self {
            form_data: CustomerFormData::default(),
            error_message: None,
            loaded_id: None,
        }
    }

    /// Visar modalen och returnerar true om den ska stängas
    pub fn show(&mut self, ctx: &egui::Context, state: &mut AppState, db: &Database) -> bool {
        let mut should_close = false;

        // Ladda befintlig kund om vi redigerar
        if let Some(customer_id) = state.editing_customer_id {
            if self.loaded_id != Some(customer_id) {
                if let Some(customer) = state.find_customer(customer_id) {
                    self.form_data = CustomerFormData::from_customer(customer);
                }
                self.loaded_id = Some(customer_id);
            }
        }

        let title = if state.editing_customer_id.is_some() {
            "Müşteri Güncelle"
        } else {
            "Yeni Müşteri"
        };

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_min_width(420.0);

                egui::Grid::new("customer_form_grid")
                    .num_columns(2)
                    .spacing([8.0, 8.0])
                    .show(ui, |ui| {
                        ui.label("Müşteri adı:");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.form_data.name)
                                .hint_text("Zorunlu"),
                        );
                        ui.end_row();

                        ui.label("Telefon:");
                        ui.text_edit_singleline(&mut self.form_data.phone);
                        ui.end_row();

                        ui.label("E-posta:");
                        ui.text_edit_singleline(&mut self.form_data.mail);
                        ui.end_row();

                        ui.label("İl:");
                        ui.text_edit_singleline(&mut self.form_data.city);
                        ui.end_row();

                        ui.label("İlçe:");
                        ui.text_edit_singleline(&mut self.form_data.district);
                        ui.end_row();

                        ui.label("Adres:");
                        ui.add(
                            egui::TextEdit::multiline(&mut self.form_data.address)
                                .desired_rows(2),
                        );
                        ui.end_row();
                    });

                if let Some(ref error) = self.error_message {
                    ui.add_space(8.0);
                    ui.label(RichText::new(error).color(Colors::ERROR));
                }

                ui.add_space(16.0);

                ui.horizontal(|ui| {
                    if ui.button("İptal").clicked() {
                        self.reset();
                        should_close = true;
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button(format!("{} Kaydet", Icons::SAVE)).clicked() {
                            match self.save(state, db) {
                                Ok(()) => {
                                    self.reset();
                                    should_close = true;
                                    state.show_success("Müşteri kaydedildi");
                                }
                                Err(e) => {
                                    if !e.is_validation() {
                                        tracing::error!("Kunde inte spara kund: {}", e);
                                    }
                                    self.error_message = Some(e.to_string());
                                }
                            }
                        }
                    });
                });
            });

        should_close
    }

    fn save(&mut self, state: &mut AppState, db: &Database) -> AppResult<()> {
        let service = CustomerService::new(db);

        match state.editing_customer_id {
            Some(customer_id) => {
                let existing = state.find_customer(customer_id);
                let mut customer = self.form_data.to_customer(existing);
                // Kunden kan ha raderats medan formuläret var öppet
                customer.id = Some(customer_id);
                service.update(&customer)?;
            }
            None => {
                let created = service.create(self.form_data.to_customer(None))?;
                if state.select_new_customer {
                    state.visit_draft.customer_id = created.id;
                }
            }
        }

        state.mark_needs_refresh();
        Ok(())
    }

    /// Töm formuläret, t.ex. när modalen stängs med Escape
    pub fn reset(&mut self) {
        self.form_data.clear();
        self.error_message = None;
        self.loaded_id = None;
    }
}
