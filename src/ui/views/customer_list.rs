use egui::{self, RichText};

use crate::models::Customer;
use crate::ui::{
    state::{AppState, ConfirmAction},
    theme::{Colors, Icons},
};
use crate::utils::maps;

enum CardAction {
    Edit(i64),
    Delete(i64, String),
}

/// "Müşteriler": kundlista med fritextfilter
pub struct CustomerListView;

impl CustomerListView {
    pub fn new() -> Self {
        Self
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState) {
        ui.horizontal(|ui| {
            ui.heading(format!("{} Müşteriler", Icons::PEOPLE));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button(format!("{} Yeni Müşteri", Icons::ADD)).clicked() {
                    state.open_new_customer_form();
                }
            });
        });

        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.label(Icons::SEARCH);
            let response = ui.add(
                egui::TextEdit::singleline(&mut state.customer_filter.query)
                    .hint_text("İsim, telefon, e-posta, il, ilçe, adres")
                    .desired_width(ui.available_width() - 40.0),
            );
            if state.focus_search {
                response.request_focus();
                state.focus_search = false;
            }
        });

        ui.add_space(8.0);

        let filtered = state.customer_filter.apply(&state.customers);

        if filtered.is_empty() {
            ui.add_space(24.0);
            ui.vertical_centered(|ui| {
                let text = if state.customer_filter.is_active() {
                    "Eşleşen müşteri yok"
                } else {
                    "Henüz kayıt yok"
                };
                ui.label(RichText::new(text).color(Colors::TEXT_MUTED));
            });
            return;
        }

        let mut pending: Option<CardAction> = None;

        egui::ScrollArea::vertical().show(ui, |ui| {
            for customer in filtered {
                if let Some(action) = Self::customer_card(ui, customer) {
                    pending = Some(action);
                }
                ui.add_space(6.0);
            }
        });

        match pending {
            Some(CardAction::Edit(id)) => state.open_edit_customer_form(id),
            Some(CardAction::Delete(id, name)) => {
                state.show_confirm(&format!("\"{}\" silinsin mi?", name), ConfirmAction::DeleteCustomer(id));
            }
            None => {}
        }
    }

    fn customer_card(ui: &mut egui::Ui, customer: &Customer) -> Option<CardAction> {
        let mut action = None;

        egui::Frame::none()
            .fill(ui.visuals().extreme_bg_color)
            .rounding(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());

                ui.horizontal(|ui| {
                    ui.label(RichText::new(&customer.name).strong());

                    let Some(id) = customer.id else { return };
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .small_button(RichText::new(format!("{} Sil", Icons::DELETE)).color(Colors::ERROR))
                            .clicked()
                        {
                            action = Some(CardAction::Delete(id, customer.name.clone()));
                        }
                        if ui.small_button(format!("{} Güncelle", Icons::EDIT)).clicked() {
                            action = Some(CardAction::Edit(id));
                        }
                    });
                });

                if !customer.phone.is_empty() {
                    ui.label(format!("{} {}", Icons::PHONE, customer.phone));
                }
                if !customer.mail.is_empty() {
                    ui.label(format!("{} {}", Icons::MAIL, customer.mail));
                }
                if !customer.city.is_empty() || !customer.district.is_empty() {
                    ui.label(RichText::new(customer.region_display()).color(Colors::TEXT_SECONDARY));
                }
                if !customer.address.is_empty() {
                    ui.label(&customer.address);
                }

                if let Some(dest) = maps::destination_param(None, Some(customer)) {
                    ui.hyperlink_to(format!("{} Navigasyon", Icons::ROUTE), maps::navigation_url(&dest));
                }
            });

        action
    }
}
