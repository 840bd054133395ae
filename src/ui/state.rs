use crate::models::{AppSettings, Customer, Visit};
use crate::services::{CustomerFilter, VisitDraft};

/// Aktuell vy i applikationen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    NewVisit,
    Visits,
    Customers,
    Settings,
}

impl View {
    pub fn label(&self) -> &'static str {
        match self {
            View::NewVisit => "Yeni Ziyaret",
            View::Visits => "Ziyaretler",
            View::Customers => "Müşteriler",
            View::Settings => "Ayarlar",
        }
    }
}

/// Centraliserat applikationstillstånd
#[derive(Debug, Default)]
pub struct AppState {
    /// Aktuell vy
    pub current_view: View,

    /// Sätts vid varje byte till "Yeni Ziyaret"; förbrukas av positionsfältet
    pub new_visit_activated: bool,

    /// Formuläret för nytt besök
    pub visit_draft: VisitDraft,

    /// Senaste valideringsfel i besöksformuläret
    pub visit_form_error: Option<String>,

    /// Kundlistan i minnet, id stigande
    pub customers: Vec<Customer>,

    /// Besökslistan i minnet, senaste först
    pub visits: Vec<Visit>,

    /// Listorna läses om från databasen nästa frame
    pub needs_refresh: bool,

    /// Filter i kundvyn
    pub customer_filter: CustomerFilter,

    /// Visar kundformulär
    pub show_customer_form: bool,

    /// Kund som redigeras (None = ny kund)
    pub editing_customer_id: Option<i64>,

    /// Ny kund väljs i besöksformuläret när den sparats
    pub select_new_customer: bool,

    /// Visar bekräftelsedialog
    pub show_confirm_dialog: bool,
    pub confirm_dialog_message: String,
    pub confirm_dialog_action: Option<ConfirmAction>,

    /// Statusmeddelande
    pub status_message: Option<StatusMessage>,

    /// Sökfältet i kundvyn ska få fokus
    pub focus_search: bool,

    /// CSV-export begärd (knapp eller genväg)
    pub export_requested: bool,

    /// Inställningsvyn spelar in en genväg
    pub capturing_shortcut: bool,

    /// Sparade inställningar som huvudappen ska applicera
    pub settings_to_apply: Option<AppSettings>,

    /// Dark mode
    pub dark_mode: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            new_visit_activated: true,
            needs_refresh: true,
            ..Default::default()
        }
    }

    /// Navigera till vy
    pub fn navigate(&mut self, view: View) {
        if view == View::NewVisit && self.current_view != View::NewVisit {
            self.new_visit_activated = true;
        }
        self.current_view = view;
    }

    /// Förbruka aktiveringen av "Yeni Ziyaret"
    pub fn take_new_visit_activation(&mut self) -> bool {
        std::mem::take(&mut self.new_visit_activated)
    }

    pub fn find_customer(&self, id: i64) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == Some(id))
    }

    /// Kundnamn för visning; raderade kunder visas som okända
    pub fn customer_display_name(&self, visit: &Visit) -> String {
        visit
            .customer_name(&self.customers)
            .map(str::to_string)
            .unwrap_or_else(|| "Bilinmeyen müşteri".to_string())
    }

    pub fn mark_needs_refresh(&mut self) {
        self.needs_refresh = true;
    }

    /// Öppna kundformulär för ny kund
    pub fn open_new_customer_form(&mut self) {
        self.editing_customer_id = None;
        self.select_new_customer = false;
        self.show_customer_form = true;
    }

    /// Ny kund från besöksformuläret; väljs automatiskt efter sparning
    pub fn open_new_customer_for_visit(&mut self) {
        self.open_new_customer_form();
        self.select_new_customer = true;
    }

    /// Öppna kundformulär för redigering
    pub fn open_edit_customer_form(&mut self, customer_id: i64) {
        self.editing_customer_id = Some(customer_id);
        self.select_new_customer = false;
        self.show_customer_form = true;
    }

    /// Stäng kundformulär
    pub fn close_customer_form(&mut self) {
        self.show_customer_form = false;
        self.editing_customer_id = None;
        self.select_new_customer = false;
    }

    /// Visa bekräftelsedialog
    pub fn show_confirm(&mut self, message: &str, action: ConfirmAction) {
        self.confirm_dialog_message = message.to_string();
        self.confirm_dialog_action = Some(action);
        self.show_confirm_dialog = true;
    }

    /// Stäng bekräftelsedialog
    pub fn close_confirm(&mut self) {
        self.show_confirm_dialog = false;
        self.confirm_dialog_action = None;
    }

    /// Visa statusmeddelande
    pub fn show_status(&mut self, message: &str, status_type: StatusType) {
        self.status_message = Some(StatusMessage {
            text: message.to_string(),
            status_type,
            created_at: std::time::Instant::now(),
        });
    }

    /// Visa framgångsmeddelande
    pub fn show_success(&mut self, message: &str) {
        self.show_status(message, StatusType::Success);
    }

    /// Visa felmeddelande
    pub fn show_error(&mut self, message: &str) {
        self.show_status(message, StatusType::Error);
    }

    /// Rensa statusmeddelande om det är för gammalt
    pub fn clear_old_status(&mut self) {
        if let Some(ref status) = self.status_message {
            if status.created_at.elapsed().as_secs() > 5 {
                self.status_message = None;
            }
        }
    }
}

/// Typ av bekräftelseåtgärd
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteVisit(i64),
    DeleteCustomer(i64),
    Install,
}

/// Statusmeddelande
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub status_type: StatusType,
    pub created_at: std::time::Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusType {
    Success,
    Error,
}

/// Formulärdata för kund
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CustomerFormData {
    pub name: String,
    pub phone: String,
    pub mail: String,
    pub city: String,
    pub district: String,
    pub address: String,
}

impl CustomerFormData {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn from_customer(customer: &Customer) -> Self {
        Self {
            name: customer.name.clone(),
            phone: customer.phone.clone(),
            mail: customer.mail.clone(),
            city: customer.city.clone(),
            district: customer.district.clone(),
            address: customer.address.clone(),
        }
    }

    /// Fälten trimmas; id och created_at tas från `existing`
    pub fn to_customer(&self, existing: Option<&Customer>) -> Customer {
        Customer {
            id: existing.and_then(|c| c.id),
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            mail: self.mail.trim().to_string(),
            city: self.city.trim().to_string(),
            district: self.district.trim().to_string(),
            address: self.address.trim().to_string(),
            created_at: existing.and_then(|c| c.created_at.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_visit_activation_once_per_navigation() {
        let mut state = AppState::new();
        assert!(state.take_new_visit_activation());
        assert!(!state.take_new_visit_activation());

        // Samma vy igen räknas inte som ny aktivering
        state.navigate(View::NewVisit);
        assert!(!state.take_new_visit_activation());

        state.navigate(View::Visits);
        state.navigate(View::NewVisit);
        assert!(state.take_new_visit_activation());
    }

    #[test]
    fn test_status_messages_replace_each_other() {
        let mut state = AppState::new();
        state.show_error("Depolama kullanılamıyor: disk dolu");
        let status = state.status_message.as_ref().unwrap();
        assert_eq!(status.status_type, StatusType::Error);

        state.show_success("Ziyaret kaydedildi");
        state.clear_old_status();
        let status = state.status_message.as_ref().unwrap();
        assert_eq!(status.status_type, StatusType::Success);
        assert_eq!(status.text, "Ziyaret kaydedildi");
    }

    #[test]
    fn test_customer_form_modes() {
        let mut state = AppState::new();
        state.open_new_customer_for_visit();
        assert!(state.show_customer_form);
        assert!(state.select_new_customer);

        state.close_customer_form();
        state.open_edit_customer_form(4);
        assert_eq!(state.editing_customer_id, Some(4));
        assert!(!state.select_new_customer);
    }

    #[test]
    fn test_form_data_roundtrip_keeps_identity() {
        let mut existing = Customer::new("Esin Ofset").with_location("Balıkesir", "Merkez", "");
        existing.id = Some(2);
        existing.created_at = Some("2024-05-01 10:00:00".into());

        let mut form = CustomerFormData::from_customer(&existing);
        form.phone = "  +90 541 111 11 11 ".into();

        let updated = form.to_customer(Some(&existing));
        assert_eq!(updated.id, Some(2));
        assert_eq!(updated.phone, "+90 541 111 11 11");
        assert_eq!(updated.created_at, existing.created_at);
        assert_eq!(updated.city, "Balıkesir");
    }
}
