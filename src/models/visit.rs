use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Customer;

/// Geografisk position (WGS84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// "lat,lng" för kartlänkar
    pub fn as_query(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }

    /// Fem decimaler för visning
    pub fn display_short(&self) -> String {
        format!("{:.5}, {:.5}", self.lat, self.lng)
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub customer_id: i64,
    pub notes: String,
    pub outcome: String,
    /// Finns bara om positionen hämtades när besöket skapades
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinates>,
    pub created_at: Option<String>,
}

impl Visit {
    pub fn new(date: NaiveDate, customer_id: i64) -> Self {
        Self {
            id: None,
            date,
            customer_id,
            notes: String::new(),
            outcome: String::new(),
            location: None,
            created_at: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>, outcome: impl Into<String>) -> Self {
        self.notes = notes.into();
        self.outcome = outcome.into();
        self
    }

    pub fn with_location(mut self, location: Option<Coordinates>) -> Self {
        self.location = location;
        self
    }

    /// Slå upp kundnamn; None om kunden har raderats
    pub fn customer_name<'a>(&self, customers: &'a [Customer]) -> Option<&'a str> {
        customers
            .iter()
            .find(|c| c.id == Some(self.customer_id))
            .map(|c| c.name.as_str())
    }

    pub fn validate(&self) -> Result<(), VisitValidationError> {
        if self.customer_id <= 0 {
            return Err(VisitValidationError::MissingCustomer);
        }
        if let Some(loc) = self.location {
            if !loc.is_valid() {
                return Err(VisitValidationError::InvalidLocation);
            }
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VisitValidationError {
    #[error("Lütfen müşteri seçiniz")]
    MissingCustomer,
    #[error("Geçersiz konum")]
    InvalidLocation,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_coordinates_format() {
        let c = Coordinates::new(40.123456, 29.654321);
        assert_eq!(c.as_query(), "40.123456,29.654321");
        assert_eq!(c.display_short(), "40.12346, 29.65432");
        assert!(c.is_valid());
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
        assert!(!Coordinates::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_customer_name_lookup() {
        let mut c = Customer::new("Esin Ofset");
        c.id = Some(2);
        let customers = vec![c];

        assert_eq!(Visit::new(date(), 2).customer_name(&customers), Some("Esin Ofset"));
        assert_eq!(Visit::new(date(), 7).customer_name(&customers), None);
    }

    #[test]
    fn test_validation() {
        assert!(Visit::new(date(), 1).validate().is_ok());
        assert!(matches!(
            Visit::new(date(), 0).validate(),
            Err(VisitValidationError::MissingCustomer)
        ));
        assert!(matches!(
            Visit::new(date(), 1)
                .with_location(Some(Coordinates::new(0.0, 200.0)))
                .validate(),
            Err(VisitValidationError::InvalidLocation)
        ));
    }

    #[test]
    fn test_location_omitted_when_serialized() {
        let json = serde_json::to_string(&Visit::new(date(), 1)).unwrap();
        assert!(!json.contains("location"));
        assert!(!json.contains("lat"));

        let with_loc = Visit::new(date(), 1)
            .with_location(Some(Coordinates::new(40.123456, 29.654321)));
        let json = serde_json::to_string(&with_loc).unwrap();
        assert!(json.contains("\"lat\":40.123456"));
    }
}
