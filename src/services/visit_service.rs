use chrono::NaiveDate;
use tracing::info;

use crate::db::Database;
use crate::models::{Coordinates, Visit, VisitValidationError};
use crate::utils::{date::today, AppError, AppResult};

/// Innehållet i formuläret "Yeni Ziyaret"
#[derive(Debug, Clone, PartialEq)]
pub struct VisitDraft {
    pub date: NaiveDate,
    pub customer_id: Option<i64>,
    pub notes: String,
    pub outcome: String,
    pub location: Option<Coordinates>,
}

impl Default for VisitDraft {
    fn default() -> Self {
        Self {
            date: today(),
            customer_id: None,
            notes: String::new(),
            outcome: String::new(),
            location: None,
        }
    }
}

impl VisitDraft {
    /// Återställ formuläret efter sparat besök
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn to_visit(&self, customer_id: i64) -> Visit {
        Visit::new(self.date, customer_id)
            .with_notes(self.notes.clone(), self.outcome.clone())
            .with_location(self.location)
    }
}

/// Besöksflöde: validering framför besöks-repositoryt
pub struct VisitService<'a> {
    db: &'a Database,
}

impl<'a> VisitService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Alla besök, senaste först
    pub fn list(&self) -> AppResult<Vec<Visit>> {
        self.db.visits().find_all()
    }

    /// Spara ett besök. Utan vald (och existerande) kund görs ingen ändring.
    pub fn save(&self, draft: &VisitDraft) -> AppResult<Visit> {
        let missing_customer = || AppError::validation(VisitValidationError::MissingCustomer.to_string());

        let customer_id = draft.customer_id.ok_or_else(missing_customer)?;
        if self.db.customers().find_by_id(customer_id)?.is_none() {
            return Err(missing_customer());
        }

        let mut visit = draft.to_visit(customer_id);
        visit
            .validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        self.db.visits().create(&mut visit)?;
        info!(
            "Besök {:?} sparat för kund {} (position: {})",
            visit.id,
            customer_id,
            if visit.location.is_some() { "ja" } else { "nej" }
        );

        Ok(visit)
    }

    /// Radera besök (bekräftelsen sker i UI)
    pub fn delete(&self, id: i64) -> AppResult<()> {
        self.db.visits().delete(id)?;
        info!("Besök {} raderat", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Customer;

    fn setup() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let id = db.customers().create(&mut Customer::new("Kutuyum Ambalaj")).unwrap();
        (db, id)
    }

    #[test]
    fn test_save_without_customer_is_rejected() {
        let (db, _) = setup();
        let service = VisitService::new(&db);

        let draft = VisitDraft {
            notes: "kısa not".into(),
            ..Default::default()
        };
        let err = service.save(&draft).unwrap_err();

        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Lütfen müşteri seçiniz");
        assert_eq!(db.visits().count().unwrap(), 0);
    }

    #[test]
    fn test_save_with_unknown_customer_is_rejected() {
        let (db, id) = setup();
        let service = VisitService::new(&db);

        let draft = VisitDraft {
            customer_id: Some(id + 10),
            ..Default::default()
        };
        assert!(service.save(&draft).is_err());
        assert_eq!(db.visits().count().unwrap(), 0);
    }

    #[test]
    fn test_save_carries_location_only_when_captured() {
        let (db, id) = setup();
        let service = VisitService::new(&db);

        let with_loc = VisitDraft {
            customer_id: Some(id),
            location: Some(Coordinates::new(40.123456, 29.654321)),
            ..Default::default()
        };
        let saved = service.save(&with_loc).unwrap();
        let stored = db.visits().find_by_id(saved.id.unwrap()).unwrap().unwrap();
        assert_eq!(stored.location.map(|c| c.lat), Some(40.123456));
        assert_eq!(stored.location.map(|c| c.lng), Some(29.654321));

        let without = VisitDraft {
            customer_id: Some(id),
            ..Default::default()
        };
        let saved = service.save(&without).unwrap();
        let stored = db.visits().find_by_id(saved.id.unwrap()).unwrap().unwrap();
        assert_eq!(stored.location, None);
    }

    #[test]
    fn test_list_order_and_delete() {
        let (db, id) = setup();
        let service = VisitService::new(&db);
        let draft = VisitDraft {
            customer_id: Some(id),
            ..Default::default()
        };

        let ids: Vec<i64> = (0..3)
            .map(|_| service.save(&draft).unwrap().id.unwrap())
            .collect();

        let listed: Vec<i64> = service.list().unwrap().iter().filter_map(|v| v.id).collect();
        assert_eq!(listed, vec![ids[2], ids[1], ids[0]]);

        service.delete(ids[1]).unwrap();
        service.delete(9999).unwrap();
        assert_eq!(service.list().unwrap().len(), 2);
    }

    #[test]
    fn test_draft_clear_resets_to_today() {
        let mut draft = VisitDraft {
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            customer_id: Some(3),
            notes: "n".into(),
            outcome: "o".into(),
            location: Some(Coordinates::new(1.0, 2.0)),
        };
        draft.clear();
        assert_eq!(draft, VisitDraft::default());
        assert_eq!(draft.date, today());
    }
}
