use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use super::{lock, SharedConnection};
use crate::models::{Coordinates, Visit};
use crate::utils::AppResult;

const SELECT_COLUMNS: &str =
    "SELECT id, date, customer_id, notes, outcome, lat, lng, created_at FROM visits";

pub struct VisitRepository {
    conn: SharedConnection,
}

impl VisitRepository {
    pub(crate) fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Hämta alla besök, senaste först (id fallande)
    pub fn find_all(&self) -> AppResult<Vec<Visit>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY id DESC", SELECT_COLUMNS))?;

        let visits = stmt
            .query_map([], Self::row_to_visit)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(visits)
    }

    /// Hämta besök via ID
    pub fn find_by_id(&self, id: i64) -> AppResult<Option<Visit>> {
        let conn = lock(&self.conn)?;
        let visit = conn
            .query_row(
                &format!("{} WHERE id = ?", SELECT_COLUMNS),
                [id],
                Self::row_to_visit,
            )
            .optional()?;

        Ok(visit)
    }

    /// Skapa nytt besök
    pub fn create(&self, visit: &mut Visit) -> AppResult<i64> {
        let conn = lock(&self.conn)?;
        conn.execute(
            "INSERT INTO visits (date, customer_id, notes, outcome, lat, lng)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                visit.date.format("%Y-%m-%d").to_string(),
                visit.customer_id,
                visit.notes,
                visit.outcome,
                visit.location.map(|c| c.lat),
                visit.location.map(|c| c.lng),
            ],
        )?;

        let id = conn.last_insert_rowid();
        visit.id = Some(id);
        debug!("Skapade besök {} för kund {}", id, visit.customer_id);

        Ok(id)
    }

    /// Ta bort besök. Idempotent.
    pub fn delete(&self, id: i64) -> AppResult<()> {
        let conn = lock(&self.conn)?;
        let rows = conn.execute("DELETE FROM visits WHERE id = ?", [id])?;

        if rows == 0 {
            debug!("Besök {} fanns inte vid radering", id);
        }

        Ok(())
    }

    /// Räkna antal besök
    pub fn count(&self) -> AppResult<i64> {
        let conn = lock(&self.conn)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM visits", [], |row| row.get(0))?;
        Ok(count)
    }

    fn row_to_visit(row: &Row) -> rusqlite::Result<Visit> {
        let date_str: String = row.get(1)?;
        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;

        let lat: Option<f64> = row.get(5)?;
        let lng: Option<f64> = row.get(6)?;

        Ok(Visit {
            id: row.get(0)?,
            date,
            customer_id: row.get(2)?,
            notes: row.get(3)?,
            outcome: row.get(4)?,
            location: lat.zip(lng).map(|(lat, lng)| Coordinates::new(lat, lng)),
            created_at: row.get(7)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_find_all_newest_first() {
        let db = Database::open_in_memory().unwrap();
        let repo = db.visits();

        let a = repo.create(&mut Visit::new(date(1), 1)).unwrap();
        let b = repo.create(&mut Visit::new(date(2), 1)).unwrap();
        let c = repo.create(&mut Visit::new(date(3), 2)).unwrap();

        let ids: Vec<i64> = repo.find_all().unwrap().iter().filter_map(|v| v.id).collect();
        assert_eq!(ids, vec![c, b, a]);
    }

    #[test]
    fn test_location_roundtrip_and_absence() {
        let db = Database::open_in_memory().unwrap();
        let repo = db.visits();

        let mut with_loc = Visit::new(date(1), 1)
            .with_notes("a,b", "x\"y")
            .with_location(Some(Coordinates::new(40.123456, 29.654321)));
        let id1 = repo.create(&mut with_loc).unwrap();

        let mut without = Visit::new(date(2), 1);
        let id2 = repo.create(&mut without).unwrap();

        let v1 = repo.find_by_id(id1).unwrap().unwrap();
        assert_eq!(v1.location, Some(Coordinates::new(40.123456, 29.654321)));
        assert_eq!(v1.notes, "a,b");
        assert_eq!(v1.outcome, "x\"y");
        assert_eq!(v1.date, date(1));

        let v2 = repo.find_by_id(id2).unwrap().unwrap();
        assert_eq!(v2.location, None);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        let repo = db.visits();
        let id = repo.create(&mut Visit::new(date(1), 1)).unwrap();

        repo.delete(id + 42).unwrap();
        assert_eq!(repo.count().unwrap(), 1);

        repo.delete(id).unwrap();
        repo.delete(id).unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_visits_survive_customer_delete() {
        let db = Database::open_in_memory().unwrap();
        let mut customer = crate::models::Customer::new("Silinecek");
        let cid = db.customers().create(&mut customer).unwrap();
        db.visits().create(&mut Visit::new(date(1), cid)).unwrap();

        db.customers().delete(cid).unwrap();

        let visits = db.visits().find_all().unwrap();
        assert_eq!(visits.len(), 1);
        assert_eq!(visits[0].customer_id, cid);
    }
}
