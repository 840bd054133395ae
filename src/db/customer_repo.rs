use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use super::{lock, SharedConnection};
use crate::models::Customer;
use crate::utils::{AppError, AppResult};

const SELECT_COLUMNS: &str =
    "SELECT id, name, phone, mail, city, district, address, created_at FROM customers";

pub struct CustomerRepository {
    conn: SharedConnection,
}

impl CustomerRepository {
    pub(crate) fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Hämta alla kunder i id-ordning
    pub fn find_all(&self) -> AppResult<Vec<Customer>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY id", SELECT_COLUMNS))?;

        let customers = stmt
            .query_map([], Self::row_to_customer)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(customers)
    }

    /// Hämta kund via ID
    pub fn find_by_id(&self, id: i64) -> AppResult<Option<Customer>> {
        let conn = lock(&self.conn)?;
        let customer = conn
            .query_row(
                &format!("{} WHERE id = ?", SELECT_COLUMNS),
                [id],
                Self::row_to_customer,
            )
            .optional()?;

        Ok(customer)
    }

    /// Skapa ny kund. Namnet valideras av anroparen, inte här.
    pub fn create(&self, customer: &mut Customer) -> AppResult<i64> {
        let conn = lock(&self.conn)?;
        conn.execute(
            "INSERT INTO customers (name, phone, mail, city, district, address)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                customer.name,
                customer.phone,
                customer.mail,
                customer.city,
                customer.district,
                customer.address,
            ],
        )?;

        let id = conn.last_insert_rowid();
        customer.id = Some(id);
        debug!("Skapade kund {}", id);

        Ok(id)
    }

    /// Ersätt alla fält. Saknad kund är en tyst no-op.
    pub fn update(&self, customer: &Customer) -> AppResult<()> {
        let id = customer
            .id
            .ok_or_else(|| AppError::not_found("müşteri kimliği yok"))?;

        let conn = lock(&self.conn)?;
        let rows = conn.execute(
            "UPDATE customers SET
                name = ?1, phone = ?2, mail = ?3, city = ?4, district = ?5, address = ?6
             WHERE id = ?7",
            params![
                customer.name,
                customer.phone,
                customer.mail,
                customer.city,
                customer.district,
                customer.address,
                id,
            ],
        )?;

        if rows == 0 {
            debug!("Uppdatering av kund {} ignorerad, finns inte", id);
        }

        Ok(())
    }

    /// Ta bort kund. Idempotent, och besök lämnas orörda.
    pub fn delete(&self, id: i64) -> AppResult<()> {
        let conn = lock(&self.conn)?;
        let rows = conn.execute("DELETE FROM customers WHERE id = ?", [id])?;

        if rows == 0 {
            debug!("Kund {} fanns inte vid radering", id);
        }

        Ok(())
    }

    /// Räkna antal kunder
    pub fn count(&self) -> AppResult<i64> {
        let conn = lock(&self.conn)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM customers", [], |row| row.get(0))?;
        Ok(count)
    }

    fn row_to_customer(row: &Row) -> rusqlite::Result<Customer> {
        Ok(Customer {
            id: row.get(0)?,
            name: row.get(1)?,
            phone: row.get(2)?,
            mail: row.get(3)?,
            city: row.get(4)?,
            district: row.get(5)?,
            address: row.get(6)?,
            created_at: row.get(7)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_create_and_find() {
        let db = setup_db();
        let repo = db.customers();

        let mut customer = Customer::new("Kutuyum Ambalaj").with_location("Manisa", "Akhisar", "");
        let id = repo.create(&mut customer).unwrap();
        assert!(id > 0);
        assert_eq!(customer.id, Some(id));

        let found = repo.find_by_id(id).unwrap().unwrap();
        assert_eq!(found.name, "Kutuyum Ambalaj");
        assert_eq!(found.city, "Manisa");
        assert_eq!(found.phone, "");

        assert!(repo.find_by_id(id + 100).unwrap().is_none());
    }

    #[test]
    fn test_ids_distinct_and_increasing() {
        let db = setup_db();
        let repo = db.customers();

        let ids: Vec<i64> = (0..5)
            .map(|i| repo.create(&mut Customer::new(format!("Kund {}", i))).unwrap())
            .collect();

        assert!(ids.windows(2).all(|w| w[0] < w[1]));

        let all = repo.find_all().unwrap();
        assert_eq!(all.len(), 5);
        let found_ids: Vec<i64> = all.iter().filter_map(|c| c.id).collect();
        assert_eq!(found_ids, ids);
    }

    #[test]
    fn test_seed_counts_toward_total() {
        let db = setup_db();
        db.seed_demo_customers().unwrap();
        let repo = db.customers();

        let mut extra = Customer::new("Yeni");
        let id = repo.create(&mut extra).unwrap();

        let all = repo.find_all().unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all.last().and_then(|c| c.id), Some(id));
        assert_eq!(all[0].name, "Kutuyum Ambalaj");
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let db = setup_db();
        let repo = db.customers();

        let first = repo.create(&mut Customer::new("A")).unwrap();
        repo.delete(first).unwrap();
        let second = repo.create(&mut Customer::new("B")).unwrap();

        assert!(second > first);
    }

    #[test]
    fn test_update_replaces_all_fields() {
        let db = setup_db();
        let repo = db.customers();

        let mut customer = Customer::new("Esin Ofset")
            .with_contact("+90 541 111 11 11", "info@esinofset.com")
            .with_location("Balıkesir", "Merkez", "Balıkesir");
        let id = repo.create(&mut customer).unwrap();

        let replacement = Customer {
            id: Some(id),
            name: "Esin Matbaa".into(),
            city: "İzmir".into(),
            ..Default::default()
        };
        repo.update(&replacement).unwrap();

        let found = repo.find_by_id(id).unwrap().unwrap();
        assert_eq!(found.name, "Esin Matbaa");
        assert_eq!(found.city, "İzmir");
        assert_eq!(found.phone, "");
        assert_eq!(found.mail, "");
        assert_eq!(found.district, "");
    }

    #[test]
    fn test_update_missing_is_noop() {
        let db = setup_db();
        let repo = db.customers();
        repo.create(&mut Customer::new("A")).unwrap();

        let ghost = Customer {
            id: Some(999),
            name: "Spöke".into(),
            ..Default::default()
        };
        repo.update(&ghost).unwrap();

        assert_eq!(repo.count().unwrap(), 1);
        assert!(repo.find_by_id(999).unwrap().is_none());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let db = setup_db();
        let repo = db.customers();
        let id = repo.create(&mut Customer::new("A")).unwrap();

        repo.delete(999).unwrap();
        assert_eq!(repo.count().unwrap(), 1);

        repo.delete(id).unwrap();
        repo.delete(id).unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }
}
