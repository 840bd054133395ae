use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use super::schema::{CREATE_TABLES, DEMO_CUSTOMERS, META_DEMO_SEEDED, SCHEMA_VERSION};
use crate::utils::AppResult;

/// Kör alla nödvändiga migrationer
pub fn run_migrations(conn: &Connection) -> AppResult<()> {
    let current_version = get_current_version(conn)?;

    if current_version == 0 {
        info!("Skapar ny databas med schema version {}", SCHEMA_VERSION);
        initial_setup(conn)?;
    } else {
        info!("Databas är uppdaterad (version {})", current_version);
    }

    Ok(())
}

fn get_current_version(conn: &Connection) -> AppResult<i32> {
    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_migrations')",
        [],
        |row| row.get(0),
    )?;

    if !table_exists {
        return Ok(0);
    }

    let version: Option<i32> =
        conn.query_row("SELECT MAX(version) FROM schema_migrations", [], |row| row.get(0))?;

    Ok(version.unwrap_or(0))
}

fn initial_setup(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(CREATE_TABLES)?;

    conn.execute(
        "INSERT INTO schema_migrations (version) VALUES (?)",
        [SCHEMA_VERSION],
    )?;

    info!("Initial setup klar");
    Ok(())
}

/// Lägg in exempelkunderna en gång, och bara om kundtabellen är tom.
/// Returnerar antal inlagda kunder.
pub fn seed_demo_customers(conn: &Connection) -> AppResult<usize> {
    let already_seeded: Option<String> = conn
        .query_row(
            "SELECT value FROM app_meta WHERE key = ?",
            [META_DEMO_SEEDED],
            |row| row.get(0),
        )
        .optional()?;

    if already_seeded.is_some() {
        return Ok(0);
    }

    let count: i64 = conn.query_row("SELECT COUNT(*) FROM customers", [], |row| row.get(0))?;

    let mut inserted = 0;
    if count == 0 {
        let mut stmt = conn.prepare(
            "INSERT INTO customers (name, phone, mail, city, district, address)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;

        for (name, phone, mail, city, district, address) in DEMO_CUSTOMERS {
            stmt.execute(params![name, phone, mail, city, district, address])?;
            inserted += 1;
        }

        info!("Lade till {} exempelkunder", inserted);
    }

    // Markera även när tabellen redan hade kunder, så att seed aldrig körs senare
    conn.execute(
        "INSERT OR REPLACE INTO app_meta (key, value, updated_at) VALUES (?1, ?2, datetime('now'))",
        params![META_DEMO_SEEDED, inserted.to_string()],
    )?;

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_initial_migration() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"customers".to_string()));
        assert!(tables.contains(&"visits".to_string()));
        assert!(tables.contains(&"app_meta".to_string()));
    }

    #[test]
    fn test_idempotent_migration() {
        let conn = Connection::open_in_memory().unwrap();

        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let version = get_current_version(&conn).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_seed_runs_once() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(seed_demo_customers(&conn).unwrap(), DEMO_CUSTOMERS.len());
        assert_eq!(seed_demo_customers(&conn).unwrap(), 0);

        // Även efter att alla kunder raderats ska seed inte köras igen
        conn.execute("DELETE FROM customers", []).unwrap();
        assert_eq!(seed_demo_customers(&conn).unwrap(), 0);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM customers", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_seed_skipped_when_customers_exist() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute("INSERT INTO customers (name) VALUES ('Befintlig')", []).unwrap();

        assert_eq!(seed_demo_customers(&conn).unwrap(), 0);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM customers", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
