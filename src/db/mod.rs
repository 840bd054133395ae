pub mod schema;
pub mod migrations;
pub mod customer_repo;
pub mod visit_repo;

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::utils::{AppError, AppResult};

pub use customer_repo::CustomerRepository;
pub use visit_repo::VisitRepository;

/// Delad connection. Låset ger seriell åtkomst: ett anrop i taget.
pub(crate) type SharedConnection = Arc<Mutex<Connection>>;

/// Lås connection; ett förgiftat lås rapporteras som lagringsfel
pub(crate) fn lock(conn: &SharedConnection) -> AppResult<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| AppError::storage("databasanslutningen är låst efter ett tidigare fel"))
}

/// Huvuddatabas-wrapper med thread-safe access
pub struct Database {
    conn: SharedConnection,
}

impl Database {
    /// Öppna eller skapa databas. Fel i katalog eller fil blir lagringsfel.
    pub fn open(path: &Path) -> AppResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::storage(format!("{}: {}", parent.display(), e)))?;
        }

        let conn = Connection::open(path)
            .map_err(|e| AppError::storage(format!("{}: {}", path.display(), e)))?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA busy_timeout = 5000;
            "
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Öppna in-memory databas (för tester)
    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.migrate()?;
        Ok(db)
    }

    /// Kör databasmigrationer
    pub fn migrate(&self) -> AppResult<()> {
        let conn = lock(&self.conn)?;
        migrations::run_migrations(&conn)
    }

    /// Engångsinläggning av exempelkunder om kundtabellen är tom
    pub fn seed_demo_customers(&self) -> AppResult<usize> {
        let conn = lock(&self.conn)?;
        migrations::seed_demo_customers(&conn)
    }

    /// Hämta kund-repository
    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(Arc::clone(&self.conn))
    }

    /// Hämta besöks-repository
    pub fn visits(&self) -> VisitRepository {
        VisitRepository::new(Arc::clone(&self.conn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_file_database_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("ziyaret.db");

        {
            let db = Database::open(&path).unwrap();
            db.migrate().unwrap();
            assert_eq!(db.seed_demo_customers().unwrap(), 2);
        }

        // Data och seed-markering överlever omstart
        let db = Database::open(&path).unwrap();
        db.migrate().unwrap();
        assert_eq!(db.seed_demo_customers().unwrap(), 0);
        assert_eq!(db.customers().count().unwrap(), 2);
    }

    #[test]
    fn test_open_below_regular_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("data");
        std::fs::write(&blocker, "inte en katalog").unwrap();

        let err = Database::open(&blocker.join("ziyaret.db")).err().unwrap();
        assert!(matches!(err, AppError::Storage(_)));
        assert!(err.to_string().starts_with("Depolama kullanılamıyor: "));
    }
}
