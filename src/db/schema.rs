/// SQL-schema för ziyaret-databasen

pub const SCHEMA_VERSION: i32 = 1;

pub const CREATE_TABLES: &str = r#"
-- Kunder
CREATE TABLE IF NOT EXISTS customers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL DEFAULT '',
    phone TEXT NOT NULL DEFAULT '',
    mail TEXT NOT NULL DEFAULT '',
    city TEXT NOT NULL DEFAULT '',
    district TEXT NOT NULL DEFAULT '',
    address TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_customers_name ON customers(name);

-- Besök. customer_id saknar främmande nyckel: raderade kunder
-- lämnar besöken orörda.
CREATE TABLE IF NOT EXISTS visits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    customer_id INTEGER NOT NULL,
    notes TEXT NOT NULL DEFAULT '',
    outcome TEXT NOT NULL DEFAULT '',
    lat REAL,
    lng REAL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    CHECK ((lat IS NULL) = (lng IS NULL))
);

CREATE INDEX IF NOT EXISTS idx_visits_customer ON visits(customer_id);
CREATE INDEX IF NOT EXISTS idx_visits_date ON visits(date);

-- Nyckel/värde för engångshändelser
CREATE TABLE IF NOT EXISTS app_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Migrationshistorik
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

/// app_meta-nyckel som markerar att exempelkunderna har lagts in
pub const META_DEMO_SEEDED: &str = "demo_customers_seeded";

/// Exempelkunder: (namn, telefon, mail, stad, distrikt, adress)
pub const DEMO_CUSTOMERS: &[(&str, &str, &str, &str, &str, &str)] = &[
    (
        "Kutuyum Ambalaj",
        "+90 555 000 00 00",
        "info@kutuyum.com",
        "Manisa",
        "Akhisar",
        "Akhisar/Manisa",
    ),
    (
        "Esin Ofset",
        "+90 541 111 11 11",
        "info@esinofset.com",
        "Balıkesir",
        "Merkez",
        "Balıkesir",
    ),
];
