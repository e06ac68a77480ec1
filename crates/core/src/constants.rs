//! Constants used throughout the MedCard core crate.

/// Default SQLite file used when `MEDCARD_DB_PATH` is not set.
pub const DEFAULT_DATABASE_PATH: &str = "medical_records.db";

/// Columns selected for a full [`crate::PatientRecord`], in row-mapping order.
pub(crate) const RECORD_COLUMNS: &str =
    "id, name, age, address, postal_code, operation, created_at";

/// Schema applied when a store is opened.
///
/// `created_at` defaults to an RFC 3339 UTC timestamp with millisecond precision so that rows
/// inserted by other tools still order and parse like rows inserted by the store.
pub(crate) const SCHEMA_SQL: &str = "
    CREATE TABLE IF NOT EXISTS patients (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        age TEXT NOT NULL,
        address TEXT NOT NULL,
        postal_code TEXT,
        operation TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    );
";
