//! Patient record storage.
//!
//! [`PatientStore`] is the CRUD contract every front end relies on. [`SqlitePatientStore`] is
//! the canonical implementation: one file-backed SQLite table, one connection guarded by a
//! mutex, one statement per operation.
//!
//! ## Lifecycle
//!
//! The store is constructed explicitly with [`SqlitePatientStore::open`], handed to whatever
//! composes the HTTP server or the embedded adapter, and closed with
//! [`SqlitePatientStore::close`]. There is no process-wide handle.

use crate::constants::{RECORD_COLUMNS, SCHEMA_SQL};
use crate::validation::{validate_patient_fields, ValidatedPatient};
use crate::{PatientError, PatientFields, PatientRecord, PatientResult};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// CRUD operations over one table of patient records.
pub trait PatientStore: Send + Sync {
    /// Returns every record, newest first. Records created within the same timestamp tick are
    /// ordered by descending id.
    fn list_all(&self) -> PatientResult<Vec<PatientRecord>>;

    /// Returns the record with `id`, or `PatientError::NotFound`.
    fn get_by_id(&self, id: i64) -> PatientResult<PatientRecord>;

    /// Validates `fields` and inserts a new record. Nothing is written if validation fails.
    fn create(&self, fields: &PatientFields) -> PatientResult<PatientRecord>;

    /// Overwrites every writable field of record `id`. `created_at` is kept.
    ///
    /// A missing record is detected from the affected-row count of the update itself.
    fn update(&self, id: i64, fields: &PatientFields) -> PatientResult<PatientRecord>;

    /// Deletes record `id`, or returns `PatientError::NotFound` if no row was affected.
    fn delete(&self, id: i64) -> PatientResult<()>;

    /// Deletes every record and returns how many were removed.
    fn delete_all(&self) -> PatientResult<usize>;
}

/// [`PatientStore`] backed by SQLite via `rusqlite`.
pub struct SqlitePatientStore {
    conn: Mutex<Connection>,
}

impl SqlitePatientStore {
    /// Open or create a store at `path`, creating the patient table if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::StoreOpen` if the file cannot be opened or the schema cannot be
    /// applied.
    pub fn open(path: &Path) -> PatientResult<Self> {
        let conn = Connection::open(path).map_err(|source| PatientError::StoreOpen {
            path: path.to_path_buf(),
            source,
        })?;
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|source| PatientError::StoreOpen {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!("opened patient store at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for tests).
    pub fn open_in_memory() -> PatientResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Close the underlying connection, surfacing any error SQLite reports on close.
    pub fn close(self) -> PatientResult<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| PatientError::LockPoisoned)?;
        conn.close().map_err(|(_, e)| PatientError::StoreClose(e))
    }

    fn lock(&self) -> PatientResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| PatientError::LockPoisoned)
    }
}

impl PatientStore for SqlitePatientStore {
    fn list_all(&self) -> PatientResult<Vec<PatientRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM patients ORDER BY created_at DESC, id DESC"
        ))?;

        let rows = stmt.query_map([], read_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(into_record(row?)?);
        }
        Ok(records)
    }

    fn get_by_id(&self, id: i64) -> PatientResult<PatientRecord> {
        let conn = self.lock()?;
        select_one(&conn, id)
    }

    fn create(&self, fields: &PatientFields) -> PatientResult<PatientRecord> {
        let patient = validate_patient_fields(fields)?;
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO patients (name, age, address, postal_code, operation, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                patient.name.as_str(),
                patient.age.as_str(),
                patient.address.as_str(),
                postal_code_param(&patient),
                patient.operation.as_str(),
                created_at,
            ],
        )?;

        select_one(&conn, conn.last_insert_rowid())
    }

    fn update(&self, id: i64, fields: &PatientFields) -> PatientResult<PatientRecord> {
        let patient = validate_patient_fields(fields)?;

        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE patients
             SET name = ?1, age = ?2, address = ?3, postal_code = ?4, operation = ?5
             WHERE id = ?6",
            params![
                patient.name.as_str(),
                patient.age.as_str(),
                patient.address.as_str(),
                postal_code_param(&patient),
                patient.operation.as_str(),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(PatientError::NotFound(id));
        }

        select_one(&conn, id)
    }

    fn delete(&self, id: i64) -> PatientResult<()> {
        let conn = self.lock()?;
        let changed = conn.execute("DELETE FROM patients WHERE id = ?1", params![id])?;

        if changed == 0 {
            return Err(PatientError::NotFound(id));
        }
        Ok(())
    }

    fn delete_all(&self) -> PatientResult<usize> {
        let conn = self.lock()?;
        Ok(conn.execute("DELETE FROM patients", [])?)
    }
}

/// Raw column values of one row, before timestamp parsing.
type RawRow = (i64, String, String, String, Option<String>, String, String);

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn into_record(raw: RawRow) -> PatientResult<PatientRecord> {
    let (id, name, age, address, postal_code, operation, created_at) = raw;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|source| PatientError::InvalidTimestamp {
            value: created_at.clone(),
            source,
        })?
        .with_timezone(&Utc);

    Ok(PatientRecord {
        id,
        name,
        age,
        address,
        postal_code,
        operation,
        created_at,
    })
}

fn select_one(conn: &Connection, id: i64) -> PatientResult<PatientRecord> {
    let raw = conn
        .query_row(
            &format!("SELECT {RECORD_COLUMNS} FROM patients WHERE id = ?1"),
            params![id],
            read_row,
        )
        .optional()?
        .ok_or(PatientError::NotFound(id))?;
    into_record(raw)
}

fn postal_code_param(patient: &ValidatedPatient) -> Option<&str> {
    patient.postal_code.as_ref().map(|p| p.as_str())
}
