//! Patient service.
//!
//! Thin layer over a [`PatientStore`] that every front end composes with: the REST API holds
//! one in its state, the embedded client adapter calls it directly. It adds structured logging
//! of operation outcomes; it does not retry or recover store faults.

use crate::error::{ErrorKind, PatientError, PatientResult};
use crate::store::PatientStore;
use crate::{PatientFields, PatientRecord};
use std::sync::Arc;

/// Pure patient data operations - no API concerns
#[derive(Clone)]
pub struct PatientService {
    store: Arc<dyn PatientStore>,
}

impl PatientService {
    /// Creates a new `PatientService` over an explicitly constructed store.
    pub fn new(store: Arc<dyn PatientStore>) -> Self {
        Self { store }
    }

    /// Lists all patients, newest first.
    pub fn list_patients(&self) -> PatientResult<Vec<PatientRecord>> {
        let patients = self.store.list_all().inspect_err(|e| log_failure("list", e))?;
        tracing::debug!(count = patients.len(), "listed patients");
        Ok(patients)
    }

    /// Reads one patient by id.
    pub fn get_patient(&self, id: i64) -> PatientResult<PatientRecord> {
        self.store
            .get_by_id(id)
            .inspect_err(|e| log_failure("get", e))
    }

    /// Creates a patient record.
    ///
    /// # Errors
    ///
    /// Returns a `PatientError` if:
    /// - a required field is blank (`Validation`),
    /// - the insert fails (`Storage`).
    pub fn create_patient(&self, fields: &PatientFields) -> PatientResult<PatientRecord> {
        let record = self
            .store
            .create(fields)
            .inspect_err(|e| log_failure("create", e))?;
        tracing::info!(id = record.id, "created patient");
        Ok(record)
    }

    /// Overwrites every field of patient `id`.
    ///
    /// # Errors
    ///
    /// Returns a `PatientError` if:
    /// - a required field is blank (`Validation`),
    /// - no patient has this id (`NotFound`),
    /// - the update fails (`Storage`).
    pub fn update_patient(&self, id: i64, fields: &PatientFields) -> PatientResult<PatientRecord> {
        let record = self
            .store
            .update(id, fields)
            .inspect_err(|e| log_failure("update", e))?;
        tracing::info!(id, "updated patient");
        Ok(record)
    }

    /// Deletes patient `id`.
    pub fn delete_patient(&self, id: i64) -> PatientResult<()> {
        self.store
            .delete(id)
            .inspect_err(|e| log_failure("delete", e))?;
        tracing::info!(id, "deleted patient");
        Ok(())
    }

    /// Deletes every patient. Not exposed over HTTP.
    pub fn delete_all_patients(&self) -> PatientResult<usize> {
        let removed = self
            .store
            .delete_all()
            .inspect_err(|e| log_failure("delete all", e))?;
        tracing::warn!(removed, "deleted all patients");
        Ok(removed)
    }
}

fn log_failure(operation: &str, err: &PatientError) {
    match err.kind() {
        ErrorKind::Validation | ErrorKind::NotFound => {
            tracing::warn!("{operation} patient rejected: {err}")
        }
        ErrorKind::Storage => tracing::error!("{operation} patient failed: {err:?}"),
    }
}
