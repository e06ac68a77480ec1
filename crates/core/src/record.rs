//! Patient record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The writable fields of a patient record.
///
/// Used for both create and update; an update overwrites every field. Values are unvalidated
/// here; the store checks them with [`crate::validation::validate_patient_fields`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientFields {
    pub name: String,
    pub age: String,
    pub address: String,
    #[serde(default)]
    pub postal_code: Option<String>,
    pub operation: String,
}

/// A stored patient record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Store-assigned identifier, unique within one store.
    pub id: i64,
    pub name: String,
    pub age: String,
    pub address: String,
    pub postal_code: Option<String>,
    /// Free-text description of the operation performed.
    pub operation: String,
    /// Assigned at insert and never changed afterwards.
    pub created_at: DateTime<Utc>,
}

impl PatientRecord {
    /// Returns the writable fields of this record.
    pub fn fields(&self) -> PatientFields {
        PatientFields {
            name: self.name.clone(),
            age: self.age.clone(),
            address: self.address.clone(),
            postal_code: self.postal_code.clone(),
            operation: self.operation.clone(),
        }
    }
}
