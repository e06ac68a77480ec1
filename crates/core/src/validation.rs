//! Input validation utilities.
//!
//! Presence checks only: every required text field must contain at least one non-whitespace
//! character. Values are trimmed; no other sanitization is applied.

use crate::{NonEmptyText, PatientError, PatientFields, PatientResult};

/// Patient fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPatient {
    pub name: NonEmptyText,
    pub age: NonEmptyText,
    pub address: NonEmptyText,
    pub postal_code: Option<NonEmptyText>,
    pub operation: NonEmptyText,
}

/// Validates that all required patient fields are present.
///
/// # Errors
///
/// Returns `PatientError::Validation` naming every missing field, e.g.
/// `"missing required fields: name, operation"`.
pub fn validate_patient_fields(fields: &PatientFields) -> PatientResult<ValidatedPatient> {
    let name = NonEmptyText::new(&fields.name);
    let age = NonEmptyText::new(&fields.age);
    let address = NonEmptyText::new(&fields.address);
    let operation = NonEmptyText::new(&fields.operation);

    match (name, age, address, operation) {
        (Ok(name), Ok(age), Ok(address), Ok(operation)) => Ok(ValidatedPatient {
            name,
            age,
            address,
            postal_code: NonEmptyText::optional(fields.postal_code.as_deref()),
            operation,
        }),
        (name, age, address, operation) => {
            let missing: Vec<&str> = [
                ("name", name.is_err()),
                ("age", age.is_err()),
                ("address", address.is_err()),
                ("operation", operation.is_err()),
            ]
            .into_iter()
            .filter_map(|(field, missing)| missing.then_some(field))
            .collect();

            Err(PatientError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}
