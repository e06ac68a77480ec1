//! Patient list adapter.
//!
//! Holds the state a patient list screen renders: the current list and the last user-facing
//! error. Every successful mutation is followed by a full reload of the list; nothing is patched
//! incrementally.

use medcard_core::{PatientFields, PatientRecord};

use crate::backend::RecordBackend;
use crate::error::{ClientError, ClientResult};
use crate::postal::{PostalAddress, PostalLookup};

/// Editable form state for one patient.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientForm {
    pub name: String,
    pub age: String,
    pub address: String,
    pub postal_code: String,
    pub operation: String,
}

impl PatientForm {
    pub fn from_record(record: &PatientRecord) -> Self {
        Self {
            name: record.name.clone(),
            age: record.age.clone(),
            address: record.address.clone(),
            postal_code: record.postal_code.clone().unwrap_or_default(),
            operation: record.operation.clone(),
        }
    }

    /// True when every required field has non-whitespace content.
    ///
    /// Mirrors the check the store performs; it lets the form fail without a round trip.
    pub fn is_complete(&self) -> bool {
        [&self.name, &self.age, &self.address, &self.operation]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    pub fn to_fields(&self) -> PatientFields {
        let postal_code = self.postal_code.trim();
        PatientFields {
            name: self.name.clone(),
            age: self.age.clone(),
            address: self.address.clone(),
            postal_code: (!postal_code.is_empty()).then(|| postal_code.to_string()),
            operation: self.operation.clone(),
        }
    }

    /// Replace the address with the one a postal lookup returned.
    pub fn apply_postal_address(&mut self, address: &PostalAddress) {
        self.address = address.to_address_line();
    }
}

/// Adapter between a patient list screen and a [`RecordBackend`].
pub struct PatientAdapter<B> {
    backend: B,
    patients: Vec<PatientRecord>,
    error: Option<String>,
}

impl<B: RecordBackend> PatientAdapter<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            patients: Vec::new(),
            error: None,
        }
    }

    /// The list as of the last successful reload.
    pub fn patients(&self) -> &[PatientRecord] {
        &self.patients
    }

    /// The last user-facing error message, cleared by the next successful call.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Reload the whole list. On failure the previous list is kept.
    pub async fn refresh(&mut self) -> ClientResult<()> {
        match self.backend.list().await {
            Ok(patients) => {
                self.patients = patients;
                self.error = None;
                Ok(())
            }
            Err(e) => Err(self.fail("load patients", e)),
        }
    }

    /// Load a record into a form for editing.
    pub async fn edit_form(&mut self, id: i64) -> ClientResult<PatientForm> {
        match self.backend.get(id).await {
            Ok(record) => {
                self.error = None;
                Ok(PatientForm::from_record(&record))
            }
            Err(e) => Err(self.fail("load patient", e)),
        }
    }

    /// Create (`editing == None`) or overwrite (`Some(id)`) a record, then reload the list.
    ///
    /// An incomplete form is rejected before the backend is called. If the save succeeds but the
    /// reload fails, the saved record is still returned and the reload error is kept in
    /// [`PatientAdapter::error`].
    pub async fn save(
        &mut self,
        editing: Option<i64>,
        form: &PatientForm,
    ) -> ClientResult<PatientRecord> {
        if !form.is_complete() {
            let err = ClientError::Validation("form has blank required fields".into());
            self.error = Some(err.user_message().to_string());
            return Err(err);
        }

        let fields = form.to_fields();
        let saved = match editing {
            Some(id) => self.backend.update(id, &fields).await,
            None => self.backend.create(&fields).await,
        };

        match saved {
            Ok(record) => {
                self.error = None;
                let _ = self.refresh().await;
                Ok(record)
            }
            Err(e) => Err(self.fail("save patient", e)),
        }
    }

    /// Delete a record, then reload the list.
    pub async fn remove(&mut self, id: i64) -> ClientResult<()> {
        match self.backend.delete(id).await {
            Ok(()) => {
                self.error = None;
                let _ = self.refresh().await;
                Ok(())
            }
            Err(e) => Err(self.fail("delete patient", e)),
        }
    }

    /// Fill `form.address` from `form.postal_code`.
    ///
    /// Only the address is touched. On failure the form is left as it was and the error is
    /// reported like any other adapter error.
    pub async fn fill_address<L: PostalLookup + ?Sized>(
        &mut self,
        lookup: &L,
        form: &mut PatientForm,
    ) -> ClientResult<PostalAddress> {
        match lookup.lookup(&form.postal_code).await {
            Ok(Some(address)) => {
                form.apply_postal_address(&address);
                self.error = None;
                Ok(address)
            }
            Ok(None) => Err(self.fail(
                "postal lookup",
                ClientError::PostalCodeNotFound(form.postal_code.clone()),
            )),
            Err(e) => Err(self.fail("postal lookup", e)),
        }
    }

    fn fail(&mut self, operation: &str, err: ClientError) -> ClientError {
        tracing::error!("{} failed: {:?}", operation, err);
        self.error = Some(err.user_message().to_string());
        err
    }
}
