//! Record backends: where an adapter sends its CRUD calls.
//!
//! [`HttpBackend`] talks to the REST API (web and desktop front ends). [`EmbeddedBackend`]
//! calls an on-device store directly (mobile front end).

use api_shared::{DeleteRes, ErrorRes, PatientReq, PatientRes, PATIENTS_PATH};
use async_trait::async_trait;
use medcard_core::{PatientFields, PatientRecord, PatientService};
use serde::de::DeserializeOwned;

use crate::error::{ClientError, ClientResult};

/// CRUD calls an adapter can make, whatever carries them.
#[async_trait]
pub trait RecordBackend: Send + Sync {
    async fn list(&self) -> ClientResult<Vec<PatientRecord>>;
    async fn get(&self, id: i64) -> ClientResult<PatientRecord>;
    async fn create(&self, fields: &PatientFields) -> ClientResult<PatientRecord>;
    async fn update(&self, id: i64, fields: &PatientFields) -> ClientResult<PatientRecord>;
    async fn delete(&self, id: i64) -> ClientResult<()>;
}

// ── HTTP ────────────────────────────────────────────────────────────

/// Backend that calls `/api/pacientes` on a MedCard server.
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}{}", self.base_url, PATIENTS_PATH)
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/{}", self.collection_url(), id)
    }

    /// Parse an API response, mapping HTTP errors to `ClientError`.
    async fn parse<R: DeserializeOwned>(resp: reqwest::Response) -> ClientResult<R> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(error_for_status(status.as_u16(), &body));
        }
        resp.json::<R>()
            .await
            .map_err(|e| ClientError::Decode(format!("response body: {}", e)))
    }
}

/// Map a non-success status and its body to a `ClientError`.
///
/// The server sends `{"erro": ...}`; anything else is kept verbatim as the message.
pub(crate) fn error_for_status(status: u16, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorRes>(body)
        .map(|e| e.erro)
        .unwrap_or_else(|_| body.to_string());

    match status {
        400 => ClientError::Validation(message),
        404 => ClientError::NotFound,
        _ => ClientError::Server { status, message },
    }
}

#[async_trait]
impl RecordBackend for HttpBackend {
    async fn list(&self) -> ClientResult<Vec<PatientRecord>> {
        let resp = self.http.get(self.collection_url()).send().await?;
        let patients: Vec<PatientRes> = Self::parse(resp).await?;
        Ok(patients.into_iter().map(PatientRecord::from).collect())
    }

    async fn get(&self, id: i64) -> ClientResult<PatientRecord> {
        let resp = self.http.get(self.item_url(id)).send().await?;
        let patient: PatientRes = Self::parse(resp).await?;
        Ok(patient.into())
    }

    async fn create(&self, fields: &PatientFields) -> ClientResult<PatientRecord> {
        let resp = self
            .http
            .post(self.collection_url())
            .json(&PatientReq::from(fields))
            .send()
            .await?;
        let patient: PatientRes = Self::parse(resp).await?;
        Ok(patient.into())
    }

    async fn update(&self, id: i64, fields: &PatientFields) -> ClientResult<PatientRecord> {
        let resp = self
            .http
            .put(self.item_url(id))
            .json(&PatientReq::from(fields))
            .send()
            .await?;
        let patient: PatientRes = Self::parse(resp).await?;
        Ok(patient.into())
    }

    async fn delete(&self, id: i64) -> ClientResult<()> {
        let resp = self.http.delete(self.item_url(id)).send().await?;
        let confirmation: DeleteRes = Self::parse(resp).await?;
        tracing::debug!("server confirmed delete of {}: {}", id, confirmation.mensagem);
        Ok(())
    }
}

// ── Embedded ────────────────────────────────────────────────────────

/// Backend that calls a local [`PatientService`] in-process.
#[derive(Clone)]
pub struct EmbeddedBackend {
    service: PatientService,
}

impl EmbeddedBackend {
    pub fn new(service: PatientService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RecordBackend for EmbeddedBackend {
    async fn list(&self) -> ClientResult<Vec<PatientRecord>> {
        Ok(self.service.list_patients()?)
    }

    async fn get(&self, id: i64) -> ClientResult<PatientRecord> {
        Ok(self.service.get_patient(id)?)
    }

    async fn create(&self, fields: &PatientFields) -> ClientResult<PatientRecord> {
        Ok(self.service.create_patient(fields)?)
    }

    async fn update(&self, id: i64, fields: &PatientFields) -> ClientResult<PatientRecord> {
        Ok(self.service.update_patient(id, fields)?)
    }

    async fn delete(&self, id: i64) -> ClientResult<()> {
        Ok(self.service.delete_patient(id)?)
    }
}
