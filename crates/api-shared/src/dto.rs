//! Wire types for `/api/pacientes`.
//!
//! Field names follow the JSON the existing web and desktop clients exchange (`nome`, `idade`,
//! `endereco`, `operacao`, `cep`). Conversions to and from the core record types live here so
//! the server and the HTTP client agree on one mapping.

use chrono::{DateTime, Utc};
use medcard_core::{PatientFields, PatientRecord};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Message returned with 400 responses.
pub const MSG_REQUIRED_FIELDS: &str = "Todos os campos são obrigatórios";
/// Message returned with 404 responses.
pub const MSG_NOT_FOUND: &str = "Paciente não encontrado";
/// Message returned with 500 responses. Store details are logged, never sent.
pub const MSG_INTERNAL: &str = "Erro interno do servidor";
/// Confirmation returned by a successful delete.
pub const MSG_DELETED: &str = "Paciente deletado com sucesso";

/// Create/update request body.
///
/// Every field defaults to empty so that a missing field reaches presence validation and is
/// answered with 400 rather than a deserialization rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PatientReq {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub nome: String,
    /// Accepts a JSON string or number; stored as text.
    #[serde(default, deserialize_with = "text_or_number")]
    pub idade: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub endereco: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cep: Option<String>,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub operacao: String,
}

impl From<PatientReq> for PatientFields {
    fn from(req: PatientReq) -> Self {
        PatientFields {
            name: req.nome,
            age: req.idade,
            address: req.endereco,
            postal_code: req.cep,
            operation: req.operacao,
        }
    }
}

impl From<&PatientFields> for PatientReq {
    fn from(fields: &PatientFields) -> Self {
        PatientReq {
            nome: fields.name.clone(),
            idade: fields.age.clone(),
            endereco: fields.address.clone(),
            cep: fields.postal_code.clone(),
            operacao: fields.operation.clone(),
        }
    }
}

/// One patient as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PatientRes {
    pub id: i64,
    pub nome: String,
    pub idade: String,
    pub endereco: String,
    pub cep: Option<String>,
    pub operacao: String,
    pub created_at: DateTime<Utc>,
}

impl From<PatientRecord> for PatientRes {
    fn from(record: PatientRecord) -> Self {
        PatientRes {
            id: record.id,
            nome: record.name,
            idade: record.age,
            endereco: record.address,
            cep: record.postal_code,
            operacao: record.operation,
            created_at: record.created_at,
        }
    }
}

impl From<PatientRes> for PatientRecord {
    fn from(res: PatientRes) -> Self {
        PatientRecord {
            id: res.id,
            name: res.nome,
            age: res.idade,
            address: res.endereco,
            postal_code: res.cep,
            operation: res.operacao,
            created_at: res.created_at,
        }
    }
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub erro: String,
}

/// Body of a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeleteRes {
    pub mensagem: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match Option::<TextOrNumber>::deserialize(deserializer)? {
        Some(TextOrNumber::Text(s)) => s,
        Some(TextOrNumber::Integer(n)) => n.to_string(),
        Some(TextOrNumber::Float(f)) => f.to_string(),
        None => String::new(),
    })
}
