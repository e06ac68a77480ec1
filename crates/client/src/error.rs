use medcard_core::{ErrorKind, PatientError};

/// Client-side adapter error.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("validation: {0}")]
    Validation(String),

    #[error("patient not found")]
    NotFound,

    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),

    #[error("store: {0}")]
    Store(PatientError),

    #[error("invalid postal code: {0:?}")]
    InvalidPostalCode(String),

    #[error("postal code {0} not found")]
    PostalCodeNotFound(String),
}

impl ClientError {
    /// Generic message suitable for showing to the user. Details stay in the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            ClientError::Validation(_) => "Todos os campos são obrigatórios",
            ClientError::NotFound => "Paciente não encontrado",
            ClientError::Server { .. } | ClientError::Network(_) | ClientError::Decode(_) => {
                "Falha ao comunicar com o servidor"
            }
            ClientError::Store(_) => "Falha ao acessar o banco de dados",
            ClientError::InvalidPostalCode(_) => "CEP inválido",
            ClientError::PostalCodeNotFound(_) => "CEP não encontrado",
        }
    }
}

impl From<PatientError> for ClientError {
    fn from(err: PatientError) -> Self {
        match err.kind() {
            ErrorKind::Validation => ClientError::Validation(err.to_string()),
            ErrorKind::NotFound => ClientError::NotFound,
            ErrorKind::Storage => ClientError::Store(err),
        }
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
