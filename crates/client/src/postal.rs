//! Postal-code (CEP) to address enrichment.
//!
//! The lookup is best-effort: it only pre-fills the address field of a form. A failed or empty
//! lookup never blocks saving the record.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{ClientError, ClientResult};

/// Address fragment returned by a postal-code lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PostalAddress {
    #[serde(rename = "cep", default)]
    pub postal_code: String,
    #[serde(rename = "logradouro", default)]
    pub street: String,
    #[serde(rename = "bairro", default)]
    pub district: String,
    #[serde(rename = "localidade", default)]
    pub city: String,
    #[serde(rename = "uf", default)]
    pub state: String,
}

impl PostalAddress {
    /// Single-line address, e.g. `"Praça da Sé, Sé, São Paulo - SP"`. Empty parts are skipped.
    pub fn to_address_line(&self) -> String {
        let locality = match (self.city.is_empty(), self.state.is_empty()) {
            (false, false) => format!("{} - {}", self.city, self.state),
            (false, true) => self.city.clone(),
            (true, false) => self.state.clone(),
            (true, true) => String::new(),
        };

        [self.street.as_str(), self.district.as_str(), locality.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Normalise a CEP to its 8 digits, accepting `01001-000`, `01001000` or `01.001-000`.
pub fn normalize_postal_code(raw: &str) -> ClientResult<String> {
    let digits: String = raw
        .chars()
        .filter(|c| !matches!(c, '-' | '.' | ' '))
        .collect();

    if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ClientError::InvalidPostalCode(raw.to_string()));
    }
    Ok(digits)
}

/// Resolves a postal code to an address fragment.
#[async_trait]
pub trait PostalLookup: Send + Sync {
    /// Returns `Ok(None)` when the service explicitly reports the code as unknown.
    async fn lookup(&self, postal_code: &str) -> ClientResult<Option<PostalAddress>>;
}

/// Lookup against the public ViaCEP service.
pub struct ViaCepLookup {
    http: reqwest::Client,
    base_url: String,
}

impl ViaCepLookup {
    pub const DEFAULT_BASE_URL: &'static str = "https://viacep.com.br/ws";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, digits: &str) -> String {
        format!("{}/{}/json/", self.base_url, digits)
    }
}

impl Default for ViaCepLookup {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl PostalLookup for ViaCepLookup {
    async fn lookup(&self, postal_code: &str) -> ClientResult<Option<PostalAddress>> {
        let digits = normalize_postal_code(postal_code)?;
        let resp = self.http.get(self.url(&digits)).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(ClientError::Server {
                status: status.as_u16(),
                message: body,
            });
        }
        parse_viacep_response(&body)
    }
}

/// Parse a ViaCEP body. `{"erro": true}` (or `"true"`) is the not-found indicator.
pub fn parse_viacep_response(body: &str) -> ClientResult<Option<PostalAddress>> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| ClientError::Decode(format!("postal lookup body: {}", e)))?;

    let not_found = match value.get("erro") {
        Some(serde_json::Value::Bool(flag)) => *flag,
        Some(serde_json::Value::String(flag)) => flag == "true",
        _ => false,
    };
    if not_found {
        return Ok(None);
    }

    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| ClientError::Decode(format!("postal lookup body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SE_BODY: &str = r#"{
        "cep": "01001-000",
        "logradouro": "Praça da Sé",
        "complemento": "lado ímpar",
        "bairro": "Sé",
        "localidade": "São Paulo",
        "uf": "SP",
        "ibge": "3550308"
    }"#;

    #[test]
    fn normalize_accepts_common_formats() {
        assert_eq!(normalize_postal_code("01001-000").unwrap(), "01001000");
        assert_eq!(normalize_postal_code("01.001-000").unwrap(), "01001000");
        assert_eq!(normalize_postal_code(" 01001000 ").unwrap(), "01001000");
    }

    #[test]
    fn normalize_rejects_wrong_length_or_letters() {
        assert!(matches!(
            normalize_postal_code("0100-000"),
            Err(ClientError::InvalidPostalCode(_))
        ));
        assert!(matches!(
            normalize_postal_code("0100a-000"),
            Err(ClientError::InvalidPostalCode(_))
        ));
        assert!(normalize_postal_code("").is_err());
    }

    #[test]
    fn parses_found_address() {
        let address = parse_viacep_response(SE_BODY).unwrap().unwrap();
        assert_eq!(address.street, "Praça da Sé");
        assert_eq!(address.city, "São Paulo");
        assert_eq!(
            address.to_address_line(),
            "Praça da Sé, Sé, São Paulo - SP"
        );
    }

    #[test]
    fn explicit_error_flag_means_not_found() {
        assert_eq!(parse_viacep_response(r#"{"erro": true}"#).unwrap(), None);
        assert_eq!(parse_viacep_response(r#"{"erro": "true"}"#).unwrap(), None);
    }

    #[test]
    fn garbage_body_is_decode_error() {
        assert!(matches!(
            parse_viacep_response("<html>"),
            Err(ClientError::Decode(_))
        ));
    }

    #[test]
    fn address_line_skips_missing_parts() {
        let address = PostalAddress {
            city: "Brasília".into(),
            state: "DF".into(),
            ..Default::default()
        };
        assert_eq!(address.to_address_line(), "Brasília - DF");
    }

    #[test]
    fn url_uses_digits_only() {
        let lookup = ViaCepLookup::new("https://viacep.com.br/ws/");
        assert_eq!(
            lookup.url("01001000"),
            "https://viacep.com.br/ws/01001000/json/"
        );
    }

    async fn serve_viacep() -> String {
        use axum::{extract::Path, http::StatusCode, routing::get, Router};

        let app = Router::new().route(
            "/:cep/json/",
            get(|Path(cep): Path<String>| async move {
                match cep.as_str() {
                    "01001000" => (StatusCode::OK, SE_BODY.to_string()),
                    "99999999" => (StatusCode::OK, r#"{"erro": true}"#.to_string()),
                    _ => (StatusCode::BAD_REQUEST, "Bad Request".to_string()),
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn lookup_calls_service_with_normalized_code() {
        let lookup = ViaCepLookup::new(serve_viacep().await);

        let address = lookup.lookup("01001-000").await.unwrap().unwrap();
        assert_eq!(address.to_address_line(), "Praça da Sé, Sé, São Paulo - SP");

        assert_eq!(lookup.lookup("99999-999").await.unwrap(), None);

        match lookup.lookup("00000-000").await {
            Err(ClientError::Server { status, .. }) => assert_eq!(status, 400),
            other => panic!("expected Server error, got {other:?}"),
        }
    }
}
