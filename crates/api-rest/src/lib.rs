//! # API REST
//!
//! REST API implementation for MedCard.
//!
//! Handles:
//! - HTTP endpoints with axum under `/api/pacientes`
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, CORS)
//!
//! Uses `api-shared` for wire types and `medcard-core` for the patient store.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    DeleteRes, ErrorRes, HealthRes, HealthService, PatientReq, PatientRes, MSG_DELETED,
    MSG_INTERNAL, MSG_NOT_FOUND, MSG_REQUIRED_FIELDS, PATIENTS_PATH,
};
use medcard_core::{ErrorKind, PatientError, PatientFields, PatientService};

/// Application state shared across REST API handlers
///
/// Holds the `PatientService` built from the store the binary opened at startup.
#[derive(Clone)]
pub struct AppState {
    pub patient_service: PatientService,
}

impl AppState {
    pub fn new(patient_service: PatientService) -> Self {
        Self { patient_service }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_patients,
        get_patient,
        create_patient,
        update_patient,
        delete_patient,
    ),
    components(schemas(HealthRes, PatientReq, PatientRes, ErrorRes, DeleteRes))
)]
pub struct ApiDoc;

/// Errors returned by the handlers, each rendered as `{"erro": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{}", MSG_REQUIRED_FIELDS)]
    MissingFields,
    #[error("invalid JSON body: {0}")]
    MalformedPayload(String),
    #[error("{}", MSG_NOT_FOUND)]
    NotFound,
    #[error("{}", MSG_INTERNAL)]
    Internal,
}

impl From<PatientError> for ApiError {
    fn from(err: PatientError) -> Self {
        match err.kind() {
            ErrorKind::Validation => ApiError::MissingFields,
            ErrorKind::NotFound => ApiError::NotFound,
            ErrorKind::Storage => {
                tracing::error!("patient store error: {:?}", err);
                ApiError::Internal
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedPayload(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::MissingFields | ApiError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorRes { erro: self.to_string() })).into_response()
    }
}

/// Build the application router.
///
/// Routes:
/// - `GET /health`
/// - `GET|POST /api/pacientes`
/// - `GET|PUT|DELETE /api/pacientes/:id`
/// - Swagger UI at `/swagger-ui`, OpenAPI document at `/api-docs/openapi.json`
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(PATIENTS_PATH, get(list_patients).post(create_patient))
        .route(
            &format!("{PATIENTS_PATH}/:id"),
            get(get_patient).put(update_patient).delete(delete_patient),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Parse a path id. Anything that is not an integer cannot name a record, so it is a 404.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| {
        tracing::debug!("non-numeric patient id {:?}", raw);
        ApiError::NotFound
    })
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/api/pacientes",
    responses(
        (status = 200, description = "All patients, newest first", body = Vec<PatientRes>),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// List all patients
///
/// # Errors
/// Returns `500 Internal Server Error` if the store fails.
#[axum::debug_handler]
async fn list_patients(State(state): State<AppState>) -> Result<Json<Vec<PatientRes>>, ApiError> {
    let patients = state.patient_service.list_patients()?;
    Ok(Json(patients.into_iter().map(PatientRes::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/pacientes/{id}",
    params(("id" = i64, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient found", body = PatientRes),
        (status = 404, description = "Patient not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Read one patient
#[axum::debug_handler]
async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PatientRes>, ApiError> {
    let id = parse_id(&id)?;
    let patient = state.patient_service.get_patient(id)?;
    Ok(Json(patient.into()))
}

#[utoipa::path(
    post,
    path = "/api/pacientes",
    request_body = PatientReq,
    responses(
        (status = 201, description = "Patient created", body = PatientRes),
        (status = 400, description = "A required field is missing", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Create a new patient record
///
/// `nome`, `idade`, `endereco` and `operacao` are required; `cep` is optional.
///
/// # Errors
/// Returns `400 Bad Request` if the body is malformed or a required field is blank, and
/// `500 Internal Server Error` if the insert fails.
#[axum::debug_handler]
async fn create_patient(
    State(state): State<AppState>,
    payload: Result<Json<PatientReq>, JsonRejection>,
) -> Result<(StatusCode, Json<PatientRes>), ApiError> {
    let Json(req) = payload?;
    let fields = PatientFields::from(req);
    let patient = state.patient_service.create_patient(&fields)?;
    Ok((StatusCode::CREATED, Json(patient.into())))
}

#[utoipa::path(
    put,
    path = "/api/pacientes/{id}",
    params(("id" = i64, Path, description = "Patient id")),
    request_body = PatientReq,
    responses(
        (status = 200, description = "Patient updated", body = PatientRes),
        (status = 400, description = "A required field is missing", body = ErrorRes),
        (status = 404, description = "Patient not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Overwrite every field of a patient record
///
/// This is a full replacement: fields absent from the body are not kept from the stored row,
/// they fail validation instead.
#[axum::debug_handler]
async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PatientReq>, JsonRejection>,
) -> Result<Json<PatientRes>, ApiError> {
    let Json(req) = payload?;
    let fields = PatientFields::from(req);
    let id = parse_id(&id)?;
    let patient = state.patient_service.update_patient(id, &fields)?;
    Ok(Json(patient.into()))
}

#[utoipa::path(
    delete,
    path = "/api/pacientes/{id}",
    params(("id" = i64, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient deleted", body = DeleteRes),
        (status = 404, description = "Patient not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Delete a patient record
#[axum::debug_handler]
async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteRes>, ApiError> {
    let id = parse_id(&id)?;
    state.patient_service.delete_patient(id)?;
    Ok(Json(DeleteRes {
        mensagem: MSG_DELETED.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use medcard_core::SqlitePatientStore;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let store = SqlitePatientStore::open_in_memory().expect("in-memory store should open");
        router(AppState::new(PatientService::new(Arc::new(store))))
    }

    async fn api(
        router: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let body = match body {
            Some(v) => Body::from(serde_json::to_string(&v).unwrap()),
            None => Body::empty(),
        };
        let req = builder.body(body).unwrap();
        let resp = router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    fn ana() -> Value {
        json!({
            "nome": "Ana",
            "idade": "34",
            "endereco": "Rua X",
            "operacao": "Apendicectomia"
        })
    }

    #[tokio::test]
    async fn create_read_delete_scenario() {
        let router = test_router();

        let (status, created) = api(&router, "POST", "/api/pacientes", Some(ana())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["id"], 1);
        assert_eq!(created["nome"], "Ana");

        let (status, fetched) = api(&router, "GET", "/api/pacientes/1", None).await;
        assert_eq!(status, StatusCode::OK);
        for field in ["nome", "idade", "endereco", "operacao", "created_at"] {
            assert_eq!(fetched[field], created[field], "field {field}");
        }

        let (status, deleted) = api(&router, "DELETE", "/api/pacientes/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["mensagem"], MSG_DELETED);

        let (status, missing) = api(&router, "GET", "/api/pacientes/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(missing["erro"], MSG_NOT_FOUND);
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let router = test_router();
        let (status, empty) = api(&router, "GET", "/api/pacientes", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(empty, json!([]));

        for name in ["Ana", "Bruno", "Carla"] {
            let mut body = ana();
            body["nome"] = json!(name);
            let (status, _) = api(&router, "POST", "/api/pacientes", Some(body)).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (_, listed) = api(&router, "GET", "/api/pacientes", None).await;
        let names: Vec<&str> = listed
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["nome"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Carla", "Bruno", "Ana"]);
    }

    #[tokio::test]
    async fn create_with_missing_field_is_bad_request_and_writes_nothing() {
        let router = test_router();

        let mut body = ana();
        body.as_object_mut().unwrap().remove("operacao");
        let (status, err) = api(&router, "POST", "/api/pacientes", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["erro"], MSG_REQUIRED_FIELDS);

        let mut body = ana();
        body["nome"] = json!("   ");
        let (status, _) = api(&router, "POST", "/api/pacientes", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, listed) = api(&router, "GET", "/api/pacientes", None).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn create_accepts_numeric_age_and_postal_code() {
        let router = test_router();
        let mut body = ana();
        body["idade"] = json!(34);
        body["cep"] = json!("01001-000");

        let (status, created) = api(&router, "POST", "/api/pacientes", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["idade"], "34");
        assert_eq!(created["cep"], "01001-000");
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let router = test_router();
        let req = Request::builder()
            .method("POST")
            .uri("/api/pacientes")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let resp = router.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_overwrites_all_fields() {
        let router = test_router();
        let mut body = ana();
        body["cep"] = json!("01001-000");
        api(&router, "POST", "/api/pacientes", Some(body)).await;

        let replacement = json!({
            "nome": "Ana Maria",
            "idade": "35",
            "endereco": "Rua Y",
            "operacao": "Colecistectomia"
        });
        let (status, updated) =
            api(&router, "PUT", "/api/pacientes/1", Some(replacement.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["id"], 1);

        let (_, fetched) = api(&router, "GET", "/api/pacientes/1", None).await;
        for field in ["nome", "idade", "endereco", "operacao"] {
            assert_eq!(fetched[field], replacement[field], "field {field}");
        }
        assert!(fetched["cep"].is_null());
    }

    #[tokio::test]
    async fn update_checks_fields_then_existence() {
        let router = test_router();

        let (status, _) = api(&router, "PUT", "/api/pacientes/9", Some(ana())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = api(&router, "PUT", "/api/pacientes/9", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, listed) = api(&router, "GET", "/api/pacientes", None).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let router = test_router();
        let (status, err) = api(&router, "DELETE", "/api/pacientes/3", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(err["erro"], MSG_NOT_FOUND);
    }

    #[tokio::test]
    async fn non_numeric_id_is_not_found() {
        let router = test_router();
        let (status, _) = api(&router, "GET", "/api/pacientes/abc", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_reports_alive() {
        let router = test_router();
        let (status, body) = api(&router, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn store_fault_is_internal_server_error() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("records.db");
        let store = SqlitePatientStore::open(&path).expect("store should open");
        let router = router(AppState::new(PatientService::new(Arc::new(store))));

        rusqlite::Connection::open(&path)
            .unwrap()
            .execute_batch("DROP TABLE patients")
            .unwrap();

        let (status, body) = api(&router, "GET", "/api/pacientes", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "erro": MSG_INTERNAL }));
    }

    #[test]
    fn storage_errors_hide_details() {
        let err = ApiError::from(PatientError::LockPoisoned);
        assert!(matches!(err, ApiError::Internal));
        assert_eq!(err.to_string(), MSG_INTERNAL);
    }
}
