//! # API Shared
//!
//! Shared definitions for the MedCard HTTP API.
//!
//! Contains:
//! - Wire types (`dto` module) with the field names existing web clients send
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` on the server side and by `medcard-client` on the client side.

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;

/// Base path of the patient collection.
pub const PATIENTS_PATH: &str = "/api/pacientes";
