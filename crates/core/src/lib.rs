//! # MedCard Core
//!
//! Core business logic for the MedCard patient record system.
//!
//! This crate contains the patient record store and the operations over it:
//! - Record types and presence validation
//! - The [`PatientStore`] contract and its SQLite implementation
//! - [`PatientService`], the entry point every front end composes with
//! - Startup configuration ([`CoreConfig`])
//!
//! **No API concerns**: HTTP servers, wire formats and client adapters belong in `api-rest`,
//! `api-shared` and `medcard-client`.

pub mod config;
pub mod constants;
pub mod error;
pub mod patient;
pub mod record;
pub mod store;
pub mod validation;

pub use config::CoreConfig;
pub use constants::DEFAULT_DATABASE_PATH;
pub use error::{ErrorKind, PatientError, PatientResult};
pub use medcard_types::{NonEmptyText, TextError};
pub use patient::PatientService;
pub use record::{PatientFields, PatientRecord};
pub use store::{PatientStore, SqlitePatientStore};
