//! # MedCard Client
//!
//! Record client adapters used by MedCard front ends.
//!
//! - [`HttpBackend`] calls the REST API; [`EmbeddedBackend`] calls an on-device store directly.
//! - [`PatientAdapter`] turns UI actions into backend calls and keeps the list a screen renders.
//! - [`ViaCepLookup`] pre-fills addresses from a postal code.
//! - [`RouteGate`] decides which screen a local sign-in flag allows.

pub mod adapter;
pub mod backend;
pub mod error;
pub mod postal;
pub mod route;

pub use adapter::{PatientAdapter, PatientForm};
pub use backend::{EmbeddedBackend, HttpBackend, RecordBackend};
pub use error::{ClientError, ClientResult};
pub use postal::{normalize_postal_code, PostalAddress, PostalLookup, ViaCepLookup};
pub use route::{Route, RouteDecision, RouteGate};
