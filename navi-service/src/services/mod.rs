//! Services layer for navi-service.
//!
//! Business logic for authority accounts, session tokens, bus state,
//! actions and reporting.

mod actions;
mod credentials;
mod database;
mod document_store;
pub mod error;
mod fleet;
mod jwt;
pub mod metrics;
mod report;
mod storage;

pub use actions::{parse_action, ActionDispatcher};
pub use credentials::CredentialService;
pub use database::Database;
pub use document_store::DocumentStore;
pub use error::ServiceError;
pub use fleet::BusRegistry;
pub use jwt::{JwtService, SessionClaims};
pub use report::{format_line, ReportGenerator};
pub use storage::{DocumentStorage, LocalStorage};
