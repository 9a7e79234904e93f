//! Domain layer for the edudash admin back-office.
//!
//! Records, schemas and validation, the edit-session state machine, the
//! persistence gateway boundary, admin roles and the screen catalog.

pub mod access;
pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod record;
pub mod schema;
pub mod session;
pub mod validation;
pub mod view;

// Re-export common types
pub use error::{DashError, SessionError};
pub use gateway::{PersistenceGateway, RecordKey};
pub use record::{Record, Value};
