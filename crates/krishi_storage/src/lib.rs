#![forbid(unsafe_code)]

pub mod application_index;
pub mod audit_log;
pub mod session_store;

pub use session_store::{EphemeralSessionStore, SessionStore, StorageError};
