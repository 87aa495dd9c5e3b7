#![forbid(unsafe_code)]

use krishi_kernel_contracts::auth::AuthSessionRecord;
use krishi_kernel_contracts::{ContractViolation, Validate};

#[derive(Debug)]
pub enum StorageError {
    Json(serde_json::Error),
    Contract(ContractViolation),
    CapacityExceeded { ledger: &'static str },
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "json error: {err}"),
            Self::Contract(violation) => write!(f, "contract violation: {violation:?}"),
            Self::CapacityExceeded { ledger } => write!(f, "ledger {ledger} is full"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<ContractViolation> for StorageError {
    fn from(value: ContractViolation) -> Self {
        Self::Contract(value)
    }
}

/// Tab-scoped authenticated-session storage: at most one record, gone when
/// the owning scope ends.
pub trait SessionStore {
    fn store_session(&mut self, record: &AuthSessionRecord) -> Result<(), StorageError>;
    fn active_session(&self) -> Result<Option<AuthSessionRecord>, StorageError>;
    fn clear_session(&mut self);
}

/// In-memory store that keeps the record in its serialized form, mirroring a
/// string-valued browser session slot. Reads re-validate, so a corrupted
/// slot surfaces as an error rather than a phantom login.
#[derive(Debug, Clone, Default)]
pub struct EphemeralSessionStore {
    auth_json: Option<String>,
}

impl EphemeralSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw slot access, for persistence layers that relay the string as-is.
    pub fn raw_slot(&self) -> Option<&str> {
        self.auth_json.as_deref()
    }
}

impl SessionStore for EphemeralSessionStore {
    fn store_session(&mut self, record: &AuthSessionRecord) -> Result<(), StorageError> {
        record.validate()?;
        self.auth_json = Some(serde_json::to_string(record)?);
        Ok(())
    }

    fn active_session(&self) -> Result<Option<AuthSessionRecord>, StorageError> {
        let Some(raw) = &self.auth_json else {
            return Ok(None);
        };
        let record: AuthSessionRecord = serde_json::from_str(raw)?;
        record.validate()?;
        Ok(Some(record))
    }

    fn clear_session(&mut self) {
        self.auth_json = None;
    }
}
