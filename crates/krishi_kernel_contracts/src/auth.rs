#![forbid(unsafe_code)]

use crate::{ContractViolation, MonotonicTimeNs, SchemaVersion, Validate};

pub const AUTH_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OfficerId(String);

impl OfficerId {
    pub fn new(id: impl Into<String>) -> Result<Self, ContractViolation> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "officer_id",
                reason: "must not be empty",
            });
        }
        if id.len() > 128 {
            return Err(ContractViolation::InvalidValue {
                field: "officer_id",
                reason: "must be <= 128 chars",
            });
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Department(String);

impl Department {
    pub fn new(raw: &str) -> Result<Self, ContractViolation> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "department",
                reason: "must not be empty",
            });
        }
        if trimmed.len() > 64 {
            return Err(ContractViolation::InvalidValue {
                field: "department",
                reason: "must be <= 64 chars",
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Portal default when no department is selected.
    pub fn agriculture() -> Self {
        Self("agriculture".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Authenticated official as returned by the login service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub schema_version: SchemaVersion,
    pub user_id: OfficerId,
    pub name: String,
    pub department: Department,
}

impl AuthUser {
    pub fn v1(
        user_id: OfficerId,
        name: String,
        department: Department,
    ) -> Result<Self, ContractViolation> {
        let u = Self {
            schema_version: AUTH_CONTRACT_VERSION,
            user_id,
            name,
            department,
        };
        u.validate()?;
        Ok(u)
    }
}

impl Validate for AuthUser {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.name.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "auth_user.name",
                reason: "must not be empty",
            });
        }
        Ok(())
    }
}

/// The single record held in tab-scoped session storage while an official is
/// logged in. Serialized whole; absence means logged out.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuthSessionRecord {
    pub schema_version: u32,
    pub user_id: String,
    pub user_name: String,
    pub department: String,
    pub login_time: MonotonicTimeNs,
}

impl AuthSessionRecord {
    pub fn v1(user: &AuthUser, login_time: MonotonicTimeNs) -> Self {
        Self {
            schema_version: AUTH_CONTRACT_VERSION.0,
            user_id: user.user_id.as_str().to_string(),
            user_name: user.name.clone(),
            department: user.department.as_str().to_string(),
            login_time,
        }
    }
}

impl Validate for AuthSessionRecord {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != AUTH_CONTRACT_VERSION.0 {
            return Err(ContractViolation::InvalidValue {
                field: "auth_session_record.schema_version",
                reason: "unsupported schema version",
            });
        }
        if self.user_id.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "auth_session_record.user_id",
                reason: "must not be empty",
            });
        }
        if self.user_name.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "auth_session_record.user_name",
                reason: "must not be empty",
            });
        }
        if self.department.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "auth_session_record.department",
                reason: "must not be empty",
            });
        }
        Ok(())
    }
}
