#![forbid(unsafe_code)]

use krishi_engines::auth_gateway::{AuthGateway, LoginError};
use krishi_kernel_contracts::auth::{AuthSessionRecord, AuthUser, Department, OfficerId};
use krishi_kernel_contracts::MonotonicTimeNs;
use krishi_storage::SessionStore;

use crate::stage_error::{DomainFault, StageError, ValidationFault};

pub trait LoginEngine {
    fn login(
        &self,
        user_id: &OfficerId,
        password: &str,
        department: &Department,
    ) -> Result<AuthUser, LoginError>;
}

impl LoginEngine for AuthGateway {
    fn login(
        &self,
        user_id: &OfficerId,
        password: &str,
        department: &Department,
    ) -> Result<AuthUser, LoginError> {
        AuthGateway::login(self, user_id, password, department)
    }
}

/// Authenticate an official and persist the session record. Credentials are
/// checked for presence before any network call; the stored record carries
/// the injected login time.
pub fn run_login<E, S>(
    engine: &E,
    store: &mut S,
    at: MonotonicTimeNs,
    user_id_raw: &str,
    password: &str,
    department: Department,
) -> Result<AuthUser, StageError>
where
    E: LoginEngine,
    S: SessionStore,
{
    if user_id_raw.trim().is_empty() {
        return Err(StageError::Validation(ValidationFault::MissingField {
            field: "user_id",
        }));
    }
    if password.is_empty() {
        return Err(StageError::Validation(ValidationFault::MissingField {
            field: "password",
        }));
    }
    let user_id = OfficerId::new(user_id_raw.trim()).map_err(|_| {
        StageError::Validation(ValidationFault::InvalidField { field: "user_id" })
    })?;

    let user = engine
        .login(&user_id, password, &department)
        .map_err(|err| match err {
            LoginError::InvalidCredentials(detail) => {
                StageError::Domain(DomainFault::InvalidCredentials(detail))
            }
            LoginError::Gateway(err) => StageError::from_gateway(&err),
        })?;

    store
        .store_session(&AuthSessionRecord::v1(&user, at))
        .map_err(|_| StageError::Transport {
            kind: "session_store",
        })?;
    Ok(user)
}
