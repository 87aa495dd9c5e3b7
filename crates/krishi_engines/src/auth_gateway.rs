#![forbid(unsafe_code)]

use krishi_kernel_contracts::auth::{AuthUser, Department, OfficerId};
use serde_json::Value;

use crate::gateway::{
    build_http_agent, post_json_allowing_status, str_field, GatewayError, PortalEndpoints,
};

#[derive(Debug, Clone, PartialEq)]
pub enum LoginError {
    /// Service understood the request and refused the credentials.
    InvalidCredentials(String),
    Gateway(GatewayError),
}

impl std::fmt::Display for LoginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials(detail) => write!(f, "{detail}"),
            Self::Gateway(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for LoginError {}

impl From<GatewayError> for LoginError {
    fn from(value: GatewayError) -> Self {
        Self::Gateway(value)
    }
}

/// Client for the authentication service (`POST /api/login`).
#[derive(Debug, Clone)]
pub struct AuthGateway {
    endpoints: PortalEndpoints,
    fixture_json: Option<String>,
}

impl AuthGateway {
    pub fn new(endpoints: PortalEndpoints) -> Self {
        Self {
            endpoints,
            fixture_json: None,
        }
    }

    pub fn with_fixture(endpoints: PortalEndpoints, fixture_json: impl Into<String>) -> Self {
        Self {
            endpoints,
            fixture_json: Some(fixture_json.into()),
        }
    }

    pub fn login(
        &self,
        user_id: &OfficerId,
        password: &str,
        department: &Department,
    ) -> Result<AuthUser, LoginError> {
        let (status, body) = if let Some(fixture) = &self.fixture_json {
            let body: Value =
                serde_json::from_str(fixture).map_err(|_| GatewayError::MalformedResponse {
                    field: "fixture body",
                })?;
            (200, body)
        } else {
            let agent = build_http_agent(&self.endpoints)?;
            let payload = serde_json::json!({
                "user_id": user_id.as_str(),
                "password": password,
                "department": department.as_str(),
            });
            post_json_allowing_status(&agent, &self.endpoints.url("/api/login"), &payload)?
        };

        if (200..300).contains(&status) {
            let user = body.get("user").ok_or(GatewayError::MalformedResponse {
                field: "user",
            })?;
            let parsed = AuthUser::v1(
                OfficerId::new(str_field(user, "id")?).map_err(GatewayError::from)?,
                str_field(user, "name")?,
                Department::new(&str_field(user, "department")?).map_err(GatewayError::from)?,
            )
            .map_err(GatewayError::from)?;
            return Ok(parsed);
        }
        if (400..500).contains(&status) {
            let detail = body
                .get("detail")
                .and_then(Value::as_str)
                .unwrap_or("Invalid credentials")
                .to_string();
            return Err(LoginError::InvalidCredentials(detail));
        }
        Err(GatewayError::Http { status }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> PortalEndpoints {
        PortalEndpoints::with_base_url("http://localhost:8002")
    }

    #[test]
    fn at_aug_01_login_parses_user() {
        let gateway = AuthGateway::with_fixture(
            endpoints(),
            r#"{"user": {"id": "AGRI001", "name": "R. Sharma", "department": "agriculture"}}"#,
        );
        let user = gateway
            .login(
                &OfficerId::new("AGRI001").unwrap(),
                "secret",
                &Department::agriculture(),
            )
            .unwrap();
        assert_eq!(user.user_id.as_str(), "AGRI001");
        assert_eq!(user.name, "R. Sharma");
        assert_eq!(user.department.as_str(), "agriculture");
    }

    #[test]
    fn at_aug_02_missing_user_object_is_malformed() {
        let gateway = AuthGateway::with_fixture(endpoints(), r#"{"ok": true}"#);
        assert!(matches!(
            gateway.login(
                &OfficerId::new("AGRI001").unwrap(),
                "secret",
                &Department::agriculture(),
            ),
            Err(LoginError::Gateway(GatewayError::MalformedResponse { .. }))
        ));
    }
}
