#![forbid(unsafe_code)]

use std::env;
use std::time::Duration;

use krishi_kernel_contracts::ContractViolation;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8002";
pub const DEFAULT_USER_AGENT: &str = "krishi-portal/1.0";
pub const DEFAULT_TIMEOUT_MS: u32 = 15_000;

/// Where the portal backend lives and how long one outbound call may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalEndpoints {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_ms: u32,
}

impl PortalEndpoints {
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("KRISHI_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            user_agent: env::var("KRISHI_HTTP_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
            timeout_ms: env::var("KRISHI_HTTP_TIMEOUT_MS")
                .ok()
                .and_then(|raw| raw.trim().parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_MS),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// Service answered with a non-success status and no usable body.
    Http { status: u16 },
    /// Connectivity-level failure; `kind` is a stable classification.
    Transport { kind: &'static str },
    /// Body parsed as JSON but a required field was missing or mistyped.
    MalformedResponse { field: &'static str },
    /// Parsed wire data failed domain validation.
    Contract(ContractViolation),
    InvalidConfig { reason: &'static str },
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http { status } => write!(f, "service returned status {status}"),
            Self::Transport { kind } => write!(f, "transport failure: {kind}"),
            Self::MalformedResponse { field } => {
                write!(f, "malformed service response: missing or invalid {field}")
            }
            Self::Contract(violation) => write!(f, "invalid wire data: {violation:?}"),
            Self::InvalidConfig { reason } => write!(f, "invalid gateway config: {reason}"),
        }
    }
}

impl std::error::Error for GatewayError {}

impl From<ContractViolation> for GatewayError {
    fn from(value: ContractViolation) -> Self {
        Self::Contract(value)
    }
}

pub(crate) fn build_http_agent(endpoints: &PortalEndpoints) -> Result<ureq::Agent, GatewayError> {
    if endpoints.timeout_ms == 0 {
        return Err(GatewayError::InvalidConfig {
            reason: "timeout must be > 0",
        });
    }
    let timeout = Duration::from_millis(u64::from(endpoints.timeout_ms).max(100));
    Ok(ureq::AgentBuilder::new()
        .timeout_connect(timeout)
        .timeout_read(timeout)
        .timeout_write(timeout)
        .user_agent(&endpoints.user_agent)
        .build())
}

pub(crate) fn gateway_error_from_ureq(err: ureq::Error) -> GatewayError {
    match err {
        ureq::Error::Status(status, _) => GatewayError::Http { status },
        ureq::Error::Transport(transport) => {
            let combined = format!("{:?} {}", transport.kind(), transport);
            GatewayError::Transport {
                kind: classify_transport_error_kind(&combined),
            }
        }
    }
}

pub(crate) fn classify_transport_error_kind(raw: &str) -> &'static str {
    let lower = raw.to_ascii_lowercase();
    if lower.contains("timeout") {
        "timeout"
    } else if lower.contains("tls") || lower.contains("ssl") {
        "tls"
    } else if lower.contains("dns") {
        "dns"
    } else if lower.contains("connection") || lower.contains("connect") {
        "connection"
    } else {
        "transport"
    }
}

fn parse_body(response: ureq::Response) -> Result<Value, GatewayError> {
    serde_json::from_reader(response.into_reader()).map_err(|_| GatewayError::MalformedResponse {
        field: "response body",
    })
}

pub(crate) fn get_json(agent: &ureq::Agent, url: &str) -> Result<Value, GatewayError> {
    let response = agent
        .get(url)
        .set("Accept", "application/json")
        .call()
        .map_err(gateway_error_from_ureq)?;
    parse_body(response)
}

/// GET that keeps the body of a non-success status so callers can surface the
/// service's structured `detail`.
pub(crate) fn get_json_allowing_status(
    agent: &ureq::Agent,
    url: &str,
) -> Result<(u16, Value), GatewayError> {
    match agent.get(url).set("Accept", "application/json").call() {
        Ok(response) => Ok((response.status(), parse_body(response)?)),
        Err(ureq::Error::Status(status, response)) => {
            let body = parse_body(response).unwrap_or(Value::Null);
            Ok((status, body))
        }
        Err(err) => Err(gateway_error_from_ureq(err)),
    }
}

pub(crate) fn post_json(
    agent: &ureq::Agent,
    url: &str,
    payload: &Value,
) -> Result<Value, GatewayError> {
    let response = agent
        .post(url)
        .set("Content-Type", "application/json")
        .set("Accept", "application/json")
        .send_json(payload.clone())
        .map_err(gateway_error_from_ureq)?;
    parse_body(response)
}

/// POST counterpart of [`get_json_allowing_status`].
pub(crate) fn post_json_allowing_status(
    agent: &ureq::Agent,
    url: &str,
    payload: &Value,
) -> Result<(u16, Value), GatewayError> {
    match agent
        .post(url)
        .set("Content-Type", "application/json")
        .set("Accept", "application/json")
        .send_json(payload.clone())
    {
        Ok(response) => Ok((response.status(), parse_body(response)?)),
        Err(ureq::Error::Status(status, response)) => {
            let body = parse_body(response).unwrap_or(Value::Null);
            Ok((status, body))
        }
        Err(err) => Err(gateway_error_from_ureq(err)),
    }
}

pub(crate) fn str_field(body: &Value, field: &'static str) -> Result<String, GatewayError> {
    body.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(GatewayError::MalformedResponse { field })
}

pub(crate) fn opt_str_field(body: &Value, field: &str) -> String {
    body.get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub(crate) fn u64_field(body: &Value, field: &'static str) -> Result<u64, GatewayError> {
    body.get(field)
        .and_then(Value::as_u64)
        .ok_or(GatewayError::MalformedResponse { field })
}

pub(crate) fn f64_field(body: &Value, field: &'static str) -> Result<f64, GatewayError> {
    body.get(field)
        .and_then(Value::as_f64)
        .ok_or(GatewayError::MalformedResponse { field })
}

pub(crate) fn decimal_field(body: &Value, field: &'static str) -> Result<Decimal, GatewayError> {
    let raw = f64_field(body, field)?;
    Decimal::from_f64(raw).ok_or(GatewayError::MalformedResponse { field })
}

/// Render a land quantity for the wire, which speaks plain JSON numbers.
pub(crate) fn decimal_to_wire(value: Decimal, field: &'static str) -> Result<f64, GatewayError> {
    use rust_decimal::prelude::ToPrimitive;
    value
        .to_f64()
        .ok_or(GatewayError::MalformedResponse { field })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_gw_01_transport_kinds_are_classified() {
        assert_eq!(classify_transport_error_kind("Io timeout reached"), "timeout");
        assert_eq!(classify_transport_error_kind("Dns no record"), "dns");
        assert_eq!(
            classify_transport_error_kind("ConnectionFailed refused"),
            "connection"
        );
        assert_eq!(classify_transport_error_kind("bad tls handshake"), "tls");
        assert_eq!(classify_transport_error_kind("other"), "transport");
    }

    #[test]
    fn at_gw_02_url_join_handles_trailing_slash() {
        let endpoints = PortalEndpoints::with_base_url("http://localhost:8002/");
        assert_eq!(
            endpoints.url("/api/applications"),
            "http://localhost:8002/api/applications"
        );
    }

    #[test]
    fn at_gw_03_decimal_field_reads_json_numbers() {
        let body: Value = serde_json::json!({"total_land_acres": 2.5});
        assert_eq!(
            decimal_field(&body, "total_land_acres").unwrap(),
            Decimal::new(25, 1)
        );
        assert!(decimal_field(&body, "missing").is_err());
    }

    #[test]
    fn at_gw_04_zero_timeout_is_rejected() {
        let mut endpoints = PortalEndpoints::with_base_url("http://localhost:8002");
        endpoints.timeout_ms = 0;
        assert!(matches!(
            build_http_agent(&endpoints),
            Err(GatewayError::InvalidConfig { .. })
        ));
    }
}
