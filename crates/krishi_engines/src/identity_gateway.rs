#![forbid(unsafe_code)]

use krishi_kernel_contracts::identity::{AadhaarNumber, IdentityRecord, MobileNumber};
use serde_json::Value;

use crate::gateway::{
    build_http_agent, decimal_field, get_json_allowing_status, str_field, GatewayError,
    PortalEndpoints,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityLookupOutcome {
    Found(IdentityRecord),
    NotFound,
}

/// Client for the identity registry (`GET /api/aadhaar/search/{id}`).
#[derive(Debug, Clone)]
pub struct IdentityGateway {
    endpoints: PortalEndpoints,
    fixture_json: Option<String>,
}

impl IdentityGateway {
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

    pub fn lookup(&self, aadhaar: &AadhaarNumber) -> Result<IdentityLookupOutcome, GatewayError> {
        let (status, body) = if let Some(fixture) = &self.fixture_json {
            let body: Value =
                serde_json::from_str(fixture).map_err(|_| GatewayError::MalformedResponse {
                    field: "fixture body",
                })?;
            (200, body)
        } else {
            let agent = build_http_agent(&self.endpoints)?;
            let url = self
                .endpoints
                .url(&format!("/api/aadhaar/search/{}", aadhaar.as_str()));
            get_json_allowing_status(&agent, &url)?
        };

        // A registry miss may arrive either as 404 or as `success: false`.
        if status == 404 {
            return Ok(IdentityLookupOutcome::NotFound);
        }
        if !(200..300).contains(&status) {
            return Err(GatewayError::Http { status });
        }
        parse_lookup_body(&body)
    }
}

fn parse_lookup_body(body: &Value) -> Result<IdentityLookupOutcome, GatewayError> {
    let success = body.get("success").and_then(Value::as_bool).unwrap_or(false);
    let record = body.get("record");
    let (true, Some(record)) = (success, record) else {
        return Ok(IdentityLookupOutcome::NotFound);
    };

    let mobile = MobileNumber::parse(&str_field(record, "mobile_number")?)?;
    let identity = IdentityRecord::v1(
        str_field(record, "name")?,
        mobile,
        decimal_field(record, "total_land_acres")?,
        str_field(record, "state")?,
        str_field(record, "district")?,
        str_field(record, "village")?,
        str_field(record, "address")?,
    )?;
    Ok(IdentityLookupOutcome::Found(identity))
}
