#![forbid(unsafe_code)]

use krishi_kernel_contracts::application::{
    ApplicationId, ApplicationRecord, ApplicationStatus, ApplicationSubmission, FieldError,
};
use krishi_kernel_contracts::identity::MobileNumber;
use serde_json::Value;

use crate::gateway::{
    build_http_agent, decimal_field, decimal_to_wire, get_json, get_json_allowing_status,
    opt_str_field, post_json_allowing_status, str_field, GatewayError, PortalEndpoints,
};

/// Failure of the create call, separating a service-side payload rejection
/// (field errors, correctable by the user) from everything else.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateError {
    Rejected(Vec<FieldError>),
    Gateway(GatewayError),
}

impl std::fmt::Display for CreateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(errors) => write!(f, "application rejected ({} field errors)", errors.len()),
            Self::Gateway(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for CreateError {}

impl From<GatewayError> for CreateError {
    fn from(value: GatewayError) -> Self {
        Self::Gateway(value)
    }
}

/// Failure of a single-record fetch; a miss carries the service detail.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    NotFound(String),
    Gateway(GatewayError),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(detail) => write!(f, "{detail}"),
            Self::Gateway(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<GatewayError> for FetchError {
    fn from(value: GatewayError) -> Self {
        Self::Gateway(value)
    }
}

/// Client for the application persistence service (`/api/applications`).
#[derive(Debug, Clone)]
pub struct ApplicationGateway {
    endpoints: PortalEndpoints,
    create_fixture_json: Option<String>,
    list_fixture_json: Option<String>,
    fetch_fixture_json: Option<String>,
}

impl ApplicationGateway {
    pub fn new(endpoints: PortalEndpoints) -> Self {
        Self {
            endpoints,
            create_fixture_json: None,
            list_fixture_json: None,
            fetch_fixture_json: None,
        }
    }

    pub fn with_create_fixture(mut self, fixture_json: impl Into<String>) -> Self {
        self.create_fixture_json = Some(fixture_json.into());
        self
    }

    pub fn with_list_fixture(mut self, fixture_json: impl Into<String>) -> Self {
        self.list_fixture_json = Some(fixture_json.into());
        self
    }

    pub fn with_fetch_fixture(mut self, fixture_json: impl Into<String>) -> Self {
        self.fetch_fixture_json = Some(fixture_json.into());
        self
    }

    pub fn create(&self, submission: &ApplicationSubmission) -> Result<ApplicationId, CreateError> {
        let (status, body) = if let Some(fixture) = &self.create_fixture_json {
            let body: Value =
                serde_json::from_str(fixture).map_err(|_| GatewayError::MalformedResponse {
                    field: "fixture body",
                })?;
            (200, body)
        } else {
            let agent = build_http_agent(&self.endpoints)?;
            let payload = serde_json::json!({
                "farmer_name": submission.farmer_name,
                "aadhaar_number": submission.aadhaar_number.as_str(),
                "mobile_number": submission.mobile_number.as_str(),
                "state": submission.state,
                "district": submission.district,
                "address": submission.address,
                "total_land_acres":
                    decimal_to_wire(submission.total_land_acres.value(), "total_land_acres")?,
                "crop_type": submission.crop_type.as_str(),
                "fertilizer_qty": decimal_to_wire(submission.fertilizer_qty, "fertilizer_qty")?,
                "seed_qty": decimal_to_wire(submission.seed_qty, "seed_qty")?,
            });
            post_json_allowing_status(&agent, &self.endpoints.url("/api/applications"), &payload)?
        };

        if (200..300).contains(&status) {
            let id = ApplicationId::new(str_field(&body, "application_id")?)
                .map_err(GatewayError::from)?;
            return Ok(id);
        }
        Err(parse_rejection(status, &body))
    }

    pub fn list(&self) -> Result<Vec<ApplicationRecord>, GatewayError> {
        let body: Value = if let Some(fixture) = &self.list_fixture_json {
            serde_json::from_str(fixture).map_err(|_| GatewayError::MalformedResponse {
                field: "fixture body",
            })?
        } else {
            let agent = build_http_agent(&self.endpoints)?;
            get_json(&agent, &self.endpoints.url("/api/applications"))?
        };
        let rows = body.as_array().ok_or(GatewayError::MalformedResponse {
            field: "applications array",
        })?;
        rows.iter().map(parse_record_row).collect()
    }

    pub fn fetch(
        &self,
        id: &ApplicationId,
        mobile: &MobileNumber,
    ) -> Result<ApplicationRecord, FetchError> {
        let (status, body) = if let Some(fixture) = &self.fetch_fixture_json {
            let body: Value =
                serde_json::from_str(fixture).map_err(|_| GatewayError::MalformedResponse {
                    field: "fixture body",
                })?;
            (200, body)
        } else {
            let agent = build_http_agent(&self.endpoints)?;
            let url = self.endpoints.url(&format!(
                "/api/applications/{}?mobile_number={}",
                id.as_str(),
                mobile.as_str()
            ));
            get_json_allowing_status(&agent, &url)?
        };

        if (200..300).contains(&status) {
            return Ok(parse_record_row(&body)?);
        }
        if (400..500).contains(&status) {
            let detail = body
                .get("detail")
                .and_then(Value::as_str)
                .unwrap_or("Application not found")
                .to_string();
            return Err(FetchError::NotFound(detail));
        }
        Err(GatewayError::Http { status }.into())
    }
}

/// Map the service's structured rejection (`detail` as a list of
/// {loc, msg} entries, or a bare string) to field errors.
fn parse_rejection(status: u16, body: &Value) -> CreateError {
    match body.get("detail") {
        Some(Value::Array(entries)) => {
            let mut errors = Vec::with_capacity(entries.len());
            for entry in entries {
                let field = entry
                    .get("loc")
                    .and_then(Value::as_array)
                    .map(|loc| {
                        loc.iter()
                            .map(|part| match part {
                                Value::String(s) => s.clone(),
                                other => other.to_string(),
                            })
                            .collect::<Vec<_>>()
                            .join(".")
                    })
                    .unwrap_or_default();
                let message = opt_str_field(entry, "msg");
                if let Ok(err) = FieldError::new(field, message) {
                    errors.push(err);
                }
            }
            if errors.is_empty() {
                CreateError::Gateway(GatewayError::Http { status })
            } else {
                CreateError::Rejected(errors)
            }
        }
        Some(Value::String(detail)) => match FieldError::new("detail", detail.clone()) {
            Ok(err) => CreateError::Rejected(vec![err]),
            Err(_) => CreateError::Gateway(GatewayError::Http { status }),
        },
        _ => CreateError::Gateway(GatewayError::Http { status }),
    }
}

fn parse_record_row(row: &Value) -> Result<ApplicationRecord, GatewayError> {
    let record = ApplicationRecord::v1(
        ApplicationId::new(str_field(row, "application_id")?)?,
        str_field(row, "farmer_name")?,
        opt_str_field(row, "aadhaar_number"),
        str_field(row, "mobile_number")?,
        str_field(row, "state")?,
        str_field(row, "district")?,
        opt_str_field(row, "address"),
        decimal_field(row, "total_land_acres")?,
        str_field(row, "crop_type")?,
        ApplicationStatus::parse(&str_field(row, "status")?)?,
        str_field(row, "submitted_date")?,
    )?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use krishi_kernel_contracts::eligibility::{
        CropType, EligibilityInput, EligibilityQuote, LandAcres, QuotePair, SubsidyCategory,
    };
    use krishi_kernel_contracts::identity::{AadhaarNumber, IdentityRecord, VerifiedIdentity};
    use rust_decimal::Decimal;

    fn endpoints() -> PortalEndpoints {
        PortalEndpoints::with_base_url("http://localhost:8002")
    }

    fn submission() -> ApplicationSubmission {
        let record = IdentityRecord::v1(
            "Asha Devi".to_string(),
            MobileNumber::parse("9876543210").unwrap(),
            Decimal::new(25, 1),
            "Bihar".to_string(),
            "Patna".to_string(),
            "X".to_string(),
            "Y".to_string(),
        )
        .unwrap();
        let identity =
            VerifiedIdentity::v1(AadhaarNumber::parse("1234-5678-9012").unwrap(), record).unwrap();
        let input = EligibilityInput::v1(
            CropType::new("wheat").unwrap(),
            LandAcres::new(Decimal::new(25, 1)).unwrap(),
        );
        let quotes = QuotePair::v1(
            input,
            EligibilityQuote::v1(SubsidyCategory::Fertilizer, Decimal::from(50), Decimal::from(125))
                .unwrap(),
            EligibilityQuote::v1(SubsidyCategory::Seed, Decimal::from(10), Decimal::from(25))
                .unwrap(),
        )
        .unwrap();
        ApplicationSubmission::for_verified(&identity, &quotes).unwrap()
    }

    const LIST_FIXTURE: &str = r#"[{
        "application_id": "APP001",
        "farmer_name": "Asha Devi",
        "aadhaar_number": "123456789012",
        "mobile_number": "9876543210",
        "state": "Bihar",
        "district": "Patna",
        "address": "Y",
        "total_land_acres": 2.5,
        "crop_type": "wheat",
        "status": "Pending",
        "submitted_date": "2025-06-01T10:00:00"
    }]"#;

    #[test]
    fn at_apg_01_create_returns_application_id() {
        let gateway = ApplicationGateway::new(endpoints())
            .with_create_fixture(r#"{"application_id": "APP001"}"#);
        let id = gateway.create(&submission()).unwrap();
        assert_eq!(id.as_str(), "APP001");
    }

    #[test]
    fn at_apg_02_structured_detail_maps_to_field_errors() {
        let body: Value = serde_json::json!({
            "detail": [
                {"loc": ["body", "mobile_number"], "msg": "string too short"},
                {"loc": ["body", "crop_type"], "msg": "field required"}
            ]
        });
        let CreateError::Rejected(errors) = parse_rejection(422, &body) else {
            panic!("expected a rejection");
        };
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "body.mobile_number");
        assert_eq!(errors[0].message, "string too short");
    }

    #[test]
    fn at_apg_03_string_detail_maps_to_single_error() {
        let body: Value = serde_json::json!({"detail": "duplicate application"});
        let CreateError::Rejected(errors) = parse_rejection(400, &body) else {
            panic!("expected a rejection");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "duplicate application");
    }

    #[test]
    fn at_apg_04_missing_detail_is_a_plain_http_error() {
        let body = Value::Null;
        assert!(matches!(
            parse_rejection(500, &body),
            CreateError::Gateway(GatewayError::Http { status: 500 })
        ));
    }

    #[test]
    fn at_apg_05_list_parses_rows() {
        let gateway = ApplicationGateway::new(endpoints()).with_list_fixture(LIST_FIXTURE);
        let rows = gateway.list().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].application_id.as_str(), "APP001");
        assert_eq!(rows[0].status, ApplicationStatus::Pending);
        assert_eq!(rows[0].total_land_acres, Decimal::new(25, 1));
    }

    #[test]
    fn at_apg_06_fetch_parses_single_record() {
        let fixture = r#"{
            "application_id": "APP001",
            "farmer_name": "Asha Devi",
            "mobile_number": "9876543210",
            "state": "Bihar",
            "district": "Patna",
            "total_land_acres": 2.5,
            "crop_type": "wheat",
            "status": "Approved",
            "submitted_date": "2025-06-01T10:00:00"
        }"#;
        let gateway = ApplicationGateway::new(endpoints()).with_fetch_fixture(fixture);
        let record = gateway
            .fetch(
                &ApplicationId::new("APP001").unwrap(),
                &MobileNumber::parse("9876543210").unwrap(),
            )
            .unwrap();
        assert_eq!(record.status, ApplicationStatus::Approved);
        assert_eq!(record.aadhaar_number, "");
    }
}
