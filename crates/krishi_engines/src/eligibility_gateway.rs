#![forbid(unsafe_code)]

use krishi_kernel_contracts::eligibility::{
    EligibilityInput, EligibilityQuote, QuotePair, SubsidyCategory,
};
use serde_json::Value;

use crate::gateway::{
    build_http_agent, decimal_field, decimal_to_wire, post_json, GatewayError, PortalEndpoints,
};

/// Nominal requested quantity carried on every eligibility request. The
/// service returns the allowed quantity for the crop/land inputs regardless
/// of this value; it is never meaningful data.
pub const PLACEHOLDER_REQUESTED_QTY: u32 = 1;

/// Client for the eligibility service (`POST /api/check-eligibility`).
#[derive(Debug, Clone)]
pub struct EligibilityGateway {
    endpoints: PortalEndpoints,
    fertilizer_fixture_json: Option<String>,
    seed_fixture_json: Option<String>,
}

impl EligibilityGateway {
    pub fn new(endpoints: PortalEndpoints) -> Self {
        Self {
            endpoints,
            fertilizer_fixture_json: None,
            seed_fixture_json: None,
        }
    }

    pub fn with_fixtures(
        endpoints: PortalEndpoints,
        fertilizer_fixture_json: impl Into<String>,
        seed_fixture_json: impl Into<String>,
    ) -> Self {
        Self {
            endpoints,
            fertilizer_fixture_json: Some(fertilizer_fixture_json.into()),
            seed_fixture_json: Some(seed_fixture_json.into()),
        }
    }

    pub fn check(
        &self,
        input: &EligibilityInput,
        category: SubsidyCategory,
    ) -> Result<EligibilityQuote, GatewayError> {
        let fixture = match category {
            SubsidyCategory::Fertilizer => &self.fertilizer_fixture_json,
            SubsidyCategory::Seed => &self.seed_fixture_json,
        };
        let body: Value = if let Some(fixture) = fixture {
            serde_json::from_str(fixture).map_err(|_| GatewayError::MalformedResponse {
                field: "fixture body",
            })?
        } else {
            let agent = build_http_agent(&self.endpoints)?;
            let payload = serde_json::json!({
                "crop_type": input.crop_type.as_str(),
                "land_size_acres": decimal_to_wire(input.land_acres.value(), "land_size_acres")?,
                "requested_qty": PLACEHOLDER_REQUESTED_QTY,
                "subsidy_type": category.as_str(),
            });
            post_json(
                &agent,
                &self.endpoints.url("/api/check-eligibility"),
                &payload,
            )?
        };

        let quote = EligibilityQuote::v1(
            category,
            decimal_field(&body, "rate_per_acre")?,
            decimal_field(&body, "allowed_qty")?,
        )?;
        Ok(quote)
    }

    /// Both category quotas for one input combination. A pair, not a race:
    /// the result only exists when both calls succeeded.
    pub fn check_pair(&self, input: &EligibilityInput) -> Result<QuotePair, GatewayError> {
        let fertilizer = self.check(input, SubsidyCategory::Fertilizer)?;
        let seed = self.check(input, SubsidyCategory::Seed)?;
        Ok(QuotePair::v1(input.clone(), fertilizer, seed)?)
    }
}
