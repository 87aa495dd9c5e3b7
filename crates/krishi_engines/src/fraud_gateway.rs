#![forbid(unsafe_code)]

use krishi_kernel_contracts::application::ApplicationId;
use krishi_kernel_contracts::fraud::{
    AnomalyScore, FlaggedApplication, FraudDetail, FraudDetailFacts, FraudStatistics, RiskLevel,
};
use serde_json::Value;

use crate::application_gateway::FetchError;
use crate::gateway::{
    build_http_agent, decimal_field, f64_field, get_json, get_json_allowing_status,
    gateway_error_from_ureq, str_field, u64_field, GatewayError, PortalEndpoints,
};

/// Batch output of the anomaly-scoring service: aggregate statistics plus the
/// applications it wants reviewed.
#[derive(Debug, Clone, PartialEq)]
pub struct FraudAnalysisReport {
    pub statistics: FraudStatistics,
    pub flagged: Vec<FlaggedApplication>,
}

/// Client for the fraud-scoring service (`/api/fraud-analysis`,
/// `/api/train-fraud-model`). Scoring internals are opaque; only the report
/// shapes are contractual.
#[derive(Debug, Clone)]
pub struct FraudGateway {
    endpoints: PortalEndpoints,
    analysis_fixture_json: Option<String>,
    detail_fixture_json: Option<String>,
    train_fixture_json: Option<String>,
}

impl FraudGateway {
    pub fn new(endpoints: PortalEndpoints) -> Self {
        Self {
            endpoints,
            analysis_fixture_json: None,
            detail_fixture_json: None,
            train_fixture_json: None,
        }
    }

    pub fn with_analysis_fixture(mut self, fixture_json: impl Into<String>) -> Self {
        self.analysis_fixture_json = Some(fixture_json.into());
        self
    }

    pub fn with_detail_fixture(mut self, fixture_json: impl Into<String>) -> Self {
        self.detail_fixture_json = Some(fixture_json.into());
        self
    }

    pub fn with_train_fixture(mut self, fixture_json: impl Into<String>) -> Self {
        self.train_fixture_json = Some(fixture_json.into());
        self
    }

    pub fn run_analysis(&self) -> Result<FraudAnalysisReport, GatewayError> {
        let body: Value = if let Some(fixture) = &self.analysis_fixture_json {
            serde_json::from_str(fixture).map_err(|_| GatewayError::MalformedResponse {
                field: "fixture body",
            })?
        } else {
            let agent = build_http_agent(&self.endpoints)?;
            get_json(&agent, &self.endpoints.url("/api/fraud-analysis"))?
        };

        let stats = body.get("statistics").ok_or(GatewayError::MalformedResponse {
            field: "statistics",
        })?;
        let statistics = FraudStatistics::v1(
            u64_field(stats, "total_applications")?,
            u64_field(stats, "flagged_anomalies")?,
            f64_field(stats, "anomaly_percentage")?,
            u64_field(stats, "high_risk_count")?,
            u64_field(stats, "medium_risk_count")?,
            u64_field(stats, "low_risk_count")?,
        )?;

        let rows = body
            .get("flagged_applications")
            .and_then(Value::as_array)
            .ok_or(GatewayError::MalformedResponse {
                field: "flagged_applications",
            })?;
        let flagged = rows
            .iter()
            .map(parse_flagged_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FraudAnalysisReport { statistics, flagged })
    }

    pub fn fetch_detail(&self, id: &ApplicationId) -> Result<FraudDetail, FetchError> {
        let (status, body) = if let Some(fixture) = &self.detail_fixture_json {
            let body: Value =
                serde_json::from_str(fixture).map_err(|_| GatewayError::MalformedResponse {
                    field: "fixture body",
                })?;
            (200, body)
        } else {
            let agent = build_http_agent(&self.endpoints)?;
            let url = self
                .endpoints
                .url(&format!("/api/fraud-analysis/{}", id.as_str()));
            get_json_allowing_status(&agent, &url)?
        };

        if (400..500).contains(&status) {
            let detail = body
                .get("detail")
                .and_then(Value::as_str)
                .unwrap_or("Fraud analysis not available for this application")
                .to_string();
            return Err(FetchError::NotFound(detail));
        }
        if !(200..300).contains(&status) {
            return Err(GatewayError::Http { status }.into());
        }

        let facts = body.get("details").ok_or(GatewayError::MalformedResponse {
            field: "details",
        })?;
        let detail = FraudDetail::v1(
            ApplicationId::new(str_field(&body, "application_id")?)
                .map_err(GatewayError::from)?,
            RiskLevel::parse(&str_field(&body, "risk_level")?).map_err(GatewayError::from)?,
            AnomalyScore(f64_field(&body, "anomaly_score")?),
            body.get("is_anomaly").and_then(Value::as_bool).unwrap_or(false),
            parse_indicators(&body)?,
            FraudDetailFacts {
                land_acres: decimal_field(facts, "land_acres")?,
                district_density: u64_field(facts, "district_density")?,
                land_deviation: decimal_field(facts, "land_deviation")?,
            },
        )
        .map_err(GatewayError::from)?;
        Ok(detail)
    }

    /// Ask the service to retrain its model; returns the service message.
    /// Callers are expected to follow with a fresh [`run_analysis`].
    ///
    /// [`run_analysis`]: Self::run_analysis
    pub fn train_model(&self) -> Result<String, GatewayError> {
        let body: Value = if let Some(fixture) = &self.train_fixture_json {
            serde_json::from_str(fixture).map_err(|_| GatewayError::MalformedResponse {
                field: "fixture body",
            })?
        } else {
            let agent = build_http_agent(&self.endpoints)?;
            let response = agent
                .post(&self.endpoints.url("/api/train-fraud-model"))
                .set("Content-Type", "application/json")
                .set("Accept", "application/json")
                .call()
                .map_err(gateway_error_from_ureq)?;
            serde_json::from_reader(response.into_reader()).map_err(|_| {
                GatewayError::MalformedResponse {
                    field: "response body",
                }
            })?
        };
        str_field(&body, "message")
    }
}

fn parse_flagged_row(row: &Value) -> Result<FlaggedApplication, GatewayError> {
    let flagged = FlaggedApplication::v1(
        ApplicationId::new(str_field(row, "application_id")?)?,
        RiskLevel::parse(&str_field(row, "risk_level")?)?,
        AnomalyScore(f64_field(row, "anomaly_score")?),
        parse_indicators(row)?,
    )?;
    Ok(flagged)
}

fn parse_indicators(row: &Value) -> Result<Vec<String>, GatewayError> {
    let entries = row
        .get("fraud_indicators")
        .and_then(Value::as_array)
        .ok_or(GatewayError::MalformedResponse {
            field: "fraud_indicators",
        })?;
    entries
        .iter()
        .map(|entry| {
            entry
                .as_str()
                .map(str::to_string)
                .ok_or(GatewayError::MalformedResponse {
                    field: "fraud_indicators",
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn endpoints() -> PortalEndpoints {
        PortalEndpoints::with_base_url("http://localhost:8002")
    }

    const ANALYSIS_FIXTURE: &str = r#"{
        "statistics": {
            "total_applications": 40,
            "flagged_anomalies": 4,
            "anomaly_percentage": 10.0,
            "high_risk_count": 1,
            "medium_risk_count": 2,
            "low_risk_count": 1
        },
        "flagged_applications": [{
            "application_id": "APP007",
            "risk_level": "HIGH",
            "anomaly_score": -0.213,
            "fraud_indicators": ["Unusually high land size for district"]
        }]
    }"#;

    #[test]
    fn at_frg_01_analysis_report_is_parsed() {
        let gateway = FraudGateway::new(endpoints()).with_analysis_fixture(ANALYSIS_FIXTURE);
        let report = gateway.run_analysis().unwrap();
        assert_eq!(report.statistics.total_applications, 40);
        assert_eq!(report.statistics.high_risk_count, 1);
        assert_eq!(report.flagged.len(), 1);
        assert_eq!(report.flagged[0].risk_level, RiskLevel::High);
    }

    #[test]
    fn at_frg_02_detail_includes_statistical_facts() {
        let fixture = r#"{
            "application_id": "APP007",
            "risk_level": "MEDIUM",
            "anomaly_score": -0.02,
            "is_anomaly": true,
            "fraud_indicators": ["District application density unusually high"],
            "details": {
                "land_acres": 9.5,
                "district_density": 112,
                "land_deviation": 6.1
            }
        }"#;
        let gateway = FraudGateway::new(endpoints()).with_detail_fixture(fixture);
        let detail = gateway
            .fetch_detail(&ApplicationId::new("APP007").unwrap())
            .unwrap();
        assert_eq!(detail.risk_level, RiskLevel::Medium);
        assert!(detail.is_anomaly);
        assert_eq!(detail.facts.land_acres, Decimal::new(95, 1));
        assert_eq!(detail.facts.district_density, 112);
    }

    #[test]
    fn at_frg_03_train_returns_service_message() {
        let gateway = FraudGateway::new(endpoints())
            .with_train_fixture(r#"{"message": "Model trained on 40 applications"}"#);
        assert_eq!(
            gateway.train_model().unwrap(),
            "Model trained on 40 applications"
        );
    }
}
