#![forbid(unsafe_code)]

use rust_decimal::Decimal;

use crate::application::ApplicationId;
use crate::{ContractViolation, SchemaVersion, Validate};

pub const FRAUD_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

/// Categorical fraud-likelihood label produced by the external scoring
/// service. The scoring model itself is opaque to this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
    Normal,
}

impl RiskLevel {
    pub fn parse(raw: &str) -> Result<Self, ContractViolation> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "HIGH" => Ok(Self::High),
            "MEDIUM" => Ok(Self::Medium),
            "LOW" => Ok(Self::Low),
            "NORMAL" => Ok(Self::Normal),
            _ => Err(ContractViolation::InvalidValue {
                field: "risk_level",
                reason: "must be one of HIGH/MEDIUM/LOW/NORMAL",
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::Normal => "NORMAL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnomalyScore(pub f64);

impl Validate for AnomalyScore {
    fn validate(&self) -> Result<(), ContractViolation> {
        if !self.0.is_finite() {
            return Err(ContractViolation::NotFinite {
                field: "anomaly_score",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FraudStatistics {
    pub schema_version: SchemaVersion,
    pub total_applications: u64,
    pub flagged_anomalies: u64,
    pub anomaly_percentage: f64,
    pub high_risk_count: u64,
    pub medium_risk_count: u64,
    pub low_risk_count: u64,
}

impl FraudStatistics {
    pub fn v1(
        total_applications: u64,
        flagged_anomalies: u64,
        anomaly_percentage: f64,
        high_risk_count: u64,
        medium_risk_count: u64,
        low_risk_count: u64,
    ) -> Result<Self, ContractViolation> {
        let s = Self {
            schema_version: FRAUD_CONTRACT_VERSION,
            total_applications,
            flagged_anomalies,
            anomaly_percentage,
            high_risk_count,
            medium_risk_count,
            low_risk_count,
        };
        s.validate()?;
        Ok(s)
    }
}

impl Validate for FraudStatistics {
    fn validate(&self) -> Result<(), ContractViolation> {
        if !self.anomaly_percentage.is_finite() {
            return Err(ContractViolation::NotFinite {
                field: "fraud_statistics.anomaly_percentage",
            });
        }
        if self.flagged_anomalies > self.total_applications {
            return Err(ContractViolation::InvalidValue {
                field: "fraud_statistics.flagged_anomalies",
                reason: "must be <= total_applications",
            });
        }
        Ok(())
    }
}

/// One row of the batch analysis: an application the scoring service wants a
/// reviewer to look at.
#[derive(Debug, Clone, PartialEq)]
pub struct FlaggedApplication {
    pub schema_version: SchemaVersion,
    pub application_id: ApplicationId,
    pub risk_level: RiskLevel,
    pub anomaly_score: AnomalyScore,
    pub fraud_indicators: Vec<String>,
}

impl FlaggedApplication {
    pub fn v1(
        application_id: ApplicationId,
        risk_level: RiskLevel,
        anomaly_score: AnomalyScore,
        fraud_indicators: Vec<String>,
    ) -> Result<Self, ContractViolation> {
        anomaly_score.validate()?;
        for indicator in &fraud_indicators {
            if indicator.trim().is_empty() {
                return Err(ContractViolation::InvalidValue {
                    field: "flagged_application.fraud_indicators",
                    reason: "indicators must not be empty",
                });
            }
        }
        Ok(Self {
            schema_version: FRAUD_CONTRACT_VERSION,
            application_id,
            risk_level,
            anomaly_score,
            fraud_indicators,
        })
    }
}

/// Statistical context behind a single application's score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FraudDetailFacts {
    pub land_acres: Decimal,
    pub district_density: u64,
    pub land_deviation: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FraudDetail {
    pub schema_version: SchemaVersion,
    pub application_id: ApplicationId,
    pub risk_level: RiskLevel,
    pub anomaly_score: AnomalyScore,
    pub is_anomaly: bool,
    pub fraud_indicators: Vec<String>,
    pub facts: FraudDetailFacts,
}

impl FraudDetail {
    pub fn v1(
        application_id: ApplicationId,
        risk_level: RiskLevel,
        anomaly_score: AnomalyScore,
        is_anomaly: bool,
        fraud_indicators: Vec<String>,
        facts: FraudDetailFacts,
    ) -> Result<Self, ContractViolation> {
        anomaly_score.validate()?;
        Ok(Self {
            schema_version: FRAUD_CONTRACT_VERSION,
            application_id,
            risk_level,
            anomaly_score,
            is_anomaly,
            fraud_indicators,
            facts,
        })
    }
}
