#![forbid(unsafe_code)]

use krishi_engines::application_gateway::FetchError;
use krishi_engines::fraud_gateway::{FraudAnalysisReport, FraudGateway};
use krishi_engines::gateway::GatewayError;
use krishi_kernel_contracts::application::ApplicationId;
use krishi_kernel_contracts::fraud::{FraudDetail, RiskLevel};

use crate::stage_error::{DomainFault, StageError, ValidationFault};

pub trait FraudAnalysisEngine {
    fn run_analysis(&self) -> Result<FraudAnalysisReport, GatewayError>;
    fn fetch_detail(&self, id: &ApplicationId) -> Result<FraudDetail, FetchError>;
    fn train_model(&self) -> Result<String, GatewayError>;
}

impl FraudAnalysisEngine for FraudGateway {
    fn run_analysis(&self) -> Result<FraudAnalysisReport, GatewayError> {
        FraudGateway::run_analysis(self)
    }

    fn fetch_detail(&self, id: &ApplicationId) -> Result<FraudDetail, FetchError> {
        FraudGateway::fetch_detail(self, id)
    }

    fn train_model(&self) -> Result<String, GatewayError> {
        FraudGateway::train_model(self)
    }
}

pub fn run_batch_analysis<E: FraudAnalysisEngine>(
    engine: &E,
) -> Result<FraudAnalysisReport, StageError> {
    engine
        .run_analysis()
        .map_err(|err| StageError::from_gateway(&err))
}

pub fn fetch_application_detail<E: FraudAnalysisEngine>(
    engine: &E,
    raw_id: &str,
) -> Result<FraudDetail, StageError> {
    let id = ApplicationId::new(raw_id.trim()).map_err(|_| {
        StageError::Validation(ValidationFault::MissingField {
            field: "application_id",
        })
    })?;
    engine.fetch_detail(&id).map_err(|err| match err {
        FetchError::NotFound(detail) => {
            StageError::Domain(DomainFault::ApplicationNotFound(detail))
        }
        FetchError::Gateway(err) => StageError::from_gateway(&err),
    })
}

/// Kick off a retraining run; the caller is expected to re-run the batch
/// analysis once the returned service message is shown.
pub fn train_fraud_model<E: FraudAnalysisEngine>(engine: &E) -> Result<String, StageError> {
    engine
        .train_model()
        .map_err(|err| StageError::from_gateway(&err))
}

/// Reviewer guidance attached to each risk label.
pub fn review_recommendation(risk: RiskLevel) -> &'static str {
    match risk {
        RiskLevel::High => {
            "Immediate action required: verify farmer identity, land ownership documents \
             and arrange physical inspection before approval."
        }
        RiskLevel::Medium => {
            "Enhanced scrutiny: cross-check documents against land records before processing."
        }
        RiskLevel::Low => {
            "Minor review: slight deviation from norms; standard verification is sufficient."
        }
        RiskLevel::Normal => {
            "Normal processing: application appears legitimate; proceed with the standard \
             approval workflow."
        }
    }
}
