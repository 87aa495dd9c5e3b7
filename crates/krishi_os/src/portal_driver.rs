#![forbid(unsafe_code)]

use krishi_engines::application_gateway::{ApplicationGateway, CreateError};
use krishi_engines::eligibility_gateway::EligibilityGateway;
use krishi_engines::gateway::GatewayError;
use krishi_engines::identity_gateway::{IdentityGateway, IdentityLookupOutcome};
use krishi_kernel_contracts::application::{ApplicationId, ApplicationSubmission};
use krishi_kernel_contracts::eligibility::{EligibilityInput, QuotePair};
use krishi_kernel_contracts::identity::{AadhaarNumber, VerifiedIdentity};
use krishi_kernel_contracts::{MonotonicTimeNs, ReasonCodeId, WorkflowStage};
use krishi_storage::audit_log::{AuditArea, WorkflowAuditLog};

use crate::application_workflow::{
    reason_codes, ApplicationWorkflow, EligibilityResolution, SubmissionConfirmation,
};
use crate::stage_error::{DomainFault, StageError, ValidationFault};

pub trait IdentityLookupEngine {
    fn lookup(&self, aadhaar: &AadhaarNumber) -> Result<IdentityLookupOutcome, GatewayError>;
}

impl IdentityLookupEngine for IdentityGateway {
    fn lookup(&self, aadhaar: &AadhaarNumber) -> Result<IdentityLookupOutcome, GatewayError> {
        IdentityGateway::lookup(self, aadhaar)
    }
}

pub trait EligibilityEngine {
    fn quote_pair(&self, input: &EligibilityInput) -> Result<QuotePair, GatewayError>;
}

impl EligibilityEngine for EligibilityGateway {
    fn quote_pair(&self, input: &EligibilityInput) -> Result<QuotePair, GatewayError> {
        self.check_pair(input)
    }
}

pub trait ApplicationCreateEngine {
    fn create(&self, submission: &ApplicationSubmission) -> Result<ApplicationId, CreateError>;
}

impl ApplicationCreateEngine for ApplicationGateway {
    fn create(&self, submission: &ApplicationSubmission) -> Result<ApplicationId, CreateError> {
        ApplicationGateway::create(self, submission)
    }
}

/// Drives the three-stage workflow against live engines, recording every
/// transition in the audit ledger. Each public method is one serialized
/// event from the caller's point of view.
#[derive(Debug)]
pub struct PortalDriver<I, E, A> {
    workflow: ApplicationWorkflow,
    identity: I,
    eligibility: E,
    applications: A,
    audit: WorkflowAuditLog,
}

impl<I, E, A> PortalDriver<I, E, A>
where
    I: IdentityLookupEngine,
    E: EligibilityEngine,
    A: ApplicationCreateEngine,
{
    pub fn new(identity: I, eligibility: E, applications: A) -> Self {
        Self {
            workflow: ApplicationWorkflow::new(),
            identity,
            eligibility,
            applications,
            audit: WorkflowAuditLog::default(),
        }
    }

    pub fn workflow(&self) -> &ApplicationWorkflow {
        &self.workflow
    }

    pub fn audit(&self) -> &WorkflowAuditLog {
        &self.audit
    }

    pub fn verify_identity(
        &mut self,
        at: MonotonicTimeNs,
        raw_identity: &str,
    ) -> Result<VerifiedIdentity, StageError> {
        let call = match self.workflow.begin_identity_verification(raw_identity) {
            Ok(call) => call,
            Err(err) => {
                self.record_failure(at, WorkflowStage::IdentityVerification, &err);
                return Err(err);
            }
        };
        let outcome = self.identity.lookup(&call.aadhaar);
        match self.workflow.complete_identity_verification(outcome) {
            Ok(identity) => {
                self.record(
                    at,
                    WorkflowStage::IdentityVerification,
                    reason_codes::WF_OK_IDENTITY_VERIFIED,
                    None,
                );
                Ok(identity)
            }
            Err(err) => {
                self.record_failure(at, WorkflowStage::IdentityVerification, &err);
                Err(err)
            }
        }
    }

    /// One edit of crop type or land size. `Ok(None)` means the inputs were
    /// incomplete and any stored quotes were cleared.
    pub fn update_crop_inputs(
        &mut self,
        at: MonotonicTimeNs,
        crop_raw: &str,
        land_raw: &str,
    ) -> Result<Option<QuotePair>, StageError> {
        let call = match self.workflow.edit_crop_inputs(crop_raw, land_raw) {
            Ok(Some(call)) => call,
            Ok(None) => {
                self.record(
                    at,
                    WorkflowStage::EligibilityComputation,
                    reason_codes::WF_QUOTES_CLEARED_INPUT_INVALID,
                    None,
                );
                return Ok(None);
            }
            Err(err) => {
                self.record_failure(at, WorkflowStage::EligibilityComputation, &err);
                return Err(err);
            }
        };
        let outcome = self.eligibility.quote_pair(&call.input);
        match self.workflow.complete_eligibility(call.token, outcome) {
            Ok(EligibilityResolution::Stored(pair)) => {
                self.record(
                    at,
                    WorkflowStage::EligibilityComputation,
                    reason_codes::WF_OK_QUOTES_STORED,
                    Some(format!("token={}", call.token.0)),
                );
                Ok(Some(pair))
            }
            Ok(EligibilityResolution::Superseded) => {
                self.record(
                    at,
                    WorkflowStage::EligibilityComputation,
                    reason_codes::WF_STALE_QUOTES_DISCARDED,
                    Some(format!("token={}", call.token.0)),
                );
                Ok(None)
            }
            Err(err) => {
                self.record_failure(at, WorkflowStage::EligibilityComputation, &err);
                Err(err)
            }
        }
    }

    pub fn submit(&mut self, at: MonotonicTimeNs) -> Result<SubmissionConfirmation, StageError> {
        let call = match self.workflow.begin_submission() {
            Ok(call) => call,
            Err(err) => {
                self.record_failure(at, WorkflowStage::Submission, &err);
                return Err(err);
            }
        };
        let outcome = self.applications.create(&call.submission);
        match self.workflow.complete_submission(outcome) {
            Ok(confirmation) => {
                self.record(
                    at,
                    WorkflowStage::Submission,
                    reason_codes::WF_OK_APPLICATION_SUBMITTED,
                    Some(format!("id={}", confirmation.application_id.as_str())),
                );
                Ok(confirmation)
            }
            Err(err) => {
                self.record_failure(at, WorkflowStage::Submission, &err);
                Err(err)
            }
        }
    }

    fn record(
        &mut self,
        at: MonotonicTimeNs,
        stage: WorkflowStage,
        code: ReasonCodeId,
        detail: Option<String>,
    ) {
        // A saturated ledger must never take the workflow down with it.
        let _ = self.audit.append(at, AuditArea::from(stage), code, detail);
    }

    fn record_failure(&mut self, at: MonotonicTimeNs, stage: WorkflowStage, err: &StageError) {
        let code = audit_code_for(stage, err);
        self.record(at, stage, code, Some(err.to_string()));
    }
}

fn audit_code_for(stage: WorkflowStage, err: &StageError) -> ReasonCodeId {
    match (stage, err) {
        (
            WorkflowStage::IdentityVerification,
            StageError::Validation(ValidationFault::InvalidIdentityFormat { .. }),
        ) => reason_codes::WF_FAIL_IDENTITY_FORMAT,
        (WorkflowStage::IdentityVerification, StageError::Domain(DomainFault::IdentityNotFound)) => {
            reason_codes::WF_FAIL_IDENTITY_NOT_FOUND
        }
        (WorkflowStage::IdentityVerification, StageError::Domain(DomainFault::NoRegisteredLand)) => {
            reason_codes::WF_FAIL_NO_REGISTERED_LAND
        }
        (WorkflowStage::IdentityVerification, _) => reason_codes::WF_FAIL_IDENTITY_TRANSPORT,
        (WorkflowStage::EligibilityComputation, _) => {
            reason_codes::WF_FAIL_ELIGIBILITY_UNAVAILABLE
        }
        (
            WorkflowStage::Submission,
            StageError::Validation(ValidationFault::SubmissionRejected(_)),
        ) => reason_codes::WF_FAIL_SUBMISSION_REJECTED,
        (WorkflowStage::Submission, StageError::Precondition(_)) => {
            reason_codes::WF_FAIL_STAGE_PRECONDITION
        }
        (WorkflowStage::Submission, _) => reason_codes::WF_FAIL_SUBMISSION_TRANSPORT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use krishi_kernel_contracts::eligibility::{EligibilityQuote, SubsidyCategory};
    use krishi_kernel_contracts::identity::{IdentityRecord, MobileNumber};
    use rust_decimal::Decimal;

    #[derive(Debug, Clone)]
    struct StubIdentity {
        outcome: IdentityLookupOutcome,
    }

    impl IdentityLookupEngine for StubIdentity {
        fn lookup(&self, _aadhaar: &AadhaarNumber) -> Result<IdentityLookupOutcome, GatewayError> {
            Ok(self.outcome.clone())
        }
    }

    #[derive(Debug, Clone)]
    struct StubEligibility {
        fertilizer: i64,
        seed: i64,
    }

    impl EligibilityEngine for StubEligibility {
        fn quote_pair(&self, input: &EligibilityInput) -> Result<QuotePair, GatewayError> {
            Ok(QuotePair::v1(
                input.clone(),
                EligibilityQuote::v1(
                    SubsidyCategory::Fertilizer,
                    Decimal::from(50),
                    Decimal::from(self.fertilizer),
                )?,
                EligibilityQuote::v1(
                    SubsidyCategory::Seed,
                    Decimal::from(10),
                    Decimal::from(self.seed),
                )?,
            )?)
        }
    }

    #[derive(Debug, Clone)]
    struct StubApplications {
        id: &'static str,
    }

    impl ApplicationCreateEngine for StubApplications {
        fn create(&self, _submission: &ApplicationSubmission) -> Result<ApplicationId, CreateError> {
            Ok(ApplicationId::new(self.id).map_err(GatewayError::from)?)
        }
    }

    fn record() -> IdentityRecord {
        IdentityRecord::v1(
            "Asha Devi".to_string(),
            MobileNumber::parse("9876543210").unwrap(),
            Decimal::new(25, 1),
            "Bihar".to_string(),
            "Patna".to_string(),
            "X".to_string(),
            "Y".to_string(),
        )
        .unwrap()
    }

    fn driver() -> PortalDriver<StubIdentity, StubEligibility, StubApplications> {
        PortalDriver::new(
            StubIdentity {
                outcome: IdentityLookupOutcome::Found(record()),
            },
            StubEligibility {
                fertilizer: 125,
                seed: 25,
            },
            StubApplications { id: "APP001" },
        )
    }

    #[test]
    fn at_drv_01_full_flow_confirms_and_resets() {
        let mut d = driver();
        let identity = d.verify_identity(MonotonicTimeNs(10), "1234-5678-9012").unwrap();
        assert_eq!(identity.record.name, "Asha Devi");

        let quotes = d
            .update_crop_inputs(MonotonicTimeNs(20), "wheat", "2.5")
            .unwrap()
            .unwrap();
        assert_eq!(quotes.fertilizer.allowed_qty, Decimal::from(125));
        assert!(d.workflow().submission_permitted());

        let confirmation = d.submit(MonotonicTimeNs(30)).unwrap();
        assert_eq!(confirmation.application_id.as_str(), "APP001");
        assert_eq!(confirmation.notified_mobile.as_str(), "9876543210");
        assert!(!d.workflow().is_verified());
    }

    #[test]
    fn at_drv_02_transitions_land_in_the_audit_ledger() {
        let mut d = driver();
        d.verify_identity(MonotonicTimeNs(10), "1234-5678-9012").unwrap();
        d.update_crop_inputs(MonotonicTimeNs(20), "wheat", "2.5")
            .unwrap();
        d.submit(MonotonicTimeNs(30)).unwrap();

        let rows = d.audit().rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].reason_code, reason_codes::WF_OK_IDENTITY_VERIFIED);
        assert_eq!(rows[1].reason_code, reason_codes::WF_OK_QUOTES_STORED);
        assert_eq!(
            rows[2].reason_code,
            reason_codes::WF_OK_APPLICATION_SUBMITTED
        );
        assert_eq!(rows[2].detail.as_deref(), Some("id=APP001"));
    }

    #[test]
    fn at_drv_03_failures_are_audited_with_stage_codes() {
        let mut d = driver();
        let _ = d.verify_identity(MonotonicTimeNs(10), "12");
        let rows = d.audit().rows_by_area(AuditArea::IdentityVerification);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].reason_code, reason_codes::WF_FAIL_IDENTITY_FORMAT);
    }

    #[test]
    fn at_drv_04_incomplete_inputs_clear_and_audit() {
        let mut d = driver();
        d.verify_identity(MonotonicTimeNs(10), "1234-5678-9012").unwrap();
        d.update_crop_inputs(MonotonicTimeNs(20), "wheat", "2.5")
            .unwrap();
        let cleared = d
            .update_crop_inputs(MonotonicTimeNs(30), "", "2.5")
            .unwrap();
        assert!(cleared.is_none());
        assert!(d.workflow().quotes().is_none());
        let rows = d.audit().rows_by_area(AuditArea::Eligibility);
        assert_eq!(
            rows.last().unwrap().reason_code,
            reason_codes::WF_QUOTES_CLEARED_INPUT_INVALID
        );
    }
}
