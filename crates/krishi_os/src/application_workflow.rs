#![forbid(unsafe_code)]

use std::str::FromStr;

use krishi_engines::application_gateway::CreateError;
use krishi_engines::gateway::GatewayError;
use krishi_engines::identity_gateway::IdentityLookupOutcome;
use krishi_kernel_contracts::application::{ApplicationId, ApplicationSubmission};
use krishi_kernel_contracts::eligibility::{CropType, EligibilityInput, LandAcres, QuotePair};
use krishi_kernel_contracts::identity::{
    AadhaarNumber, MobileNumber, VerificationState, VerifiedIdentity,
};
use krishi_kernel_contracts::{Validate, WorkflowStage};
use rust_decimal::Decimal;

use crate::stage_error::{DomainFault, PreconditionFault, StageError, ValidationFault};

pub mod reason_codes {
    use krishi_kernel_contracts::ReasonCodeId;

    // Stage wiring namespaces: 0x71 identity, 0x72 eligibility, 0x73 submission.
    pub const WF_OK_IDENTITY_VERIFIED: ReasonCodeId = ReasonCodeId(0x7101_0101);
    pub const WF_FAIL_IDENTITY_FORMAT: ReasonCodeId = ReasonCodeId(0x7101_01F1);
    pub const WF_FAIL_IDENTITY_NOT_FOUND: ReasonCodeId = ReasonCodeId(0x7101_01F2);
    pub const WF_FAIL_NO_REGISTERED_LAND: ReasonCodeId = ReasonCodeId(0x7101_01F3);
    pub const WF_FAIL_IDENTITY_TRANSPORT: ReasonCodeId = ReasonCodeId(0x7101_01F4);

    pub const WF_OK_QUOTES_STORED: ReasonCodeId = ReasonCodeId(0x7201_0101);
    pub const WF_QUOTES_CLEARED_INPUT_INVALID: ReasonCodeId = ReasonCodeId(0x7201_0102);
    pub const WF_STALE_QUOTES_DISCARDED: ReasonCodeId = ReasonCodeId(0x7201_0103);
    pub const WF_FAIL_ELIGIBILITY_UNAVAILABLE: ReasonCodeId = ReasonCodeId(0x7201_01F1);

    pub const WF_OK_APPLICATION_SUBMITTED: ReasonCodeId = ReasonCodeId(0x7301_0101);
    pub const WF_FAIL_SUBMISSION_REJECTED: ReasonCodeId = ReasonCodeId(0x7301_01F1);
    pub const WF_FAIL_SUBMISSION_TRANSPORT: ReasonCodeId = ReasonCodeId(0x7301_01F2);
    pub const WF_FAIL_STAGE_PRECONDITION: ReasonCodeId = ReasonCodeId(0x7301_01F3);
}

/// Monotonic generation token for one eligibility request pair. A completed
/// pair only lands if its token is still the newest one issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EligibilityToken(pub u64);

/// Dispatch descriptor for the identity lookup the caller must now perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationCall {
    pub aadhaar: AadhaarNumber,
}

/// Dispatch descriptor for one eligibility request pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityCall {
    pub token: EligibilityToken,
    pub input: EligibilityInput,
}

/// Dispatch descriptor for the create-application call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionCall {
    pub submission: ApplicationSubmission,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EligibilityResolution {
    /// The pair belonged to the newest request and is now authoritative.
    Stored(QuotePair),
    /// The pair was superseded by a later edit and was ignored.
    Superseded,
}

/// Terminal report of a successful submission. Notification dispatch itself
/// is the backend's job; this layer only relays where it went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionConfirmation {
    pub application_id: ApplicationId,
    pub notified_mobile: MobileNumber,
    pub fertilizer_qty: Decimal,
    pub seed_qty: Decimal,
}

/// The citizen application workflow: one session, three gated stages.
///
/// Stage calls are split into `begin_*` (validate, arm the in-flight guard,
/// hand back a dispatch descriptor) and `complete_*` (apply the outcome).
/// All state is owned here and mutated only through these events, so the
/// single-writer discipline is structural rather than UI-enforced.
#[derive(Debug, Clone, Default)]
pub struct ApplicationWorkflow {
    verification: VerificationState,
    pending_verification: Option<AadhaarNumber>,
    crop_inputs: Option<EligibilityInput>,
    quotes: Option<QuotePair>,
    next_eligibility_token: u64,
    pending_eligibility: Option<EligibilityToken>,
    pending_submission: Option<ApplicationSubmission>,
}

impl ApplicationWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verification(&self) -> &VerificationState {
        &self.verification
    }

    pub fn quotes(&self) -> Option<&QuotePair> {
        self.quotes.as_ref()
    }

    pub fn is_verified(&self) -> bool {
        self.verification.is_verified()
    }

    /// True once the stored quotes match the crop/land combination currently
    /// on the form; only then may the submit control be enabled.
    pub fn submission_permitted(&self) -> bool {
        self.verification.is_verified()
            && match (&self.quotes, &self.crop_inputs) {
                (Some(quotes), Some(current)) => quotes.input == *current,
                _ => false,
            }
    }

    // ---- Stage 1: identity verification -------------------------------

    pub fn begin_identity_verification(
        &mut self,
        raw_identity: &str,
    ) -> Result<VerificationCall, StageError> {
        if self.verification.is_verified() {
            // The identity input is immutable until reset.
            return Err(StageError::Precondition(PreconditionFault::IdentityLocked));
        }
        if self.pending_verification.is_some() {
            return Err(StageError::Precondition(
                PreconditionFault::CallAlreadyInFlight(WorkflowStage::IdentityVerification),
            ));
        }
        let aadhaar = AadhaarNumber::parse(raw_identity).map_err(|violation| {
            let got_digits = match violation {
                krishi_kernel_contracts::ContractViolation::InvalidDigitCount { got, .. } => got,
                _ => 0,
            };
            StageError::Validation(ValidationFault::InvalidIdentityFormat { got_digits })
        })?;
        self.pending_verification = Some(aadhaar.clone());
        Ok(VerificationCall { aadhaar })
    }

    pub fn complete_identity_verification(
        &mut self,
        outcome: Result<IdentityLookupOutcome, GatewayError>,
    ) -> Result<VerifiedIdentity, StageError> {
        let Some(aadhaar) = self.pending_verification.take() else {
            return Err(StageError::Precondition(
                PreconditionFault::CallNotInFlight(WorkflowStage::IdentityVerification),
            ));
        };
        let record = match outcome {
            Err(err) => return Err(StageError::from_gateway(&err)),
            Ok(IdentityLookupOutcome::NotFound) => {
                return Err(StageError::Domain(DomainFault::IdentityNotFound));
            }
            Ok(IdentityLookupOutcome::Found(record)) => record,
        };
        if !record.has_registered_land() {
            // The record must not populate verification state.
            return Err(StageError::Domain(DomainFault::NoRegisteredLand));
        }
        let identity = VerifiedIdentity::v1(aadhaar, record)
            .map_err(|_| StageError::Domain(DomainFault::NoRegisteredLand))?;
        self.verification = VerificationState::Verified(identity.clone());
        Ok(identity)
    }

    // ---- Stage 2: eligibility computation -----------------------------

    /// React to an edit of the crop type or land size. Invalid or missing
    /// input clears any stored quotes and issues nothing; valid input
    /// supersedes every earlier in-flight request pair.
    pub fn edit_crop_inputs(
        &mut self,
        crop_raw: &str,
        land_raw: &str,
    ) -> Result<Option<EligibilityCall>, StageError> {
        if !self.verification.is_verified() {
            return Err(StageError::Precondition(PreconditionFault::NotVerified));
        }

        let crop = CropType::new(crop_raw).ok();
        let land = Decimal::from_str(land_raw.trim())
            .ok()
            .and_then(|acres| LandAcres::new(acres).ok());
        let (Some(crop), Some(land)) = (crop, land) else {
            self.quotes = None;
            self.crop_inputs = None;
            self.pending_eligibility = None;
            return Ok(None);
        };

        let input = EligibilityInput::v1(crop, land);
        self.crop_inputs = Some(input.clone());
        self.next_eligibility_token += 1;
        let token = EligibilityToken(self.next_eligibility_token);
        self.pending_eligibility = Some(token);
        Ok(Some(EligibilityCall { token, input }))
    }

    /// Apply a completed request pair. Only the newest token may mutate
    /// quote state; anything else is reported as superseded and dropped.
    pub fn complete_eligibility(
        &mut self,
        token: EligibilityToken,
        outcome: Result<QuotePair, GatewayError>,
    ) -> Result<EligibilityResolution, StageError> {
        if self.pending_eligibility != Some(token) {
            return Ok(EligibilityResolution::Superseded);
        }
        self.pending_eligibility = None;

        let pair = match outcome {
            Err(_) => {
                // Partial or failed pairs never surface; stale quotes go too.
                self.quotes = None;
                return Err(StageError::Domain(DomainFault::EligibilityUnavailable));
            }
            Ok(pair) => pair,
        };
        if Some(&pair.input) != self.crop_inputs.as_ref() {
            return Ok(EligibilityResolution::Superseded);
        }
        pair.fertilizer.validate().map_err(|_| {
            StageError::Domain(DomainFault::EligibilityUnavailable)
        })?;
        pair.seed.validate().map_err(|_| {
            StageError::Domain(DomainFault::EligibilityUnavailable)
        })?;
        self.quotes = Some(pair.clone());
        Ok(EligibilityResolution::Stored(pair))
    }

    // ---- Stage 3: submission ------------------------------------------

    pub fn begin_submission(&mut self) -> Result<SubmissionCall, StageError> {
        if self.pending_submission.is_some() {
            return Err(StageError::Precondition(
                PreconditionFault::CallAlreadyInFlight(WorkflowStage::Submission),
            ));
        }
        let Some(identity) = self.verification.identity() else {
            return Err(StageError::Precondition(PreconditionFault::NotVerified));
        };
        // Defensive re-check; unreachable given the stage-1 gate.
        if !identity.record.has_registered_land() {
            return Err(StageError::Precondition(PreconditionFault::NoLand));
        }
        let current = match (&self.quotes, &self.crop_inputs) {
            (Some(quotes), Some(inputs)) if quotes.input == *inputs => quotes,
            _ => {
                return Err(StageError::Precondition(
                    PreconditionFault::QuotesNotCurrent,
                ));
            }
        };
        let submission = ApplicationSubmission::for_verified(identity, current)
            .map_err(|_| StageError::Precondition(PreconditionFault::QuotesNotCurrent))?;
        self.pending_submission = Some(submission.clone());
        Ok(SubmissionCall { submission })
    }

    pub fn complete_submission(
        &mut self,
        outcome: Result<ApplicationId, CreateError>,
    ) -> Result<SubmissionConfirmation, StageError> {
        let Some(dispatched) = self.pending_submission.take() else {
            return Err(StageError::Precondition(
                PreconditionFault::CallNotInFlight(WorkflowStage::Submission),
            ));
        };

        match outcome {
            Ok(application_id) => {
                let confirmation = SubmissionConfirmation {
                    application_id,
                    notified_mobile: dispatched.mobile_number.clone(),
                    fertilizer_qty: dispatched.fertilizer_qty,
                    seed_qty: dispatched.seed_qty,
                };
                // Terminal success: the session surrenders all state.
                self.reset();
                Ok(confirmation)
            }
            Err(CreateError::Rejected(field_errors)) => Err(StageError::Validation(
                ValidationFault::SubmissionRejected(field_errors),
            )),
            Err(CreateError::Gateway(err)) => Err(StageError::from_gateway(&err)),
        }
    }

    /// Back to the initial state: unverified, no quotes, no in-flight calls.
    pub fn reset(&mut self) {
        self.verification = VerificationState::Unverified;
        self.pending_verification = None;
        self.crop_inputs = None;
        self.quotes = None;
        self.pending_eligibility = None;
        self.pending_submission = None;
    }
}
