#![forbid(unsafe_code)]

use rust_decimal::Decimal;

use crate::eligibility::{CropType, LandAcres, QuotePair};
use crate::identity::{AadhaarNumber, MobileNumber, VerifiedIdentity};
use crate::{ContractViolation, SchemaVersion, Validate};

pub const APPLICATION_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApplicationId(String);

impl ApplicationId {
    pub fn new(id: impl Into<String>) -> Result<Self, ContractViolation> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "application_id",
                reason: "must not be empty",
            });
        }
        if id.len() > 64 {
            return Err(ContractViolation::InvalidValue {
                field: "application_id",
                reason: "must be <= 64 chars",
            });
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn parse(raw: &str) -> Result<Self, ContractViolation> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ContractViolation::InvalidValue {
                field: "application_status",
                reason: "must be one of Pending/Approved/Rejected",
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

/// One entry of a structured service rejection: field path plus message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Result<Self, ContractViolation> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "field_error.message",
                reason: "must not be empty",
            });
        }
        Ok(Self {
            field: field.into(),
            message,
        })
    }
}

/// The complete application payload. Only constructible from a verified
/// identity plus a stored quote pair; requested quantities are copied from
/// the pair's `allowed_qty` values and are never caller supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationSubmission {
    pub schema_version: SchemaVersion,
    pub farmer_name: String,
    pub aadhaar_number: AadhaarNumber,
    pub mobile_number: MobileNumber,
    pub state: String,
    pub district: String,
    pub address: String,
    pub total_land_acres: LandAcres,
    pub crop_type: CropType,
    pub fertilizer_qty: Decimal,
    pub seed_qty: Decimal,
}

impl ApplicationSubmission {
    pub fn for_verified(
        identity: &VerifiedIdentity,
        quotes: &QuotePair,
    ) -> Result<Self, ContractViolation> {
        let record = &identity.record;
        let s = Self {
            schema_version: APPLICATION_CONTRACT_VERSION,
            farmer_name: record.name.clone(),
            aadhaar_number: identity.aadhaar.clone(),
            mobile_number: record.mobile_number.clone(),
            state: record.state.clone(),
            district: record.district.clone(),
            address: record.address.clone(),
            total_land_acres: LandAcres::new(record.total_land_acres)?,
            crop_type: quotes.input.crop_type.clone(),
            fertilizer_qty: quotes.fertilizer.allowed_qty,
            seed_qty: quotes.seed.allowed_qty,
        };
        s.validate()?;
        Ok(s)
    }
}

impl Validate for ApplicationSubmission {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.farmer_name.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "application_submission.farmer_name",
                reason: "must not be empty",
            });
        }
        if self.fertilizer_qty < Decimal::ZERO {
            return Err(ContractViolation::InvalidValue {
                field: "application_submission.fertilizer_qty",
                reason: "must be >= 0",
            });
        }
        if self.seed_qty < Decimal::ZERO {
            return Err(ContractViolation::InvalidValue {
                field: "application_submission.seed_qty",
                reason: "must be >= 0",
            });
        }
        Ok(())
    }
}

/// Review-dashboard row as returned by the application service. Read-model
/// data: identifying fields are validated, display fields are tolerated
/// as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationRecord {
    pub schema_version: SchemaVersion,
    pub application_id: ApplicationId,
    pub farmer_name: String,
    pub aadhaar_number: String,
    pub mobile_number: String,
    pub state: String,
    pub district: String,
    pub address: String,
    pub total_land_acres: Decimal,
    pub crop_type: String,
    pub status: ApplicationStatus,
    pub submitted_date: String,
}

impl ApplicationRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn v1(
        application_id: ApplicationId,
        farmer_name: String,
        aadhaar_number: String,
        mobile_number: String,
        state: String,
        district: String,
        address: String,
        total_land_acres: Decimal,
        crop_type: String,
        status: ApplicationStatus,
        submitted_date: String,
    ) -> Result<Self, ContractViolation> {
        let r = Self {
            schema_version: APPLICATION_CONTRACT_VERSION,
            application_id,
            farmer_name,
            aadhaar_number,
            mobile_number,
            state,
            district,
            address,
            total_land_acres,
            crop_type,
            status,
            submitted_date,
        };
        r.validate()?;
        Ok(r)
    }
}

impl Validate for ApplicationRecord {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.farmer_name.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "application_record.farmer_name",
                reason: "must not be empty",
            });
        }
        if self.submitted_date.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "application_record.submitted_date",
                reason: "must not be empty",
            });
        }
        Ok(())
    }
}
