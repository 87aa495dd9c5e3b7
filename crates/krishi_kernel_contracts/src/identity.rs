#![forbid(unsafe_code)]

use rust_decimal::Decimal;

use crate::{ContractViolation, SchemaVersion, Validate};

pub const IDENTITY_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

/// Normalized 12-digit national identity number. Separators are stripped at
/// construction; the stored form is digits only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AadhaarNumber(String);

impl AadhaarNumber {
    pub fn parse(raw: &str) -> Result<Self, ContractViolation> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() != 12 {
            return Err(ContractViolation::InvalidDigitCount {
                field: "aadhaar_number",
                expected: 12,
                got: digits.len(),
            });
        }
        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display form: `dddd-dddd-dddd`.
    pub fn grouped(&self) -> String {
        let mut out = String::with_capacity(14);
        for (i, c) in self.0.chars().enumerate() {
            if i > 0 && i % 4 == 0 {
                out.push('-');
            }
            out.push(c);
        }
        out
    }
}

/// Normalized 10-digit mobile number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MobileNumber(String);

impl MobileNumber {
    pub fn parse(raw: &str) -> Result<Self, ContractViolation> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() != 10 {
            return Err(ContractViolation::InvalidDigitCount {
                field: "mobile_number",
                expected: 10,
                got: digits.len(),
            });
        }
        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Land-ownership record as returned by the identity registry. The record may
/// carry a non-positive land size; downstream gating decides whether it is
/// usable, never the record itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    pub schema_version: SchemaVersion,
    pub name: String,
    pub mobile_number: MobileNumber,
    pub total_land_acres: Decimal,
    pub state: String,
    pub district: String,
    pub village: String,
    pub address: String,
}

impl IdentityRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn v1(
        name: String,
        mobile_number: MobileNumber,
        total_land_acres: Decimal,
        state: String,
        district: String,
        village: String,
        address: String,
    ) -> Result<Self, ContractViolation> {
        let r = Self {
            schema_version: IDENTITY_CONTRACT_VERSION,
            name,
            mobile_number,
            total_land_acres,
            state,
            district,
            village,
            address,
        };
        r.validate()?;
        Ok(r)
    }

    pub fn has_registered_land(&self) -> bool {
        self.total_land_acres > Decimal::ZERO
    }
}

impl Validate for IdentityRecord {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.name.trim().is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "identity_record.name",
                reason: "must not be empty",
            });
        }
        if self.name.len() > 128 {
            return Err(ContractViolation::InvalidValue {
                field: "identity_record.name",
                reason: "must be <= 128 chars",
            });
        }
        for (field, value) in [
            ("identity_record.state", &self.state),
            ("identity_record.district", &self.district),
            ("identity_record.village", &self.village),
            ("identity_record.address", &self.address),
        ] {
            if value.trim().is_empty() {
                return Err(ContractViolation::InvalidValue {
                    field,
                    reason: "must not be empty",
                });
            }
        }
        Ok(())
    }
}

/// Identity that passed the land-ownership gate. Only constructible from a
/// record with positive registered land, which makes the "verified iff
/// positive-land record held" invariant structural.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub schema_version: SchemaVersion,
    pub aadhaar: AadhaarNumber,
    pub record: IdentityRecord,
}

impl VerifiedIdentity {
    pub fn v1(aadhaar: AadhaarNumber, record: IdentityRecord) -> Result<Self, ContractViolation> {
        if !record.has_registered_land() {
            return Err(ContractViolation::NotPositive {
                field: "verified_identity.total_land_acres",
            });
        }
        record.validate()?;
        Ok(Self {
            schema_version: IDENTITY_CONTRACT_VERSION,
            aadhaar,
            record,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VerificationState {
    #[default]
    Unverified,
    Verified(VerifiedIdentity),
}

impl VerificationState {
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified(_))
    }

    pub fn identity(&self) -> Option<&VerifiedIdentity> {
        match self {
            Self::Unverified => None,
            Self::Verified(identity) => Some(identity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(land: Decimal) -> IdentityRecord {
        IdentityRecord::v1(
            "Asha Devi".to_string(),
            MobileNumber::parse("9876543210").unwrap(),
            land,
            "Bihar".to_string(),
            "Patna".to_string(),
            "X".to_string(),
            "Y".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn at_id_01_separators_stripped_before_length_check() {
        let a = AadhaarNumber::parse("1234-5678-9012").unwrap();
        assert_eq!(a.as_str(), "123456789012");
        assert_eq!(a.grouped(), "1234-5678-9012");
    }

    #[test]
    fn at_id_02_short_number_rejected() {
        let err = AadhaarNumber::parse("1234-567").unwrap_err();
        assert_eq!(
            err,
            ContractViolation::InvalidDigitCount {
                field: "aadhaar_number",
                expected: 12,
                got: 7,
            }
        );
    }

    #[test]
    fn at_id_03_mobile_requires_ten_digits() {
        assert!(MobileNumber::parse("98765 43210").is_ok());
        assert!(MobileNumber::parse("987654321").is_err());
    }

    #[test]
    fn at_id_04_verified_identity_rejects_zero_land() {
        let aadhaar = AadhaarNumber::parse("123456789012").unwrap();
        let err = VerifiedIdentity::v1(aadhaar, record(Decimal::ZERO)).unwrap_err();
        assert!(matches!(err, ContractViolation::NotPositive { .. }));
    }

    #[test]
    fn at_id_05_verified_identity_accepts_positive_land() {
        let aadhaar = AadhaarNumber::parse("123456789012").unwrap();
        let identity = VerifiedIdentity::v1(aadhaar, record(Decimal::new(25, 1))).unwrap();
        assert!(identity.record.has_registered_land());
    }
}
