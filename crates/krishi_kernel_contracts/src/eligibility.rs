#![forbid(unsafe_code)]

use rust_decimal::Decimal;

use crate::{ContractViolation, SchemaVersion, Validate};

pub const ELIGIBILITY_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubsidyCategory {
    Fertilizer,
    Seed,
}

impl SubsidyCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fertilizer => "fertilizer",
            Self::Seed => "seed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CropType(String);

impl CropType {
    pub fn new(raw: &str) -> Result<Self, ContractViolation> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ContractViolation::InvalidValue {
                field: "crop_type",
                reason: "must not be empty",
            });
        }
        if trimmed.len() > 64 {
            return Err(ContractViolation::InvalidValue {
                field: "crop_type",
                reason: "must be <= 64 chars",
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LandAcres(Decimal);

impl LandAcres {
    pub fn new(acres: Decimal) -> Result<Self, ContractViolation> {
        if acres <= Decimal::ZERO {
            return Err(ContractViolation::NotPositive {
                field: "land_size_acres",
            });
        }
        if acres > Decimal::from(1_000_000u32) {
            return Err(ContractViolation::InvalidValue {
                field: "land_size_acres",
                reason: "must be <= 1000000 acres",
            });
        }
        Ok(Self(acres))
    }

    pub fn value(self) -> Decimal {
        self.0
    }
}

/// The (crop type, land size) combination a quote was computed for. Equality
/// on this pair is how superseded in-flight results are told apart from the
/// combination currently on the form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EligibilityInput {
    pub crop_type: CropType,
    pub land_acres: LandAcres,
}

impl EligibilityInput {
    pub fn v1(crop_type: CropType, land_acres: LandAcres) -> Self {
        Self {
            crop_type,
            land_acres,
        }
    }
}

/// Server-computed quota for one subsidy category. `allowed_qty` is
/// authoritative; this layer never derives or overrides it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityQuote {
    pub schema_version: SchemaVersion,
    pub category: SubsidyCategory,
    pub rate_per_acre: Decimal,
    pub allowed_qty: Decimal,
}

impl EligibilityQuote {
    pub fn v1(
        category: SubsidyCategory,
        rate_per_acre: Decimal,
        allowed_qty: Decimal,
    ) -> Result<Self, ContractViolation> {
        let q = Self {
            schema_version: ELIGIBILITY_CONTRACT_VERSION,
            category,
            rate_per_acre,
            allowed_qty,
        };
        q.validate()?;
        Ok(q)
    }
}

impl Validate for EligibilityQuote {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.allowed_qty < Decimal::ZERO {
            return Err(ContractViolation::InvalidValue {
                field: "eligibility_quote.allowed_qty",
                reason: "must be >= 0",
            });
        }
        if self.rate_per_acre < Decimal::ZERO {
            return Err(ContractViolation::InvalidValue {
                field: "eligibility_quote.rate_per_acre",
                reason: "must be >= 0",
            });
        }
        Ok(())
    }
}

/// Both category quotes, bound to the input combination they were computed
/// for. A pair is only stored whole; partial results never surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotePair {
    pub schema_version: SchemaVersion,
    pub input: EligibilityInput,
    pub fertilizer: EligibilityQuote,
    pub seed: EligibilityQuote,
}

impl QuotePair {
    pub fn v1(
        input: EligibilityInput,
        fertilizer: EligibilityQuote,
        seed: EligibilityQuote,
    ) -> Result<Self, ContractViolation> {
        if fertilizer.category != SubsidyCategory::Fertilizer {
            return Err(ContractViolation::InvalidValue {
                field: "quote_pair.fertilizer",
                reason: "category must be fertilizer",
            });
        }
        if seed.category != SubsidyCategory::Seed {
            return Err(ContractViolation::InvalidValue {
                field: "quote_pair.seed",
                reason: "category must be seed",
            });
        }
        fertilizer.validate()?;
        seed.validate()?;
        Ok(Self {
            schema_version: ELIGIBILITY_CONTRACT_VERSION,
            input,
            fertilizer,
            seed,
        })
    }
}
