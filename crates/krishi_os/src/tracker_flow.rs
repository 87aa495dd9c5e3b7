#![forbid(unsafe_code)]

use krishi_engines::application_gateway::{ApplicationGateway, FetchError};
use krishi_kernel_contracts::application::{ApplicationId, ApplicationRecord};
use krishi_kernel_contracts::identity::MobileNumber;
use krishi_kernel_contracts::ContractViolation;

use crate::stage_error::{DomainFault, StageError, ValidationFault};

pub trait ApplicationFetchEngine {
    fn fetch(
        &self,
        id: &ApplicationId,
        mobile: &MobileNumber,
    ) -> Result<ApplicationRecord, FetchError>;
}

impl ApplicationFetchEngine for ApplicationGateway {
    fn fetch(
        &self,
        id: &ApplicationId,
        mobile: &MobileNumber,
    ) -> Result<ApplicationRecord, FetchError> {
        ApplicationGateway::fetch(self, id, mobile)
    }
}

/// Citizen-side status lookup: application id plus the mobile number it was
/// filed under. Both inputs are normalized and checked before the call.
pub fn track_application<E: ApplicationFetchEngine>(
    engine: &E,
    raw_id: &str,
    raw_mobile: &str,
) -> Result<ApplicationRecord, StageError> {
    let id = ApplicationId::new(raw_id.trim()).map_err(|_| {
        StageError::Validation(ValidationFault::MissingField {
            field: "application_id",
        })
    })?;
    let mobile = MobileNumber::parse(raw_mobile).map_err(|violation| {
        let got_digits = match violation {
            ContractViolation::InvalidDigitCount { got, .. } => got,
            _ => 0,
        };
        StageError::Validation(ValidationFault::InvalidMobileFormat { got_digits })
    })?;

    engine.fetch(&id, &mobile).map_err(|err| match err {
        FetchError::NotFound(detail) => {
            StageError::Domain(DomainFault::ApplicationNotFound(detail))
        }
        FetchError::Gateway(err) => StageError::from_gateway(&err),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use krishi_kernel_contracts::application::ApplicationStatus;
    use rust_decimal::Decimal;

    struct StubFetch {
        outcome: Result<ApplicationRecord, FetchError>,
    }

    impl ApplicationFetchEngine for StubFetch {
        fn fetch(
            &self,
            _id: &ApplicationId,
            _mobile: &MobileNumber,
        ) -> Result<ApplicationRecord, FetchError> {
            self.outcome.clone()
        }
    }

    fn record() -> ApplicationRecord {
        ApplicationRecord::v1(
            ApplicationId::new("APP001").unwrap(),
            "Asha Devi".to_string(),
            String::new(),
            "9876543210".to_string(),
            "Bihar".to_string(),
            "Patna".to_string(),
            String::new(),
            Decimal::new(25, 1),
            "wheat".to_string(),
            ApplicationStatus::Pending,
            "2025-06-01T10:00:00".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn at_trk_01_found_record_is_returned() {
        let engine = StubFetch {
            outcome: Ok(record()),
        };
        let found = track_application(&engine, "APP001", "98765 43210").unwrap();
        assert_eq!(found.application_id.as_str(), "APP001");
    }

    #[test]
    fn at_trk_02_bad_mobile_fails_before_the_network() {
        let engine = StubFetch {
            outcome: Ok(record()),
        };
        let err = track_application(&engine, "APP001", "98765").unwrap_err();
        assert_eq!(
            err,
            StageError::Validation(ValidationFault::InvalidMobileFormat { got_digits: 5 })
        );
    }

    #[test]
    fn at_trk_03_miss_carries_service_detail() {
        let engine = StubFetch {
            outcome: Err(FetchError::NotFound("Application not found".to_string())),
        };
        let err = track_application(&engine, "APP404", "9876543210").unwrap_err();
        assert_eq!(
            err,
            StageError::Domain(DomainFault::ApplicationNotFound(
                "Application not found".to_string()
            ))
        );
    }
}
