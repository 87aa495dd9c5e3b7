#![forbid(unsafe_code)]

use crate::stage_error::{DomainFault, PreconditionFault, StageError, ValidationFault};

/// How long a terminal notice stays on screen before dismissing itself.
pub const AUTO_DISMISS_MS: u32 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    Success,
    Error,
    Info,
}

/// Transient user-facing notification. Loading notices carry no dismissal
/// deadline; they persist until replaced by a terminal one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: NoticeSeverity,
    pub text: String,
    pub auto_dismiss_ms: Option<u32>,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Success,
            text: text.into(),
            auto_dismiss_ms: Some(AUTO_DISMISS_MS),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Error,
            text: text.into(),
            auto_dismiss_ms: Some(AUTO_DISMISS_MS),
        }
    }

    pub fn loading(text: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Info,
            text: text.into(),
            auto_dismiss_ms: None,
        }
    }
}

/// Every stage failure surfaces as exactly one notice; nothing is silently
/// swallowed and nothing tears the session down.
pub fn notice_for_failure(err: &StageError) -> Notice {
    Notice::error(failure_text(err))
}

fn failure_text(err: &StageError) -> String {
    match err {
        StageError::Validation(fault) => match fault {
            ValidationFault::InvalidIdentityFormat { .. } => {
                "Please enter a valid 12-digit Aadhaar number".to_string()
            }
            ValidationFault::InvalidMobileFormat { .. } => {
                "Please enter a valid 10-digit mobile number".to_string()
            }
            ValidationFault::MissingField { field } => format!("Please provide {field}"),
            ValidationFault::InvalidField { field } => format!("Invalid value for {field}"),
            ValidationFault::SubmissionRejected(errors) => errors
                .iter()
                .map(|e| {
                    if e.field.is_empty() {
                        e.message.clone()
                    } else {
                        format!("{}: {}", e.field, e.message)
                    }
                })
                .collect::<Vec<_>>()
                .join(", "),
        },
        StageError::Domain(fault) => match fault {
            DomainFault::IdentityNotFound => {
                "Aadhaar number not found in database. Please ensure you are registered."
                    .to_string()
            }
            DomainFault::NoRegisteredLand => {
                "This Aadhaar holder has no registered land. Only farmers with land ownership \
                 can apply for subsidies."
                    .to_string()
            }
            DomainFault::EligibilityUnavailable => {
                "Unable to calculate subsidies. Please check crop type and try again.".to_string()
            }
            DomainFault::InvalidCredentials(detail)
            | DomainFault::ApplicationNotFound(detail) => detail.clone(),
        },
        StageError::Precondition(fault) => match fault {
            PreconditionFault::NotVerified => {
                "Please verify your Aadhaar number first!".to_string()
            }
            PreconditionFault::NoLand => {
                "Only farmers with registered land can submit applications.".to_string()
            }
            _ => "The form is out of step with the workflow. Please restart the application."
                .to_string(),
        },
        StageError::Transport { .. } => {
            "Network error. Please ensure the backend server is running.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use krishi_kernel_contracts::application::FieldError;

    #[test]
    fn at_ntc_01_terminal_notices_auto_dismiss() {
        assert_eq!(
            Notice::success("done").auto_dismiss_ms,
            Some(AUTO_DISMISS_MS)
        );
        assert_eq!(Notice::loading("working...").auto_dismiss_ms, None);
    }

    #[test]
    fn at_ntc_02_field_errors_join_into_one_line() {
        let err = StageError::Validation(ValidationFault::SubmissionRejected(vec![
            FieldError::new("body.mobile_number", "string too short").unwrap(),
            FieldError::new("", "duplicate application").unwrap(),
        ]));
        let notice = notice_for_failure(&err);
        assert_eq!(notice.severity, NoticeSeverity::Error);
        assert_eq!(
            notice.text,
            "body.mobile_number: string too short, duplicate application"
        );
    }

    #[test]
    fn at_ntc_03_precondition_notice_points_at_verification() {
        let err = StageError::Precondition(PreconditionFault::NotVerified);
        assert_eq!(
            notice_for_failure(&err).text,
            "Please verify your Aadhaar number first!"
        );
    }
}
