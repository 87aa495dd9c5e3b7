#![forbid(unsafe_code)]

use krishi_engines::gateway::GatewayError;
use krishi_kernel_contracts::application::FieldError;
use krishi_kernel_contracts::WorkflowStage;

/// Input problems the client detects itself; no network call was or will be
/// made until the input is corrected.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationFault {
    InvalidIdentityFormat { got_digits: usize },
    InvalidMobileFormat { got_digits: usize },
    MissingField { field: &'static str },
    InvalidField { field: &'static str },
    SubmissionRejected(Vec<FieldError>),
}

/// The service understood the request and refused it on business grounds.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainFault {
    IdentityNotFound,
    NoRegisteredLand,
    EligibilityUnavailable,
    InvalidCredentials(String),
    ApplicationNotFound(String),
}

/// Workflow invoked out of order. Indicates a caller bug, not bad user
/// input; unrecoverable within the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreconditionFault {
    NotVerified,
    NoLand,
    QuotesNotCurrent,
    IdentityLocked,
    CallAlreadyInFlight(WorkflowStage),
    CallNotInFlight(WorkflowStage),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StageError {
    Validation(ValidationFault),
    Domain(DomainFault),
    Precondition(PreconditionFault),
    Transport { kind: &'static str },
}

impl StageError {
    /// Retriable without changing anything: re-invoking the same stage with
    /// the same input may now succeed.
    pub fn is_retriable_as_is(&self) -> bool {
        matches!(self, Self::Domain(_) | Self::Transport { .. })
    }

    /// Retriable only after the user corrects the flagged input.
    pub fn needs_input_correction(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// A contract breach between UI and workflow; restart the flow.
    pub fn requires_restart(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }

    /// Collapse a gateway failure into the transport kind used for audit and
    /// retry classification. Malformed or contract-violating wire data is a
    /// service failure from this layer's point of view.
    pub fn from_gateway(err: &GatewayError) -> Self {
        match err {
            GatewayError::Http { .. } => Self::Transport { kind: "http_status" },
            GatewayError::Transport { kind } => Self::Transport { kind: *kind },
            GatewayError::MalformedResponse { .. } | GatewayError::Contract(_) => {
                Self::Transport {
                    kind: "malformed_response",
                }
            }
            GatewayError::InvalidConfig { .. } => Self::Transport { kind: "config" },
        }
    }
}

impl std::fmt::Display for StageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(fault) => write!(f, "validation failed: {fault:?}"),
            Self::Domain(fault) => write!(f, "request refused: {fault:?}"),
            Self::Precondition(fault) => write!(f, "workflow precondition violated: {fault:?}"),
            Self::Transport { kind } => write!(f, "transport failure: {kind}"),
        }
    }
}

impl std::error::Error for StageError {}
