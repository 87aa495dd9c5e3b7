#![forbid(unsafe_code)]

pub mod application;
pub mod auth;
pub mod common;
pub mod eligibility;
pub mod fraud;
pub mod identity;

pub use common::{
    ContractViolation, MonotonicTimeNs, ReasonCodeId, SchemaVersion, Validate, WorkflowStage,
};
