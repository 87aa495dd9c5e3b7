#![forbid(unsafe_code)]

use krishi_kernel_contracts::{MonotonicTimeNs, ReasonCodeId, WorkflowStage};

use crate::session_store::StorageError;

/// Which part of the portal produced an audit row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditArea {
    IdentityVerification,
    Eligibility,
    Submission,
    Login,
    Tracker,
    Review,
    FraudReview,
}

impl AuditArea {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IdentityVerification => "identity_verification",
            Self::Eligibility => "eligibility",
            Self::Submission => "submission",
            Self::Login => "login",
            Self::Tracker => "tracker",
            Self::Review => "review",
            Self::FraudReview => "fraud_review",
        }
    }
}

impl From<WorkflowStage> for AuditArea {
    fn from(value: WorkflowStage) -> Self {
        match value {
            WorkflowStage::IdentityVerification => Self::IdentityVerification,
            WorkflowStage::EligibilityComputation => Self::Eligibility,
            WorkflowStage::Submission => Self::Submission,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRow {
    pub seq: u64,
    pub at: MonotonicTimeNs,
    pub area: AuditArea,
    pub reason_code: ReasonCodeId,
    /// Safe, operator-facing detail. Never raw response bodies or secrets.
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditLogConfig {
    pub max_rows: usize,
}

impl AuditLogConfig {
    pub fn mvp_v1() -> Self {
        Self { max_rows: 100_000 }
    }
}

/// Append-only ledger of workflow transitions. Rows are never rewritten;
/// sequence numbers are dense and start at 1.
#[derive(Debug, Clone)]
pub struct WorkflowAuditLog {
    config: AuditLogConfig,
    rows: Vec<AuditRow>,
    next_seq: u64,
}

impl Default for WorkflowAuditLog {
    fn default() -> Self {
        Self::new(AuditLogConfig::mvp_v1())
    }
}

impl WorkflowAuditLog {
    pub fn new(config: AuditLogConfig) -> Self {
        Self {
            config,
            rows: Vec::new(),
            next_seq: 1,
        }
    }

    pub fn append(
        &mut self,
        at: MonotonicTimeNs,
        area: AuditArea,
        reason_code: ReasonCodeId,
        detail: Option<String>,
    ) -> Result<u64, StorageError> {
        if self.rows.len() >= self.config.max_rows {
            return Err(StorageError::CapacityExceeded {
                ledger: "workflow_audit_log",
            });
        }
        let seq = self.next_seq;
        self.next_seq = self.next_seq.saturating_add(1);
        self.rows.push(AuditRow {
            seq,
            at,
            area,
            reason_code,
            detail,
        });
        Ok(seq)
    }

    pub fn rows(&self) -> &[AuditRow] {
        &self.rows
    }

    pub fn rows_by_area(&self, area: AuditArea) -> Vec<&AuditRow> {
        self.rows.iter().filter(|row| row.area == area).collect()
    }
}
