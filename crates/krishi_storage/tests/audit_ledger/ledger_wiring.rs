#![forbid(unsafe_code)]

use krishi_kernel_contracts::{MonotonicTimeNs, ReasonCodeId};
use krishi_storage::audit_log::{AuditArea, AuditLogConfig, WorkflowAuditLog};
use krishi_storage::StorageError;

#[test]
fn at_audit_db_01_sequence_is_dense_from_one() {
    let mut log = WorkflowAuditLog::default();
    let a = log
        .append(
            MonotonicTimeNs(10),
            AuditArea::IdentityVerification,
            ReasonCodeId(0x7101_0101),
            None,
        )
        .unwrap();
    let b = log
        .append(
            MonotonicTimeNs(20),
            AuditArea::Eligibility,
            ReasonCodeId(0x7201_0101),
            Some("token=1".to_string()),
        )
        .unwrap();
    assert_eq!((a, b), (1, 2));
    assert_eq!(log.rows().len(), 2);
    assert_eq!(log.rows()[1].detail.as_deref(), Some("token=1"));
}

#[test]
fn at_audit_db_02_rows_filter_by_area() {
    let mut log = WorkflowAuditLog::default();
    for (t, area) in [
        (10, AuditArea::Submission),
        (20, AuditArea::Login),
        (30, AuditArea::Submission),
    ] {
        log.append(MonotonicTimeNs(t), area, ReasonCodeId(0x7301_0101), None)
            .unwrap();
    }
    assert_eq!(log.rows_by_area(AuditArea::Submission).len(), 2);
    assert_eq!(log.rows_by_area(AuditArea::FraudReview).len(), 0);
}

#[test]
fn at_audit_db_03_capacity_is_enforced() {
    let mut log = WorkflowAuditLog::new(AuditLogConfig { max_rows: 2 });
    for t in [10, 20] {
        log.append(
            MonotonicTimeNs(t),
            AuditArea::Tracker,
            ReasonCodeId(0x7302_0101),
            None,
        )
        .unwrap();
    }
    let overflow = log.append(
        MonotonicTimeNs(30),
        AuditArea::Tracker,
        ReasonCodeId(0x7302_0101),
        None,
    );
    assert!(matches!(
        overflow,
        Err(StorageError::CapacityExceeded { .. })
    ));
    assert_eq!(log.rows().len(), 2);
}
