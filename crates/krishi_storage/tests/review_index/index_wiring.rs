#![forbid(unsafe_code)]

use krishi_kernel_contracts::application::{
    ApplicationId, ApplicationRecord, ApplicationStatus,
};
use krishi_storage::application_index::{ApplicationReviewIndex, StatusCounts};
use rust_decimal::Decimal;

fn row(id: &str, name: &str, district: &str, status: ApplicationStatus) -> ApplicationRecord {
    ApplicationRecord::v1(
        ApplicationId::new(id).unwrap(),
        name.to_string(),
        "123456789012".to_string(),
        "9876543210".to_string(),
        "Bihar".to_string(),
        district.to_string(),
        "Y".to_string(),
        Decimal::new(25, 1),
        "wheat".to_string(),
        status,
        "2025-06-01T10:00:00".to_string(),
    )
    .unwrap()
}

fn loaded_index() -> ApplicationReviewIndex {
    let mut index = ApplicationReviewIndex::new();
    index.replace_all(vec![
        row("APP001", "Asha Devi", "Patna", ApplicationStatus::Pending),
        row("APP002", "K. Prasad", "Gaya", ApplicationStatus::Approved),
        row("APP003", "Meena Kumari", "Patna", ApplicationStatus::Rejected),
    ]);
    index
}

#[test]
fn at_review_db_01_counts_tally_by_status() {
    let index = loaded_index();
    assert_eq!(
        index.status_counts(),
        StatusCounts {
            total: 3,
            pending: 1,
            approved: 1,
            rejected: 1,
        }
    );
}

#[test]
fn at_review_db_02_search_is_case_insensitive_across_columns() {
    let index = loaded_index();
    let by_name = index.search("asha", None);
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].application_id.as_str(), "APP001");

    let by_district = index.search("PATNA", None);
    assert_eq!(by_district.len(), 2);

    let by_id = index.search("app002", None);
    assert_eq!(by_id.len(), 1);
}

#[test]
fn at_review_db_03_status_filter_composes_with_search() {
    let index = loaded_index();
    let filtered = index.search("patna", Some(ApplicationStatus::Rejected));
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].application_id.as_str(), "APP003");
}

#[test]
fn at_review_db_04_empty_query_matches_everything() {
    let index = loaded_index();
    assert_eq!(index.search("", None).len(), 3);
    assert_eq!(index.search("   ", Some(ApplicationStatus::Pending)).len(), 1);
}

#[test]
fn at_review_db_05_refresh_replaces_rows() {
    let mut index = loaded_index();
    index.replace_all(vec![row(
        "APP009",
        "New Row",
        "Nalanda",
        ApplicationStatus::Pending,
    )]);
    assert_eq!(index.rows().len(), 1);
    assert_eq!(index.search("asha", None).len(), 0);
}
