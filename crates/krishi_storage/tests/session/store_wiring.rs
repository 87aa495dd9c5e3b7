#![forbid(unsafe_code)]

use krishi_kernel_contracts::auth::{AuthSessionRecord, AuthUser, Department, OfficerId};
use krishi_kernel_contracts::MonotonicTimeNs;
use krishi_storage::{EphemeralSessionStore, SessionStore};

fn record(user_id: &str, t: u64) -> AuthSessionRecord {
    let user = AuthUser::v1(
        OfficerId::new(user_id).unwrap(),
        "R. Sharma".to_string(),
        Department::agriculture(),
    )
    .unwrap();
    AuthSessionRecord::v1(&user, MonotonicTimeNs(t))
}

#[test]
fn at_session_db_01_store_then_read_round_trips() {
    let mut store = EphemeralSessionStore::new();
    assert!(store.active_session().unwrap().is_none());

    store.store_session(&record("AGRI001", 10)).unwrap();
    let active = store.active_session().unwrap().unwrap();
    assert_eq!(active.user_id, "AGRI001");
    assert_eq!(active.login_time, MonotonicTimeNs(10));
}

#[test]
fn at_session_db_02_single_slot_is_replaced_not_appended() {
    let mut store = EphemeralSessionStore::new();
    store.store_session(&record("AGRI001", 10)).unwrap();
    store.store_session(&record("AGRI002", 20)).unwrap();

    let active = store.active_session().unwrap().unwrap();
    assert_eq!(active.user_id, "AGRI002");
}

#[test]
fn at_session_db_03_clear_logs_out() {
    let mut store = EphemeralSessionStore::new();
    store.store_session(&record("AGRI001", 10)).unwrap();
    store.clear_session();
    assert!(store.active_session().unwrap().is_none());
    assert!(store.raw_slot().is_none());
}

#[test]
fn at_session_db_04_slot_holds_serialized_record() {
    let mut store = EphemeralSessionStore::new();
    store.store_session(&record("AGRI001", 10)).unwrap();
    let raw = store.raw_slot().unwrap();
    assert!(raw.contains("\"user_id\":\"AGRI001\""));
}
