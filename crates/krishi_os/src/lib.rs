#![forbid(unsafe_code)]

pub mod application_workflow;
pub mod fraud_review;
pub mod login_flow;
pub mod notice;
pub mod portal_driver;
pub mod review_dashboard;
pub mod route_guard;
pub mod stage_error;
pub mod tracker_flow;
