#![forbid(unsafe_code)]

use krishi_engines::application_gateway::ApplicationGateway;
use krishi_engines::auth_gateway::AuthGateway;
use krishi_engines::eligibility_gateway::EligibilityGateway;
use krishi_engines::fraud_gateway::FraudGateway;
use krishi_engines::identity_gateway::IdentityGateway;
use krishi_kernel_contracts::application::{ApplicationRecord, ApplicationStatus};
use krishi_kernel_contracts::auth::Department;
use krishi_kernel_contracts::MonotonicTimeNs;
use krishi_os::fraud_review::{
    fetch_application_detail, review_recommendation, run_batch_analysis, train_fraud_model,
};
use krishi_os::login_flow::run_login;
use krishi_os::notice::notice_for_failure;
use krishi_os::portal_driver::PortalDriver;
use krishi_os::review_dashboard::ReviewDashboard;
use krishi_os::stage_error::StageError;
use krishi_os::tracker_flow::track_application;
use krishi_storage::EphemeralSessionStore;

fn user_facing(err: StageError) -> String {
    notice_for_failure(&err).text
}

pub fn execute_login(
    gateway: &AuthGateway,
    store: &mut EphemeralSessionStore,
    at: MonotonicTimeNs,
    user_id: &str,
    password: &str,
    department_raw: Option<&str>,
) -> Result<String, String> {
    let department = match department_raw {
        Some(raw) => Department::new(raw).map_err(|_| "invalid department".to_string())?,
        None => Department::agriculture(),
    };
    let user = run_login(gateway, store, at, user_id, password, department)
        .map_err(user_facing)?;
    Ok(format!(
        "Login successful. Welcome, {} ({}).",
        user.name,
        user.department.as_str()
    ))
}

pub fn execute_track(
    gateway: &ApplicationGateway,
    raw_id: &str,
    raw_mobile: &str,
) -> Result<String, String> {
    let record = track_application(gateway, raw_id, raw_mobile).map_err(user_facing)?;
    Ok(format!(
        "{}\n  farmer: {}\n  status: {}\n  submitted: {}",
        record.application_id.as_str(),
        record.farmer_name,
        record.status.as_str(),
        record.submitted_date
    ))
}

pub fn execute_applications(
    gateway: &ApplicationGateway,
    status_raw: Option<&str>,
    query: Option<&str>,
) -> Result<String, String> {
    let status = match status_raw {
        Some(raw) => Some(
            ApplicationStatus::parse(raw)
                .map_err(|_| format!("unknown status: {raw} (use Pending/Approved/Rejected)"))?,
        ),
        None => None,
    };

    let mut dashboard = ReviewDashboard::new();
    let counts = dashboard.refresh(gateway).map_err(user_facing)?;
    let rows = dashboard.search(query.unwrap_or(""), status);

    let mut out = format!(
        "total={} pending={} approved={} rejected={}",
        counts.total, counts.pending, counts.approved, counts.rejected
    );
    for row in rows {
        out.push('\n');
        out.push_str(&format_application_row(row));
    }
    Ok(out)
}

fn format_application_row(row: &ApplicationRecord) -> String {
    format!(
        "{}  {}  {}  {}/{}  {} acres  {}  {}  {}",
        row.application_id.as_str(),
        row.farmer_name,
        row.mobile_number,
        row.state,
        row.district,
        row.total_land_acres,
        row.crop_type,
        row.status.as_str(),
        row.submitted_date
    )
}

pub fn execute_fraud_report(gateway: &FraudGateway) -> Result<String, String> {
    let report = run_batch_analysis(gateway).map_err(user_facing)?;
    let stats = &report.statistics;
    let mut out = format!(
        "applications={} flagged={} ({:.1}%)  high={} medium={} low={}",
        stats.total_applications,
        stats.flagged_anomalies,
        stats.anomaly_percentage,
        stats.high_risk_count,
        stats.medium_risk_count,
        stats.low_risk_count
    );
    for flagged in &report.flagged {
        out.push_str(&format!(
            "\n{}  {}  score={:.3}  {}",
            flagged.application_id.as_str(),
            flagged.risk_level.as_str(),
            flagged.anomaly_score.0,
            flagged.fraud_indicators.join("; ")
        ));
    }
    Ok(out)
}

pub fn execute_fraud_detail(gateway: &FraudGateway, raw_id: &str) -> Result<String, String> {
    let detail = fetch_application_detail(gateway, raw_id).map_err(user_facing)?;
    Ok(format!(
        "{}  {}  score={:.3}  anomaly={}\n  land: {} acres, district density {}, deviation {}\n  indicators: {}\n  recommendation: {}",
        detail.application_id.as_str(),
        detail.risk_level.as_str(),
        detail.anomaly_score.0,
        if detail.is_anomaly { "yes" } else { "no" },
        detail.facts.land_acres,
        detail.facts.district_density,
        detail.facts.land_deviation,
        detail.fraud_indicators.join("; "),
        review_recommendation(detail.risk_level)
    ))
}

pub fn execute_train(gateway: &FraudGateway) -> Result<String, String> {
    train_fraud_model(gateway).map_err(user_facing)
}

/// The full citizen flow in one command: verify, compute quotas, submit.
pub fn execute_apply(
    identity: IdentityGateway,
    eligibility: EligibilityGateway,
    applications: ApplicationGateway,
    at: MonotonicTimeNs,
    raw_aadhaar: &str,
    raw_crop: &str,
    raw_land: &str,
) -> Result<String, String> {
    let mut driver = PortalDriver::new(identity, eligibility, applications);

    let identity = driver.verify_identity(at, raw_aadhaar).map_err(user_facing)?;
    let mut out = format!(
        "Verified: {} ({} acres, {}/{})",
        identity.record.name,
        identity.record.total_land_acres,
        identity.record.state,
        identity.record.district
    );

    let quotes = driver
        .update_crop_inputs(at, raw_crop, raw_land)
        .map_err(user_facing)?
        .ok_or_else(|| "crop type and land size are required".to_string())?;
    out.push_str(&format!(
        "\nAllowed: fertilizer {} kg ({} kg/acre), seed {} kg ({} kg/acre)",
        quotes.fertilizer.allowed_qty,
        quotes.fertilizer.rate_per_acre,
        quotes.seed.allowed_qty,
        quotes.seed.rate_per_acre
    ));

    let confirmation = driver.submit(at).map_err(user_facing)?;
    out.push_str(&format!(
        "\nApplication {} submitted. An SMS notification was sent to {}.",
        confirmation.application_id.as_str(),
        confirmation.notified_mobile.as_str()
    ));
    Ok(out)
}
