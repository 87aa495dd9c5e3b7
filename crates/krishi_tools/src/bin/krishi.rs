#![forbid(unsafe_code)]

use std::env;
use std::io::{self, IsTerminal, Read};
use std::time::{SystemTime, UNIX_EPOCH};

use krishi_engines::application_gateway::ApplicationGateway;
use krishi_engines::auth_gateway::AuthGateway;
use krishi_engines::eligibility_gateway::EligibilityGateway;
use krishi_engines::fraud_gateway::FraudGateway;
use krishi_engines::gateway::PortalEndpoints;
use krishi_engines::identity_gateway::IdentityGateway;
use krishi_kernel_contracts::MonotonicTimeNs;
use krishi_storage::EphemeralSessionStore;
use krishi_tools::portal_cli::{
    execute_applications, execute_apply, execute_fraud_detail, execute_fraud_report,
    execute_login, execute_track, execute_train,
};

const USAGE: &str = "usage: krishi <command>\n\
  login <user_id> [department]\n\
  apply <aadhaar_number> <crop_type> <land_acres>\n\
  track <application_id> <mobile_number>\n\
  applications [status] [search]\n\
  fraud [application_id]\n\
  train";

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().skip(1).collect();
    let command = args.first().map(String::as_str).ok_or_else(usage)?;
    let endpoints = PortalEndpoints::from_env();

    let output = match command {
        "login" => {
            let user_id = args.get(1).ok_or_else(usage)?;
            let department = args.get(2).map(String::as_str);
            let password = read_password(user_id)?;
            let gateway = AuthGateway::new(endpoints);
            // Process-scoped session; gone when the CLI exits, like a closed tab.
            let mut store = EphemeralSessionStore::new();
            execute_login(&gateway, &mut store, now(), user_id, &password, department)?
        }
        "apply" => {
            let aadhaar = args.get(1).ok_or_else(usage)?;
            let crop = args.get(2).ok_or_else(usage)?;
            let land = args.get(3).ok_or_else(usage)?;
            execute_apply(
                IdentityGateway::new(endpoints.clone()),
                EligibilityGateway::new(endpoints.clone()),
                ApplicationGateway::new(endpoints),
                now(),
                aadhaar,
                crop,
                land,
            )?
        }
        "track" => {
            let id = args.get(1).ok_or_else(usage)?;
            let mobile = args.get(2).ok_or_else(usage)?;
            execute_track(&ApplicationGateway::new(endpoints), id, mobile)?
        }
        "applications" => {
            let status = args.get(1).map(String::as_str);
            let query = args.get(2).map(String::as_str);
            execute_applications(&ApplicationGateway::new(endpoints), status, query)?
        }
        "fraud" => {
            let gateway = FraudGateway::new(endpoints);
            match args.get(1) {
                Some(id) => execute_fraud_detail(&gateway, id)?,
                None => execute_fraud_report(&gateway)?,
            }
        }
        "train" => execute_train(&FraudGateway::new(endpoints))?,
        _ => return Err(usage()),
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

fn usage() -> String {
    USAGE.to_string()
}

fn read_password(user_id: &str) -> Result<String, String> {
    if io::stdin().is_terminal() {
        let prompt = format!("Password for {user_id}: ");
        let value = rpassword::prompt_password(prompt).map_err(|e| e.to_string())?;
        if value.is_empty() {
            return Err("password must not be empty".to_string());
        }
        Ok(value)
    } else {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .map_err(|e| e.to_string())?;
        let trimmed = input.trim().to_string();
        if trimmed.is_empty() {
            return Err("password must not be empty".to_string());
        }
        Ok(trimmed)
    }
}

fn now() -> MonotonicTimeNs {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    MonotonicTimeNs(nanos)
}
