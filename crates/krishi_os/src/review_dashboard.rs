#![forbid(unsafe_code)]

use krishi_engines::application_gateway::ApplicationGateway;
use krishi_engines::gateway::GatewayError;
use krishi_kernel_contracts::application::{ApplicationRecord, ApplicationStatus};
use krishi_storage::application_index::{ApplicationReviewIndex, StatusCounts};

use crate::stage_error::StageError;

pub trait ApplicationListEngine {
    fn list(&self) -> Result<Vec<ApplicationRecord>, GatewayError>;
}

impl ApplicationListEngine for ApplicationGateway {
    fn list(&self) -> Result<Vec<ApplicationRecord>, GatewayError> {
        ApplicationGateway::list(self)
    }
}

/// Officials' view over the full application list. A failed refresh leaves
/// the previously loaded rows in place so the table keeps rendering.
#[derive(Debug, Clone, Default)]
pub struct ReviewDashboard {
    index: ApplicationReviewIndex,
}

impl ReviewDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh<E: ApplicationListEngine>(
        &mut self,
        engine: &E,
    ) -> Result<StatusCounts, StageError> {
        let rows = engine.list().map_err(|err| StageError::from_gateway(&err))?;
        self.index.replace_all(rows);
        Ok(self.index.status_counts())
    }

    pub fn counts(&self) -> StatusCounts {
        self.index.status_counts()
    }

    pub fn search(
        &self,
        query: &str,
        status: Option<ApplicationStatus>,
    ) -> Vec<&ApplicationRecord> {
        self.index.search(query, status)
    }

    pub fn rows(&self) -> &[ApplicationRecord] {
        self.index.rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use krishi_kernel_contracts::application::ApplicationId;
    use rust_decimal::Decimal;

    struct StubList {
        outcome: Result<Vec<ApplicationRecord>, GatewayError>,
    }

    impl ApplicationListEngine for StubList {
        fn list(&self) -> Result<Vec<ApplicationRecord>, GatewayError> {
            self.outcome.clone()
        }
    }

    fn row(id: &str, status: ApplicationStatus) -> ApplicationRecord {
        ApplicationRecord::v1(
            ApplicationId::new(id).unwrap(),
            "Asha Devi".to_string(),
            "123456789012".to_string(),
            "9876543210".to_string(),
            "Bihar".to_string(),
            "Patna".to_string(),
            "Y".to_string(),
            Decimal::new(25, 1),
            "wheat".to_string(),
            status,
            "2025-06-01T10:00:00".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn at_rev_01_refresh_loads_rows_and_counts() {
        let engine = StubList {
            outcome: Ok(vec![
                row("APP001", ApplicationStatus::Pending),
                row("APP002", ApplicationStatus::Approved),
            ]),
        };
        let mut dashboard = ReviewDashboard::new();
        let counts = dashboard.refresh(&engine).unwrap();
        assert_eq!(counts.total, 2);
        assert_eq!(counts.approved, 1);
        assert_eq!(dashboard.search("asha", None).len(), 2);
    }

    #[test]
    fn at_rev_02_failed_refresh_keeps_previous_rows() {
        let mut dashboard = ReviewDashboard::new();
        dashboard
            .refresh(&StubList {
                outcome: Ok(vec![row("APP001", ApplicationStatus::Pending)]),
            })
            .unwrap();

        let err = dashboard
            .refresh(&StubList {
                outcome: Err(GatewayError::Transport { kind: "connection" }),
            })
            .unwrap_err();
        assert!(err.is_retriable_as_is());
        assert_eq!(dashboard.rows().len(), 1);
    }
}
