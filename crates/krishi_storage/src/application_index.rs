#![forbid(unsafe_code)]

use krishi_kernel_contracts::application::{ApplicationRecord, ApplicationStatus};

/// Status tallies shown above the review table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

/// Read-model over the fetched application list: search, status filtering
/// and tallies for the officials' review dashboard. Replaced wholesale on
/// every refresh; rows are never edited in place.
#[derive(Debug, Clone, Default)]
pub struct ApplicationReviewIndex {
    rows: Vec<ApplicationRecord>,
}

impl ApplicationReviewIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_all(&mut self, rows: Vec<ApplicationRecord>) {
        self.rows = rows;
    }

    pub fn rows(&self) -> &[ApplicationRecord] {
        &self.rows
    }

    /// Case-insensitive substring search across the identifying columns,
    /// optionally narrowed to one status. An empty query matches everything.
    pub fn search(
        &self,
        query: &str,
        status: Option<ApplicationStatus>,
    ) -> Vec<&ApplicationRecord> {
        let needle = query.trim().to_lowercase();
        self.rows
            .iter()
            .filter(|row| status.map_or(true, |wanted| row.status == wanted))
            .filter(|row| needle.is_empty() || row_matches(row, &needle))
            .collect()
    }

    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts {
            total: self.rows.len(),
            ..StatusCounts::default()
        };
        for row in &self.rows {
            match row.status {
                ApplicationStatus::Pending => counts.pending += 1,
                ApplicationStatus::Approved => counts.approved += 1,
                ApplicationStatus::Rejected => counts.rejected += 1,
            }
        }
        counts
    }
}

fn row_matches(row: &ApplicationRecord, needle: &str) -> bool {
    row.application_id.as_str().to_lowercase().contains(needle)
        || row.farmer_name.to_lowercase().contains(needle)
        || row.mobile_number.contains(needle)
        || row.aadhaar_number.contains(needle)
        || row.state.to_lowercase().contains(needle)
        || row.district.to_lowercase().contains(needle)
}
