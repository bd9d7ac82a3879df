use bizscout_core::BusinessRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bookkeeping for one run. Kept apart from the records so that records
/// stay identical across runs over identical inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Wall-clock seconds, two decimals.
    pub elapsed_secs: f64,
    pub result_count: usize,
    pub discovered_count: usize,
    /// Candidates skipped because the run budget ran out before they started.
    pub dropped_count: usize,
}

/// Caller-facing result of a run: records in discovery order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub niche: String,
    pub location: String,
    pub records: Vec<BusinessRecord>,
    pub metadata: RunMetadata,
}
