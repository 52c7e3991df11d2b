use serde::{Deserialize, Serialize};

/// Optional per-request tuning parameters for an extraction run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionOptions {
    /// Cap on how many parsed candidates proceed to deduplication.
    pub max_candidates: Option<usize>,
    /// Candidates whose reported confidence falls below this are dropped
    /// with a warning. Candidates without a confidence value always pass.
    pub min_confidence: Option<f64>,
}

/// The report returned to the caller once an extraction run has fully
/// terminated. Describes partial success: every id in
/// `created_vulnerability_ids` is already durably persisted.
///
/// Invariants:
/// - `total_extracted == total_created + duplicates_skipped + processing_errors.len()`
/// - `created_vulnerability_ids.len() == total_created`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub total_extracted: usize,
    pub total_created: usize,
    pub duplicates_skipped: usize,
    pub created_vulnerability_ids: Vec<i64>,
    pub validation_warnings: Vec<String>,
    pub processing_errors: Vec<String>,
    pub processing_time_ms: u64,
}
