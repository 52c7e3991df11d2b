pub mod connection;
pub mod reports;
pub mod schema;
pub mod vulnerabilities;

pub use connection::Database;

use crate::errors::VulnexError;
use crate::models::{CandidateVulnerability, ExistingVulnerability, Report};

/// Read side of the report catalog, as the extraction pipeline sees it.
pub trait ReportStore: Send + Sync {
    fn get_report_by_id(&self, id: i64) -> Result<Option<Report>, VulnexError>;
}

/// Persistence collaborator for vulnerabilities. Each `create` call is an
/// atomic, independent unit of work; the store owns its own locking.
pub trait VulnerabilityStore: Send + Sync {
    fn list_for_report(&self, report_id: i64) -> Result<Vec<ExistingVulnerability>, VulnexError>;

    /// Returns the new row id. Constraint violations (duplicate title for
    /// the same report) surface as `Err` and are handled per-candidate by
    /// the orchestrator.
    fn create(&self, report_id: i64, candidate: &CandidateVulnerability)
        -> Result<i64, VulnexError>;
}
