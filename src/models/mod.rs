pub mod extraction;
pub mod report;
pub mod vulnerability;

pub use extraction::{ExtractionOptions, ExtractionResult};
pub use report::Report;
pub use vulnerability::{
    CandidateVulnerability, ExistingVulnerability, Severity, StoredVulnerability, VulnCategory,
};
