use serde::{Deserialize, Serialize};

/// Severity level for an extracted vulnerability, ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Note,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Note,
    ];

    /// Returns a numeric rank where lower values indicate higher severity.
    /// Critical = 0, High = 1, Medium = 2, Low = 3, Note = 4.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
            Severity::Note => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Note => "note",
        }
    }

    /// Case-insensitive parse used when validating model output.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "critical" => Some(Severity::Critical),
            "high" => Some(Severity::High),
            "medium" => Some(Severity::Medium),
            "low" => Some(Severity::Low),
            "note" => Some(Severity::Note),
            _ => None,
        }
    }
}

/// Remediation status taxonomy used by the report portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VulnCategory {
    Fixed,
    NotFixed,
    NotApplicable,
}

impl VulnCategory {
    pub const ALL: [VulnCategory; 3] = [
        VulnCategory::Fixed,
        VulnCategory::NotFixed,
        VulnCategory::NotApplicable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VulnCategory::Fixed => "fixed",
            VulnCategory::NotFixed => "not_fixed",
            VulnCategory::NotApplicable => "not_applicable",
        }
    }

    /// Case-insensitive parse accepting the spellings models actually emit.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "fixed" => Some(VulnCategory::Fixed),
            "not_fixed" | "notfixed" | "unfixed" => Some(VulnCategory::NotFixed),
            "not_applicable" | "notapplicable" | "n/a" | "na" => Some(VulnCategory::NotApplicable),
            _ => None,
        }
    }
}

/// A vulnerability proposed by the extraction agent. Transient: candidates only
/// exist between parsing and deduplication/persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateVulnerability {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub category: VulnCategory,
    pub raw_confidence: Option<f64>,
}

/// The slice of a stored vulnerability that deduplication needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExistingVulnerability {
    pub id: i64,
    pub title: String,
    pub description: String,
}

/// A fully persisted vulnerability row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredVulnerability {
    pub id: i64,
    pub report_id: i64,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub category: VulnCategory,
    pub confidence: Option<f64>,
    pub created_at: String,
}
