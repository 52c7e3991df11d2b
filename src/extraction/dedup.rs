use similar::TextDiff;
use tracing::debug;

use crate::models::{CandidateVulnerability, ExistingVulnerability};

/// Word-overlap ratio above which two descriptions count as the same finding.
/// Deliberately conservative: skipping a near-duplicate is cheaper to fix by
/// hand than hunting down a silently re-created one.
pub const DESCRIPTION_SIMILARITY_THRESHOLD: f32 = 0.85;

#[derive(Debug)]
pub struct DedupOutcome {
    pub accepted: Vec<CandidateVulnerability>,
    pub duplicates: usize,
}

/// Filter candidates against the vulnerabilities already stored for the
/// report. A candidate is a duplicate when its normalized title matches, or
/// its description is near-identical to, an existing vulnerability or an
/// earlier candidate in the same batch. Accepted candidates keep their
/// input order.
pub fn filter_duplicates(
    candidates: Vec<CandidateVulnerability>,
    existing: &[ExistingVulnerability],
) -> DedupOutcome {
    let mut seen_titles: Vec<String> = existing.iter().map(|v| normalize_title(&v.title)).collect();
    let mut seen_descriptions: Vec<String> =
        existing.iter().map(|v| v.description.clone()).collect();

    let mut accepted = Vec::new();
    let mut duplicates = 0usize;

    for candidate in candidates {
        let title = normalize_title(&candidate.title);
        let title_match = seen_titles.iter().any(|t| *t == title);
        let description_match = !title_match
            && seen_descriptions
                .iter()
                .any(|d| description_similarity(d, &candidate.description) > DESCRIPTION_SIMILARITY_THRESHOLD);

        if title_match || description_match {
            debug!(
                title = %candidate.title,
                by_title = title_match,
                "Skipping duplicate candidate"
            );
            duplicates += 1;
        } else {
            seen_titles.push(title);
            seen_descriptions.push(candidate.description.clone());
            accepted.push(candidate);
        }
    }

    DedupOutcome {
        accepted,
        duplicates,
    }
}

/// Lowercase and collapse runs of whitespace so cosmetic differences do not
/// defeat the title comparison.
fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn description_similarity(a: &str, b: &str) -> f32 {
    if a.trim().is_empty() || b.trim().is_empty() {
        return 0.0;
    }
    TextDiff::from_words(a, b).ratio()
}
