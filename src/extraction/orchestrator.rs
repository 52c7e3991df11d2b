use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::dedup::filter_duplicates;
use super::parser::parse_candidates;
use super::prompt::build_extraction_prompt;
use crate::config::ExtractionConfig;
use crate::db::{ReportStore, VulnerabilityStore};
use crate::errors::VulnexError;
use crate::llm::{AgentProvider, AgentRole};
use crate::models::{ExtractionOptions, ExtractionResult, Severity, VulnCategory};

/// Sequences one extraction run: precondition checks, the agent call,
/// parsing, deduplication, and per-candidate persistence.
///
/// Failures before or during the agent call abort the whole run. Once
/// parsing has produced candidates, failures are isolated per candidate and
/// recorded in the result instead of aborting.
pub struct ExtractionOrchestrator {
    reports: Arc<dyn ReportStore>,
    vulnerabilities: Arc<dyn VulnerabilityStore>,
    agent: Arc<dyn AgentProvider>,
    max_content_bytes: usize,
}

impl ExtractionOrchestrator {
    pub fn new(
        reports: Arc<dyn ReportStore>,
        vulnerabilities: Arc<dyn VulnerabilityStore>,
        agent: Arc<dyn AgentProvider>,
        config: &ExtractionConfig,
    ) -> Self {
        Self {
            reports,
            vulnerabilities,
            agent,
            max_content_bytes: config.max_content_bytes,
        }
    }

    pub async fn extract(
        &self,
        report_id: i64,
        options: &ExtractionOptions,
        cancel: &CancellationToken,
    ) -> Result<ExtractionResult, VulnexError> {
        let started = Instant::now();
        let extraction_id = Uuid::new_v4();
        info!(%extraction_id, report_id, "Extraction started");

        let report = self
            .reports
            .get_report_by_id(report_id)?
            .ok_or(VulnexError::ReportNotFound(report_id))?;

        if report.markdown.trim().is_empty() {
            return Err(VulnexError::NoContent(report_id));
        }

        let size = report.content_bytes();
        if size > self.max_content_bytes {
            return Err(VulnexError::ContentTooLarge {
                size,
                limit: self.max_content_bytes,
            });
        }

        let prompt = build_extraction_prompt(&report.markdown, &Severity::ALL, &VulnCategory::ALL);
        let raw = self
            .agent
            .call(AgentRole::Extractor, &prompt, cancel)
            .await?;

        // Cancellation past this point is ignored: the provider call is
        // already paid for, so the response is processed to completion.
        let parsed = parse_candidates(&raw)?;
        let mut warnings = parsed.warnings;
        let mut candidates = parsed.candidates;

        if let Some(min) = options.min_confidence {
            candidates.retain(|candidate| match candidate.raw_confidence {
                Some(confidence) if confidence < min => {
                    warnings.push(format!(
                        "{}: confidence {:.2} below the {:.2} minimum",
                        candidate.title, confidence, min
                    ));
                    false
                }
                _ => true,
            });
        }
        if let Some(max) = options.max_candidates {
            if candidates.len() > max {
                warnings.push(format!(
                    "candidate list truncated to {} of {}",
                    max,
                    candidates.len()
                ));
                candidates.truncate(max);
            }
        }

        let existing = self.vulnerabilities.list_for_report(report_id)?;
        let outcome = filter_duplicates(candidates, &existing);
        let total_extracted = outcome.accepted.len() + outcome.duplicates;

        let mut created_ids = Vec::new();
        let mut processing_errors = Vec::new();
        for candidate in &outcome.accepted {
            match self.vulnerabilities.create(report_id, candidate) {
                Ok(id) => {
                    debug!(id, title = %candidate.title, "Vulnerability created");
                    created_ids.push(id);
                }
                Err(e) => {
                    warn!(title = %candidate.title, error = %e, "Failed to persist candidate");
                    processing_errors.push(format!("{}: {}", candidate.title, e));
                }
            }
        }

        let result = ExtractionResult {
            total_extracted,
            total_created: created_ids.len(),
            duplicates_skipped: outcome.duplicates,
            created_vulnerability_ids: created_ids,
            validation_warnings: warnings,
            processing_errors,
            processing_time_ms: started.elapsed().as_millis() as u64,
        };
        info!(
            %extraction_id,
            report_id,
            total_extracted = result.total_extracted,
            created = result.total_created,
            duplicates = result.duplicates_skipped,
            errors = result.processing_errors.len(),
            duration_ms = result.processing_time_ms,
            "Extraction finished"
        );
        Ok(result)
    }
}
