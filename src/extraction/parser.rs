use serde_json::Value;
use tracing::debug;

use crate::errors::VulnexError;
use crate::models::{CandidateVulnerability, Severity, VulnCategory};

pub const NO_FINDINGS_WARNING: &str = "No vulnerabilities found in the report.";

/// Parser output: the candidates that survived field validation plus the
/// warnings accumulated for everything that did not.
#[derive(Debug, Default)]
pub struct ParsedCandidates {
    pub candidates: Vec<CandidateVulnerability>,
    pub warnings: Vec<String>,
}

/// Parse the agent's raw text payload into candidate vulnerabilities.
///
/// The payload must be a JSON array, or an object wrapping a single array
/// field. Anything that is not JSON at all is a hard error; individually
/// malformed elements are dropped with a warning instead.
pub fn parse_candidates(raw: &str) -> Result<ParsedCandidates, VulnexError> {
    let cleaned = strip_code_fences(raw);

    let value: Value = serde_json::from_str(cleaned).map_err(|e| {
        VulnexError::ResponseParse(format!("agent payload is not valid JSON: {}", e))
    })?;

    let elements = candidate_array(&value)?;

    let mut parsed = ParsedCandidates::default();
    if elements.is_empty() {
        parsed.warnings.push(NO_FINDINGS_WARNING.to_string());
        return Ok(parsed);
    }

    for (index, element) in elements.iter().enumerate() {
        match parse_element(element, index) {
            Ok(candidate) => {
                if let Some(warning) = category_warning(element, &candidate) {
                    parsed.warnings.push(warning);
                }
                parsed.candidates.push(candidate);
            }
            Err(warning) => {
                debug!(index, %warning, "Dropping malformed candidate");
                parsed.warnings.push(warning);
            }
        }
    }

    Ok(parsed)
}

/// Models frequently wrap JSON in markdown code fences despite instructions.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let stripped = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .unwrap_or(trimmed);
    stripped.trim()
}

/// Accept a bare array, or an object carrying exactly one array field
/// (e.g. {"vulnerabilities": [...]}).
fn candidate_array(value: &Value) -> Result<&Vec<Value>, VulnexError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(map) => {
            let mut arrays = map.values().filter_map(Value::as_array);
            match (arrays.next(), arrays.next()) {
                (Some(items), None) => Ok(items),
                _ => Err(VulnexError::ResponseParse(
                    "agent payload object does not wrap a single candidate array".into(),
                )),
            }
        }
        _ => Err(VulnexError::ResponseParse(format!(
            "agent payload is JSON but not an array of candidates (got {})",
            json_type_name(value)
        ))),
    }
}

/// Validate one element. Returns the warning text on rejection.
fn parse_element(element: &Value, index: usize) -> Result<CandidateVulnerability, String> {
    let object = element
        .as_object()
        .ok_or_else(|| format!("candidate {}: not a JSON object", index + 1))?;

    let title = object
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| format!("candidate {}: missing or empty title", index + 1))?;

    let description = object
        .get("description")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| format!("{}: missing or empty description", title))?;

    let raw_severity = object
        .get("severity")
        .and_then(Value::as_str)
        .unwrap_or("");
    let severity = Severity::parse(raw_severity)
        .ok_or_else(|| format!("{}: unrecognized severity '{}'", title, raw_severity))?;

    let category = object
        .get("category")
        .and_then(Value::as_str)
        .and_then(VulnCategory::parse)
        .unwrap_or(VulnCategory::NotApplicable);

    let raw_confidence = object.get("confidence").and_then(Value::as_f64);

    Ok(CandidateVulnerability {
        title: title.to_string(),
        description: description.to_string(),
        severity,
        category,
        raw_confidence,
    })
}

/// A candidate whose category fell back to not-applicable gets a warning,
/// but is still kept.
fn category_warning(element: &Value, candidate: &CandidateVulnerability) -> Option<String> {
    let raw = element.get("category").and_then(Value::as_str);
    match raw {
        Some(value) if VulnCategory::parse(value).is_some() => None,
        Some(value) => Some(format!(
            "{}: unrecognized category '{}', defaulting to not_applicable",
            candidate.title, value
        )),
        None => Some(format!(
            "{}: missing category, defaulting to not_applicable",
            candidate.title
        )),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
