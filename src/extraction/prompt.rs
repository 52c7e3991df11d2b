use crate::models::{Severity, VulnCategory};

/// Build the extraction prompt for one report. Pure and deterministic:
/// identical inputs produce a byte-identical prompt.
pub fn build_extraction_prompt(
    markdown: &str,
    severities: &[Severity],
    categories: &[VulnCategory],
) -> String {
    let severity_values = severities
        .iter()
        .map(|s| format!("\"{}\"", s.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    let category_values = categories
        .iter()
        .map(|c| format!("\"{}\"", c.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Analyze the following security audit report and extract every distinct \
         vulnerability finding it describes.\n\
         \n\
         Respond with ONLY a JSON array. Each element must be an object with \
         exactly these fields:\n\
         - \"title\": short name of the finding\n\
         - \"description\": what the finding is and why it matters\n\
         - \"severity\": one of [{severity_values}]\n\
         - \"category\": remediation status, one of [{category_values}]\n\
         An optional \"confidence\" field (0.0 to 1.0) may indicate how certain \
         you are the finding is real.\n\
         \n\
         Rules:\n\
         - Report only findings stated in the document. Do not invent findings.\n\
         - One element per distinct finding. Do not repeat the same finding.\n\
         - If the report describes no vulnerabilities, respond with [].\n\
         \n\
         Report content:\n\
         ---\n\
         {markdown}\n\
         ---\n"
    )
}
