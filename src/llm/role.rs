/// Persona selecting the system instructions sent with a provider call.
/// The wire mechanics are identical for every role; only the instruction
/// text differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentRole {
    Parser,
    Extractor,
    Classifier,
    Validator,
}

impl AgentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Parser => "parser",
            AgentRole::Extractor => "extractor",
            AgentRole::Classifier => "classifier",
            AgentRole::Validator => "validator",
        }
    }

    pub fn system_instructions(&self) -> &'static str {
        match self {
            AgentRole::Parser => {
                "You are a document parsing assistant. You convert audit report \
                 content into clean structured text without altering its meaning."
            }
            AgentRole::Extractor => {
                "You are a security analyst extracting vulnerability findings from \
                 an audit report. You only report findings that are present in the \
                 document. You never invent findings, and you respond with JSON only."
            }
            AgentRole::Classifier => {
                "You are a security triage assistant. You classify vulnerability \
                 findings by severity and remediation status, strictly following \
                 the provided taxonomy."
            }
            AgentRole::Validator => {
                "You are a quality reviewer for extracted vulnerability findings. \
                 You check findings against the source document and flag anything \
                 unsupported."
            }
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
