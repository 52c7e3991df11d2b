use serde::{Deserialize, Serialize};

/// An uploaded audit report. The extraction pipeline only reads the markdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub title: String,
    pub markdown: String,
    pub created_at: String,
}

impl Report {
    /// Byte length of the markdown content, checked against the size ceiling.
    pub fn content_bytes(&self) -> usize {
        self.markdown.len()
    }
}
