pub mod parser;
pub mod types;

pub use parser::load;
pub use types::{ExtractionConfig, GeminiConfig, VulnexConfig};
