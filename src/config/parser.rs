use std::path::Path;

use tracing::debug;

use super::types::VulnexConfig;
use crate::errors::VulnexError;

const MAX_CONFIG_BYTES: u64 = 1_048_576;

/// Load configuration from an optional YAML file, then apply environment
/// overrides. A missing path argument yields the built-in defaults; a path
/// that points nowhere is an error.
pub fn load(path: Option<&Path>) -> Result<VulnexConfig, VulnexError> {
    let mut config = match path {
        Some(path) => parse_file(path)?,
        None => VulnexConfig::default(),
    };
    apply_env_overrides(&mut config);
    Ok(config)
}

fn parse_file(path: &Path) -> Result<VulnexConfig, VulnexError> {
    if !path.exists() {
        return Err(VulnexError::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let metadata = std::fs::metadata(path)?;
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(VulnexError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: VulnexConfig = serde_yaml::from_str(&content)?;
    debug!(path = %path.display(), "Config loaded");
    Ok(config)
}

fn apply_env_overrides(config: &mut VulnexConfig) {
    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        if !key.trim().is_empty() {
            config.gemini.api_key = Some(key);
        }
    }
    if let Ok(model) = std::env::var("VULNEX_MODEL") {
        if !model.trim().is_empty() {
            config.gemini.model = Some(model);
        }
    }
}
