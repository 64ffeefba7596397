use schemapad_editor::{CompletionOptions, DEFAULT_MAX_ITEMS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "schemapad.config.json";

/// Schemapad configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Cap on presented completion candidates
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    /// Severity threshold for a non-zero exit code
    #[serde(default)]
    pub fail_on: FailOn,
}

fn default_max_suggestions() -> usize {
    DEFAULT_MAX_ITEMS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailOn {
    #[default]
    Error,
    Warning,
}

impl Config {
    /// Load config from a directory, falling back to defaults when no
    /// config file exists
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn completion_options(&self) -> CompletionOptions {
        CompletionOptions {
            max_items: self.max_suggestions,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_suggestions: default_max_suggestions(),
            fail_on: FailOn::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "maxSuggestions": 10,
            "failOn": "warning"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.max_suggestions, 10);
        assert_eq!(config.fail_on, FailOn::Warning);
        assert_eq!(config.completion_options().max_items, 10);
    }

    #[test]
    fn test_defaults_apply_per_field() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.max_suggestions, DEFAULT_MAX_ITEMS);
        assert_eq!(config.fail_on, FailOn::Error);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(config.max_suggestions, DEFAULT_MAX_ITEMS);
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{"failOn": "warning"}"#,
        )
        .unwrap();

        let config = Config::load(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(config.fail_on, FailOn::Warning);
    }
}
