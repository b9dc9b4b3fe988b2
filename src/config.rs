//! Configuration loader and validator for the categorization service.
use crate::categorize::{default_rules, Categorizer, CategoryRule, DEFAULT_CATEGORY};
use crate::nlp::TextNormalizer;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub app: App,
    #[serde(default)]
    pub storage: Storage,
    pub queue: Queue,
    #[serde(default)]
    pub categories: Categories,
}

/// App-level settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct App {
    pub data_dir: String,
}

/// Article storage. The job queue lives in the same database.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Storage {
    /// Empty means `sqlite://<data_dir>/newsdesk.db`.
    #[serde(default)]
    pub database_url: String,
}

/// Categorization worker pool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Queue {
    pub workers: usize,
    pub poll_interval_ms: u64,
}

/// Category rules, evaluated in order; the first match wins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Categories {
    #[serde(default = "default_label")]
    pub default_label: String,
    #[serde(default = "default_rules")]
    pub rules: Vec<CategoryRule>,
}

fn default_label() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Default for Categories {
    fn default() -> Self {
        Self {
            default_label: default_label(),
            rules: default_rules(),
        }
    }
}

impl Categories {
    /// Build the categorizer for these rules over English text.
    pub fn categorizer(&self) -> Categorizer {
        Categorizer::new(
            Arc::new(TextNormalizer::english()),
            self.rules.clone(),
            self.default_label.clone(),
        )
    }
}

impl App {
    /// Expand a leading `~/` using `HOME`.
    pub fn resolved_data_dir(&self) -> String {
        match (self.data_dir.strip_prefix("~/"), std::env::var("HOME")) {
            (Some(rest), Ok(home)) => format!("{}/{}", home.trim_end_matches('/'), rest),
            _ => self.data_dir.clone(),
        }
    }
}

impl Config {
    /// Ensure required directories exist (creates `app.data_dir` if missing).
    pub fn ensure_dirs(&self) -> Result<(), std::io::Error> {
        if self.app.data_dir.trim().is_empty() {
            return Ok(());
        }
        fs::create_dir_all(self.app.resolved_data_dir())
    }

    pub fn database_url(&self) -> String {
        if self.storage.database_url.trim().is_empty() {
            format!("sqlite://{}/newsdesk.db", self.app.resolved_data_dir())
        } else {
            self.storage.database_url.clone()
        }
    }
}

/// Load configuration from a YAML file and validate it.
/// - If `path` is None, uses `config.yaml` in the current working directory.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.app.data_dir.trim().is_empty() {
        return Err(ConfigError::Invalid("app.data_dir must be non-empty"));
    }
    if cfg.queue.workers == 0 {
        return Err(ConfigError::Invalid("queue.workers must be > 0"));
    }
    if cfg.queue.poll_interval_ms == 0 {
        return Err(ConfigError::Invalid("queue.poll_interval_ms must be > 0"));
    }

    if cfg.categories.default_label.trim().is_empty() {
        return Err(ConfigError::Invalid("categories.default_label must be non-empty"));
    }
    for rule in &cfg.categories.rules {
        if rule.label.trim().is_empty() {
            return Err(ConfigError::Invalid("categories.rules[].label must be non-empty"));
        }
        if rule.triggers.is_empty() {
            return Err(ConfigError::Invalid("categories.rules[].triggers must not be empty"));
        }
        if rule.triggers.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::Invalid("categories.rules[].triggers must be non-blank"));
        }
    }

    Ok(())
}

/// Example configuration, also used as the test fixture.
pub fn example() -> &'static str {
    r#"app:
  data_dir: "./data"

storage:
  database_url: ""

queue:
  workers: 4
  poll_interval_ms: 500

categories:
  default_label: "Others"
  rules:
    - label: "Terrorism/Protest/Political Unrest/Riot"
      triggers: ["terrorism", "protest", "political unrest", "riot"]
    - label: "Positive/Uplifting"
      triggers: ["positive", "uplifting", "inspiring"]
    - label: "Natural Disasters"
      triggers: ["natural disaster", "earthquake", "flood", "hurricane"]
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_example_ok() {
        let cfg: Config = serde_yaml::from_str(example()).unwrap();
        validate(&cfg).unwrap();
        assert_eq!(cfg.categories, Categories::default());
    }

    #[test]
    fn categories_and_storage_are_optional() {
        let cfg: Config = serde_yaml::from_str(
            "app:\n  data_dir: \"/var/lib/newsdesk\"\nqueue:\n  workers: 1\n  poll_interval_ms: 100\n",
        )
        .unwrap();
        validate(&cfg).unwrap();
        assert_eq!(cfg.categories.default_label, "Others");
        assert_eq!(cfg.categories.rules.len(), 3);
        assert_eq!(cfg.database_url(), "sqlite:///var/lib/newsdesk/newsdesk.db");
    }

    #[test]
    fn explicit_database_url_wins() {
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.storage.database_url = "sqlite::memory:".into();
        assert_eq!(cfg.database_url(), "sqlite::memory:");
    }

    #[test]
    fn invalid_queue() {
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.queue.workers = 0;
        let err = validate(&cfg).unwrap_err();
        match err {
            ConfigError::Invalid(msg) => assert!(msg.contains("queue.workers")),
            _ => panic!("wrong error"),
        }

        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.queue.poll_interval_ms = 0;
        let err = validate(&cfg).unwrap_err();
        match err {
            ConfigError::Invalid(msg) => assert!(msg.contains("poll_interval_ms")),
            _ => panic!("wrong error"),
        }
    }

    #[test]
    fn invalid_rules() {
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.categories.rules[0].label = " ".into();
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));

        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.categories.rules[1].triggers.clear();
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));

        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.categories.rules[2].triggers.push("".into());
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));

        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.categories.default_label = "".into();
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn ensure_dirs_creates_data_dir() {
        let td = tempdir().unwrap();
        let data_path = td.path().join("data");
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.app.data_dir = data_path.to_string_lossy().to_string();
        cfg.ensure_dirs().unwrap();
        assert!(data_path.exists());
    }

    #[test]
    fn load_from_file_ok() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.yaml");
        fs::write(&p, example()).unwrap();
        let cfg = load(Some(&p)).unwrap();
        assert_eq!(cfg.queue.workers, 4);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let td = tempdir().unwrap();
        let err = load(Some(&td.path().join("absent.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
