//! Runtime configuration, read from a TOML file. Every field has a default.

use crate::error::{Result, TutorError};
use crate::placement::DEFAULT_TOPICS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorConfig {
    /// JSON file holding review progress.
    pub data_path: PathBuf,
    pub log_level: String,
    /// Topic catalog for follow-up questions, in preference order.
    pub topics: Vec<String>,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("progress.json"),
            log_level: "info".to_string(),
            topics: DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl TutorConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: TutorConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "loading config");
        Self::from_toml_str(&contents)
    }

    /// Loads `path` when given, otherwise returns defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.topics.iter().any(|t| t.trim().is_empty()) {
            return Err(TutorError::Config("topics must not be blank".to_string()));
        }
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = self.topics.iter().find(|t| !seen.insert(t.as_str())) {
            return Err(TutorError::Config(format!("duplicate topic '{}'", dup)));
        }
        Ok(())
    }
}
