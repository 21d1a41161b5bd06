//! Pipeline configuration (YAML)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// External program used to recover table bodies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Documents processed at the same time by the batch runner
    pub max_concurrent_documents: usize,
    /// Upper bound on one table fallback call
    pub fallback_timeout_secs: u64,
    /// Ask the fallback for tables whose body is empty
    pub reconstruct_tables: bool,
    /// Emit records from table cells
    pub extract_table_records: bool,
    /// Material for sentences that name none (overrides the inferred one)
    pub default_material: Option<String>,
    pub fallback: Option<FallbackCommand>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_documents: 4,
            fallback_timeout_secs: 30,
            reconstruct_tables: true,
            extract_table_records: true,
            default_material: None,
            fallback: None,
        }
    }
}

impl PipelineConfig {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// `<user config dir>/ironclad/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("ironclad").join("config.yaml"))
    }

    /// Explicit path, else the user config file if present, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_documents == 0 {
            return Err(ConfigError::Invalid(
                "max_concurrent_documents must be at least 1".into(),
            ));
        }
        if self.fallback_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "fallback_timeout_secs must be at least 1".into(),
            ));
        }
        if let Some(fallback) = &self.fallback {
            if fallback.program.trim().is_empty() {
                return Err(ConfigError::Invalid("fallback.program is empty".into()));
            }
        }
        Ok(())
    }

    pub fn fallback_timeout(&self) -> Duration {
        Duration::from_secs(self.fallback_timeout_secs)
    }

    pub fn with_max_concurrent_documents(mut self, limit: usize) -> Self {
        self.max_concurrent_documents = limit;
        self
    }

    pub fn with_default_material(mut self, material: impl Into<String>) -> Self {
        self.default_material = Some(material.into());
        self
    }

    pub fn with_fallback_timeout(mut self, secs: u64) -> Self {
        self.fallback_timeout_secs = secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_concurrent_documents, 4);
        assert_eq!(config.fallback_timeout(), Duration::from_secs(30));
        assert!(config.reconstruct_tables);
        assert!(config.extract_table_records);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = PipelineConfig::from_yaml(
            "max_concurrent_documents: 2\nfallback:\n  program: ocr-tables\n  args: [--json]\n",
        )
        .unwrap();
        assert_eq!(config.max_concurrent_documents, 2);
        assert_eq!(config.fallback_timeout_secs, 30);
        let fallback = config.fallback.unwrap();
        assert_eq!(fallback.program, "ocr-tables");
        assert_eq!(fallback.args, vec!["--json"]);
    }

    #[test]
    fn zero_concurrency_is_invalid() {
        let err = PipelineConfig::from_yaml("max_concurrent_documents: 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unknown_type_is_yaml_error() {
        let err = PipelineConfig::from_yaml("reconstruct_tables: maybe").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "default_material: PEO\n").unwrap();
        let config = PipelineConfig::discover(Some(&path)).unwrap();
        assert_eq!(config.default_material.as_deref(), Some("PEO"));
        assert!(matches!(
            PipelineConfig::load(&dir.path().join("missing.yaml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
