use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use validator::Validate;

use crate::domain::entities::run_config::RunConfig;
use crate::domain::value_objects::exclusion_set::ExclusionSet;

/// File name looked up in the discovery root when no config path is given
pub const DEFAULT_CONFIG_FILE: &str = ".sgit.yml";

/// Configuration store related errors
#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error("Configuration file not found at path: {0}")]
    ConfigFileNotFound(String),

    #[error("Configuration file read failed: {0}")]
    ReadFailed(String),

    #[error("YAML parsing failed: {0}")]
    YamlParsingFailed(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Defaults file contents.
///
/// Every field is optional; flags given on the command line override them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SgitConfigFile {
    /// Extra exclusion substrings, merged with `--exclude`
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Worker pool size for parallel runs
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 64))]
    pub jobs: Option<usize>,

    /// Remote used by `switch --track`
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255))]
    pub remote: Option<String>,

    /// Per-invocation timeout for git commands
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 86400))]
    pub timeout_seconds: Option<u64>,

    /// Whether `clean` removes `target/`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean_target_dir: Option<bool>,
}

impl SgitConfigFile {
    /// Layer these defaults under an existing run configuration
    pub fn apply_to(&self, mut config: RunConfig) -> RunConfig {
        let mut exclusions = ExclusionSet::from_patterns(&self.exclude);
        exclusions.extend(&config.exclusions);
        config.exclusions = exclusions;

        if let Some(jobs) = self.jobs {
            config = config.with_workers(jobs);
        }
        if let Some(remote) = &self.remote {
            config = config.with_remote(remote.clone());
        }
        if self.timeout_seconds.is_some() {
            config = config.with_timeout(self.timeout_seconds);
        }
        if let Some(clean_target_dir) = self.clean_target_dir {
            config = config.with_clean_target_dir(clean_target_dir);
        }
        config
    }
}

/// Loads the optional YAML defaults file
#[derive(Debug, Default)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Read and validate a configuration file
    pub fn read_config<P: AsRef<Path>>(
        &self,
        config_path: P,
    ) -> Result<SgitConfigFile, ConfigStoreError> {
        let config_path = config_path.as_ref();

        if !config_path.exists() {
            return Err(ConfigStoreError::ConfigFileNotFound(
                config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(config_path)
            .map_err(|e| ConfigStoreError::ReadFailed(e.to_string()))?;

        let config: SgitConfigFile = if contents.trim().is_empty() {
            SgitConfigFile::default()
        } else {
            serde_yaml::from_str(&contents)
                .map_err(|e| ConfigStoreError::YamlParsingFailed(e.to_string()))?
        };

        self.validate_config(&config)?;
        debug!(path = %config_path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Locate the defaults file: an explicit path must exist, otherwise
    /// `<root>/.sgit.yml` is used when present.
    pub fn load(
        &self,
        explicit: Option<&Path>,
        root: &Path,
    ) -> Result<Option<SgitConfigFile>, ConfigStoreError> {
        if let Some(path) = explicit {
            return self.read_config(path).map(Some);
        }

        let candidate: PathBuf = root.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            self.read_config(&candidate).map(Some)
        } else {
            Ok(None)
        }
    }

    fn validate_config(&self, config: &SgitConfigFile) -> Result<(), ConfigStoreError> {
        config
            .validate()
            .map_err(|e| ConfigStoreError::ValidationFailed(e.to_string()))?;

        if config.exclude.iter().any(|pattern| pattern.trim().is_empty()) {
            return Err(ConfigStoreError::ValidationFailed(
                "exclude entries must not be blank".to_string(),
            ));
        }

        Ok(())
    }
}
