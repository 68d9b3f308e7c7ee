// ⚙️ Configuration
// Defaults -> optional TOML file -> environment overrides -> validation

use crate::error::{AuditError, Result};
use crate::metrics::DEFAULT_FAIRNESS_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Raw UCI Adult training split
pub const DEFAULT_DATASET_URL: &str =
    "https://archive.ics.uci.edu/ml/machine-learning-databases/adult/adult.data";

/// Columns offered in the dropdown, if the dataset has them
pub const DEFAULT_CANDIDATE_COLUMNS: [&str; 4] = ["gender", "race", "relationship", "workclass"];

pub const ENV_DATA_PATH: &str = "FAIRNESS_DATA_PATH";
pub const ENV_BIND: &str = "FAIRNESS_BIND";

// ============================================================================
// MODEL HYPERPARAMETERS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Inverse regularization strength
    pub c: f64,
    pub learning_rate: f64,
    pub max_iter: usize,
    /// Stop once every gradient component is below this
    pub tolerance: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            c: 1.0,
            learning_rate: 0.5,
            max_iter: 300,
            tolerance: 1e-4,
        }
    }
}

// ============================================================================
// AUDIT CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Cleaned CSV produced by `prepare`
    pub data_path: PathBuf,
    pub target_column: String,
    pub candidate_columns: Vec<String>,
    pub test_size: f64,
    pub random_state: u64,
    pub fairness_threshold: f64,
    pub model: ModelConfig,
    pub bind_addr: String,
    pub dataset_url: String,
    pub download_timeout_secs: u64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        AuditConfig {
            data_path: PathBuf::from("data/adult.csv"),
            target_column: "income".to_string(),
            candidate_columns: DEFAULT_CANDIDATE_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect(),
            test_size: 0.2,
            random_state: 42,
            fairness_threshold: DEFAULT_FAIRNESS_THRESHOLD,
            model: ModelConfig::default(),
            bind_addr: "127.0.0.1:5000".to_string(),
            dataset_url: DEFAULT_DATASET_URL.to_string(),
            download_timeout_secs: 30,
        }
    }
}

impl AuditConfig {
    /// Build the effective config: file (if any), then env, then validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AuditError::Config(e.to_string()))
    }

    /// `lookup` is injected so tests don't touch the process environment
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DATA_PATH).filter(|v| !v.is_empty()) {
            self.data_path = PathBuf::from(path);
        }
        if let Some(bind) = lookup(ENV_BIND).filter(|v| !v.is_empty()) {
            self.bind_addr = bind;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(AuditError::Config(format!(
                "test_size must be between 0 and 1, got {}",
                self.test_size
            )));
        }
        if !(self.fairness_threshold > 0.0) {
            return Err(AuditError::Config(format!(
                "fairness_threshold must be positive, got {}",
                self.fairness_threshold
            )));
        }
        if self.target_column.is_empty() {
            return Err(AuditError::Config("target_column is empty".to_string()));
        }
        if self.candidate_columns.iter().any(|c| c == &self.target_column) {
            return Err(AuditError::Config(format!(
                "target column '{}' cannot be audited",
                self.target_column
            )));
        }
        if !(self.model.c > 0.0) || !(self.model.learning_rate > 0.0) {
            return Err(AuditError::Config(
                "model.c and model.learning_rate must be positive".to_string(),
            ));
        }
        if self.model.max_iter == 0 {
            return Err(AuditError::Config("model.max_iter must be at least 1".to_string()));
        }
        Ok(())
    }
}
