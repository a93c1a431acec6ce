//! Analysis configuration
//!
//! Settings can come from a TOML file (`--config`) and are overridden by
//! command-line flags. Every field has a default so an empty file is valid.
//!
//! ```toml
//! alpha = 0.01
//! method = "chisq"
//! precision = 4
//! scheme_attribute = "Key_Scheme"
//! accuracy_attribute = "Percent_correct"
//! dataset_attribute = "Key_Dataset"
//! ```

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// How pairwise rank differences are turned into corrected p-values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PosthocMethod {
    /// Studentized range distribution (infinite degrees of freedom)
    #[default]
    Tukey,
    /// Chi-squared distribution with k - 1 degrees of freedom
    Chisq,
}

/// Configuration for one analysis run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Significance level for the reject decision (p <= alpha rejects)
    pub alpha: f64,

    /// Post-hoc p-value correction
    pub method: PosthocMethod,

    /// Decimal places for p-values, both on the console and in the export
    pub precision: usize,

    /// Attribute holding the classifier identity
    pub scheme_attribute: String,

    /// Attribute holding the accuracy score
    pub accuracy_attribute: String,

    /// Attribute whose nominal literal the comma repair rewrites
    pub dataset_attribute: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            method: PosthocMethod::Tukey,
            precision: 3,
            scheme_attribute: "Key_Scheme".to_string(),
            accuracy_attribute: "Percent_correct".to_string(),
            dataset_attribute: "Key_Dataset".to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.as_ref().display()))?;
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(format!("alpha must be in (0, 1), got {}", self.alpha));
        }

        if self.precision > 12 {
            return Err(format!(
                "precision must be at most 12 decimal places, got {}",
                self.precision
            ));
        }

        for (field, value) in [
            ("scheme_attribute", &self.scheme_attribute),
            ("accuracy_attribute", &self.accuracy_attribute),
            ("dataset_attribute", &self.dataset_attribute),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{} must not be empty", field));
            }
        }

        Ok(())
    }
}
