use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Result, SageError};

/// Order in which vision records are emitted once inference times are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceOrdering {
    /// Records come back sorted by timestamp.
    #[default]
    SortedByTimestamp,
    /// Records keep their input position with the derived field attached.
    InputOrder,
}

/// How per-model efficiency is aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupEfficiencyFormula {
    /// Mean confidence divided by mean cost.
    #[default]
    RatioOfAverages,
    /// Mean of the per-record confidence/cost ratios.
    AverageOfRatios,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizerConfig {
    #[serde(default)]
    pub inference_ordering: InferenceOrdering,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub bootstrap_iterations: usize,
    pub min_bootstrap_samples: usize,
    pub bootstrap_seed: Option<u64>,
    #[serde(default)]
    pub efficiency_formula: GroupEfficiencyFormula,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            bootstrap_iterations: 100,
            min_bootstrap_samples: 10,
            bootstrap_seed: None,
            efficiency_formula: GroupEfficiencyFormula::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpsConfig {
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SageConfig {
    #[serde(default)]
    pub normalizer: NormalizerConfig,
    pub analysis: AnalysisConfig,
    pub store: StoreConfig,
    pub ops: OpsConfig,
}

impl Default for SageConfig {
    fn default() -> Self {
        Self {
            normalizer: NormalizerConfig::default(),
            analysis: AnalysisConfig::default(),
            store: StoreConfig {
                path: "data/dashboard.json".into(),
            },
            ops: OpsConfig {
                log_level: "info".into(),
            },
        }
    }
}

impl SageConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref).map_err(|err| {
            SageError::Configuration(format!(
                "unable to read config file {}: {err}",
                path_ref.display()
            ))
        })?;
        toml::from_str(&contents).map_err(|err| {
            SageError::Configuration(format!(
                "failed to parse config file {}: {err}",
                path_ref.display()
            ))
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.analysis.bootstrap_iterations == 0 {
            return Err(SageError::Configuration(
                "analysis.bootstrap_iterations must be greater than zero".into(),
            ));
        }
        if self.analysis.min_bootstrap_samples < 2 {
            return Err(SageError::Configuration(
                "analysis.min_bootstrap_samples must be at least 2".into(),
            ));
        }
        if self.store.path.trim().is_empty() {
            return Err(SageError::Configuration(
                "store.path must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn load_sage_config_from_file() {
        let temp_path = std::env::temp_dir().join("sage-config-test.toml");
        let config = SageConfig {
            normalizer: NormalizerConfig {
                inference_ordering: InferenceOrdering::InputOrder,
            },
            analysis: AnalysisConfig {
                bootstrap_iterations: 250,
                min_bootstrap_samples: 12,
                bootstrap_seed: Some(7),
                efficiency_formula: GroupEfficiencyFormula::AverageOfRatios,
            },
            store: StoreConfig {
                path: "telemetry/dataset.json".into(),
            },
            ops: OpsConfig {
                log_level: "debug".into(),
            },
        };

        let doc = toml::to_string(&config).expect("serialize config");
        fs::write(&temp_path, doc).expect("write temp config");

        let loaded = SageConfig::from_file(&temp_path).expect("load config");
        assert_eq!(
            loaded.normalizer.inference_ordering,
            InferenceOrdering::InputOrder
        );
        assert_eq!(loaded.analysis.bootstrap_iterations, 250);
        assert_eq!(loaded.analysis.bootstrap_seed, Some(7));
        assert_eq!(
            loaded.analysis.efficiency_formula,
            GroupEfficiencyFormula::AverageOfRatios
        );
        fs::remove_file(&temp_path).expect("cleanup temp config");
    }

    #[test]
    fn sections_fall_back_to_defaults() {
        let doc = r#"
            [analysis]
            bootstrap_iterations = 100
            min_bootstrap_samples = 10

            [store]
            path = "data.json"

            [ops]
            log_level = "info"
        "#;
        let config: SageConfig = toml::from_str(doc).expect("parse config");
        assert_eq!(
            config.normalizer.inference_ordering,
            InferenceOrdering::SortedByTimestamp
        );
        assert_eq!(
            config.analysis.efficiency_formula,
            GroupEfficiencyFormula::RatioOfAverages
        );
        assert!(config.analysis.bootstrap_seed.is_none());
    }

    #[test]
    fn validate_configuration_rules() {
        let mut config = SageConfig::default();
        assert!(config.validate().is_ok());
        config.analysis.bootstrap_iterations = 0;
        assert!(config.validate().is_err());
        config.analysis.bootstrap_iterations = 100;
        config.analysis.min_bootstrap_samples = 1;
        assert!(config.validate().is_err());
        config.analysis.min_bootstrap_samples = 10;
        config.store.path = "  ".into();
        assert!(config.validate().is_err());
        config.store.path = "data.json".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_file_is_configuration_error() {
        let err = SageConfig::from_file("/nonexistent/sage.toml").unwrap_err();
        assert!(matches!(err, SageError::Configuration(_)));
    }
}
