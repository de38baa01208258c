use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::aggregator::WindowConfig;
use crate::deload::DeloadConfig;
use crate::monotony::{MonotonyConfig, StrainConfig};
use crate::overtraining::OvertrainingConfig;
use crate::periodization::PeriodizationConfig;
use crate::readiness::ReadinessConfig;
use crate::workload::WorkloadConfig;

/// Every tunable threshold used by the engine, grouped by component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Acute and chronic window lengths
    pub windows: WindowConfig,

    /// Workload ratio sentinel and deload trigger band
    pub workload: WorkloadConfig,

    /// Monotony sample size and risk tiers
    pub monotony: MonotonyConfig,

    /// Strain risk tiers
    pub strain: StrainConfig,

    /// Readiness penalties, tiers and overrides
    pub readiness: ReadinessConfig,

    /// Overtraining checks and tiers
    pub overtraining: OvertrainingConfig,

    /// Deload severity bands
    pub deload: DeloadConfig,

    /// Taper countdown thresholds
    pub periodization: PeriodizationConfig,
}

impl EngineConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: EngineConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".loadrs")
            .join("config.toml")
    }

    /// Load configuration with fallback to defaults
    pub fn load_or_default() -> Self {
        let config_path = Self::default_config_path();

        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!(
                    path = %config_path.display(),
                    error = %e,
                    "config file not loaded, using defaults"
                );
                Self::default()
            }
        }
    }

    /// Check ordering invariants between thresholds.
    ///
    /// Returns one message per problem; an empty list means the config is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.windows.acute_window_days == 0 || self.windows.chronic_window_days == 0 {
            problems.push("window lengths must be at least one day".to_string());
        }
        if self.windows.acute_window_days >= self.windows.chronic_window_days {
            problems.push("acute window must be shorter than chronic window".to_string());
        }
        if self.workload.deload_lower_bound >= self.workload.deload_upper_bound {
            problems.push("workload deload_lower_bound must be below deload_upper_bound".to_string());
        }
        if self.workload.caution_threshold > self.workload.deload_upper_bound {
            problems.push("workload caution_threshold must not exceed deload_upper_bound".to_string());
        }
        if self.monotony.sample_size < 2 {
            problems.push("monotony sample_size must be at least 2".to_string());
        }
        if self.monotony.moderate_threshold >= self.monotony.high_threshold {
            problems.push("monotony moderate_threshold must be below high_threshold".to_string());
        }
        if !(self.strain.moderate_threshold < self.strain.high_threshold
            && self.strain.high_threshold < self.strain.critical_threshold)
        {
            problems.push("strain thresholds must be strictly increasing".to_string());
        }

        let r = &self.readiness;
        if !(r.acwr_low.threshold < r.acwr_elevated.threshold
            && r.acwr_elevated.threshold < r.acwr_spike.threshold)
        {
            problems.push("readiness ACWR bands must be strictly increasing".to_string());
        }
        if !(r.light_score < r.moderate_score && r.moderate_score < r.heavy_score)
            || r.heavy_score > 100
        {
            problems.push("readiness tier scores must increase and stay within 0-100".to_string());
        }
        if r.detraining_acwr >= r.critical_acwr {
            problems.push("readiness detraining_acwr must be below critical_acwr".to_string());
        }

        let o = &self.overtraining;
        if o.performance_block == 0 {
            problems.push("overtraining performance_block must be at least 1".to_string());
        }
        if o.moderate_score > o.high_score {
            problems.push("overtraining moderate_score must not exceed high_score".to_string());
        }

        let d = &self.deload;
        for (name, value) in [
            ("severe volume_reduction", d.severe.volume_reduction),
            ("severe intensity_reduction", d.severe.intensity_reduction),
            ("moderate volume_reduction", d.moderate.volume_reduction),
            ("moderate intensity_reduction", d.moderate.intensity_reduction),
            ("default volume_reduction", d.default_volume_reduction),
            ("default intensity_reduction", d.default_intensity_reduction),
        ] {
            if !(value > 0.0 && value < 1.0) {
                problems.push(format!("deload {} must be between 0 and 1", name));
            }
        }

        let p = &self.periodization;
        if !(p.tapering_weeks < p.peaking_weeks && p.peaking_weeks < p.building_weeks) {
            problems.push("periodization week thresholds must be strictly increasing".to_string());
        }

        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_serialization() {
        let config = EngineConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: EngineConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let toml_str = r#"
            [strain]
            moderate_threshold = 4000.0
            high_threshold = 8000.0
            critical_threshold = 12000.0
        "#;
        let config: EngineConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.strain.critical_threshold, 12000.0);
        assert_eq!(config.windows.chronic_window_days, 28);
        assert_eq!(config.readiness.critical_acwr, 1.8);
    }

    #[test]
    fn test_config_file_io() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut original_config = EngineConfig::default();
        original_config.monotony.sample_size = 10;

        original_config.save_to_file(&config_path).unwrap();
        let loaded_config = EngineConfig::load_from_file(&config_path).unwrap();

        assert_eq!(loaded_config.monotony.sample_size, 10);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let result = EngineConfig::load_from_file(temp_dir.path().join("absent.toml"));

        assert!(result.is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_empty());
    }

    #[test]
    fn test_validation_reports_inverted_thresholds() {
        let mut config = EngineConfig::default();
        config.windows.acute_window_days = 30;
        config.strain.high_threshold = 20000.0;
        config.deload.severe.volume_reduction = 1.2;

        let problems = config.validate();
        assert_eq!(problems.len(), 3);
        assert!(problems.iter().any(|p| p.contains("acute window")));
        assert!(problems.iter().any(|p| p.contains("strain")));
        assert!(problems.iter().any(|p| p.contains("severe volume_reduction")));
    }
}
