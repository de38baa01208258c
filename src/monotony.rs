//! Training monotony and strain
//!
//! Monotony (Foster, 1998) measures how uniform recent training loads are:
//!
//! ```text
//! monotony = mean(load) / stddev(load)
//! strain   = monotony × weekly load
//! ```
//!
//! High monotony means every session looks the same, which correlates with
//! illness and overreaching when combined with a high weekly load (strain).
//!
//! The analyzer looks at the volumes of the trailing sessions in input order.
//! It does not sort by date.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::{debug, warn};

use crate::aggregator::SessionAggregator;
use crate::models::{RiskLevel, WorkoutSession};

/// Monotony thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonotonyConfig {
    /// Number of trailing sessions analyzed; fewer sessions yields no result
    pub sample_size: usize,

    /// Value reported when every sampled load is identical
    pub uniform_load_cap: f64,

    /// Monotony at or above this is moderate risk
    pub moderate_threshold: f64,

    /// Monotony at or above this is high risk
    pub high_threshold: f64,
}

impl Default for MonotonyConfig {
    fn default() -> Self {
        MonotonyConfig {
            sample_size: 7,
            uniform_load_cap: 10.0,
            moderate_threshold: 1.5,
            high_threshold: 2.0,
        }
    }
}

/// Strain thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrainConfig {
    pub moderate_threshold: f64,
    pub high_threshold: f64,
    pub critical_threshold: f64,
}

impl Default for StrainConfig {
    fn default() -> Self {
        StrainConfig {
            moderate_threshold: 5000.0,
            high_threshold: 10000.0,
            critical_threshold: 15000.0,
        }
    }
}

/// Result of a monotony calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonotonyAnalysis {
    pub monotony: f64,
    pub risk: RiskLevel,
    pub recommendation: String,

    /// False when the history was too short and `monotony` is a placeholder
    pub sufficient_data: bool,
}

/// Result of a strain calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrainAnalysis {
    pub strain: f64,
    pub risk: RiskLevel,
    pub recommendation: String,
}

/// Monotony and strain analyzer
#[derive(Debug, Clone, Default)]
pub struct MonotonyAnalyzer {
    monotony: MonotonyConfig,
    strain: StrainConfig,
}

impl MonotonyAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(monotony: MonotonyConfig, strain: StrainConfig) -> Self {
        MonotonyAnalyzer { monotony, strain }
    }

    /// Calculate monotony over the trailing sessions
    pub fn calculate_monotony(&self, sessions: &[WorkoutSession]) -> MonotonyAnalysis {
        let sample_size = self.monotony.sample_size;

        if sample_size == 0 || sessions.len() < sample_size {
            debug!(
                sessions = sessions.len(),
                required = sample_size,
                "not enough sessions for monotony"
            );
            return MonotonyAnalysis {
                monotony: 0.0,
                risk: RiskLevel::Low,
                recommendation: format!(
                    "Not enough data to calculate monotony (need at least {} sessions)",
                    sample_size
                ),
                sufficient_data: false,
            };
        }

        let volumes: Vec<f64> = SessionAggregator::last_n_sessions(sessions, sample_size)
            .iter()
            .map(|s| s.volume)
            .collect();

        let mean = volumes.iter().mean();
        let std_dev = volumes.iter().population_std_dev();
        let uniform = volumes.windows(2).all(|pair| pair[0] == pair[1]);

        let monotony = if uniform || std_dev == 0.0 {
            warn!(
                cap = self.monotony.uniform_load_cap,
                "identical loads across sample, capping monotony"
            );
            self.monotony.uniform_load_cap
        } else {
            mean / std_dev
        };

        let (risk, recommendation) = if monotony < self.monotony.moderate_threshold {
            (
                RiskLevel::Low,
                "Good training variation - keep mixing heavy, moderate and light days",
            )
        } else if monotony < self.monotony.high_threshold {
            (
                RiskLevel::Moderate,
                "Training is becoming repetitive - add more variation in volume and intensity",
            )
        } else {
            (
                RiskLevel::High,
                "High monotony - vary daily training loads and schedule easier days to reduce overtraining risk",
            )
        };

        debug!(mean, std_dev, monotony, risk = %risk, "calculated monotony");

        MonotonyAnalysis {
            monotony,
            risk,
            recommendation: recommendation.to_string(),
            sufficient_data: true,
        }
    }

    /// Calculate strain from monotony and total weekly load
    pub fn calculate_strain(&self, monotony: f64, weekly_load: f64) -> StrainAnalysis {
        let strain = monotony * weekly_load;

        let (risk, recommendation) = if strain < self.strain.moderate_threshold {
            (RiskLevel::Low, "Strain is low - current load is well tolerated")
        } else if strain < self.strain.high_threshold {
            (
                RiskLevel::Moderate,
                "Moderate strain - maintain recovery habits and monitor fatigue",
            )
        } else if strain < self.strain.critical_threshold {
            (
                RiskLevel::High,
                "High strain - prioritize recovery and avoid adding load this week",
            )
        } else {
            (
                RiskLevel::Critical,
                "Critical strain - reduce training load immediately to avoid overtraining",
            )
        };

        debug!(monotony, weekly_load, strain, risk = %risk, "calculated strain");

        StrainAnalysis {
            strain,
            risk,
            recommendation: recommendation.to_string(),
        }
    }
}
