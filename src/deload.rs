//! Deload prescription
//!
//! Maps fatigue severity onto a temporary reduction in volume and intensity.
//! Severity is judged from the workload ratio and the recent average RPE, most
//! severe band first. The guidance list is the same for every band; only the
//! reductions and the length of the deload change.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Reduction applied for one severity band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeloadBand {
    /// ACWR above which this band applies
    pub acwr_threshold: f64,
    /// Average RPE above which this band applies
    pub rpe_threshold: f64,
    pub volume_reduction: f64,
    pub intensity_reduction: f64,
    pub duration_days: u8,
}

/// Deload bands, most severe first, plus the default prescription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeloadConfig {
    pub severe: DeloadBand,
    pub moderate: DeloadBand,
    pub default_volume_reduction: f64,
    pub default_intensity_reduction: f64,
    pub default_duration_days: u8,
}

impl Default for DeloadConfig {
    fn default() -> Self {
        DeloadConfig {
            severe: DeloadBand {
                acwr_threshold: 1.8,
                rpe_threshold: 9.0,
                volume_reduction: 0.5,
                intensity_reduction: 0.3,
                duration_days: 7,
            },
            moderate: DeloadBand {
                acwr_threshold: 1.5,
                rpe_threshold: 8.5,
                volume_reduction: 0.4,
                intensity_reduction: 0.2,
                duration_days: 5,
            },
            default_volume_reduction: 0.3,
            default_intensity_reduction: 0.15,
            default_duration_days: 4,
        }
    }
}

const DELOAD_GUIDANCE: [&str; 6] = [
    "Focus on compound movements (squat, bench, deadlift, row)",
    "Reduce the number of working sets per exercise",
    "Maintain movement quality and technique on every rep",
    "Stop every set well short of failure",
    "Add mobility and light conditioning work",
    "Prioritize sleep and nutrition to support recovery",
];

/// Deload prescription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeloadProtocol {
    /// Fraction of normal volume to remove (0-1)
    pub volume_reduction: f64,
    /// Fraction of normal load/intensity to remove (0-1)
    pub intensity_reduction: f64,
    pub duration_days: u8,
    pub exercises: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DeloadGenerator {
    config: DeloadConfig,
}

impl DeloadGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DeloadConfig) -> Self {
        DeloadGenerator { config }
    }

    /// Pick the deload prescription for the given fatigue signals
    pub fn suggest_protocol(&self, acwr: f64, average_rpe: f64) -> DeloadProtocol {
        let c = &self.config;
        let exceeds =
            |band: &DeloadBand| acwr > band.acwr_threshold || average_rpe > band.rpe_threshold;

        let (volume_reduction, intensity_reduction, duration_days) = if exceeds(&c.severe) {
            (
                c.severe.volume_reduction,
                c.severe.intensity_reduction,
                c.severe.duration_days,
            )
        } else if exceeds(&c.moderate) {
            (
                c.moderate.volume_reduction,
                c.moderate.intensity_reduction,
                c.moderate.duration_days,
            )
        } else {
            (
                c.default_volume_reduction,
                c.default_intensity_reduction,
                c.default_duration_days,
            )
        };

        debug!(
            acwr,
            average_rpe, volume_reduction, intensity_reduction, duration_days, "suggested deload"
        );

        DeloadProtocol {
            volume_reduction,
            intensity_reduction,
            duration_days,
            exercises: DELOAD_GUIDANCE.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severe_band() {
        let generator = DeloadGenerator::new();

        let by_acwr = generator.suggest_protocol(1.9, 6.0);
        assert_eq!(by_acwr.volume_reduction, 0.5);
        assert_eq!(by_acwr.intensity_reduction, 0.3);
        assert_eq!(by_acwr.duration_days, 7);

        let by_rpe = generator.suggest_protocol(1.0, 9.2);
        assert_eq!(by_rpe, by_acwr);
    }

    #[test]
    fn test_moderate_band() {
        let generator = DeloadGenerator::new();
        let protocol = generator.suggest_protocol(1.6, 7.0);

        assert_eq!(protocol.volume_reduction, 0.4);
        assert_eq!(protocol.intensity_reduction, 0.2);
        assert_eq!(protocol.duration_days, 5);

        assert_eq!(generator.suggest_protocol(1.0, 8.7).duration_days, 5);
    }

    #[test]
    fn test_default_band() {
        let generator = DeloadGenerator::new();
        // Exactly on the thresholds does not escalate
        let protocol = generator.suggest_protocol(1.5, 8.5);

        assert_eq!(protocol.volume_reduction, 0.3);
        assert_eq!(protocol.intensity_reduction, 0.15);
        assert_eq!(protocol.duration_days, 4);
    }

    #[test]
    fn test_guidance_is_identical_across_bands() {
        let generator = DeloadGenerator::new();
        let severe = generator.suggest_protocol(2.0, 9.5);
        let mild = generator.suggest_protocol(0.9, 6.0);

        assert_eq!(severe.exercises.len(), 6);
        assert_eq!(severe.exercises, mild.exercises);
        assert!(severe.exercises[0].contains("compound"));
    }
}
