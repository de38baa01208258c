//! Recovery readiness scoring
//!
//! Readiness starts at 100 and loses points for each fatigue signal that fires.
//! Every deduction is kept as a tagged [`Penalty`], so the score and the list of
//! contributing factors are always derived from the same data.
//!
//! # Signals
//!
//! | Signal                 | Condition | Penalty |
//! |------------------------|-----------|---------|
//! | ACWR (first band only) | > 1.5     | 30      |
//! |                        | > 1.3     | 15      |
//! |                        | < 0.8     | 10      |
//! | Average RPE            | > 9       | 20      |
//! |                        | > 8       | 10      |
//! | Days since last workout| 0         | 20      |
//! |                        | 1         | 5       |
//! |                        | > 5       | 10      |
//! | Sleep quality (1-10)   | < 5       | 10      |
//! |                        | < 7       | 5       |
//! | Soreness (1-10)        | > 7       | 10      |
//! |                        | > 5       | 5       |
//!
//! The clamped score maps to a tier (heavy / moderate / light / rest). Two ACWR
//! overrides replace the tier outcome without touching the score: a critical
//! load spike (ACWR > 1.8) and detraining (ACWR < 0.7).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::SuggestedIntensity;

/// A threshold paired with the points it costs when crossed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyBand {
    pub threshold: f64,
    pub penalty: u32,
}

impl PenaltyBand {
    pub const fn new(threshold: f64, penalty: u32) -> Self {
        PenaltyBand { threshold, penalty }
    }
}

/// Readiness scoring thresholds and weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessConfig {
    pub acwr_spike: PenaltyBand,
    pub acwr_elevated: PenaltyBand,
    pub acwr_low: PenaltyBand,

    pub rpe_very_high: PenaltyBand,
    pub rpe_high: PenaltyBand,

    /// Penalty for training again on the same day
    pub same_day_penalty: u32,
    /// Penalty for training on consecutive days
    pub next_day_penalty: u32,
    /// Rest longer than `threshold` days is penalized as lost momentum
    pub extended_break: PenaltyBand,

    pub sleep_poor: PenaltyBand,
    pub sleep_fair: PenaltyBand,

    pub soreness_severe: PenaltyBand,
    pub soreness_moderate: PenaltyBand,

    /// Minimum score for each tier
    pub heavy_score: u8,
    pub moderate_score: u8,
    pub light_score: u8,

    /// ACWR above which the critical override fires
    pub critical_acwr: f64,
    /// ACWR below which the detraining override fires
    pub detraining_acwr: f64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        ReadinessConfig {
            acwr_spike: PenaltyBand::new(1.5, 30),
            acwr_elevated: PenaltyBand::new(1.3, 15),
            acwr_low: PenaltyBand::new(0.8, 10),
            rpe_very_high: PenaltyBand::new(9.0, 20),
            rpe_high: PenaltyBand::new(8.0, 10),
            same_day_penalty: 20,
            next_day_penalty: 5,
            extended_break: PenaltyBand::new(5.0, 10),
            sleep_poor: PenaltyBand::new(5.0, 10),
            sleep_fair: PenaltyBand::new(7.0, 5),
            soreness_severe: PenaltyBand::new(7.0, 10),
            soreness_moderate: PenaltyBand::new(5.0, 5),
            heavy_score: 80,
            moderate_score: 60,
            light_score: 40,
            critical_acwr: 1.8,
            detraining_acwr: 0.7,
        }
    }
}

/// One deduction from the readiness score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Penalty {
    pub reason: String,
    pub magnitude: u32,
}

impl Penalty {
    fn new(reason: impl Into<String>, magnitude: u32) -> Self {
        Penalty {
            reason: reason.into(),
            magnitude,
        }
    }
}

/// ACWR condition that replaced the tier outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadinessOverride {
    CriticalLoad,
    Detraining,
}

/// Readiness assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryReadiness {
    /// Readiness score, always within 0-100
    pub score: u8,
    pub ready: bool,
    pub recommendation: String,
    pub suggested_intensity: SuggestedIntensity,

    /// Deductions in evaluation order
    pub factors: Vec<Penalty>,

    /// Set when an ACWR override decided the outcome
    pub override_applied: Option<ReadinessOverride>,
}

/// Recovery readiness scorer
#[derive(Debug, Clone, Default)]
pub struct ReadinessScorer {
    config: ReadinessConfig,
}

impl ReadinessScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ReadinessConfig) -> Self {
        ReadinessScorer { config }
    }

    /// Collect every penalty that applies to the given inputs
    pub fn penalties(
        &self,
        acwr: f64,
        average_rpe: f64,
        days_since_last_workout: u32,
        sleep_quality: Option<f64>,
        soreness: Option<f64>,
    ) -> Vec<Penalty> {
        let c = &self.config;
        let mut penalties = Vec::new();

        if acwr > c.acwr_spike.threshold {
            penalties.push(Penalty::new(
                format!("very high workload ratio ({:.2})", acwr),
                c.acwr_spike.penalty,
            ));
        } else if acwr > c.acwr_elevated.threshold {
            penalties.push(Penalty::new(
                format!("elevated workload ratio ({:.2})", acwr),
                c.acwr_elevated.penalty,
            ));
        } else if acwr < c.acwr_low.threshold {
            penalties.push(Penalty::new(
                format!("low workload ratio ({:.2})", acwr),
                c.acwr_low.penalty,
            ));
        }

        if average_rpe > c.rpe_very_high.threshold {
            penalties.push(Penalty::new(
                "very high recent exertion",
                c.rpe_very_high.penalty,
            ));
        } else if average_rpe > c.rpe_high.threshold {
            penalties.push(Penalty::new("high recent exertion", c.rpe_high.penalty));
        }

        match days_since_last_workout {
            0 => penalties.push(Penalty::new("already trained today", c.same_day_penalty)),
            1 => penalties.push(Penalty::new("trained yesterday", c.next_day_penalty)),
            days if f64::from(days) > c.extended_break.threshold => penalties.push(
                Penalty::new("extended break from training", c.extended_break.penalty),
            ),
            _ => {}
        }

        if let Some(sleep) = sleep_quality {
            if sleep < c.sleep_poor.threshold {
                penalties.push(Penalty::new("poor sleep quality", c.sleep_poor.penalty));
            } else if sleep < c.sleep_fair.threshold {
                penalties.push(Penalty::new("below-average sleep", c.sleep_fair.penalty));
            }
        }

        if let Some(soreness) = soreness {
            if soreness > c.soreness_severe.threshold {
                penalties.push(Penalty::new("severe muscle soreness", c.soreness_severe.penalty));
            } else if soreness > c.soreness_moderate.threshold {
                penalties.push(Penalty::new(
                    "moderate muscle soreness",
                    c.soreness_moderate.penalty,
                ));
            }
        }

        penalties
    }

    /// Score readiness to train
    pub fn assess(
        &self,
        acwr: f64,
        average_rpe: f64,
        days_since_last_workout: u32,
        sleep_quality: Option<f64>,
        soreness: Option<f64>,
    ) -> RecoveryReadiness {
        let c = &self.config;
        let factors = self.penalties(
            acwr,
            average_rpe,
            days_since_last_workout,
            sleep_quality,
            soreness,
        );

        let deducted: i64 = factors.iter().map(|p| i64::from(p.magnitude)).sum();
        let score = (100 - deducted).clamp(0, 100) as u8;

        let (mut ready, mut suggested_intensity, mut base) = if score >= c.heavy_score {
            (
                true,
                SuggestedIntensity::Heavy,
                "Fully recovered - ready for high intensity training".to_string(),
            )
        } else if score >= c.moderate_score {
            (
                true,
                SuggestedIntensity::Moderate,
                "Mostly recovered - moderate intensity recommended".to_string(),
            )
        } else if score >= c.light_score {
            (
                true,
                SuggestedIntensity::Light,
                "Partially recovered - keep today's session light".to_string(),
            )
        } else {
            (
                false,
                SuggestedIntensity::Light,
                "Not recovered - rest or active recovery recommended".to_string(),
            )
        };

        let mut override_applied = None;
        if acwr > c.critical_acwr {
            ready = false;
            suggested_intensity = SuggestedIntensity::Light;
            base = format!(
                "Critical: workload ratio {:.2} is far above your chronic load - take a rest day or start a deload",
                acwr
            );
            override_applied = Some(ReadinessOverride::CriticalLoad);
        } else if acwr < c.detraining_acwr {
            suggested_intensity = SuggestedIntensity::Moderate;
            base = format!(
                "Detraining risk: workload ratio {:.2} is well below your usual load - build volume back up gradually",
                acwr
            );
            override_applied = Some(ReadinessOverride::Detraining);
        }

        let recommendation = if factors.is_empty() {
            base
        } else {
            let reasons: Vec<&str> = factors.iter().map(|p| p.reason.as_str()).collect();
            format!("{}. Factors: {}", base, reasons.join(", "))
        };

        debug!(
            score,
            ready,
            intensity = %suggested_intensity,
            penalties = factors.len(),
            overridden = override_applied.is_some(),
            "assessed recovery readiness"
        );

        RecoveryReadiness {
            score,
            ready,
            recommendation,
            suggested_intensity,
            factors,
            override_applied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fully_rested_athlete() {
        let scorer = ReadinessScorer::new();
        let result = scorer.assess(1.0, 6.0, 2, Some(8.0), Some(2.0));

        assert_eq!(result.score, 100);
        assert!(result.ready);
        assert_eq!(result.suggested_intensity, SuggestedIntensity::Heavy);
        assert!(result.factors.is_empty());
        assert!(!result.recommendation.contains("Factors"));
    }

    #[test]
    fn test_critical_override() {
        let scorer = ReadinessScorer::new();
        let result = scorer.assess(1.9, 9.5, 0, None, None);

        assert_eq!(result.score, 30);
        assert!(!result.ready);
        assert_eq!(result.suggested_intensity, SuggestedIntensity::Light);
        assert!(result.recommendation.contains("Critical"));
        assert_eq!(result.override_applied, Some(ReadinessOverride::CriticalLoad));

        let magnitudes: Vec<u32> = result.factors.iter().map(|p| p.magnitude).collect();
        assert_eq!(magnitudes, vec![30, 20, 20]);
    }

    #[test]
    fn test_critical_override_forces_not_ready_on_high_score() {
        let scorer = ReadinessScorer::new();
        let result = scorer.assess(1.85, 5.0, 3, None, None);

        // Only the ACWR band fires: 100 - 30
        assert_eq!(result.score, 70);
        assert!(!result.ready);
        assert_eq!(result.suggested_intensity, SuggestedIntensity::Light);
    }

    #[test]
    fn test_detraining_override_keeps_ready() {
        let scorer = ReadinessScorer::new();
        let result = scorer.assess(0.5, 6.0, 3, None, None);

        assert_eq!(result.score, 90);
        assert!(result.ready);
        assert_eq!(result.suggested_intensity, SuggestedIntensity::Moderate);
        assert!(result.recommendation.contains("Detraining"));
        assert_eq!(result.override_applied, Some(ReadinessOverride::Detraining));
    }

    #[test]
    fn test_detraining_override_does_not_force_ready() {
        let scorer = ReadinessScorer::new();
        // 10 (acwr) + 20 (rpe) + 20 (today) + 10 (sleep) + 10 (soreness) = 70
        let result = scorer.assess(0.6, 9.5, 0, Some(3.0), Some(9.0));

        assert_eq!(result.score, 30);
        assert!(!result.ready);
        assert_eq!(result.suggested_intensity, SuggestedIntensity::Moderate);
    }

    #[test]
    fn test_acwr_bands_are_exclusive() {
        let scorer = ReadinessScorer::new();

        let spike = scorer.penalties(1.6, 5.0, 3, None, None);
        assert_eq!(spike.len(), 1);
        assert_eq!(spike[0].magnitude, 30);

        let elevated = scorer.penalties(1.4, 5.0, 3, None, None);
        assert_eq!(elevated[0].magnitude, 15);

        let low = scorer.penalties(0.75, 5.0, 3, None, None);
        assert_eq!(low[0].magnitude, 10);

        assert!(scorer.penalties(1.3, 5.0, 3, None, None).is_empty());
        assert!(scorer.penalties(0.8, 5.0, 3, None, None).is_empty());
    }

    #[test]
    fn test_rest_interval_penalties() {
        let scorer = ReadinessScorer::new();
        let score_for = |days| scorer.assess(1.0, 5.0, days, None, None).score;

        assert_eq!(score_for(0), 80);
        assert_eq!(score_for(1), 95);
        for days in 2..=5 {
            assert_eq!(score_for(days), 100);
        }
        assert_eq!(score_for(6), 90);
    }

    #[test]
    fn test_subjective_inputs() {
        let scorer = ReadinessScorer::new();

        assert_eq!(scorer.assess(1.0, 5.0, 3, Some(4.0), None).score, 90);
        assert_eq!(scorer.assess(1.0, 5.0, 3, Some(6.0), None).score, 95);
        assert_eq!(scorer.assess(1.0, 5.0, 3, Some(7.0), None).score, 100);
        assert_eq!(scorer.assess(1.0, 5.0, 3, None, Some(8.0)).score, 90);
        assert_eq!(scorer.assess(1.0, 5.0, 3, None, Some(6.0)).score, 95);
        assert_eq!(scorer.assess(1.0, 5.0, 3, None, Some(5.0)).score, 100);
    }

    #[test]
    fn test_tiers() {
        let scorer = ReadinessScorer::new();

        // 100 - 10 (rpe > 8) - 5 (yesterday) = 85
        let heavy = scorer.assess(1.0, 8.5, 1, None, None);
        assert_eq!(heavy.score, 85);
        assert_eq!(heavy.suggested_intensity, SuggestedIntensity::Heavy);

        // 100 - 15 - 20 = 65
        let moderate = scorer.assess(1.4, 9.5, 3, None, None);
        assert_eq!(moderate.score, 65);
        assert_eq!(moderate.suggested_intensity, SuggestedIntensity::Moderate);
        assert!(moderate.ready);

        // 100 - 30 - 20 - 5 = 45
        let light = scorer.assess(1.6, 9.5, 1, None, None);
        assert_eq!(light.score, 45);
        assert_eq!(light.suggested_intensity, SuggestedIntensity::Light);
        assert!(light.ready);
    }

    #[test]
    fn test_factors_are_listed_in_recommendation() {
        let scorer = ReadinessScorer::new();
        let result = scorer.assess(1.0, 9.5, 0, Some(4.0), None);

        assert!(result
            .recommendation
            .contains("Factors: very high recent exertion, already trained today, poor sleep quality"));
    }

    #[test]
    fn test_extreme_inputs_clamp_to_zero() {
        let scorer = ReadinessScorer::new();
        // 30 + 20 + 20 + 10 + 10 = 90
        let result = scorer.assess(5.0, 15.0, 0, Some(1.0), Some(10.0));

        assert_eq!(result.score, 10);
        let heavier = ReadinessScorer::with_config(ReadinessConfig {
            same_day_penalty: 90,
            ..ReadinessConfig::default()
        })
        .assess(5.0, 15.0, 0, Some(1.0), Some(10.0));
        assert_eq!(heavier.score, 0);
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_score_is_always_bounded(
            acwr in -5.0f64..10.0,
            rpe in -5.0f64..20.0,
            days in 0u32..60,
            sleep in proptest::option::of(-10.0f64..20.0),
            soreness in proptest::option::of(-10.0f64..20.0),
        ) {
            let scorer = ReadinessScorer::new();
            let result = scorer.assess(acwr, rpe, days, sleep, soreness);

            prop_assert!(result.score <= 100);
            let deducted: u32 = result.factors.iter().map(|p| p.magnitude).sum();
            prop_assert_eq!(u32::from(result.score), 100u32.saturating_sub(deducted));
        }

        #[test]
        fn test_assessment_is_idempotent(
            acwr in 0.0f64..3.0,
            rpe in 0.0f64..10.0,
            days in 0u32..14,
        ) {
            let scorer = ReadinessScorer::new();
            prop_assert_eq!(
                scorer.assess(acwr, rpe, days, Some(6.0), Some(6.0)),
                scorer.assess(acwr, rpe, days, Some(6.0), Some(6.0))
            );
        }
    }
}
