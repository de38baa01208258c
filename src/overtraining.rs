//! Overtraining indicator detection
//!
//! Each check is independent and contributes points to a risk score when it
//! fires. The total decides the risk tier.
//!
//! | Check                 | Condition                                   | Points |
//! |-----------------------|---------------------------------------------|--------|
//! | Performance decline   | last 5 sessions average < 85% of previous 5 | 2      |
//! | Resting heart rate    | more than 10 bpm above baseline             | 3      |
//! |                       | more than 5 bpm above baseline              | 1      |
//! | Mood                  | below 5                                     | 1      |
//! | Motivation            | below 5                                     | 1      |
//! | Training frequency    | more than 6 sessions in the last 7 days     | 2      |
//!
//! A heart-rate reading without a baseline (or the reverse) skips that check.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregator::SessionAggregator;
use crate::models::{RiskLevel, SubjectiveInputs, WorkoutSession};

/// Sentinel indicator reported when no check fired
pub const NONE_DETECTED: &str = "None detected";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvertrainingConfig {
    /// Sessions per comparison block for the performance trend
    pub performance_block: usize,
    /// Recent block below this fraction of the older block is a decline
    pub performance_decline_ratio: f64,
    pub performance_points: u32,

    pub heart_rate_major_delta: f64,
    pub heart_rate_major_points: u32,
    pub heart_rate_minor_delta: f64,
    pub heart_rate_minor_points: u32,

    pub low_mood_threshold: f64,
    pub low_motivation_threshold: f64,
    pub wellbeing_points: u32,

    pub frequency_window_days: u16,
    /// More sessions than this in the window fires the check
    pub max_weekly_sessions: usize,
    pub frequency_points: u32,

    pub moderate_score: u32,
    pub high_score: u32,
}

impl Default for OvertrainingConfig {
    fn default() -> Self {
        OvertrainingConfig {
            performance_block: 5,
            performance_decline_ratio: 0.85,
            performance_points: 2,
            heart_rate_major_delta: 10.0,
            heart_rate_major_points: 3,
            heart_rate_minor_delta: 5.0,
            heart_rate_minor_points: 1,
            low_mood_threshold: 5.0,
            low_motivation_threshold: 5.0,
            wellbeing_points: 1,
            frequency_window_days: 7,
            max_weekly_sessions: 6,
            frequency_points: 2,
            moderate_score: 3,
            high_score: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvertrainingAssessment {
    pub risk: RiskLevel,
    /// Never empty; holds [`NONE_DETECTED`] when nothing fired
    pub indicators: Vec<String>,
    pub recommendation: String,
    pub risk_score: u32,
}

#[derive(Debug, Clone, Default)]
pub struct OvertrainingDetector {
    config: OvertrainingConfig,
}

impl OvertrainingDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: OvertrainingConfig) -> Self {
        OvertrainingDetector { config }
    }

    /// Run every overtraining check against a session history
    pub fn check_indicators(
        &self,
        sessions: &[WorkoutSession],
        inputs: &SubjectiveInputs,
        as_of: Option<DateTime<Utc>>,
    ) -> OvertrainingAssessment {
        let c = &self.config;
        let now = SessionAggregator::reference_time(as_of);
        let mut risk_score = 0u32;
        let mut indicators = Vec::new();

        if let Some(ratio) = self.performance_ratio(sessions) {
            if ratio < c.performance_decline_ratio {
                risk_score += c.performance_points;
                indicators.push(format!(
                    "Performance decline: recent volume is {:.0}% of the previous block",
                    ratio * 100.0
                ));
            }
        }

        if let (Some(resting), Some(baseline)) =
            (inputs.resting_heart_rate, inputs.baseline_heart_rate)
        {
            let delta = resting - baseline;
            if delta > c.heart_rate_major_delta {
                risk_score += c.heart_rate_major_points;
                indicators.push(format!(
                    "Resting heart rate significantly elevated (+{:.0} bpm)",
                    delta
                ));
            } else if delta > c.heart_rate_minor_delta {
                risk_score += c.heart_rate_minor_points;
                indicators.push(format!(
                    "Resting heart rate slightly elevated (+{:.0} bpm)",
                    delta
                ));
            }
        }

        if inputs.mood_score.is_some_and(|mood| mood < c.low_mood_threshold) {
            risk_score += c.wellbeing_points;
            indicators.push("Low mood".to_string());
        }

        if inputs
            .motivation_score
            .is_some_and(|motivation| motivation < c.low_motivation_threshold)
        {
            risk_score += c.wellbeing_points;
            indicators.push("Low motivation".to_string());
        }

        let recent_sessions =
            SessionAggregator::sessions_within(sessions, now, c.frequency_window_days).count();
        if recent_sessions > c.max_weekly_sessions {
            risk_score += c.frequency_points;
            indicators.push(format!(
                "High training frequency ({} sessions in {} days)",
                recent_sessions, c.frequency_window_days
            ));
        }

        let (risk, recommendation) = if risk_score >= c.high_score {
            (
                RiskLevel::High,
                "High overtraining risk - take 3-5 days of rest and follow with a deload week",
            )
        } else if risk_score >= c.moderate_score {
            (
                RiskLevel::Moderate,
                "Moderate overtraining risk - reduce volume and add an extra rest day this week",
            )
        } else {
            (
                RiskLevel::Low,
                "Low overtraining risk - continue training and keep monitoring recovery",
            )
        };

        if indicators.is_empty() {
            indicators.push(NONE_DETECTED.to_string());
        }

        debug!(risk_score, risk = %risk, "checked overtraining indicators");

        OvertrainingAssessment {
            risk,
            indicators,
            recommendation: recommendation.to_string(),
            risk_score,
        }
    }

    /// Mean volume of the newest block over the mean of the block before it.
    ///
    /// `None` when there are fewer than two full blocks or the older block has
    /// no volume.
    fn performance_ratio(&self, sessions: &[WorkoutSession]) -> Option<f64> {
        let block = self.config.performance_block;
        if block == 0 || sessions.len() < block * 2 {
            return None;
        }

        let trailing = SessionAggregator::last_n_sessions(sessions, block * 2);
        let (older, recent) = trailing.split_at(block);
        let mean = |part: &[WorkoutSession]| {
            part.iter().map(|s| s.volume).sum::<f64>() / part.len() as f64
        };

        let older_mean = mean(older);
        if older_mean <= 0.0 {
            return None;
        }
        Some(mean(recent) / older_mean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 30, 12, 0, 0).unwrap()
    }

    /// Sessions every other day ending today, oldest first
    fn history(volumes: &[f64]) -> Vec<WorkoutSession> {
        let n = volumes.len() as i64;
        volumes
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let days_ago = (n - 1 - i as i64) * 2;
                WorkoutSession::new(v, reference() - Duration::days(days_ago))
            })
            .collect()
    }

    #[test]
    fn test_no_indicators() {
        let detector = OvertrainingDetector::new();
        let result = detector.check_indicators(
            &history(&[1000.0; 4]),
            &SubjectiveInputs::default(),
            Some(reference()),
        );

        assert_eq!(result.risk, RiskLevel::Low);
        assert_eq!(result.indicators, vec![NONE_DETECTED.to_string()]);
        assert_eq!(result.risk_score, 0);
    }

    #[test]
    fn test_performance_decline() {
        let detector = OvertrainingDetector::new();
        let mut volumes = vec![1000.0; 5];
        volumes.extend_from_slice(&[800.0; 5]);

        let result = detector.check_indicators(
            &history(&volumes),
            &SubjectiveInputs::default(),
            Some(reference()),
        );

        assert_eq!(result.risk_score, 2);
        assert!(result.indicators[0].contains("Performance decline"));
    }

    #[test]
    fn test_small_decline_is_ignored() {
        let detector = OvertrainingDetector::new();
        let mut volumes = vec![1000.0; 5];
        volumes.extend_from_slice(&[850.0; 5]);

        let result = detector.check_indicators(
            &history(&volumes),
            &SubjectiveInputs::default(),
            Some(reference()),
        );

        assert_eq!(result.risk_score, 0);
    }

    #[test]
    fn test_performance_needs_ten_sessions() {
        let detector = OvertrainingDetector::new();
        let volumes = [1000.0, 1000.0, 1000.0, 1000.0, 100.0, 100.0, 100.0, 100.0, 100.0];

        let result = detector.check_indicators(
            &history(&volumes),
            &SubjectiveInputs::default(),
            Some(reference()),
        );

        assert_eq!(result.risk_score, 0);
    }

    #[test]
    fn test_heart_rate_bands() {
        let detector = OvertrainingDetector::new();
        let inputs = |resting| SubjectiveInputs {
            resting_heart_rate: Some(resting),
            baseline_heart_rate: Some(50.0),
            ..SubjectiveInputs::default()
        };

        let major = detector.check_indicators(&[], &inputs(61.0), Some(reference()));
        assert_eq!(major.risk_score, 3);
        assert_eq!(major.risk, RiskLevel::Moderate);

        let minor = detector.check_indicators(&[], &inputs(56.0), Some(reference()));
        assert_eq!(minor.risk_score, 1);

        let at_threshold = detector.check_indicators(&[], &inputs(55.0), Some(reference()));
        assert_eq!(at_threshold.risk_score, 0);
    }

    #[test]
    fn test_heart_rate_without_baseline_is_skipped() {
        let detector = OvertrainingDetector::new();
        let inputs = SubjectiveInputs {
            resting_heart_rate: Some(80.0),
            ..SubjectiveInputs::default()
        };

        let result = detector.check_indicators(&[], &inputs, Some(reference()));
        assert_eq!(result.risk_score, 0);
        assert_eq!(result.indicators, vec![NONE_DETECTED.to_string()]);
    }

    #[test]
    fn test_frequency_check() {
        let detector = OvertrainingDetector::new();
        let daily = |count: i64| -> Vec<WorkoutSession> {
            (0..count)
                .rev()
                .map(|d| WorkoutSession::new(500.0, reference() - Duration::days(d)))
                .collect()
        };

        let none = SubjectiveInputs::default();

        let seven = detector.check_indicators(&daily(7), &none, Some(reference()));
        assert_eq!(seven.risk_score, 2);
        assert_eq!(seven.risk, RiskLevel::Low);

        let six = detector.check_indicators(&daily(6), &none, Some(reference()));
        assert_eq!(six.risk_score, 0);
    }

    #[test]
    fn test_high_risk_combination() {
        let detector = OvertrainingDetector::new();
        let inputs = SubjectiveInputs {
            resting_heart_rate: Some(72.0),
            baseline_heart_rate: Some(58.0),
            mood_score: Some(3.0),
            motivation_score: Some(4.0),
            ..SubjectiveInputs::default()
        };

        let result = detector.check_indicators(&[], &inputs, Some(reference()));

        assert_eq!(result.risk_score, 5);
        assert_eq!(result.risk, RiskLevel::High);
        assert_eq!(result.indicators.len(), 3);
        assert!(result.recommendation.contains("High overtraining risk"));
    }
}
