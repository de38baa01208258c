//! Acute:Chronic Workload Ratio (ACWR)
//!
//! ACWR compares the average daily load of the last week against the average
//! daily load of the last four weeks:
//!
//! ```text
//! acute   = Σ volume (last 7 days)  / 7
//! chronic = Σ volume (last 28 days) / 28
//! ACWR    = acute / chronic
//! ```
//!
//! Values between 0.8 and 1.3 are the commonly cited "sweet spot". Above 1.5
//! injury risk climbs sharply; below 0.8 the athlete is detraining.
//!
//! A history whose recent load has no chronic counterpart (a brand-new user)
//! cannot produce a real ratio, so the calculator reports a fixed sentinel of
//! 2.0 instead of dividing by zero.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::aggregator::{SessionAggregator, WindowConfig, WorkloadWindow};
use crate::models::WorkoutSession;

/// Thresholds applied to the workload ratio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadConfig {
    /// Ratio reported when there is acute load but no chronic load
    pub new_athlete_ratio: f64,

    /// Below this ratio a deload (or rather a load increase) is indicated
    pub deload_lower_bound: f64,

    /// Above this ratio a deload is indicated
    pub deload_upper_bound: f64,

    /// Upper edge of the optimal zone
    pub caution_threshold: f64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        WorkloadConfig {
            new_athlete_ratio: 2.0,
            deload_lower_bound: 0.8,
            deload_upper_bound: 1.5,
            caution_threshold: 1.3,
        }
    }
}

/// ACWR interpretation zones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AcwrZone {
    Undertrained, // below 0.8
    Optimal,      // 0.8 to 1.3
    Caution,      // 1.3 to 1.5
    HighRisk,     // above 1.5
}

impl AcwrZone {
    pub fn description(&self) -> &'static str {
        match self {
            AcwrZone::Undertrained => "Undertrained (detraining risk)",
            AcwrZone::Optimal => "Optimal training zone",
            AcwrZone::Caution => "Elevated load (caution)",
            AcwrZone::HighRisk => "Load spike (high injury risk)",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            AcwrZone::Undertrained => {
                "Training load is low relative to your recent history. Increase volume gradually."
            }
            AcwrZone::Optimal => "Training load is well balanced. Continue current progression.",
            AcwrZone::Caution => {
                "Training load is rising quickly. Monitor fatigue and avoid further jumps."
            }
            AcwrZone::HighRisk => {
                "Training load spike detected. Reduce volume to lower injury risk."
            }
        }
    }
}

/// Workload ratio calculator
#[derive(Debug, Clone)]
pub struct WorkloadCalculator {
    aggregator: SessionAggregator,
    config: WorkloadConfig,
}

impl WorkloadCalculator {
    /// Create calculator with 7/28-day windows and standard thresholds
    pub fn new() -> Self {
        WorkloadCalculator {
            aggregator: SessionAggregator::new(),
            config: WorkloadConfig::default(),
        }
    }

    /// Create calculator with custom windows and thresholds
    pub fn with_config(windows: WindowConfig, config: WorkloadConfig) -> Self {
        WorkloadCalculator {
            aggregator: SessionAggregator::with_config(windows),
            config,
        }
    }

    /// Calculate ACWR for a session history as of `as_of` (default: now)
    pub fn calculate_acwr(
        &self,
        sessions: &[WorkoutSession],
        as_of: Option<DateTime<Utc>>,
    ) -> f64 {
        if sessions.is_empty() {
            debug!("no sessions supplied, ACWR is 0");
            return 0.0;
        }

        let window = self.aggregator.windows(sessions, as_of);
        self.ratio_from_window(&window)
    }

    /// Calculate ACWR from already aggregated windows
    pub fn ratio_from_window(&self, window: &WorkloadWindow) -> f64 {
        if window.chronic_average == 0.0 {
            if window.acute_average > 0.0 {
                warn!(
                    acute_average = window.acute_average,
                    sentinel = self.config.new_athlete_ratio,
                    "no chronic load to compare against, reporting sentinel ACWR"
                );
                return self.config.new_athlete_ratio;
            }
            return 0.0;
        }

        let acwr = round_to_hundredths(window.acute_average / window.chronic_average);
        debug!(
            acute_average = window.acute_average,
            chronic_average = window.chronic_average,
            acwr,
            "calculated ACWR"
        );
        acwr
    }

    /// True when the ratio is outside the safe band (strict on both ends)
    pub fn recommend_deload(&self, acwr: f64) -> bool {
        acwr < self.config.deload_lower_bound || acwr > self.config.deload_upper_bound
    }

    /// Interpret a ratio
    pub fn classify(&self, acwr: f64) -> AcwrZone {
        if acwr < self.config.deload_lower_bound {
            AcwrZone::Undertrained
        } else if acwr <= self.config.caution_threshold {
            AcwrZone::Optimal
        } else if acwr <= self.config.deload_upper_bound {
            AcwrZone::Caution
        } else {
            AcwrZone::HighRisk
        }
    }
}

impl Default for WorkloadCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Round half away from zero to two decimal places.
///
/// Goes through `Decimal` so that ratios like 1.125 land on 1.13.
pub(crate) fn round_to_hundredths(value: f64) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}
