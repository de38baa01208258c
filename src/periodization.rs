//! Periodization scheduling
//!
//! Two independent schedules driven only by time:
//!
//! - A fixed 12-week strength mesocycle: hypertrophy (weeks 0-3), strength
//!   (4-7), power (8-10) and a deload week (11). The phase is a pure function of
//!   `training_weeks mod 12`.
//! - A taper schedule counting down to a target event: building, peaking,
//!   tapering and finally maintaining in the last week or once the date passed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::aggregator::SessionAggregator;

/// Length of one mesocycle in weeks
pub const MESOCYCLE_WEEKS: u32 = 12;

const MILLIS_PER_WEEK: f64 = 7.0 * 24.0 * 60.0 * 60.0 * 1000.0;

/// Mesocycle training phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingPhase {
    Hypertrophy,
    Strength,
    Power,
    Deload,
}

impl TrainingPhase {
    /// Phase for a position within the mesocycle (taken mod 12)
    pub fn from_cycle_position(position: u32) -> Self {
        match position % MESOCYCLE_WEEKS {
            0..=3 => TrainingPhase::Hypertrophy,
            4..=7 => TrainingPhase::Strength,
            8..=10 => TrainingPhase::Power,
            _ => TrainingPhase::Deload,
        }
    }

    /// First cycle week of the phase
    pub fn start_week(&self) -> u32 {
        match self {
            TrainingPhase::Hypertrophy => 0,
            TrainingPhase::Strength => 4,
            TrainingPhase::Power => 8,
            TrainingPhase::Deload => 11,
        }
    }

    pub fn duration_weeks(&self) -> u32 {
        match self {
            TrainingPhase::Hypertrophy => 4,
            TrainingPhase::Strength => 4,
            TrainingPhase::Power => 3,
            TrainingPhase::Deload => 1,
        }
    }

    pub fn focus(&self) -> &'static str {
        match self {
            TrainingPhase::Hypertrophy => {
                "Build muscle mass and work capacity with moderate loads and higher volume"
            }
            TrainingPhase::Strength => {
                "Develop maximal strength with heavy compound lifts and longer rest periods"
            }
            TrainingPhase::Power => {
                "Convert strength into power with explosive, low-rep work at high loads"
            }
            TrainingPhase::Deload => {
                "Recover and consolidate gains with reduced volume and intensity"
            }
        }
    }

    pub fn rep_range(&self) -> &'static str {
        match self {
            TrainingPhase::Hypertrophy => "8-15 reps",
            TrainingPhase::Strength => "3-6 reps",
            TrainingPhase::Power => "1-3 reps",
            TrainingPhase::Deload => "8-12 reps",
        }
    }

    pub fn intensity_range(&self) -> &'static str {
        match self {
            TrainingPhase::Hypertrophy => "65-80% 1RM",
            TrainingPhase::Strength => "80-90% 1RM",
            TrainingPhase::Power => "85-95% 1RM",
            TrainingPhase::Deload => "50-70% 1RM",
        }
    }
}

impl fmt::Display for TrainingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainingPhase::Hypertrophy => write!(f, "hypertrophy"),
            TrainingPhase::Strength => write!(f, "strength"),
            TrainingPhase::Power => write!(f, "power"),
            TrainingPhase::Deload => write!(f, "deload"),
        }
    }
}

/// Current mesocycle phase and its prescription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodizationPhase {
    pub phase: TrainingPhase,
    /// Length of the phase in weeks
    pub duration: u32,
    pub focus: String,
    pub rep_range: String,
    pub intensity_range: String,
    /// Week within the 12-week cycle (0-11)
    pub cycle_position: u32,
    /// Weeks left in the phase, counting the current one
    pub weeks_remaining: u32,
}

/// Stage of the countdown to a target event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaperPhase {
    Building,
    Peaking,
    Tapering,
    Maintaining,
}

impl TaperPhase {
    pub fn recommendation(&self) -> &'static str {
        match self {
            TaperPhase::Building => {
                "Plenty of time before the event - focus on building volume and general strength"
            }
            TaperPhase::Peaking => {
                "Shift toward event-specific intensity while keeping volume steady"
            }
            TaperPhase::Tapering => {
                "Begin tapering - cut volume 40-60% while keeping intensity high"
            }
            TaperPhase::Maintaining => {
                "Event is imminent - keep sessions short and sharp, prioritize rest"
            }
        }
    }
}

impl fmt::Display for TaperPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaperPhase::Building => write!(f, "building"),
            TaperPhase::Peaking => write!(f, "peaking"),
            TaperPhase::Tapering => write!(f, "tapering"),
            TaperPhase::Maintaining => write!(f, "maintaining"),
        }
    }
}

/// Week thresholds for the taper countdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodizationConfig {
    /// More weeks than this to the event is still building
    pub building_weeks: i64,
    /// More weeks than this is peaking
    pub peaking_weeks: i64,
    /// More weeks than this is tapering; anything else is maintaining
    pub tapering_weeks: i64,
}

impl Default for PeriodizationConfig {
    fn default() -> Self {
        PeriodizationConfig {
            building_weeks: 8,
            peaking_weeks: 4,
            tapering_weeks: 1,
        }
    }
}

/// Countdown to a target event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakEstimate {
    /// Whole weeks until the event, floored; negative once the date passed
    pub weeks_to_target: i64,
    pub current_phase: TaperPhase,
    pub recommendation: String,
    pub current_load: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PeriodizationScheduler {
    config: PeriodizationConfig,
}

impl PeriodizationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PeriodizationConfig) -> Self {
        PeriodizationScheduler { config }
    }

    /// Mesocycle phase after `training_weeks` weeks of training
    pub fn recommend_periodization(&self, training_weeks: u32) -> PeriodizationPhase {
        let cycle_position = training_weeks % MESOCYCLE_WEEKS;
        let phase = TrainingPhase::from_cycle_position(cycle_position);
        let weeks_remaining = phase.start_week() + phase.duration_weeks() - cycle_position;

        debug!(training_weeks, cycle_position, phase = %phase, "resolved mesocycle phase");

        PeriodizationPhase {
            phase,
            duration: phase.duration_weeks(),
            focus: phase.focus().to_string(),
            rep_range: phase.rep_range().to_string(),
            intensity_range: phase.intensity_range().to_string(),
            cycle_position,
            weeks_remaining,
        }
    }

    /// Where the athlete is in the countdown to `target_date`
    pub fn estimate_time_to_peak(
        &self,
        current_load: f64,
        target_date: DateTime<Utc>,
        current_date: Option<DateTime<Utc>>,
    ) -> PeakEstimate {
        let now = SessionAggregator::reference_time(current_date);
        let millis = (target_date - now).num_milliseconds() as f64;
        let weeks_to_target = (millis / MILLIS_PER_WEEK).floor() as i64;

        let current_phase = if weeks_to_target > self.config.building_weeks {
            TaperPhase::Building
        } else if weeks_to_target > self.config.peaking_weeks {
            TaperPhase::Peaking
        } else if weeks_to_target > self.config.tapering_weeks {
            TaperPhase::Tapering
        } else {
            TaperPhase::Maintaining
        };

        debug!(weeks_to_target, current_load, phase = %current_phase, "estimated time to peak");

        PeakEstimate {
            weeks_to_target,
            current_phase,
            recommendation: current_phase.recommendation().to_string(),
            current_load,
        }
    }
}
