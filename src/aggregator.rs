//! Session aggregation into trailing time windows
//!
//! Every other analyzer works from the same small set of derived views over the
//! caller's session list: the acute (7-day) and chronic (28-day) windows, the
//! trailing N sessions, and a few per-window summaries.
//!
//! # Window semantics
//!
//! A session belongs to an N-day window when `date >= now - N days`. Sessions
//! dated after `now` are included. Window averages divide the window total by
//! the fixed window length, not by the number of sessions, so days without a
//! session pull the average down.
//!
//! # Ordering
//!
//! "Last N sessions" means the trailing N entries of the slice as given. The
//! aggregator never re-sorts; callers supply sessions in ascending date order.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::models::WorkoutSession;

/// Window lengths used for acute and chronic load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Acute window length in days (default: 7)
    pub acute_window_days: u16,

    /// Chronic window length in days (default: 28)
    pub chronic_window_days: u16,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            acute_window_days: 7,
            chronic_window_days: 28,
        }
    }
}

/// Acute and chronic daily load averages relative to a reference instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkloadWindow {
    /// Mean daily volume over the acute window
    pub acute_average: f64,

    /// Mean daily volume over the chronic window
    pub chronic_average: f64,

    /// Total volume inside the acute window
    pub acute_total: f64,

    /// Total volume inside the chronic window
    pub chronic_total: f64,

    /// Number of sessions inside the acute window
    pub acute_sessions: usize,

    /// Number of sessions inside the chronic window
    pub chronic_sessions: usize,
}

/// Partitions session histories into the windows the analyzers need
#[derive(Debug, Clone)]
pub struct SessionAggregator {
    config: WindowConfig,
}

impl SessionAggregator {
    /// Create aggregator with the standard 7/28-day windows
    pub fn new() -> Self {
        SessionAggregator {
            config: WindowConfig::default(),
        }
    }

    /// Create aggregator with custom window lengths
    pub fn with_config(config: WindowConfig) -> Self {
        SessionAggregator { config }
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Resolve the reference instant, defaulting to the current time
    pub fn reference_time(as_of: Option<DateTime<Utc>>) -> DateTime<Utc> {
        as_of.unwrap_or_else(Utc::now)
    }

    /// Sessions dated on or after `now - days`
    pub fn sessions_within<'a>(
        sessions: &'a [WorkoutSession],
        now: DateTime<Utc>,
        days: u16,
    ) -> impl Iterator<Item = &'a WorkoutSession> + 'a {
        let cutoff = now - Duration::days(i64::from(days));
        sessions.iter().filter(move |s| s.date >= cutoff)
    }

    /// Compute acute and chronic windows in a single pass
    pub fn windows(
        &self,
        sessions: &[WorkoutSession],
        as_of: Option<DateTime<Utc>>,
    ) -> WorkloadWindow {
        let now = Self::reference_time(as_of);
        let acute_cutoff = now - Duration::days(i64::from(self.config.acute_window_days));
        let chronic_cutoff = now - Duration::days(i64::from(self.config.chronic_window_days));

        let mut window = WorkloadWindow::default();

        for session in sessions {
            if session.date >= acute_cutoff {
                window.acute_total += session.volume;
                window.acute_sessions += 1;
            }
            if session.date >= chronic_cutoff {
                window.chronic_total += session.volume;
                window.chronic_sessions += 1;
            }
        }

        if self.config.acute_window_days > 0 {
            window.acute_average = window.acute_total / f64::from(self.config.acute_window_days);
        }
        if self.config.chronic_window_days > 0 {
            window.chronic_average =
                window.chronic_total / f64::from(self.config.chronic_window_days);
        }

        trace!(
            acute_total = window.acute_total,
            chronic_total = window.chronic_total,
            acute_sessions = window.acute_sessions,
            chronic_sessions = window.chronic_sessions,
            "aggregated workload windows"
        );

        window
    }

    /// The trailing `n` sessions in input order (fewer if the slice is shorter)
    pub fn last_n_sessions(sessions: &[WorkoutSession], n: usize) -> &[WorkoutSession] {
        &sessions[sessions.len().saturating_sub(n)..]
    }

    /// Total volume inside the acute window
    pub fn weekly_load(&self, sessions: &[WorkoutSession], as_of: Option<DateTime<Utc>>) -> f64 {
        let now = Self::reference_time(as_of);
        Self::sessions_within(sessions, now, self.config.acute_window_days)
            .map(|s| s.volume)
            .sum()
    }

    /// Mean session RPE inside the acute window, ignoring sessions without one
    pub fn average_intensity(
        &self,
        sessions: &[WorkoutSession],
        as_of: Option<DateTime<Utc>>,
    ) -> Option<f64> {
        let now = Self::reference_time(as_of);
        let (sum, count) = Self::sessions_within(sessions, now, self.config.acute_window_days)
            .filter_map(|s| s.intensity)
            .fold((0.0, 0u32), |(sum, count), rpe| (sum + rpe, count + 1));

        if count == 0 {
            None
        } else {
            Some(sum / f64::from(count))
        }
    }

    /// Whole days between the newest session and `now`.
    ///
    /// Sessions dated in the future count as today.
    pub fn days_since_last_session(
        sessions: &[WorkoutSession],
        as_of: Option<DateTime<Utc>>,
    ) -> Option<u32> {
        let now = Self::reference_time(as_of);
        sessions.iter().map(|s| s.date).max().map(|latest| {
            let days = (now - latest).num_days().max(0);
            u32::try_from(days).unwrap_or(u32::MAX)
        })
    }
}

impl Default for SessionAggregator {
    fn default() -> Self {
        Self::new()
    }
}
