//! Combined fatigue report
//!
//! Runs every analyzer over one session history in dependency order and
//! collects the results. The report owns no logic of its own beyond the
//! defaults used when a history has nothing to say about a signal.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::aggregator::{SessionAggregator, WorkloadWindow};
use crate::config::EngineConfig;
use crate::deload::{DeloadGenerator, DeloadProtocol};
use crate::models::{SubjectiveInputs, WorkoutSession};
use crate::monotony::{MonotonyAnalysis, MonotonyAnalyzer, StrainAnalysis};
use crate::overtraining::{OvertrainingAssessment, OvertrainingDetector};
use crate::readiness::{ReadinessScorer, RecoveryReadiness};
use crate::workload::{AcwrZone, WorkloadCalculator};

/// Average RPE assumed when no session in the acute window recorded one
pub const DEFAULT_AVERAGE_RPE: f64 = 0.0;

/// Rest interval assumed for an empty history
pub const DEFAULT_DAYS_SINCE_LAST_SESSION: u32 = 7;

/// Every metric for one athlete at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatigueReport {
    pub as_of: DateTime<Utc>,
    pub session_count: usize,
    pub window: WorkloadWindow,
    pub acwr: f64,
    pub zone: AcwrZone,
    pub deload_recommended: bool,
    pub weekly_load: f64,
    pub average_rpe: f64,
    pub days_since_last_session: u32,
    pub monotony: MonotonyAnalysis,
    pub strain: StrainAnalysis,
    pub readiness: RecoveryReadiness,
    pub overtraining: OvertrainingAssessment,

    /// Present only when the workload ratio calls for a deload
    pub deload: Option<DeloadProtocol>,
}

impl FatigueReport {
    /// Build a report from one athlete's session history
    #[instrument(level = "debug", skip_all, fields(sessions = sessions.len()))]
    pub fn build(
        sessions: &[WorkoutSession],
        inputs: &SubjectiveInputs,
        as_of: Option<DateTime<Utc>>,
        config: &EngineConfig,
    ) -> Self {
        let now = SessionAggregator::reference_time(as_of);

        let aggregator = SessionAggregator::with_config(config.windows.clone());
        let workload =
            WorkloadCalculator::with_config(config.windows.clone(), config.workload.clone());
        let analyzer =
            MonotonyAnalyzer::with_config(config.monotony.clone(), config.strain.clone());
        let scorer = ReadinessScorer::with_config(config.readiness.clone());
        let detector = OvertrainingDetector::with_config(config.overtraining.clone());
        let generator = DeloadGenerator::with_config(config.deload.clone());

        let window = aggregator.windows(sessions, Some(now));
        let acwr = workload.ratio_from_window(&window);
        let zone = workload.classify(acwr);
        let deload_recommended = workload.recommend_deload(acwr);

        let weekly_load = aggregator.weekly_load(sessions, Some(now));
        let monotony = analyzer.calculate_monotony(sessions);
        let strain = analyzer.calculate_strain(monotony.monotony, weekly_load);

        let average_rpe = aggregator
            .average_intensity(sessions, Some(now))
            .unwrap_or(DEFAULT_AVERAGE_RPE);
        let days_since_last_session =
            SessionAggregator::days_since_last_session(sessions, Some(now))
                .unwrap_or(DEFAULT_DAYS_SINCE_LAST_SESSION);

        let readiness = scorer.assess(
            acwr,
            average_rpe,
            days_since_last_session,
            inputs.sleep_quality,
            inputs.soreness,
        );
        let overtraining = detector.check_indicators(sessions, inputs, Some(now));

        let deload = deload_recommended.then(|| generator.suggest_protocol(acwr, average_rpe));

        debug!(
            acwr,
            readiness = readiness.score,
            overtraining_score = overtraining.risk_score,
            deload = deload_recommended,
            "built fatigue report"
        );

        FatigueReport {
            as_of: now,
            session_count: sessions.len(),
            window,
            acwr,
            zone,
            deload_recommended,
            weekly_load,
            average_rpe,
            days_since_last_session,
            monotony,
            strain,
            readiness,
            overtraining,
            deload,
        }
    }
}

/// One athlete's inputs for batch reporting
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AthleteHistory {
    pub athlete: String,
    pub sessions: Vec<WorkoutSession>,
    #[serde(default)]
    pub inputs: SubjectiveInputs,
}

/// A report tagged with the athlete it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteReport {
    pub athlete: String,
    pub report: FatigueReport,
}

/// Build reports for many athletes on the rayon thread pool.
///
/// All reports share one reference instant, resolved before the fan-out.
/// Output order matches input order.
pub fn build_reports_parallel(
    histories: &[AthleteHistory],
    as_of: Option<DateTime<Utc>>,
    config: &EngineConfig,
) -> Vec<AthleteReport> {
    let now = SessionAggregator::reference_time(as_of);

    info!(athletes = histories.len(), "building fatigue reports in parallel");

    histories
        .par_iter()
        .map(|history| AthleteReport {
            athlete: history.athlete.clone(),
            report: FatigueReport::build(&history.sessions, &history.inputs, Some(now), config),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskLevel;
    use chrono::{Duration, TimeZone};

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 1, 12, 0, 0).unwrap()
    }

    fn daily_sessions(days: i64, volume: f64, rpe: f64) -> Vec<WorkoutSession> {
        (0..days)
            .rev()
            .map(|d| WorkoutSession::new(volume, as_of() - Duration::days(d)).with_intensity(rpe))
            .collect()
    }

    #[test]
    fn test_empty_history_uses_defaults() {
        let report = FatigueReport::build(
            &[],
            &SubjectiveInputs::default(),
            Some(as_of()),
            &EngineConfig::default(),
        );

        assert_eq!(report.acwr, 0.0);
        assert_eq!(report.average_rpe, DEFAULT_AVERAGE_RPE);
        assert_eq!(report.days_since_last_session, DEFAULT_DAYS_SINCE_LAST_SESSION);
        assert!(report.deload_recommended);
        assert!(!report.monotony.sufficient_data);
        // low ratio (10) and extended break (10)
        assert_eq!(report.readiness.score, 80);
        assert!(report.deload.is_some());
    }

    #[test]
    fn test_steady_history_needs_no_deload() {
        let sessions = daily_sessions(28, 1000.0, 6.0);
        let report = FatigueReport::build(
            &sessions,
            &SubjectiveInputs::default(),
            Some(as_of()),
            &EngineConfig::default(),
        );

        assert_eq!(report.session_count, 28);
        assert_eq!(report.weekly_load, 8000.0);
        assert_eq!(report.average_rpe, 6.0);
        assert_eq!(report.days_since_last_session, 0);
        assert!(!report.deload_recommended);
        assert!(report.deload.is_none());
        assert_eq!(report.monotony.risk, RiskLevel::High);
        assert_eq!(report.zone, AcwrZone::Optimal);
    }

    #[test]
    fn test_spike_produces_deload_protocol() {
        let mut sessions: Vec<WorkoutSession> = (8..28)
            .rev()
            .map(|d| WorkoutSession::new(500.0, as_of() - Duration::days(d)).with_intensity(7.0))
            .collect();
        sessions.extend(daily_sessions(7, 3000.0, 9.5));

        let report = FatigueReport::build(
            &sessions,
            &SubjectiveInputs::default(),
            Some(as_of()),
            &EngineConfig::default(),
        );

        assert!(report.acwr > 1.8);
        assert_eq!(report.zone, AcwrZone::HighRisk);
        assert!(!report.readiness.ready);
        let protocol = report.deload.unwrap();
        assert_eq!(protocol.volume_reduction, 0.5);
        assert_eq!(protocol.duration_days, 7);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let config = EngineConfig::default();
        let histories: Vec<AthleteHistory> = (1..=8)
            .map(|i| AthleteHistory {
                athlete: format!("athlete-{}", i),
                sessions: daily_sessions(i * 3, 400.0 * i as f64, 5.0 + (i % 4) as f64),
                inputs: SubjectiveInputs::default(),
            })
            .collect();

        let reports = build_reports_parallel(&histories, Some(as_of()), &config);

        assert_eq!(reports.len(), histories.len());
        for (history, tagged) in histories.iter().zip(&reports) {
            assert_eq!(tagged.athlete, history.athlete);
            let sequential =
                FatigueReport::build(&history.sessions, &history.inputs, Some(as_of()), &config);
            assert_eq!(tagged.report, sequential);
        }
    }

    #[test]
    fn test_report_serializes_lowercase_enums() {
        let report = FatigueReport::build(
            &daily_sessions(10, 1000.0, 8.5),
            &SubjectiveInputs::default(),
            Some(as_of()),
            &EngineConfig::default(),
        );
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains("\"suggested_intensity\":\"light\""));
        assert!(json.contains("\"zone\":\"high-risk\""));
        assert!(json.contains("\"risk\":\"high\""));
    }
}
