use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single logged training session, as supplied by the caller.
///
/// Sessions carry no identity beyond their position in the caller's sequence.
/// The engine borrows them and never mutates or stores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    /// Total tonnage for the session (sum of weight × reps across all sets)
    pub volume: f64,

    /// When the session took place
    pub date: DateTime<Utc>,

    /// Average Rating of Perceived Exertion for the session (conventionally 0-10)
    #[serde(default)]
    pub intensity: Option<f64>,

    /// Session length in minutes
    #[serde(default)]
    pub duration: Option<u32>,
}

impl WorkoutSession {
    /// Create a session with only the required fields
    pub fn new(volume: f64, date: DateTime<Utc>) -> Self {
        WorkoutSession {
            volume,
            date,
            intensity: None,
            duration: None,
        }
    }

    /// Attach an average RPE to the session
    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = Some(intensity);
        self
    }

    /// Attach a duration in minutes to the session
    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration = Some(minutes);
        self
    }
}

/// Risk tiers shared by the monotony, strain and overtraining analyzers.
///
/// `Critical` is only produced by strain analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Moderate => write!(f, "moderate"),
            RiskLevel::High => write!(f, "high"),
            RiskLevel::Critical => write!(f, "critical"),
        }
    }
}

/// Intensity the athlete should train at today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestedIntensity {
    Light,
    Moderate,
    Heavy,
}

impl fmt::Display for SuggestedIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuggestedIntensity::Light => write!(f, "light"),
            SuggestedIntensity::Moderate => write!(f, "moderate"),
            SuggestedIntensity::Heavy => write!(f, "heavy"),
        }
    }
}

/// Optional self-reported and physiological inputs.
///
/// Values are passed through unvalidated; out-of-range numbers are compared
/// against the same thresholds as in-range ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectiveInputs {
    /// Sleep quality on a 1-10 scale
    pub sleep_quality: Option<f64>,

    /// Muscle soreness on a 1-10 scale
    pub soreness: Option<f64>,

    /// Mood on a 1-10 scale
    pub mood_score: Option<f64>,

    /// Motivation on a 1-10 scale
    pub motivation_score: Option<f64>,

    /// Morning resting heart rate in bpm
    pub resting_heart_rate: Option<f64>,

    /// Personal baseline resting heart rate in bpm
    pub baseline_heart_rate: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_session_builder() {
        let date = Utc.with_ymd_and_hms(2024, 9, 23, 18, 0, 0).unwrap();
        let session = WorkoutSession::new(4200.0, date)
            .with_intensity(7.5)
            .with_duration(65);

        assert_eq!(session.volume, 4200.0);
        assert_eq!(session.intensity, Some(7.5));
        assert_eq!(session.duration, Some(65));
    }

    #[test]
    fn test_session_deserializes_without_optional_fields() {
        let json = r#"{"volume": 1500.0, "date": "2024-09-23T18:00:00Z"}"#;
        let session: WorkoutSession = serde_json::from_str(json).unwrap();

        assert_eq!(session.volume, 1500.0);
        assert!(session.intensity.is_none());
        assert!(session.duration.is_none());
    }

    #[test]
    fn test_enum_serialization_is_lowercase() {
        assert_eq!(serde_json::to_string(&RiskLevel::Critical).unwrap(), "\"critical\"");
        assert_eq!(
            serde_json::to_string(&SuggestedIntensity::Heavy).unwrap(),
            "\"heavy\""
        );
        assert_eq!(RiskLevel::Moderate.to_string(), "moderate");
    }

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Moderate);
        assert!(RiskLevel::High < RiskLevel::Critical);
    }
}
