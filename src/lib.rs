// Library interface for LoadRS
// The engine modules are pure; import, config and logging form the shell around them

pub mod aggregator;
pub mod config;
pub mod deload;
pub mod error;
pub mod import;
pub mod logging;
pub mod models;
pub mod monotony;
pub mod overtraining;
pub mod periodization;
pub mod readiness;
pub mod report;
pub mod workload;

// Re-export commonly used types for convenience
pub use models::*;
pub use aggregator::{SessionAggregator, WindowConfig, WorkloadWindow};
pub use config::EngineConfig;
pub use deload::{DeloadGenerator, DeloadProtocol};
pub use monotony::{MonotonyAnalysis, MonotonyAnalyzer, StrainAnalysis};
pub use overtraining::{OvertrainingAssessment, OvertrainingDetector};
pub use periodization::{
    PeakEstimate, PeriodizationPhase, PeriodizationScheduler, TaperPhase, TrainingPhase,
};
pub use readiness::{ReadinessScorer, RecoveryReadiness};
pub use report::{build_reports_parallel, AthleteHistory, AthleteReport, FatigueReport};
pub use workload::{AcwrZone, WorkloadCalculator};
pub use import::{SessionFormat, SessionImporter};
pub use error::{ImportError, LoadRsError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};
