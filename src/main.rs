use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use colored::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing::{error, info, warn};

use loadrs::error::ErrorSeverity;
use loadrs::logging::{init_logging, LogConfig, LogLevel};
use loadrs::{
    build_reports_parallel, AcwrZone, AthleteHistory, DeloadGenerator, DeloadProtocol,
    EngineConfig, FatigueReport, LoadRsError, MonotonyAnalyzer, OvertrainingDetector,
    PeriodizationScheduler, ReadinessScorer, RecoveryReadiness, RiskLevel, SessionAggregator,
    SessionFormat, SessionImporter, SubjectiveInputs, WorkloadCalculator, WorkloadWindow,
    WorkoutSession,
};

/// LoadRS - Training Load & Fatigue Analysis CLI
///
/// Turns a strength-training session history into workload ratio, monotony,
/// strain, recovery readiness, overtraining risk and deload guidance.
#[derive(Parser)]
#[command(name = "loadrs")]
#[command(author = "LoadRS Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Training Load & Fatigue Analysis CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Acute:chronic workload ratio and deload trigger
    Acwr {
        #[command(flatten)]
        input: SessionArgs,
    },

    /// Training monotony over the most recent sessions
    Monotony {
        #[command(flatten)]
        input: SessionArgs,
    },

    /// Training strain from monotony and weekly load
    Strain {
        /// Monotony value
        #[arg(short, long)]
        monotony: f64,

        /// Total volume of the last seven days
        #[arg(short, long)]
        weekly_load: f64,
    },

    /// Recovery readiness score
    Readiness {
        /// Acute:chronic workload ratio
        #[arg(long)]
        acwr: f64,

        /// Average RPE of recent sessions
        #[arg(long)]
        rpe: f64,

        /// Days since the last session
        #[arg(long)]
        days: u32,

        /// Sleep quality (0-10)
        #[arg(long)]
        sleep: Option<f64>,

        /// Muscle soreness (0-10)
        #[arg(long)]
        soreness: Option<f64>,
    },

    /// Overtraining risk indicators
    Overtraining {
        #[command(flatten)]
        input: SessionArgs,

        #[command(flatten)]
        subjective: SubjectiveArgs,
    },

    /// Deload protocol for the given fatigue signals
    Deload {
        /// Acute:chronic workload ratio
        #[arg(long)]
        acwr: f64,

        /// Average RPE of recent sessions
        #[arg(long)]
        rpe: f64,
    },

    /// Mesocycle phase for the number of weeks trained
    Periodize {
        /// Weeks since the start of the program
        #[arg(short, long)]
        weeks: u32,
    },

    /// Countdown to a target event
    Peak {
        /// Event date (YYYY-MM-DD or RFC 3339)
        #[arg(short, long)]
        target: String,

        /// Current weekly load
        #[arg(short, long, default_value = "0")]
        load: f64,

        /// Reference date, defaults to now
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Full fatigue report; several files are analyzed in parallel
    Report {
        /// Session history files (CSV or JSON), one per athlete
        #[arg(short, long, num_args = 1.., required = true)]
        sessions: Vec<PathBuf>,

        /// File format (auto-detect if not specified)
        #[arg(short = 'f', long)]
        format: Option<String>,

        /// Sort sessions by date before analysis
        #[arg(long)]
        sort: bool,

        /// Reference date, defaults to now
        #[arg(long)]
        as_of: Option<String>,

        #[command(flatten)]
        subjective: SubjectiveArgs,
    },
}

#[derive(Args)]
struct SessionArgs {
    /// Session history file (CSV or JSON)
    #[arg(short, long)]
    sessions: PathBuf,

    /// File format (auto-detect if not specified)
    #[arg(short = 'f', long)]
    format: Option<String>,

    /// Sort sessions by date before analysis
    #[arg(long)]
    sort: bool,

    /// Reference date (YYYY-MM-DD or RFC 3339), defaults to now
    #[arg(long)]
    as_of: Option<String>,
}

#[derive(Args)]
struct SubjectiveArgs {
    /// Sleep quality (0-10)
    #[arg(long)]
    sleep: Option<f64>,

    /// Muscle soreness (0-10)
    #[arg(long)]
    soreness: Option<f64>,

    /// Mood (0-10)
    #[arg(long)]
    mood: Option<f64>,

    /// Motivation (0-10)
    #[arg(long)]
    motivation: Option<f64>,

    /// Resting heart rate this morning
    #[arg(long)]
    resting_hr: Option<f64>,

    /// Usual resting heart rate
    #[arg(long)]
    baseline_hr: Option<f64>,
}

impl From<&SubjectiveArgs> for SubjectiveInputs {
    fn from(args: &SubjectiveArgs) -> Self {
        SubjectiveInputs {
            sleep_quality: args.sleep,
            soreness: args.soreness,
            mood_score: args.mood,
            motivation_score: args.motivation,
            resting_heart_rate: args.resting_hr,
            baseline_heart_rate: args.baseline_hr,
        }
    }
}

#[derive(Serialize)]
struct AcwrOutput {
    acwr: f64,
    zone: AcwrZone,
    deload_recommended: bool,
    window: WorkloadWindow,
}

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct AthleteRow {
    #[tabled(rename = "Athlete")]
    athlete: String,
    #[tabled(rename = "Sessions")]
    sessions: usize,
    #[tabled(rename = "ACWR")]
    acwr: String,
    #[tabled(rename = "Monotony")]
    monotony: String,
    #[tabled(rename = "Strain")]
    strain: String,
    #[tabled(rename = "Readiness")]
    readiness: u8,
    #[tabled(rename = "Overtraining")]
    overtraining: RiskLevel,
    #[tabled(rename = "Deload")]
    deload: &'static str,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig {
        level: LogLevel::from_verbosity(cli.verbose),
        ..LogConfig::default()
    };
    init_logging(&log_config)?;

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Acwr { input } => {
            let sessions = load_sessions(&input.sessions, input.format.as_deref(), input.sort)?;
            let as_of = parse_optional_date(input.as_of.as_deref())?;

            let calculator =
                WorkloadCalculator::with_config(config.windows.clone(), config.workload.clone());
            let window = SessionAggregator::with_config(config.windows.clone())
                .windows(&sessions, as_of);
            let acwr = calculator.ratio_from_window(&window);
            let output = AcwrOutput {
                acwr,
                zone: calculator.classify(acwr),
                deload_recommended: calculator.recommend_deload(acwr),
                window,
            };

            if cli.json {
                print_json(&output)?;
            } else {
                println!("{}", "Acute:Chronic Workload Ratio".blue().bold());
                println!(
                    "  Acute average:   {:.1} / day ({} sessions)",
                    window.acute_average, window.acute_sessions
                );
                println!(
                    "  Chronic average: {:.1} / day ({} sessions)",
                    window.chronic_average, window.chronic_sessions
                );
                println!("  ACWR: {}", zone_colored(output.zone, acwr));
                println!("  {}", output.zone.recommendation());
                if output.deload_recommended {
                    println!("{}", "  Deload recommended".yellow().bold());
                }
            }
        }

        Commands::Monotony { input } => {
            let sessions = load_sessions(&input.sessions, input.format.as_deref(), input.sort)?;
            let analyzer =
                MonotonyAnalyzer::with_config(config.monotony.clone(), config.strain.clone());
            let analysis = analyzer.calculate_monotony(&sessions);

            if cli.json {
                print_json(&analysis)?;
            } else {
                println!("{}", "Training Monotony".cyan().bold());
                println!(
                    "  Monotony: {:.2} ({})",
                    analysis.monotony,
                    risk_colored(analysis.risk)
                );
                println!("  {}", analysis.recommendation);
            }
        }

        Commands::Strain {
            monotony,
            weekly_load,
        } => {
            let analyzer =
                MonotonyAnalyzer::with_config(config.monotony.clone(), config.strain.clone());
            let analysis = analyzer.calculate_strain(monotony, weekly_load);

            if cli.json {
                print_json(&analysis)?;
            } else {
                println!("{}", "Training Strain".cyan().bold());
                println!(
                    "  Strain: {:.0} ({})",
                    analysis.strain,
                    risk_colored(analysis.risk)
                );
                println!("  {}", analysis.recommendation);
            }
        }

        Commands::Readiness {
            acwr,
            rpe,
            days,
            sleep,
            soreness,
        } => {
            let readiness = ReadinessScorer::with_config(config.readiness.clone())
                .assess(acwr, rpe, days, sleep, soreness);

            if cli.json {
                print_json(&readiness)?;
            } else {
                print_readiness(&readiness);
            }
        }

        Commands::Overtraining { input, subjective } => {
            let sessions = load_sessions(&input.sessions, input.format.as_deref(), input.sort)?;
            let as_of = parse_optional_date(input.as_of.as_deref())?;
            let assessment = OvertrainingDetector::with_config(config.overtraining.clone())
                .check_indicators(&sessions, &SubjectiveInputs::from(&subjective), as_of);

            if cli.json {
                print_json(&assessment)?;
            } else {
                println!("{}", "Overtraining Risk".magenta().bold());
                println!(
                    "  Risk: {} (score {})",
                    risk_colored(assessment.risk),
                    assessment.risk_score
                );
                for indicator in &assessment.indicators {
                    println!("  • {}", indicator);
                }
                println!("  {}", assessment.recommendation);
            }
        }

        Commands::Deload { acwr, rpe } => {
            let protocol =
                DeloadGenerator::with_config(config.deload.clone()).suggest_protocol(acwr, rpe);

            if cli.json {
                print_json(&protocol)?;
            } else {
                print_deload(&protocol);
            }
        }

        Commands::Periodize { weeks } => {
            let phase = PeriodizationScheduler::with_config(config.periodization.clone())
                .recommend_periodization(weeks);

            if cli.json {
                print_json(&phase)?;
            } else {
                println!("{}", "Periodization".green().bold());
                println!(
                    "  Week {} of the mesocycle: {} ({} weeks, {} remaining)",
                    phase.cycle_position + 1,
                    phase.phase.to_string().bold(),
                    phase.duration,
                    phase.weeks_remaining
                );
                println!("  Focus: {}", phase.focus);
                println!("  Reps: {}", phase.rep_range);
                println!("  Intensity: {}", phase.intensity_range);
            }
        }

        Commands::Peak {
            target,
            load,
            as_of,
        } => {
            let target = parse_date(&target)?;
            let as_of = parse_optional_date(as_of.as_deref())?;
            let estimate = PeriodizationScheduler::with_config(config.periodization.clone())
                .estimate_time_to_peak(load, target, as_of);

            if cli.json {
                print_json(&estimate)?;
            } else {
                println!("{}", "Peak Planning".green().bold());
                println!(
                    "  {} weeks to target: {}",
                    estimate.weeks_to_target,
                    estimate.current_phase.to_string().bold()
                );
                println!("  {}", estimate.recommendation);
            }
        }

        Commands::Report {
            sessions,
            format,
            sort,
            as_of,
            subjective,
        } => {
            let as_of = parse_optional_date(as_of.as_deref())?;
            let inputs = SubjectiveInputs::from(&subjective);

            if let [path] = sessions.as_slice() {
                let history = load_sessions(path, format.as_deref(), sort)?;
                let report = FatigueReport::build(&history, &inputs, as_of, &config);

                if cli.json {
                    print_json(&report)?;
                } else {
                    print_report(&report);
                }
            } else {
                let histories = sessions
                    .iter()
                    .map(|path| {
                        Ok(AthleteHistory {
                            athlete: athlete_name(path),
                            sessions: load_sessions(path, format.as_deref(), sort)?,
                            inputs: inputs.clone(),
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                let reports = build_reports_parallel(&histories, as_of, &config);

                if cli.json {
                    print_json(&reports)?;
                } else {
                    let rows = reports.iter().map(|tagged| {
                        let r = &tagged.report;
                        AthleteRow {
                            athlete: tagged.athlete.clone(),
                            sessions: r.session_count,
                            acwr: format!("{:.2}", r.acwr),
                            monotony: format!("{:.2}", r.monotony.monotony),
                            strain: format!("{:.0}", r.strain.strain),
                            readiness: r.readiness.score,
                            overtraining: r.overtraining.risk,
                            deload: if r.deload_recommended { "yes" } else { "no" },
                        }
                    });
                    println!("{}", "Team Fatigue Report".blue().bold());
                    println!("{}", Table::new(rows).with(Style::rounded()));
                }
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EngineConfig::load_or_default(),
    };

    let problems = config.validate();
    if !problems.is_empty() {
        for problem in &problems {
            error!(problem = %problem, "invalid configuration");
        }
        return Err(LoadRsError::Configuration(problems.join("; ")).into());
    }

    Ok(config)
}

fn load_sessions(path: &Path, format: Option<&str>, sort: bool) -> Result<Vec<WorkoutSession>> {
    let format = format
        .map(str::parse::<SessionFormat>)
        .transpose()
        .map_err(import_failure)?;
    let mut sessions = SessionImporter::new()
        .import_file(path, format)
        .map_err(import_failure)?;

    if sort {
        sessions.sort_by_key(|s| s.date);
    }
    info!(path = %path.display(), sessions = sessions.len(), "loaded sessions");

    Ok(sessions)
}

fn import_failure(err: LoadRsError) -> anyhow::Error {
    match err.severity() {
        ErrorSeverity::Warning => warn!(error = %err, "session import failed"),
        ErrorSeverity::Error => error!(error = %err, "session import failed"),
    }
    anyhow::anyhow!(err.user_message())
}

fn athlete_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

fn parse_date(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}': expected YYYY-MM-DD or RFC 3339", value))?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .with_context(|| format!("Invalid date '{}'", value))
}

fn parse_optional_date(value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    value.map(parse_date).transpose()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn risk_colored(risk: RiskLevel) -> ColoredString {
    let label = risk.to_string();
    match risk {
        RiskLevel::Low => label.green(),
        RiskLevel::Moderate => label.yellow(),
        RiskLevel::High => label.red(),
        RiskLevel::Critical => label.red().bold(),
    }
}

fn zone_colored(zone: AcwrZone, acwr: f64) -> ColoredString {
    let label = format!("{:.2} - {}", acwr, zone.description());
    match zone {
        AcwrZone::Optimal => label.green(),
        AcwrZone::Undertrained | AcwrZone::Caution => label.yellow(),
        AcwrZone::HighRisk => label.red().bold(),
    }
}

fn readiness_colored(score: u8) -> ColoredString {
    let label = format!("{}/100", score);
    match score {
        80..=100 => label.green(),
        60..=79 => label.yellow(),
        _ => label.red(),
    }
}

fn print_readiness(readiness: &RecoveryReadiness) {
    println!("{}", "Recovery Readiness".green().bold());
    println!(
        "  Score: {} - {} ({} intensity)",
        readiness_colored(readiness.score),
        if readiness.ready {
            "ready".green()
        } else {
            "not ready".red()
        },
        readiness.suggested_intensity
    );
    for factor in &readiness.factors {
        println!("  -{:>3}  {}", factor.magnitude, factor.reason.dimmed());
    }
    println!("  {}", readiness.recommendation);
}

fn print_deload(protocol: &DeloadProtocol) {
    println!("{}", "Deload Protocol".yellow().bold());
    println!(
        "  Reduce volume by {:.0}% and intensity by {:.0}% for {} days",
        protocol.volume_reduction * 100.0,
        protocol.intensity_reduction * 100.0,
        protocol.duration_days
    );
    for guidance in &protocol.exercises {
        println!("  • {}", guidance);
    }
}

fn print_report(report: &FatigueReport) {
    println!(
        "{} {}",
        "Fatigue Report".blue().bold(),
        format!("({} sessions, as of {})", report.session_count, report.as_of.format("%Y-%m-%d"))
            .dimmed()
    );

    let rows = vec![
        MetricRow {
            metric: "ACWR",
            value: format!("{:.2}", report.acwr),
            status: report.zone.description().to_string(),
        },
        MetricRow {
            metric: "Weekly load",
            value: format!("{:.0}", report.weekly_load),
            status: String::new(),
        },
        MetricRow {
            metric: "Monotony",
            value: format!("{:.2}", report.monotony.monotony),
            status: report.monotony.risk.to_string(),
        },
        MetricRow {
            metric: "Strain",
            value: format!("{:.0}", report.strain.strain),
            status: report.strain.risk.to_string(),
        },
        MetricRow {
            metric: "Readiness",
            value: report.readiness.score.to_string(),
            status: report.readiness.suggested_intensity.to_string(),
        },
        MetricRow {
            metric: "Overtraining",
            value: report.overtraining.risk_score.to_string(),
            status: report.overtraining.risk.to_string(),
        },
    ];
    println!("{}", Table::new(rows).with(Style::rounded()));

    println!();
    println!("  ACWR: {}", zone_colored(report.zone, report.acwr));
    println!("  Monotony: {}", report.monotony.recommendation);
    println!("  Strain: {}", report.strain.recommendation);
    println!();
    print_readiness(&report.readiness);
    println!();
    println!(
        "{} {}",
        "Overtraining Risk:".magenta().bold(),
        risk_colored(report.overtraining.risk)
    );
    for indicator in &report.overtraining.indicators {
        println!("  • {}", indicator);
    }

    if let Some(protocol) = &report.deload {
        println!();
        print_deload(protocol);
    }
}
