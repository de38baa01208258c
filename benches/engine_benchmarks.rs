use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use loadrs::models::{SubjectiveInputs, WorkoutSession};
use loadrs::{
    build_reports_parallel, AthleteHistory, EngineConfig, FatigueReport, MonotonyAnalyzer,
    OvertrainingDetector, WorkloadCalculator,
};

/// Benchmarks for the analysis engine
///
/// Every calculation is linear in the number of sessions; these check that it
/// stays that way as histories grow.

fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 18, 0, 0).unwrap()
}

fn create_session_history(count: usize) -> Vec<WorkoutSession> {
    (0..count as i64)
        .rev()
        .map(|i| {
            WorkoutSession::new(
                2000.0 + (i % 7) as f64 * 250.0,
                reference_time() - Duration::hours(i * 20),
            )
            .with_intensity(6.0 + (i % 4) as f64)
        })
        .collect()
}

fn bench_workload_ratio(c: &mut Criterion) {
    let mut group = c.benchmark_group("Workload Ratio");
    let calculator = WorkloadCalculator::new();

    for &size in &[10, 100, 1000, 10000] {
        let sessions = create_session_history(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::new("calculate_acwr", size),
            &sessions,
            |b, sessions| {
                b.iter(|| calculator.calculate_acwr(black_box(sessions), Some(reference_time())));
            },
        );
    }

    group.finish();
}

fn bench_monotony_and_overtraining(c: &mut Criterion) {
    let mut group = c.benchmark_group("Monotony and Overtraining");
    let analyzer = MonotonyAnalyzer::new();
    let detector = OvertrainingDetector::new();
    let inputs = SubjectiveInputs {
        mood_score: Some(4.0),
        resting_heart_rate: Some(62.0),
        baseline_heart_rate: Some(55.0),
        ..SubjectiveInputs::default()
    };

    for &size in &[10, 1000] {
        let sessions = create_session_history(size);

        group.bench_with_input(
            BenchmarkId::new("calculate_monotony", size),
            &sessions,
            |b, sessions| {
                b.iter(|| analyzer.calculate_monotony(black_box(sessions)));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("check_indicators", size),
            &sessions,
            |b, sessions| {
                b.iter(|| {
                    detector.check_indicators(black_box(sessions), &inputs, Some(reference_time()))
                });
            },
        );
    }

    group.finish();
}

fn bench_fatigue_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("Fatigue Report");
    let config = EngineConfig::default();
    let inputs = SubjectiveInputs::default();

    for &size in &[30, 365] {
        let sessions = create_session_history(size);

        group.bench_with_input(BenchmarkId::new("build", size), &sessions, |b, sessions| {
            b.iter(|| {
                FatigueReport::build(black_box(sessions), &inputs, Some(reference_time()), &config)
            });
        });
    }

    for &athletes in &[10, 100] {
        let histories: Vec<AthleteHistory> = (0..athletes)
            .map(|i| AthleteHistory {
                athlete: format!("athlete-{}", i),
                sessions: create_session_history(120),
                inputs: SubjectiveInputs::default(),
            })
            .collect();

        group.throughput(Throughput::Elements(athletes as u64));
        group.bench_with_input(
            BenchmarkId::new("build_reports_parallel", athletes),
            &histories,
            |b, histories| {
                b.iter(|| {
                    build_reports_parallel(black_box(histories), Some(reference_time()), &config)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_workload_ratio,
    bench_monotony_and_overtraining,
    bench_fatigue_report
);
criterion_main!(benches);
