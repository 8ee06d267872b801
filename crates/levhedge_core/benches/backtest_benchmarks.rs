//! Criterion benchmarks for levhedge_core simulation
//!
//! Run with: cargo bench -p levhedge_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use jiff::ToSpan;
use jiff::civil::date;
use levhedge_core::monte_carlo::{MonteCarloParams, MonteCarloSimulator};
use levhedge_core::portfolio::Portfolio;
use levhedge_core::series::{Observation, ReturnSeries};
use levhedge_core::{MetricsReport, StrategyConfig};

/// Deterministic pseudo-random daily returns, roughly +/-2%.
fn synthetic_series(periods: usize) -> ReturnSeries {
    let start = date(2015, 1, 2);
    let mut state: u64 = 0x9e3779b97f4a7c15;
    let observations = (0..periods)
        .map(|i| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let unit = (state >> 11) as f64 / (1u64 << 53) as f64;
            Observation {
                date: start.saturating_add((i as i64).days()),
                value: (unit - 0.5) * 0.04,
            }
        })
        .collect();
    ReturnSeries::new(observations).unwrap()
}

fn bench_run_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_path");
    let config = StrategyConfig::default();

    for periods in [252, 2_520] {
        let series = synthetic_series(periods);
        let portfolio = Portfolio::new(config.clone());

        group.bench_with_input(BenchmarkId::new("buy_and_hold", periods), &series, |b, s| {
            b.iter(|| black_box(portfolio.run_path(s)));
        });
        group.bench_with_input(BenchmarkId::new("rebalanced", periods), &series, |b, s| {
            b.iter(|| black_box(portfolio.run_path_rebalanced(s, 21)));
        });
    }
    group.finish();
}

fn bench_report(c: &mut Criterion) {
    let config = StrategyConfig::default();
    let path = Portfolio::new(config.clone()).run_path(&synthetic_series(2_520));

    c.bench_function("metrics_report", |b| {
        b.iter(|| black_box(MetricsReport::from_path(&path, &config)));
    });
}

fn bench_monte_carlo(c: &mut Criterion) {
    let simulator = MonteCarloSimulator::new(synthetic_series(1_000), StrategyConfig::default());
    let params = MonteCarloParams {
        n_paths: 200,
        n_days: 252,
        hedged: true,
        seed: 42,
    };

    c.bench_function("monte_carlo_200x252", |b| {
        b.iter(|| black_box(simulator.run(&params)));
    });
}

criterion_group!(benches, bench_run_path, bench_report, bench_monte_carlo);
criterion_main!(benches);
