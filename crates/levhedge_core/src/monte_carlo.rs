//! Bootstrap Monte Carlo simulation.
//!
//! Each path resamples the historical return series i.i.d. with
//! replacement (no parametric distribution assumed), runs a fresh
//! buy-and-hold simulation over the resampled sequence, and records the
//! outcome. Paths share no mutable state, so the batch parallelizes
//! trivially; with the default `parallel` feature they run on rayon.
//!
//! Per-path RNGs are seeded deterministically from the base seed and the
//! path id, so a batch reproduces exactly for a given seed regardless of
//! how many threads execute it or in what order paths complete.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::{Deserialize, Serialize};

use crate::config::StrategyConfig;
use crate::metrics;
use crate::portfolio::PathState;
use crate::series::ReturnSeries;

/// Parameters for one Monte Carlo batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloParams {
    /// Number of independent paths
    pub n_paths: usize,
    /// Resampled periods per path
    pub n_days: usize,
    /// Run the configured strategy (`true`) or its zero-hedge
    /// 0%/100% variant (`false`)
    pub hedged: bool,
    /// Base seed; identical seed and inputs reproduce identical results
    pub seed: u64,
}

/// Outcome of a single simulated path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathOutcome {
    pub path_id: usize,
    pub final_equity: f64,
    pub total_return: f64,
    /// Undefined (`None`) only for a zero-length path
    pub max_drawdown: Option<f64>,
}

/// Distribution summary of one outcome column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionStats {
    pub median: f64,
    pub p5: f64,
    pub p95: f64,
    pub mean: f64,
}

/// Summary statistics over a whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloSummary {
    pub final_equity: DistributionStats,
    /// Sample standard deviation of final equity; `None` below two paths
    pub final_equity_std: Option<f64>,
    pub total_return: DistributionStats,
    /// `None` when no path produced a defined drawdown
    pub max_drawdown: Option<DistributionStats>,
}

/// Bootstrap Monte Carlo driver over a historical return series.
#[derive(Debug, Clone)]
pub struct MonteCarloSimulator {
    returns: ReturnSeries,
    config: StrategyConfig,
}

impl MonteCarloSimulator {
    #[must_use]
    pub fn new(returns: ReturnSeries, config: StrategyConfig) -> Self {
        Self { returns, config }
    }

    /// Run a batch of independent bootstrap paths.
    ///
    /// Returns one outcome row per requested path, ordered by path id.
    /// An empty historical series yields an empty batch: there is nothing
    /// to resample from.
    #[must_use]
    pub fn run(&self, params: &MonteCarloParams) -> Vec<PathOutcome> {
        if self.returns.is_empty() {
            return Vec::new();
        }

        let sim_config = if params.hedged {
            self.config.clone()
        } else {
            self.config.as_unhedged_variant()
        };
        let values = self.returns.values();

        let simulate = |path_id: usize| -> PathOutcome {
            let mut rng = SmallRng::seed_from_u64(path_seed(params.seed, path_id as u64));
            simulate_path(path_id, &values, params.n_days, &sim_config, &mut rng)
        };

        #[cfg(feature = "parallel")]
        let mut outcomes: Vec<PathOutcome> =
            (0..params.n_paths).into_par_iter().map(simulate).collect();
        #[cfg(not(feature = "parallel"))]
        let mut outcomes: Vec<PathOutcome> = (0..params.n_paths).map(simulate).collect();

        outcomes.sort_by_key(|o| o.path_id);
        outcomes
    }

    /// Summary statistics over a batch; `None` for an empty batch.
    #[must_use]
    pub fn summary(outcomes: &[PathOutcome]) -> Option<MonteCarloSummary> {
        if outcomes.is_empty() {
            return None;
        }

        let equities: Vec<f64> = outcomes.iter().map(|o| o.final_equity).collect();
        let returns: Vec<f64> = outcomes.iter().map(|o| o.total_return).collect();
        let drawdowns: Vec<f64> = outcomes.iter().filter_map(|o| o.max_drawdown).collect();

        Some(MonteCarloSummary {
            final_equity: distribution_stats(&equities)?,
            final_equity_std: metrics::sample_std(&equities),
            total_return: distribution_stats(&returns)?,
            max_drawdown: distribution_stats(&drawdowns),
        })
    }
}

/// Resample and simulate one path.
fn simulate_path(
    path_id: usize,
    historical: &[f64],
    n_days: usize,
    config: &StrategyConfig,
    rng: &mut SmallRng,
) -> PathOutcome {
    let mut state = PathState::new(config);

    // Track the drawdown over emitted totals as the path compounds, the
    // same running-peak scan the metrics library applies to a full path.
    let mut running_max = f64::NEG_INFINITY;
    let mut worst_drawdown = f64::INFINITY;

    for _ in 0..n_days {
        let draw = historical[rng.random_range(0..historical.len())];
        state.step(draw, config);

        let total = state.total_value();
        if total > running_max {
            running_max = total;
        }
        let drawdown = (total - running_max) / running_max;
        if drawdown < worst_drawdown {
            worst_drawdown = drawdown;
        }
    }

    let final_equity = state.total_value();
    PathOutcome {
        path_id,
        final_equity,
        total_return: final_equity / config.initial_capital - 1.0,
        max_drawdown: (n_days > 0).then_some(worst_drawdown),
    }
}

/// Deterministic per-path seed derivation (SplitMix64 mix).
fn path_seed(base_seed: u64, path_id: u64) -> u64 {
    let mut z = base_seed.wrapping_add(path_id.wrapping_mul(0x9e37_79b9_7f4a_7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

fn distribution_stats(values: &[f64]) -> Option<DistributionStats> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    Some(DistributionStats {
        median: metrics::median(&sorted)?,
        p5: metrics::percentile(&sorted, 0.05)?,
        p95: metrics::percentile(&sorted, 0.95)?,
        mean: metrics::mean(&sorted)?,
    })
}
