//! Portfolio simulation.
//!
//! Three operating modes share one per-period compounding step:
//! - **Full path** ([`Portfolio::run_path`]): buy-and-hold over a whole
//!   return series, sleeve weights drifting freely.
//! - **Rebalanced path** ([`Portfolio::run_path_rebalanced`]): the same,
//!   with the sleeves reset to their target weights every N periods.
//! - **Real-time continuation** ([`LiveTracker`]): one step at a time
//!   against persistent state, for incremental live tracking.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::config::StrategyConfig;
use crate::series::ReturnSeries;
use crate::sleeves::Sleeve;

/// One emitted period of a simulated path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathRecord {
    pub date: Date,
    pub index_value: f64,
    pub hedged_value: f64,
    pub unhedged_value: f64,
    pub total_value: f64,
    pub hedged_weight: f64,
    pub unhedged_weight: f64,
}

/// Apply one period's index return to both sleeve values in place.
///
/// This is the single compounding primitive shared by every simulation
/// mode; the two values always move together.
fn compound_sleeves(
    hedged_value: &mut f64,
    unhedged_value: &mut f64,
    r_index: f64,
    config: &StrategyConfig,
) {
    *hedged_value *= 1.0 + Sleeve::Hedged.map(r_index, config);
    *unhedged_value *= 1.0 + Sleeve::Unhedged.map(r_index, config);
}

/// Current sleeve weights, derived from the values.
///
/// Weights are never stored independently; they are always recomputed
/// from the sleeve values so they cannot drift out of sync. A
/// non-positive total is a legitimate (if degenerate) state under
/// leverage, and reports both weights as zero rather than dividing.
fn derive_weights(hedged_value: f64, unhedged_value: f64) -> (f64, f64) {
    let total = hedged_value + unhedged_value;
    if total > 0.0 {
        (hedged_value / total, unhedged_value / total)
    } else {
        (0.0, 0.0)
    }
}

/// Mutable compounding state for one path run.
///
/// Owned exclusively by the path functions below for the duration of a
/// run; the three scalars only ever evolve together through
/// [`PathState::step`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct PathState {
    pub index_value: f64,
    pub hedged_value: f64,
    pub unhedged_value: f64,
}

impl PathState {
    pub(crate) fn new(config: &StrategyConfig) -> Self {
        Self {
            index_value: 1.0,
            hedged_value: config.initial_capital * config.hedged_weight,
            unhedged_value: config.initial_capital * config.unhedged_weight,
        }
    }

    /// Advance the state by one index return.
    pub(crate) fn step(&mut self, r_index: f64, config: &StrategyConfig) {
        self.index_value *= 1.0 + r_index;
        compound_sleeves(
            &mut self.hedged_value,
            &mut self.unhedged_value,
            r_index,
            config,
        );
    }

    /// Reset both sleeves to their target share of the current total.
    pub(crate) fn rebalance(&mut self, config: &StrategyConfig) {
        let total = self.total_value();
        self.hedged_value = total * config.hedged_weight;
        self.unhedged_value = total * config.unhedged_weight;
    }

    pub(crate) fn total_value(&self) -> f64 {
        self.hedged_value + self.unhedged_value
    }

    fn record(&self, date: Date) -> PathRecord {
        let (hedged_weight, unhedged_weight) =
            derive_weights(self.hedged_value, self.unhedged_value);
        PathRecord {
            date,
            index_value: self.index_value,
            hedged_value: self.hedged_value,
            unhedged_value: self.unhedged_value,
            total_value: self.total_value(),
            hedged_weight,
            unhedged_weight,
        }
    }
}

/// Stateless full-path simulator.
///
/// Every run starts fresh from config-derived initial values; nothing is
/// retained between runs. For stateful incremental tracking use
/// [`LiveTracker`] instead.
#[derive(Debug, Clone)]
pub struct Portfolio {
    config: StrategyConfig,
}

impl Portfolio {
    #[must_use]
    pub fn new(config: StrategyConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Buy-and-hold simulation over the whole series (no rebalancing).
    ///
    /// Emits one record per period in chronological order; an empty
    /// series yields an empty path.
    #[must_use]
    pub fn run_path(&self, returns: &ReturnSeries) -> Vec<PathRecord> {
        let mut state = PathState::new(&self.config);
        returns
            .observations()
            .iter()
            .map(|obs| {
                state.step(obs.value, &self.config);
                state.record(obs.date)
            })
            .collect()
    }

    /// Simulation with periodic rebalancing every `rebalance_frequency`
    /// periods.
    ///
    /// Periods are counted from 1; the rebalance happens immediately
    /// after the step of every period whose counter is an exact multiple
    /// of the frequency, and that period's record reflects the
    /// post-rebalance values.
    #[must_use]
    pub fn run_path_rebalanced(
        &self,
        returns: &ReturnSeries,
        rebalance_frequency: usize,
    ) -> Vec<PathRecord> {
        let mut state = PathState::new(&self.config);
        returns
            .observations()
            .iter()
            .enumerate()
            .map(|(i, obs)| {
                state.step(obs.value, &self.config);
                if rebalance_frequency > 0 && (i + 1) % rebalance_frequency == 0 {
                    state.rebalance(&self.config);
                }
                state.record(obs.date)
            })
            .collect()
    }
}

/// Snapshot returned by one real-time update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiveSnapshot {
    pub date: Date,
    /// Total portfolio equity after the step
    pub equity: f64,
    pub hedged_value: f64,
    pub unhedged_value: f64,
    /// The realized index return implied by the two price observations
    pub index_return: f64,
    pub hedged_weight: f64,
    pub unhedged_weight: f64,
}

/// Persistent single-step tracker for real-time continuation.
///
/// Unlike [`Portfolio`], this owns mutable sleeve values that survive
/// across calls. A caller that needs continuation across process
/// restarts persists the two sleeve values itself and rebuilds the
/// tracker with [`LiveTracker::restore`]. The update step is not
/// idempotent; a concurrent caller must serialize calls against one
/// instance.
#[derive(Debug, Clone)]
pub struct LiveTracker {
    config: StrategyConfig,
    hedged_value: f64,
    unhedged_value: f64,
}

impl LiveTracker {
    /// Start tracking from the config-derived initial allocation.
    #[must_use]
    pub fn new(config: StrategyConfig) -> Self {
        let hedged_value = config.initial_capital * config.hedged_weight;
        let unhedged_value = config.initial_capital * config.unhedged_weight;
        Self {
            config,
            hedged_value,
            unhedged_value,
        }
    }

    /// Resume tracking from externally persisted sleeve values.
    #[must_use]
    pub fn restore(config: StrategyConfig, hedged_value: f64, unhedged_value: f64) -> Self {
        Self {
            config,
            hedged_value,
            unhedged_value,
        }
    }

    #[must_use]
    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    #[must_use]
    pub fn hedged_value(&self) -> f64 {
        self.hedged_value
    }

    #[must_use]
    pub fn unhedged_value(&self) -> f64 {
        self.unhedged_value
    }

    #[must_use]
    pub fn equity(&self) -> f64 {
        self.hedged_value + self.unhedged_value
    }

    /// Apply one day of performance from two consecutive price
    /// observations, mutating the persistent state in place.
    pub fn update(&mut self, price_today: f64, price_yesterday: f64, date: Date) -> LiveSnapshot {
        let index_return = price_today / price_yesterday - 1.0;
        compound_sleeves(
            &mut self.hedged_value,
            &mut self.unhedged_value,
            index_return,
            &self.config,
        );
        let (hedged_weight, unhedged_weight) =
            derive_weights(self.hedged_value, self.unhedged_value);

        LiveSnapshot {
            date,
            equity: self.equity(),
            hedged_value: self.hedged_value,
            unhedged_value: self.unhedged_value,
            index_return,
            hedged_weight,
            unhedged_weight,
        }
    }
}
