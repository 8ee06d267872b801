//! Strategy configuration for the leveraged hedged overlay.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tolerance for the weights-sum-to-one invariant check.
const WEIGHT_SUM_EPSILON: f64 = 1e-9;

/// Immutable parameter bundle for the overlay strategy.
///
/// Constructed once per run and shared read-only across simulation paths.
/// The invariants (weights summing to 1, weights in [0, 1], positive
/// capital) are enforced at construction via [`StrategyConfig::new`] and
/// never re-checked downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Starting portfolio value in dollars
    pub initial_capital: f64,
    /// Allocation to the hedged sleeve (0.0 to 1.0)
    pub hedged_weight: f64,
    /// Allocation to the unhedged sleeve (0.0 to 1.0)
    pub unhedged_weight: f64,
    /// Leverage multiplier for the unhedged sleeve
    pub unhedged_leverage: f64,
    /// Hedged sleeve beta in up markets
    pub hedged_up_beta: f64,
    /// Hedged sleeve beta in ordinary down markets
    pub hedged_down_beta: f64,
    /// Floor return once the crash branch engages (negative decimal)
    pub crash_floor: f64,
    /// Annual cost of hedging as a decimal (0.03 = 3% p.a.)
    pub annual_hedge_cost: f64,
    /// Return periods per year (12 for monthly data, 252 for daily)
    pub periods_per_year: u32,
}

impl StrategyConfig {
    /// Build a validated configuration.
    ///
    /// Fails fast on any invariant violation; an invalid config is never
    /// silently corrected.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        initial_capital: f64,
        hedged_weight: f64,
        unhedged_weight: f64,
        unhedged_leverage: f64,
        hedged_up_beta: f64,
        hedged_down_beta: f64,
        crash_floor: f64,
        annual_hedge_cost: f64,
        periods_per_year: u32,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            initial_capital,
            hedged_weight,
            unhedged_weight,
            unhedged_leverage,
            hedged_up_beta,
            hedged_down_beta,
            crash_floor,
            annual_hedge_cost,
            periods_per_year,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if (self.hedged_weight + self.unhedged_weight - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(ConfigError::WeightsDoNotSumToOne {
                hedged: self.hedged_weight,
                unhedged: self.unhedged_weight,
            });
        }
        if !(0.0..=1.0).contains(&self.hedged_weight) {
            return Err(ConfigError::WeightOutOfRange {
                name: "hedged weight",
                value: self.hedged_weight,
            });
        }
        if !(0.0..=1.0).contains(&self.unhedged_weight) {
            return Err(ConfigError::WeightOutOfRange {
                name: "unhedged weight",
                value: self.unhedged_weight,
            });
        }
        if self.initial_capital <= 0.0 {
            return Err(ConfigError::NonPositiveCapital(self.initial_capital));
        }
        if self.annual_hedge_cost < 0.0 {
            return Err(ConfigError::NegativeHedgeCost(self.annual_hedge_cost));
        }
        if self.periods_per_year == 0 {
            return Err(ConfigError::ZeroPeriodsPerYear);
        }
        Ok(())
    }

    /// Hedge cost charged per return period.
    #[must_use]
    pub fn period_hedge_cost(&self) -> f64 {
        self.annual_hedge_cost / f64::from(self.periods_per_year)
    }

    /// The 0%/100% zero-hedge-cost variant used for unhedged-mode
    /// Monte Carlo runs.
    ///
    /// Leverage, betas, and floor carry through unchanged; the hedged
    /// branch parameters become moot because nothing is allocated to the
    /// hedged sleeve.
    #[must_use]
    pub fn as_unhedged_variant(&self) -> Self {
        Self {
            hedged_weight: 0.0,
            unhedged_weight: 1.0,
            annual_hedge_cost: 0.0,
            ..self.clone()
        }
    }
}

impl Default for StrategyConfig {
    /// The reference parameterization: 70/30 split, 1.3x leverage,
    /// 1.3/0.9 betas, -30% crash floor, 3% p.a. hedge cost, monthly data.
    fn default() -> Self {
        Self {
            initial_capital: 100_000.0,
            hedged_weight: 0.7,
            unhedged_weight: 0.3,
            unhedged_leverage: 1.3,
            hedged_up_beta: 1.3,
            hedged_down_beta: 0.9,
            crash_floor: -0.30,
            annual_hedge_cost: 0.03,
            periods_per_year: 12,
        }
    }
}
