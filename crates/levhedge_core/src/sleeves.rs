//! Sleeve return mapping.
//!
//! The portfolio is split into two sleeves whose per-period returns are
//! derived from the same benchmark observation via different rules:
//! - **Hedged**: asymmetric beta exposure with a crash floor
//! - **Unhedged**: plain leveraged exposure
//!
//! Both mappings are pure and Markovian: only the current period's index
//! return and the static configuration matter.

use crate::config::StrategyConfig;

/// Index decline beyond which the hedged sleeve's crash branch engages.
///
/// Distinct from [`StrategyConfig::crash_floor`], which is the payoff once
/// the branch engages. A return of exactly -30% still uses the down-market
/// formula.
pub const CRASH_THRESHOLD: f64 = -0.30;

/// The closed set of portfolio sleeves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sleeve {
    Hedged,
    Unhedged,
}

impl Sleeve {
    /// Map one period's index return to this sleeve's return.
    ///
    /// Hedged sleeve, branches evaluated top to bottom:
    /// - `R > 0`: `hedged_up_beta * R - period_hedge_cost`
    /// - `CRASH_THRESHOLD <= R <= 0`: `hedged_down_beta * R - period_hedge_cost`
    /// - `R < CRASH_THRESHOLD`: `crash_floor`, with no hedge cost deducted
    ///   (the floor is the terminal payoff once the backstop engages)
    ///
    /// Unhedged sleeve: `unhedged_leverage * R` for all `R`.
    #[must_use]
    pub fn map(self, r_index: f64, config: &StrategyConfig) -> f64 {
        match self {
            Sleeve::Hedged => {
                if r_index > 0.0 {
                    config.hedged_up_beta * r_index - config.period_hedge_cost()
                } else if r_index >= CRASH_THRESHOLD {
                    config.hedged_down_beta * r_index - config.period_hedge_cost()
                } else {
                    config.crash_floor
                }
            }
            Sleeve::Unhedged => config.unhedged_leverage * r_index,
        }
    }
}
