//! Integration tests for the overlay simulation engine
//!
//! Tests are organized by topic:
//! - `config` - Configuration invariants and variants
//! - `sleeves` - Sleeve return mapping branches and boundaries
//! - `portfolio` - Path simulation, rebalancing, degenerate states
//! - `tracker` - Real-time continuation and state restoration
//! - `metrics` - Metric round-trips over simulated paths
//! - `monte_carlo` - Bootstrap batch determinism and aggregation

use jiff::ToSpan;
use jiff::civil::{Date, date};

use crate::series::{Observation, ReturnSeries};

mod config;
mod tracker;

/// Build a series of consecutive daily observations from raw returns.
fn daily_series(returns: &[f64]) -> ReturnSeries {
    let start: Date = date(2024, 1, 2);
    let observations = returns
        .iter()
        .enumerate()
        .map(|(i, &value)| Observation {
            date: start.saturating_add((i as i64).days()),
            value,
        })
        .collect();
    ReturnSeries::new(observations).unwrap()
}
