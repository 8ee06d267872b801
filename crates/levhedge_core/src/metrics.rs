//! Performance statistics over value and return series.
//!
//! Every function is pure and total over its domain: when a statistic is
//! mathematically undefined for the given input (empty series, zero
//! volatility, no drawdown, ...) it returns `None` rather than panicking,
//! and that sentinel propagates through reporting and Monte Carlo
//! aggregation without aborting a batch.

use serde::{Deserialize, Serialize};

/// The full set of statistics computed for one value series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub cagr: Option<f64>,
    pub max_drawdown: Option<f64>,
    pub sharpe: Option<f64>,
    pub volatility: Option<f64>,
    pub sortino: Option<f64>,
    pub calmar: Option<f64>,
    pub final_value: Option<f64>,
    pub total_return: Option<f64>,
}

/// Simple percent-change return series derived from a value series.
///
/// The first element of the value series has no predecessor and produces
/// no return, so the output has one fewer entry than the input.
#[must_use]
pub fn pct_changes(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|pair| pair[1] / pair[0] - 1.0)
        .collect()
}

/// Compound annual growth rate.
///
/// Undefined for an empty series, a non-positive start or end value, or a
/// non-positive elapsed time.
#[must_use]
pub fn cagr(values: &[f64], periods_per_year: u32) -> Option<f64> {
    let (first, last) = (values.first()?, values.last()?);
    if *first <= 0.0 || *last <= 0.0 || periods_per_year == 0 {
        return None;
    }
    let years = values.len() as f64 / f64::from(periods_per_year);
    Some((last / first).powf(1.0 / years) - 1.0)
}

/// Maximum peak-to-trough decline, as a non-positive decimal.
///
/// More negative is worse; a monotonically rising series yields 0.
#[must_use]
pub fn max_drawdown(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut running_max = f64::NEG_INFINITY;
    let mut worst = f64::INFINITY;
    for &v in values {
        if v > running_max {
            running_max = v;
        }
        let drawdown = (v - running_max) / running_max;
        if drawdown < worst {
            worst = drawdown;
        }
    }
    // A zero (or NaN) running peak makes every drawdown ratio NaN.
    worst.is_finite().then_some(worst)
}

/// Annualized sample volatility of a per-period return series.
#[must_use]
pub fn volatility(returns: &[f64], periods_per_year: u32) -> Option<f64> {
    let period_vol = sample_std(returns)?;
    Some(period_vol * f64::from(periods_per_year).sqrt())
}

/// Annualized Sharpe ratio.
///
/// The annual risk-free rate is converted to a per-period rate by simple
/// division and subtracted from every return. Undefined when the excess
/// return standard deviation is zero or cannot be estimated.
#[must_use]
pub fn sharpe(returns: &[f64], periods_per_year: u32, risk_free_annual: f64) -> Option<f64> {
    if returns.is_empty() || periods_per_year == 0 {
        return None;
    }
    let rf_period = risk_free_annual / f64::from(periods_per_year);
    let excess: Vec<f64> = returns.iter().map(|r| r - rf_period).collect();

    let mu = mean(&excess)?;
    let sigma = sample_std(&excess)?;
    if sigma == 0.0 {
        return None;
    }

    let ppy = f64::from(periods_per_year);
    Some((mu * ppy) / (sigma * ppy.sqrt()))
}

/// Annualized Sortino ratio.
///
/// Like Sharpe, but the denominator is the root-mean-square of only the
/// excess returns strictly below `target`. Undefined when no return falls
/// below the target or the downside RMS is zero.
#[must_use]
pub fn sortino(
    returns: &[f64],
    periods_per_year: u32,
    risk_free_annual: f64,
    target: f64,
) -> Option<f64> {
    if returns.is_empty() || periods_per_year == 0 {
        return None;
    }
    let rf_period = risk_free_annual / f64::from(periods_per_year);
    let excess: Vec<f64> = returns.iter().map(|r| r - rf_period).collect();

    let downside: Vec<f64> = excess.iter().copied().filter(|r| *r < target).collect();
    if downside.is_empty() {
        return None;
    }
    let downside_rms =
        (downside.iter().map(|r| r * r).sum::<f64>() / downside.len() as f64).sqrt();
    if downside_rms == 0.0 {
        return None;
    }

    let mu = mean(&excess)?;
    let ppy = f64::from(periods_per_year);
    Some((mu * ppy) / (downside_rms * ppy.sqrt()))
}

/// Calmar ratio: CAGR over the magnitude of maximum drawdown.
///
/// Undefined when either input is undefined or no drawdown occurred
/// (including the exactly-flat path, where `max_drawdown == 0`).
#[must_use]
pub fn calmar(cagr: Option<f64>, max_drawdown: Option<f64>) -> Option<f64> {
    let dd = max_drawdown?;
    if dd >= 0.0 {
        return None;
    }
    Some(cagr? / dd.abs())
}

/// Compute the full [`MetricsRecord`] for one value series.
///
/// Returns are derived from the values by simple percent change (the
/// first, undefined, element is dropped).
#[must_use]
pub fn compute_all(values: &[f64], periods_per_year: u32, risk_free_annual: f64) -> MetricsRecord {
    let returns = pct_changes(values);

    let cagr_value = cagr(values, periods_per_year);
    let max_dd = max_drawdown(values);

    MetricsRecord {
        cagr: cagr_value,
        max_drawdown: max_dd,
        sharpe: sharpe(&returns, periods_per_year, risk_free_annual),
        volatility: volatility(&returns, periods_per_year),
        sortino: sortino(&returns, periods_per_year, risk_free_annual, 0.0),
        calmar: calmar(cagr_value, max_dd),
        final_value: values.last().copied(),
        total_return: match (values.first(), values.last()) {
            (Some(first), Some(last)) if *first != 0.0 => Some(last / first - 1.0),
            _ => None,
        },
    }
}

// ============================================================================
// Shared statistics helpers
// ============================================================================

/// Arithmetic mean; `None` for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
///
/// `None` with fewer than two observations.
#[must_use]
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mu = mean(values)?;
    let variance =
        values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Linear-interpolation quantile of a **sorted** sample.
///
/// `q` is in [0, 1]. Matches the conventional default quantile estimator:
/// the target rank is `q * (n - 1)` and values between ranks are linearly
/// interpolated.
#[must_use]
pub fn percentile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let rank = q * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return Some(sorted[lower]);
    }
    let fraction = rank - lower as f64;
    Some(sorted[lower] + fraction * (sorted[upper] - sorted[lower]))
}

/// Median of a **sorted** sample.
#[must_use]
pub fn median(sorted: &[f64]) -> Option<f64> {
    percentile(sorted, 0.5)
}
