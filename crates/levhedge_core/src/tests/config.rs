//! Configuration invariant tests

use crate::config::StrategyConfig;
use crate::error::ConfigError;

fn build(
    initial_capital: f64,
    hedged_weight: f64,
    unhedged_weight: f64,
    annual_hedge_cost: f64,
) -> Result<StrategyConfig, ConfigError> {
    StrategyConfig::new(
        initial_capital,
        hedged_weight,
        unhedged_weight,
        1.3,
        1.3,
        0.9,
        -0.30,
        annual_hedge_cost,
        12,
    )
}

#[test]
fn test_default_config_is_valid() {
    let config = StrategyConfig::default();
    assert_eq!(config.hedged_weight + config.unhedged_weight, 1.0);
    assert!((config.period_hedge_cost() - 0.0025).abs() < 1e-12);
}

#[test]
fn test_weights_must_sum_to_one() {
    let err = build(100_000.0, 0.7, 0.4, 0.03).unwrap_err();
    assert!(matches!(err, ConfigError::WeightsDoNotSumToOne { .. }));
}

#[test]
fn test_weights_must_be_in_range() {
    let err = build(100_000.0, 1.5, -0.5, 0.03).unwrap_err();
    assert!(matches!(err, ConfigError::WeightOutOfRange { .. }));
}

#[test]
fn test_capital_must_be_positive() {
    assert_eq!(
        build(0.0, 0.7, 0.3, 0.03).unwrap_err(),
        ConfigError::NonPositiveCapital(0.0)
    );
    assert_eq!(
        build(-5.0, 0.7, 0.3, 0.03).unwrap_err(),
        ConfigError::NonPositiveCapital(-5.0)
    );
}

#[test]
fn test_hedge_cost_must_be_non_negative() {
    assert_eq!(
        build(100_000.0, 0.7, 0.3, -0.01).unwrap_err(),
        ConfigError::NegativeHedgeCost(-0.01)
    );
}

#[test]
fn test_periods_per_year_must_be_positive() {
    let err = StrategyConfig::new(100_000.0, 0.7, 0.3, 1.3, 1.3, 0.9, -0.30, 0.03, 0).unwrap_err();
    assert_eq!(err, ConfigError::ZeroPeriodsPerYear);
}

#[test]
fn test_all_or_nothing_allocations_are_valid() {
    assert!(build(100_000.0, 1.0, 0.0, 0.03).is_ok());
    assert!(build(100_000.0, 0.0, 1.0, 0.0).is_ok());
}

#[test]
fn test_unhedged_variant() {
    let config = StrategyConfig::default();
    let variant = config.as_unhedged_variant();

    assert_eq!(variant.hedged_weight, 0.0);
    assert_eq!(variant.unhedged_weight, 1.0);
    assert_eq!(variant.annual_hedge_cost, 0.0);
    // Everything else carries through unchanged.
    assert_eq!(variant.initial_capital, config.initial_capital);
    assert_eq!(variant.unhedged_leverage, config.unhedged_leverage);
    assert_eq!(variant.crash_floor, config.crash_floor);
    assert_eq!(variant.periods_per_year, config.periods_per_year);

    // The variant is independently valid and the source is untouched.
    assert_eq!(config.hedged_weight, 0.7);
    assert!(
        StrategyConfig::new(
            variant.initial_capital,
            variant.hedged_weight,
            variant.unhedged_weight,
            variant.unhedged_leverage,
            variant.hedged_up_beta,
            variant.hedged_down_beta,
            variant.crash_floor,
            variant.annual_hedge_cost,
            variant.periods_per_year,
        )
        .is_ok()
    );
}
