//! Real-time continuation tests

use jiff::civil::date;

use crate::config::StrategyConfig;
use crate::portfolio::{LiveTracker, Portfolio};

use super::daily_series;

#[test]
fn test_single_update_matches_one_path_step() {
    let config = StrategyConfig::default();
    let mut tracker = LiveTracker::new(config.clone());

    // 10_200 / 10_000 - 1 = 2%
    let snapshot = tracker.update(10_200.0, 10_000.0, date(2025, 6, 2));
    assert!((snapshot.index_return - 0.02).abs() < 1e-12);

    let path = Portfolio::new(config).run_path(&daily_series(&[0.02]));
    let record = &path[0];

    assert!((snapshot.equity - record.total_value).abs() < 1e-9);
    assert!((snapshot.hedged_value - record.hedged_value).abs() < 1e-9);
    assert!((snapshot.unhedged_value - record.unhedged_value).abs() < 1e-9);
    assert!((snapshot.hedged_weight - record.hedged_weight).abs() < 1e-12);
}

#[test]
fn test_incremental_updates_replay_a_full_path() {
    let config = StrategyConfig::default();
    let returns = [0.015, -0.032, 0.007, -0.35, 0.021];

    // Drive the tracker with a price series implying exactly `returns`.
    let mut tracker = LiveTracker::new(config.clone());
    let mut price = 10_000.0;
    let mut last_snapshot = None;
    for (i, r) in returns.iter().enumerate() {
        let next_price = price * (1.0 + r);
        last_snapshot = Some(tracker.update(
            next_price,
            price,
            date(2025, 6, 2).saturating_add(jiff::Span::new().days(i as i64)),
        ));
        price = next_price;
    }

    let path = Portfolio::new(config).run_path(&daily_series(&returns));
    let final_record = path.last().unwrap();
    let snapshot = last_snapshot.unwrap();

    assert!((snapshot.equity - final_record.total_value).abs() < 1e-6);
    assert!((snapshot.hedged_value - final_record.hedged_value).abs() < 1e-6);
    assert!((snapshot.unhedged_value - final_record.unhedged_value).abs() < 1e-6);
}

#[test]
fn test_restore_continues_where_a_previous_session_stopped() {
    let config = StrategyConfig::default();

    let mut continuous = LiveTracker::new(config.clone());
    continuous.update(101.0, 100.0, date(2025, 6, 2));
    continuous.update(99.0, 101.0, date(2025, 6, 3));

    // Simulate a process restart after the first update by persisting
    // and restoring the two sleeve values.
    let mut session_one = LiveTracker::new(config.clone());
    session_one.update(101.0, 100.0, date(2025, 6, 2));
    let (hedged, unhedged) = (session_one.hedged_value(), session_one.unhedged_value());
    drop(session_one);

    let mut session_two = LiveTracker::restore(config, hedged, unhedged);
    let snapshot = session_two.update(99.0, 101.0, date(2025, 6, 3));

    assert_eq!(snapshot.equity, continuous.equity());
    assert_eq!(snapshot.hedged_value, continuous.hedged_value());
    assert_eq!(snapshot.unhedged_value, continuous.unhedged_value());
}

#[test]
fn test_tracker_state_is_separate_from_batch_runs() {
    let config = StrategyConfig::default();
    let mut tracker = LiveTracker::new(config.clone());
    tracker.update(105.0, 100.0, date(2025, 6, 2));
    let equity_after_update = tracker.equity();

    // A batch run on the side must not disturb the live state.
    let portfolio = Portfolio::new(config);
    portfolio.run_path(&daily_series(&[-0.10, -0.10, -0.10]));

    assert_eq!(tracker.equity(), equity_after_update);
}

#[test]
fn test_flat_price_still_charges_hedge_cost() {
    let config = StrategyConfig::default();
    let mut tracker = LiveTracker::new(config.clone());
    let snapshot = tracker.update(100.0, 100.0, date(2025, 6, 2));

    assert_eq!(snapshot.index_return, 0.0);
    // Zero routes to the down branch, so the hedged sleeve pays the
    // period cost while the unhedged sleeve is unchanged.
    let expected_hedged = config.initial_capital
        * config.hedged_weight
        * (1.0 - config.period_hedge_cost());
    assert!((snapshot.hedged_value - expected_hedged).abs() < 1e-9);
    assert!(
        (snapshot.unhedged_value - config.initial_capital * config.unhedged_weight).abs() < 1e-9
    );
}
