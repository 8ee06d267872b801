//! Real-time portfolio tracking.
//!
//! Drives the core's [`LiveTracker`] one day at a time, persisting state
//! in an append-only CSV log so tracking continues across process
//! restarts. Guards against weekend runs, duplicate daily updates, and
//! implausible price jumps; raises safety alerts on outsized moves.
//!
//! Fetching the quote itself is out of scope: today's closing price
//! arrives as an argument, supplied by whatever quote source the caller
//! wires up.

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, eyre};
use jiff::civil::{Date, Weekday};
use serde::{Deserialize, Serialize};

use levhedge_core::{LiveTracker, StrategyConfig};

/// Largest one-day index move accepted before refusing to update.
const PRICE_SANITY_LIMIT: f64 = 0.10;
/// Daily portfolio move that triggers an alert.
const DAILY_RETURN_ALERT: f64 = 0.05;
/// Fraction of initial capital below which an equity warning fires.
const EQUITY_WARN_FRACTION: f64 = 0.80;

/// One persisted row of the real-time log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackerRow {
    pub date: Date,
    pub equity: f64,
    pub hedged_value: f64,
    pub unhedged_value: f64,
    pub hedged_weight: f64,
    pub unhedged_weight: f64,
    pub index_price: f64,
    pub index_return: f64,
    pub excess_return: f64,
}

/// Inputs for one tracking update.
#[derive(Debug, Clone, Copy)]
pub struct TrackRequest {
    /// Today's index closing price
    pub price_today: f64,
    /// Yesterday's close, required only when no log state exists yet
    pub previous_price: Option<f64>,
    pub date: Date,
    /// Compute and print without appending to the log
    pub dry_run: bool,
}

/// What a tracking run did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackOutcome {
    /// Non-trading day, nothing to do
    SkippedWeekend,
    /// The log already has a row for this date
    AlreadyUpdated,
    /// The price moved implausibly far; state left untouched
    SanityCheckFailed { change: f64 },
    /// State advanced by one day
    Updated(TrackerRow),
}

/// Run one real-time update against the state log.
pub fn run_track(
    config: &StrategyConfig,
    request: &TrackRequest,
    log_path: &Path,
) -> Result<TrackOutcome> {
    if matches!(
        request.date.weekday(),
        Weekday::Saturday | Weekday::Sunday
    ) {
        tracing::info!("weekend ({}), skipping update", request.date);
        return Ok(TrackOutcome::SkippedWeekend);
    }

    let previous = load_last_row(log_path)?;

    if let Some(last) = &previous
        && last.date == request.date
    {
        tracing::info!("already updated for {}, skipping", request.date);
        return Ok(TrackOutcome::AlreadyUpdated);
    }

    let (mut tracker, price_yesterday, equity_yesterday) = match &previous {
        Some(last) => (
            LiveTracker::restore(config.clone(), last.hedged_value, last.unhedged_value),
            last.index_price,
            last.equity,
        ),
        None => {
            let price = request.previous_price.ok_or_else(|| {
                eyre!("no tracking state at {}; pass --previous-price to start", log_path.display())
            })?;
            tracing::info!("no previous state, starting a fresh portfolio");
            (
                LiveTracker::new(config.clone()),
                price,
                config.initial_capital,
            )
        }
    };

    // Refuse obviously bad quotes rather than corrupting the state log.
    let price_change = request.price_today / price_yesterday - 1.0;
    if price_change.abs() > PRICE_SANITY_LIMIT {
        tracing::error!(
            "price sanity check failed: {} -> {} ({:+.2}%), not updating",
            price_yesterday,
            request.price_today,
            price_change * 100.0
        );
        return Ok(TrackOutcome::SanityCheckFailed {
            change: price_change,
        });
    }

    let snapshot = tracker.update(request.price_today, price_yesterday, request.date);

    let portfolio_return = if equity_yesterday > 0.0 {
        snapshot.equity / equity_yesterday - 1.0
    } else {
        0.0
    };
    let row = TrackerRow {
        date: snapshot.date,
        equity: snapshot.equity,
        hedged_value: snapshot.hedged_value,
        unhedged_value: snapshot.unhedged_value,
        hedged_weight: snapshot.hedged_weight,
        unhedged_weight: snapshot.unhedged_weight,
        index_price: request.price_today,
        index_return: snapshot.index_return,
        excess_return: portfolio_return - snapshot.index_return,
    };

    if portfolio_return.abs() > DAILY_RETURN_ALERT {
        tracing::warn!(
            "daily portfolio return {:+.2}% exceeds alert threshold",
            portfolio_return * 100.0
        );
    }
    if snapshot.equity < config.initial_capital * EQUITY_WARN_FRACTION {
        tracing::warn!(
            "equity {:.2} below {:.0}% of initial capital",
            snapshot.equity,
            EQUITY_WARN_FRACTION * 100.0
        );
    }

    if request.dry_run {
        tracing::info!("dry run, not writing to {}", log_path.display());
    } else {
        append_row(log_path, &row)?;
    }

    Ok(TrackOutcome::Updated(row))
}

/// Read the most recent row of the state log, if any.
pub fn load_last_row(path: &Path) -> Result<Option<TrackerRow>> {
    if !path.exists() {
        return Ok(None);
    }

    let mut reader = csv::Reader::from_path(path)
        .wrap_err_with(|| format!("failed to open {}", path.display()))?;
    let mut last = None;
    for row in reader.deserialize::<TrackerRow>() {
        last = Some(row.wrap_err_with(|| format!("corrupt row in {}", path.display()))?);
    }
    Ok(last)
}

/// Append one row, creating the file with a header on first write.
pub fn append_row(path: &Path, row: &TrackerRow) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
    }

    let file_exists = path.exists();
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .wrap_err_with(|| format!("failed to open {}", path.display()))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);
    writer.serialize(row)?;
    writer.flush()?;

    tracing::info!("logged {} to {}", row.date, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use tempfile::tempdir;

    fn request(price: f64, previous: Option<f64>, day: Date) -> TrackRequest {
        TrackRequest {
            price_today: price,
            previous_price: previous,
            date: day,
            dry_run: false,
        }
    }

    #[test]
    fn test_first_run_requires_previous_price() {
        let dir = tempdir().unwrap();
        let log = dir.path().join("log.csv");
        let config = StrategyConfig::default();

        // 2025-06-02 is a Monday.
        let err = run_track(&config, &request(100.0, None, date(2025, 6, 2)), &log);
        assert!(err.is_err());
    }

    #[test]
    fn test_update_appends_and_restores() {
        let dir = tempdir().unwrap();
        let log = dir.path().join("log.csv");
        let config = StrategyConfig::default();

        let first = run_track(
            &config,
            &request(10_200.0, Some(10_000.0), date(2025, 6, 2)),
            &log,
        )
        .unwrap();
        let TrackOutcome::Updated(first_row) = first else {
            panic!("expected update, got {first:?}");
        };
        assert!((first_row.index_return - 0.02).abs() < 1e-12);

        // Second invocation restores from the log and continues.
        let second = run_track(
            &config,
            &request(10_100.0, None, date(2025, 6, 3)),
            &log,
        )
        .unwrap();
        let TrackOutcome::Updated(second_row) = second else {
            panic!("expected update, got {second:?}");
        };
        assert!(second_row.index_return < 0.0);

        let last = load_last_row(&log).unwrap().unwrap();
        assert_eq!(last, second_row);

        // Equity chains across sessions: the second day compounds the
        // first day's sleeve values, not a fresh portfolio.
        let mut continuous = LiveTracker::new(config.clone());
        continuous.update(10_200.0, 10_000.0, date(2025, 6, 2));
        let expected = continuous.update(10_100.0, 10_200.0, date(2025, 6, 3));
        assert!((second_row.equity - expected.equity).abs() < 1e-6);
    }

    #[test]
    fn test_duplicate_day_is_skipped() {
        let dir = tempdir().unwrap();
        let log = dir.path().join("log.csv");
        let config = StrategyConfig::default();

        run_track(
            &config,
            &request(10_200.0, Some(10_000.0), date(2025, 6, 2)),
            &log,
        )
        .unwrap();
        let outcome = run_track(&config, &request(10_300.0, None, date(2025, 6, 2)), &log).unwrap();
        assert_eq!(outcome, TrackOutcome::AlreadyUpdated);
    }

    #[test]
    fn test_weekend_is_skipped() {
        let dir = tempdir().unwrap();
        let log = dir.path().join("log.csv");
        let config = StrategyConfig::default();

        // 2025-06-07 is a Saturday.
        let outcome = run_track(
            &config,
            &request(10_000.0, Some(10_000.0), date(2025, 6, 7)),
            &log,
        )
        .unwrap();
        assert_eq!(outcome, TrackOutcome::SkippedWeekend);
        assert!(!log.exists());
    }

    #[test]
    fn test_price_jump_fails_sanity_check() {
        let dir = tempdir().unwrap();
        let log = dir.path().join("log.csv");
        let config = StrategyConfig::default();

        let outcome = run_track(
            &config,
            &request(12_000.0, Some(10_000.0), date(2025, 6, 2)),
            &log,
        )
        .unwrap();
        assert!(matches!(
            outcome,
            TrackOutcome::SanityCheckFailed { .. }
        ));
        // The refused update leaves no state behind.
        assert!(load_last_row(&log).unwrap().is_none());
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let dir = tempdir().unwrap();
        let log = dir.path().join("log.csv");
        let config = StrategyConfig::default();

        let outcome = run_track(
            &config,
            &TrackRequest {
                price_today: 10_100.0,
                previous_price: Some(10_000.0),
                date: date(2025, 6, 2),
                dry_run: true,
            },
            &log,
        )
        .unwrap();
        assert!(matches!(outcome, TrackOutcome::Updated(_)));
        assert!(!log.exists());
    }

    #[test]
    fn test_excess_return_is_portfolio_minus_index() {
        let dir = tempdir().unwrap();
        let log = dir.path().join("log.csv");
        let config = StrategyConfig::default();

        let outcome = run_track(
            &config,
            &request(10_200.0, Some(10_000.0), date(2025, 6, 2)),
            &log,
        )
        .unwrap();
        let TrackOutcome::Updated(row) = outcome else {
            panic!("expected update");
        };

        let portfolio_return = row.equity / config.initial_capital - 1.0;
        assert!((row.excess_return - (portfolio_return - row.index_return)).abs() < 1e-12);
    }
}
