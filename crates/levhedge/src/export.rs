//! Result export.
//!
//! Writes the core's computed records to flat tabular files: the path
//! time series, the wide metrics table, Monte Carlo outcome tables, and
//! the human-readable summaries. Every write is atomic.

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, eyre};

use levhedge_core::monte_carlo::PathOutcome;
use levhedge_core::portfolio::PathRecord;
use levhedge_core::report::{Component, MetricsReport};

use crate::io::{atomic_write, atomic_write_bytes};

/// Save the simulated path as CSV, mirroring the path record schema.
pub fn save_timeseries(path: &Path, records: &[PathRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    write_csv(path, writer)
}

/// Save the wide metrics table: one row per metric, one column per
/// component. Undefined statistics become empty cells.
pub fn save_metrics_table(path: &Path, report: &MetricsReport) -> Result<()> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["metric"];
    header.extend(Component::ALL.iter().map(|c| c.name()));
    writer.write_record(&header)?;

    for (metric, values) in report.wide_rows() {
        let mut row = vec![metric.to_string()];
        row.extend(
            values
                .iter()
                .map(|v| v.map_or_else(String::new, |v| v.to_string())),
        );
        writer.write_record(&row)?;
    }
    write_csv(path, writer)
}

/// Save the structured report view as JSON.
pub fn save_metrics_json(path: &Path, report: &MetricsReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    atomic_write(path, &json).wrap_err_with(|| format!("failed to write {}", path.display()))
}

/// Save Monte Carlo outcome rows as CSV.
pub fn save_outcomes(path: &Path, outcomes: &[PathOutcome]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for outcome in outcomes {
        writer.serialize(outcome)?;
    }
    write_csv(path, writer)
}

/// Save a rendered text or Markdown summary.
pub fn save_summary(path: &Path, content: &str) -> Result<()> {
    atomic_write(path, content).wrap_err_with(|| format!("failed to write {}", path.display()))
}

fn write_csv(path: &Path, writer: csv::Writer<Vec<u8>>) -> Result<()> {
    let bytes = writer
        .into_inner()
        .map_err(|e| eyre!("failed to flush CSV buffer: {e}"))?;
    atomic_write_bytes(path, &bytes)
        .wrap_err_with(|| format!("failed to write {}", path.display()))?;
    tracing::info!("saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use levhedge_core::{Portfolio, StrategyConfig};
    use levhedge_core::series::{Observation, ReturnSeries};
    use tempfile::tempdir;

    fn sample_path() -> Vec<PathRecord> {
        let series = ReturnSeries::new(vec![
            Observation {
                date: date(2024, 1, 31),
                value: 0.02,
            },
            Observation {
                date: date(2024, 2, 29),
                value: -0.01,
            },
        ])
        .unwrap();
        Portfolio::new(StrategyConfig::default()).run_path(&series)
    }

    #[test]
    fn test_save_timeseries_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("portfolio_timeseries.csv");
        let records = sample_path();

        save_timeseries(&path, &records).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<PathRecord> = reader
            .deserialize()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(rows, records);
    }

    #[test]
    fn test_save_metrics_table_has_component_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metrics.csv");
        let records = sample_path();
        let report = MetricsReport::from_path(&records, &StrategyConfig::default());

        save_metrics_table(&path, &report).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("metric,index,hedged,unhedged,total"));
        // 8 metric rows follow the header.
        assert_eq!(lines.count(), 8);
    }
}
