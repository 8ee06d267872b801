//! Benchmark return series loading.
//!
//! Reads a delimited file with `date,return` header columns, normalizes
//! it (chronological order, duplicate dates dropped keeping the first
//! occurrence), and hands the core a validated [`ReturnSeries`].

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, eyre};
use jiff::civil::Date;
use serde::Deserialize;

use levhedge_core::series::{Observation, ReturnSeries};

#[derive(Debug, Deserialize)]
struct RawRow {
    date: String,
    #[serde(rename = "return")]
    value: f64,
}

/// Load index returns from a CSV file.
pub fn load_return_series(path: &Path) -> Result<ReturnSeries> {
    if !path.exists() {
        return Err(eyre!("data file not found: {}", path.display()));
    }

    let mut reader = csv::Reader::from_path(path)
        .wrap_err_with(|| format!("failed to open {}", path.display()))?;

    let headers = reader.headers()?.clone();
    if !headers.iter().any(|h| h == "date") || !headers.iter().any(|h| h == "return") {
        return Err(eyre!(
            "{} must contain 'date' and 'return' columns (found: {:?})",
            path.display(),
            headers
        ));
    }

    let mut observations = Vec::new();
    for (i, row) in reader.deserialize::<RawRow>().enumerate() {
        let row = row.wrap_err_with(|| format!("bad row {} in {}", i + 2, path.display()))?;
        let date: Date = row
            .date
            .parse()
            .wrap_err_with(|| format!("unparsable date {:?} on row {}", row.date, i + 2))?;
        observations.push(Observation {
            date,
            value: row.value,
        });
    }

    // Normalize before the core sees the series: chronological order,
    // duplicate dates dropped keeping the first occurrence.
    observations.sort_by_key(|o| o.date);
    observations.dedup_by_key(|o| o.date);

    let series = ReturnSeries::new(observations)
        .wrap_err_with(|| format!("invalid return series in {}", path.display()))?;

    if let Some(stats) = series.statistics() {
        tracing::info!(
            periods = stats.periods,
            start = %series.first_date().expect("non-empty"),
            end = %series.last_date().expect("non-empty"),
            mean = stats.mean,
            "loaded return series from {}",
            path.display()
        );
    } else {
        tracing::warn!("loaded empty return series from {}", path.display());
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_simple_series() {
        let file = write_csv("date,return\n2024-01-31,0.02\n2024-02-29,-0.01\n");
        let series = load_return_series(file.path()).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.first_date(), Some(date(2024, 1, 31)));
        assert_eq!(series.values(), vec![0.02, -0.01]);
    }

    #[test]
    fn test_unordered_input_is_sorted() {
        let file = write_csv("date,return\n2024-03-29,0.03\n2024-01-31,0.01\n2024-02-29,0.02\n");
        let series = load_return_series(file.path()).unwrap();

        assert_eq!(series.values(), vec![0.01, 0.02, 0.03]);
    }

    #[test]
    fn test_duplicate_dates_keep_first_occurrence() {
        let file = write_csv("date,return\n2024-01-31,0.01\n2024-01-31,0.99\n2024-02-29,0.02\n");
        let series = load_return_series(file.path()).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.values(), vec![0.01, 0.02]);
    }

    #[test]
    fn test_missing_columns_rejected() {
        let file = write_csv("day,pct\n2024-01-31,0.01\n");
        assert!(load_return_series(file.path()).is_err());
    }

    #[test]
    fn test_unparsable_date_rejected() {
        let file = write_csv("date,return\nJan 31,0.01\n");
        assert!(load_return_series(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_rejected() {
        assert!(load_return_series(Path::new("/nonexistent/returns.csv")).is_err());
    }
}
