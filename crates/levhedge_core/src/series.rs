//! Date-indexed benchmark return series.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::error::SeriesError;
use crate::metrics;

/// One dated benchmark return observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: Date,
    pub value: f64,
}

/// A strictly chronological, duplicate-free series of benchmark returns.
///
/// The upstream loader is responsible for sorting and de-duplicating raw
/// input; the constructor asserts that precondition rather than silently
/// mis-simulating on unordered data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    observations: Vec<Observation>,
}

impl ReturnSeries {
    /// Build a series, rejecting duplicate or out-of-order dates.
    pub fn new(observations: Vec<Observation>) -> Result<Self, SeriesError> {
        for pair in observations.windows(2) {
            if pair[1].date == pair[0].date {
                return Err(SeriesError::DuplicateDate(pair[1].date));
            }
            if pair[1].date < pair[0].date {
                return Err(SeriesError::OutOfOrder {
                    previous: pair[0].date,
                    current: pair[1].date,
                });
            }
        }
        Ok(Self { observations })
    }

    /// Number of return periods in the series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    #[must_use]
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// The raw return values in chronological order.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    #[must_use]
    pub fn first_date(&self) -> Option<Date> {
        self.observations.first().map(|o| o.date)
    }

    #[must_use]
    pub fn last_date(&self) -> Option<Date> {
        self.observations.last().map(|o| o.date)
    }

    /// Basic summary statistics of the return values.
    ///
    /// Returns `None` for an empty series. The standard deviation is the
    /// sample estimate and is `None` with fewer than two observations.
    #[must_use]
    pub fn statistics(&self) -> Option<SeriesStatistics> {
        if self.observations.is_empty() {
            return None;
        }
        let values = self.values();
        let mean = metrics::mean(&values)?;
        let std_dev = metrics::sample_std(&values);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(SeriesStatistics {
            periods: values.len(),
            mean,
            std_dev,
            min,
            max,
        })
    }
}

/// Summary statistics for a return series.
#[derive(Debug, Clone, Copy)]
pub struct SeriesStatistics {
    pub periods: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two observations.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
}
