use std::fmt;

use jiff::civil::Date;

/// Errors raised when a strategy configuration violates its invariants.
///
/// These are fatal at construction time; a config that failed validation
/// never reaches a simulator.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    WeightsDoNotSumToOne { hedged: f64, unhedged: f64 },
    WeightOutOfRange { name: &'static str, value: f64 },
    NonPositiveCapital(f64),
    NegativeHedgeCost(f64),
    ZeroPeriodsPerYear,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::WeightsDoNotSumToOne { hedged, unhedged } => {
                write!(
                    f,
                    "sleeve weights must sum to 1.0 (hedged={hedged}, unhedged={unhedged})"
                )
            }
            ConfigError::WeightOutOfRange { name, value } => {
                write!(f, "{name} must be between 0 and 1 (got {value})")
            }
            ConfigError::NonPositiveCapital(v) => {
                write!(f, "initial capital must be positive (got {v})")
            }
            ConfigError::NegativeHedgeCost(v) => {
                write!(f, "annual hedge cost must be non-negative (got {v})")
            }
            ConfigError::ZeroPeriodsPerYear => {
                write!(f, "periods per year must be positive")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised when an input return series breaks the chronological
/// ordering precondition.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesError {
    DuplicateDate(Date),
    OutOfOrder { previous: Date, current: Date },
}

impl fmt::Display for SeriesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesError::DuplicateDate(d) => write!(f, "duplicate observation date {d}"),
            SeriesError::OutOfOrder { previous, current } => {
                write!(f, "observations out of order: {current} follows {previous}")
            }
        }
    }
}

impl std::error::Error for SeriesError {}

/// Errors raised by metrics report lookups.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportError {
    UnknownComponent(String),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::UnknownComponent(name) => {
                write!(
                    f,
                    "unknown component {name:?} (expected index, hedged, unhedged, or total)"
                )
            }
        }
    }
}

impl std::error::Error for ReportError {}
