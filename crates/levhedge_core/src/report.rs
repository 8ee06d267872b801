//! Backtest metrics report.
//!
//! Computes one [`MetricsRecord`] per portfolio component from a
//! completed path and renders structured, plain-text, and Markdown views.

use serde::{Deserialize, Serialize};

use crate::config::StrategyConfig;
use crate::error::ReportError;
use crate::metrics::{self, MetricsRecord};
use crate::portfolio::PathRecord;

/// The four value columns a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Component {
    /// The benchmark index level (starts at 1.0)
    Index,
    /// The hedged sleeve's dollar value
    Hedged,
    /// The unhedged sleeve's dollar value
    Unhedged,
    /// Total portfolio value
    Total,
}

impl Component {
    /// Report column order.
    pub const ALL: [Component; 4] = [
        Component::Index,
        Component::Hedged,
        Component::Unhedged,
        Component::Total,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Component::Index => "index",
            Component::Hedged => "hedged",
            Component::Unhedged => "unhedged",
            Component::Total => "total",
        }
    }

    /// Parse a component name; unknown names are a usage error.
    pub fn from_name(name: &str) -> Result<Self, ReportError> {
        match name {
            "index" => Ok(Component::Index),
            "hedged" => Ok(Component::Hedged),
            "unhedged" => Ok(Component::Unhedged),
            "total" => Ok(Component::Total),
            other => Err(ReportError::UnknownComponent(other.to_string())),
        }
    }
}

/// Derived portfolio-vs-index comparison figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Total CAGR minus index CAGR
    pub alpha: Option<f64>,
    /// Total Sharpe minus index Sharpe
    pub sharpe_advantage: Option<f64>,
    /// Total volatility minus index volatility
    pub volatility_difference: Option<f64>,
}

/// Metric row order for the wide-table view.
pub const METRIC_NAMES: [&str; 8] = [
    "cagr",
    "max_drawdown",
    "sharpe",
    "volatility",
    "sortino",
    "calmar",
    "final_value",
    "total_return",
];

/// Metrics for all four components of one completed backtest path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    config: StrategyConfig,
    index: MetricsRecord,
    hedged: MetricsRecord,
    unhedged: MetricsRecord,
    total: MetricsRecord,
}

impl MetricsReport {
    /// Compute the report from a completed path and the config that
    /// produced it. The risk-free rate is fixed at zero.
    #[must_use]
    pub fn from_path(path: &[PathRecord], config: &StrategyConfig) -> Self {
        let ppy = config.periods_per_year;
        let column = |extract: fn(&PathRecord) -> f64| -> Vec<f64> {
            path.iter().map(extract).collect()
        };

        Self {
            config: config.clone(),
            index: metrics::compute_all(&column(|r| r.index_value), ppy, 0.0),
            hedged: metrics::compute_all(&column(|r| r.hedged_value), ppy, 0.0),
            unhedged: metrics::compute_all(&column(|r| r.unhedged_value), ppy, 0.0),
            total: metrics::compute_all(&column(|r| r.total_value), ppy, 0.0),
        }
    }

    #[must_use]
    pub fn component(&self, component: Component) -> &MetricsRecord {
        match component {
            Component::Index => &self.index,
            Component::Hedged => &self.hedged,
            Component::Unhedged => &self.unhedged,
            Component::Total => &self.total,
        }
    }

    /// Look up a component by name.
    pub fn by_name(&self, name: &str) -> Result<&MetricsRecord, ReportError> {
        Ok(self.component(Component::from_name(name)?))
    }

    #[must_use]
    pub fn comparison(&self) -> Comparison {
        let diff = |a: Option<f64>, b: Option<f64>| Some(a? - b?);
        Comparison {
            alpha: diff(self.total.cagr, self.index.cagr),
            sharpe_advantage: diff(self.total.sharpe, self.index.sharpe),
            volatility_difference: diff(self.total.volatility, self.index.volatility),
        }
    }

    /// Wide-table view: one row per metric, one value per component, in
    /// [`Component::ALL`] order. Undefined statistics stay `None`.
    #[must_use]
    pub fn wide_rows(&self) -> Vec<(&'static str, [Option<f64>; 4])> {
        let value = |record: &MetricsRecord, metric: &str| match metric {
            "cagr" => record.cagr,
            "max_drawdown" => record.max_drawdown,
            "sharpe" => record.sharpe,
            "volatility" => record.volatility,
            "sortino" => record.sortino,
            "calmar" => record.calmar,
            "final_value" => record.final_value,
            "total_return" => record.total_return,
            _ => unreachable!("metric names are fixed"),
        };

        METRIC_NAMES
            .iter()
            .map(|&metric| {
                let mut row = [None; 4];
                for (slot, component) in row.iter_mut().zip(Component::ALL) {
                    *slot = value(self.component(component), metric);
                }
                (metric, row)
            })
            .collect()
    }

    /// Formatted plain-text summary.
    #[must_use]
    pub fn to_text(&self) -> String {
        let port = &self.total;
        let idx = &self.index;
        let cmp = self.comparison();
        let rule = "=".repeat(70);

        let mut lines = Vec::new();
        lines.push(rule.clone());
        lines.push("LEVERED HEDGE OVERLAY - BACKTEST SUMMARY".to_string());
        lines.push(rule.clone());

        lines.push("\n--- Portfolio Performance ---\n".to_string());
        lines.push(format!("Final Value:          {:>15}", currency(port.final_value)));
        lines.push(format!("Total Return:         {:>15}", percent(port.total_return)));
        lines.push(format!("CAGR:                 {:>15}", percent(port.cagr)));
        lines.push(format!("Annual Volatility:    {:>15}", percent(port.volatility)));
        lines.push(format!("Max Drawdown:         {:>15}", percent(port.max_drawdown)));
        lines.push(format!("Sharpe Ratio:         {:>15}", ratio(port.sharpe)));
        lines.push(format!("Sortino Ratio:        {:>15}", ratio(port.sortino)));
        lines.push(format!("Calmar Ratio:         {:>15}", ratio(port.calmar)));

        lines.push("\n--- Index Performance ---\n".to_string());
        lines.push(format!("Final Value:          {:>15}", level(idx.final_value)));
        lines.push(format!("Total Return:         {:>15}", percent(idx.total_return)));
        lines.push(format!("CAGR:                 {:>15}", percent(idx.cagr)));
        lines.push(format!("Annual Volatility:    {:>15}", percent(idx.volatility)));
        lines.push(format!("Max Drawdown:         {:>15}", percent(idx.max_drawdown)));
        lines.push(format!("Sharpe Ratio:         {:>15}", ratio(idx.sharpe)));
        lines.push(format!("Sortino Ratio:        {:>15}", ratio(idx.sortino)));
        lines.push(format!("Calmar Ratio:         {:>15}", ratio(idx.calmar)));

        lines.push("\n--- Outperformance vs Index ---\n".to_string());
        lines.push(format!("Alpha (CAGR):         {:>15}", percent(cmp.alpha)));
        lines.push(format!("Sharpe Advantage:     {:>15}", ratio(cmp.sharpe_advantage)));
        lines.push(format!("Volatility Diff:      {:>15}", percent(cmp.volatility_difference)));

        lines.push("\n--- Hedged Sleeve ---\n".to_string());
        lines.push(format!("Final Value:          {:>15}", currency(self.hedged.final_value)));
        lines.push(format!("CAGR:                 {:>15}", percent(self.hedged.cagr)));
        lines.push(format!("Max Drawdown:         {:>15}", percent(self.hedged.max_drawdown)));
        lines.push(format!("Sharpe Ratio:         {:>15}", ratio(self.hedged.sharpe)));

        lines.push("\n--- Unhedged Sleeve ---\n".to_string());
        lines.push(format!("Final Value:          {:>15}", currency(self.unhedged.final_value)));
        lines.push(format!("CAGR:                 {:>15}", percent(self.unhedged.cagr)));
        lines.push(format!("Max Drawdown:         {:>15}", percent(self.unhedged.max_drawdown)));
        lines.push(format!("Sharpe Ratio:         {:>15}", ratio(self.unhedged.sharpe)));

        lines.push("\n--- Configuration ---\n".to_string());
        lines.push(format!(
            "Initial Capital:      {:>15}",
            currency(Some(self.config.initial_capital))
        ));
        lines.push(format!(
            "Hedged Weight:        {:>15}",
            percent(Some(self.config.hedged_weight))
        ));
        lines.push(format!(
            "Unhedged Weight:      {:>15}",
            percent(Some(self.config.unhedged_weight))
        ));
        lines.push(format!(
            "Annual Hedge Cost:    {:>15}",
            percent(Some(self.config.annual_hedge_cost))
        ));
        lines.push(format!(
            "Periods Per Year:     {:>15}",
            self.config.periods_per_year
        ));

        lines.push(format!("\n{rule}"));
        lines.join("\n")
    }

    /// Formatted Markdown summary.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let port = &self.total;
        let idx = &self.index;
        let cmp = self.comparison();

        let mut lines = Vec::new();
        lines.push("# Backtest Summary Report\n".to_string());

        lines.push("## Portfolio Performance\n".to_string());
        lines.push(format!("- **Final Value**: {}", currency(port.final_value)));
        lines.push(format!("- **Total Return**: {}", percent(port.total_return)));
        lines.push(format!("- **CAGR**: {}", percent(port.cagr)));
        lines.push(format!("- **Annual Volatility**: {}", percent(port.volatility)));
        lines.push(format!("- **Max Drawdown**: {}", percent(port.max_drawdown)));
        lines.push(format!("- **Sharpe Ratio**: {}", ratio(port.sharpe)));
        lines.push(format!("- **Sortino Ratio**: {}", ratio(port.sortino)));
        lines.push(format!("- **Calmar Ratio**: {}\n", ratio(port.calmar)));

        lines.push("## Index Performance\n".to_string());
        lines.push(format!("- **Final Value**: {}", level(idx.final_value)));
        lines.push(format!("- **Total Return**: {}", percent(idx.total_return)));
        lines.push(format!("- **CAGR**: {}", percent(idx.cagr)));
        lines.push(format!("- **Annual Volatility**: {}", percent(idx.volatility)));
        lines.push(format!("- **Max Drawdown**: {}", percent(idx.max_drawdown)));
        lines.push(format!("- **Sharpe Ratio**: {}", ratio(idx.sharpe)));
        lines.push(format!("- **Sortino Ratio**: {}", ratio(idx.sortino)));
        lines.push(format!("- **Calmar Ratio**: {}\n", ratio(idx.calmar)));

        lines.push("## Outperformance\n".to_string());
        lines.push(format!("- **Alpha (CAGR)**: {}", percent(cmp.alpha)));
        lines.push(format!("- **Sharpe Advantage**: {}", ratio(cmp.sharpe_advantage)));
        lines.push(format!(
            "- **Volatility Difference**: {}\n",
            percent(cmp.volatility_difference)
        ));

        lines.push("## Sleeve Performance\n".to_string());
        lines.push("### Hedged Sleeve".to_string());
        lines.push(format!("- **Final Value**: {}", currency(self.hedged.final_value)));
        lines.push(format!("- **CAGR**: {}", percent(self.hedged.cagr)));
        lines.push(format!("- **Max Drawdown**: {}", percent(self.hedged.max_drawdown)));
        lines.push(format!("- **Sharpe Ratio**: {}\n", ratio(self.hedged.sharpe)));

        lines.push("### Unhedged Sleeve".to_string());
        lines.push(format!("- **Final Value**: {}", currency(self.unhedged.final_value)));
        lines.push(format!("- **CAGR**: {}", percent(self.unhedged.cagr)));
        lines.push(format!("- **Max Drawdown**: {}", percent(self.unhedged.max_drawdown)));
        lines.push(format!("- **Sharpe Ratio**: {}\n", ratio(self.unhedged.sharpe)));

        lines.push("## Configuration\n".to_string());
        lines.push(format!(
            "- **Initial Capital**: {}",
            currency(Some(self.config.initial_capital))
        ));
        lines.push(format!(
            "- **Hedged Weight**: {}",
            percent(Some(self.config.hedged_weight))
        ));
        lines.push(format!(
            "- **Unhedged Weight**: {}",
            percent(Some(self.config.unhedged_weight))
        ));
        lines.push(format!(
            "- **Annual Hedge Cost**: {} p.a.",
            percent(Some(self.config.annual_hedge_cost))
        ));
        lines.push(format!(
            "- **Periods Per Year**: {}",
            self.config.periods_per_year
        ));

        lines.join("\n")
    }
}

// ============================================================================
// Formatting helpers
// ============================================================================

const UNDEFINED: &str = "n/a";

/// Format a dollar amount with thousands separators.
fn currency(value: Option<f64>) -> String {
    let Some(value) = value else {
        return UNDEFINED.to_string();
    };
    let total_cents = (value.abs() * 100.0).round() as i64;
    let dollars = total_cents / 100;
    let cents = total_cents % 100;

    let digits = dollars.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    if value < 0.0 {
        format!("-${grouped}.{cents:02}")
    } else {
        format!("${grouped}.{cents:02}")
    }
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| UNDEFINED.to_string(), |v| format!("{:.2}%", v * 100.0))
}

fn ratio(value: Option<f64>) -> String {
    value.map_or_else(|| UNDEFINED.to_string(), |v| format!("{v:.2}"))
}

/// Format an index level (unitless, starts at 1.0).
fn level(value: Option<f64>) -> String {
    value.map_or_else(|| UNDEFINED.to_string(), |v| format!("{v:.4}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_names_round_trip() {
        for component in Component::ALL {
            assert_eq!(Component::from_name(component.name()).unwrap(), component);
        }
        assert!(Component::from_name("benchmark").is_err());
    }

    #[test]
    fn test_currency_formatting() {
        assert_eq!(currency(Some(1_234_567.891)), "$1,234,567.89");
        assert_eq!(currency(Some(-42.5)), "-$42.50");
        assert_eq!(currency(None), "n/a");
    }
}
