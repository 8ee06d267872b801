//! Backtest command: load data, simulate, report, export.

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};

use levhedge_core::{MetricsReport, Portfolio, StrategyConfig};

use crate::export;
use crate::loader;

/// Options for a backtest run.
#[derive(Debug, Clone)]
pub struct BacktestOptions {
    pub data: PathBuf,
    /// Output directory for exported results; console-only when absent
    pub output: Option<PathBuf>,
    /// Rebalance every N periods; buy-and-hold when absent
    pub rebalance: Option<usize>,
}

/// Run the complete backtest workflow.
pub fn run_backtest(config: &StrategyConfig, options: &BacktestOptions) -> Result<()> {
    let series = loader::load_return_series(&options.data)?;

    let portfolio = Portfolio::new(config.clone());
    let path = match options.rebalance {
        Some(frequency) => {
            tracing::info!(frequency, "running backtest with periodic rebalancing");
            portfolio.run_path_rebalanced(&series, frequency)
        }
        None => {
            tracing::info!("running buy-and-hold backtest");
            portfolio.run_path(&series)
        }
    };

    let report = MetricsReport::from_path(&path, config);
    println!("{}", report.to_text());

    if let Some(output_dir) = &options.output {
        save_results(output_dir, &path, &report)?;
    }

    Ok(())
}

fn save_results(
    output_dir: &Path,
    path: &[levhedge_core::PathRecord],
    report: &MetricsReport,
) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .wrap_err_with(|| format!("failed to create {}", output_dir.display()))?;

    export::save_timeseries(&output_dir.join("portfolio_timeseries.csv"), path)?;
    export::save_metrics_table(&output_dir.join("metrics.csv"), report)?;
    export::save_metrics_json(&output_dir.join("metrics.json"), report)?;
    export::save_summary(&output_dir.join("summary.txt"), &report.to_text())?;
    export::save_summary(&output_dir.join("summary.md"), &report.to_markdown())?;

    Ok(())
}
