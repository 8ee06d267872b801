//! Monte Carlo command: hedged vs unhedged bootstrap comparison.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr, eyre};

use levhedge_core::monte_carlo::{
    MonteCarloParams, MonteCarloSimulator, MonteCarloSummary, PathOutcome,
};
use levhedge_core::StrategyConfig;

use crate::export;
use crate::format::{format_currency, format_opt, format_percent};
use crate::loader;

/// Options for a Monte Carlo comparison run.
#[derive(Debug, Clone)]
pub struct MonteCarloOptions {
    pub data: PathBuf,
    pub paths: usize,
    pub days: usize,
    pub seed: u64,
    /// Output directory for outcome tables and the summary; console-only
    /// when absent
    pub output: Option<PathBuf>,
}

/// Run both strategy modes over bootstrap-resampled history and compare.
pub fn run_monte_carlo(config: &StrategyConfig, options: &MonteCarloOptions) -> Result<()> {
    let series = loader::load_return_series(&options.data)?;
    if series.is_empty() {
        return Err(eyre!("cannot bootstrap from an empty return series"));
    }

    let simulator = MonteCarloSimulator::new(series, config.clone());

    tracing::info!(
        paths = options.paths,
        days = options.days,
        seed = options.seed,
        "running hedged batch"
    );
    let hedged = simulator.run(&MonteCarloParams {
        n_paths: options.paths,
        n_days: options.days,
        hedged: true,
        seed: options.seed,
    });

    tracing::info!("running unhedged batch");
    // The two batches draw independently, so the unhedged mode gets its
    // own derived seed.
    let unhedged = simulator.run(&MonteCarloParams {
        n_paths: options.paths,
        n_days: options.days,
        hedged: false,
        seed: options.seed.wrapping_add(1),
    });

    let hedged_summary = MonteCarloSimulator::summary(&hedged)
        .ok_or_else(|| eyre!("hedged batch produced no outcomes"))?;
    let unhedged_summary = MonteCarloSimulator::summary(&unhedged)
        .ok_or_else(|| eyre!("unhedged batch produced no outcomes"))?;

    let mut text = String::new();
    render_parameters(&mut text, config, options);
    render_summary(&mut text, "HEDGED STRATEGY", &hedged_summary);
    render_summary(&mut text, "UNHEDGED STRATEGY", &unhedged_summary);
    render_comparison(&mut text, &hedged, &unhedged, &hedged_summary, &unhedged_summary);
    println!("{text}");

    if let Some(output_dir) = &options.output {
        save_results(output_dir, &hedged, &unhedged, &text)?;
    }

    Ok(())
}

fn section(out: &mut String, title: &str) {
    let rule = "=".repeat(70);
    let _ = writeln!(out, "\n{rule}\n{title:^70}\n{rule}");
}

fn render_parameters(out: &mut String, config: &StrategyConfig, options: &MonteCarloOptions) {
    section(out, "MONTE CARLO ANALYSIS: HEDGED VS UNHEDGED");
    let _ = writeln!(out, "\nSimulation Parameters:");
    let _ = writeln!(out, "  Number of Paths:  {}", options.paths);
    let _ = writeln!(out, "  Days per Path:    {}", options.days);
    let _ = writeln!(out, "  Seed:             {}", options.seed);
    let _ = writeln!(
        out,
        "  Initial Capital:  {}",
        format_currency(config.initial_capital)
    );
    let _ = writeln!(
        out,
        "  Hedged Weight:    {}",
        format_percent(config.hedged_weight)
    );
    let _ = writeln!(
        out,
        "  Hedge Cost:       {} p.a.",
        format_percent(config.annual_hedge_cost)
    );
    let _ = writeln!(
        out,
        "  Leverage:         {:.1}x",
        config.unhedged_leverage
    );
    let _ = writeln!(out, "  Crash Floor:      {}", format_percent(config.crash_floor));
}

fn render_summary(out: &mut String, title: &str, summary: &MonteCarloSummary) {
    section(out, &format!("RESULTS: {title}"));

    let equity = summary.final_equity;
    let _ = writeln!(out, "\n  Median Final Equity:     {:>14}", format_currency(equity.median));
    let _ = writeln!(out, "  Mean Final Equity:       {:>14}", format_currency(equity.mean));
    let _ = writeln!(
        out,
        "  Std Dev:                 {:>14}",
        format_opt(summary.final_equity_std, format_currency)
    );
    let _ = writeln!(out, "  5th Percentile (P5):     {:>14}", format_currency(equity.p5));
    let _ = writeln!(out, "  95th Percentile (P95):   {:>14}", format_currency(equity.p95));

    let returns = summary.total_return;
    let _ = writeln!(out, "\n  Median Total Return:     {:>14}", format_percent(returns.median));
    let _ = writeln!(out, "  Mean Total Return:       {:>14}", format_percent(returns.mean));
    let _ = writeln!(out, "  P5 Total Return:         {:>14}", format_percent(returns.p5));
    let _ = writeln!(out, "  P95 Total Return:        {:>14}", format_percent(returns.p95));

    match &summary.max_drawdown {
        Some(dd) => {
            let _ = writeln!(out, "\n  Median Max Drawdown:     {:>14}", format_percent(dd.median));
            let _ = writeln!(out, "  Mean Max Drawdown:       {:>14}", format_percent(dd.mean));
            let _ = writeln!(out, "  P5 Max Drawdown (best):  {:>14}", format_percent(dd.p5));
            let _ = writeln!(out, "  P95 Max Drawdown (worst):{:>14}", format_percent(dd.p95));
        }
        None => {
            let _ = writeln!(out, "\n  Max Drawdown:            {:>14}", "n/a");
        }
    }
}

fn render_comparison(
    out: &mut String,
    hedged: &[PathOutcome],
    unhedged: &[PathOutcome],
    hedged_summary: &MonteCarloSummary,
    unhedged_summary: &MonteCarloSummary,
) {
    section(out, "COMPARATIVE ANALYSIS");

    let n = hedged.len().min(unhedged.len());
    let better_equity = hedged
        .iter()
        .zip(unhedged)
        .filter(|(h, u)| h.final_equity > u.final_equity)
        .count();
    // For drawdowns, less negative is better.
    let better_drawdown = hedged
        .iter()
        .zip(unhedged)
        .filter(|(h, u)| h.max_drawdown > u.max_drawdown)
        .count();

    let _ = writeln!(out, "\nHedged > Unhedged (Final Equity):");
    let _ = writeln!(
        out,
        "  {better_equity}/{n} paths ({:.1}%)",
        100.0 * better_equity as f64 / n as f64
    );
    let _ = writeln!(out, "\nHedged > Unhedged (Max Drawdown, less negative is better):");
    let _ = writeln!(
        out,
        "  {better_drawdown}/{n} paths ({:.1}%)",
        100.0 * better_drawdown as f64 / n as f64
    );

    let equity_diff = hedged_summary.final_equity.median - unhedged_summary.final_equity.median;
    let _ = writeln!(out, "\nMedian Final Equity Difference (Hedged - Unhedged):");
    let _ = writeln!(
        out,
        "  {} ({:+.2}%)",
        format_currency(equity_diff),
        100.0 * equity_diff / unhedged_summary.final_equity.median
    );

    if let (Some(hedged_dd), Some(unhedged_dd)) =
        (&hedged_summary.max_drawdown, &unhedged_summary.max_drawdown)
    {
        let dd_diff = hedged_dd.median - unhedged_dd.median;
        let _ = writeln!(out, "\nMedian Max Drawdown Difference (less negative is better):");
        let _ = writeln!(out, "  Hedged - Unhedged: {:+.2}%", dd_diff * 100.0);
        let _ = writeln!(out, "  Downside Protection: {}", format_percent(dd_diff.abs()));

        let _ = writeln!(out, "\nReturn/Risk Efficiency (Median Return / |Median Max Drawdown|):");
        let _ = writeln!(
            out,
            "  Hedged:    {}",
            format_opt(efficiency(hedged_summary), |v| format!("{v:.2}x"))
        );
        let _ = writeln!(
            out,
            "  Unhedged:  {}",
            format_opt(efficiency(unhedged_summary), |v| format!("{v:.2}x"))
        );
    }
}

/// Median total return per unit of median drawdown; undefined on a
/// drawdown-free batch.
fn efficiency(summary: &MonteCarloSummary) -> Option<f64> {
    let dd = summary.max_drawdown?;
    if dd.median == 0.0 {
        return None;
    }
    Some(summary.total_return.median / dd.median.abs())
}

fn save_results(
    output_dir: &Path,
    hedged: &[PathOutcome],
    unhedged: &[PathOutcome],
    summary_text: &str,
) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .wrap_err_with(|| format!("failed to create {}", output_dir.display()))?;

    export::save_outcomes(&output_dir.join("mc_results_hedged.csv"), hedged)?;
    export::save_outcomes(&output_dir.join("mc_results_unhedged.csv"), unhedged)?;
    export::save_summary(&output_dir.join("mc_summary.txt"), summary_text)?;

    Ok(())
}
