use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::Result;
use jiff::civil::Date;

use levhedge::backtest::{BacktestOptions, run_backtest};
use levhedge::format::format_currency;
use levhedge::init_logging;
use levhedge::montecarlo::{MonteCarloOptions, run_monte_carlo};
use levhedge::realtime::{TrackOutcome, TrackRequest, run_track};
use levhedge_core::StrategyConfig;

#[derive(Parser, Debug)]
#[command(name = "levhedge")]
#[command(about = "Backtest and Monte Carlo engine for a leveraged hedged equity overlay")]
struct Cli {
    /// Log level (debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(flatten)]
    strategy: StrategyArgs,

    #[command(subcommand)]
    command: Command,
}

/// Strategy parameters, defaulting to the reference 70/30 configuration.
#[derive(Args, Debug)]
struct StrategyArgs {
    /// Starting portfolio value in dollars
    #[arg(long, default_value_t = 100_000.0)]
    initial_capital: f64,

    /// Allocation to the hedged sleeve (0.0 to 1.0)
    #[arg(long, default_value_t = 0.7)]
    hedged_weight: f64,

    /// Allocation to the unhedged sleeve (0.0 to 1.0)
    #[arg(long, default_value_t = 0.3)]
    unhedged_weight: f64,

    /// Leverage multiplier for the unhedged sleeve
    #[arg(long, default_value_t = 1.3)]
    unhedged_leverage: f64,

    /// Hedged sleeve beta in up markets
    #[arg(long, default_value_t = 1.3)]
    hedged_up_beta: f64,

    /// Hedged sleeve beta in down markets
    #[arg(long, default_value_t = 0.9)]
    hedged_down_beta: f64,

    /// Floor return in a severe crash (negative decimal)
    #[arg(long, default_value_t = -0.30)]
    crash_floor: f64,

    /// Annual hedge cost as a decimal (0.03 = 3%)
    #[arg(long, default_value_t = 0.03)]
    annual_hedge_cost: f64,

    /// Return periods per year (12 for monthly data, 252 for daily)
    #[arg(long, default_value_t = 12)]
    periods_per_year: u32,
}

impl StrategyArgs {
    fn to_config(&self) -> Result<StrategyConfig> {
        Ok(StrategyConfig::new(
            self.initial_capital,
            self.hedged_weight,
            self.unhedged_weight,
            self.unhedged_leverage,
            self.hedged_up_beta,
            self.hedged_down_beta,
            self.crash_floor,
            self.annual_hedge_cost,
            self.periods_per_year,
        )?)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a historical backtest over a returns CSV
    Backtest {
        /// Path to the returns CSV (date,return columns)
        #[arg(long)]
        data: PathBuf,

        /// Directory for exported results (console-only if omitted)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Rebalance every N periods (buy-and-hold if omitted)
        #[arg(long)]
        rebalance: Option<usize>,
    },

    /// Bootstrap Monte Carlo comparison of hedged vs unhedged modes
    MonteCarlo {
        /// Path to the returns CSV (date,return columns)
        #[arg(long)]
        data: PathBuf,

        /// Number of simulated paths per mode
        #[arg(long, default_value_t = 1000)]
        paths: usize,

        /// Resampled periods per path
        #[arg(long, default_value_t = 252)]
        days: usize,

        /// Base random seed (same seed reproduces the batch)
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Directory for exported results (console-only if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Apply one day of real-time performance and log the new state
    Track {
        /// Today's index closing price
        #[arg(long)]
        price: f64,

        /// Yesterday's close; required on the first run only
        #[arg(long)]
        previous_price: Option<f64>,

        /// Observation date (defaults to today)
        #[arg(long)]
        date: Option<Date>,

        /// Path to the append-only state log
        #[arg(long, default_value = "outputs/realtime_log.csv")]
        log: PathBuf,

        /// Compute and print without writing to the log
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let config = cli.strategy.to_config()?;

    match cli.command {
        Command::Backtest {
            data,
            output,
            rebalance,
        } => run_backtest(
            &config,
            &BacktestOptions {
                data,
                output,
                rebalance,
            },
        ),
        Command::MonteCarlo {
            data,
            paths,
            days,
            seed,
            output,
        } => run_monte_carlo(
            &config,
            &MonteCarloOptions {
                data,
                paths,
                days,
                seed,
                output,
            },
        ),
        Command::Track {
            price,
            previous_price,
            date,
            log,
            dry_run,
        } => {
            let date = match date {
                Some(date) => date,
                None => jiff::Zoned::now().date(),
            };
            let request = TrackRequest {
                price_today: price,
                previous_price,
                date,
                dry_run,
            };
            match run_track(&config, &request, &log)? {
                TrackOutcome::Updated(row) => {
                    println!("Date:              {}", row.date);
                    println!("Portfolio Equity:  {}", format_currency(row.equity));
                    println!("Hedged Value:      {}", format_currency(row.hedged_value));
                    println!("Unhedged Value:    {}", format_currency(row.unhedged_value));
                    println!("Hedged Weight:     {:.2}%", row.hedged_weight * 100.0);
                    println!("Unhedged Weight:   {:.2}%", row.unhedged_weight * 100.0);
                    println!("Index Return:      {:+.4}%", row.index_return * 100.0);
                    println!("Excess Return:     {:+.4}%", row.excess_return * 100.0);
                }
                TrackOutcome::SkippedWeekend => {
                    println!("Weekend, no update performed.");
                }
                TrackOutcome::AlreadyUpdated => {
                    println!("Already updated for {date}, no update performed.");
                }
                TrackOutcome::SanityCheckFailed { change } => {
                    println!(
                        "Price moved {:+.2}% against the last logged close; refusing to update.",
                        change * 100.0
                    );
                }
            }
            Ok(())
        }
    }
}
