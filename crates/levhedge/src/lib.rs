//! Command-line front end for the levhedge overlay engine.
//!
//! The heavy lifting lives in `levhedge_core`; this crate owns the
//! external collaborators around it: the CSV data loader, result export,
//! the real-time tracking log, CLI argument parsing, and logging setup.

#![warn(clippy::all)]

pub mod backtest;
pub mod export;
pub mod format;
pub mod io;
pub mod loader;
pub mod logging;
pub mod montecarlo;
pub mod realtime;

pub use logging::init_logging;
