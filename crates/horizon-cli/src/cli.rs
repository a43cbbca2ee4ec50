//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Horizon - Event-adjusted indicator forecasting
#[derive(Parser)]
#[command(name = "horizon")]
#[command(about = "Scenario forecasts for indicators driven by discrete events", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Data directory holding the input CSV files
    #[arg(long, default_value = "data", global = true)]
    pub data: PathBuf,

    /// Forecast config file (defaults to the user override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Forecast every indicator for the given years
    Forecast {
        /// Years as a range (2025-2028) or list (2025,2027)
        #[arg(short, long, default_value = "2025-2028")]
        years: String,

        /// Write the forecast table to a file instead of printing a summary
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Optimistic impact multiplier (overrides config)
        #[arg(long)]
        optimism: Option<f64>,

        /// Pessimistic impact multiplier (overrides config)
        #[arg(long)]
        pessimism: Option<f64>,

        /// Confidence level for the base-scenario band (overrides config)
        #[arg(long)]
        confidence: Option<f64>,

        /// Add hypothetical planning events dated from the first forecast year
        #[arg(long)]
        future_events: bool,
    },

    /// List modeled event impacts
    Impacts {
        /// Show the event x indicator matrix instead of the list
        #[arg(long)]
        matrix: bool,
    },

    /// Compare a modeled impact with observed data
    ImpactCheck {
        /// Event record id
        #[arg(short, long)]
        event: String,

        /// Indicator code
        #[arg(short, long)]
        indicator: String,
    },

    /// Progress toward targets and forecast gap at each target year
    Targets,

    /// Show loaded records and latest indicator values
    Status,

    /// Show the effective configuration
    Config,
}
