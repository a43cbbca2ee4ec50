//! Horizon CLI - Event-adjusted indicator forecasting
//!
//! Usage:
//!   horizon forecast --years 2025-2028          Print scenario forecasts
//!   horizon forecast --output out.csv           Write the forecast table
//!   horizon impacts --matrix                    Event x indicator impacts
//!   horizon targets                             Progress toward targets

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let settings = commands::load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Forecast {
            years,
            output,
            format,
            optimism,
            pessimism,
            confidence,
            future_events,
        } => {
            let years = commands::parse_years(&years)?;
            let format = commands::parse_format(&format)?;
            let config =
                commands::apply_overrides(settings.forecast.clone(), optimism, pessimism, confidence)?;
            let mut store = commands::open_store(&cli.data, &settings)?;
            if future_events {
                store = commands::add_future_events(store, &years)?;
            }
            commands::cmd_forecast(&store, config, &years, output.as_deref(), format)
        }
        Commands::Impacts { matrix } => {
            let store = commands::open_store(&cli.data, &settings)?;
            if matrix {
                commands::cmd_impacts_matrix(&store)
            } else {
                commands::cmd_impacts_list(&store)
            }
        }
        Commands::ImpactCheck { event, indicator } => {
            let store = commands::open_store(&cli.data, &settings)?;
            commands::cmd_impact_check(&store, &event, &indicator)
        }
        Commands::Targets => {
            let store = commands::open_store(&cli.data, &settings)?;
            commands::cmd_targets(&store, &settings.forecast)
        }
        Commands::Status => commands::cmd_status(&cli.data, &settings),
        Commands::Config => commands::cmd_config(&settings),
    }
}
