//! Shared utilities
//!
//! This module contains:
//! - `load_settings` - Resolve the forecast config
//! - `open_store` - Load the record store from a data directory
//! - `add_future_events` - Merge hypothetical planning events into a store
//! - `parse_years`, `parse_format`, `apply_overrides` - Argument handling

use std::path::Path;

use anyhow::{Context, Result};
use horizon_core::{future_events, ExportFormat, ForecastConfig, RecordStore, Settings};

/// Explicit config file if given, else the user override, else built-in defaults
pub fn load_settings(config: Option<&Path>) -> Result<Settings> {
    match config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Settings::load().context("Failed to load config"),
    }
}

/// Load every record file from the data directory
pub fn open_store(data_dir: &Path, settings: &Settings) -> Result<RecordStore> {
    RecordStore::load_dir(data_dir, &settings.data)
        .with_context(|| format!("Failed to load records from {}", data_dir.display()))
}

/// Merge the planning events, dated from the earliest forecast year
pub fn add_future_events(store: RecordStore, years: &[i32]) -> Result<RecordStore> {
    let start = years
        .iter()
        .min()
        .copied()
        .context("No forecast years given")?;
    let events = future_events(start).context("Failed to build planning events")?;
    tracing::info!(count = events.len(), start_year = start, "Adding planning events");
    Ok(store.with_events(events))
}

/// Parse "2025-2028" (inclusive range) or "2025,2026,2028"
pub fn parse_years(s: &str) -> Result<Vec<i32>> {
    let s = s.trim();
    if s.is_empty() {
        anyhow::bail!("No forecast years given");
    }

    let mut years: Vec<i32> = if let Some((start, end)) = s.split_once('-') {
        let start: i32 = start
            .trim()
            .parse()
            .with_context(|| format!("Invalid start year: {}", start))?;
        let end: i32 = end
            .trim()
            .parse()
            .with_context(|| format!("Invalid end year: {}", end))?;
        if end < start {
            anyhow::bail!("Year range {} runs backwards", s);
        }
        (start..=end).collect()
    } else {
        s.split(',')
            .map(|y| {
                y.trim()
                    .parse::<i32>()
                    .with_context(|| format!("Invalid year: {}", y))
            })
            .collect::<Result<_>>()?
    };

    years.sort_unstable();
    years.dedup();
    Ok(years)
}

pub fn parse_format(s: &str) -> Result<ExportFormat> {
    s.parse::<ExportFormat>().map_err(anyhow::Error::msg)
}

/// Apply command-line overrides on top of the loaded config
pub fn apply_overrides(
    mut config: ForecastConfig,
    optimism: Option<f64>,
    pessimism: Option<f64>,
    confidence: Option<f64>,
) -> Result<ForecastConfig> {
    if let Some(v) = optimism {
        config.optimism_factor = v;
    }
    if let Some(v) = pessimism {
        config.pessimism_factor = v;
    }
    if let Some(v) = confidence {
        config.confidence_level = v;
    }
    config.validate().context("Invalid forecast options")?;
    Ok(config)
}
