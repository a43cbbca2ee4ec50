//! Forecast command implementation

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use horizon_core::export::{write_csv, write_json};
use horizon_core::{
    ExportFormat, ForecastConfig, ForecastEngine, ForecastExport, ForecastRun, RecordStore,
};

use super::truncate;

pub fn cmd_forecast(
    store: &RecordStore,
    config: ForecastConfig,
    years: &[i32],
    output: Option<&Path>,
    format: ExportFormat,
) -> Result<()> {
    let engine = ForecastEngine::new(store, config.clone());
    let run = engine.run(years).context("Forecast run failed")?;

    match output {
        Some(path) => {
            write_forecast(&run, store, &config, years, path, format)?;
            println!(
                "✅ Wrote {} rows for {} indicators to {}",
                run.rows.len(),
                run.indicators.len(),
                path.display()
            );
        }
        None => print_forecast(&run),
    }

    if !run.skipped.is_empty() {
        println!();
        println!("   ⚠️  Skipped {} indicator(s):", run.skipped.len());
        for s in &run.skipped {
            println!("      {} - {}", s.indicator, s.reason);
        }
    }

    Ok(())
}

/// Write the run in the requested format
pub fn write_forecast(
    run: &ForecastRun,
    store: &RecordStore,
    config: &ForecastConfig,
    years: &[i32],
    path: &Path,
    format: ExportFormat,
) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let writer = BufWriter::new(file);

    match format {
        ExportFormat::Csv => write_csv(&run.rows, writer)?,
        ExportFormat::Json => {
            let export = ForecastExport::new(run, store, config, years);
            write_json(&export, writer)?;
        }
    }
    Ok(())
}

fn print_forecast(run: &ForecastRun) {
    println!();
    println!("📈 Indicator Forecasts");
    println!("   ─────────────────────────────────────────────────────────────");

    if run.indicators.is_empty() {
        println!("   No indicators with observations.");
        return;
    }

    for forecast in &run.indicators {
        println!();
        println!(
            "   {} ({}) - {} points, {} impact(s), {} band",
            forecast.indicator,
            truncate(&forecast.label, 32),
            forecast.history_points,
            forecast.impacts.len(),
            forecast.band
        );
        println!(
            "   {:>6} │ {:>8} │ {:>8} │ {:>8} │ {:>17} │ {:>8}",
            "Year", "Baseline", "Pessim.", "Base", "Band", "Optim."
        );
        println!("   ───────┼──────────┼──────────┼──────────┼───────────────────┼─────────");

        let s = &forecast.scenarios;
        for (i, b) in forecast.baseline.iter().enumerate() {
            let base = &s.base[i];
            let band = match (base.lower, base.upper) {
                (Some(lo), Some(hi)) => format!("{:.1} - {:.1}", lo, hi),
                _ => "-".to_string(),
            };
            println!(
                "   {:>6} │ {:>8.2} │ {:>8.2} │ {:>8.2} │ {:>17} │ {:>8.2}",
                b.date.format("%Y"),
                b.value,
                s.pessimistic[i].value,
                base.value,
                band,
                s.optimistic[i].value
            );
        }
    }
    println!();
}
