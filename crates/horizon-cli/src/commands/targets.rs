//! Targets command implementation

use anyhow::{Context, Result};
use chrono::Datelike;
use horizon_core::{forecast_metrics, target_progress, ForecastConfig, ForecastEngine, RecordStore};

use super::truncate;

pub fn cmd_targets(store: &RecordStore, config: &ForecastConfig) -> Result<()> {
    let progress = target_progress(store);

    println!();
    println!("🎯 Target Progress");
    println!("   ─────────────────────────────────────────────────────────────");

    if progress.is_empty() {
        println!("   No targets mapped to observed indicators.");
        println!("   Declare mappings in the target mapping file.");
        println!();
        return Ok(());
    }

    println!(
        "   {:22} │ {:>7} │ {:>7} │ {:>6} │ {:10} │ {:>9} │ {:>7}",
        "Indicator", "Current", "Target", "%", "Status", "Forecast", "Gap"
    );
    println!("   ───────────────────────┼─────────┼─────────┼────────┼────────────┼───────────┼────────");

    let engine = ForecastEngine::new(store, config.clone());
    for p in &progress {
        let year = p.target.date.year();
        let forecast = engine
            .forecast_indicator(&p.indicator_code, &[year])
            .with_context(|| format!("Failed to forecast {}", p.indicator_code));

        let (projected, gap) = match forecast {
            Ok(f) => match forecast_metrics(&f, Some(&p.target)) {
                Some(m) => (
                    format!("{:.2}", m.final_value),
                    m.gap_to_target
                        .map(|g| format!("{:+.2}", g))
                        .unwrap_or_else(|| "-".to_string()),
                ),
                None => ("-".to_string(), "-".to_string()),
            },
            Err(e) => {
                tracing::warn!(indicator = %p.indicator_code, error = %e, "No forecast for target");
                ("-".to_string(), "-".to_string())
            }
        };

        println!(
            "   {:22} │ {:>7.2} │ {:>7.2} │ {:>6.1} │ {:10} │ {:>9} │ {:>7}",
            truncate(&p.indicator_code, 22),
            p.current_value,
            p.target.value,
            p.percent,
            p.status.as_str(),
            projected,
            gap
        );
    }

    println!();
    println!("   Forecast is the base scenario in each target's year; gap = target - forecast.");
    println!();
    Ok(())
}
