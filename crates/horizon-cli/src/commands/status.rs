//! Status and config command implementations

use std::path::Path;

use anyhow::{Context, Result};
use horizon_core::forecast::impact::inert_links;
use horizon_core::Settings;

use super::{open_store, truncate};

pub fn cmd_status(data_dir: &Path, settings: &Settings) -> Result<()> {
    println!();
    println!("📊 Horizon Status");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Data:   {}", data_dir.display());
    println!("   Config: {}", settings.source);

    let unified = data_dir.join(&settings.data.unified_file);
    if !unified.exists() {
        println!();
        println!("   ❌ {} not found", unified.display());
        println!();
        return Ok(());
    }

    let store = open_store(data_dir, settings)?;
    let inert = inert_links(&store).len();

    println!();
    println!("   Observations: {}", store.observations().len());
    println!("   Indicators:   {}", store.indicators().len());
    println!("   Events:       {}", store.events().len());
    if inert > 0 {
        println!("   Impact links: {} ({} inert)", store.impact_links().len(), inert);
    } else {
        println!("   Impact links: {}", store.impact_links().len());
    }
    println!("   Targets:      {}", store.targets().len());

    let snapshot = store.snapshot();
    if !snapshot.is_empty() {
        println!();
        println!(
            "   {:22} │ {:28} │ {:>8} │ {:10} │ {:>7} │ {:>3}",
            "Code", "Indicator", "Latest", "Date", "Change", "N"
        );
        println!("   ───────────────────────┼──────────────────────────────┼──────────┼────────────┼─────────┼────");
        for s in &snapshot {
            let change = s
                .change
                .map(|c| format!("{:+.2}", c))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "   {:22} │ {:28} │ {:>8.2} │ {:10} │ {:>7} │ {:>3}",
                truncate(&s.indicator_code, 22),
                truncate(&s.indicator, 28),
                s.value,
                s.date.to_string(),
                change,
                s.observation_count
            );
        }
    }

    println!();
    Ok(())
}

pub fn cmd_config(settings: &Settings) -> Result<()> {
    let forecast = serde_json::to_string_pretty(&settings.forecast)
        .context("Failed to serialize forecast config")?;
    let data =
        serde_json::to_string_pretty(&settings.data).context("Failed to serialize data config")?;

    println!();
    println!("⚙️  Forecast Configuration");
    println!("   Source: {}", settings.source);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("{}", forecast);
    println!();
    println!("   Input files:");
    println!("{}", data);
    println!();
    Ok(())
}
