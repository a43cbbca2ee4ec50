//! Impact command implementations (list, matrix, check)

use anyhow::{Context, Result};
use horizon_core::forecast::impact::inert_links;
use horizon_core::{impact_matrix, impact_summary, validate_impact, RecordStore};

use super::truncate;

pub fn cmd_impacts_list(store: &RecordStore) -> Result<()> {
    let rows = impact_summary(store);

    println!();
    println!("🔗 Event Impacts");
    println!("   ─────────────────────────────────────────────────────────────");

    if rows.is_empty() {
        println!("   No impact links with known events.");
    } else {
        println!(
            "   {:28} │ {:10} │ {:22} │ {:>7} │ {:>4} │ {:10}",
            "Event", "Date", "Indicator", "Est.", "Lag", "Active"
        );
        println!("   ─────────────────────────────┼────────────┼────────────────────────┼─────────┼──────┼───────────");
        for r in &rows {
            println!(
                "   {:28} │ {:10} │ {:22} │ {:>+7.2} │ {:>4} │ {:10}",
                truncate(&r.event, 28),
                r.event_date,
                truncate(&r.indicator, 22),
                r.estimate,
                r.lag_months,
                r.activation_date
            );
        }
    }

    let inert = inert_links(store);
    if !inert.is_empty() {
        println!();
        println!("   ⚠️  {} link(s) reference unknown events and are ignored:", inert.len());
        for l in inert {
            println!("      {} -> {}", l.link_id, l.parent_id);
        }
    }

    println!();
    Ok(())
}

pub fn cmd_impacts_matrix(store: &RecordStore) -> Result<()> {
    let matrix = impact_matrix(store);

    println!();
    println!("🔗 Impact Matrix (pp)");
    println!("   ─────────────────────────────────────────────────────────────");

    if matrix.events.is_empty() {
        println!("   No impact links with known events.");
        println!();
        return Ok(());
    }

    let mut header = format!("   {:28}", "Event");
    for code in &matrix.indicators {
        header.push_str(&format!(" │ {:>14}", truncate(code, 14)));
    }
    println!("{}", header);

    for (event, values) in matrix.events.iter().zip(&matrix.values) {
        let mut line = format!("   {:28}", truncate(event, 28));
        for v in values {
            if *v == 0.0 {
                line.push_str(&format!(" │ {:>14}", "."));
            } else {
                line.push_str(&format!(" │ {:>+14.2}", v));
            }
        }
        println!("{}", line);
    }

    println!();
    Ok(())
}

pub fn cmd_impact_check(store: &RecordStore, event_id: &str, indicator: &str) -> Result<()> {
    let v = validate_impact(store, event_id, indicator)
        .with_context(|| format!("Cannot validate {} on {}", event_id, indicator))?;

    println!();
    println!("🔍 Impact Check: {} -> {}", v.event, v.indicator);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Event date:       {}", v.event_date);
    println!("   Active from:      {}", v.activation_date);
    println!("   Predicted:        {:+.2} pp", v.predicted);
    println!("   Before:           {:.2} ({})", v.value_before, v.date_before);
    println!("   After:            {:.2} ({})", v.value_after, v.date_after);
    println!("   Observed change:  {:+.2} pp over {:.1} years", v.observed_change, v.years);
    println!("   Annualized:       {:+.2} pp/year", v.annualized_change);
    println!("   Accuracy:         {}", v.accuracy);
    println!();

    Ok(())
}
