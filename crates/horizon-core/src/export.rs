//! Export of forecast runs
//!
//! Supports:
//! - Flat CSV table, one row per indicator/date/series
//! - JSON document with run metadata, rows and skipped indicators

use std::io::Write;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::ForecastConfig;
use crate::error::{Error, Result};
use crate::forecast::{ForecastRun, SkippedIndicator};
use crate::models::ForecastRow;
use crate::records::RecordStore;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown export format: {}", s)),
        }
    }
}

/// Run metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastMetadata {
    /// Version of the tool that produced the export
    pub version: String,
    /// RFC 3339 timestamp
    pub generated_at: String,
    pub years: Vec<i32>,
    pub config: ForecastConfig,
    /// SHA-256 over the loaded records
    pub input_digest: String,
}

/// Full JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastExport {
    pub metadata: ForecastMetadata,
    pub rows: Vec<ForecastRow>,
    pub skipped: Vec<SkippedIndicator>,
}

impl ForecastExport {
    pub fn new(run: &ForecastRun, store: &RecordStore, config: &ForecastConfig, years: &[i32]) -> Self {
        let mut years = years.to_vec();
        years.sort_unstable();
        years.dedup();

        Self {
            metadata: ForecastMetadata {
                version: env!("CARGO_PKG_VERSION").to_string(),
                generated_at: Utc::now().to_rfc3339(),
                years,
                config: config.clone(),
                input_digest: input_digest(store),
            },
            rows: run.rows.clone(),
            skipped: run.skipped.clone(),
        }
    }
}

/// Write rows as CSV with header `indicator,date,scenario,value,lower,upper`.
/// Missing bounds are empty fields.
pub fn write_csv<W: Write>(rows: &[ForecastRow], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        wtr.write_record(["indicator", "date", "scenario", "value", "lower", "upper"])?;
    }
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the export as pretty-printed JSON
pub fn write_json<W: Write>(export: &ForecastExport, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, export)?;
    Ok(())
}

/// Read a JSON export back
pub fn read_json(content: &str) -> Result<ForecastExport> {
    serde_json::from_str(content)
        .map_err(|e| Error::InvalidData(format!("Invalid forecast export: {}", e)))
}

/// Stable fingerprint of every record in the store
pub fn input_digest(store: &RecordStore) -> String {
    let mut hasher = Sha256::new();

    for o in store.observations() {
        hasher.update(format!("obs|{}|{}|{}|{}\n", o.record_id, o.indicator_code, o.date, o.value));
    }
    for e in store.events() {
        hasher.update(format!("evt|{}|{}|{}|{}\n", e.record_id, e.date, e.category, e.label));
    }
    for l in store.impact_links() {
        hasher.update(format!(
            "imp|{}|{}|{}|{}|{}\n",
            l.link_id, l.parent_id, l.indicator_code, l.estimate, l.lag_months
        ));
    }
    for t in store.targets() {
        hasher.update(format!("tgt|{}|{}|{}|{}\n", t.record_id, t.target_code, t.date, t.value));
    }

    let mut mappings: Vec<_> = store.target_mappings().iter().collect();
    mappings.sort();
    for (target, indicator) in mappings {
        hasher.update(format!("map|{}|{}\n", target, indicator));
    }

    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::ForecastEngine;
    use crate::test_utils::sample_store;

    fn sample_run(store: &RecordStore) -> ForecastRun {
        ForecastEngine::new(store, ForecastConfig::default())
            .run(&[2025, 2026])
            .unwrap()
    }

    #[test]
    fn test_write_csv() {
        let store = sample_store();
        let run = sample_run(&store);

        let mut buf = Vec::new();
        write_csv(&run.rows, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "indicator,date,scenario,value,lower,upper");
        assert_eq!(lines.len(), run.rows.len() + 1);
        assert!(lines[1].starts_with("ACC_MM_ACCOUNT,2025-06-30,baseline,"));
        assert!(lines[1].ends_with(",,"));
        // Base rows carry both bounds
        let base = lines.iter().find(|l| l.contains(",base,")).unwrap();
        assert_eq!(base.split(',').filter(|f| !f.is_empty()).count(), 6);
    }

    #[test]
    fn test_write_csv_empty_has_header() {
        let mut buf = Vec::new();
        write_csv(&[], &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap().trim(),
            "indicator,date,scenario,value,lower,upper"
        );
    }

    #[test]
    fn test_json_export_serialization() {
        let store = sample_store();
        let run = sample_run(&store);
        let export = ForecastExport::new(&run, &store, &ForecastConfig::default(), &[2026, 2025]);

        let mut buf = Vec::new();
        write_json(&export, &mut buf).unwrap();
        let json = String::from_utf8(buf).unwrap();
        assert!(json.contains("\"input_digest\""));
        assert!(json.contains("\"scenario\": \"optimistic\""));

        let parsed = read_json(&json).unwrap();
        assert_eq!(parsed.metadata.years, vec![2025, 2026]);
        assert_eq!(parsed.rows.len(), run.rows.len());
        assert_eq!(parsed.metadata.config.optimism_factor, 1.3);
    }

    #[test]
    fn test_read_json_invalid() {
        assert!(matches!(read_json("{}"), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_input_digest_stable() {
        let a = input_digest(&sample_store());
        let b = input_digest(&sample_store());
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);

        let empty = input_digest(&RecordStore::default());
        assert_ne!(a, empty);
    }

    #[test]
    fn test_export_format_parse() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
