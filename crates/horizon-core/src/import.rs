//! CSV parsers for the record files
//!
//! The unified file carries observations, events and targets side by side,
//! distinguished by `record_type`. Impact links and the target mapping table
//! live in their own files.

use std::collections::HashMap;
use std::io::Read;

use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Event, EventCategory, ImpactLink, Observation, Source, Target};

/// Rows of a unified file after splitting by record type
#[derive(Debug, Default)]
pub struct UnifiedRecords {
    pub observations: Vec<Observation>,
    pub events: Vec<Event>,
    pub targets: Vec<Target>,
}

impl UnifiedRecords {
    pub fn extend(&mut self, other: UnifiedRecords) {
        self.observations.extend(other.observations);
        self.events.extend(other.events);
        self.targets.extend(other.targets);
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UnifiedRow {
    record_id: Option<String>,
    record_type: Option<String>,
    pillar: Option<String>,
    category: Option<String>,
    indicator: Option<String>,
    indicator_code: Option<String>,
    value_numeric: Option<String>,
    observation_date: Option<String>,
    source_name: Option<String>,
    source_url: Option<String>,
    confidence: Option<String>,
    notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ImpactRow {
    link_id: Option<String>,
    parent_id: Option<String>,
    indicator: Option<String>,
    impact_direction: Option<String>,
    impact_magnitude: Option<String>,
    impact_estimate: Option<String>,
    lag_months: Option<String>,
    evidence_basis: Option<String>,
    confidence: Option<String>,
    notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MappingRow {
    target_code: Option<String>,
    indicator_code: Option<String>,
}

/// Parse a unified record file
pub fn parse_unified<R: Read>(reader: R) -> Result<UnifiedRecords> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = UnifiedRecords::default();

    for (i, result) in rdr.deserialize::<UnifiedRow>().enumerate() {
        // Header is line 1
        let line = i + 2;
        let row = result?;

        let record_type = non_empty(row.record_type.as_deref()).map(|s| s.to_lowercase());
        match record_type.as_deref() {
            Some("observation") => records.observations.push(observation_from_row(row, line)?),
            Some("event") => records.events.push(event_from_row(row, line)?),
            Some("target") => records.targets.push(target_from_row(row, line)?),
            other => {
                debug!(line, record_type = ?other, "Skipping row with unsupported record type");
            }
        }
    }

    debug!(
        observations = records.observations.len(),
        events = records.events.len(),
        targets = records.targets.len(),
        "Parsed unified records"
    );
    Ok(records)
}

/// Parse an impact link file
pub fn parse_impact_links<R: Read>(reader: R) -> Result<Vec<ImpactLink>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut links = Vec::new();

    for (i, result) in rdr.deserialize::<ImpactRow>().enumerate() {
        let line = i + 2;
        let row = result?;

        let link_id = required(row.link_id.as_deref(), "link_id", line)?;
        let indicator_code = required(row.indicator.as_deref(), "indicator", line)?;

        // Blank estimate or lag means "no magnitude" / "immediate"
        let estimate = match non_empty(row.impact_estimate.as_deref()) {
            Some(s) => parse_value(s).map_err(|e| at_line(e, line))?,
            None => 0.0,
        };
        let lag_months = match non_empty(row.lag_months.as_deref()) {
            Some(s) => parse_lag(s).map_err(|e| at_line(e, line))?,
            None => 0,
        };

        links.push(ImpactLink {
            link_id,
            parent_id: non_empty(row.parent_id.as_deref())
                .unwrap_or_default()
                .to_string(),
            indicator_code,
            estimate,
            lag_months,
            direction: non_empty(row.impact_direction.as_deref()).and_then(|s| s.parse().ok()),
            magnitude: owned(row.impact_magnitude),
            evidence_basis: owned(row.evidence_basis),
            confidence: non_empty(row.confidence.as_deref()).and_then(|s| s.parse().ok()),
            notes: owned(row.notes),
        });
    }

    debug!("Parsed {} impact links", links.len());
    Ok(links)
}

/// Parse the explicit target code to indicator code table
pub fn parse_target_mapping<R: Read>(reader: R) -> Result<HashMap<String, String>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut mapping = HashMap::new();
    for (i, result) in rdr.deserialize::<MappingRow>().enumerate() {
        let line = i + 2;
        let row = result?;
        let target = required(row.target_code.as_deref(), "target_code", line)?;
        let indicator = required(row.indicator_code.as_deref(), "indicator_code", line)?;
        mapping.insert(target, indicator);
    }

    debug!("Parsed {} target mappings", mapping.len());
    Ok(mapping)
}

fn observation_from_row(row: UnifiedRow, line: usize) -> Result<Observation> {
    let indicator_code = required(row.indicator_code.as_deref(), "indicator_code", line)?;
    let value = parse_value(&required(
        row.value_numeric.as_deref(),
        "value_numeric",
        line,
    )?)
    .map_err(|e| at_line(e, line))?;
    let date = parse_date(&required(
        row.observation_date.as_deref(),
        "observation_date",
        line,
    )?)
    .map_err(|e| at_line(e, line))?;

    Ok(Observation {
        record_id: owned(row.record_id).unwrap_or_else(|| format!("row-{}", line)),
        indicator: owned(row.indicator).unwrap_or_else(|| indicator_code.clone()),
        indicator_code,
        date,
        value,
        pillar: owned(row.pillar),
        source: source_from(row.source_name, row.source_url, row.confidence),
    })
}

fn event_from_row(row: UnifiedRow, line: usize) -> Result<Event> {
    let record_id = required(row.record_id.as_deref(), "record_id", line)?;
    let date = parse_date(&required(
        row.observation_date.as_deref(),
        "observation_date",
        line,
    )?)
    .map_err(|e| at_line(e, line))?;
    let category: EventCategory = required(row.category.as_deref(), "category", line)?
        .parse()
        .map_err(|e: String| Error::Import(format!("line {}: {}", line, e)))?;

    Ok(Event {
        label: owned(row.indicator).unwrap_or_else(|| record_id.clone()),
        record_id,
        date,
        category,
        source: source_from(row.source_name, row.source_url, row.confidence),
        notes: owned(row.notes),
    })
}

fn target_from_row(row: UnifiedRow, line: usize) -> Result<Target> {
    let target_code = required(row.indicator_code.as_deref(), "indicator_code", line)?;
    let value = parse_value(&required(
        row.value_numeric.as_deref(),
        "value_numeric",
        line,
    )?)
    .map_err(|e| at_line(e, line))?;
    let date = parse_date(&required(
        row.observation_date.as_deref(),
        "observation_date",
        line,
    )?)
    .map_err(|e| at_line(e, line))?;

    Ok(Target {
        record_id: owned(row.record_id).unwrap_or_else(|| format!("row-{}", line)),
        label: owned(row.indicator).unwrap_or_else(|| target_code.clone()),
        target_code,
        value,
        date,
        source: source_from(row.source_name, row.source_url, row.confidence),
    })
}

fn source_from(name: Option<String>, url: Option<String>, confidence: Option<String>) -> Source {
    Source {
        name: owned(name),
        url: owned(url),
        confidence: non_empty(confidence.as_deref()).and_then(|s| s.parse().ok()),
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn owned(s: Option<String>) -> Option<String> {
    non_empty(s.as_deref()).map(str::to_string)
}

fn required(s: Option<&str>, field: &str, line: usize) -> Result<String> {
    non_empty(s)
        .map(str::to_string)
        .ok_or_else(|| Error::Import(format!("line {}: missing {}", line, field)))
}

fn at_line(e: Error, line: usize) -> Error {
    match e {
        Error::Import(msg) => Error::Import(format!("line {}: {}", line, msg)),
        other => other,
    }
}

/// Parse a date string in the formats seen in record exports
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d", // 2024-06-30
        "%m/%d/%Y", // 06/30/2024
        "%Y/%m/%d", // 2024/06/30
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    // Spreadsheet exports often carry a midnight timestamp
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }

    // Bare survey year: mid-year convention
    if s.len() == 4 {
        if let Ok(year) = s.parse::<i32>() {
            if let Some(date) = NaiveDate::from_ymd_opt(year, 6, 30) {
                return Ok(date);
            }
        }
    }

    Err(Error::Import(format!("Unable to parse date: {}", s)))
}

/// Parse a numeric value, tolerating percent signs and thousands separators
pub fn parse_value(s: &str) -> Result<f64> {
    let cleaned: String = s.trim().replace(['%', ',', ' '], "");

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::Import(format!("Unable to parse value: {}", s)))
}

/// Parse a whole-month lag; fractional values truncate toward zero
fn parse_lag(s: &str) -> Result<i32> {
    let v = parse_value(s)?;
    if v.abs() > 12_000.0 {
        return Err(Error::Import(format!("Lag out of range: {}", s)));
    }
    Ok(v.trunc() as i32)
}
