//! Impact reporting: the event/indicator matrix, a flat summary, cumulative
//! effect by date, and a check of a modeled impact against observed change.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::forecast::impact::{activation_date, resolve_event_impacts, resolve_indicator_impacts};
use crate::models::{Confidence, EventCategory, ImpactDirection};
use crate::records::RecordStore;

/// Event label x indicator code grid of impact estimates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactMatrix {
    /// Row labels, sorted
    pub events: Vec<String>,
    /// Column codes, sorted
    pub indicators: Vec<String>,
    /// `values[row][col]`; 0 where no link exists
    pub values: Vec<Vec<f64>>,
}

impl ImpactMatrix {
    pub fn get(&self, event: &str, indicator: &str) -> Option<f64> {
        let row = self.events.iter().position(|e| e == event)?;
        let col = self.indicators.iter().position(|i| i == indicator)?;
        Some(self.values[row][col])
    }
}

/// Build the matrix from resolvable links. When an event has several links to
/// one indicator the first one wins.
pub fn impact_matrix(store: &RecordStore) -> ImpactMatrix {
    let mut cells: BTreeMap<(String, String), f64> = BTreeMap::new();
    let mut events = BTreeSet::new();
    let mut indicators = BTreeSet::new();

    for link in store.impact_links() {
        let Some(event) = store.event(&link.parent_id) else {
            continue;
        };
        events.insert(event.label.clone());
        indicators.insert(link.indicator_code.clone());
        cells
            .entry((event.label.clone(), link.indicator_code.clone()))
            .or_insert(link.estimate);
    }

    let events: Vec<String> = events.into_iter().collect();
    let indicators: Vec<String> = indicators.into_iter().collect();
    let values = events
        .iter()
        .map(|e| {
            indicators
                .iter()
                .map(|i| cells.get(&(e.clone(), i.clone())).copied().unwrap_or(0.0))
                .collect()
        })
        .collect();

    ImpactMatrix {
        events,
        indicators,
        values,
    }
}

/// One row of the impact summary table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactSummaryRow {
    pub link_id: String,
    pub event: String,
    pub category: EventCategory,
    pub event_date: NaiveDate,
    pub indicator: String,
    pub direction: Option<ImpactDirection>,
    pub magnitude: Option<String>,
    pub estimate: f64,
    pub lag_months: i32,
    pub activation_date: NaiveDate,
    pub evidence: Option<String>,
    pub confidence: Option<Confidence>,
}

/// Every resolvable link with its event details, ordered by event date
pub fn impact_summary(store: &RecordStore) -> Vec<ImpactSummaryRow> {
    let mut rows: Vec<ImpactSummaryRow> = store
        .distinct_events()
        .flat_map(|event| {
            resolve_event_impacts(event, store.impact_links())
                .into_iter()
                .filter_map(move |resolved| {
                    let link = store
                        .impact_links()
                        .iter()
                        .find(|l| l.link_id == resolved.link_id && l.parent_id == event.record_id)?;
                    Some(ImpactSummaryRow {
                        link_id: resolved.link_id,
                        event: event.label.clone(),
                        category: event.category,
                        event_date: event.date,
                        indicator: resolved.indicator_code,
                        direction: link.direction,
                        magnitude: link.magnitude.clone(),
                        estimate: resolved.estimate,
                        lag_months: resolved.lag_months,
                        activation_date: resolved.activation_date,
                        evidence: link.evidence_basis.clone(),
                        confidence: link.confidence,
                    })
                })
        })
        .collect();

    rows.sort_by(|a, b| {
        a.event_date
            .cmp(&b.event_date)
            .then_with(|| a.link_id.cmp(&b.link_id))
    });
    rows
}

/// Total estimate of every impact on `indicator` active by `reference_date`
pub fn cumulative_impact(store: &RecordStore, indicator: &str, reference_date: NaiveDate) -> f64 {
    resolve_indicator_impacts(store, indicator)
        .iter()
        .filter(|i| i.is_active_on(reference_date))
        .map(|i| i.estimate)
        .sum()
}

/// How close the observed annualised change came to the modeled estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accuracy {
    Good,
    Moderate,
}

impl Accuracy {
    /// Within this many points per year counts as good
    pub const TOLERANCE: f64 = 2.0;

    pub fn grade(annualized_change: f64, predicted: f64) -> Self {
        if (annualized_change - predicted).abs() < Self::TOLERANCE {
            Self::Good
        } else {
            Self::Moderate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Moderate => "moderate",
        }
    }
}

impl std::fmt::Display for Accuracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Predicted vs observed change around an impact's activation date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactValidation {
    pub event: String,
    pub event_date: NaiveDate,
    pub activation_date: NaiveDate,
    pub indicator: String,
    pub predicted: f64,
    pub value_before: f64,
    pub date_before: NaiveDate,
    pub value_after: f64,
    pub date_after: NaiveDate,
    pub observed_change: f64,
    pub years: f64,
    pub annualized_change: f64,
    pub accuracy: Accuracy,
}

/// Compare the modeled estimate of `event_id` on `indicator` with the change
/// between the last observation before activation and the first one on or
/// after it.
pub fn validate_impact(
    store: &RecordStore,
    event_id: &str,
    indicator: &str,
) -> Result<ImpactValidation> {
    let event = store
        .event(event_id)
        .ok_or_else(|| Error::NotFound(format!("event {}", event_id)))?;

    let link = store
        .impact_links()
        .iter()
        .find(|l| l.parent_id == event_id && l.indicator_code == indicator)
        .ok_or_else(|| {
            Error::NotFound(format!("impact link from {} to {}", event_id, indicator))
        })?;

    let activation = activation_date(event.date, link.lag_months).ok_or_else(|| {
        Error::InvalidData(format!("lag of {} months is out of range", link.lag_months))
    })?;

    let series = store.series(indicator);
    let before = series.iter().rev().find(|o| o.date < activation);
    let after = series.iter().find(|o| o.date >= activation);

    let (Some(before), Some(after)) = (before, after) else {
        return Err(Error::MissingData {
            indicator: indicator.to_string(),
            reason: format!("no observations on both sides of {}", activation),
        });
    };

    let observed_change = after.value - before.value;
    let years = (after.date - before.date).num_days() as f64 / 365.25;
    let annualized_change = if years > 0.0 {
        observed_change / years
    } else {
        observed_change
    };

    Ok(ImpactValidation {
        event: event.label.clone(),
        event_date: event.date,
        activation_date: activation,
        indicator: indicator.to_string(),
        predicted: link.estimate,
        value_before: before.value,
        date_before: before.date,
        value_after: after.value,
        date_after: after.date,
        observed_change,
        years,
        annualized_change,
        accuracy: Accuracy::grade(annualized_change, link.estimate),
    })
}
