//! Record store
//!
//! Immutable, in-memory collections of observations, events, impact links and
//! targets. Built once by the caller and borrowed by the engine for a run.

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::config::DataConfig;
use crate::error::{Error, Result};
use crate::import::{parse_impact_links, parse_target_mapping, parse_unified};
use crate::models::{Event, ImpactLink, Observation, Target};

/// The four record collections plus the declared target mapping
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    observations: Vec<Observation>,
    events: Vec<Event>,
    impact_links: Vec<ImpactLink>,
    targets: Vec<Target>,
    /// target code -> indicator code
    target_mappings: HashMap<String, String>,
    event_index: HashMap<String, usize>,
}

/// Latest value of an indicator and its change since the prior observation
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSnapshot {
    pub indicator_code: String,
    pub indicator: String,
    pub value: f64,
    pub date: NaiveDate,
    pub change: Option<f64>,
    pub observation_count: usize,
}

impl RecordStore {
    /// Build a store from already-normalized collections
    pub fn new(
        mut observations: Vec<Observation>,
        events: Vec<Event>,
        impact_links: Vec<ImpactLink>,
        targets: Vec<Target>,
    ) -> Self {
        // Stable sort keeps file order for same-day observations
        observations.sort_by(|a, b| {
            a.indicator_code
                .cmp(&b.indicator_code)
                .then_with(|| a.date.cmp(&b.date))
        });

        let mut event_index = HashMap::with_capacity(events.len());
        for (i, event) in events.iter().enumerate() {
            if event_index.insert(event.record_id.clone(), i).is_some() {
                debug!(event = %event.record_id, "Duplicate event id; later record wins");
            }
        }

        Self {
            observations,
            events,
            impact_links,
            targets,
            target_mappings: HashMap::new(),
            event_index,
        }
    }

    /// Attach the explicit target code to indicator code table
    pub fn with_target_mappings(mut self, mappings: HashMap<String, String>) -> Self {
        self.target_mappings = mappings;
        self
    }

    /// Append events, such as hypothetical ones for scenario planning. An id
    /// that already exists resolves to the appended record.
    pub fn with_events(self, extra: impl IntoIterator<Item = Event>) -> Self {
        let mut events = self.events;
        events.extend(extra);
        Self::new(self.observations, events, self.impact_links, self.targets)
            .with_target_mappings(self.target_mappings)
    }

    /// Load a data directory laid out per `DataConfig`.
    ///
    /// The unified file is required; impact links, supplementary rows and the
    /// target mapping are optional. A supplementary file that fails to parse
    /// is logged and ignored.
    pub fn load_dir(dir: &Path, files: &DataConfig) -> Result<Self> {
        let unified_path = dir.join(&files.unified_file);
        if !unified_path.exists() {
            return Err(Error::NotFound(format!(
                "record file {}",
                unified_path.display()
            )));
        }
        let mut records = parse_unified(File::open(&unified_path)?)?;

        let supp_path = dir.join(&files.supplementary_file);
        if supp_path.exists() {
            debug!(path = %supp_path.display(), "Loading supplementary records");
            match File::open(&supp_path)
                .map_err(Error::from)
                .and_then(parse_unified)
            {
                Ok(extra) => records.extend(extra),
                Err(e) => {
                    warn!(path = %supp_path.display(), error = %e, "Skipping supplementary records")
                }
            }
        }

        let impact_path = dir.join(&files.impact_file);
        let impact_links = if impact_path.exists() {
            parse_impact_links(File::open(&impact_path)?)?
        } else {
            debug!(path = %impact_path.display(), "No impact link file; continuing without impacts");
            Vec::new()
        };

        let mapping_path = dir.join(&files.mapping_file);
        let mappings = if mapping_path.exists() {
            parse_target_mapping(File::open(&mapping_path)?)?
        } else {
            HashMap::new()
        };

        let store = Self::new(
            records.observations,
            records.events,
            impact_links,
            records.targets,
        )
        .with_target_mappings(mappings);

        info!(
            observations = store.observations.len(),
            events = store.events.len(),
            impact_links = store.impact_links.len(),
            targets = store.targets.len(),
            "Loaded records from {}",
            dir.display()
        );
        Ok(store)
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events in file order with duplicate ids collapsed to the record that
    /// `event` resolves to
    pub fn distinct_events(&self) -> impl Iterator<Item = &Event> + '_ {
        self.events
            .iter()
            .enumerate()
            .filter(|(i, e)| self.event_index.get(&e.record_id) == Some(i))
            .map(|(_, e)| e)
    }

    pub fn impact_links(&self) -> &[ImpactLink] {
        &self.impact_links
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn target_mappings(&self) -> &HashMap<String, String> {
        &self.target_mappings
    }

    /// Distinct indicator codes with at least one observation, sorted
    pub fn indicators(&self) -> Vec<String> {
        self.observations
            .iter()
            .map(|o| o.indicator_code.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Historical series for an indicator, ordered by date
    pub fn series(&self, indicator_code: &str) -> Vec<&Observation> {
        self.observations
            .iter()
            .filter(|o| o.indicator_code == indicator_code)
            .collect()
    }

    /// Look up an event by exact id
    pub fn event(&self, record_id: &str) -> Option<&Event> {
        self.event_index.get(record_id).map(|&i| &self.events[i])
    }

    /// Impact links aimed at an indicator, resolvable or not
    pub fn links_for_indicator(&self, indicator_code: &str) -> Vec<&ImpactLink> {
        self.impact_links
            .iter()
            .filter(|l| l.indicator_code == indicator_code)
            .collect()
    }

    /// Most recent observation of an indicator
    pub fn latest(&self, indicator_code: &str) -> Option<&Observation> {
        self.series(indicator_code).into_iter().last()
    }

    /// Indicator a target tracks: the declared mapping, else an exact code match
    pub fn indicator_for_target(&self, target: &Target) -> Option<&str> {
        if let Some(code) = self.target_mappings.get(&target.target_code) {
            return Some(code.as_str());
        }
        self.observations
            .iter()
            .find(|o| o.indicator_code == target.target_code)
            .map(|o| o.indicator_code.as_str())
    }

    /// Earliest-dated target for an indicator
    pub fn target_for(&self, indicator_code: &str) -> Option<&Target> {
        self.targets
            .iter()
            .filter(|t| self.indicator_for_target(t) == Some(indicator_code))
            .min_by_key(|t| t.date)
    }

    /// Latest value and last change for every indicator
    pub fn snapshot(&self) -> Vec<IndicatorSnapshot> {
        self.indicators()
            .into_iter()
            .filter_map(|code| {
                let series = self.series(&code);
                let last = *series.last()?;
                let change = series
                    .len()
                    .checked_sub(2)
                    .map(|i| last.value - series[i].value);
                Some(IndicatorSnapshot {
                    indicator_code: code,
                    indicator: last.indicator.clone(),
                    value: last.value,
                    date: last.date,
                    change,
                    observation_count: series.len(),
                })
            })
            .collect()
    }
}
