//! Forecast Engine - runs the per-indicator pipeline across the record store
//!
//! trend -> impacts -> scenarios -> bounds, once per indicator on the rayon
//! pool. A failing indicator is logged, recorded as skipped and does not
//! affect the others. Output rows are sorted before returning.

use chrono::{Datelike, NaiveDate};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ForecastConfig;
use crate::error::{Error, Result};
use crate::models::{BaselinePoint, ForecastRow, Scenario, ScenarioPoint, SeriesKind};
use crate::records::RecordStore;

use super::impact::{resolve_indicator_impacts, ResolvedImpact};
use super::scenario::{compose_scenarios, ScenarioSet};
use super::trend::project_trend;
use super::uncertainty::{attach_bounds, BandMethod};

/// Full result for one indicator
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorForecast {
    pub indicator: String,
    /// Human label from the latest observation
    pub label: String,
    pub history_points: usize,
    pub baseline: Vec<BaselinePoint>,
    pub scenarios: ScenarioSet,
    /// Impacts aimed at this indicator, whether or not active in the window
    pub impacts: Vec<ResolvedImpact>,
    pub band: BandMethod,
}

impl IndicatorForecast {
    /// Base-scenario point dated in `year`
    pub fn base_at(&self, year: i32) -> Option<&ScenarioPoint> {
        self.scenarios.base.iter().find(|p| p.date.year() == year)
    }

    /// Flatten into table rows; only base rows carry bounds
    pub fn rows(&self, include_baseline: bool) -> Vec<ForecastRow> {
        let mut rows = Vec::with_capacity(self.baseline.len() * 4);

        if include_baseline {
            rows.extend(self.baseline.iter().map(|p| ForecastRow {
                indicator: self.indicator.clone(),
                date: p.date,
                scenario: SeriesKind::Baseline,
                value: p.value,
                lower: None,
                upper: None,
            }));
        }

        for (scenario, points) in self.scenarios.iter() {
            rows.extend(points.iter().map(|p| ForecastRow {
                indicator: self.indicator.clone(),
                date: p.date,
                scenario: scenario.into(),
                value: p.value,
                lower: if scenario == Scenario::Base { p.lower } else { None },
                upper: if scenario == Scenario::Base { p.upper } else { None },
            }));
        }

        rows
    }
}

/// An indicator that produced no forecast, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedIndicator {
    pub indicator: String,
    pub reason: String,
}

/// Output of a full run
#[derive(Debug, Clone, Default)]
pub struct ForecastRun {
    /// Sorted by indicator, date, then series
    pub rows: Vec<ForecastRow>,
    /// Sorted by indicator code
    pub indicators: Vec<IndicatorForecast>,
    pub skipped: Vec<SkippedIndicator>,
}

impl ForecastRun {
    pub fn indicator(&self, code: &str) -> Option<&IndicatorForecast> {
        self.indicators.iter().find(|f| f.indicator == code)
    }
}

/// Orchestrates forecasts over a borrowed record store
pub struct ForecastEngine<'a> {
    store: &'a RecordStore,
    config: ForecastConfig,
}

impl<'a> ForecastEngine<'a> {
    pub fn new(store: &'a RecordStore, config: ForecastConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Anchor dates for the requested years, ascending and de-duplicated.
    ///
    /// Fails with `Error::Config` when the engine's config does not validate,
    /// so both `run` and `forecast_indicator` refuse bad bounds up front.
    pub fn forecast_dates(&self, years: &[i32]) -> Result<Vec<NaiveDate>> {
        self.config.validate()?;

        let mut years = years.to_vec();
        years.sort_unstable();
        years.dedup();

        years
            .into_iter()
            .map(|y| {
                self.config.anchor_date(y).ok_or_else(|| {
                    Error::Config(format!(
                        "no forecast date {:02}-{:02} in {}",
                        self.config.forecast_month, self.config.forecast_day, y
                    ))
                })
            })
            .collect()
    }

    /// Forecast a single indicator for the given years
    pub fn forecast_indicator(&self, code: &str, years: &[i32]) -> Result<IndicatorForecast> {
        let dates = self.forecast_dates(years)?;
        self.forecast_at(code, &dates)
    }

    fn forecast_at(&self, code: &str, dates: &[NaiveDate]) -> Result<IndicatorForecast> {
        let history = self.store.series(code);
        let Some(last) = history.last() else {
            return Err(Error::MissingData {
                indicator: code.to_string(),
                reason: "no observations".to_string(),
            });
        };
        let label = last.indicator.clone();

        let baseline = project_trend(code, &history, dates)?;
        let impacts = resolve_indicator_impacts(self.store, code);
        let mut scenarios = compose_scenarios(&baseline, &impacts, &self.config);
        let band = attach_bounds(&history, &mut scenarios.base, &self.config);

        tracing::debug!(
            indicator = code,
            points = history.len(),
            impacts = impacts.len(),
            band = band.as_str(),
            "Indicator forecast complete"
        );

        Ok(IndicatorForecast {
            indicator: code.to_string(),
            label,
            history_points: history.len(),
            baseline,
            scenarios,
            impacts,
            band,
        })
    }

    /// Forecast every indicator in the store.
    ///
    /// Only configuration problems fail the run; per-indicator errors land in
    /// `skipped`.
    pub fn run(&self, years: &[i32]) -> Result<ForecastRun> {
        let dates = self.forecast_dates(years)?;
        let codes = self.store.indicators();

        let results: Vec<(String, Result<IndicatorForecast>)> = codes
            .into_par_iter()
            .map(|code| {
                let result = self.forecast_at(&code, &dates);
                (code, result)
            })
            .collect();

        let mut run = ForecastRun::default();
        for (code, result) in results {
            match result {
                Ok(forecast) => run.indicators.push(forecast),
                Err(e) => {
                    tracing::warn!(indicator = %code, error = %e, "Indicator forecast failed");
                    run.skipped.push(SkippedIndicator {
                        indicator: code,
                        reason: e.to_string(),
                    });
                }
            }
        }

        run.indicators.sort_by(|a, b| a.indicator.cmp(&b.indicator));
        run.skipped.sort_by(|a, b| a.indicator.cmp(&b.indicator));

        run.rows = run
            .indicators
            .iter()
            .flat_map(|f| f.rows(self.config.include_baseline))
            .collect();
        run.rows.sort_by(|a, b| {
            a.indicator
                .cmp(&b.indicator)
                .then_with(|| a.date.cmp(&b.date))
                .then_with(|| a.scenario.cmp(&b.scenario))
        });

        tracing::info!(
            indicators = run.indicators.len(),
            skipped = run.skipped.len(),
            rows = run.rows.len(),
            "Forecast run complete"
        );
        Ok(run)
    }
}
