//! Forecasting - event-adjusted indicator projections
//!
//! Each indicator runs the same pipeline:
//!
//! - **Trend** - least-squares baseline projected to each forecast date
//! - **Impact** - impact links bound to their events with activation dates
//! - **Scenario** - pessimistic, base and optimistic adjustments of the baseline
//! - **Uncertainty** - confidence band around the base scenario
//!
//! [`ForecastEngine`] runs the pipeline for every indicator in a
//! [`RecordStore`](crate::records::RecordStore) and merges the results.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use horizon_core::{ForecastConfig, ForecastEngine, RecordStore};
//!
//! let store = RecordStore::load_dir(&data_dir, &DataConfig::default())?;
//! let engine = ForecastEngine::new(&store, ForecastConfig::default());
//! let run = engine.run(&[2025, 2026, 2027])?;
//! ```

pub mod engine;
pub mod impact;
pub mod scenario;
pub mod stats;
pub mod trend;
pub mod uncertainty;

pub use engine::{ForecastEngine, ForecastRun, IndicatorForecast, SkippedIndicator};
pub use impact::{activation_date, resolve_event_impacts, resolve_indicator_impacts, ResolvedImpact};
pub use scenario::{compose_scenario, compose_scenarios, future_events, ScenarioSet};
pub use trend::{project_trend, TrendModel};
pub use uncertainty::{attach_bounds, BandMethod};
