//! Horizon Core Library
//!
//! Event-adjusted forecasting of socioeconomic indicators:
//! - CSV record store for observations, events, impact links and targets
//! - Least-squares trend projection per indicator
//! - Impact resolution with calendar-month lags
//! - Pessimistic / base / optimistic scenarios with confidence bands
//! - Impact validation, target progress and forecast metrics
//! - CSV and JSON export of forecast runs

pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod forecast;
pub mod import;
pub mod models;
pub mod records;

/// Record builders and the reference sample store
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use analysis::{
    cumulative_impact, forecast_metrics, impact_matrix, impact_summary, progress_to_target,
    target_progress, validate_impact, ForecastMetrics, ImpactMatrix, ImpactSummaryRow,
    ImpactValidation, ProgressStatus, TargetProgress,
};
pub use config::{ConfigSource, DataConfig, ForecastConfig, Settings};
pub use error::{Error, Result};
pub use export::{ExportFormat, ForecastExport, ForecastMetadata};
pub use forecast::{
    future_events, BandMethod, ForecastEngine, ForecastRun, IndicatorForecast, ResolvedImpact,
    ScenarioSet, SkippedIndicator,
};
pub use records::{IndicatorSnapshot, RecordStore};
