//! Analysis - reporting on top of the record store and forecasts
//!
//! - **Impacts** - event/indicator matrix, summary table, cumulative effect,
//!   and validation of a modeled impact against observed data
//! - **Targets** - progress of the latest observation toward each target
//! - **Metrics** - growth, target gap and scenario spread of a forecast

pub mod impacts;
pub mod metrics;
pub mod targets;

pub use impacts::{
    cumulative_impact, impact_matrix, impact_summary, validate_impact, Accuracy, ImpactMatrix,
    ImpactSummaryRow, ImpactValidation,
};
pub use metrics::{forecast_metrics, ForecastMetrics};
pub use targets::{progress_to_target, target_progress, ProgressStatus, TargetProgress};
