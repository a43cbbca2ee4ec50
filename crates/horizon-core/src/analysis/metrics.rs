//! Headline numbers for one indicator forecast

use serde::{Deserialize, Serialize};

use crate::forecast::IndicatorForecast;
use crate::models::Target;

/// Summary of a forecast window, optionally against a target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastMetrics {
    pub indicator: String,
    pub final_value: f64,
    pub forecast_years: usize,
    /// Last base value minus first base value
    pub total_growth: f64,
    /// Total growth over the number of base points
    pub average_growth: f64,
    pub target: Option<f64>,
    /// Target minus final value; negative means exceeded
    pub gap_to_target: Option<f64>,
    pub on_track: Option<bool>,
    pub best_case: f64,
    pub worst_case: f64,
    pub scenario_range: f64,
}

/// `None` when the forecast has no points
pub fn forecast_metrics(
    forecast: &IndicatorForecast,
    target: Option<&Target>,
) -> Option<ForecastMetrics> {
    let base = &forecast.scenarios.base;
    let first = base.first()?;
    let last = base.last()?;
    let best_case = forecast.scenarios.optimistic.last()?.value;
    let worst_case = forecast.scenarios.pessimistic.last()?.value;

    let total_growth = last.value - first.value;
    let gap = target.map(|t| t.value - last.value);

    Some(ForecastMetrics {
        indicator: forecast.indicator.clone(),
        final_value: last.value,
        forecast_years: base.len(),
        total_growth,
        average_growth: total_growth / base.len() as f64,
        target: target.map(|t| t.value),
        gap_to_target: gap,
        on_track: gap.map(|g| g <= 0.0),
        best_case,
        worst_case,
        scenario_range: best_case - worst_case,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForecastConfig;
    use crate::forecast::ForecastEngine;
    use crate::test_utils::sample_store;

    #[test]
    fn test_metrics_against_target() {
        let store = sample_store();
        let engine = ForecastEngine::new(&store, ForecastConfig::default());
        let forecast = engine
            .forecast_indicator("ACC_OWNERSHIP", &[2025, 2026, 2027])
            .unwrap();

        let metrics = forecast_metrics(&forecast, store.target_for("ACC_OWNERSHIP")).unwrap();

        assert_eq!(metrics.forecast_years, 3);
        assert_eq!(metrics.target, Some(60.0));
        let base = &forecast.scenarios.base;
        assert!((metrics.total_growth - (base[2].value - base[0].value)).abs() < 1e-9);
        assert!((metrics.average_growth - metrics.total_growth / 3.0).abs() < 1e-9);
        assert!((metrics.gap_to_target.unwrap() - (60.0 - base[2].value)).abs() < 1e-9);
        assert!(metrics.best_case >= metrics.worst_case);
        assert!((metrics.scenario_range - (metrics.best_case - metrics.worst_case)).abs() < 1e-9);
    }

    #[test]
    fn test_metrics_without_target() {
        let store = sample_store();
        let engine = ForecastEngine::new(&store, ForecastConfig::default());
        let forecast = engine
            .forecast_indicator("MM_TELEBIRR_USERS", &[2025])
            .unwrap();

        let metrics = forecast_metrics(&forecast, None).unwrap();
        assert_eq!(metrics.total_growth, 0.0);
        assert!(metrics.gap_to_target.is_none());
        assert!(metrics.on_track.is_none());
        // No impacts: every scenario sits on the baseline
        assert_eq!(metrics.scenario_range, 0.0);
    }

    #[test]
    fn test_metrics_empty_forecast() {
        let store = sample_store();
        let engine = ForecastEngine::new(&store, ForecastConfig::default());
        let forecast = engine.forecast_indicator("ACC_OWNERSHIP", &[]).unwrap();
        assert!(forecast_metrics(&forecast, None).is_none());
    }
}
