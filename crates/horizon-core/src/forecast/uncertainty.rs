//! Confidence bands for the base scenario
//!
//! The band half-width is `|central| * sigma * t * sqrt(h)`, where sigma is
//! the sample standard deviation of historical period-over-period growth
//! rates, t the two-sided Student-t critical value with `n - 1` degrees of
//! freedom and h the horizon in forecast years (first forecast year = 1).
//! Short histories get a fixed relative band instead.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ForecastConfig;
use crate::models::{Observation, ScenarioPoint};

use super::stats::{sample_std_dev, t_critical};

/// Fewest historical points for a statistical band
pub const MIN_POINTS_FOR_BAND: usize = 3;

/// How the bounds on a forecast were derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandMethod {
    /// Growth-rate volatility with a t critical value
    Statistical,
    /// Fixed relative band around the central value
    Fallback,
}

impl BandMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Statistical => "statistical",
            Self::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for BandMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Relative change between consecutive values. A zero predecessor has no
/// defined rate and is skipped.
pub fn growth_rates(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .filter(|r| r.is_finite())
        .collect()
}

/// Volatility and critical value, or `None` when the history is too short
fn band_parameters(history: &[&Observation], confidence: f64) -> Option<(f64, f64)> {
    if history.len() < MIN_POINTS_FOR_BAND {
        return None;
    }

    let values: Vec<f64> = history.iter().map(|o| o.value).collect();
    let sigma = sample_std_dev(&growth_rates(&values))?;
    let df = u32::try_from(history.len() - 1).ok()?;
    let t = t_critical(confidence, df)?;
    Some((sigma, t))
}

/// Attach lower and upper bounds to each base-scenario point.
///
/// `history` must be the indicator's observations in date order. Bounds are
/// clamped to the configured floor and ceiling; central values are left alone.
pub fn attach_bounds(
    history: &[&Observation],
    base: &mut [ScenarioPoint],
    config: &ForecastConfig,
) -> BandMethod {
    let clamp = |v: f64| v.clamp(config.bound_floor, config.bound_ceiling);

    let Some((sigma, t)) = band_parameters(history, config.confidence_level) else {
        debug!(
            points = history.len(),
            "Short history; using fallback band"
        );
        for p in base.iter_mut() {
            let a = p.value * (1.0 - config.fallback_band);
            let b = p.value * (1.0 + config.fallback_band);
            p.lower = Some(clamp(a.min(b)));
            p.upper = Some(clamp(a.max(b)));
        }
        return BandMethod::Fallback;
    };

    let Some(first_year) = base.iter().map(|p| p.date.year()).min() else {
        return BandMethod::Statistical;
    };

    for p in base.iter_mut() {
        let horizon = (p.date.year() - first_year + 1) as f64;
        let margin = p.value.abs() * sigma * t * horizon.sqrt();
        p.lower = Some(clamp(p.value - margin));
        p.upper = Some(clamp(p.value + margin));
    }
    BandMethod::Statistical
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Scenario;
    use crate::test_utils::observation;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn history(values: &[(i32, f64)]) -> Vec<Observation> {
        values
            .iter()
            .map(|&(y, v)| observation("X", date(y, 6, 30), v))
            .collect()
    }

    fn base_points(values: &[(i32, f64)]) -> Vec<ScenarioPoint> {
        values
            .iter()
            .map(|&(y, v)| ScenarioPoint {
                date: date(y, 6, 30),
                scenario: Scenario::Base,
                value: v,
                lower: None,
                upper: None,
            })
            .collect()
    }

    #[test]
    fn test_growth_rates_skip_zero_predecessor() {
        let rates = growth_rates(&[0.0, 20.0, 30.0, 45.0]);
        assert_eq!(rates.len(), 2);
        assert!((rates[0] - 0.5).abs() < 1e-12);
        assert!((rates[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_fallback_band_for_short_history() {
        let obs = history(&[(2020, 30.0), (2023, 40.0)]);
        let hist: Vec<&Observation> = obs.iter().collect();
        let mut base = base_points(&[(2025, 50.0), (2026, 55.0)]);

        let method = attach_bounds(&hist, &mut base, &ForecastConfig::default());

        assert_eq!(method, BandMethod::Fallback);
        assert!((base[0].lower.unwrap() - 45.0).abs() < 1e-9);
        assert!((base[0].upper.unwrap() - 55.0).abs() < 1e-9);
        assert!((base[1].upper.unwrap() - 60.5).abs() < 1e-9);
    }

    #[test]
    fn test_fallback_band_clamped() {
        let obs = history(&[(2020, 90.0)]);
        let hist: Vec<&Observation> = obs.iter().collect();
        let mut base = base_points(&[(2025, 95.0)]);

        attach_bounds(&hist, &mut base, &ForecastConfig::default());
        assert_eq!(base[0].upper, Some(100.0));
    }

    #[test]
    fn test_statistical_band_values() {
        // Rates 0.5, 0.5, 0.2: mean 0.4, sample sd sqrt(0.03)
        let obs = history(&[(2015, 10.0), (2017, 15.0), (2019, 22.5), (2021, 27.0)]);
        let hist: Vec<&Observation> = obs.iter().collect();
        let mut base = base_points(&[(2025, 40.0)]);

        let method = attach_bounds(&hist, &mut base, &ForecastConfig::default());
        assert_eq!(method, BandMethod::Statistical);

        // df = 3, t = 3.182
        let margin = 40.0 * 0.03_f64.sqrt() * 3.182;
        assert!((base[0].lower.unwrap() - (40.0 - margin)).abs() < 0.01);
        assert!((base[0].upper.unwrap() - (40.0 + margin).min(100.0)).abs() < 0.01);
        assert_eq!(base[0].value, 40.0);
    }

    #[test]
    fn test_width_non_decreasing_with_horizon() {
        let obs = history(&[(2011, 14.0), (2014, 22.0), (2017, 35.0), (2021, 46.0), (2024, 49.0)]);
        let hist: Vec<&Observation> = obs.iter().collect();
        let mut base = base_points(&[(2025, 20.0), (2026, 21.0), (2027, 22.0), (2028, 23.0)]);

        attach_bounds(&hist, &mut base, &ForecastConfig::default());

        let widths: Vec<f64> = base
            .iter()
            .map(|p| p.upper.unwrap() - p.lower.unwrap())
            .collect();
        for w in widths.windows(2) {
            assert!(w[1] >= w[0] - 1e-12, "widths {:?}", widths);
        }
    }

    #[test]
    fn test_bounds_always_within_range() {
        let obs = history(&[(2011, 14.0), (2014, 22.0), (2017, 35.0), (2021, 46.0), (2024, 49.0)]);
        let hist: Vec<&Observation> = obs.iter().collect();
        let mut base = base_points(&[(2025, 55.0), (2026, 60.0), (2027, 75.0), (2028, 98.0)]);

        attach_bounds(&hist, &mut base, &ForecastConfig::default());

        for p in &base {
            let (lo, hi) = (p.lower.unwrap(), p.upper.unwrap());
            assert!((0.0..=100.0).contains(&lo));
            assert!((0.0..=100.0).contains(&hi));
            assert!(lo <= p.value && p.value <= hi);
        }
    }

    #[test]
    fn test_too_few_rates_falls_back() {
        // Three points but two zero predecessors leave one rate
        let obs = history(&[(2019, 0.0), (2020, 0.0), (2021, 5.0)]);
        let hist: Vec<&Observation> = obs.iter().collect();
        let mut base = base_points(&[(2025, 10.0)]);

        let method = attach_bounds(&hist, &mut base, &ForecastConfig::default());
        assert_eq!(method, BandMethod::Fallback);
    }

    #[test]
    fn test_negative_central_keeps_bounds_ordered() {
        let config = ForecastConfig {
            bound_floor: -100.0,
            ..ForecastConfig::default()
        };
        let obs = history(&[(2015, 10.0), (2017, 15.0), (2019, 22.5), (2021, 27.0)]);
        let hist: Vec<&Observation> = obs.iter().collect();
        let mut base = base_points(&[(2025, -5.0)]);

        attach_bounds(&hist, &mut base, &config);
        assert!(base[0].lower.unwrap() < base[0].upper.unwrap());
    }
}
