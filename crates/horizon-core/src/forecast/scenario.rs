//! Scenario composition
//!
//! Each scenario is the baseline plus a step adjustment for every impact
//! active on the point's date. Magnitudes are scaled by the scenario
//! multiplier first and then summed, so application order never matters and
//! a negative impact grows more negative under the optimistic factor.

use chrono::NaiveDate;

use crate::config::ForecastConfig;
use crate::error::{Error, Result};
use crate::models::{
    BaselinePoint, Confidence, Event, EventCategory, Scenario, ScenarioPoint, Source,
};

use super::impact::ResolvedImpact;

/// The three trajectories for one indicator
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSet {
    pub pessimistic: Vec<ScenarioPoint>,
    pub base: Vec<ScenarioPoint>,
    pub optimistic: Vec<ScenarioPoint>,
}

impl ScenarioSet {
    pub fn get(&self, scenario: Scenario) -> &[ScenarioPoint] {
        match scenario {
            Scenario::Pessimistic => &self.pessimistic,
            Scenario::Base => &self.base,
            Scenario::Optimistic => &self.optimistic,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Scenario, &[ScenarioPoint])> {
        Scenario::all().iter().map(move |&s| (s, self.get(s)))
    }
}

/// Summed adjustment at `date` with every magnitude scaled by `multiplier`
pub fn adjustment_at(impacts: &[ResolvedImpact], date: NaiveDate, multiplier: f64) -> f64 {
    impacts
        .iter()
        .filter(|i| i.is_active_on(date))
        .map(|i| i.estimate * multiplier)
        .sum()
}

/// One scenario trajectory. Values are not clamped.
pub fn compose_scenario(
    baseline: &[BaselinePoint],
    impacts: &[ResolvedImpact],
    scenario: Scenario,
    multiplier: f64,
) -> Vec<ScenarioPoint> {
    baseline
        .iter()
        .map(|p| ScenarioPoint {
            date: p.date,
            scenario,
            value: p.value + adjustment_at(impacts, p.date, multiplier),
            lower: None,
            upper: None,
        })
        .collect()
}

/// All three trajectories using the configured multipliers
pub fn compose_scenarios(
    baseline: &[BaselinePoint],
    impacts: &[ResolvedImpact],
    config: &ForecastConfig,
) -> ScenarioSet {
    let build = |s: Scenario| compose_scenario(baseline, impacts, s, config.multiplier(s));
    ScenarioSet {
        pessimistic: build(Scenario::Pessimistic),
        base: build(Scenario::Base),
        optimistic: build(Scenario::Optimistic),
    }
}

// ========== Hypothetical Events ==========

/// Planning events dated relative to `start_year`:
///
/// - `EVT_FUT_001` agent network expansion, June 1 of `start_year`
/// - `EVT_FUT_002` credit scoring framework, January 1 of the next year
/// - `EVT_FUT_003` 5G rollout, January 1 two years out
///
/// They carry no impacts of their own. Links in the impact file that name
/// these ids become active once the events are merged into a store with
/// [`RecordStore::with_events`](crate::records::RecordStore::with_events).
pub fn future_events(start_year: i32) -> Result<Vec<Event>> {
    let specs = [
        (
            "EVT_FUT_001",
            0,
            6,
            EventCategory::Infrastructure,
            "Agent Network Expansion",
            Confidence::Medium,
            "Projected agent network doubling",
        ),
        (
            "EVT_FUT_002",
            1,
            1,
            EventCategory::Policy,
            "Credit Scoring Framework",
            Confidence::Low,
            "Potential digital credit regulation",
        ),
        (
            "EVT_FUT_003",
            2,
            1,
            EventCategory::Infrastructure,
            "5G Rollout",
            Confidence::Low,
            "Potential 5G network deployment",
        ),
    ];

    specs
        .into_iter()
        .map(|(id, offset, month, category, label, confidence, notes)| -> Result<Event> {
            let year = start_year.checked_add(offset).ok_or_else(|| {
                Error::InvalidData(format!("year {} out of range", start_year))
            })?;
            let date = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
                Error::InvalidData(format!("year {} out of range", year))
            })?;
            Ok(Event {
                record_id: id.to_string(),
                date,
                category,
                label: label.to_string(),
                source: Source {
                    name: Some("Scenario planning".to_string()),
                    url: None,
                    confidence: Some(confidence),
                },
                notes: Some(notes.to_string()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn impact(id: &str, estimate: f64, activation: NaiveDate) -> ResolvedImpact {
        ResolvedImpact {
            link_id: id.to_string(),
            event_id: format!("EVT_{}", id),
            event_label: id.to_string(),
            indicator_code: "X".to_string(),
            estimate,
            lag_months: 0,
            activation_date: activation,
        }
    }

    fn baseline() -> Vec<BaselinePoint> {
        (2025..=2028)
            .map(|y| BaselinePoint {
                date: date(y, 6, 30),
                value: 40.0 + (y - 2025) as f64,
            })
            .collect()
    }

    #[test]
    fn test_future_impacts_leave_baseline_untouched() {
        let base = baseline();
        let impacts = vec![impact("A", 5.0, date(2030, 1, 1))];
        let set = compose_scenarios(&base, &impacts, &ForecastConfig::default());

        for (_, points) in set.iter() {
            for (p, b) in points.iter().zip(&base) {
                assert_eq!(p.value, b.value);
            }
        }
    }

    #[test]
    fn test_impacts_are_additive() {
        let base = baseline();
        let impacts = vec![
            impact("A", 2.0, date(2025, 1, 1)),
            impact("B", 3.0, date(2026, 1, 1)),
        ];
        let set = compose_scenarios(&base, &impacts, &ForecastConfig::default());

        // 2025: only A active
        assert!((set.base[0].value - (base[0].value + 2.0)).abs() < 1e-9);
        // 2026 onwards: both
        assert!((set.base[1].value - (base[1].value + 5.0)).abs() < 1e-9);
        assert!((set.base[3].value - (base[3].value + 5.0)).abs() < 1e-9);
    }

    #[test]
    fn test_order_independent() {
        let base = baseline();
        let a = impact("A", 2.5, date(2025, 1, 1));
        let b = impact("B", -1.25, date(2026, 3, 1));
        let c = impact("C", 4.0, date(2027, 6, 30));

        let forward = compose_scenario(&base, &[a.clone(), b.clone(), c.clone()], Scenario::Base, 1.0);
        let reverse = compose_scenario(&base, &[c, b, a], Scenario::Base, 1.0);
        for (f, r) in forward.iter().zip(&reverse) {
            assert!((f.value - r.value).abs() < 1e-12);
        }
    }

    #[test]
    fn test_scenario_scaling() {
        let base = baseline();
        let m = 4.0;
        let impacts = vec![impact("A", m, date(2025, 1, 1))];
        let set = compose_scenarios(&base, &impacts, &ForecastConfig::default());

        assert!((set.optimistic[0].value - (base[0].value + m * 1.3)).abs() < 1e-9);
        assert!((set.base[0].value - (base[0].value + m)).abs() < 1e-9);
        assert!((set.pessimistic[0].value - (base[0].value + m * 0.7)).abs() < 1e-9);
    }

    #[test]
    fn test_negative_impact_scaled_not_flipped() {
        let base = baseline();
        let impacts = vec![impact("A", -2.0, date(2025, 1, 1))];
        let set = compose_scenarios(&base, &impacts, &ForecastConfig::default());

        // Optimistic scales magnitude only: -2.0 * 1.3 = -2.6
        assert!((set.optimistic[0].value - (base[0].value - 2.6)).abs() < 1e-9);
        assert!((set.pessimistic[0].value - (base[0].value - 1.4)).abs() < 1e-9);
        assert!(set.optimistic[0].value < set.base[0].value);
    }

    #[test]
    fn test_custom_multipliers() {
        let base = baseline();
        let impacts = vec![impact("A", 10.0, date(2025, 1, 1))];
        let config = ForecastConfig {
            optimism_factor: 2.0,
            pessimism_factor: 0.0,
            ..ForecastConfig::default()
        };
        let set = compose_scenarios(&base, &impacts, &config);

        assert!((set.optimistic[0].value - (base[0].value + 20.0)).abs() < 1e-9);
        assert!((set.pessimistic[0].value - base[0].value).abs() < 1e-9);
    }

    #[test]
    fn test_activation_on_point_date_counts() {
        let base = baseline();
        let impacts = vec![impact("A", 1.0, date(2026, 6, 30))];
        let adjusted = compose_scenario(&base, &impacts, Scenario::Base, 1.0);

        assert_eq!(adjusted[0].value, base[0].value);
        assert!((adjusted[1].value - (base[1].value + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_values_not_clamped() {
        let base = vec![BaselinePoint {
            date: date(2025, 6, 30),
            value: 99.0,
        }];
        let impacts = vec![impact("A", 5.0, date(2020, 1, 1))];
        let adjusted = compose_scenario(&base, &impacts, Scenario::Optimistic, 1.3);
        assert!(adjusted[0].value > 100.0);
    }

    #[test]
    fn test_future_events_relative_to_start_year() {
        let events = future_events(2026).unwrap();

        let dates: Vec<NaiveDate> = events.iter().map(|e| e.date).collect();
        assert_eq!(
            dates,
            vec![date(2026, 6, 1), date(2027, 1, 1), date(2028, 1, 1)]
        );
        assert_eq!(events[0].record_id, "EVT_FUT_001");
        assert_eq!(events[1].category, EventCategory::Policy);
        assert_eq!(events[2].source.confidence, Some(Confidence::Low));
    }

    #[test]
    fn test_future_events_out_of_range() {
        assert!(future_events(i32::MAX).is_err());
    }
}
