//! Baseline trend projection
//!
//! One least-squares line per indicator, value against day number, so
//! unevenly spaced survey rounds are weighted by their actual distance.

use chrono::{Datelike, NaiveDate};

use crate::error::{Error, Result};
use crate::models::{BaselinePoint, Observation};

use super::stats::{least_squares, LinearFit};

/// Fitted trend for one indicator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendModel {
    fit: LinearFit,
}

impl TrendModel {
    /// Fit a trend to a historical series.
    ///
    /// Fewer than two points, or points that all share one date, are refused
    /// with `InsufficientHistory`.
    pub fn fit(indicator: &str, series: &[&Observation]) -> Result<Self> {
        let points: Vec<(f64, f64)> = series.iter().map(|o| (day_number(o.date), o.value)).collect();

        least_squares(&points)
            .map(|fit| Self { fit })
            .ok_or_else(|| Error::InsufficientHistory {
                indicator: indicator.to_string(),
                points: series.len(),
            })
    }

    /// Fitted value at a date; unbounded, never clamped
    pub fn value_at(&self, date: NaiveDate) -> f64 {
        self.fit.predict(day_number(date))
    }

    /// Change per year, for display
    pub fn slope_per_year(&self) -> f64 {
        self.fit.slope * 365.25
    }
}

/// Project an indicator's trend to each requested date.
///
/// An empty series yields an empty projection.
pub fn project_trend(
    indicator: &str,
    series: &[&Observation],
    dates: &[NaiveDate],
) -> Result<Vec<BaselinePoint>> {
    if series.is_empty() {
        return Ok(Vec::new());
    }

    let model = TrendModel::fit(indicator, series)?;
    Ok(dates
        .iter()
        .map(|&date| BaselinePoint {
            date,
            value: model.value_at(date),
        })
        .collect())
}

/// Proleptic Gregorian day count, 0001-01-01 = 1
fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}
