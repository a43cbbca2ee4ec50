//! Progress toward declared targets

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::Target;
use crate::records::RecordStore;

/// Progress band for a ratio expressed in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    Achieved,
    OnTrack,
    Moderate,
    Behind,
}

impl ProgressStatus {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 100.0 {
            Self::Achieved
        } else if percent >= 80.0 {
            Self::OnTrack
        } else if percent >= 60.0 {
            Self::Moderate
        } else {
            Self::Behind
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Achieved => "achieved",
            Self::OnTrack => "on_track",
            Self::Moderate => "moderate",
            Self::Behind => "behind",
        }
    }
}

impl std::fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `current / target` in percent, with its band
pub fn progress_to_target(current: f64, target: f64) -> Result<(f64, ProgressStatus)> {
    if target == 0.0 || !target.is_finite() {
        return Err(Error::InvalidData(format!(
            "target value must be non-zero, got {}",
            target
        )));
    }
    let percent = current / target * 100.0;
    Ok((percent, ProgressStatus::from_percent(percent)))
}

/// Latest observation measured against one target milestone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetProgress {
    /// The milestone itself; a target code may declare several dates
    pub target: Target,
    pub indicator_code: String,
    pub current_value: f64,
    pub current_date: NaiveDate,
    pub percent: f64,
    pub status: ProgressStatus,
}

/// Progress for every target that maps to an observed indicator.
/// Unmapped targets and zero-valued targets are skipped.
pub fn target_progress(store: &RecordStore) -> Vec<TargetProgress> {
    store
        .targets()
        .iter()
        .filter_map(|target| {
            let Some(code) = store.indicator_for_target(target) else {
                tracing::debug!(target = %target.target_code, "Target has no mapped indicator");
                return None;
            };
            let latest = store.latest(code)?;
            let (percent, status) = match progress_to_target(latest.value, target.value) {
                Ok(p) => p,
                Err(e) => {
                    tracing::warn!(target = %target.target_code, error = %e, "Skipping target");
                    return None;
                }
            };
            Some(TargetProgress {
                target: target.clone(),
                indicator_code: code.to_string(),
                current_value: latest.value,
                current_date: latest.date,
                percent,
                status,
            })
        })
        .collect()
}
