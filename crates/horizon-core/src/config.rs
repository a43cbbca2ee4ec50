//! Forecast configuration
//!
//! Scenario multipliers, uncertainty settings and input file names.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/horizon/config/forecast.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::Scenario;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/forecast.toml");

/// Engine parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Multiplier on impact estimates for the optimistic scenario
    pub optimism_factor: f64,
    /// Multiplier on impact estimates for the pessimistic scenario
    pub pessimism_factor: f64,
    /// Two-sided confidence level for the base-scenario band
    pub confidence_level: f64,
    /// Relative half-width of the low-history band
    pub fallback_band: f64,
    pub bound_floor: f64,
    pub bound_ceiling: f64,
    /// Month of the calendar anchor used for every forecast year
    pub forecast_month: u32,
    /// Day of the calendar anchor used for every forecast year
    pub forecast_day: u32,
    /// Emit baseline rows in the forecast table
    pub include_baseline: bool,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            optimism_factor: 1.3,
            pessimism_factor: 0.7,
            confidence_level: 0.95,
            fallback_band: 0.10,
            bound_floor: 0.0,
            bound_ceiling: 100.0,
            forecast_month: 6,
            forecast_day: 30,
            include_baseline: true,
        }
    }
}

impl ForecastConfig {
    /// Check ranges; `ForecastEngine` refuses a config that fails here
    pub fn validate(&self) -> Result<()> {
        for (name, v) in [
            ("optimism_factor", self.optimism_factor),
            ("pessimism_factor", self.pessimism_factor),
            ("fallback_band", self.fallback_band),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::Config(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, v
                )));
            }
        }

        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(Error::Config(format!(
                "confidence_level must be between 0 and 1 (exclusive), got {}",
                self.confidence_level
            )));
        }

        if !(self.bound_floor.is_finite()
            && self.bound_ceiling.is_finite()
            && self.bound_floor < self.bound_ceiling)
        {
            return Err(Error::Config(format!(
                "bound_floor ({}) must be below bound_ceiling ({})",
                self.bound_floor, self.bound_ceiling
            )));
        }

        // Anchor must exist in every year, so Feb 29 is out. 2001 is not a leap year.
        if NaiveDate::from_ymd_opt(2001, self.forecast_month, self.forecast_day).is_none() {
            return Err(Error::Config(format!(
                "forecast anchor {:02}-{:02} is not a valid date in every year",
                self.forecast_month, self.forecast_day
            )));
        }

        Ok(())
    }

    /// Impact multiplier for a scenario; base is always 1
    pub fn multiplier(&self, scenario: Scenario) -> f64 {
        match scenario {
            Scenario::Pessimistic => self.pessimism_factor,
            Scenario::Base => 1.0,
            Scenario::Optimistic => self.optimism_factor,
        }
    }

    /// Forecast date for a year
    pub fn anchor_date(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.forecast_month, self.forecast_day)
    }
}

/// Names of the input files inside a data directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Observations, events and targets, split by `record_type`
    pub unified_file: String,
    pub impact_file: String,
    /// Extra unified-schema rows appended when present
    pub supplementary_file: String,
    /// Explicit target code to indicator code table, optional
    pub mapping_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            unified_file: "unified.csv".to_string(),
            impact_file: "impact_links.csv".to_string(),
            supplementary_file: "supplementary_data.csv".to_string(),
            mapping_file: "target_mapping.csv".to_string(),
        }
    }
}

/// Where the active settings came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Embedded,
    File(PathBuf),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Embedded => write!(f, "embedded defaults"),
            Self::File(p) => write!(f, "{}", p.display()),
        }
    }
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct Settings {
    pub forecast: ForecastConfig,
    pub data: DataConfig,
    pub source: ConfigSource,
}

impl Settings {
    /// Load from the default override location, else the embedded defaults
    pub fn load() -> Result<Self> {
        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Self::embedded(),
        }
    }

    /// Load from an explicit file; a missing file is an error
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        let (forecast, data) = parse_config(&content)?;
        tracing::debug!(path = %path.display(), "Loaded forecast config");
        Ok(Self {
            forecast,
            data,
            source: ConfigSource::File(path.to_path_buf()),
        })
    }

    /// The compiled-in defaults
    pub fn embedded() -> Result<Self> {
        let (forecast, data) = parse_config(DEFAULT_CONFIG)?;
        Ok(Self {
            forecast,
            data,
            source: ConfigSource::Embedded,
        })
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("horizon").join("config").join("forecast.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    scenarios: Option<RawScenarios>,
    uncertainty: Option<RawUncertainty>,
    output: Option<RawOutput>,
    data: Option<RawData>,
}

#[derive(Debug, Deserialize)]
struct RawScenarios {
    optimism_factor: Option<f64>,
    pessimism_factor: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawUncertainty {
    confidence_level: Option<f64>,
    fallback_band: Option<f64>,
    bound_floor: Option<f64>,
    bound_ceiling: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawOutput {
    forecast_month: Option<u32>,
    forecast_day: Option<u32>,
    include_baseline: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawData {
    unified_file: Option<String>,
    impact_file: Option<String>,
    supplementary_file: Option<String>,
    mapping_file: Option<String>,
}

/// Parse config from TOML content, filling gaps with defaults
fn parse_config(content: &str) -> Result<(ForecastConfig, DataConfig)> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut forecast = ForecastConfig::default();
    let mut data = DataConfig::default();

    if let Some(s) = raw.scenarios {
        if let Some(v) = s.optimism_factor {
            forecast.optimism_factor = v;
        }
        if let Some(v) = s.pessimism_factor {
            forecast.pessimism_factor = v;
        }
    }

    if let Some(u) = raw.uncertainty {
        if let Some(v) = u.confidence_level {
            forecast.confidence_level = v;
        }
        if let Some(v) = u.fallback_band {
            forecast.fallback_band = v;
        }
        if let Some(v) = u.bound_floor {
            forecast.bound_floor = v;
        }
        if let Some(v) = u.bound_ceiling {
            forecast.bound_ceiling = v;
        }
    }

    if let Some(o) = raw.output {
        if let Some(v) = o.forecast_month {
            forecast.forecast_month = v;
        }
        if let Some(v) = o.forecast_day {
            forecast.forecast_day = v;
        }
        if let Some(v) = o.include_baseline {
            forecast.include_baseline = v;
        }
    }

    if let Some(d) = raw.data {
        if let Some(v) = d.unified_file {
            data.unified_file = v;
        }
        if let Some(v) = d.impact_file {
            data.impact_file = v;
        }
        if let Some(v) = d.supplementary_file {
            data.supplementary_file = v;
        }
        if let Some(v) = d.mapping_file {
            data.mapping_file = v;
        }
    }

    forecast.validate()?;
    Ok((forecast, data))
}
