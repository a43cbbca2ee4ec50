//! Domain models for Horizon

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where a record came from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub name: Option<String>,
    pub url: Option<String>,
    /// Informational only; never used in computation
    pub confidence: Option<Confidence>,
}

/// Confidence tier attached to sources and impact links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::str::FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" | "med" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(format!("Unknown confidence: {}", s)),
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single measured value of an indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub record_id: String,
    /// Indicator code, e.g. ACC_OWNERSHIP
    pub indicator_code: String,
    /// Human label, e.g. "Account Ownership Rate"
    pub indicator: String,
    pub date: NaiveDate,
    pub value: f64,
    pub pillar: Option<String>,
    pub source: Source,
}

// ========== Event Models ==========

/// Kind of real-world occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    ProductLaunch,
    Policy,
    Infrastructure,
    Market,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProductLaunch => "product_launch",
            Self::Policy => "policy",
            Self::Infrastructure => "infrastructure",
            Self::Market => "market",
        }
    }
}

impl std::str::FromStr for EventCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "product_launch" => Ok(Self::ProductLaunch),
            "policy" => Ok(Self::Policy),
            "infrastructure" => Ok(Self::Infrastructure),
            "market" => Ok(Self::Market),
            _ => Err(format!("Unknown event category: {}", s)),
        }
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A discrete policy or market occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub record_id: String,
    pub date: NaiveDate,
    pub category: EventCategory,
    /// Free-text label, e.g. "Telebirr Launch"
    pub label: String,
    pub source: Source,
    pub notes: Option<String>,
}

/// Qualitative direction tag on an impact link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactDirection {
    Positive,
    Negative,
    Neutral,
}

impl ImpactDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl std::str::FromStr for ImpactDirection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" | "increase" | "+" => Ok(Self::Positive),
            "negative" | "decrease" | "-" => Ok(Self::Negative),
            "neutral" | "none" => Ok(Self::Neutral),
            _ => Err(format!("Unknown impact direction: {}", s)),
        }
    }
}

impl std::fmt::Display for ImpactDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Analyst annotation: event `parent_id` moves `indicator_code` by `estimate`
/// percentage points, starting `lag_months` after the event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactLink {
    pub link_id: String,
    pub parent_id: String,
    pub indicator_code: String,
    /// Signed, percentage points
    pub estimate: f64,
    pub lag_months: i32,
    pub direction: Option<ImpactDirection>,
    pub magnitude: Option<String>,
    pub evidence_basis: Option<String>,
    pub confidence: Option<Confidence>,
    pub notes: Option<String>,
}

/// A policy milestone for an indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub record_id: String,
    /// Code as declared on the target record, e.g. TGT_ACC_OWNERSHIP
    pub target_code: String,
    pub label: String,
    pub value: f64,
    pub date: NaiveDate,
    pub source: Source,
}

// ========== Forecast Output Models ==========

/// Scenario variants reflecting different impact-strength assumptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Pessimistic,
    Base,
    Optimistic,
}

impl Scenario {
    pub fn all() -> &'static [Scenario] {
        &[Self::Pessimistic, Self::Base, Self::Optimistic]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pessimistic => "pessimistic",
            Self::Base => "base",
            Self::Optimistic => "optimistic",
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Series tag on an output row. Declaration order is the output sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Baseline,
    Pessimistic,
    Base,
    Optimistic,
}

impl SeriesKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Pessimistic => "pessimistic",
            Self::Base => "base",
            Self::Optimistic => "optimistic",
        }
    }
}

impl From<Scenario> for SeriesKind {
    fn from(s: Scenario) -> Self {
        match s {
            Scenario::Pessimistic => Self::Pessimistic,
            Scenario::Base => Self::Base,
            Scenario::Optimistic => Self::Optimistic,
        }
    }
}

impl std::str::FromStr for SeriesKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "baseline" => Ok(Self::Baseline),
            "pessimistic" => Ok(Self::Pessimistic),
            "base" => Ok(Self::Base),
            "optimistic" => Ok(Self::Optimistic),
            _ => Err(format!("Unknown series: {}", s)),
        }
    }
}

impl std::fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unadjusted trend value at a future date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselinePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Scenario-adjusted value, with bounds when uncertainty has been attached
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPoint {
    pub date: NaiveDate,
    pub scenario: Scenario,
    pub value: f64,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

/// One line of the unified forecast table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub indicator: String,
    pub date: NaiveDate,
    pub scenario: SeriesKind,
    pub value: f64,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}
