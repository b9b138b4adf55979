//! Pipeline Configuration
//!
//! Rule bounds and model locations. Defaults come from `constants.rs`,
//! the environment can override every value.

use serde::{Deserialize, Serialize};

use crate::constants::*;

// ============================================================================
// RANGE
// ============================================================================

/// Closed interval `[low, high]`, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RangeBounds")]
pub struct Range {
    pub low: f64,
    pub high: f64,
}

/// Unchecked wire form; deserialization goes through `Range::new`
#[derive(Deserialize)]
struct RangeBounds {
    low: f64,
    high: f64,
}

impl TryFrom<RangeBounds> for Range {
    type Error = RangeError;

    fn try_from(bounds: RangeBounds) -> Result<Self, Self::Error> {
        Range::new(bounds.low, bounds.high)
    }
}

/// Error when a range cannot be built or parsed
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RangeError {
    #[error("invalid range: low ({low}) is greater than high ({high})")]
    Inverted { low: f64, high: f64 },

    #[error("invalid range: bounds must be finite, got [{low}, {high}]")]
    NonFinite { low: f64, high: f64 },

    #[error("invalid range '{0}': expected \"low,high\"")]
    Malformed(String),
}

impl Range {
    pub fn new(low: f64, high: f64) -> Result<Self, RangeError> {
        if !low.is_finite() || !high.is_finite() {
            return Err(RangeError::NonFinite { low, high });
        }
        if low > high {
            return Err(RangeError::Inverted { low, high });
        }
        Ok(Self { low, high })
    }

    /// Check if value lies inside the interval (bounds included)
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }

    /// Parse `"low,high"`
    pub fn parse(text: &str) -> Result<Self, RangeError> {
        let malformed = || RangeError::Malformed(text.to_string());

        let (low, high) = text.split_once(',').ok_or_else(malformed)?;
        let low: f64 = low.trim().parse().map_err(|_| malformed())?;
        let high: f64 = high.trim().parse().map_err(|_| malformed())?;

        Self::new(low, high)
    }
}

// ============================================================================
// RULE CONFIG
// ============================================================================

/// Operating envelope used by the rule-based anomaly checker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub plastic_waste_range: Range,
    pub temperature_range: Range,
    pub pressure_range: Range,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            plastic_waste_range: Range { low: PLASTIC_WASTE_LOWER, high: PLASTIC_WASTE_UPPER },
            temperature_range: Range { low: TEMPERATURE_LOWER, high: TEMPERATURE_UPPER },
            pressure_range: Range { low: PRESSURE_LOWER, high: PRESSURE_UPPER },
        }
    }
}

impl RuleConfig {
    /// Load bounds from environment, defaults for anything absent or malformed
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            plastic_waste_range: range_from_env(ENV_PLASTIC_WASTE_RANGE, defaults.plastic_waste_range),
            temperature_range: range_from_env(ENV_TEMPERATURE_RANGE, defaults.temperature_range),
            pressure_range: range_from_env(ENV_PRESSURE_RANGE, defaults.pressure_range),
        }
    }
}

fn range_from_env(var: &str, fallback: Range) -> Range {
    match std::env::var(var) {
        Ok(text) => Range::parse(&text).unwrap_or_else(|e| {
            log::warn!("{}: {} - using default [{}, {}]", var, e, fallback.low, fallback.high);
            fallback
        }),
        Err(_) => fallback,
    }
}

// ============================================================================
// MODEL CONFIG
// ============================================================================

/// Where the two external models live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub regressor_path: String,
    pub outlier_detector_path: String,
    /// Expected hex SHA-256 of the regressor file (skip check if None)
    pub regressor_sha256: Option<String>,
    /// Expected hex SHA-256 of the outlier detector file (skip check if None)
    pub outlier_detector_sha256: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            regressor_path: DEFAULT_REGRESSOR_PATH.to_string(),
            outlier_detector_path: DEFAULT_OUTLIER_DETECTOR_PATH.to_string(),
            regressor_sha256: None,
            outlier_detector_sha256: None,
        }
    }
}

impl ModelConfig {
    pub fn from_env() -> Self {
        Self {
            regressor_path: std::env::var(ENV_REGRESSOR_PATH)
                .unwrap_or_else(|_| DEFAULT_REGRESSOR_PATH.to_string()),
            outlier_detector_path: std::env::var(ENV_OUTLIER_DETECTOR_PATH)
                .unwrap_or_else(|_| DEFAULT_OUTLIER_DETECTOR_PATH.to_string()),
            regressor_sha256: std::env::var(ENV_REGRESSOR_SHA256).ok(),
            outlier_detector_sha256: std::env::var(ENV_OUTLIER_DETECTOR_SHA256).ok(),
        }
    }
}
