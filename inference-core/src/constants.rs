//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To move the model files or retune the operating envelope, only edit this file
//! (or override through the environment, see `logic::config`).

/// Default path of the gas output regression model
pub const DEFAULT_REGRESSOR_PATH: &str = "data/gas_output_model.onnx";

/// Default path of the outlier detection model
pub const DEFAULT_OUTLIER_DETECTOR_PATH: &str = "data/anomaly_detection_model.onnx";

// ============================================
// Operating envelope (closed intervals)
// ============================================

/// Minimum plastic waste input (kg)
pub const PLASTIC_WASTE_LOWER: f64 = 50.0;
/// Maximum plastic waste input (kg)
pub const PLASTIC_WASTE_UPPER: f64 = 500.0;

/// Minimum reactor temperature (Celsius)
pub const TEMPERATURE_LOWER: f64 = 100.0;
/// Maximum reactor temperature (Celsius)
pub const TEMPERATURE_UPPER: f64 = 400.0;

/// Minimum reactor pressure (kPa)
pub const PRESSURE_LOWER: f64 = 50.0;
/// Maximum reactor pressure (kPa)
pub const PRESSURE_UPPER: f64 = 300.0;

// ============================================
// Environment variable names
// ============================================

pub const ENV_REGRESSOR_PATH: &str = "GAS_MODEL_PATH";
pub const ENV_OUTLIER_DETECTOR_PATH: &str = "ANOMALY_MODEL_PATH";
pub const ENV_REGRESSOR_SHA256: &str = "GAS_MODEL_SHA256";
pub const ENV_OUTLIER_DETECTOR_SHA256: &str = "ANOMALY_MODEL_SHA256";

pub const ENV_PLASTIC_WASTE_RANGE: &str = "PLASTIC_WASTE_RANGE";
pub const ENV_TEMPERATURE_RANGE: &str = "TEMPERATURE_RANGE";
pub const ENV_PRESSURE_RANGE: &str = "PRESSURE_RANGE";
