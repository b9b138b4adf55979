//! Feature Vector - Core data structure for ML input
//!
//! Raw process parameters come in (`RawRecord` → `RawInput`), the
//! `FeatureDeriver` appends the engineered columns, and a `FeatureMatrix`
//! stacks vectors row-per-input in `FEATURE_LAYOUT` order.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::layout::{
    FEATURE_COUNT, FEATURE_LAYOUT, COL_PLASTIC_WASTE, COL_TEMPERATURE, COL_PRESSURE,
    feature_index,
};
use crate::logic::error::PredictionError;

// ============================================================================
// RAW RECORD (untrusted)
// ============================================================================

/// A single untyped cell as it arrives from JSON or CSV
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawValue {
    /// Interpret a CSV cell: empty → None, numeric → Number, else Text
    pub fn from_cell(cell: &str) -> Option<Self> {
        let cell = cell.trim();
        if cell.is_empty() {
            return None;
        }
        Some(match cell.parse::<f64>() {
            Ok(v) => RawValue::Number(v),
            Err(_) => RawValue::Text(cell.to_string()),
        })
    }
}

/// Request payload before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Plastic_Waste_Input_kg", default)]
    pub plastic_waste_kg: Option<RawValue>,
    #[serde(rename = "Temperature_C", default)]
    pub temperature_c: Option<RawValue>,
    #[serde(rename = "Pressure_kPa", default)]
    pub pressure_kpa: Option<RawValue>,
}

impl RawRecord {
    /// Check presence first (all missing fields reported together), then type
    pub fn validate(&self) -> Result<RawInput, PredictionError> {
        let fields = [
            (COL_PLASTIC_WASTE, &self.plastic_waste_kg),
            (COL_TEMPERATURE, &self.temperature_c),
            (COL_PRESSURE, &self.pressure_kpa),
        ];

        let missing: Vec<String> = fields.iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(PredictionError::MissingField(missing));
        }

        let mut values = [0.0f64; 3];
        for (slot, (name, value)) in values.iter_mut().zip(fields.iter()) {
            *slot = match value {
                Some(RawValue::Number(v)) if v.is_finite() => *v,
                Some(RawValue::Number(v)) => {
                    return Err(PredictionError::InvalidInput(format!("{} is not finite: {}", name, v)));
                }
                _ => {
                    return Err(PredictionError::InvalidInput(format!("{} is not numeric", name)));
                }
            };
        }

        Ok(RawInput::new(values[0], values[1], values[2]))
    }
}

impl From<RawInput> for RawRecord {
    fn from(raw: RawInput) -> Self {
        Self {
            plastic_waste_kg: Some(RawValue::Number(raw.plastic_waste_kg)),
            temperature_c: Some(RawValue::Number(raw.temperature_c)),
            pressure_kpa: Some(RawValue::Number(raw.pressure_kpa)),
        }
    }
}

// ============================================================================
// RAW INPUT (validated)
// ============================================================================

/// Validated process parameters for one request or batch row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    pub plastic_waste_kg: f64,
    pub temperature_c: f64,
    pub pressure_kpa: f64,
}

impl RawInput {
    pub fn new(plastic_waste_kg: f64, temperature_c: f64, pressure_kpa: f64) -> Self {
        Self { plastic_waste_kg, temperature_c, pressure_kpa }
    }
}

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Error raised while deriving engineered features
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FeatureError {
    #[error("division by zero: {} is 0", COL_TEMPERATURE)]
    DivisionByZero,
}

/// The six model inputs, raw + engineered
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub plastic_waste_kg: f64,
    pub temperature_c: f64,
    pub pressure_kpa: f64,
    pub waste_gas_ratio: f64,
    pub pressure_temp_ratio: f64,
    pub waste_pressure_interaction: f64,
}

impl FeatureVector {
    /// Values in `FEATURE_LAYOUT` order
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.plastic_waste_kg,
            self.temperature_c,
            self.pressure_kpa,
            self.waste_gas_ratio,
            self.pressure_temp_ratio,
            self.waste_pressure_interaction,
        ]
    }

    /// Get feature by column name
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        feature_index(name).map(|i| self.to_array()[i])
    }

    /// Only the engineered columns (3-5)
    pub fn engineered(&self) -> [f64; 3] {
        [self.waste_gas_ratio, self.pressure_temp_ratio, self.waste_pressure_interaction]
    }

    /// Convert to JSON for debug logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::Value::Object(
            FEATURE_LAYOUT.iter()
                .zip(self.to_array())
                .map(|(name, value)| (name.to_string(), serde_json::json!(value)))
                .collect(),
        )
    }
}

// ============================================================================
// FEATURE DERIVER
// ============================================================================

/// Computes the engineered features the models were trained with
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureDeriver;

impl FeatureDeriver {
    /// Pure: identical input gives a bit-identical vector.
    ///
    /// `waste_gas_ratio` is the waste input divided by 1. The name is part of
    /// the trained schema, the value is not a ratio to gas output.
    pub fn derive(raw: &RawInput) -> Result<FeatureVector, FeatureError> {
        if raw.temperature_c == 0.0 {
            return Err(FeatureError::DivisionByZero);
        }

        Ok(FeatureVector {
            plastic_waste_kg: raw.plastic_waste_kg,
            temperature_c: raw.temperature_c,
            pressure_kpa: raw.pressure_kpa,
            waste_gas_ratio: raw.plastic_waste_kg / 1.0,
            pressure_temp_ratio: raw.pressure_kpa / raw.temperature_c,
            waste_pressure_interaction: raw.plastic_waste_kg * raw.pressure_kpa,
        })
    }
}

// ============================================================================
// FEATURE MATRIX
// ============================================================================

/// Row-oriented model input, columns exactly `FEATURE_LAYOUT`
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    data: Array2<f64>,
}

impl FeatureMatrix {
    pub fn from_vectors(vectors: &[FeatureVector]) -> Self {
        let mut data = Array2::<f64>::zeros((vectors.len(), FEATURE_COUNT));
        for (mut row, vector) in data.rows_mut().into_iter().zip(vectors) {
            for (cell, value) in row.iter_mut().zip(vector.to_array()) {
                *cell = value;
            }
        }
        Self { data }
    }

    pub fn single(vector: &FeatureVector) -> Self {
        Self::from_vectors(std::slice::from_ref(vector))
    }

    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.data
    }

    /// Single precision copy for ONNX `float_input`
    pub fn to_f32(&self) -> Array2<f32> {
        self.data.mapv(|v| v as f32)
    }
}

// ============================================================================
// TESTS
// ============================================================================
