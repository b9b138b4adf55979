//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the model input schema**
//!
//! Both trained models expect exactly these columns, in exactly this order.
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION (and retrain both models)
//! 2. Change order → increment FEATURE_VERSION
//! 3. Rename feature → increment FEATURE_VERSION

use crc32fast::Hasher;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// COLUMN NAMES
// ============================================================================

pub const COL_PLASTIC_WASTE: &str = "Plastic_Waste_Input_kg";
pub const COL_TEMPERATURE: &str = "Temperature_C";
pub const COL_PRESSURE: &str = "Pressure_kPa";
pub const COL_WASTE_GAS_RATIO: &str = "Waste_Gas_Ratio";
pub const COL_PRESSURE_TEMP_RATIO: &str = "Pressure_Temp_Ratio";
pub const COL_WASTE_PRESSURE_INTERACTION: &str = "Waste_Pressure_Interaction";

pub const COL_PREDICTED_OUTPUT: &str = "Predicted_Gas_Output_Liters";
pub const COL_ANOMALY_FLAG: &str = "Anomaly_Flag";
pub const COL_ERROR: &str = "Error";

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the model input
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Raw process parameters (0-2) ===
    COL_PLASTIC_WASTE,              // 0: Plastic waste fed to the reactor (kg)
    COL_TEMPERATURE,                // 1: Reactor temperature (C)
    COL_PRESSURE,                   // 2: Reactor pressure (kPa)

    // === Engineered (3-5) ===
    COL_WASTE_GAS_RATIO,            // 3: Waste pass-through (kept for schema)
    COL_PRESSURE_TEMP_RATIO,        // 4: Pressure / temperature
    COL_WASTE_PRESSURE_INTERACTION, // 5: Waste * pressure
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 6;

/// Raw columns a request or batch row must provide
pub const REQUIRED_COLUMNS: [&str; 3] = [COL_PLASTIC_WASTE, COL_TEMPERATURE, COL_PRESSURE];

/// Columns appended to a batch table, in output order
pub const OUTPUT_COLUMNS: [&str; 5] = [
    COL_WASTE_GAS_RATIO,
    COL_PRESSURE_TEMP_RATIO,
    COL_WASTE_PRESSURE_INTERACTION,
    COL_PREDICTED_OUTPUT,
    COL_ANOMALY_FLAG,
];

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }

    hasher.finalize()
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}
