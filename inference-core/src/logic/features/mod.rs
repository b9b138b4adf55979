//! Features Module - Feature Derivation
//!
//! Turns validated process parameters into the six-column model input.
//! The column contract with the trained models lives in `layout`.

pub mod layout;
pub mod vector;

#[cfg(test)]
mod tests;

// Re-export common types
pub use layout::{FEATURE_COUNT, FEATURE_LAYOUT, REQUIRED_COLUMNS, OUTPUT_COLUMNS};
pub use vector::{
    FeatureDeriver, FeatureError, FeatureMatrix, FeatureVector, RawInput, RawRecord, RawValue,
};
