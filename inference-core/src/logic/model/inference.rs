//! Inference Engine - ONNX Runtime Integration
//!
//! Loads the two exported models and runs them on a `FeatureMatrix`.
//! Input is one float32 tensor `[rows, FEATURE_COUNT]` in layout order.
//!
//! - Regressor: first output is float, one value per row (`[rows]` or `[rows, 1]`)
//! - Outlier detector: first output is the int64 label, `{-1, 1}` per row

use std::path::Path;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::{DynValue, Value};

use crate::logic::features::FeatureMatrix;
use super::capability::{ensure_row_count, OutlierDetector, Regressor};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub name: String,
    pub path: String,
    pub sha256: String,
    pub output_name: String,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("Model not found: {0}")]
    NotFound(String),

    #[error("Checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("Failed to load model: {0}")]
    Load(String),

    #[error("Inference failed: {0}")]
    Run(String),

    #[error("Output has {actual} rows, expected {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ============================================================================
// CHECKSUM
// ============================================================================

/// Hex SHA-256 of a file
pub fn file_sha256(path: &Path) -> Result<String, InferenceError> {
    let bytes = std::fs::read(path)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

/// Verify file against an expected hex digest (case-insensitive)
pub fn verify_checksum(path: &Path, expected: Option<&str>) -> Result<String, InferenceError> {
    let actual = file_sha256(path)?;

    if let Some(expected) = expected {
        if !actual.eq_ignore_ascii_case(expected.trim()) {
            return Err(InferenceError::ChecksumMismatch {
                path: path.display().to_string(),
                expected: expected.to_string(),
                actual,
            });
        }
    }

    Ok(actual)
}

// ============================================================================
// ONNX SESSION
// ============================================================================

/// A loaded ONNX session plus what we know about it
struct OnnxModel {
    session: Mutex<Session>,
    metadata: ModelMetadata,
}

impl OnnxModel {
    fn load(name: &str, model_path: &str, expected_sha256: Option<&str>) -> Result<Self, InferenceError> {
        log::info!("Loading {} from: {}", name, model_path);

        let path = Path::new(model_path);
        if !path.exists() {
            return Err(InferenceError::NotFound(model_path.to_string()));
        }

        let sha256 = verify_checksum(path, expected_sha256)?;

        let session = Session::builder()
            .map_err(|e| InferenceError::Load(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::Load(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(path)
            .map_err(|e| InferenceError::Load(format!("Failed to load model: {}", e)))?;

        let output_name = session.outputs.first()
            .map(|o| o.name.clone())
            .ok_or_else(|| InferenceError::Load("No output defined".to_string()))?;

        log::info!("{} loaded (output '{}', sha256 {})", name, output_name, &sha256[..12]);

        Ok(Self {
            session: Mutex::new(session),
            metadata: ModelMetadata {
                name: name.to_string(),
                path: model_path.to_string(),
                sha256,
                output_name,
                loaded_at: chrono::Utc::now(),
            },
        })
    }

    /// Run on the matrix and hand the first output to `extract`
    fn run<T>(
        &self,
        features: &FeatureMatrix,
        extract: impl FnOnce(&DynValue) -> Result<Vec<T>, InferenceError>,
    ) -> Result<Vec<T>, InferenceError> {
        if features.is_empty() {
            return Ok(Vec::new());
        }

        let input_tensor = Value::from_array(features.to_f32())
            .map_err(|e| InferenceError::Run(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session.run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Run(e.to_string()))?;

        let output = outputs.get(&self.metadata.output_name)
            .ok_or_else(|| InferenceError::Run("No output".to_string()))?;

        let values = extract(output)?;
        ensure_row_count(values, features.nrows())
    }
}

// ============================================================================
// REGRESSOR
// ============================================================================

pub struct OnnxRegressor {
    model: OnnxModel,
}

impl OnnxRegressor {
    pub fn load(model_path: &str, expected_sha256: Option<&str>) -> Result<Self, InferenceError> {
        Ok(Self { model: OnnxModel::load("gas output regressor", model_path, expected_sha256)? })
    }
}

impl Regressor for OnnxRegressor {
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>, InferenceError> {
        self.model.run(features, |output| {
            let (_, data) = output.try_extract_tensor::<f32>()
                .map_err(|e| InferenceError::Run(format!("Extract error: {}", e)))?;
            Ok(data.iter().map(|&v| v as f64).collect())
        })
    }

    fn metadata(&self) -> Option<ModelMetadata> {
        Some(self.model.metadata.clone())
    }
}

// ============================================================================
// OUTLIER DETECTOR
// ============================================================================

pub struct OnnxOutlierDetector {
    model: OnnxModel,
}

impl OnnxOutlierDetector {
    pub fn load(model_path: &str, expected_sha256: Option<&str>) -> Result<Self, InferenceError> {
        Ok(Self { model: OnnxModel::load("outlier detector", model_path, expected_sha256)? })
    }
}

impl OutlierDetector for OnnxOutlierDetector {
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<i64>, InferenceError> {
        self.model.run(features, |output| {
            let (_, data) = output.try_extract_tensor::<i64>()
                .map_err(|e| InferenceError::Run(format!("Extract error: {}", e)))?;
            Ok(data.to_vec())
        })
    }

    fn metadata(&self) -> Option<ModelMetadata> {
        Some(self.model.metadata.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_missing_model() {
        let result = OnnxRegressor::load("/nonexistent/model.onnx", None);
        assert!(matches!(result, Err(InferenceError::NotFound(_))));
    }

    #[test]
    fn test_verify_checksum() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();

        // sha256("abc")
        let expected = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

        assert_eq!(verify_checksum(file.path(), None).unwrap(), expected);
        assert_eq!(verify_checksum(file.path(), Some(expected)).unwrap(), expected);
        assert!(verify_checksum(file.path(), Some(&expected.to_uppercase())).is_ok());
    }

    #[test]
    fn test_checksum_mismatch_blocks_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not really a model").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let result = OnnxOutlierDetector::load(&path, Some("00"));
        assert!(matches!(result, Err(InferenceError::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_garbage_model_fails_to_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not really a model").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        assert!(OnnxRegressor::load(&path, None).is_err());
    }
}
