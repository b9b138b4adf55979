//! Model Capabilities
//!
//! The regressor and the outlier detector are trained elsewhere and consumed
//! as opaque, read-only `predict(feature_matrix)` capabilities. Everything the
//! pipeline needs from them is behind these two traits so tests can inject fakes.

use std::sync::Arc;

use crate::logic::config::ModelConfig;
use crate::logic::features::FeatureMatrix;
use super::inference::{InferenceError, ModelMetadata, OnnxOutlierDetector, OnnxRegressor};

/// Outlier label (isolation-forest convention), inliers are `1`
pub const OUTLIER_LABEL: i64 = -1;

/// Maps a feature matrix to one gas output (liters) per row
pub trait Regressor: Send + Sync {
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>, InferenceError>;

    fn metadata(&self) -> Option<ModelMetadata> {
        None
    }
}

/// Maps a feature matrix to one `{-1, 1}` label per row
pub trait OutlierDetector: Send + Sync {
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<i64>, InferenceError>;

    fn metadata(&self) -> Option<ModelMetadata> {
        None
    }
}

/// Loaded capabilities, shared read-only by every request
#[derive(Clone, Default)]
pub struct Capabilities {
    pub regressor: Option<Arc<dyn Regressor>>,
    pub outlier_detector: Option<Arc<dyn OutlierDetector>>,
}

impl Capabilities {
    pub fn new(
        regressor: Option<Arc<dyn Regressor>>,
        outlier_detector: Option<Arc<dyn OutlierDetector>>,
    ) -> Self {
        Self { regressor, outlier_detector }
    }

    /// Load both ONNX models; a failure leaves that capability absent
    pub fn load(config: &ModelConfig) -> Self {
        let regressor = match OnnxRegressor::load(&config.regressor_path, config.regressor_sha256.as_deref()) {
            Ok(model) => Some(Arc::new(model) as Arc<dyn Regressor>),
            Err(e) => {
                log::error!("Regressor load failed: {} - predictions unavailable", e);
                None
            }
        };

        let outlier_detector = match OnnxOutlierDetector::load(
            &config.outlier_detector_path,
            config.outlier_detector_sha256.as_deref(),
        ) {
            Ok(model) => Some(Arc::new(model) as Arc<dyn OutlierDetector>),
            Err(e) => {
                log::warn!("Outlier detector load failed: {} - model anomaly checks disabled", e);
                None
            }
        };

        Self { regressor, outlier_detector }
    }
}

/// Check that a capability answered with one value per input row
pub(crate) fn ensure_row_count<T>(values: Vec<T>, expected: usize) -> Result<Vec<T>, InferenceError> {
    if values.len() != expected {
        return Err(InferenceError::ShapeMismatch { expected, actual: values.len() });
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_files_degrades() {
        let config = ModelConfig {
            regressor_path: "/nonexistent/gas_output_model.onnx".into(),
            outlier_detector_path: "/nonexistent/anomaly_detection_model.onnx".into(),
            regressor_sha256: None,
            outlier_detector_sha256: None,
        };
        let caps = Capabilities::load(&config);
        assert!(caps.regressor.is_none());
        assert!(caps.outlier_detector.is_none());
    }

    #[test]
    fn test_ensure_row_count() {
        assert_eq!(ensure_row_count(vec![1, 2], 2).unwrap(), vec![1, 2]);
        assert!(matches!(
            ensure_row_count(vec![1], 2),
            Err(InferenceError::ShapeMismatch { expected: 2, actual: 1 })
        ));
    }
}
