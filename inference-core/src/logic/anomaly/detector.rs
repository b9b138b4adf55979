//! Model-based Anomaly Detection
//!
//! Wraps the learned outlier detector. When it is not loaded, or fails at
//! call time, every row is reported as "not an anomaly" so predictions keep
//! flowing with only the rule checks active.

use std::sync::Arc;

use crate::logic::features::{FeatureMatrix, FeatureVector};
use crate::logic::model::{OutlierDetector, OUTLIER_LABEL};

#[derive(Clone, Default)]
pub struct ModelAnomalyDetector {
    detector: Option<Arc<dyn OutlierDetector>>,
}

impl ModelAnomalyDetector {
    pub fn new(detector: Option<Arc<dyn OutlierDetector>>) -> Self {
        if detector.is_none() {
            log::warn!("Outlier detector not loaded - model anomaly flag always false");
        }
        Self { detector }
    }

    pub fn is_available(&self) -> bool {
        self.detector.is_some()
    }

    pub fn detector(&self) -> Option<&Arc<dyn OutlierDetector>> {
        self.detector.as_ref()
    }

    /// `-1` → true, anything else → false
    pub fn detect(&self, features: &FeatureVector) -> bool {
        self.detect_matrix(&FeatureMatrix::single(features))
            .first()
            .copied()
            .unwrap_or(false)
    }

    /// One flag per matrix row
    pub fn detect_matrix(&self, features: &FeatureMatrix) -> Vec<bool> {
        let rows = features.nrows();

        let Some(detector) = self.detector.as_ref() else {
            return vec![false; rows];
        };

        match detector.predict(features) {
            Ok(labels) if labels.len() == rows => {
                labels.into_iter().map(|label| label == OUTLIER_LABEL).collect()
            }
            Ok(labels) => {
                log::warn!("Outlier detector returned {} labels for {} rows - ignoring", labels.len(), rows);
                vec![false; rows]
            }
            Err(e) => {
                log::warn!("Outlier detector failed: {} - ignoring", e);
                vec![false; rows]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::{FeatureDeriver, RawInput};
    use crate::logic::model::InferenceError;

    struct ScriptedDetector(Vec<i64>);

    impl OutlierDetector for ScriptedDetector {
        fn predict(&self, features: &FeatureMatrix) -> Result<Vec<i64>, InferenceError> {
            Ok(self.0.iter().copied().cycle().take(features.nrows()).collect())
        }
    }

    struct BrokenDetector;

    impl OutlierDetector for BrokenDetector {
        fn predict(&self, _: &FeatureMatrix) -> Result<Vec<i64>, InferenceError> {
            Err(InferenceError::Run("session poisoned".into()))
        }
    }

    fn vector() -> FeatureVector {
        FeatureDeriver::derive(&RawInput::new(100.0, 300.0, 150.0)).unwrap()
    }

    #[test]
    fn test_label_mapping() {
        let outlier = ModelAnomalyDetector::new(Some(Arc::new(ScriptedDetector(vec![-1]))));
        let inlier = ModelAnomalyDetector::new(Some(Arc::new(ScriptedDetector(vec![1]))));

        assert!(outlier.detect(&vector()));
        assert!(!inlier.detect(&vector()));
    }

    #[test]
    fn test_missing_detector_degrades() {
        let detector = ModelAnomalyDetector::new(None);
        assert!(!detector.is_available());
        assert!(!detector.detect(&vector()));
        assert_eq!(detector.detect_matrix(&FeatureMatrix::from_vectors(&[vector(), vector()])), vec![false, false]);
    }

    #[test]
    fn test_failing_detector_degrades() {
        let detector = ModelAnomalyDetector::new(Some(Arc::new(BrokenDetector)));
        assert!(detector.is_available());
        assert!(!detector.detect(&vector()));
    }

    #[test]
    fn test_matrix_rows() {
        let detector = ModelAnomalyDetector::new(Some(Arc::new(ScriptedDetector(vec![1, -1]))));
        let matrix = FeatureMatrix::from_vectors(&[vector(), vector(), vector()]);
        assert_eq!(detector.detect_matrix(&matrix), vec![false, true, false]);
    }
}
