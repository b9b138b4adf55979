//! Integration Tests for the feature → anomaly path
//!
//! Feature derivation and both anomaly sources working together,
//! without a regression model in the loop.

#[cfg(test)]
mod integration_tests {
    use std::sync::Arc;

    use crate::logic::anomaly::{AnomalyFusion, ModelAnomalyDetector, RuleAnomalyChecker};
    use crate::logic::features::{FeatureDeriver, FeatureMatrix, RawInput, RawRecord};
    use crate::logic::model::{InferenceError, OutlierDetector};

    /// Flags any row whose pressure/temperature ratio exceeds 1
    struct RatioDetector;

    impl OutlierDetector for RatioDetector {
        fn predict(&self, features: &FeatureMatrix) -> Result<Vec<i64>, InferenceError> {
            Ok(features.as_array()
                .rows()
                .into_iter()
                .map(|row| if row[4] > 1.0 { -1 } else { 1 })
                .collect())
        }
    }

    fn fused(raw: RawInput, detector: &ModelAnomalyDetector) -> bool {
        let features = FeatureDeriver::derive(&raw).unwrap();
        AnomalyFusion::fuse(RuleAnomalyChecker::default().check(&raw), detector.detect(&features))
    }

    /// Reference scenario: all in range, features as documented
    #[test]
    fn test_reference_scenario() {
        let raw = RawRecord::from(RawInput::new(100.0, 300.0, 150.0)).validate().unwrap();
        let features = FeatureDeriver::derive(&raw).unwrap();

        assert_eq!(features.waste_gas_ratio, 100.0);
        assert_eq!(features.pressure_temp_ratio, 0.5);
        assert_eq!(features.waste_pressure_interaction, 15000.0);
        assert!(!RuleAnomalyChecker::default().check(&raw));
    }

    #[test]
    fn test_rule_and_model_sources_combine() {
        let detector = ModelAnomalyDetector::new(Some(Arc::new(RatioDetector)));

        // neither
        assert!(!fused(RawInput::new(100.0, 300.0, 150.0), &detector));
        // rule only (waste below 50)
        assert!(fused(RawInput::new(10.0, 300.0, 150.0), &detector));
        // model only (ratio 250/200 > 1, all values in range)
        assert!(fused(RawInput::new(100.0, 200.0, 250.0), &detector));
        // both
        assert!(fused(RawInput::new(10.0, 100.0, 290.0), &detector));
    }

    #[test]
    fn test_without_detector_only_rules_count() {
        let detector = ModelAnomalyDetector::new(None);

        assert!(!fused(RawInput::new(100.0, 200.0, 250.0), &detector));
        assert!(fused(RawInput::new(100.0, 450.0, 150.0), &detector));
    }
}
