//! Prediction Engine
//!
//! raw record → validate → derive features → {regressor, rule check, outlier
//! detector} → fused `PredictionResult`.
//!
//! The engine holds only read-only capabilities and lock-free counters, so one
//! instance can be shared (`Arc`) by any number of concurrent callers.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::anomaly::{AnomalyFusion, AnomalyVerdict, ModelAnomalyDetector, RuleAnomalyChecker};
use super::config::RuleConfig;
use super::error::{PipelineResult, PredictionError};
use super::features::{
    layout::{layout_hash, FEATURE_VERSION},
    FeatureDeriver, FeatureMatrix, FeatureVector, RawInput, RawRecord,
};
use super::model::{Capabilities, EngineStatus, InferenceStats, Regressor};

// ============================================================================
// RESULT
// ============================================================================

/// Outcome of one prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_output: f64,
    pub is_anomaly: bool,
    #[serde(skip)]
    pub verdict: AnomalyVerdict,
}

impl PredictionResult {
    pub fn new(predicted_output: f64, verdict: AnomalyVerdict) -> Self {
        Self {
            predicted_output,
            is_anomaly: verdict.is_anomaly(),
            verdict,
        }
    }

    /// "Yes" / "No", as reported to clients
    pub fn anomaly_flag(&self) -> &'static str {
        if self.is_anomaly { "Yes" } else { "No" }
    }
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct PredictionEngine {
    regressor: Option<Arc<dyn Regressor>>,
    rules: RuleAnomalyChecker,
    detector: ModelAnomalyDetector,
    stats: InferenceStats,
}

impl PredictionEngine {
    pub fn new(capabilities: Capabilities, rules: RuleConfig) -> Self {
        if capabilities.regressor.is_none() {
            log::warn!("Regressor not loaded - every prediction will fail with ModelUnavailable");
        }

        Self {
            regressor: capabilities.regressor,
            rules: RuleAnomalyChecker::new(rules),
            detector: ModelAnomalyDetector::new(capabilities.outlier_detector),
            stats: InferenceStats::default(),
        }
    }

    /// Fails with `ModelUnavailable` when the regressor never loaded
    pub fn regressor(&self) -> PipelineResult<&Arc<dyn Regressor>> {
        self.regressor.as_ref().ok_or_else(|| {
            PredictionError::ModelUnavailable("gas output model is not loaded".to_string())
        })
    }

    /// Single request: model check, presence/type validation, then inference
    pub fn predict(&self, record: &RawRecord) -> PipelineResult<PredictionResult> {
        self.regressor()?;
        let raw = record.validate()?;
        self.predict_input(&raw)
    }

    /// Prediction for an already validated input
    pub fn predict_input(&self, raw: &RawInput) -> PipelineResult<PredictionResult> {
        self.regressor()?;
        let features = FeatureDeriver::derive(raw)?;

        let mut results = self.predict_features(&[(*raw, features)])?;
        results.pop().ok_or_else(|| PredictionError::Inference("empty model output".to_string()))
    }

    /// Vectorised core: one regressor call and one detector call for all rows
    pub fn predict_features(&self, rows: &[(RawInput, FeatureVector)]) -> PipelineResult<Vec<PredictionResult>> {
        let regressor = self.regressor()?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let start_time = Instant::now();
        let vectors: Vec<FeatureVector> = rows.iter().map(|(_, features)| *features).collect();
        let matrix = FeatureMatrix::from_vectors(&vectors);

        let predictions = regressor.predict(&matrix)
            .map_err(|e| PredictionError::Inference(e.to_string()))?;
        if predictions.len() != rows.len() {
            return Err(PredictionError::Inference(format!(
                "model returned {} values for {} rows",
                predictions.len(),
                rows.len()
            )));
        }

        let model_flags = self.detector.detect_matrix(&matrix);

        let results: Vec<PredictionResult> = rows.iter()
            .zip(predictions)
            .zip(model_flags)
            .map(|(((raw, features), predicted), model_flag)| {
                let rule_flag = self.rules.check(raw);
                if rule_flag {
                    log::debug!(
                        "Rule anomaly: {:?} out of range, features {}",
                        self.rules.violations(raw),
                        features.to_log_entry()
                    );
                }
                PredictionResult::new(predicted, AnomalyFusion::verdict(rule_flag, model_flag))
            })
            .collect();

        self.stats.record(rows.len() as u64, start_time.elapsed().as_micros() as u64);

        Ok(results)
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            regressor_loaded: self.regressor.is_some(),
            outlier_detector_loaded: self.detector.is_available(),
            regressor: self.regressor.as_ref().and_then(|r| r.metadata()),
            outlier_detector: self.detector.detector().and_then(|d| d.metadata()),
            feature_version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            inference_count: self.stats.count(),
            avg_latency_ms: self.stats.avg_latency_ms(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
