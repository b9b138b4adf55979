//! Engine status & latency tracking

use std::sync::atomic::{AtomicU64, Ordering};
use serde::{Deserialize, Serialize};

use super::inference::ModelMetadata;

/// Engine Status for health reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub regressor_loaded: bool,
    pub outlier_detector_loaded: bool,
    pub regressor: Option<ModelMetadata>,
    pub outlier_detector: Option<ModelMetadata>,
    pub feature_version: u8,
    pub layout_hash: u32,
    pub inference_count: u64,
    pub avg_latency_ms: f32,
}

/// Lock-free latency counters, one set per engine
#[derive(Debug, Default)]
pub struct InferenceStats {
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
}

impl InferenceStats {
    /// Record `rows` predictions that took `elapsed_us` in total
    pub fn record(&self, rows: u64, elapsed_us: u64) {
        self.latency_sum_us.fetch_add(elapsed_us, Ordering::Relaxed);
        self.inference_count.fetch_add(rows, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.inference_count.load(Ordering::Relaxed)
    }

    /// Average latency per predicted row
    pub fn avg_latency_ms(&self) -> f32 {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.count();
        if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 }
    }
}
