//! Gas Output Inference Core
//!
//! Point and batch gas output predictions from process parameters
//! (plastic waste input, temperature, pressure), with anomaly flags fused
//! from a learned outlier detector and fixed operating-envelope rules.
//!
//! ```text
//! RawRecord ─validate─▶ RawInput ─FeatureDeriver─▶ FeatureVector
//!                                                    │
//!                      ┌─────────────────────────────┼──────────────────┐
//!                      ▼                             ▼                  ▼
//!                  Regressor              RuleAnomalyChecker   ModelAnomalyDetector
//!                      │                             └──── AnomalyFusion ┘
//!                      └──────────────▶ PredictionResult ◀───────┘
//! ```
//!
//! `BatchProcessor` runs the same pipeline over a CSV table, isolating
//! failures to the row that caused them.

pub mod constants;
pub mod logic;

pub use logic::anomaly::{AnomalyFusion, AnomalyVerdict, ModelAnomalyDetector, RuleAnomalyChecker};
pub use logic::batch::{BatchOutput, BatchProcessor, BatchRow, BatchTable, RowPrediction};
pub use logic::config::{ModelConfig, Range, RuleConfig};
pub use logic::engine::{PredictionEngine, PredictionResult};
pub use logic::error::{PipelineResult, PredictionError, RowComputationError};
pub use logic::features::{FeatureDeriver, FeatureMatrix, FeatureVector, RawInput, RawRecord, RawValue};
pub use logic::model::{Capabilities, EngineStatus, InferenceError, OutlierDetector, Regressor};
