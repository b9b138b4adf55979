//! Model Module - External model capabilities
//!
//! Inference is kept apart from the pipeline logic so the models can be
//! swapped (ONNX today, fakes in tests) without touching the engine.

pub mod capability;
pub mod inference;
pub mod status;

// Re-export common types
pub use capability::{Capabilities, OutlierDetector, Regressor, OUTLIER_LABEL};
pub use inference::{InferenceError, ModelMetadata, OnnxOutlierDetector, OnnxRegressor};
pub use status::{EngineStatus, InferenceStats};
