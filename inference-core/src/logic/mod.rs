//! Logic Module - Inference pipeline
//!
//! - `features/` - feature layout & derivation
//! - `anomaly/` - rule checks, outlier detector wrapper, fusion
//! - `model/` - external model capabilities (ONNX), status
//! - `engine` - single prediction orchestration
//! - `batch/` - row-wise batch processing & CSV codec

pub mod config;
pub mod error;

pub mod features;
pub mod anomaly;
pub mod model;
pub mod engine;
pub mod batch;
