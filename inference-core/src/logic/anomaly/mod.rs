//! Anomaly Module - Dual-source anomaly verdicts
//!
//! - `rules` - fixed operating-envelope checks on raw inputs
//! - `detector` - wrapper around the learned outlier detector
//! - `fusion` - combines both signals into one verdict

pub mod rules;
pub mod detector;
pub mod fusion;

pub use rules::RuleAnomalyChecker;
pub use detector::ModelAnomalyDetector;
pub use fusion::{AnomalyFusion, AnomalyVerdict};
