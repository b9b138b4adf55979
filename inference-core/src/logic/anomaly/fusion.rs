//! Anomaly Fusion
//!
//! Any single source flags → anomaly. Favors recall over precision.

use serde::{Deserialize, Serialize};

/// Combined verdict with provenance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnomalyVerdict {
    pub rule_triggered: bool,
    pub model_triggered: bool,
}

impl AnomalyVerdict {
    pub fn is_anomaly(&self) -> bool {
        AnomalyFusion::fuse(self.rule_triggered, self.model_triggered)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnomalyFusion;

impl AnomalyFusion {
    /// Logical OR of both sources
    pub fn fuse(rule_flag: bool, model_flag: bool) -> bool {
        rule_flag || model_flag
    }

    pub fn verdict(rule_flag: bool, model_flag: bool) -> AnomalyVerdict {
        AnomalyVerdict {
            rule_triggered: rule_flag,
            model_triggered: model_flag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truth_table() {
        assert!(!AnomalyFusion::fuse(false, false));
        assert!(AnomalyFusion::fuse(false, true));
        assert!(AnomalyFusion::fuse(true, false));
        assert!(AnomalyFusion::fuse(true, true));
    }

    #[test]
    fn test_verdict_keeps_provenance() {
        let verdict = AnomalyFusion::verdict(false, true);
        assert!(verdict.is_anomaly());
        assert!(!verdict.rule_triggered);
        assert!(verdict.model_triggered);

        assert!(!AnomalyVerdict::default().is_anomaly());
    }
}
