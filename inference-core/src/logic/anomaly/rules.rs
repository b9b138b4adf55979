//! Rule-based Anomaly Checks
//!
//! Flags inputs outside the reactor's operating envelope.
//! Bounds come from `RuleConfig`, never inline.

use crate::logic::config::RuleConfig;
use crate::logic::features::RawInput;

/// Pure predicate over the raw inputs
#[derive(Debug, Clone, Default)]
pub struct RuleAnomalyChecker {
    config: RuleConfig,
}

impl RuleAnomalyChecker {
    pub fn new(config: RuleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// True iff any value lies outside its closed interval
    pub fn check(&self, raw: &RawInput) -> bool {
        !self.config.plastic_waste_range.contains(raw.plastic_waste_kg)
            || !self.config.temperature_range.contains(raw.temperature_c)
            || !self.config.pressure_range.contains(raw.pressure_kpa)
    }

    /// Names of the violated parameters, for logging
    pub fn violations(&self, raw: &RawInput) -> Vec<&'static str> {
        use crate::logic::features::layout::{COL_PLASTIC_WASTE, COL_PRESSURE, COL_TEMPERATURE};

        let checks = [
            (COL_PLASTIC_WASTE, self.config.plastic_waste_range.contains(raw.plastic_waste_kg)),
            (COL_TEMPERATURE, self.config.temperature_range.contains(raw.temperature_c)),
            (COL_PRESSURE, self.config.pressure_range.contains(raw.pressure_kpa)),
        ];

        checks.iter()
            .filter(|(_, ok)| !ok)
            .map(|(name, _)| *name)
            .collect()
    }
}
