//! Configuration module

use std::env;

use gas_inference_core::{ModelConfig, RuleConfig};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Largest accepted request body (batch CSV uploads)
    pub max_body_bytes: usize,

    /// Model file locations and checksums
    pub models: ModelConfig,

    /// Operating envelope for rule-based anomaly checks
    pub rules: RuleConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),

            max_body_bytes: env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|b| b.parse().ok())
                .unwrap_or(10 * 1024 * 1024),

            models: ModelConfig::from_env(),
            rules: RuleConfig::from_env(),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            environment: "development".to_string(),
            max_body_bytes: 10 * 1024 * 1024,
            models: ModelConfig::default(),
            rules: RuleConfig::default(),
        }
    }
}
