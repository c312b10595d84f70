//! Configuration management for the Field Trial Analytics Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with FTA_ prefix

use config::{ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{RoundingPolicy, ToleranceBand};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Head-to-head analysis defaults
    pub analysis: AnalysisConfig,

    /// Session store limits
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    /// Lower edge of the draw band (sc/ha)
    pub tolerance_lo: f64,

    /// Upper edge of the draw band (sc/ha)
    pub tolerance_hi: f64,

    /// Decimal places for displayed means and differences
    pub decimal_places: u32,

    /// Default number of best plots in the site top-mean benchmark
    pub default_top_n: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Maximum number of concurrently held analysis sessions
    pub max_sessions: usize,
}

impl AnalysisConfig {
    /// Build the default classification band from the configured edges.
    pub fn tolerance_band(&self) -> Result<ToleranceBand, ConfigError> {
        let lo = Decimal::try_from(self.tolerance_lo)
            .map_err(|e| ConfigError::Message(format!("invalid tolerance_lo: {}", e)))?;
        let hi = Decimal::try_from(self.tolerance_hi)
            .map_err(|e| ConfigError::Message(format!("invalid tolerance_hi: {}", e)))?;
        ToleranceBand::new(lo, hi).map_err(|e| ConfigError::Message(e.to_string()))
    }

    pub fn rounding(&self) -> RoundingPolicy {
        RoundingPolicy::new(self.decimal_places)
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("FTA_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("analysis.tolerance_lo", -1.0)?
            .set_default("analysis.tolerance_hi", 1.0)?
            .set_default("analysis.decimal_places", 1)?
            .set_default("analysis.default_top_n", 5)?
            .set_default("session.max_sessions", 64)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (FTA_ prefix)
            .add_source(
                Environment::with_prefix("FTA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
