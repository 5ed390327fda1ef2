//! Application configuration
//!
//! Centralized configuration management using the `config` crate.
//! Configuration can be loaded from environment variables and config files.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub loyalty: LoyaltyDefaults,
}

/// HTTP server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of worker threads
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    num_cpus::get()
}

/// Seed values for the in-memory host settings
#[derive(Debug, Deserialize, Clone)]
pub struct LoyaltyDefaults {
    /// Master switch for the loyalty program
    #[serde(default)]
    pub enabled: bool,

    /// Points per night for room reservations
    #[serde(default = "default_points_per_night")]
    pub points_per_night_room: i64,

    /// Flat points per table booking
    #[serde(default = "default_points_per_table")]
    pub points_per_table_booking: i64,

    /// Points per currency unit spent on completed orders
    #[serde(default = "default_points_per_unit")]
    pub points_per_currency_unit: f64,

    /// One-time signup bonus
    #[serde(default)]
    pub signup_bonus: i64,
}

fn default_points_per_night() -> i64 {
    10
}

fn default_points_per_table() -> i64 {
    5
}

fn default_points_per_unit() -> f64 {
    1.0
}

impl Default for LoyaltyDefaults {
    fn default() -> Self {
        Self {
            enabled: false,
            points_per_night_room: 10,
            points_per_table_booking: 5,
            points_per_currency_unit: 1.0,
            signup_bonus: 0,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.workers", num_cpus::get() as i64)?
            .set_default("loyalty.enabled", false)?
            .set_default("loyalty.points_per_night_room", 10)?
            .set_default("loyalty.points_per_table_booking", 5)?
            .set_default("loyalty.points_per_currency_unit", 1.0)?
            .set_default("loyalty.signup_bonus", 0)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables with POSADA_ prefix
            .add_source(
                Environment::with_prefix("POSADA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Get the server bind address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_loyalty_defaults() {
        let defaults = LoyaltyDefaults::default();
        assert!(!defaults.enabled);
        assert_eq!(defaults.points_per_night_room, 10);
        assert_eq!(defaults.points_per_table_booking, 5);
    }
}
