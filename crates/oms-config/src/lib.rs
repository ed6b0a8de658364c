//! Configuration module for the order management system.
//!
//! This module provides structures and utilities for managing service
//! configuration. It supports loading configuration from TOML files with
//! environment variable resolution and validates that all required values
//! are properly set before the service starts.

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the order management service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Configuration specific to the service instance.
	pub service: ServiceConfig,
	/// Pricing rules applied by the order factory.
	#[serde(default)]
	pub pricing: PricingConfig,
	/// Tunables for the analytics aggregation.
	#[serde(default)]
	pub analytics: AnalyticsConfig,
	/// Configuration for the storage backend.
	pub storage: StorageConfig,
	/// Configuration for the HTTP API server.
	pub api: Option<ApiConfig>,
}

/// Configuration specific to the service instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
	/// Unique identifier for this service instance.
	pub id: String,
}

/// Pricing rules applied by the order factory.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PricingConfig {
	/// Fraction of the subtotal charged on dine-in orders.
	/// Defaults to 0.10 (ten percent) if not specified.
	#[serde(default = "default_service_charge_rate")]
	pub service_charge_rate: Decimal,
}

impl Default for PricingConfig {
	fn default() -> Self {
		Self {
			service_charge_rate: default_service_charge_rate(),
		}
	}
}

/// Returns the default dine-in service charge rate of 10%.
fn default_service_charge_rate() -> Decimal {
	Decimal::new(10, 2)
}

/// Tunables for the analytics aggregation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyticsConfig {
	/// How many entries the most-ordered-items ranking returns.
	/// Defaults to 10 if not specified.
	#[serde(default = "default_top_items_limit")]
	pub top_items_limit: usize,
}

impl Default for AnalyticsConfig {
	fn default() -> Self {
		Self {
			top_items_limit: default_top_items_limit(),
		}
	}
}

/// Returns the default size of the most-ordered-items ranking.
fn default_top_items_limit() -> usize {
	10
}

/// Configuration for the storage backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of storage implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Configuration for the HTTP API server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	/// Whether the API server is enabled.
	#[serde(default)]
	pub enabled: bool,
	/// Host address to bind the server to.
	#[serde(default = "default_api_host")]
	pub host: String,
	/// Port to bind the server to.
	#[serde(default = "default_api_port")]
	pub port: u16,
	/// Request timeout in seconds.
	#[serde(default = "default_api_timeout")]
	pub timeout_seconds: u64,
}

/// Returns the default API host of 127.0.0.1 (localhost).
fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

/// Returns the default API port of 3000.
fn default_api_port() -> u16 {
	3000
}

/// Returns the default API request timeout of 30 seconds.
fn default_api_timeout() -> u64 {
	30
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable
/// VAR_NAME. Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let full_match = cap.get(0).ok_or_else(|| {
			ConfigError::Parse("Unexpected empty capture while resolving variables".into())
		})?;
		let var_name = &cap[1];
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name
					)))
				},
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads configuration from a TOML file.
	///
	/// Environment variables are resolved and the configuration is
	/// validated after parsing.
	pub fn from_file(path: &str) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path)?;
		content.parse()
	}

	/// Validates the configuration to ensure all required fields are
	/// properly set.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.service.id.is_empty() {
			return Err(ConfigError::Validation("Service ID cannot be empty".into()));
		}

		if self.pricing.service_charge_rate < Decimal::ZERO
			|| self.pricing.service_charge_rate > Decimal::ONE
		{
			return Err(ConfigError::Validation(
				"service_charge_rate must be between 0 and 1".into(),
			));
		}

		if self.analytics.top_items_limit == 0 {
			return Err(ConfigError::Validation(
				"top_items_limit must be at least 1".into(),
			));
		}

		if self.storage.implementations.is_empty() {
			return Err(ConfigError::Validation(
				"At least one storage implementation must be configured".into(),
			));
		}
		if self.storage.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Storage primary implementation cannot be empty".into(),
			));
		}
		if !self
			.storage
			.implementations
			.contains_key(&self.storage.primary)
		{
			return Err(ConfigError::Validation(format!(
				"Primary storage '{}' not found in implementations",
				self.storage.primary
			)));
		}

		Ok(())
	}
}

/// Implementation of FromStr trait for Config to enable parsing from
/// string.
///
/// Environment variables are resolved and the configuration is
/// automatically validated after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
