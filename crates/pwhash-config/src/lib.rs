// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the pwhash provider.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Validation of provider-wide cost defaults before any resource is touched
//! - Consistent environment variable naming (`PWHASH_*`)
//!
//! # Usage
//!
//! ```ignore
//! use pwhash_config::load_config;
//!
//! let config = load_config()?;
//! let controller = ResourceController::new(config.provider_data());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ProviderConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource, SYSTEM_CONFIG_PATH};

use std::path::PathBuf;

use pwhash_engine::params::{
	MAX_KEY_LENGTH, MAX_PARALLELISM, MIN_ITERATIONS, MIN_KEY_LENGTH, MIN_MEMORY_KIB_PER_LANE,
	MIN_PARALLELISM,
};
use pwhash_resource::{CostOverrides, ProviderData};
use tracing::{debug, info};

/// Fully resolved provider configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderConfig {
	pub resource: ResourceSettings,
	pub cost: CostOverrides,
	pub runtime: RuntimeConfig,
	pub logging: LoggingConfig,
}

impl ProviderConfig {
	/// Settings handed to the resource controller through `configure`.
	pub fn provider_data(&self) -> ProviderData {
		ProviderData {
			variant: self.resource.variant,
			algorithm: self.resource.algorithm,
			identifier: self.resource.identifier.clone(),
			cost_defaults: self.cost,
		}
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`PWHASH_*`)
/// 2. Config file (`/etc/pwhash/provider.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ProviderConfig, ConfigError> {
	let sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	];
	load_from_sources(sources)
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(config_path: impl Into<PathBuf>) -> Result<ProviderConfig, ConfigError> {
	let sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	];
	load_from_sources(sources)
}

/// Load configuration from environment only.
pub fn load_config_from_env() -> Result<ProviderConfig, ConfigError> {
	let sources: Vec<Box<dyn ConfigSource>> = vec![Box::new(EnvSource)];
	load_from_sources(sources)
}

/// Merge sources in precedence order and finalize.
pub fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ProviderConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ProviderConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: ProviderConfigLayer) -> Result<ProviderConfig, ConfigError> {
	let resource = layer.resource.unwrap_or_default().finalize()?;
	let cost = layer.cost.unwrap_or_default().finalize();
	let runtime = layer.runtime.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_cost(&cost)?;
	validate_runtime(&runtime)?;

	info!(
		variant = %resource.variant,
		algorithm = %resource.algorithm,
		cost_overrides = !cost.is_empty(),
		max_concurrent_hashes = runtime.max_concurrent_hashes,
		hash_timeout_secs = ?runtime.hash_timeout_secs,
		log_format = %logging.format,
		"Provider configuration loaded"
	);

	Ok(ProviderConfig {
		resource,
		cost,
		runtime,
		logging,
	})
}

/// Reject provider-wide cost defaults that could never hash.
///
/// Bounds are the hash engine's own, so a default that loads also validates
/// at hash time.
fn validate_cost(cost: &CostOverrides) -> Result<(), ConfigError> {
	check_range("cost.key_length", cost.key_length, MIN_KEY_LENGTH, MAX_KEY_LENGTH)?;
	check_range("cost.iterations", cost.iterations, MIN_ITERATIONS, u32::MAX)?;
	check_range("cost.parallelism", cost.parallelism, MIN_PARALLELISM, MAX_PARALLELISM)?;
	check_range("cost.memory_kib", cost.memory_kib, MIN_MEMORY_KIB_PER_LANE, u32::MAX)?;

	if let (Some(memory_kib), Some(parallelism)) = (cost.memory_kib, cost.parallelism) {
		let minimum = u64::from(parallelism) * u64::from(MIN_MEMORY_KIB_PER_LANE);
		if u64::from(memory_kib) < minimum {
			return Err(ConfigError::Validation(format!(
				"cost.memory_kib must be at least {minimum} for parallelism {parallelism}"
			)));
		}
	}

	Ok(())
}

fn check_range(name: &str, value: Option<u32>, min: u32, max: u32) -> Result<(), ConfigError> {
	match value {
		Some(v) if v < min => Err(ConfigError::Validation(format!(
			"{name} must be at least {min}, got {v}"
		))),
		Some(v) if v > max => Err(ConfigError::Validation(format!(
			"{name} must be at most {max}, got {v}"
		))),
		_ => Ok(()),
	}
}

fn validate_runtime(runtime: &RuntimeConfig) -> Result<(), ConfigError> {
	if runtime.max_concurrent_hashes == 0 {
		return Err(ConfigError::Validation(
			"runtime.max_concurrent_hashes must be at least 1".to_string(),
		));
	}
	if runtime.hash_timeout_secs == Some(0) {
		return Err(ConfigError::Validation(
			"runtime.hash_timeout_secs must be greater than zero; omit it to disable the timeout"
				.to_string(),
		));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use pwhash_engine::{CostProfile, HashAlgorithm};
	use pwhash_resource::{IdentifierStrategy, Variant};
	use proptest::prelude::*;

	struct StaticSource(Precedence, ProviderConfigLayer);

	impl ConfigSource for StaticSource {
		fn name(&self) -> &'static str {
			"static"
		}

		fn precedence(&self) -> Precedence {
			self.0
		}

		fn load(&self) -> Result<ProviderConfigLayer, ConfigError> {
			Ok(self.1.clone())
		}
	}

	fn logging_level(level: &str) -> ProviderConfigLayer {
		ProviderConfigLayer {
			logging: Some(LoggingConfigLayer {
				level: Some(level.to_string()),
				format: None,
			}),
			..Default::default()
		}
	}

	#[test]
	fn test_defaults_finalize() {
		let config = finalize(ProviderConfigLayer::default()).unwrap();
		assert_eq!(config.resource.variant, Variant::default());
		assert_eq!(config.resource.identifier, IdentifierStrategy::default());
		assert!(config.cost.is_empty());
		assert_eq!(config.logging.level, "info");
	}

	#[test]
	fn test_higher_precedence_wins_regardless_of_order() {
		let sources: Vec<Box<dyn ConfigSource>> = vec![
			Box::new(StaticSource(Precedence::Environment, logging_level("trace"))),
			Box::new(StaticSource(Precedence::ConfigFile, logging_level("warn"))),
		];
		let config = load_from_sources(sources).unwrap();
		assert_eq!(config.logging.level, "trace");
	}

	#[test]
	fn test_load_config_with_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("provider.toml");
		std::fs::write(
			&path,
			r#"
[resource]
variant = "explicit_salt"
algorithm = "argon2i"
identifier = "static:db-admin"

[cost]
iterations = 4
"#,
		)
		.unwrap();

		let sources: Vec<Box<dyn ConfigSource>> =
			vec![Box::new(DefaultsSource), Box::new(TomlSource::new(&path))];
		let config = load_from_sources(sources).unwrap();

		let data = config.provider_data();
		assert_eq!(data.variant, Variant::ExplicitSalt);
		assert_eq!(data.algorithm, HashAlgorithm::Argon2i);
		assert_eq!(data.identifier, IdentifierStrategy::Static("db-admin".to_string()));
		assert_eq!(data.cost_defaults.iterations, Some(4));
		assert_eq!(data.cost_defaults.memory_kib, None);
	}

	#[test]
	fn test_invalid_identifier_fails() {
		let layer = ProviderConfigLayer {
			resource: Some(ResourceConfigLayer {
				identifier: Some("counter".to_string()),
				..Default::default()
			}),
			..Default::default()
		};
		assert!(matches!(finalize(layer), Err(ConfigError::InvalidValue { .. })));
	}

	#[test]
	fn test_zero_cost_default_rejected() {
		let layer = ProviderConfigLayer {
			cost: Some(CostConfigLayer {
				iterations: Some(0),
				..Default::default()
			}),
			..Default::default()
		};
		let err = finalize(layer).unwrap_err();
		assert!(err.to_string().contains("cost.iterations"));
	}

	#[test]
	fn test_key_length_outside_engine_bounds_rejected() {
		for key_length in [1, 3, MIN_KEY_LENGTH - 1, MAX_KEY_LENGTH + 1] {
			let layer = ProviderConfigLayer {
				cost: Some(CostConfigLayer {
					key_length: Some(key_length),
					..Default::default()
				}),
				..Default::default()
			};
			let err = finalize(layer).unwrap_err();
			assert!(err.to_string().contains("cost.key_length"), "{key_length}");
		}
	}

	#[test]
	fn test_key_length_at_engine_bounds_accepted() {
		for key_length in [MIN_KEY_LENGTH, MAX_KEY_LENGTH] {
			let layer = ProviderConfigLayer {
				cost: Some(CostConfigLayer {
					key_length: Some(key_length),
					..Default::default()
				}),
				..Default::default()
			};
			assert_eq!(finalize(layer).unwrap().cost.key_length, Some(key_length));
		}
	}

	#[test]
	fn test_memory_below_lanes_rejected() {
		let layer = ProviderConfigLayer {
			cost: Some(CostConfigLayer {
				memory_kib: Some(16),
				parallelism: Some(4),
				..Default::default()
			}),
			..Default::default()
		};
		assert!(matches!(finalize(layer), Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_zero_timeout_rejected() {
		let layer = ProviderConfigLayer {
			runtime: Some(RuntimeConfigLayer {
				hash_timeout_secs: Some(0),
				..Default::default()
			}),
			..Default::default()
		};
		assert!(matches!(finalize(layer), Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_profile_flows_into_provider_data() {
		let layer = ProviderConfigLayer {
			resource: Some(ResourceConfigLayer {
				profile: Some(CostProfile::Rfc9106Recommended),
				..Default::default()
			}),
			..Default::default()
		};
		let data = finalize(layer).unwrap().provider_data();
		assert_eq!(
			data.variant,
			Variant::GeneratedSalt {
				profile: CostProfile::Rfc9106Recommended
			}
		);
	}

	proptest! {
		#[test]
		fn positive_cost_defaults_accepted(
			iterations in 1u32..16,
			parallelism in 1u32..16,
			extra in 0u32..1024,
		) {
			let layer = ProviderConfigLayer {
				cost: Some(CostConfigLayer {
					iterations: Some(iterations),
					parallelism: Some(parallelism),
					memory_kib: Some(parallelism * MIN_MEMORY_KIB_PER_LANE + extra),
					..Default::default()
				}),
				..Default::default()
			};
			let config = finalize(layer).unwrap();
			prop_assert_eq!(config.cost.iterations, Some(iterations));
		}
	}
}
