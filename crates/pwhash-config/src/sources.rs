// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, TOML file and environment.

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ProviderConfigLayer;
use crate::sections::{CostConfigLayer, LoggingConfigLayer, ResourceConfigLayer, RuntimeConfigLayer};

/// Default location of the provider config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/pwhash/provider.toml";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ProviderConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ProviderConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ProviderConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file is not an error.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(SYSTEM_CONFIG_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ProviderConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ProviderConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ProviderConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: PWHASH_<FIELD>, with PWHASH_COST_<FIELD> for cost defaults.
pub struct EnvSource;

impl EnvSource {
	/// Build a layer from an arbitrary variable lookup.
	pub fn load_with(lookup: &dyn Fn(&str) -> Option<String>) -> Result<ProviderConfigLayer, ConfigError> {
		let env = Env(lookup);
		Ok(ProviderConfigLayer {
			resource: Some(ResourceConfigLayer {
				variant: env.parse("PWHASH_VARIANT")?,
				profile: env.parse("PWHASH_PROFILE")?,
				algorithm: env.parse("PWHASH_ALGORITHM")?,
				identifier: env.var("PWHASH_IDENTIFIER"),
			}),
			cost: Some(CostConfigLayer {
				key_length: env.parse("PWHASH_COST_KEY_LENGTH")?,
				iterations: env.parse("PWHASH_COST_ITERATIONS")?,
				memory_kib: env.parse("PWHASH_COST_MEMORY_KIB")?,
				parallelism: env.parse("PWHASH_COST_PARALLELISM")?,
			}),
			runtime: Some(RuntimeConfigLayer {
				max_concurrent_hashes: env.parse("PWHASH_MAX_CONCURRENT_HASHES")?,
				hash_timeout_secs: env.parse("PWHASH_HASH_TIMEOUT_SECS")?,
			}),
			logging: Some(LoggingConfigLayer {
				level: env.var("PWHASH_LOG_LEVEL"),
				format: env.parse("PWHASH_LOG_FORMAT")?,
			}),
		})
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ProviderConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Self::load_with(&|name| std::env::var(name).ok())
	}
}

struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
	fn var(&self, name: &str) -> Option<String> {
		(self.0)(name).filter(|s| !s.is_empty())
	}

	fn parse<T>(&self, name: &str) -> Result<Option<T>, ConfigError>
	where
		T: FromStr,
		T::Err: Display,
	{
		match self.var(name) {
			Some(v) => v
				.trim()
				.parse()
				.map(Some)
				.map_err(|e| ConfigError::invalid_value(name, format!("'{v}': {e}"))),
			None => Ok(None),
		}
	}
}
