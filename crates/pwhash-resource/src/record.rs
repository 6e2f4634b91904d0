// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Desired configuration and persisted state of a managed hash.

use pwhash_engine::{CostParameters, HashAlgorithm};
use pwhash_secret::{expose, SecretString};
use serde::{Deserialize, Serialize};

/// Operator supplied cost values. `None` means "computed": filled from the
/// prior state, the provider defaults, or the variant defaults, in that order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostOverrides {
	#[serde(default)]
	pub key_length: Option<u32>,
	#[serde(default)]
	pub parallelism: Option<u32>,
	#[serde(default)]
	pub memory_kib: Option<u32>,
	#[serde(default)]
	pub iterations: Option<u32>,
}

impl CostOverrides {
	/// Fill unset fields from `fallback`.
	pub fn or(self, fallback: CostOverrides) -> CostOverrides {
		CostOverrides {
			key_length: self.key_length.or(fallback.key_length),
			parallelism: self.parallelism.or(fallback.parallelism),
			memory_kib: self.memory_kib.or(fallback.memory_kib),
			iterations: self.iterations.or(fallback.iterations),
		}
	}

	/// Resolve against a complete parameter set.
	pub fn resolve(self, base: CostParameters) -> CostParameters {
		CostParameters {
			key_length: self.key_length.unwrap_or(base.key_length),
			parallelism: self.parallelism.unwrap_or(base.parallelism),
			memory_kib: self.memory_kib.unwrap_or(base.memory_kib),
			iterations: self.iterations.unwrap_or(base.iterations),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.key_length.is_none()
			&& self.parallelism.is_none()
			&& self.memory_kib.is_none()
			&& self.iterations.is_none()
	}
}

impl From<CostParameters> for CostOverrides {
	fn from(params: CostParameters) -> Self {
		CostOverrides {
			key_length: Some(params.key_length),
			parallelism: Some(params.parallelism),
			memory_kib: Some(params.memory_kib),
			iterations: Some(params.iterations),
		}
	}
}

/// Desired configuration (the plan) for one resource instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResourceConfig {
	pub secret: SecretString,
	#[serde(default)]
	pub salt: Option<SecretString>,
	#[serde(default)]
	pub algorithm: Option<HashAlgorithm>,
	#[serde(flatten)]
	pub cost: CostOverrides,
}

impl ResourceConfig {
	pub fn new(secret: impl Into<String>) -> Self {
		Self {
			secret: SecretString::new(secret.into()),
			salt: None,
			algorithm: None,
			cost: CostOverrides::default(),
		}
	}

	pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
		self.salt = Some(SecretString::new(salt.into()));
		self
	}

	pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
		self.algorithm = Some(algorithm);
		self
	}

	pub fn with_cost(mut self, cost: CostOverrides) -> Self {
		self.cost = cost;
		self
	}
}

/// Persisted state of one resource instance.
///
/// Serialization writes the real `secret`, `salt` and `hash` values since it
/// feeds the engine's state store. `Debug` stays redacted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceState {
	pub id: String,
	#[serde(default, serialize_with = "expose::option")]
	pub secret: Option<SecretString>,
	#[serde(default, serialize_with = "expose::option")]
	pub salt: Option<SecretString>,
	#[serde(default)]
	pub algorithm: Option<HashAlgorithm>,
	#[serde(flatten)]
	pub cost: Option<CostParameters>,
	#[serde(default, serialize_with = "expose::option")]
	pub hash: Option<SecretString>,
}

impl ResourceState {
	/// State synthesized by an import: only the identifier is known.
	pub fn imported(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			secret: None,
			salt: None,
			algorithm: None,
			cost: None,
			hash: None,
		}
	}

	/// Whether every computed attribute is populated.
	pub fn is_complete(&self) -> bool {
		self.secret.is_some() && self.algorithm.is_some() && self.cost.is_some() && self.hash.is_some()
	}
}
