// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resource variants, identifier assignment and provider-wide settings.

use std::fmt;

use pwhash_engine::{CostParameters, CostProfile, HashAlgorithm};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::CostOverrides;

/// Defaults of the explicit-salt variant, apart from parallelism which
/// follows the host.
pub const EXPLICIT_SALT_KEY_LENGTH: u32 = 32;
pub const EXPLICIT_SALT_ITERATIONS: u32 = 3;
pub const EXPLICIT_SALT_MEMORY_KIB: u32 = 64 * 1024;

/// Identifier assigned by the original provider to every record.
pub const STATIC_IDENTIFIER: &str = "argon2-id";

/// The two configurations of the managed hash resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Variant {
	/// The engine draws a fresh salt; only `secret` triggers a rehash.
	GeneratedSalt {
		#[serde(default)]
		profile: CostProfile,
	},
	/// The operator supplies `salt`; `secret` and `salt` both trigger a rehash.
	ExplicitSalt,
}

impl Default for Variant {
	fn default() -> Self {
		Variant::GeneratedSalt {
			profile: CostProfile::default(),
		}
	}
}

impl Variant {
	pub fn salt_is_operator_supplied(self) -> bool {
		matches!(self, Variant::ExplicitSalt)
	}

	/// Whether a change to `salt` alone requires a new hash.
	pub fn salt_is_secret_determining(self) -> bool {
		self.salt_is_operator_supplied()
	}

	/// Variant defaults. `host_parallelism` is only consulted by the
	/// explicit-salt variant.
	pub fn default_cost(self, host_parallelism: impl FnOnce() -> u32) -> CostParameters {
		match self {
			Variant::GeneratedSalt { profile } => profile.parameters(),
			Variant::ExplicitSalt => CostParameters {
				key_length: EXPLICIT_SALT_KEY_LENGTH,
				parallelism: host_parallelism(),
				memory_kib: EXPLICIT_SALT_MEMORY_KIB,
				iterations: EXPLICIT_SALT_ITERATIONS,
			},
		}
	}
}

impl fmt::Display for Variant {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Variant::GeneratedSalt { profile } => write!(f, "generated_salt({profile})"),
			Variant::ExplicitSalt => f.write_str("explicit_salt"),
		}
	}
}

/// How a new record's identifier is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum IdentifierStrategy {
	Static(String),
	/// UUIDv4 per record.
	Random,
}

impl Default for IdentifierStrategy {
	fn default() -> Self {
		IdentifierStrategy::Static(STATIC_IDENTIFIER.to_string())
	}
}

impl IdentifierStrategy {
	pub fn assign(&self) -> String {
		match self {
			IdentifierStrategy::Static(id) => id.clone(),
			IdentifierStrategy::Random => Uuid::new_v4().to_string(),
		}
	}
}

/// Provider-wide settings handed to the controller through `configure`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderData {
	pub variant: Variant,
	pub algorithm: HashAlgorithm,
	pub identifier: IdentifierStrategy,
	/// Provider level cost defaults, applied before the variant defaults.
	pub cost_defaults: CostOverrides,
}

/// Processing units available to this process, at least 1.
pub fn host_parallelism() -> u32 {
	std::thread::available_parallelism()
		.map(|n| u32::try_from(n.get()).unwrap_or(u32::MAX))
		.unwrap_or(1)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_explicit_salt_compares_salt() {
		assert!(Variant::ExplicitSalt.salt_is_secret_determining());
		assert!(!Variant::default().salt_is_secret_determining());
	}

	#[test]
	fn generated_salt_defaults_follow_profile() {
		let variant = Variant::GeneratedSalt {
			profile: CostProfile::Owasp,
		};
		let cost = variant.default_cost(|| panic!("host not consulted"));
		assert_eq!(cost, CostProfile::Owasp.parameters());
	}

	#[test]
	fn explicit_salt_defaults_use_host_parallelism() {
		let cost = Variant::ExplicitSalt.default_cost(|| 6);
		assert_eq!(cost.parallelism, 6);
		assert_eq!(cost.key_length, 32);
		assert_eq!(cost.memory_kib, 65536);
		assert_eq!(cost.iterations, 3);
	}

	#[test]
	fn static_identifier_is_stable() {
		let strategy = IdentifierStrategy::default();
		assert_eq!(strategy.assign(), "argon2-id");
		assert_eq!(strategy.assign(), strategy.assign());
	}

	#[test]
	fn random_identifiers_differ() {
		let strategy = IdentifierStrategy::Random;
		assert_ne!(strategy.assign(), strategy.assign());
	}

	#[test]
	fn host_parallelism_is_positive() {
		assert!(host_parallelism() >= 1);
	}

	#[test]
	fn variant_serde_shape() {
		let json = serde_json::to_value(Variant::ExplicitSalt).unwrap();
		assert_eq!(json["kind"], "explicit_salt");

		let parsed: Variant = serde_json::from_str(r#"{"kind":"generated_salt"}"#).unwrap();
		assert_eq!(parsed, Variant::default());
	}
}
