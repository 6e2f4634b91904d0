// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resource variant, algorithm and identifier selection.

use std::str::FromStr;

use pwhash_engine::{CostProfile, HashAlgorithm};
use pwhash_resource::{IdentifierStrategy, Variant};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
	#[default]
	GeneratedSalt,
	ExplicitSalt,
}

impl FromStr for VariantKind {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().replace('-', "_").as_str() {
			"generated_salt" | "generated" => Ok(VariantKind::GeneratedSalt),
			"explicit_salt" | "explicit" => Ok(VariantKind::ExplicitSalt),
			other => Err(format!(
				"unknown variant '{other}', expected generated_salt or explicit_salt"
			)),
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResourceConfigLayer {
	pub variant: Option<VariantKind>,
	pub profile: Option<CostProfile>,
	pub algorithm: Option<HashAlgorithm>,
	/// `random` or `static:<value>`.
	pub identifier: Option<String>,
}

impl ResourceConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.variant.is_some() {
			self.variant = other.variant;
		}
		if other.profile.is_some() {
			self.profile = other.profile;
		}
		if other.algorithm.is_some() {
			self.algorithm = other.algorithm;
		}
		if other.identifier.is_some() {
			self.identifier = other.identifier;
		}
	}

	pub fn finalize(self) -> Result<ResourceSettings, ConfigError> {
		let variant = match self.variant.unwrap_or_default() {
			VariantKind::GeneratedSalt => Variant::GeneratedSalt {
				profile: self.profile.unwrap_or_default(),
			},
			VariantKind::ExplicitSalt => {
				if let Some(profile) = self.profile {
					warn!(%profile, "cost profile is ignored by the explicit_salt variant");
				}
				Variant::ExplicitSalt
			}
		};

		let identifier = match self.identifier {
			Some(raw) => parse_identifier(&raw)?,
			None => IdentifierStrategy::default(),
		};

		Ok(ResourceSettings {
			variant,
			algorithm: self.algorithm.unwrap_or_default(),
			identifier,
		})
	}
}

/// Parse `random`, `static` or `static:<value>`.
pub fn parse_identifier(raw: &str) -> Result<IdentifierStrategy, ConfigError> {
	match raw.split_once(':') {
		None if raw.eq_ignore_ascii_case("random") => Ok(IdentifierStrategy::Random),
		None if raw.eq_ignore_ascii_case("static") => Ok(IdentifierStrategy::default()),
		Some((kind, value)) if kind.eq_ignore_ascii_case("static") && !value.is_empty() => {
			Ok(IdentifierStrategy::Static(value.to_string()))
		}
		_ => Err(ConfigError::invalid_value(
			"resource.identifier",
			format!("'{raw}' is not 'random' or 'static:<value>'"),
		)),
	}
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceSettings {
	pub variant: Variant,
	pub algorithm: HashAlgorithm,
	pub identifier: IdentifierStrategy,
}
