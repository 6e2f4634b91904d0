// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Cost parameters and the recommended profiles they default from.
//!
//! Bounds mirror the Argon2 primitive (RFC 9106):
//! - output length: 10 ..= 64 bytes (the PHC hash field)
//! - iterations: at least 1
//! - parallelism: 1 ..= 2^24 - 1 lanes
//! - memory: at least 8 KiB per lane
//! - salt: at least 8 bytes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HashError, Result};

pub const MIN_KEY_LENGTH: u32 = 10;
pub const MAX_KEY_LENGTH: u32 = 64;
pub const MIN_ITERATIONS: u32 = 1;
pub const MIN_PARALLELISM: u32 = 1;
pub const MAX_PARALLELISM: u32 = 0x00ff_ffff;
/// Argon2 needs two synchronisation blocks per slice, four slices per lane.
pub const MIN_MEMORY_KIB_PER_LANE: u32 = 8;

pub const MIN_SALT_LEN: usize = 8;
/// Largest raw salt that still fits the 64 character PHC salt field.
pub const MAX_SALT_LEN: usize = 48;
/// Length of engine generated salts.
pub const GENERATED_SALT_LEN: usize = 16;

/// The four knobs controlling an Argon2 computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CostParameters {
	/// Digest length in bytes.
	pub key_length: u32,
	/// Number of lanes.
	pub parallelism: u32,
	/// Memory in KiB.
	pub memory_kib: u32,
	/// Passes over memory (Argon2 `t_cost`).
	pub iterations: u32,
}

impl CostParameters {
	/// Check the parameters against the primitive's domain.
	///
	/// Called before any salt is generated or any hashing begins.
	pub fn validate(&self) -> Result<()> {
		if !(MIN_KEY_LENGTH..=MAX_KEY_LENGTH).contains(&self.key_length) {
			return Err(HashError::InvalidParameters(format!(
				"key_length must be between {MIN_KEY_LENGTH} and {MAX_KEY_LENGTH} bytes, got {}",
				self.key_length
			)));
		}
		if self.iterations < MIN_ITERATIONS {
			return Err(HashError::InvalidParameters(format!(
				"iterations must be at least {MIN_ITERATIONS}, got {}",
				self.iterations
			)));
		}
		if !(MIN_PARALLELISM..=MAX_PARALLELISM).contains(&self.parallelism) {
			return Err(HashError::InvalidParameters(format!(
				"parallelism must be between {MIN_PARALLELISM} and {MAX_PARALLELISM}, got {}",
				self.parallelism
			)));
		}
		let min_memory = self.min_memory_kib();
		if u64::from(self.memory_kib) < min_memory {
			return Err(HashError::InvalidParameters(format!(
				"memory_kib must be at least {min_memory} for parallelism {}, got {}",
				self.parallelism, self.memory_kib
			)));
		}
		Ok(())
	}

	/// Smallest memory cost the primitive accepts for this parallelism.
	pub fn min_memory_kib(&self) -> u64 {
		u64::from(self.parallelism) * u64::from(MIN_MEMORY_KIB_PER_LANE)
	}
}

impl fmt::Display for CostParameters {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"m={},t={},p={},len={}",
			self.memory_kib, self.iterations, self.parallelism, self.key_length
		)
	}
}

/// Validate an operator supplied salt.
pub fn validate_salt(salt: &str) -> Result<()> {
	let len = salt.len();
	if !(MIN_SALT_LEN..=MAX_SALT_LEN).contains(&len) {
		return Err(HashError::InvalidParameters(format!(
			"salt must be between {MIN_SALT_LEN} and {MAX_SALT_LEN} bytes, got {len}"
		)));
	}
	Ok(())
}

/// Named cost profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostProfile {
	/// RFC 9106 first recommended option: 2 GiB, one pass.
	Rfc9106Recommended,
	/// RFC 9106 second recommended option for memory constrained hosts.
	#[default]
	Rfc9106LowMemory,
	/// OWASP password storage minimum.
	Owasp,
}

impl CostProfile {
	pub fn parameters(self) -> CostParameters {
		match self {
			CostProfile::Rfc9106Recommended => CostParameters {
				key_length: 32,
				parallelism: 4,
				memory_kib: 2 * 1024 * 1024,
				iterations: 1,
			},
			CostProfile::Rfc9106LowMemory => CostParameters {
				key_length: 32,
				parallelism: 4,
				memory_kib: 64 * 1024,
				iterations: 3,
			},
			CostProfile::Owasp => CostParameters {
				key_length: 32,
				parallelism: 1,
				memory_kib: 19 * 1024,
				iterations: 2,
			},
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			CostProfile::Rfc9106Recommended => "rfc9106_recommended",
			CostProfile::Rfc9106LowMemory => "rfc9106_low_memory",
			CostProfile::Owasp => "owasp",
		}
	}
}

impl fmt::Display for CostProfile {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for CostProfile {
	type Err = HashError;

	fn from_str(s: &str) -> Result<Self> {
		match s.to_ascii_lowercase().replace('-', "_").as_str() {
			"rfc9106_recommended" | "recommended" => Ok(CostProfile::Rfc9106Recommended),
			"rfc9106_low_memory" | "low_memory" => Ok(CostProfile::Rfc9106LowMemory),
			"owasp" => Ok(CostProfile::Owasp),
			other => Err(HashError::InvalidParameters(format!(
				"unknown cost profile '{other}'"
			))),
		}
	}
}
