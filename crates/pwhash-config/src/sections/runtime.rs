// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Runtime limits for hash computations.

use std::time::Duration;

use pwhash_resource::host_parallelism;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RuntimeConfigLayer {
	pub max_concurrent_hashes: Option<usize>,
	pub hash_timeout_secs: Option<u64>,
}

impl RuntimeConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.max_concurrent_hashes.is_some() {
			self.max_concurrent_hashes = other.max_concurrent_hashes;
		}
		if other.hash_timeout_secs.is_some() {
			self.hash_timeout_secs = other.hash_timeout_secs;
		}
	}

	pub fn finalize(self) -> RuntimeConfig {
		RuntimeConfig {
			max_concurrent_hashes: self
				.max_concurrent_hashes
				.unwrap_or_else(default_concurrency),
			hash_timeout_secs: self.hash_timeout_secs,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuntimeConfig {
	/// Upper bound on hash computations running at once.
	pub max_concurrent_hashes: usize,
	/// No timeout when unset.
	pub hash_timeout_secs: Option<u64>,
}

impl RuntimeConfig {
	pub fn hash_timeout(&self) -> Option<Duration> {
		self.hash_timeout_secs.map(Duration::from_secs)
	}
}

impl Default for RuntimeConfig {
	fn default() -> Self {
		Self {
			max_concurrent_hashes: default_concurrency(),
			hash_timeout_secs: None,
		}
	}
}

fn default_concurrency() -> usize {
	usize::try_from(host_parallelism()).unwrap_or(1)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_values() {
		let config = RuntimeConfig::default();
		assert!(config.max_concurrent_hashes >= 1);
		assert!(config.hash_timeout().is_none());
	}

	#[test]
	fn test_layer_finalize_with_values() {
		let config = RuntimeConfigLayer {
			max_concurrent_hashes: Some(2),
			hash_timeout_secs: Some(30),
		}
		.finalize();
		assert_eq!(config.max_concurrent_hashes, 2);
		assert_eq!(config.hash_timeout(), Some(Duration::from_secs(30)));
	}

	#[test]
	fn test_merge_keeps_unset() {
		let mut base = RuntimeConfigLayer {
			max_concurrent_hashes: Some(4),
			hash_timeout_secs: Some(10),
		};
		base.merge(RuntimeConfigLayer {
			hash_timeout_secs: Some(60),
			..Default::default()
		});
		assert_eq!(base.max_concurrent_hashes, Some(4));
		assert_eq!(base.hash_timeout_secs, Some(60));
	}
}
