// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Provider-wide cost defaults.

use pwhash_resource::CostOverrides;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CostConfigLayer {
	pub key_length: Option<u32>,
	pub iterations: Option<u32>,
	pub memory_kib: Option<u32>,
	pub parallelism: Option<u32>,
}

impl CostConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.key_length.is_some() {
			self.key_length = other.key_length;
		}
		if other.iterations.is_some() {
			self.iterations = other.iterations;
		}
		if other.memory_kib.is_some() {
			self.memory_kib = other.memory_kib;
		}
		if other.parallelism.is_some() {
			self.parallelism = other.parallelism;
		}
	}

	/// Unset fields stay unset so the variant defaults still apply.
	pub fn finalize(self) -> CostOverrides {
		CostOverrides {
			key_length: self.key_length,
			parallelism: self.parallelism,
			memory_kib: self.memory_kib,
			iterations: self.iterations,
		}
	}
}
