// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Argon2 variant selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HashError;

/// Argon2 variant used for a record. Argon2id unless configured otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
	#[default]
	Argon2id,
	Argon2i,
	Argon2d,
}

impl HashAlgorithm {
	/// PHC identifier, e.g. `argon2id`.
	pub fn ident(self) -> &'static str {
		match self {
			HashAlgorithm::Argon2id => "argon2id",
			HashAlgorithm::Argon2i => "argon2i",
			HashAlgorithm::Argon2d => "argon2d",
		}
	}

	pub(crate) fn primitive(self) -> argon2::Algorithm {
		match self {
			HashAlgorithm::Argon2id => argon2::Algorithm::Argon2id,
			HashAlgorithm::Argon2i => argon2::Algorithm::Argon2i,
			HashAlgorithm::Argon2d => argon2::Algorithm::Argon2d,
		}
	}
}

impl fmt::Display for HashAlgorithm {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.ident())
	}
}

impl FromStr for HashAlgorithm {
	type Err = HashError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"argon2id" => Ok(HashAlgorithm::Argon2id),
			"argon2i" => Ok(HashAlgorithm::Argon2i),
			"argon2d" => Ok(HashAlgorithm::Argon2d),
			other => Err(HashError::InvalidParameters(format!(
				"unsupported algorithm '{other}'"
			))),
		}
	}
}
