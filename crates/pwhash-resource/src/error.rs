// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error taxonomy for lifecycle calls.

use pwhash_engine::HashError;
use thiserror::Error;

use crate::diagnostics::Diagnostic;

/// Result type for lifecycle operations.
pub type Result<T> = std::result::Result<T, ResourceError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
	/// Cost parameters or salt outside the primitive's domain.
	#[error("invalid parameters: {0}")]
	InvalidParameters(String),

	/// The hashing primitive failed.
	#[error("hash computation failed: {0}")]
	ComputationFailed(String),

	/// `configure` received provider data of an unexpected type.
	#[error("expected {expected}, got {found}")]
	ConfigurationTypeMismatch {
		expected: &'static str,
		found: &'static str,
	},

	#[error("missing required attribute '{0}'")]
	MissingAttribute(&'static str),

	#[error("attribute '{0}' is not accepted by this resource variant")]
	UnexpectedAttribute(&'static str),
}

impl From<HashError> for ResourceError {
	fn from(err: HashError) -> Self {
		match err {
			HashError::InvalidParameters(msg) => ResourceError::InvalidParameters(msg),
			HashError::ComputationFailed(msg) | HashError::InvalidDigest(msg) => {
				ResourceError::ComputationFailed(msg)
			}
		}
	}
}

impl ResourceError {
	/// Operator facing diagnostic. Built from parameter names and primitive
	/// messages only, never from attribute values.
	pub fn to_diagnostic(&self) -> Diagnostic {
		match self {
			ResourceError::InvalidParameters(msg) => Diagnostic::error(
				"Invalid hash parameters",
				format!("The Argon2 cost parameters are not usable: {msg}"),
			),
			ResourceError::ComputationFailed(msg) => Diagnostic::error(
				"Argon2 error",
				format!("Unable to hash the secret, got error: {msg}"),
			),
			ResourceError::ConfigurationTypeMismatch { expected, found } => Diagnostic::error(
				"Unexpected Resource Configure Type",
				format!(
					"Expected {expected}, got: {found}. Please report this issue to the provider developers."
				),
			),
			ResourceError::MissingAttribute(name) => Diagnostic::error(
				"Missing required attribute",
				format!("The attribute \"{name}\" must be set and non-empty."),
			),
			ResourceError::UnexpectedAttribute(name) => Diagnostic::error(
				"Unexpected attribute",
				format!("The attribute \"{name}\" cannot be set for this resource variant."),
			),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::diagnostics::Severity;

	#[test]
	fn hash_errors_keep_their_kind() {
		assert_eq!(
			ResourceError::from(HashError::InvalidParameters("iterations".into())),
			ResourceError::InvalidParameters("iterations".into())
		);
		assert_eq!(
			ResourceError::from(HashError::ComputationFailed("oom".into())),
			ResourceError::ComputationFailed("oom".into())
		);
	}

	#[test]
	fn configure_mismatch_diagnostic() {
		let diag = ResourceError::ConfigurationTypeMismatch {
			expected: "ProviderData",
			found: "alloc::string::String",
		}
		.to_diagnostic();

		assert_eq!(diag.severity, Severity::Error);
		assert_eq!(diag.summary, "Unexpected Resource Configure Type");
		assert!(diag.detail.contains("alloc::string::String"));
	}
}
