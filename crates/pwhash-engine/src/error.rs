// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the hash engine.

use thiserror::Error;

/// Result type for hash engine operations.
pub type Result<T> = std::result::Result<T, HashError>;

/// Errors produced while hashing or verifying.
///
/// Messages describe parameters and primitive failures only. They never carry
/// the secret, the salt or the digest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
	/// Cost parameters or salt outside the primitive's domain. Raised before
	/// any salt generation or hashing work.
	#[error("invalid parameters: {0}")]
	InvalidParameters(String),

	/// The primitive itself failed.
	#[error("hash computation failed: {0}")]
	ComputationFailed(String),

	/// An encoded digest could not be parsed or uses an unsupported algorithm.
	#[error("invalid encoded digest: {0}")]
	InvalidDigest(String),
}
