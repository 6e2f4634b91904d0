// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Argon2 hash engine for managed secret hashes.
//!
//! A pure mapping from `(secret, salt-or-none, cost parameters)` to a PHC
//! encoded digest:
//!
//! - parameters are validated before any randomness is consumed or any
//!   memory-hard work starts
//! - a missing salt is replaced by 16 bytes from the OS CSPRNG
//! - the digest embeds algorithm, version, parameters and salt, so
//!   [`verify`] needs nothing but the secret and the string
//!
//! ```
//! use pwhash_engine::{compute_hash, verify, CostParameters};
//!
//! let params = CostParameters { key_length: 32, parallelism: 1, memory_kib: 64, iterations: 1 };
//! let digest = compute_hash("example-password", Some("example-salt"), &params).unwrap();
//!
//! assert!(verify("example-password", digest.expose_str()).unwrap());
//! assert!(!verify("new-password", digest.expose_str()).unwrap());
//! ```

pub mod algorithm;
pub mod error;
pub mod hasher;
pub mod params;

pub use algorithm::HashAlgorithm;
pub use error::{HashError, Result};
pub use hasher::{
	compute_hash, compute_hash_for, compute_hash_with, inspect, verify, DigestInfo, EncodedDigest,
};
pub use params::{validate_salt, CostParameters, CostProfile};
