// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Digest computation and verification.
//!
//! Every call builds its own `Argon2` instance from the supplied parameters;
//! nothing is shared between calls, so independent records can be hashed on
//! separate threads.

use argon2::password_hash::{self, Output, ParamsString, PasswordHash, PasswordVerifier, SaltString};
use argon2::{Argon2, Block, Params, Version};
use pwhash_secret::SecretString;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::{debug, trace};

use crate::algorithm::HashAlgorithm;
use crate::error::{HashError, Result};
use crate::params::{validate_salt, CostParameters, GENERATED_SALT_LEN};

/// A PHC encoded digest: algorithm, version, parameters, salt and hash in one
/// string. Held as a secret so it never lands in logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedDigest(SecretString);

impl EncodedDigest {
	pub fn expose_str(&self) -> &str {
		self.0.expose_str()
	}

	pub fn into_secret(self) -> SecretString {
		self.0
	}
}

/// Parameters recovered from an encoded digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestInfo {
	pub algorithm: HashAlgorithm,
	pub version: u32,
	pub cost: CostParameters,
}

/// Hash `secret` with Argon2id.
///
/// With `salt == None` a fresh random salt is drawn from the OS, so two calls
/// with the same secret yield different digests that both verify.
pub fn compute_hash(
	secret: &str,
	salt: Option<&str>,
	params: &CostParameters,
) -> Result<EncodedDigest> {
	compute_hash_for(HashAlgorithm::Argon2id, secret, salt, params)
}

/// Hash `secret` with the given Argon2 variant and OS randomness.
pub fn compute_hash_for(
	algorithm: HashAlgorithm,
	secret: &str,
	salt: Option<&str>,
	params: &CostParameters,
) -> Result<EncodedDigest> {
	compute_hash_with(algorithm, secret, salt, params, &mut OsRng)
}

/// Hash `secret` with an explicit variant and random source.
///
/// Parameters and salt are validated first; on failure neither `rng` nor the
/// primitive is touched.
pub fn compute_hash_with<R>(
	algorithm: HashAlgorithm,
	secret: &str,
	salt: Option<&str>,
	params: &CostParameters,
	rng: &mut R,
) -> Result<EncodedDigest>
where
	R: RngCore + CryptoRng,
{
	params.validate()?;
	if let Some(salt) = salt {
		validate_salt(salt)?;
	}

	let argon2_params = argon2_params(params)?;
	let argon2 = Argon2::new(algorithm.primitive(), Version::V0x13, argon2_params.clone());

	let mut generated = [0u8; GENERATED_SALT_LEN];
	let salt_bytes: &[u8] = match salt {
		Some(salt) => salt.as_bytes(),
		None => {
			rng.fill_bytes(&mut generated);
			&generated
		}
	};
	let salt = SaltString::encode_b64(salt_bytes)
		.map_err(|e| HashError::InvalidParameters(format!("salt rejected: {e}")))?;

	debug!(%algorithm, cost = %params, "computing digest");

	let mut blocks = allocate_blocks(argon2_params.block_count())?;
	let output_len = argon2_params.output_len().unwrap_or(Params::DEFAULT_OUTPUT_LEN);
	let hash = Output::init_with(output_len, |out| {
		argon2
			.hash_password_into_with_memory(secret.as_bytes(), salt_bytes, out, blocks.as_mut_slice())
			.map_err(password_hash::Error::from)
	})
	.map_err(|e| HashError::ComputationFailed(e.to_string()))?;

	let digest = PasswordHash {
		algorithm: algorithm.primitive().ident(),
		version: Some(Version::V0x13 as u32),
		params: ParamsString::try_from(&argon2_params)
			.map_err(|e| HashError::ComputationFailed(e.to_string()))?,
		salt: Some(salt.as_salt()),
		hash: Some(hash),
	}
	.to_string();

	trace!(%algorithm, "digest computed");
	Ok(EncodedDigest(SecretString::new(digest)))
}

/// Check `secret` against an encoded digest.
///
/// Algorithm, version and cost are taken from the digest itself. Returns
/// `Ok(false)` for a well formed digest that does not match.
pub fn verify(secret: &str, encoded: &str) -> Result<bool> {
	let parsed = PasswordHash::new(encoded).map_err(|e| HashError::InvalidDigest(e.to_string()))?;

	match Argon2::default().verify_password(secret.as_bytes(), &parsed) {
		Ok(()) => Ok(true),
		Err(password_hash::Error::Password) => Ok(false),
		Err(e) => Err(HashError::InvalidDigest(e.to_string())),
	}
}

/// Recover the algorithm and cost parameters embedded in a digest.
pub fn inspect(encoded: &str) -> Result<DigestInfo> {
	let parsed = PasswordHash::new(encoded).map_err(|e| HashError::InvalidDigest(e.to_string()))?;
	let algorithm: HashAlgorithm = parsed
		.algorithm
		.as_str()
		.parse()
		.map_err(|_| HashError::InvalidDigest(format!("unsupported algorithm '{}'", parsed.algorithm)))?;
	let params = Params::try_from(&parsed).map_err(|e| HashError::InvalidDigest(e.to_string()))?;
	let key_length = parsed
		.hash
		.map(|h| h.len())
		.ok_or_else(|| HashError::InvalidDigest("digest has no hash segment".to_string()))?;

	Ok(DigestInfo {
		algorithm,
		version: parsed.version.unwrap_or(Version::V0x13 as u32),
		cost: CostParameters {
			key_length: u32::try_from(key_length)
				.map_err(|_| HashError::InvalidDigest("hash segment too long".to_string()))?,
			parallelism: params.p_cost(),
			memory_kib: params.m_cost(),
			iterations: params.t_cost(),
		},
	})
}

fn argon2_params(params: &CostParameters) -> Result<Params> {
	let key_length = usize::try_from(params.key_length)
		.map_err(|_| HashError::InvalidParameters("key_length exceeds platform limits".to_string()))?;
	Params::new(
		params.memory_kib,
		params.iterations,
		params.parallelism,
		Some(key_length),
	)
	.map_err(|e| HashError::InvalidParameters(e.to_string()))
}

/// Working memory for one computation. Allocation failure is reported rather
/// than aborting the process.
fn allocate_blocks(count: usize) -> Result<Vec<Block>> {
	let mut blocks = Vec::new();
	blocks.try_reserve_exact(count).map_err(|e| {
		HashError::ComputationFailed(format!("cannot allocate {count} memory blocks: {e}"))
	})?;
	blocks.resize(count, Block::default());
	Ok(blocks)
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rand::RngCore;

	// Minimal cost so the suite stays fast. Never use outside tests.
	fn fast() -> CostParameters {
		CostParameters {
			key_length: 32,
			parallelism: 1,
			memory_kib: 64,
			iterations: 1,
		}
	}

	/// Random source that records whether it was consulted.
	#[derive(Default)]
	struct WatchedRng {
		calls: usize,
		inner: rand::rngs::OsRng,
	}

	impl RngCore for WatchedRng {
		fn next_u32(&mut self) -> u32 {
			self.calls += 1;
			self.inner.next_u32()
		}

		fn next_u64(&mut self) -> u64 {
			self.calls += 1;
			self.inner.next_u64()
		}

		fn fill_bytes(&mut self, dest: &mut [u8]) {
			self.calls += 1;
			self.inner.fill_bytes(dest)
		}

		fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
			self.calls += 1;
			self.inner.try_fill_bytes(dest)
		}
	}

	impl CryptoRng for WatchedRng {}

	#[test]
	fn digest_is_self_describing_argon2id() {
		let digest = compute_hash("example-password", None, &fast()).unwrap();
		assert!(digest.expose_str().starts_with("$argon2id$v=19$m=64,t=1,p=1$"));
	}

	#[test]
	fn generated_salts_differ_but_both_verify() {
		let first = compute_hash("example-password", None, &fast()).unwrap();
		let second = compute_hash("example-password", None, &fast()).unwrap();

		assert_ne!(first, second);
		assert!(verify("example-password", first.expose_str()).unwrap());
		assert!(verify("example-password", second.expose_str()).unwrap());
	}

	#[test]
	fn explicit_salt_is_deterministic() {
		let first = compute_hash("example-password", Some("example-salt"), &fast()).unwrap();
		let second = compute_hash("example-password", Some("example-salt"), &fast()).unwrap();
		assert_eq!(first, second);

		let other_salt = compute_hash("example-password", Some("new-salt"), &fast()).unwrap();
		assert_ne!(first, other_salt);
		assert!(verify("example-password", other_salt.expose_str()).unwrap());
	}

	#[test]
	fn wrong_secret_does_not_verify() {
		let digest = compute_hash("example-password", Some("example-salt"), &fast()).unwrap();
		assert!(!verify("new-password", digest.expose_str()).unwrap());
	}

	#[test]
	fn invalid_parameters_consume_no_randomness() {
		let mut rng = WatchedRng::default();
		for params in [
			CostParameters {
				iterations: 0,
				..fast()
			},
			CostParameters {
				key_length: 0,
				..fast()
			},
			CostParameters {
				key_length: 9,
				..fast()
			},
			CostParameters {
				key_length: 65,
				..fast()
			},
		] {
			let err = compute_hash_with(
				HashAlgorithm::Argon2id,
				"example-password",
				None,
				&params,
				&mut rng,
			)
			.unwrap_err();
			assert!(matches!(err, HashError::InvalidParameters(_)));
		}
		assert_eq!(rng.calls, 0);
	}

	#[test]
	fn generated_salt_consumes_randomness() {
		let mut rng = WatchedRng::default();
		compute_hash_with(
			HashAlgorithm::Argon2id,
			"example-password",
			None,
			&fast(),
			&mut rng,
		)
		.unwrap();
		assert!(rng.calls > 0);
	}

	#[test]
	fn explicit_salt_skips_randomness() {
		let mut rng = WatchedRng::default();
		compute_hash_with(
			HashAlgorithm::Argon2id,
			"example-password",
			Some("example-salt"),
			&fast(),
			&mut rng,
		)
		.unwrap();
		assert_eq!(rng.calls, 0);
	}

	#[test]
	fn key_length_bounds_hash_cleanly() {
		for key_length in [10, 64] {
			let params = CostParameters {
				key_length,
				..fast()
			};
			let mut rng = WatchedRng::default();
			let digest = compute_hash_with(
				HashAlgorithm::Argon2id,
				"example-password",
				None,
				&params,
				&mut rng,
			)
			.unwrap();
			assert_eq!(rng.calls, 1);
			assert_eq!(inspect(digest.expose_str()).unwrap().cost.key_length, key_length);
		}
	}

	#[test]
	fn oversized_working_memory_is_an_error() {
		let err = allocate_blocks(usize::MAX).unwrap_err();
		assert!(matches!(err, HashError::ComputationFailed(_)));
	}

	#[test]
	fn digest_matches_password_hasher_encoding() {
		use argon2::password_hash::PasswordHasher;

		let params = fast();
		let argon2 = Argon2::new(
			HashAlgorithm::Argon2id.primitive(),
			Version::V0x13,
			argon2_params(&params).unwrap(),
		);
		let salt = SaltString::encode_b64(b"example-salt").unwrap();
		let expected = argon2
			.hash_password(b"example-password", &salt)
			.unwrap()
			.to_string();

		let digest = compute_hash("example-password", Some("example-salt"), &params).unwrap();
		assert_eq!(digest.expose_str(), expected);
	}

	#[test]
	fn short_salt_rejected_before_hashing() {
		let err = compute_hash("example-password", Some("salt"), &fast()).unwrap_err();
		assert!(matches!(err, HashError::InvalidParameters(_)));
	}

	#[test]
	fn error_text_never_contains_inputs() {
		let params = CostParameters {
			parallelism: 0,
			..fast()
		};
		let err = compute_hash("hunter2-password", Some("pepper-salt"), &params).unwrap_err();
		let text = err.to_string();
		assert!(!text.contains("hunter2-password"));
		assert!(!text.contains("pepper-salt"));
	}

	#[test]
	fn other_variants_verify_through_embedded_ident() {
		for algorithm in [HashAlgorithm::Argon2i, HashAlgorithm::Argon2d] {
			let digest = compute_hash_with(
				algorithm,
				"example-password",
				None,
				&fast(),
				&mut OsRng,
			)
			.unwrap();
			assert!(digest
				.expose_str()
				.starts_with(&format!("${}$", algorithm.ident())));
			assert!(verify("example-password", digest.expose_str()).unwrap());
		}
	}

	#[test]
	fn inspect_recovers_parameters() {
		let params = CostParameters {
			key_length: 24,
			parallelism: 2,
			memory_kib: 128,
			iterations: 2,
		};
		let digest = compute_hash("example-password", None, &params).unwrap();
		let info = inspect(digest.expose_str()).unwrap();

		assert_eq!(info.algorithm, HashAlgorithm::Argon2id);
		assert_eq!(info.version, 0x13);
		assert_eq!(info.cost, params);
	}

	#[test]
	fn verify_rejects_garbage() {
		assert!(matches!(
			verify("example-password", "not-a-digest"),
			Err(HashError::InvalidDigest(_))
		));
	}

	#[test]
	fn digest_debug_is_redacted() {
		let digest = compute_hash("example-password", None, &fast()).unwrap();
		assert!(!format!("{digest:?}").contains("argon2id"));
	}

	#[test]
	fn concurrent_hashing_is_independent() {
		let secrets: Vec<String> = (0..4).map(|i| format!("password-{i}")).collect();
		let digests: Vec<EncodedDigest> = std::thread::scope(|scope| {
			let handles: Vec<_> = secrets
				.iter()
				.map(|secret| scope.spawn(move || compute_hash(secret, None, &fast()).unwrap()))
				.collect();
			handles.into_iter().map(|h| h.join().unwrap()).collect()
		});

		for (secret, digest) in secrets.iter().zip(&digests) {
			assert!(verify(secret, digest.expose_str()).unwrap());
		}
	}

	proptest! {
		#![proptest_config(ProptestConfig::with_cases(8))]

		#[test]
		fn digest_verifies_only_its_secret(
			secret in "[a-zA-Z0-9]{1,24}",
			other in "[a-zA-Z0-9]{1,24}",
			salt in proptest::option::of("[a-z0-9-]{8,24}"),
			key_length in 10u32..=64,
			parallelism in 1u32..3,
		) {
			prop_assume!(secret != other);
			let params = CostParameters {
				key_length,
				parallelism,
				memory_kib: 8 * parallelism,
				iterations: 1,
			};
			let digest = compute_hash(&secret, salt.as_deref(), &params).unwrap();
			prop_assert!(verify(&secret, digest.expose_str()).unwrap());
			prop_assert!(!verify(&other, digest.expose_str()).unwrap());
		}
	}
}
