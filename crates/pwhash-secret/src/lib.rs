// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sensitive value wrapper for managed hash resources.
//!
//! Every attribute the provider marks as sensitive (the plaintext secret, an
//! operator supplied salt, and the computed digest) is held in a [`Secret<T>`].
//! The wrapper makes the safe thing the default:
//!
//! - `Debug` and `Display` print [`REDACTED`]
//! - plain `Serialize` writes [`REDACTED`], so diagnostics and config dumps stay clean
//! - the inner value is zeroized on drop
//! - reading the value requires an explicit [`Secret::expose`] call
//!
//! State transfer back to the declarative engine is the one place where the
//! real value has to leave the process. Fields that take part in it opt in
//! with the helpers in [`expose`]:
//!
//! ```
//! use pwhash_secret::{expose, SecretString};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Persisted {
//!     #[serde(serialize_with = "expose::string")]
//!     hash: SecretString,
//! }
//!
//! let persisted = Persisted { hash: SecretString::from("$argon2id$...") };
//! assert_eq!(format!("{:?}", persisted.hash), "Secret(\"[REDACTED]\")");
//! assert_eq!(
//!     serde_json::to_string(&persisted).unwrap(),
//!     r#"{"hash":"$argon2id$..."}"#
//! );
//! ```

use std::fmt;

use zeroize::Zeroize;

/// Placeholder written wherever a sensitive value would otherwise appear.
pub const REDACTED: &str = "[REDACTED]";

/// A sensitive value that refuses to show itself unless asked explicitly.
///
/// There is no `Deref`; call [`Secret::expose`] at the point of use so the
/// access is visible in review.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct Secret<T>
where
	T: Zeroize,
{
	inner: T,
}

/// Sensitive string attribute (`secret`, `salt`, `hash`).
pub type SecretString = Secret<String>;

impl<T> Secret<T>
where
	T: Zeroize,
{
	pub fn new(inner: T) -> Self {
		Self { inner }
	}

	/// Borrow the wrapped value.
	pub fn expose(&self) -> &T {
		&self.inner
	}
}

impl SecretString {
	/// Borrow the wrapped string as `&str`.
	pub fn expose_str(&self) -> &str {
		self.inner.as_str()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}
}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		Self::new(value.to_string())
	}
}

impl<T> Clone for Secret<T>
where
	T: Zeroize + Clone,
{
	fn clone(&self) -> Self {
		Self::new(self.inner.clone())
	}
}

impl<T> fmt::Debug for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Secret").field(&REDACTED).finish()
	}
}

impl<T> fmt::Display for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

// Change detection compares secrets by value.
impl<T> PartialEq for Secret<T>
where
	T: Zeroize + PartialEq,
{
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl<T> Eq for Secret<T> where T: Zeroize + Eq {}

#[cfg(feature = "serde")]
mod serde_impl {
	use serde::{Deserialize, Deserializer, Serialize, Serializer};
	use zeroize::Zeroize;

	use super::{Secret, REDACTED};

	impl<T> Serialize for Secret<T>
	where
		T: Serialize + Zeroize,
	{
		fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
		where
			S: Serializer,
		{
			serializer.serialize_str(REDACTED)
		}
	}

	impl<'de, T> Deserialize<'de> for Secret<T>
	where
		T: Deserialize<'de> + Zeroize,
	{
		fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
		where
			D: Deserializer<'de>,
		{
			T::deserialize(deserializer).map(Secret::new)
		}
	}
}

/// `serialize_with` helpers that write the real value.
///
/// Only the persisted resource state uses these. Anything headed for logs,
/// diagnostics or debug dumps must go through the redacting impls instead.
#[cfg(feature = "serde")]
pub mod expose {
	use serde::Serializer;

	use super::SecretString;

	pub fn string<S>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(secret.expose_str())
	}

	pub fn option<S>(secret: &Option<SecretString>, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match secret {
			Some(secret) => serializer.serialize_some(secret.expose_str()),
			None => serializer.serialize_none(),
		}
	}
}
