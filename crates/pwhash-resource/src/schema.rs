// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Attribute metadata exposed to the declarative engine.

use serde::Serialize;

use crate::variant::Variant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
	String,
	Integer,
}

/// One attribute of the resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeSchema {
	pub name: &'static str,
	pub description: &'static str,
	pub kind: AttributeKind,
	pub required: bool,
	pub optional: bool,
	pub computed: bool,
	pub sensitive: bool,
}

impl AttributeSchema {
	fn required(name: &'static str, description: &'static str) -> Self {
		Self {
			name,
			description,
			kind: AttributeKind::String,
			required: true,
			optional: false,
			computed: false,
			sensitive: false,
		}
	}

	/// Operator may set it; otherwise the controller fills it in.
	fn optional_computed(name: &'static str, description: &'static str, kind: AttributeKind) -> Self {
		Self {
			name,
			description,
			kind,
			required: false,
			optional: true,
			computed: true,
			sensitive: false,
		}
	}

	fn computed(name: &'static str, description: &'static str) -> Self {
		Self {
			name,
			description,
			kind: AttributeKind::String,
			required: false,
			optional: false,
			computed: true,
			sensitive: false,
		}
	}

	fn sensitive(mut self) -> Self {
		self.sensitive = true;
		self
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceSchema {
	pub description: &'static str,
	pub attributes: Vec<AttributeSchema>,
}

impl ResourceSchema {
	pub fn for_variant(variant: Variant) -> Self {
		let mut attributes = vec![AttributeSchema::required("secret", "The secret to hash").sensitive()];

		if variant.salt_is_operator_supplied() {
			attributes.push(AttributeSchema::required("salt", "The salt to use for hashing").sensitive());
		}

		attributes.extend([
			AttributeSchema::optional_computed(
				"algorithm",
				"Argon2 variant: argon2id, argon2i or argon2d",
				AttributeKind::String,
			),
			AttributeSchema::optional_computed(
				"key_length",
				"Length of the derived key in bytes",
				AttributeKind::Integer,
			),
			AttributeSchema::optional_computed(
				"parallelism",
				"Number of lanes (threads) used while hashing",
				AttributeKind::Integer,
			),
			AttributeSchema::optional_computed(
				"memory_kib",
				"Memory used for hashing, in KiB",
				AttributeKind::Integer,
			),
			AttributeSchema::optional_computed(
				"iterations",
				"Number of passes over memory",
				AttributeKind::Integer,
			),
			AttributeSchema::computed("hash", "The generated hash in PHC string format").sensitive(),
			AttributeSchema::computed("id", "Argon2 identifier"),
		]);

		Self {
			description: "Argon2 managed secret hash",
			attributes,
		}
	}

	pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
		self.attributes.iter().find(|a| a.name == name)
	}
}
