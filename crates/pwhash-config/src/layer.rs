// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration produced by a single source.

use serde::{Deserialize, Serialize};

use crate::sections::{CostConfigLayer, LoggingConfigLayer, ResourceConfigLayer, RuntimeConfigLayer};

/// One source's view of the provider configuration. Unset sections and
/// fields leave lower-precedence values in place when merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProviderConfigLayer {
	pub resource: Option<ResourceConfigLayer>,
	pub cost: Option<CostConfigLayer>,
	pub runtime: Option<RuntimeConfigLayer>,
	pub logging: Option<LoggingConfigLayer>,
}

impl ProviderConfigLayer {
	pub fn merge(&mut self, other: Self) {
		merge_section(&mut self.resource, other.resource, ResourceConfigLayer::merge);
		merge_section(&mut self.cost, other.cost, CostConfigLayer::merge);
		merge_section(&mut self.runtime, other.runtime, RuntimeConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}

fn merge_section<T>(base: &mut Option<T>, other: Option<T>, merge: fn(&mut T, T)) {
	match (base.as_mut(), other) {
		(Some(existing), Some(other)) => merge(existing, other),
		(None, Some(other)) => *base = Some(other),
		(_, None) => {}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::sections::LogFormat;

	#[test]
	fn test_merge_fills_missing_sections() {
		let mut base = ProviderConfigLayer::default();
		base.merge(ProviderConfigLayer {
			runtime: Some(RuntimeConfigLayer {
				max_concurrent_hashes: Some(2),
				..Default::default()
			}),
			..Default::default()
		});
		assert_eq!(base.runtime.unwrap().max_concurrent_hashes, Some(2));
		assert!(base.resource.is_none());
	}

	#[test]
	fn test_merge_is_field_wise() {
		let mut base = ProviderConfigLayer {
			logging: Some(LoggingConfigLayer {
				level: Some("debug".to_string()),
				format: Some(LogFormat::Json),
			}),
			..Default::default()
		};
		base.merge(ProviderConfigLayer {
			logging: Some(LoggingConfigLayer {
				level: Some("warn".to_string()),
				format: None,
			}),
			..Default::default()
		});

		let logging = base.logging.unwrap();
		assert_eq!(logging.level.as_deref(), Some("warn"));
		assert_eq!(logging.format, Some(LogFormat::Json));
	}

	#[test]
	fn test_deserialize_full_file() {
		let toml_str = r#"
[resource]
variant = "generated_salt"
profile = "owasp"
identifier = "random"

[cost]
iterations = 4

[runtime]
hash_timeout_secs = 20

[logging]
level = "debug"
"#;
		let layer: ProviderConfigLayer = toml::from_str(toml_str).unwrap();
		assert_eq!(layer.cost.unwrap().iterations, Some(4));
		assert_eq!(layer.runtime.unwrap().hash_timeout_secs, Some(20));
		assert_eq!(layer.resource.unwrap().identifier.as_deref(), Some("random"));
	}
}
