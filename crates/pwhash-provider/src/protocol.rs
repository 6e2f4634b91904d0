// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use pwhash_config::ProviderConfigLayer;
use pwhash_resource::{Diagnostics, ResourceConfig, ResourceSchema, ResourceState};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Request from the host, one per line
#[derive(Debug, Deserialize)]
pub struct Request {
	pub id: u64,
	pub method: String,
	#[serde(default)]
	pub params: Value,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
	pub id: u64,
	pub result: Value,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	pub id: u64,
	pub error: RpcError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RpcError {
	pub code: &'static str,
	pub message: String,
}

// Error codes
pub const INVALID_PARAMS: &str = "invalid_params";
pub const UNKNOWN_METHOD: &str = "unknown_method";
pub const TIMEOUT: &str = "timeout";
pub const INTERNAL_ERROR: &str = "internal_error";

// Method names
pub const METHOD_METADATA: &str = "metadata";
pub const METHOD_SCHEMA: &str = "schema";
pub const METHOD_CONFIGURE: &str = "configure";
pub const METHOD_CREATE: &str = "create";
pub const METHOD_READ: &str = "read";
pub const METHOD_UPDATE: &str = "update";
pub const METHOD_DELETE: &str = "delete";
pub const METHOD_IMPORT_STATE: &str = "import_state";

/// Provider type name used when `metadata` omits one.
pub const DEFAULT_PROVIDER_TYPE_NAME: &str = "password";

// --- Request params ---

#[derive(Debug, Deserialize)]
pub struct MetadataParams {
	#[serde(default = "default_provider_type_name")]
	pub provider_type_name: String,
}

fn default_provider_type_name() -> String {
	DEFAULT_PROVIDER_TYPE_NAME.to_string()
}

/// Overrides layered over the loaded provider configuration.
pub type ConfigureParams = ProviderConfigLayer;

#[derive(Debug, Deserialize)]
pub struct CreateParams {
	pub config: ResourceConfig,
}

#[derive(Debug, Deserialize)]
pub struct StateParams {
	pub state: ResourceState,
}

#[derive(Debug, Deserialize)]
pub struct UpdateParams {
	pub config: ResourceConfig,
	pub prior: ResourceState,
}

#[derive(Debug, Deserialize)]
pub struct ImportStateParams {
	pub id: String,
}

// --- Results ---

#[derive(Debug, Serialize)]
pub struct MetadataResult {
	pub type_name: String,
}

#[derive(Debug, Serialize)]
pub struct SchemaResult {
	pub schema: ResourceSchema,
}

/// Outcome of a lifecycle verb. `state` is absent when the verb failed or
/// removed the record.
#[derive(Debug, Serialize)]
pub struct LifecycleResult {
	pub state: Option<ResourceState>,
	pub diagnostics: Diagnostics,
}

impl ErrorResponse {
	pub fn new(id: u64, code: &'static str, message: impl Into<String>) -> Self {
		Self {
			id,
			error: RpcError::new(code, message),
		}
	}
}

impl RpcError {
	pub fn new(code: &'static str, message: impl Into<String>) -> Self {
		Self {
			code,
			message: message.into(),
		}
	}
}

/// Serialize a response to a single line.
pub fn encode<T: Serialize>(id: u64, response: &T) -> String {
	serde_json::to_string(response).unwrap_or_else(|e| {
		json!({
			"id": id,
			"error": { "code": INTERNAL_ERROR, "message": format!("failed to encode response: {e}") },
		})
		.to_string()
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use pwhash_resource::Diagnostic;

	#[test]
	fn request_defaults_params_to_null() {
		let request: Request =
			serde_json::from_str(r#"{"id":1,"method":"schema"}"#).expect("request to parse");
		assert_eq!(request.id, 1);
		assert_eq!(request.method, METHOD_SCHEMA);
		assert_eq!(request.params, json!(null));
	}

	#[test]
	fn success_response_serializes_result() {
		let response = SuccessResponse {
			id: 2,
			result: json!(MetadataResult {
				type_name: "password_argon2".to_string(),
			}),
		};
		let value = serde_json::to_value(response).expect("response to serialize");
		assert_eq!(value["id"], json!(2));
		assert_eq!(value["result"]["type_name"], json!("password_argon2"));
	}

	#[test]
	fn error_response_serializes_error() {
		let response = ErrorResponse::new(3, UNKNOWN_METHOD, "nope");
		let value: Value = serde_json::from_str(&encode(3, &response)).expect("valid json");
		assert_eq!(value["id"], json!(3));
		assert_eq!(value["error"]["code"], json!(UNKNOWN_METHOD));
		assert_eq!(value["error"]["message"], json!("nope"));
	}

	#[test]
	fn metadata_params_default_type_name() {
		let params: MetadataParams = serde_json::from_value(json!({})).unwrap();
		assert_eq!(params.provider_type_name, "password");
	}

	#[test]
	fn update_params_parse_flat_state() {
		let params: UpdateParams = serde_json::from_value(json!({
			"config": { "secret": "example-password", "salt": "example-salt" },
			"prior": {
				"id": "argon2-id",
				"secret": "example-password",
				"salt": "example-salt",
				"algorithm": "argon2id",
				"key_length": 32,
				"parallelism": 1,
				"memory_kib": 64,
				"iterations": 1,
				"hash": "$argon2id$v=19$m=64,t=1,p=1$ZXhhbXBsZS1zYWx0$AAAA"
			}
		}))
		.unwrap();
		assert_eq!(params.prior.id, "argon2-id");
		assert_eq!(params.prior.cost.map(|c| c.memory_kib), Some(64));
		assert!(params.config.cost.is_empty());
	}

	#[test]
	fn lifecycle_result_without_state() {
		let mut diagnostics = Diagnostics::new();
		diagnostics.push(Diagnostic::error("Argon2 error", "boom"));
		let value = serde_json::to_value(LifecycleResult {
			state: None,
			diagnostics,
		})
		.unwrap();
		assert!(value["state"].is_null());
		assert_eq!(value["diagnostics"][0]["summary"], json!("Argon2 error"));
	}
}
