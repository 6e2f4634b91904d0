// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Method dispatch. Every verb is listed in the match table of [`dispatch`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use pwhash_config::{ProviderConfig, ProviderConfigLayer};
use pwhash_resource::{
	Diagnostics, ResourceController, ResourceError, ResourceState, Result as ResourceResult,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{RwLock, Semaphore};
use tracing::{debug, info, warn};

use crate::protocol::*;

/// Shared provider state.
pub struct ProviderState {
	base_config: ProviderConfig,
	controller: RwLock<ResourceController>,
	hash_permits: Arc<Semaphore>,
	hash_timeout: Option<Duration>,
}

impl ProviderState {
	pub fn new(config: ProviderConfig) -> ResourceResult<Self> {
		let mut controller = ResourceController::default();
		controller.configure(Some(&config.provider_data()))?;

		Ok(Self {
			hash_permits: Arc::new(Semaphore::new(config.runtime.max_concurrent_hashes.max(1))),
			hash_timeout: config.runtime.hash_timeout(),
			controller: RwLock::new(controller),
			base_config: config,
		})
	}

	async fn controller(&self) -> ResourceController {
		self.controller.read().await.clone()
	}

	/// Run a hashing call on the blocking pool, bounded by the permit pool
	/// and the optional timeout. The permit is held until the computation
	/// returns, even if the caller gave up on it.
	async fn run_hashing<T, F>(&self, work: F) -> Result<T, RpcError>
	where
		F: FnOnce() -> T + Send + 'static,
		T: Send + 'static,
	{
		let permit = self
			.hash_permits
			.clone()
			.acquire_owned()
			.await
			.map_err(|e| RpcError::new(INTERNAL_ERROR, format!("hash pool closed: {e}")))?;

		let task = tokio::task::spawn_blocking(move || {
			let _permit = permit;
			work()
		});

		let joined = match self.hash_timeout {
			Some(limit) => tokio::time::timeout(limit, task).await.map_err(|_| {
				warn!(timeout_secs = limit.as_secs(), "hash computation timed out");
				RpcError::new(
					TIMEOUT,
					format!("hash computation exceeded {}s", limit.as_secs()),
				)
			})?,
			None => task.await,
		};

		joined.map_err(|e| RpcError::new(INTERNAL_ERROR, format!("hash task failed: {e}")))
	}
}

/// Dispatch a request to the appropriate handler
pub async fn dispatch(request: &Request, state: Arc<ProviderState>) -> String {
	let start = Instant::now();
	let method = request.method.as_str();
	let id = request.id;

	debug!(id, method, "dispatch start");

	let outcome = match method {
		METHOD_METADATA => handle_metadata(request, &state).await,
		METHOD_SCHEMA => handle_schema(&state).await,
		METHOD_CONFIGURE => handle_configure(request, &state).await,
		METHOD_CREATE => handle_create(request, &state).await,
		METHOD_READ => handle_read(request, &state).await,
		METHOD_UPDATE => handle_update(request, &state).await,
		METHOD_DELETE => handle_delete(request, &state).await,
		METHOD_IMPORT_STATE => handle_import_state(request, &state).await,
		_ => {
			warn!(id, method, "unknown method");
			Err(RpcError::new(
				UNKNOWN_METHOD,
				format!("Unknown method: {method}"),
			))
		}
	};

	let elapsed = start.elapsed();
	match outcome {
		Ok(result) => {
			debug!(id, method, ?elapsed, "dispatch ok");
			encode(id, &SuccessResponse { id, result })
		}
		Err(error) => {
			info!(id, method, code = error.code, ?elapsed, "dispatch error");
			encode(id, &ErrorResponse { id, error })
		}
	}
}

type HandlerResult = Result<serde_json::Value, RpcError>;

fn params<T: DeserializeOwned>(request: &Request) -> Result<T, RpcError> {
	serde_json::from_value(request.params.clone())
		.map_err(|e| RpcError::new(INVALID_PARAMS, format!("Invalid params: {e}")))
}

fn result<T: Serialize>(value: T) -> HandlerResult {
	serde_json::to_value(value)
		.map_err(|e| RpcError::new(INTERNAL_ERROR, format!("failed to encode result: {e}")))
}

fn lifecycle(outcome: ResourceResult<ResourceState>, diagnostics: Diagnostics) -> HandlerResult {
	let mut diagnostics = diagnostics;
	let state = match outcome {
		Ok(state) => Some(state),
		Err(err) => {
			diagnostics.push(err.to_diagnostic());
			None
		}
	};
	result(LifecycleResult { state, diagnostics })
}

async fn handle_metadata(request: &Request, state: &ProviderState) -> HandlerResult {
	let params: MetadataParams = if request.params.is_null() {
		MetadataParams {
			provider_type_name: DEFAULT_PROVIDER_TYPE_NAME.to_string(),
		}
	} else {
		params(request)?
	};
	let type_name = state.controller().await.metadata(&params.provider_type_name);
	result(MetadataResult { type_name })
}

async fn handle_schema(state: &ProviderState) -> HandlerResult {
	let schema = state.controller().await.schema();
	result(SchemaResult { schema })
}

/// Layer the request over the loaded configuration and reconfigure. A null
/// payload leaves the controller as it is.
async fn handle_configure(request: &Request, state: &ProviderState) -> HandlerResult {
	if request.params.is_null() {
		state.controller.write().await.configure(None).map_err(configure_error)?;
		return result(LifecycleResult {
			state: None,
			diagnostics: Diagnostics::new(),
		});
	}

	let overrides: ConfigureParams = params(request)?;
	let mut layer = ProviderConfigLayer::default();
	layer.merge(base_layer(&state.base_config));
	layer.merge(overrides);
	let config = pwhash_config::finalize(layer)
		.map_err(|e| RpcError::new(INVALID_PARAMS, e.to_string()))?;

	let data = config.provider_data();
	state
		.controller
		.write()
		.await
		.configure(Some(&data))
		.map_err(configure_error)?;

	info!(variant = %data.variant, algorithm = %data.algorithm, "provider reconfigured");
	result(LifecycleResult {
		state: None,
		diagnostics: Diagnostics::new(),
	})
}

fn configure_error(err: ResourceError) -> RpcError {
	RpcError::new(INTERNAL_ERROR, err.to_string())
}

/// Express a resolved configuration as a layer so request overrides can be
/// merged over it field by field.
fn base_layer(config: &ProviderConfig) -> ProviderConfigLayer {
	use pwhash_config::{
		CostConfigLayer, LoggingConfigLayer, ResourceConfigLayer, RuntimeConfigLayer, VariantKind,
	};
	use pwhash_resource::{IdentifierStrategy, Variant};

	let (variant, profile) = match config.resource.variant {
		Variant::GeneratedSalt { profile } => (VariantKind::GeneratedSalt, Some(profile)),
		Variant::ExplicitSalt => (VariantKind::ExplicitSalt, None),
	};
	let identifier = match &config.resource.identifier {
		IdentifierStrategy::Static(value) => format!("static:{value}"),
		IdentifierStrategy::Random => "random".to_string(),
	};

	ProviderConfigLayer {
		resource: Some(ResourceConfigLayer {
			variant: Some(variant),
			profile,
			algorithm: Some(config.resource.algorithm),
			identifier: Some(identifier),
		}),
		cost: Some(CostConfigLayer {
			key_length: config.cost.key_length,
			iterations: config.cost.iterations,
			memory_kib: config.cost.memory_kib,
			parallelism: config.cost.parallelism,
		}),
		runtime: Some(RuntimeConfigLayer {
			max_concurrent_hashes: Some(config.runtime.max_concurrent_hashes),
			hash_timeout_secs: config.runtime.hash_timeout_secs,
		}),
		logging: Some(LoggingConfigLayer {
			level: Some(config.logging.level.clone()),
			format: Some(config.logging.format),
		}),
	}
}

async fn handle_create(request: &Request, state: &ProviderState) -> HandlerResult {
	let params: CreateParams = params(request)?;
	let controller = state.controller().await;
	let outcome = state
		.run_hashing(move || controller.create(&params.config))
		.await?;
	lifecycle(outcome, Diagnostics::new())
}

async fn handle_read(request: &Request, state: &ProviderState) -> HandlerResult {
	let params: StateParams = params(request)?;
	let refreshed = state.controller().await.read(params.state);
	lifecycle(Ok(refreshed), Diagnostics::new())
}

async fn handle_update(request: &Request, state: &ProviderState) -> HandlerResult {
	let params: UpdateParams = params(request)?;
	let controller = state.controller().await;
	let prior_cost = params.prior.cost;
	let prior_algorithm = params.prior.algorithm;
	let prior_hash = params.prior.hash.clone();

	let outcome = state
		.run_hashing(move || controller.update(&params.config, &params.prior))
		.await?;

	let mut diagnostics = Diagnostics::new();
	if let Ok(next) = &outcome {
		let parameters_changed = next.cost != prior_cost || next.algorithm != prior_algorithm;
		if prior_hash.is_some() && next.hash == prior_hash && parameters_changed {
			diagnostics.add_warning(
				"Hash parameters recorded but not applied",
				"The stored hash was kept because the secret did not change. \
				 The new algorithm and cost parameters take effect the next time the secret changes.",
			);
		}
	}
	lifecycle(outcome, diagnostics)
}

async fn handle_delete(request: &Request, state: &ProviderState) -> HandlerResult {
	let params: StateParams = params(request)?;
	state.controller().await.delete(params.state);
	result(LifecycleResult {
		state: None,
		diagnostics: Diagnostics::new(),
	})
}

async fn handle_import_state(request: &Request, state: &ProviderState) -> HandlerResult {
	let params: ImportStateParams = params(request)?;
	let outcome = state.controller().await.import_state(&params.id);
	lifecycle(outcome, Diagnostics::new())
}
