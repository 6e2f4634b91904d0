// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Lifecycle controller for the managed hash resource.
//!
//! Each verb takes the desired configuration and/or prior state and returns
//! the record to persist. The controller never mutates its inputs, so on any
//! error the caller still holds the prior state unchanged.
//!
//! Change detection on update:
//! - the secret-determining fields are `secret`, plus `salt` for the
//!   explicit-salt variant
//! - if they match the prior state, the prior `hash` is copied forward and
//!   the engine is not called
//! - otherwise a new hash is computed from the desired values and the
//!   overridden or carried-forward cost parameters

use std::any::Any;

use pwhash_engine::{compute_hash_for, validate_salt, CostParameters, HashAlgorithm};
use pwhash_secret::SecretString;
use tracing::{debug, info, trace};

use crate::error::{ResourceError, Result};
use crate::record::{CostOverrides, ResourceConfig, ResourceState};
use crate::schema::ResourceSchema;
use crate::variant::{host_parallelism, ProviderData};

/// Suffix appended to the provider type name to form the resource type name.
pub const RESOURCE_TYPE_SUFFIX: &str = "_argon2";

/// Opaque provider data handed to [`ResourceController::configure`].
pub trait ProviderPayload: Any + Send + Sync {
	fn as_any(&self) -> &dyn Any;
	fn type_name(&self) -> &'static str;
}

impl<T> ProviderPayload for T
where
	T: Any + Send + Sync,
{
	fn as_any(&self) -> &dyn Any {
		self
	}

	fn type_name(&self) -> &'static str {
		std::any::type_name::<T>()
	}
}

#[derive(Debug, Clone)]
pub struct ResourceController {
	provider: ProviderData,
	host_parallelism: fn() -> u32,
}

impl Default for ResourceController {
	fn default() -> Self {
		Self::new(ProviderData::default())
	}
}

impl ResourceController {
	pub fn new(provider: ProviderData) -> Self {
		Self {
			provider,
			host_parallelism,
		}
	}

	/// Replace the host capability probe used for the parallelism default.
	pub fn with_host_parallelism(mut self, probe: fn() -> u32) -> Self {
		self.host_parallelism = probe;
		self
	}

	pub fn provider_data(&self) -> &ProviderData {
		&self.provider
	}

	pub fn metadata(&self, provider_type_name: &str) -> String {
		format!("{provider_type_name}{RESOURCE_TYPE_SUFFIX}")
	}

	pub fn schema(&self) -> ResourceSchema {
		ResourceSchema::for_variant(self.provider.variant)
	}

	/// Accept provider-wide settings.
	///
	/// `None` means the provider has not been configured yet; the current
	/// settings stay in place. Data of any other type is rejected and leaves
	/// the controller untouched.
	pub fn configure(&mut self, data: Option<&dyn ProviderPayload>) -> Result<()> {
		let Some(data) = data else {
			trace!("configure called without provider data");
			return Ok(());
		};

		let provider = data
			.as_any()
			.downcast_ref::<ProviderData>()
			.ok_or(ResourceError::ConfigurationTypeMismatch {
				expected: std::any::type_name::<ProviderData>(),
				found: data.type_name(),
			})?;

		debug!(
			variant = %provider.variant,
			algorithm = %provider.algorithm,
			"resource configured"
		);
		self.provider = provider.clone();
		Ok(())
	}

	pub fn create(&self, config: &ResourceConfig) -> Result<ResourceState> {
		self.check_attributes(config)?;

		let algorithm = config.algorithm.unwrap_or(self.provider.algorithm);
		let cost = self.resolve_cost(config.cost, None)?;
		let hash = self.digest(config, algorithm, &cost)?;
		let id = self.provider.identifier.assign();

		info!(%id, %algorithm, %cost, variant = %self.provider.variant, "created managed hash");

		Ok(ResourceState {
			id,
			secret: Some(config.secret.clone()),
			salt: config.salt.clone(),
			algorithm: Some(algorithm),
			cost: Some(cost),
			hash: Some(hash),
		})
	}

	/// Refresh. There is no upstream to reconcile with, so the prior state is
	/// returned as is.
	pub fn read(&self, state: ResourceState) -> ResourceState {
		trace!(id = %state.id, "read resource");
		state
	}

	pub fn update(&self, config: &ResourceConfig, prior: &ResourceState) -> Result<ResourceState> {
		self.check_attributes(config)?;

		let algorithm = config
			.algorithm
			.or(prior.algorithm)
			.unwrap_or(self.provider.algorithm);
		let cost = self.resolve_cost(config.cost, prior.cost)?;

		let hash = match &prior.hash {
			Some(hash) if !self.secret_changed(config, prior) => {
				if prior.cost != Some(cost) || prior.algorithm != Some(algorithm) {
					info!(
						id = %prior.id,
						%cost,
						%algorithm,
						"hash settings changed without a secret change, keeping existing hash"
					);
				} else {
					debug!(id = %prior.id, "secret unchanged, keeping existing hash");
				}
				hash.clone()
			}
			_ => {
				info!(id = %prior.id, %algorithm, %cost, "secret changed, computing new hash");
				self.digest(config, algorithm, &cost)?
			}
		};

		Ok(ResourceState {
			id: prior.id.clone(),
			secret: Some(config.secret.clone()),
			salt: config.salt.clone(),
			algorithm: Some(algorithm),
			cost: Some(cost),
			hash: Some(hash),
		})
	}

	/// Discard the record. Dropping it zeroizes the sensitive fields.
	pub fn delete(&self, state: ResourceState) {
		debug!(id = %state.id, "deleted resource");
	}

	/// Start tracking an existing record under `id`. Every other attribute is
	/// filled in by the following read and update.
	pub fn import_state(&self, id: &str) -> Result<ResourceState> {
		if id.is_empty() {
			return Err(ResourceError::MissingAttribute("id"));
		}
		info!(%id, "imported resource");
		Ok(ResourceState::imported(id))
	}

	fn secret_changed(&self, config: &ResourceConfig, prior: &ResourceState) -> bool {
		if prior.secret.as_ref() != Some(&config.secret) {
			return true;
		}
		self.provider.variant.salt_is_secret_determining() && prior.salt != config.salt
	}

	fn check_attributes(&self, config: &ResourceConfig) -> Result<()> {
		if config.secret.is_empty() {
			return Err(ResourceError::MissingAttribute("secret"));
		}

		match (&config.salt, self.provider.variant.salt_is_operator_supplied()) {
			(None, true) => Err(ResourceError::MissingAttribute("salt")),
			(Some(salt), true) if salt.is_empty() => Err(ResourceError::MissingAttribute("salt")),
			(Some(salt), true) => Ok(validate_salt(salt.expose_str())?),
			(Some(_), false) => Err(ResourceError::UnexpectedAttribute("salt")),
			(None, false) => Ok(()),
		}
	}

	/// Desired overrides, then prior state, then provider defaults, then
	/// variant defaults.
	fn resolve_cost(
		&self,
		desired: CostOverrides,
		prior: Option<CostParameters>,
	) -> Result<CostParameters> {
		let layered = desired
			.or(prior.map(CostOverrides::from).unwrap_or_default())
			.or(self.provider.cost_defaults);
		let cost = layered.resolve(self.provider.variant.default_cost(self.host_parallelism));
		cost.validate()?;
		Ok(cost)
	}

	fn digest(
		&self,
		config: &ResourceConfig,
		algorithm: HashAlgorithm,
		cost: &CostParameters,
	) -> Result<SecretString> {
		let salt = config.salt.as_ref().map(SecretString::expose_str);
		let digest = compute_hash_for(algorithm, config.secret.expose_str(), salt, cost)?;
		Ok(digest.into_secret())
	}
}
