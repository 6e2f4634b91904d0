// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Managed Argon2 secret hash resource.
//!
//! [`ResourceController`] turns a desired [`ResourceConfig`] and a prior
//! [`ResourceState`] into the next state, calling the hash engine only when a
//! secret-determining attribute changed. Failures surface as
//! [`ResourceError`], which converts into a redaction-safe [`Diagnostic`].

pub mod controller;
pub mod diagnostics;
pub mod error;
pub mod record;
pub mod schema;
pub mod variant;

pub use controller::{ProviderPayload, ResourceController, RESOURCE_TYPE_SUFFIX};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{ResourceError, Result};
pub use record::{CostOverrides, ResourceConfig, ResourceState};
pub use schema::{AttributeKind, AttributeSchema, ResourceSchema};
pub use variant::{host_parallelism, IdentifierStrategy, ProviderData, Variant, STATIC_IDENTIFIER};
