// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod cost;
mod logging;
mod resource;
mod runtime;

pub use cost::CostConfigLayer;
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use resource::{parse_identifier, ResourceConfigLayer, ResourceSettings, VariantKind};
pub use runtime::{RuntimeConfig, RuntimeConfigLayer};
