// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod cli;
mod connection;
mod handlers;
mod protocol;

use std::sync::Arc;

use clap::Parser;
use pwhash_config::{LogFormat, ProviderConfig};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::Args;
use handlers::ProviderState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	let config = match &args.config {
		Some(path) => pwhash_config::load_config_with_file(path)?,
		None => pwhash_config::load_config()?,
	};

	init_tracing(&args, &config);

	info!(
		variant = %config.resource.variant,
		algorithm = %config.resource.algorithm,
		max_concurrent_hashes = config.runtime.max_concurrent_hashes,
		"starting pwhash-provider"
	);

	let state = Arc::new(ProviderState::new(config)?);

	connection::serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout(), state).await?;

	info!("pwhash-provider stopped");
	Ok(())
}

/// Logs go to stderr; stdout carries protocol responses only.
fn init_tracing(args: &Args, config: &ProviderConfig) {
	let level = args
		.log_level
		.clone()
		.unwrap_or_else(|| config.logging.level.clone());
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

	match config.logging.format {
		LogFormat::Json => tracing_subscriber::registry()
			.with(filter)
			.with(fmt::layer().json().with_writer(std::io::stderr))
			.init(),
		LogFormat::Pretty => tracing_subscriber::registry()
			.with(filter)
			.with(fmt::layer().with_writer(std::io::stderr))
			.init(),
	}
}
