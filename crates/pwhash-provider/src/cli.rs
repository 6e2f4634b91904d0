// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use clap::Parser;

/// pwhash provider - serves managed Argon2 hash lifecycle calls over stdio
#[derive(Parser, Debug)]
#[command(name = "pwhash-provider", version)]
pub struct Args {
	/// Config file (defaults to /etc/pwhash/provider.toml)
	#[arg(long, env = "PWHASH_CONFIG")]
	pub config: Option<PathBuf>,

	/// Log filter, overrides the configured level (RUST_LOG still wins)
	#[arg(long)]
	pub log_level: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_flags() {
		let args = Args::parse_from([
			"pwhash-provider",
			"--config",
			"/tmp/provider.toml",
			"--log-level",
			"debug",
		]);
		assert_eq!(args.config, Some(PathBuf::from("/tmp/provider.toml")));
		assert_eq!(args.log_level.as_deref(), Some("debug"));
	}

	#[test]
	fn flags_are_optional() {
		let args = Args::try_parse_from(["pwhash-provider"]).unwrap();
		assert!(args.log_level.is_none());
	}
}
