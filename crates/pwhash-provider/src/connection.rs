// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::io;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::handlers::{self, ProviderState};
use crate::protocol::{encode, ErrorResponse, Request, INVALID_PARAMS};

/// Serve line-delimited requests until the reader hits EOF.
///
/// Requests run concurrently; responses are written as they complete and
/// carry the request id for correlation. Returns once every in-flight
/// request has been answered.
pub async fn serve<R, W>(reader: R, mut writer: W, state: Arc<ProviderState>) -> io::Result<()>
where
	R: AsyncBufRead + Unpin,
	W: AsyncWrite + Unpin,
{
	let (tx, mut rx) = mpsc::unbounded_channel::<String>();
	let mut lines = reader.lines();

	loop {
		tokio::select! {
			line = lines.next_line() => {
				let Some(line) = line? else {
					break;
				};
				let trimmed = line.trim();
				if trimmed.is_empty() {
					continue;
				}

				let request = trimmed.to_string();
				let state = state.clone();
				let tx = tx.clone();
				tokio::spawn(async move {
					let response = process_request(&request, state).await;
					// receiver only goes away when serve has already failed
					let _ = tx.send(response);
				});
			}

			Some(response) = rx.recv() => {
				write_line(&mut writer, &response).await?;
			}
		}
	}

	info!("input closed, draining in-flight requests");
	drop(tx);
	while let Some(response) = rx.recv().await {
		write_line(&mut writer, &response).await?;
	}

	Ok(())
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> io::Result<()> {
	writer.write_all(line.as_bytes()).await?;
	writer.write_all(b"\n").await?;
	writer.flush().await
}

/// Process a single request and return the JSON response line
async fn process_request(line: &str, state: Arc<ProviderState>) -> String {
	match serde_json::from_str::<Request>(line) {
		Ok(request) => handlers::dispatch(&request, state).await,
		Err(e) => {
			debug!(error = %e, "malformed request line");
			encode(0, &ErrorResponse::new(0, INVALID_PARAMS, format!("Invalid JSON: {e}")))
		}
	}
}
