// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Structured diagnostics returned to the declarative engine.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
	Error,
	Warning,
}

/// A `(severity, summary, detail)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
	pub severity: Severity,
	pub summary: String,
	pub detail: String,
}

impl Diagnostic {
	pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
		Self {
			severity: Severity::Error,
			summary: summary.into(),
			detail: detail.into(),
		}
	}

	pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
		Self {
			severity: Severity::Warning,
			summary: summary.into(),
			detail: detail.into(),
		}
	}
}

/// Ordered collection of diagnostics for one lifecycle call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, diagnostic: Diagnostic) {
		self.0.push(diagnostic);
	}

	pub fn add_error(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
		self.push(Diagnostic::error(summary, detail));
	}

	pub fn add_warning(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
		self.push(Diagnostic::warning(summary, detail));
	}

	pub fn has_error(&self) -> bool {
		self.0.iter().any(|d| d.severity == Severity::Error)
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
		self.0.iter()
	}
}

impl From<Diagnostic> for Diagnostics {
	fn from(diagnostic: Diagnostic) -> Self {
		Self(vec![diagnostic])
	}
}
