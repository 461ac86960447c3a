//! Error types for the lifecycle coordinator.

use std::path::PathBuf;

use thiserror::Error;
use vigil_model::SettingsError;

/// The OS refused or failed to establish the worker binding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{detail}")]
pub struct BindError {
	detail: String,
}

impl BindError {
	pub fn new(detail: impl Into<String>) -> Self {
		Self { detail: detail.into() }
	}

	pub fn detail(&self) -> &str {
		&self.detail
	}
}

/// Errors reported synchronously to callers of the coordinator.
///
/// Display strings are the messages the calling layer shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinatorError {
	/// A live update was requested while the worker is not bound.
	#[error("Service is not bound.")]
	NotRunning,

	/// The update payload was malformed.
	#[error("Invalid parameters.")]
	InvalidParameters(#[source] SettingsError),

	/// The coordinator actor has stopped.
	#[error("coordinator is not running")]
	Closed,
}

/// Result type for coordinator operations.
pub type Result<T> = std::result::Result<T, CoordinatorError>;

/// Errors loading the runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing TOML syntax or values.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// A value is syntactically valid but unusable.
	#[error("invalid configuration: {0}")]
	Invalid(String),
}
