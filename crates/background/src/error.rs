//! Error types for the background worker.

use thiserror::Error;

/// Errors from the wake resource holder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
	/// Acquire was requested while the resource is already held.
	#[error("wake resource is already held")]
	AlreadyHeld,

	/// The OS refused to hand out the resource.
	#[error("failed to acquire wake resource: {0}")]
	Acquire(String),
}

/// The notification sink could not be reached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("notification sink unavailable: {0}")]
pub struct SinkError(pub String);

/// Errors from live worker commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkerError {
	/// The worker has not been activated.
	#[error("background worker is not active")]
	NotActive,
}
