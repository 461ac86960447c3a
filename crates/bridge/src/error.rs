//! Error types for calling-layer dispatch.

use thiserror::Error;
use vigil_lifecycle::CoordinatorError;

/// Errors returned to the calling layer.
///
/// Display strings are the messages the calling layer shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
	/// The action name is not one the bridge dispatches.
	#[error("Invalid action: {0}")]
	InvalidAction(String),

	/// The coordinator rejected the request.
	#[error(transparent)]
	Coordinator(#[from] CoordinatorError),
}

/// Result type for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;
