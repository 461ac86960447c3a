//! Error types for settings payloads.

use thiserror::Error;

/// Errors produced while interpreting settings supplied by the calling layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
	/// The payload was not a JSON object.
	#[error("expected a settings object, found {0}")]
	NotAnObject(&'static str),

	/// A recognized option carried a value of the wrong type.
	#[error("malformed settings: {0}")]
	Malformed(String),

	/// A colour value could not be parsed.
	#[error("invalid color {0:?} (expected RRGGBB or #RRGGBB)")]
	InvalidColor(String),
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
	match value {
		serde_json::Value::Null => "null",
		serde_json::Value::Bool(_) => "boolean",
		serde_json::Value::Number(_) => "number",
		serde_json::Value::String(_) => "string",
		serde_json::Value::Array(_) => "array",
		serde_json::Value::Object(_) => "object",
	}
}
