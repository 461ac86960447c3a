//! Runtime configuration loaded from TOML.
//!
//! ```toml
//! [coordinator]
//! mailbox_capacity = 64
//! event_buffer = 32
//!
//! [defaults]
//! title = "Syncing"
//! silent = false
//! ```
//!
//! Missing tables and keys take their defaults.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use vigil_model::ModeSettings;

use crate::error::ConfigError;

/// Coordinator actor tuning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoordinatorConfig {
	/// Bounded command mailbox size.
	pub mailbox_capacity: usize,
	/// Broadcast buffer for lifecycle event subscribers.
	pub event_buffer: usize,
	/// How long termination waits for an in-flight bind or unbind.
	pub terminate_grace_ms: u64,
}

impl Default for CoordinatorConfig {
	fn default() -> Self {
		Self {
			mailbox_capacity: 64,
			event_buffer: 32,
			terminate_grace_ms: 500,
		}
	}
}

impl CoordinatorConfig {
	pub fn terminate_grace(&self) -> Duration {
		Duration::from_millis(self.terminate_grace_ms)
	}
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
	pub coordinator: CoordinatorConfig,
	/// Initial Mode Configuration, before the calling layer configures one.
	pub defaults: ModeSettings,
}

impl Config {
	/// Parses a TOML string into a [`Config`].
	pub fn parse(input: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Loads configuration from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		let config = Self::parse(&content)?;
		tracing::debug!(path = %path.display(), "lifecycle.config.loaded");
		Ok(config)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.coordinator.mailbox_capacity == 0 {
			return Err(ConfigError::Invalid("coordinator.mailbox_capacity must be greater than 0".into()));
		}
		if self.coordinator.event_buffer == 0 {
			return Err(ConfigError::Invalid("coordinator.event_buffer must be greater than 0".into()));
		}
		if let Some(Err(err)) = self.defaults.rgb() {
			return Err(ConfigError::Invalid(format!("defaults.color: {err}")));
		}
		Ok(())
	}
}
