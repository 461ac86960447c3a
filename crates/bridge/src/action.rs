//! Named action dispatch.
//!
//! The calling layer invokes actions by name with a JSON argument array:
//!
//! | action                      | arguments                  | success reply            |
//! |-----------------------------|----------------------------|--------------------------|
//! | `configure`                 | `[settings, isLiveUpdate]` | empty                    |
//! | `enable`                    | `[]`                       | empty                    |
//! | `disable`                   | `[]`                       | empty                    |
//! | `updateNotificationContent` | `[{title, text}]`          | `"Notification updated."` |

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use vigil_lifecycle::{CoordinatorError, CoordinatorHandle};
use vigil_model::ModeSettings;

use crate::error::{BridgeError, Result};

/// Success message of `updateNotificationContent`.
pub const CONTENT_UPDATED: &str = "Notification updated.";

/// Actions the calling layer may invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
	Configure,
	Enable,
	Disable,
	UpdateNotificationContent,
}

impl Action {
	pub const ALL: [Self; 4] = [Self::Configure, Self::Enable, Self::Disable, Self::UpdateNotificationContent];

	pub const fn name(self) -> &'static str {
		match self {
			Self::Configure => "configure",
			Self::Enable => "enable",
			Self::Disable => "disable",
			Self::UpdateNotificationContent => "updateNotificationContent",
		}
	}
}

impl FromStr for Action {
	type Err = BridgeError;

	fn from_str(s: &str) -> Result<Self> {
		Self::ALL.into_iter().find(|action| action.name() == s).ok_or_else(|| BridgeError::InvalidAction(s.to_string()))
	}
}

impl fmt::Display for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Successful action outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
	Ok,
	Message(&'static str),
}

impl Reply {
	pub fn message(&self) -> Option<&str> {
		match self {
			Self::Ok => None,
			Self::Message(message) => Some(message),
		}
	}
}

/// Dispatches calling-layer actions to a coordinator.
#[derive(Debug, Clone)]
pub struct Bridge {
	handle: CoordinatorHandle,
}

impl Bridge {
	pub fn new(handle: CoordinatorHandle) -> Self {
		Self { handle }
	}

	pub fn handle(&self) -> &CoordinatorHandle {
		&self.handle
	}

	/// Runs `action` with its JSON argument array.
	pub async fn execute(&self, action: &str, args: &Value) -> Result<Reply> {
		let action = match action.parse::<Action>() {
			Ok(action) => action,
			Err(err) => {
				tracing::warn!(action, "bridge.action.invalid");
				return Err(err);
			}
		};
		tracing::debug!(%action, "bridge.action");
		self.dispatch(action, args).await
	}

	pub async fn dispatch(&self, action: Action, args: &Value) -> Result<Reply> {
		match action {
			Action::Configure => {
				let settings = match args.get(0) {
					None | Some(Value::Null) => ModeSettings::default(),
					Some(value) => ModeSettings::from_value(value).map_err(CoordinatorError::InvalidParameters)?,
				};
				let live = args.get(1).and_then(Value::as_bool).unwrap_or(false);
				self.handle.configure(settings, live).await?;
				Ok(Reply::Ok)
			}
			Action::Enable => {
				self.handle.enable().await?;
				Ok(Reply::Ok)
			}
			Action::Disable => {
				self.handle.disable().await?;
				Ok(Reply::Ok)
			}
			Action::UpdateNotificationContent => {
				let missing = Value::Null;
				let payload = args.get(0).unwrap_or(&missing);
				self.handle.update_notification_payload(payload).await?;
				Ok(Reply::Message(CONTENT_UPDATED))
			}
		}
	}
}
