//! Lifecycle events and their wire payload.

use serde::{Deserialize, Serialize};

/// Lifecycle notification emitted by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
	/// The worker is bound and holding its resources.
	Activate,
	/// The worker was released.
	Deactivate,
	/// Binding or activation failed, or the worker connection dropped.
	Failure(String),
}

/// Event name as delivered to the calling layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
	Activate,
	Deactivate,
	Failure,
}

impl EventKind {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Activate => "activate",
			Self::Deactivate => "deactivate",
			Self::Failure => "failure",
		}
	}
}

impl LifecycleEvent {
	pub fn failure(detail: impl Into<String>) -> Self {
		Self::Failure(detail.into())
	}

	pub const fn kind(&self) -> EventKind {
		match self {
			Self::Activate => EventKind::Activate,
			Self::Deactivate => EventKind::Deactivate,
			Self::Failure(_) => EventKind::Failure,
		}
	}

	/// True only for [`LifecycleEvent::Activate`].
	pub const fn is_active(&self) -> bool {
		matches!(self, Self::Activate)
	}

	pub fn detail(&self) -> Option<&str> {
		match self {
			Self::Failure(detail) => Some(detail),
			_ => None,
		}
	}

	pub fn payload(&self) -> EventPayload {
		EventPayload {
			event: self.kind(),
			active: self.is_active(),
			detail: self.detail().map(str::to_string),
		}
	}
}

/// Serialized shape handed to event sinks: `{ event, active, detail }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPayload {
	pub event: EventKind,
	pub active: bool,
	pub detail: Option<String>,
}

impl From<&LifecycleEvent> for EventPayload {
	fn from(event: &LifecycleEvent) -> Self {
		event.payload()
	}
}
