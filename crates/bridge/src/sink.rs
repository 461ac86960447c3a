//! Event Sink adapters that hand JSON payloads to the calling layer.

use tokio::sync::mpsc;
use vigil_lifecycle::EventSink;
use vigil_model::LifecycleEvent;

/// Serializes an event to its `{event, active, detail}` JSON payload.
pub fn event_json(event: &LifecycleEvent) -> Option<String> {
	match serde_json::to_string(&event.payload()) {
		Ok(json) => Some(json),
		Err(err) => {
			tracing::error!(error = %err, event = event.kind().as_str(), "bridge.event.serialize_failed");
			None
		}
	}
}

/// Calls `F` with each event's JSON payload.
pub struct JsonEventSink<F> {
	deliver: F,
}

impl<F> JsonEventSink<F>
where
	F: Fn(String) + Send + Sync + 'static,
{
	pub fn new(deliver: F) -> Self {
		Self { deliver }
	}
}

impl<F> EventSink for JsonEventSink<F>
where
	F: Fn(String) + Send + Sync + 'static,
{
	fn deliver(&self, event: &LifecycleEvent) {
		if let Some(json) = event_json(event) {
			(self.deliver)(json);
		}
	}
}

/// Forwards each event's JSON payload into an unbounded channel.
///
/// Delivery never blocks the coordinator; payloads sent after the receiver
/// is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
	tx: mpsc::UnboundedSender<String>,
}

impl ChannelEventSink {
	pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
		let (tx, rx) = mpsc::unbounded_channel();
		(Self { tx }, rx)
	}
}

impl EventSink for ChannelEventSink {
	fn deliver(&self, event: &LifecycleEvent) {
		let Some(json) = event_json(event) else {
			return;
		};
		if self.tx.send(json).is_err() {
			tracing::debug!(event = event.kind().as_str(), "bridge.event.receiver_closed");
		}
	}
}
