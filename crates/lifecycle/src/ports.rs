//! Ports to the collaborators the coordinator drives but does not implement.

use async_trait::async_trait;
use vigil_model::LifecycleEvent;

use crate::error::BindError;

/// OS service registration for the elevated-priority worker.
///
/// `bind` resolves when the OS acknowledges the binding, which may be long
/// after the call. The coordinator keeps serving commands meanwhile.
#[async_trait]
pub trait ServiceBinder: Send + Sync + 'static {
	async fn bind(&self) -> Result<(), BindError>;

	async fn unbind(&self);
}

/// Ordered, one-way delivery of lifecycle events to the calling layer.
pub trait EventSink: Send + Sync + 'static {
	fn deliver(&self, event: &LifecycleEvent);
}

/// Control over the hosting application process.
pub trait ProcessHost: Send + Sync + 'static {
	/// Ends the hosting process. Called once, after best-effort worker shutdown.
	fn terminate(&self);

	/// Brings the application UI back to the foreground.
	fn bring_to_foreground(&self) {}

	/// Clears lock-screen/keyguard window flags set while in the foreground.
	fn clear_lock_screen_flags(&self) {}
}

/// Host that only logs; used when none is supplied.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedHost;

impl ProcessHost for DetachedHost {
	fn terminate(&self) {
		tracing::warn!("lifecycle.host.terminate_ignored");
	}
}
