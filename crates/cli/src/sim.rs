//! Simulated OS collaborators that log what a real host would do.

use std::time::Duration;

use async_trait::async_trait;
use vigil_background::{IconHandle, IconResolver, Indicator, NotificationSink, SinkError, WakeLock};
use vigil_lifecycle::{BindError, ProcessHost, ServiceBinder};
use vigil_model::settings::DEFAULT_ICON;

/// Binder acknowledging after a fixed delay, optionally refusing every bind.
#[derive(Debug, Clone, Default)]
pub struct SimBinder {
	pub delay: Duration,
	pub refuse: Option<String>,
}

#[async_trait]
impl ServiceBinder for SimBinder {
	async fn bind(&self) -> Result<(), BindError> {
		if !self.delay.is_zero() {
			tokio::time::sleep(self.delay).await;
		}
		match &self.refuse {
			Some(detail) => {
				tracing::info!(%detail, "sim.bind.refused");
				Err(BindError::new(detail.clone()))
			}
			None => {
				tracing::info!("sim.bind.acknowledged");
				Ok(())
			}
		}
	}

	async fn unbind(&self) {
		tracing::info!("sim.unbind");
	}
}

#[derive(Debug, Default)]
pub struct SimWakeLock;

impl WakeLock for SimWakeLock {
	fn acquire(&mut self, tag: &str) -> Result<(), String> {
		tracing::info!(tag, "sim.wake_lock.acquire");
		Ok(())
	}

	fn release(&mut self) {
		tracing::info!("sim.wake_lock.release");
	}
}

#[derive(Debug, Default)]
pub struct SimNotifications;

impl NotificationSink for SimNotifications {
	fn show(&mut self, indicator: &Indicator) -> Result<(), SinkError> {
		tracing::info!(title = %indicator.title, text = %indicator.text, "sim.indicator.show");
		Ok(())
	}

	fn update(&mut self, indicator: &Indicator) -> Result<(), SinkError> {
		tracing::info!(title = %indicator.title, text = %indicator.text, "sim.indicator.update");
		Ok(())
	}

	fn hide(&mut self, id: i32) -> Result<(), SinkError> {
		tracing::info!(id, "sim.indicator.hide");
		Ok(())
	}
}

/// Knows only the default icon.
#[derive(Debug, Default)]
pub struct SimIcons;

impl IconResolver for SimIcons {
	fn resolve(&self, name: &str) -> Option<IconHandle> {
		(name == DEFAULT_ICON).then_some(IconHandle(1))
	}
}

#[derive(Debug, Default)]
pub struct SimHost;

impl ProcessHost for SimHost {
	fn terminate(&self) {
		tracing::info!("sim.host.terminate");
	}

	fn bring_to_foreground(&self) {
		tracing::info!("sim.host.resume");
	}

	fn clear_lock_screen_flags(&self) {
		tracing::debug!("sim.host.clear_lock_screen");
	}
}
