//! The long-lived elevated-priority worker.

use std::sync::Arc;

use vigil_model::{ContentUpdate, ModeSettings};

use crate::error::{ResourceError, WorkerError};
use crate::indicator::{INDICATOR_ID, IconResolver, Indicator, IndicatorDefaults, NotificationSink};
use crate::resource::ResourceHolder;

/// Background worker holding the wake resource and the persistent indicator.
///
/// Active between [`activate`](Self::activate) and [`deactivate`](Self::deactivate).
/// Sink failures never change the activation state; they are logged and the
/// worker keeps running.
pub struct BackgroundWorker {
	resource: ResourceHolder,
	sink: Box<dyn NotificationSink>,
	icons: Arc<dyn IconResolver>,
	defaults: IndicatorDefaults,
	/// Settings in effect while active, including live content updates.
	live: Option<ModeSettings>,
	indicator_visible: bool,
}

impl BackgroundWorker {
	pub fn new(resource: ResourceHolder, sink: impl NotificationSink + 'static, icons: Arc<dyn IconResolver>) -> Self {
		Self {
			resource,
			sink: Box::new(sink),
			icons,
			defaults: IndicatorDefaults::default(),
			live: None,
			indicator_visible: false,
		}
	}

	/// Overrides the title/text used when settings carry none.
	#[must_use]
	pub fn with_defaults(mut self, defaults: IndicatorDefaults) -> Self {
		self.defaults = defaults;
		self
	}

	pub fn is_active(&self) -> bool {
		self.live.is_some()
	}

	pub fn holds_resource(&self) -> bool {
		self.resource.is_held()
	}

	pub fn indicator_visible(&self) -> bool {
		self.indicator_visible
	}

	/// Settings in effect while active.
	pub fn settings(&self) -> Option<&ModeSettings> {
		self.live.as_ref()
	}

	/// Acquires the wake resource and, unless silent, shows the indicator.
	///
	/// Only resource acquisition can fail; the worker stays inactive then.
	pub fn activate(&mut self, settings: &ModeSettings) -> Result<(), ResourceError> {
		self.resource.acquire()?;
		self.live = Some(settings.clone());
		if !settings.silent {
			let indicator = self.indicator(settings);
			self.show(&indicator);
		}
		tracing::debug!(silent = settings.silent, "background.worker.activated");
		Ok(())
	}

	/// Hides the indicator and releases the resource.
	///
	/// Runs unconditionally, also after a partial activation.
	pub fn deactivate(&mut self) {
		if let Err(err) = self.sink.hide(INDICATOR_ID) {
			tracing::warn!(error = %err, "background.worker.hide_failed");
		}
		self.indicator_visible = false;
		self.resource.release();
		self.live = None;
		tracing::debug!("background.worker.deactivated");
	}

	/// Replaces indicator title/text, keeping every other display option.
	pub fn update_content(&mut self, update: &ContentUpdate) -> Result<(), WorkerError> {
		let Some(live) = &self.live else {
			return Err(WorkerError::NotActive);
		};
		let next = live.with_content(update);
		self.apply(next);
		Ok(())
	}

	/// Replaces the live settings, toggling indicator visibility on `silent` changes.
	pub fn update_settings(&mut self, settings: ModeSettings) -> Result<(), WorkerError> {
		if self.live.is_none() {
			return Err(WorkerError::NotActive);
		}
		self.apply(settings);
		Ok(())
	}

	/// Handles a tap on the indicator; returns whether the application should resume.
	pub fn click(&self) -> bool {
		let resume = self.live.as_ref().is_some_and(|s| s.resume);
		tracing::debug!(resume, "background.worker.indicator_clicked");
		resume
	}

	fn apply(&mut self, settings: ModeSettings) {
		match (settings.silent, self.indicator_visible) {
			(true, true) => {
				if let Err(err) = self.sink.hide(INDICATOR_ID) {
					tracing::warn!(error = %err, "background.worker.hide_failed");
				}
				self.indicator_visible = false;
			}
			(true, false) => {}
			(false, true) => {
				let indicator = self.indicator(&settings);
				if let Err(err) = self.sink.update(&indicator) {
					tracing::warn!(error = %err, "background.worker.update_failed");
				}
			}
			(false, false) => {
				let indicator = self.indicator(&settings);
				self.show(&indicator);
			}
		}
		self.live = Some(settings);
	}

	fn show(&mut self, indicator: &Indicator) {
		match self.sink.show(indicator) {
			Ok(()) => self.indicator_visible = true,
			Err(err) => tracing::warn!(error = %err, "background.worker.show_failed"),
		}
	}

	fn indicator(&self, settings: &ModeSettings) -> Indicator {
		self.defaults.build(settings, self.icons.as_ref())
	}
}

impl std::fmt::Debug for BackgroundWorker {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BackgroundWorker")
			.field("resource", &self.resource)
			.field("active", &self.live.is_some())
			.field("indicator_visible", &self.indicator_visible)
			.finish_non_exhaustive()
	}
}
