//! Shared, explicitly owned Mode Configuration.

use std::sync::Arc;

use arc_swap::ArcSwap;
use vigil_model::ModeSettings;

/// Current Mode Configuration, readable from anywhere.
///
/// Clones share one slot. Readers take wait-free snapshots; only the
/// coordinator replaces the value.
#[derive(Debug, Clone)]
pub struct SettingsStore {
	inner: Arc<ArcSwap<ModeSettings>>,
}

impl Default for SettingsStore {
	fn default() -> Self {
		Self::new(ModeSettings::default())
	}
}

impl SettingsStore {
	pub fn new(settings: ModeSettings) -> Self {
		Self {
			inner: Arc::new(ArcSwap::from_pointee(settings)),
		}
	}

	pub fn snapshot(&self) -> Arc<ModeSettings> {
		self.inner.load_full()
	}

	pub(crate) fn replace(&self, settings: ModeSettings) {
		self.inner.store(Arc::new(settings));
	}
}
