//! Persistent indicator payloads and the ports used to render them.

use vigil_model::settings::{DEFAULT_ICON, DEFAULT_TEXT, DEFAULT_TITLE};
use vigil_model::{ModeSettings, Rgb};

use crate::error::SinkError;

/// Stable id of the worker's indicator; updates replace it in place.
pub const INDICATOR_ID: i32 = -574_543_954;

/// Low-importance channel the indicator is posted to.
pub const INDICATOR_CHANNEL: IndicatorChannel = IndicatorChannel {
	id: "vigil-background-mode",
	name: "Background mode",
	description: "Shown while the application keeps running in the background",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorChannel {
	pub id: &'static str,
	pub name: &'static str,
	pub description: &'static str,
}

/// Opaque host resource handle for an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IconHandle(pub u32);

/// What happens when the user taps the indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentAction {
	/// Deliver the click to the worker only.
	Open,
	/// Bring the application back to the foreground.
	Resume,
}

/// Fully resolved indicator payload handed to a [`NotificationSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
	pub id: i32,
	pub channel: IndicatorChannel,
	pub title: String,
	pub text: String,
	/// `None` when neither the configured nor the default icon resolved.
	pub icon: Option<IconHandle>,
	pub color: Option<Rgb>,
	pub big_text: bool,
	/// Content is redacted on the lock screen.
	pub hidden: bool,
	pub ongoing: bool,
	pub action: ContentAction,
}

/// Resolves icon resource names to host handles.
pub trait IconResolver: Send + Sync {
	fn resolve(&self, name: &str) -> Option<IconHandle>;
}

/// Displays, updates and cancels the persistent indicator.
pub trait NotificationSink: Send {
	fn show(&mut self, indicator: &Indicator) -> Result<(), SinkError>;

	fn update(&mut self, indicator: &Indicator) -> Result<(), SinkError>;

	fn hide(&mut self, id: i32) -> Result<(), SinkError>;
}

/// Title/text used when the settings carry none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorDefaults {
	pub title: String,
	pub text: String,
}

impl Default for IndicatorDefaults {
	fn default() -> Self {
		Self {
			title: DEFAULT_TITLE.to_string(),
			text: DEFAULT_TEXT.to_string(),
		}
	}
}

impl IndicatorDefaults {
	/// Uses the host application's label as fallback title.
	#[must_use]
	pub fn with_app_label(mut self, label: impl Into<String>) -> Self {
		let label = label.into();
		if !label.trim().is_empty() {
			self.title = label;
		}
		self
	}

	/// Builds the indicator for `settings`.
	pub fn build(&self, settings: &ModeSettings, icons: &dyn IconResolver) -> Indicator {
		let color = match settings.rgb() {
			Some(Ok(rgb)) => Some(rgb),
			Some(Err(err)) => {
				tracing::warn!(error = %err, "background.indicator.color_ignored");
				None
			}
			None => None,
		};

		Indicator {
			id: INDICATOR_ID,
			channel: INDICATOR_CHANNEL,
			title: settings.display_title().unwrap_or(self.title.as_str()).to_string(),
			text: settings.display_text().unwrap_or(self.text.as_str()).to_string(),
			icon: resolve_icon(icons, &settings.icon),
			color,
			big_text: settings.big_text,
			hidden: settings.hidden,
			ongoing: true,
			action: if settings.resume { ContentAction::Resume } else { ContentAction::Open },
		}
	}
}

/// Configured icon, then the default icon, then none.
fn resolve_icon(icons: &dyn IconResolver, name: &str) -> Option<IconHandle> {
	icons.resolve(name).or_else(|| {
		if name == DEFAULT_ICON {
			return None;
		}
		tracing::debug!(icon = name, "background.indicator.icon_fallback");
		icons.resolve(DEFAULT_ICON)
	})
}
