//! Mode configuration and transient content updates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SettingsError, json_kind};

/// Indicator title used when neither the settings nor the host supply one.
pub const DEFAULT_TITLE: &str = "App is running in background";
/// Indicator text used before the calling layer configures one.
pub const DEFAULT_TEXT: &str = "Doing heavy tasks.";
/// Icon resource name used when none is configured or the configured one is unknown.
pub const DEFAULT_ICON: &str = "icon";

/// Title applied by a content update whose payload omits `title`.
pub const UPDATE_DEFAULT_TITLE: &str = "Default Title";
/// Text applied by a content update whose payload omits `text`.
pub const UPDATE_DEFAULT_TEXT: &str = "Default Text";

/// Background mode configuration supplied by the calling layer.
///
/// Always replaced wholesale: fields absent from a supplied object take their
/// built-in default, never the value of a previous configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModeSettings {
	/// Keep the worker running without a visible indicator.
	pub silent: bool,
	/// Absent by default; the indicator then shows the host label or [`DEFAULT_TITLE`].
	pub title: Option<String>,
	pub text: Option<String>,
	/// Icon resource name, resolved by the host.
	pub icon: String,
	/// Accent colour as `RRGGBB` or `#RRGGBB`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
	/// Hide indicator content on the lock screen.
	pub hidden: bool,
	/// Render the text with the expanded big-text style.
	pub big_text: bool,
	/// Clicking the indicator brings the application back to the foreground.
	pub resume: bool,
}

impl Default for ModeSettings {
	fn default() -> Self {
		Self {
			silent: false,
			title: None,
			text: Some(DEFAULT_TEXT.to_string()),
			icon: DEFAULT_ICON.to_string(),
			color: None,
			hidden: true,
			big_text: false,
			resume: false,
		}
	}
}

impl ModeSettings {
	/// Parses a settings object, ignoring unrecognized keys.
	pub fn from_value(value: &Value) -> Result<Self> {
		if !value.is_object() {
			return Err(SettingsError::NotAnObject(json_kind(value)));
		}
		serde_json::from_value(value.clone()).map_err(|err| SettingsError::Malformed(err.to_string()))
	}

	/// Configured title, or `None` when absent or blank.
	pub fn display_title(&self) -> Option<&str> {
		non_blank(self.title.as_deref())
	}

	/// Configured text, or `None` when absent or blank.
	pub fn display_text(&self) -> Option<&str> {
		non_blank(self.text.as_deref())
	}

	/// Parsed accent colour, if one is configured.
	pub fn rgb(&self) -> Option<Result<Rgb>> {
		self.color.as_deref().map(str::parse)
	}

	/// Copy of these settings with the content of `update` applied.
	#[must_use]
	pub fn with_content(&self, update: &ContentUpdate) -> Self {
		Self {
			title: Some(update.title.clone()),
			text: Some(update.text.clone()),
			..self.clone()
		}
	}
}

fn non_blank(value: Option<&str>) -> Option<&str> {
	let value = value?.trim();
	if value.is_empty() { None } else { Some(value) }
}

/// 24-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u32);

impl FromStr for Rgb {
	type Err = SettingsError;

	fn from_str(s: &str) -> Result<Self> {
		let hex = s.trim().trim_start_matches('#');
		if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
			return Err(SettingsError::InvalidColor(s.to_string()));
		}
		u32::from_str_radix(hex, 16).map(Rgb).map_err(|_| SettingsError::InvalidColor(s.to_string()))
	}
}

impl fmt::Display for Rgb {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{:06X}", self.0)
	}
}

/// Transient indicator content applied to a running worker.
///
/// Never persisted into [`ModeSettings`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentUpdate {
	pub title: String,
	pub text: String,
}

impl ContentUpdate {
	pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			text: text.into(),
		}
	}

	/// Parses `{ title, text }` from the calling layer.
	///
	/// Missing fields fall back to [`UPDATE_DEFAULT_TITLE`] / [`UPDATE_DEFAULT_TEXT`];
	/// scalar non-string values are stringified.
	pub fn from_value(value: &Value) -> Result<Self> {
		let Some(object) = value.as_object() else {
			return Err(SettingsError::NotAnObject(json_kind(value)));
		};
		let field = |key: &str, fallback: &str| match object.get(key) {
			None | Some(Value::Null) => Ok(fallback.to_string()),
			Some(Value::String(s)) => Ok(s.clone()),
			Some(v @ (Value::Bool(_) | Value::Number(_))) => Ok(v.to_string()),
			Some(other) => Err(SettingsError::Malformed(format!("{key}: expected a string, found {}", json_kind(other)))),
		};
		Ok(Self {
			title: field("title", UPDATE_DEFAULT_TITLE)?,
			text: field("text", UPDATE_DEFAULT_TEXT)?,
		})
	}
}

#[cfg(test)]
mod tests;
