use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

#[test]
fn defaults_match_documented_shape() {
	let settings = ModeSettings::default();
	assert!(!settings.silent);
	assert_eq!(settings.display_title(), None);
	assert_eq!(settings.display_text(), Some(DEFAULT_TEXT));
	assert_eq!(settings.icon, "icon");
	assert_eq!(settings.color, None);
	assert!(settings.hidden);
	assert!(!settings.big_text);
	assert!(!settings.resume);
}

#[test]
fn parses_camel_case_options() {
	let settings = ModeSettings::from_value(&json!({
		"title": "T",
		"text": "X",
		"bigText": true,
		"resume": true,
		"silent": true,
		"color": "#00ff00",
	}))
	.expect("valid settings");

	assert_eq!(settings.display_title(), Some("T"));
	assert_eq!(settings.display_text(), Some("X"));
	assert!(settings.big_text);
	assert!(settings.resume);
	assert!(settings.silent);
	assert_eq!(settings.rgb(), Some(Ok(Rgb(0x00FF00))));
}

#[test]
fn partial_object_replaces_wholesale_with_builtin_defaults() {
	let settings = ModeSettings::from_value(&json!({ "title": "only title" })).expect("valid settings");
	assert_eq!(settings.display_title(), Some("only title"));
	assert_eq!(settings.display_text(), Some(DEFAULT_TEXT));
	assert_eq!(settings.icon, DEFAULT_ICON);
}

#[test]
fn unknown_keys_are_ignored() {
	let settings = ModeSettings::from_value(&json!({ "ticker": "ignored", "text": "X" })).expect("valid settings");
	assert_eq!(settings.display_text(), Some("X"));
}

#[test]
fn wrong_types_and_non_objects_are_rejected() {
	assert!(matches!(
		ModeSettings::from_value(&json!({ "silent": "yes" })),
		Err(SettingsError::Malformed(_))
	));
	assert_eq!(ModeSettings::from_value(&json!([1, 2])), Err(SettingsError::NotAnObject("array")));
	assert_eq!(ModeSettings::from_value(&json!(null)), Err(SettingsError::NotAnObject("null")));
}

#[test]
fn blank_title_reads_as_absent() {
	let settings = ModeSettings::from_value(&json!({ "title": "   ", "text": null })).expect("valid settings");
	assert_eq!(settings.display_title(), None);
	assert_eq!(settings.display_text(), None);
}

#[test]
fn rgb_accepts_both_hex_forms() {
	assert_eq!("ff8800".parse::<Rgb>(), Ok(Rgb(0xFF8800)));
	assert_eq!("#FF8800".parse::<Rgb>(), Ok(Rgb(0xFF8800)));
	assert_eq!(Rgb(0x0000AB).to_string(), "#0000AB");
	assert!(matches!("#12345".parse::<Rgb>(), Err(SettingsError::InvalidColor(_))));
	assert!(matches!("zzzzzz".parse::<Rgb>(), Err(SettingsError::InvalidColor(_))));
}

#[test]
fn with_content_keeps_display_flags() {
	let settings = ModeSettings {
		color: Some("123456".into()),
		big_text: true,
		icon: "sync".into(),
		..ModeSettings::default()
	};
	let updated = settings.with_content(&ContentUpdate::new("T2", "X2"));
	assert_eq!(updated.display_title(), Some("T2"));
	assert_eq!(updated.display_text(), Some("X2"));
	assert_eq!(updated.color.as_deref(), Some("123456"));
	assert_eq!(updated.icon, "sync");
	assert!(updated.big_text);
}

#[test]
fn content_update_fills_missing_fields() {
	assert_eq!(
		ContentUpdate::from_value(&json!({ "title": "T2" })),
		Ok(ContentUpdate::new("T2", UPDATE_DEFAULT_TEXT))
	);
	assert_eq!(
		ContentUpdate::from_value(&json!({})),
		Ok(ContentUpdate::new(UPDATE_DEFAULT_TITLE, UPDATE_DEFAULT_TEXT))
	);
	assert_eq!(
		ContentUpdate::from_value(&json!({ "title": 42, "text": true })),
		Ok(ContentUpdate::new("42", "true"))
	);
}

#[test]
fn content_update_rejects_malformed_payloads() {
	assert_eq!(ContentUpdate::from_value(&json!("T2")), Err(SettingsError::NotAnObject("string")));
	assert!(matches!(
		ContentUpdate::from_value(&json!({ "title": ["T"] })),
		Err(SettingsError::Malformed(_))
	));
}
