//! Shared data model for background-mode coordination.
//!
//! * [`ModeSettings`]: the calling layer's mode configuration (indicator content and flags)
//! * [`ContentUpdate`]: a transient title/text change for a running worker
//! * [`LifecycleEvent`] / [`EventPayload`]: lifecycle notifications and their wire shape
//! * [`SettingsError`]: malformed settings payloads

pub mod error;
pub mod event;
pub mod settings;

pub use error::{Result, SettingsError};
pub use event::{EventKind, EventPayload, LifecycleEvent};
pub use settings::{ContentUpdate, ModeSettings, Rgb};
