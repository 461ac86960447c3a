//! Long-lived background worker primitives.
//!
//! This crate owns everything that happens inside the elevated-priority worker:
//! * [`ResourceHolder`]: exclusive wake-preventing resource with release-on-drop
//! * [`Indicator`] building with icon/title fallbacks
//! * [`BackgroundWorker`]: activation, deactivation and live indicator updates
//!
//! OS facilities are reached through the [`WakeLock`], [`NotificationSink`] and
//! [`IconResolver`] ports.

pub mod error;
pub mod indicator;
pub mod resource;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod worker;

pub use error::{ResourceError, SinkError, WorkerError};
pub use indicator::{ContentAction, INDICATOR_CHANNEL, INDICATOR_ID, IconHandle, IconResolver, Indicator, IndicatorChannel, IndicatorDefaults, NotificationSink};
pub use resource::{ResourceHolder, WAKE_LOCK_TAG, WakeLock};
pub use worker::BackgroundWorker;
