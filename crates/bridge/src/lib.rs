//! Calling-layer bridge for the background mode coordinator.
//!
//! * [`Bridge`]: dispatches named actions with JSON arguments
//! * [`JsonEventSink`] / [`ChannelEventSink`]: deliver lifecycle events as JSON payloads

pub mod action;
pub mod error;
pub mod sink;

pub use action::{Action, Bridge, CONTENT_UPDATED, Reply};
pub use error::{BridgeError, Result};
pub use sink::{ChannelEventSink, JsonEventSink, event_json};
