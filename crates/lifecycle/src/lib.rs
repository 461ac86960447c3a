//! Background mode lifecycle coordination.
//!
//! Decides, from the calling layer's `enabled` flag and the application's
//! visibility, when the background worker is bound and active, and reports
//! each transition to an Event Sink in order.
//!
//! * [`Lifecycle`]: pure state machine returning [`Effect`]s
//! * [`spawn_coordinator`]: actor that executes effects against the ports
//! * [`CoordinatorHandle`]: cloneable async front door
//! * [`SettingsStore`]: shared Mode Configuration
//! * [`Config`]: TOML runtime configuration
//!
//! The worker becomes bound only while enabled and backgrounded:
//!
//! | enabled | in background | bound |
//! |---------|---------------|-------|
//! | false   | any           | false |
//! | true    | false         | false |
//! | true    | true          | true  |

pub mod config;
mod coordinator;
pub mod error;
mod generation;
mod handle;
pub mod machine;
pub mod ports;
mod store;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{Config, CoordinatorConfig};
pub use coordinator::{CoordinatorSpec, spawn_coordinator};
pub use error::{BindError, ConfigError, CoordinatorError, Result};
pub use generation::BindGeneration;
pub use handle::CoordinatorHandle;
pub use machine::{DISCONNECTED_DETAIL, Effect, Intent, Lifecycle, Phase, Status};
pub use ports::{DetachedHost, EventSink, ProcessHost, ServiceBinder};
pub use store::SettingsStore;
