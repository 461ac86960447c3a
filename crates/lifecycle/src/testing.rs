//! In-memory doubles for the coordinator ports.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::Semaphore;
use vigil_model::{EventKind, LifecycleEvent};

use crate::error::BindError;
use crate::ports::{EventSink, ProcessHost, ServiceBinder};

#[derive(Debug, Default)]
struct BinderState {
	failures: Mutex<VecDeque<String>>,
	binds: AtomicUsize,
	unbinds: AtomicUsize,
	/// When set, each bind acknowledgment waits for one permit.
	gate: Option<Semaphore>,
}

/// Binder whose acknowledgments are scripted by the test.
///
/// By default every bind succeeds immediately. [`held`](Self::held) binders
/// keep acknowledgments back until [`release_binds`](Self::release_binds).
#[derive(Debug, Clone, Default)]
pub struct ScriptedBinder {
	state: Arc<BinderState>,
}

impl ScriptedBinder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn held() -> Self {
		Self {
			state: Arc::new(BinderState {
				gate: Some(Semaphore::new(0)),
				..BinderState::default()
			}),
		}
	}

	/// The next bind acknowledgment reports `detail` as an OS failure.
	pub fn fail_next(&self, detail: impl Into<String>) {
		self.state.failures.lock().unwrap_or_else(PoisonError::into_inner).push_back(detail.into());
	}

	/// Lets `count` held bind acknowledgments through.
	pub fn release_binds(&self, count: usize) {
		if let Some(gate) = &self.state.gate {
			gate.add_permits(count);
		}
	}

	/// Bind calls started so far.
	pub fn binds(&self) -> usize {
		self.state.binds.load(Ordering::SeqCst)
	}

	/// Unbind calls completed so far.
	pub fn unbinds(&self) -> usize {
		self.state.unbinds.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl ServiceBinder for ScriptedBinder {
	async fn bind(&self) -> Result<(), BindError> {
		self.state.binds.fetch_add(1, Ordering::SeqCst);
		if let Some(gate) = &self.state.gate {
			if let Ok(permit) = gate.acquire().await {
				permit.forget();
			}
		}
		let failure = self.state.failures.lock().unwrap_or_else(PoisonError::into_inner).pop_front();
		match failure {
			Some(detail) => Err(BindError::new(detail)),
			None => Ok(()),
		}
	}

	async fn unbind(&self) {
		self.state.unbinds.fetch_add(1, Ordering::SeqCst);
	}
}

/// Event sink that records every delivered event.
#[derive(Debug, Clone, Default)]
pub struct RecordingEventSink {
	events: Arc<Mutex<Vec<LifecycleEvent>>>,
}

impl RecordingEventSink {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn events(&self) -> Vec<LifecycleEvent> {
		self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
	}

	pub fn kinds(&self) -> Vec<EventKind> {
		self.events.lock().unwrap_or_else(PoisonError::into_inner).iter().map(LifecycleEvent::kind).collect()
	}
}

impl EventSink for RecordingEventSink {
	fn deliver(&self, event: &LifecycleEvent) {
		self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event.clone());
	}
}

#[derive(Debug, Default)]
struct HostCounts {
	terminated: AtomicUsize,
	foregrounded: AtomicUsize,
	lock_screen_cleared: AtomicUsize,
}

/// Process host that counts each request.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
	counts: Arc<HostCounts>,
}

impl RecordingHost {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn terminated(&self) -> usize {
		self.counts.terminated.load(Ordering::SeqCst)
	}

	pub fn foregrounded(&self) -> usize {
		self.counts.foregrounded.load(Ordering::SeqCst)
	}

	pub fn lock_screen_cleared(&self) -> usize {
		self.counts.lock_screen_cleared.load(Ordering::SeqCst)
	}
}

impl ProcessHost for RecordingHost {
	fn terminate(&self) {
		self.counts.terminated.fetch_add(1, Ordering::SeqCst);
	}

	fn bring_to_foreground(&self) {
		self.counts.foregrounded.fetch_add(1, Ordering::SeqCst);
	}

	fn clear_lock_screen_flags(&self) {
		self.counts.lock_screen_cleared.fetch_add(1, Ordering::SeqCst);
	}
}
