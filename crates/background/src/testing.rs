//! In-memory doubles for the worker ports.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::SinkError;
use crate::indicator::{IconHandle, IconResolver, Indicator, NotificationSink};
use crate::resource::WakeLock;

#[derive(Debug, Default)]
struct WakeLockCounts {
	acquired: usize,
	released: usize,
}

/// Wake lock that counts acquire/release pairs.
#[derive(Debug, Clone, Default)]
pub struct CountingWakeLock {
	counts: Arc<Mutex<WakeLockCounts>>,
	refuse: Option<String>,
}

impl CountingWakeLock {
	pub fn new() -> Self {
		Self::default()
	}

	/// A lock whose every acquire is refused with `reason`.
	pub fn failing(reason: impl Into<String>) -> Self {
		Self {
			refuse: Some(reason.into()),
			..Self::default()
		}
	}

	pub fn acquired(&self) -> usize {
		self.counts.lock().unwrap_or_else(PoisonError::into_inner).acquired
	}

	pub fn released(&self) -> usize {
		self.counts.lock().unwrap_or_else(PoisonError::into_inner).released
	}

	pub fn is_held(&self) -> bool {
		self.acquired() > self.released()
	}
}

impl WakeLock for CountingWakeLock {
	fn acquire(&mut self, _tag: &str) -> Result<(), String> {
		if let Some(reason) = &self.refuse {
			return Err(reason.clone());
		}
		self.counts.lock().unwrap_or_else(PoisonError::into_inner).acquired += 1;
		Ok(())
	}

	fn release(&mut self) {
		self.counts.lock().unwrap_or_else(PoisonError::into_inner).released += 1;
	}
}

/// One call observed by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
	Show(Indicator),
	Update(Indicator),
	Hide(i32),
}

/// Notification sink that records every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
	calls: Arc<Mutex<Vec<SinkCall>>>,
	unreachable: Arc<AtomicBool>,
}

impl RecordingSink {
	pub fn new() -> Self {
		Self::default()
	}

	/// Makes subsequent calls fail without being recorded.
	pub fn set_unreachable(&self, unreachable: bool) {
		self.unreachable.store(unreachable, Ordering::SeqCst);
	}

	pub fn calls(&self) -> Vec<SinkCall> {
		self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
	}

	/// Indicator currently on screen according to the recorded calls.
	pub fn visible(&self) -> Option<Indicator> {
		let calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
		match calls.last()? {
			SinkCall::Show(indicator) | SinkCall::Update(indicator) => Some(indicator.clone()),
			SinkCall::Hide(_) => None,
		}
	}

	fn record(&self, call: SinkCall) -> Result<(), SinkError> {
		if self.unreachable.load(Ordering::SeqCst) {
			return Err(SinkError("unreachable".into()));
		}
		self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(call);
		Ok(())
	}
}

impl NotificationSink for RecordingSink {
	fn show(&mut self, indicator: &Indicator) -> Result<(), SinkError> {
		self.record(SinkCall::Show(indicator.clone()))
	}

	fn update(&mut self, indicator: &Indicator) -> Result<(), SinkError> {
		self.record(SinkCall::Update(indicator.clone()))
	}

	fn hide(&mut self, id: i32) -> Result<(), SinkError> {
		self.record(SinkCall::Hide(id))
	}
}

/// Icon resolver backed by a fixed name table.
#[derive(Debug, Clone, Default)]
pub struct MapIconResolver {
	icons: HashMap<String, IconHandle>,
}

impl MapIconResolver {
	#[must_use]
	pub fn with(mut self, name: &str, handle: u32) -> Self {
		self.icons.insert(name.to_string(), IconHandle(handle));
		self
	}
}

impl IconResolver for MapIconResolver {
	fn resolve(&self, name: &str) -> Option<IconHandle> {
		self.icons.get(name).copied()
	}
}
