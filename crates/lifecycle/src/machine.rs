//! Pure lifecycle state machine.
//!
//! [`Lifecycle`] owns the `enabled` / `in_background` flags and the two-phase
//! binding state. It performs no I/O: every transition returns the
//! [`Effect`]s the coordinator must execute, in order.
//!
//! Phases move `Unbound → Binding → Bound → Unbinding → Unbound`. While a
//! bind or unbind is in flight at most one opposite intent is queued:
//! * stop requested while binding: the acknowledgment unbinds without events
//! * start requested while unbinding: a new bind starts once the unbind settles

use vigil_model::LifecycleEvent;

use crate::error::BindError;
use crate::generation::{BindGeneration, GenerationClock};

/// Detail of the failure emitted when the OS drops a bound worker.
pub const DISCONNECTED_DETAIL: &str = "service disconnected";

/// Binding phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	Unbound,
	/// Bind requested, acknowledgment pending.
	Binding(BindGeneration),
	Bound(BindGeneration),
	/// Unbind requested, completion pending.
	Unbinding(BindGeneration),
}

/// Request queued behind an in-flight bind or unbind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
	Start,
	Stop,
}

/// Instruction for the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
	/// Ask the OS to bind the worker; answer with [`Lifecycle::bind_settled`].
	Bind(BindGeneration),
	/// Activate the worker; answer with [`Lifecycle::activation_settled`].
	ActivateWorker(BindGeneration),
	DeactivateWorker,
	/// Ask the OS to unbind; answer with [`Lifecycle::unbind_settled`].
	Unbind(BindGeneration),
	Emit(LifecycleEvent),
	ClearLockScreen,
	TerminateProcess,
}

/// Snapshot of the coordinator flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
	pub enabled: bool,
	pub in_background: bool,
	pub bound: bool,
	pub phase: Phase,
	pub terminated: bool,
}

#[derive(Debug)]
pub struct Lifecycle {
	enabled: bool,
	in_background: bool,
	phase: Phase,
	pending: Option<Intent>,
	terminated: bool,
	clock: GenerationClock,
}

impl Default for Lifecycle {
	fn default() -> Self {
		Self::new()
	}
}

impl Lifecycle {
	/// Disabled, foregrounded and unbound.
	pub fn new() -> Self {
		Self {
			enabled: false,
			in_background: false,
			phase: Phase::Unbound,
			pending: None,
			terminated: false,
			clock: GenerationClock::default(),
		}
	}

	pub fn status(&self) -> Status {
		Status {
			enabled: self.enabled,
			in_background: self.in_background,
			bound: self.is_bound(),
			phase: self.phase,
			terminated: self.terminated,
		}
	}

	pub fn phase(&self) -> Phase {
		self.phase
	}

	pub fn pending(&self) -> Option<Intent> {
		self.pending
	}

	pub fn is_bound(&self) -> bool {
		matches!(self.phase, Phase::Bound(_))
	}

	/// No bind or unbind is in flight.
	pub fn is_settled(&self) -> bool {
		matches!(self.phase, Phase::Unbound | Phase::Bound(_))
	}

	pub fn is_terminated(&self) -> bool {
		self.terminated
	}

	pub fn enable(&mut self) -> Vec<Effect> {
		if self.terminated {
			return Vec::new();
		}
		self.enabled = true;
		if self.in_background { self.start() } else { Vec::new() }
	}

	pub fn disable(&mut self) -> Vec<Effect> {
		if self.terminated {
			return Vec::new();
		}
		let effects = self.stop();
		self.enabled = false;
		effects
	}

	pub fn backgrounded(&mut self) -> Vec<Effect> {
		if self.terminated {
			return Vec::new();
		}
		self.in_background = true;
		let mut effects = self.start();
		effects.push(Effect::ClearLockScreen);
		effects
	}

	pub fn foregrounded(&mut self) -> Vec<Effect> {
		if self.terminated {
			return Vec::new();
		}
		self.in_background = false;
		self.stop()
	}

	/// The application UI became fully invisible.
	pub fn stopped(&mut self) -> Vec<Effect> {
		if self.terminated {
			return Vec::new();
		}
		vec![Effect::ClearLockScreen]
	}

	/// Stops the worker and ends the process; later transitions are ignored.
	pub fn terminating(&mut self) -> Vec<Effect> {
		if self.terminated {
			return Vec::new();
		}
		let mut effects = self.shutdown();
		effects.push(Effect::TerminateProcess);
		effects
	}

	/// Stops the worker and refuses further transitions, without ending the process.
	pub fn shutdown(&mut self) -> Vec<Effect> {
		if self.terminated {
			return Vec::new();
		}
		let effects = self.stop();
		self.terminated = true;
		effects
	}

	/// The OS dropped the worker connection unexpectedly.
	pub fn worker_disconnected(&mut self) -> Vec<Effect> {
		if self.is_bound() && !self.terminated {
			vec![Effect::Emit(LifecycleEvent::failure(DISCONNECTED_DETAIL))]
		} else {
			Vec::new()
		}
	}

	/// Feeds the acknowledgment of [`Effect::Bind`].
	pub fn bind_settled(&mut self, generation: BindGeneration, result: Result<(), BindError>) -> Vec<Effect> {
		if self.phase != Phase::Binding(generation) {
			tracing::warn!(%generation, phase = ?self.phase, "lifecycle.bind.stale_ack");
			return Vec::new();
		}
		let stop_requested = self.pending.take() == Some(Intent::Stop) || self.terminated;
		match result {
			Ok(()) if stop_requested => {
				tracing::debug!(%generation, "lifecycle.bind.abandoned");
				self.phase = Phase::Unbinding(generation);
				vec![Effect::Unbind(generation)]
			}
			Ok(()) => vec![Effect::ActivateWorker(generation)],
			Err(err) => {
				tracing::warn!(%generation, error = %err, "lifecycle.bind.failed");
				self.phase = Phase::Unbound;
				if self.terminated {
					return Vec::new();
				}
				vec![Effect::Emit(LifecycleEvent::failure(err.detail()))]
			}
		}
	}

	/// Feeds the outcome of [`Effect::ActivateWorker`].
	pub fn activation_settled(&mut self, generation: BindGeneration, result: Result<(), String>) -> Vec<Effect> {
		if self.phase != Phase::Binding(generation) {
			tracing::warn!(%generation, phase = ?self.phase, "lifecycle.activation.stale");
			return Vec::new();
		}
		match result {
			Ok(()) => {
				self.phase = Phase::Bound(generation);
				tracing::debug!(%generation, "lifecycle.bound");
				vec![Effect::Emit(LifecycleEvent::Activate)]
			}
			Err(detail) => {
				tracing::warn!(%generation, error = %detail, "lifecycle.activation.failed");
				self.phase = Phase::Unbinding(generation);
				vec![Effect::Emit(LifecycleEvent::Failure(detail)), Effect::DeactivateWorker, Effect::Unbind(generation)]
			}
		}
	}

	/// Feeds the completion of [`Effect::Unbind`].
	pub fn unbind_settled(&mut self, generation: BindGeneration) -> Vec<Effect> {
		if self.phase != Phase::Unbinding(generation) {
			tracing::warn!(%generation, phase = ?self.phase, "lifecycle.unbind.stale");
			return Vec::new();
		}
		self.phase = Phase::Unbound;
		tracing::debug!(%generation, "lifecycle.unbound");
		if self.pending.take() == Some(Intent::Start) { self.start() } else { Vec::new() }
	}

	fn start(&mut self) -> Vec<Effect> {
		if !self.enabled || self.terminated {
			return Vec::new();
		}
		match self.phase {
			Phase::Unbound => {
				let generation = self.clock.next();
				self.phase = Phase::Binding(generation);
				self.pending = None;
				tracing::debug!(%generation, "lifecycle.bind.requested");
				vec![Effect::Bind(generation)]
			}
			Phase::Binding(_) => {
				if self.pending == Some(Intent::Stop) {
					self.pending = None;
				}
				Vec::new()
			}
			Phase::Bound(_) => Vec::new(),
			Phase::Unbinding(_) => {
				self.pending = Some(Intent::Start);
				Vec::new()
			}
		}
	}

	fn stop(&mut self) -> Vec<Effect> {
		match self.phase {
			Phase::Unbound => Vec::new(),
			Phase::Binding(_) => {
				self.pending = Some(Intent::Stop);
				Vec::new()
			}
			Phase::Bound(generation) => {
				self.phase = Phase::Unbinding(generation);
				self.pending = None;
				tracing::debug!(%generation, "lifecycle.unbind.requested");
				vec![Effect::Emit(LifecycleEvent::Deactivate), Effect::DeactivateWorker, Effect::Unbind(generation)]
			}
			Phase::Unbinding(_) => {
				if self.pending == Some(Intent::Start) {
					self.pending = None;
				}
				Vec::new()
			}
		}
	}
}
