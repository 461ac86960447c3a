//! Coordinator actor: owns the state machine and the worker, executes effects.
//!
//! Every entry point is a [`Command`] on a bounded mailbox, so mutation is
//! serialized on one task. Bind and unbind calls run as child tasks in a
//! [`JoinSet`]; their outcomes re-enter the loop as settlements while the
//! mailbox keeps being served.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use vigil_background::BackgroundWorker;
use vigil_model::{ContentUpdate, LifecycleEvent, ModeSettings, SettingsError};

use crate::config::CoordinatorConfig;
use crate::error::{BindError, CoordinatorError, Result};
use crate::generation::BindGeneration;
use crate::handle::CoordinatorHandle;
use crate::machine::{Effect, Lifecycle, Phase, Status};
use crate::ports::{DetachedHost, EventSink, ProcessHost, ServiceBinder};
use crate::store::SettingsStore;

/// Mailbox message handled by the coordinator actor.
pub(crate) enum Command {
	Configure {
		settings: ModeSettings,
		live: bool,
		reply: oneshot::Sender<Result<()>>,
	},
	Enable,
	Disable,
	Backgrounded,
	Foregrounded,
	Stopped,
	Terminating,
	UpdateContent {
		update: std::result::Result<ContentUpdate, SettingsError>,
		reply: oneshot::Sender<Result<()>>,
	},
	IndicatorClicked,
	WorkerDisconnected,
	Status {
		reply: oneshot::Sender<Status>,
	},
	/// Answered once no bind or unbind is in flight.
	Settled {
		reply: oneshot::Sender<Status>,
	},
}

impl Command {
	fn name(&self) -> &'static str {
		match self {
			Self::Configure { .. } => "configure",
			Self::Enable => "enable",
			Self::Disable => "disable",
			Self::Backgrounded => "backgrounded",
			Self::Foregrounded => "foregrounded",
			Self::Stopped => "stopped",
			Self::Terminating => "terminating",
			Self::UpdateContent { .. } => "update_content",
			Self::IndicatorClicked => "indicator_clicked",
			Self::WorkerDisconnected => "worker_disconnected",
			Self::Status { .. } => "status",
			Self::Settled { .. } => "settled",
		}
	}
}

/// Outcome of a bind or unbind child task.
enum Settlement {
	Bind(BindGeneration, std::result::Result<(), BindError>),
	Unbind(BindGeneration),
}

/// Collaborators and tuning for [`spawn_coordinator`].
pub struct CoordinatorSpec {
	worker: BackgroundWorker,
	binder: Arc<dyn ServiceBinder>,
	sink: Option<Arc<dyn EventSink>>,
	host: Arc<dyn ProcessHost>,
	store: SettingsStore,
	config: CoordinatorConfig,
}

impl CoordinatorSpec {
	pub fn new(worker: BackgroundWorker, binder: impl ServiceBinder) -> Self {
		Self {
			worker,
			binder: Arc::new(binder),
			sink: None,
			host: Arc::new(DetachedHost),
			store: SettingsStore::default(),
			config: CoordinatorConfig::default(),
		}
	}

	/// Sets the Event Sink receiving every lifecycle event in order.
	#[must_use]
	pub fn events(mut self, sink: impl EventSink) -> Self {
		self.sink = Some(Arc::new(sink));
		self
	}

	#[must_use]
	pub fn host(mut self, host: impl ProcessHost) -> Self {
		self.host = Arc::new(host);
		self
	}

	/// Shares an existing Mode Configuration store.
	#[must_use]
	pub fn settings(mut self, store: SettingsStore) -> Self {
		self.store = store;
		self
	}

	#[must_use]
	pub fn config(mut self, config: CoordinatorConfig) -> Self {
		self.config = config;
		self
	}
}

/// Spawns the coordinator actor on the current tokio runtime.
pub fn spawn_coordinator(spec: CoordinatorSpec) -> CoordinatorHandle {
	let (tx, rx) = mpsc::channel(spec.config.mailbox_capacity.max(1));
	let (events, _) = broadcast::channel(spec.config.event_buffer.max(1));
	let cancel = CancellationToken::new();

	let actor = Coordinator {
		machine: Lifecycle::new(),
		worker: spec.worker,
		binder: spec.binder,
		sink: spec.sink,
		host: spec.host,
		store: spec.store.clone(),
		events: events.clone(),
		inflight: JoinSet::new(),
		settled_waiters: Vec::new(),
		terminate_requested: false,
		config: spec.config,
	};
	let task = tokio::spawn(actor.run(rx, cancel.clone()));

	CoordinatorHandle::new(tx, events, cancel, task, spec.store)
}

struct Coordinator {
	machine: Lifecycle,
	worker: BackgroundWorker,
	binder: Arc<dyn ServiceBinder>,
	sink: Option<Arc<dyn EventSink>>,
	host: Arc<dyn ProcessHost>,
	store: SettingsStore,
	events: broadcast::Sender<LifecycleEvent>,
	/// At most one bind or unbind task.
	inflight: JoinSet<Settlement>,
	settled_waiters: Vec<oneshot::Sender<Status>>,
	terminate_requested: bool,
	config: CoordinatorConfig,
}

impl Coordinator {
	async fn run(mut self, mut rx: mpsc::Receiver<Command>, cancel: CancellationToken) {
		tracing::debug!("lifecycle.coordinator.start");
		loop {
			tokio::select! {
				biased;
				_ = cancel.cancelled() => break,
				Some(joined) = self.inflight.join_next(), if !self.inflight.is_empty() => self.settle(joined),
				msg = rx.recv() => {
					let Some(cmd) = msg else {
						break;
					};
					self.handle(cmd);
				}
			}

			if self.terminate_requested {
				self.terminate_requested = false;
				self.finish_inflight().await;
				tracing::info!("lifecycle.coordinator.terminate_process");
				self.host.terminate();
			}
			self.answer_settled();
		}

		let effects = self.machine.shutdown();
		self.execute(effects);
		self.finish_inflight().await;
		self.answer_settled();
		tracing::debug!(resource_held = self.worker.holds_resource(), "lifecycle.coordinator.exit");
	}

	fn handle(&mut self, cmd: Command) {
		tracing::trace!(command = cmd.name(), "lifecycle.coordinator.command");
		match cmd {
			Command::Configure { settings, live, reply } => {
				let _ = reply.send(self.configure(settings, live));
			}
			Command::Enable => {
				let effects = self.machine.enable();
				self.execute(effects);
			}
			Command::Disable => {
				let effects = self.machine.disable();
				self.execute(effects);
			}
			Command::Backgrounded => {
				let effects = self.machine.backgrounded();
				self.execute(effects);
			}
			Command::Foregrounded => {
				let effects = self.machine.foregrounded();
				self.execute(effects);
			}
			Command::Stopped => {
				let effects = self.machine.stopped();
				self.execute(effects);
			}
			Command::Terminating => {
				let effects = self.machine.terminating();
				self.execute(effects);
			}
			Command::UpdateContent { update, reply } => {
				let _ = reply.send(self.update_content(update));
			}
			Command::IndicatorClicked => {
				if self.machine.is_bound() && self.worker.click() {
					self.host.bring_to_foreground();
				}
			}
			Command::WorkerDisconnected => {
				let effects = self.machine.worker_disconnected();
				self.execute(effects);
			}
			Command::Status { reply } => {
				let _ = reply.send(self.machine.status());
			}
			Command::Settled { reply } => self.settled_waiters.push(reply),
		}
	}

	fn configure(&mut self, settings: ModeSettings, live: bool) -> Result<()> {
		if !live {
			self.store.replace(settings);
			tracing::debug!("lifecycle.settings.replaced");
			return Ok(());
		}
		if !self.machine.is_bound() {
			return Err(CoordinatorError::NotRunning);
		}
		self.worker.update_settings(settings).map_err(|_| CoordinatorError::NotRunning)
	}

	fn update_content(&mut self, update: std::result::Result<ContentUpdate, SettingsError>) -> Result<()> {
		if !self.machine.is_bound() {
			return Err(CoordinatorError::NotRunning);
		}
		let update = update.map_err(CoordinatorError::InvalidParameters)?;
		self.worker.update_content(&update).map_err(|_| CoordinatorError::NotRunning)
	}

	fn settle(&mut self, joined: std::result::Result<Settlement, JoinError>) {
		let effects = match joined {
			Ok(Settlement::Bind(generation, result)) => self.machine.bind_settled(generation, result),
			Ok(Settlement::Unbind(generation)) => self.machine.unbind_settled(generation),
			Err(err) => {
				tracing::error!(error = %err, phase = ?self.machine.phase(), "lifecycle.coordinator.task_failed");
				match self.machine.phase() {
					Phase::Binding(generation) => self.machine.bind_settled(generation, Err(BindError::new(err.to_string()))),
					Phase::Unbinding(generation) => self.machine.unbind_settled(generation),
					Phase::Unbound | Phase::Bound(_) => Vec::new(),
				}
			}
		};
		self.execute(effects);
	}

	fn execute(&mut self, effects: Vec<Effect>) {
		let mut queue: VecDeque<Effect> = effects.into();
		while let Some(effect) = queue.pop_front() {
			match effect {
				Effect::Bind(generation) => {
					let binder = Arc::clone(&self.binder);
					self.inflight.spawn(async move { Settlement::Bind(generation, binder.bind().await) });
				}
				Effect::Unbind(generation) => {
					let binder = Arc::clone(&self.binder);
					self.inflight.spawn(async move {
						binder.unbind().await;
						Settlement::Unbind(generation)
					});
				}
				Effect::ActivateWorker(generation) => {
					let settings = self.store.snapshot();
					let result = self.worker.activate(&settings).map_err(|err| err.to_string());
					queue.extend(self.machine.activation_settled(generation, result));
				}
				Effect::DeactivateWorker => self.worker.deactivate(),
				Effect::Emit(event) => self.emit(event),
				Effect::ClearLockScreen => self.host.clear_lock_screen_flags(),
				Effect::TerminateProcess => self.terminate_requested = true,
			}
		}
	}

	fn emit(&self, event: LifecycleEvent) {
		tracing::info!(event = event.kind().as_str(), detail = ?event.detail(), "lifecycle.event");
		if let Some(sink) = &self.sink {
			sink.deliver(&event);
		}
		let _ = self.events.send(event);
	}

	/// Waits for in-flight bind/unbind tasks, bounded by the termination grace.
	async fn finish_inflight(&mut self) {
		let deadline = tokio::time::Instant::now() + self.config.terminate_grace();
		while !self.inflight.is_empty() {
			match tokio::time::timeout_at(deadline, self.inflight.join_next()).await {
				Ok(Some(joined)) => self.settle(joined),
				Ok(None) => break,
				Err(_) => {
					tracing::warn!(pending = self.inflight.len(), "lifecycle.coordinator.grace_elapsed");
					self.inflight.abort_all();
					self.release_aborted().await;
					break;
				}
			}
		}
	}

	/// Unbinds after an aborted bind, whose acknowledgment may still have reached the OS.
	async fn release_aborted(&mut self) {
		let effects = match self.machine.phase() {
			Phase::Binding(generation) => {
				tracing::warn!(%generation, "lifecycle.coordinator.bind_aborted");
				if tokio::time::timeout(self.config.terminate_grace(), self.binder.unbind()).await.is_err() {
					tracing::warn!(%generation, "lifecycle.coordinator.unbind_timeout");
				}
				self.machine.bind_settled(generation, Err(BindError::new("bind aborted")))
			}
			Phase::Unbinding(generation) => {
				tracing::warn!(%generation, "lifecycle.coordinator.unbind_aborted");
				self.machine.unbind_settled(generation)
			}
			Phase::Unbound | Phase::Bound(_) => Vec::new(),
		};
		self.execute(effects);
	}

	fn answer_settled(&mut self) {
		if self.settled_waiters.is_empty() || !self.machine.is_settled() {
			return;
		}
		let status = self.machine.status();
		for reply in self.settled_waiters.drain(..) {
			let _ = reply.send(status);
		}
	}
}
