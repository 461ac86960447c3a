//! Cloneable front door to the coordinator actor.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{Mutex, broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use vigil_model::{ContentUpdate, LifecycleEvent, ModeSettings};

use crate::coordinator::Command;
use crate::error::{CoordinatorError, Result};
use crate::machine::Status;
use crate::store::SettingsStore;

/// Handle to a running coordinator.
///
/// Every call is forwarded to the actor in order. Once the actor has stopped,
/// calls fail with [`CoordinatorError::Closed`]. Dropping the last handle
/// stops the actor the same way [`shutdown`](Self::shutdown) does.
#[derive(Clone)]
pub struct CoordinatorHandle {
	tx: mpsc::Sender<Command>,
	events: broadcast::Sender<LifecycleEvent>,
	cancel: CancellationToken,
	task: Arc<Mutex<Option<JoinHandle<()>>>>,
	store: SettingsStore,
}

impl CoordinatorHandle {
	pub(crate) fn new(
		tx: mpsc::Sender<Command>,
		events: broadcast::Sender<LifecycleEvent>,
		cancel: CancellationToken,
		task: JoinHandle<()>,
		store: SettingsStore,
	) -> Self {
		Self {
			tx,
			events,
			cancel,
			task: Arc::new(Mutex::new(Some(task))),
			store,
		}
	}

	/// Replaces the stored Mode Configuration, or with `live` updates the running worker.
	///
	/// A live update fails with [`CoordinatorError::NotRunning`] while unbound.
	pub async fn configure(&self, settings: ModeSettings, live: bool) -> Result<()> {
		self.request(|reply| Command::Configure { settings, live, reply }).await?
	}

	pub async fn enable(&self) -> Result<()> {
		self.send(Command::Enable).await
	}

	pub async fn disable(&self) -> Result<()> {
		self.send(Command::Disable).await
	}

	pub async fn application_backgrounded(&self) -> Result<()> {
		self.send(Command::Backgrounded).await
	}

	pub async fn application_foregrounded(&self) -> Result<()> {
		self.send(Command::Foregrounded).await
	}

	/// The application UI became fully invisible.
	pub async fn application_stopped(&self) -> Result<()> {
		self.send(Command::Stopped).await
	}

	/// Stops the worker, then asks the host to end the process.
	pub async fn application_terminating(&self) -> Result<()> {
		self.send(Command::Terminating).await
	}

	pub async fn indicator_clicked(&self) -> Result<()> {
		self.send(Command::IndicatorClicked).await
	}

	/// The OS dropped the worker connection without an unbind request.
	pub async fn worker_disconnected(&self) -> Result<()> {
		self.send(Command::WorkerDisconnected).await
	}

	/// Changes the running indicator's title and text.
	pub async fn update_notification_content(&self, update: ContentUpdate) -> Result<()> {
		self.request(|reply| Command::UpdateContent { update: Ok(update), reply }).await?
	}

	/// Like [`update_notification_content`](Self::update_notification_content), parsing a raw
	/// `{title, text}` payload.
	///
	/// The bound check runs before the payload is validated.
	pub async fn update_notification_payload(&self, payload: &Value) -> Result<()> {
		let update = ContentUpdate::from_value(payload);
		self.request(|reply| Command::UpdateContent { update, reply }).await?
	}

	pub async fn status(&self) -> Result<Status> {
		self.request(|reply| Command::Status { reply }).await
	}

	/// Resolves once no bind or unbind is in flight.
	pub async fn settled(&self) -> Result<Status> {
		self.request(|reply| Command::Settled { reply }).await
	}

	/// Subscribes to lifecycle events emitted from now on.
	pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
		self.events.subscribe()
	}

	/// Mode Configuration currently stored.
	pub fn settings(&self) -> Arc<ModeSettings> {
		self.store.snapshot()
	}

	/// Stops the worker best-effort and waits for the actor to exit.
	pub async fn shutdown(&self) {
		self.cancel.cancel();
		let Some(task) = self.task.lock().await.take() else {
			return;
		};
		if let Err(err) = task.await {
			tracing::warn!(error = %err, "lifecycle.coordinator.join_failed");
		}
	}

	async fn send(&self, cmd: Command) -> Result<()> {
		self.tx.send(cmd).await.map_err(|_| CoordinatorError::Closed)
	}

	async fn request<T>(&self, cmd: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
		let (reply, rx) = oneshot::channel();
		self.send(cmd(reply)).await?;
		rx.await.map_err(|_| CoordinatorError::Closed)
	}
}

impl std::fmt::Debug for CoordinatorHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CoordinatorHandle")
			.field("closed", &self.tx.is_closed())
			.field("cancelled", &self.cancel.is_cancelled())
			.finish_non_exhaustive()
	}
}
