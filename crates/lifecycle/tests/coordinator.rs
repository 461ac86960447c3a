use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use vigil_background::testing::{CountingWakeLock, MapIconResolver, RecordingSink, SinkCall};
use vigil_background::{BackgroundWorker, INDICATOR_ID, ResourceHolder};
use vigil_lifecycle::testing::{RecordingEventSink, RecordingHost, ScriptedBinder};
use vigil_lifecycle::{CoordinatorConfig, CoordinatorError, CoordinatorHandle, CoordinatorSpec, DISCONNECTED_DETAIL, Phase, SettingsStore, spawn_coordinator};
use vigil_model::{ContentUpdate, EventKind, LifecycleEvent, ModeSettings};

struct Rig {
	handle: CoordinatorHandle,
	binder: ScriptedBinder,
	events: RecordingEventSink,
	host: RecordingHost,
	lock: CountingWakeLock,
	sink: RecordingSink,
}

impl Rig {
	fn new() -> Self {
		Self::with(ScriptedBinder::new(), CountingWakeLock::new())
	}

	fn with(binder: ScriptedBinder, lock: CountingWakeLock) -> Self {
		let _ = tracing_subscriber::fmt::try_init();
		let sink = RecordingSink::new();
		let icons = MapIconResolver::default().with("icon", 1);
		let worker = BackgroundWorker::new(ResourceHolder::new(lock.clone()), sink.clone(), Arc::new(icons));
		let events = RecordingEventSink::new();
		let host = RecordingHost::new();
		let config = CoordinatorConfig {
			terminate_grace_ms: 50,
			..CoordinatorConfig::default()
		};
		let handle = spawn_coordinator(
			CoordinatorSpec::new(worker, binder.clone())
				.events(events.clone())
				.host(host.clone())
				.config(config),
		);
		Self {
			handle,
			binder,
			events,
			host,
			lock,
			sink,
		}
	}

	async fn bound(&self) {
		self.handle.enable().await.unwrap();
		self.handle.application_backgrounded().await.unwrap();
		let status = self.handle.settled().await.unwrap();
		assert!(status.bound);
	}
}

fn titled(title: &str, text: &str) -> ModeSettings {
	ModeSettings {
		title: Some(title.into()),
		text: Some(text.into()),
		..ModeSettings::default()
	}
}

#[tokio::test]
async fn configured_worker_activates_in_background() {
	let rig = Rig::new();
	rig.handle.configure(titled("T", "X"), false).await.unwrap();
	rig.handle.enable().await.unwrap();
	rig.handle.application_backgrounded().await.unwrap();

	let status = rig.handle.settled().await.unwrap();
	assert!(status.bound);
	assert!(rig.lock.is_held());
	let shown = rig.sink.visible().unwrap();
	assert_eq!((shown.title.as_str(), shown.text.as_str()), ("T", "X"));
	assert_eq!(rig.events.events(), [LifecycleEvent::Activate]);
	assert_eq!(
		serde_json::to_value(rig.events.events()[0].payload()).unwrap(),
		json!({"event": "activate", "active": true, "detail": null})
	);
}

#[tokio::test]
async fn content_update_changes_indicator_without_events() {
	let rig = Rig::new();
	rig.bound().await;

	rig.handle.update_notification_content(ContentUpdate::new("T2", "X2")).await.unwrap();

	let status = rig.handle.status().await.unwrap();
	assert!(status.bound);
	let shown = rig.sink.visible().unwrap();
	assert_eq!((shown.title.as_str(), shown.text.as_str()), ("T2", "X2"));
	assert!(matches!(rig.sink.calls().last(), Some(SinkCall::Update(_))));
	assert_eq!(rig.events.kinds(), [EventKind::Activate]);
}

#[tokio::test]
async fn disable_while_bound_releases_and_deactivates() {
	let rig = Rig::new();
	rig.bound().await;

	rig.handle.disable().await.unwrap();
	let status = rig.handle.settled().await.unwrap();

	assert!(!status.bound);
	assert!(!status.enabled);
	assert!(!rig.lock.is_held());
	assert_eq!(rig.sink.calls().last(), Some(&SinkCall::Hide(INDICATOR_ID)));
	assert_eq!(rig.events.events(), [LifecycleEvent::Activate, LifecycleEvent::Deactivate]);
	assert_eq!(rig.binder.unbinds(), 1);
}

#[tokio::test]
async fn bind_failure_reports_and_never_acquires() {
	let binder = ScriptedBinder::new();
	binder.fail_next("bind refused");
	let rig = Rig::with(binder, CountingWakeLock::new());

	rig.handle.enable().await.unwrap();
	rig.handle.application_backgrounded().await.unwrap();
	let status = rig.handle.settled().await.unwrap();

	assert!(!status.bound);
	assert_eq!(rig.lock.acquired(), 0);
	assert_eq!(rig.events.events(), [LifecycleEvent::failure("bind refused")]);
	assert_eq!(
		serde_json::to_value(rig.events.events()[0].payload()).unwrap(),
		json!({"event": "failure", "active": false, "detail": "bind refused"})
	);
}

#[tokio::test]
async fn enabling_twice_activates_once() {
	let rig = Rig::new();
	rig.handle.application_backgrounded().await.unwrap();
	rig.handle.enable().await.unwrap();
	rig.handle.enable().await.unwrap();
	rig.handle.settled().await.unwrap();
	rig.handle.enable().await.unwrap();
	rig.handle.settled().await.unwrap();

	assert_eq!(rig.events.kinds(), [EventKind::Activate]);
	assert_eq!(rig.binder.binds(), 1);
	assert_eq!(rig.lock.acquired(), 1);
}

#[tokio::test]
async fn disable_while_unbound_is_silent() {
	let rig = Rig::new();
	rig.handle.disable().await.unwrap();
	rig.handle.application_backgrounded().await.unwrap();
	rig.handle.disable().await.unwrap();
	rig.handle.settled().await.unwrap();

	assert!(rig.events.events().is_empty());
	assert!(!rig.lock.is_held());
	assert_eq!(rig.binder.binds(), 0);
}

#[tokio::test]
async fn content_update_requires_bound_worker() {
	let rig = Rig::new();

	let err = rig.handle.update_notification_content(ContentUpdate::new("T", "X")).await.unwrap_err();
	assert_eq!(err, CoordinatorError::NotRunning);
	assert_eq!(err.to_string(), "Service is not bound.");

	let err = rig.handle.update_notification_payload(&json!("not an object")).await.unwrap_err();
	assert_eq!(err, CoordinatorError::NotRunning);

	assert!(rig.events.events().is_empty());
	assert!(rig.sink.calls().is_empty());
}

#[tokio::test]
async fn malformed_content_update_is_rejected_while_bound() {
	let rig = Rig::new();
	rig.bound().await;

	let err = rig.handle.update_notification_payload(&json!([1, 2])).await.unwrap_err();
	assert!(matches!(err, CoordinatorError::InvalidParameters(_)));
	assert_eq!(err.to_string(), "Invalid parameters.");

	rig.handle.update_notification_payload(&json!({"text": "only text"})).await.unwrap();
	let shown = rig.sink.visible().unwrap();
	assert_eq!((shown.title.as_str(), shown.text.as_str()), ("Default Title", "only text"));
}

#[tokio::test]
async fn foregrounding_before_acknowledgment_leaves_no_trace() {
	let rig = Rig::with(ScriptedBinder::held(), CountingWakeLock::new());
	rig.handle.enable().await.unwrap();
	rig.handle.application_backgrounded().await.unwrap();
	let status = rig.handle.status().await.unwrap();
	assert!(matches!(status.phase, Phase::Binding(_)));

	rig.handle.application_foregrounded().await.unwrap();
	rig.binder.release_binds(1);
	let status = rig.handle.settled().await.unwrap();

	assert_eq!(status.phase, Phase::Unbound);
	assert!(rig.events.events().is_empty());
	assert_eq!(rig.lock.acquired(), 0);
	assert_eq!(rig.binder.unbinds(), 1);
}

#[tokio::test]
async fn commands_are_served_while_binding() {
	let rig = Rig::with(ScriptedBinder::held(), CountingWakeLock::new());
	rig.handle.enable().await.unwrap();
	rig.handle.application_backgrounded().await.unwrap();

	let err = rig.handle.update_notification_content(ContentUpdate::new("T", "X")).await.unwrap_err();
	assert_eq!(err, CoordinatorError::NotRunning);

	rig.binder.release_binds(1);
	let status = rig.handle.settled().await.unwrap();
	assert!(status.bound);
	assert_eq!(rig.events.kinds(), [EventKind::Activate]);
}

#[tokio::test]
async fn refused_resource_fails_and_unbinds() {
	let rig = Rig::with(ScriptedBinder::new(), CountingWakeLock::failing("denied"));
	rig.handle.enable().await.unwrap();
	rig.handle.application_backgrounded().await.unwrap();
	let status = rig.handle.settled().await.unwrap();

	assert!(!status.bound);
	assert_eq!(rig.events.kinds(), [EventKind::Failure]);
	assert_eq!(rig.events.events()[0].detail(), Some("failed to acquire wake resource: denied"));
	assert_eq!(rig.binder.unbinds(), 1);
	assert!(rig.sink.visible().is_none());
}

#[tokio::test]
async fn live_configure_updates_running_worker() {
	let rig = Rig::new();
	let err = rig.handle.configure(titled("Live", "update"), true).await.unwrap_err();
	assert_eq!(err, CoordinatorError::NotRunning);

	rig.bound().await;
	rig.handle.configure(titled("Live", "update"), true).await.unwrap();
	let shown = rig.sink.visible().unwrap();
	assert_eq!(shown.title, "Live");
	assert_eq!(rig.handle.settings().title, ModeSettings::default().title, "live updates leave the stored configuration alone");

	let silent = ModeSettings {
		silent: true,
		..ModeSettings::default()
	};
	rig.handle.configure(silent, true).await.unwrap();
	assert!(rig.sink.visible().is_none());
	assert!(rig.lock.is_held());
	assert_eq!(rig.events.kinds(), [EventKind::Activate]);
}

#[tokio::test]
async fn stored_configuration_is_shared() {
	let _ = tracing_subscriber::fmt::try_init();
	let store = SettingsStore::new(titled("Initial", "text"));
	let worker = BackgroundWorker::new(ResourceHolder::new(CountingWakeLock::new()), RecordingSink::new(), Arc::new(MapIconResolver::default()));
	let handle = spawn_coordinator(CoordinatorSpec::new(worker, ScriptedBinder::new()).settings(store.clone()));

	assert_eq!(handle.settings().title.as_deref(), Some("Initial"));
	handle.configure(titled("Next", "text"), false).await.unwrap();
	assert_eq!(store.snapshot().title.as_deref(), Some("Next"));
	handle.shutdown().await;
}

#[tokio::test]
async fn terminating_releases_then_ends_process() {
	let rig = Rig::new();
	rig.bound().await;

	rig.handle.application_terminating().await.unwrap();
	let status = rig.handle.settled().await.unwrap();

	assert!(status.terminated);
	assert_eq!(rig.host.terminated(), 1);
	assert!(!rig.lock.is_held());
	assert_eq!(rig.binder.unbinds(), 1);
	assert_eq!(rig.events.kinds(), [EventKind::Activate, EventKind::Deactivate]);

	rig.handle.enable().await.unwrap();
	rig.handle.application_backgrounded().await.unwrap();
	rig.handle.application_terminating().await.unwrap();
	rig.handle.settled().await.unwrap();
	assert_eq!(rig.binder.binds(), 1);
	assert_eq!(rig.host.terminated(), 1);
	assert_eq!(rig.events.events().len(), 2);
}

#[tokio::test]
async fn terminating_does_not_wait_forever_for_acknowledgment() {
	let rig = Rig::with(ScriptedBinder::held(), CountingWakeLock::new());
	rig.handle.enable().await.unwrap();
	rig.handle.application_backgrounded().await.unwrap();

	rig.handle.application_terminating().await.unwrap();
	let status = tokio::time::timeout(Duration::from_secs(5), rig.handle.status()).await.unwrap().unwrap();

	assert!(status.terminated);
	assert_eq!(rig.host.terminated(), 1);
	assert!(rig.events.events().is_empty());
	assert_eq!(rig.lock.acquired(), 0);
	assert_eq!(rig.binder.unbinds(), 1, "aborted bind is released");

	let settled = tokio::time::timeout(Duration::from_secs(5), rig.handle.settled()).await.unwrap().unwrap();
	assert!(!settled.bound);
}

#[tokio::test]
async fn disconnect_reports_failure_and_keeps_binding() {
	let rig = Rig::new();
	rig.handle.worker_disconnected().await.unwrap();
	rig.bound().await;

	rig.handle.worker_disconnected().await.unwrap();
	let status = rig.handle.status().await.unwrap();
	assert!(status.bound);
	assert_eq!(rig.events.events().last(), Some(&LifecycleEvent::failure(DISCONNECTED_DETAIL)));

	rig.handle.disable().await.unwrap();
	rig.handle.settled().await.unwrap();
	assert_eq!(rig.events.kinds(), [EventKind::Activate, EventKind::Failure, EventKind::Deactivate]);
	assert!(!rig.lock.is_held());
}

#[tokio::test]
async fn indicator_click_resumes_only_when_configured() {
	let rig = Rig::new();
	rig.handle.indicator_clicked().await.unwrap();
	rig.bound().await;
	rig.handle.indicator_clicked().await.unwrap();
	rig.handle.status().await.unwrap();
	assert_eq!(rig.host.foregrounded(), 0);

	let resume = ModeSettings {
		resume: true,
		..ModeSettings::default()
	};
	rig.handle.configure(resume, true).await.unwrap();
	rig.handle.indicator_clicked().await.unwrap();
	rig.handle.status().await.unwrap();
	assert_eq!(rig.host.foregrounded(), 1);
}

#[tokio::test]
async fn visibility_changes_clear_lock_screen() {
	let rig = Rig::new();
	rig.handle.application_backgrounded().await.unwrap();
	rig.handle.application_stopped().await.unwrap();
	rig.handle.status().await.unwrap();
	assert_eq!(rig.host.lock_screen_cleared(), 2);
}

#[tokio::test]
async fn subscribers_see_events_in_order() {
	let rig = Rig::new();
	let mut rx = rig.handle.subscribe();
	rig.bound().await;
	rig.handle.application_foregrounded().await.unwrap();
	rig.handle.application_backgrounded().await.unwrap();
	rig.handle.settled().await.unwrap();

	let mut seen = Vec::new();
	for _ in 0..3 {
		seen.push(rx.recv().await.unwrap().kind());
	}
	assert_eq!(seen, [EventKind::Activate, EventKind::Deactivate, EventKind::Activate]);
	assert_eq!(rig.events.kinds(), seen);
}

#[tokio::test]
async fn shutdown_releases_and_closes() {
	let rig = Rig::new();
	rig.bound().await;

	rig.handle.shutdown().await;

	assert!(!rig.lock.is_held());
	assert_eq!(rig.lock.acquired(), rig.lock.released());
	assert_eq!(rig.events.kinds(), [EventKind::Activate, EventKind::Deactivate]);
	assert_eq!(rig.handle.enable().await, Err(CoordinatorError::Closed));
	assert_eq!(rig.handle.status().await.unwrap_err(), CoordinatorError::Closed);
}

#[tokio::test]
async fn dropping_every_handle_stops_worker() {
	let rig = Rig::new();
	rig.bound().await;
	let lock = rig.lock.clone();
	let mut rx = rig.handle.subscribe();

	drop(rig);
	while rx.recv().await.is_ok() {}

	assert!(!lock.is_held());
}
