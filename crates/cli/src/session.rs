//! Scripted session runner for `vigil simulate`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use serde_json::json;
use vigil_background::{BackgroundWorker, IndicatorDefaults, ResourceHolder};
use vigil_bridge::{Bridge, JsonEventSink};
use vigil_lifecycle::{Config, CoordinatorHandle, CoordinatorSpec, SettingsStore, Status, spawn_coordinator};

use crate::cli::{SimulateArgs, Step};
use crate::sim::{SimBinder, SimHost, SimIcons, SimNotifications, SimWakeLock};

/// Runs every step in order and hands each output line to `out`.
///
/// Lines are event payloads, or `{"step", "error"}` objects for rejected steps.
/// Returns the final status once the session has settled.
pub async fn run<F>(args: &SimulateArgs, out: F) -> anyhow::Result<Status>
where
	F: Fn(String) + Clone + Send + Sync + 'static,
{
	let config = match &args.config {
		Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
		None => Config::default(),
	};
	let mut defaults = config.defaults;
	if args.silent {
		defaults.silent = true;
	}

	let mut indicator = IndicatorDefaults::default();
	if let Some(label) = &args.app_label {
		indicator = indicator.with_app_label(label.clone());
	}
	let worker = BackgroundWorker::new(ResourceHolder::new(SimWakeLock), SimNotifications, Arc::new(SimIcons)).with_defaults(indicator);
	let binder = SimBinder {
		delay: Duration::from_millis(args.bind_delay_ms),
		refuse: args.fail_bind.clone(),
	};
	let handle = spawn_coordinator(
		CoordinatorSpec::new(worker, binder)
			.events(JsonEventSink::new(out.clone()))
			.host(SimHost)
			.settings(SettingsStore::new(defaults))
			.config(config.coordinator),
	);
	let bridge = Bridge::new(handle.clone());

	for step in &args.steps {
		tracing::debug!(%step, "vigil.step");
		if let Err(err) = apply(&bridge, &handle, step).await {
			tracing::warn!(%step, error = %err, "vigil.step.rejected");
			out(json!({ "step": step.to_string(), "error": err.to_string() }).to_string());
		}
	}

	let status = handle.settled().await.context("coordinator stopped before the session settled")?;
	handle.shutdown().await;
	Ok(status)
}

async fn apply(bridge: &Bridge, handle: &CoordinatorHandle, step: &Step) -> vigil_bridge::Result<()> {
	match step {
		Step::Enable => bridge.execute("enable", &json!([])).await.map(drop),
		Step::Disable => bridge.execute("disable", &json!([])).await.map(drop),
		Step::Update { title, text } => bridge
			.execute("updateNotificationContent", &json!([{ "title": title, "text": text }]))
			.await
			.map(drop),
		Step::Background => Ok(handle.application_backgrounded().await?),
		Step::Foreground => Ok(handle.application_foregrounded().await?),
		Step::Stop => Ok(handle.application_stopped().await?),
		Step::Terminate => Ok(handle.application_terminating().await?),
		Step::Click => Ok(handle.indicator_clicked().await?),
		Step::Disconnect => Ok(handle.worker_disconnected().await?),
		Step::Settle => {
			handle.settled().await?;
			Ok(())
		}
	}
}
