//! `vigil` command line driver.

mod cli;
mod session;
mod sim;

use clap::Parser;
use cli::{Cli, Command};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	setup_tracing();

	match cli.command {
		Command::Simulate(args) => {
			let status = session::run(&args, |line| println!("{line}")).await?;
			tracing::info!(
				enabled = status.enabled,
				in_background = status.in_background,
				bound = status.bound,
				terminated = status.terminated,
				"vigil.session.finished"
			);
		}
	}
	Ok(())
}

/// Logs to stderr so stdout carries only event payloads. `RUST_LOG` overrides the `info` default.
fn setup_tracing() {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
