use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(name = "vigil")]
#[command(about = "Background mode lifecycle coordinator")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Run a scripted session against simulated OS collaborators
	Simulate(SimulateArgs),
}

/// Options for `vigil simulate`.
#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
	/// Comma-separated steps: enable, disable, background, foreground, stop,
	/// terminate, click, disconnect, settle, update=TITLE/TEXT
	#[arg(long, value_delimiter = ',', required = true)]
	pub steps: Vec<Step>,

	/// TOML runtime configuration
	#[arg(long, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Make every bind attempt fail with MESSAGE
	#[arg(long, value_name = "MESSAGE")]
	pub fail_bind: Option<String>,

	/// Delay before the simulated OS acknowledges a bind
	#[arg(long, value_name = "N", default_value_t = 0)]
	pub bind_delay_ms: u64,

	/// Run without a visible indicator
	#[arg(long)]
	pub silent: bool,

	/// Application label shown when no title is configured
	#[arg(long, value_name = "NAME")]
	pub app_label: Option<String>,
}

/// One scripted session step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
	Enable,
	Disable,
	Background,
	Foreground,
	Stop,
	Terminate,
	Click,
	Disconnect,
	/// Wait until no bind or unbind is in flight.
	Settle,
	Update {
		title: String,
		text: String,
	},
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
	#[error("unknown step {0:?}")]
	Unknown(String),

	#[error("update step expects update=TITLE/TEXT, got {0:?}")]
	MalformedUpdate(String),
}

impl FromStr for Step {
	type Err = StepError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		if let Some(content) = s.strip_prefix("update=") {
			let (title, text) = content.split_once('/').ok_or_else(|| StepError::MalformedUpdate(content.to_string()))?;
			return Ok(Self::Update {
				title: title.to_string(),
				text: text.to_string(),
			});
		}
		Ok(match s {
			"enable" => Self::Enable,
			"disable" => Self::Disable,
			"background" => Self::Background,
			"foreground" => Self::Foreground,
			"stop" => Self::Stop,
			"terminate" => Self::Terminate,
			"click" => Self::Click,
			"disconnect" => Self::Disconnect,
			"settle" => Self::Settle,
			other => return Err(StepError::Unknown(other.to_string())),
		})
	}
}

impl fmt::Display for Step {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Enable => f.write_str("enable"),
			Self::Disable => f.write_str("disable"),
			Self::Background => f.write_str("background"),
			Self::Foreground => f.write_str("foreground"),
			Self::Stop => f.write_str("stop"),
			Self::Terminate => f.write_str("terminate"),
			Self::Click => f.write_str("click"),
			Self::Disconnect => f.write_str("disconnect"),
			Self::Settle => f.write_str("settle"),
			Self::Update { title, text } => write!(f, "update={title}/{text}"),
		}
	}
}
