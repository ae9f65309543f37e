use std::path::PathBuf;

use droidkeep::ReadinessError;
use thiserror::Error;

use crate::output::{CommandError, ErrorCode};

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error(transparent)]
	Readiness(#[from] ReadinessError),

	#[error(transparent)]
	Adb(#[from] droidkeep_runtime::Error),

	#[error("invalid configuration: {0}")]
	Config(String),

	#[error("cannot prepare data directory {}", path.display())]
	DataDir {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("launching {0} failed")]
	LaunchFailed(String),

	#[error(transparent)]
	Anyhow(#[from] anyhow::Error),
}

impl CliError {
	/// Process exit status for this error.
	///
	/// A cancelled readiness wait exits like an interrupted process; every
	/// other failure, including a device that never became ready, exits 1.
	pub fn exit_code(&self) -> i32 {
		match self {
			CliError::Readiness(ReadinessError::Cancelled) => 130,
			_ => 1,
		}
	}

	pub fn to_command_error(&self) -> CommandError {
		let code = match self {
			CliError::Readiness(ReadinessError::Cancelled) => ErrorCode::Cancelled,
			CliError::Readiness(ReadinessError::TimedOut { .. }) => ErrorCode::DeviceNotReady,
			CliError::Adb(droidkeep_runtime::Error::InvalidAddress { .. }) | CliError::Config(_) => ErrorCode::InvalidInput,
			CliError::Adb(_) => ErrorCode::AdbUnavailable,
			CliError::LaunchFailed(_) => ErrorCode::LaunchFailed,
			CliError::DataDir { .. } => ErrorCode::IoError,
			CliError::Anyhow(_) => ErrorCode::InternalError,
		};
		CommandError {
			code,
			message: self.to_string(),
		}
	}
}
