//! Immutable run configuration.
//!
//! Built once from the parsed CLI (flags with environment fallbacks) and
//! passed by reference from there on. Nothing below `main` reads the
//! environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use droidkeep::{DeviceAddress, SupervisorConfig, TapPoint, Timeouts};
use tracing::warn;

use crate::cli::{DeviceArgs, SupervisionArgs};
use crate::error::{CliError, Result};

const LOG_FILE_NAME: &str = "automation.log";

#[derive(Debug, Clone)]
pub struct AppConfig {
	pub device: DeviceAddress,
	pub adb: Option<PathBuf>,
	pub data_dir: PathBuf,
	pub max_wait: u32,
	pub timeouts: Timeouts,
}

impl AppConfig {
	pub fn from_args(args: &DeviceArgs) -> Result<Self> {
		if args.host.trim().is_empty() {
			return Err(CliError::Config("device host is empty".into()));
		}
		if args.port == 0 {
			return Err(CliError::Config("device port must be non-zero".into()));
		}
		if args.command_timeout == 0 || args.install_timeout == 0 {
			return Err(CliError::Config("timeouts must be at least one second".into()));
		}
		if args.install_timeout < args.command_timeout {
			warn!(
				target = "droidkeep",
				install_timeout = args.install_timeout,
				command_timeout = args.command_timeout,
				"install timeout is shorter than the command timeout"
			);
		}

		Ok(Self {
			device: DeviceAddress::new(args.host.trim(), args.port),
			adb: args.adb.clone(),
			data_dir: args.data_dir.clone(),
			max_wait: args.max_wait,
			timeouts: Timeouts {
				command: Duration::from_secs(args.command_timeout),
				install: Duration::from_secs(args.install_timeout),
				connect: Duration::from_secs(args.command_timeout),
			},
		})
	}

	pub fn log_file(&self) -> PathBuf {
		self.data_dir.join(LOG_FILE_NAME)
	}

	/// Creates the scratch directory if it does not exist yet.
	pub fn prepare_data_dir(&self) -> Result<&Path> {
		std::fs::create_dir_all(&self.data_dir).map_err(|source| CliError::DataDir {
			path: self.data_dir.clone(),
			source,
		})?;
		Ok(&self.data_dir)
	}
}

pub fn supervisor_config(args: &SupervisionArgs) -> SupervisorConfig {
	SupervisorConfig {
		check_interval: Duration::from_secs(args.interval),
		grace_period: Duration::from_secs(args.grace),
		tap: TapPoint {
			x: args.tap_x,
			y: args.tap_y,
		},
	}
}
