#[cfg(test)]
mod tests;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;
use crate::styles::cli_styles;

const APK_DIR_ENV: &str = "DROIDKEEP_APK_DIR";
const DEFAULT_APK_DIR: &str = "/apks";

/// Root CLI.
#[derive(Parser, Debug)]
#[command(name = "droidkeep")]
#[command(about = "Provision an Android emulator over adb and keep its apps running")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v debug, -vv trace)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format for the final report
	#[arg(short = 'f', long, global = true, value_enum, default_value = "text")]
	pub format: OutputFormat,

	#[command(flatten)]
	pub device: DeviceArgs,

	/// Defaults to `setup` when omitted.
	#[command(subcommand)]
	pub command: Option<Commands>,
}

impl Cli {
	/// The subcommand to run, with `setup` as the default.
	pub fn command_or_default(&self) -> Commands {
		self.command.clone().unwrap_or_else(|| Commands::Setup(SetupArgs::default()))
	}
}

/// How to reach the device and how long to wait for it.
#[derive(Args, Debug, Clone)]
pub struct DeviceArgs {
	/// Emulator host
	#[arg(long, global = true, env = "ADB_SERVER_ADDRESS", default_value = "android-emulator")]
	pub host: String,

	/// Emulator adb port
	#[arg(long, global = true, env = "ADB_SERVER_PORT", default_value_t = 5555)]
	pub port: u16,

	/// Path to the adb executable (searched for when omitted)
	#[arg(long, global = true, env = "ADB", value_name = "PATH")]
	pub adb: Option<PathBuf>,

	/// Scratch directory for logs
	#[arg(long, global = true, env = "DROIDKEEP_DATA_DIR", value_name = "DIR", default_value = "/tmp/game_data")]
	pub data_dir: PathBuf,

	/// Seconds to wait for the device to attach and boot
	#[arg(long, global = true, value_name = "SECS", default_value_t = 120)]
	pub max_wait: u32,

	/// Timeout for ordinary device commands, in seconds
	#[arg(long, global = true, value_name = "SECS", default_value_t = 30)]
	pub command_timeout: u64,

	/// Timeout for each APK install, in seconds
	#[arg(long, global = true, value_name = "SECS", default_value_t = 120)]
	pub install_timeout: u64,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
	/// Wait for the device, configure it, install APKs and launch the first app.
	Setup(SetupArgs),
	/// Wait for the device, then keep the given packages running.
	Monitor(MonitorArgs),
	/// List installed third-party packages.
	Packages,
	/// Launch one package.
	Launch {
		#[arg(value_name = "PACKAGE")]
		package: String,
	},
}

#[derive(Args, Debug, Clone)]
pub struct SetupArgs {
	/// Directory of .apk files to install
	#[arg(long, env = APK_DIR_ENV, value_name = "DIR", default_value = DEFAULT_APK_DIR)]
	pub apk_dir: PathBuf,

	/// Keep supervising installed apps after setup
	#[arg(long)]
	pub supervise: bool,

	/// Number of installed packages to supervise, in inventory order
	#[arg(long, value_name = "N", default_value_t = 3, requires = "supervise")]
	pub targets: usize,

	#[command(flatten)]
	pub timing: SupervisionArgs,
}

impl Default for SetupArgs {
	// Used when no subcommand is given, so clap never sees the env fallback.
	fn default() -> Self {
		Self {
			apk_dir: std::env::var_os(APK_DIR_ENV).map_or_else(|| PathBuf::from(DEFAULT_APK_DIR), PathBuf::from),
			supervise: false,
			targets: 3,
			timing: SupervisionArgs::default(),
		}
	}
}

#[derive(Args, Debug, Clone)]
pub struct MonitorArgs {
	/// Packages to keep alive, checked in this order
	#[arg(value_name = "PACKAGE", required = true)]
	pub packages: Vec<String>,

	#[command(flatten)]
	pub timing: SupervisionArgs,
}

/// Supervision cadence.
#[derive(Args, Debug, Clone)]
pub struct SupervisionArgs {
	/// Seconds between liveness checks
	#[arg(long, value_name = "SECS", default_value_t = 300)]
	pub interval: u64,

	/// Seconds to wait after relaunching an app
	#[arg(long, value_name = "SECS", default_value_t = 10)]
	pub grace: u64,

	/// Keepalive tap X coordinate
	#[arg(long, value_name = "PX", default_value_t = 500)]
	pub tap_x: u32,

	/// Keepalive tap Y coordinate
	#[arg(long, value_name = "PX", default_value_t = 500)]
	pub tap_y: u32,
}

impl Default for SupervisionArgs {
	fn default() -> Self {
		Self {
			interval: 300,
			grace: 10,
			tap_x: 500,
			tap_y: 500,
		}
	}
}
