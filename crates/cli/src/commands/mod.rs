mod launch;
mod monitor;
mod packages;
mod setup;

use std::time::Duration;

use droidkeep::{CommandExecutor, Device, ReadinessProber};
use droidkeep_runtime::{AdbExecutor, locate_adb};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use crate::error::Result;
use crate::output::OutputFormat;

const POLL_INTERVAL: Duration = Duration::from_secs(1);

pub async fn dispatch(cli: Cli, config: &AppConfig, cancel: CancellationToken) -> Result<()> {
	let device = connect_device(config)?;
	let format = cli.format;

	match cli.command_or_default() {
		Commands::Setup(args) => setup::execute(&device, config, &args, format, &cancel).await,
		Commands::Monitor(args) => monitor::execute(&device, config, &args, format, &cancel).await,
		Commands::Packages => packages::execute(&device, config, format, &cancel).await,
		Commands::Launch { package } => launch::execute(&device, config, &package, format, &cancel).await,
	}
}

/// Builds the adb-backed device. Nothing is sent to it yet.
fn connect_device(config: &AppConfig) -> Result<Device<AdbExecutor>> {
	let adb = locate_adb(config.adb.as_deref())?;
	debug!(target = "droidkeep", adb = %adb.display(), device = %config.device, "using adb");
	Ok(Device::new(AdbExecutor::new(adb), config.device.clone(), config.timeouts))
}

/// Readiness gate shared by the commands that skip full setup.
async fn wait_ready<E: CommandExecutor>(device: &Device<E>, config: &AppConfig, cancel: &CancellationToken) -> Result<u32> {
	let mut prober = ReadinessProber::new(config.max_wait).with_poll_interval(POLL_INTERVAL);
	Ok(prober.wait_until_ready(device, cancel).await?)
}

/// Prints `data` as a successful `command` report.
fn emit<T: serde::Serialize + crate::output::RenderText>(command: &str, data: T, format: OutputFormat) {
	let report = crate::output::ReportBuilder::new(command).data(data).build();
	crate::output::print_report(&report, format);
}

#[cfg(test)]
pub(crate) mod test_support {
	use std::path::PathBuf;
	use std::time::Duration;

	use droidkeep::testing::ScriptedExecutor;
	use droidkeep::{CommandResult, Device, DeviceAddress, Timeouts};

	use crate::config::AppConfig;

	pub fn config(max_wait: u32) -> AppConfig {
		AppConfig {
			device: DeviceAddress::new("emulator.test", 5555),
			adb: None,
			data_dir: PathBuf::from("/tmp/droidkeep-test"),
			max_wait,
			timeouts: Timeouts {
				command: Duration::from_secs(30),
				install: Duration::from_secs(120),
				connect: Duration::from_secs(30),
			},
		}
	}

	pub fn ready_device() -> Device<ScriptedExecutor> {
		let exec = ScriptedExecutor::new();
		exec.respond("get-state", [CommandResult::success("device")]);
		exec.respond("shell getprop sys.boot_completed", [CommandResult::success("1")]);
		exec.into_device()
	}
}
