use droidkeep::{CommandExecutor, Device, PackageName, Supervisor, TargetSet};
use tokio_util::sync::CancellationToken;

use super::{emit, wait_ready};
use crate::cli::MonitorArgs;
use crate::config::{AppConfig, supervisor_config};
use crate::error::Result;
use crate::output::{MonitorData, OutputFormat};

pub async fn execute<E: CommandExecutor>(
	device: &Device<E>,
	config: &AppConfig,
	args: &MonitorArgs,
	format: OutputFormat,
	cancel: &CancellationToken,
) -> Result<()> {
	wait_ready(device, config, cancel).await?;

	let targets = TargetSet::new(args.packages.iter().map(|p| PackageName::from(p.as_str())));
	let supervisor = Supervisor::new(device, targets, supervisor_config(&args.timing));
	let stats = supervisor.run(cancel).await;

	emit("monitor", MonitorData::new(supervisor.targets().iter().cloned().collect(), stats), format);
	Ok(())
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use droidkeep::CommandResult;

	use super::*;
	use crate::cli::SupervisionArgs;
	use crate::commands::test_support::{config, ready_device};

	#[tokio::test(start_paused = true)]
	async fn runs_until_cancelled() {
		let device = ready_device();
		let exec = device.executor();
		exec.respond("shell pidof com.alive", [CommandResult::success("12")]);
		exec.respond("shell input tap 1 2", [CommandResult::success("")]);

		let args = MonitorArgs {
			packages: vec!["com.alive".into()],
			timing: SupervisionArgs {
				interval: 60,
				grace: 1,
				tap_x: 1,
				tap_y: 2,
			},
		};
		let cancel = CancellationToken::new();
		let stop = cancel.clone();
		tokio::spawn(async move {
			tokio::time::sleep(Duration::from_secs(150)).await;
			stop.cancel();
		});

		execute(&device, &config(5), &args, OutputFormat::Json, &cancel).await.unwrap();
		// cycles at roughly t=0, 60 and 120
		assert_eq!(exec.count("shell pidof com.alive"), 3);
		assert_eq!(exec.count("shell input tap 1 2"), 3);
	}
}
