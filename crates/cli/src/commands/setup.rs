use droidkeep::{CommandExecutor, Device, SetupOptions, Supervisor, TargetSet, run_setup};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{POLL_INTERVAL, emit};
use crate::cli::SetupArgs;
use crate::config::{AppConfig, supervisor_config};
use crate::error::Result;
use crate::output::{MonitorData, OutputFormat, SetupAndMonitorData};

pub async fn execute<E: CommandExecutor>(
	device: &Device<E>,
	config: &AppConfig,
	args: &SetupArgs,
	format: OutputFormat,
	cancel: &CancellationToken,
) -> Result<()> {
	let options = SetupOptions {
		apk_dir: args.apk_dir.clone(),
		max_wait: config.max_wait,
		poll_interval: POLL_INTERVAL,
	};
	let report = run_setup(device, &options, cancel).await?;

	if !args.supervise {
		emit("setup", report, format);
		return Ok(());
	}

	let targets = TargetSet::first_n(&report.packages, args.targets);
	let monitor = if targets.is_empty() {
		warn!(target = "droidkeep", "no installed packages to supervise");
		None
	} else {
		info!(target = "droidkeep", targets = %targets, "supervising installed packages");
		let supervisor = Supervisor::new(device, targets, supervisor_config(&args.timing));
		let stats = supervisor.run(cancel).await;
		Some(MonitorData::new(supervisor.targets().iter().cloned().collect(), stats))
	};

	emit("setup", SetupAndMonitorData { setup: report, monitor }, format);
	Ok(())
}
