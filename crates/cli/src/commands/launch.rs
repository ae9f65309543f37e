use droidkeep::{CommandExecutor, Device, PackageName, launch};
use tokio_util::sync::CancellationToken;

use super::{emit, wait_ready};
use crate::config::AppConfig;
use crate::error::{CliError, Result};
use crate::output::{LaunchData, OutputFormat};

pub async fn execute<E: CommandExecutor>(
	device: &Device<E>,
	config: &AppConfig,
	package: &str,
	format: OutputFormat,
	cancel: &CancellationToken,
) -> Result<()> {
	let package = PackageName::from(package);
	if package.as_str().trim().is_empty() {
		return Err(CliError::Config("package name is empty".into()));
	}

	wait_ready(device, config, cancel).await?;
	let launched = launch(device, &package).await;

	emit(
		"launch",
		LaunchData {
			package: package.clone(),
			launched,
		},
		format,
	);
	if launched { Ok(()) } else { Err(CliError::LaunchFailed(package.to_string())) }
}
