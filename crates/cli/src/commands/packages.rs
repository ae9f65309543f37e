use droidkeep::{CommandExecutor, Device, list_installed};
use tokio_util::sync::CancellationToken;

use super::{emit, wait_ready};
use crate::config::AppConfig;
use crate::error::Result;
use crate::output::{OutputFormat, PackagesData};

pub async fn execute<E: CommandExecutor>(
	device: &Device<E>,
	config: &AppConfig,
	format: OutputFormat,
	cancel: &CancellationToken,
) -> Result<()> {
	wait_ready(device, config, cancel).await?;
	let packages = list_installed(device).await;

	emit(
		"packages",
		PackagesData {
			device: device.address().to_string(),
			packages,
		},
		format,
	);
	Ok(())
}
