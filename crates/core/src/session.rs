//! The one-shot setup sequence.
//!
//! Ready → configure → install → inventory → launch the first package. Only
//! the readiness wait can fail the run; every later step degrades to a log
//! line and a count in the [`SetupReport`].

use std::path::PathBuf;
use std::time::Duration;

use droidkeep_runtime::CommandExecutor;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::device::Device;
use crate::error::ReadinessError;
use crate::inventory::list_installed;
use crate::launcher;
use crate::package::PackageName;
use crate::provision::{ConfigureReport, InstallSummary, configure_device, install_all};
use crate::readiness::ReadinessProber;

#[derive(Debug, Clone)]
pub struct SetupOptions {
	/// Directory holding the `.apk` files to install.
	pub apk_dir: PathBuf,
	/// Readiness budget in poll iterations.
	pub max_wait: u32,
	pub poll_interval: Duration,
}

impl Default for SetupOptions {
	fn default() -> Self {
		Self {
			apk_dir: PathBuf::from("/apks"),
			max_wait: 120,
			poll_interval: Duration::from_secs(1),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchReport {
	pub package: PackageName,
	pub launched: bool,
}

/// Summary of a completed setup run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupReport {
	pub device: String,
	pub ready_after: u32,
	pub configuration: ConfigureReport,
	pub install: InstallSummary,
	pub packages: Vec<PackageName>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub launch: Option<LaunchReport>,
}

/// Runs the setup sequence against `device`.
///
/// # Errors
///
/// Returns [`ReadinessError`] if the device never becomes ready. Nothing
/// after the readiness wait can fail the run.
pub async fn run_setup<E: CommandExecutor>(
	device: &Device<E>,
	options: &SetupOptions,
	cancel: &CancellationToken,
) -> Result<SetupReport, ReadinessError> {
	let mut prober = ReadinessProber::new(options.max_wait).with_poll_interval(options.poll_interval);
	let ready_after = prober.wait_until_ready(device, cancel).await?;

	let configuration = configure_device(device).await;
	let install = install_all(device, &options.apk_dir).await;
	let packages = list_installed(device).await;

	let launch = match packages.first() {
		Some(first) => {
			let launched = launcher::launch(device, first).await;
			Some(LaunchReport {
				package: first.clone(),
				launched,
			})
		}
		None => None,
	};

	info!(target = "droidkeep", device = %device.address(), packages = packages.len(), "setup completed");
	Ok(SetupReport {
		device: device.address().to_string(),
		ready_after,
		configuration,
		install,
		packages,
		launch,
	})
}
