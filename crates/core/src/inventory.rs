//! Installed application inventory.

use droidkeep_runtime::CommandExecutor;
use tracing::{debug, info};

use crate::device::Device;
use crate::package::PackageName;

const PACKAGE_PREFIX: &str = "package:";

/// Lists installed third-party packages (`pm list packages -3`).
///
/// A failed query and an empty device both yield an empty list.
pub async fn list_installed<E: CommandExecutor>(device: &Device<E>) -> Vec<PackageName> {
	let result = device.shell(&["pm", "list", "packages", "-3"]).await;
	let Some(output) = result.non_empty_output() else {
		debug!(target = "droidkeep", result = ?result, "no third-party packages reported");
		return Vec::new();
	};

	let packages = parse_package_list(output);
	info!(target = "droidkeep", count = packages.len(), "found installed packages");
	packages
}

/// Parses `pm list packages` output, one `package:<name>` per line.
pub fn parse_package_list(output: &str) -> Vec<PackageName> {
	output
		.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty())
		.map(|line| line.strip_prefix(PACKAGE_PREFIX).unwrap_or(line))
		.filter(|name| !name.is_empty())
		.map(PackageName::from)
		.collect()
}

#[cfg(test)]
mod tests {
	use droidkeep_runtime::{CommandResult, FailureReason};

	use super::*;
	use crate::testing::ScriptedExecutor;

	const LIST: &str = "shell pm list packages -3";

	#[test]
	fn strips_prefix_and_blank_lines() {
		let parsed = parse_package_list("package:com.idle.miner\n\npackage:com.tap.tycoon\r\n  \n");
		assert_eq!(parsed, vec![PackageName::from("com.idle.miner"), PackageName::from("com.tap.tycoon")]);
	}

	#[tokio::test]
	async fn lists_packages_in_device_order() {
		let device = ScriptedExecutor::new().into_device();
		device
			.executor()
			.respond(LIST, [CommandResult::success("package:b.second\npackage:a.first")]);

		let packages = list_installed(&device).await;
		assert_eq!(packages, vec![PackageName::from("b.second"), PackageName::from("a.first")]);
	}

	#[tokio::test]
	async fn failing_or_empty_query_is_empty() {
		let device = ScriptedExecutor::new().into_device();
		device.executor().respond(LIST, [CommandResult::failure(FailureReason::Timeout)]);
		assert!(list_installed(&device).await.is_empty());

		let device = ScriptedExecutor::new().into_device();
		device.executor().respond(LIST, [CommandResult::success("")]);
		assert!(list_installed(&device).await.is_empty());
	}
}
