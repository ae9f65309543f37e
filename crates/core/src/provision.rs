//! Device provisioning: idempotent settings and bulk APK installation.
//!
//! Both phases are best effort. A failed setting or a rejected APK is logged
//! and counted; neither phase aborts the other.

use std::path::{Path, PathBuf};

use droidkeep_runtime::{CommandExecutor, CommandResult, FailureReason};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::device::Device;

/// Settings applied before installing, in order. Each entry is a shell argv.
pub const DEVICE_SETTINGS: &[&[&str]] = &[
	&["svc", "power", "stayon", "true"],
	&["settings", "put", "global", "window_animation_scale", "0"],
	&["settings", "put", "global", "transition_animation_scale", "0"],
	&["settings", "put", "global", "animator_duration_scale", "0"],
	&["settings", "put", "global", "low_power", "0"],
	&["settings", "put", "global", "auto_update_enabled", "0"],
	&["input", "keyevent", "KEYCODE_WAKEUP"],
	&["input", "keyevent", "KEYCODE_MENU"],
];

/// Marker `adb install` prints once the package manager accepted the APK.
pub const INSTALL_SUCCESS_MARKER: &str = "Success";

const ARTIFACT_EXTENSION: &str = "apk";

/// Counts from the configuration phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfigureReport {
	pub applied: usize,
	pub failed: usize,
}

/// Counts from the install phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InstallSummary {
	pub installed: usize,
	pub total: usize,
}

/// Classification of one install attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
	Installed,
	/// The command ran but the output lacked the success marker.
	Rejected { output: String },
	CommandFailed(FailureReason),
	/// The artifact disappeared before it could be installed.
	Missing,
}

impl InstallOutcome {
	pub fn is_installed(&self) -> bool {
		matches!(self, InstallOutcome::Installed)
	}
}

/// Classifies an install command's result.
///
/// A zero exit status is not enough: the output must carry
/// [`INSTALL_SUCCESS_MARKER`].
pub fn interpret_install_result(result: &CommandResult) -> InstallOutcome {
	match result {
		CommandResult::Success(output) if output.contains(INSTALL_SUCCESS_MARKER) => InstallOutcome::Installed,
		CommandResult::Success(output) => InstallOutcome::Rejected { output: output.clone() },
		CommandResult::Failure(reason) => InstallOutcome::CommandFailed(*reason),
	}
}

/// Applies [`DEVICE_SETTINGS`] in order, continuing past failures.
pub async fn configure_device<E: CommandExecutor>(device: &Device<E>) -> ConfigureReport {
	info!(target = "droidkeep", device = %device.address(), "configuring device");

	let mut report = ConfigureReport::default();
	for setting in DEVICE_SETTINGS {
		match device.shell(setting).await {
			CommandResult::Success(_) => report.applied += 1,
			CommandResult::Failure(reason) => {
				warn!(target = "droidkeep", setting = %setting.join(" "), %reason, "device setting not applied");
				report.failed += 1;
			}
		}
	}

	info!(target = "droidkeep", applied = report.applied, failed = report.failed, "device configuration completed");
	report
}

/// Lists `*.apk` files directly inside `dir`, sorted by path.
///
/// A missing or unreadable directory yields an empty list.
pub fn find_artifacts(dir: &Path) -> Vec<PathBuf> {
	let pattern = format!("{}/*.{ARTIFACT_EXTENSION}", glob::Pattern::escape(&dir.to_string_lossy()));

	let mut artifacts: Vec<PathBuf> = match glob::glob(&pattern) {
		Ok(paths) => paths
			.filter_map(|entry| match entry {
				Ok(path) => Some(path),
				Err(err) => {
					warn!(target = "droidkeep", error = %err, "skipping unreadable artifact entry");
					None
				}
			})
			.filter(|path| path.is_file())
			.collect(),
		Err(err) => {
			error!(target = "droidkeep", %pattern, error = %err, "invalid artifact pattern");
			Vec::new()
		}
	};
	artifacts.sort();
	artifacts
}

/// Installs one artifact with the install timeout.
pub async fn install_artifact<E: CommandExecutor>(device: &Device<E>, artifact: &Path) -> InstallOutcome {
	let name = artifact.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();

	if !artifact.is_file() {
		error!(target = "droidkeep", artifact = %artifact.display(), "artifact not found");
		return InstallOutcome::Missing;
	}

	info!(target = "droidkeep", artifact = %name, "installing");
	let path = artifact.to_string_lossy();
	let result = device.run_with_timeout(&["install", "-r", &*path], device.timeouts().install).await;

	let outcome = interpret_install_result(&result);
	match &outcome {
		InstallOutcome::Installed => info!(target = "droidkeep", artifact = %name, "installed"),
		InstallOutcome::Rejected { output } => {
			error!(target = "droidkeep", artifact = %name, output = %output, "install output lacks success marker")
		}
		InstallOutcome::CommandFailed(reason) => error!(target = "droidkeep", artifact = %name, %reason, "install failed"),
		InstallOutcome::Missing => {}
	}
	outcome
}

/// Installs every APK in `dir`, one at a time.
///
/// An absent or empty directory is not an error; it yields `0/0`.
pub async fn install_all<E: CommandExecutor>(device: &Device<E>, dir: &Path) -> InstallSummary {
	if !dir.is_dir() {
		warn!(target = "droidkeep", dir = %dir.display(), "artifact directory not found");
		return InstallSummary::default();
	}

	let artifacts = find_artifacts(dir);
	if artifacts.is_empty() {
		info!(target = "droidkeep", dir = %dir.display(), "no APK files found to install");
		return InstallSummary::default();
	}

	let mut summary = InstallSummary {
		installed: 0,
		total: artifacts.len(),
	};
	for artifact in &artifacts {
		if install_artifact(device, artifact).await.is_installed() {
			summary.installed += 1;
		}
	}

	info!(target = "droidkeep", installed = summary.installed, total = summary.total, "install phase completed");
	summary
}

#[cfg(test)]
mod tests {
	use std::fs;

	use tempfile::TempDir;

	use super::*;
	use crate::testing::ScriptedExecutor;

	fn install_key(path: &Path) -> String {
		format!("install -r {}", path.display())
	}

	#[test]
	fn exit_zero_without_marker_is_not_installed() {
		let outcome = interpret_install_result(&CommandResult::success("Performing Streamed Install"));
		assert!(matches!(outcome, InstallOutcome::Rejected { .. }));

		let outcome = interpret_install_result(&CommandResult::success("Performing Streamed Install\nSuccess"));
		assert_eq!(outcome, InstallOutcome::Installed);

		let outcome = interpret_install_result(&CommandResult::failure(FailureReason::Timeout));
		assert_eq!(outcome, InstallOutcome::CommandFailed(FailureReason::Timeout));
	}

	#[tokio::test]
	async fn configuration_continues_past_failures() {
		let exec = ScriptedExecutor::new().with_fallback(CommandResult::success(""));
		exec.respond(
			"shell settings put global low_power 0",
			[CommandResult::failure(FailureReason::NonZeroExit)],
		);
		exec.respond("shell svc power stayon true", [CommandResult::failure(FailureReason::Timeout)]);
		let device = exec.into_device();

		let report = configure_device(&device).await;

		assert_eq!(report, ConfigureReport { applied: 6, failed: 2 });
		let calls = device.executor().calls();
		assert_eq!(calls.len(), DEVICE_SETTINGS.len());
		assert_eq!(calls.first().map(String::as_str), Some("shell svc power stayon true"));
		assert_eq!(calls.last().map(String::as_str), Some("shell input keyevent KEYCODE_MENU"));
	}

	#[tokio::test]
	async fn installed_count_matches_marker_bearing_results() {
		let temp = TempDir::new().unwrap();
		let names = ["a.apk", "b.apk", "c.apk", "d.apk"];
		for name in names {
			fs::write(temp.path().join(name), b"apk").unwrap();
		}
		fs::write(temp.path().join("notes.txt"), b"ignored").unwrap();

		let exec = ScriptedExecutor::new();
		exec.respond(&install_key(&temp.path().join("a.apk")), [CommandResult::success("Success")]);
		exec.respond(&install_key(&temp.path().join("b.apk")), [CommandResult::success("Failure [INSTALL_FAILED_INVALID_APK]")]);
		exec.respond(&install_key(&temp.path().join("c.apk")), [CommandResult::failure(FailureReason::NonZeroExit)]);
		exec.respond(&install_key(&temp.path().join("d.apk")), [CommandResult::success("Performing Streamed Install\nSuccess")]);
		let device = exec.into_device();

		let summary = install_all(&device, temp.path()).await;

		assert_eq!(summary, InstallSummary { installed: 2, total: 4 });
		assert_eq!(device.executor().count_prefix("install -r "), 4);
	}

	#[tokio::test]
	async fn missing_or_empty_directory_is_zero() {
		let temp = TempDir::new().unwrap();
		let device = ScriptedExecutor::new().into_device();

		assert_eq!(install_all(&device, temp.path()).await, InstallSummary::default());
		assert_eq!(install_all(&device, &temp.path().join("absent")).await, InstallSummary::default());
		assert!(device.executor().calls().is_empty());
	}

	#[test]
	fn artifacts_are_sorted_and_filtered_by_extension() {
		let temp = TempDir::new().unwrap();
		for name in ["zeta.apk", "alpha.apk", "readme.md"] {
			fs::write(temp.path().join(name), b"x").unwrap();
		}
		fs::create_dir(temp.path().join("dir.apk")).unwrap();

		let found: Vec<String> = find_artifacts(temp.path())
			.iter()
			.map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
			.collect();
		assert_eq!(found, vec!["alpha.apk", "zeta.apk"]);
	}
}
