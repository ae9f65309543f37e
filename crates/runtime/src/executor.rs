//! The command executor seam.
//!
//! [`CommandExecutor`] is the only way the rest of the workspace reaches a
//! device. [`AdbExecutor`] implements it by spawning the adb binary; tests
//! substitute scripted implementations.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::address::DeviceAddress;
use crate::result::{CommandResult, FailureReason};

/// Issues single commands against one addressed device.
///
/// Implementations never retry and never return errors: every outcome is a
/// [`CommandResult`].
#[async_trait]
pub trait CommandExecutor: Send + Sync {
	/// Runs `argv` against exactly `device`, bounded by `timeout`.
	async fn execute(&self, device: &DeviceAddress, argv: &[String], timeout: Duration) -> CommandResult;

	/// Asks the bridge to attach to `device`.
	///
	/// Unlike [`CommandExecutor::execute`] this does not select a device,
	/// since the device may not be known to the bridge yet.
	async fn connect(&self, device: &DeviceAddress, timeout: Duration) -> CommandResult;
}

#[async_trait]
impl<T: CommandExecutor + ?Sized> CommandExecutor for &T {
	async fn execute(&self, device: &DeviceAddress, argv: &[String], timeout: Duration) -> CommandResult {
		(**self).execute(device, argv, timeout).await
	}

	async fn connect(&self, device: &DeviceAddress, timeout: Duration) -> CommandResult {
		(**self).connect(device, timeout).await
	}
}

/// Executor backed by the adb command-line client.
#[derive(Debug, Clone)]
pub struct AdbExecutor {
	program: PathBuf,
}

impl AdbExecutor {
	pub fn new(program: impl Into<PathBuf>) -> Self {
		Self { program: program.into() }
	}

	pub fn program(&self) -> &Path {
		&self.program
	}

	async fn run(&self, args: Vec<String>, timeout: Duration) -> CommandResult {
		info!(
			target = "droidkeep",
			command = %format_command(&self.program, &args),
			timeout_s = timeout.as_secs_f64(),
			"running"
		);

		let mut cmd = Command::new(&self.program);
		cmd.args(&args)
			.stdin(Stdio::null())
			.stdout(Stdio::piped())
			.stderr(Stdio::piped())
			.kill_on_drop(true);

		let child = match cmd.spawn() {
			Ok(child) => child,
			Err(err) => {
				error!(target = "droidkeep", program = %self.program.display(), error = %err, "failed to start adb");
				return CommandResult::failure(FailureReason::TransportError);
			}
		};

		// Dropping the output future on timeout kills the child.
		let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
			Ok(Ok(output)) => output,
			Ok(Err(err)) => {
				error!(target = "droidkeep", error = %err, "failed waiting for adb");
				return CommandResult::failure(FailureReason::TransportError);
			}
			Err(_) => {
				error!(target = "droidkeep", timeout_s = timeout.as_secs_f64(), "adb command timed out");
				return CommandResult::failure(FailureReason::Timeout);
			}
		};

		if output.status.success() {
			let stdout = String::from_utf8_lossy(&output.stdout);
			debug!(target = "droidkeep", bytes = output.stdout.len(), "adb command succeeded");
			return CommandResult::success(stdout.trim());
		}

		let stderr = String::from_utf8_lossy(&output.stderr);
		warn!(
			target = "droidkeep",
			status = %output.status,
			stderr = %stderr.trim(),
			"adb command failed"
		);
		CommandResult::failure(FailureReason::NonZeroExit)
	}
}

#[async_trait]
impl CommandExecutor for AdbExecutor {
	async fn execute(&self, device: &DeviceAddress, argv: &[String], timeout: Duration) -> CommandResult {
		let mut args = Vec::with_capacity(argv.len() + 2);
		args.push("-s".to_string());
		args.push(device.selector());
		args.extend(argv.iter().cloned());
		self.run(args, timeout).await
	}

	async fn connect(&self, device: &DeviceAddress, timeout: Duration) -> CommandResult {
		self.run(vec!["connect".to_string(), device.selector()], timeout).await
	}
}

fn format_command(program: &Path, args: &[String]) -> String {
	let mut line = program.display().to_string();
	for arg in args {
		line.push(' ');
		line.push_str(arg);
	}
	line
}

#[cfg(all(test, unix))]
mod tests {
	use std::fs;
	use std::os::unix::fs::PermissionsExt;
	use std::time::Instant;

	use tempfile::TempDir;

	use super::*;
	use crate::log_capture::CapturedLogs;

	/// Writes a stand-in for adb that drops `-s <addr>` and runs the rest.
	fn write_passthrough_adb(dir: &Path) -> PathBuf {
		let path = dir.join("adb");
		let script = "#!/bin/sh\nif [ \"$1\" = \"-s\" ]; then\n  echo \"selected $2\" >&2\n  shift 2\nfi\nexec \"$@\"\n";
		fs::write(&path, script).unwrap();
		let mut perms = fs::metadata(&path).unwrap().permissions();
		perms.set_mode(0o755);
		fs::set_permissions(&path, perms).unwrap();
		path
	}

	fn argv(parts: &[&str]) -> Vec<String> {
		parts.iter().map(|s| s.to_string()).collect()
	}

	fn device() -> DeviceAddress {
		DeviceAddress::new("emulator-host", 5555)
	}

	#[tokio::test]
	async fn success_returns_trimmed_stdout() {
		let temp = TempDir::new().unwrap();
		let exec = AdbExecutor::new(write_passthrough_adb(temp.path()));

		let result = exec
			.execute(&device(), &argv(&["printf", "  device\\n\\n"]), Duration::from_secs(5))
			.await;
		assert_eq!(result, CommandResult::success("device"));
	}

	#[tokio::test]
	async fn device_selector_is_prepended() {
		let temp = TempDir::new().unwrap();
		let adb = temp.path().join("adb");
		fs::write(&adb, "#!/bin/sh\necho \"$@\"\n").unwrap();
		let mut perms = fs::metadata(&adb).unwrap().permissions();
		perms.set_mode(0o755);
		fs::set_permissions(&adb, perms).unwrap();
		let exec = AdbExecutor::new(&adb);

		let result = exec.execute(&device(), &argv(&["get-state"]), Duration::from_secs(5)).await;
		assert_eq!(result, CommandResult::success("-s emulator-host:5555 get-state"));

		let result = exec.connect(&device(), Duration::from_secs(5)).await;
		assert_eq!(result, CommandResult::success("connect emulator-host:5555"));
	}

	#[tokio::test]
	async fn non_zero_exit_is_reported() {
		let temp = TempDir::new().unwrap();
		let exec = AdbExecutor::new(write_passthrough_adb(temp.path()));

		let result = exec
			.execute(&device(), &argv(&["sh", "-c", "echo oops >&2; exit 3"]), Duration::from_secs(5))
			.await;
		assert_eq!(result, CommandResult::failure(FailureReason::NonZeroExit));
	}

	#[tokio::test]
	async fn timeout_is_bounded() {
		let temp = TempDir::new().unwrap();
		let exec = AdbExecutor::new(write_passthrough_adb(temp.path()));

		let started = Instant::now();
		let result = exec.execute(&device(), &argv(&["sleep", "5"]), Duration::from_millis(200)).await;

		assert_eq!(result, CommandResult::failure(FailureReason::Timeout));
		assert!(started.elapsed() < Duration::from_secs(2), "took {:?}", started.elapsed());
	}

	#[tokio::test]
	async fn command_is_logged_before_it_times_out() {
		let temp = TempDir::new().unwrap();
		let exec = AdbExecutor::new(write_passthrough_adb(temp.path()));
		let logs = CapturedLogs::default();
		let _guard = logs.install();

		let result = exec.execute(&device(), &argv(&["sleep", "5"]), Duration::from_millis(200)).await;
		assert_eq!(result, CommandResult::failure(FailureReason::Timeout));

		let contents = logs.contents();
		let running = contents
			.find("-s emulator-host:5555 sleep 5")
			.expect("full argv should be logged");
		let timed_out = contents.find("adb command timed out").expect("timeout should be logged");
		assert!(running < timed_out, "argv must be logged before the outcome:\n{contents}");
		assert_eq!(logs.lines_with(" running").len(), 1);
	}

	#[tokio::test]
	async fn missing_program_is_a_transport_error() {
		let temp = TempDir::new().unwrap();
		let exec = AdbExecutor::new(temp.path().join("no-such-adb"));

		let result = exec.execute(&device(), &argv(&["get-state"]), Duration::from_secs(5)).await;
		assert_eq!(result, CommandResult::failure(FailureReason::TransportError));
	}
}
