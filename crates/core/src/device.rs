//! A single addressed device and the executor that reaches it.

use std::time::Duration;

use droidkeep_runtime::{CommandExecutor, CommandResult, DeviceAddress};
use tokio_util::sync::CancellationToken;

/// Per-command time budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
	/// Ordinary queries and settings commands.
	pub command: Duration,
	/// Package installs, which are I/O heavy.
	pub install: Duration,
	/// The initial `adb connect`.
	pub connect: Duration,
}

impl Default for Timeouts {
	fn default() -> Self {
		Self {
			command: Duration::from_secs(30),
			install: Duration::from_secs(120),
			connect: Duration::from_secs(30),
		}
	}
}

/// An executor bound to one [`DeviceAddress`].
///
/// Methods take `&self` and await each command to completion, so commands
/// reach the device strictly one after another.
#[derive(Debug)]
pub struct Device<E> {
	executor: E,
	address: DeviceAddress,
	timeouts: Timeouts,
}

impl<E: CommandExecutor> Device<E> {
	pub fn new(executor: E, address: DeviceAddress, timeouts: Timeouts) -> Self {
		Self {
			executor,
			address,
			timeouts,
		}
	}

	pub fn address(&self) -> &DeviceAddress {
		&self.address
	}

	pub fn timeouts(&self) -> &Timeouts {
		&self.timeouts
	}

	pub fn executor(&self) -> &E {
		&self.executor
	}

	/// Runs `argv` with the ordinary command timeout.
	pub async fn run(&self, argv: &[&str]) -> CommandResult {
		self.run_with_timeout(argv, self.timeouts.command).await
	}

	pub async fn run_with_timeout(&self, argv: &[&str], timeout: Duration) -> CommandResult {
		let argv: Vec<String> = argv.iter().map(|s| s.to_string()).collect();
		self.executor.execute(&self.address, &argv, timeout).await
	}

	/// Runs `adb shell <args>`.
	pub async fn shell(&self, args: &[&str]) -> CommandResult {
		let mut argv = Vec::with_capacity(args.len() + 1);
		argv.push("shell");
		argv.extend_from_slice(args);
		self.run(&argv).await
	}

	pub async fn connect(&self) -> CommandResult {
		self.executor.connect(&self.address, self.timeouts.connect).await
	}
}

/// Sleeps for `duration` unless `cancel` fires first.
///
/// Returns `true` if the sleep was cut short by cancellation.
pub(crate) async fn sleep_or_cancel(duration: Duration, cancel: &CancellationToken) -> bool {
	tokio::select! {
		_ = cancel.cancelled() => true,
		_ = tokio::time::sleep(duration) => false,
	}
}
