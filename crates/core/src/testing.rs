//! Test doubles for driving the controller without a device.
//!
//! [`ScriptedExecutor`] answers commands from per-command response queues and
//! records every call for later assertion.
//!
//! # Example
//!
//! ```ignore
//! use droidkeep::testing::ScriptedExecutor;
//! use droidkeep::CommandResult;
//!
//! let exec = ScriptedExecutor::new();
//! exec.respond("get-state", [CommandResult::success("offline"), CommandResult::success("device")]);
//! exec.respond("shell getprop sys.boot_completed", [CommandResult::success("1")]);
//! ```

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use droidkeep_runtime::{CommandExecutor, CommandResult, DeviceAddress, FailureReason};
use parking_lot::Mutex;

use crate::device::{Device, Timeouts};

#[derive(Debug, Default)]
struct Script {
	responses: HashMap<String, VecDeque<CommandResult>>,
	calls: Vec<String>,
	connects: usize,
}

/// In-memory [`CommandExecutor`] with scripted responses.
///
/// Responses are keyed by the space-joined argv (without the device
/// selector). Each key holds a queue; the last response in a queue repeats
/// forever. Unscripted commands get the fallback response, which defaults to
/// a non-zero exit.
#[derive(Debug)]
pub struct ScriptedExecutor {
	script: Mutex<Script>,
	fallback: CommandResult,
	connect_result: CommandResult,
}

impl Default for ScriptedExecutor {
	fn default() -> Self {
		Self::new()
	}
}

impl ScriptedExecutor {
	pub fn new() -> Self {
		Self {
			script: Mutex::new(Script::default()),
			fallback: CommandResult::failure(FailureReason::NonZeroExit),
			connect_result: CommandResult::success("already connected"),
		}
	}

	/// Sets the response for commands with no script.
	pub fn with_fallback(mut self, fallback: CommandResult) -> Self {
		self.fallback = fallback;
		self
	}

	pub fn with_connect_result(mut self, result: CommandResult) -> Self {
		self.connect_result = result;
		self
	}

	/// Queues `responses` for the command `key`, appending to any existing queue.
	pub fn respond(&self, key: &str, responses: impl IntoIterator<Item = CommandResult>) {
		self.script
			.lock()
			.responses
			.entry(key.to_string())
			.or_default()
			.extend(responses);
	}

	/// Every command executed so far, in order.
	pub fn calls(&self) -> Vec<String> {
		self.script.lock().calls.clone()
	}

	/// How many times `key` was executed.
	pub fn count(&self, key: &str) -> usize {
		self.script.lock().calls.iter().filter(|c| c.as_str() == key).count()
	}

	/// How many executed commands start with `prefix`.
	pub fn count_prefix(&self, prefix: &str) -> usize {
		self.script.lock().calls.iter().filter(|c| c.starts_with(prefix)).count()
	}

	pub fn connects(&self) -> usize {
		self.script.lock().connects
	}

	/// Wraps this executor in a [`Device`] with default timeouts.
	pub fn into_device(self) -> Device<Self> {
		Device::new(self, DeviceAddress::new("emulator.test", 5555), Timeouts::default())
	}
}

#[async_trait]
impl CommandExecutor for ScriptedExecutor {
	async fn execute(&self, _device: &DeviceAddress, argv: &[String], _timeout: Duration) -> CommandResult {
		let key = argv.join(" ");
		let mut script = self.script.lock();
		script.calls.push(key.clone());

		match script.responses.get_mut(&key) {
			Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_else(|| self.fallback.clone()),
			Some(queue) => queue.front().cloned().unwrap_or_else(|| self.fallback.clone()),
			None => self.fallback.clone(),
		}
	}

	async fn connect(&self, _device: &DeviceAddress, _timeout: Duration) -> CommandResult {
		self.script.lock().connects += 1;
		self.connect_result.clone()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn last_response_repeats_and_calls_are_recorded() {
		let device = ScriptedExecutor::new().into_device();
		device
			.executor()
			.respond("get-state", [CommandResult::success("offline"), CommandResult::success("device")]);

		assert_eq!(device.run(&["get-state"]).await, CommandResult::success("offline"));
		assert_eq!(device.run(&["get-state"]).await, CommandResult::success("device"));
		assert_eq!(device.run(&["get-state"]).await, CommandResult::success("device"));
		assert_eq!(
			device.shell(&["getprop", "x"]).await,
			CommandResult::failure(FailureReason::NonZeroExit)
		);

		let exec = device.executor();
		assert_eq!(exec.count("get-state"), 3);
		assert_eq!(exec.count_prefix("shell "), 1);
		assert_eq!(exec.calls().last().map(String::as_str), Some("shell getprop x"));
	}
}
