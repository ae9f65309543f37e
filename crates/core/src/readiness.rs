//! Waiting for a device to attach and finish booting.
//!
//! The prober connects once, then polls `get-state` and
//! `sys.boot_completed` until both report ready or the wait budget runs out.
//! Running out is fatal to the whole run.

use std::time::Duration;

use droidkeep_runtime::CommandExecutor;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::device::{Device, sleep_or_cancel};
use crate::error::ReadinessError;

/// `get-state` output for an attached, usable device.
const ATTACHED_STATE: &str = "device";
const BOOT_COMPLETED_PROP: &str = "sys.boot_completed";
const PROGRESS_EVERY: u32 = 10;

/// Where the prober is in the readiness sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessState {
	Disconnected,
	Connecting,
	WaitingForDeviceState,
	WaitingForBootCompletion,
	Ready,
	TimedOut,
}

/// Polls a device until it is attached and booted.
#[derive(Debug, Clone)]
pub struct ReadinessProber {
	max_wait: u32,
	poll_interval: Duration,
	state: ReadinessState,
}

impl ReadinessProber {
	/// Creates a prober that gives up after `max_wait` one-second polls.
	pub fn new(max_wait: u32) -> Self {
		Self {
			max_wait,
			poll_interval: Duration::from_secs(1),
			state: ReadinessState::Disconnected,
		}
	}

	pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
		self.poll_interval = poll_interval;
		self
	}

	pub fn state(&self) -> ReadinessState {
		self.state
	}

	fn transition(&mut self, next: ReadinessState) {
		if self.state != next {
			debug!(target = "droidkeep", from = ?self.state, to = ?next, "readiness transition");
			self.state = next;
		}
	}

	/// Waits until the device is ready.
	///
	/// Returns the number of poll iterations used, starting at 1.
	///
	/// # Errors
	///
	/// [`ReadinessError::TimedOut`] once `max_wait` polls pass without the
	/// device reporting both `device` state and completed boot.
	/// [`ReadinessError::Cancelled`] if `cancel` fires during a poll sleep.
	pub async fn wait_until_ready<E: CommandExecutor>(
		&mut self,
		device: &Device<E>,
		cancel: &CancellationToken,
	) -> Result<u32, ReadinessError> {
		info!(target = "droidkeep", device = %device.address(), max_wait = self.max_wait, "waiting for device");

		self.transition(ReadinessState::Connecting);
		let connect = device.connect().await;
		debug!(target = "droidkeep", result = ?connect, "connect issued");

		for attempt in 0..self.max_wait {
			self.transition(ReadinessState::WaitingForDeviceState);
			if device.run(&["get-state"]).await.output() == Some(ATTACHED_STATE) {
				self.transition(ReadinessState::WaitingForBootCompletion);
				if device.shell(&["getprop", BOOT_COMPLETED_PROP]).await.output() == Some("1") {
					self.transition(ReadinessState::Ready);
					info!(target = "droidkeep", device = %device.address(), attempts = attempt + 1, "device is ready");
					return Ok(attempt + 1);
				}
			}

			if sleep_or_cancel(self.poll_interval, cancel).await {
				return Err(ReadinessError::Cancelled);
			}
			if attempt % PROGRESS_EVERY == 0 {
				info!(target = "droidkeep", attempt, max_wait = self.max_wait, state = ?self.state, "still waiting for device");
			}
		}

		self.transition(ReadinessState::TimedOut);
		error!(target = "droidkeep", device = %device.address(), max_wait = self.max_wait, "device did not become ready in time");
		Err(ReadinessError::TimedOut { waited: self.max_wait })
	}
}
