//! Keeping a fixed set of applications alive.
//!
//! Each cycle walks the [`TargetSet`] in order: relaunch the package if it
//! has no live process, then send one keepalive tap. A failure on one target
//! is logged and the loop moves on. The loop runs until its
//! [`CancellationToken`] fires.

use std::time::Duration;

use droidkeep_runtime::{CommandExecutor, CommandResult, FailureReason};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::device::{Device, sleep_or_cancel};
use crate::error::MonitorTargetFailure;
use crate::launcher;
use crate::package::{PackageName, TargetSet};

/// Screen coordinate for the keepalive tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapPoint {
	pub x: u32,
	pub y: u32,
}

impl Default for TapPoint {
	fn default() -> Self {
		Self { x: 500, y: 500 }
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorConfig {
	/// Pause between cycles.
	pub check_interval: Duration,
	/// Pause after a relaunch before touching the screen.
	pub grace_period: Duration,
	pub tap: TapPoint,
}

impl Default for SupervisorConfig {
	fn default() -> Self {
		Self {
			check_interval: Duration::from_secs(300),
			grace_period: Duration::from_secs(10),
			tap: TapPoint::default(),
		}
	}
}

/// What happened to one target in one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetOutcome {
	/// A live process was found.
	Alive,
	/// No live process was found and one launch was attempted.
	Relaunched { launched: bool },
	/// Cancellation arrived mid-target.
	Interrupted,
}

/// Totals reported when the loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SupervisorStats {
	pub cycles: u64,
	pub relaunches: u64,
	pub failures: u64,
}

/// Periodic liveness supervisor for a [`TargetSet`].
pub struct Supervisor<'d, E> {
	device: &'d Device<E>,
	targets: TargetSet,
	config: SupervisorConfig,
}

impl<'d, E: CommandExecutor> Supervisor<'d, E> {
	pub fn new(device: &'d Device<E>, targets: TargetSet, config: SupervisorConfig) -> Self {
		Self { device, targets, config }
	}

	pub fn targets(&self) -> &TargetSet {
		&self.targets
	}

	/// Runs cycles until `cancel` fires.
	///
	/// Cancellation is observed before every cycle and target and during
	/// every sleep.
	pub async fn run(&self, cancel: &CancellationToken) -> SupervisorStats {
		info!(target = "droidkeep", targets = %self.targets, interval_s = self.config.check_interval.as_secs(), "starting supervision");

		let mut stats = SupervisorStats::default();
		while !cancel.is_cancelled() {
			self.run_cycle(cancel, &mut stats).await;
			stats.cycles += 1;

			if sleep_or_cancel(self.config.check_interval, cancel).await {
				break;
			}
		}

		info!(
			target = "droidkeep",
			cycles = stats.cycles,
			relaunches = stats.relaunches,
			failures = stats.failures,
			"supervision stopped"
		);
		stats
	}

	async fn run_cycle(&self, cancel: &CancellationToken, stats: &mut SupervisorStats) {
		for package in self.targets.iter() {
			if cancel.is_cancelled() {
				return;
			}
			match self.check_target(package, cancel).await {
				Ok(TargetOutcome::Relaunched { .. }) => stats.relaunches += 1,
				Ok(_) => {}
				Err(err) => {
					warn!(target = "droidkeep", %package, error = %err, "monitoring target failed");
					stats.failures += 1;
				}
			}
		}
	}

	/// Processes one target: relaunch if dead, then tap.
	///
	/// # Errors
	///
	/// [`MonitorTargetFailure::Keepalive`] when the tap failed.
	pub async fn check_target(&self, package: &PackageName, cancel: &CancellationToken) -> Result<TargetOutcome, MonitorTargetFailure> {
		let outcome = if self.is_running(package).await {
			debug!(target = "droidkeep", %package, "process alive");
			TargetOutcome::Alive
		} else {
			info!(target = "droidkeep", %package, "not running, restarting");
			let launched = launcher::launch(self.device, package).await;
			if sleep_or_cancel(self.config.grace_period, cancel).await {
				return Ok(TargetOutcome::Interrupted);
			}
			TargetOutcome::Relaunched { launched }
		};

		self.keepalive_tap(package).await?;
		Ok(outcome)
	}

	/// A process exists iff `pidof` prints something.
	///
	/// Any failed query counts as not running, so the target is relaunched
	/// and still tapped.
	async fn is_running(&self, package: &PackageName) -> bool {
		match self.device.shell(&["pidof", package.as_str()]).await {
			CommandResult::Success(pids) => !pids.is_empty(),
			// pidof exits 1 when nothing matches
			CommandResult::Failure(FailureReason::NonZeroExit) => false,
			CommandResult::Failure(reason) => {
				warn!(target = "droidkeep", %package, %reason, "process query failed, treating as not running");
				false
			}
		}
	}

	async fn keepalive_tap(&self, package: &PackageName) -> Result<(), MonitorTargetFailure> {
		let x = self.config.tap.x.to_string();
		let y = self.config.tap.y.to_string();
		match self.device.shell(&["input", "tap", x.as_str(), y.as_str()]).await {
			CommandResult::Success(_) => Ok(()),
			CommandResult::Failure(reason) => Err(MonitorTargetFailure::Keepalive {
				package: package.clone(),
				reason,
			}),
		}
	}
}
