//! Emulator session lifecycle controller.
//!
//! Waits for an adb device to attach and finish booting, provisions it,
//! launches applications and keeps a set of them alive. All device access
//! goes through a [`Device`], which wraps a
//! [`droidkeep_runtime::CommandExecutor`] and issues one command at a time.

pub mod device;
pub mod error;
pub mod inventory;
pub mod launcher;
pub mod package;
pub mod provision;
pub mod readiness;
pub mod session;
pub mod supervisor;
pub mod testing;

#[cfg(test)]
mod log_capture;

pub use device::{Device, Timeouts};
pub use droidkeep_runtime::{CommandExecutor, CommandResult, DeviceAddress, FailureReason};
pub use error::{LaunchError, MonitorTargetFailure, ReadinessError};
pub use inventory::list_installed;
pub use launcher::{LaunchMethod, launch, try_launch};
pub use package::{PackageName, TargetSet};
pub use provision::{ConfigureReport, InstallOutcome, InstallSummary, configure_device, install_all, interpret_install_result};
pub use readiness::{ReadinessProber, ReadinessState};
pub use session::{LaunchReport, SetupOptions, SetupReport, run_setup};
pub use supervisor::{Supervisor, SupervisorConfig, SupervisorStats, TapPoint, TargetOutcome};
