//! Command execution against a single adb-addressed device.
//!
//! Everything above this crate talks to the device through
//! [`CommandExecutor`]. Results never escape as errors: a command either
//! produced output or failed for one of the reasons in [`FailureReason`].

pub mod address;
pub mod driver;
pub mod error;
pub mod executor;
pub mod result;

#[cfg(test)]
mod log_capture;

pub use address::DeviceAddress;
pub use driver::locate_adb;
pub use error::{Error, Result};
pub use executor::{AdbExecutor, CommandExecutor};
pub use result::{CommandResult, FailureReason};
