//! Error types for the device runtime.
//!
//! Command failures are not errors here; they are [`crate::CommandResult`]
//! values. These variants cover configuration and startup problems only.

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur before any device command is issued.
#[derive(Debug, Error)]
pub enum Error {
	/// The adb binary could not be located.
	#[error("adb executable not found. Install the Android platform-tools or set ADB to its path.")]
	AdbNotFound,

	/// A configured adb path does not point at a runnable file.
	#[error("adb executable at '{0}' is not usable")]
	AdbNotUsable(String),

	/// A device address string could not be parsed.
	#[error("invalid device address '{input}': {reason}")]
	InvalidAddress { input: String, reason: &'static str },
}
