//! Error types for the lifecycle controller.
//!
//! Only [`ReadinessError`] is fatal to a run. Launch and monitoring failures
//! are reported, logged and absorbed by their callers.

use thiserror::Error;

use crate::FailureReason;
use crate::package::PackageName;

/// The device never became usable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReadinessError {
	#[error("device did not become ready within {waited} attempts")]
	TimedOut { waited: u32 },

	#[error("readiness wait cancelled")]
	Cancelled,
}

/// A launch attempt failed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LaunchError {
	/// The generic launcher-intent fallback itself failed.
	#[error("launcher intent for {package} failed: {reason}")]
	FallbackFailed { package: PackageName, reason: FailureReason },

	/// Resolving the concrete entry point failed or printed nothing.
	#[error("could not resolve an entry point for {package}")]
	Unresolved { package: PackageName },

	/// The resolved entry point did not look like `package/component`.
	#[error("resolved entry point for {package} is malformed: {raw:?}")]
	MalformedComponent { package: PackageName, raw: String },

	/// `am start` for the resolved component failed.
	#[error("starting {component} failed: {reason}")]
	StartFailed { component: String, reason: FailureReason },
}

/// Processing one supervised target failed for this cycle.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MonitorTargetFailure {
	#[error("keepalive tap for {package} failed: {reason}")]
	Keepalive { package: PackageName, reason: FailureReason },
}
