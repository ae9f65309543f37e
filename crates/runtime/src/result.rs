//! Command outcomes.

use std::fmt;

/// Why a device command did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
	/// The command did not finish within its timeout and was killed.
	Timeout,
	/// The command ran and exited with a non-zero status.
	NonZeroExit,
	/// The command could not be started or the transport broke.
	TransportError,
}

impl fmt::Display for FailureReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			FailureReason::Timeout => "timeout",
			FailureReason::NonZeroExit => "non-zero exit",
			FailureReason::TransportError => "transport error",
		};
		f.write_str(s)
	}
}

/// Outcome of one command against the device.
///
/// Produced and consumed within a single call; never an `Err` past the
/// executor boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
	/// Exit status 0, with trimmed stdout.
	Success(String),
	Failure(FailureReason),
}

impl CommandResult {
	pub fn success(output: impl Into<String>) -> Self {
		CommandResult::Success(output.into())
	}

	pub fn failure(reason: FailureReason) -> Self {
		CommandResult::Failure(reason)
	}

	pub fn is_success(&self) -> bool {
		matches!(self, CommandResult::Success(_))
	}

	/// Returns the captured output on success.
	pub fn output(&self) -> Option<&str> {
		match self {
			CommandResult::Success(out) => Some(out.as_str()),
			CommandResult::Failure(_) => None,
		}
	}

	/// Returns the output only when it is non-empty.
	///
	/// Most device queries treat "succeeded but printed nothing" the same as
	/// a failure.
	pub fn non_empty_output(&self) -> Option<&str> {
		self.output().filter(|out| !out.is_empty())
	}

	pub fn failure_reason(&self) -> Option<FailureReason> {
		match self {
			CommandResult::Success(_) => None,
			CommandResult::Failure(reason) => Some(*reason),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn non_empty_output_filters_blank_success() {
		assert_eq!(CommandResult::success("").non_empty_output(), None);
		assert_eq!(CommandResult::success("1234").non_empty_output(), Some("1234"));
		assert_eq!(CommandResult::failure(FailureReason::NonZeroExit).non_empty_output(), None);
	}

	#[test]
	fn failure_reason_only_on_failure() {
		assert_eq!(CommandResult::success("ok").failure_reason(), None);
		assert_eq!(
			CommandResult::failure(FailureReason::Timeout).failure_reason(),
			Some(FailureReason::Timeout)
		);
	}
}
