//! Device addressing.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Host and port of one remote adb device.
///
/// Built once from configuration and never mutated. Displays as the
/// `host:port` selector adb expects after `-s` and `connect`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceAddress {
	host: String,
	port: u16,
}

impl DeviceAddress {
	pub fn new(host: impl Into<String>, port: u16) -> Self {
		Self { host: host.into(), port }
	}

	pub fn host(&self) -> &str {
		&self.host
	}

	pub fn port(&self) -> u16 {
		self.port
	}

	/// Returns the `host:port` selector string.
	pub fn selector(&self) -> String {
		self.to_string()
	}
}

impl fmt::Display for DeviceAddress {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.host, self.port)
	}
}

impl FromStr for DeviceAddress {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let invalid = |reason| Error::InvalidAddress {
			input: s.to_string(),
			reason,
		};

		let (host, port) = s.rsplit_once(':').ok_or_else(|| invalid("expected host:port"))?;
		if host.is_empty() {
			return Err(invalid("host is empty"));
		}
		let port = port.parse::<u16>().map_err(|_| invalid("port is not a number between 0 and 65535"))?;

		Ok(Self::new(host, port))
	}
}
