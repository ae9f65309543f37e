//! Application identifiers.

use std::fmt;

use serde::Serialize;

/// An Android package name such as `com.example.game`.
///
/// Treated as opaque: it is never parsed, only passed back to the device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PackageName(String);

impl PackageName {
	pub fn new(name: impl Into<String>) -> Self {
		Self(name.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for PackageName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for PackageName {
	fn from(name: &str) -> Self {
		Self::new(name)
	}
}

impl From<String> for PackageName {
	fn from(name: String) -> Self {
		Self(name)
	}
}

/// Ordered packages under supervision. Fixed once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSet(Vec<PackageName>);

impl TargetSet {
	pub fn new(targets: impl IntoIterator<Item = PackageName>) -> Self {
		Self(targets.into_iter().collect())
	}

	/// Takes the first `limit` packages, keeping their order.
	pub fn first_n(packages: &[PackageName], limit: usize) -> Self {
		Self(packages.iter().take(limit).cloned().collect())
	}

	pub fn iter(&self) -> impl Iterator<Item = &PackageName> {
		self.0.iter()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Display for TargetSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, pkg) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			f.write_str(pkg.as_str())?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn first_n_keeps_order_and_caps_length() {
		let pkgs: Vec<PackageName> = ["a.one", "b.two", "c.three", "d.four"].into_iter().map(PackageName::from).collect();
		let targets = TargetSet::first_n(&pkgs, 3);
		assert_eq!(targets.len(), 3);
		assert_eq!(targets.to_string(), "a.one, b.two, c.three");

		assert_eq!(TargetSet::first_n(&pkgs[..1], 3).len(), 1);
	}
}
