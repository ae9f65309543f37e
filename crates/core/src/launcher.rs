//! Application launching.
//!
//! Entry points are resolved in two tiers. When the package declares a
//! `MAIN` activity, the concrete component is resolved and started with
//! `am start`. When that query finds nothing, a launcher intent is sent with
//! `monkey`, which needs no component name.

use std::sync::LazyLock;

use droidkeep_runtime::{CommandExecutor, CommandResult};
use regex::Regex;
use tracing::{error, info, warn};

use crate::device::Device;
use crate::error::LaunchError;
use crate::package::PackageName;

const LAUNCHER_CATEGORY: &str = "android.intent.category.LAUNCHER";

/// `package/Component` or `package/.Component`, as printed by `resolve-activity --brief`.
static COMPONENT_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*(\.[A-Za-z0-9_]+)*/\.?[A-Za-z_$][A-Za-z0-9_$]*(\.[A-Za-z_$][A-Za-z0-9_$]*)*$").unwrap());

/// How a successful launch was performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchMethod {
	/// Started the resolved component directly.
	Component(String),
	/// Sent a generic launcher intent.
	LauncherIntent,
}

/// Launches `package`, returning whether the launch went through.
///
/// Failures are logged, never propagated.
pub async fn launch<E: CommandExecutor>(device: &Device<E>, package: &PackageName) -> bool {
	match try_launch(device, package).await {
		Ok(method) => {
			info!(target = "droidkeep", %package, method = ?method, "launched");
			true
		}
		Err(err) => {
			error!(target = "droidkeep", %package, error = %err, "launch failed");
			false
		}
	}
}

/// Launches `package` and reports which tier did it.
///
/// # Errors
///
/// [`LaunchError::FallbackFailed`] when the launcher intent is rejected.
/// The other variants come from the component tier, which is not retried
/// through the fallback.
pub async fn try_launch<E: CommandExecutor>(device: &Device<E>, package: &PackageName) -> Result<LaunchMethod, LaunchError> {
	info!(target = "droidkeep", %package, "launching");

	let main_entry = device.shell(&["pm", "dump", package.as_str(), "|", "grep", "-A", "1", "MAIN"]).await;
	if main_entry.non_empty_output().is_none() {
		return launch_with_intent(device, package).await;
	}

	let component = resolve_component(device, package).await?;
	let started = device.shell(&["am", "start", "-n", component.as_str()]).await;
	match started {
		CommandResult::Success(_) => Ok(LaunchMethod::Component(component)),
		CommandResult::Failure(reason) => Err(LaunchError::StartFailed { component, reason }),
	}
}

async fn launch_with_intent<E: CommandExecutor>(device: &Device<E>, package: &PackageName) -> Result<LaunchMethod, LaunchError> {
	info!(target = "droidkeep", %package, "no MAIN entry found, sending launcher intent");

	match device.shell(&["monkey", "-p", package.as_str(), "-c", LAUNCHER_CATEGORY, "1"]).await {
		CommandResult::Success(_) => Ok(LaunchMethod::LauncherIntent),
		CommandResult::Failure(reason) => Err(LaunchError::FallbackFailed {
			package: package.clone(),
			reason,
		}),
	}
}

async fn resolve_component<E: CommandExecutor>(device: &Device<E>, package: &PackageName) -> Result<String, LaunchError> {
	let result = device
		.shell(&["cmd", "package", "resolve-activity", "--brief", package.as_str()])
		.await;

	let raw = result
		.non_empty_output()
		.and_then(|out| out.lines().map(str::trim).rev().find(|l| !l.is_empty()))
		.ok_or_else(|| LaunchError::Unresolved { package: package.clone() })?;

	parse_component(raw).ok_or_else(|| {
		warn!(target = "droidkeep", %package, raw, "resolve-activity returned an unexpected line");
		LaunchError::MalformedComponent {
			package: package.clone(),
			raw: raw.to_string(),
		}
	})
}

/// Validates a `package/Component` identifier.
pub fn parse_component(raw: &str) -> Option<String> {
	let raw = raw.trim();
	COMPONENT_RE.is_match(raw).then(|| raw.to_string())
}
