//! adb executable discovery.
//!
//! Locates the `adb` binary the executor shells out to, in this order:
//! 1. An explicit path (the `--adb` flag or `ADB` environment variable)
//! 2. `$ANDROID_HOME/platform-tools/adb`
//! 3. `$ANDROID_SDK_ROOT/platform-tools/adb`
//! 4. `adb` on `PATH`

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::error::{Error, Result};

const SDK_ROOT_VARS: [&str; 2] = ["ANDROID_HOME", "ANDROID_SDK_ROOT"];

/// Returns the path of a runnable adb executable.
///
/// # Errors
///
/// Returns [`Error::AdbNotUsable`] if `explicit` is given but cannot run, and
/// [`Error::AdbNotFound`] if no candidate is found.
pub fn locate_adb(explicit: Option<&Path>) -> Result<PathBuf> {
	locate_adb_with(explicit, |key| std::env::var(key).ok(), || which::which(adb_file_name()).ok())
}

fn locate_adb_with<E, W>(explicit: Option<&Path>, env: E, on_path: W) -> Result<PathBuf>
where
	E: Fn(&str) -> Option<String>,
	W: FnOnce() -> Option<PathBuf>,
{
	if let Some(path) = explicit {
		if adb_is_usable(path) {
			return Ok(path.to_path_buf());
		}
		return Err(Error::AdbNotUsable(path.display().to_string()));
	}

	for var in SDK_ROOT_VARS {
		let Some(root) = env(var) else { continue };
		let candidate = PathBuf::from(root).join("platform-tools").join(adb_file_name());
		debug!(target = "droidkeep", source = var, path = %candidate.display(), "adb candidate");
		if candidate.is_file() {
			return Ok(candidate);
		}
		warn!(target = "droidkeep", source = var, path = %candidate.display(), "SDK root set but adb is missing");
	}

	on_path().ok_or(Error::AdbNotFound)
}

fn adb_file_name() -> &'static str {
	if cfg!(windows) { "adb.exe" } else { "adb" }
}

fn adb_is_usable(adb: &Path) -> bool {
	Command::new(adb)
		.arg("version")
		.stdin(Stdio::null())
		.stdout(Stdio::null())
		.stderr(Stdio::null())
		.status()
		.map(|status| status.success())
		.unwrap_or(false)
}
