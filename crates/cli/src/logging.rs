use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Installs the global subscriber: timestamped, leveled lines to stderr and,
/// when given, appended to `log_file`.
///
/// Logs stay off stdout, which carries only the final report, so
/// `--format json` output can be piped straight into a JSON parser.
pub fn init_logging(verbosity: u8, log_file: Option<&Path>) -> anyhow::Result<()> {
	// 0 = info (progress of the run)
	// 1 (-v) = debug for droidkeep, info for everything else
	// 2+ (-vv) = trace for everything
	let filter = match verbosity {
		0 => "info",
		1 => "info,droidkeep=debug",
		_ => "trace",
	};

	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

	let stderr_layer = tracing_subscriber::fmt::layer()
		.with_writer(std::io::stderr)
		.with_target(true)
		.with_level(true)
		.compact();

	let file_layer = match log_file {
		Some(path) => {
			let file = OpenOptions::new()
				.create(true)
				.append(true)
				.open(path)
				.with_context(|| format!("cannot open log file {}", path.display()))?;
			Some(
				tracing_subscriber::fmt::layer()
					.with_writer(Mutex::new(file))
					.with_ansi(false)
					.with_target(true)
					.with_level(true),
			)
		}
		None => None,
	};

	tracing_subscriber::registry()
		.with(env_filter)
		.with(stderr_layer)
		.with(file_layer)
		.try_init()
		.context("a global logger is already installed")?;
	Ok(())
}
