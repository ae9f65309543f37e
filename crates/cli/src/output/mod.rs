//! Final report rendering.
//!
//! Progress goes through `tracing`; this module prints the one report a
//! command produces when it finishes. `json` wraps the data in a small
//! envelope for machine consumers:
//!
//! ```json
//! {
//!   "ok": true,
//!   "command": "setup",
//!   "data": { ... },
//!   "timings": { "durationMs": 1234 }
//! }
//! ```


use std::fmt::Write as _;
use std::time::{Duration, Instant};

use colored::Colorize;
use droidkeep::{PackageName, SetupReport, SupervisorStats};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text
	#[default]
	Text,
	/// JSON envelope
	Json,
}

/// Report envelope printed once per command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandReport<T: Serialize> {
	pub ok: bool,
	pub command: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<CommandError>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub timings: Option<Timings>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandError {
	pub code: ErrorCode,
	pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	/// The device never attached or finished booting.
	DeviceNotReady,
	/// Interrupted before completion.
	Cancelled,
	/// adb could not be found or run.
	AdbUnavailable,
	InvalidInput,
	LaunchFailed,
	IoError,
	InternalError,
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let code = match self {
			ErrorCode::DeviceNotReady => "DEVICE_NOT_READY",
			ErrorCode::Cancelled => "CANCELLED",
			ErrorCode::AdbUnavailable => "ADB_UNAVAILABLE",
			ErrorCode::InvalidInput => "INVALID_INPUT",
			ErrorCode::LaunchFailed => "LAUNCH_FAILED",
			ErrorCode::IoError => "IO_ERROR",
			ErrorCode::InternalError => "INTERNAL_ERROR",
		};
		f.write_str(code)
	}
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timings {
	pub duration_ms: u64,
}

impl From<Duration> for Timings {
	fn from(duration: Duration) -> Self {
		Timings {
			duration_ms: duration.as_millis() as u64,
		}
	}
}

/// Builder for [`CommandReport`], timing from construction.
#[derive(Debug)]
pub struct ReportBuilder<T: Serialize> {
	command: String,
	data: Option<T>,
	error: Option<CommandError>,
	start: Instant,
}

impl<T: Serialize> ReportBuilder<T> {
	pub fn new(command: impl Into<String>) -> Self {
		Self {
			command: command.into(),
			data: None,
			error: None,
			start: Instant::now(),
		}
	}

	pub fn data(mut self, data: T) -> Self {
		self.data = Some(data);
		self
	}

	pub fn error(mut self, code: ErrorCode, message: impl Into<String>) -> Self {
		self.error = Some(CommandError {
			code,
			message: message.into(),
		});
		self
	}

	pub fn build(self) -> CommandReport<T> {
		CommandReport {
			ok: self.error.is_none() && self.data.is_some(),
			command: self.command,
			data: self.data,
			error: self.error,
			timings: Some(Timings::from(self.start.elapsed())),
		}
	}
}

/// Data that knows how to print itself for humans.
pub trait RenderText {
	fn render_text(&self) -> String;
}

/// Prints `report` to stdout in `format`.
pub fn print_report<T: Serialize + RenderText>(report: &CommandReport<T>, format: OutputFormat) {
	match format {
		OutputFormat::Json => {
			if let Ok(json) = serde_json::to_string_pretty(report) {
				println!("{json}");
			}
		}
		OutputFormat::Text => print!("{}", render_report_text(report)),
	}
}

fn render_report_text<T: Serialize + RenderText>(report: &CommandReport<T>) -> String {
	let mut out = String::new();
	if let Some(data) = &report.data {
		out.push_str(&data.render_text());
	}
	if let Some(error) = &report.error {
		let _ = writeln!(out, "{} [{}]: {}", "Error".red().bold(), error.code, error.message);
	}
	out
}

pub fn print_error_stderr(error: &CommandError) {
	eprintln!("{} [{}]: {}", "Error".red().bold(), error.code, error.message);
}

fn check(ok: bool) -> colored::ColoredString {
	if ok { "ok".green() } else { "failed".red() }
}

impl RenderText for SetupReport {
	fn render_text(&self) -> String {
		let mut out = String::new();
		let _ = writeln!(out, "{} {}", "Device".bold(), self.device);
		let _ = writeln!(out, "  ready after     {} polls", self.ready_after);
		let _ = writeln!(
			out,
			"  settings        {} applied, {} failed",
			self.configuration.applied, self.configuration.failed
		);
		let _ = writeln!(
			out,
			"  installed       {}/{}",
			self.install.installed, self.install.total
		);
		let _ = writeln!(out, "  packages        {}", self.packages.len());
		for package in &self.packages {
			let _ = writeln!(out, "    {package}");
		}
		match &self.launch {
			Some(launch) => {
				let _ = writeln!(out, "  launch          {} {}", launch.package, check(launch.launched));
			}
			None => {
				let _ = writeln!(out, "  launch          {}", "nothing to launch".dimmed());
			}
		}
		out
	}
}

/// Installed third-party packages.
#[derive(Debug, Clone, Serialize)]
pub struct PackagesData {
	pub device: String,
	pub packages: Vec<PackageName>,
}

impl RenderText for PackagesData {
	fn render_text(&self) -> String {
		if self.packages.is_empty() {
			return format!("{}\n", "No third-party packages installed".dimmed());
		}
		self.packages.iter().map(|p| format!("{p}\n")).collect()
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct LaunchData {
	pub package: PackageName,
	pub launched: bool,
}

impl RenderText for LaunchData {
	fn render_text(&self) -> String {
		format!("{} {}\n", self.package, check(self.launched))
	}
}

/// Totals from a supervision run.
#[derive(Debug, Clone, Serialize)]
pub struct MonitorData {
	pub targets: Vec<PackageName>,
	pub cycles: u64,
	pub relaunches: u64,
	pub failures: u64,
}

impl MonitorData {
	pub fn new(targets: Vec<PackageName>, stats: SupervisorStats) -> Self {
		Self {
			targets,
			cycles: stats.cycles,
			relaunches: stats.relaunches,
			failures: stats.failures,
		}
	}
}

impl RenderText for MonitorData {
	fn render_text(&self) -> String {
		format!(
			"{} {} cycles, {} relaunches, {} failures\n",
			"Supervision stopped:".bold(),
			self.cycles,
			self.relaunches,
			self.failures
		)
	}
}

/// Setup followed by supervision.
#[derive(Debug, Clone, Serialize)]
pub struct SetupAndMonitorData {
	pub setup: SetupReport,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub monitor: Option<MonitorData>,
}

impl RenderText for SetupAndMonitorData {
	fn render_text(&self) -> String {
		let mut out = self.setup.render_text();
		if let Some(monitor) = &self.monitor {
			out.push_str(&monitor.render_text());
		}
		out
	}
}
