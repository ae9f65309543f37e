use std::path::PathBuf;

use clap::Parser;

use super::*;
use crate::output::OutputFormat;

#[test]
fn no_subcommand_defaults_to_setup() {
	let cli = Cli::try_parse_from(["droidkeep"]).unwrap();

	assert!(cli.command.is_none());
	match cli.command_or_default() {
		Commands::Setup(args) => {
			assert!(!args.supervise);
			assert_eq!(args.targets, 3);
			assert_eq!(args.timing.interval, 300);
		}
		_ => panic!("Expected Setup command"),
	}
	assert_eq!(cli.format, OutputFormat::Text);
}

#[test]
fn device_flags_override_defaults() {
	let cli = Cli::try_parse_from([
		"droidkeep",
		"--host",
		"10.0.2.2",
		"--port",
		"5557",
		"--max-wait",
		"30",
		"packages",
	])
	.unwrap();

	assert_eq!(cli.device.host, "10.0.2.2");
	assert_eq!(cli.device.port, 5557);
	assert_eq!(cli.device.max_wait, 30);
	assert!(matches!(cli.command, Some(Commands::Packages)));
}

#[test]
fn global_device_flags_after_subcommand() {
	let cli = Cli::try_parse_from(["droidkeep", "launch", "com.idle.miner", "--port", "5556", "-vv"]).unwrap();

	assert_eq!(cli.device.port, 5556);
	assert_eq!(cli.verbose, 2);
	match cli.command {
		Some(Commands::Launch { package }) => assert_eq!(package, "com.idle.miner"),
		_ => panic!("Expected Launch command"),
	}
}

#[test]
fn setup_with_supervision() {
	let cli = Cli::try_parse_from([
		"droidkeep",
		"-f",
		"json",
		"setup",
		"--apk-dir",
		"/data/apks",
		"--supervise",
		"--targets",
		"2",
		"--interval",
		"60",
	])
	.unwrap();

	assert_eq!(cli.format, OutputFormat::Json);
	match cli.command {
		Some(Commands::Setup(args)) => {
			assert_eq!(args.apk_dir, PathBuf::from("/data/apks"));
			assert!(args.supervise);
			assert_eq!(args.targets, 2);
			assert_eq!(args.timing.interval, 60);
			assert_eq!(args.timing.grace, 10);
		}
		_ => panic!("Expected Setup command"),
	}
}

#[test]
fn targets_requires_supervise() {
	assert!(Cli::try_parse_from(["droidkeep", "setup", "--targets", "2"]).is_err());
}

#[test]
fn monitor_requires_packages() {
	assert!(Cli::try_parse_from(["droidkeep", "monitor"]).is_err());

	let cli = Cli::try_parse_from(["droidkeep", "monitor", "a.one", "b.two", "--tap-x", "100"]).unwrap();
	match cli.command {
		Some(Commands::Monitor(args)) => {
			assert_eq!(args.packages, vec!["a.one", "b.two"]);
			assert_eq!(args.timing.tap_x, 100);
			assert_eq!(args.timing.tap_y, 500);
		}
		_ => panic!("Expected Monitor command"),
	}
}
