use clap::Parser;
use droidkeep_cli::cli::Cli;
use droidkeep_cli::commands;
use droidkeep_cli::config::AppConfig;
use droidkeep_cli::error::CliError;
use droidkeep_cli::logging;
use droidkeep_cli::output::{self, CommandReport, OutputFormat, PackagesData, ReportBuilder};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	let format = cli.format;

	if let Err(err) = run(cli).await {
		handle_error(&err, format);
		std::process::exit(err.exit_code());
	}
}

async fn run(cli: Cli) -> Result<(), CliError> {
	let config = AppConfig::from_args(&cli.device)?;
	config.prepare_data_dir()?;
	logging::init_logging(cli.verbose, Some(&config.log_file()))?;
	info!(target = "droidkeep", device = %config.device, log_file = %config.log_file().display(), "starting");

	let cancel = CancellationToken::new();
	let on_signal = cancel.clone();
	tokio::spawn(async move {
		if tokio::signal::ctrl_c().await.is_ok() {
			warn!(target = "droidkeep", "interrupt received, shutting down");
			on_signal.cancel();
		}
	});

	commands::dispatch(cli, &config, cancel).await
}

fn handle_error(err: &CliError, format: OutputFormat) {
	let cmd_error = err.to_command_error();
	output::print_error_stderr(&cmd_error);

	if format == OutputFormat::Json {
		// data type is irrelevant for a failed report
		let report: CommandReport<PackagesData> = ReportBuilder::new("droidkeep")
			.error(cmd_error.code, &cmd_error.message)
			.build();
		output::print_report(&report, format);
	}
}
