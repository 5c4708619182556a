mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need the fleet service
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "fleetwatch", &mut std::io::stdout());
            Ok(())
        }

        Command::Vehicles(args) => {
            let fleet = config::resolve_fleet_config(&cli.global)?;
            tracing::debug!(api_url = %fleet.api_url, "dispatching vehicles command");
            commands::vehicles::handle(fleet, args, &cli.global).await
        }

        Command::Stats => {
            let fleet = config::resolve_fleet_config(&cli.global)?;
            commands::stats::handle(fleet, &cli.global).await
        }

        Command::Watch(args) => {
            let fleet = config::resolve_fleet_config(&cli.global)?;
            tracing::debug!(api_url = %fleet.api_url, ws_url = %fleet.ws_url, "starting watch");
            commands::watch::handle(fleet, args, &cli.global).await
        }
    }
}
