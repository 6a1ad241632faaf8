// file: src/main.rs
// version: 1.0.0
// guid: 17c4a9f3-6e82-4d01-95b7-d30f28e6c514

//! AML Submit Agent - Main entry point

use aml_submit_agent::{
    cli::{
        args::{Cli, Commands},
        commands::*,
    },
    launcher::LaunchSpec,
    logging::logger,
    Result,
};
use clap::Parser;
use tokio::signal;
use tracing::warn;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    logger::init_logger(cli.verbose, cli.quiet)?;

    let command_future = async {
        match cli.command {
            Commands::Submit { config, dry_run } => submit_command(&config, dry_run).await,
            Commands::Launch {
                workdir,
                sas,
                data_dir,
                data_subdir,
                setup,
                script,
                print_only,
            } => {
                let spec = LaunchSpec {
                    workdir,
                    sas,
                    data_dir,
                    data_subdir,
                    setup: vec![setup],
                    script: vec![script],
                };
                launch_command(&spec, print_only)
            }
            Commands::Sync { config } => sync_command(&config).await,
            Commands::Validate { config } => validate_command(&config),
        }
    };

    tokio::select! {
        result = command_future => result,
        _ = signal::ctrl_c() => {
            warn!("Application interrupted by user");
            std::process::exit(130); // Standard exit code for Ctrl+C
        }
    }
}
