// file: src/cli/args.rs
// version: 1.0.0
// guid: b03c59e7-16f4-4d82-a6b9-e74d20c81f35

//! Command line argument definitions

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "aml-submit-agent")]
#[command(about = "Submit ML training jobs to Azure ML Singularity clusters")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Submit the configured job(s) to the cluster
    Submit {
        #[arg(short, long, help = "Job configuration JSON file")]
        config: String,

        #[arg(long, help = "Show what would be submitted without submitting")]
        dry_run: bool,
    },

    /// Run the entry sequence on the compute node
    Launch {
        #[arg(short, long, default_value = "", help = "The working directory")]
        workdir: String,

        #[arg(long, default_value = "", help = "Container SAS URL for data copy")]
        sas: String,

        #[arg(long, default_value = "", help = "The data directory")]
        data_dir: String,

        #[arg(long, default_value = "", help = "The data subdirectory filter")]
        data_subdir: String,

        #[arg(long, default_value = "", help = "The setup command")]
        setup: String,

        #[arg(long, help = "The training command")]
        script: String,

        #[arg(long, help = "Print the joined script without executing it")]
        print_only: bool,
    },

    /// Synchronize local code to blob storage
    Sync {
        #[arg(short, long, help = "Job configuration JSON file")]
        config: String,
    },

    /// Validate a job configuration
    Validate {
        #[arg(short, long, help = "Job configuration JSON file")]
        config: String,
    },
}
