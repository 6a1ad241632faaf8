// file: src/cli/commands.rs
// version: 1.0.0
// guid: 62d7f091-c438-4ab5-9e02-17f86b4d5c20

//! Command implementations for the CLI

use crate::{
    azure::{self, RestClient},
    config::loader::ConfigLoader,
    launcher::{self, LaunchSpec},
    script::SystemShell,
    storage::{azcopy, SasUrl},
    sweep, Result,
};
use tracing::{info, warn};

/// Submit the configured job(s) to the cluster
pub async fn submit_command(config_path: &str, dry_run: bool) -> Result<()> {
    let loader = ConfigLoader::new();
    let config = loader.load_job_config(config_path)?;

    let jobs = sweep::expand(&config)?;
    if jobs.len() > 1 {
        info!("Sweep expanded into {} jobs", jobs.len());
    }

    if config.experiment.sync_code {
        if dry_run {
            info!("DRY RUN: Would synchronize code to blob storage");
        } else {
            sync_code(&config).await?;
        }
    }

    if dry_run {
        for job in &jobs {
            let spec = azure::JobSpec::build(job)?;
            println!("{}", spec.to_yaml()?);
        }
        info!("DRY RUN: {} job(s) not submitted", jobs.len());
        return Ok(());
    }

    if config.experiment.needs_storage() {
        let client = RestClient::connect().await?;
        azure::datastore::register(&client, &config.cluster, &config.storage).await?;
    }

    for (idx, job) in jobs.iter().enumerate() {
        let spec = azure::JobSpec::build(job)?;
        let submitted = azure::job::submit(&spec, job).await?;
        info!(
            "({}/{}) Submitted job '{}'",
            idx + 1,
            jobs.len(),
            submitted.display_name
        );
        match &submitted.studio_url {
            Some(url) => info!("Studio: {}", url),
            None => warn!("No studio URL returned for '{}'", submitted.name),
        }
    }

    Ok(())
}

/// Run the entry sequence on the compute node
pub fn launch_command(spec: &LaunchSpec, print_only: bool) -> Result<()> {
    let code = launcher::run(spec, &mut SystemShell, print_only)?;
    if code != 0 {
        warn!("Entry sequence exited with code {}", code);
        // The launcher's exit status is the shell's exit status.
        std::process::exit(code);
    }
    Ok(())
}

/// Synchronize local code to blob storage
pub async fn sync_command(config_path: &str) -> Result<()> {
    let loader = ConfigLoader::new();
    let config = loader.load_job_config(config_path)?;
    sync_code(&config).await
}

/// Validate a job configuration and report the resolved summary
pub fn validate_command(config_path: &str) -> Result<()> {
    let loader = ConfigLoader::new();
    let config = loader.load_job_config(config_path)?;

    info!("Configuration is valid");
    info!(
        "Cluster: {} ({} x {}, {} tier)",
        config.cluster.virtual_cluster,
        config.cluster.node_count,
        config.cluster.instance_type,
        config.cluster.sla_tier.as_str()
    );
    info!(
        "Experiment: {} (workdir {})",
        config.experiment.name, config.experiment.workdir
    );

    let jobs = sweep::expand(&config)?;
    info!("Would submit {} job(s)", jobs.len());
    Ok(())
}

async fn sync_code(config: &crate::config::JobConfig) -> Result<()> {
    let sas = SasUrl::parse(&config.storage.sas_token)?;
    let destination = sas.join(&format!("{}/", config.experiment.workdir));
    let source = std::env::current_dir()?;
    azcopy::sync_code(&source, &destination, &config.experiment.ignore_dir).await
}
