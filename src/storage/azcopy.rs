// file: src/storage/azcopy.rs
// version: 1.0.0
// guid: 6e83b1d9-0a47-4c52-9f68-b2d5c70e94a1

//! azcopy invocations for code synchronization

use crate::script::mask_credentials;
use crate::{error::SubmitAgentError, Result};
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, error, info};

/// Paths excluded from every code sync
const ALWAYS_EXCLUDED: &str = ".git";

/// Synchronize a local working tree to a SAS-addressed blob destination.
///
/// `destination` carries the full SAS token; only the masked form reaches the
/// log.
pub async fn sync_code(source_dir: &Path, destination: &str, ignore_dir: &str) -> Result<()> {
    let source = format!("{}/*", source_dir.display());
    let exclude = if ignore_dir.is_empty() {
        ALWAYS_EXCLUDED.to_string()
    } else {
        format!("{};{}", ALWAYS_EXCLUDED, ignore_dir)
    };

    let args = vec![
        "copy".to_string(),
        source,
        destination.to_string(),
        "--recursive".to_string(),
        "--exclude-path".to_string(),
        exclude,
    ];

    info!(
        "Synchronizing code: azcopy {}",
        mask_credentials(&args.join(" "))
    );
    run_azcopy(&args).await
}

async fn run_azcopy(args: &[String]) -> Result<()> {
    let output = Command::new("azcopy")
        .args(args)
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SubmitAgentError::storage("azcopy not found on PATH")
            } else {
                SubmitAgentError::ProcessError {
                    command: "azcopy".to_string(),
                    exit_code: None,
                    stderr: format!("Failed to execute command: {}", e),
                }
            }
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    debug!("azcopy stdout: {}", stdout);

    // Known failure signatures surface as typed errors before the generic
    // exit-code check.
    if stdout.contains("Authentication failed") {
        error!("azcopy authentication failed");
        return Err(SubmitAgentError::storage("SAS authentication failed"));
    }
    if stderr.contains("not recognized") || stderr.contains("command not found") {
        return Err(SubmitAgentError::storage("azcopy not found on PATH"));
    }
    if stderr.contains("Permission denied") {
        return Err(SubmitAgentError::storage("Permission denied"));
    }

    if !output.status.success() {
        let exit_code = output.status.code();
        error!("azcopy failed with exit code {:?}", exit_code);
        if !stderr.trim().is_empty() {
            error!("STDERR: {}", stderr);
        }
        return Err(SubmitAgentError::ProcessError {
            command: "azcopy".to_string(),
            exit_code,
            stderr: if stderr.is_empty() {
                stdout.to_string()
            } else {
                stderr.to_string()
            },
        });
    }

    info!("Code synchronized");
    Ok(())
}
