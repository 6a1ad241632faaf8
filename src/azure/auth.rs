// file: src/azure/auth.rs
// version: 1.0.0
// guid: 0d7b42f9-8e61-4c0a-b53c-96f2a81d04e7

//! Access token acquisition through the Azure CLI

use crate::{error::SubmitAgentError, Result};
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

/// Response shape of `az account get-access-token`
#[derive(Debug, Deserialize)]
pub struct AccessToken {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "tokenType", default)]
    pub token_type: String,
    #[serde(rename = "expiresOn", default)]
    pub expires_on: String,
}

/// Obtain a management-plane bearer token from the logged-in Azure CLI
pub async fn get_access_token() -> Result<AccessToken> {
    debug!("Running: az account get-access-token");

    let output = Command::new("az")
        .args(["account", "get-access-token", "--output", "json"])
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SubmitAgentError::auth("az CLI not found on PATH")
            } else {
                SubmitAgentError::auth(format!("Failed to run az CLI: {}", e))
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SubmitAgentError::auth(format!(
            "az account get-access-token failed: {}",
            stderr.trim()
        )));
    }

    let token: AccessToken = serde_json::from_slice(&output.stdout).map_err(|e| {
        SubmitAgentError::auth(format!("Unexpected az CLI token output: {}", e))
    })?;

    Ok(token)
}
