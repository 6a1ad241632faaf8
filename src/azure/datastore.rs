// file: src/azure/datastore.rs
// version: 1.0.0
// guid: 7b05c38e-49a2-4e16-b7d0-f58316c9a024

//! Blob container registration as an AML datastore

use super::rest::RestClient;
use crate::config::{ClusterConfig, StorageConfig};
use crate::storage::SasUrl;
use crate::Result;
use serde_json::{json, Value};
use tracing::info;

const API_VERSION: &str = "2024-04-01";

/// Register the configured blob container as a workspace datastore.
///
/// The PUT is idempotent; re-registering an existing datastore updates its
/// credentials.
pub async fn register(
    client: &RestClient,
    cluster: &ClusterConfig,
    storage: &StorageConfig,
) -> Result<Value> {
    let body = registration_body(storage)?;
    let path = format!(
        "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.MachineLearningServices/workspaces/{}/datastores/{}?api-version={}",
        cluster.workspace_subscription_id,
        cluster.workspace_resource_group,
        cluster.workspace,
        storage.datastore_name,
        API_VERSION
    );

    info!(
        "Registering datastore '{}' for container '{}'",
        storage.datastore_name, storage.container_name
    );
    client.put(&path, &body).await
}

/// Build the registration payload, choosing credentials by precedence:
/// account key, then SAS token, then workspace identity.
fn registration_body(storage: &StorageConfig) -> Result<Value> {
    let credentials = if !storage.account_key.is_empty() {
        json!({
            "credentialsType": "AccountKey",
            "secrets": {
                "secretsType": "AccountKey",
                "key": storage.account_key,
            }
        })
    } else if !storage.sas_token.is_empty() {
        let sas = SasUrl::parse(&storage.sas_token)?;
        json!({
            "credentialsType": "Sas",
            "secrets": {
                "secretsType": "Sas",
                "sasToken": sas.query(),
            }
        })
    } else {
        json!({ "credentialsType": "None" })
    };

    Ok(json!({
        "properties": {
            "dataStoreType": "AzureBlob",
            "accountName": storage.account_name,
            "containerName": storage.container_name,
            "credentials": credentials,
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;

    fn storage() -> StorageConfig {
        StorageConfig {
            datastore_name: "trainingdata".to_string(),
            container_name: "data".to_string(),
            account_name: "acct".to_string(),
            account_key: String::new(),
            sas_token:
                "https://acct.blob.core.windows.net/data?sv=1&st=2&se=3&sr=4&sp=5&sig=6"
                    .to_string(),
        }
    }

    #[test]
    fn test_body_prefers_account_key() {
        let mut s = storage();
        s.account_key = "k3y".to_string();
        let body = registration_body(&s).unwrap();
        assert_eq!(
            body["properties"]["credentials"]["credentialsType"],
            "AccountKey"
        );
        assert_eq!(
            body["properties"]["credentials"]["secrets"]["key"],
            "k3y"
        );
    }

    #[test]
    fn test_body_uses_sas_query_only() {
        let body = registration_body(&storage()).unwrap();
        assert_eq!(body["properties"]["credentials"]["credentialsType"], "Sas");
        assert_eq!(
            body["properties"]["credentials"]["secrets"]["sasToken"],
            "sv=1&st=2&se=3&sr=4&sp=5&sig=6"
        );
    }

    #[test]
    fn test_body_falls_back_to_identity() {
        let mut s = storage();
        s.sas_token.clear();
        let body = registration_body(&s).unwrap();
        assert_eq!(body["properties"]["credentials"]["credentialsType"], "None");
    }

    #[test]
    fn test_body_carries_container_identity() {
        let body = registration_body(&storage()).unwrap();
        assert_eq!(body["properties"]["dataStoreType"], "AzureBlob");
        assert_eq!(body["properties"]["accountName"], "acct");
        assert_eq!(body["properties"]["containerName"], "data");
    }
}
