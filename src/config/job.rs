// file: src/config/job.rs
// version: 1.0.0
// guid: 1b94d7e0-82c5-4a3f-b61d-e97f0c258a43

//! Job configuration structures

use super::SlaTier;
use crate::storage::SasUrl;
use serde::{Deserialize, Deserializer, Serialize};

/// Full job submission configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    /// Compute cluster selection
    pub cluster: ClusterConfig,
    /// Blob storage identity and credentials
    pub storage: StorageConfig,
    /// Container image and environment setup
    pub environment: EnvironmentConfig,
    /// Experiment identity, data movement and training command
    pub experiment: ExperimentConfig,
}

/// Workspace and virtual cluster selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// AML workspace name
    pub workspace: String,
    /// Subscription the workspace lives in
    pub workspace_subscription_id: String,
    /// Resource group the workspace lives in
    pub workspace_resource_group: String,
    /// Singularity virtual cluster name
    pub virtual_cluster: String,
    /// Subscription the virtual cluster lives in
    pub virtual_cluster_subscription_id: String,
    /// Resource group the virtual cluster lives in
    pub virtual_cluster_resource_group: String,
    /// Singularity instance type (without the `Singularity.` prefix)
    pub instance_type: String,
    /// Number of compute nodes
    #[serde(default = "default_node_count")]
    pub node_count: u32,
    /// Service tier
    pub sla_tier: SlaTier,
}

/// Blob container identity and credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Name under which the container is registered as a datastore
    pub datastore_name: String,
    /// Blob container name
    pub container_name: String,
    /// Storage account name
    pub account_name: String,
    /// Storage account key, may be empty when SAS auth is used
    pub account_key: String,
    /// Full container SAS URL
    pub sas_token: String,
}

/// Container image and environment setup commands
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Docker image version the platform should run
    pub docker_image: String,
    /// Setup commands executed before training
    #[serde(deserialize_with = "string_or_lines")]
    pub setup_script: Vec<String>,
}

/// Experiment identity, data movement and the training command
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Experiment name
    pub name: String,
    /// Display name of the submitted job; falls back to the experiment name
    pub job_name: String,
    /// Working directory inside the storage container
    pub workdir: String,
    /// Copy the data directory onto the compute node before training
    #[serde(default = "default_true")]
    pub copy_data: bool,
    /// Synchronize the local working tree to blob storage before submission
    #[serde(default = "default_true")]
    pub sync_code: bool,
    /// Directory (inside the container) copied when `copy_data` is set
    pub data_dir: String,
    /// Subdirectory filter passed to azcopy
    pub data_subdir: String,
    /// Extra directory excluded from code sync
    pub ignore_dir: String,
    /// Training command lines
    #[serde(deserialize_with = "string_or_lines")]
    pub script: Vec<String>,
    /// Argument sweep lines, empty for a single job
    pub arg_sweep: Vec<String>,
    /// Pre-v1.3 configs carried the SAS token here
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sas_token: String,
}

fn default_node_count() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            workspace: String::new(),
            workspace_subscription_id: String::new(),
            workspace_resource_group: String::new(),
            virtual_cluster: String::new(),
            virtual_cluster_subscription_id: String::new(),
            virtual_cluster_resource_group: String::new(),
            instance_type: String::new(),
            node_count: default_node_count(),
            sla_tier: SlaTier::default(),
        }
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            job_name: String::new(),
            workdir: String::new(),
            copy_data: true,
            sync_code: true,
            data_dir: String::new(),
            data_subdir: String::new(),
            ignore_dir: String::new(),
            script: Vec::new(),
            arg_sweep: Vec::new(),
            sas_token: String::new(),
        }
    }
}

/// Accept both the list form and the legacy newline-joined string form
fn string_or_lines<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrLines {
        Text(String),
        Lines(Vec<String>),
    }

    match StringOrLines::deserialize(deserializer)? {
        StringOrLines::Text(s) => Ok(s.split('\n').map(str::to_string).collect()),
        StringOrLines::Lines(v) => Ok(v),
    }
}

impl JobConfig {
    /// Apply legacy-layout conversions after deserialization
    pub fn normalize(&mut self) {
        // v1.3 moved the SAS token from experiment to storage
        if self.storage.sas_token.is_empty() && !self.experiment.sas_token.is_empty() {
            self.storage.sas_token = std::mem::take(&mut self.experiment.sas_token);
        }
    }

    /// Validate the whole configuration, naming the offending field
    pub fn validate(&self) -> crate::Result<()> {
        self.cluster.validate()?;
        self.experiment.validate()?;

        if self.experiment.needs_storage() {
            self.storage.validate()?;
        }
        if self.environment.docker_image.is_empty() {
            return Err(crate::error::SubmitAgentError::ValidationError(
                "environment.docker_image cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Display name for the submitted job
    pub fn display_name(&self) -> &str {
        if self.experiment.job_name.is_empty() {
            &self.experiment.name
        } else {
            &self.experiment.job_name
        }
    }
}

impl ClusterConfig {
    /// Validate the cluster selection
    pub fn validate(&self) -> crate::Result<()> {
        let required = [
            ("cluster.workspace", &self.workspace),
            (
                "cluster.workspace_subscription_id",
                &self.workspace_subscription_id,
            ),
            (
                "cluster.workspace_resource_group",
                &self.workspace_resource_group,
            ),
            ("cluster.virtual_cluster", &self.virtual_cluster),
            (
                "cluster.virtual_cluster_subscription_id",
                &self.virtual_cluster_subscription_id,
            ),
            (
                "cluster.virtual_cluster_resource_group",
                &self.virtual_cluster_resource_group,
            ),
            ("cluster.instance_type", &self.instance_type),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(crate::error::SubmitAgentError::ValidationError(format!(
                    "{} cannot be empty",
                    field
                )));
            }
        }

        if self.node_count < 1 {
            return Err(crate::error::SubmitAgentError::ValidationError(
                "cluster.node_count must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// ARM resource id of the virtual cluster
    pub fn virtual_cluster_arm_id(&self) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.MachineLearningServices/virtualclusters/{}",
            self.virtual_cluster_subscription_id,
            self.virtual_cluster_resource_group,
            self.virtual_cluster
        )
    }
}

impl StorageConfig {
    /// Validate the storage identity and that the SAS URL is well formed
    pub fn validate(&self) -> crate::Result<()> {
        let required = [
            ("storage.datastore_name", &self.datastore_name),
            ("storage.container_name", &self.container_name),
            ("storage.account_name", &self.account_name),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(crate::error::SubmitAgentError::ValidationError(format!(
                    "{} cannot be empty",
                    field
                )));
            }
        }

        if self.sas_token.is_empty() {
            return Err(crate::error::SubmitAgentError::ValidationError(
                "storage.sas_token is required when code sync or data copy is enabled"
                    .to_string(),
            ));
        }
        SasUrl::parse(&self.sas_token).map_err(|e| {
            crate::error::SubmitAgentError::ValidationError(format!(
                "storage.sas_token: {}",
                e
            ))
        })?;

        Ok(())
    }
}

impl ExperimentConfig {
    /// Validate the experiment section
    pub fn validate(&self) -> crate::Result<()> {
        if self.name.is_empty() {
            return Err(crate::error::SubmitAgentError::ValidationError(
                "experiment.name cannot be empty".to_string(),
            ));
        }
        if self.workdir.is_empty() {
            return Err(crate::error::SubmitAgentError::ValidationError(
                "experiment.workdir cannot be empty".to_string(),
            ));
        }
        if !self.script.iter().any(|line| !line.trim().is_empty()) {
            return Err(crate::error::SubmitAgentError::ValidationError(
                "experiment.script must contain at least one command".to_string(),
            ));
        }
        if self.copy_data && self.data_dir.is_empty() {
            return Err(crate::error::SubmitAgentError::ValidationError(
                "experiment.data_dir is required when copy_data is enabled".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether the flow touches blob storage at all
    pub fn needs_storage(&self) -> bool {
        self.sync_code || self.copy_data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub fn valid_config() -> JobConfig {
        JobConfig {
            cluster: ClusterConfig {
                workspace: "ws".to_string(),
                workspace_subscription_id: "sub-ws".to_string(),
                workspace_resource_group: "rg-ws".to_string(),
                virtual_cluster: "vc".to_string(),
                virtual_cluster_subscription_id: "sub-vc".to_string(),
                virtual_cluster_resource_group: "rg-vc".to_string(),
                instance_type: "ND40rs_v2".to_string(),
                node_count: 1,
                sla_tier: SlaTier::Basic,
            },
            storage: StorageConfig {
                datastore_name: "trainingdata".to_string(),
                container_name: "data".to_string(),
                account_name: "acct".to_string(),
                account_key: String::new(),
                sas_token:
                    "https://acct.blob.core.windows.net/data?sv=1&st=2&se=3&sr=4&sp=5&sig=6"
                        .to_string(),
            },
            environment: EnvironmentConfig {
                docker_image: "pytorch-2.1".to_string(),
                setup_script: vec!["pip install -r requirements.txt".to_string()],
            },
            experiment: ExperimentConfig {
                name: "exp".to_string(),
                job_name: String::new(),
                workdir: "projects/demo".to_string(),
                copy_data: true,
                sync_code: true,
                data_dir: "datasets/demo".to_string(),
                data_subdir: String::new(),
                ignore_dir: String::new(),
                script: vec!["python train.py".to_string()],
                arg_sweep: vec![],
                sas_token: String::new(),
            },
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_names_missing_field() {
        let mut cfg = valid_config();
        cfg.cluster.instance_type.clear();
        let err = cfg.validate().unwrap_err().to_string();
        assert!(err.contains("cluster.instance_type"));
    }

    #[test]
    fn test_validate_requires_data_dir_for_copy() {
        let mut cfg = valid_config();
        cfg.experiment.data_dir.clear();
        let err = cfg.validate().unwrap_err().to_string();
        assert!(err.contains("data_dir"));
    }

    #[test]
    fn test_validate_skips_storage_when_unused() {
        let mut cfg = valid_config();
        cfg.experiment.copy_data = false;
        cfg.experiment.sync_code = false;
        cfg.experiment.data_dir.clear();
        cfg.storage = StorageConfig::default();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_malformed_sas() {
        let mut cfg = valid_config();
        cfg.storage.sas_token = "https://acct.blob.core.windows.net/data".to_string();
        let err = cfg.validate().unwrap_err().to_string();
        assert!(err.contains("sas_token"));
    }

    #[test]
    fn test_node_count_zero_rejected() {
        let mut cfg = valid_config();
        cfg.cluster.node_count = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_normalize_moves_legacy_sas_token() {
        let mut cfg = valid_config();
        cfg.experiment.sas_token = std::mem::take(&mut cfg.storage.sas_token);
        cfg.normalize();
        assert!(cfg.storage.sas_token.contains("sig=6"));
        assert!(cfg.experiment.sas_token.is_empty());
    }

    #[test]
    fn test_display_name_falls_back_to_experiment_name() {
        let mut cfg = valid_config();
        assert_eq!(cfg.display_name(), "exp");
        cfg.experiment.job_name = "job-1".to_string();
        assert_eq!(cfg.display_name(), "job-1");
    }

    #[test]
    fn test_virtual_cluster_arm_id() {
        let cfg = valid_config();
        assert_eq!(
            cfg.cluster.virtual_cluster_arm_id(),
            "/subscriptions/sub-vc/resourceGroups/rg-vc/providers/Microsoft.MachineLearningServices/virtualclusters/vc"
        );
    }

    #[test]
    fn test_legacy_string_script_is_split() {
        let json = r#"{
            "environment": {"docker_image": "img", "setup_script": "a\nb"},
            "experiment": {"script": "python train.py"}
        }"#;
        let cfg: JobConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.environment.setup_script, vec!["a", "b"]);
        assert_eq!(cfg.experiment.script, vec!["python train.py"]);
    }

    #[test]
    fn test_defaults_for_missing_sections() {
        let cfg: JobConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.cluster.node_count, 1);
        assert!(cfg.experiment.copy_data);
        assert!(cfg.experiment.sync_code);
        assert_eq!(cfg.cluster.sla_tier, SlaTier::Basic);
    }
}
