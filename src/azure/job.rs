// file: src/azure/job.rs
// version: 1.0.0
// guid: 9c41f7d6-20b3-48ea-a5c8-d16e09f3b782

//! AML job specification and submission via the Azure CLI

use crate::config::JobConfig;
use crate::{error::SubmitAgentError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, error, info};

/// Curated base environment the platform boots before switching to the
/// configured image version
pub const BASE_ENVIRONMENT_IMAGE: &str =
    "mcr.microsoft.com/azureml/openmpi3.1.2-ubuntu18.04:20210513.v1";

/// Seconds between autoscale evaluations
const AUTO_SCALE_INTERVAL_SEC: u32 = 120;

/// A mounted input or output folder
#[derive(Debug, Clone, Serialize)]
pub struct IoBinding {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub mode: String,
}

impl IoBinding {
    /// Read-only uri_folder mount
    pub fn input(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: "uri_folder".to_string(),
            mode: "ro_mount".to_string(),
        }
    }

    /// Read-write uri_folder mount
    pub fn output(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: "uri_folder".to_string(),
            mode: "rw_mount".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Environment {
    pub image: String,
}

#[derive(Debug, Serialize)]
pub struct Distribution {
    #[serde(rename = "type")]
    pub kind: String,
    pub process_count_per_instance: u32,
}

#[derive(Debug, Serialize)]
pub struct ScalePolicy {
    #[serde(rename = "autoScaleIntervalInSec")]
    pub auto_scale_interval_in_sec: u32,
    #[serde(rename = "maxInstanceTypeCount")]
    pub max_instance_type_count: u32,
    #[serde(rename = "minInstanceTypeCount")]
    pub min_instance_type_count: u32,
}

#[derive(Debug, Serialize)]
pub struct AiSuperComputer {
    pub interactive: bool,
    #[serde(rename = "imageVersion")]
    pub image_version: String,
    pub priority: String,
    #[serde(rename = "slaTier")]
    pub sla_tier: String,
    #[serde(rename = "scalePolicy")]
    pub scale_policy: ScalePolicy,
}

#[derive(Debug, Serialize)]
pub struct ResourceProperties {
    #[serde(rename = "AISuperComputer")]
    pub ai_super_computer: AiSuperComputer,
}

#[derive(Debug, Serialize)]
pub struct Resources {
    pub instance_type: String,
    pub instance_count: u32,
    pub properties: ResourceProperties,
}

/// AML v2 command job specification
#[derive(Debug, Serialize)]
pub struct JobSpec {
    pub display_name: String,
    pub experiment_name: String,
    pub command: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub inputs: BTreeMap<String, IoBinding>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, IoBinding>,
    pub environment: Environment,
    pub compute: String,
    pub distribution: Distribution,
    pub resources: Resources,
}

impl JobSpec {
    /// Build the specification for a validated job configuration
    pub fn build(config: &JobConfig) -> Result<Self> {
        let command = crate::launcher::build_job_command(config)?;

        let mut outputs = BTreeMap::new();
        outputs.insert(
            "workdir".to_string(),
            IoBinding::output(format!(
                "azureml://datastores/{}/paths/{}",
                config.storage.datastore_name, config.experiment.workdir
            )),
        );

        Ok(Self {
            display_name: config.display_name().to_string(),
            experiment_name: config.experiment.name.clone(),
            command,
            inputs: BTreeMap::new(),
            outputs,
            environment: Environment {
                image: BASE_ENVIRONMENT_IMAGE.to_string(),
            },
            compute: config.cluster.virtual_cluster_arm_id(),
            distribution: Distribution {
                kind: "PyTorch".to_string(),
                process_count_per_instance: 1,
            },
            resources: Resources {
                instance_type: format!("Singularity.{}", config.cluster.instance_type),
                instance_count: config.cluster.node_count,
                properties: ResourceProperties {
                    ai_super_computer: AiSuperComputer {
                        interactive: config.cluster.sla_tier.interactive(),
                        image_version: config.environment.docker_image.clone(),
                        priority: "High".to_string(),
                        sla_tier: config.cluster.sla_tier.as_str().to_string(),
                        scale_policy: ScalePolicy {
                            auto_scale_interval_in_sec: AUTO_SCALE_INTERVAL_SEC,
                            max_instance_type_count: config.cluster.node_count,
                            min_instance_type_count: config.cluster.node_count,
                        },
                    },
                },
            },
        })
    }

    /// Render as the YAML file `az ml job create` consumes
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Identity of a successfully submitted job
#[derive(Debug, Clone)]
pub struct SubmittedJob {
    pub name: String,
    pub display_name: String,
    pub studio_url: Option<String>,
}

/// Submit a job specification through `az ml job create`
pub async fn submit(spec: &JobSpec, config: &JobConfig) -> Result<SubmittedJob> {
    let spec_path = temp_spec_path();
    tokio::fs::write(&spec_path, spec.to_yaml()?).await?;
    debug!("Wrote job spec to {}", spec_path.display());

    let result = run_az_create(&spec_path, config).await;
    let _ = tokio::fs::remove_file(&spec_path).await;
    result
}

fn temp_spec_path() -> PathBuf {
    std::env::temp_dir().join(format!(
        "aml_job_spec_{}.yaml",
        chrono::Utc::now().format("%Y%m%d%H%M%S%3f")
    ))
}

async fn run_az_create(spec_path: &std::path::Path, config: &JobConfig) -> Result<SubmittedJob> {
    let spec_arg = spec_path.to_string_lossy();
    let args = [
        "ml",
        "job",
        "create",
        "-f",
        spec_arg.as_ref(),
        "-w",
        config.cluster.workspace.as_str(),
        "-g",
        config.cluster.workspace_resource_group.as_str(),
        "--subscription",
        config.cluster.workspace_subscription_id.as_str(),
        "--output",
        "json",
    ];
    info!("Running: az {}", args.join(" "));

    let output = Command::new("az").args(args).output().await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SubmitAgentError::submission("az CLI not found on PATH")
        } else {
            SubmitAgentError::ProcessError {
                command: "az ml job create".to_string(),
                exit_code: None,
                stderr: format!("Failed to execute command: {}", e),
            }
        }
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if stderr.contains("'ml' is misspelled or not recognized") {
        return Err(SubmitAgentError::submission(
            "Azure CLI 'ml' extension is not installed",
        ));
    }
    if !output.status.success() {
        error!("az ml job create failed: {}", stderr.trim());
        return Err(SubmitAgentError::ProcessError {
            command: "az ml job create".to_string(),
            exit_code: output.status.code(),
            stderr: stderr.to_string(),
        });
    }

    let value: serde_json::Value = serde_json::from_str(&stdout).map_err(|e| {
        SubmitAgentError::submission(format!("Unexpected az CLI job output: {}", e))
    })?;

    let name = value["name"].as_str().unwrap_or_default().to_string();
    let display_name = value["display_name"]
        .as_str()
        .unwrap_or(&name)
        .to_string();
    let studio_url = value
        .pointer("/services/Studio/endpoint")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    Ok(SubmittedJob {
        name,
        display_name,
        studio_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        ClusterConfig, EnvironmentConfig, ExperimentConfig, JobConfig, SlaTier, StorageConfig,
    };

    fn config() -> JobConfig {
        JobConfig {
            cluster: ClusterConfig {
                workspace: "ws".to_string(),
                workspace_subscription_id: "sub-ws".to_string(),
                workspace_resource_group: "rg-ws".to_string(),
                virtual_cluster: "vc".to_string(),
                virtual_cluster_subscription_id: "sub-vc".to_string(),
                virtual_cluster_resource_group: "rg-vc".to_string(),
                instance_type: "ND40rs_v2".to_string(),
                node_count: 4,
                sla_tier: SlaTier::Premium,
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
                setup_script: vec![],
            },
            experiment: ExperimentConfig {
                name: "exp".to_string(),
                job_name: "job-1".to_string(),
                workdir: "projects/demo".to_string(),
                copy_data: false,
                sync_code: false,
                data_dir: String::new(),
                data_subdir: String::new(),
                ignore_dir: String::new(),
                script: vec!["python train.py".to_string()],
                arg_sweep: vec![],
                sas_token: String::new(),
            },
        }
    }

    #[test]
    fn test_spec_carries_cluster_shape() {
        let spec = JobSpec::build(&config()).unwrap();
        assert_eq!(spec.display_name, "job-1");
        assert_eq!(spec.experiment_name, "exp");
        assert_eq!(spec.resources.instance_type, "Singularity.ND40rs_v2");
        assert_eq!(spec.resources.instance_count, 4);
        assert_eq!(
            spec.compute,
            "/subscriptions/sub-vc/resourceGroups/rg-vc/providers/Microsoft.MachineLearningServices/virtualclusters/vc"
        );

        let asc = &spec.resources.properties.ai_super_computer;
        assert!(asc.interactive);
        assert_eq!(asc.image_version, "pytorch-2.1");
        assert_eq!(asc.sla_tier, "Premium");
        assert_eq!(asc.scale_policy.max_instance_type_count, 4);
        assert_eq!(asc.scale_policy.min_instance_type_count, 4);
    }

    #[test]
    fn test_spec_mounts_workdir_output() {
        let spec = JobSpec::build(&config()).unwrap();
        let workdir = spec.outputs.get("workdir").unwrap();
        assert_eq!(
            workdir.path,
            "azureml://datastores/trainingdata/paths/projects/demo"
        );
        assert_eq!(workdir.mode, "rw_mount");
        assert_eq!(workdir.kind, "uri_folder");
    }

    #[test]
    fn test_spec_yaml_renames() {
        let spec = JobSpec::build(&config()).unwrap();
        let yaml = spec.to_yaml().unwrap();
        assert!(yaml.contains("slaTier: Premium"));
        assert!(yaml.contains("imageVersion: pytorch-2.1"));
        assert!(yaml.contains("autoScaleIntervalInSec: 120"));
        assert!(yaml.contains("type: PyTorch"));
        assert!(!yaml.contains("inputs:"));
    }

    #[test]
    fn test_command_targets_workdir_mount() {
        let spec = JobSpec::build(&config()).unwrap();
        assert!(spec.command.starts_with("cd ${{outputs.workdir}} ; "));
        assert!(spec.command.contains("python train.py"));
    }
}
