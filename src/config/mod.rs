// file: src/config/mod.rs
// version: 1.0.0
// guid: c7f2a815-63d9-4b04-a9e7-50d186c3b2f8

//! Configuration module for the AML submit agent
//!
//! Handles loading and validation of job configurations.

pub mod job;
pub mod loader;

pub use job::{ClusterConfig, EnvironmentConfig, ExperimentConfig, JobConfig, StorageConfig};

use serde::{Deserialize, Serialize};

/// Service tiers offered by Singularity virtual clusters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlaTier {
    #[serde(rename = "Basic")]
    Basic,
    #[serde(rename = "Standard")]
    Standard,
    #[serde(rename = "Premium")]
    Premium,
}

impl SlaTier {
    /// Get the tier as the string the platform expects
    pub fn as_str(&self) -> &'static str {
        match self {
            SlaTier::Basic => "Basic",
            SlaTier::Standard => "Standard",
            SlaTier::Premium => "Premium",
        }
    }

    /// Premium jobs run interactively on the cluster
    pub fn interactive(&self) -> bool {
        matches!(self, SlaTier::Premium)
    }
}

impl Default for SlaTier {
    fn default() -> Self {
        SlaTier::Basic
    }
}

impl std::str::FromStr for SlaTier {
    type Err = crate::error::SubmitAgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Basic" | "basic" => Ok(SlaTier::Basic),
            "Standard" | "standard" => Ok(SlaTier::Standard),
            "Premium" | "premium" => Ok(SlaTier::Premium),
            _ => Err(crate::error::SubmitAgentError::ValidationError(format!(
                "Unknown SLA tier: {}",
                s
            ))),
        }
    }
}
