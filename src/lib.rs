// file: src/lib.rs
// version: 1.0.0
// guid: 8e24d6b0-593a-47cf-b1e8-a90c37f512d4

//! # AML Submit Agent
//!
//! Automation layer for submitting machine-learning training jobs to Azure ML
//! Singularity virtual clusters: job configuration loading, code and data
//! movement over SAS-addressed blob storage, datastore registration, job
//! specification assembly, and the credential-masking command sequencer that
//! drives the remote entry point.

pub mod azure;
pub mod cli;
pub mod config;
pub mod error;
pub mod launcher;
pub mod logging;
pub mod script;
pub mod storage;
pub mod sweep;

pub use error::{Result, SubmitAgentError};

/// Version information for the agent
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
