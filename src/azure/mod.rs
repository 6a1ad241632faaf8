// file: src/azure/mod.rs
// version: 1.0.0
// guid: f1c68a03-2b97-4d5e-80f4-7e3a1d92c5b6

//! Azure collaboration layer
//!
//! Thin wrappers over the Azure CLI and the management-plane REST API:
//! access tokens, datastore registration and job submission.

pub mod auth;
pub mod datastore;
pub mod job;
pub mod rest;

pub use job::{JobSpec, SubmittedJob};
pub use rest::RestClient;
