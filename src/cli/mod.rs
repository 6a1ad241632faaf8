// file: src/cli/mod.rs
// version: 1.0.0
// guid: 4f61b8d2-a970-4e53-bc14-08d5e7a32f96

//! Command line interface for the AML submit agent

pub mod args;
pub mod commands;
