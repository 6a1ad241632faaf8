// file: src/logging/mod.rs
// version: 1.0.0
// guid: 7c2e94d1-38b6-4f50-92ae-015d7c3b88e4

//! Logging module for the AML submit agent

pub mod logger;
