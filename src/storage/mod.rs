// file: src/storage/mod.rs
// version: 1.0.0
// guid: 2a6d90f4-c1b8-47e3-85a2-d74f0b19c6e3

//! Blob storage helpers: SAS URL handling and azcopy transfers

pub mod azcopy;
pub mod sas;

pub use sas::SasUrl;
